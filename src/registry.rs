//! Shared callback storage used by the ticker and the viewport.
//!
//! Callbacks are reference counted so a dispatch can snapshot the list, drop
//! the registry borrow, and still let a running callback add or remove
//! entries (including itself). Entries removed mid-dispatch are skipped.

use std::cell::RefCell;
use std::rc::Rc;

type Slot<A> = Rc<RefCell<dyn FnMut(&A)>>;

pub(crate) struct Registry<A> {
    next_id: u64,
    entries: Vec<(u64, Slot<A>)>,
}

impl<A> Registry<A> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 1,
            entries: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, callback: impl FnMut(&A) + 'static) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let slot: Slot<A> = Rc::new(RefCell::new(callback));
        self.entries.push((id, slot));
        id
    }

    pub(crate) fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub(crate) fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|(entry, _)| *entry == id)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    fn snapshot(&self) -> Vec<(u64, Slot<A>)> {
        self.entries
            .iter()
            .map(|(id, slot)| (*id, Rc::clone(slot)))
            .collect()
    }
}

/// Calls every callback registered in `registry` with `arg`.
///
/// The registry is only borrowed while taking the snapshot and while checking
/// that an entry is still live, never while a callback runs.
pub(crate) fn dispatch<A>(registry: &RefCell<Registry<A>>, arg: &A) {
    let slots = registry.borrow().snapshot();
    for (id, slot) in slots {
        if !registry.borrow().contains(id) {
            continue;
        }
        // A callback that re-enters its own dispatch is skipped for the nested call.
        if let Ok(mut callback) = slot.try_borrow_mut() {
            (&mut *callback)(arg);
        }
    }
}
