//! Window-level resize notifications.

use crate::registry::{dispatch, Registry};
use log::debug;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Cloning a `Viewport` yields another handle to the same window.
#[derive(Clone)]
pub struct Viewport {
    size: Rc<Cell<Size>>,
    listeners: Rc<RefCell<Registry<Size>>>,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: Rc::new(Cell::new(Size { width, height })),
            listeners: Rc::new(RefCell::new(Registry::new())),
        }
    }

    pub fn size(&self) -> Size {
        self.size.get()
    }

    pub fn on_resize(&self, callback: impl FnMut(&Size) + 'static) -> ListenerId {
        ListenerId(self.listeners.borrow_mut().add(callback))
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.borrow_mut().remove(id.0)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Records the new size and notifies listeners. Unchanged sizes are ignored.
    pub fn resize(&self, width: f64, height: f64) {
        let size = Size { width, height };
        if size == self.size.get() {
            return;
        }
        self.size.set(size);
        debug!("viewport resized to {}x{}", width, height);
        dispatch(&self.listeners, &size);
    }
}

impl std::fmt::Debug for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewport")
            .field("size", &self.size())
            .field("listeners", &self.listener_count())
            .finish()
    }
}
