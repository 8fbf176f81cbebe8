//! Injectable frame scheduler.
//!
//! Every animated component registers a callback here instead of talking to a
//! global animation loop. The host drives `tick` once per frame.

use crate::registry::{dispatch, Registry};
use log::trace;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickerId(u64);

/// What callbacks receive on each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Seconds since the ticker was created, after lag smoothing.
    pub time: f64,
    /// Seconds since the previous frame, after lag smoothing.
    pub delta: f64,
    pub frame: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LagSmoothing {
    pub threshold: f64,
    pub adjusted: f64,
}

impl Default for LagSmoothing {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            adjusted: 0.033,
        }
    }
}

struct TickerState {
    time: f64,
    frame: u64,
    lag: Option<LagSmoothing>,
}

/// Cloning a `Ticker` yields another handle to the same scheduler.
#[derive(Clone)]
pub struct Ticker {
    state: Rc<RefCell<TickerState>>,
    callbacks: Rc<RefCell<Registry<Frame>>>,
}

impl Ticker {
    pub fn new() -> Self {
        Self::with_lag_smoothing(Some(LagSmoothing::default()))
    }

    pub fn with_lag_smoothing(lag: Option<LagSmoothing>) -> Self {
        Self {
            state: Rc::new(RefCell::new(TickerState {
                time: 0.0,
                frame: 0,
                lag,
            })),
            callbacks: Rc::new(RefCell::new(Registry::new())),
        }
    }

    pub fn add(&self, callback: impl FnMut(&Frame) + 'static) -> TickerId {
        TickerId(self.callbacks.borrow_mut().add(callback))
    }

    /// Returns false when `id` was not registered (already removed).
    pub fn remove(&self, id: TickerId) -> bool {
        self.callbacks.borrow_mut().remove(id.0)
    }

    pub fn contains(&self, id: TickerId) -> bool {
        self.callbacks.borrow().contains(id.0)
    }

    pub fn len(&self) -> usize {
        self.callbacks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn time(&self) -> f64 {
        self.state.borrow().time
    }

    /// Advances the clock by `dt` seconds and runs every registered callback once.
    pub fn tick(&self, dt: f64) -> Frame {
        let frame = {
            let mut state = self.state.borrow_mut();
            let mut delta = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
            if let Some(lag) = state.lag {
                if delta > lag.threshold {
                    trace!("lag smoothing: {:.3}s clamped to {:.3}s", delta, lag.adjusted);
                    delta = lag.adjusted;
                }
            }
            state.time += delta;
            state.frame += 1;
            Frame {
                time: state.time,
                delta,
                frame: state.frame,
            }
        };
        dispatch(&self.callbacks, &frame);
        frame
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ticker")
            .field("time", &self.time())
            .field("callbacks", &self.len())
            .finish()
    }
}
