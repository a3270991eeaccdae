// src/bus.rs

//! # Latest-Value Telemetry Channels
//!
//! The controller reads its inputs through [`LatestValueChannel`] and writes
//! its outputs through [`Publisher`]. Both are latest-value, not queued: a
//! reader only ever sees the newest sample, and sees it once.
//!
//! [`Topic`] is an in-memory implementation for single-threaded hosts and
//! tests. Any transport can be plugged in by implementing the two traits.
//!
//! ```
//! use fixed_wing_rate_control::bus::{LatestValueChannel, Publisher, Topic};
//!
//! let mut topic = Topic::new();
//! let mut reader = topic.subscribe();
//! assert_eq!(reader.try_read(), None);
//!
//! topic.publish(1);
//! topic.publish(2);
//! assert_eq!(reader.try_read(), Some(2));
//! assert_eq!(reader.try_read(), None);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

/// Non-blocking reader of the newest sample on a channel.
pub trait LatestValueChannel<T> {
    /// Returns the newest sample if one arrived since the previous call.
    fn try_read(&mut self) -> Option<T>;
}

/// Writer of samples to a channel.
pub trait Publisher<T> {
    /// Replaces the channel's latest value.
    fn publish(&mut self, value: T);
}

#[derive(Debug)]
struct Slot<T> {
    value: Option<T>,
    generation: u64,
}

/// Single-threaded latest-value topic.
#[derive(Debug)]
pub struct Topic<T> {
    slot: Rc<RefCell<Slot<T>>>,
}

impl<T> Clone for Topic<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T> Default for Topic<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Topic<T> {
    /// Creates an empty topic.
    pub fn new() -> Self {
        Self {
            slot: Rc::new(RefCell::new(Slot {
                value: None,
                generation: 0,
            })),
        }
    }

    /// Creates a reader that will see the next published sample.
    pub fn subscribe(&self) -> Subscriber<T> {
        Subscriber {
            slot: Rc::clone(&self.slot),
            seen: self.slot.borrow().generation,
        }
    }

    /// Number of samples published so far.
    pub fn publish_count(&self) -> u64 {
        self.slot.borrow().generation
    }
}

impl<T: Clone> Topic<T> {
    /// Newest sample, regardless of who has read it.
    pub fn latest(&self) -> Option<T> {
        self.slot.borrow().value.clone()
    }
}

impl<T> Publisher<T> for Topic<T> {
    fn publish(&mut self, value: T) {
        let mut slot = self.slot.borrow_mut();
        slot.value = Some(value);
        slot.generation += 1;
    }
}

/// Reader handle created by [`Topic::subscribe`].
#[derive(Debug)]
pub struct Subscriber<T> {
    slot: Rc<RefCell<Slot<T>>>,
    seen: u64,
}

impl<T: Clone> LatestValueChannel<T> for Subscriber<T> {
    fn try_read(&mut self) -> Option<T> {
        let slot = self.slot.borrow();
        if slot.generation == self.seen {
            return None;
        }
        self.seen = slot.generation;
        slot.value.clone()
    }
}

/// Channel that never produces a sample, for inputs a host does not provide.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl<T> LatestValueChannel<T> for Silent {
    fn try_read(&mut self) -> Option<T> {
        None
    }
}

impl<T> Publisher<T> for Silent {
    fn publish(&mut self, _value: T) {}
}
