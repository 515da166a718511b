//! Event emitters
//!
//! A minimal single-threaded emitter used for component outputs such as the
//! reveal completion notification. Listeners are invoked outside the internal
//! borrow, so a listener may subscribe, unsubscribe or emit again.

use slotmap::{new_key_type, SlotMap};
use std::cell::RefCell;
use std::rc::Rc;

new_key_type! {
    /// Handle returned by [`Emitter::subscribe`]
    pub struct ListenerId;
}

type Listener<T> = Rc<dyn Fn(&T)>;

/// Broadcasts a payload to every registered listener
pub struct Emitter<T = ()> {
    listeners: RefCell<SlotMap<ListenerId, Listener<T>>>,
}

impl<T> Emitter<T> {
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(SlotMap::with_key()),
        }
    }

    /// Register a listener
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&T) + 'static,
    {
        self.listeners.borrow_mut().insert(Rc::new(listener))
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.borrow_mut().remove(id).is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Invoke every listener with the payload
    pub fn emit(&self, payload: &T) {
        let snapshot: Vec<Listener<T>> = self.listeners.borrow().values().cloned().collect();
        for listener in snapshot {
            listener(payload);
        }
    }
}

impl<T> Default for Emitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_emit_reaches_all_listeners() {
        let emitter: Emitter<u32> = Emitter::new();
        let total = Rc::new(Cell::new(0));

        let t1 = total.clone();
        emitter.subscribe(move |v| t1.set(t1.get() + *v));
        let t2 = total.clone();
        emitter.subscribe(move |v| t2.set(t2.get() + *v * 10));

        emitter.emit(&2);
        assert_eq!(total.get(), 22);
    }

    #[test]
    fn test_unsubscribe() {
        let emitter: Emitter = Emitter::new();
        let count = Rc::new(Cell::new(0));

        let c = count.clone();
        let id = emitter.subscribe(move |_| c.set(c.get() + 1));

        emitter.emit(&());
        assert!(emitter.unsubscribe(id));
        assert!(!emitter.unsubscribe(id));
        emitter.emit(&());

        assert_eq!(count.get(), 1);
        assert_eq!(emitter.listener_count(), 0);
    }

    #[test]
    fn test_listener_can_reenter_emitter() {
        let emitter: Rc<Emitter> = Rc::new(Emitter::new());
        let count = Rc::new(Cell::new(0));

        let inner = emitter.clone();
        let c = count.clone();
        emitter.subscribe(move |_| {
            c.set(c.get() + 1);
            // Subscribing from inside a listener must not panic
            inner.subscribe(|_| {});
        });

        emitter.emit(&());
        assert_eq!(count.get(), 1);
        assert_eq!(emitter.listener_count(), 2);
    }
}
