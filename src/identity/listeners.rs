//! Fan-out of session-change notifications.
//!
//! Provider implementations own one registry and call [`ListenerRegistry::notify`]
//! whenever the session changes. A listener cancelled from inside another
//! listener's callback is not called for the rest of that round.

use std::cell::RefCell;
use std::rc::Rc;

use super::{Session, SessionCallback, Subscription};

#[cfg(test)]
#[path = "listeners_test.rs"]
mod listeners_test;

type Listener = Rc<dyn Fn(Option<Session>)>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

#[derive(Clone, Default)]
pub struct ListenerRegistry {
    inner: Rc<RefCell<Listeners>>,
}

impl ListenerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, callback: SessionCallback) -> Subscription {
        let id = {
            let mut listeners = self.inner.borrow_mut();
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.entries.push((id, Rc::from(callback)));
            id
        };

        let weak = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().entries.retain(|(entry, _)| *entry != id);
            }
        })
    }

    /// Deliver `session` to every live listener in registration order.
    pub fn notify(&self, session: Option<&Session>) {
        let ids: Vec<u64> = self.inner.borrow().entries.iter().map(|(id, _)| *id).collect();
        for id in ids {
            let listener = self
                .inner
                .borrow()
                .entries
                .iter()
                .find(|(entry, _)| *entry == id)
                .map(|(_, listener)| Rc::clone(listener));
            if let Some(listener) = listener {
                listener(session.cloned());
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
