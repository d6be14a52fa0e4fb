// SPDX-License-Identifier: MPL-2.0
//! Ad-hoc event listeners scoped to one open toast.
//!
//! Listeners are dropped together with the instance they are attached to.

use super::instance::InstanceId;
use std::collections::HashMap;
use std::fmt;

/// Which close operation removed a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClosingActionKind {
    /// One instance (the latest, the latest of a name, or a specific one).
    CloseOne,
    /// Every instance of one name.
    CloseAllOfName,
    /// Every open instance.
    CloseAll,
}

/// What triggered a close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClosingOrigin {
    /// An explicit close call, a back action or an auto-dismiss.
    #[default]
    Default,
    /// The toast itself was clicked away.
    Fling,
    /// The backdrop behind the toasts was clicked.
    Backdrop,
}

/// Delivered to `OnClose` listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosingAction {
    pub kind: ClosingActionKind,
    pub origin: ClosingOrigin,
}

/// A listener callback.
pub enum ToastEventHandler {
    /// Receives the animated value while the toast animates.
    OnAnimate(Box<dyn FnMut(f32)>),
    /// Receives the closing action once the toast is closed.
    OnClose(Box<dyn FnMut(ClosingAction)>),
}

impl ToastEventHandler {
    pub fn on_animate(handler: impl FnMut(f32) + 'static) -> Self {
        Self::OnAnimate(Box::new(handler))
    }

    pub fn on_close(handler: impl FnMut(ClosingAction) + 'static) -> Self {
        Self::OnClose(Box::new(handler))
    }
}

impl fmt::Debug for ToastEventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OnAnimate(_) => f.write_str("OnAnimate(<fn>)"),
            Self::OnClose(_) => f.write_str("OnClose(<fn>)"),
        }
    }
}

/// Handle returned when a listener is added; removes exactly that listener.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListenerHandle {
    instance: InstanceId,
    id: u64,
}

impl ListenerHandle {
    #[must_use]
    pub fn instance(&self) -> &InstanceId {
        &self.instance
    }
}

/// Listeners of every open toast, keyed by instance.
#[derive(Debug, Default)]
pub struct EventListeners {
    next_id: u64,
    by_instance: HashMap<InstanceId, Vec<(u64, ToastEventHandler)>>,
}

impl EventListeners {
    pub fn add(&mut self, instance: &InstanceId, handler: ToastEventHandler) -> ListenerHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.by_instance
            .entry(instance.clone())
            .or_default()
            .push((id, handler));
        ListenerHandle {
            instance: instance.clone(),
            id,
        }
    }

    /// Returns `true` if the listener was registered.
    pub fn remove(&mut self, handle: &ListenerHandle) -> bool {
        let Some(handlers) = self.by_instance.get_mut(&handle.instance) else {
            return false;
        };
        let before = handlers.len();
        handlers.retain(|(id, _)| *id != handle.id);
        let removed = handlers.len() != before;
        if handlers.is_empty() {
            self.by_instance.remove(&handle.instance);
        }
        removed
    }

    pub fn remove_all(&mut self, instance: &InstanceId) {
        self.by_instance.remove(instance);
    }

    pub fn clear(&mut self) {
        self.by_instance.clear();
    }

    #[must_use]
    pub fn count(&self, instance: &InstanceId) -> usize {
        self.by_instance.get(instance).map_or(0, Vec::len)
    }

    pub fn emit_animate(&mut self, instance: &InstanceId, value: f32) {
        if let Some(handlers) = self.by_instance.get_mut(instance) {
            for (_, handler) in handlers.iter_mut() {
                if let ToastEventHandler::OnAnimate(handler) = handler {
                    handler(value);
                }
            }
        }
    }

    pub fn emit_close(&mut self, instance: &InstanceId, action: ClosingAction) {
        if let Some(handlers) = self.by_instance.get_mut(instance) {
            for (_, handler) in handlers.iter_mut() {
                if let ToastEventHandler::OnClose(handler) = handler {
                    handler(action);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn handlers_only_receive_their_event() {
        let mut listeners = EventListeners::default();
        let id = InstanceId::new("Success", 0);
        let animated = Rc::new(RefCell::new(Vec::new()));
        let closed = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&animated);
        listeners.add(&id, ToastEventHandler::on_animate(move |v| sink.borrow_mut().push(v)));
        let sink = Rc::clone(&closed);
        listeners.add(&id, ToastEventHandler::on_close(move |a| sink.borrow_mut().push(a)));

        listeners.emit_animate(&id, 0.5);
        let action = ClosingAction {
            kind: ClosingActionKind::CloseAll,
            origin: ClosingOrigin::Default,
        };
        listeners.emit_close(&id, action);

        assert_eq!(*animated.borrow(), vec![0.5]);
        assert_eq!(*closed.borrow(), vec![action]);
    }

    #[test]
    fn remove_targets_one_listener() {
        let mut listeners = EventListeners::default();
        let id = InstanceId::new("Error", 3);
        let first = listeners.add(&id, ToastEventHandler::on_animate(|_| {}));
        listeners.add(&id, ToastEventHandler::on_animate(|_| {}));

        assert!(listeners.remove(&first));
        assert!(!listeners.remove(&first));
        assert_eq!(listeners.count(&id), 1);

        listeners.remove_all(&id);
        assert_eq!(listeners.count(&id), 0);
    }
}
