// SPDX-License-Identifier: MPL-2.0
//! Toast components and the props they render with.

use super::events::ListenerHandle;
use super::instance::{InstanceId, ToastInstance};
use super::options::{EffectiveOptions, ToastOptions};
use super::provider::Message;
use iced::Element;
use serde_json::Value;
use std::fmt;
use std::rc::Rc;

type ViewFn<M> = dyn for<'a> Fn(ToastProps<'a, M>) -> Element<'a, M>;

/// A renderable toast: a view function plus optional component-level options.
///
/// Component options take precedence over every other option layer.
pub struct ToastComponent<M> {
    view: Rc<ViewFn<M>>,
    options: Option<ToastOptions>,
}

impl<M> ToastComponent<M> {
    pub fn new(view: impl for<'a> Fn(ToastProps<'a, M>) -> Element<'a, M> + 'static) -> Self {
        Self {
            view: Rc::new(view),
            options: None,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ToastOptions) -> Self {
        self.options = Some(options);
        self
    }

    #[must_use]
    pub fn options(&self) -> Option<&ToastOptions> {
        self.options.as_ref()
    }

    pub fn render<'a>(&self, props: ToastProps<'a, M>) -> Element<'a, M> {
        (self.view)(props)
    }
}

impl<M> Clone for ToastComponent<M> {
    fn clone(&self) -> Self {
        Self {
            view: Rc::clone(&self.view),
            options: self.options.clone(),
        }
    }
}

impl<M> fmt::Debug for ToastComponent<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastComponent")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// What a toast component sees while rendering.
pub struct ToastProps<'a, M> {
    instance: &'a ToastInstance<M>,
    value: f32,
    lift: fn(Message) -> M,
}

impl<M> Clone for ToastProps<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for ToastProps<'_, M> {}

impl<'a, M> ToastProps<'a, M> {
    pub(crate) fn new(instance: &'a ToastInstance<M>, value: f32, lift: fn(Message) -> M) -> Self {
        Self {
            instance,
            value,
            lift,
        }
    }

    /// Message that closes this toast.
    #[must_use]
    pub fn close(&self) -> M {
        (self.lift)(Message::Dismiss(self.instance.id().clone()))
    }

    /// Message that drops one listener of this toast.
    ///
    /// Listeners are registered with
    /// [`ToastProvider::add_listener`](super::provider::ToastProvider::add_listener)
    /// using [`id`](Self::id), since handlers cannot travel inside messages.
    #[must_use]
    pub fn remove_listener(&self, handle: ListenerHandle) -> M {
        (self.lift)(Message::RemoveListener(handle))
    }

    /// Message that drops every listener of this toast.
    #[must_use]
    pub fn remove_listeners(&self) -> M {
        (self.lift)(Message::RemoveListeners(self.instance.id().clone()))
    }

    /// Wraps any toast message into the application's message type.
    #[must_use]
    pub fn message(&self, message: Message) -> M {
        (self.lift)(message)
    }

    #[must_use]
    pub fn id(&self) -> &'a InstanceId {
        self.instance.id()
    }

    #[must_use]
    pub fn name(&self) -> &'a str {
        self.instance.name()
    }

    #[must_use]
    pub fn params(&self) -> Option<&'a Value> {
        self.instance.params()
    }

    /// Looks up one parameter, falling back to `default`.
    #[must_use]
    pub fn get_param(&self, key: &str, default: Option<Value>) -> Option<Value> {
        self.instance.get_param(key, default)
    }

    #[must_use]
    pub fn options(&self) -> &'a EffectiveOptions {
        self.instance.options()
    }

    /// Current animated value, `0.0` hidden to `1.0` fully shown.
    #[must_use]
    pub fn animated_value(&self) -> f32 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::toasts::events::ToastEventHandler;
    use crate::ui::toasts::registry::Registry;
    use crate::ui::toasts::state::ToastStore;
    use iced::widget::text;
    use std::convert::identity;

    fn store() -> ToastStore<Message> {
        let registry = Registry::builder()
            .toast("Info", ToastComponent::new(|props| text(props.name()).into()))
            .build()
            .expect("valid registry");
        ToastStore::with_registry(registry)
    }

    #[test]
    fn props_build_messages_scoped_to_their_toast() {
        let mut store = store();
        let id = store.open("Info", None, None).expect("open");
        let handle = store
            .add_listener(&id, ToastEventHandler::on_animate(|_| {}))
            .expect("open instance");
        let instance = store.state().instance(&id).expect("open instance");
        let props = ToastProps::new(instance, 0.5, identity);

        assert_eq!(props.close(), Message::Dismiss(id.clone()));
        assert_eq!(props.remove_listeners(), Message::RemoveListeners(id.clone()));
        assert_eq!(props.remove_listener(handle.clone()), Message::RemoveListener(handle));
        assert_eq!(props.animated_value(), 0.5);
    }
}
