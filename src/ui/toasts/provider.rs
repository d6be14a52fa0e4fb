// SPDX-License-Identifier: MPL-2.0
//! Toast provider: the store, the overlay and their iced plumbing.
//!
//! An application owns one [`ToastProvider`], routes [`Message`]s to
//! [`ToastProvider::update`], layers [`ToastProvider::view`] over its own
//! content and merges [`ToastProvider::subscription`] into its own.
//!
//! ```ignore
//! fn subscription(app: &App) -> Subscription<AppMessage> {
//!     app.toasts.subscription().map(AppMessage::Toast)
//! }
//! ```

use super::events::{ClosingActionKind, ClosingOrigin, ListenerHandle, ToastEventHandler};
use super::instance::{Callback, InstanceId};
use super::overlay::Overlay;
use super::registry::Registry;
use super::state::{CloseTarget, OpenRequest, StackState, StateUpdate, ToastStore};
use crate::config::defaults::TICK_INTERVAL;
use crate::error::Result;
use iced::{event, keyboard, time, Element, Event, Subscription};
use serde_json::Value;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Instant;
use tracing::{trace, warn};

/// Messages handled by the provider.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Open a registered toast.
    Open { name: String, params: Option<Value> },
    /// Queue a close of the latest toast or the latest of a name. Closing an
    /// instance is immediate.
    Close(CloseTarget),
    /// Queue a close of every toast with this name.
    CloseAllOfName(String),
    /// Queue a close of every toast.
    CloseAll,
    /// Close one toast now, e.g. from its dismiss button.
    Dismiss(InstanceId),
    /// The toast was flung away by the user.
    Fling(InstanceId),
    /// Drop one listener registered with [`ToastProvider::add_listener`].
    RemoveListener(ListenerHandle),
    /// Drop every listener of one toast.
    RemoveListeners(InstanceId),
    /// The backdrop behind the current toast was pressed.
    BackdropPressed,
    /// Escape was pressed while a toast was open.
    BackPressed,
    /// Animation and auto-dismiss clock.
    Tick(Instant),
}

type Mailbox<M> = Rc<RefCell<Vec<(Instant, Rc<StackState<M>>)>>>;

/// Owns the toast store and renders its open toasts.
pub struct ToastProvider<M> {
    store: ToastStore<M>,
    overlay: Overlay<M>,
    mailbox: Mailbox<M>,
    lift: fn(Message) -> M,
}

impl<M: Clone + 'static> ToastProvider<M> {
    /// Initializes a store with `registry`, then subscribes the overlay to it.
    ///
    /// `lift` wraps toast messages into the application's message type.
    #[must_use]
    pub fn new(registry: Registry<M>, lift: fn(Message) -> M) -> Self {
        let mut store = ToastStore::new();
        store.init(registry);

        let mailbox: Mailbox<M> = Rc::default();
        let inbox = Rc::clone(&mailbox);
        store.subscribe(move |update| {
            if let StateUpdate::Changed(state) = update {
                inbox.borrow_mut().push((Instant::now(), Rc::clone(state)));
            }
            Ok(())
        });

        let mut overlay = Overlay::new(Instant::now());
        overlay.reconcile(store.state(), Instant::now());

        Self {
            store,
            overlay,
            mailbox,
            lift,
        }
    }

    // ----------------------------------------------------------------------
    // Context accessor
    // ----------------------------------------------------------------------

    pub fn open_toast(&mut self, name: &str, params: Option<Value>) -> Result<InstanceId> {
        let id = self.store.open(name, params, None)?;
        self.sync();
        Ok(id)
    }

    pub fn open_with(&mut self, request: OpenRequest) -> Result<InstanceId> {
        let id = self.store.open_with(request)?;
        self.sync();
        Ok(id)
    }

    /// Closes `target` on the next tick; an instance target closes now.
    /// Latest and name targets are looked up when the tick runs. `callback`
    /// runs once the close has been applied.
    pub fn close_toast(&mut self, target: CloseTarget, callback: Option<Callback>) -> Result<()> {
        match target {
            CloseTarget::Latest => {
                self.store
                    .queue_close_request(ClosingActionKind::CloseOne, None, callback)?;
            }
            CloseTarget::Name(name) => {
                self.store
                    .queue_close_request(ClosingActionKind::CloseOne, Some(&name), callback)?;
            }
            CloseTarget::Instance(id) => {
                self.store.close_instance(&id);
                if let Some(callback) = callback {
                    callback();
                }
            }
        }
        self.sync();
        Ok(())
    }

    /// Closes every toast named `name` on the next tick.
    pub fn close_toasts(&mut self, name: &str, callback: Option<Callback>) -> Result<()> {
        self.store
            .queue_close_request(ClosingActionKind::CloseAllOfName, Some(name), callback)?;
        Ok(())
    }

    /// Closes every toast on the next tick.
    pub fn close_all_toasts(&mut self, callback: Option<Callback>) -> Result<()> {
        self.store
            .queue_close_request(ClosingActionKind::CloseAll, None, callback)?;
        Ok(())
    }

    /// Name of the most recently opened toast that is still open.
    #[must_use]
    pub fn current_toast(&self) -> Option<&str> {
        self.store.current()
    }

    #[must_use]
    pub fn get_param(&self, id: &InstanceId, key: &str, default: Option<Value>) -> Option<Value> {
        self.store.get_param(id, key, default)
    }

    /// Applies the current toast's back behavior; see
    /// [`ToastStore::handle_back_press`].
    pub fn handle_back_press(&mut self) -> bool {
        self.store.handle_back_press()
    }

    pub fn add_listener(
        &mut self,
        id: &InstanceId,
        handler: ToastEventHandler,
    ) -> Option<ListenerHandle> {
        self.store.add_listener(id, handler)
    }

    pub fn remove_listener(&mut self, handle: &ListenerHandle) -> bool {
        self.store.remove_listener(handle)
    }

    pub fn remove_all_listeners(&mut self, id: &InstanceId) {
        self.store.remove_all_listeners(id);
    }

    #[must_use]
    pub fn store(&self) -> &ToastStore<M> {
        &self.store
    }

    /// Direct store access. The overlay catches up on the next update.
    pub fn store_mut(&mut self) -> &mut ToastStore<M> {
        &mut self.store
    }

    #[must_use]
    pub fn overlay(&self) -> &Overlay<M> {
        &self.overlay
    }

    // ----------------------------------------------------------------------
    // iced plumbing
    // ----------------------------------------------------------------------

    pub fn update(&mut self, message: Message) {
        let result = match message {
            Message::Open { name, params } => self.open_toast(&name, params).map(|_| ()),
            Message::Close(target) => self.close_toast(target, None),
            Message::CloseAllOfName(name) => self.close_toasts(&name, None),
            Message::CloseAll => self.close_all_toasts(None),
            Message::Dismiss(id) => {
                self.store.close_instance(&id);
                Ok(())
            }
            Message::Fling(id) => {
                self.store.close_instance_from(&id, ClosingOrigin::Fling);
                Ok(())
            }
            Message::RemoveListener(handle) => {
                self.store.remove_listener(&handle);
                Ok(())
            }
            Message::RemoveListeners(id) => {
                self.store.remove_all_listeners(&id);
                Ok(())
            }
            Message::BackdropPressed => {
                self.store.handle_back_press_from(ClosingOrigin::Backdrop);
                Ok(())
            }
            Message::BackPressed => {
                self.store.handle_back_press();
                Ok(())
            }
            Message::Tick(now) => self.tick(now),
        };
        if let Err(error) = result {
            warn!(%error, "toast message failed");
        }
        self.sync();
    }

    fn tick(&mut self, now: Instant) -> Result<()> {
        self.sync();
        let closed = self.store.run_closing_actions()?;
        self.sync();

        for id in self.overlay.advance(now) {
            self.store.close_instance(&id);
        }
        self.sync();

        let animating = self.overlay.animating();
        for (id, value) in &animating {
            self.store.emit_animate(id, *value);
        }
        trace!(closed, animating = animating.len(), "toast tick");
        Ok(())
    }

    /// Feeds published states to the overlay, in publication order.
    fn sync(&mut self) {
        let published: Vec<_> = self.mailbox.borrow_mut().drain(..).collect();
        for (at, state) in published {
            self.overlay.reconcile(&state, at);
        }
    }

    /// Whether the clock must keep running: a toast is animating, exiting or
    /// waiting to dismiss itself, or a change has not been applied yet.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.overlay.needs_tick()
            || !self.store.state().pending_actions().is_empty()
            || !self.mailbox.borrow().is_empty()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let clock = if self.is_active() {
            time::every(TICK_INTERVAL).map(Message::Tick)
        } else {
            Subscription::none()
        };
        let back = if self.store.state().open_count() > 0 {
            event::listen_with(back_key)
        } else {
            Subscription::none()
        };
        Subscription::batch([clock, back])
    }

    pub fn view(&self) -> Element<'_, M> {
        self.overlay.view(self.store.state(), self.lift)
    }
}

fn back_key(event: Event, _status: event::Status, _window: iced::window::Id) -> Option<Message> {
    match event {
        Event::Keyboard(keyboard::Event::KeyPressed {
            key: keyboard::Key::Named(keyboard::key::Named::Escape),
            ..
        }) => Some(Message::BackPressed),
        _ => None,
    }
}

impl<M> fmt::Debug for ToastProvider<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastProvider")
            .field("store", &self.store)
            .field("mounted", &self.overlay.mounted_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::toasts::animation::{AnimationConfig, Easing};
    use crate::ui::toasts::component::ToastComponent;
    use crate::ui::toasts::events::ClosingAction;
    use crate::ui::toasts::options::{BackBehavior, ToastOptions};
    use iced::widget::text;
    use iced::Color;
    use std::cell::Cell;
    use std::time::Duration;

    #[derive(Debug, Clone)]
    enum AppMessage {
        Toast(Message),
    }

    fn component() -> ToastComponent<AppMessage> {
        ToastComponent::new(|props| text(props.name()).into())
    }

    fn provider() -> ToastProvider<AppMessage> {
        let registry = Registry::builder()
            .toast("Info", component())
            .toast_with_options(
                "Sticky",
                component(),
                ToastOptions::new()
                    .with_duration(Duration::ZERO)
                    .with_back_behavior(BackBehavior::None),
            )
            .toast_with_options(
                "Modal",
                component(),
                ToastOptions::new()
                    .with_duration(Duration::ZERO)
                    .with_backdrop(Color::BLACK, 0.5),
            )
            .build()
            .expect("valid registry");
        ToastProvider::new(registry, AppMessage::Toast)
    }

    #[test]
    fn opening_mounts_the_toast() {
        let mut provider = provider();
        let id = provider.open_toast("Info", None).expect("open");

        assert_eq!(provider.current_toast(), Some("Info"));
        assert_eq!(provider.overlay().mounted_count(), 1);
        assert_eq!(provider.overlay().value_of(&id), Some(0.0));
        assert!(provider.is_active());
    }

    #[test]
    fn unknown_names_are_logged_not_opened() {
        let mut provider = provider();
        provider.update(Message::Open {
            name: "Nope".into(),
            params: None,
        });
        assert_eq!(provider.current_toast(), None);
        assert!(!provider.is_active());
    }

    #[test]
    fn close_by_name_waits_for_the_next_tick() {
        let mut provider = provider();
        provider.open_toast("Sticky", None).expect("open");

        provider.update(Message::Close(CloseTarget::Name("Sticky".into())));
        assert_eq!(provider.current_toast(), Some("Sticky"));
        assert_eq!(provider.store().state().pending_actions().len(), 1);

        provider.update(Message::Tick(Instant::now()));
        assert_eq!(provider.current_toast(), None);
        assert!(provider.store().state().pending_actions().is_empty());
    }

    #[test]
    fn close_callback_runs_after_the_close() {
        let mut provider = provider();
        provider.open_toast("Sticky", None).expect("open");
        let called = Rc::new(Cell::new(false));
        let flag = Rc::clone(&called);

        provider
            .close_all_toasts(Some(Rc::new(move || flag.set(true))))
            .expect("queue");
        assert!(!called.get());

        provider.update(Message::Tick(Instant::now()));
        assert!(called.get());
        assert_eq!(provider.store().state().open_count(), 0);
    }

    #[test]
    fn close_by_name_finds_an_older_toast_if_the_latest_is_gone() {
        let mut provider = provider();
        let older = provider.open_toast("Sticky", None).expect("open");
        let newer = provider.open_toast("Sticky", None).expect("open");

        provider.update(Message::Close(CloseTarget::Name("Sticky".into())));
        provider.update(Message::Dismiss(newer.clone()));
        provider.update(Message::Tick(Instant::now()));

        assert!(!provider.store().state().is_open(&newer));
        assert!(!provider.store().state().is_open(&older));
        assert_eq!(provider.current_toast(), None);
    }

    #[test]
    fn dismiss_closes_immediately() {
        let mut provider = provider();
        let id = provider.open_toast("Sticky", None).expect("open");

        provider.update(Message::Dismiss(id.clone()));
        assert_eq!(provider.current_toast(), None);
        assert!(provider.overlay().is_exiting(&id));
    }

    #[test]
    fn toasts_dismiss_themselves_after_their_duration() {
        let mut provider = provider();
        let id = provider
            .open_with(OpenRequest::new("Info").options(
                ToastOptions::new().with_duration(Duration::from_millis(50)),
            ))
            .expect("open");

        provider.update(Message::Tick(Instant::now()));
        assert!(provider.store().state().is_open(&id));

        provider.update(Message::Tick(Instant::now() + Duration::from_millis(60)));
        assert!(!provider.store().state().is_open(&id));
        assert!(provider.overlay().is_exiting(&id));
    }

    #[test]
    fn closed_toasts_detach_after_the_exit_window() {
        let mut provider = provider();
        let id = provider.open_toast("Sticky", None).expect("open");
        provider.update(Message::Dismiss(id.clone()));

        let later = Instant::now() + Duration::from_secs(1);
        provider.update(Message::Tick(later));
        assert_eq!(provider.overlay().mounted_count(), 0);
        assert!(!provider.is_active());
    }

    #[test]
    fn idle_toasts_without_a_duration_stop_the_clock() {
        let mut provider = provider();
        let id = provider.open_toast("Sticky", None).expect("open");
        assert!(provider.is_active());

        provider.update(Message::Tick(Instant::now() + Duration::from_secs(1)));
        assert!(provider.store().state().is_open(&id));
        assert!(!provider.is_active());

        provider.update(Message::Close(CloseTarget::Latest));
        assert!(provider.is_active());
    }

    #[test]
    fn listeners_can_be_removed_through_messages() {
        let mut provider = provider();
        let id = provider.open_toast("Sticky", None).expect("open");
        let closes = Rc::new(Cell::new(0));
        let first = Rc::clone(&closes);
        let second = Rc::clone(&closes);
        let handle = provider
            .add_listener(
                &id,
                ToastEventHandler::on_close(move |_| first.set(first.get() + 1)),
            )
            .expect("open instance");
        provider
            .add_listener(
                &id,
                ToastEventHandler::on_close(move |_| second.set(second.get() + 10)),
            )
            .expect("open instance");

        provider.update(Message::RemoveListener(handle));
        provider.update(Message::Dismiss(id));
        assert_eq!(closes.get(), 10);

        let other = provider.open_toast("Sticky", None).expect("open");
        let third = Rc::clone(&closes);
        provider
            .add_listener(
                &other,
                ToastEventHandler::on_close(move |_| third.set(third.get() + 100)),
            )
            .expect("open instance");
        provider.update(Message::RemoveListeners(other.clone()));
        provider.update(Message::Dismiss(other));
        assert_eq!(closes.get(), 10);
    }

    #[test]
    fn fling_reports_its_origin() {
        let mut provider = provider();
        let id = provider.open_toast("Sticky", None).expect("open");
        let seen = Rc::new(Cell::new(None));
        let sink = Rc::clone(&seen);
        provider
            .add_listener(
                &id,
                ToastEventHandler::on_close(move |action| sink.set(Some(action))),
            )
            .expect("open instance");

        provider.update(Message::Fling(id));
        assert_eq!(
            seen.get(),
            Some(ClosingAction {
                kind: ClosingActionKind::CloseOne,
                origin: ClosingOrigin::Fling,
            })
        );
    }

    #[test]
    fn backdrop_press_applies_the_back_behavior() {
        let mut provider = provider();
        let id = provider.open_toast("Modal", None).expect("open");
        let seen = Rc::new(Cell::new(None));
        let sink = Rc::clone(&seen);
        provider.add_listener(
            &id,
            ToastEventHandler::on_close(move |action: ClosingAction| sink.set(Some(action.origin))),
        );

        provider.update(Message::BackdropPressed);
        provider.update(Message::Tick(Instant::now()));
        assert_eq!(seen.get(), Some(ClosingOrigin::Backdrop));
        assert_eq!(provider.current_toast(), None);
    }

    #[test]
    fn back_press_respects_none_behavior() {
        let mut provider = provider();
        provider.open_toast("Sticky", None).expect("open");

        provider.update(Message::BackPressed);
        provider.update(Message::Tick(Instant::now()));
        assert_eq!(provider.current_toast(), Some("Sticky"));
    }

    #[test]
    fn animate_listeners_see_entrance_progress() {
        let mut provider = provider();
        let id = provider
            .open_with(OpenRequest::new("Sticky").options(
                ToastOptions::new().with_animate_in_config(AnimationConfig::new(
                    Duration::from_millis(100),
                    Easing::EaseOut,
                )),
            ))
            .expect("open");
        let last = Rc::new(Cell::new(-1.0_f32));
        let sink = Rc::clone(&last);
        provider.add_listener(&id, ToastEventHandler::on_animate(move |value| sink.set(value)));

        provider.update(Message::Tick(Instant::now() + Duration::from_millis(50)));
        let value = last.get();
        assert!(value > 0.0 && value < 1.0, "value was {value}");
    }

    #[test]
    fn view_renders_without_toasts() {
        let provider = provider();
        let _element = provider.view();
        assert!(!provider.is_active());
    }
}
