// SPDX-License-Identifier: MPL-2.0
//! Toast state store.
//!
//! The store owns the set of open toasts and notifies subscribers
//! synchronously after every mutation. Each mutation replaces the shared
//! [`StackState`] snapshot with a fresh one, so subscribers can compare
//! snapshots by pointer.
//!
//! A closed toast leaves the state as soon as the close call returns; exit
//! animations are the overlay's business.

use super::events::{
    ClosingAction, ClosingActionKind, ClosingOrigin, EventListeners, ListenerHandle,
    ToastEventHandler,
};
use super::instance::{Callback, InstanceId, ToastInstance};
use super::options::{resolve, BackBehavior, OptionLayers, ToastOptions};
use super::registry::Registry;
use crate::error::{Error, Result};
use serde_json::Value;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, warn};

/// Snapshot of the store.
pub struct StackState<M> {
    registry: Option<Rc<Registry<M>>>,
    current: Option<String>,
    open: Vec<Rc<ToastInstance<M>>>,
    pending: Vec<Rc<PendingClosingAction>>,
}

impl<M> StackState<M> {
    fn uninitialized() -> Self {
        Self {
            registry: None,
            current: None,
            open: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Whether a registry has been installed with [`ToastStore::init`].
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.registry.is_some()
    }

    #[must_use]
    pub fn registry(&self) -> Option<&Registry<M>> {
        self.registry.as_deref()
    }

    /// Registered names; empty before initialization.
    #[must_use]
    pub fn names(&self) -> &[String] {
        match self.registry.as_deref() {
            Some(registry) => registry.names(),
            None => &[],
        }
    }

    /// Name of the most recently opened toast that is still open.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Open toasts in the order they were opened.
    #[must_use]
    pub fn open_instances(&self) -> &[Rc<ToastInstance<M>>] {
        &self.open
    }

    #[must_use]
    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&Rc<ToastInstance<M>>> {
        self.open.last()
    }

    #[must_use]
    pub fn instance(&self, id: &InstanceId) -> Option<&Rc<ToastInstance<M>>> {
        self.open.iter().find(|instance| instance.id() == id)
    }

    #[must_use]
    pub fn is_open(&self, id: &InstanceId) -> bool {
        self.instance(id).is_some()
    }

    /// Closing actions waiting to be run, oldest first.
    #[must_use]
    pub fn pending_actions(&self) -> &[Rc<PendingClosingAction>] {
        &self.pending
    }

    fn with_open(&self, open: Vec<Rc<ToastInstance<M>>>) -> Self {
        Self {
            registry: self.registry.clone(),
            current: open.last().map(|instance| instance.name().to_string()),
            open,
            pending: self.pending.clone(),
        }
    }

    fn with_pending(&self, pending: Vec<Rc<PendingClosingAction>>) -> Self {
        Self {
            registry: self.registry.clone(),
            current: self.current.clone(),
            open: self.open.clone(),
            pending,
        }
    }

    fn require(&self, name: &str) -> Result<&Registry<M>> {
        match self.registry.as_deref() {
            Some(registry) => registry.require(name).map(|_| registry),
            None => Err(Error::UnknownName {
                name: name.to_string(),
                valid: Vec::new(),
            }),
        }
    }
}

impl<M> fmt::Debug for StackState<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackState")
            .field("names", &self.names())
            .field("current", &self.current)
            .field("open", &self.open)
            .field("pending", &self.pending)
            .finish()
    }
}

/// A close request queued for deferred execution.
pub struct PendingClosingAction {
    id: String,
    kind: ClosingActionKind,
    target_name: Option<String>,
    origin_instance: Option<InstanceId>,
    /// Whether the action closes exactly `origin_instance`.
    targets_origin: bool,
    origin: ClosingOrigin,
    callback: Option<Callback>,
}

impl PendingClosingAction {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn kind(&self) -> ClosingActionKind {
        self.kind
    }

    #[must_use]
    pub fn target_name(&self) -> Option<&str> {
        self.target_name.as_deref()
    }

    /// The toast that was current when the action was queued.
    #[must_use]
    pub fn origin_instance(&self) -> Option<&InstanceId> {
        self.origin_instance.as_ref()
    }

    #[must_use]
    pub fn origin(&self) -> ClosingOrigin {
        self.origin
    }
}

impl fmt::Debug for PendingClosingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingClosingAction")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("target_name", &self.target_name)
            .field("origin_instance", &self.origin_instance)
            .field("origin", &self.origin)
            .field("callback", &self.callback.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Arguments of [`ToastStore::open_with`].
#[derive(Default)]
pub struct OpenRequest {
    pub name: String,
    pub params: Option<Value>,
    /// Per-call option layer, below component options and above entry options.
    pub options: Option<ToastOptions>,
    /// Runs once when the opened instance closes.
    pub callback: Option<Callback>,
}

impl OpenRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    #[must_use]
    pub fn options(mut self, options: ToastOptions) -> Self {
        self.options = Some(options);
        self
    }

    #[must_use]
    pub fn on_close(mut self, callback: impl Fn() + 'static) -> Self {
        self.callback = Some(Rc::new(callback));
        self
    }
}

/// What a state listener is handed.
pub enum StateUpdate<'a, M> {
    /// The post-mutation snapshot.
    Changed(&'a Rc<StackState<M>>),
    /// The listener failed on the previous delivery.
    Failed(&'a Error),
}

/// Listener invoked after mutations. Returning an error marks the
/// subscription as errored and re-invokes the listener with
/// [`StateUpdate::Failed`].
pub type StateListener<M> = Box<dyn FnMut(StateUpdate<'_, M>) -> Result<()>>;

/// Decides whether two snapshots are equal; listeners are skipped when true.
pub type EqualityFn<M> = Box<dyn Fn(&Rc<StackState<M>>, &Rc<StackState<M>>) -> bool>;

/// Handle returned by [`ToastStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscriber<M> {
    id: SubscriptionId,
    seen: Rc<StackState<M>>,
    equality: EqualityFn<M>,
    listener: StateListener<M>,
    errored: bool,
}

impl<M> Subscriber<M> {
    fn notify(&mut self, state: &Rc<StackState<M>>) {
        if (self.equality)(&self.seen, state) {
            return;
        }
        self.seen = Rc::clone(state);
        if let Err(err) = (self.listener)(StateUpdate::Changed(state)) {
            self.errored = true;
            let error = Error::Subscriber(err.to_string());
            warn!(subscription = self.id.0, %error, "toast state listener failed");
            // The error delivery itself may fail too; there is nobody left to tell.
            let _ = (self.listener)(StateUpdate::Failed(&error));
        }
    }
}

/// Which open toast [`ToastStore::close`] targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseTarget {
    /// The most recently opened toast.
    Latest,
    /// The most recently opened toast with this name.
    Name(String),
    /// Exactly this instance.
    Instance(InstanceId),
}

/// Owner of the toast state.
pub struct ToastStore<M> {
    state: Rc<StackState<M>>,
    subscribers: Vec<Subscriber<M>>,
    listeners: EventListeners,
    next_subscription: u64,
    next_instance: u64,
    next_action: u64,
}

impl<M> Default for ToastStore<M> {
    fn default() -> Self {
        Self {
            state: Rc::new(StackState::uninitialized()),
            subscribers: Vec::new(),
            listeners: EventListeners::default(),
            next_subscription: 0,
            next_instance: 0,
            next_action: 0,
        }
    }
}

impl<M> ToastStore<M> {
    /// Creates an uninitialized store; every name is unknown until [`init`].
    ///
    /// [`init`]: ToastStore::init
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already initialized with `registry`.
    #[must_use]
    pub fn with_registry(registry: Registry<M>) -> Self {
        let mut store = Self::new();
        store.init(registry);
        store
    }

    /// Replaces the whole state with an empty one built on `registry`.
    ///
    /// Nobody is notified; subscribe afterwards.
    pub fn init(&mut self, registry: Registry<M>) {
        self.listeners.clear();
        self.state = Rc::new(StackState {
            registry: Some(Rc::new(registry)),
            current: None,
            open: Vec::new(),
            pending: Vec::new(),
        });
    }

    /// The current snapshot.
    #[must_use]
    pub fn state(&self) -> &Rc<StackState<M>> {
        &self.state
    }

    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.state.current()
    }

    fn set_state(&mut self, next: StackState<M>) {
        self.state = Rc::new(next);
        let state = Rc::clone(&self.state);
        for subscriber in &mut self.subscribers {
            subscriber.notify(&state);
        }
    }

    // ----------------------------------------------------------------------
    // Subscriptions
    // ----------------------------------------------------------------------

    /// Subscribes with pointer equality, which fires on every mutation.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(StateUpdate<'_, M>) -> Result<()> + 'static,
    ) -> SubscriptionId {
        self.subscribe_with(listener, |old, new| Rc::ptr_eq(old, new))
    }

    pub fn subscribe_with(
        &mut self,
        listener: impl FnMut(StateUpdate<'_, M>) -> Result<()> + 'static,
        equality: impl Fn(&Rc<StackState<M>>, &Rc<StackState<M>>) -> bool + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push(Subscriber {
            id,
            seen: Rc::clone(&self.state),
            equality: Box::new(equality),
            listener: Box::new(listener),
            errored: false,
        });
        id
    }

    /// Returns `true` if the subscription existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|subscriber| subscriber.id != id);
        self.subscribers.len() != before
    }

    /// Whether the subscription's listener has failed at least once.
    #[must_use]
    pub fn is_errored(&self, id: SubscriptionId) -> bool {
        self.subscribers
            .iter()
            .any(|subscriber| subscriber.id == id && subscriber.errored)
    }

    // ----------------------------------------------------------------------
    // Opening
    // ----------------------------------------------------------------------

    /// Opens a toast. Fails with [`Error::UnknownName`] for unregistered names.
    pub fn open(
        &mut self,
        name: &str,
        params: Option<Value>,
        callback: Option<Callback>,
    ) -> Result<InstanceId> {
        self.open_with(OpenRequest {
            name: name.to_string(),
            params,
            options: None,
            callback,
        })
    }

    pub fn open_with(&mut self, request: OpenRequest) -> Result<InstanceId> {
        let OpenRequest {
            name,
            params,
            options,
            callback,
        } = request;

        let registry = self.state.require(&name)?;
        let definition = registry.require(&name)?;

        let effective = resolve(&OptionLayers {
            component: definition.component().options(),
            call: options.as_ref(),
            entry: definition.options(),
            defaults: Some(registry.default_options()),
        });
        let id = InstanceId::new(&name, self.next_instance);
        self.next_instance += 1;

        let instance = Rc::new(ToastInstance::new(
            id.clone(),
            name,
            definition.component().clone(),
            effective,
            params,
            callback,
        ));
        debug!(toast = %id, "opening toast");

        let mut open = self.state.open.clone();
        open.push(instance);
        let next = self.state.with_open(open);
        self.set_state(next);
        Ok(id)
    }

    // ----------------------------------------------------------------------
    // Closing
    // ----------------------------------------------------------------------

    /// Closes `target`. Returns the closed instance, if any.
    pub fn close(&mut self, target: CloseTarget) -> Result<Option<InstanceId>> {
        match target {
            CloseTarget::Latest => Ok(self.close_latest()),
            CloseTarget::Name(name) => self.close_by_name(&name),
            CloseTarget::Instance(id) => Ok(self.close_instance(&id).then_some(id)),
        }
    }

    /// Closes the most recently opened toast, whatever its name.
    pub fn close_latest(&mut self) -> Option<InstanceId> {
        let id = self.state.latest()?.id().clone();
        self.close_instance(&id).then_some(id)
    }

    /// Closes the most recently opened toast named `name`.
    ///
    /// Closing a registered name with nothing open only logs a warning.
    pub fn close_by_name(&mut self, name: &str) -> Result<Option<InstanceId>> {
        self.state.require(name)?;
        let latest = self
            .state
            .open
            .iter()
            .rev()
            .find(|instance| instance.name() == name)
            .map(|instance| instance.id().clone());

        match latest {
            Some(id) => Ok(self.close_instance(&id).then_some(id)),
            None => {
                warn!(toast = name, "there was no opened {name} toast");
                Ok(None)
            }
        }
    }

    /// Closes exactly `id`. Returns `false` when it is not open.
    pub fn close_instance(&mut self, id: &InstanceId) -> bool {
        self.close_instance_from(id, ClosingOrigin::Default)
    }

    pub(crate) fn close_instance_from(&mut self, id: &InstanceId, origin: ClosingOrigin) -> bool {
        if !self.state.is_open(id) {
            return false;
        }
        self.remove_where(
            |instance| instance.id() == id,
            ClosingAction {
                kind: ClosingActionKind::CloseOne,
                origin,
            },
        );
        true
    }

    /// Closes every open toast named `name`. Returns whether any was open.
    pub fn close_all_of_name(&mut self, name: &str) -> Result<bool> {
        self.close_all_of_name_from(name, ClosingOrigin::Default)
    }

    fn close_all_of_name_from(&mut self, name: &str, origin: ClosingOrigin) -> Result<bool> {
        self.state.require(name)?;
        let removed = self.remove_where(
            |instance| instance.name() == name,
            ClosingAction {
                kind: ClosingActionKind::CloseAllOfName,
                origin,
            },
        );
        Ok(removed > 0)
    }

    /// Closes every open toast. Returns how many were open.
    pub fn close_all(&mut self) -> usize {
        self.close_all_from(ClosingOrigin::Default)
    }

    fn close_all_from(&mut self, origin: ClosingOrigin) -> usize {
        self.remove_where(
            |_| true,
            ClosingAction {
                kind: ClosingActionKind::CloseAll,
                origin,
            },
        )
    }

    /// Removes the matching instances, publishes the new state, then runs
    /// `OnClose` listeners and close callbacks of the removed instances.
    fn remove_where(
        &mut self,
        matches: impl Fn(&ToastInstance<M>) -> bool,
        action: ClosingAction,
    ) -> usize {
        let (removed, kept): (Vec<_>, Vec<_>) = self
            .state
            .open
            .iter()
            .cloned()
            .partition(|instance| matches(instance.as_ref()));
        if removed.is_empty() {
            return 0;
        }

        let next = self.state.with_open(kept);
        self.set_state(next);

        for instance in &removed {
            debug!(toast = %instance.id(), ?action, "closed toast");
            self.listeners.emit_close(instance.id(), action);
            self.listeners.remove_all(instance.id());
            if let Some(callback) = instance.on_close() {
                callback();
            }
        }
        removed.len()
    }

    // ----------------------------------------------------------------------
    // Queries
    // ----------------------------------------------------------------------

    /// Looks up a parameter of an open toast; never fails.
    #[must_use]
    pub fn get_param(&self, id: &InstanceId, key: &str, default: Option<Value>) -> Option<Value> {
        match self.state.instance(id) {
            Some(instance) => instance.get_param(key, default),
            None => default,
        }
    }

    // ----------------------------------------------------------------------
    // Deferred closing
    // ----------------------------------------------------------------------

    /// Queues a close request to be run later with
    /// [`run_closing_action`](Self::run_closing_action).
    ///
    /// `name` is validated whenever it is given and the kind is not
    /// [`ClosingActionKind::CloseAll`]; `CloseAllOfName` requires one.
    pub fn queue_closing_action(
        &mut self,
        kind: ClosingActionKind,
        name: Option<&str>,
        callback: Option<Callback>,
    ) -> Result<Rc<PendingClosingAction>> {
        self.queue_closing_action_from(kind, name, callback, ClosingOrigin::Default, true)
    }

    /// Queues a close request whose target is looked up when it runs.
    ///
    /// A `CloseOne` without a name closes whatever toast is latest at run
    /// time; with a name, the latest open toast of that name.
    pub fn queue_close_request(
        &mut self,
        kind: ClosingActionKind,
        name: Option<&str>,
        callback: Option<Callback>,
    ) -> Result<Rc<PendingClosingAction>> {
        self.queue_closing_action_from(kind, name, callback, ClosingOrigin::Default, false)
    }

    fn queue_closing_action_from(
        &mut self,
        kind: ClosingActionKind,
        name: Option<&str>,
        callback: Option<Callback>,
        origin: ClosingOrigin,
        pin_origin: bool,
    ) -> Result<Rc<PendingClosingAction>> {
        let target_name = match (kind, name) {
            (ClosingActionKind::CloseAll, _) => None,
            (ClosingActionKind::CloseAllOfName, None) => {
                return Err(Error::UnknownName {
                    name: String::new(),
                    valid: self.state.names().to_vec(),
                });
            }
            (_, Some(name)) => {
                self.state.require(name)?;
                Some(name.to_string())
            }
            (ClosingActionKind::CloseOne, None) => None,
        };

        let label = match (&target_name, kind) {
            (Some(name), ClosingActionKind::CloseOne) => format!("{name}_close"),
            (Some(name), _) => format!("{name}_close_all_of_name"),
            (None, ClosingActionKind::CloseAll) => "close_all".to_string(),
            (None, _) => "close".to_string(),
        };
        let latest = self.state.latest();
        let targets_origin = pin_origin
            && kind == ClosingActionKind::CloseOne
            && latest.is_some_and(|instance| {
                target_name
                    .as_deref()
                    .is_none_or(|name| instance.name() == name)
            });
        let action = Rc::new(PendingClosingAction {
            id: format!("{label}_{:x}", self.next_action),
            kind,
            target_name,
            origin_instance: latest.map(|instance| instance.id().clone()),
            targets_origin,
            origin,
            callback,
        });
        self.next_action += 1;
        debug!(action = action.id(), "queued closing action");

        let mut pending = self.state.pending.clone();
        pending.push(Rc::clone(&action));
        let next = self.state.with_pending(pending);
        self.set_state(next);
        Ok(action)
    }

    /// Removes a queued action. Returns `false` if it was not queued.
    pub fn remove_closing_action(&mut self, action: &PendingClosingAction) -> bool {
        let pending: Vec<_> = self
            .state
            .pending
            .iter()
            .filter(|queued| queued.id != action.id)
            .cloned()
            .collect();
        if pending.len() == self.state.pending.len() {
            return false;
        }
        let next = self.state.with_pending(pending);
        self.set_state(next);
        true
    }

    /// Runs and dequeues a pending action, then invokes its callback.
    ///
    /// A `CloseOne` action from [`queue_closing_action`](Self::queue_closing_action)
    /// queued while its target was the current toast closes exactly that
    /// instance, so running it after the instance is gone does nothing.
    /// Otherwise it closes the latest toast of its name, or the latest toast
    /// when it has no name, at run time. Returns whether anything was closed.
    pub fn run_closing_action(&mut self, action: &Rc<PendingClosingAction>) -> Result<bool> {
        if !self.remove_closing_action(action) {
            return Ok(false);
        }

        let closed = match (action.kind, action.target_name.as_deref()) {
            (ClosingActionKind::CloseAll, _) => self.close_all_from(action.origin) > 0,
            (ClosingActionKind::CloseAllOfName, Some(name)) => {
                self.close_all_of_name_from(name, action.origin)?
            }
            (ClosingActionKind::CloseAllOfName, None) => false,
            (ClosingActionKind::CloseOne, name) => match (&action.origin_instance, name) {
                (Some(id), _) if action.targets_origin => {
                    self.close_instance_from(id, action.origin)
                }
                (_, Some(name)) => self.close_by_name(name)?.is_some(),
                (_, None) => self.close_latest().is_some(),
            },
        };

        if let Some(callback) = &action.callback {
            callback();
        }
        Ok(closed)
    }

    /// Runs every queued action in order.
    pub fn run_closing_actions(&mut self) -> Result<usize> {
        let pending = self.state.pending.clone();
        let mut closed = 0;
        for action in &pending {
            if self.run_closing_action(action)? {
                closed += 1;
            }
        }
        Ok(closed)
    }

    /// Applies the current toast's back behavior.
    ///
    /// Returns whether the back action was consumed; it is not when no toast
    /// is open.
    pub fn handle_back_press(&mut self) -> bool {
        self.handle_back_press_from(ClosingOrigin::Default)
    }

    pub(crate) fn handle_back_press_from(&mut self, origin: ClosingOrigin) -> bool {
        let Some(latest) = self.state.latest().cloned() else {
            return false;
        };
        let queued = match latest.options().back_behavior {
            BackBehavior::None => return true,
            BackBehavior::Clear => {
                self.queue_closing_action_from(
                    ClosingActionKind::CloseAll,
                    None,
                    None,
                    origin,
                    true,
                )
            }
            BackBehavior::Pop => self.queue_closing_action_from(
                ClosingActionKind::CloseOne,
                Some(latest.name()),
                None,
                origin,
                true,
            ),
        };
        if let Err(error) = queued {
            warn!(%error, "could not queue back action");
        }
        true
    }

    // ----------------------------------------------------------------------
    // Instance event listeners
    // ----------------------------------------------------------------------

    /// Attaches a listener to an open toast. Returns `None` if it is not open.
    pub fn add_listener(
        &mut self,
        id: &InstanceId,
        handler: ToastEventHandler,
    ) -> Option<ListenerHandle> {
        self.state
            .is_open(id)
            .then(|| self.listeners.add(id, handler))
    }

    pub fn remove_listener(&mut self, handle: &ListenerHandle) -> bool {
        self.listeners.remove(handle)
    }

    pub fn remove_all_listeners(&mut self, id: &InstanceId) {
        self.listeners.remove_all(id);
    }

    pub(crate) fn emit_animate(&mut self, id: &InstanceId, value: f32) {
        self.listeners.emit_animate(id, value);
    }
}

impl<M> fmt::Debug for ToastStore<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastStore")
            .field("state", &self.state)
            .field("subscribers", &self.subscribers.len())
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}
