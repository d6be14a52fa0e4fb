// SPDX-License-Identifier: MPL-2.0
//! Stacked toast notifications.
//!
//! A fixed set of named toasts is registered once (see [`registry`]). The
//! [`state::ToastStore`] tracks which of them are open and publishes a new
//! state snapshot on every change. [`provider::ToastProvider`] wires the store
//! into an iced application and renders the open toasts through the
//! [`overlay`].
//!
//! # Modules
//!
//! - [`options`] - Option layers and their resolution
//! - [`registry`] - Name → component mapping built at startup
//! - [`state`] - Open set, subscriptions and queued closing actions
//! - [`events`] - Per-toast animate/close listeners
//! - [`animation`] - Easing, entrance/exit timelines and transitions
//! - [`overlay`] - Mounting, animation clock and rendering
//! - [`provider`] - iced `update`/`view`/`subscription` facade
//! - [`api`] - Message constructors usable anywhere
//! - [`card`] - Stock toast card

pub mod animation;
pub mod api;
pub mod card;
pub mod component;
pub mod events;
pub mod instance;
pub mod options;
pub mod overlay;
pub mod provider;
pub mod registry;
pub mod state;

pub use animation::{AnimationConfig, Easing, Transition};
pub use card::Severity;
pub use component::{ToastComponent, ToastProps};
pub use events::{
    ClosingAction, ClosingActionKind, ClosingOrigin, ListenerHandle, ToastEventHandler,
};
pub use instance::{Callback, InstanceId, ToastInstance};
pub use options::{BackBehavior, EffectiveOptions, Position, ToastOptions};
pub use provider::{Message, ToastProvider};
pub use registry::{create_toast_stack, Registry, RegistryBuilder, ToastEntry};
pub use state::{CloseTarget, OpenRequest, StackState, StateUpdate, SubscriptionId, ToastStore};
