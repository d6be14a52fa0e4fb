// SPDX-License-Identifier: MPL-2.0
//! Free-function accessor.
//!
//! Code that cannot reach the [`ToastProvider`](super::provider::ToastProvider)
//! can still build the messages that drive it, and return them as tasks or
//! attach them to widgets.
//!
//! ```ignore
//! button("Save").on_press(AppMessage::Toast(toasts::api::open("Saved")))
//! ```
//!
//! Messages only carry data, so this side can neither read state nor attach
//! close callbacks. Those live on the provider:
//!
//! - [`ToastProvider::current_toast`](super::provider::ToastProvider::current_toast)
//!   and [`ToastProvider::get_param`](super::provider::ToastProvider::get_param)
//!   for queries
//! - [`ToastProvider::close_toast`](super::provider::ToastProvider::close_toast),
//!   [`close_toasts`](super::provider::ToastProvider::close_toasts) and
//!   [`close_all_toasts`](super::provider::ToastProvider::close_all_toasts)
//!   for closes that run a callback afterwards

use super::instance::InstanceId;
use super::provider::Message;
use super::state::CloseTarget;
use serde_json::Value;

/// Opens `name` without parameters.
#[must_use]
pub fn open(name: impl Into<String>) -> Message {
    Message::Open {
        name: name.into(),
        params: None,
    }
}

#[must_use]
pub fn open_with_params(name: impl Into<String>, params: Value) -> Message {
    Message::Open {
        name: name.into(),
        params: Some(params),
    }
}

/// Closes the most recently opened toast.
#[must_use]
pub fn close() -> Message {
    Message::Close(CloseTarget::Latest)
}

/// Closes the most recently opened toast named `name`.
#[must_use]
pub fn close_by_name(name: impl Into<String>) -> Message {
    Message::Close(CloseTarget::Name(name.into()))
}

#[must_use]
pub fn close_instance(id: InstanceId) -> Message {
    Message::Close(CloseTarget::Instance(id))
}

#[must_use]
pub fn close_all_of_name(name: impl Into<String>) -> Message {
    Message::CloseAllOfName(name.into())
}

#[must_use]
pub fn close_all() -> Message {
    Message::CloseAll
}

/// Same as pressing Escape.
#[must_use]
pub fn back() -> Message {
    Message::BackPressed
}
