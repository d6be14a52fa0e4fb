// SPDX-License-Identifier: MPL-2.0
//! `iced_toasts` manages a stack of named toast notifications for Iced
//! applications.
//!
//! Toasts are registered once, opened by name with optional parameters and
//! closed individually, by name or all at once. Option layers control their
//! position, lifetime, back-key behavior, backdrop and animations.

#![doc(html_root_url = "https://docs.rs/iced_toasts/0.1.0")]

pub mod config;
pub mod error;
pub mod ui;

pub use error::{Error, Result};
