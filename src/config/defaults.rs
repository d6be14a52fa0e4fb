// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for toast options and timings.
//!
//! # Categories
//!
//! - **Display**: Auto-dismiss duration and stack position
//! - **Backdrop**: Backdrop opacity bounds and fade duration
//! - **Animation**: Entrance/exit timings and the overlay tick rate

use std::time::Duration;

// ==========================================================================
// Display Defaults
// ==========================================================================

/// Default auto-dismiss delay for a toast (in milliseconds).
pub const DEFAULT_DURATION_MS: u64 = 4000;

/// Default auto-dismiss delay as a `Duration`.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(DEFAULT_DURATION_MS);

// ==========================================================================
// Backdrop Defaults
// ==========================================================================

/// Default backdrop opacity (no backdrop).
pub const DEFAULT_BACKDROP_OPACITY: f32 = 0.0;

/// Minimum allowed backdrop opacity.
pub const MIN_BACKDROP_OPACITY: f32 = 0.0;

/// Maximum allowed backdrop opacity.
pub const MAX_BACKDROP_OPACITY: f32 = 1.0;

/// Default backdrop fade-in duration (in milliseconds).
pub const DEFAULT_BACKDROP_ANIMATION_MS: u64 = 300;

// ==========================================================================
// Animation Defaults
// ==========================================================================

/// Delay before the entrance animation starts once a toast is mounted.
pub const ENTRANCE_DELAY: Duration = Duration::from_millis(100);

/// Default entrance animation length.
pub const ENTRANCE_DURATION: Duration = Duration::from_millis(300);

/// Delay before the exit animation starts once a toast is closed.
pub const EXIT_DELAY: Duration = Duration::from_millis(100);

/// Default exit animation length.
pub const EXIT_DURATION: Duration = Duration::from_millis(500);

/// Time a closed toast stays mounted so its exit animation can play.
///
/// Fixed; exit animations longer than this are cut off.
pub const EXIT_ANIMATION_WINDOW: Duration = Duration::from_millis(700);

/// Interval between overlay ticks while something is animating or open.
pub const TICK_INTERVAL: Duration = Duration::from_millis(16);

const _: () = {
    assert!(MIN_BACKDROP_OPACITY <= DEFAULT_BACKDROP_OPACITY);
    assert!(DEFAULT_BACKDROP_OPACITY <= MAX_BACKDROP_OPACITY);
    assert!(
        EXIT_DELAY.as_millis() + EXIT_DURATION.as_millis() <= EXIT_ANIMATION_WINDOW.as_millis()
    );
};
