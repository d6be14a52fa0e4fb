// SPDX-License-Identifier: MPL-2.0
//! Entrance and exit timelines for mounted toasts.
//!
//! A toast's animated value runs from `0.0` (hidden) to `1.0` (fully shown).
//! Entrance curves drive it up after mount; exit curves drive it back down
//! once the toast has been closed. A transition function then maps the value
//! to visual properties.

use crate::config::defaults::{EXIT_DELAY, EXIT_DURATION, ENTRANCE_DELAY, ENTRANCE_DURATION};
use crate::ui::design_tokens::sizing;
use crate::ui::toasts::options::Position;
use std::rc::Rc;
use std::time::Duration;

/// Imperative animation: maps the time elapsed since the animation started
/// to a progress in `[0, 1]`. The animation is finished once it returns `1.0`.
pub type AnimationFn = Rc<dyn Fn(Duration) -> f32>;

/// Maps an animated value to the visual properties of a toast.
pub type TransitionFn = Rc<dyn Fn(f32) -> Transition>;

/// Easing curve applied to a linear time fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    EaseIn,
    #[default]
    EaseOut,
    EaseInOut,
    /// Damped spring that slightly overshoots before settling.
    Spring,
}

impl Easing {
    /// Applies the curve to `t`, clamped to `[0, 1]`.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if t >= 1.0 {
            return 1.0;
        }
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t * t,
            Easing::EaseOut => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::Spring => 1.0 - (-6.0 * t).exp() * (10.0 * t).cos(),
        }
    }
}

/// Declarative animation description.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationConfig {
    pub delay: Duration,
    pub duration: Duration,
    pub easing: Easing,
}

impl AnimationConfig {
    /// Default entrance animation.
    pub const ENTRANCE: Self = Self {
        delay: ENTRANCE_DELAY,
        duration: ENTRANCE_DURATION,
        easing: Easing::EaseOut,
    };

    /// Default exit animation.
    pub const EXIT: Self = Self {
        delay: EXIT_DELAY,
        duration: EXIT_DURATION,
        easing: Easing::EaseIn,
    };

    #[must_use]
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self {
            delay: Duration::ZERO,
            duration,
            easing,
        }
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Eased progress after `elapsed` time.
    #[must_use]
    pub fn progress(&self, elapsed: Duration) -> f32 {
        let Some(running) = elapsed.checked_sub(self.delay) else {
            return 0.0;
        };
        if self.duration.is_zero() {
            return 1.0;
        }
        self.easing
            .apply(running.as_secs_f32() / self.duration.as_secs_f32())
    }

    /// Total length including the delay.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.delay + self.duration
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self::ENTRANCE
    }
}

/// One direction of a toast's animation, resolved from its options.
#[derive(Clone)]
pub enum Curve {
    Declarative(AnimationConfig),
    Imperative(AnimationFn),
}

impl Curve {
    #[must_use]
    pub fn progress(&self, elapsed: Duration) -> f32 {
        match self {
            Curve::Declarative(config) => config.progress(elapsed),
            Curve::Imperative(animate) => animate(elapsed).clamp(0.0, 1.0),
        }
    }
}

impl std::fmt::Debug for Curve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Curve::Declarative(config) => f.debug_tuple("Declarative").field(config).finish(),
            Curve::Imperative(_) => f.write_str("Imperative(<fn>)"),
        }
    }
}

/// Visual properties of a toast at one point of its animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// Multiplier applied to the toast container's colors.
    pub opacity: f32,
    /// Vertical offset in logical pixels (positive moves down).
    pub offset_y: f32,
}

impl Transition {
    /// Fully shown, no offset.
    pub const IDLE: Self = Self {
        opacity: 1.0,
        offset_y: 0.0,
    };

    /// Fades in while sliding away from the edge the toast is anchored to.
    #[must_use]
    pub fn slide(value: f32, position: Position) -> Self {
        let hidden = 1.0 - value.clamp(0.0, 1.0);
        let offset_y = match position {
            Position::Top => -sizing::TOAST_SLIDE * hidden,
            Position::Center => 0.0,
            Position::Bottom => sizing::TOAST_SLIDE * hidden,
        };
        Self {
            opacity: value.clamp(0.0, 1.0),
            offset_y,
        }
    }
}
