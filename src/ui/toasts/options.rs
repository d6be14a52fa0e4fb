// SPDX-License-Identifier: MPL-2.0
//! Toast options and their resolution.
//!
//! Options can be set at four levels. From highest to lowest priority:
//!
//! 1. the component itself ([`ToastComponent::with_options`]),
//! 2. the open call ([`OpenRequest::options`]),
//! 3. the registry entry,
//! 4. the registry's default options.
//!
//! [`resolve`] collapses those layers into one [`EffectiveOptions`] record
//! when a toast is opened.
//!
//! [`ToastComponent::with_options`]: super::component::ToastComponent::with_options
//! [`OpenRequest::options`]: super::state::OpenRequest::options

use super::animation::{AnimationConfig, AnimationFn, Curve, TransitionFn};
use crate::config::defaults::{
    DEFAULT_BACKDROP_ANIMATION_MS, DEFAULT_BACKDROP_OPACITY, DEFAULT_DURATION,
    MAX_BACKDROP_OPACITY, MIN_BACKDROP_OPACITY,
};
use crate::error::{Error, Result};
use crate::ui::design_tokens::palette;
use iced::widget::container;
use iced::{Color, Theme};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Custom style for the container wrapping a toast.
pub type ContainerStyleFn = Rc<dyn Fn(&Theme) -> container::Style>;

/// Where a toast is stacked on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Position {
    #[default]
    Top,
    Center,
    Bottom,
}

impl Position {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Position::Top => "top",
            Position::Center => "center",
            Position::Bottom => "bottom",
        }
    }
}

impl std::str::FromStr for Position {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "top" => Ok(Position::Top),
            "center" => Ok(Position::Center),
            "bottom" => Ok(Position::Bottom),
            other => Err(Error::Configuration(format!(
                "position should either be 'top', 'center' or 'bottom', got '{other}'"
            ))),
        }
    }
}

/// What the back action (Escape) does while a toast is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackBehavior {
    /// Swallow the back action without closing anything.
    None,
    /// Close the current toast.
    #[default]
    Pop,
    /// Close every open toast.
    Clear,
}

impl BackBehavior {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BackBehavior::None => "none",
            BackBehavior::Pop => "pop",
            BackBehavior::Clear => "clear",
        }
    }
}

impl std::str::FromStr for BackBehavior {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "none" => Ok(BackBehavior::None),
            "pop" => Ok(BackBehavior::Pop),
            "clear" => Ok(BackBehavior::Clear),
            other => Err(Error::Configuration(format!(
                "back behavior should either be 'none', 'pop' or 'clear', got '{other}'"
            ))),
        }
    }
}

/// One layer of toast options. Unset fields fall through to lower layers.
#[derive(Clone, Default)]
pub struct ToastOptions {
    pub position: Option<Position>,
    /// Auto-dismiss delay; `Duration::ZERO` disables auto-dismiss.
    pub duration: Option<Duration>,
    pub back_behavior: Option<BackBehavior>,
    pub backdrop_color: Option<Color>,
    pub backdrop_opacity: Option<f32>,
    pub backdrop_animation_duration: Option<Duration>,
    pub animate_in_config: Option<AnimationConfig>,
    pub animate_out_config: Option<AnimationConfig>,
    pub animation_in: Option<AnimationFn>,
    pub animation_out: Option<AnimationFn>,
    pub transition: Option<TransitionFn>,
    pub container_style: Option<ContainerStyleFn>,
    pub disable_fling_gesture: Option<bool>,
}

impl ToastOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in defaults, the floor every registry's defaults are merged onto.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            position: Some(Position::default()),
            duration: Some(DEFAULT_DURATION),
            back_behavior: Some(BackBehavior::default()),
            backdrop_color: Some(palette::BLACK),
            backdrop_opacity: Some(DEFAULT_BACKDROP_OPACITY),
            backdrop_animation_duration: Some(Duration::from_millis(
                DEFAULT_BACKDROP_ANIMATION_MS,
            )),
            disable_fling_gesture: Some(false),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    #[must_use]
    pub fn with_back_behavior(mut self, behavior: BackBehavior) -> Self {
        self.back_behavior = Some(behavior);
        self
    }

    #[must_use]
    pub fn with_backdrop(mut self, color: Color, opacity: f32) -> Self {
        self.backdrop_color = Some(color);
        self.backdrop_opacity = Some(opacity);
        self
    }

    #[must_use]
    pub fn with_backdrop_animation_duration(mut self, duration: Duration) -> Self {
        self.backdrop_animation_duration = Some(duration);
        self
    }

    #[must_use]
    pub fn with_animate_in_config(mut self, config: AnimationConfig) -> Self {
        self.animate_in_config = Some(config);
        self
    }

    #[must_use]
    pub fn with_animate_out_config(mut self, config: AnimationConfig) -> Self {
        self.animate_out_config = Some(config);
        self
    }

    #[must_use]
    pub fn with_animation_in(mut self, animate: impl Fn(Duration) -> f32 + 'static) -> Self {
        self.animation_in = Some(Rc::new(animate));
        self
    }

    #[must_use]
    pub fn with_animation_out(mut self, animate: impl Fn(Duration) -> f32 + 'static) -> Self {
        self.animation_out = Some(Rc::new(animate));
        self
    }

    #[must_use]
    pub fn with_transition(
        mut self,
        transition: impl Fn(f32) -> super::animation::Transition + 'static,
    ) -> Self {
        self.transition = Some(Rc::new(transition));
        self
    }

    #[must_use]
    pub fn with_container_style(
        mut self,
        style: impl Fn(&Theme) -> container::Style + 'static,
    ) -> Self {
        self.container_style = Some(Rc::new(style));
        self
    }

    #[must_use]
    pub fn with_fling_gesture_disabled(mut self, disabled: bool) -> Self {
        self.disable_fling_gesture = Some(disabled);
        self
    }

    /// Fills every unset field of `self` from `lower`.
    #[must_use]
    pub fn or(self, lower: &ToastOptions) -> Self {
        Self {
            position: self.position.or(lower.position),
            duration: self.duration.or(lower.duration),
            back_behavior: self.back_behavior.or(lower.back_behavior),
            backdrop_color: self.backdrop_color.or(lower.backdrop_color),
            backdrop_opacity: self.backdrop_opacity.or(lower.backdrop_opacity),
            backdrop_animation_duration: self
                .backdrop_animation_duration
                .or(lower.backdrop_animation_duration),
            animate_in_config: self.animate_in_config.or(lower.animate_in_config),
            animate_out_config: self.animate_out_config.or(lower.animate_out_config),
            animation_in: self.animation_in.or_else(|| lower.animation_in.clone()),
            animation_out: self.animation_out.or_else(|| lower.animation_out.clone()),
            transition: self.transition.or_else(|| lower.transition.clone()),
            container_style: self
                .container_style
                .or_else(|| lower.container_style.clone()),
            disable_fling_gesture: self.disable_fling_gesture.or(lower.disable_fling_gesture),
        }
    }

    /// Rejects values outside their documented ranges.
    ///
    /// `context` names the layer in the error message.
    pub fn validate(&self, context: &str) -> Result<()> {
        if let Some(opacity) = self.backdrop_opacity {
            if !(MIN_BACKDROP_OPACITY..=MAX_BACKDROP_OPACITY).contains(&opacity) {
                return Err(Error::Configuration(format!(
                    "backdrop opacity should be a number between 0 and 1 in {context}, got {opacity}"
                )));
            }
        }
        if let Some(color) = self.backdrop_color {
            let channels = [color.r, color.g, color.b, color.a];
            if channels.iter().any(|c| !(0.0..=1.0).contains(c)) {
                return Err(Error::Configuration(format!(
                    "backdrop color channels should be between 0 and 1 in {context}"
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ToastOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let set = |present: bool| if present { Some("<fn>") } else { None };
        f.debug_struct("ToastOptions")
            .field("position", &self.position)
            .field("duration", &self.duration)
            .field("back_behavior", &self.back_behavior)
            .field("backdrop_color", &self.backdrop_color)
            .field("backdrop_opacity", &self.backdrop_opacity)
            .field(
                "backdrop_animation_duration",
                &self.backdrop_animation_duration,
            )
            .field("animate_in_config", &self.animate_in_config)
            .field("animate_out_config", &self.animate_out_config)
            .field("animation_in", &set(self.animation_in.is_some()))
            .field("animation_out", &set(self.animation_out.is_some()))
            .field("transition", &set(self.transition.is_some()))
            .field("container_style", &set(self.container_style.is_some()))
            .field("disable_fling_gesture", &self.disable_fling_gesture)
            .finish()
    }
}

/// Fully resolved options of one open toast.
#[derive(Clone)]
pub struct EffectiveOptions {
    pub position: Position,
    /// `None` when the toast never dismisses itself.
    pub duration: Option<Duration>,
    pub back_behavior: BackBehavior,
    pub backdrop_color: Color,
    pub backdrop_opacity: f32,
    pub backdrop_animation_duration: Duration,
    pub animate_in: Curve,
    pub animate_out: Curve,
    pub transition: Option<TransitionFn>,
    pub container_style: Option<ContainerStyleFn>,
    pub disable_fling_gesture: bool,
}

impl fmt::Debug for EffectiveOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectiveOptions")
            .field("position", &self.position)
            .field("duration", &self.duration)
            .field("back_behavior", &self.back_behavior)
            .field("backdrop_color", &self.backdrop_color)
            .field("backdrop_opacity", &self.backdrop_opacity)
            .field(
                "backdrop_animation_duration",
                &self.backdrop_animation_duration,
            )
            .field("animate_in", &self.animate_in)
            .field("animate_out", &self.animate_out)
            .field("disable_fling_gesture", &self.disable_fling_gesture)
            .finish_non_exhaustive()
    }
}

/// The option layers of one toast, highest priority first.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionLayers<'a> {
    pub component: Option<&'a ToastOptions>,
    pub call: Option<&'a ToastOptions>,
    pub entry: Option<&'a ToastOptions>,
    pub defaults: Option<&'a ToastOptions>,
}

impl<'a> OptionLayers<'a> {
    fn iter(&self) -> impl Iterator<Item = &'a ToastOptions> {
        [self.component, self.call, self.entry, self.defaults]
            .into_iter()
            .flatten()
    }

    fn pick<T>(&self, field: impl Fn(&'a ToastOptions) -> Option<T>) -> Option<T> {
        self.iter().find_map(field)
    }

    /// Resolves one animation direction.
    ///
    /// The highest layer that sets either form decides: an imperative
    /// function there wins, otherwise the declarative config found there
    /// suppresses imperative functions from lower layers.
    fn curve(
        &self,
        config: impl Fn(&'a ToastOptions) -> Option<AnimationConfig>,
        imperative: impl Fn(&'a ToastOptions) -> Option<&'a AnimationFn>,
        fallback: AnimationConfig,
    ) -> Curve {
        for layer in self.iter() {
            if let Some(animate) = imperative(layer) {
                return Curve::Imperative(Rc::clone(animate));
            }
            if let Some(config) = config(layer) {
                return Curve::Declarative(config);
            }
        }
        Curve::Declarative(fallback)
    }
}

/// Collapses option layers into the effective options of one toast.
///
/// Fields that no layer sets take the built-in defaults.
#[must_use]
pub fn resolve(layers: &OptionLayers<'_>) -> EffectiveOptions {
    let builtin = ToastOptions::builtin();
    let duration = layers
        .pick(|o| o.duration)
        .or(builtin.duration)
        .filter(|duration| !duration.is_zero());

    EffectiveOptions {
        position: layers.pick(|o| o.position).unwrap_or_default(),
        duration,
        back_behavior: layers.pick(|o| o.back_behavior).unwrap_or_default(),
        backdrop_color: layers
            .pick(|o| o.backdrop_color)
            .unwrap_or(palette::BLACK),
        backdrop_opacity: layers
            .pick(|o| o.backdrop_opacity)
            .unwrap_or(DEFAULT_BACKDROP_OPACITY),
        backdrop_animation_duration: layers
            .pick(|o| o.backdrop_animation_duration)
            .unwrap_or(Duration::from_millis(DEFAULT_BACKDROP_ANIMATION_MS)),
        animate_in: layers.curve(
            |o| o.animate_in_config,
            |o| o.animation_in.as_ref(),
            AnimationConfig::ENTRANCE,
        ),
        animate_out: layers.curve(
            |o| o.animate_out_config,
            |o| o.animation_out.as_ref(),
            AnimationConfig::EXIT,
        ),
        transition: layers.pick(|o| o.transition.clone()),
        container_style: layers.pick(|o| o.container_style.clone()),
        disable_fling_gesture: layers.pick(|o| o.disable_fling_gesture).unwrap_or(false),
    }
}
