// SPDX-License-Identifier: MPL-2.0
//! Overlay renderer for open toasts.
//!
//! The overlay mirrors the store's open set into mounted items. Each item
//! runs its own entrance animation from the moment it is mounted and asks
//! for its own dismissal once its duration has elapsed. Items the store has
//! closed stay mounted for [`EXIT_ANIMATION_WINDOW`] while their exit
//! animation plays, then they are detached.

use super::animation::Transition;
use super::component::ToastProps;
use super::instance::{InstanceId, ToastInstance};
use super::options::Position;
use super::provider::Message;
use super::state::StackState;
use crate::config::defaults::EXIT_ANIMATION_WINDOW;
use crate::ui::design_tokens::{sizing, spacing};
use iced::widget::{container, mouse_area, text, Column, Container, Stack};
use iced::{alignment, Background, Color, Element, Length, Padding};
use std::rc::Rc;
use std::time::Instant;

struct MountedToast<M> {
    instance: Rc<ToastInstance<M>>,
    mounted_at: Instant,
    closed_at: Option<Instant>,
}

impl<M> MountedToast<M> {
    fn value(&self, now: Instant) -> f32 {
        let options = self.instance.options();
        match self.closed_at {
            None => options
                .animate_in
                .progress(now.saturating_duration_since(self.mounted_at)),
            Some(closed_at) => {
                let shown = options
                    .animate_in
                    .progress(closed_at.saturating_duration_since(self.mounted_at));
                let out = options
                    .animate_out
                    .progress(now.saturating_duration_since(closed_at));
                shown * (1.0 - out)
            }
        }
    }

    fn is_due(&self, now: Instant) -> bool {
        self.closed_at.is_none()
            && self
                .instance
                .options()
                .duration
                .is_some_and(|duration| now.saturating_duration_since(self.mounted_at) >= duration)
    }

    fn is_animating(&self, now: Instant) -> bool {
        let value = self.value(now);
        match self.closed_at {
            None => value < 1.0,
            Some(_) => value > 0.0,
        }
    }
}

/// Toasts grouped by resolved position, insertion order preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Groups<T> {
    pub top: Vec<T>,
    pub center: Vec<T>,
    pub bottom: Vec<T>,
}

impl<T> Default for Groups<T> {
    fn default() -> Self {
        Self {
            top: Vec::new(),
            center: Vec::new(),
            bottom: Vec::new(),
        }
    }
}

impl<T> Groups<T> {
    #[must_use]
    pub fn get(&self, position: Position) -> &[T] {
        match position {
            Position::Top => &self.top,
            Position::Center => &self.center,
            Position::Bottom => &self.bottom,
        }
    }

    fn get_mut(&mut self, position: Position) -> &mut Vec<T> {
        match position {
            Position::Top => &mut self.top,
            Position::Center => &mut self.center,
            Position::Bottom => &mut self.bottom,
        }
    }

    /// The groups in rendering order: top, center, bottom.
    pub fn into_ordered(self) -> [(Position, Vec<T>); 3] {
        [
            (Position::Top, self.top),
            (Position::Center, self.center),
            (Position::Bottom, self.bottom),
        ]
    }
}

/// Splits `items` by the position `position_of` resolves for each.
pub fn partition<T>(
    items: impl IntoIterator<Item = T>,
    position_of: impl Fn(&T) -> Position,
) -> Groups<T> {
    let mut groups = Groups::default();
    for item in items {
        groups.get_mut(position_of(&item)).push(item);
    }
    groups
}

/// Mounted toasts and their animation clocks.
pub struct Overlay<M> {
    items: Vec<MountedToast<M>>,
    now: Instant,
}

impl<M> Overlay<M> {
    #[must_use]
    pub fn new(now: Instant) -> Self {
        Self {
            items: Vec::new(),
            now,
        }
    }

    /// Mounts newly opened toasts and starts the exit of closed ones.
    pub fn reconcile(&mut self, state: &StackState<M>, at: Instant) {
        for item in &mut self.items {
            if item.closed_at.is_none() && !state.is_open(item.instance.id()) {
                item.closed_at = Some(at);
            }
        }
        for instance in state.open_instances() {
            let mounted = self
                .items
                .iter()
                .any(|item| item.instance.id() == instance.id());
            if !mounted {
                self.items.push(MountedToast {
                    instance: Rc::clone(instance),
                    mounted_at: at,
                    closed_at: None,
                });
            }
        }
    }

    /// Advances the clock, detaching toasts whose exit window has passed.
    ///
    /// Returns the open toasts whose auto-dismiss delay has elapsed. They may
    /// have been closed in the meantime; closing them again is a no-op.
    pub fn advance(&mut self, now: Instant) -> Vec<InstanceId> {
        self.now = now;
        self.items.retain(|item| {
            item.closed_at.is_none_or(|closed_at| {
                now.saturating_duration_since(closed_at) < EXIT_ANIMATION_WINDOW
            })
        });
        self.items
            .iter()
            .filter(|item| item.is_due(now))
            .map(|item| item.instance.id().clone())
            .collect()
    }

    /// Animated values of every toast that is currently animating.
    #[must_use]
    pub fn animating(&self) -> Vec<(InstanceId, f32)> {
        self.items
            .iter()
            .filter(|item| item.is_animating(self.now))
            .map(|item| (item.instance.id().clone(), item.value(self.now)))
            .collect()
    }

    /// Whether anything is mounted.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.items.is_empty()
    }

    /// Whether a mounted toast is still animating, exiting or counting down
    /// to its auto-dismiss. Idle toasts without a duration need no ticks.
    #[must_use]
    pub fn needs_tick(&self) -> bool {
        self.items.iter().any(|item| {
            item.closed_at.is_some()
                || item.instance.options().duration.is_some()
                || item.is_animating(self.now)
        })
    }

    #[must_use]
    pub fn mounted_count(&self) -> usize {
        self.items.len()
    }

    /// Whether `id` is mounted but already closed in the store.
    #[must_use]
    pub fn is_exiting(&self, id: &InstanceId) -> bool {
        self.items
            .iter()
            .any(|item| item.instance.id() == id && item.closed_at.is_some())
    }

    /// Animated value of a mounted toast at the last tick.
    #[must_use]
    pub fn value_of(&self, id: &InstanceId) -> Option<f32> {
        self.items
            .iter()
            .find(|item| item.instance.id() == id)
            .map(|item| item.value(self.now))
    }

    fn backdrop_alpha(&self, state: &StackState<M>) -> Option<(Color, f32)> {
        let latest = state.latest()?;
        let options = latest.options();
        if options.backdrop_opacity <= 0.0 {
            return None;
        }
        let item = self
            .items
            .iter()
            .find(|item| item.instance.id() == latest.id())?;
        let elapsed = self.now.saturating_duration_since(item.mounted_at);
        let fade = if options.backdrop_animation_duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f32() / options.backdrop_animation_duration.as_secs_f32()).min(1.0)
        };
        Some((options.backdrop_color, options.backdrop_opacity * fade))
    }
}

impl<M: Clone + 'static> Overlay<M> {
    /// Renders the backdrop and one container per mounted toast, stacked in
    /// top, center and bottom groups. Renders nothing before the store is
    /// initialized.
    pub fn view<'a>(&'a self, state: &StackState<M>, lift: fn(Message) -> M) -> Element<'a, M> {
        if !state.is_initialized() || self.items.is_empty() {
            return Container::new(text(""))
                .width(Length::Shrink)
                .height(Length::Shrink)
                .into();
        }

        let mut layers = Stack::new().width(Length::Fill).height(Length::Fill);

        if let Some((color, alpha)) = self.backdrop_alpha(state) {
            let backdrop = Container::new(text(""))
                .width(Length::Fill)
                .height(Length::Fill)
                .style(move |_theme| container::Style {
                    background: Some(Background::Color(Color { a: alpha, ..color })),
                    ..Default::default()
                });
            layers = layers.push(mouse_area(backdrop).on_press(lift(Message::BackdropPressed)));
        }

        let groups = partition(&self.items, |item| item.instance.options().position);
        for (position, items) in groups.into_ordered() {
            if items.is_empty() {
                continue;
            }
            let toasts: Vec<Element<'a, M>> = items
                .into_iter()
                .map(|item| self.view_item(item, lift))
                .collect();

            let (align_y, padding) = match position {
                Position::Top => (alignment::Vertical::Top, spacing::LG),
                Position::Center => (alignment::Vertical::Center, spacing::MD),
                Position::Bottom => (alignment::Vertical::Bottom, spacing::LG),
            };
            let group = Container::new(
                Column::with_children(toasts).align_x(alignment::Horizontal::Center),
            )
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(alignment::Horizontal::Center)
            .align_y(align_y)
            .padding(padding);
            layers = layers.push(group);
        }

        layers.into()
    }

    fn view_item<'a>(
        &'a self,
        item: &'a MountedToast<M>,
        lift: fn(Message) -> M,
    ) -> Element<'a, M> {
        let instance = item.instance.as_ref();
        let options = instance.options();
        let value = item.value(self.now);
        let transition = match &options.transition {
            Some(transition) => transition(value),
            None => Transition::slide(value, options.position),
        };

        let content = instance.component().render(ToastProps::new(instance, value, lift));
        let body: Element<'a, M> = if options.disable_fling_gesture || item.closed_at.is_some() {
            content
        } else {
            mouse_area(content)
                .on_press(lift(Message::Fling(instance.id().clone())))
                .into()
        };

        let style = options.container_style.clone();
        let opacity = transition.opacity.clamp(0.0, 1.0);
        Container::new(body)
            .padding(offset_padding(transition.offset_y))
            .style(move |theme| {
                let base = style
                    .as_ref()
                    .map(|style| style(theme))
                    .unwrap_or_default();
                fade(base, opacity)
            })
            .into()
    }
}

/// Padding that shifts content vertically by `offset_y` around a fixed
/// resting gap, so a sliding toast does not resize its group.
fn offset_padding(offset_y: f32) -> Padding {
    let rest = sizing::TOAST_SLIDE / 2.0;
    Padding {
        top: (rest + offset_y).max(0.0),
        bottom: (rest - offset_y).max(0.0),
        ..Padding::ZERO
    }
}

/// Scales the alpha of every color in `style` by `opacity`.
fn fade(mut style: container::Style, opacity: f32) -> container::Style {
    let scale = |color: Color| Color {
        a: color.a * opacity,
        ..color
    };
    if let Some(Background::Color(color)) = style.background {
        style.background = Some(Background::Color(scale(color)));
    }
    style.text_color = style.text_color.map(scale);
    style.border.color = scale(style.border.color);
    style.shadow.color = scale(style.shadow.color);
    style
}
