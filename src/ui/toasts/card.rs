// SPDX-License-Identifier: MPL-2.0
//! Stock toast card.
//!
//! A small card with a severity-colored accent, a glyph, the message and a
//! dismiss button. Applications can register it directly:
//!
//! ```ignore
//! let error = ToastComponent::new(|props| {
//!     let text = props.get_param("text", None);
//!     let message = text.and_then(|v| v.as_str().map(String::from));
//!     card::view(props, Severity::Error, message.unwrap_or_default())
//! });
//! ```

use super::component::ToastProps;
use crate::ui::design_tokens::{
    border, opacity, palette, radius, shadow, sizing, spacing, typography,
};
use iced::widget::{button, container, text, Container, Row, Text};
use iced::{alignment, Color, Element, Length, Theme};

/// Severity level determines the card's accent and glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    Success,
    #[default]
    Info,
    Warning,
    Error,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Success,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
    ];

    #[must_use]
    pub fn color(self) -> Color {
        match self {
            Severity::Success => palette::SUCCESS_500,
            Severity::Info => palette::INFO_500,
            Severity::Warning => palette::WARNING_500,
            Severity::Error => palette::ERROR_500,
        }
    }

    /// Display name, also used as the registered toast name in the demo.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Severity::Success => "Success",
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        }
    }

    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            Severity::Success => "✓",
            Severity::Info => "i",
            Severity::Warning | Severity::Error => "!",
        }
    }
}

/// Renders a toast card; the dismiss button closes the toast.
///
/// The card fades with the toast's animated value.
pub fn view<'a, M: Clone + 'a>(
    props: ToastProps<'a, M>,
    severity: Severity,
    message: impl Into<String>,
) -> Element<'a, M> {
    let accent = severity.color();
    let alpha = props.animated_value().clamp(0.0, 1.0);

    let glyph = Text::new(severity.glyph())
        .size(sizing::ICON_SM)
        .style(move |_theme: &Theme| text::Style {
            color: Some(accent),
        });

    let message_widget = Text::new(message.into())
        .size(typography::BODY)
        .style(|theme: &Theme| text::Style {
            color: Some(theme.palette().text),
        });

    let dismiss_button = button(Text::new("×").size(typography::BODY))
        .on_press(props.close())
        .padding(spacing::XXS)
        .style(dismiss_button_style);

    // [glyph] [message] [dismiss]
    let content = Row::new()
        .spacing(spacing::SM)
        .align_y(alignment::Vertical::Center)
        .push(
            Container::new(glyph)
                .width(Length::Fixed(sizing::ICON_MD))
                .align_x(alignment::Horizontal::Center),
        )
        .push(
            Container::new(message_widget)
                .width(Length::Fill)
                .align_x(alignment::Horizontal::Left),
        )
        .push(dismiss_button);

    Container::new(content)
        .width(Length::Fixed(sizing::TOAST_WIDTH))
        .padding(spacing::SM)
        .style(move |theme: &Theme| card_style(theme, accent, alpha))
        .into()
}

fn card_style(theme: &Theme, accent: Color, alpha: f32) -> container::Style {
    let faded = |color: Color| Color {
        a: color.a * alpha,
        ..color
    };
    let bg_color = theme.extended_palette().background.base.color;

    container::Style {
        background: Some(iced::Background::Color(faded(bg_color))),
        border: iced::Border {
            color: faded(accent),
            width: border::WIDTH_MD,
            radius: radius::MD.into(),
        },
        shadow: iced::Shadow {
            color: faded(shadow::MD.color),
            ..shadow::MD
        },
        text_color: Some(faded(theme.palette().text)),
        ..Default::default()
    }
}

fn dismiss_button_style(theme: &Theme, status: button::Status) -> button::Style {
    let base = theme.extended_palette().background.base;
    let tint = |alpha: f32| {
        Some(iced::Background::Color(Color {
            a: alpha,
            ..palette::GRAY_400
        }))
    };
    let rounded = iced::Border {
        radius: radius::SM.into(),
        ..Default::default()
    };

    let (background, text_color, border) = match status {
        button::Status::Active => (None, base.text, iced::Border::default()),
        button::Status::Hovered => (tint(opacity::OVERLAY_SUBTLE), base.text, rounded),
        button::Status::Pressed => (tint(opacity::OVERLAY_MEDIUM), base.text, rounded),
        button::Status::Disabled => (
            None,
            Color {
                a: opacity::OVERLAY_MEDIUM,
                ..base.text
            },
            iced::Border::default(),
        ),
    };
    button::Style {
        background,
        text_color,
        border,
        shadow: shadow::NONE,
        snap: true,
    }
}
