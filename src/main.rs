// SPDX-License-Identifier: MPL-2.0
//! Demo application for `iced_toasts`.
//!
//! ```text
//! iced_toasts [--position top|center|bottom] [--duration MS] [--config FILE] [--verbose]
//! ```

use iced::widget::{button, column, container, row, text, Row, Stack};
use iced::{Element, Length, Subscription, Task};
use iced_toasts::config;
use iced_toasts::ui::design_tokens::{palette, spacing, typography};
use iced_toasts::ui::toasts::{
    api, card, BackBehavior, Position, Registry, Severity, ToastComponent, ToastOptions,
    ToastProvider,
};
use serde_json::json;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

const APP_NAME: &str = "iced_toasts";

#[derive(Debug, Clone, Default)]
struct Flags {
    position: Option<Position>,
    duration_ms: Option<u64>,
    config: Option<PathBuf>,
    verbose: bool,
    ignored: Vec<OsString>,
}

fn parse_flags() -> Result<Flags, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    let mut flags = Flags {
        verbose: args.contains(["-v", "--verbose"]),
        position: args.opt_value_from_str("--position")?,
        duration_ms: args.opt_value_from_str("--duration")?,
        config: args.opt_value_from_os_str("--config", |s| {
            Ok::<_, std::convert::Infallible>(PathBuf::from(s))
        })?,
        ignored: Vec::new(),
    };
    flags.ignored = args.finish();
    Ok(flags)
}

fn setup_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("iced_toasts=trace,warn")
        } else {
            EnvFilter::new("iced_toasts=debug,warn")
        }
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Loads the defaults file, then layers command-line overrides on top.
fn load_defaults(flags: &Flags) -> ToastOptions {
    let loaded = match &flags.config {
        Some(path) => config::load_from_path(path),
        None => config::load(APP_NAME),
    };
    let loaded = loaded.unwrap_or_else(|error| {
        warn!(%error, "falling back to built-in toast defaults");
        ToastOptions::builtin()
    });

    let mut overrides = ToastOptions::new();
    overrides.position = flags.position;
    overrides.duration = flags.duration_ms.map(Duration::from_millis);
    overrides.or(&loaded)
}

fn card_component(severity: Severity) -> ToastComponent<Message> {
    ToastComponent::new(move |props| {
        let message = props
            .get_param("text", None)
            .and_then(|value| value.as_str().map(str::to_owned))
            .unwrap_or_else(|| props.name().to_string());
        card::view(props, severity, message)
    })
}

/// Per-severity overrides on top of the defaults.
fn severity_options(severity: Severity) -> ToastOptions {
    match severity {
        Severity::Success | Severity::Info => ToastOptions::new(),
        Severity::Warning => ToastOptions::new().with_position(Position::Bottom),
        Severity::Error => ToastOptions::new()
            .with_duration(Duration::ZERO)
            .with_back_behavior(BackBehavior::Clear)
            .with_backdrop(palette::BLACK, 0.4),
    }
}

fn registry(defaults: ToastOptions) -> iced_toasts::Result<Registry<Message>> {
    Severity::ALL
        .into_iter()
        .fold(Registry::builder(), |builder, severity| {
            builder.toast_with_options(
                severity.label(),
                card_component(severity),
                severity_options(severity),
            )
        })
        .defaults(defaults)
        .build()
}

#[derive(Debug, Clone)]
enum Message {
    Toast(iced_toasts::ui::toasts::Message),
}

struct Demo {
    toasts: ToastProvider<Message>,
    opened: u32,
}

impl Demo {
    fn new(registry: Registry<Message>) -> (Self, Task<Message>) {
        (
            Self {
                toasts: ToastProvider::new(registry, Message::Toast),
                opened: 0,
            },
            Task::none(),
        )
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Toast(message) => {
                if matches!(message, iced_toasts::ui::toasts::Message::Open { .. }) {
                    self.opened += 1;
                }
                self.toasts.update(message);
            }
        }
        Task::none()
    }

    fn view(&self) -> Element<'_, Message> {
        let open = |severity: Severity| {
            let name = severity.label();
            let params = json!({ "text": format!("{name} toast #{}", self.opened + 1) });
            button(text(name).size(typography::BODY))
                .on_press(Message::Toast(api::open_with_params(name, params)))
        };

        let controls = column![
            text("Toasts").size(typography::BODY * 2.0),
            Row::with_children(Severity::ALL.map(|severity| Element::from(open(severity))))
                .spacing(spacing::XS),
            row![
                button("Close latest").on_press(Message::Toast(api::close())),
                button("Close errors").on_press(Message::Toast(api::close_all_of_name("Error"))),
                button("Close all").on_press(Message::Toast(api::close_all())),
            ]
            .spacing(spacing::XS),
            text(match self.toasts.current_toast() {
                Some(name) => format!("Current: {name}"),
                None => "No toast open".to_string(),
            })
            .size(typography::CAPTION),
        ]
        .spacing(spacing::MD);

        Stack::new()
            .push(container(controls).center(Length::Fill))
            .push(self.toasts.view())
            .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        self.toasts.subscription().map(Message::Toast)
    }
}

fn main() -> iced::Result {
    let flags = match parse_flags() {
        Ok(flags) => flags,
        Err(error) => {
            eprintln!("error: {error}");
            std::process::exit(2);
        }
    };
    setup_tracing(flags.verbose);
    if !flags.ignored.is_empty() {
        warn!(ignored = ?flags.ignored, "ignoring unexpected arguments");
    }

    let registry = match registry(load_defaults(&flags)) {
        Ok(registry) => registry,
        Err(error) => {
            eprintln!("error: {error}");
            std::process::exit(1);
        }
    };
    info!(names = ?registry.names(), "toast stack configured");

    // iced 0.14 requires a reusable boot function; the registry is consumed once.
    let registry = std::cell::RefCell::new(Some(registry));
    let boot = move || {
        let registry = registry
            .borrow_mut()
            .take()
            .expect("Boot function called more than once");
        Demo::new(registry)
    };

    iced::application(boot, Demo::update, Demo::view)
        .title("iced_toasts demo")
        .subscription(Demo::subscription)
        .run()
}
