// SPDX-License-Identifier: MPL-2.0
//! Error taxonomy for toast stacks.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The toast stack configuration was rejected at setup time.
    #[error("Configuration Error: {0}")]
    Configuration(String),

    /// A toast name that is not part of the registry was used.
    #[error("'{name}' is not a valid toast name. Did you mean any of these: {}", format_names(.valid))]
    UnknownName { name: String, valid: Vec<String> },

    /// A state listener failed while being notified.
    #[error("Subscriber Error: {0}")]
    Subscriber(String),

    #[error("I/O Error: {0}")]
    Io(String),

    /// The defaults file could not be parsed or written.
    #[error("Config Error: {0}")]
    Config(String),
}

fn format_names(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("\n• {name}"))
        .collect::<String>()
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_name_lists_valid_names() {
        let err = Error::UnknownName {
            name: "Unknown".to_string(),
            valid: vec!["Success".to_string(), "Error".to_string()],
        };
        let message = err.to_string();
        assert!(message.starts_with("'Unknown' is not a valid toast name"));
        assert!(message.contains("\n• Success"));
        assert!(message.contains("\n• Error"));
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_error = std::io::Error::other("boom");
        let err: Error = io_error.into();
        match err {
            Error::Io(message) => assert!(message.contains("boom")),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn configuration_error_formats_properly() {
        let err = Error::Configuration("no toasts registered".into());
        assert_eq!(
            format!("{}", err),
            "Configuration Error: no toasts registered"
        );
    }
}
