//! Error types for termfolio.

use std::io;

/// Errors produced by the termfolio engine and its hosts.
///
/// None of these are fatal to a session: the dispatcher renders any error a
/// command returns into that command's own scrollback record.
#[derive(Debug, thiserror::Error)]
pub enum TermError {
    #[error("{0}")]
    Command(String),

    #[error("command already registered: {0}")]
    DuplicateCommand(String),

    #[error("command not found: {0}")]
    CommandNotFound(String),

    #[error("invalid theme: {0}")]
    InvalidTheme(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, TermError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_error_display_is_bare_message() {
        let e = TermError::Command("usage: weather [location]".into());
        assert_eq!(format!("{e}"), "usage: weather [location]");
    }

    #[test]
    fn duplicate_command_display() {
        let e = TermError::DuplicateCommand("echo".into());
        assert_eq!(format!("{e}"), "command already registered: echo");
    }

    #[test]
    fn command_not_found_display() {
        let e = TermError::CommandNotFound("foo".into());
        assert_eq!(format!("{e}"), "command not found: foo");
    }

    #[test]
    fn invalid_theme_display() {
        let e = TermError::InvalidTheme("neon".into());
        assert_eq!(format!("{e}"), "invalid theme: neon");
    }

    #[test]
    fn config_error_display() {
        let e = TermError::Config("missing key".into());
        assert_eq!(format!("{e}"), "config error: missing key");
    }

    #[test]
    fn network_error_display() {
        let e = TermError::Network("connection refused".into());
        assert_eq!(format!("{e}"), "network error: connection refused");
    }

    #[test]
    fn io_error_from_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let e: TermError = io_err.into();
        let msg = format!("{e}");
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn toml_error_from_conversion() {
        let toml_err = toml::from_str::<toml::Value>("this is [[[not valid toml").unwrap_err();
        let e: TermError = toml_err.into();
        assert!(format!("{e}").contains("TOML parse error"));
    }

    #[test]
    fn json_error_from_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let e: TermError = json_err.into();
        assert!(format!("{e}").contains("JSON error"));
    }

    #[test]
    fn result_alias_err() {
        let r: Result<i32> = Err(TermError::Command("oops".into()));
        assert!(r.is_err());
    }
}
