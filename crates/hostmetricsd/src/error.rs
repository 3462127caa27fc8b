//! Outermost error boundary of the daemon.
//!
//! Two stderr shapes are part of the command-line contract:
//! - `[error]: <message>` for user-facing errors,
//! - `[error]: internal failure: <detail> (consult logs for more details)`
//!   for everything else.

use std::fmt;

use hostmetrics_core::config::ConfigError;

#[derive(Debug)]
pub enum AppError {
    /// Misconfiguration or bad arguments; the message is actionable as is.
    User(String),
    /// Unexpected failure; full detail goes to the log.
    Internal(anyhow::Error),
}

impl AppError {
    pub fn user(message: impl Into<String>) -> Self {
        AppError::User(message.into())
    }

    /// The single stderr line reported for this error.
    pub fn report(&self) -> String {
        match self {
            AppError::User(message) => format!("[error]: {}", message),
            AppError::Internal(err) => format!(
                "[error]: internal failure: {:#} (consult logs for more details)",
                err
            ),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::User(message) => f.write_str(message),
            AppError::Internal(err) => write!(f, "{:#}", err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::User(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl From<clap::Error> for AppError {
    fn from(err: clap::Error) -> Self {
        // Keep only the headline; usage text is noise on the error line.
        let rendered = err.to_string();
        let headline = rendered.lines().next().unwrap_or_default();
        AppError::User(
            headline
                .strip_prefix("error: ")
                .unwrap_or(headline)
                .to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_user_report() {
        assert_eq!(AppError::user("boom").report(), "[error]: boom");
    }

    #[test]
    fn test_internal_report_includes_context() {
        let err: anyhow::Result<()> = Err(std::io::Error::other("disk on fire"))
            .context("cannot write events");
        let err = AppError::from(err.unwrap_err());
        assert_eq!(
            err.report(),
            "[error]: internal failure: cannot write events: disk on fire (consult logs for more details)"
        );
    }

    #[test]
    fn test_config_errors_are_user_errors() {
        let err = hostmetrics_core::config::Config::from_yaml_str("sources: []\n")
            .unwrap()
            .resolve()
            .unwrap_err();
        let app = AppError::from(err);
        assert!(matches!(app, AppError::User(_)));
        assert_eq!(
            app.report(),
            "[error]: invalid config: at least one source must be configured"
        );
    }
}
