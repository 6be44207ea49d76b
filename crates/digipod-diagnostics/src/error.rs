//! digipod error types

use crate::ErrorCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Error - evaluation cannot proceed
    Error,
    /// Warning - potential issue but can continue
    Warning,
    /// Information - informational message
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A diagnostic message with code and optional help
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity level
    pub severity: Severity,
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional context or help
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            help: None,
        }
    }

    /// Create a new warning diagnostic
    pub fn warning(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            help: None,
        }
    }

    /// Set help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render with terminal colors
    #[cfg(feature = "colored")]
    pub fn render_colored(&self) -> String {
        use colored::Colorize;

        let severity = match self.severity {
            Severity::Error => self.severity.to_string().red().bold(),
            Severity::Warning => self.severity.to_string().yellow().bold(),
            Severity::Info => self.severity.to_string().blue().bold(),
        };
        let mut out = format!("{}[{}]: {}", severity, self.code.to_string().bold(), self.message);
        if let Some(help) = &self.help {
            out.push_str(&format!("\n  {} {}", "help:".cyan(), help));
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} - {}", self.severity, self.code, self.message)?;
        if let Some(help) = &self.help {
            write!(f, " ({})", help)?;
        }
        Ok(())
    }
}

/// Main digipod error type
#[derive(Debug, Clone, Error)]
pub enum DigipodError {
    /// Malformed input value or unknown name
    #[error("{code}: {message}")]
    Input {
        code: ErrorCode,
        message: String,
        context: Option<String>,
    },

    /// Combinator graph wired incorrectly
    #[error("{code}: {message}")]
    Wiring {
        code: ErrorCode,
        message: String,
        context: Option<String>,
    },

    /// Interval data violates partition invariants
    #[error("{code}: {message}")]
    Data {
        code: ErrorCode,
        message: String,
        person_id: Option<i64>,
        context: Option<String>,
    },

    /// Criterion result lookup failed
    #[error("{code}: {message}")]
    Provider {
        code: ErrorCode,
        message: String,
        criterion: Option<String>,
        context: Option<String>,
    },

    /// I/O or serialization failure
    #[error("{code}: {message}")]
    System {
        code: ErrorCode,
        message: String,
        context: Option<String>,
    },
}

impl DigipodError {
    /// Create an input error
    pub fn input(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Input {
            code,
            message: message.into(),
            context: None,
        }
    }

    /// Create a wiring error
    pub fn wiring(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Wiring {
            code,
            message: message.into(),
            context: None,
        }
    }

    /// Create a data error
    pub fn data(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Data {
            code,
            message: message.into(),
            person_id: None,
            context: None,
        }
    }

    /// Create a provider error
    pub fn provider(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Provider {
            code,
            message: message.into(),
            criterion: None,
            context: None,
        }
    }

    /// Create a system error
    pub fn system(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::System {
            code,
            message: message.into(),
            context: None,
        }
    }

    /// Attach the subject the error was raised for (data errors only)
    pub fn for_person(mut self, id: i64) -> Self {
        if let Self::Data { person_id, .. } = &mut self {
            *person_id = Some(id);
        }
        self
    }

    /// Attach the criterion the error was raised for (provider errors only)
    pub fn for_criterion(mut self, key: impl Into<String>) -> Self {
        if let Self::Provider { criterion, .. } = &mut self {
            *criterion = Some(key.into());
        }
        self
    }

    /// Attach free-form context
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        match &mut self {
            Self::Input { context, .. }
            | Self::Wiring { context, .. }
            | Self::Data { context, .. }
            | Self::Provider { context, .. }
            | Self::System { context, .. } => *context = Some(ctx.into()),
        }
        self
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Input { code, .. }
            | Self::Wiring { code, .. }
            | Self::Data { code, .. }
            | Self::Provider { code, .. }
            | Self::System { code, .. } => *code,
        }
    }

    /// Get the attached context, if any
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::Input { context, .. }
            | Self::Wiring { context, .. }
            | Self::Data { context, .. }
            | Self::Provider { context, .. }
            | Self::System { context, .. } => context.as_deref(),
        }
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        let message = match self {
            Self::Data {
                message,
                person_id: Some(id),
                ..
            } => format!("{} (person {})", message, id),
            Self::Provider {
                message,
                criterion: Some(key),
                ..
            } => format!("{} (criterion '{}')", message, key),
            Self::Input { message, .. }
            | Self::Wiring { message, .. }
            | Self::Data { message, .. }
            | Self::Provider { message, .. }
            | Self::System { message, .. } => message.clone(),
        };

        let mut diag = Diagnostic::error(self.code(), message);
        if let Some(ctx) = self.context() {
            diag = diag.with_help(ctx);
        } else if let Some(help) = self.code().info().help {
            diag = diag.with_help(help);
        }
        diag
    }
}

impl From<std::io::Error> for DigipodError {
    fn from(err: std::io::Error) -> Self {
        Self::system(crate::DGP0401, err.to_string())
    }
}
