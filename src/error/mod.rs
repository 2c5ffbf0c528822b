//! Error handling for edgestat
//!
//! Every failure the tool can surface is an [`AppError`]. Resolution and
//! transport errors come from probing, protocol and config errors from
//! startup input, and the rest from the terminal and the local system.

use thiserror::Error;

/// Custom error types for edgestat
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The domain did not resolve to any IPv4 edge
    #[error("Resolution error: {0}")]
    Resolution(String),

    /// Dial, handshake or request failure against a pinned edge
    #[error("Transport error: {0}")]
    Transport(String),

    /// Malformed URL or unsupported protocol token
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Dial or handshake exceeded its deadline
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Parsing errors (numbers, addresses, JSON)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// I/O errors (file operations, stdout, etc.)
    #[error("I/O error: {0}")]
    Io(String),

    /// Terminal setup, drawing or input failures in dashboard mode
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new resolution error
    pub fn resolution<S: Into<String>>(message: S) -> Self {
        Self::Resolution(message.into())
    }

    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport(message.into())
    }

    /// Create a new protocol error
    pub fn protocol<S: Into<String>>(message: S) -> Self {
        Self::Protocol(message.into())
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new terminal error
    pub fn terminal<S: Into<String>>(message: S) -> Self {
        Self::Terminal(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Resolution(_) => "DNS",
            Self::Transport(_) => "TRANSPORT",
            Self::Protocol(_) => "PROTOCOL",
            Self::Timeout(_) => "TIMEOUT",
            Self::Parse(_) => "PARSE",
            Self::Io(_) => "IO",
            Self::Terminal(_) => "TERMINAL",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Check if the error is worth retrying the whole run for
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Resolution(_) | Self::Transport(_) | Self::Timeout(_) => true,
            Self::Config(_) | Self::Protocol(_) | Self::Parse(_) => false,
            Self::Io(_) | Self::Terminal(_) | Self::Internal(_) => false,
        }
    }

    /// Get user-friendly error message with suggestions
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Config(msg) => {
                format!("Configuration problem: {}\n\nSuggestion: Check your .env file or command line arguments.", msg)
            }
            Self::Resolution(msg) => {
                format!("Edge lookup failed: {}\n\nSuggestion: Check that the domain exists and has A records, or pass an explicit target with -t.", msg)
            }
            Self::Transport(msg) => {
                format!("Edge connection failed: {}\n\nSuggestion: The edge may be unreachable or refusing the port. Try a different port with -p.", msg)
            }
            Self::Protocol(msg) => {
                format!("Unsupported request: {}\n\nSuggestion: Use a URL of the form http://host/path or https://host/path.", msg)
            }
            Self::Timeout(msg) => {
                format!("Edge timed out: {}\n\nSuggestion: The edge did not answer within 5 seconds. Check firewalls between you and the edge.", msg)
            }
            Self::Parse(msg) => {
                format!("Failed to parse data: {}\n\nSuggestion: Check the format of your input values.", msg)
            }
            Self::Io(msg) => {
                format!("I/O operation failed: {}\n\nSuggestion: Check file permissions and that stdout is writable.", msg)
            }
            Self::Terminal(msg) => {
                format!("Terminal failure: {}\n\nSuggestion: Dashboard mode needs an interactive terminal. Run without -d when piping output.", msg)
            }
            Self::Internal(msg) => {
                format!("Internal error: {}\n\nThis is likely a bug. Please report this issue with the error details.", msg)
            }
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Protocol(_) | Self::Parse(_) => 1,
            Self::Resolution(_) | Self::Transport(_) => 2,
            Self::Timeout(_) => 3,
            Self::Io(_) | Self::Terminal(_) => 5,
            Self::Internal(_) => 99,
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Config(_) | Self::Protocol(_) | Self::Parse(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::Resolution(_) | Self::Transport(_) => {
                    format!("[{}] {}", category.yellow().bold(), message.yellow())
                }
                Self::Timeout(_) => {
                    format!("[{}] {}", category.blue().bold(), message.blue())
                }
                Self::Io(_) | Self::Terminal(_) => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
                Self::Internal(_) => {
                    format!("[{}] {}", category.bright_red().bold(), message.bright_red())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

// Standard library error conversions
impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(error: url::ParseError) -> Self {
        Self::protocol(format!("URL parse error: {}", error))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(format!("JSON parse error: {}", error))
    }
}

impl From<trust_dns_resolver::error::ResolveError> for AppError {
    fn from(error: trust_dns_resolver::error::ResolveError) -> Self {
        Self::resolution(error.to_string())
    }
}

impl From<hyper::Error> for AppError {
    fn from(error: hyper::Error) -> Self {
        Self::transport(error.to_string())
    }
}

impl From<hyper::http::Error> for AppError {
    fn from(error: hyper::http::Error) -> Self {
        Self::protocol(format!("Request build error: {}", error))
    }
}

impl From<rustls::Error> for AppError {
    fn from(error: rustls::Error) -> Self {
        Self::transport(format!("TLS error: {}", error))
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(error: tokio::time::error::Elapsed) -> Self {
        Self::timeout(error.to_string())
    }
}

impl From<dotenv::Error> for AppError {
    fn from(error: dotenv::Error) -> Self {
        Self::config(format!("Environment file error: {}", error))
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(error: std::num::ParseIntError) -> Self {
        Self::parse(format!("Integer parse error: {}", error))
    }
}

impl From<std::str::ParseBoolError> for AppError {
    fn from(error: std::str::ParseBoolError) -> Self {
        Self::parse(format!("Boolean parse error: {}", error))
    }
}

impl From<std::net::AddrParseError> for AppError {
    fn from(error: std::net::AddrParseError) -> Self {
        Self::parse(format!("IP address parse error: {}", error))
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Error context trait for adding context to errors
///
/// The wrapped error keeps its own category so exit codes stay meaningful.
pub trait ErrorContext<T> {
    /// Add context to an error
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Add static context to an error
    fn context(self, message: &'static str) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<AppError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let context = f();
            match e.into() {
                AppError::Config(msg) => AppError::Config(format!("{}: {}", context, msg)),
                AppError::Resolution(msg) => AppError::Resolution(format!("{}: {}", context, msg)),
                AppError::Transport(msg) => AppError::Transport(format!("{}: {}", context, msg)),
                AppError::Protocol(msg) => AppError::Protocol(format!("{}: {}", context, msg)),
                AppError::Timeout(msg) => AppError::Timeout(format!("{}: {}", context, msg)),
                AppError::Parse(msg) => AppError::Parse(format!("{}: {}", context, msg)),
                AppError::Io(msg) => AppError::Io(format!("{}: {}", context, msg)),
                AppError::Terminal(msg) => AppError::Terminal(format!("{}: {}", context, msg)),
                AppError::Internal(msg) => AppError::Internal(format!("{}: {}", context, msg)),
            }
        })
    }

    fn context(self, message: &'static str) -> Result<T> {
        self.with_context(|| message.to_string())
    }
}

/// Error reporter for fatal errors printed right before exit
pub struct ErrorReporter {
    pub use_color: bool,
    pub verbose: bool,
}

impl ErrorReporter {
    /// Create a new error reporter
    pub fn new(use_color: bool, verbose: bool) -> Self {
        Self { use_color, verbose }
    }

    /// Render an error the way [`report_error`](Self::report_error) prints it
    pub fn render(&self, error: &AppError) -> String {
        let mut out = error.format_for_console(self.use_color);

        if self.verbose {
            out.push_str("\n\n");
            out.push_str(&error.user_friendly_message());

            if error.is_recoverable() {
                let hint = "This error might be temporary. You can try running the command again.";
                out.push_str("\n\n");
                if self.use_color {
                    use colored::Colorize;
                    out.push_str(&hint.green().to_string());
                } else {
                    out.push_str(hint);
                }
            }
        }

        out
    }

    /// Report an error to the user on stderr
    pub fn report_error(&self, error: &AppError) {
        eprintln!("{}", self.render(error));
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_error = AppError::config("Invalid configuration");
        assert_eq!(config_error.category(), "CONFIG");
        assert!(!config_error.is_recoverable());
        assert_eq!(config_error.exit_code(), 1);

        let transport_error = AppError::transport("Connection refused");
        assert_eq!(transport_error.category(), "TRANSPORT");
        assert!(transport_error.is_recoverable());
        assert_eq!(transport_error.exit_code(), 2);
    }

    #[test]
    fn test_error_display() {
        let error = AppError::resolution("no A records for example.invalid");
        let display = error.to_string();
        assert!(display.contains("Resolution error"));
        assert!(display.contains("example.invalid"));
    }

    #[test]
    fn test_error_categories() {
        let errors = [
            AppError::config("config"),
            AppError::resolution("dns"),
            AppError::transport("transport"),
            AppError::protocol("protocol"),
            AppError::timeout("timeout"),
            AppError::parse("parse"),
            AppError::io("io"),
            AppError::terminal("terminal"),
            AppError::internal("internal"),
        ];

        let expected_categories = [
            "CONFIG", "DNS", "TRANSPORT", "PROTOCOL", "TIMEOUT",
            "PARSE", "IO", "TERMINAL", "INTERNAL",
        ];

        for (error, expected) in errors.iter().zip(expected_categories.iter()) {
            assert_eq!(error.category(), *expected);
        }
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(AppError::protocol("ftp").exit_code(), 1);
        assert_eq!(AppError::resolution("test").exit_code(), 2);
        assert_eq!(AppError::timeout("test").exit_code(), 3);
        assert_eq!(AppError::terminal("test").exit_code(), 5);
        assert_eq!(AppError::internal("test").exit_code(), 99);
    }

    #[test]
    fn test_user_friendly_messages() {
        let error = AppError::protocol("unsupported scheme ftp");
        let message = error.user_friendly_message();
        assert!(message.contains("Unsupported request"));
        assert!(message.contains("Suggestion:"));
        assert!(message.contains("unsupported scheme ftp"));
    }

    #[test]
    fn test_error_conversions() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let app_error: AppError = io_error.into();
        assert_eq!(app_error.category(), "IO");

        let parse_error = "not_a_number".parse::<u16>().unwrap_err();
        let app_error: AppError = parse_error.into();
        assert_eq!(app_error.category(), "PARSE");

        let url_error = url::Url::parse("not-a-valid-url").unwrap_err();
        let app_error: AppError = url_error.into();
        assert_eq!(app_error.category(), "PROTOCOL");
        assert!(app_error.to_string().contains("URL parse error"));
    }

    #[test]
    fn test_dotenv_error_conversion() {
        let dotenv_error = dotenv::Error::LineParse(".env".to_string(), 1);
        let app_error: AppError = dotenv_error.into();
        assert_eq!(app_error.category(), "CONFIG");
        assert!(app_error.to_string().contains("Environment file error"));
    }

    #[test]
    fn test_context_keeps_category() {
        let result: Result<()> = Err(AppError::transport("Connection refused"));
        let error = result.context("While dialing 10.0.0.1:443").unwrap_err();

        assert_eq!(error.category(), "TRANSPORT");
        assert!(error.to_string().contains("While dialing 10.0.0.1:443"));
        assert!(error.to_string().contains("Connection refused"));
    }

    #[test]
    fn test_console_formatting() {
        let error = AppError::config("Test error");
        let formatted = error.format_for_console(false);
        assert_eq!(formatted, "[CONFIG] Configuration error: Test error");

        let colored = error.format_for_console(true);
        assert!(colored.contains("CONFIG"));
        assert!(colored.contains("Test error"));
    }

    #[test]
    fn test_reporter_render_verbose() {
        let reporter = ErrorReporter::new(false, true);
        let rendered = reporter.render(&AppError::timeout("dial 10.0.0.1:80"));

        assert!(rendered.starts_with("[TIMEOUT]"));
        assert!(rendered.contains("Suggestion:"));
        assert!(rendered.contains("might be temporary"));

        let quiet = ErrorReporter::new(false, false).render(&AppError::timeout("x"));
        assert!(!quiet.contains("Suggestion:"));
    }

    #[test]
    fn test_error_reporter_default() {
        let reporter = ErrorReporter::default();
        assert!(reporter.use_color);
        assert!(!reporter.verbose);
    }
}
