/// Exit code for input/output files that cannot be opened, created or written.
pub const EXIT_IO: u8 = 2;
/// Exit code for chart rendering and export failures.
pub const EXIT_OUTPUT: u8 = 4;

/// A fatal, run-level error.
///
/// Row-level problems never become an `AppError`; they are recovered inside
/// the ingestion loop (see [`crate::domain::RowError`]).
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// Shorthand for a file-level failure (exit code 2).
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(EXIT_IO, message)
    }

    /// Shorthand for a chart or export failure (exit code 4).
    pub fn output(message: impl Into<String>) -> Self {
        Self::new(EXIT_OUTPUT, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
