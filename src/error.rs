//! Application error type.
//!
//! The growth-model core never fails; everything that can (file access, parsing,
//! terminal setup) reports an `AppError` carrying the process exit code:
//!
//! - `2`: usage or input problems (bad flags, unreadable/invalid files)
//! - `3`: no usable data after ingest
//! - `4`: runtime failures (terminal, rendering)

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

    /// Invalid flags, unreadable files, malformed input.
    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// Ingest succeeded but nothing usable remains.
    pub fn no_data(message: impl Into<String>) -> Self {
        Self::new(3, message)
    }

    /// Terminal or rendering failures.
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(4, message)
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
