use thiserror::Error;

/// Main error type for the stock cleaner
#[derive(Error, Debug)]
pub enum CleanError {
    #[error("Input file not found: {path}")]
    NotFound { path: String },

    #[error("Processing failed: {message}")]
    Processing {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl CleanError {
    /// Create a not-found error for an input path
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a processing error with context
    pub fn processing(message: impl Into<String>) -> Self {
        Self::Processing {
            message: message.into(),
            source: None,
        }
    }

    /// Create a processing error with source
    pub fn processing_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CleanError::NotFound { .. })
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            CleanError::NotFound { path } => {
                format!("Error: the file '{}' was not found.", path)
            }
            CleanError::Processing { .. } => {
                let mut message = format!("An error occurred: {}", self);
                let mut source = std::error::Error::source(self);
                while let Some(cause) = source {
                    message.push_str(&format!(": {}", cause));
                    source = cause.source();
                }
                message
            }
            CleanError::Configuration { message } => {
                format!("Invalid configuration: {}", message)
            }
        }
    }
}

/// Result type alias for convenience
pub type CleanResult<T> = Result<T, CleanError>;

/// Error context for adding additional information
pub trait ErrorContext<T> {
    fn with_context(self, context: &str) -> CleanResult<T>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_context(self, context: &str) -> CleanResult<T> {
        self.map_err(|e| CleanError::processing_with_source(context, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_path() {
        let err = CleanError::not_found("stock_data.csv");
        assert!(err.is_not_found());
        assert_eq!(
            err.user_message(),
            "Error: the file 'stock_data.csv' was not found."
        );
    }

    #[test]
    fn test_processing_message_includes_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err: CleanResult<()> = Err(io).with_context("writing output");
        let err = err.unwrap_err();
        assert!(!err.is_not_found());
        let message = err.user_message();
        assert!(message.starts_with("An error occurred: Processing failed: writing output"));
        assert!(message.ends_with("disk full"));
    }
}
