pub use masterror::{AppError, AppResult};

/// Create file read error
pub fn file_read_error(path: &str, source: std::io::Error) -> AppError {
    AppError::internal(format!("Failed to read file '{}': {}", path, source))
}

/// Create document parse error
///
/// Malformed input is never replaced by an empty document, so the message
/// always names the offending file and the parser position.
pub fn document_parse_error(path: &str, source: serde_json::Error) -> AppError {
    AppError::bad_request(format_document_error(path, &source))
}

/// Create baseline write error
pub fn baseline_write_error(path: &str, message: impl std::fmt::Display) -> AppError {
    AppError::internal(format!("Failed to write baseline '{}': {}", path, message))
}

/// Create config error
pub fn config_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(message.into())
}

fn format_document_error(path: &str, source: &serde_json::Error) -> String {
    // serde_json reports line 0 for errors that are not tied to a position
    if source.line() > 0 {
        format!(
            "Invalid JSON in '{}' at line {}, column {}:\n  {}",
            path,
            source.line(),
            source.column(),
            source
        )
    } else {
        format!("Invalid JSON in '{}':\n  {}", path, source)
    }
}
