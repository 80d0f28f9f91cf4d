use thiserror::Error;

/// Main error type for Stratmap
#[derive(Error, Debug)]
pub enum StratmapError {
    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Graph payload parse errors
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Node id not present in the loaded graph
    #[error("Node not found: {0}")]
    NodeNotFound(String),
}

/// Convenient Result type using StratmapError
pub type Result<T> = std::result::Result<T, StratmapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StratmapError::Config("Test error".to_string());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("Test error"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: StratmapError = io_err.into();
        assert!(matches!(err, StratmapError::Io(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: StratmapError = json_err.into();
        assert!(matches!(err, StratmapError::Parse(_)));
    }

    #[test]
    fn test_node_not_found_names_the_node() {
        let err = StratmapError::NodeNotFound("theme_3".to_string());
        assert!(err.to_string().contains("theme_3"));
    }
}
