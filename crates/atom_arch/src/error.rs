//! Error types for model library loading and validation.

/// Errors that can occur when loading or validating a model library.
#[derive(Debug, thiserror::Error)]
pub enum ArchError {
    /// An I/O error occurred while reading the model file.
    #[error("failed to read model library: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse model library: {0}")]
    ParseError(String),

    /// Two models share the same name.
    #[error("duplicate model '{0}'")]
    DuplicateModel(String),

    /// Two ports of one model share the same name.
    #[error("model '{model}' declares port '{port}' more than once")]
    DuplicatePort {
        /// The model declaring the port.
        model: String,
        /// The repeated port name.
        port: String,
    },

    /// A port was declared with zero width.
    #[error("port '{port}' of model '{model}' has zero width")]
    ZeroWidth {
        /// The model declaring the port.
        model: String,
        /// The offending port name.
        port: String,
    },
}
