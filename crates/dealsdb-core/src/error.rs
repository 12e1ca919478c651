use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read translations file {path}: {source}")]
    TranslationsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse translations file: {0}")]
    TranslationsFileParse(#[from] serde_yaml::Error),

    #[error("translations validation failed: {0}")]
    Validation(String),
}
