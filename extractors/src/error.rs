use std::path::PathBuf;

/// Problems with the pattern configuration. All of them are fatal.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read pattern source {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed pattern file {path:?}: {message}")]
    Malformed { path: PathBuf, message: String },

    #[error("{field} for partner {partner:?} is not a valid regex: {source}")]
    InvalidRegex {
        partner: String,
        field: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("{field} for partner {partner:?} needs exactly one capture group, found {groups}")]
    CaptureGroupCount {
        partner: String,
        field: &'static str,
        groups: usize,
    },
}

/// A captured value could not be turned into a timestamp.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("{field} time {value:?} does not match format {format:?}")]
    TimeFormat {
        field: &'static str,
        value: String,
        format: String,
    },
}
