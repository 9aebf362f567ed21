use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Date/time parsing failed: {0}")]
    DateTime(#[from] chrono::ParseError),

    /// The upstream answered, but not with the structure we expect.
    #[error("Unexpected upstream data: {0}")]
    UpstreamData(String),

    #[error("Upstream returned HTTP {status} for {url}")]
    UpstreamStatus { url: String, status: u16 },

    /// A caller-supplied index does not exist in the enumeration it refers to.
    #[error("{what} index {index} out of range (available: {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// A caller-supplied parameter is outside its accepted range.
    #[error("Invalid parameter: {0}")]
    InvalidInput(String),

    #[error("Network timeout")]
    Timeout,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::UpstreamData(message.into())
    }

    /// Failures caused by the upstream site: transport, status or content.
    pub const fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Http(_)
                | Self::Json(_)
                | Self::DateTime(_)
                | Self::UpstreamData(_)
                | Self::UpstreamStatus { .. }
                | Self::Timeout
        )
    }

    pub const fn is_client_input(&self) -> bool {
        matches!(self, Self::IndexOutOfRange { .. } | Self::InvalidInput(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
