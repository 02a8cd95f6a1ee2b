use thiserror::Error;

/// Outcome classification at the fetch boundary.
///
/// Callers currently collapse every variant into one user-facing message, but
/// the tag is kept so messaging can be differentiated later.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("request failed with status: {0}")]
    Status(reqwest::StatusCode),

    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to build request payload: {0}")]
    Payload(String),
}

impl FetchError {
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Network(_) => "network",
            FetchError::Status(_) => "status",
            FetchError::Parse(_) => "parse",
            FetchError::Payload(_) => "payload",
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session database error: {0}")]
    Database(String),

    #[error("session store lock poisoned")]
    Poisoned,
}

#[cfg(feature = "sqlite-session")]
impl From<rusqlite::Error> for SessionError {
    fn from(e: rusqlite::Error) -> Self {
        SessionError::Database(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_kinds() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        assert_eq!(FetchError::from(parse).kind(), "parse");
        assert_eq!(
            FetchError::Status(reqwest::StatusCode::UNAUTHORIZED).kind(),
            "status"
        );
        assert_eq!(FetchError::Payload("bad mime".to_string()).kind(), "payload");
    }

    #[test]
    fn test_status_error_message() {
        let err = FetchError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "request failed with status: 500 Internal Server Error"
        );
    }
}
