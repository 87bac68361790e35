use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Transport level error: {source}")]
    Transport {
        #[source]
        source: BoxError,
    },

    #[error("Jira returned wrong status: {status} {status_text}")]
    UnexpectedStatus {
        status: u16,
        status_text: String,
        body: String,
    },

    #[error("Invalid response format: {message}")]
    Decode {
        message: String,
        #[source]
        source: BoxError,
    },
}

impl ApiError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        ApiError::InvalidArgument {
            message: message.into(),
        }
    }

    pub(crate) fn decode(source: serde_json::Error) -> Self {
        ApiError::Decode {
            message: source.to_string(),
            source: Box::new(source),
        }
    }

    /// HTTP status carried by an `UnexpectedStatus` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body carried by an `UnexpectedStatus` error.
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::UnexpectedStatus { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn suggestion(&self) -> Option<&str> {
        match self {
            ApiError::InvalidConfiguration { .. } => {
                Some("Check that the base URL is absolute, e.g. https://example.atlassian.net")
            }
            ApiError::Transport { .. } => {
                Some("Check your network connection or try again later")
            }
            ApiError::UnexpectedStatus { status: 401, .. } => {
                Some("Verify the username and password or API token")
            }
            ApiError::UnexpectedStatus { status: 403, .. } => {
                Some("The account lacks permission for this board or sprint")
            }
            ApiError::UnexpectedStatus { status: 404, .. } => {
                Some("Check if the board or sprint ID is correct")
            }
            ApiError::UnexpectedStatus { status: 400, .. } => {
                Some("Review the JQL filter and field names")
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn unexpected(status: u16, body: &str) -> ApiError {
        ApiError::UnexpectedStatus {
            status,
            status_text: "Not Found".to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_unexpected_status_accessors() {
        let err = unexpected(404, r#"{"errorMessages":["Board does not exist"]}"#);
        assert_eq!(err.status(), Some(404));
        assert!(err.is_not_found());
        assert!(err.body().unwrap().contains("Board does not exist"));
        assert_eq!(err.to_string(), "Jira returned wrong status: 404 Not Found");
    }

    #[test]
    fn test_status_absent_for_other_variants() {
        let err = ApiError::invalid_argument("board id must not be empty");
        assert_eq!(err.status(), None);
        assert!(err.body().is_none());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_decode_keeps_source() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = ApiError::decode(json_err);
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("Invalid response format"));
    }

    #[test]
    fn test_suggestions() {
        assert!(unexpected(401, "").suggestion().unwrap().contains("password"));
        assert!(unexpected(404, "").suggestion().is_some());
        assert!(unexpected(500, "").suggestion().is_none());
    }
}
