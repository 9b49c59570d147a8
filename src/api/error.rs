use {reqwest::StatusCode, thiserror::Error as ThisError};

#[derive(ThisError, Debug)]
pub enum SentryError {
    #[error("transport error: {0}")]
    Transport(reqwest::Error),

    #[error("invalid config: {0}")]
    Config(&'static str),

    #[error("json parse error: {0}")]
    ResponseJsonParse(serde_json::Error),

    #[error("api error: status={status} detail={detail}")]
    Api { status: StatusCode, detail: String },

    #[error("BaseUrlIntoUrl: {0}")]
    BaseUrlIntoUrl(reqwest::Error),

    #[error("building client: {0}")]
    BuildClient(reqwest::Error),
}

impl SentryError {
    /// Status code of the failed response, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(err) => err.status(),
            _ => None,
        }
    }
}

pub type SentryResult<T> = Result<T, SentryError>;
