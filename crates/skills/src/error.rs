use jovhub_common::FromMessage;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("skill document must start with a --- frontmatter delimiter")]
    MissingFrontmatter,
    #[error("skill document is missing the closing --- frontmatter delimiter")]
    UnterminatedFrontmatter,
    #[error("missing required frontmatter field `{0}`")]
    MissingField(&'static str),
    #[error("invalid skill name '{0}': must be 1-64 lowercase alphanumeric/hyphen chars")]
    InvalidName(String),
    #[error("{message}")]
    Message { message: String },
}

impl Error {
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }
}

impl FromMessage for Error {
    fn from_message(message: String) -> Self {
        Self::Message { message }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

jovhub_common::impl_context!();
