use std::fmt;

use thiserror::Error;

/// Boxed transport failure from a [`crate::PageFetcher`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Why a recipe could not be extracted. Each message is written for the end user.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid recipe URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("recipe page not found, please check the URL")]
    NotFound { url: String },

    #[error("this site blocked our request, try entering the recipe manually")]
    Blocked { url: String },

    #[error("could not access the recipe page (HTTP {status})")]
    UnexpectedStatus { status: u16, url: String },

    #[error("could not access the recipe page: {source}")]
    Transport {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error(
        "this site doesn't support automatic import yet; support for more sites is coming, \
         so try a different recipe site or enter the recipe manually"
    )]
    NoStructuredData,

    #[error(
        "could not find recipe data on this page; the page may not contain a recipe, \
         or uses an unsupported format"
    )]
    RecipeNotFound,
}

/// Coarse classification of an [`ExtractError`] for callers that branch on outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidUrl,
    NotFound,
    Blocked,
    /// Any other non-success status, or a transport-level failure.
    FetchFailed,
    NoStructuredData,
    RecipeNotFound,
}

impl ExtractError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractError::InvalidUrl { .. } => ErrorKind::InvalidUrl,
            ExtractError::NotFound { .. } => ErrorKind::NotFound,
            ExtractError::Blocked { .. } => ErrorKind::Blocked,
            ExtractError::UnexpectedStatus { .. } | ExtractError::Transport { .. } => {
                ErrorKind::FetchFailed
            }
            ExtractError::NoStructuredData => ErrorKind::NoStructuredData,
            ExtractError::RecipeNotFound => ErrorKind::RecipeNotFound,
        }
    }

    /// The HTTP status that caused the failure, when one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ExtractError::NotFound { .. } => Some(404),
            ExtractError::Blocked { .. } => Some(403),
            ExtractError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The error returned at the pipeline boundary: a classified [`ExtractError`]
/// displayed as `extraction failed: <reason>`.
///
/// `source()` skips the reason and exposes the originating cause directly, so a
/// chained report does not print the reason twice.
#[derive(Debug)]
pub struct ExtractionError {
    reason: ExtractError,
}

impl ExtractionError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.reason.kind()
    }

    #[must_use]
    pub fn reason(&self) -> &ExtractError {
        &self.reason
    }

    #[must_use]
    pub fn into_reason(self) -> ExtractError {
        self.reason
    }
}

impl From<ExtractError> for ExtractionError {
    fn from(reason: ExtractError) -> Self {
        Self { reason }
    }
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "extraction failed: {}", self.reason)
    }
}

impl std::error::Error for ExtractionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.reason)
    }
}
