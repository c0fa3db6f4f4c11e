// ABOUTME: Error types for filmfacts: field-level ExtractionError and the ScrapeError envelope.
// ABOUTME: ScrapeError carries an ErrorCode plus convenience constructors and boolean helpers.

use std::fmt;

/// A fatal failure while extracting a single field from a parsed page.
///
/// The variants separate "the markup we look for is not there" from "it is
/// there but the value makes no sense", which is what tells markup drift
/// apart from odd data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    /// No strategy located the element carrying the field.
    #[error("{field}: element not found ({detail})")]
    Missing { field: &'static str, detail: String },

    /// The element was found but its value could not be parsed.
    #[error("{field}: element found but value {value:?} is unparseable")]
    Unparseable { field: &'static str, value: String },

    /// The markup broke an assumption a strategy relies on.
    #[error("{field}: unexpected markup structure: {detail}")]
    Structure { field: &'static str, detail: String },
}

impl ExtractionError {
    pub fn missing(field: &'static str, detail: impl Into<String>) -> Self {
        ExtractionError::Missing {
            field,
            detail: detail.into(),
        }
    }

    pub fn unparseable(field: &'static str, value: impl Into<String>) -> Self {
        ExtractionError::Unparseable {
            field,
            value: value.into(),
        }
    }

    pub fn structure(field: &'static str, detail: impl Into<String>) -> Self {
        ExtractionError::Structure {
            field,
            detail: detail.into(),
        }
    }

    /// Name of the field that failed.
    pub fn field(&self) -> &'static str {
        match self {
            ExtractionError::Missing { field, .. }
            | ExtractionError::Unparseable { field, .. }
            | ExtractionError::Structure { field, .. } => field,
        }
    }
}

/// Error codes representing the different stages a scrape can fail in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidUrl,
    Fetch,
    Timeout,
    Cache,
    Extract,
    Listing,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidUrl => "invalid URL",
            ErrorCode::Fetch => "fetch error",
            ErrorCode::Timeout => "timeout",
            ErrorCode::Cache => "cache error",
            ErrorCode::Extract => "extraction error",
            ErrorCode::Listing => "unsupported listing",
        };
        write!(f, "{}", s)
    }
}

/// The error returned by the fetch/cache/extract orchestration.
#[derive(Debug, thiserror::Error)]
pub struct ScrapeError {
    pub code: ErrorCode,
    /// Movie id, URL, or listing name the operation was working on.
    pub target: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ScrapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "filmfacts: {} {}: {}", self.op, self.target, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ScrapeError {
    fn with_code(
        code: ErrorCode,
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            target: target.into(),
            op: op.into(),
            source,
        }
    }

    /// Create an InvalidUrl error.
    pub fn invalid_url(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::InvalidUrl, target, op, source)
    }

    /// Create a Fetch error.
    pub fn fetch(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Fetch, target, op, source)
    }

    /// Create a Timeout error.
    pub fn timeout(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Timeout, target, op, source)
    }

    /// Create a Cache error.
    pub fn cache(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Cache, target, op, source)
    }

    /// Wrap a field extraction failure.
    pub fn extract(target: impl Into<String>, err: ExtractionError) -> Self {
        Self::with_code(
            ErrorCode::Extract,
            target,
            "Extract",
            Some(anyhow::Error::new(err)),
        )
    }

    /// Create a Listing error for an unknown chart name.
    pub fn listing(target: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self::with_code(ErrorCode::Listing, target, "Chart", source)
    }

    /// The underlying field failure, when this is an Extract error.
    pub fn extraction(&self) -> Option<&ExtractionError> {
        self.source
            .as_ref()
            .and_then(|e| e.downcast_ref::<ExtractionError>())
    }

    /// Returns true if this is a Fetch error.
    pub fn is_fetch(&self) -> bool {
        self.code == ErrorCode::Fetch
    }

    /// Returns true if this is a Timeout error.
    pub fn is_timeout(&self) -> bool {
        self.code == ErrorCode::Timeout
    }

    /// Returns true if this is a Cache error.
    pub fn is_cache(&self) -> bool {
        self.code == ErrorCode::Cache
    }

    /// Returns true if this is an Extract error.
    pub fn is_extract(&self) -> bool {
        self.code == ErrorCode::Extract
    }

    /// Returns true if this is an InvalidUrl error.
    pub fn is_invalid_url(&self) -> bool {
        self.code == ErrorCode::InvalidUrl
    }

    /// Returns true if this is a Listing error.
    pub fn is_listing(&self) -> bool {
        self.code == ErrorCode::Listing
    }
}
