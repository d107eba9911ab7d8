use thiserror::Error;

use crate::domain::LeagueCode;

/// Configuration-related errors with structured variants.
///
/// Raised at load or adapter-construction time, never during a run.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("missing API key for {source_name}: set {env}")]
    MissingApiKey {
        source_name: &'static str,
        env: &'static str,
    },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Errors produced by a single source adapter call.
///
/// The orchestrator only distinguishes retryable from terminal; callers
/// wanting retry-with-backoff layer it externally.
#[derive(Error, Debug, Clone)]
pub enum SourceError {
    #[error("rate limit exceeded")]
    RateLimited { retry_after: Option<u64> },

    #[error("bad request ({status}): {message}")]
    BadRequest { status: u16, message: String },

    #[error("request timed out: {url}")]
    Timeout { url: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Format(String),

    #[error("unknown league code {code} for {source_name}")]
    UnknownLeague {
        source_name: &'static str,
        code: LeagueCode,
    },
}

impl SourceError {
    /// Whether a later retry of the same call could plausibly succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SourceError::RateLimited { .. }
                | SourceError::Timeout { .. }
                | SourceError::Transport(_)
        )
    }
}

/// A per-source failure recorded in a run summary.
#[derive(Debug, Clone)]
pub struct SourceFailure {
    /// Adapter name the failure came from.
    pub source: String,
    pub error: SourceError,
}

impl SourceFailure {
    pub fn new(source: impl Into<String>, error: SourceError) -> Self {
        Self {
            source: source.into(),
            error,
        }
    }
}

impl std::fmt::Display for SourceFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.source, self.error)
    }
}

/// Persistence-layer errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("query failed: {0}")]
    Query(#[from] diesel::result::Error),

    #[error("migrations failed: {0}")]
    Migration(String),

    #[error("corrupt row: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// True when the underlying query failed on a uniqueness constraint.
    ///
    /// The reconciler treats this as "already exists" for natural-key
    /// inserts that raced with a concurrent run.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StoreError::Query(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            ))
        )
    }
}

/// Terminal pipeline failures.
///
/// Individual source failures never surface here; they are folded into the
/// run summary. A `PipelineError` means the run as a whole could not produce
/// a usable result.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("all sources failed during {stage} for {league}")]
    AllSourcesFailed {
        league: LeagueCode,
        stage: &'static str,
        failures: Vec<SourceFailure>,
    },

    #[error("odds source not configured")]
    OddsSourceNotConfigured,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;
