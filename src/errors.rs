use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::form::DecodeError;
use crate::provider::TypeToken;

/// Step of the execution pipeline an invocation is in.
///
/// Every step may fail terminally; no step is retried.
/// [ExecuteError::phase] reports where a failed invocation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Resolving,
    Binding,
    Permission,
    Invoking,
    Enveloping,
    Done,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Resolving => "resolving",
            Phase::Binding => "binding",
            Phase::Permission => "permission",
            Phase::Invoking => "invoking",
            Phase::Enveloping => "enveloping",
            Phase::Done => "done",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configuration problem in the action wiring.
///
/// These are developer errors, not user errors: they should be caught
/// at startup by [validate](crate::manager::ActionManager::validate)
/// and are logged loudly if they surface on a request instead.
#[derive(Debug, Error)]
pub enum WiringError {
    #[error("no provider registered for context type `{0}`")]
    MissingProvider(TypeToken),

    #[error("no identifier converter registered for resource `{0}`")]
    MissingIdentifierMapper(Arc<str>),

    #[error("action declared a path identifier parameter but its resource does not carry one")]
    NoPathIdentifier,

    #[error("identifier for `{resource}` does not deserialize to the handler's type: {source}")]
    IdentifierShape {
        resource: Arc<str>,
        #[source]
        source: serde_json::Error,
    },
}

/// Wiring validation report; lists every missing piece found.
#[derive(Debug, Error)]
#[error("invalid wiring ({} problems found)", .0.len())]
pub struct InvalidWiring(pub(crate) Vec<WiringError>);

impl InvalidWiring {
    pub fn problems(&self) -> &[WiringError] {
        &self.0
    }
}

/// A malformed request; surfaced to the caller as a bad-request
/// condition, never a crash.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("identifier is for resource `{actual}`, expected `{expected}`")]
    IdentifierTypeMismatch {
        actual: Arc<str>,
        expected: Arc<str>,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("request body is required for this action")]
    MissingBody,
}

/// No action matched the request.
///
/// Externally opaque: an unknown path, an unsupported method, a path
/// segment the identifier converter rejected, and a denied permission
/// predicate all produce this same error, so callers cannot probe for
/// the existence of guarded resources. The internal reason is kept for
/// diagnostics.
#[derive(Debug, Error)]
#[error("not found")]
pub struct NotFound {
    pub(crate) reason: NotFoundReason,
}

impl NotFound {
    pub(crate) fn new(reason: NotFoundReason) -> Self {
        NotFound { reason }
    }

    pub(crate) fn reason(&self) -> NotFoundReason {
        self.reason
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NotFoundReason {
    UnknownRoute,
    MethodNotAllowed,
    InvalidIdentifier,
    PermissionDenied,
}

/// An opaque failure from a user handler.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct HandlerError(#[from] anyhow::Error);

impl HandlerError {
    pub fn new<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
        Self(anyhow::Error::new(err))
    }
}

/// Everything that can go wrong between resolving a request and
/// returning its envelope.
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error(transparent)]
    NotFound(#[from] NotFound),

    #[error("bad request: {0}")]
    BadRequest(#[from] RequestError),

    #[error("wiring error: {0}")]
    Wiring(#[from] WiringError),

    #[error("action failed: {0}")]
    Handler(#[from] HandlerError),
}

impl ExecuteError {
    /// The pipeline step this failure belongs to.
    pub fn phase(&self) -> Phase {
        match self {
            ExecuteError::NotFound(not_found) => match not_found.reason {
                NotFoundReason::UnknownRoute | NotFoundReason::MethodNotAllowed => Phase::Resolving,
                NotFoundReason::InvalidIdentifier => Phase::Binding,
                NotFoundReason::PermissionDenied => Phase::Permission,
            },
            ExecuteError::BadRequest(_) | ExecuteError::Wiring(_) => Phase::Binding,
            ExecuteError::Handler(_) => Phase::Invoking,
        }
    }

    /// Whether this failure is a configuration problem that should be
    /// loud, as opposed to an expected request-time condition.
    pub fn is_wiring(&self) -> bool {
        matches!(self, ExecuteError::Wiring(_))
    }
}

impl From<Infallible> for ExecuteError {
    fn from(value: Infallible) -> Self {
        match value {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_externally_opaque() {
        let unknown = NotFound::new(NotFoundReason::UnknownRoute);
        let denied = NotFound::new(NotFoundReason::PermissionDenied);
        assert_eq!(unknown.to_string(), denied.to_string());
        assert_ne!(unknown.reason(), denied.reason());
    }

    #[test]
    fn errors_report_their_pipeline_phase() {
        let err = ExecuteError::from(NotFound::new(NotFoundReason::MethodNotAllowed));
        assert_eq!(err.phase(), Phase::Resolving);

        let err = ExecuteError::from(NotFound::new(NotFoundReason::PermissionDenied));
        assert_eq!(err.phase(), Phase::Permission);

        let err = ExecuteError::from(RequestError::MissingBody);
        assert_eq!(err.phase(), Phase::Binding);

        let err = ExecuteError::from(WiringError::NoPathIdentifier);
        assert_eq!(err.phase(), Phase::Binding);
    }

    #[test]
    fn wiring_errors_are_flagged_as_loud() {
        let err = ExecuteError::from(WiringError::MissingProvider(TypeToken::of::<String>()));
        assert!(err.is_wiring());
        assert!(!ExecuteError::from(RequestError::MissingBody).is_wiring());
    }
}
