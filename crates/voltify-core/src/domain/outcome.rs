//! Outcomes and the overlay error taxonomy.
//!
//! [`Outcome`] exists for observability only: recording one has no side
//! effect.  [`OverlayError`] is what an overlay host reports when a start or
//! stop request does not go through.

use std::fmt;

use thiserror::Error;

/// Why an event was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The host application's active flag was false (or absent).
    AppInactive,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AppInactive => f.write_str("app inactive"),
        }
    }
}

/// Errors reported by an overlay host.
///
/// `StopNoop` is part of the taxonomy so that hosts which report "not
/// running" as an error can still be used, but it is never a failure: see
/// [`OverlayError::is_benign`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverlayError {
    /// The overlay host cannot be reached or refuses to start.
    #[error("overlay service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The platform denied the foreground start (permissions, background
    /// execution limits).
    #[error("overlay start rejected: {0}")]
    StartRejected(String),

    /// Stop was requested while the overlay host was not running.
    #[error("overlay service not running")]
    StopNoop,
}

impl OverlayError {
    /// Returns `true` for errors that must be classified as success.
    pub const fn is_benign(&self) -> bool {
        matches!(self, Self::StopNoop)
    }
}

/// The result of handling one power event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A command was produced and (after dispatch) accepted by the host.
    Dispatched,
    /// The event was suppressed; no command was produced.
    Ignored(IgnoreReason),
    /// A command was produced but the host failed to carry it out.
    Failed(OverlayError),
}

impl Outcome {
    pub const fn is_dispatched(&self) -> bool {
        matches!(self, Self::Dispatched)
    }

    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Classifies the result of a dispatch step.
    ///
    /// Benign errors (`StopNoop`) count as `Dispatched`.
    pub fn from_dispatch(result: Result<(), OverlayError>) -> Self {
        match result {
            Ok(()) => Self::Dispatched,
            Err(e) if e.is_benign() => Self::Dispatched,
            Err(e) => Self::Failed(e),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dispatched => f.write_str("dispatched"),
            Self::Ignored(reason) => write!(f, "ignored: {reason}"),
            Self::Failed(cause) => write!(f, "failed: {cause}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignore_reason_displays_app_inactive() {
        assert_eq!(IgnoreReason::AppInactive.to_string(), "app inactive");
    }

    #[test]
    fn test_only_stop_noop_is_benign() {
        assert!(OverlayError::StopNoop.is_benign());
        assert!(!OverlayError::ServiceUnavailable("gone".into()).is_benign());
        assert!(!OverlayError::StartRejected("denied".into()).is_benign());
    }

    #[test]
    fn test_from_dispatch_classifies_stop_noop_as_dispatched() {
        // Arrange / Act
        let outcome = Outcome::from_dispatch(Err(OverlayError::StopNoop));

        // Assert
        assert_eq!(outcome, Outcome::Dispatched);
    }

    #[test]
    fn test_from_dispatch_keeps_real_failures() {
        let cause = OverlayError::StartRejected("background start not allowed".into());
        let outcome = Outcome::from_dispatch(Err(cause.clone()));
        assert_eq!(outcome, Outcome::Failed(cause));
        assert!(outcome.is_failed());
        assert!(!outcome.is_dispatched());
    }

    #[test]
    fn test_outcome_display_includes_reason_and_cause() {
        assert_eq!(Outcome::Dispatched.to_string(), "dispatched");
        assert_eq!(
            Outcome::Ignored(IgnoreReason::AppInactive).to_string(),
            "ignored: app inactive"
        );
        assert_eq!(
            Outcome::Failed(OverlayError::ServiceUnavailable("no such program".into())).to_string(),
            "failed: overlay service unavailable: no such program"
        );
    }
}
