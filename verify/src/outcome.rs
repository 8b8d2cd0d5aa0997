use std::fmt;

/// Why a completed verification attempt denied the claim.
///
/// These are outcomes, not faults: the pipeline ran to completion and
/// the claim was evaluated. All of them block the downstream action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// No reference record exists for the claimed user.
    NotEnrolled,
    /// The top-ranked match carries a different identity.
    IdentityMismatch,
    /// The top match is the claimed user but the similarity score is
    /// below the configured threshold.
    LowConfidence,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotEnrolled => write!(f, "not_enrolled"),
            Self::IdentityMismatch => write!(f, "identity_mismatch"),
            Self::LowConfidence => write!(f, "low_confidence"),
        }
    }
}

/// Result of a completed verification attempt.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    /// True when the claim was verified.
    pub verified: bool,

    /// Set when the claim was rejected.
    pub reason: Option<RejectReason>,

    /// The top match's cosine similarity, kept for audit. Absent when
    /// no comparison took place (e.g. [`RejectReason::NotEnrolled`]).
    pub score: Option<f32>,
}

impl MatchOutcome {
    pub(crate) fn verified(score: f32) -> Self {
        Self {
            verified: true,
            reason: None,
            score: Some(score),
        }
    }

    pub(crate) fn rejected(reason: RejectReason, score: Option<f32>) -> Self {
        Self {
            verified: false,
            reason: Some(reason),
            score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reject_reason_display() {
        assert_eq!(RejectReason::NotEnrolled.to_string(), "not_enrolled");
        assert_eq!(
            RejectReason::IdentityMismatch.to_string(),
            "identity_mismatch"
        );
        assert_eq!(RejectReason::LowConfidence.to_string(), "low_confidence");
    }

    #[test]
    fn constructors() {
        let ok = MatchOutcome::verified(0.91);
        assert!(ok.verified);
        assert!(ok.reason.is_none());
        assert_eq!(ok.score, Some(0.91));

        let no = MatchOutcome::rejected(RejectReason::NotEnrolled, None);
        assert!(!no.verified);
        assert_eq!(no.reason, Some(RejectReason::NotEnrolled));
        assert!(no.score.is_none());
    }
}
