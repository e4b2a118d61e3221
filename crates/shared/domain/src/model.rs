//! Cross-slice domain enums.
//!
//! Database rows keep these as plain strings; the conversion helpers here are
//! the single source of truth for the accepted spellings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account role. Chairs run conferences and the review process, everyone
/// else is an author.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Chair,
    #[default]
    Author,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chair => "Chair",
            Self::Author => "Author",
        }
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Chair" => Ok(Self::Chair),
            "Author" => Ok(Self::Author),
            other => Err(UnknownVariant { kind: "role", value: other.to_owned() }),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a submission from draft to a final verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmissionStatus {
    #[default]
    Draft,
    Submitted,
    UnderReview,
    Accepted,
    Rejected,
}

impl SubmissionStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Submitted => "Submitted",
            Self::UnderReview => "UnderReview",
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
        }
    }

    /// Legal status transitions.
    ///
    /// Drafts must be submitted before entering review, review starts when
    /// the first reviewer is assigned, and a verdict can be revised by
    /// pulling the submission back under review.
    #[must_use]
    pub const fn can_transition(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Submitted)
                | (Self::Submitted, Self::UnderReview)
                | (Self::UnderReview, Self::Accepted | Self::Rejected)
                | (Self::Accepted | Self::Rejected, Self::UnderReview)
        )
    }

    /// Whether a verdict has been recorded.
    #[must_use]
    pub const fn is_decided(self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }
}

impl FromStr for SubmissionStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Draft" => Ok(Self::Draft),
            "Submitted" => Ok(Self::Submitted),
            "UnderReview" => Ok(Self::UnderReview),
            "Accepted" => Ok(Self::Accepted),
            "Rejected" => Ok(Self::Rejected),
            other => Err(UnknownVariant { kind: "submission status", value: other.to_owned() }),
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final decision verdict. A strict subset of [`SubmissionStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Accepted,
    Rejected,
}

impl Verdict {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
        }
    }

    /// The submission status this verdict moves a submission into.
    #[must_use]
    pub const fn into_status(self) -> SubmissionStatus {
        match self {
            Self::Accepted => SubmissionStatus::Accepted,
            Self::Rejected => SubmissionStatus::Rejected,
        }
    }
}

impl FromStr for Verdict {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Accepted" => Ok(Self::Accepted),
            "Rejected" => Ok(Self::Rejected),
            other => Err(UnknownVariant { kind: "verdict", value: other.to_owned() }),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse failure for one of the domain enums.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: {}", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_strings() {
        for status in [
            SubmissionStatus::Draft,
            SubmissionStatus::Submitted,
            SubmissionStatus::UnderReview,
            SubmissionStatus::Accepted,
            SubmissionStatus::Rejected,
        ] {
            assert_eq!(status.as_str().parse::<SubmissionStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_transition_table() {
        use SubmissionStatus::*;

        assert!(Draft.can_transition(Submitted));
        assert!(Submitted.can_transition(UnderReview));
        assert!(UnderReview.can_transition(Accepted));
        assert!(UnderReview.can_transition(Rejected));
        assert!(Accepted.can_transition(UnderReview));
        assert!(Rejected.can_transition(UnderReview));

        assert!(!Draft.can_transition(UnderReview));
        assert!(!Draft.can_transition(Accepted));
        assert!(!Submitted.can_transition(Accepted));
        assert!(!Accepted.can_transition(Rejected));
        assert!(!Rejected.can_transition(Draft));
        assert!(!Submitted.can_transition(Submitted));
    }

    #[test]
    fn test_verdict_maps_to_status() {
        assert_eq!(Verdict::Accepted.into_status(), SubmissionStatus::Accepted);
        assert_eq!(Verdict::Rejected.into_status(), SubmissionStatus::Rejected);
    }

    #[test]
    fn test_unknown_variant_errors() {
        assert!("chair".parse::<Role>().is_err());
        assert!("Withdrawn".parse::<SubmissionStatus>().is_err());
    }
}
