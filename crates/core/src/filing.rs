//! Filing lifecycle states and transition rules.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Status values for a tax filing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    Draft,
    InReview,
    Filed,
    Rejected,
}

impl FilingStatus {
    /// Parse a status string from the database.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "draft" => Ok(Self::Draft),
            "in_review" => Ok(Self::InReview),
            "filed" => Ok(Self::Filed),
            "rejected" => Ok(Self::Rejected),
            _ => Err(CoreError::validation(format!(
                "Invalid filing status '{s}'. Must be one of: draft, in_review, filed, rejected"
            ))),
        }
    }

    /// Convert to a database-compatible string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::InReview => "in_review",
            Self::Filed => "filed",
            Self::Rejected => "rejected",
        }
    }

    /// Whether a filing may move from `self` to `next`.
    ///
    /// Draft filings go into review; reviewed filings are filed or rejected;
    /// rejected filings may be resubmitted for review. `filed` is terminal.
    pub fn can_transition(self, next: FilingStatus) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::InReview)
                | (Self::InReview, Self::Filed)
                | (Self::InReview, Self::Rejected)
                | (Self::Rejected, Self::InReview)
        )
    }
}
