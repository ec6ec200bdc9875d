use std::collections::HashMap;

use serde::Serialize;

use crate::directory::{Collision, EmailDirectory};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Which party authored a review record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Students,
    Mentors,
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Students => write!(f, "students"),
            Self::Mentors => write!(f, "mentors"),
        }
    }
}

/// Which party receives a composed notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    Students,
    Mentors,
}

impl std::fmt::Display for Recipient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Students => write!(f, "students"),
            Self::Mentors => write!(f, "mentors"),
        }
    }
}

/// A single normalized row from either role's CSV.
///
/// `reviewer` is the submission's author, `reviewee` the counterpart the
/// review is about. For a student-origin row the reviewer is the student and
/// the reviewee the mentor; mentor-origin rows are the mirror image.
#[derive(Debug, Clone)]
pub struct ReviewRow {
    pub origin: Origin,
    pub reviewer: String,
    pub reviewer_email: String,
    pub reviewee: String,
    pub good: String,
    pub improve: String,
    pub score: String,
    pub additional: String,
    pub raw_fields: HashMap<String, String>,
}

impl ReviewRow {
    /// The student named by this row, regardless of origin.
    pub fn student(&self) -> &str {
        match self.origin {
            Origin::Students => &self.reviewer,
            Origin::Mentors => &self.reviewee,
        }
    }

    /// The mentor named by this row, regardless of origin.
    pub fn mentor(&self) -> &str {
        match self.origin {
            Origin::Students => &self.reviewee,
            Origin::Mentors => &self.reviewer,
        }
    }
}

/// Pre-loaded records for both roles.
pub struct ReconInput {
    pub students: Vec<ReviewRow>,
    pub mentors: Vec<ReviewRow>,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ReconSummary {
    /// Distinct student reviewers seen vs the cohort target.
    pub student_reviews: usize,
    pub student_target: usize,
    /// Distinct mentor reviewers seen vs the cohort target.
    pub mentor_reviews: usize,
    pub mentor_target: usize,
    /// Raw mentor-set row count (mentors review several students each).
    pub mentor_rows: usize,
    /// Sorted; participants whose counterpart never submitted.
    pub students_without_mentor_review: Vec<String>,
    pub mentors_without_student_review: Vec<String>,
    pub retained_student_rows: usize,
    pub retained_mentor_rows: usize,
    /// Directory entries that were contested between the two roles.
    pub collisions: Vec<Collision>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}

pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    /// Student-origin rows whose pair is reciprocated.
    pub students: Vec<ReviewRow>,
    /// Mentor-origin rows surviving the configured mentor-set filter.
    pub mentors: Vec<ReviewRow>,
    pub directory: EmailDirectory,
}
