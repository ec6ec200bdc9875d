use serde::Deserialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RunConfig {
    pub name: String,
    pub cohort: CohortConfig,
    #[serde(default)]
    pub merge: MergeConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    pub roles: RolesConfig,
    pub delivery: DeliveryConfig,
}

// ---------------------------------------------------------------------------
// Cohort
// ---------------------------------------------------------------------------

/// Expected participation targets, used only for operator reporting.
#[derive(Debug, Clone, Deserialize)]
pub struct CohortConfig {
    pub mentors: usize,
    pub students: usize,
}

// ---------------------------------------------------------------------------
// Merge policy
// ---------------------------------------------------------------------------

/// Which role's address wins when both submitted one for the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePrefer {
    Students,
    Mentors,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MergeConfig {
    #[serde(default = "default_prefer")]
    pub prefer: MergePrefer,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self { prefer: default_prefer() }
    }
}

fn default_prefer() -> MergePrefer {
    MergePrefer::Mentors
}

// ---------------------------------------------------------------------------
// Mentor-set filter key
// ---------------------------------------------------------------------------

/// Which identity the mentor set is filtered by once the exclusion set of
/// unreciprocated mentors is known.
///
/// The exclusion set holds mentor names. `Reviewer` drops mentor rows by
/// that same identity; the default `Reviewee` drops by the row's student
/// column instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentorRowFilter {
    Reviewee,
    Reviewer,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    #[serde(default = "default_mentor_rows_by")]
    pub mentor_rows_by: MentorRowFilter,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self { mentor_rows_by: default_mentor_rows_by() }
    }
}

fn default_mentor_rows_by() -> MentorRowFilter {
    MentorRowFilter::Reviewee
}

// ---------------------------------------------------------------------------
// Roles + column mapping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct RolesConfig {
    pub students: RoleConfig,
    pub mentors: RoleConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleConfig {
    pub file: String,
    pub columns: ColumnMapping,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnMapping {
    pub reviewer: String,
    pub email: String,
    pub reviewee: String,
    pub good: String,
    pub improve: String,
    pub score: String,
    pub additional: String,
}

impl ColumnMapping {
    /// Mapped column names in a fixed order, for validation.
    pub fn names(&self) -> [(&'static str, &str); 7] {
        [
            ("reviewer", &self.reviewer),
            ("email", &self.email),
            ("reviewee", &self.reviewee),
            ("good", &self.good),
            ("improve", &self.improve),
            ("score", &self.score),
            ("additional", &self.additional),
        ]
    }
}

// ---------------------------------------------------------------------------
// Delivery
// ---------------------------------------------------------------------------

/// Fixed per-run sender and subject.
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryConfig {
    pub from: String,
    pub subject: String,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl RunConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: RunConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.cohort.mentors == 0 || self.cohort.students == 0 {
            return Err(ReconError::ConfigValidation(
                "cohort targets must be non-zero".into(),
            ));
        }

        for (role_name, role) in [("students", &self.roles.students), ("mentors", &self.roles.mentors)] {
            if role.file.is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "role '{role_name}': file must not be empty"
                )));
            }
            for (field, column) in role.columns.names() {
                if column.is_empty() {
                    return Err(ReconError::ConfigValidation(format!(
                        "role '{role_name}': column mapping '{field}' must not be empty"
                    )));
                }
            }
        }

        if self.delivery.from.is_empty() {
            return Err(ReconError::ConfigValidation(
                "delivery.from must not be empty".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
