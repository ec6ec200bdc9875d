use std::collections::{BTreeSet, HashMap, HashSet};

use crate::config::{MentorRowFilter, RunConfig};
use crate::directory::EmailDirectory;
use crate::error::ReconError;
use crate::model::{Origin, ReconInput, ReconMeta, ReconResult, ReconSummary, ReviewRow};

/// Reconcile both review sets: build the e-mail directory, compute the
/// exclusion sets of participants whose counterpart never submitted, and
/// drop non-reciprocated rows.
pub fn reconcile(config: &RunConfig, input: ReconInput) -> ReconResult {
    let directory =
        EmailDirectory::build(&input.students, &input.mentors, config.merge.prefer);

    // Distinct reviewer names per role.
    let student_reviewers: HashSet<&str> =
        input.students.iter().map(|r| r.reviewer.as_str()).collect();
    let mentor_reviewers: HashSet<&str> =
        input.mentors.iter().map(|r| r.reviewer.as_str()).collect();

    // Counterpart columns: who each role's rows are about.
    let students_reviewed_by_mentors: HashSet<&str> =
        input.mentors.iter().map(|r| r.reviewee.as_str()).collect();
    let mentors_reviewed_by_students: HashSet<&str> =
        input.students.iter().map(|r| r.reviewee.as_str()).collect();

    // BTreeSet so reporting and filtering order is stable.
    let students_without_mentor_review: BTreeSet<String> = student_reviewers
        .iter()
        .filter(|name| !students_reviewed_by_mentors.contains(*name))
        .map(|name| name.to_string())
        .collect();
    let mentors_without_student_review: BTreeSet<String> = mentor_reviewers
        .iter()
        .filter(|name| !mentors_reviewed_by_students.contains(*name))
        .map(|name| name.to_string())
        .collect();

    let student_reviews = student_reviewers.len();
    let mentor_reviews = mentor_reviewers.len();
    let mentor_rows = input.mentors.len();

    let students: Vec<ReviewRow> = input
        .students
        .into_iter()
        .filter(|row| !students_without_mentor_review.contains(row.reviewer.as_str()))
        .collect();

    // The exclusion set holds mentor names, yet the default keys this filter
    // by the row's student column; `mentor_rows_by` selects the identity.
    let mentors: Vec<ReviewRow> = input
        .mentors
        .into_iter()
        .filter(|row| {
            let key = match config.filter.mentor_rows_by {
                MentorRowFilter::Reviewee => row.reviewee.as_str(),
                MentorRowFilter::Reviewer => row.reviewer.as_str(),
            };
            !mentors_without_student_review.contains(key)
        })
        .collect();

    let summary = ReconSummary {
        student_reviews,
        student_target: config.cohort.students,
        mentor_reviews,
        mentor_target: config.cohort.mentors,
        mentor_rows,
        students_without_mentor_review: students_without_mentor_review.into_iter().collect(),
        mentors_without_student_review: mentors_without_student_review.into_iter().collect(),
        retained_student_rows: students.len(),
        retained_mentor_rows: mentors.len(),
        collisions: directory.collisions().to_vec(),
    };

    ReconResult {
        meta: ReconMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        students,
        mentors,
        directory,
    }
}

/// Load one role's CSV into ReviewRows, applying the config's column mapping.
pub fn load_csv_rows(
    origin: Origin,
    csv_data: &str,
    role_config: &crate::config::RoleConfig,
) -> Result<Vec<ReviewRow>, ReconError> {
    let role_name = origin.to_string();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ReconError::Csv { role: role_name.clone(), message: e.to_string() })?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let col = &role_config.columns;

    let idx = |name: &str| -> Result<usize, ReconError> {
        headers.iter().position(|h| h == name).ok_or_else(|| {
            ReconError::MissingColumn {
                role: role_name.clone(),
                column: name.into(),
            }
        })
    };

    let reviewer_idx = idx(&col.reviewer)?;
    let email_idx = idx(&col.email)?;
    let reviewee_idx = idx(&col.reviewee)?;
    let good_idx = idx(&col.good)?;
    let improve_idx = idx(&col.improve)?;
    let score_idx = idx(&col.score)?;
    let additional_idx = idx(&col.additional)?;

    let mut rows = Vec::new();

    for record in reader.records() {
        let record = record
            .map_err(|e| ReconError::Csv { role: role_name.clone(), message: e.to_string() })?;

        let field = |i: usize| record.get(i).unwrap_or("").to_string();

        let mut raw_fields = HashMap::new();
        for (i, h) in headers.iter().enumerate() {
            if let Some(val) = record.get(i) {
                raw_fields.insert(h.clone(), val.to_string());
            }
        }

        rows.push(ReviewRow {
            origin,
            reviewer: field(reviewer_idx),
            reviewer_email: field(email_idx),
            reviewee: field(reviewee_idx),
            good: field(good_idx),
            improve: field(improve_idx),
            score: field(score_idx),
            additional: field(additional_idx),
            raw_fields,
        });
    }

    Ok(rows)
}
