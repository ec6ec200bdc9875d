//! Name → e-mail directory with an explicit cross-role merge policy.

use std::collections::HashMap;

use serde::Serialize;

use crate::config::MergePrefer;
use crate::model::{Origin, ReviewRow};

/// A name both roles supplied an address for, with differing values.
#[derive(Debug, Clone, Serialize)]
pub struct Collision {
    pub name: String,
    pub kept: String,
    pub dropped: String,
    /// Role whose address won under the merge policy.
    pub winner: Origin,
}

#[derive(Debug, Clone, Default)]
pub struct EmailDirectory {
    entries: HashMap<String, String>,
    collisions: Vec<Collision>,
}

impl EmailDirectory {
    /// Merge reviewer → address pairs from both roles.
    ///
    /// Within a role, a repeated name keeps the last address seen (duplicate
    /// submissions are not deduplicated upstream either). Across roles, the
    /// configured policy decides and differing values are recorded as
    /// collisions.
    pub fn build(students: &[ReviewRow], mentors: &[ReviewRow], prefer: MergePrefer) -> Self {
        let mut dir = Self::default();

        for row in students {
            dir.entries
                .insert(row.reviewer.clone(), row.reviewer_email.clone());
        }

        for row in mentors {
            match dir.entries.get(&row.reviewer).cloned() {
                Some(existing) if existing != row.reviewer_email => {
                    let (kept, dropped, winner) = match prefer {
                        MergePrefer::Mentors => {
                            (row.reviewer_email.clone(), existing, Origin::Mentors)
                        }
                        MergePrefer::Students => {
                            (existing, row.reviewer_email.clone(), Origin::Students)
                        }
                    };
                    dir.collisions.push(Collision {
                        name: row.reviewer.clone(),
                        kept: kept.clone(),
                        dropped,
                        winner,
                    });
                    dir.entries.insert(row.reviewer.clone(), kept);
                }
                _ => {
                    dir.entries
                        .insert(row.reviewer.clone(), row.reviewer_email.clone());
                }
            }
        }

        dir
    }

    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }
}
