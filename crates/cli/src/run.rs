//! `pairpost run` / `pairpost validate` — normalize, reconcile, compose,
//! dispatch.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Serialize;

use pairpost_mailer::{DryRunTransport, GmailTransport, OutgoingMessage, Transport};
use pairpost_recon::compose::SkippedRow;
use pairpost_recon::config::RoleConfig;
use pairpost_recon::model::{
    Origin, Recipient, ReconInput, ReconMeta, ReconSummary, ReviewRow,
};
use pairpost_recon::{compose, normalize_yo, reconcile, ReconError, RunConfig};

use crate::exit_codes::{mail_exit_code, recon_exit_code, EXIT_ERROR, EXIT_RECON_INPUT};
use crate::CliError;

/// Who gets notified this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Direction {
    Students,
    Mentors,
    Both,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Students => write!(f, "students"),
            Self::Mentors => write!(f, "mentors"),
            Self::Both => write!(f, "both"),
        }
    }
}

impl Direction {
    fn recipients(self) -> &'static [Recipient] {
        match self {
            Direction::Students => &[Recipient::Students],
            Direction::Mentors => &[Recipient::Mentors],
            Direction::Both => &[Recipient::Students, Recipient::Mentors],
        }
    }
}

fn recon_err(err: &ReconError) -> CliError {
    CliError { code: recon_exit_code(err), message: err.to_string(), hint: None }
}

fn input_err(msg: impl Into<String>) -> CliError {
    CliError { code: EXIT_RECON_INPUT, message: msg.into(), hint: None }
}

// ---------------------------------------------------------------------------
// JSON run report
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct DirectionReport {
    recipients: String,
    composed: usize,
    dispatched: usize,
    dry_run: bool,
    skipped: Vec<SkippedRow>,
}

#[derive(Serialize)]
struct RunReport {
    meta: ReconMeta,
    summary: ReconSummary,
    directions: Vec<DirectionReport>,
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

pub fn cmd_run(
    config_path: PathBuf,
    direction: Direction,
    send: bool,
    rewrite_inputs: bool,
    json_output: bool,
    output_file: Option<PathBuf>,
) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| input_err(format!("cannot read config: {e}")))?;
    let config = RunConfig::from_toml(&config_str).map_err(|e| recon_err(&e))?;

    // Resolve data files relative to the config file's directory
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));

    let students = load_role(base_dir, Origin::Students, &config.roles.students, rewrite_inputs)?;
    let mentors = load_role(base_dir, Origin::Mentors, &config.roles.mentors, rewrite_inputs)?;

    let result = reconcile(&config, ReconInput { students, mentors });
    print_summary(&result.summary);

    // Credentials are resolved up front so a misconfigured --send run fails
    // before any message is dispatched.
    let transport: Box<dyn Transport> = if send {
        Box::new(GmailTransport::from_saved_auth().map_err(|e| CliError {
            code: mail_exit_code(&e),
            message: e.to_string(),
            hint: Some("run `pairpost login` to store Gmail credentials".into()),
        })?)
    } else {
        Box::new(DryRunTransport)
    };

    let mut directions = Vec::new();
    for &recipient in direction.recipients() {
        // Each party receives the review the other party wrote about them:
        // student rows go to mentors, mentor rows to students.
        let rows: &[ReviewRow] = match recipient {
            Recipient::Students => &result.mentors,
            Recipient::Mentors => &result.students,
        };

        let out = compose(rows, &result.directory, recipient);
        for skip in &out.skipped {
            eprintln!("{} — e-mail not found, skipping", skip.recipient);
        }

        let mut dispatched = 0;
        for msg in &out.messages {
            let outgoing = OutgoingMessage {
                from: config.delivery.from.clone(),
                to: msg.to.clone(),
                subject: config.delivery.subject.clone(),
                body: msg.body.clone(),
            };
            let receipt = transport.send(&outgoing).map_err(|e| CliError {
                code: mail_exit_code(&e),
                message: format!("delivery to {} failed: {e}", outgoing.to),
                hint: None,
            })?;
            if send {
                eprintln!("sent to {} (id {})", outgoing.to, receipt.message_id);
            }
            dispatched += 1;
        }

        eprintln!(
            "to {}: {} composed, {} dispatched{}, {} skipped",
            recipient,
            out.messages.len(),
            dispatched,
            if send { "" } else { " (dry run)" },
            out.skipped.len(),
        );

        directions.push(DirectionReport {
            recipients: recipient.to_string(),
            composed: out.messages.len(),
            dispatched,
            dry_run: !send,
            skipped: out.skipped,
        });
    }

    if json_output || output_file.is_some() {
        let report = RunReport {
            meta: result.meta,
            summary: result.summary,
            directions,
        };
        let json_str = serde_json::to_string_pretty(&report).map_err(|e| CliError {
            code: EXIT_ERROR,
            message: format!("JSON serialization error: {e}"),
            hint: None,
        })?;

        if let Some(ref path) = output_file {
            std::fs::write(path, &json_str)
                .map_err(|e| input_err(format!("cannot write output: {e}")))?;
            eprintln!("wrote {}", path.display());
        }
        if json_output {
            println!("{json_str}");
        }
    }

    Ok(())
}

/// Read one role's file, fold ё → е, optionally persist the folded contents,
/// and parse rows.
fn load_role(
    base_dir: &Path,
    origin: Origin,
    role: &RoleConfig,
    rewrite: bool,
) -> Result<Vec<ReviewRow>, CliError> {
    let path = base_dir.join(&role.file);
    let raw = std::fs::read_to_string(&path)
        .map_err(|e| input_err(format!("cannot read {}: {e}", path.display())))?;

    let normalized = normalize_yo(&raw);
    if rewrite {
        if let Cow::Owned(ref contents) = normalized {
            std::fs::write(&path, contents)
                .map_err(|e| input_err(format!("cannot rewrite {}: {e}", path.display())))?;
            eprintln!("normalized {}", path.display());
        }
    }

    pairpost_recon::engine::load_csv_rows(origin, &normalized, role).map_err(|e| recon_err(&e))
}

fn print_summary(s: &ReconSummary) {
    eprintln!(
        "reviews from students: {} / {} ({} missing)",
        s.student_reviews,
        s.student_target,
        s.student_target.saturating_sub(s.student_reviews),
    );
    eprintln!(
        "reviews from mentors: {} / {} ({} missing), rows {} / {}",
        s.mentor_reviews,
        s.mentor_target,
        s.mentor_target.saturating_sub(s.mentor_reviews),
        s.mentor_rows,
        s.student_target,
    );
    if !s.students_without_mentor_review.is_empty() {
        eprintln!(
            "students without mentor review: {}",
            s.students_without_mentor_review.join(", ")
        );
    }
    if !s.mentors_without_student_review.is_empty() {
        eprintln!(
            "mentors without student review: {}",
            s.mentors_without_student_review.join(", ")
        );
    }
    for c in &s.collisions {
        eprintln!(
            "address collision for '{}': kept {} ({}), dropped {}",
            c.name, c.kept, c.winner, c.dropped
        );
    }
    eprintln!(
        "retained rows: {} student, {} mentor",
        s.retained_student_rows, s.retained_mentor_rows
    );
}

// ---------------------------------------------------------------------------
// Validate
// ---------------------------------------------------------------------------

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| input_err(format!("cannot read config: {e}")))?;

    match RunConfig::from_toml(&config_str) {
        Ok(config) => {
            eprintln!(
                "valid: '{}' — {} + {}, cohort {} mentor(s) / {} student(s)",
                config.name,
                config.roles.students.file,
                config.roles.mentors.file,
                config.cohort.mentors,
                config.cohort.students,
            );
            Ok(())
        }
        Err(e) => Err(recon_err(&e)),
    }
}
