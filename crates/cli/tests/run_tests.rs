// Integration tests for `pairpost run` / `pairpost validate`.
// Run with: cargo test -p pairpost-cli --test run_tests -- --nocapture

use std::path::{Path, PathBuf};
use std::process::Command;

fn pairpost() -> Command {
    Command::new(env!("CARGO_BIN_EXE_pairpost"))
}

const CONFIG: &str = r#"
name = "Test run"

[cohort]
mentors  = 3
students = 5

[roles.students]
file = "from_students.csv"
[roles.students.columns]
reviewer   = "student"
email      = "student_email"
reviewee   = "mentor"
good       = "good"
improve    = "improve"
score      = "score"
additional = "additional"

[roles.mentors]
file = "from_mentors.csv"
[roles.mentors.columns]
reviewer   = "mentor"
email      = "mentor_email"
reviewee   = "student"
good       = "good"
improve    = "improve"
score      = "score"
additional = "additional"

[delivery]
from    = "course@example.com"
subject = "Финальный отзыв"
"#;

const STUDENTS_CSV: &str = "\
student_email,student,mentor,good,improve,score,additional
anna@example.com,Анна,Виктор,Подробные ревью,Отвечать быстрее,9,Спасибо
egor@example.com,Егор,Галина,Хорошие задачи,Встречи почаще,7,
";

const MENTORS_CSV: &str = "\
mentor_email,mentor,student,good,improve,score,additional
victor@example.com,Виктор,Анна,Отличная архитектура,Больше тестов,9,Удачи
irina@example.com,Ирина,Жанна,Интересная идея,Довести до прототипа,6,
";

/// Write the standard fixture set into `dir`, returning the config path.
fn write_fixture(dir: &Path) -> PathBuf {
    std::fs::write(dir.join("from_students.csv"), STUDENTS_CSV).unwrap();
    std::fs::write(dir.join("from_mentors.csv"), MENTORS_CSV).unwrap();
    let config_path = dir.join("review.toml");
    std::fs::write(&config_path, CONFIG).unwrap();
    config_path
}

// ---------------------------------------------------------------------------
// Dry run
// ---------------------------------------------------------------------------

#[test]
fn dry_run_reports_and_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(dir.path());

    let output = pairpost()
        .args(["run", config.to_str().unwrap()])
        .output()
        .expect("pairpost run");

    assert!(output.status.success(), "exit code was {:?}", output.status);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("reviews from students: 2 / 5 (3 missing)"), "stderr: {stderr}");
    assert!(stderr.contains("reviews from mentors: 2 / 3 (1 missing), rows 2 / 5"));
    assert!(stderr.contains("students without mentor review: Егор"));
    assert!(stderr.contains("mentors without student review: Ирина"));
    // Жанна never submitted, so composing to students skips her row.
    assert!(stderr.contains("Жанна — e-mail not found, skipping"));
    // Dry run prints the would-be send instead of dispatching.
    assert!(stderr.contains("[dry-run] course@example.com -> anna@example.com"));
    assert!(stderr.contains("[dry-run] course@example.com -> victor@example.com"));
    assert!(stderr.contains("(dry run)"));

    // No --json: stdout stays empty.
    assert!(output.stdout.is_empty());
}

#[test]
fn json_report_carries_summary_and_directions() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(dir.path());

    let output = pairpost()
        .args(["run", config.to_str().unwrap(), "--json"])
        .output()
        .expect("pairpost run --json");

    assert!(output.status.success());

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid JSON on stdout");

    assert_eq!(report["summary"]["student_reviews"], 2);
    assert_eq!(report["summary"]["mentor_target"], 3);
    assert_eq!(report["summary"]["students_without_mentor_review"][0], "Егор");
    assert_eq!(report["summary"]["retained_student_rows"], 1);
    assert_eq!(report["summary"]["retained_mentor_rows"], 2);

    let directions = report["directions"].as_array().unwrap();
    assert_eq!(directions.len(), 2);
    assert_eq!(directions[0]["recipients"], "students");
    assert_eq!(directions[0]["composed"], 1);
    assert_eq!(directions[0]["dry_run"], true);
    assert_eq!(directions[0]["skipped"][0]["recipient"], "Жанна");
    assert_eq!(directions[1]["recipients"], "mentors");
    assert_eq!(directions[1]["composed"], 1);
}

#[test]
fn direction_flag_limits_dispatch() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(dir.path());

    let output = pairpost()
        .args(["run", config.to_str().unwrap(), "--direction", "mentors", "--json"])
        .output()
        .expect("pairpost run --direction mentors");

    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let directions = report["directions"].as_array().unwrap();
    assert_eq!(directions.len(), 1);
    assert_eq!(directions[0]["recipients"], "mentors");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("-> anna@example.com"), "students should not be notified");
}

#[test]
fn output_file_receives_report() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(dir.path());
    let report_path = dir.path().join("report.json");

    let output = pairpost()
        .args([
            "run",
            config.to_str().unwrap(),
            "--output",
            report_path.to_str().unwrap(),
        ])
        .output()
        .expect("pairpost run --output");

    assert!(output.status.success());
    assert!(output.stdout.is_empty(), "report goes to the file, not stdout");

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["summary"]["mentor_rows"], 2);
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

#[test]
fn rewrite_inputs_persists_yo_normalization() {
    let dir = tempfile::tempdir().unwrap();

    let students = "\
student_email,student,mentor,good,improve,score,additional
alena@example.com,Алёна,Семен,хорошо,лучше,9,
";
    let mentors = "\
mentor_email,mentor,student,good,improve,score,additional
semyon@example.com,Семён,Алена,молодец,продолжать,10,
";
    std::fs::write(dir.path().join("from_students.csv"), students).unwrap();
    std::fs::write(dir.path().join("from_mentors.csv"), mentors).unwrap();
    let config = dir.path().join("review.toml");
    std::fs::write(&config, CONFIG).unwrap();

    let output = pairpost()
        .args(["run", config.to_str().unwrap(), "--rewrite-inputs", "--json"])
        .output()
        .expect("pairpost run --rewrite-inputs");

    assert!(output.status.success());

    // The ё-spellings reconcile once both files are folded to е.
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["summary"]["retained_student_rows"], 1);
    assert_eq!(report["summary"]["retained_mentor_rows"], 1);

    let rewritten = std::fs::read_to_string(dir.path().join("from_mentors.csv")).unwrap();
    assert!(!rewritten.contains('ё') && !rewritten.contains('Ё'));
    assert!(rewritten.contains("Семен"));

    // Re-running is a no-op on already-normalized files.
    let again = pairpost()
        .args(["run", config.to_str().unwrap(), "--rewrite-inputs"])
        .output()
        .expect("second run");
    assert!(again.status.success());
    let stderr = String::from_utf8_lossy(&again.stderr);
    assert!(!stderr.contains("normalized "), "no rewrite expected: {stderr}");
}

#[test]
fn without_rewrite_flag_sources_stay_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(dir.path());

    let students = "\
student_email,student,mentor,good,improve,score,additional
alena@example.com,Алёна,Виктор,хорошо,лучше,9,
";
    std::fs::write(dir.path().join("from_students.csv"), students).unwrap();

    let output = pairpost()
        .args(["run", config.to_str().unwrap()])
        .output()
        .expect("pairpost run");
    assert!(output.status.success());

    let on_disk = std::fs::read_to_string(dir.path().join("from_students.csv")).unwrap();
    assert!(on_disk.contains("Алёна"), "source file must not be rewritten");
}

// ---------------------------------------------------------------------------
// Failure modes
// ---------------------------------------------------------------------------

#[test]
fn invalid_config_exits_3() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("review.toml");
    std::fs::write(&config, CONFIG.replace("[cohort]", "[cohorts]")).unwrap();

    let output = pairpost()
        .args(["validate", config.to_str().unwrap()])
        .output()
        .expect("pairpost validate");

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error:"), "stderr: {stderr}");
}

#[test]
fn validate_accepts_good_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(dir.path());

    let output = pairpost()
        .args(["validate", config.to_str().unwrap()])
        .output()
        .expect("pairpost validate");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("valid: 'Test run'"));
}

#[test]
fn missing_column_exits_4() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(dir.path());

    // Drop the mentor column from the student file header.
    let broken = STUDENTS_CSV.replace("student,mentor,", "student,advisor,");
    std::fs::write(dir.path().join("from_students.csv"), broken).unwrap();

    let output = pairpost()
        .args(["run", config.to_str().unwrap()])
        .output()
        .expect("pairpost run");

    assert_eq!(output.status.code(), Some(4));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing column 'mentor'"), "stderr: {stderr}");
}

#[test]
fn unreadable_input_exits_4() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(dir.path());
    std::fs::remove_file(dir.path().join("from_mentors.csv")).unwrap();

    let output = pairpost()
        .args(["run", config.to_str().unwrap()])
        .output()
        .expect("pairpost run");

    assert_eq!(output.status.code(), Some(4));
}
