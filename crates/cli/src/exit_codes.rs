//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 3-9     | recon            | Reconciliation input/config codes        |
//! | 40-49   | mail             | Gmail delivery codes                     |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Recon (3-9)
// =============================================================================

/// Config failed to parse or validate.
pub const EXIT_RECON_INVALID_CONFIG: u8 = 3;

/// Input data error (unreadable file, missing column, malformed row).
pub const EXIT_RECON_INPUT: u8 = 4;

// =============================================================================
// Mail (40-49)
// =============================================================================

/// Not authenticated (no saved credentials).
pub const EXIT_MAIL_NOT_AUTH: u8 = 40;

/// Network error reaching Google.
pub const EXIT_MAIL_NETWORK: u8 = 42;

/// Request rejected by Google (revoked refresh token, bad message).
pub const EXIT_MAIL_VALIDATION: u8 = 43;

/// Upstream HTTP error or unparseable response.
pub const EXIT_MAIL_UPSTREAM: u8 = 44;

// =============================================================================
// Error mapping
// =============================================================================

use pairpost_mailer::MailError;
use pairpost_recon::ReconError;

/// Map a MailError to its exit code.
pub fn mail_exit_code(err: &MailError) -> u8 {
    match err {
        MailError::NotAuthenticated => EXIT_MAIL_NOT_AUTH,
        MailError::Network(_) => EXIT_MAIL_NETWORK,
        MailError::Validation(_) => EXIT_MAIL_VALIDATION,
        MailError::Http(_, _) => EXIT_MAIL_UPSTREAM,
        MailError::Parse(_) => EXIT_MAIL_UPSTREAM,
        MailError::Io(_) => EXIT_ERROR,
    }
}

/// Map a ReconError to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_RECON_INVALID_CONFIG,
        ReconError::MissingColumn { .. } | ReconError::Csv { .. } | ReconError::Io(_) => {
            EXIT_RECON_INPUT
        }
    }
}
