//! `pairpost login` / `pairpost logout` — Gmail credential storage.
//!
//! The OAuth consent flow itself happens in the Google Cloud console; this
//! command stores the resulting client credentials + refresh token and
//! verifies them with one token refresh round-trip.

use std::io::{self, Write};

use pairpost_mailer::{delete_auth, save_auth, GmailTransport, MailError, StoredCredentials};

use crate::exit_codes::{
    mail_exit_code, EXIT_ERROR, EXIT_MAIL_NETWORK, EXIT_MAIL_NOT_AUTH, EXIT_USAGE,
};
use crate::CliError;

pub fn cmd_login(
    client_id: Option<String>,
    client_secret: Option<String>,
    refresh_token: Option<String>,
) -> Result<(), CliError> {
    let client_id = resolve("client id", client_id, "PAIRPOST_CLIENT_ID", "--client-id")?;
    let client_secret = resolve(
        "client secret",
        client_secret,
        "PAIRPOST_CLIENT_SECRET",
        "--client-secret",
    )?;
    let refresh_token = resolve(
        "refresh token",
        refresh_token,
        "PAIRPOST_REFRESH_TOKEN",
        "--refresh-token",
    )?;

    let creds = StoredCredentials::new(client_id, client_secret, refresh_token);

    // Verify the credentials work before saving them
    let transport = GmailTransport::new(creds.clone());
    let lifetime = transport.verify().map_err(|e| match e {
        MailError::Validation(_) | MailError::Http(401, _) | MailError::Http(403, _) => CliError {
            code: EXIT_MAIL_NOT_AUTH,
            message: "Google rejected the credentials".into(),
            hint: Some("re-issue the refresh token in the Google Cloud console".into()),
        },
        MailError::Network(msg) => CliError {
            code: EXIT_MAIL_NETWORK,
            message: format!("Cannot reach Google: {}", msg),
            hint: None,
        },
        other => CliError {
            code: mail_exit_code(&other),
            message: other.to_string(),
            hint: None,
        },
    })?;

    save_auth(&creds).map_err(|e| CliError {
        code: EXIT_ERROR,
        message: e,
        hint: None,
    })?;

    eprintln!("Stored Gmail credentials (refresh OK, access token lifetime {lifetime}s)");
    Ok(())
}

/// Resolve a credential part: flag > env var > interactive prompt.
fn resolve(
    what: &str,
    flag: Option<String>,
    env_var: &str,
    flag_name: &str,
) -> Result<String, CliError> {
    if let Some(v) = flag {
        return Ok(v);
    }
    if let Ok(v) = std::env::var(env_var) {
        return Ok(v);
    }
    if atty::is(atty::Stream::Stdin) {
        eprint!("Gmail {what}: ");
        io::stderr().flush().ok();
        let mut buf = String::new();
        io::stdin()
            .read_line(&mut buf)
            .map_err(|e| CliError { code: EXIT_ERROR, message: e.to_string(), hint: None })?;
        let trimmed = buf.trim().to_string();
        if trimmed.is_empty() {
            return Err(CliError {
                code: EXIT_USAGE,
                message: format!("No {what} provided"),
                hint: Some(format!("pass {flag_name} or set {env_var}")),
            });
        }
        return Ok(trimmed);
    }
    Err(CliError {
        code: EXIT_USAGE,
        message: format!("No {what} provided and stdin is not a TTY"),
        hint: Some(format!("pass {flag_name} or set {env_var}")),
    })
}

pub fn cmd_logout() -> Result<(), CliError> {
    delete_auth().map_err(|e| CliError {
        code: EXIT_ERROR,
        message: e,
        hint: None,
    })?;
    eprintln!("Credentials removed");
    Ok(())
}
