//! Gmail REST transport.
//!
//! Blocking reqwest client (no async runtime required). Covers the send
//! flow: refresh access token → POST users/me/messages/send.

use std::cell::RefCell;
use std::time::{Duration, Instant};

use crate::auth::{load_auth, StoredCredentials};
use crate::message::{self, OutgoingMessage};

const GMAIL_API_BASE: &str = "https://gmail.googleapis.com";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

// Refresh slightly early so a token never expires mid-request.
const TOKEN_EXPIRY_SLACK: Duration = Duration::from_secs(60);

/// Error type for delivery operations.
#[derive(Debug)]
pub enum MailError {
    /// No auth credentials configured
    NotAuthenticated,
    /// Network error
    Network(String),
    /// HTTP error with status code
    Http(u16, String),
    /// JSON parsing error
    Parse(String),
    /// Server rejected the request (4xx with message)
    Validation(String),
    /// File I/O error
    Io(String),
}

impl std::fmt::Display for MailError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MailError::NotAuthenticated => {
                write!(f, "Not authenticated — run `pairpost login` first")
            }
            MailError::Network(msg) => write!(f, "Network error: {}", msg),
            MailError::Http(code, msg) => write!(f, "HTTP {}: {}", code, msg),
            MailError::Parse(msg) => write!(f, "Parse error: {}", msg),
            MailError::Validation(msg) => write!(f, "{}", msg),
            MailError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for MailError {}

/// Confirmation returned by the delivery endpoint.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DeliveryReceipt {
    pub message_id: String,
    pub thread_id: Option<String>,
}

/// Injectable delivery capability; the engine and CLI never talk to the
/// network directly.
pub trait Transport {
    fn send(&self, msg: &OutgoingMessage) -> Result<DeliveryReceipt, MailError>;
}

// ── Dry run ─────────────────────────────────────────────────────────

/// Prints would-be sends instead of delivering them.
pub struct DryRunTransport;

impl Transport for DryRunTransport {
    fn send(&self, msg: &OutgoingMessage) -> Result<DeliveryReceipt, MailError> {
        eprintln!("[dry-run] {} -> {}", msg.from, msg.to);
        eprintln!("{}", msg.body);
        Ok(DeliveryReceipt {
            message_id: format!("dry-run:{}", msg.to),
            thread_id: None,
        })
    }
}

// ── Gmail ───────────────────────────────────────────────────────────

struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// Gmail API transport (blocking).
pub struct GmailTransport {
    http: reqwest::blocking::Client,
    api_base: String,
    token_url: String,
    creds: StoredCredentials,
    access: RefCell<Option<CachedToken>>,
}

impl GmailTransport {
    /// Create a transport using saved auth credentials.
    pub fn from_saved_auth() -> Result<Self, MailError> {
        let creds = load_auth().ok_or(MailError::NotAuthenticated)?;
        Ok(Self::new(creds))
    }

    /// Create a transport with explicit credentials.
    pub fn new(creds: StoredCredentials) -> Self {
        Self::with_endpoints(creds, GMAIL_API_BASE.into(), GOOGLE_TOKEN_URL.into())
    }

    /// Create a transport against non-default endpoints (tests).
    pub fn with_endpoints(creds: StoredCredentials, api_base: String, token_url: String) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("pairpost/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            api_base,
            token_url,
            creds,
            access: RefCell::new(None),
        }
    }

    /// Verify the stored credentials by performing one token refresh.
    /// Returns the granted token lifetime in seconds.
    pub fn verify(&self) -> Result<u64, MailError> {
        let granted = self.refresh_access_token()?;
        Ok(granted)
    }

    /// A valid bearer token, refreshed through the stored refresh token when
    /// the cached one is missing or close to expiry.
    fn access_token(&self) -> Result<String, MailError> {
        if let Some(cached) = self.access.borrow().as_ref() {
            if cached.expires_at > Instant::now() + TOKEN_EXPIRY_SLACK {
                return Ok(cached.token.clone());
            }
        }
        self.refresh_access_token()?;
        Ok(self
            .access
            .borrow()
            .as_ref()
            .map(|c| c.token.clone())
            .unwrap_or_default())
    }

    fn refresh_access_token(&self) -> Result<u64, MailError> {
        let params = [
            ("client_id", self.creds.client_id.as_str()),
            ("client_secret", self.creds.client_secret.as_str()),
            ("refresh_token", self.creds.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let response = self
            .http
            .post(&self.token_url)
            .form(&params)
            .send()
            .map_err(|e| MailError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().unwrap_or_default();
            if status == 400 {
                // invalid_grant: revoked or expired refresh token
                return Err(MailError::Validation(body));
            }
            return Err(MailError::Http(status, body));
        }

        #[derive(serde::Deserialize)]
        struct TokenResponse {
            access_token: String,
            expires_in: u64,
        }

        let token: TokenResponse = response
            .json()
            .map_err(|e| MailError::Parse(e.to_string()))?;

        let expires_in = token.expires_in;
        *self.access.borrow_mut() = Some(CachedToken {
            token: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(expires_in),
        });

        Ok(expires_in)
    }
}

impl Transport for GmailTransport {
    fn send(&self, msg: &OutgoingMessage) -> Result<DeliveryReceipt, MailError> {
        let token = self.access_token()?;
        let url = format!("{}/gmail/v1/users/me/messages/send", self.api_base);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .json(&serde_json::json!({ "raw": message::to_raw(msg) }))
            .send()
            .map_err(|e| MailError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().unwrap_or_default();
            if status == 400 || status == 422 {
                return Err(MailError::Validation(body));
            }
            return Err(MailError::Http(status, body));
        }

        #[derive(serde::Deserialize)]
        struct SendResponse {
            id: String,
            #[serde(rename = "threadId")]
            thread_id: Option<String>,
        }

        let sent: SendResponse = response
            .json()
            .map_err(|e| MailError::Parse(e.to_string()))?;

        Ok(DeliveryReceipt {
            message_id: sent.id,
            thread_id: sent.thread_id,
        })
    }
}
