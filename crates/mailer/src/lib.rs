//! `pairpost-mailer` — Gmail delivery collaborator.
//!
//! Everything the reconciliation core must not know about: OAuth credential
//! persistence, token refresh, RFC 2822 assembly, and the actual send. The
//! core talks to this crate only through the [`Transport`] trait.

pub mod auth;
pub mod client;
pub mod message;

pub use auth::{auth_file_path, delete_auth, load_auth, save_auth, StoredCredentials};
pub use client::{DeliveryReceipt, DryRunTransport, GmailTransport, MailError, Transport};
pub use message::OutgoingMessage;
