//! `pairpost-recon` — peer-review reconciliation + message composition.
//!
//! Pure engine crate: receives pre-loaded records, returns filtered sets and
//! composed notifications. No CLI or network dependencies.

pub mod compose;
pub mod config;
pub mod directory;
pub mod engine;
pub mod error;
pub mod model;
pub mod normalize;

pub use compose::{compose, ComposeOutput, ComposedMessage, SkippedRow};
pub use config::RunConfig;
pub use directory::EmailDirectory;
pub use engine::reconcile;
pub use error::ReconError;
pub use model::{Origin, Recipient, ReconInput, ReconResult, ReviewRow};
pub use normalize::normalize_yo;
