pub mod config;
pub mod error;
pub mod models;
pub mod prober;

pub use config::ProbeConfig;
pub use error::ProbeError;
pub use models::CallTranscriptEvent;
pub use prober::{run_probe, ProbeOutcome, ProbeResponse, WebhookProber, SIGNATURE_HEADER};
