pub mod event;

pub use event::{CallDirection, CallStatus, CallTranscriptEvent, TRANSCRIPT_READY};
