use serde::{Deserialize, Serialize};

/// Event name Rounded sends once a call transcript is available.
pub const TRANSCRIPT_READY: &str = "call.transcript.ready";

/// Lifecycle status of a phone call as reported by Rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    Ongoing,
    Completed,
    Missed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallDirection {
    Inbound,
    Outbound,
}

/// Body of a `call.transcript.ready` webhook.
///
/// Field order matches the wire payload. Timestamps and phone numbers are
/// carried as opaque strings; nothing here is validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallTranscriptEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub id: String,
    pub from: String,
    pub to: String,
    pub start_time: String,
    pub end_time: String,
    /// Call length in seconds.
    pub duration: u64,
    pub status: CallStatus,
    pub direction: CallDirection,
    pub transcript: String,
    pub recording_url: String,
}

impl CallTranscriptEvent {
    /// The fixed event used to probe a receiving endpoint.
    pub fn sample() -> Self {
        Self {
            event_type: TRANSCRIPT_READY.to_string(),
            id: "call_123456".to_string(),
            from: "+33123456789".to_string(),
            to: "your_service_number".to_string(),
            start_time: "2025-01-18T19:43:10+01:00".to_string(),
            end_time: "2025-01-18T19:45:10+01:00".to_string(),
            duration: 120,
            status: CallStatus::Completed,
            direction: CallDirection::Inbound,
            transcript: "Bonjour, je vous appelle car la machine numéro 5 à la laverie de Paris \
                         ne démarre pas. J'ai inséré 8 euros mais rien ne se passe."
                .to_string(),
            recording_url: "https://api.rounded.com/recordings/123456".to_string(),
        }
    }
}
