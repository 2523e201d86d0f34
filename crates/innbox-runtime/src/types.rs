//! Pipeline message and result types.

use serde::{Deserialize, Serialize};

/// One unread booking email handed over by the mailbox source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundRequest {
    /// Mailbox-side identifier, used to mark the message processed.
    pub uid: String,
    pub subject: String,
    pub from_address: String,
    pub sender_name: String,
    pub body: String,
}

/// Outcome of driving the booking form once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
}

/// Counters for one processing pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessReport {
    pub fetched: usize,
    pub booked: usize,
    /// Requests bounced back for missing required fields.
    pub rejected: usize,
    /// Submissions that reached the booking desk and failed there.
    pub failed: usize,
}
