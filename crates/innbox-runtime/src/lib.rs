//! Runtime pipeline wiring the extraction engine to its collaborators.
//!
//! The mailbox, booking desk, and notifier are external services
//! reached through the traits in [`pipeline`]; this crate owns only
//! the orchestration between them.

pub mod pipeline;
pub mod types;

pub use pipeline::{BookingDesk, MailSource, Notifier, Pipeline};
pub use types::{InboundRequest, ProcessReport, SubmissionResult};
