//! The extraction strategy seam.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use innbox_core::{Result, RoomType};

/// A partially extracted booking: every field optional.
///
/// Doubles as the JSON shape the AI-assisted strategy expects back, so
/// deserializing a model reply into it is the shape validation: wrong
/// types, negative counts, and non-canonical room labels all fail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingDraft {
    pub guest_name: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub room_type: Option<RoomType>,
    pub num_adults: Option<u32>,
    pub num_children: Option<u32>,
}

/// One of the interchangeable extraction algorithms.
#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Extract whatever fields the text yields. An error means the
    /// strategy failed as a whole and the next one should run.
    async fn extract(&self, text: &str, today: NaiveDate) -> Result<BookingDraft>;
}
