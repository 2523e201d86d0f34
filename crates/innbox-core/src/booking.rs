//! Booking domain types shared across the workspace.

use serde::{Deserialize, Serialize};

/// Canonical room categories offered by the booking form.
///
/// Serialized values are the exact labels the form expects, so the
/// enum doubles as the wire contract for the LLM response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomType {
    Standard,
    Deluxe,
    Suite,
    #[serde(rename = "Premium Suite")]
    PremiumSuite,
    Family,
    #[serde(rename = "Executive Suite")]
    ExecutiveSuite,
    #[serde(rename = "Presidential Suite")]
    PresidentialSuite,
    Penthouse,
    #[serde(rename = "Deluxe Sea View Room")]
    DeluxeSeaView,
}

impl RoomType {
    /// Every canonical label, in form order.
    pub const LABELS: &'static [&'static str] = &[
        "Standard",
        "Deluxe",
        "Suite",
        "Premium Suite",
        "Family",
        "Executive Suite",
        "Presidential Suite",
        "Penthouse",
        "Deluxe Sea View Room",
    ];

    /// Canonical label as it appears on the booking form.
    pub fn label(&self) -> &'static str {
        match self {
            RoomType::Standard => "Standard",
            RoomType::Deluxe => "Deluxe",
            RoomType::Suite => "Suite",
            RoomType::PremiumSuite => "Premium Suite",
            RoomType::Family => "Family",
            RoomType::ExecutiveSuite => "Executive Suite",
            RoomType::PresidentialSuite => "Presidential Suite",
            RoomType::Penthouse => "Penthouse",
            RoomType::DeluxeSeaView => "Deluxe Sea View Room",
        }
    }
}

impl std::fmt::Display for RoomType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A structured booking record extracted from one email.
///
/// Built fresh per extraction call, never persisted. Date fields hold
/// ISO 8601 strings when a known format was recognized; otherwise the
/// original text passes through unchanged so downstream consumers can
/// report it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub guest_name: String,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub room_type: Option<RoomType>,
    pub num_adults: u32,
    pub num_children: u32,
}

impl BookingRequest {
    /// Required fields the booking form cannot be submitted without.
    /// Completeness is the caller's job, not the extractor's.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.check_in.is_none() {
            missing.push("check-in date");
        }
        if self.check_out.is_none() {
            missing.push("check-out date");
        }
        if self.room_type.is_none() {
            missing.push("room type");
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_type_labels() {
        let parsed: RoomType = serde_json::from_str("\"Deluxe Sea View Room\"").unwrap();
        assert_eq!(parsed, RoomType::DeluxeSeaView);
        assert_eq!(parsed.to_string(), "Deluxe Sea View Room");

        let json = serde_json::to_string(&RoomType::PresidentialSuite).unwrap();
        assert_eq!(json, "\"Presidential Suite\"");
    }

    #[test]
    fn test_room_type_rejects_unknown_label() {
        let parsed = serde_json::from_str::<RoomType>("\"Penthouse Suite\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_missing_fields() {
        let booking = BookingRequest {
            guest_name: "Carol".into(),
            check_in: Some("2026-03-22".into()),
            check_out: None,
            room_type: None,
            num_adults: 1,
            num_children: 0,
        };
        assert_eq!(booking.missing_fields(), vec!["check-out date", "room type"]);
    }
}
