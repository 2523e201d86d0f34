//! Extraction orchestrator: strategy selection, defaults, normalization.

use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use innbox_core::BookingRequest;
use innbox_llm::{LlmClient, LlmConfig};

use crate::dates::normalize;
use crate::heuristic::HeuristicStrategy;
use crate::llm::LlmStrategy;
use crate::strategy::{BookingDraft, ExtractionStrategy};

/// Entry point for turning one email body into a booking record.
///
/// Strategies are tried in order; a failing strategy is logged and the
/// next one runs. Extraction itself never fails: worst case the record
/// carries only the defaulted guest name and counts.
pub struct BookingExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl BookingExtractor {
    /// Build from explicit strategies, tried in order.
    pub fn new(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Deterministic extraction only.
    pub fn heuristic_only() -> Self {
        Self::new(vec![Box::new(HeuristicStrategy)])
    }

    /// LLM-first when a provider is configured, deterministic fallback
    /// always present.
    pub fn from_config(config: &LlmConfig) -> innbox_core::Result<Self> {
        let mut strategies: Vec<Box<dyn ExtractionStrategy>> = Vec::new();
        if let Some(client) = LlmClient::from_config(config)? {
            info!("LLM extraction enabled via {}", client.provider());
            strategies.push(Box::new(LlmStrategy::new(client)));
        } else {
            info!("No LLM provider configured, extraction is regex-only");
        }
        strategies.push(Box::new(HeuristicStrategy));
        Ok(Self::new(strategies))
    }

    /// Extract against the current date.
    pub async fn extract(
        &self,
        text: &str,
        sender_name: &str,
        sender_email: &str,
    ) -> BookingRequest {
        self.extract_at(text, sender_name, sender_email, Local::now().date_naive())
            .await
    }

    /// Extract against an explicit reference date.
    pub async fn extract_at(
        &self,
        text: &str,
        sender_name: &str,
        sender_email: &str,
        today: NaiveDate,
    ) -> BookingRequest {
        let mut draft = BookingDraft::default();
        for strategy in &self.strategies {
            match strategy.extract(text, today).await {
                Ok(result) => {
                    info!("Parsed with the {} strategy", strategy.name());
                    draft = result;
                    break;
                }
                Err(e) => {
                    warn!("{} strategy failed ({e}), falling back", strategy.name());
                }
            }
        }
        finalize(draft, sender_name, sender_email, today)
    }
}

/// Shared post-processing, applied uniformly to whichever strategy
/// produced the draft: guest-name and count defaulting, plus one more
/// normalizer pass over both dates (it also repairs implausible years
/// in AI-derived values).
fn finalize(
    draft: BookingDraft,
    sender_name: &str,
    sender_email: &str,
    today: NaiveDate,
) -> BookingRequest {
    let guest_name = draft
        .guest_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| default_guest_name(sender_name, sender_email));

    BookingRequest {
        guest_name,
        check_in: draft.check_in.map(|d| normalize(&d, today)),
        check_out: draft.check_out.map(|d| normalize(&d, today)),
        room_type: draft.room_type,
        num_adults: draft.num_adults.unwrap_or(1),
        num_children: draft.num_children.unwrap_or(0),
    }
}

/// Sender display name, or the local part of their address.
fn default_guest_name(sender_name: &str, sender_email: &str) -> String {
    if !sender_name.trim().is_empty() {
        return sender_name.trim().to_string();
    }
    sender_email.split('@').next().unwrap_or("").to_string()
}
