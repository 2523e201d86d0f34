//! AI-assisted extraction: instruction contract and response validation.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use tracing::debug;

use innbox_core::{Error, Result, RoomType};
use innbox_llm::{ChatMessage, LlmClient};

use crate::dates::normalize;
use crate::strategy::{BookingDraft, ExtractionStrategy};

/// Extraction through an external language model. Every failure mode
/// (transport error, timeout, reply that is not the expected JSON
/// shape) surfaces as an error for the orchestrator to catch.
pub struct LlmStrategy {
    client: LlmClient,
}

impl LlmStrategy {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }

    fn build_prompt(text: &str, today: NaiveDate) -> String {
        let room_types = RoomType::LABELS.join(", ");
        let year = today.year();
        format!(
            "Extract hotel booking details from this email.\n\
             Today's date is {today}. Current year is {year}.\n\
             \n\
             EMAIL:\n\
             {text}\n\
             \n\
             Return ONLY valid JSON with these exact keys (null for missing):\n\
             {{\n\
               \"guest_name\": \"string or null\",\n\
               \"check_in\": \"YYYY-MM-DD or null\",\n\
               \"check_out\": \"YYYY-MM-DD or null\",\n\
               \"room_type\": \"one of: {room_types}, or null\",\n\
               \"num_adults\": \"integer or null\",\n\
               \"num_children\": \"integer or null\"\n\
             }}\n\
             \n\
             IMPORTANT RULES:\n\
             - If the email writes a date like \"22 March\" or \"March 22\" with NO year, assume year {year}\n\
             - If that date is already past, assume year {next_year}\n\
             - Resolve \"tomorrow\" relative to today ({today})\n\
             - Default num_adults=1, num_children=0 if not mentioned\n\
             - Return ONLY the JSON object, no other text",
            next_year = year + 1,
        )
    }
}

#[async_trait]
impl ExtractionStrategy for LlmStrategy {
    fn name(&self) -> &'static str {
        "llm"
    }

    async fn extract(&self, text: &str, today: NaiveDate) -> Result<BookingDraft> {
        let prompt = Self::build_prompt(text, today);
        let raw = self.client.complete(&[ChatMessage::user(prompt)]).await?;

        let cleaned = strip_code_fences(&raw);
        let mut draft: BookingDraft = serde_json::from_str(cleaned)
            .map_err(|e| Error::Extraction(format!("model reply is not a booking object: {e}")))?;
        debug!("LLM draft accepted: {:?}", draft);

        // Format coercion only; the orchestrator re-normalizes anyway.
        draft.check_in = draft.check_in.map(|d| normalize(&d, today));
        draft.check_out = draft.check_out.map(|d| normalize(&d, today));
        Ok(draft)
    }
}

/// Models often wrap JSON in Markdown fences despite instructions.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix("```").unwrap_or(trimmed);
    trimmed.trim()
}
