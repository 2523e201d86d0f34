//! Booking request extraction engine.
//!
//! Converts free-text reservation emails into structured
//! `BookingRequest` records. Two interchangeable strategies sit behind
//! one orchestrator: an AI-assisted parser when an LLM provider is
//! configured, and a deterministic regex fallback that always produces
//! a draft. Whichever strategy runs, the orchestrator applies the same
//! defaulting and date normalization before returning.

pub mod dates;
pub mod engine;
pub mod heuristic;
pub mod llm;
pub mod strategy;

pub use engine::BookingExtractor;
pub use heuristic::HeuristicStrategy;
pub use llm::LlmStrategy;
pub use strategy::{BookingDraft, ExtractionStrategy};
