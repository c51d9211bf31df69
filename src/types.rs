use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Output language for rendered artifacts.
///
/// Japanese is the source language of the event table; English output goes
/// through the localization engine (`localize.rs`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ja,
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Ja => "ja",
            Language::En => "en",
        }
    }

    /// Accepts short codes plus the spelled-out picker names
    /// ("日本語" / "English").
    pub fn parse(value: &str) -> Option<Language> {
        match value.trim().to_lowercase().as_str() {
            "ja" | "jp" | "japanese" | "日本語" => Some(Language::Ja),
            "en" | "english" => Some(Language::En),
            _ => None,
        }
    }
}

/// The six fixed phases of a sell-side transaction, in journey order.
///
/// The order is load-bearing: `position()` drives the "stage 2/6" compass
/// fragment, and the playbook tables are keyed by variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Prep,
    Listing,
    Viewing,
    Offer,
    Finance,
    Close,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Prep,
        Stage::Listing,
        Stage::Viewing,
        Stage::Offer,
        Stage::Finance,
        Stage::Close,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Prep => "Prep",
            Stage::Listing => "Listing",
            Stage::Viewing => "Viewing",
            Stage::Offer => "Offer",
            Stage::Finance => "Finance",
            Stage::Close => "Close",
        }
    }

    pub fn parse(value: &str) -> Option<Stage> {
        match value {
            "Prep" => Some(Stage::Prep),
            "Listing" => Some(Stage::Listing),
            "Viewing" => Some(Stage::Viewing),
            "Offer" => Some(Stage::Offer),
            "Finance" => Some(Stage::Finance),
            "Close" => Some(Stage::Close),
            _ => None,
        }
    }

    /// 1-based position in the journey (Prep = 1, Close = 6).
    pub fn position(&self) -> usize {
        Stage::ALL.iter().position(|s| s == self).unwrap_or(0) + 1
    }
}

/// Event category: a known journey stage, or whatever raw label the table
/// carried. Unknown labels degrade to generic playbook content and an
/// "unknown position" compass rather than failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    Known(Stage),
    Other(String),
}

impl Category {
    pub fn parse(raw: &str) -> Category {
        match Stage::parse(raw) {
            Some(stage) => Category::Known(stage),
            None => Category::Other(raw.to_string()),
        }
    }

    pub fn stage(&self) -> Option<Stage> {
        match self {
            Category::Known(stage) => Some(*stage),
            Category::Other(_) => None,
        }
    }

    /// Display label: the stage name, or the raw table value as-is.
    pub fn as_str(&self) -> &str {
        match self {
            Category::Known(stage) => stage.as_str(),
            Category::Other(raw) => raw.as_str(),
        }
    }
}

impl serde::Serialize for Category {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Risk level from the event table. Labels outside the known set are
/// mapped to Medium at the load boundary (with a warning).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn parse(value: &str) -> Option<RiskLevel> {
        match value {
            "Low" => Some(RiskLevel::Low),
            "Medium" => Some(RiskLevel::Medium),
            "High" => Some(RiskLevel::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }

    /// Base weight for the priority scorer.
    pub fn weight(&self) -> u32 {
        match self {
            RiskLevel::Low => 1,
            RiskLevel::Medium => 2,
            RiskLevel::High => 3,
        }
    }
}

/// One milestone row from the events table.
///
/// Constructed only by the loader, which has already validated the date and
/// normalized category/risk, so downstream code never re-checks fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub date: NaiveDate,
    pub actor: String,
    pub category: Category,
    pub description: String,
    pub expected_action: String,
    pub success_criteria: String,
    pub risk_level: RiskLevel,
}

/// Contact routing for one actor. Missing fields stay empty here; the pack
/// assembler renders bracketed prompts in their place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub cc: String,
    #[serde(default)]
    pub attachments: String,
}

/// Contacts keyed by actor. Lookup misses resolve to an empty [`Contact`],
/// never an error; an absent contacts file just means an empty book.
#[derive(Debug, Clone, Default)]
pub struct ContactBook {
    entries: HashMap<String, Contact>,
}

impl ContactBook {
    pub fn new(entries: HashMap<String, Contact>) -> Self {
        Self { entries }
    }

    pub fn lookup(&self, actor: &str) -> Contact {
        self.entries.get(actor).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Email draft inside an action pack. `to`/`cc` hold either resolved
/// addresses or the bracketed placeholder, never an empty string.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailDraft {
    pub subject: String,
    pub to: String,
    pub cc: String,
    pub body: String,
}

/// The full multi-channel output for one selected event. Built fresh per
/// request and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionPack {
    pub event_id: String,
    pub language: Language,
    pub compass: String,
    pub checklist: Vec<String>,
    pub risks: Vec<String>,
    pub email: EmailDraft,
    pub chat_snippet: String,
    pub memo: String,
    /// Standalone .ics bytes; written to disk by the caller, so JSON
    /// output omits it.
    #[serde(skip_serializing)]
    pub calendar_artifact: Vec<u8>,
}

/// One period (usually one day) of funnel counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiRecord {
    pub date: NaiveDate,
    pub pv: u32,
    pub inquiries: u32,
    pub viewings: u32,
    pub offers: u32,
}

/// Calm-biased status classification of a KPI ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorBand {
    Green,
    Yellow,
    Red,
    Neutral,
}

/// One dashboard card.
///
/// `headline` is the rendered figure ("7.0%", "—", "31 日"), `detail` the
/// counts or date span behind it. `ratio` stays None for the neutral
/// elapsed-days card and for ratios with a zero denominator.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiCard {
    pub label: String,
    pub headline: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
    pub band: ColorBand,
}

/// Result of a KPI report over a scope. `message` is set instead of cards
/// when the scope has no rows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiReport {
    pub cards: Vec<KpiCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One unit of the read-only notes corpus (JSON Lines, one object per line).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceChunk {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// Tunable decay parameters for the priority scorer.
///
/// The 60-day window and 0.2 floor are product defaults, not derived
/// invariants, so they are configurable rather than hard constants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreParams {
    #[serde(default = "default_decay_window_days")]
    pub decay_window_days: u32,
    #[serde(default = "default_decay_floor")]
    pub decay_floor: f64,
}

impl Default for ScoreParams {
    fn default() -> Self {
        Self {
            decay_window_days: default_decay_window_days(),
            decay_floor: default_decay_floor(),
        }
    }
}

fn default_decay_window_days() -> u32 {
    60
}

fn default_decay_floor() -> f64 {
    0.2
}

/// Optional configuration stored in ~/.sellpm/config.json.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub score: ScoreParams,
    /// Default output language when the CLI flag is absent ("ja" / "en").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}
