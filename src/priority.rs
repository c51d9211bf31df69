//! Time-decayed priority scoring and top-event selection.
//!
//! Score = risk weight × 33 × time factor, where the time factor decays
//! linearly from 1.0 at zero days out to a floor for far-future events.
//! Past dates clamp to zero days, so overdue events score like today's.

use chrono::NaiveDate;
use serde::Serialize;

use crate::types::{Event, Language, ScoreParams};

const RISK_BASE_MULTIPLIER: f64 = 33.0;
const TOP_COUNT: usize = 3;

/// Which events are eligible for ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    FromToday,
    All,
}

impl Scope {
    pub fn parse(s: &str) -> Option<Scope> {
        match s.trim().to_lowercase().as_str() {
            "from-today" | "from_today" | "today" | "今日以降" => Some(Scope::FromToday),
            "all" | "すべて" => Some(Scope::All),
            _ => None,
        }
    }
}

/// An event paired with its computed priority.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEvent {
    pub event: Event,
    pub priority: i64,
}

/// Result of ranking a scope: up to three events plus a human-readable
/// summary. `events` is empty when nothing matched, and `summary` then
/// carries the explicit "nothing matches" line instead.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSelection {
    pub summary: String,
    pub events: Vec<RankedEvent>,
}

pub fn priority_score(event: &Event, today: NaiveDate, params: &ScoreParams) -> i64 {
    let days = (event.date - today).num_days().max(0);
    let time_factor =
        (1.0 - days as f64 / params.decay_window_days as f64).max(params.decay_floor);
    (event.risk_level.weight() as f64 * RISK_BASE_MULTIPLIER * time_factor).round() as i64
}

/// Rank a scope of events and keep the top three.
///
/// Order: priority descending, then date ascending, then risk level as a
/// string ascending. The sort is stable, so full ties keep input order.
pub fn select_top(
    events: &[Event],
    scope: Scope,
    today: NaiveDate,
    params: &ScoreParams,
    lang: Language,
) -> TopSelection {
    let mut ranked: Vec<RankedEvent> = events
        .iter()
        .filter(|e| match scope {
            Scope::FromToday => e.date >= today,
            Scope::All => true,
        })
        .map(|e| RankedEvent {
            priority: priority_score(e, today, params),
            event: e.clone(),
        })
        .collect();

    if ranked.is_empty() {
        return TopSelection {
            summary: empty_scope_message(lang).to_string(),
            events: Vec::new(),
        };
    }

    ranked.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| a.event.date.cmp(&b.event.date))
            .then_with(|| a.event.risk_level.as_str().cmp(b.event.risk_level.as_str()))
    });
    ranked.truncate(TOP_COUNT);

    let summary = ranked
        .iter()
        .map(summary_line)
        .collect::<Vec<_>>()
        .join("\n");

    TopSelection {
        summary,
        events: ranked,
    }
}

fn summary_line(r: &RankedEvent) -> String {
    format!(
        "- {} [{}/{}] {} → {}  (Priority {})",
        r.event.date.format("%Y-%m-%d"),
        r.event.category.as_str(),
        r.event.risk_level.as_str(),
        r.event.description,
        r.event.expected_action,
        r.priority,
    )
}

fn empty_scope_message(lang: Language) -> &'static str {
    match lang {
        Language::Ja => "該当なし。CSV日付を未来にするか表示範囲を『すべて』へ。",
        Language::En => {
            "No matching events. Use future dates in the CSV or switch the scope to All."
        }
    }
}
