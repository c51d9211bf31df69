//! Calm-mode KPI aggregation and color-band classification.
//!
//! Ratios are classified against fixed per-metric thresholds chosen to
//! keep reporting mostly green and yellow with a narrow red band. The
//! thresholds are part of the product contract and are not tunable.

use chrono::{Datelike, NaiveDate};

use crate::types::{ColorBand, KpiCard, KpiRecord, KpiReport, Language};

const RESPONSE_GREEN: f64 = 0.06;
const RESPONSE_YELLOW: f64 = 0.03;
const VIEWING_GREEN: f64 = 0.35;
const VIEWING_YELLOW: f64 = 0.20;
const OFFER_GREEN: f64 = 0.15;
const OFFER_YELLOW: f64 = 0.08;

/// Aggregation window, keyed off a wall-clock "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KpiRange {
    Last30,
    Month,
    All,
}

impl KpiRange {
    pub fn parse(s: &str) -> Option<KpiRange> {
        match s.trim().to_lowercase().as_str() {
            "last30" | "last-30" | "30" | "直近30日" => Some(KpiRange::Last30),
            "month" | "this-month" | "今月" => Some(KpiRange::Month),
            "all" | "すべて" => Some(KpiRange::All),
            _ => None,
        }
    }
}

/// Build the four-card report for the records inside `range`.
///
/// An empty scope yields no cards and an explicit message instead.
pub fn report(
    records: &[KpiRecord],
    range: KpiRange,
    today: NaiveDate,
    lang: Language,
) -> KpiReport {
    let scope: Vec<&KpiRecord> = records
        .iter()
        .filter(|r| match range {
            KpiRange::Last30 => r.date >= today - chrono::Duration::days(30),
            KpiRange::Month => r.date >= today.with_day(1).unwrap_or(today),
            KpiRange::All => true,
        })
        .collect();

    if scope.is_empty() {
        return KpiReport {
            cards: Vec::new(),
            message: Some(no_data_message(lang).to_string()),
        };
    }

    let pv: u64 = scope.iter().map(|r| r.pv as u64).sum();
    let inquiries: u64 = scope.iter().map(|r| r.inquiries as u64).sum();
    let viewings: u64 = scope.iter().map(|r| r.viewings as u64).sum();
    let offers: u64 = scope.iter().map(|r| r.offers as u64).sum();

    let response = ratio(inquiries, pv);
    let viewing_conv = ratio(viewings, inquiries);
    let offer_conv = ratio(offers, viewings);

    let first = scope.iter().map(|r| r.date).min().unwrap_or(today);
    let last = scope.iter().map(|r| r.date).max().unwrap_or(today);
    let elapsed_days = (last - first).num_days() + 1;
    let span = format!("{} → {}", first.format("%Y-%m-%d"), last.format("%Y-%m-%d"));

    let labels = match lang {
        Language::Ja => ["反響率", "内覧化率", "申込率", "経過日数"],
        Language::En => [
            "Response rate",
            "Viewing conversion",
            "Offer conversion",
            "Elapsed days",
        ],
    };
    let elapsed_headline = match lang {
        Language::Ja => format!("{} 日", elapsed_days),
        Language::En => format!(
            "{} day{}",
            elapsed_days,
            if elapsed_days == 1 { "" } else { "s" }
        ),
    };

    let cards = vec![
        KpiCard {
            label: labels[0].to_string(),
            headline: format_ratio(response),
            detail: format!("{} / {}", inquiries, pv),
            ratio: response,
            band: band_for(response, RESPONSE_GREEN, RESPONSE_YELLOW),
        },
        KpiCard {
            label: labels[1].to_string(),
            headline: format_ratio(viewing_conv),
            detail: format!("{} / {}", viewings, inquiries),
            ratio: viewing_conv,
            band: band_for(viewing_conv, VIEWING_GREEN, VIEWING_YELLOW),
        },
        KpiCard {
            label: labels[2].to_string(),
            headline: format_ratio(offer_conv),
            detail: format!("{} / {}", offers, viewings),
            ratio: offer_conv,
            band: band_for(offer_conv, OFFER_GREEN, OFFER_YELLOW),
        },
        KpiCard {
            label: labels[3].to_string(),
            headline: elapsed_headline,
            detail: span,
            ratio: None,
            band: ColorBand::Neutral,
        },
    ];

    KpiReport {
        cards,
        message: None,
    }
}

fn ratio(numerator: u64, denominator: u64) -> Option<f64> {
    if denominator > 0 {
        Some(numerator as f64 / denominator as f64)
    } else {
        None
    }
}

fn band_for(value: Option<f64>, green: f64, yellow: f64) -> ColorBand {
    match value {
        None => ColorBand::Neutral,
        Some(v) if v >= green => ColorBand::Green,
        Some(v) if v >= yellow => ColorBand::Yellow,
        Some(_) => ColorBand::Red,
    }
}

fn format_ratio(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}%", v * 100.0),
        None => "—".to_string(),
    }
}

fn no_data_message(lang: Language) -> &'static str {
    match lang {
        Language::Ja => "対象期間にデータがありません",
        Language::En => "No data for the selected range",
    }
}
