//! Input boundary: events CSV, contacts CSV, KPI CSV, evidence JSONL,
//! and the optional user config.
//!
//! Validation happens here and nowhere else. Missing required columns and
//! unparseable dates are fatal and name the exact columns / raw values;
//! everything downstream receives already-validated records. Contacts and
//! evidence are lenient by contract: an absent file is an empty book or
//! corpus, and malformed JSONL lines are skipped.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use encoding_rs::SHIFT_JIS;
use log::{debug, info, warn};

use crate::error::InputError;
use crate::types::{Config, Contact, ContactBook, Event, EvidenceChunk, KpiRecord, RiskLevel};

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

const EVENT_COLUMNS: [&str; 8] = [
    "event_id",
    "date",
    "actor",
    "category",
    "description",
    "expected_action",
    "success_criteria",
    "risk_level",
];

// Case-insensitive header aliases for the KPI table, canonical name first.
const KPI_DATE: [&str; 2] = ["date", "日付"];
const KPI_PV: [&str; 3] = ["pv", "views", "閲覧"];
const KPI_INQUIRIES: [&str; 4] = ["inquiries", "inquiry", "問合せ", "問い合わせ"];
const KPI_VIEWINGS: [&str; 3] = ["viewings", "viewing", "内覧"];
const KPI_OFFERS: [&str; 4] = ["offers", "applications", "申込", "申し込み"];

/// Try both accepted date formats in order.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

// CSV tables commonly arrive as Japanese Excel exports, so decoding tries
// these in order. The JSONL corpus is strict UTF-8 per the JSON spec.
const CSV_ENCODINGS: [&str; 2] = ["utf-8", "shift_jis (cp932)"];

// ==========================================================================
// CSV plumbing
// ==========================================================================

/// Read a CSV file, trying each accepted encoding in order. A file that
/// fits none of them is a fatal error naming every attempted encoding.
fn read_csv_text(path: &Path) -> Result<String, InputError> {
    let bytes = fs::read(path).map_err(|e| InputError::io(path.display().to_string(), e))?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, had_errors) = SHIFT_JIS.decode(&bytes);
            if had_errors {
                Err(InputError::UndecodableText {
                    path: path.display().to_string(),
                    encodings: CSV_ENCODINGS.iter().map(|s| s.to_string()).collect(),
                })
            } else {
                debug!("decoded {} as Shift_JIS", path.display());
                Ok(decoded.into_owned())
            }
        }
    }
}

/// Split one CSV line, honoring double-quote quoting with `""` escapes.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

/// Parse CSV text into a lowercased header and data rows. Blank lines are
/// skipped; a BOM on the first header cell is stripped.
fn parse_csv(text: &str) -> (Vec<String>, Vec<Vec<String>>) {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let header: Vec<String> = match lines.next() {
        Some(line) => split_csv_line(line.trim_start_matches('\u{feff}'))
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect(),
        None => Vec::new(),
    };
    let rows = lines.map(split_csv_line).collect();
    (header, rows)
}

fn cell<'a>(row: &'a [String], idx: usize) -> &'a str {
    row.get(idx).map(|s| s.trim()).unwrap_or("")
}

// ==========================================================================
// Events
// ==========================================================================

/// Parse the events table. Every missing required column and every date
/// that fails both formats is collected before erroring, so one run
/// reports the whole problem.
pub fn parse_events(text: &str) -> Result<Vec<Event>, InputError> {
    let (header, rows) = parse_csv(text);

    let missing: Vec<String> = EVENT_COLUMNS
        .iter()
        .filter(|col| !header.iter().any(|h| h.as_str() == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(InputError::MissingColumns {
            table: "events",
            columns: missing,
        });
    }

    let col = |name: &str| {
        header
            .iter()
            .position(|h| h.as_str() == name)
            .unwrap_or(usize::MAX)
    };
    let idx: Vec<usize> = EVENT_COLUMNS.iter().map(|c| col(c)).collect();

    let mut events = Vec::with_capacity(rows.len());
    let mut bad_dates = Vec::new();
    for row in &rows {
        let raw_date = cell(row, idx[1]);
        let date = match parse_date(raw_date) {
            Some(date) => date,
            None => {
                bad_dates.push(raw_date.to_string());
                continue;
            }
        };
        let raw_risk = cell(row, idx[7]);
        let risk_level = RiskLevel::parse(raw_risk).unwrap_or_else(|| {
            warn!("unknown risk level {:?}; treating as Medium", raw_risk);
            RiskLevel::Medium
        });
        events.push(Event {
            id: cell(row, idx[0]).to_string(),
            date,
            actor: cell(row, idx[2]).to_string(),
            category: crate::types::Category::parse(cell(row, idx[3])),
            description: cell(row, idx[4]).to_string(),
            expected_action: cell(row, idx[5]).to_string(),
            success_criteria: cell(row, idx[6]).to_string(),
            risk_level,
        });
    }

    if !bad_dates.is_empty() {
        return Err(InputError::UnparseableDates {
            table: "events",
            values: bad_dates,
        });
    }
    Ok(events)
}

pub fn load_events(path: &Path) -> Result<Vec<Event>, InputError> {
    let content = read_csv_text(path)?;
    let events = parse_events(&content)?;
    info!("loaded {} events from {}", events.len(), path.display());
    Ok(events)
}

// ==========================================================================
// Contacts
// ==========================================================================

/// Parse the optional contacts table. The table itself is lenient: an
/// unusable header or a row with no actor just contributes nothing.
pub fn parse_contacts(text: &str) -> ContactBook {
    let (header, rows) = parse_csv(text);
    let col = |name: &str| header.iter().position(|h| h.as_str() == name);
    let (actor_idx, to_idx, cc_idx, att_idx) = match (
        col("actor"),
        col("to"),
        col("cc"),
        col("attachments"),
    ) {
        (Some(a), t, c, at) => (a, t, c, at),
        (None, ..) => {
            warn!("contacts table has no actor column; ignoring it");
            return ContactBook::default();
        }
    };

    let mut entries = HashMap::new();
    for row in &rows {
        let actor = cell(row, actor_idx);
        if actor.is_empty() {
            continue;
        }
        entries.insert(
            actor.to_string(),
            Contact {
                to: to_idx.map(|i| cell(row, i).to_string()).unwrap_or_default(),
                cc: cc_idx.map(|i| cell(row, i).to_string()).unwrap_or_default(),
                attachments: att_idx.map(|i| cell(row, i).to_string()).unwrap_or_default(),
            },
        );
    }
    ContactBook::new(entries)
}

/// A missing contacts file is an empty book, never an error; the pack
/// assembler then renders bracketed placeholders.
pub fn load_contacts(path: &Path) -> Result<ContactBook, InputError> {
    if !path.exists() {
        info!("no contacts file at {}; using placeholders", path.display());
        return Ok(ContactBook::default());
    }
    let content = read_csv_text(path)?;
    let book = parse_contacts(&content);
    info!("loaded {} contacts from {}", book.len(), path.display());
    Ok(book)
}

// ==========================================================================
// KPI table
// ==========================================================================

fn find_alias(header: &[String], aliases: &[&str]) -> Option<usize> {
    header.iter().position(|h| aliases.contains(&h.as_str()))
}

/// Non-numeric or empty cells coerce to zero; "3.0"-style cells round
/// down through f64.
fn coerce_count(raw: &str) -> u32 {
    raw.parse::<u32>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().map(|v| v.max(0.0) as u32))
        .unwrap_or(0)
}

/// Parse the KPI table with case-insensitive header aliases. Missing
/// logical columns are fatal under their canonical names; rows with
/// unparseable dates are dropped; the result is sorted by date.
pub fn parse_kpi(text: &str) -> Result<Vec<KpiRecord>, InputError> {
    let (header, rows) = parse_csv(text);

    let columns = [
        ("date", find_alias(&header, &KPI_DATE)),
        ("pv", find_alias(&header, &KPI_PV)),
        ("inquiries", find_alias(&header, &KPI_INQUIRIES)),
        ("viewings", find_alias(&header, &KPI_VIEWINGS)),
        ("offers", find_alias(&header, &KPI_OFFERS)),
    ];
    let missing: Vec<String> = columns
        .iter()
        .filter(|(_, idx)| idx.is_none())
        .map(|(name, _)| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(InputError::MissingColumns {
            table: "kpi",
            columns: missing,
        });
    }
    let idx: Vec<usize> = columns.iter().map(|(_, i)| i.unwrap()).collect();

    let mut records = Vec::with_capacity(rows.len());
    for row in &rows {
        let raw_date = cell(row, idx[0]);
        let date = match parse_date(raw_date) {
            Some(date) => date,
            None => {
                warn!("dropping KPI row with unparseable date {:?}", raw_date);
                continue;
            }
        };
        records.push(KpiRecord {
            date,
            pv: coerce_count(cell(row, idx[1])),
            inquiries: coerce_count(cell(row, idx[2])),
            viewings: coerce_count(cell(row, idx[3])),
            offers: coerce_count(cell(row, idx[4])),
        });
    }
    records.sort_by_key(|r| r.date);
    Ok(records)
}

pub fn load_kpi(path: &Path) -> Result<Vec<KpiRecord>, InputError> {
    let content = read_csv_text(path)?;
    let records = parse_kpi(&content)?;
    info!("loaded {} KPI rows from {}", records.len(), path.display());
    Ok(records)
}

// ==========================================================================
// Evidence corpus
// ==========================================================================

/// Parse JSON Lines into evidence chunks. Blank and malformed lines are
/// skipped, never fatal.
pub fn parse_evidence(text: &str) -> Vec<EvidenceChunk> {
    let mut chunks = Vec::new();
    for (n, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<EvidenceChunk>(line) {
            Ok(chunk) => chunks.push(chunk),
            Err(e) => debug!("skipping malformed evidence line {}: {}", n + 1, e),
        }
    }
    chunks
}

pub fn load_evidence(path: &Path) -> Result<Vec<EvidenceChunk>, InputError> {
    let content =
        fs::read_to_string(path).map_err(|e| InputError::io(path.display().to_string(), e))?;
    let chunks = parse_evidence(&content);
    info!(
        "loaded {} evidence chunks from {}",
        chunks.len(),
        path.display()
    );
    Ok(chunks)
}

// ==========================================================================
// User config
// ==========================================================================

/// Load `~/.sellpm/config.json`. A missing file yields defaults; a
/// present-but-broken file is a named fatal error.
pub fn load_config() -> Result<Config, InputError> {
    let Some(home) = dirs::home_dir() else {
        return Ok(Config::default());
    };
    let path = home.join(".sellpm").join("config.json");
    if !path.exists() {
        return Ok(Config::default());
    }
    let content =
        fs::read_to_string(&path).map_err(|e| InputError::io(path.display().to_string(), e))?;
    serde_json::from_str(&content).map_err(|e| InputError::MalformedConfig {
        path: path.display().to_string(),
        detail: e.to_string(),
    })
}
