//! Minimal iCalendar encoder for a single all-day event.
//!
//! Output is a complete standalone VCALENDAR with one VEVENT and a
//! one-day-before display alarm. TEXT values are escaped per RFC 5545
//! and content lines are folded at 73 bytes, backing up to the nearest
//! char boundary so multibyte text never splits mid-character.

use chrono::{DateTime, NaiveDate, Utc};

const FOLD_LIMIT: usize = 73;
const PRODID: &str = "-//SellPM//PMOPlus//JP";
const UID_DOMAIN: &str = "sellpm";

/// Escape a TEXT value: backslash, semicolon, comma, and newlines.
pub fn escape_text(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace("\r\n", "\\n")
        .replace('\n', "\\n")
}

/// Fold one `NAME:VALUE` content line. Continuation lines carry a single
/// leading space, which a naive unfold strips to reconstruct the value.
pub fn fold_line(name: &str, value: &str) -> String {
    let mut raw = format!("{}:{}", name, value);
    let mut out: Vec<String> = Vec::new();
    while raw.len() > FOLD_LIMIT {
        let mut cut = FOLD_LIMIT;
        while !raw.is_char_boundary(cut) {
            cut -= 1;
        }
        out.push(raw[..cut].to_string());
        raw = format!(" {}", &raw[cut..]);
    }
    out.push(raw);
    out.join("\r\n")
}

/// Reverse folding: strip one leading space per continuation line and
/// concatenate. Returns logical lines.
pub fn unfold(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for physical in text.split("\r\n") {
        match physical.strip_prefix(' ') {
            Some(rest) if !lines.is_empty() => {
                if let Some(last) = lines.last_mut() {
                    last.push_str(rest);
                }
            }
            _ => lines.push(physical.to_string()),
        }
    }
    lines
}

/// Encode one all-day event (`date` through `date + 1 day`, exclusive
/// end) as a complete calendar artifact.
///
/// An empty note still emits a bare `DESCRIPTION:` line so the event
/// shape is constant.
pub fn encode_event(
    event_id: &str,
    title: &str,
    date: NaiveDate,
    note: &str,
    stamp: DateTime<Utc>,
) -> Vec<u8> {
    let start = date.format("%Y%m%d").to_string();
    let end = date.succ_opt().unwrap_or(date).format("%Y%m%d").to_string();
    let summary = escape_text(title);
    let description = escape_text(note);

    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{}", PRODID),
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}@{}", event_id, UID_DOMAIN),
        format!("DTSTAMP:{}", stamp.format("%Y%m%dT%H%M%SZ")),
        format!("DTSTART;VALUE=DATE:{}", start),
        format!("DTEND;VALUE=DATE:{}", end),
        fold_line("SUMMARY", &summary),
    ];
    if description.is_empty() {
        lines.push("DESCRIPTION:".to_string());
    } else {
        lines.push(fold_line("DESCRIPTION", &description));
    }
    lines.extend([
        "BEGIN:VALARM".to_string(),
        "TRIGGER:-P1D".to_string(),
        "ACTION:DISPLAY".to_string(),
        "DESCRIPTION:Reminder".to_string(),
        "END:VALARM".to_string(),
        "END:VEVENT".to_string(),
        "END:VCALENDAR".to_string(),
    ]);

    lines.join("\r\n").into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 1, 9, 30, 15).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 2).unwrap()
    }

    #[test]
    fn test_escape_special_characters() {
        assert_eq!(escape_text("a;b,c\\d"), "a\\;b\\,c\\\\d");
        assert_eq!(escape_text("line1\nline2"), "line1\\nline2");
        assert_eq!(escape_text("line1\r\nline2"), "line1\\nline2");
        assert_eq!(escape_text("まとめ, 決済"), "まとめ\\, 決済");
    }

    #[test]
    fn test_short_line_is_not_folded() {
        assert_eq!(fold_line("SUMMARY", "abc"), "SUMMARY:abc");
    }

    #[test]
    fn test_line_at_limit_is_not_folded() {
        // "SUMMARY:" is 8 bytes, so 65 value bytes land exactly on 73.
        let value = "x".repeat(65);
        let folded = fold_line("SUMMARY", &value);
        assert_eq!(folded.len(), 73);
        assert!(!folded.contains("\r\n"));
    }

    #[test]
    fn test_long_ascii_line_folds_at_limit() {
        let value = "x".repeat(100);
        let folded = fold_line("SUMMARY", &value);
        let physical: Vec<&str> = folded.split("\r\n").collect();
        assert_eq!(physical.len(), 2);
        assert_eq!(physical[0].len(), 73);
        assert!(physical[1].starts_with(' '));
        assert_eq!(unfold(&folded), vec![format!("SUMMARY:{}", value)]);
    }

    #[test]
    fn test_multibyte_folds_on_char_boundary() {
        let value = "内覧後のフォロー連絡と決済準備".repeat(4);
        let folded = fold_line("DESCRIPTION", &value);
        for physical in folded.split("\r\n") {
            assert!(physical.len() <= 73);
        }
        assert_eq!(unfold(&folded), vec![format!("DESCRIPTION:{}", value)]);
    }

    #[test]
    fn test_unfold_round_trip_short_and_long() {
        for value in [
            "短いメモです。".to_string(),
            "決済当日の持参物と精算の確認。".repeat(20),
        ] {
            let escaped = escape_text(&value);
            let folded = fold_line("DESCRIPTION", &escaped);
            let logical = unfold(&folded);
            assert_eq!(logical, vec![format!("DESCRIPTION:{}", escaped)]);
        }
    }

    #[test]
    fn test_encode_event_structure() {
        let bytes = encode_event("E-102", "Viewing: 内覧を開始", date(), "memo line", stamp());
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.split("\r\n").collect();

        assert_eq!(lines[0], "BEGIN:VCALENDAR");
        assert_eq!(lines[1], "VERSION:2.0");
        assert_eq!(lines[2], "PRODID:-//SellPM//PMOPlus//JP");
        assert_eq!(lines[3], "BEGIN:VEVENT");
        assert_eq!(lines[4], "UID:E-102@sellpm");
        assert_eq!(lines[5], "DTSTAMP:20251101T093015Z");
        assert_eq!(lines[6], "DTSTART;VALUE=DATE:20251102");
        assert_eq!(lines[7], "DTEND;VALUE=DATE:20251103");
        assert!(lines[8].starts_with("SUMMARY:"));
        assert_eq!(*lines.last().unwrap(), "END:VCALENDAR");
        assert!(text.contains("BEGIN:VALARM"));
        assert!(text.contains("TRIGGER:-P1D"));
        assert!(text.contains("ACTION:DISPLAY"));
        assert!(text.contains("DESCRIPTION:Reminder"));
        assert!(text.contains("END:VALARM"));
    }

    #[test]
    fn test_encode_event_empty_note_keeps_bare_description() {
        let bytes = encode_event("E-1", "title", date(), "", stamp());
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\r\nDESCRIPTION:\r\n"));
    }

    #[test]
    fn test_note_newlines_become_literal_escapes() {
        let bytes = encode_event("E-1", "title", date(), "目的: A\n依頼: B", stamp());
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("目的: A\\n依頼: B"));
        // The artifact itself stays free of raw LF inside values.
        let logical = unfold(&text);
        let desc = logical.iter().find(|l| l.starts_with("DESCRIPTION:目的")).unwrap();
        assert!(!desc.contains('\n'));
    }
}
