//! Action-pack assembly for one selected event.
//!
//! A pack bundles the journey compass, checklist, risks, an email draft,
//! a one-line chat snippet, a compact memo, and the calendar artifact.
//! All channels embed the same facts: goal, action, deadline, precheck
//! date, completion criterion, and owner.

use chrono::{DateTime, Duration, Utc};

use crate::ics;
use crate::localize::localize_text;
use crate::playbook;
use crate::types::{ActionPack, ContactBook, EmailDraft, Event, Language};
use crate::util::truncate_chars;

const PRECHECK_LEAD_DAYS: i64 = 2;

/// Build the full pack. Contact lookup misses render bracketed prompts;
/// empty event fields render empty but the pack shape stays complete.
pub fn build_pack(
    event: &Event,
    contacts: &ContactBook,
    lang: Language,
    stamp: DateTime<Utc>,
) -> ActionPack {
    let cat = event.category.as_str();
    let date = event.date.format("%Y-%m-%d").to_string();
    let precheck = (event.date - Duration::days(PRECHECK_LEAD_DAYS))
        .format("%Y-%m-%d")
        .to_string();

    let compass = playbook::compass_line(event, lang);
    let checklist: Vec<String> = playbook::checklist(&event.category, lang)
        .iter()
        .map(|s| s.to_string())
        .collect();
    let risks: Vec<String> = playbook::risks(&event.category, lang)
        .iter()
        .map(|s| s.to_string())
        .collect();
    let contact = contacts.lookup(&event.actor);

    let (email, chat_snippet, memo) = match lang {
        Language::Ja => {
            let to = or_placeholder(&contact.to, "＜宛先メール＞");
            let cc = or_placeholder(&contact.cc, "＜共有者＞");
            let attachments = or_placeholder(&contact.attachments, "＜必要資料＞");
            let subject = format!(
                "{} / {}… 進行のお願い（{} まで）",
                cat,
                truncate_chars(&event.description, 18),
                date
            );
            let body = format!(
                "件名: {}\nTo: {}\nCc: {}\n\n{} 各位\n※ {}\n以下のとおりご対応をお願いします。\n- 目的: {}\n- 依頼: {}\n- 期限: {}（可能であれば {} までの事前確認）\n- 完了条件: {}\n- 参考: チェックリスト（下記）／想定リスク（下記）\n添付: {}\n\nPMO",
                subject,
                to,
                cc,
                event.actor,
                compass,
                event.description,
                event.expected_action,
                date,
                precheck,
                event.success_criteria,
                attachments
            );
            let chat = format!(
                "[{}] {} → {} ｜期限 {}（事前確認 {}）｜担当 {}",
                cat, event.description, event.expected_action, date, precheck, event.actor
            );
            let memo = format!(
                "{} | 目的: {}\n依頼: {}\n完了条件: {}\n担当: {}\n事前確認: {}\n旅路: {}",
                cat,
                event.description,
                event.expected_action,
                event.success_criteria,
                event.actor,
                precheck,
                compass
            );
            (
                EmailDraft {
                    subject,
                    to,
                    cc,
                    body,
                },
                chat,
                memo,
            )
        }
        Language::En => {
            let desc = localize_text(&event.description, lang);
            let action = localize_text(&event.expected_action, lang);
            let done = localize_text(&event.success_criteria, lang);
            let to = or_placeholder(&contact.to, "<recipient>");
            let cc = or_placeholder(&contact.cc, "<stakeholders>");
            let attachments = or_placeholder(&contact.attachments, "<attachments>");
            let subject = format!(
                "{} — action needed by {}: {}",
                cat,
                date,
                truncate_chars(&desc, 32)
            );
            let body = format!(
                "Subject: {}\nTo: {}\nCc: {}\n\nDear {},\n* {}\nPlease proceed as follows:\n- Goal: {}\n- Action: {}\n- Deadline: {} (early check by {})\n- Done: {}\n- Ref: Checklist (below) / Risks (below)\nAttachments: {}\n\nPMO",
                subject, to, cc, event.actor, compass, desc, action, date, precheck, done, attachments
            );
            let chat = format!(
                "[{}] {} → {} | due {} (precheck {}) | owner {}",
                cat, desc, action, date, precheck, event.actor
            );
            let memo = format!(
                "{} | Goal: {}\nAction: {}\nDone: {}\nOwner: {}\nPrecheck: {}\nJourney: {}",
                cat, desc, action, done, event.actor, precheck, compass
            );
            (
                EmailDraft {
                    subject,
                    to,
                    cc,
                    body,
                },
                chat,
                memo,
            )
        }
    };

    // The calendar title keeps the raw description in both languages so
    // the imported event matches the source sheet.
    let title = format!("{}: {}", cat, event.description);
    let calendar_artifact = ics::encode_event(&event.id, &title, event.date, &memo, stamp);

    ActionPack {
        event_id: event.id.clone(),
        language: lang,
        compass,
        checklist,
        risks,
        email,
        chat_snippet,
        memo,
        calendar_artifact,
    }
}

/// Render the fixed-order text artifact: compass, checklist, risks,
/// email draft, chat snippet.
pub fn render_text(pack: &ActionPack) -> String {
    match pack.language {
        Language::Ja => format!(
            "旅路コンパス\n{}\n\nチェックリスト\n- {}\n\nリスク/確認\n- {}\n\nメール文例（コピー可）\n{}\n\nSlack/チャット用短文\n{}",
            pack.compass,
            pack.checklist.join("\n- "),
            pack.risks.join("\n- "),
            pack.email.body,
            pack.chat_snippet
        ),
        Language::En => format!(
            "Journey compass\n{}\n\nChecklist\n- {}\n\nRisks / Checks\n- {}\n\nEmail Draft\n{}\n\nChat Snippet\n{}",
            pack.compass,
            pack.checklist.join("\n- "),
            pack.risks.join("\n- "),
            pack.email.body,
            pack.chat_snippet
        ),
    }
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.trim().is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ics::unfold;
    use crate::types::{Category, Contact, RiskLevel, Stage};
    use chrono::{NaiveDate, TimeZone};
    use std::collections::HashMap;

    fn make_event(description: &str) -> Event {
        Event {
            id: "E-102".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 11, 2).unwrap(),
            actor: "仲介A社".to_string(),
            category: Category::Known(Stage::Viewing),
            description: description.to_string(),
            expected_action: "内覧開始の準備OK".to_string(),
            success_criteria: "初週スロット確保".to_string(),
            risk_level: RiskLevel::High,
        }
    }

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 1, 9, 30, 15).unwrap()
    }

    fn book_with_contact() -> ContactBook {
        ContactBook::new(HashMap::from([(
            "仲介A社".to_string(),
            Contact {
                to: "agent-a@example.jp".to_string(),
                cc: "owner@example.jp".to_string(),
                attachments: "鍵リスト.pdf".to_string(),
            },
        )]))
    }

    #[test]
    fn test_ja_subject_truncates_at_eighteen_chars() {
        let ev = make_event("内覧後のフォロー連絡と決済準備の確認です");
        let pack = build_pack(&ev, &ContactBook::default(), Language::Ja, stamp());
        assert_eq!(
            pack.email.subject,
            "Viewing / 内覧後のフォロー連絡と決済準備の確認… 進行のお願い（2025-11-02 まで）"
        );
    }

    #[test]
    fn test_ja_subject_keeps_ellipsis_for_short_descriptions() {
        let ev = make_event("売出");
        let pack = build_pack(&ev, &ContactBook::default(), Language::Ja, stamp());
        assert_eq!(
            pack.email.subject,
            "Viewing / 売出… 進行のお願い（2025-11-02 まで）"
        );
    }

    #[test]
    fn test_en_subject_truncates_localized_description_at_thirty_two() {
        let ev = make_event("文言統一・差異チェック・ファーストビュー最適化");
        let pack = build_pack(&ev, &ContactBook::default(), Language::En, stamp());
        assert_eq!(
            pack.email.subject,
            "Viewing — action needed by 2025-11-02: unify wording, check discrepanci"
        );
    }

    #[test]
    fn test_precheck_is_two_days_before_deadline() {
        let ev = make_event("内覧を開始");
        let pack = build_pack(&ev, &ContactBook::default(), Language::Ja, stamp());
        assert!(pack
            .email
            .body
            .contains("期限: 2025-11-02（可能であれば 2025-10-31 までの事前確認）"));
        assert!(pack.chat_snippet.contains("事前確認 2025-10-31"));
    }

    #[test]
    fn test_missing_contact_renders_bracketed_prompts() {
        let ev = make_event("内覧を開始");
        let ja = build_pack(&ev, &ContactBook::default(), Language::Ja, stamp());
        assert_eq!(ja.email.to, "＜宛先メール＞");
        assert!(ja.email.body.contains("To: ＜宛先メール＞"));
        assert!(ja.email.body.contains("添付: ＜必要資料＞"));

        let en = build_pack(&ev, &ContactBook::default(), Language::En, stamp());
        assert_eq!(en.email.to, "<recipient>");
        assert!(en.email.body.contains("Cc: <stakeholders>"));
        assert!(en.email.body.contains("Attachments: <attachments>"));
    }

    #[test]
    fn test_resolved_contact_passes_through() {
        let ev = make_event("内覧を開始");
        let pack = build_pack(&ev, &book_with_contact(), Language::Ja, stamp());
        assert_eq!(pack.email.to, "agent-a@example.jp");
        assert!(pack.email.body.contains("Cc: owner@example.jp"));
        assert!(pack.email.body.contains("添付: 鍵リスト.pdf"));
    }

    #[test]
    fn test_ja_chat_snippet_single_line_format() {
        let ev = make_event("内覧を開始");
        let pack = build_pack(&ev, &ContactBook::default(), Language::Ja, stamp());
        assert_eq!(
            pack.chat_snippet,
            "[Viewing] 内覧を開始 → 内覧開始の準備OK ｜期限 2025-11-02（事前確認 2025-10-31）｜担当 仲介A社"
        );
        assert!(!pack.chat_snippet.contains('\n'));
    }

    #[test]
    fn test_en_channels_localize_fields() {
        let ev = make_event("内覧を開始");
        let pack = build_pack(&ev, &ContactBook::default(), Language::En, stamp());
        assert_eq!(
            pack.chat_snippet,
            "[Viewing] start viewings → ready to start viewings | due 2025-11-02 (precheck 2025-10-31) | owner 仲介A社"
        );
        assert!(pack.email.body.contains("- Goal: start viewings"));
        assert!(pack
            .email
            .body
            .contains("- Done: secured slots for the first week"));
    }

    #[test]
    fn test_memo_uses_real_newlines_and_fixed_field_order() {
        let ev = make_event("内覧を開始");
        let pack = build_pack(&ev, &ContactBook::default(), Language::Ja, stamp());
        let lines: Vec<&str> = pack.memo.split('\n').collect();
        assert_eq!(lines[0], "Viewing | 目的: 内覧を開始");
        assert_eq!(lines[1], "依頼: 内覧開始の準備OK");
        assert_eq!(lines[2], "完了条件: 初週スロット確保");
        assert_eq!(lines[3], "担当: 仲介A社");
        assert_eq!(lines[4], "事前確認: 2025-10-31");
        assert!(lines[5].starts_with("旅路: 旅路 3/6｜内覧フェーズ。"));
    }

    #[test]
    fn test_calendar_artifact_embeds_raw_title_and_escaped_memo() {
        let ev = make_event("内覧を開始");
        let pack = build_pack(&ev, &ContactBook::default(), Language::En, stamp());
        let text = String::from_utf8(pack.calendar_artifact.clone()).unwrap();
        let logical = unfold(&text);

        let summary = logical
            .iter()
            .find(|l| l.starts_with("SUMMARY:"))
            .unwrap();
        assert_eq!(summary, "SUMMARY:Viewing: 内覧を開始");

        let description = logical
            .iter()
            .find(|l| l.starts_with("DESCRIPTION:Viewing"))
            .unwrap();
        assert!(description.contains("\\nAction: "));
        assert!(text.contains("UID:E-102@sellpm"));
    }

    #[test]
    fn test_render_text_keeps_fixed_section_order() {
        let ev = make_event("内覧を開始");
        let ja = build_pack(&ev, &ContactBook::default(), Language::Ja, stamp());
        let text = render_text(&ja);
        let order = [
            "旅路コンパス",
            "チェックリスト",
            "リスク/確認",
            "メール文例（コピー可）",
            "Slack/チャット用短文",
        ];
        let mut last = 0;
        for header in order {
            let pos = text.find(header).unwrap();
            assert!(pos >= last);
            last = pos;
        }

        let en = build_pack(&ev, &ContactBook::default(), Language::En, stamp());
        let text = render_text(&en);
        assert!(text.starts_with("Journey compass\n"));
        assert!(text.contains("\n\nChecklist\n- "));
        assert!(text.contains("\n\nRisks / Checks\n- "));
        assert!(text.contains("\n\nEmail Draft\n"));
        assert!(text.contains("\n\nChat Snippet\n"));
    }
}
