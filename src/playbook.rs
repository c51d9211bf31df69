//! Stage playbook: per-stage checklists and risk notes, stage labels,
//! and the one-line journey compass.
//!
//! All content is static bilingual data. Unknown categories degrade to a
//! generic checklist and risk list rather than an error.

use crate::localize::localize_text;
use crate::types::{Category, Event, Language, Stage};

// ==========================================================================
// Stage labels and next-step hints
// ==========================================================================

pub fn stage_label(stage: Stage, lang: Language) -> &'static str {
    match (stage, lang) {
        (Stage::Prep, Language::Ja) => "準備フェーズ",
        (Stage::Listing, Language::Ja) => "掲載フェーズ（初動調整）",
        (Stage::Viewing, Language::Ja) => "内覧フェーズ",
        (Stage::Offer, Language::Ja) => "契約フェーズ（最終調整）",
        (Stage::Finance, Language::Ja) => "資金・本審査フェーズ",
        (Stage::Close, Language::Ja) => "決済・引渡フェーズ",
        (Stage::Prep, Language::En) => "Preparation",
        (Stage::Listing, Language::En) => "Listing (early tuning)",
        (Stage::Viewing, Language::En) => "Viewings",
        (Stage::Offer, Language::En) => "Contract (finalizing)",
        (Stage::Finance, Language::En) => "Financing / Underwriting",
        (Stage::Close, Language::En) => "Closing / Handover",
    }
}

pub fn next_hint(stage: Stage, lang: Language) -> &'static str {
    match (stage, lang) {
        (Stage::Prep, Language::Ja) => "査定・掲載の着手",
        (Stage::Listing, Language::Ja) => "内覧準備 → 内覧開始",
        (Stage::Viewing, Language::Ja) => "申込受領 → 条件整理",
        (Stage::Offer, Language::Ja) => "本審査申請 → 承認 → 決済日確定",
        (Stage::Finance, Language::Ja) => "決済準備 → 決済",
        (Stage::Close, Language::Ja) => "おつかれさまでした（引渡完了）",
        (Stage::Prep, Language::En) => "start valuation/listing",
        (Stage::Listing, Language::En) => "prepare viewings → start",
        (Stage::Viewing, Language::En) => "collect offers → align terms",
        (Stage::Offer, Language::En) => "apply for underwriting → approval → set closing date",
        (Stage::Finance, Language::En) => "prepare for closing → close",
        (Stage::Close, Language::En) => "all done (handover)",
    }
}

// ==========================================================================
// Checklists and risks
// ==========================================================================

/// Checklist items for a category, falling back to a generic list when the
/// category maps to no known stage.
pub fn checklist(category: &Category, lang: Language) -> &'static [&'static str] {
    match (category.stage(), lang) {
        (Some(Stage::Prep), Language::Ja) => &[
            "写真・間取・コピーの統一（出典/撮影可否の確認含む）",
            "掲載媒体の差異防止テンプレ配布（価格・面積・向き）",
            "告知事項の素案作成（設備不具合・近隣工事 など）",
        ],
        (Some(Stage::Listing), Language::Ja) => &[
            "ポータル文言統一・差異チェック（社名/免許/価格）",
            "匿名ティザー文（駅・面積・向き・共用の魅力）",
            "問い合わせ→内覧の動線（初動SLA/FAQ）",
        ],
        (Some(Stage::Viewing), Language::Ja) => &[
            "内覧スロット/鍵/動線/注意書きの確定",
            "共用部掲示の許可・撮影ルールの確認",
            "来訪者記録（氏名/時間/仲介/所感）",
        ],
        (Some(Stage::Offer), Language::Ja) => &[
            "回答期日・優先軸（価格/時期/残置・手付）の合意",
            "条件表（価格・手付・融資・引渡・違約条項）を共通フォーマットで",
            "本人確認・資金裏取りの段取り",
        ],
        (Some(Stage::Finance), Language::Ja) => &[
            "残債/抹消手続きの必要書類（委任状/印鑑証明 等）",
            "決済日・銀行予約・司法書士連携の確定",
            "決済時の精算表ドラフト作成",
        ],
        (Some(Stage::Close), Language::Ja) => &[
            "決済当日の持参物（鍵/書類/印鑑/本人確認）",
            "残置物・引渡時間・立会いの確認",
            "最終検針・清掃・駐車場/倉庫の扱い",
        ],
        (Some(Stage::Prep), Language::En) => &[
            "Unify photos/floor plan/copy (check sources and shooting permissions)",
            "Distribute anti-discrepancy template for listing fields (price/area/orientation)",
            "Draft disclosure items (equipment issues / nearby construction, etc.)",
        ],
        (Some(Stage::Listing), Language::En) => &[
            "Standardize portal wording & discrepancy check (company/license/price)",
            "Anonymous teaser copy (station/area/orientation/shared facilities)",
            "Path from inquiry to viewing (initial SLA/FAQ)",
        ],
        (Some(Stage::Viewing), Language::En) => &[
            "Fix viewing slots/keys/route/house rules",
            "Confirm HOA/management permission for notices; define photo policy",
            "Record visitors (name/time/agent/impressions)",
        ],
        (Some(Stage::Offer), Language::En) => &[
            "Agree on response deadline & priorities (price/timing/fixtures/deposit)",
            "Use a standard term sheet (price, deposit, financing, closing, default clauses)",
            "Plan KYC and funds verification",
        ],
        (Some(Stage::Finance), Language::En) => &[
            "List docs for lien release/cancellation (POA, seal certificate, etc.)",
            "Fix closing date, bank appointment, and judicial scrivener coordination",
            "Draft settlement statement",
        ],
        (Some(Stage::Close), Language::En) => &[
            "Closing-day checklist (keys/docs/ID/seal)",
            "Confirm remaining items, handover time, presence at walkthrough",
            "Final meter reading/cleaning/parking or storage handling",
        ],
        (None, Language::Ja) => &["前提確認（関係者・目的・期限）", "ダブルチェックの設定"],
        (None, Language::En) => &[
            "Prerequisites (stakeholders/objective/deadline)",
            "Set up double-checks",
        ],
    }
}

/// Risk notes for a category, with the same generic fallback rule as
/// [`checklist`].
pub fn risks(category: &Category, lang: Language) -> &'static [&'static str] {
    match (category.stage(), lang) {
        (Some(Stage::Prep), Language::Ja) => &["掲載差異の発生", "告知漏れによるトラブル"],
        (Some(Stage::Listing), Language::Ja) => {
            &["価格/面積の不一致", "Q&A不足による内覧化率低下"]
        }
        (Some(Stage::Viewing), Language::Ja) => {
            &["共用部ルール違反", "鍵・動線ミスによる苦情"]
        }
        (Some(Stage::Offer), Language::Ja) => {
            &["口頭合意の曖昧化", "手付/違約条項の不一致"]
        }
        (Some(Stage::Finance), Language::Ja) => {
            &["抹消手続きの期日未整合", "必要書類不足"]
        }
        (Some(Stage::Close), Language::Ja) => &["持参物不足", "引渡条件の解釈ズレ"],
        (Some(Stage::Prep), Language::En) => {
            &["Listing discrepancies", "Disclosure omissions causing trouble"]
        }
        (Some(Stage::Listing), Language::En) => {
            &["Price/area mismatch", "Insufficient Q&A reduces viewing rate"]
        }
        (Some(Stage::Viewing), Language::En) => &[
            "Common-area rule violations",
            "Complaints due to key/route mistakes",
        ],
        (Some(Stage::Offer), Language::En) => &[
            "Ambiguity from verbal agreements",
            "Mismatch on deposit/default clauses",
        ],
        (Some(Stage::Finance), Language::En) => &[
            "Deadline mismatch for cancellations",
            "Insufficient required documents",
        ],
        (Some(Stage::Close), Language::En) => &[
            "Items missing on closing day",
            "Different interpretations of handover conditions",
        ],
        (None, Language::Ja) => &["関係者間の前提ズレ", "期日直前の修正"],
        (None, Language::En) => &[
            "Ambiguity among stakeholders",
            "Late adjustments near the deadline",
        ],
    }
}

// ==========================================================================
// Journey compass
// ==========================================================================

/// One-line narrative of where this event sits in the six-stage journey.
///
/// Unknown categories render a "–/–" position with the raw category text
/// as the stage label. The Japanese line quotes the description verbatim;
/// the English line localizes it.
pub fn compass_line(event: &Event, lang: Language) -> String {
    let when = event.date.format("%Y-%m-%d");
    match (event.category.stage(), lang) {
        (Some(stage), Language::Ja) => format!(
            "旅路 {}/{}｜{}。{} に『{}』— 次は {}。",
            stage.position(),
            Stage::ALL.len(),
            stage_label(stage, lang),
            when,
            event.description,
            next_hint(stage, lang),
        ),
        (Some(stage), Language::En) => format!(
            "Journey {}/{} | {}. On {}: \u{201c}{}\u{201d}. Next: {}.",
            stage.position(),
            Stage::ALL.len(),
            stage_label(stage, lang),
            when,
            localize_text(&event.description, lang),
            next_hint(stage, lang),
        ),
        (None, Language::Ja) => format!(
            "旅路 –/–｜{}。{} に『{}』— 次は {}。",
            event.category.as_str(),
            when,
            event.description,
            "次の工程へ",
        ),
        (None, Language::En) => format!(
            "Journey –/– | {}. On {}: \u{201c}{}\u{201d}. Next: {}.",
            event.category.as_str(),
            when,
            localize_text(&event.description, lang),
            "next step",
        ),
    }
}
