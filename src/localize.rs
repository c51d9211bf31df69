//! Two-tier Japanese→English localization.
//!
//! Exact-phrase lookup runs first; when it misses, a substring glossary
//! is applied longest key first so compound terms are substituted before
//! their fragments. Japanese output is the identity path and returns the
//! input untouched.

use std::sync::OnceLock;

use crate::types::Language;

// ==========================================================================
// Exact phrase dictionary
// ==========================================================================

/// Exact JP phrases commonly seen in event sheets.
const PHRASES: &[(&str, &str)] = &[
    (
        "売却検討を開始（要件整理）",
        "start exploring the sale (collect requirements)",
    ),
    (
        "希望価格・引渡時期・残置物の方針メモ化",
        "draft target price, closing timing, and remaining items policy",
    ),
    (
        "4社へ査定依頼（一般媒介を前提）",
        "request valuation from 4 agents (open listing)",
    ),
    (
        "必要資料を送付・査定日程の確定",
        "send required documents and fix appraisal schedule",
    ),
    (
        "一般媒介契約を4社と締結",
        "sign open listing agreements with four agents",
    ),
    (
        "契約書署名・掲載指示の共有",
        "sign contracts and share listing instructions",
    ),
    (
        "写真・間取・告知事項の準備",
        "prepare photos, floor plan, and disclosures",
    ),
    (
        "写真選定／間取データ／告知素案の確定",
        "select photos, finalize floor plan data and disclosure draft",
    ),
    ("掲載開始（ティザー含む）", "start listing (with teaser)"),
    (
        "文言統一・差異チェック・ファーストビュー最適化",
        "unify wording, check discrepancies, optimize lead photo/summary",
    ),
    ("引越し業者の選定と予約", "select and book movers"),
    (
        "見積比較・搬出日の確定",
        "compare quotes and fix moving-out date",
    ),
    ("ハウスクリーニングの実施", "perform house cleaning"),
    ("作業日・作業内容の確定", "fix work date and scope"),
    (
        "内覧準備（鍵・動線・掲示物）",
        "prepare for viewings (keys, route, notices)",
    ),
    ("内覧開始の準備OK", "ready to start viewings"),
    ("内覧を開始", "start viewings"),
    (
        "スロット確定・案内配信・共用掲示許可",
        "fix slots, send notices, obtain HOA permission",
    ),
    ("初週スロット≥6を確保", "secure ≥6 slots in the first week"),
    (
        "一次申込の受領（条件ヒア）",
        "receive initial offer (collect terms)",
    ),
    (
        "価格/時期/残置/手付の希望を整理・本人確認",
        "organize preferences (price/timing/fixtures/deposit) and verify identity",
    ),
    (
        "条件合意（価格・時期・残置・手付）",
        "agree on terms (price/timing/fixtures/deposit)",
    ),
    ("条件表ドラフト合意", "agree on draft term sheet"),
    ("売買契約の締結", "execute the sales contract"),
    (
        "契約書署名捺印・手付受領",
        "sign the contract (with seal) and receive the deposit",
    ),
    (
        "契約完了・手付入金確認",
        "contract executed; deposit received",
    ),
    ("ローン本審査の申請", "apply for mortgage underwriting"),
    (
        "必要書類の提出・司法書士連携の準備",
        "submit required documents; prepare with judicial scrivener",
    ),
    ("本審査申請完了", "underwriting application submitted"),
    ("ローン承認の取得", "obtain loan approval"),
    (
        "決済日・司法書士・銀行予約の確定",
        "fix closing date, scrivener, and bank appointment",
    ),
    ("決済日程が確定", "closing schedule fixed"),
    (
        "決済・引渡（鍵・精算・立会い）",
        "closing & handover (keys/settlement/walkthrough)",
    ),
    (
        "持参物確認・精算表確定・鍵引渡",
        "confirm items to bring, finalize settlement, hand over keys",
    ),
    ("引渡完了（明け渡し）", "handover complete (vacant possession)"),
    // success criteria / shorthand forms
    ("掲載準備OK", "ready to publish"),
    ("掲載完了", "listing completed"),
    ("搬出予約完了", "moving-out booked"),
    ("清掃完了（写真記録）", "cleaning completed (with photos)"),
    ("初週スロット確保", "secured slots for the first week"),
    ("契約日確定", "contract date fixed"),
    ("契約完了", "contract executed"),
    ("承認取得", "approval obtained"),
    ("決済日程確定", "closing date fixed"),
    ("引渡完了", "handover completed"),
    (
        "要件メモ作成・家族合意",
        "requirement memo completed; family alignment",
    ),
];

// ==========================================================================
// Substring glossary
// ==========================================================================

/// Domain terms applied by substring replacement when no exact phrase
/// matches. Replacement order is longest key first; see
/// [`glossary_by_length`].
const GLOSSARY: &[(&str, &str)] = &[
    ("一般媒介契約", "open listing agreement"),
    ("専任媒介契約", "exclusive agency agreement"),
    ("専属専任媒介契約", "exclusive right-to-sell agreement"),
    ("ファーストビュー", "lead photo/summary"),
    ("ティザー", "teaser"),
    ("内覧スロット", "viewing slots"),
    ("案内配信", "send notices"),
    ("共用部掲示", "common-area notices"),
    ("管理", "management/HOA"),
    ("本人確認", "KYC"),
    ("資金裏取り", "funds verification"),
    ("仮審査", "pre-approval"),
    ("本審査", "underwriting (final approval)"),
    ("承認", "approval"),
    ("決済", "closing"),
    ("引渡", "handover"),
    ("抹消", "lien release"),
    ("残債", "outstanding loan balance"),
    ("司法書士", "judicial scrivener"),
    ("精算表", "settlement statement"),
    ("違約条項", "default clauses"),
    ("残置物", "remaining items/fixtures"),
    ("手付", "deposit (earnest money)"),
    ("立会い", "walkthrough"),
    ("鍵引渡", "key handover"),
    ("最終検針", "final meter reading"),
    ("清掃", "cleaning"),
    ("駐車場", "parking"),
    ("倉庫", "storage"),
    ("掲載差異", "listing discrepancy"),
    ("告知漏れ", "disclosure omission"),
    ("価格", "price"),
    ("時期", "timing"),
    ("面積", "area"),
    ("向き", "orientation"),
    ("駅", "station"),
    ("共用", "shared facilities"),
    ("撮影ルール", "photo policy"),
    ("注意書き", "house rules"),
    ("動線", "route"),
    ("鍵", "keys"),
    ("差異チェック", "discrepancy check"),
    ("問い合わせ", "inquiry"),
    ("内覧", "viewing"),
    ("申込", "offer"),
    ("申し込み", "offer"),
    ("契約", "contract"),
    ("銀行予約", "bank appointment"),
    ("決済日", "closing date"),
    ("持参物", "items to bring"),
    ("明け渡し", "vacant possession"),
];

/// Glossary entries sorted longest key first, by char count. The sort is
/// stable, so equal-length keys keep table order.
fn glossary_by_length() -> &'static [(&'static str, &'static str)] {
    static SORTED: OnceLock<Vec<(&'static str, &'static str)>> = OnceLock::new();
    SORTED.get_or_init(|| {
        let mut entries = GLOSSARY.to_vec();
        entries.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));
        entries
    })
}

/// Localize one field of text.
///
/// Japanese is the source language, so `Language::Ja` returns the input
/// unchanged. For English: exact phrase match first, then the substring
/// glossary longest key first, then punctuation normalization.
pub fn localize_text(text: &str, lang: Language) -> String {
    if lang == Language::Ja {
        return text.to_string();
    }

    let translated = match PHRASES.iter().find(|(ja, _)| *ja == text) {
        Some((_, en)) => (*en).to_string(),
        None => {
            let mut t = text.to_string();
            for (ja, en) in glossary_by_length() {
                if t.contains(ja) {
                    t = t.replace(ja, en);
                }
            }
            t
        }
    };

    normalize(&translated)
}

/// Fold full-width punctuation into ASCII and trim.
fn normalize(s: &str) -> String {
    s.replace('（', "(")
        .replace('）', ")")
        .replace('・', "/")
        .replace('\u{3000}', " ")
        .trim()
        .to_string()
}
