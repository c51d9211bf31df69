//! Lexical evidence retrieval over a JSONL notes corpus.
//!
//! Tokens are lowercase runs of ASCII alphanumerics or Japanese script
//! (hiragana, katakana, CJK, prolonged sound mark); everything else is
//! a separator, and tokens under 2 chars are dropped. A chunk's score
//! counts its token occurrences that appear in the query token set, so
//! repeated hits in one chunk weigh more.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::types::{Event, EvidenceChunk, Language};

pub const DEFAULT_TOP_K: usize = 3;

/// Outcome of a retrieval. The three no-result cases stay distinct so
/// the caller can render an explicit message instead of an empty list.
#[derive(Debug, Clone, PartialEq)]
pub enum EvidenceOutcome {
    NoCorpus,
    NoQueryTokens,
    NoMatches,
    Hits(Vec<ScoredChunk>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub chunk: EvidenceChunk,
    pub score: usize,
}

fn re_separator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9ぁ-んァ-ヶ一-龥ー]+").unwrap())
}

pub fn tokenize(s: &str) -> Vec<String> {
    let lowered = s.to_lowercase();
    let spaced = re_separator().replace_all(&lowered, " ");
    spaced
        .split_whitespace()
        .filter(|t| t.chars().count() >= 2)
        .map(|t| t.to_string())
        .collect()
}

/// Rank corpus chunks against the event's category, description, and
/// expected action. Zero-score chunks are discarded; ties keep corpus
/// order.
pub fn retrieve(event: &Event, corpus: &[EvidenceChunk], top_k: usize) -> EvidenceOutcome {
    if corpus.is_empty() {
        return EvidenceOutcome::NoCorpus;
    }

    let query = format!(
        "{} {} {}",
        event.category.as_str(),
        event.description,
        event.expected_action
    );
    let query_tokens: HashSet<String> = tokenize(&query).into_iter().collect();
    if query_tokens.is_empty() {
        return EvidenceOutcome::NoQueryTokens;
    }

    let mut scored: Vec<ScoredChunk> = Vec::new();
    for chunk in corpus {
        let score = tokenize(&chunk.text)
            .iter()
            .filter(|t| query_tokens.contains(t.as_str()))
            .count();
        if score > 0 {
            scored.push(ScoredChunk {
                chunk: chunk.clone(),
                score,
            });
        }
    }

    if scored.is_empty() {
        return EvidenceOutcome::NoMatches;
    }

    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(top_k);
    EvidenceOutcome::Hits(scored)
}

/// Render an outcome as display text: one bullet per hit with its
/// source line, or the explicit no-result message.
pub fn render(outcome: &EvidenceOutcome, lang: Language) -> String {
    match outcome {
        EvidenceOutcome::NoCorpus => match lang {
            Language::Ja => "（根拠データが未設定です）".to_string(),
            Language::En => "(No evidence corpus available)".to_string(),
        },
        EvidenceOutcome::NoQueryTokens => match lang {
            Language::Ja => "（検索語がありません）".to_string(),
            Language::En => "(No query tokens)".to_string(),
        },
        EvidenceOutcome::NoMatches => match lang {
            Language::Ja => "（該当する根拠は見つかりませんでした）".to_string(),
            Language::En => "(No matching evidence found)".to_string(),
        },
        EvidenceOutcome::Hits(hits) => {
            let label = match lang {
                Language::Ja => "出典",
                Language::En => "source",
            };
            hits.iter()
                .map(|hit| {
                    let source = hit.chunk.source.as_deref().unwrap_or("note");
                    let mut line = format!("・{}\n   └ {}: {}", hit.chunk.text, label, source);
                    if let Some(page) = hit.chunk.page {
                        line.push_str(&format!(" p.{}", page));
                    }
                    if let Some(tag) = &hit.chunk.tag {
                        if !tag.is_empty() {
                            line.push_str(&format!(" #{}", tag));
                        }
                    }
                    line
                })
                .collect::<Vec<_>>()
                .join("\n")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, RiskLevel, Stage};
    use chrono::NaiveDate;

    fn make_event(description: &str, expected_action: &str) -> Event {
        Event {
            id: "E-001".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 11, 2).unwrap(),
            actor: "仲介A社".to_string(),
            category: Category::Known(Stage::Viewing),
            description: description.to_string(),
            expected_action: expected_action.to_string(),
            success_criteria: String::new(),
            risk_level: RiskLevel::Medium,
        }
    }

    fn chunk(text: &str) -> EvidenceChunk {
        EvidenceChunk {
            text: text.to_string(),
            source: None,
            page: None,
            tag: None,
        }
    }

    #[test]
    fn test_tokenize_mixed_scripts() {
        assert_eq!(
            tokenize("内覧の鍵を確認 Key-Check 12"),
            vec!["内覧の鍵を確認", "key", "check", "12"]
        );
    }

    #[test]
    fn test_tokenize_drops_tokens_under_two_chars() {
        assert_eq!(tokenize("a 鍵 ab 内覧"), vec!["ab", "内覧"]);
        assert!(tokenize("。、！？").is_empty());
    }

    #[test]
    fn test_empty_corpus_is_distinct_outcome() {
        let ev = make_event("内覧 スロット", "鍵 手配");
        assert_eq!(retrieve(&ev, &[], DEFAULT_TOP_K), EvidenceOutcome::NoCorpus);
    }

    #[test]
    fn test_no_query_tokens_is_distinct_outcome() {
        let mut ev = make_event("。", "、");
        ev.category = Category::Other("x".to_string());
        let corpus = vec![chunk("内覧 スロット")];
        assert_eq!(
            retrieve(&ev, &corpus, DEFAULT_TOP_K),
            EvidenceOutcome::NoQueryTokens
        );
    }

    #[test]
    fn test_no_overlap_reports_no_matches() {
        let ev = make_event("内覧 スロット", "鍵 手配");
        let corpus = vec![chunk("残債 抹消 決済日")];
        assert_eq!(
            retrieve(&ev, &corpus, DEFAULT_TOP_K),
            EvidenceOutcome::NoMatches
        );
    }

    #[test]
    fn test_two_term_overlap_ranks_before_one() {
        let ev = make_event("内覧 スロット 確認", "鍵 手配");
        let corpus = vec![chunk("内覧 の案内"), chunk("内覧 スロット 準備")];
        match retrieve(&ev, &corpus, DEFAULT_TOP_K) {
            EvidenceOutcome::Hits(hits) => {
                assert_eq!(hits.len(), 2);
                assert_eq!(hits[0].chunk.text, "内覧 スロット 準備");
                assert_eq!(hits[0].score, 2);
                assert_eq!(hits[1].score, 1);
            }
            other => panic!("expected hits, got {:?}", other),
        }
    }

    #[test]
    fn test_repeated_token_counts_with_multiplicity() {
        let ev = make_event("内覧 スロット 確認", "手配");
        let corpus = vec![chunk("内覧 スロット"), chunk("内覧 内覧 内覧")];
        match retrieve(&ev, &corpus, DEFAULT_TOP_K) {
            EvidenceOutcome::Hits(hits) => {
                assert_eq!(hits[0].chunk.text, "内覧 内覧 内覧");
                assert_eq!(hits[0].score, 3);
            }
            other => panic!("expected hits, got {:?}", other),
        }
    }

    #[test]
    fn test_ties_keep_corpus_order_and_top_k_caps() {
        let ev = make_event("内覧", "確認");
        let corpus = vec![
            chunk("内覧 その1"),
            chunk("内覧 その2"),
            chunk("内覧 その3"),
            chunk("内覧 その4"),
        ];
        match retrieve(&ev, &corpus, 3) {
            EvidenceOutcome::Hits(hits) => {
                assert_eq!(hits.len(), 3);
                assert_eq!(hits[0].chunk.text, "内覧 その1");
                assert_eq!(hits[2].chunk.text, "内覧 その3");
            }
            other => panic!("expected hits, got {:?}", other),
        }
    }

    #[test]
    fn test_render_hit_includes_source_page_tag() {
        let hits = EvidenceOutcome::Hits(vec![ScoredChunk {
            chunk: EvidenceChunk {
                text: "内覧前に鍵と動線を確認".to_string(),
                source: Some("note.md".to_string()),
                page: Some(3),
                tag: Some("内覧".to_string()),
            },
            score: 2,
        }]);
        assert_eq!(
            render(&hits, Language::Ja),
            "・内覧前に鍵と動線を確認\n   └ 出典: note.md p.3 #内覧"
        );
    }

    #[test]
    fn test_render_defaults_missing_source_to_note() {
        let hits = EvidenceOutcome::Hits(vec![ScoredChunk {
            chunk: chunk("テキスト"),
            score: 1,
        }]);
        assert_eq!(render(&hits, Language::En), "・テキスト\n   └ source: note");
    }

    #[test]
    fn test_render_messages_are_localized() {
        assert_eq!(
            render(&EvidenceOutcome::NoCorpus, Language::Ja),
            "（根拠データが未設定です）"
        );
        assert_eq!(
            render(&EvidenceOutcome::NoMatches, Language::En),
            "(No matching evidence found)"
        );
    }
}
