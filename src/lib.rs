//! sellpm — a calm PMO copilot for a sell-side real-estate transaction.
//!
//! The caller keeps milestone events in a small CSV table. This crate
//! ranks the urgent ones with a time-decayed priority score, assembles a
//! bilingual action pack (checklist, risks, journey compass, email draft,
//! chat snippet, all-day calendar event) for the chosen one, classifies
//! funnel KPIs into color-banded cards, and pulls supporting excerpts out
//! of a notes corpus by literal token overlap.
//!
//! Everything is synchronous and deterministic: each operation is a pure
//! function over its inputs, and the static bilingual tables are read-only
//! after process start.

pub mod error;
pub mod evidence;
pub mod ics;
pub mod kpi;
pub mod loader;
pub mod localize;
pub mod pack;
pub mod playbook;
pub mod priority;
pub mod types;
pub mod util;
