//! sellpm CLI — rank milestone events and build bilingual action packs.
//!
//! Commands:
//! - `plan` — rank the events in scope, print the top three, assemble the
//!   pack for the picked one, and write the .txt/.ics artifacts
//! - `kpi`  — aggregate the funnel table into four color-banded cards

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use log::warn;
use serde::Serialize;

use sellpm_lib::error::InputError;
use sellpm_lib::evidence;
use sellpm_lib::kpi::{self, KpiRange};
use sellpm_lib::loader;
use sellpm_lib::pack::{self, build_pack};
use sellpm_lib::priority::{self, Scope, TopSelection};
use sellpm_lib::types::{ActionPack, ColorBand, Language};
use sellpm_lib::util::safe_file_stem;

#[derive(Parser)]
#[command(name = "sellpm", about = "Calm PMO copilot for a sell-side transaction", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank events and assemble an action pack for one of them
    Plan {
        /// Events CSV (event_id, date, actor, category, ...)
        #[arg(long)]
        events: PathBuf,

        /// Optional contacts CSV (actor, to, cc, attachments)
        #[arg(long)]
        contacts: Option<PathBuf>,

        /// Optional evidence corpus (JSON Lines)
        #[arg(long)]
        evidence: Option<PathBuf>,

        /// Which events are eligible: from-today | all
        #[arg(long, default_value = "from-today", value_parser = parse_scope)]
        scope: Scope,

        /// Output language: ja | en
        #[arg(long, value_parser = parse_lang)]
        lang: Option<Language>,

        /// 1-based pick among the ranked top three
        #[arg(long, default_value_t = 1)]
        pick: usize,

        /// Directory for the .txt and .ics artifacts
        #[arg(long, default_value = ".")]
        out: PathBuf,

        /// Append supporting excerpts from the evidence corpus
        #[arg(long)]
        show_evidence: bool,

        /// Emit JSON instead of display text
        #[arg(long)]
        json: bool,
    },

    /// Aggregate the KPI table into color-banded cards
    Kpi {
        /// KPI CSV (date, pv, inquiries, viewings, offers — aliases accepted)
        #[arg(long)]
        kpi: PathBuf,

        /// Aggregation window: last30 | month | all
        #[arg(long, default_value = "last30", value_parser = parse_range)]
        range: KpiRange,

        /// Output language: ja | en
        #[arg(long, value_parser = parse_lang)]
        lang: Option<Language>,

        /// Emit JSON instead of display text
        #[arg(long)]
        json: bool,
    },
}

fn parse_lang(s: &str) -> Result<Language, String> {
    Language::parse(s).ok_or_else(|| format!("unknown language {:?} (expected ja or en)", s))
}

fn parse_scope(s: &str) -> Result<Scope, String> {
    Scope::parse(s).ok_or_else(|| format!("unknown scope {:?} (expected from-today or all)", s))
}

fn parse_range(s: &str) -> Result<KpiRange, String> {
    KpiRange::parse(s)
        .ok_or_else(|| format!("unknown range {:?} (expected last30, month, or all)", s))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanOutput<'a> {
    selection: &'a TopSelection,
    pack: &'a ActionPack,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    if let Err(e) = run(cli.command) {
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(command: Commands) -> Result<(), InputError> {
    let config = loader::load_config()?;
    let default_lang = config
        .language
        .as_deref()
        .and_then(Language::parse)
        .unwrap_or(Language::Ja);
    let today = Local::now().date_naive();

    match command {
        Commands::Plan {
            events,
            contacts,
            evidence: evidence_path,
            scope,
            lang,
            pick,
            out,
            show_evidence,
            json,
        } => {
            let lang = lang.unwrap_or(default_lang);
            let events = loader::load_events(&events)?;
            let contacts = match contacts {
                Some(path) => loader::load_contacts(&path)?,
                None => Default::default(),
            };
            let corpus = match evidence_path {
                Some(path) => loader::load_evidence(&path)?,
                None => Vec::new(),
            };

            let top = priority::select_top(&events, scope, today, &config.score, lang);
            if top.events.is_empty() {
                // An empty scope is a result, not a failure.
                println!("{}", top.summary);
                return Ok(());
            }

            let idx = pick.saturating_sub(1).min(top.events.len() - 1);
            if idx + 1 != pick {
                warn!("--pick {} out of range; using {}", pick, idx + 1);
            }
            let picked = &top.events[idx].event;
            let pack = build_pack(picked, &contacts, lang, Utc::now());

            if json {
                let output = PlanOutput {
                    selection: &top,
                    pack: &pack,
                };
                println!(
                    "{}",
                    serde_json::to_string_pretty(&output).expect("serializing plan output")
                );
            } else {
                println!("{}\n", top.summary);
                println!("{}", pack::render_text(&pack));
                if show_evidence {
                    let outcome = evidence::retrieve(picked, &corpus, evidence::DEFAULT_TOP_K);
                    let header = match lang {
                        Language::Ja => "根拠（ノートより）",
                        Language::En => "Evidence (from notes)",
                    };
                    println!("\n{}\n{}", header, evidence::render(&outcome, lang));
                }
            }

            write_artifacts(&out, &pack)?;
            Ok(())
        }

        Commands::Kpi {
            kpi: kpi_path,
            range,
            lang,
            json,
        } => {
            let lang = lang.unwrap_or(default_lang);
            let records = loader::load_kpi(&kpi_path)?;
            let report = kpi::report(&records, range, today, lang);

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report).expect("serializing KPI report")
                );
            } else if let Some(message) = &report.message {
                println!("{}", message);
            } else {
                for card in &report.cards {
                    println!(
                        "[{}] {}: {}（{}）",
                        band_mark(card.band),
                        card.label,
                        card.headline,
                        card.detail
                    );
                }
            }
            Ok(())
        }
    }
}

fn band_mark(band: ColorBand) -> &'static str {
    match band {
        ColorBand::Green => "green",
        ColorBand::Yellow => "yellow",
        ColorBand::Red => "red",
        ColorBand::Neutral => "neutral",
    }
}

/// Write `<id>.txt` and `<id>.ics` under `out`, creating it if needed.
fn write_artifacts(out: &std::path::Path, pack: &ActionPack) -> Result<(), InputError> {
    fs::create_dir_all(out).map_err(|e| InputError::write(out.display().to_string(), e))?;
    let stem = safe_file_stem(&pack.event_id);

    let text_path = out.join(format!("{}.txt", stem));
    fs::write(&text_path, pack::render_text(pack))
        .map_err(|e| InputError::write(text_path.display().to_string(), e))?;

    let ics_path = out.join(format!("{}.ics", stem));
    fs::write(&ics_path, &pack.calendar_artifact)
        .map_err(|e| InputError::write(ics_path.display().to_string(), e))?;

    log::info!("wrote {} and {}", text_path.display(), ics_path.display());
    Ok(())
}
