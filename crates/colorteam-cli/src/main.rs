//! colorteam: run and query Pink/Red/Gold/White proposal reviews.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use colorteam_core::{
    CategoryStatus, DeficiencyEntry, InMemoryProposalSource, JsonLinesReviewStore,
    ReadinessSummary, ReviewCategory, ReviewConfig, ReviewEngine, ReviewResult, Severity,
};
use colorteam_runtime::{ReviewOrchestrator, RuntimeConfig};

#[derive(Parser)]
#[command(name = "colorteam")]
#[command(about = "Weighted Pink/Red/Gold/White proposal reviews", version)]
struct Cli {
    /// Review criteria document (YAML or JSON); built-in defaults if omitted
    #[arg(short, long, global = true, env = "COLORTEAM_CRITERIA")]
    criteria: Option<PathBuf>,

    /// Runtime settings (YAML)
    #[arg(long, global = true, env = "COLORTEAM_RUNTIME")]
    runtime: Option<PathBuf>,

    /// Append-only review history file
    #[arg(
        short,
        long,
        global = true,
        env = "COLORTEAM_STORE",
        default_value = "colorteam-reviews.jsonl"
    )]
    store: PathBuf,

    /// Emit JSON on stdout
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a review and store the result
    Review {
        /// Proposal data file (YAML)
        #[arg(short, long)]
        proposals: PathBuf,

        #[arg(long)]
        proposal_id: String,

        /// Category to review
        #[arg(long, required_unless_present = "all")]
        category: Option<ReviewCategory>,

        /// Run all four categories
        #[arg(long, conflicts_with = "category")]
        all: bool,
    },

    /// Stored reviews for a proposal, newest first
    Reviews {
        #[arg(long)]
        proposal_id: String,

        #[arg(long)]
        category: Option<ReviewCategory>,
    },

    /// Readiness across all four categories
    Readiness {
        #[arg(long)]
        proposal_id: String,
    },

    /// Deficiencies and weaknesses across all reviews
    Deficiencies {
        #[arg(long)]
        proposal_id: String,
    },

    /// Show the effective criteria
    Criteria {
        #[arg(long)]
        category: Option<ReviewCategory>,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.criteria {
        Some(path) => ReviewConfig::from_file(path)
            .with_context(|| format!("loading criteria from {}", path.display()))?,
        None => ReviewConfig::builtin(),
    };
    tracing::debug!(
        criteria = ?cli.criteria,
        store = %cli.store.display(),
        "Configuration loaded"
    );

    match &cli.command {
        Command::Criteria { category } => print_criteria(&config, *category, cli.json),
        Command::Review {
            proposals,
            proposal_id,
            category,
            all,
        } => {
            let source = InMemoryProposalSource::from_yaml_file(proposals)
                .with_context(|| format!("loading proposals from {}", proposals.display()))?;
            let orchestrator = orchestrator(&cli, config, source)?;

            let results = match (*category, *all) {
                (_, true) => {
                    let mut results = Vec::new();
                    for (category, outcome) in orchestrator.run_all(proposal_id).await {
                        results.push(
                            outcome.with_context(|| {
                                format!("{} review of {}", category, proposal_id)
                            })?,
                        );
                    }
                    results
                }
                (Some(category), false) => vec![orchestrator
                    .run_review(proposal_id, category)
                    .await
                    .with_context(|| format!("{} review of {}", category, proposal_id))?],
                (None, false) => bail!("either --category or --all is required"),
            };

            if cli.json {
                print_json(&results)
            } else {
                results.iter().for_each(print_review);
                Ok(())
            }
        }
        Command::Reviews {
            proposal_id,
            category,
        } => {
            let orchestrator = orchestrator(&cli, config, InMemoryProposalSource::new())?;
            let results = orchestrator.get_reviews(proposal_id, *category).await?;
            if cli.json {
                print_json(&results)
            } else {
                if results.is_empty() {
                    println!("No reviews found for {}", proposal_id);
                }
                results.iter().for_each(print_review);
                Ok(())
            }
        }
        Command::Readiness { proposal_id } => {
            let orchestrator = orchestrator(&cli, config, InMemoryProposalSource::new())?;
            let summary = orchestrator.summarize(proposal_id).await?;
            if cli.json {
                print_json(&summary)
            } else {
                print_readiness(&summary);
                Ok(())
            }
        }
        Command::Deficiencies { proposal_id } => {
            let orchestrator = orchestrator(&cli, config, InMemoryProposalSource::new())?;
            let entries = orchestrator.list_deficiencies(proposal_id).await?;
            if cli.json {
                print_json(&entries)
            } else {
                print_deficiencies(&entries);
                Ok(())
            }
        }
    }
}

/// Engine over the JSON Lines history, hosted on the async runtime.
fn orchestrator(
    cli: &Cli,
    config: ReviewConfig,
    source: InMemoryProposalSource,
) -> Result<ReviewOrchestrator> {
    let runtime_config = match &cli.runtime {
        Some(path) => RuntimeConfig::from_yaml_file(path)?,
        None => RuntimeConfig::default(),
    };
    let engine = ReviewEngine::new(
        config,
        Arc::new(source),
        Arc::new(JsonLinesReviewStore::new(&cli.store)),
    );
    Ok(ReviewOrchestrator::new(Arc::new(engine), runtime_config)?)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_criteria(
    config: &ReviewConfig,
    category: Option<ReviewCategory>,
    json: bool,
) -> Result<()> {
    let sets: Vec<_> = config
        .iter()
        .filter(|set| category.map_or(true, |c| set.category == c))
        .collect();

    if json {
        return print_json(&sets);
    }

    for set in sets {
        println!(
            "{} - {} (pass {:.2}, green {:.2}, yellow {:.2})",
            set.category.team_name(),
            set.description,
            set.pass_threshold,
            set.green_threshold,
            set.yellow_threshold
        );
        for criterion in &set.criteria {
            match &criterion.fail_condition {
                Some(condition) => println!(
                    "  {:<24} {:>5.2}  {}  [fail: {}]",
                    criterion.id, criterion.weight, criterion.label, condition
                ),
                None => println!(
                    "  {:<24} {:>5.2}  {}",
                    criterion.id, criterion.weight, criterion.label
                ),
            }
        }
        println!();
    }
    Ok(())
}

fn print_review(result: &ReviewResult) {
    println!(
        "{} {} [{}] {}: {:.1}% ({}) threshold {:.0}%",
        result.id,
        result.category.team_name(),
        result.proposal_id,
        result.verdict,
        result.overall_score * 100.0,
        result.overall_traffic_light,
        result.pass_threshold * 100.0
    );
    println!("  reviewed at {}", result.reviewed_at.to_rfc3339());

    for section in &result.sections {
        println!(
            "  {:<8} {:<32} {:>6.1}%  {}",
            section.section_number,
            section.section_title,
            section.section_score * 100.0,
            section.traffic_light
        );
    }

    let counts = result.finding_counts;
    println!(
        "  {} strengths, {} weaknesses, {} deficiencies",
        counts.strengths, counts.weaknesses, counts.deficiencies
    );
    for deficiency in &result.deficiencies {
        println!("  DEFICIENCY {}", deficiency);
    }
    for weakness in &result.weaknesses {
        println!("  WEAKNESS   {}", weakness);
    }
    for recommendation in &result.recommendations {
        let marker = if recommendation.blocking { "!" } else { "-" };
        println!("  {} {}", marker, recommendation.text);
    }
    println!();
}

fn print_readiness(summary: &ReadinessSummary) {
    println!("{}: {}", summary.proposal_id, summary.readiness);
    for (category, status) in &summary.by_category {
        match status {
            CategoryStatus::NotReviewed => {
                println!("  {:<11} NOT_REVIEWED", category.team_name());
            }
            CategoryStatus::Reviewed {
                review_id,
                overall_score,
                pass_threshold,
                verdict,
                deficiency_count,
                ..
            } => println!(
                "  {:<11} {} {:.1}% / {:.0}%  {} deficiencies  ({})",
                category.team_name(),
                verdict,
                overall_score * 100.0,
                pass_threshold * 100.0,
                deficiency_count,
                review_id
            ),
        }
    }
    println!(
        "  {} of 4 reviewed, {} passed, {} deficiencies",
        summary.categories_completed, summary.categories_passed, summary.total_deficiencies
    );
}

fn print_deficiencies(entries: &[DeficiencyEntry]) {
    if entries.is_empty() {
        println!("No deficiencies or weaknesses recorded");
        return;
    }
    for entry in entries {
        let severity = match entry.severity {
            Severity::Deficiency => "DEFICIENCY",
            Severity::Weakness => "WEAKNESS",
        };
        println!("{:<10} {:<5} {}", severity, entry.category, entry.text);
    }
}
