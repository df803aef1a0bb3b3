// Typo-Suggest CLI Tool
// Command-line interface for suggesting references for mistyped input

use std::time::Duration;

use anyhow::{bail, Context as _, Result};
use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use typo_suggest::{Config, Context, MatchOutcome, ServiceRegistry, Suggestion};

/// Label used for references given with --reference
const INLINE_LABEL: &str = "inline";

/// Typo Suggest - Suggest the nearest reference for mistyped input
#[derive(Parser, Debug)]
#[command(name = "suggest")]
#[command(about = "Suggest the nearest reference for each mistyped input", long_about = None)]
#[command(version)]
struct Args {
    /// Inputs to look up
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<String>,

    /// TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<std::path::PathBuf>,

    /// Reference list to search (a `[references]` label)
    #[arg(short, long, value_name = "LABEL")]
    list: Option<String>,

    /// Inline reference, repeatable; overrides --list
    #[arg(short, long = "reference", value_name = "VALUE")]
    references: Vec<String>,

    /// Give up on an input after this many milliseconds
    #[arg(short, long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Only consider candidates sharing the first PREFIX-1 characters
    #[arg(short, long, default_value = "0")]
    prefix: usize,

    /// Print the whole tie-set instead of one suggestion
    #[arg(short, long)]
    all: bool,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    config.apply_env_overrides();

    init_tracing(if args.verbose { "debug" } else { config.log.level.as_str() });

    if !args.references.is_empty() {
        config
            .references
            .insert(INLINE_LABEL.to_string(), args.references.clone());
    }

    let registry = ServiceRegistry::from_config(&config)?;
    let label = pick_label(&args, &registry)?;
    let service = registry
        .get(&label)
        .with_context(|| format!("unknown reference list '{}'", label))?;

    debug!(
        label = %label,
        references = service.matcher().len(),
        algorithm = %config.finder.algorithm,
        "service ready"
    );

    for input in &args.inputs {
        let ctx = match args.timeout_ms {
            Some(ms) => Context::with_timeout(Duration::from_millis(ms)),
            None => Context::background(),
        };

        if args.all || args.prefix > 0 {
            let outcome = match service
                .matcher()
                .find_top_ranking_prefix_ctx(&ctx, input, args.prefix)
            {
                Ok(outcome) => outcome,
                Err(interrupted) => {
                    let (outcome, reason) = interrupted.into_parts();
                    warn!(input = %input, reason = %reason, "lookup interrupted");
                    outcome
                }
            };
            print_outcome(input, &outcome);
        } else {
            let suggestion = match service.find(&ctx, input) {
                Ok(suggestion) => suggestion,
                Err(interrupted) => {
                    let (suggestion, reason) = interrupted.into_parts();
                    warn!(input = %input, reason = %reason, "lookup interrupted");
                    suggestion
                }
            };
            print_suggestion(input, &suggestion);
        }
    }

    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Inline references win, then --list, then the only configured list
fn pick_label(args: &Args, registry: &ServiceRegistry) -> Result<String> {
    if !args.references.is_empty() {
        return Ok(INLINE_LABEL.to_string());
    }
    if let Some(label) = &args.list {
        return Ok(label.clone());
    }

    let labels: Vec<&str> = registry.labels().collect();
    match labels.as_slice() {
        [only] => Ok(only.to_string()),
        [] => bail!("no references: pass --reference or a --config with [references]"),
        many => bail!("several reference lists, pick one with --list: {}", many.join(", ")),
    }
}

fn print_suggestion(input: &str, suggestion: &Suggestion) {
    if suggestion.exact {
        println!("{:<20} → {} (exact)", input, suggestion.value);
        return;
    }
    println!("{:<20} → {}", input, suggestion.value);
    println!("{:<20}   {}", "", format_score(suggestion.score));
}

fn print_outcome(input: &str, outcome: &MatchOutcome) {
    if outcome.exact {
        println!("{:<20} → {} (exact)", input, outcome.first());
        return;
    }
    println!("{:<20} → {}", input, outcome.tie_set.join(", "));
    println!("{:<20}   {}", "", format_score(outcome.score));
}

fn format_score(score: f64) -> String {
    if (0.0..=1.0).contains(&score) {
        format!("Score: {:.4} {}", score, score_bar(score))
    } else {
        format!("Score: {:.4}", score)
    }
}

/// Generate a visual score bar
fn score_bar(score: f64) -> String {
    let bar_len = 10;
    let filled = (score * bar_len as f64) as usize;
    let mut bar = String::from("[");
    for i in 0..bar_len {
        if i < filled {
            bar.push('█');
        } else {
            bar.push('░');
        }
    }
    bar.push(']');
    bar
}
