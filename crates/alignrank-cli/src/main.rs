//! alignrank CLI
//!
//! The `alignrank` command selects the DI sequences that best align with a
//! curriculum substandard from externally produced ratings.
//!
//! ## Commands
//!
//! - `rank`: Select the top sequences from one ratings file
//! - `gaps`: List substandards without a FAIR/EXCELLENT match
//! - `sequences`: List the DI sequences taught at a grade
//! - `remap`: Fill gaps in a mappings file from a directory of ratings

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, Level};

use alignrank_core::{
    extract_sequences_for_grade, final_matches, find_substandards_without_good_matches,
    load_di_formats, load_ratings, read_mappings, remap_document, select_top_sequences,
    write_mappings, write_remap_report_md, DirRatingSource, PipelineConfig, Selection,
};

#[derive(Parser)]
#[command(name = "alignrank")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Deterministic curriculum-to-sequence alignment selection", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Pipeline configuration file (TOML)
    #[arg(long, global = true, env = "ALIGNRANK_CONFIG")]
    config: Option<PathBuf>,

    /// Maximum sequences selected per substandard (overrides the config file)
    #[arg(long, global = true, env = "ALIGNRANK_LIMIT")]
    limit: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Select the top sequences from a ratings file
    Rank {
        /// Rater output (batch object or array of ratings)
        #[arg(short, long)]
        ratings: PathBuf,

        /// Grade recorded on each match
        #[arg(short, long, default_value = "3")]
        grade: u32,

        /// Emit final matches as JSON instead of a table
        #[arg(long)]
        emit_json: bool,
    },

    /// List substandards that have no FAIR or EXCELLENT match
    Gaps {
        /// Mappings JSON file
        #[arg(short, long)]
        mappings: PathBuf,
    },

    /// List DI sequences taught at a grade
    Sequences {
        /// DI formats JSON file
        #[arg(short, long)]
        di_formats: PathBuf,

        /// Target grade
        #[arg(short, long)]
        grade: u32,
    },

    /// Fill gaps in a mappings file from per-substandard ratings
    Remap {
        /// Mappings JSON file to read
        #[arg(short, long)]
        mappings: PathBuf,

        /// Directory containing `<substandard_id>.json` ratings files
        #[arg(long)]
        ratings_dir: PathBuf,

        /// Output path for the merged mappings
        #[arg(short, long)]
        output: PathBuf,

        /// Optional markdown report path
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    alignrank_core::init_tracing(cli.json, level);

    let config = resolve_config(cli.config.as_deref(), cli.limit)?;

    match cli.command {
        Commands::Rank {
            ratings,
            grade,
            emit_json,
        } => cmd_rank(&config, &ratings, grade, emit_json),
        Commands::Gaps { mappings } => cmd_gaps(&mappings),
        Commands::Sequences { di_formats, grade } => cmd_sequences(&di_formats, grade),
        Commands::Remap {
            mappings,
            ratings_dir,
            output,
            report,
        } => cmd_remap(&config, &mappings, &ratings_dir, &output, report.as_deref()),
    }
}

/// Config file (or defaults), then the `--limit` override.
fn resolve_config(path: Option<&Path>, limit: Option<usize>) -> Result<PipelineConfig> {
    let mut config = match path {
        Some(p) => PipelineConfig::from_path(p)
            .with_context(|| format!("Failed to load config {:?}", p))?,
        None => PipelineConfig::default(),
    };
    if let Some(limit) = limit {
        config.ranker.limit = limit;
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Select and print the top sequences from one ratings file
fn cmd_rank(config: &PipelineConfig, path: &Path, grade: u32, emit_json: bool) -> Result<()> {
    let ratings =
        load_ratings(path).with_context(|| format!("Failed to load ratings {:?}", path))?;
    let selection = select_top_sequences(&ratings, &config.ranker)?;

    if emit_json {
        let matches = final_matches(&selection, grade);
        println!("{}", serde_json::to_string_pretty(&matches)?);
    } else {
        print!("{}", render_selection_text(&selection));
    }
    Ok(())
}

fn render_selection_text(selection: &Selection) -> String {
    let mut out = format!(
        "Selected {} of {} eligible ({} rated)\n",
        selection.len(),
        selection.eligible,
        selection.rated
    );
    if selection.is_empty() {
        out.push_str("  no acceptable sequences\n");
        return out;
    }
    for selected in &selection.selected {
        let r = &selected.rating;
        out.push_str(&format!(
            "  {}. Seq #{} ({}): {} | score={:.2} | align={}\n",
            selected.rank,
            r.sequence_number,
            r.skill_name,
            r.match_quality,
            selected.final_score,
            r.alignment_score
        ));
    }
    out
}

/// List substandards lacking a good match
fn cmd_gaps(path: &Path) -> Result<()> {
    let doc = read_mappings(path).with_context(|| format!("Failed to read mappings {:?}", path))?;
    let gaps = find_substandards_without_good_matches(&doc.mappings);

    println!(
        "{} of {} substandards have no FAIR/EXCELLENT match",
        gaps.len(),
        doc.mappings.len()
    );
    for m in gaps {
        println!(
            "  {} (grade {}): {}",
            m.substandard_id,
            m.grade,
            truncate(&m.substandard_description, 80)
        );
    }
    Ok(())
}

/// List DI sequences for a grade as JSON
fn cmd_sequences(path: &Path, grade: u32) -> Result<()> {
    let formats =
        load_di_formats(path).with_context(|| format!("Failed to read DI formats {:?}", path))?;
    let sequences = extract_sequences_for_grade(&formats, grade);
    info!(grade = grade, count = sequences.len(), "extracted sequences");
    println!("{}", serde_json::to_string_pretty(&sequences)?);
    Ok(())
}

/// Fill gaps and write merged mappings (+ digest) and the optional report
fn cmd_remap(
    config: &PipelineConfig,
    mappings: &Path,
    ratings_dir: &Path,
    output: &Path,
    report_path: Option<&Path>,
) -> Result<()> {
    let doc = read_mappings(mappings)
        .with_context(|| format!("Failed to read mappings {:?}", mappings))?;
    let mut source = DirRatingSource::new(ratings_dir);

    let outcome = remap_document(&doc, &mut source, config, chrono::Utc::now())
        .context("Remap failed")?;

    let digest = write_mappings(output, &outcome.document)
        .with_context(|| format!("Failed to write {:?}", output))?;
    println!("Wrote mappings to {:?} (digest {:?})", output, digest);

    if let Some(path) = report_path {
        write_remap_report_md(path, &outcome.report)
            .with_context(|| format!("Failed to write {:?}", path))?;
        println!("Wrote report to {:?}", path);
    }

    println!(
        "Remapped {} substandards: {} flipped, {} still without matches, {} with unusable ratings",
        outcome.report.total_remapped,
        outcome.report.flipped(),
        outcome.report.still_unmatched(),
        outcome.report.failures.len()
    );
    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
