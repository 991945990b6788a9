#![forbid(unsafe_code)]
//! # Mind-word analysis CLI
//!
//! Command-line front end of the `mindword_analysis` crate. It loads
//! lemma-annotated texts (one XML file per text), caches their lemma counts
//! and prints occurrence, association and morphology reports.
//!
//! ## Example
//! ```bash
//! cargo run --release -- --stopwords stopwords_greek_homer.txt \
//!     compare Odyssey.xml Iliad.xml --pos verb --top 10
//! ```
//!
//! Set `RUST_LOG=info` to follow loading and caching.

use clap::{Args, Parser, Subcommand};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::process;
use mindword_analysis::report::{
    ComparisonSide, export_associations, render_comparison, render_morphology,
    render_occurrences, render_rankings,
};
use mindword_analysis::{
    AnalysisOptions, Corpus, EmbeddingAnalysis, ExportFormat, FrequencyCache, FrequencyTable,
    PosFilter, Result, StopwordSet, TargetLemmaSet, analyse_embedding, annotation, load_corpus,
    load_stopwords, load_targets, occurrences, tabulate_morphology,
};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Stopword file (.txt, one lemma per line)
    #[arg(long, global = true)]
    stopwords: Option<PathBuf>,

    /// Target lemma file replacing the built-in mind-words (.txt, one lemma per line)
    #[arg(long, global = true)]
    targets: Option<PathBuf>,

    /// Directory holding cached lemma counts (<text>_<path hash>_wc.json)
    #[arg(long, global = true, default_value = ".")]
    cache_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct EmbeddingArgs {
    /// Part of speech of context words ("any" disables the filter)
    #[arg(long, default_value = "verb")]
    pos: PosFilter,

    /// Exponent of the joint probability in the PMI formula
    #[arg(long, default_value_t = 1)]
    joint_exponent: i32,

    /// Number of associations listed per mind-word
    #[arg(long, default_value_t = 10)]
    top: usize,
}

#[derive(Subcommand)]
enum Command {
    /// Occurrences of the mind-words, raw and per 100,000 words
    Frequencies {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Words most associated (PMI) with each mind-word in one text
    Associations {
        file: PathBuf,

        #[command(flatten)]
        embedding: EmbeddingArgs,

        /// Also export all associations (txt, csv, json)
        #[arg(long)]
        export_format: Option<ExportFormat>,

        /// Directory for exported files
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Side-by-side associations of the mind-words in two texts
    Compare {
        left: PathBuf,
        right: PathBuf,

        #[command(flatten)]
        embedding: EmbeddingArgs,
    },
    /// Morphological variant counts of the mind-words
    Morphology { file: PathBuf },
}

struct Context {
    targets: TargetLemmaSet,
    stopwords: StopwordSet,
    cache: FrequencyCache,
}

struct LoadedText {
    id: String,
    corpus: Corpus,
    frequency: FrequencyTable,
}

fn load_text(path: &Path, cache: &FrequencyCache) -> Result<LoadedText> {
    let id = annotation::text_id(path);
    let corpus = load_corpus(path)?;
    let frequency = cache.frequencies_for(&FrequencyCache::key_for(path)?, &corpus)?;
    Ok(LoadedText {
        id,
        corpus,
        frequency,
    })
}

fn analyse(
    path: &Path,
    ctx: &Context,
    options: &AnalysisOptions,
) -> Result<(LoadedText, EmbeddingAnalysis)> {
    let text = load_text(path, &ctx.cache)?;
    let analysis = analyse_embedding(
        &text.corpus,
        &text.frequency,
        &ctx.targets,
        &ctx.stopwords,
        options,
    )?;
    Ok((text, analysis))
}

fn options(args: &EmbeddingArgs) -> AnalysisOptions {
    AnalysisOptions {
        pos: args.pos.clone(),
        joint_exponent: args.joint_exponent,
    }
}

/// Runs the selected subcommand. `Ok(false)` means some input files failed
/// and were skipped.
fn run(cli: Cli) -> Result<bool> {
    let stopwords = match &cli.stopwords {
        Some(path) => load_stopwords(path)?,
        None => {
            warn!("No stopword file given, context words are not filtered");
            StopwordSet::default()
        }
    };
    let targets = match &cli.targets {
        Some(path) => load_targets(path)?,
        None => TargetLemmaSet::mind_words(),
    };
    let ctx = Context {
        targets,
        stopwords,
        cache: FrequencyCache::new(cli.cache_dir),
    };

    match cli.command {
        Command::Frequencies { files } => {
            // Analyze each file separately and keep going past failures
            let mut any_errors = false;
            for file in files {
                match load_text(&file, &ctx.cache) {
                    Ok(text) => print!(
                        "{}",
                        render_occurrences(&text.id, &occurrences(&text.frequency, &ctx.targets))
                    ),
                    Err(e) => {
                        error!("Error analyzing {}: {}", file.display(), e);
                        any_errors = true;
                    }
                }
            }
            return Ok(!any_errors);
        }
        Command::Associations {
            file,
            embedding,
            export_format,
            out,
        } => {
            let (text, analysis) = analyse(&file, &ctx, &options(&embedding))?;
            print!(
                "{}",
                render_rankings(&text.id, &analysis, &text.frequency, embedding.top)
            );
            if let Some(format) = export_format {
                let path = export_associations(&text.id, &analysis, &text.frequency, format, &out)?;
                info!("Exported associations to {}", path.display());
                println!("Results written to {}", path.display());
            }
        }
        Command::Compare {
            left,
            right,
            embedding,
        } => {
            let opts = options(&embedding);
            // the two texts share nothing mutable
            let (l, r) = rayon::join(
                || analyse(&left, &ctx, &opts),
                || analyse(&right, &ctx, &opts),
            );
            let (left_text, left_analysis) = l?;
            let (right_text, right_analysis) = r?;
            print!(
                "{}",
                render_comparison(
                    &ComparisonSide {
                        name: &left_text.id,
                        analysis: &left_analysis,
                        frequency: &left_text.frequency,
                    },
                    &ComparisonSide {
                        name: &right_text.id,
                        analysis: &right_analysis,
                        frequency: &right_text.frequency,
                    },
                    &ctx.targets,
                    embedding.top,
                )
            );
        }
        Command::Morphology { file } => {
            let id = annotation::text_id(&file);
            let corpus = load_corpus(&file)?;
            let table = tabulate_morphology(&corpus)?.restricted_to(&ctx.targets);
            print!("{}", render_morphology(&id, &table, &ctx.targets));
        }
    }
    Ok(true)
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            error!("Error: {}", e);
            process::exit(1);
        }
    }
}
