//! Human-readable reports and export files.

use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::prelude::*;
use clap::ValueEnum;
use serde::Serialize;

use crate::error::{AnalysisError, Result};
use crate::morphology::MorphoCountTable;
use crate::stopwords::TargetLemmaSet;
use crate::{EmbeddingAnalysis, FrequencyTable, OccurrenceSummary};

const COLUMN_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Txt,
    Csv,
    Json,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// One (target, context lemma) row of an association export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssociationRow {
    pub target: String,
    pub rank: usize,
    pub context: String,
    pub pmi: f64,
    pub cooccurrences: u32,
    pub context_frequency: u32,
}

/// Flattens the rankings, keeping at most `top` rows per target (all when `None`).
pub fn association_rows(
    analysis: &EmbeddingAnalysis,
    frequency: &FrequencyTable,
    top: Option<usize>,
) -> Vec<AssociationRow> {
    let mut rows = Vec::new();
    for (target, ranked) in &analysis.ranked {
        let limit = top.unwrap_or(ranked.len());
        for (i, assoc) in ranked.iter().take(limit).enumerate() {
            rows.push(AssociationRow {
                target: target.clone(),
                rank: i + 1,
                context: assoc.lemma.clone(),
                pmi: assoc.pmi,
                cooccurrences: pair_count(analysis, target, &assoc.lemma),
                context_frequency: frequency.get(&assoc.lemma).copied().unwrap_or(0),
            });
        }
    }
    rows
}

fn pair_count(analysis: &EmbeddingAnalysis, target: &str, context: &str) -> u32 {
    analysis
        .cooccurrences
        .get(&(target.to_string(), context.to_string()))
        .copied()
        .unwrap_or(0)
}

pub fn render_occurrences(text: &str, summary: &OccurrenceSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "number of lemmata in {text}: {}", summary.total_words);
    for occ in &summary.per_target {
        let _ = writeln!(
            out,
            "{} occurs {} times in the {text}. normalized: {:.2}/100000 words",
            occ.lemma, occ.count, occ.per_100k
        );
    }
    let _ = writeln!(
        out,
        "All mind-related words occur {} times in {text}. normalized: {:.2}/100000 words",
        summary.aggregate_count, summary.aggregate_per_100k
    );
    out.push_str(&"--".repeat(10));
    out.push('\n');
    out
}

fn association_cell(rank: usize, row: Option<&AssociationRow>) -> String {
    match row {
        Some(r) => format!(
            "{:<20}{:<15}{:<10}{:<10}",
            format!("{rank}.: {}", r.context),
            format!("pmi: {:.2}", r.pmi),
            format!("c(a,b) {}", r.cooccurrences),
            format!("c(b) {}", r.context_frequency),
        ),
        None => String::new(),
    }
}

/// Top associations of every target in one text.
pub fn render_rankings(
    text: &str,
    analysis: &EmbeddingAnalysis,
    frequency: &FrequencyTable,
    top: usize,
) -> String {
    let rows = association_rows(analysis, frequency, Some(top));
    let mut out = String::new();
    for target in analysis.ranked.keys() {
        let _ = writeln!(out, "Top {top} associations of {target} in {text}:");
        let mut any = false;
        for row in rows.iter().filter(|r| &r.target == target) {
            let _ = writeln!(out, "{}", association_cell(row.rank, Some(row)));
            any = true;
        }
        if !any {
            out.push_str("(no co-occurrences)\n");
        }
        out.push_str(&"-".repeat(20));
        out.push('\n');
    }
    out
}

/// One text's side of a side-by-side comparison.
pub struct ComparisonSide<'a> {
    pub name: &'a str,
    pub analysis: &'a EmbeddingAnalysis,
    pub frequency: &'a FrequencyTable,
}

/// Side-by-side table of the `top` associations per target for two texts.
pub fn render_comparison(
    left: &ComparisonSide<'_>,
    right: &ComparisonSide<'_>,
    targets: &TargetLemmaSet,
    top: usize,
) -> String {
    let left_rows = association_rows(left.analysis, left.frequency, Some(top));
    let right_rows = association_rows(right.analysis, right.frequency, Some(top));
    let mut out = String::new();
    for target in targets.iter() {
        let title = format!(
            "| These are the {top} most correlated words with the mindword {target} in {} and {} |",
            left.name, right.name
        );
        let rule = format!("+{}+", "-".repeat(title.chars().count().saturating_sub(2)));
        let _ = writeln!(out, "{rule}\n{title}\n{rule}");
        let _ = writeln!(out, "{:<COLUMN_WIDTH$} {}", left.name, right.name);
        out.push_str(&"-".repeat(2 * COLUMN_WIDTH));
        out.push('\n');

        let l: Vec<&AssociationRow> = left_rows.iter().filter(|r| r.target == target).collect();
        let r: Vec<&AssociationRow> = right_rows.iter().filter(|r| r.target == target).collect();
        for i in 0..l.len().max(r.len()) {
            let _ = writeln!(
                out,
                "{:<COLUMN_WIDTH$} {}",
                association_cell(i + 1, l.get(i).copied()),
                association_cell(i + 1, r.get(i).copied()),
            );
        }
        out.push_str(&"-".repeat(2 * COLUMN_WIDTH));
        out.push('\n');
    }
    out
}

/// Morphological variants of every target present in `table`, most frequent first.
pub fn render_morphology(
    text: &str,
    table: &MorphoCountTable,
    targets: &TargetLemmaSet,
) -> String {
    let mut out = String::new();
    for target in targets.iter().filter(|t| table.variants(t).is_some()) {
        let _ = writeln!(out, "Morphology variant counts of mindword {target} in {text}:");
        for (variant, count) in table.ranked_variants(target) {
            let _ = writeln!(out, "{variant} {count}");
        }
        out.push_str(&"-".repeat(20));
        out.push('\n');
    }
    out
}

/// Writes the rankings of one text as `format` into a timestamped file in `dir`.
pub fn export_associations(
    text: &str,
    analysis: &EmbeddingAnalysis,
    frequency: &FrequencyTable,
    format: ExportFormat,
    dir: &Path,
) -> Result<PathBuf> {
    let suffix = format!("{text}_associations.{}", format.extension());
    match format {
        ExportFormat::Txt => {
            let all = analysis.ranked.values().map(Vec::len).max().unwrap_or(0);
            save_file(&render_rankings(text, analysis, frequency, all), dir, &suffix)
        }
        ExportFormat::Json => {
            let rows = association_rows(analysis, frequency, None);
            save_file(&serde_json::to_string_pretty(&rows)?, dir, &suffix)
        }
        ExportFormat::Csv => {
            let path = timestamped_path(dir, &suffix);
            let mut wtr = csv::Writer::from_path(&path)?;
            for row in association_rows(analysis, frequency, None) {
                wtr.serialize(row)?;
            }
            wtr.flush().map_err(|e| AnalysisError::io(&path, e))?;
            Ok(path)
        }
    }
}

fn timestamped_path(dir: &Path, suffix: &str) -> PathBuf {
    let local: DateTime<Local> = Local::now();
    dir.join(format!("{}_{suffix}", local.format("%Y_%m_%d_%H_%M_%S")))
}

///save contents to a timestamped file in dir. Return the path written.
pub fn save_file(contents: &str, dir: &Path, suffix: &str) -> Result<PathBuf> {
    let path = timestamped_path(dir, suffix);
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&path)
        .map_err(|e| AnalysisError::io(&path, e))?;

    file.write_all(contents.as_bytes())
        .map_err(|e| AnalysisError::io(&path, e))?;

    Ok(path)
}
