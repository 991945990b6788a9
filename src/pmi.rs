//! Pointwise mutual information between target lemmas and their context lemmas.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::context::PairCountTable;
use crate::error::{AnalysisError, Result};
use crate::stopwords::TargetLemmaSet;
use crate::{FrequencyTable, total_occurrences};

/// (target lemma, context lemma) -> PMI score.
pub type PmiTable = HashMap<(String, String), f64>;

/// One context lemma in a target's ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedAssociation {
    pub lemma: String,
    pub pmi: f64,
}

/// Target lemma -> associations by descending PMI.
pub type RankedAssociations = BTreeMap<String, Vec<RankedAssociation>>;

/// Scores every observed pair as `log2(P(a,b)^k / (P(a) * P(b)))`.
///
/// `P(a)` and `P(b)` are relative to the summed corpus frequencies, `P(a,b)`
/// to the summed pair counts. `joint_exponent` is `k`; 1 gives plain PMI.
/// A pair lemma without corpus frequency fails with
/// [`AnalysisError::MissingFrequency`].
pub fn pmi_scores(
    frequency: &FrequencyTable,
    pairs: &PairCountTable,
    joint_exponent: i32,
) -> Result<PmiTable> {
    let tot = total_occurrences(frequency) as f64;
    let tot_pairs: f64 = pairs.values().map(|&c| f64::from(c)).sum();
    let probability = |lemma: &str| -> Result<f64> {
        frequency
            .get(lemma)
            .map(|&f| f64::from(f) / tot)
            .ok_or_else(|| AnalysisError::MissingFrequency {
                lemma: lemma.to_string(),
            })
    };

    let mut scores = PmiTable::with_capacity(pairs.len());
    for ((a, b), &count) in pairs {
        let p_a = probability(a.as_str())?;
        let p_b = probability(b.as_str())?;
        let p_ab = f64::from(count) / tot_pairs;
        scores.insert(
            (a.to_owned(), b.to_owned()),
            (p_ab.powi(joint_exponent) / (p_a * p_b)).log2(),
        );
    }
    Ok(scores)
}

/// Ranks the context lemmas of each target by descending PMI, ties by lemma.
/// Every target gets an entry, empty when it has no scored pairs.
pub fn rank_associations(scores: &PmiTable, targets: &TargetLemmaSet) -> RankedAssociations {
    let mut ranked: RankedAssociations = targets
        .iter()
        .map(|t| (t.to_string(), Vec::new()))
        .collect();
    for ((target, context), &pmi) in scores {
        if let Some(list) = ranked.get_mut(target) {
            list.push(RankedAssociation {
                lemma: context.to_owned(),
                pmi,
            });
        }
    }
    for list in ranked.values_mut() {
        list.sort_by(|a, b| b.pmi.total_cmp(&a.pmi).then_with(|| a.lemma.cmp(&b.lemma)));
    }
    ranked
}
