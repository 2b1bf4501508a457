//! Topic-count sweep.
//!
//! Fits one model per candidate k and scores it with intrinsic metrics. The
//! result only feeds a chart; the final k stays a configured value.

use std::collections::BTreeMap;
use std::fmt;

use ndarray::Array2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{LDAConfig, TuningConfig};
use crate::dtm::DocumentTermMatrix;
use crate::linalg::singular_values;
use crate::topic_modeling::{GibbsLDA, TopicModel};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Metric {
    Griffiths2004,
    CaoJuan2009,
    Arun2010,
    Deveaud2014,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Minimize,
    Maximize,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Griffiths2004,
        Metric::CaoJuan2009,
        Metric::Arun2010,
        Metric::Deveaud2014,
    ];

    pub fn direction(self) -> Direction {
        match self {
            Metric::CaoJuan2009 | Metric::Arun2010 => Direction::Minimize,
            Metric::Griffiths2004 | Metric::Deveaud2014 => Direction::Maximize,
        }
    }

    pub fn score(self, model: &TopicModel, doc_lengths: &[usize]) -> f64 {
        match self {
            Metric::Griffiths2004 => griffiths(&model.log_likelihoods),
            Metric::CaoJuan2009 => cao_juan(&model.beta()),
            Metric::Arun2010 => arun(&model.beta(), model.gamma(), doc_lengths),
            Metric::Deveaud2014 => deveaud(&model.beta()),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::Griffiths2004 => "Griffiths2004",
            Metric::CaoJuan2009 => "CaoJuan2009",
            Metric::Arun2010 => "Arun2010",
            Metric::Deveaud2014 => "Deveaud2014",
        };
        f.write_str(name)
    }
}

/// Harmonic mean of the recorded log-likelihoods, evaluated around the
/// median so the exponentials stay in range.
fn griffiths(log_likelihoods: &[f64]) -> f64 {
    if log_likelihoods.is_empty() {
        return f64::NAN;
    }
    let mut sorted = log_likelihoods.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };

    let shifted: Vec<f64> = log_likelihoods.iter().map(|ll| median - ll).collect();
    let max = shifted.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let log_mean_exp = max + shifted.iter().map(|x| (x - max).exp()).sum::<f64>().ln()
        - (shifted.len() as f64).ln();
    median - log_mean_exp
}

fn topic_pairs(k: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..k).flat_map(move |i| (i + 1..k).map(move |j| (i, j)))
}

/// Mean pairwise cosine similarity between topics.
fn cao_juan(beta: &Array2<f64>) -> f64 {
    let k = beta.nrows();
    let norms: Vec<f64> = beta.rows().into_iter().map(|r| r.dot(&r).sqrt()).collect();
    let (sum, count) = topic_pairs(k).fold((0.0, 0usize), |(sum, count), (i, j)| {
        let cos = beta.row(i).dot(&beta.row(j)) / (norms[i] * norms[j]);
        (sum + cos, count + 1)
    });
    if count == 0 {
        return f64::NAN;
    }
    sum / count as f64
}

/// Symmetric KL divergence between the singular values of beta and the
/// length-weighted topic mass of gamma.
fn arun(beta: &Array2<f64>, gamma: &Array2<f64>, doc_lengths: &[usize]) -> f64 {
    let cm1 = singular_values(beta).mapv(|x| x.max(f64::MIN_POSITIVE));
    let max_len = doc_lengths.iter().copied().max().unwrap_or(1).max(1) as f64;
    let cm2: Vec<f64> = (0..gamma.ncols())
        .map(|t| {
            let mass: f64 = doc_lengths
                .iter()
                .enumerate()
                .map(|(d, &len)| len as f64 * gamma[[d, t]])
                .sum();
            (mass / max_len).max(f64::MIN_POSITIVE)
        })
        .collect();

    cm1.iter()
        .zip(&cm2)
        .map(|(&a, &b)| a * (a / b).ln() + b * (b / a).ln())
        .sum()
}

/// Pairwise Jensen-Shannon style divergence between topics, averaged over
/// k(k-1).
fn deveaud(beta: &Array2<f64>) -> f64 {
    let k = beta.nrows();
    if k < 2 {
        return f64::NAN;
    }
    let m = beta.mapv(|x| if x == 0.0 { f64::MIN_POSITIVE } else { x });
    let total: f64 = topic_pairs(k)
        .map(|(i, j)| {
            let (x, y) = (m.row(i), m.row(j));
            let xy: f64 = x.iter().zip(y.iter()).map(|(&a, &b)| a * (a / b).ln()).sum();
            let yx: f64 = y.iter().zip(x.iter()).map(|(&a, &b)| a * (a / b).ln()).sum();
            0.5 * xy + 0.5 * yx
        })
        .sum();
    total / (k * (k - 1)) as f64
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TuningRow {
    pub k: usize,
    pub scores: BTreeMap<Metric, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TuningResult {
    pub metrics: Vec<Metric>,
    pub rows: Vec<TuningRow>,
}

impl TuningResult {
    pub fn series(&self, metric: Metric) -> Vec<(usize, f64)> {
        self.rows
            .iter()
            .filter_map(|row| row.scores.get(&metric).map(|&s| (row.k, s)))
            .collect()
    }

    /// Scores rescaled to [0, 1] over the candidate range. A flat series maps to 0.5.
    pub fn normalized(&self, metric: Metric) -> Vec<(usize, f64)> {
        let series = self.series(metric);
        let finite = series.iter().map(|&(_, s)| s).filter(|s| s.is_finite());
        let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| (lo.min(s), hi.max(s)));
        series
            .into_iter()
            .filter(|(_, s)| s.is_finite())
            .map(|(k, s)| {
                let scaled = if max > min { (s - min) / (max - min) } else { 0.5 };
                (k, scaled)
            })
            .collect()
    }
}

/// Fit and score every k in `config.min_topics..=config.max_topics`.
///
/// Fails before fitting anything if the matrix is empty or if any candidate
/// exceeds the number of terms; the error names the smallest such k.
pub fn find_topics_number(
    dtm: &DocumentTermMatrix,
    config: &TuningConfig,
    lda: &LDAConfig,
) -> Result<TuningResult> {
    if config.min_topics < 2 || config.min_topics > config.max_topics {
        return Err(Error::Config(format!(
            "invalid topic range {}..={}",
            config.min_topics, config.max_topics
        )));
    }
    if config.metrics.is_empty() {
        return Err(Error::Config("no tuning metrics requested".into()));
    }
    if dtm.n_docs() == 0 {
        return Err(Error::EmptyMatrix("no documents".into()));
    }
    if dtm.n_terms() == 0 {
        return Err(Error::EmptyMatrix("vocabulary is empty after cleaning".into()));
    }
    if config.max_topics > dtm.n_terms() {
        return Err(Error::InvalidTopicCount {
            k: config.min_topics.max(dtm.n_terms() + 1),
            terms: dtm.n_terms(),
        });
    }

    let candidates: Vec<usize> = (config.min_topics..=config.max_topics).collect();
    let doc_lengths = dtm.row_sums();
    info!(
        from = config.min_topics,
        to = config.max_topics,
        workers = config.workers,
        "Sweeping topic counts"
    );

    let evaluate = |k: usize| -> Result<TuningRow> {
        let model = GibbsLDA::new(lda.with_topics(k)).fit(dtm)?;
        let scores: BTreeMap<Metric, f64> = config
            .metrics
            .iter()
            .map(|&m| (m, m.score(&model, &doc_lengths)))
            .collect();
        info!(k, ?scores, "Scored candidate");
        Ok(TuningRow { k, scores })
    };

    let rows = if config.workers <= 1 {
        candidates.into_iter().map(evaluate).collect::<Result<Vec<_>>>()?
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .build()
            .map_err(|e| Error::Config(format!("cannot start {} workers: {e}", config.workers)))?;
        pool.install(|| candidates.into_par_iter().map(evaluate).collect::<Result<Vec<_>>>())?
    };

    Ok(TuningResult {
        metrics: config.metrics.clone(),
        rows,
    })
}
