use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use statrs::function::gamma::ln_gamma;
use tracing::debug;

use crate::config::{InferenceMethod, LDAConfig};
use crate::dtm::DocumentTermMatrix;
use crate::{Error, Result};

/// Posteriors of a fitted model.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicModel {
    pub vocabulary: Vec<String>,
    pub doc_labels: Vec<String>,
    pub alpha: f64,
    pub beta_prior: f64,
    gamma: Array2<f64>,     // Documents x Topics
    log_beta: Array2<f64>,  // Topics x Terms
    pub log_likelihoods: Vec<f64>,
}

impl TopicModel {
    pub fn num_topics(&self) -> usize {
        self.gamma.ncols()
    }

    /// Document-over-topic probabilities; rows sum to 1.
    pub fn gamma(&self) -> &Array2<f64> {
        &self.gamma
    }

    pub fn log_beta(&self) -> &Array2<f64> {
        &self.log_beta
    }

    /// Topic-over-term probabilities; rows sum to 1.
    pub fn beta(&self) -> Array2<f64> {
        self.log_beta.mapv(f64::exp)
    }

    /// Highest-probability topic of each document (0-based; first wins on ties).
    pub fn dominant_topics(&self) -> Vec<usize> {
        self.gamma
            .rows()
            .into_iter()
            .map(|probs| {
                probs
                    .iter()
                    .enumerate()
                    .fold((0, f64::MIN), |best, (t, &p)| if p > best.1 { (t, p) } else { best })
                    .0
            })
            .collect()
    }

    /// Top `n` terms of `topic` by beta, descending, ties in lexical order.
    pub fn top_terms(&self, topic: usize, n: usize) -> Vec<(String, f64)> {
        let row = self.log_beta.row(topic);
        let mut order: Vec<usize> = (0..self.vocabulary.len()).collect();
        order.sort_by(|&a, &b| {
            row[b]
                .total_cmp(&row[a])
                .then_with(|| self.vocabulary[a].cmp(&self.vocabulary[b]))
        });
        order
            .into_iter()
            .take(n)
            .map(|w| (self.vocabulary[w].clone(), row[w].exp()))
            .collect()
    }

    pub fn all_top_terms(&self, n: usize) -> Vec<Vec<(String, f64)>> {
        (0..self.num_topics()).map(|t| self.top_terms(t, n)).collect()
    }
}

/// Collapsed Gibbs sampler for LDA.
///
/// Every draw comes from one `StdRng` seeded from the config and tokens are
/// visited in a fixed order, so a given matrix and config always produce the
/// same posteriors.
pub struct GibbsLDA {
    config: LDAConfig,
}

impl GibbsLDA {
    pub fn new(config: LDAConfig) -> Self {
        GibbsLDA { config }
    }

    pub fn fit(&self, dtm: &DocumentTermMatrix) -> Result<TopicModel> {
        self.check_input(dtm)?;
        match self.config.method {
            InferenceMethod::Gibbs => Ok(self.run_gibbs(dtm)),
        }
    }

    fn check_input(&self, dtm: &DocumentTermMatrix) -> Result<()> {
        if dtm.n_docs() == 0 {
            return Err(Error::EmptyMatrix("no documents".into()));
        }
        if dtm.n_terms() == 0 {
            return Err(Error::EmptyMatrix("vocabulary is empty after cleaning".into()));
        }
        let k = self.config.num_topics;
        if k == 0 || k > dtm.n_terms() {
            return Err(Error::InvalidTopicCount { k, terms: dtm.n_terms() });
        }
        if let Some(empty) = dtm.row_sums().iter().position(|&n| n == 0) {
            return Err(Error::EmptyDocument(dtm.doc_labels()[empty].clone()));
        }
        Ok(())
    }

    fn run_gibbs(&self, dtm: &DocumentTermMatrix) -> TopicModel {
        let k = self.config.num_topics;
        let v = dtm.n_terms();
        let alpha = self.config.alpha_for(k);
        let beta = self.config.beta;
        let vb = v as f64 * beta;

        let docs = dtm.token_streams();
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        let mut ndk = vec![vec![0usize; k]; docs.len()];  // doc -> topic
        let mut nkw = vec![vec![0usize; v]; k];           // topic -> term
        let mut nk = vec![0usize; k];
        let mut z: Vec<Vec<usize>> = Vec::with_capacity(docs.len());

        for (d, doc) in docs.iter().enumerate() {
            let mut assignments = Vec::with_capacity(doc.len());
            for &w in doc {
                let topic = rng.gen_range(0..k);
                ndk[d][topic] += 1;
                nkw[topic][w] += 1;
                nk[topic] += 1;
                assignments.push(topic);
            }
            z.push(assignments);
        }

        let mut weights = vec![0.0f64; k];
        let mut log_likelihoods = Vec::new();

        for iteration in 1..=self.config.iterations {
            for (d, doc) in docs.iter().enumerate() {
                for (pos, &w) in doc.iter().enumerate() {
                    let old = z[d][pos];
                    ndk[d][old] -= 1;
                    nkw[old][w] -= 1;
                    nk[old] -= 1;

                    // p(t) ∝ (n_dt + α) (n_tw + β) / (n_t + Vβ)
                    let mut total = 0.0;
                    for t in 0..k {
                        total += (ndk[d][t] as f64 + alpha) * (nkw[t][w] as f64 + beta) / (nk[t] as f64 + vb);
                        weights[t] = total;
                    }
                    let u = rng.gen::<f64>() * total;
                    let new = weights.iter().position(|&c| u < c).unwrap_or(k - 1);

                    z[d][pos] = new;
                    ndk[d][new] += 1;
                    nkw[new][w] += 1;
                    nk[new] += 1;
                }
            }

            if iteration > self.config.burn_in && iteration % self.config.keep == 0 {
                let ll = log_likelihood(&nkw, &nk, beta);
                debug!(k, iteration, log_likelihood = ll, "Gibbs sample");
                log_likelihoods.push(ll);
            }
        }

        if log_likelihoods.is_empty() {
            log_likelihoods.push(log_likelihood(&nkw, &nk, beta));
        }

        let gamma = Array2::from_shape_fn((docs.len(), k), |(d, t)| {
            (ndk[d][t] as f64 + alpha) / (docs[d].len() as f64 + k as f64 * alpha)
        });
        let log_beta = Array2::from_shape_fn((k, v), |(t, w)| {
            ((nkw[t][w] as f64 + beta) / (nk[t] as f64 + vb)).ln()
        });

        TopicModel {
            vocabulary: dtm.terms().to_vec(),
            doc_labels: dtm.doc_labels().to_vec(),
            alpha,
            beta_prior: beta,
            gamma,
            log_beta,
            log_likelihoods,
        }
    }
}

/// log p(w | z) under symmetric Dirichlet(β) topic-term priors.
fn log_likelihood(nkw: &[Vec<usize>], nk: &[usize], beta: f64) -> f64 {
    let v = nkw.first().map_or(0, Vec::len) as f64;
    let per_topic = ln_gamma(v * beta) - v * ln_gamma(beta);
    nkw.iter()
        .zip(nk)
        .map(|(row, &n)| {
            let words: f64 = row.iter().map(|&c| ln_gamma(c as f64 + beta)).sum();
            per_topic + words - ln_gamma(n as f64 + v * beta)
        })
        .sum()
}
