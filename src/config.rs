use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::tuning::Metric;
use crate::{Error, Result};

/// Every tunable literal of a run. Loaded from JSON with missing sections
/// falling back to the defaults below.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub input: InputConfig,
    pub cleaning: CleaningConfig,
    pub tuning: TuningConfig,
    pub lda: LDAConfig,
    pub charts: ChartConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub title_column: String,
    pub text_column: String,
    pub delimiter: char,
    pub max_documents: Option<usize>,  // Read only the first N rows
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            title_column: "Title".to_string(),
            text_column: "Plot".to_string(),
            delimiter: ',',
            max_documents: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    pub min_word_length: usize,
    pub extra_stopwords: Vec<String>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        CleaningConfig {
            min_word_length: 3,
            extra_stopwords: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    pub enabled: bool,
    pub min_topics: usize,
    pub max_topics: usize,  // Inclusive
    pub metrics: Vec<Metric>,
    pub workers: usize,
}

impl Default for TuningConfig {
    fn default() -> Self {
        TuningConfig {
            enabled: true,
            min_topics: 2,
            max_topics: 15,
            metrics: Metric::ALL.to_vec(),
            workers: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InferenceMethod {
    Gibbs,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LDAConfig {
    pub method: InferenceMethod,
    pub num_topics: usize,
    pub iterations: usize,
    pub burn_in: usize,
    pub keep: usize,         // Record the log-likelihood every `keep` iterations
    pub alpha: Option<f64>,  // Document-topic concentration, 50/k when unset
    pub beta: f64,           // Topic-word concentration
    pub seed: u64,
}

impl Default for LDAConfig {
    fn default() -> Self {
        LDAConfig {
            method: InferenceMethod::Gibbs,
            num_topics: 8,
            iterations: 1000,
            burn_in: 0,
            keep: 50,
            alpha: None,
            beta: 0.1,
            seed: 1234,
        }
    }
}

impl LDAConfig {
    pub fn alpha_for(&self, num_topics: usize) -> f64 {
        self.alpha.unwrap_or(50.0 / num_topics as f64)
    }

    /// Same controls, different topic count.
    pub fn with_topics(&self, num_topics: usize) -> Self {
        LDAConfig {
            num_topics,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub output_dir: PathBuf,
    pub width: u32,
    pub height: u32,
    pub font_family: String,
    pub caption_size: u32,
    pub point_size: u32,
    pub top_terms: usize,
    pub histogram_bins: usize,
    pub wordcloud_min_weight: f64,  // Terms below this aggregate weight are not drawn
    pub wordcloud_min_font: u32,
    pub wordcloud_max_font: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            output_dir: PathBuf::from("plots"),
            width: 1200,
            height: 800,
            font_family: "sans-serif".to_string(),
            caption_size: 30,
            point_size: 3,
            top_terms: 10,
            histogram_bins: 30,
            wordcloud_min_weight: 0.005,
            wordcloud_min_font: 12,
            wordcloud_max_font: 72,
        }
    }
}

impl PipelineConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: PipelineConfig = serde_json::from_str(&raw)?;
        Ok(config)
    }

    /// Reject settings that would only fail halfway through a run.
    pub fn validate(&self) -> Result<()> {
        if !self.input.delimiter.is_ascii() {
            return Err(Error::Config(format!(
                "delimiter '{}' must be a single ASCII character",
                self.input.delimiter
            )));
        }
        if self.lda.num_topics == 0 {
            return Err(Error::Config("num_topics must be at least 1".into()));
        }
        if self.lda.iterations == 0 {
            return Err(Error::Config("iterations must be at least 1".into()));
        }
        if self.lda.keep == 0 {
            return Err(Error::Config("keep must be at least 1".into()));
        }
        if self.lda.burn_in >= self.lda.iterations {
            return Err(Error::Config(format!(
                "burn_in ({}) must be smaller than iterations ({})",
                self.lda.burn_in, self.lda.iterations
            )));
        }
        if self.lda.beta <= 0.0 || self.lda.alpha.is_some_and(|a| a <= 0.0) {
            return Err(Error::Config("alpha and beta must be positive".into()));
        }
        if self.tuning.enabled {
            let t = &self.tuning;
            if t.min_topics < 2 || t.min_topics > t.max_topics {
                return Err(Error::Config(format!(
                    "topic range {}..={} must start at 2 or more and be non-empty",
                    t.min_topics, t.max_topics
                )));
            }
            if t.metrics.is_empty() {
                return Err(Error::Config("at least one tuning metric is required".into()));
            }
            if t.workers == 0 {
                return Err(Error::Config("workers must be at least 1".into()));
            }
        }
        if self.charts.top_terms == 0 || self.charts.histogram_bins == 0 {
            return Err(Error::Config("top_terms and histogram_bins must be at least 1".into()));
        }
        if self.charts.wordcloud_min_font > self.charts.wordcloud_max_font {
            return Err(Error::Config("wordcloud_min_font exceeds wordcloud_max_font".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_run() {
        let config = PipelineConfig::default();
        assert_eq!(config.lda.num_topics, 8);
        assert_eq!(config.tuning.min_topics, 2);
        assert_eq!(config.tuning.max_topics, 15);
        assert_eq!(config.tuning.workers, 1);
        assert_eq!(config.tuning.metrics.len(), 4);
        assert_eq!(config.charts.top_terms, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn alpha_defaults_to_fifty_over_k() {
        let lda = LDAConfig::default();
        assert!((lda.alpha_for(10) - 5.0).abs() < 1e-12);
        let fixed = LDAConfig { alpha: Some(0.1), ..LDAConfig::default() };
        assert_eq!(fixed.alpha_for(10), 0.1);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: PipelineConfig = serde_json::from_str(
            r#"{ "lda": { "num_topics": 5, "seed": 7 }, "tuning": { "metrics": ["CaoJuan2009"] } }"#,
        )
        .unwrap();
        assert_eq!(config.lda.num_topics, 5);
        assert_eq!(config.lda.seed, 7);
        assert_eq!(config.lda.iterations, 1000);
        assert_eq!(config.tuning.metrics, vec![Metric::CaoJuan2009]);
        assert_eq!(config.input.text_column, "Plot");
    }

    #[test]
    fn unknown_method_is_rejected() {
        let parsed = serde_json::from_str::<PipelineConfig>(r#"{ "lda": { "method": "VEM" } }"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn validate_rejects_bad_range() {
        let mut config = PipelineConfig::default();
        config.tuning.min_topics = 1;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        config.tuning.min_topics = 9;
        config.tuning.max_topics = 4;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        config.tuning.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_burn_in_past_iterations() {
        let mut config = PipelineConfig::default();
        config.lda.burn_in = config.lda.iterations;
        assert!(config.validate().is_err());
    }
}
