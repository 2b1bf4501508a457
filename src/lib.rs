//! # movie-topics
//!
//! Exploratory topic discovery over a table of movie plot summaries.
//!
//! The run is a straight line: load the CSV, clean the plots, build a
//! document-term matrix, sweep candidate topic counts, fit the chosen LDA
//! model and render the charts.
//!
//! ```rust,ignore
//! use movie_topics::{pipeline, PipelineConfig};
//!
//! let config = PipelineConfig::default();
//! let report = pipeline::run("wiki_movie_plots.csv".as_ref(), &config)?;
//! println!("fitted {} topics", report.analysis.model.num_topics());
//! ```

pub mod config;
pub mod dtm;
pub mod linalg;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod text;
pub mod topic_modeling;
pub mod tuning;
pub mod visualize;

pub use config::{LDAConfig, PipelineConfig};
pub use dtm::DocumentTermMatrix;
pub use models::Document;
pub use topic_modeling::{GibbsLDA, TopicModel};
pub use tuning::{Metric, TuningResult};

/// Error types for the crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid config file: {0}")]
    ConfigFile(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Column '{0}' not found in input header")]
    MissingColumn(String),

    #[error("Empty matrix: {0}")]
    EmptyMatrix(String),

    #[error("Document '{0}' has no terms left after cleaning")]
    EmptyDocument(String),

    #[error("Invalid topic count {k}: the matrix has {terms} terms")]
    InvalidTopicCount { k: usize, terms: usize },

    #[error("Rendering error: {0}")]
    Render(String),
}

impl<E> From<plotters::drawing::DrawingAreaErrorKind<E>> for Error
where
    E: std::error::Error + Send + Sync,
{
    fn from(e: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        Error::Render(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
