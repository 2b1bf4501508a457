use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::PipelineConfig;
use crate::dtm::DocumentTermMatrix;
use crate::loader::load_documents;
use crate::models::Document;
use crate::text::{word_counts, Cleaner, WordCountTable};
use crate::topic_modeling::{GibbsLDA, TopicModel};
use crate::tuning::{find_topics_number, TuningResult};
use crate::visualize::{self, chart_path, tuning_chart, TUNING_CHART};
use crate::Result;

/// Everything computed in memory before any chart is drawn.
#[derive(Debug)]
pub struct Analysis {
    pub documents: usize,
    pub word_counts: WordCountTable,
    pub dtm: DocumentTermMatrix,
    pub tuning: Option<TuningResult>,
    pub model: TopicModel,
}

#[derive(Debug)]
pub struct Report {
    pub analysis: Analysis,
    pub charts: Vec<PathBuf>,
}

/// Load, analyze and render. Any failing stage aborts the run.
pub fn run(path: &Path, config: &PipelineConfig) -> Result<Report> {
    config.validate()?;
    let documents = load_documents(path, &config.input)?;
    let analysis = analyze_validated(&documents, config)?;
    let charts = render(&analysis, config)?;
    Ok(Report { analysis, charts })
}

pub fn analyze(documents: &[Document], config: &PipelineConfig) -> Result<Analysis> {
    config.validate()?;
    analyze_validated(documents, config)
}

fn analyze_validated(documents: &[Document], config: &PipelineConfig) -> Result<Analysis> {
    let word_counts = word_counts(documents, &config.cleaning.extra_stopwords);
    info!(rows = word_counts.rows.len(), "Built word-count table");

    let cleaned = Cleaner::new(&config.cleaning).clean_corpus(documents);
    let dtm = DocumentTermMatrix::from_cleaned(&cleaned);
    info!(
        documents = dtm.n_docs(),
        terms = dtm.n_terms(),
        sparsity = dtm.sparsity(),
        "Built document-term matrix"
    );

    let tuning = if config.tuning.enabled {
        Some(find_topics_number(&dtm, &config.tuning, &config.lda)?)
    } else {
        info!("Topic-count sweep disabled");
        None
    };

    info!(k = config.lda.num_topics, seed = config.lda.seed, "Fitting final model");
    let model = GibbsLDA::new(config.lda.clone()).fit(&dtm)?;

    Ok(Analysis {
        documents: documents.len(),
        word_counts,
        dtm,
        tuning,
        model,
    })
}

pub fn render(analysis: &Analysis, config: &PipelineConfig) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(&config.charts.output_dir)?;
    let mut charts = Vec::new();

    if let Some(tuning) = &analysis.tuning {
        let path = chart_path(&config.charts, TUNING_CHART);
        tuning_chart::render(tuning, &config.charts, &path)?;
        info!(path = %path.display(), "Rendered topic-count metrics");
        charts.push(path);
    }

    charts.extend(visualize::render_model_charts(&analysis.model, &config.charts)?);
    Ok(charts)
}
