use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use movie_topics::pipeline::{self, Report};
use movie_topics::PipelineConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Discover and chart latent topics in movie plot summaries", long_about = None)]
struct Args {
    /// CSV file with a title column and a plot column
    path: PathBuf,
    #[clap(short, long, help = "JSON file overriding any part of the default configuration")]
    config: Option<PathBuf>,
    #[clap(short = 'k', long, help = "Number of topics for the final model")]
    topics: Option<usize>,
    #[clap(long, help = "Smallest topic count in the sweep")]
    min_topics: Option<usize>,
    #[clap(long, help = "Largest topic count in the sweep (inclusive)")]
    max_topics: Option<usize>,
    #[clap(long)]
    seed: Option<u64>,
    #[clap(long, help = "Gibbs sampling iterations per model")]
    iterations: Option<usize>,
    #[clap(long, help = "Worker threads for the topic-count sweep")]
    workers: Option<usize>,
    #[clap(short, long)]
    output_dir: Option<PathBuf>,
    #[clap(long, help = "Only read the first N rows of the input")]
    max_documents: Option<usize>,
    #[clap(long, help = "Skip the topic-count sweep and its chart")]
    skip_tuning: bool,
    #[clap(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn into_config(self) -> anyhow::Result<(PathBuf, PipelineConfig)> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_file(path)
                .with_context(|| format!("reading config {}", path.display()))?,
            None => PipelineConfig::default(),
        };

        if let Some(k) = self.topics {
            config.lda.num_topics = k;
        }
        if let Some(min) = self.min_topics {
            config.tuning.min_topics = min;
        }
        if let Some(max) = self.max_topics {
            config.tuning.max_topics = max;
        }
        if let Some(seed) = self.seed {
            config.lda.seed = seed;
        }
        if let Some(iterations) = self.iterations {
            config.lda.iterations = iterations;
        }
        if let Some(workers) = self.workers {
            config.tuning.workers = workers;
        }
        if let Some(dir) = self.output_dir {
            config.charts.output_dir = dir;
        }
        if self.max_documents.is_some() {
            config.input.max_documents = self.max_documents;
        }
        if self.skip_tuning {
            config.tuning.enabled = false;
        }
        Ok((self.path, config))
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt().with_env_filter(log_filter(&args.log_level)?).init();

    let (path, config) = args.into_config()?;

    println!("Path: {}", path.display());
    let report = pipeline::run(&path, &config).with_context(|| format!("analyzing {}", path.display()))?;
    print_summary(&report, config.charts.top_terms);
    Ok(())
}

fn log_filter(level: &str) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_new(level).with_context(|| format!("invalid --log-level '{level}'"))
}

fn print_summary(report: &Report, top_terms: usize) {
    let analysis = &report.analysis;
    println!("\n📊 Corpus");
    println!("   Documents:  {}", analysis.documents);
    println!("   Vocabulary: {}", analysis.dtm.n_terms());
    println!("   Sparsity:   {:.3}", analysis.dtm.sparsity());

    println!("\n🔤 Most frequent words (stopwords removed):");
    for (i, (word, count)) in analysis.word_counts.top_words(10).iter().enumerate() {
        println!("   {:<2}. {:<15} {}", i + 1, word, count);
    }

    println!("\n🧹 Most frequent terms after cleaning:");
    let mut frequencies: Vec<(&String, usize)> =
        analysis.dtm.terms().iter().zip(analysis.dtm.column_sums()).collect();
    frequencies.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    for (i, (term, count)) in frequencies.iter().take(10).enumerate() {
        println!("   {:<2}. {:<15} {}", i + 1, term, count);
    }

    if let Some(tuning) = &analysis.tuning {
        println!("\n🔎 Topic-count metrics:");
        print!("   {:>3}", "k");
        for metric in &tuning.metrics {
            print!(" {:>15}", metric.to_string());
        }
        println!();
        for row in &tuning.rows {
            print!("   {:>3}", row.k);
            for metric in &tuning.metrics {
                print!(" {:>15.4}", row.scores.get(metric).copied().unwrap_or(f64::NAN));
            }
            println!();
        }
    }

    let model = &analysis.model;
    let dominant = model.dominant_topics();
    println!("\n🎯 {} topics", model.num_topics());
    for topic in 0..model.num_topics() {
        let members = dominant.iter().filter(|&&t| t == topic).count();
        let words: Vec<String> = model
            .top_terms(topic, top_terms)
            .into_iter()
            .map(|(term, beta)| format!("{term} ({beta:.3})"))
            .collect();
        println!("   Topic {:<2} [{} documents] {}", topic + 1, members, words.join(", "));
    }

    println!("\n🖼  Charts:");
    for chart in &report.charts {
        println!("   {}", chart.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_filter_rejects_unknown_levels() {
        assert!(log_filter("debug").is_ok());
        assert!(log_filter("movie_topics=trace,info").is_ok());
        let err = log_filter("movie_topics=loud").unwrap_err();
        assert!(err.to_string().contains("--log-level"));
    }

    #[test]
    fn flags_override_config() {
        let args = Args::parse_from([
            "movie-topics",
            "plots.csv",
            "-k",
            "5",
            "--max-topics",
            "9",
            "--skip-tuning",
            "-o",
            "out",
        ]);
        let (path, config) = args.into_config().unwrap();
        assert_eq!(path, PathBuf::from("plots.csv"));
        assert_eq!(config.lda.num_topics, 5);
        assert_eq!(config.tuning.max_topics, 9);
        assert!(!config.tuning.enabled);
        assert_eq!(config.charts.output_dir, PathBuf::from("out"));
        assert_eq!(config.lda.seed, 1234);
    }
}
