//! Chart rendering with `plotters`. Each chart is a separate PNG.

pub mod histogram;
pub mod projection;
pub mod terms;
pub mod tuning_chart;
pub mod wordcloud;

use std::path::PathBuf;

use plotters::style::RGBColor;
use tracing::info;

use crate::config::ChartConfig;
use crate::topic_modeling::TopicModel;
use crate::Result;

pub const TUNING_CHART: &str = "topic_count_metrics.png";
pub const PCA_CHART: &str = "gamma_pca.png";
pub const GAMMA_CHART: &str = "gamma_histogram.png";
pub const BETA_CHART: &str = "beta_top_terms.png";
pub const WORDCLOUD_CHART: &str = "word_cloud.png";

/// ColorBrewer "Dark2".
pub const DARK2: [RGBColor; 8] = [
    RGBColor(0x1b, 0x9e, 0x77),
    RGBColor(0xd9, 0x5f, 0x02),
    RGBColor(0x75, 0x70, 0xb3),
    RGBColor(0xe7, 0x29, 0x8a),
    RGBColor(0x66, 0xa6, 0x1e),
    RGBColor(0xe6, 0xab, 0x02),
    RGBColor(0xa6, 0x76, 0x1d),
    RGBColor(0x66, 0x66, 0x66),
];

pub fn palette_color(index: usize) -> RGBColor {
    DARK2[index % DARK2.len()]
}

/// Rows and columns of a near-square facet grid holding `panels` subplots.
pub fn grid_shape(panels: usize) -> (usize, usize) {
    if panels == 0 {
        return (1, 1);
    }
    let cols = (panels as f64).sqrt().ceil() as usize;
    let rows = panels.div_ceil(cols);
    (rows, cols)
}

pub fn chart_path(config: &ChartConfig, name: &str) -> PathBuf {
    config.output_dir.join(name)
}

/// Render the four posterior charts into an existing output directory.
pub fn render_model_charts(model: &TopicModel, config: &ChartConfig) -> Result<Vec<PathBuf>> {
    let pca = chart_path(config, PCA_CHART);
    projection::render(model, config, &pca)?;
    info!(path = %pca.display(), "Rendered PCA scatter");

    let gamma = chart_path(config, GAMMA_CHART);
    histogram::render(model, config, &gamma)?;
    info!(path = %gamma.display(), "Rendered gamma histograms");

    let beta = chart_path(config, BETA_CHART);
    terms::render(model, config, &beta)?;
    info!(path = %beta.display(), "Rendered top-term bars");

    let cloud = chart_path(config, WORDCLOUD_CHART);
    wordcloud::render(model, config, &cloud)?;
    info!(path = %cloud.display(), "Rendered word cloud");

    Ok(vec![pca, gamma, beta, cloud])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_holds_every_panel() {
        assert_eq!(grid_shape(8), (3, 3));
        assert_eq!(grid_shape(4), (2, 2));
        assert_eq!(grid_shape(2), (1, 2));
        assert_eq!(grid_shape(15), (4, 4));
        for n in 1..=20 {
            let (rows, cols) = grid_shape(n);
            assert!(rows * cols >= n);
        }
    }

    #[test]
    fn palette_cycles() {
        assert_eq!(palette_color(0), palette_color(8));
        assert_ne!(palette_color(0), palette_color(1));
    }
}
