use std::path::Path;

use plotters::prelude::*;

use super::{grid_shape, palette_color};
use crate::config::ChartConfig;
use crate::topic_modeling::TopicModel;
use crate::Result;

/// Equal-width bin counts over [0, 1]; a value of exactly 1 lands in the last bin.
pub fn bin_counts(values: impl IntoIterator<Item = f64>, bins: usize) -> Vec<usize> {
    let mut counts = vec![0usize; bins];
    if bins == 0 {
        return counts;
    }
    for v in values {
        let idx = ((v.clamp(0.0, 1.0) * bins as f64).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
}

/// One facet per topic; every facet scales its own y axis.
pub fn render(model: &TopicModel, config: &ChartConfig, path: &Path) -> Result<()> {
    let k = model.num_topics();
    let bins = config.histogram_bins;
    let width = 1.0 / bins as f64;
    let font = config.font_family.as_str();

    let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE)?;
    let body = root.titled("Distribution of gamma per topic", (font, config.caption_size).into_font())?;

    for (topic, panel) in body.split_evenly(grid_shape(k)).iter().enumerate().take(k) {
        let counts = bin_counts(model.gamma().column(topic).iter().copied(), bins);
        let y_max = counts.iter().copied().max().unwrap_or(0).max(1);
        let color = palette_color(topic);

        let mut chart = ChartBuilder::on(panel)
            .caption(format!("Topic {}", topic + 1), (font, 16).into_font())
            .margin(8)
            .x_label_area_size(25)
            .y_label_area_size(35)
            .build_cartesian_2d(0f64..1f64, 0usize..(y_max + y_max / 10 + 1))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(5)
            .y_labels(4)
            .draw()?;

        chart.draw_series(counts.iter().enumerate().filter(|&(_, &c)| c > 0).map(|(i, &c)| {
            Rectangle::new([(i as f64 * width, 0), ((i + 1) as f64 * width, c)], color.filled())
        }))?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_cover_every_value() {
        let values = [0.0, 0.05, 0.1, 0.5, 0.99, 1.0];
        let counts = bin_counts(values, 10);
        assert_eq!(counts.len(), 10);
        assert_eq!(counts.iter().sum::<usize>(), values.len());
        assert_eq!(counts[0], 2);
        assert_eq!(counts[1], 1);
        assert_eq!(counts[5], 1);
        assert_eq!(counts[9], 2);
    }

    #[test]
    fn zero_bins_is_empty() {
        assert!(bin_counts([0.3], 0).is_empty());
    }
}
