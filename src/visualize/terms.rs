use std::path::Path;

use plotters::prelude::*;

use super::{grid_shape, palette_color};
use crate::config::ChartConfig;
use crate::topic_modeling::TopicModel;
use crate::Result;

/// Horizontal bars of each topic's top terms, largest beta at the top.
pub fn render(model: &TopicModel, config: &ChartConfig, path: &Path) -> Result<()> {
    let k = model.num_topics();
    let font = config.font_family.as_str();

    let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE)?;
    let body = root.titled("Top terms per topic (beta)", (font, config.caption_size).into_font())?;

    for (topic, panel) in body.split_evenly(grid_shape(k)).iter().enumerate().take(k) {
        let top = model.top_terms(topic, config.top_terms);
        let n = top.len();
        // Segment 0 is drawn at the bottom, so the list is reversed.
        let labels: Vec<String> = top.iter().rev().map(|(term, _)| term.clone()).collect();
        let x_max = top.first().map_or(1.0, |(_, b)| *b) * 1.1;
        let color = palette_color(topic);

        let mut chart = ChartBuilder::on(panel)
            .caption(format!("Topic {}", topic + 1), (font, 16).into_font())
            .margin(8)
            .x_label_area_size(25)
            .y_label_area_size(90)
            .build_cartesian_2d(0f64..x_max, (0usize..n).into_segmented())?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .x_labels(3)
            .y_labels(n)
            .x_label_formatter(&|x| format!("{:.3}", x))
            .y_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .draw()?;

        chart.draw_series(top.iter().rev().enumerate().map(|(i, (_, beta))| {
            Rectangle::new(
                [(0.0, SegmentValue::Exact(i)), (*beta, SegmentValue::Exact(i + 1))],
                color.filled(),
            )
        }))?;
    }

    root.present()?;
    Ok(())
}
