use std::path::Path;

use plotters::prelude::*;

use super::palette_color;
use crate::config::ChartConfig;
use crate::tuning::{Direction, Metric, TuningResult};
use crate::Result;

/// Normalized metric score against k, split into "minimize" and "maximize"
/// panels. Reading it is left to a human.
pub fn render(result: &TuningResult, config: &ChartConfig, path: &Path) -> Result<()> {
    let font = config.font_family.as_str();
    let k_min = result.rows.iter().map(|r| r.k).min().unwrap_or(0) as f64;
    let k_max = result.rows.iter().map(|r| r.k).max().unwrap_or(0) as f64;

    let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE)?;
    let body = root.titled("Metrics by number of topics", (font, config.caption_size).into_font())?;
    let panels = body.split_evenly((2, 1));

    for (panel, direction, title) in [
        (&panels[0], Direction::Minimize, "minimize"),
        (&panels[1], Direction::Maximize, "maximize"),
    ] {
        let metrics: Vec<Metric> = result
            .metrics
            .iter()
            .copied()
            .filter(|m| m.direction() == direction)
            .collect();
        if metrics.is_empty() {
            continue;
        }

        let mut chart = ChartBuilder::on(panel)
            .caption(title, (font, 20).into_font())
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d((k_min - 0.5)..(k_max + 0.5), -0.05f64..1.05f64)?;

        chart
            .configure_mesh()
            .x_desc("number of topics")
            .y_desc("normalized score")
            .x_labels((k_max - k_min) as usize + 1)
            .x_label_formatter(&|x| format!("{:.0}", x))
            .draw()?;

        for metric in metrics {
            let color = palette_color(Metric::ALL.iter().position(|m| *m == metric).unwrap_or(0));
            let series: Vec<(f64, f64)> = result
                .normalized(metric)
                .into_iter()
                .map(|(k, s)| (k as f64, s))
                .collect();

            chart
                .draw_series(LineSeries::new(series.iter().copied(), color.stroke_width(2)))?
                .label(metric.to_string())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
            chart.draw_series(series.iter().map(|&(k, s)| Circle::new((k, s), 4, color.filled())))?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}
