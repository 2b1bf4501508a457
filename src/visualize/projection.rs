use std::ops::Range;
use std::path::Path;

use plotters::prelude::*;

use super::palette_color;
use crate::config::ChartConfig;
use crate::linalg::pca;
use crate::topic_modeling::TopicModel;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedDocument {
    pub x: f64,
    pub y: f64,
    pub topic: usize,
}

/// First two principal components of gamma, labelled by dominant topic.
pub fn project(model: &TopicModel) -> Vec<ProjectedDocument> {
    let (scores, _) = pca(model.gamma(), 2);
    model
        .dominant_topics()
        .into_iter()
        .enumerate()
        .map(|(d, topic)| ProjectedDocument {
            x: scores[[d, 0]],
            y: if scores.ncols() > 1 { scores[[d, 1]] } else { 0.0 },
            topic,
        })
        .collect()
}

fn padded(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() || !hi.is_finite() || hi - lo < 1e-12 {
        let mid = if lo.is_finite() { lo } else { 0.0 };
        return (mid - 1.0)..(mid + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad)..(hi + pad)
}

pub fn render(model: &TopicModel, config: &ChartConfig, path: &Path) -> Result<()> {
    let points = project(model);
    let font = config.font_family.as_str();

    let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Documents by dominant topic (PCA of gamma)", (font, config.caption_size).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(padded(points.iter().map(|p| p.x)), padded(points.iter().map(|p| p.y)))?;

    chart.configure_mesh().x_desc("PC1").y_desc("PC2").draw()?;

    for topic in 0..model.num_topics() {
        let color = palette_color(topic);
        chart
            .draw_series(
                points
                    .iter()
                    .filter(|p| p.topic == topic)
                    .map(|p| Circle::new((p.x, p.y), config.point_size, color.filled())),
            )?
            .label(format!("Topic {}", topic + 1))
            .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CleaningConfig, LDAConfig};
    use crate::dtm::DocumentTermMatrix;
    use crate::models::Document;
    use crate::text::Cleaner;
    use crate::topic_modeling::GibbsLDA;

    fn model() -> TopicModel {
        let docs: Vec<Document> = [
            "spaceship alien planet crew",
            "alien invasion planet",
            "detective murder police",
            "police detective crime",
            "wedding love romance",
        ]
        .iter()
        .enumerate()
        .map(|(i, t)| Document::new(i, "m", *t))
        .collect();
        let dtm = DocumentTermMatrix::from_cleaned(&Cleaner::new(&CleaningConfig::default()).clean_corpus(&docs));
        let config = LDAConfig { num_topics: 3, iterations: 50, ..LDAConfig::default() };
        GibbsLDA::new(config).fit(&dtm).unwrap()
    }

    #[test]
    fn one_point_per_document() {
        let model = model();
        let points = project(&model);
        assert_eq!(points.len(), 5);
        let dominant = model.dominant_topics();
        assert!(points.iter().zip(&dominant).all(|(p, &t)| p.topic == t));
        assert!(points.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[test]
    fn projection_is_centred() {
        let points = project(&model());
        let mean_x: f64 = points.iter().map(|p| p.x).sum::<f64>() / points.len() as f64;
        assert!(mean_x.abs() < 1e-9);
    }

    #[test]
    fn padded_range_never_collapses() {
        assert_eq!(padded([2.0, 2.0].into_iter()), 1.0..3.0);
        assert_eq!(padded(std::iter::empty()), -1.0..1.0);
        let r = padded([0.0, 10.0].into_iter());
        assert!(r.start < 0.0 && r.end > 10.0);
    }
}
