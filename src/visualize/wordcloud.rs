//! Aggregate word cloud over every topic's top terms.

use std::collections::BTreeMap;
use std::path::Path;

use plotters::prelude::*;
use tracing::debug;

use super::{palette_color, DARK2};
use crate::config::ChartConfig;
use crate::topic_modeling::TopicModel;
use crate::Result;

const SPIRAL_STEPS: usize = 6000;
const PADDING: i32 = 2;

/// Sum each term's beta over the per-topic lists it appears in.
///
/// A term in several topics' lists gets the total, not the largest value.
/// Output is weight descending, ties in lexical order.
pub fn aggregate_top_terms(top_terms: &[Vec<(String, f64)>]) -> Vec<(String, f64)> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for (term, beta) in top_terms.iter().flatten() {
        *totals.entry(term.as_str()).or_insert(0.0) += beta;
    }
    let mut weights: Vec<(String, f64)> = totals.into_iter().map(|(t, w)| (t.to_string(), w)).collect();
    weights.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    weights
}

pub fn term_weights(model: &TopicModel, top_n: usize) -> Vec<(String, f64)> {
    aggregate_top_terms(&model.all_top_terms(top_n))
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub word: String,
    pub weight: f64,
    pub font_size: u32,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub color: usize,
}

impl PlacedWord {
    fn overlaps(&self, x: i32, y: i32, w: u32, h: u32) -> bool {
        x < self.x + self.width as i32 + PADDING
            && self.x < x + w as i32 + PADDING
            && y < self.y + self.height as i32 + PADDING
            && self.y < y + h as i32 + PADDING
    }
}

/// Font size scaled linearly between the smallest and largest weight.
pub fn font_size(weight: f64, min_weight: f64, max_weight: f64, fonts: (u32, u32)) -> u32 {
    let (lo, hi) = fonts;
    if max_weight - min_weight < f64::EPSILON {
        return hi;
    }
    let t = ((weight - min_weight) / (max_weight - min_weight)).clamp(0.0, 1.0);
    lo + ((hi - lo) as f64 * t).round() as u32
}

/// Place words largest first along an Archimedean spiral from the centre.
///
/// `measure` returns the pixel box of a word at a font size. Words that find
/// no free spot inside the canvas are dropped.
pub fn layout_words<F>(
    words: &[(String, f64)],
    canvas: (u32, u32),
    fonts: (u32, u32),
    mut measure: F,
) -> Result<Vec<PlacedWord>>
where
    F: FnMut(&str, u32) -> Result<(u32, u32)>,
{
    let max_weight = words.iter().map(|(_, w)| *w).fold(f64::NEG_INFINITY, f64::max);
    let min_weight = words.iter().map(|(_, w)| *w).fold(f64::INFINITY, f64::min);
    let (cx, cy) = (canvas.0 as f64 / 2.0, canvas.1 as f64 / 2.0);
    let bands = DARK2.len() - 1;

    let mut placed: Vec<PlacedWord> = Vec::new();
    for (word, weight) in words {
        let size = font_size(*weight, min_weight, max_weight, fonts);
        let (w, h) = measure(word, size)?;

        let spot = (0..SPIRAL_STEPS).find_map(|step| {
            let theta = step as f64 * 0.1;
            let r = 1.5 * theta;
            let x = (cx + r * theta.cos() - w as f64 / 2.0).round() as i32;
            let y = (cy + r * theta.sin() - h as f64 / 2.0).round() as i32;
            let inside = x >= 0 && y >= 0 && x + w as i32 <= canvas.0 as i32 && y + h as i32 <= canvas.1 as i32;
            (inside && !placed.iter().any(|p| p.overlaps(x, y, w, h))).then_some((x, y))
        });

        match spot {
            Some((x, y)) => {
                let band = if max_weight > min_weight {
                    ((max_weight - weight) / (max_weight - min_weight) * bands as f64).round() as usize
                } else {
                    0
                };
                placed.push(PlacedWord {
                    word: word.clone(),
                    weight: *weight,
                    font_size: size,
                    x,
                    y,
                    width: w,
                    height: h,
                    color: band,
                });
            }
            None => debug!(word = %word, "No room left in word cloud"),
        }
    }
    Ok(placed)
}

pub fn render(model: &TopicModel, config: &ChartConfig, path: &Path) -> Result<()> {
    let words: Vec<(String, f64)> = term_weights(model, config.top_terms)
        .into_iter()
        .filter(|(_, w)| *w >= config.wordcloud_min_weight)
        .collect();
    let font = config.font_family.as_str();

    let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let placed = layout_words(
        &words,
        (config.width, config.height),
        (config.wordcloud_min_font, config.wordcloud_max_font),
        |word, size| Ok(root.estimate_text_size(word, &TextStyle::from((font, size).into_font()))?),
    )?;
    debug!(requested = words.len(), placed = placed.len(), "Word cloud layout");

    for word in &placed {
        let color = palette_color(word.color);
        let style = TextStyle::from((font, word.font_size).into_font()).color(&color);
        root.draw(&Text::new(word.word.clone(), (word.x, word.y), style))?;
    }

    root.present()?;
    Ok(())
}
