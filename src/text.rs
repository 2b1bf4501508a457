//! Two independent text paths.
//!
//! [`word_counts`] segments plots into Unicode words for the inspection
//! table. [`Cleaner`] normalizes plots with regular expressions for the
//! document-term matrix. They share the stopword list but nothing else, so
//! their tokenizations can differ (for example on contractions).

use std::collections::HashSet;

use counter::Counter;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::CleaningConfig;
use crate::models::{CleanedDocument, Document, WordCount};

pub const STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "would",
    "should", "could", "ought", "i'm", "you're", "he's", "she's", "it's", "we're", "they're",
    "i've", "you've", "we've", "they've", "i'd", "you'd", "he'd", "she'd", "we'd", "they'd",
    "i'll", "you'll", "he'll", "she'll", "we'll", "they'll", "isn't", "aren't", "wasn't",
    "weren't", "hasn't", "haven't", "hadn't", "doesn't", "don't", "didn't", "won't",
    "wouldn't", "shan't", "shouldn't", "can't", "cannot", "couldn't", "mustn't", "let's",
    "that's", "who's", "what's", "here's", "there's", "when's", "where's", "why's", "how's",
    "a", "an", "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at",
    "by", "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very",
];

fn stopword_set(extra: &[String]) -> HashSet<String> {
    STOPWORDS
        .iter()
        .map(|w| w.to_string())
        .chain(extra.iter().map(|w| w.to_lowercase()))
        .collect()
}

/// Tidy per-document word counts, stopwords excluded.
#[derive(Debug, Clone, Default)]
pub struct WordCountTable {
    pub rows: Vec<WordCount>,
}

impl WordCountTable {
    /// Corpus-wide totals, count descending and ties in lexical order.
    pub fn top_words(&self, n: usize) -> Vec<(String, usize)> {
        let mut totals: Counter<String> = Counter::new();
        for row in &self.rows {
            totals[&row.word] += row.count;
        }
        let mut ordered = totals.most_common_ordered();
        ordered.truncate(n);
        ordered
    }
}

pub fn word_counts(documents: &[Document], extra_stopwords: &[String]) -> WordCountTable {
    let stop_words = stopword_set(extra_stopwords);

    let rows = documents
        .iter()
        .flat_map(|doc| {
            let counts: Counter<String> = doc
                .text
                .unicode_words()
                .map(|w| w.to_lowercase())
                .filter(|w| !stop_words.contains(w))
                .collect();
            counts
                .most_common_ordered()
                .into_iter()
                .map(move |(word, count)| WordCount {
                    document: doc.id,
                    word,
                    count,
                })
        })
        .collect();

    WordCountTable { rows }
}

/// Lowercases, drops stopwords, deletes punctuation and short tokens.
///
/// Punctuation is deleted rather than replaced by a space, so one
/// whitespace-separated input token yields at most one output token.
pub struct Cleaner {
    stop_words: HashSet<String>,
    min_word_length: usize,
    punctuation: Regex,
}

impl Cleaner {
    pub fn new(config: &CleaningConfig) -> Self {
        Cleaner {
            stop_words: stopword_set(&config.extra_stopwords),
            min_word_length: config.min_word_length,
            punctuation: Regex::new(r"[\p{P}\p{S}]").unwrap(),
        }
    }

    pub fn clean(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split_whitespace()
            .filter_map(|raw| {
                // Contractions are matched before their apostrophe is deleted.
                let trimmed = raw
                    .trim_matches(|c: char| !c.is_alphanumeric())
                    .replace('\u{2019}', "'");
                if self.stop_words.contains(&trimmed) {
                    return None;
                }
                let word = self.punctuation.replace_all(&trimmed, "");
                if word.chars().count() < self.min_word_length || self.stop_words.contains(word.as_ref()) {
                    return None;
                }
                Some(word.into_owned())
            })
            .collect()
    }

    pub fn clean_corpus(&self, documents: &[Document]) -> Vec<CleanedDocument> {
        documents
            .iter()
            .map(|doc| CleanedDocument {
                id: doc.id,
                label: doc.label(),
                tokens: self.clean(&doc.text),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<Document> {
        vec![
            Document::new(0, "A", "a dog ran in the park"),
            Document::new(1, "B", "the cat sat on the mat"),
            Document::new(2, "C", "dogs and cats are pets"),
        ]
    }

    #[test]
    fn clean_drops_stopwords_and_case() {
        let cleaner = Cleaner::new(&CleaningConfig::default());
        assert_eq!(cleaner.clean("A Dog RAN in the Park"), vec!["dog", "ran", "park"]);
    }

    #[test]
    fn clean_strips_punctuation_and_contractions() {
        let cleaner = Cleaner::new(&CleaningConfig::default());
        let tokens = cleaner.clean("\"Don't,\" she said -- the spy's car... exploded!");
        assert_eq!(tokens, vec!["said", "spys", "car", "exploded"]);
    }

    #[test]
    fn clean_handles_curly_apostrophes() {
        let cleaner = Cleaner::new(&CleaningConfig::default());
        assert_eq!(cleaner.clean("They\u{2019}re gone"), vec!["gone"]);
    }

    #[test]
    fn clean_applies_min_length_and_extra_stopwords() {
        let config = CleaningConfig {
            min_word_length: 4,
            extra_stopwords: vec!["Film".into()],
        };
        let cleaner = Cleaner::new(&config);
        assert_eq!(cleaner.clean("the film about a big heist"), vec!["heist"]);
    }

    #[test]
    fn clean_never_adds_tokens() {
        let cleaner = Cleaner::new(&CleaningConfig { min_word_length: 1, ..CleaningConfig::default() });
        let texts = [
            "well-known rock/paper/scissors champion",
            "  spaced\t\tout   words ",
            "semi;colons,commas.and:more",
            "",
        ];
        for text in texts {
            assert!(cleaner.clean(text).len() <= text.split_whitespace().count(), "{text}");
        }
    }

    #[test]
    fn clean_corpus_keeps_order_and_labels() {
        let cleaner = Cleaner::new(&CleaningConfig::default());
        let cleaned = cleaner.clean_corpus(&corpus());
        assert_eq!(cleaned.len(), 3);
        assert_eq!(cleaned[1].label, "B#1");
        assert_eq!(cleaned[2].tokens, vec!["dogs", "cats", "pets"]);
    }

    #[test]
    fn word_counts_are_tidy() {
        let docs = vec![Document::new(0, "X", "The dog chased the other dog. Dog!")];
        let table = word_counts(&docs, &[]);
        assert_eq!(
            table.rows,
            vec![
                WordCount { document: 0, word: "dog".into(), count: 3 },
                WordCount { document: 0, word: "chased".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn word_count_path_keeps_contractions_whole() {
        // The inspection path and the matrix path disagree here on purpose.
        let docs = vec![Document::new(0, "X", "The spy's car")];
        let table = word_counts(&docs, &[]);
        let words: Vec<_> = table.rows.iter().map(|r| r.word.as_str()).collect();
        assert!(words.contains(&"spy's"));
        let cleaner = Cleaner::new(&CleaningConfig::default());
        assert_eq!(cleaner.clean("The spy's car"), vec!["spys", "car"]);
    }

    #[test]
    fn top_words_breaks_ties_lexically() {
        let table = word_counts(&corpus(), &[]);
        let top = table.top_words(3);
        assert_eq!(top[0].1, 1);
        assert_eq!(top.iter().map(|(w, _)| w.as_str()).collect::<Vec<_>>(), vec!["cat", "cats", "dog"]);
        assert_eq!(table.rows.iter().filter(|r| r.document == 2).count(), 3);
    }
}
