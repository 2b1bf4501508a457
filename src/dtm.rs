use std::collections::{BTreeMap, BTreeSet};

use crate::models::CleanedDocument;

/// Raw term counts, documents x vocabulary.
///
/// Rows are stored sparsely as `(term index, count)` pairs sorted by term
/// index. Columns are the distinct cleaned tokens in lexical order.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentTermMatrix {
    doc_labels: Vec<String>,
    terms: Vec<String>,
    rows: Vec<Vec<(usize, u32)>>,
}

impl DocumentTermMatrix {
    pub fn from_cleaned(documents: &[CleanedDocument]) -> Self {
        let vocabulary: BTreeSet<&str> = documents
            .iter()
            .flat_map(|doc| doc.tokens.iter().map(String::as_str))
            .collect();
        let index: BTreeMap<&str, usize> = vocabulary.iter().enumerate().map(|(i, t)| (*t, i)).collect();

        let rows = documents
            .iter()
            .map(|doc| {
                let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
                for token in &doc.tokens {
                    *counts.entry(index[token.as_str()]).or_insert(0) += 1;
                }
                counts.into_iter().collect()
            })
            .collect();

        DocumentTermMatrix {
            doc_labels: documents.iter().map(|d| d.label.clone()).collect(),
            terms: vocabulary.into_iter().map(str::to_string).collect(),
            rows,
        }
    }

    pub fn n_docs(&self) -> usize {
        self.rows.len()
    }

    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn doc_labels(&self) -> &[String] {
        &self.doc_labels
    }

    pub fn row(&self, doc: usize) -> &[(usize, u32)] {
        &self.rows[doc]
    }

    /// Token count of each document.
    pub fn row_sums(&self) -> Vec<usize> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|&(_, c)| c as usize).sum())
            .collect()
    }

    /// Corpus frequency of each term.
    pub fn column_sums(&self) -> Vec<usize> {
        let mut sums = vec![0usize; self.terms.len()];
        for row in &self.rows {
            for &(t, c) in row {
                sums[t] += c as usize;
            }
        }
        sums
    }

    pub fn nnz(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn sparsity(&self) -> f64 {
        let cells = self.n_docs() * self.n_terms();
        if cells == 0 {
            return 1.0;
        }
        1.0 - self.nnz() as f64 / cells as f64
    }

    /// Expand each row into one term index per token, in term order.
    pub fn token_streams(&self) -> Vec<Vec<usize>> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .flat_map(|&(t, c)| std::iter::repeat(t).take(c as usize))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleaned(tokens: &[&[&str]]) -> Vec<CleanedDocument> {
        tokens
            .iter()
            .enumerate()
            .map(|(id, toks)| CleanedDocument {
                id,
                label: format!("doc{id}"),
                tokens: toks.iter().map(|t| t.to_string()).collect(),
            })
            .collect()
    }

    #[test]
    fn builds_lexical_vocabulary() {
        let dtm = DocumentTermMatrix::from_cleaned(&cleaned(&[&["zebra", "apple"], &["mango", "apple"]]));
        assert_eq!(dtm.terms(), &["apple", "mango", "zebra"]);
        assert_eq!(dtm.n_docs(), 2);
        assert_eq!(dtm.row(0), &[(0, 1), (2, 1)]);
        assert_eq!(dtm.row(1), &[(0, 1), (1, 1)]);
    }

    #[test]
    fn row_sums_equal_token_counts() {
        let docs = cleaned(&[&["heist", "bank", "heist", "crew"], &["alien", "ship"], &[]]);
        let dtm = DocumentTermMatrix::from_cleaned(&docs);
        let expected: Vec<usize> = docs.iter().map(|d| d.tokens.len()).collect();
        assert_eq!(dtm.row_sums(), expected);
        assert_eq!(dtm.column_sums().iter().sum::<usize>(), 6);
    }

    #[test]
    fn rows_and_streams_agree() {
        let dtm = DocumentTermMatrix::from_cleaned(&cleaned(&[&["b", "a", "b"]]));
        assert_eq!(dtm.row(0), &[(0, 1), (1, 2)]);
        assert_eq!(dtm.column_sums(), vec![1, 2]);
        assert_eq!(dtm.token_streams(), vec![vec![0, 1, 1]]);
        assert_eq!(dtm.nnz(), 2);
        assert_eq!(dtm.sparsity(), 0.0);
    }

    #[test]
    fn empty_corpus_has_no_columns() {
        let dtm = DocumentTermMatrix::from_cleaned(&cleaned(&[&[], &[]]));
        assert_eq!(dtm.n_docs(), 2);
        assert_eq!(dtm.n_terms(), 0);
        assert_eq!(dtm.sparsity(), 1.0);
    }
}
