use serde::{Deserialize, Serialize};

/// One movie plot as read from the input table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: usize,      // Row index in the input file
    pub title: String,
    pub text: String,
}

impl Document {
    pub fn new(id: usize, title: impl Into<String>, text: impl Into<String>) -> Self {
        Document {
            id,
            title: title.into(),
            text: text.into(),
        }
    }

    /// Label used for matrix rows. Titles repeat (remakes), the row index does not.
    pub fn label(&self) -> String {
        format!("{}#{}", self.title, self.id)
    }
}

/// The normalized form of a document that feeds the document-term matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedDocument {
    pub id: usize,
    pub label: String,
    pub tokens: Vec<String>,
}

/// One row of the tidy word-count table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount {
    pub document: usize,
    pub word: String,
    pub count: usize,
}
