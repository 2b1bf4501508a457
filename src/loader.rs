use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, info};

use crate::config::InputConfig;
use crate::models::Document;
use crate::{Error, Result};

/// Read the title and plot columns of a CSV file into memory.
pub fn load_documents(path: &Path, config: &InputConfig) -> Result<Vec<Document>> {
    info!(path = %path.display(), "Loading documents");
    let file = std::fs::File::open(path)?;
    read_documents(file, config)
}

pub fn read_documents<R: std::io::Read>(reader: R, config: &InputConfig) -> Result<Vec<Document>> {
    if !config.delimiter.is_ascii() {
        return Err(Error::Config(format!(
            "delimiter {:?} is not a single-byte character",
            config.delimiter
        )));
    }
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(config.delimiter as u8)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    };
    let title_idx = column(&config.title_column)?;
    let text_idx = column(&config.text_column)?;

    let mut documents = Vec::new();
    for (id, record) in rdr.records().enumerate() {
        if config.max_documents.is_some_and(|max| id >= max) {
            debug!(max = id, "Document cap reached");
            break;
        }
        let record = record?;
        let title = record.get(title_idx).unwrap_or("");
        let text = record.get(text_idx).unwrap_or("");
        documents.push(Document::new(id, title, text));
    }

    info!(documents = documents.len(), "Loaded documents");
    Ok(documents)
}
