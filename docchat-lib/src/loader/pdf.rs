use std::path::Path;

use crate::loader::{Document, DocumentLoader};
use crate::{Error, Result};

/// PDF loader. Produces one document per page that has extractable text.
pub struct PdfLoader;

impl DocumentLoader for PdfLoader {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn can_handle(&self, extension: &str) -> bool {
        extension.eq_ignore_ascii_case("pdf")
    }

    fn load(&self, path: &Path) -> Result<Vec<Document>> {
        let decode_err = |reason: String| Error::Decode {
            path: path.to_path_buf(),
            reason,
        };

        let pdf = lopdf::Document::load(path).map_err(|e| decode_err(e.to_string()))?;
        let pages = pdf.get_pages();
        let source = path.display().to_string();

        let mut documents = Vec::with_capacity(pages.len());
        let mut last_error = None;
        for &number in pages.keys() {
            match pdf.extract_text(&[number]) {
                Ok(text) if text.trim().is_empty() => {}
                Ok(text) => documents.push(Document {
                    source: source.clone(),
                    text,
                    page: Some(number),
                    kind: self.name(),
                }),
                Err(e) => {
                    tracing::debug!("No text on page {} of {}: {}", number, source, e);
                    last_error = Some(e);
                }
            }
        }

        // every page failed: treat the file as undecodable
        if documents.is_empty() {
            if let Some(e) = last_error {
                return Err(decode_err(e.to_string()));
            }
        }
        Ok(documents)
    }
}
