use std::fs;
use std::path::Path;

use crate::loader::{Document, DocumentLoader};
use crate::{Error, Result};

/// Plain-text loader for `.txt` files. One document per file.
pub struct TextLoader;

impl DocumentLoader for TextLoader {
    fn name(&self) -> &'static str {
        "text"
    }

    fn can_handle(&self, extension: &str) -> bool {
        extension.eq_ignore_ascii_case("txt")
    }

    fn load(&self, path: &Path) -> Result<Vec<Document>> {
        let bytes = fs::read(path).map_err(|e| Error::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        // tolerate stray non-UTF-8 bytes rather than dropping the file
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        };

        Ok(vec![Document {
            source: path.display().to_string(),
            text,
            page: None,
            kind: self.name(),
        }])
    }
}
