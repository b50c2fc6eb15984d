use std::io::{Cursor, Write};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;

/// Longest sanitized-title prefix used in entry filenames.
const MAX_TITLE_LEN: usize = 50;

/// In-memory ZIP of rewritten articles, one text entry per article.
/// Exclusively owned by a single run and consumed by `finish`.
pub struct ArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    entries: usize,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        ArchiveBuilder {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            entries: 0,
        }
    }

    /// Appends one rewritten article. `index` is the 1-based position of
    /// the source URL in the submitted list, which keeps filenames unique
    /// even when two titles sanitize to the same string.
    pub fn add_article(&mut self, title: &str, url: &str, index: usize, body: &str) -> Result<()> {
        let filename = format!("{}_{}.txt", sanitize_title(title), index);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        self.writer.start_file(filename, options)?;
        write!(self.writer, "// {} //\nSource: {}\n\n{}", title, url, body)?;
        self.entries += 1;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Closes the archive and returns the compressed bytes.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let cursor = self.writer.finish()?;
        Ok(cursor.into_inner())
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        ArchiveBuilder::new()
    }
}

/// Maps every non-alphanumeric character to `_` and caps the length.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .take(MAX_TITLE_LEN)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    fn read_entry(bytes: Vec<u8>, name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut entry = archive.by_name(name).unwrap();
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn sanitizes_titles_to_filename_safe_strings() {
        assert_eq!(sanitize_title("Title One"), "Title_One");
        assert_eq!(sanitize_title("Crema di Limoncello!"), "Crema_di_Limoncello_");
        assert_eq!(sanitize_title("?!?"), "___");
        assert_eq!(sanitize_title(&"x".repeat(80)).len(), MAX_TITLE_LEN);
    }

    #[test]
    fn writes_entry_with_header_and_body() {
        let mut builder = ArchiveBuilder::new();
        builder
            .add_article("Title One", "http://a.test/1", 1, "Rewritten content")
            .unwrap();
        assert_eq!(builder.len(), 1);

        let content = read_entry(builder.finish().unwrap(), "Title_One_1.txt");
        assert_eq!(content, "// Title One //\nSource: http://a.test/1\n\nRewritten content");
    }

    #[test]
    fn symbol_only_titles_stay_unique_via_index() {
        let mut builder = ArchiveBuilder::new();
        builder.add_article("???", "http://a.test/1", 1, "first").unwrap();
        builder.add_article("???", "http://a.test/2", 2, "second").unwrap();

        let bytes = builder.finish().unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(names, vec!["____1.txt", "____2.txt"]);
    }

    #[test]
    fn empty_builder_reports_empty() {
        let builder = ArchiveBuilder::new();
        assert!(builder.is_empty());
        assert_eq!(builder.len(), 0);
    }
}
