//! Directory-level document preparation.
//!
//! Every file in the data directory is read as a PDF (no extension filter),
//! extracted, language-filtered, stripped of numeric tables, and chunked.
//! Table extraction is optional and produces separately-identified table
//! documents. Unreadable files are fatal: ingestion either completes for the
//! whole directory or fails startup.

use std::path::Path;

use crate::store::Document;

use super::language::is_english;
use super::pdf::{PdfExtractor, PdfTextExtractor};
use super::preprocess::preprocess_text;
use super::tables::{extract_tables, strip_numeric_tables};
use super::IngestError;

/// Prepare all documents from a directory of PDFs.
///
/// Returns text documents (normalized and chunked) and, when `read_tables`
/// is set, table documents with ids `table_0`, `table_1`, ... numbered
/// across the whole directory. Files are visited in name order so table ids
/// are stable between runs.
pub fn prepare_directory(
    dir: &Path,
    read_tables: bool,
) -> Result<(Vec<Document>, Vec<Document>), IngestError> {
    let extractor = PdfTextExtractor;
    prepare_directory_with(dir, read_tables, &extractor)
}

/// Same as [`prepare_directory`] with an injected extractor.
pub fn prepare_directory_with(
    dir: &Path,
    read_tables: bool,
    extractor: &dyn PdfExtractor,
) -> Result<(Vec<Document>, Vec<Document>), IngestError> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .map_err(|e| io_err(dir, e))?
        .collect::<Result<_, _>>()
        .map_err(|e| io_err(dir, e))?;
    entries.sort_by_key(|entry| entry.file_name());

    let mut text_documents = Vec::new();
    let mut table_documents = Vec::new();
    let mut table_index = 0;

    for entry in entries {
        let path = entry.path();
        let path_display = path.display().to_string();

        let bytes = std::fs::read(&path).map_err(|e| io_err(&path, e))?;
        let pages = extractor.extract_text(&path_display, &bytes)?;

        let mut kept_text = String::new();
        for page in &pages {
            if !is_english(&page.text) {
                tracing::warn!(
                    file = %path_display,
                    page = page.page_number,
                    "Dropping non-English page"
                );
                continue;
            }
            kept_text.push_str(&strip_numeric_tables(&page.text));
            kept_text.push('\n');
        }

        let chunks = preprocess_text(&kept_text);
        tracing::info!(
            file = %path_display,
            pages = pages.len(),
            chunks = chunks.len(),
            "Prepared document"
        );
        text_documents.extend(chunks);

        if read_tables {
            table_documents.extend(extract_tables(&pages, &mut table_index));
        }
    }

    Ok((text_documents, table_documents))
}

fn io_err(path: &Path, source: std::io::Error) -> IngestError {
    IngestError::Io {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::pdf::test_pdf::make_test_pdf;
    use crate::ingest::pdf::PageText;
    use crate::store::ContentType;

    /// Extractor that returns canned pages regardless of input bytes.
    struct FakeExtractor {
        pages: Vec<PageText>,
    }

    impl PdfExtractor for FakeExtractor {
        fn extract_text(
            &self,
            _path: &str,
            _bytes: &[u8],
        ) -> Result<Vec<PageText>, IngestError> {
            Ok(self.pages.clone())
        }

        fn page_count(&self, _path: &str, _bytes: &[u8]) -> Result<usize, IngestError> {
            Ok(self.pages.len())
        }
    }

    fn dir_with_files(files: &[(&str, &[u8])]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, bytes) in files {
            std::fs::write(dir.path().join(name), bytes).unwrap();
        }
        dir
    }

    #[test]
    fn single_pdf_of_paragraphs_yields_bounded_chunks() {
        let sentence = "Paris is the capital and most populous city of France. ";
        let body = sentence.repeat(40);
        let dir = dir_with_files(&[("doc.pdf", &make_test_pdf(&body))]);

        let (texts, tables) = prepare_directory(dir.path(), false).unwrap();

        assert!(tables.is_empty());
        assert!(!texts.is_empty());
        for doc in &texts {
            assert_eq!(doc.content_type, ContentType::Text);
            assert!(
                doc.content.split_whitespace().count() <= 100,
                "Chunk exceeds 100 words"
            );
            assert!(
                doc.content.ends_with('.'),
                "Chunk must not cross a sentence boundary"
            );
        }
    }

    #[test]
    fn unreadable_file_is_fatal() {
        let dir = dir_with_files(&[("garbage.pdf", b"definitely not a pdf".as_slice())]);
        let result = prepare_directory(dir.path(), false);
        assert!(matches!(result, Err(IngestError::PdfParsing { .. })));
    }

    #[test]
    fn missing_directory_is_fatal() {
        let result = prepare_directory(Path::new("/nonexistent/docqa-test"), false);
        assert!(matches!(result, Err(IngestError::Io { .. })));
    }

    #[test]
    fn tables_extracted_when_requested() {
        let extractor = FakeExtractor {
            pages: vec![PageText {
                page_number: 1,
                text: "Population figures are listed below.\n\
                       Country\tPopulation\tYear\n\
                       France\t67.4\t2021\n\
                       The figures come from the national census."
                    .to_string(),
            }],
        };
        let dir = dir_with_files(&[("report.pdf", b"ignored".as_slice())]);

        let (texts, tables) =
            prepare_directory_with(dir.path(), true, &extractor).unwrap();

        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].id, "table_0");
        assert!(tables[0].content.contains("France\t67.4"));
        assert!(!texts.is_empty());
    }

    #[test]
    fn non_english_pages_dropped() {
        let extractor = FakeExtractor {
            pages: vec![
                PageText {
                    page_number: 1,
                    text: "The quarterly report shows that the results were strong \
                           and that the outlook for the year remains positive."
                        .to_string(),
                },
                PageText {
                    page_number: 2,
                    text: "Le rapport trimestriel montre que les résultats étaient \
                           solides et que les perspectives pour cette année restent bonnes."
                        .to_string(),
                },
            ],
        };
        let dir = dir_with_files(&[("mixed.pdf", b"ignored".as_slice())]);

        let (texts, _) = prepare_directory_with(dir.path(), false, &extractor).unwrap();

        let combined: String = texts.iter().map(|d| d.content.as_str()).collect();
        assert!(combined.contains("quarterly report"));
        assert!(!combined.contains("trimestriel"));
    }

    #[test]
    fn preparation_is_idempotent() {
        let body = "Paris is the capital of France. Berlin is the capital of Germany.";
        let dir = dir_with_files(&[("doc.pdf", &make_test_pdf(body))]);

        let (first, _) = prepare_directory(dir.path(), false).unwrap();
        let (second, _) = prepare_directory(dir.path(), false).unwrap();

        let first_ids: Vec<&str> = first.iter().map(|d| d.id.as_str()).collect();
        let second_ids: Vec<&str> = second.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(first_ids, second_ids);
    }
}
