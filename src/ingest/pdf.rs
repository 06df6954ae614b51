use super::IngestError;

/// Text of a single extracted page.
#[derive(Debug, Clone)]
pub struct PageText {
    pub page_number: usize,
    pub text: String,
}

/// PDF text extraction abstraction
pub trait PdfExtractor {
    fn extract_text(&self, path: &str, pdf_bytes: &[u8]) -> Result<Vec<PageText>, IngestError>;

    fn page_count(&self, path: &str, pdf_bytes: &[u8]) -> Result<usize, IngestError>;
}

/// PDF text extractor using the pdf-extract crate.
/// Handles digital PDFs with embedded text layers.
pub struct PdfTextExtractor;

impl PdfExtractor for PdfTextExtractor {
    fn extract_text(&self, path: &str, pdf_bytes: &[u8]) -> Result<Vec<PageText>, IngestError> {
        let page_texts = pdf_extract::extract_text_from_mem_by_pages(pdf_bytes).map_err(|e| {
            IngestError::PdfParsing {
                path: path.to_string(),
                detail: e.to_string(),
            }
        })?;

        Ok(page_texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| PageText {
                page_number: i + 1,
                text,
            })
            .collect())
    }

    fn page_count(&self, path: &str, pdf_bytes: &[u8]) -> Result<usize, IngestError> {
        Ok(self.extract_text(path, pdf_bytes)?.len())
    }
}

#[cfg(test)]
pub(crate) mod test_pdf {
    /// Generate a valid single-page PDF containing the given text, using
    /// lopdf (the library pdf-extract uses internally).
    pub fn make_test_pdf(text: &str) -> Vec<u8> {
        use lopdf::dictionary;
        use lopdf::{Document, Object, Stream};

        let mut doc = Document::with_version("1.4");

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let content = format!("BT /F1 12 Tf 100 700 Td ({text}) Tj ET");
        let content_stream = Stream::new(dictionary! {}, content.into_bytes());
        let content_id = doc.add_object(content_stream);

        let resources = dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        };

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => resources,
        });

        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        });

        if let Ok(Object::Dictionary(ref mut dict)) = doc.get_object_mut(page_id) {
            dict.set("Parent", pages_id);
        }

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });

        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }
}
