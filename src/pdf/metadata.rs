//! Reading back finished PDFs
//!
//! Used by the `info` subcommand and by tests to check the guide and slide exports.

use std::path::Path;
use lopdf::{decode_text_string, Dictionary, Document, Object, ObjectId};
use crate::error::{Error, Result};

fn reference(obj: &Object, what: &str) -> Result<ObjectId> {
    match obj {
        Object::Reference(id) => Ok(*id),
        _ => Err(Error::General(format!("{} is not a reference", what))),
    }
}

fn pages_dictionary(doc: &Document) -> Result<&Dictionary> {
    let catalog_ref = doc.trailer.get(b"Root")
        .map_err(|_| Error::General("No Root in trailer".to_string()))?;
    let catalog = doc.get_dictionary(reference(catalog_ref, "Root")?)?;

    let pages_ref = catalog.get(b"Pages")
        .map_err(|_| Error::General("No Pages in catalog".to_string()))?;
    Ok(doc.get_dictionary(reference(pages_ref, "Pages")?)?)
}

/// Count pages by reading the Count field from the Pages dictionary
///
/// Chrome writes a flat page tree, but other producers nest it; Count covers both.
fn count_pages_from_catalog(doc: &Document) -> Result<usize> {
    let count = pages_dictionary(doc)?
        .get(b"Count")
        .map_err(|_| Error::General("No Count in Pages".to_string()))?;

    match count {
        Object::Integer(n) if *n >= 0 => Ok(*n as usize),
        _ => Err(Error::General("Count is not a page count".to_string())),
    }
}

/// Size of the first page in points, from its MediaBox or the inherited one
fn first_page_size(doc: &Document) -> Option<(f64, f64)> {
    let (_, page_id) = doc.get_pages().into_iter().next()?;
    let page = doc.get_dictionary(page_id).ok()?;

    let media_box = page
        .get(b"MediaBox")
        .ok()
        .or_else(|| pages_dictionary(doc).ok()?.get(b"MediaBox").ok())?;

    let values: Vec<f64> = media_box
        .as_array()
        .ok()?
        .iter()
        .filter_map(|v| v.as_float().ok().map(f64::from))
        .collect();

    match values.as_slice() {
        [x0, y0, x1, y1] => Some(((x1 - x0).abs(), (y1 - y0).abs())),
        _ => None,
    }
}

fn info_string(info: &Dictionary, key: &[u8]) -> Option<String> {
    info.get(key).ok().and_then(|obj| decode_text_string(obj).ok())
}

/// Base font names used across all pages, subset tags included
fn font_names(doc: &Document) -> Vec<String> {
    let mut names: Vec<String> = doc
        .get_pages()
        .into_values()
        .filter_map(|page_id| doc.get_page_fonts(page_id).ok())
        .flat_map(|fonts| fonts.into_values())
        .filter_map(|font| font.get(b"BaseFont").ok()?.as_name().ok())
        .map(|name| String::from_utf8_lossy(name).to_string())
        .collect();
    names.sort();
    names.dedup();
    names
}

/// PDF metadata
#[derive(Debug, Clone, Default)]
pub struct PdfMetadata {
    /// Number of pages in the PDF
    pub page_count: usize,
    /// First page width and height in points
    pub page_size: Option<(f64, f64)>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub creator: Option<String>,
    /// Raw `D:YYYYMMDDHHmmSS` creation date
    pub creation_date: Option<String>,
    /// Fonts referenced by page resources
    pub fonts: Vec<String>,
}

impl PdfMetadata {
    /// True when the first page is wider than it is tall
    pub fn is_landscape(&self) -> bool {
        matches!(self.page_size, Some((w, h)) if w > h)
    }
}

fn load(path: &Path) -> Result<Document> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    Ok(Document::load(path)?)
}

/// Extract metadata from a PDF file
pub fn extract_metadata(path: &Path) -> Result<PdfMetadata> {
    let doc = load(path)?;

    let page_count = count_pages_from_catalog(&doc)?;
    if page_count == 0 {
        return Err(Error::EmptyPdf(path.to_path_buf()));
    }

    let mut metadata = PdfMetadata {
        page_count,
        page_size: first_page_size(&doc),
        fonts: font_names(&doc),
        ..Default::default()
    };

    let info = doc
        .trailer
        .get(b"Info")
        .ok()
        .and_then(|obj| reference(obj, "Info").ok())
        .and_then(|id| doc.get_dictionary(id).ok());

    if let Some(info) = info {
        metadata.title = info_string(info, b"Title");
        metadata.author = info_string(info, b"Author");
        metadata.creator = info_string(info, b"Creator");
        metadata.creation_date = info_string(info, b"CreationDate");
    }

    Ok(metadata)
}

/// Count the number of pages in a PDF file
pub fn count_pages(path: &Path) -> Result<usize> {
    let doc = load(path)?;
    let page_count = count_pages_from_catalog(&doc)?;

    if page_count == 0 {
        return Err(Error::EmptyPdf(path.to_path_buf()));
    }

    Ok(page_count)
}
