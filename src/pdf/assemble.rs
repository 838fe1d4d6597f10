//! Building the sample guide PDF from page screenshots using lopdf
//!
//! The document is a decorative title page followed by one landscape page per
//! screenshot. Each content page carries a header bar with the page label and a
//! right-aligned "Page N of TOTAL", the screenshot fitted below it, and a small
//! centered footer caption.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use chrono::Local;
use lopdf::{text_string, Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, info, warn};

use crate::config::{Branding, TitleSpec};
use crate::error::{Error, Result};
use crate::pdf::fonts::{add_helvetica, pdf_literal, text_width, ASCENT, FONT_RESOURCE};
use crate::pdf::image::{embed_png, EmbeddedImage};
use crate::pdf::layout::{fit_centered, GuideLayout, Rect, Rgb};

/// pdfkit-compatible line height for Helvetica, as a multiple of the font size
const LINE_HEIGHT: f64 = 1.156;

const SUBTLE_BLUE: Rgb = Rgb::from_hex(0xaabbcc);
const SLATE: Rgb = Rgb::from_hex(0x667788);
const FOOTER_GREY: Rgb = Rgb::from_hex(0x999999);

/// One content page: its form page number, label and screenshot
#[derive(Debug, Clone, PartialEq)]
pub struct GuidePage {
    /// 1-based form page number, shown in the "Page N of TOTAL" indicator
    pub number: usize,
    pub label: String,
    pub image: PathBuf,
}

impl GuidePage {
    pub fn new(number: usize, label: impl Into<String>, image: impl Into<PathBuf>) -> Self {
        Self {
            number,
            label: label.into(),
            image: image.into(),
        }
    }

    /// Pair labels with screenshots by the page number in each file name
    ///
    /// `page-03.png` gets `labels[2]`, whatever its position in `images`. Names without a
    /// page number fall back to their position; numbers beyond the last label are
    /// labelled by the number alone.
    pub fn pair(labels: &[&str], images: Vec<PathBuf>) -> Vec<GuidePage> {
        images
            .into_iter()
            .enumerate()
            .map(|(i, image)| {
                let number = page_number_from_name(&image).unwrap_or(i + 1);
                let label = labels
                    .get(number - 1)
                    .map(|l| l.to_string())
                    .unwrap_or_else(|| format!("{:02}", number));
                GuidePage::new(number, label, image)
            })
            .collect()
    }
}

/// Page number encoded in a `page-NN.png` file name
pub fn page_number_from_name(path: &Path) -> Option<usize> {
    path.file_stem()?
        .to_str()?
        .strip_prefix("page-")?
        .parse()
        .ok()
        .filter(|&n| n > 0)
}

/// Outcome of writing a guide
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyReport {
    pub path: PathBuf,
    /// Title page included
    pub page_count: usize,
    /// Size on disk after the final flush
    pub bytes: u64,
}

/// Find `page-*.png` screenshots in `dir`, in page order
pub fn collect_screenshots(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(Error::FileNotFound(dir.to_path_buf()));
    }

    let pattern = Path::new(&glob::Pattern::escape(&dir.to_string_lossy())).join("page-*.png");
    let mut paths: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Skipping unreadable screenshot: {}", e);
                None
            }
        })
        .collect();

    if paths.is_empty() {
        return Err(Error::NoScreenshots(dir.to_path_buf()));
    }

    paths.sort_by_key(|p| (page_number_from_name(p).unwrap_or(usize::MAX), p.clone()));
    Ok(paths)
}

/// Accumulates content stream operators for one page
///
/// Positions are given top-down like the layout; conversion to PDF's bottom-up
/// space happens here.
struct PageContent {
    ops: String,
    page_width: f64,
    page_height: f64,
}

impl PageContent {
    fn new(layout: &GuideLayout) -> Self {
        Self {
            ops: String::new(),
            page_width: layout.page.width_pt(),
            page_height: layout.page.height_pt(),
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.ops.push_str(&format!(
            "q\n{} rg\n{:.2} {:.2} {:.2} {:.2} re\nf\nQ\n",
            color.pdf_operands(),
            rect.x,
            rect.pdf_bottom(self.page_height),
            rect.width,
            rect.height
        ));
    }

    /// Draw `text` with its top edge at `top`
    fn text(&mut self, x: f64, top: f64, text: &str, size: f64, color: Rgb) {
        let baseline = self.page_height - top - ASCENT / 1000.0 * size;
        self.ops.push_str("BT\n");
        self.ops.push_str(&format!("{} rg\n", color.pdf_operands()));
        self.ops.push_str(&format!("/{} {} Tf\n", FONT_RESOURCE, size));
        self.ops.push_str(&format!("1 0 0 1 {:.2} {:.2} Tm\n", x, baseline));
        self.ops.push_str(&format!("{} Tj\n", pdf_literal(text)));
        self.ops.push_str("ET\n");
    }

    fn text_centered(&mut self, top: f64, text: &str, size: f64, color: Rgb) {
        let x = (self.page_width - text_width(text, size)) / 2.0;
        self.text(x, top, text, size, color);
    }

    fn text_right(&mut self, right: f64, top: f64, text: &str, size: f64, color: Rgb) {
        let x = right - text_width(text, size);
        self.text(x, top, text, size, color);
    }

    fn image(&mut self, name: &str, rect: Rect) {
        self.ops.push_str(&format!(
            "q\n{:.2} 0 0 {:.2} {:.2} {:.2} cm\n/{} Do\nQ\n",
            rect.width,
            rect.height,
            rect.x,
            rect.pdf_bottom(self.page_height),
            name
        ));
    }

    fn into_bytes(self) -> Vec<u8> {
        self.ops.into_bytes()
    }
}

/// Writes branded guide PDFs
#[derive(Debug, Clone)]
pub struct GuideAssembler {
    layout: GuideLayout,
    branding: Branding,
}

impl GuideAssembler {
    pub fn new(branding: Branding) -> Self {
        Self {
            layout: GuideLayout::default(),
            branding,
        }
    }

    /// Build and write the guide, returning once the file is flushed to disk
    pub fn assemble(
        &self,
        title: &TitleSpec,
        pages: &[GuidePage],
        output_path: &Path,
    ) -> Result<AssemblyReport> {
        let mut doc = self.build(title, pages)?;
        let page_count = pages.len() + 1;

        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(output_path)?;
        let mut writer = BufWriter::new(file);
        doc.save_to(&mut writer)?;
        writer.flush()?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        let bytes = file.metadata()?.len();

        info!(
            "Wrote {} ({} pages, {:.2} MB)",
            output_path.display(),
            page_count,
            bytes as f64 / 1024.0 / 1024.0
        );

        Ok(AssemblyReport {
            path: output_path.to_path_buf(),
            page_count,
            bytes,
        })
    }

    /// Build the guide in memory
    pub fn build(&self, title: &TitleSpec, pages: &[GuidePage]) -> Result<Document> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font = add_helvetica(&mut doc);

        let mut kids = Vec::with_capacity(pages.len() + 1);

        let content = self.title_page(title);
        kids.push(self.add_page(&mut doc, pages_id, content, font, None));

        // A gap in the captured pages still counts towards the total
        let total = pages
            .iter()
            .map(|p| p.number)
            .max()
            .unwrap_or(0)
            .max(pages.len());
        for page in pages {
            let image = if page.image.exists() {
                Some(embed_png(&mut doc, &page.image)?)
            } else {
                warn!("Screenshot missing, page left blank: {}", page.image.display());
                None
            };

            let content = self.content_page(page.number, total, &page.label, image.as_ref());
            kids.push(self.add_page(&mut doc, pages_id, content, font, image));
            debug!("Added page {} of {}: {}", page.number, total, page.label);
        }

        let mut pages_dict = Dictionary::new();
        pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
        pages_dict.set("Count", Object::Integer(kids.len() as i64));
        pages_dict.set(
            "Kids",
            Object::Array(kids.into_iter().map(Object::Reference).collect()),
        );
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        let catalog_id = doc.add_object(Object::Dictionary(catalog));
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let info_id = doc.add_object(Object::Dictionary(self.info(title)));
        doc.trailer.set("Info", Object::Reference(info_id));

        doc.compress();
        Ok(doc)
    }

    fn info(&self, title: &TitleSpec) -> Dictionary {
        let mut info = Dictionary::new();
        info.set("Title", text_string(&title.document_title()));
        info.set("Author", text_string(&self.branding.author));
        info.set(
            "Creator",
            text_string(&format!("form-guide {}", env!("CARGO_PKG_VERSION"))),
        );
        info.set(
            "CreationDate",
            text_string(&Local::now().format("D:%Y%m%d%H%M%S").to_string()),
        );
        info
    }

    fn add_page(
        &self,
        doc: &mut Document,
        pages_id: ObjectId,
        content: PageContent,
        font: ObjectId,
        image: Option<EmbeddedImage>,
    ) -> ObjectId {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let mut font_dict = Dictionary::new();
        font_dict.set(FONT_RESOURCE, Object::Reference(font));

        let mut resources = Dictionary::new();
        resources.set("Font", Object::Dictionary(font_dict));
        if let Some(image) = image {
            let mut xobjects = Dictionary::new();
            xobjects.set("Shot", Object::Reference(image.id));
            resources.set("XObject", Object::Dictionary(xobjects));
        }

        let mut page = Dictionary::new();
        page.set("Type", Object::Name(b"Page".to_vec()));
        page.set("Parent", Object::Reference(pages_id));
        page.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(self.layout.page.width_pt() as f32),
                Object::Real(self.layout.page.height_pt() as f32),
            ]),
        );
        page.set("Resources", Object::Dictionary(resources));
        page.set("Contents", Object::Reference(content_id));

        doc.add_object(Object::Dictionary(page))
    }

    fn title_page(&self, title: &TitleSpec) -> PageContent {
        let mut c = PageContent::new(&self.layout);
        let width = self.layout.page.width_pt();
        let height = self.layout.page.height_pt();
        let primary = self.branding.primary;
        let accent = self.branding.accent;

        c.fill_rect(Rect::new(0.0, 0.0, width, height), primary);

        let mut y = 180.0;
        c.text_centered(y, &title.heading, 28.0, Rgb::WHITE);
        y += 40.0;
        c.text_centered(y, &title.heading_accent, 28.0, accent);
        y += 3.0 * 28.0 * LINE_HEIGHT;

        c.text_centered(y, &title.subheading, 16.0, Rgb::WHITE);
        y += 2.0 * 16.0 * LINE_HEIGHT;

        for line in &title.blurb {
            c.text_centered(y, line, 11.0, SUBTLE_BLUE);
            y += 11.0 * LINE_HEIGHT;
        }
        y += 3.0 * 11.0 * LINE_HEIGHT;

        for line in &title.attribution {
            c.text_centered(y, line, 10.0, SLATE);
            y += 10.0 * LINE_HEIGHT;
        }

        c
    }

    fn content_page(
        &self,
        number: usize,
        total: usize,
        label: &str,
        image: Option<&EmbeddedImage>,
    ) -> PageContent {
        let mut c = PageContent::new(&self.layout);
        let layout = &self.layout;
        let width = layout.page.width_pt();
        let height = layout.page.height_pt();

        c.fill_rect(Rect::new(0.0, 0.0, width, layout.header_height), self.branding.primary);
        c.text(
            layout.side_margin,
            14.0,
            &format!("{} \u{2014} {}", self.branding.header_prefix, label),
            12.0,
            Rgb::WHITE,
        );
        c.text_right(
            width - layout.side_margin,
            16.0,
            &page_indicator(number, total),
            9.0,
            self.branding.accent,
        );

        if let Some(image) = image {
            let placed = fit_centered(image.width as f64, image.height as f64, layout.image_area);
            c.image("Shot", placed);
        }

        let caption_top = height - layout.footer_baseline - ASCENT / 1000.0 * 7.0;
        c.text_centered(caption_top, &self.branding.footer_caption, 7.0, FOOTER_GREY);

        c
    }
}

/// Header indicator text for a 1-based content page
pub fn page_indicator(number: usize, total: usize) -> String {
    format!("Page {} of {}", number, total)
}
