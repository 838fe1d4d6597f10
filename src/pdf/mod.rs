//! PDF output: the screenshot guide and reading finished documents back

pub mod assemble;
pub mod fonts;
pub mod image;
pub mod layout;
pub mod metadata;

// Re-export commonly used items
pub use assemble::{collect_screenshots, page_indicator, AssemblyReport, GuideAssembler, GuidePage};
pub use layout::{GuideLayout, PageDimensions, Rgb};
pub use metadata::{count_pages, extract_metadata, PdfMetadata};
