//! Form Guide Library
//!
//! Produces two client deliverables for the FCS website requirements questionnaire:
//! - A screenshot guide: the live form is filled with sample answers in Chrome, each
//!   of its pages is captured, and the captures are laid out in a branded landscape PDF
//! - A slide export: a local HTML slide deck is served over loopback and printed to a
//!   16:9 PDF once its web fonts have loaded
//!
//! Form interaction goes through the [`automation::PageAutomation`] trait, so the
//! fill and navigation logic can be driven without a browser.
//!
//! # Example
//!
//! ```no_run
//! use form_guide::config::{FormPlan, GuideOptions};
//! use form_guide::guide::assemble_from_dir;
//!
//! let options = GuideOptions::default();
//! let report = assemble_from_dir(
//!     &options,
//!     &FormPlan::default(),
//!     &options.screenshots_dir,
//!     &options.output_path,
//! )
//! .expect("Failed to build guide");
//! println!("{} pages", report.page_count);
//! ```

pub mod automation;
pub mod browser;
pub mod config;
pub mod error;
pub mod form;
pub mod guide;
pub mod pdf;
pub mod server;
pub mod slides;

// Re-export commonly used items
pub use error::{Error, Result};
