//! Exporting the HTML slide deck to a fixed-size PDF
//!
//! The deck is served from its own directory over loopback so that web fonts load
//! the same way they would from a real site. Export waits for `document.fonts.ready`
//! before printing.

use std::path::{Path, PathBuf};
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use tracing::{info, warn};

use crate::browser::{BrowserSession, FontReport};
use crate::config::SlideOptions;
use crate::error::{Error, Result};
use crate::server::StaticServer;

/// Outcome of a slide export
#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    pub path: PathBuf,
    pub bytes: usize,
    pub fonts: FontReport,
}

/// Chrome print settings for one borderless page of `width_in` × `height_in` inches
pub fn slide_print_params(width_in: f64, height_in: f64) -> PrintToPdfParams {
    PrintToPdfParams {
        print_background: Some(true),
        paper_width: Some(width_in),
        paper_height: Some(height_in),
        margin_top: Some(0.0),
        margin_bottom: Some(0.0),
        margin_left: Some(0.0),
        margin_right: Some(0.0),
        prefer_css_page_size: Some(true),
        ..Default::default()
    }
}

/// Split an HTML path into the directory to serve and the file name within it
fn serve_target(html_path: &Path) -> Result<(PathBuf, String)> {
    let file_name = html_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| Error::General(format!("Not a file: {}", html_path.display())))?;

    let root = match html_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    Ok((root, file_name))
}

/// Render the slide deck at `options.html_path` to `options.output_path`
///
/// The browser and the file server are shut down whether or not the export succeeds.
pub async fn render_slides(options: &SlideOptions) -> Result<RenderReport> {
    if !options.html_path.is_file() {
        return Err(Error::FileNotFound(options.html_path.clone()));
    }

    let (root, file_name) = serve_target(&options.html_path)?;
    let server = StaticServer::start(&root).await?;
    let url = match server.url_for(&file_name) {
        Ok(url) => url,
        Err(e) => {
            server.shutdown().await;
            return Err(e);
        }
    };

    let result = match BrowserSession::launch(&options.browser).await {
        Ok(session) => {
            let result = export(&session, url.as_str(), options).await;
            session.close().await;
            result
        }
        Err(e) => Err(e),
    };

    server.shutdown().await;
    result
}

async fn export(session: &BrowserSession, url: &str, options: &SlideOptions) -> Result<RenderReport> {
    let page = session.new_page().await?;

    info!("Loading {}", url);
    page.goto(url).await?;

    let fonts = page.wait_for_fonts().await?;
    if fonts.status == "loaded" {
        info!("Fonts ready: {}", fonts.families.join(", "));
    } else {
        warn!("Font loading finished with status {}", fonts.status);
    }

    let pdf = page
        .print_pdf(slide_print_params(options.width_in, options.height_in))
        .await?;
    if pdf.is_empty() {
        return Err(Error::Browser("Chrome returned an empty PDF".to_string()));
    }

    if let Some(parent) = options.output_path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(&options.output_path, &pdf).await?;

    info!(
        "Wrote {} ({:.1} KB)",
        options.output_path.display(),
        pdf.len() as f64 / 1024.0
    );

    Ok(RenderReport {
        path: options.output_path.clone(),
        bytes: pdf.len(),
        fonts,
    })
}
