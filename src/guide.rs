//! The sample guide run: fill the live form, capture every page, build the PDF

use std::path::{Path, PathBuf};
use tracing::info;

use crate::automation::PageAutomation;
use crate::browser::BrowserSession;
use crate::config::{FormPlan, GuideOptions, SampleData};
use crate::error::Result;
use crate::form::{CapturedPage, FillReport, FormPopulator, PageNavigator};
use crate::pdf::{collect_screenshots, AssemblyReport, GuideAssembler, GuidePage};

/// Everything a guide run produced
#[derive(Debug, Clone)]
pub struct GuideReport {
    pub fill: FillReport,
    pub pages: Vec<CapturedPage>,
    pub assembly: AssemblyReport,
}

/// Fill and capture the form on an already loaded page
///
/// Works against any [`PageAutomation`], which is how the flow is tested without
/// a browser.
pub async fn fill_and_capture<P: PageAutomation + ?Sized>(
    page: &P,
    options: &GuideOptions,
    plan: &FormPlan,
    data: &SampleData,
) -> Result<(FillReport, Vec<CapturedPage>)> {
    let populator = FormPopulator::new(page, options.settle_delay);
    let fill = populator.run(plan, data).await?;

    let navigator = PageNavigator::new(
        page,
        options.continue_label.clone(),
        options.placeholder.clone(),
        options.settle_delay,
    );
    let pages = navigator
        .capture_all(&plan.labels(), &options.screenshots_dir)
        .await?;

    Ok((fill, pages))
}

/// Run the whole guide procedure against the live form
///
/// The browser is closed before assembly starts, on success and on failure alike.
pub async fn generate_guide(
    options: &GuideOptions,
    plan: &FormPlan,
    data: &SampleData,
) -> Result<GuideReport> {
    let session = BrowserSession::launch(&options.browser).await?;

    let captured = async {
        let page = session.new_page().await?;
        info!("Opening {}", options.form_url);
        page.open_fresh(&options.form_url).await?;
        fill_and_capture(&page, options, plan, data).await
    }
    .await;

    session.close().await;
    let (fill, pages) = captured?;

    let guide_pages: Vec<GuidePage> = pages
        .iter()
        .map(|p| GuidePage::new(p.number, p.label.clone(), p.path.clone()))
        .collect();

    let assembler = GuideAssembler::new(options.branding.clone());
    let assembly = assembler.assemble(&options.title, &guide_pages, &options.output_path)?;

    Ok(GuideReport {
        fill,
        pages,
        assembly,
    })
}

/// Rebuild the guide PDF from screenshots already on disk
pub fn assemble_from_dir(
    options: &GuideOptions,
    plan: &FormPlan,
    screenshots_dir: &Path,
    output_path: &Path,
) -> Result<AssemblyReport> {
    let images: Vec<PathBuf> = collect_screenshots(screenshots_dir)?;
    info!("Found {} screenshots in {}", images.len(), screenshots_dir.display());

    let pages = GuidePage::pair(&plan.labels(), images);
    GuideAssembler::new(options.branding.clone()).assemble(&options.title, &pages, output_path)
}
