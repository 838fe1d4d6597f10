//! Stepping through the form pages and capturing each one
//!
//! Each page is captured before the navigator tries to leave it. When the advance
//! button cannot be activated the page is assumed to be blocked by validation; the
//! navigator fills the required controls it knows how to satisfy and tries once more.
//! A page that stays blocked is logged and the run carries on, so later pages still
//! get captured.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::automation::{PageAutomation, RequiredField};
use crate::error::{Error, Result};

/// How leaving a page went
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Advance button clicked on the first try
    Advanced,
    /// Clicked after filling required fields
    Recovered,
    /// Still no clickable advance button after recovery
    Blocked,
    /// Last page; no advance attempted
    Terminal,
}

/// A captured form page
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedPage {
    /// 1-based page number
    pub number: usize,
    pub label: String,
    pub path: PathBuf,
    pub bytes: usize,
    pub outcome: AdvanceOutcome,
}

/// What the recovery pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveryReport {
    pub radios_selected: usize,
    pub texts_filled: usize,
    /// Required controls of a type the recovery does not handle
    pub unsupported: usize,
}

/// Screenshot file for a 1-based page number, e.g. `page-03.png`
pub fn screenshot_path(dir: &Path, number: usize) -> PathBuf {
    dir.join(format!("page-{:02}.png", number))
}

/// Walks the form page by page
pub struct PageNavigator<'a, P: PageAutomation + ?Sized> {
    page: &'a P,
    continue_label: String,
    placeholder: String,
    settle_delay: Duration,
}

impl<'a, P: PageAutomation + ?Sized> PageNavigator<'a, P> {
    pub fn new(
        page: &'a P,
        continue_label: impl Into<String>,
        placeholder: impl Into<String>,
        settle_delay: Duration,
    ) -> Self {
        Self {
            page,
            continue_label: continue_label.into(),
            placeholder: placeholder.into(),
            settle_delay,
        }
    }

    /// Capture every labelled page into `out_dir`, advancing between them
    pub async fn capture_all(&self, labels: &[&str], out_dir: &Path) -> Result<Vec<CapturedPage>> {
        tokio::fs::create_dir_all(out_dir).await?;

        let total = labels.len();
        let mut captured = Vec::with_capacity(total);

        for (i, label) in labels.iter().enumerate() {
            let number = i + 1;
            info!("Capturing page {}: {}", number, label);

            let path = screenshot_path(out_dir, number);
            let bytes = self.capture(&path).await?;

            let outcome = if number < total {
                self.advance(number).await?
            } else {
                AdvanceOutcome::Terminal
            };

            captured.push(CapturedPage {
                number,
                label: label.to_string(),
                path,
                bytes,
                outcome,
            });
        }

        Ok(captured)
    }

    async fn capture(&self, path: &Path) -> Result<usize> {
        let png = self.page.capture_screenshot().await?;
        if png.is_empty() {
            return Err(Error::Browser(format!(
                "Empty screenshot for {}",
                path.display()
            )));
        }
        tokio::fs::write(path, &png).await?;
        Ok(png.len())
    }

    /// Try to leave page `number`, recovering once from a validation block
    pub async fn advance(&self, number: usize) -> Result<AdvanceOutcome> {
        let outcome = if self.page.activate_visible_button(&self.continue_label).await? {
            AdvanceOutcome::Advanced
        } else {
            warn!("Navigation blocked on page {}, fixing required fields", number);
            let recovery = self.recover_required_fields().await?;
            info!(
                "Recovery on page {}: {} radio groups, {} text fields",
                number, recovery.radios_selected, recovery.texts_filled
            );

            if self.page.activate_visible_button(&self.continue_label).await? {
                AdvanceOutcome::Recovered
            } else {
                warn!("Page {} is still blocked, continuing anyway", number);
                AdvanceOutcome::Blocked
            }
        };

        tokio::time::sleep(self.settle_delay).await;
        Ok(outcome)
    }

    /// Satisfy required radio groups and empty text fields on the active page
    ///
    /// Unselected radio groups get their first option. Selecting a radio can reveal
    /// or hide other required controls, so text positions are read from a second
    /// scan taken after the radios are set. Empty text controls get the
    /// placeholder. Other required control types are left alone.
    pub async fn recover_required_fields(&self) -> Result<RecoveryReport> {
        let mut report = RecoveryReport::default();
        let mut groups_done: HashSet<String> = HashSet::new();

        for field in self.page.required_fields().await? {
            match field {
                RequiredField::RadioGroup { name, selected } => {
                    if selected || !groups_done.insert(name.clone()) {
                        continue;
                    }
                    if self.page.select_radio(&name, 0).await? {
                        report.radios_selected += 1;
                    }
                }
                RequiredField::Text { .. } => {}
                RequiredField::Other { position, kind } => {
                    warn!("Required {} at position {} not handled", kind, position);
                    report.unsupported += 1;
                }
            }
        }

        for field in self.page.required_fields().await? {
            if let RequiredField::Text { position, empty: true } = field {
                if self.page.fill_required(position, &self.placeholder).await? {
                    report.texts_filled += 1;
                }
            }
        }

        Ok(report)
    }
}
