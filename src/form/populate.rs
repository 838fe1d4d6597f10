//! Filling the form from the sample dataset
//!
//! Fields that are not on the loaded revision of the form are skipped and reported,
//! never treated as failures. Every write sets an absolute value, so running the
//! populator or its verification pass again leaves the page unchanged.

use std::time::Duration;
use tracing::{debug, info};

use crate::automation::PageAutomation;
use crate::config::{FieldAction, FormPlan, SampleData};
use crate::error::Result;

/// What a populate run managed to set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillReport {
    /// Number of successful writes
    pub applied: usize,
    /// Field names or ids that were not found (or had no sample value)
    pub missing: Vec<String>,
    /// Reveal toggles found unchecked during verification and re-applied
    pub retoggled: usize,
}

impl FillReport {
    fn record(&mut self, found: bool, what: &str) {
        if found {
            self.applied += 1;
        } else {
            debug!("Not on page: {}", what);
            self.missing.push(what.to_string());
        }
    }
}

/// Writes a [`FormPlan`] into a loaded page
pub struct FormPopulator<'a, P: PageAutomation + ?Sized> {
    page: &'a P,
    settle_delay: Duration,
}

impl<'a, P: PageAutomation + ?Sized> FormPopulator<'a, P> {
    pub fn new(page: &'a P, settle_delay: Duration) -> Self {
        Self { page, settle_delay }
    }

    /// Fill every page, wait for deferred reveals, then verify them
    pub async fn run(&self, plan: &FormPlan, data: &SampleData) -> Result<FillReport> {
        let mut report = self.populate(plan, data).await?;

        tokio::time::sleep(self.settle_delay).await;

        report.retoggled = self.verify_reveals(plan, data).await?;

        info!(
            "Filled {} fields ({} not present, {} reveals re-applied)",
            report.applied,
            report.missing.len(),
            report.retoggled
        );
        Ok(report)
    }

    /// Apply every action of every page once
    pub async fn populate(&self, plan: &FormPlan, data: &SampleData) -> Result<FillReport> {
        let mut report = FillReport::default();

        for page in &plan.pages {
            debug!("Filling {}", page.label);
            for action in &page.actions {
                self.apply(action, data, &mut report).await?;
            }
        }

        Ok(report)
    }

    async fn apply(
        &self,
        action: &FieldAction,
        data: &SampleData,
        report: &mut FillReport,
    ) -> Result<()> {
        match action {
            FieldAction::Text { name } => match data.get(name) {
                Some(value) => {
                    let found = self.page.set_field(name, value).await?;
                    report.record(found, name);
                }
                None => report.record(false, name),
            },
            FieldAction::TextArea { name } => match data.get(name) {
                Some(value) => {
                    let found = self.page.set_text_area(name, value).await?;
                    report.record(found, name);
                }
                None => report.record(false, name),
            },
            FieldAction::Check { id } => {
                let found = self.page.set_checked(id, true).await?;
                report.record(found, id);
            }
            FieldAction::CheckGroup { name, indices } => {
                for &index in indices {
                    let found = self.page.set_checked_by_index(name, index).await?;
                    report.record(found, &format!("{}[{}]", name, index));
                }
            }
            FieldAction::Radio { name, index } => {
                let found = self.page.select_radio(name, *index).await?;
                report.record(found, &format!("{}[{}]", name, index));
            }
            FieldAction::Reveal {
                toggle_id,
                function,
                target,
                fields,
            } => {
                let found = self.page.set_checked(toggle_id, true).await?;
                report.record(found, toggle_id);
                if found {
                    self.reveal(function, toggle_id, target).await?;
                }
                self.fill_revealed(fields, data, report).await?;
            }
        }
        Ok(())
    }

    /// Second pass over conditional fields once page timers have fired
    ///
    /// Returns how many toggles had to be checked again.
    pub async fn verify_reveals(&self, plan: &FormPlan, data: &SampleData) -> Result<usize> {
        let mut retoggled = 0;
        // Only the count matters here; first-pass misses are already reported
        let mut scratch = FillReport::default();

        for action in plan.reveals() {
            let FieldAction::Reveal {
                toggle_id,
                function,
                target,
                fields,
            } = action
            else {
                continue;
            };

            if self.page.is_checked(toggle_id).await? == Some(false) {
                debug!("Toggle {} lost its state, re-applying", toggle_id);
                self.page.set_checked(toggle_id, true).await?;
                self.reveal(function, toggle_id, target).await?;
                retoggled += 1;
            }

            self.fill_revealed(fields, data, &mut scratch).await?;
        }

        Ok(retoggled)
    }

    async fn reveal(&self, function: &str, toggle_id: &str, target: &str) -> Result<()> {
        if !self.page.invoke_if_present(function, &[toggle_id, target]).await? {
            debug!("{} is not defined on this page", function);
        }
        Ok(())
    }

    async fn fill_revealed(
        &self,
        fields: &[String],
        data: &SampleData,
        report: &mut FillReport,
    ) -> Result<()> {
        for field in fields {
            match data.get(field) {
                Some(value) => {
                    let found = self.page.set_field(field, value).await?;
                    report.record(found, field);
                }
                None => report.record(false, field),
            }
        }
        Ok(())
    }
}
