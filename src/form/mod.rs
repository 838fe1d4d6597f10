//! Driving the questionnaire: filling it in and stepping through its pages

pub mod populate;
pub mod navigate;

// Re-export commonly used items
pub use populate::{FormPopulator, FillReport};
pub use navigate::{
    screenshot_path, AdvanceOutcome, CapturedPage, PageNavigator, RecoveryReport,
};
