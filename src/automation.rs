//! Page automation capability
//!
//! The populator and navigator only talk to the loaded form through this trait, so
//! any driver that can run script in the page can back them. [`crate::browser::ChromePage`]
//! is the production implementation.
//!
//! Lookups that find nothing are not errors: they return `Ok(false)` / `Ok(None)`.
//! `Err` is reserved for a broken driver (browser gone, script threw).

use async_trait::async_trait;

use crate::error::Result;

/// A required control found on the active form page
#[derive(Debug, Clone, PartialEq)]
pub enum RequiredField {
    /// Radio group; `selected` is true when any option in the group is checked
    RadioGroup { name: String, selected: bool },
    /// Free-text input or textarea at `position` in the page's required list
    Text { position: usize, empty: bool },
    /// Any other control type (checkbox, select, ...)
    Other { position: usize, kind: String },
}

#[async_trait]
pub trait PageAutomation: Send + Sync {
    /// Set the first element named `name` and fire `input` and `change`
    async fn set_field(&self, name: &str, value: &str) -> Result<bool>;

    /// Same as [`set_field`](Self::set_field) but only matches a `<textarea>`
    async fn set_text_area(&self, name: &str, value: &str) -> Result<bool>;

    /// Set the checked state of the element with `id` and fire `change`
    async fn set_checked(&self, id: &str, checked: bool) -> Result<bool>;

    /// Checked state of the element with `id`, `None` if there is no such element
    async fn is_checked(&self, id: &str) -> Result<Option<bool>>;

    /// Check the `index`-th member of a checkbox group
    async fn set_checked_by_index(&self, name: &str, index: usize) -> Result<bool>;

    /// Select the `index`-th option of a radio group and fire `change`
    async fn select_radio(&self, name: &str, index: usize) -> Result<bool>;

    /// Call a global page function if it is defined
    async fn invoke_if_present(&self, function: &str, args: &[&str]) -> Result<bool>;

    /// Click the first rendered button whose trimmed text equals `label`
    async fn activate_visible_button(&self, label: &str) -> Result<bool>;

    /// Required controls on the currently active form page
    async fn required_fields(&self) -> Result<Vec<RequiredField>>;

    /// Fill the required control at `position` and fire `input` and `change`
    ///
    /// Returns false without writing unless that control is an empty text input
    /// or textarea.
    async fn fill_required(&self, position: usize, value: &str) -> Result<bool>;

    /// Full-page PNG of the current state
    async fn capture_screenshot(&self) -> Result<Vec<u8>>;
}
