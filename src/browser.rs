//! Chrome-backed page automation using chromiumoxide
//!
//! [`BrowserSession`] owns the Chrome process and its CDP handler task. Callers must
//! `close()` it on every exit path; see [`crate::guide`] and [`crate::slides`].

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::{CaptureScreenshotFormat, PrintToPdfParams};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures::StreamExt;
use serde_json::Value;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::automation::{PageAutomation, RequiredField};
use crate::config::BrowserOptions;
use crate::error::{Error, Result};

const SET_VALUE: &str = r#"function (selector, value) {
    const el = document.querySelector(selector);
    if (!el) return false;
    el.value = value;
    el.dispatchEvent(new Event('input', { bubbles: true }));
    el.dispatchEvent(new Event('change', { bubbles: true }));
    return true;
}"#;

const SET_CHECKED: &str = r#"function (id, checked) {
    const el = document.getElementById(id);
    if (!el) return false;
    el.checked = checked;
    el.dispatchEvent(new Event('change', { bubbles: true }));
    return true;
}"#;

// -1 when missing; a null result would come back without a value
const IS_CHECKED: &str = r#"function (id) {
    const el = document.getElementById(id);
    if (!el) return -1;
    return el.checked ? 1 : 0;
}"#;

const CHECK_NTH: &str = r#"function (selector, index) {
    const el = document.querySelectorAll(selector)[index];
    if (!el) return false;
    el.checked = true;
    return true;
}"#;

const SELECT_NTH: &str = r#"function (selector, index) {
    const el = document.querySelectorAll(selector)[index];
    if (!el) return false;
    el.checked = true;
    el.dispatchEvent(new Event('change', { bubbles: true }));
    return true;
}"#;

// Indirect eval also resolves top-level `let`/`const` bindings, which are not on window
const INVOKE_IF_PRESENT: &str = r#"function (name, args) {
    let fn = window[name];
    if (typeof fn !== 'function') {
        try { fn = (0, eval)(name); } catch (e) { fn = undefined; }
    }
    if (typeof fn !== 'function') return false;
    fn.apply(window, args);
    return true;
}"#;

const ACTIVATE_BUTTON: &str = r#"function (label) {
    const btn = Array.from(document.querySelectorAll('button'))
        .find(b => b.textContent.trim() === label && b.offsetParent !== null);
    if (!btn) return false;
    btn.click();
    return true;
}"#;

const REQUIRED_FIELDS: &str = r#"function () {
    const active = document.querySelector('.page.active');
    if (!active) return [];
    const textTypes = ['', 'text', 'email', 'tel', 'url', 'search', 'password'];
    return Array.from(active.querySelectorAll('[required]')).map((el, position) => {
        const tag = el.tagName.toLowerCase();
        const type = (el.getAttribute('type') || '').toLowerCase();
        if (tag === 'input' && type === 'radio') {
            const checked = document.querySelector(
                `input[type="radio"][name="${CSS.escape(el.name)}"]:checked`);
            return { kind: 'radio', name: el.name, selected: !!checked, position };
        }
        if (tag === 'textarea' || (tag === 'input' && textTypes.includes(type))) {
            return { kind: 'text', position, empty: !el.value };
        }
        return { kind: 'other', position, type: tag === 'input' ? type : tag };
    });
}"#;

// Positions come from an earlier scan, so the target is re-checked before writing
const FILL_REQUIRED: &str = r#"function (position, value) {
    const active = document.querySelector('.page.active');
    if (!active) return false;
    const el = active.querySelectorAll('[required]')[position];
    if (!el) return false;
    const tag = el.tagName.toLowerCase();
    const type = (el.getAttribute('type') || '').toLowerCase();
    const textTypes = ['', 'text', 'email', 'tel', 'url', 'search', 'password'];
    if (!(tag === 'textarea' || (tag === 'input' && textTypes.includes(type)))) return false;
    if (el.value) return false;
    el.value = value;
    el.dispatchEvent(new Event('input', { bubbles: true }));
    el.dispatchEvent(new Event('change', { bubbles: true }));
    return true;
}"#;

const FONTS_READY: &str = r#"document.fonts.ready.then(fonts => ({
    status: fonts.status,
    families: Array.from(fonts).filter(f => f.status === 'loaded').map(f => f.family)
}))"#;

/// Build an invocation of a script function with JSON-encoded arguments
fn call(function: &str, args: &[Value]) -> String {
    let args: Vec<String> = args.iter().map(Value::to_string).collect();
    format!("({})({})", function, args.join(", "))
}

/// Attribute selector for elements named `name`, optionally restricted to `tag`
pub fn name_selector(tag: Option<&str>, name: &str) -> String {
    let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
    format!("{}[name=\"{}\"]", tag.unwrap_or(""), escaped)
}

/// Convert the script's required-field records into [`RequiredField`]s
fn parse_required_fields(values: Vec<Value>) -> Vec<RequiredField> {
    values
        .into_iter()
        .filter_map(|v| {
            let position = v.get("position")?.as_u64()? as usize;
            let field = match v.get("kind")?.as_str()? {
                "radio" => RequiredField::RadioGroup {
                    name: v.get("name")?.as_str()?.to_string(),
                    selected: v.get("selected").and_then(Value::as_bool).unwrap_or(false),
                },
                "text" => RequiredField::Text {
                    position,
                    empty: v.get("empty").and_then(Value::as_bool).unwrap_or(true),
                },
                _ => RequiredField::Other {
                    position,
                    kind: v
                        .get("type")
                        .and_then(Value::as_str)
                        .unwrap_or("unknown")
                        .to_string(),
                },
            };
            Some(field)
        })
        .collect()
}

/// Font loading state reported by `document.fonts.ready`
#[derive(Debug, Clone, PartialEq)]
pub struct FontReport {
    pub status: String,
    /// Families with at least one loaded face
    pub families: Vec<String>,
}

/// A running Chrome instance
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    navigation_timeout: Duration,
}

impl BrowserSession {
    /// Launch Chrome with the configured viewport
    pub async fn launch(options: &BrowserOptions) -> Result<Self> {
        let viewport = Viewport {
            width: options.viewport.width,
            height: options.viewport.height,
            device_scale_factor: Some(options.viewport.device_scale_factor),
            emulating_mobile: false,
            is_landscape: false,
            has_touch: false,
        };

        let mut builder = BrowserConfig::builder()
            .viewport(viewport)
            .window_size(options.viewport.width, options.viewport.height)
            .no_sandbox()
            .arg("--disable-setuid-sandbox")
            .request_timeout(options.navigation_timeout);

        if options.headed {
            builder = builder.with_head();
        }

        let config = builder.build().map_err(Error::Browser)?;

        info!("Launching browser");
        let (browser, mut handler) = Browser::launch(config).await?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler stopped: {}", e);
                    break;
                }
            }
        });

        Ok(Self {
            browser,
            handler,
            navigation_timeout: options.navigation_timeout,
        })
    }

    /// Open a blank tab
    pub async fn new_page(&self) -> Result<ChromePage> {
        let page = self.browser.new_page("about:blank").await?;
        Ok(ChromePage {
            page,
            navigation_timeout: self.navigation_timeout,
        })
    }

    /// Shut Chrome down and stop the handler task
    ///
    /// Failures while closing are logged rather than returned so that the caller's
    /// own result is what gets reported.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser cleanly: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            warn!("Failed to wait for browser exit: {}", e);
        }
        self.handler.abort();
        debug!("Browser closed");
    }
}

/// One tab, driven through page script
pub struct ChromePage {
    page: Page,
    navigation_timeout: Duration,
}

impl ChromePage {
    /// Navigate and wait for the load to finish
    pub async fn goto(&self, url: &str) -> Result<()> {
        tokio::time::timeout(self.navigation_timeout, self.page.goto(url))
            .await
            .map_err(|_| {
                Error::Browser(format!(
                    "Timed out after {:?} loading {}",
                    self.navigation_timeout, url
                ))
            })??;
        Ok(())
    }

    /// Load `url`, clear its local storage, and load it again
    pub async fn open_fresh(&self, url: &str) -> Result<()> {
        self.goto(url).await?;
        let _: Value = self.eval("(function () { localStorage.clear(); return true; })()").await?;
        self.goto(url).await
    }

    /// Wait until every font the document references has settled
    pub async fn wait_for_fonts(&self) -> Result<FontReport> {
        let value: Value = self.eval(FONTS_READY).await?;
        let status = value
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        let mut families: Vec<String> = value
            .get("families")
            .and_then(Value::as_array)
            .map(|a| {
                a.iter()
                    .filter_map(Value::as_str)
                    .map(|s| s.trim_matches('"').to_string())
                    .collect()
            })
            .unwrap_or_default();
        families.sort();
        families.dedup();
        Ok(FontReport { status, families })
    }

    /// Render the page to PDF bytes
    pub async fn print_pdf(&self, params: PrintToPdfParams) -> Result<Vec<u8>> {
        Ok(self.page.pdf(params).await?)
    }

    async fn eval<T: serde::de::DeserializeOwned>(&self, script: impl Into<String>) -> Result<T> {
        let params = EvaluateParams::builder()
            .expression(script.into())
            .return_by_value(true)
            .await_promise(true)
            .build()
            .map_err(Error::Script)?;

        let result = self.page.evaluate_expression(params).await?;
        result
            .into_value::<T>()
            .map_err(|e| Error::Script(e.to_string()))
    }
}

#[async_trait]
impl PageAutomation for ChromePage {
    async fn set_field(&self, name: &str, value: &str) -> Result<bool> {
        let selector = name_selector(None, name);
        self.eval(call(SET_VALUE, &[selector.into(), value.into()])).await
    }

    async fn set_text_area(&self, name: &str, value: &str) -> Result<bool> {
        let selector = name_selector(Some("textarea"), name);
        self.eval(call(SET_VALUE, &[selector.into(), value.into()])).await
    }

    async fn set_checked(&self, id: &str, checked: bool) -> Result<bool> {
        self.eval(call(SET_CHECKED, &[id.into(), checked.into()])).await
    }

    async fn is_checked(&self, id: &str) -> Result<Option<bool>> {
        let state: i64 = self.eval(call(IS_CHECKED, &[id.into()])).await?;
        Ok(match state {
            -1 => None,
            s => Some(s == 1),
        })
    }

    async fn set_checked_by_index(&self, name: &str, index: usize) -> Result<bool> {
        let selector = name_selector(None, name);
        self.eval(call(CHECK_NTH, &[selector.into(), index.into()])).await
    }

    async fn select_radio(&self, name: &str, index: usize) -> Result<bool> {
        let selector = name_selector(None, name);
        self.eval(call(SELECT_NTH, &[selector.into(), index.into()])).await
    }

    async fn invoke_if_present(&self, function: &str, args: &[&str]) -> Result<bool> {
        let args: Vec<Value> = args.iter().map(|a| Value::from(*a)).collect();
        self.eval(call(INVOKE_IF_PRESENT, &[function.into(), Value::Array(args)]))
            .await
    }

    async fn activate_visible_button(&self, label: &str) -> Result<bool> {
        self.eval(call(ACTIVATE_BUTTON, &[label.into()])).await
    }

    async fn required_fields(&self) -> Result<Vec<RequiredField>> {
        let values: Vec<Value> = self.eval(call(REQUIRED_FIELDS, &[])).await?;
        Ok(parse_required_fields(values))
    }

    async fn fill_required(&self, position: usize, value: &str) -> Result<bool> {
        self.eval(call(FILL_REQUIRED, &[position.into(), value.into()])).await
    }

    async fn capture_screenshot(&self) -> Result<Vec<u8>> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(true)
            .build();
        Ok(self.page.screenshot(params).await?)
    }
}
