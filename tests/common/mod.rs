//! In-memory stand-in for the questionnaire page

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::io::Cursor;
use std::sync::Mutex;

use form_guide::automation::{PageAutomation, RequiredField};
use form_guide::config::{FieldAction, FormPlan};
use form_guide::Result;

/// A required control on one fake page
#[derive(Debug, Clone)]
pub enum Req {
    /// Radio group with this many options, all marked required
    Radio(String, usize),
    /// Text input, satisfied once non-empty
    Text(String),
    /// Control the recovery does not understand; never satisfied
    Other(&'static str),
}

/// Control values, compared between runs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub inputs: BTreeMap<String, String>,
    pub text_areas: BTreeMap<String, String>,
    pub checkboxes: BTreeMap<String, bool>,
    pub groups: BTreeMap<String, Vec<bool>>,
    pub radios: BTreeMap<String, Vec<bool>>,
    /// 0-based active page
    pub page: usize,
}

enum Element {
    Radio(String),
    Text(String),
    Other(&'static str),
}

pub struct FakeForm {
    state: Mutex<FormState>,
    required: Vec<Vec<Req>>,
    functions: HashSet<String>,
    /// Radio group name to the required text its selection reveals
    reveals: BTreeMap<String, String>,
    /// Toggles whose first reveal call unchecks them again
    revert_on_toggle: Mutex<HashSet<String>>,
    events: Mutex<Vec<String>>,
}

impl FakeForm {
    /// A form with every control the default plan touches and no validation
    pub fn fcs() -> Self {
        let plan = FormPlan::default();
        let mut state = FormState::default();

        for action in plan.pages.iter().flat_map(|p| p.actions.iter()) {
            match action {
                FieldAction::Text { name } => {
                    state.inputs.insert(name.clone(), String::new());
                }
                FieldAction::TextArea { name } => {
                    state.text_areas.insert(name.clone(), String::new());
                }
                FieldAction::Check { id } => {
                    state.checkboxes.insert(id.clone(), false);
                }
                FieldAction::CheckGroup { name, .. } => {
                    state.groups.insert(name.clone(), vec![false; 6]);
                }
                FieldAction::Radio { name, .. } => {
                    state.radios.insert(name.clone(), vec![false; 4]);
                }
                FieldAction::Reveal { toggle_id, fields, .. } => {
                    state.checkboxes.insert(toggle_id.clone(), false);
                    for field in fields {
                        state.inputs.insert(field.clone(), String::new());
                    }
                }
            }
        }

        Self {
            state: Mutex::new(state),
            required: vec![Vec::new(); plan.page_count()],
            functions: ["toggleSocialURL".to_string()].into_iter().collect(),
            reveals: BTreeMap::new(),
            revert_on_toggle: Mutex::new(HashSet::new()),
            events: Mutex::new(Vec::new()),
        }
    }

    /// Add validation to a 0-based page
    pub fn with_required(mut self, page: usize, reqs: Vec<Req>) -> Self {
        {
            let state = self.state.get_mut().unwrap();
            for req in &reqs {
                match req {
                    Req::Radio(name, options) => {
                        state.radios.insert(name.clone(), vec![false; *options]);
                    }
                    Req::Text(name) => {
                        state.inputs.entry(name.clone()).or_default();
                    }
                    Req::Other(_) => {}
                }
            }
        }
        self.required[page] = reqs;
        self
    }

    /// Remove a control, as if the form revision no longer had it
    pub fn without_field(self, name: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.inputs.remove(name);
            state.text_areas.remove(name);
            state.checkboxes.remove(name);
            state.groups.remove(name);
            state.radios.remove(name);
        }
        self
    }

    /// Selecting any option of `radio` adds required text `field` right after the group
    pub fn revealing(mut self, radio: &str, field: &str) -> Self {
        self.state
            .get_mut()
            .unwrap()
            .inputs
            .entry(field.to_string())
            .or_default();
        self.reveals.insert(radio.to_string(), field.to_string());
        self
    }

    pub fn without_functions(mut self) -> Self {
        self.functions.clear();
        self
    }

    pub fn reverting(self, toggle_id: &str) -> Self {
        self.revert_on_toggle
            .lock()
            .unwrap()
            .insert(toggle_id.to_string());
        self
    }

    pub fn snapshot(&self) -> FormState {
        self.state.lock().unwrap().clone()
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn log(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }

    fn elements(&self, state: &FormState) -> Vec<Element> {
        let mut out = Vec::new();
        for req in self.required.get(state.page).into_iter().flatten() {
            match req {
                Req::Radio(name, options) => {
                    for _ in 0..*options {
                        out.push(Element::Radio(name.clone()));
                    }
                    if let Some(field) = self.revealed_by(state, name) {
                        out.push(Element::Text(field));
                    }
                }
                Req::Text(name) => out.push(Element::Text(name.clone())),
                Req::Other(kind) => out.push(Element::Other(kind)),
            }
        }
        out
    }

    fn revealed_by(&self, state: &FormState, radio: &str) -> Option<String> {
        let selected = state
            .radios
            .get(radio)
            .map(|opts| opts.iter().any(|&o| o))
            .unwrap_or(false);
        if selected {
            self.reveals.get(radio).cloned()
        } else {
            None
        }
    }

    fn text_filled(state: &FormState, name: &str) -> bool {
        state.inputs.get(name).map(|v| !v.is_empty()).unwrap_or(false)
    }

    fn page_valid(&self, state: &FormState) -> bool {
        self.required.get(state.page).into_iter().flatten().all(|req| match req {
            Req::Radio(name, _) => {
                let selected = state
                    .radios
                    .get(name)
                    .map(|opts| opts.iter().any(|&o| o))
                    .unwrap_or(false);
                selected
                    && self
                        .revealed_by(state, name)
                        .map(|field| Self::text_filled(state, &field))
                        .unwrap_or(true)
            }
            Req::Text(name) => Self::text_filled(state, name),
            Req::Other(_) => false,
        })
    }
}

/// A small valid PNG, tinted by page so captures differ
pub fn png_bytes(page: usize) -> Vec<u8> {
    let shade = (page * 20 % 255) as u8;
    let img = image::RgbImage::from_pixel(64, 45, image::Rgb([shade, 120, 200]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

#[async_trait]
impl PageAutomation for FakeForm {
    async fn set_field(&self, name: &str, value: &str) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        if let Some(v) = state.inputs.get_mut(name) {
            *v = value.to_string();
            return Ok(true);
        }
        if let Some(v) = state.text_areas.get_mut(name) {
            *v = value.to_string();
            return Ok(true);
        }
        Ok(false)
    }

    async fn set_text_area(&self, name: &str, value: &str) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        match state.text_areas.get_mut(name) {
            Some(v) => {
                *v = value.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_checked(&self, id: &str, checked: bool) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        match state.checkboxes.get_mut(id) {
            Some(v) => {
                *v = checked;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn is_checked(&self, id: &str) -> Result<Option<bool>> {
        Ok(self.state.lock().unwrap().checkboxes.get(id).copied())
    }

    async fn set_checked_by_index(&self, name: &str, index: usize) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        match state.groups.get_mut(name).and_then(|g| g.get_mut(index)) {
            Some(v) => {
                *v = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn select_radio(&self, name: &str, index: usize) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        match state.radios.get_mut(name) {
            Some(options) if index < options.len() => {
                for (i, o) in options.iter_mut().enumerate() {
                    *o = i == index;
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn invoke_if_present(&self, function: &str, args: &[&str]) -> Result<bool> {
        if !self.functions.contains(function) {
            return Ok(false);
        }
        self.log(format!("call:{}:{}", function, args.join(",")));

        if let Some(toggle) = args.first() {
            let reverted = self.revert_on_toggle.lock().unwrap().remove(*toggle);
            if reverted {
                self.state
                    .lock()
                    .unwrap()
                    .checkboxes
                    .insert(toggle.to_string(), false);
            }
        }
        Ok(true)
    }

    async fn activate_visible_button(&self, label: &str) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        let number = state.page + 1;
        self.log(format!("continue:{}", number));

        let is_last = state.page + 1 >= self.required.len();
        if label != "Continue" || is_last || !self.page_valid(&state) {
            return Ok(false);
        }
        state.page += 1;
        Ok(true)
    }

    async fn required_fields(&self) -> Result<Vec<RequiredField>> {
        let state = self.state.lock().unwrap();
        let fields = self
            .elements(&state)
            .into_iter()
            .enumerate()
            .map(|(position, element)| match element {
                Element::Radio(name) => RequiredField::RadioGroup {
                    selected: state
                        .radios
                        .get(&name)
                        .map(|o| o.iter().any(|&c| c))
                        .unwrap_or(false),
                    name,
                },
                Element::Text(name) => RequiredField::Text {
                    position,
                    empty: state.inputs.get(&name).map(|v| v.is_empty()).unwrap_or(true),
                },
                Element::Other(kind) => RequiredField::Other {
                    position,
                    kind: kind.to_string(),
                },
            })
            .collect();
        Ok(fields)
    }

    async fn fill_required(&self, position: usize, value: &str) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        let name = match self.elements(&state).into_iter().nth(position) {
            Some(Element::Text(name)) if !Self::text_filled(&state, &name) => name,
            _ => return Ok(false),
        };
        self.log(format!("fill:{}", name));
        state.inputs.insert(name, value.to_string());
        Ok(true)
    }

    async fn capture_screenshot(&self) -> Result<Vec<u8>> {
        let page = self.state.lock().unwrap().page + 1;
        self.log(format!("shot:{}", page));
        Ok(png_bytes(page))
    }
}
