//! Fixed run configuration: sample answers, the form's page plan and output options
//!
//! Nothing here is read from the environment. The `Default` impls carry the values
//! for the FCS website-requirements questionnaire; the CLI only overrides paths.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::pdf::layout::{PageDimensions, Rgb};

/// Public URL of the questionnaire
pub const FORM_URL: &str = "https://miraloyd.github.io/fcs-requirements/";

/// Sample answers keyed by form field name
#[derive(Debug, Clone, PartialEq)]
pub struct SampleData {
    values: BTreeMap<String, String>,
}

impl SampleData {
    /// Build a dataset from `(field, value)` pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Value for a field, if the dataset has one
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

}

impl Default for SampleData {
    /// A fictional school used throughout the guide
    fn default() -> Self {
        Self::from_pairs([
            // Page 1: school identity
            ("school_name", "Harmony Academy International"),
            ("school_motto", "Knowledge, Faith, Excellence"),
            ("year_established", "2005"),
            (
                "school_usp",
                "A leading co-educational school offering a blended Nigerian and British curriculum, \
                 with a strong emphasis on character development, STEM education, and extracurricular \
                 enrichment. Our students consistently achieve top results in WAEC, NECO, and \
                 Cambridge IGCSE examinations.",
            ),
            (
                "accreditations",
                "Approved by FCT Education Board. WAEC/NECO Centre. Cambridge International School. \
                 Member, Association of Private Educators in Nigeria (APEN).",
            ),
            // Page 2: branding
            ("school_colours", "Royal Blue (#003366), Gold (#D4AF37), White (#FFFFFF)"),
            // Page 4: admissions
            (
                "admission_process",
                "Parents can apply online or visit the school. Admission process includes: \
                 (1) Completion of application form, (2) Entrance assessment in English and \
                 Mathematics, (3) Interview with the Head of School, (4) Payment of acceptance fee \
                 upon offer. Applications open from September to January each year.",
            ),
            // Page 6: social and contact
            ("school_address", "25 Unity Close, Maitama District, Abuja, FCT, Nigeria"),
            ("school_phone", "+234 809 123 4567\n+234 703 987 6543"),
            ("school_email", "info@harmonyacademy.ng"),
            ("facebook_url", "https://facebook.com/harmonyacademyng"),
            ("instagram_url", "https://instagram.com/harmonyacademy_ng"),
            // Page 7: technical
            ("domain_name", "harmonyacademy.ng"),
            // Page 8: timeline
            ("primary_contact", "Mrs. Ngozi Obi, Proprietress"),
            (
                "additional_notes",
                "We would like the website to reflect our school values and provide an easy way for \
                 parents to access information. Mobile-friendly design is very important as most of \
                 our parents use smartphones.",
            ),
        ])
    }
}

/// One step of populating the form
#[derive(Debug, Clone, PartialEq)]
pub enum FieldAction {
    /// Single-line input named like the sample field
    Text { name: String },
    /// Multi-line textarea named like the sample field
    TextArea { name: String },
    /// Checkbox addressed by element id
    Check { id: String },
    /// Checkbox group sharing a name; entries are positions within the group
    CheckGroup { name: String, indices: Vec<usize> },
    /// Radio group; selects the option at `index`
    Radio { name: String, index: usize },
    /// Checkbox whose page script reveals extra inputs via `function(toggle_id, target)`
    Reveal {
        toggle_id: String,
        function: String,
        target: String,
        fields: Vec<String>,
    },
}

impl FieldAction {
    pub fn text(name: &str) -> Self {
        FieldAction::Text { name: name.to_string() }
    }

    pub fn text_area(name: &str) -> Self {
        FieldAction::TextArea { name: name.to_string() }
    }

    pub fn check(id: &str) -> Self {
        FieldAction::Check { id: id.to_string() }
    }

    pub fn check_group(name: &str, indices: &[usize]) -> Self {
        FieldAction::CheckGroup {
            name: name.to_string(),
            indices: indices.to_vec(),
        }
    }

    pub fn radio(name: &str, index: usize) -> Self {
        FieldAction::Radio { name: name.to_string(), index }
    }

    pub fn reveal(toggle_id: &str, function: &str, target: &str, fields: &[&str]) -> Self {
        FieldAction::Reveal {
            toggle_id: toggle_id.to_string(),
            function: function.to_string(),
            target: target.to_string(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// A single form page: its guide label and what to fill on it
#[derive(Debug, Clone, PartialEq)]
pub struct PagePlan {
    pub label: String,
    pub actions: Vec<FieldAction>,
}

impl PagePlan {
    pub fn new(label: &str, actions: Vec<FieldAction>) -> Self {
        Self {
            label: label.to_string(),
            actions,
        }
    }
}

/// Ordered page plans for the whole questionnaire
#[derive(Debug, Clone, PartialEq)]
pub struct FormPlan {
    pub pages: Vec<PagePlan>,
}

impl FormPlan {
    /// Human-readable page labels, in form order
    pub fn labels(&self) -> Vec<&str> {
        self.pages.iter().map(|p| p.label.as_str()).collect()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Every `Reveal` action across all pages
    pub fn reveals(&self) -> impl Iterator<Item = &FieldAction> {
        self.pages
            .iter()
            .flat_map(|p| p.actions.iter())
            .filter(|a| matches!(a, FieldAction::Reveal { .. }))
    }

    /// The eight pages of the FCS requirements questionnaire
    pub fn fcs_requirements() -> Self {
        use FieldAction as A;

        let ids = |prefix: &str, nums: &[u32]| -> Vec<FieldAction> {
            nums.iter().map(|n| A::check(&format!("{}{}", prefix, n))).collect()
        };

        let mut identity = vec![A::text("school_name")];
        identity.extend(ids("lv", &[0, 1, 2, 3, 4]));
        identity.extend([
            A::text("school_motto"),
            A::text("year_established"),
            A::text_area("school_usp"),
            // NERDC, WAEC/NECO, Cambridge
            A::check_group("curriculum", &[0, 2, 3]),
            A::text_area("accreditations"),
        ]);

        let mut features = ids("pg", &[0, 1, 2, 3, 4, 5, 6, 7, 10, 11, 12, 13]);
        features.extend(ids("ft", &[0, 1, 2, 3, 4, 5, 6]));

        Self {
            pages: vec![
                PagePlan::new("01 \u{2014} School Identity", identity),
                PagePlan::new(
                    "02 \u{2014} Branding & Visual Identity",
                    vec![A::text("school_colours"), A::radio("website_feel", 0)],
                ),
                PagePlan::new("03 \u{2014} Website Pages & Features", features),
                PagePlan::new(
                    "04 \u{2014} Admissions & Academics",
                    vec![
                        A::text_area("admission_process"),
                        A::radio("fee_display", 2),
                        A::check_group("facilities", &[0, 1, 2, 3, 4]),
                    ],
                ),
                PagePlan::new(
                    "05 \u{2014} Content, Images & Brand Assets",
                    vec![A::radio("promo_video", 1), A::radio("content_source", 1)],
                ),
                PagePlan::new(
                    "06 \u{2014} Social Media & Contact Info",
                    vec![
                        A::text_area("school_address"),
                        A::text_area("school_phone"),
                        A::text("school_email"),
                        // sm1 is Facebook, sm2 is Instagram
                        A::reveal("sm1", "toggleSocialURL", "fbUrl", &["facebook_url"]),
                        A::reveal("sm2", "toggleSocialURL", "igUrl", &["instagram_url"]),
                    ],
                ),
                PagePlan::new(
                    "07 \u{2014} Technical & Backend Access",
                    vec![
                        A::radio("domain_status", 0),
                        A::text("domain_name"),
                        A::radio("hosting_status", 1),
                        A::radio("email_setup", 2),
                        A::radio("credentials_method", 0),
                    ],
                ),
                PagePlan::new(
                    "08 \u{2014} Timeline & Final Details",
                    vec![
                        A::radio("timeline", 1),
                        A::text("primary_contact"),
                        A::radio("website_updater", 1),
                        A::text_area("additional_notes"),
                    ],
                ),
            ],
        }
    }
}

impl Default for FormPlan {
    fn default() -> Self {
        Self::fcs_requirements()
    }
}

/// Browser window used for captures
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSpec {
    pub width: u32,
    pub height: u32,
    pub device_scale_factor: f64,
}

impl Default for ViewportSpec {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 900,
            device_scale_factor: 2.0,
        }
    }
}

/// Options shared by every browser launch
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// Show the browser window instead of running headless
    pub headed: bool,
    pub viewport: ViewportSpec,
    /// Upper bound for a single navigation
    pub navigation_timeout: Duration,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headed: false,
            viewport: ViewportSpec::default(),
            navigation_timeout: Duration::from_secs(30),
        }
    }
}

/// Brand colours and fixed captions for the guide PDF
#[derive(Debug, Clone)]
pub struct Branding {
    pub primary: Rgb,
    pub accent: Rgb,
    /// Prefix for every content-page header, e.g. "Sample Guide"
    pub header_prefix: String,
    pub footer_caption: String,
    pub author: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            primary: Rgb::from_hex(0x1a3a5c),
            accent: Rgb::from_hex(0xc8a84e),
            header_prefix: "Sample Guide".to_string(),
            footer_caption: "Sample Guide \u{2014} Miraloyd Global Consult Ltd | www.miraloyd.com"
                .to_string(),
            author: "Miraloyd Global Consult Ltd".to_string(),
        }
    }
}

/// Text of the decorative title page
#[derive(Debug, Clone)]
pub struct TitleSpec {
    pub heading: String,
    /// Second heading line, drawn in the accent colour
    pub heading_accent: String,
    pub subheading: String,
    pub blurb: Vec<String>,
    pub attribution: Vec<String>,
}

impl TitleSpec {
    /// Document title used in the PDF Info dictionary
    pub fn document_title(&self) -> String {
        format!("{} {} \u{2014} {}", self.heading, self.heading_accent, self.subheading)
    }
}

impl Default for TitleSpec {
    fn default() -> Self {
        Self {
            heading: "FCS Website Requirements".to_string(),
            heading_accent: "Questionnaire".to_string(),
            subheading: "Sample Guide".to_string(),
            blurb: vec![
                "This document shows a filled example of the questionnaire.".to_string(),
                "Use it as a guide when completing your own form.".to_string(),
            ],
            attribution: vec![
                "Miraloyd Global Consult Ltd".to_string(),
                "www.miraloyd.com".to_string(),
            ],
        }
    }
}

/// Options for the sample guide run (procedure A)
#[derive(Debug, Clone)]
pub struct GuideOptions {
    pub form_url: String,
    /// Where per-page screenshots are written
    pub screenshots_dir: PathBuf,
    /// Final guide PDF
    pub output_path: PathBuf,
    pub browser: BrowserOptions,
    /// Pause after fills and page transitions
    pub settle_delay: Duration,
    /// Exact text of the advance button
    pub continue_label: String,
    /// Value typed into required fields the sample data left empty
    pub placeholder: String,
    pub branding: Branding,
    pub title: TitleSpec,
}

impl Default for GuideOptions {
    fn default() -> Self {
        Self {
            form_url: FORM_URL.to_string(),
            screenshots_dir: PathBuf::from("sample-guide-screenshots"),
            output_path: PathBuf::from("FCS-WEBFORM-SAMPLE-GUIDE.pdf"),
            browser: BrowserOptions::default(),
            settle_delay: Duration::from_millis(500),
            continue_label: "Continue".to_string(),
            placeholder: "Sample response".to_string(),
            branding: Branding::default(),
            title: TitleSpec::default(),
        }
    }
}

/// Options for exporting the HTML slide deck (procedure B)
#[derive(Debug, Clone)]
pub struct SlideOptions {
    pub html_path: PathBuf,
    pub output_path: PathBuf,
    /// Paper size in inches
    pub width_in: f64,
    pub height_in: f64,
    pub browser: BrowserOptions,
}

impl Default for SlideOptions {
    fn default() -> Self {
        Self {
            html_path: PathBuf::from("filled-example-slides.html"),
            output_path: PathBuf::from("FCS-WEBFORM-FILLED-EXAMPLE.pdf"),
            width_in: PageDimensions::slide().width.inches(),
            height_in: PageDimensions::slide().height.inches(),
            browser: BrowserOptions::default(),
        }
    }
}
