//! Page layout calculations
//!
//! PDF user space has its origin at the bottom-left. The guide is laid out top-down,
//! so [`Rect`] uses top-left coordinates and converts when drawing.

/// Simple length type in millimeters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length(pub f64);

impl Length {
    /// Create a length from millimeters
    pub fn from_mm(mm: f64) -> Self {
        Length(mm)
    }

    /// Create a length from inches
    pub fn from_inches(inches: f64) -> Self {
        Length(inches * 25.4)
    }

    /// Get the value in millimeters
    pub fn mm(&self) -> f64 {
        self.0
    }

    /// Get the value in inches
    pub fn inches(&self) -> f64 {
        self.0 / 25.4
    }

    /// Get the value in points (1/72 inch)
    pub fn pt(&self) -> f64 {
        self.0 * 72.0 / 25.4
    }
}

/// Page dimensions
#[derive(Debug, Clone, Copy)]
pub struct PageDimensions {
    pub width: Length,
    pub height: Length,
}

impl PageDimensions {
    /// A4 size (210mm × 297mm)
    pub fn a4() -> Self {
        Self {
            width: Length::from_mm(210.0),
            height: Length::from_mm(297.0),
        }
    }

    /// 16:9 slide (13.333" × 7.5")
    pub fn slide() -> Self {
        Self {
            width: Length::from_inches(13.333),
            height: Length::from_inches(7.5),
        }
    }

    /// Same page turned on its side
    pub fn landscape(self) -> Self {
        if self.width.mm() >= self.height.mm() {
            self
        } else {
            Self {
                width: self.height,
                height: self.width,
            }
        }
    }

    pub fn width_pt(&self) -> f64 {
        self.width.pt()
    }

    pub fn height_pt(&self) -> f64 {
        self.height.pt()
    }
}

/// Axis-aligned box in points, measured from the top-left of the page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Bottom edge in PDF coordinates for a page of `page_height` points
    pub fn pdf_bottom(&self, page_height: f64) -> f64 {
        page_height - self.y - self.height
    }
}

/// Scale a `width` × `height` image into `bounds`, keeping its aspect ratio and
/// centering it on both axes
///
/// Images are scaled up as well as down, so the result always touches two opposite
/// edges of `bounds`.
pub fn fit_centered(width: f64, height: f64, bounds: Rect) -> Rect {
    if width <= 0.0 || height <= 0.0 {
        return Rect::new(bounds.x, bounds.y, 0.0, 0.0);
    }

    let scale = (bounds.width / width).min(bounds.height / height);
    let w = width * scale;
    let h = height * scale;

    Rect {
        x: bounds.x + (bounds.width - w) / 2.0,
        y: bounds.y + (bounds.height - h) / 2.0,
        width: w,
        height: h,
    }
}

/// Device RGB colour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 0xff, g: 0xff, b: 0xff };

    /// From a `0xRRGGBB` literal
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    /// Operands for the `rg` / `RG` operators, e.g. `0.102 0.227 0.361`
    pub fn pdf_operands(&self) -> String {
        format!(
            "{:.3} {:.3} {:.3}",
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0
        )
    }
}

/// Fixed regions of a guide content page
#[derive(Debug, Clone, Copy)]
pub struct GuideLayout {
    pub page: PageDimensions,
    pub header_height: f64,
    /// Box the screenshot is fitted into
    pub image_area: Rect,
    /// Baseline distance of the footer caption from the page bottom
    pub footer_baseline: f64,
    pub side_margin: f64,
}

impl GuideLayout {
    /// Landscape A4 with no outer margin
    pub fn a4_landscape() -> Self {
        let page = PageDimensions::a4().landscape();
        let width = page.width_pt();
        let height = page.height_pt();

        Self {
            page,
            header_height: 45.0,
            image_area: Rect::new(30.0, 52.0, width - 60.0, height - 75.0),
            footer_baseline: 8.0,
            side_margin: 20.0,
        }
    }
}

impl Default for GuideLayout {
    fn default() -> Self {
        Self::a4_landscape()
    }
}
