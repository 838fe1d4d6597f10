//! Standard Helvetica font, text measurement and WinAnsi string encoding
//!
//! Helvetica is one of the 14 standard PDF fonts, so nothing is
//! embedded. Widths below come from the Adobe AFM files (1/1000 em) and are needed
//! to center and right-align text.

use lopdf::{Dictionary, Document, Object, ObjectId};

/// Resource name of the font in every page's resource dictionary
pub const FONT_RESOURCE: &str = "F1";

/// Helvetica widths for characters 32..=126
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // space - /
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,                               // 0 - 9
    278, 278, 584, 584, 584, 556, 1015,                                             // : - @
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,                // A - M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,                // N - Z
    278, 278, 278, 469, 556, 333,                                                   // [ - `
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,                // a - m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,                // n - z
    334, 260, 334, 584,                                                             // { - ~
];

/// Map a character to its WinAnsiEncoding byte, `?` when there is none
pub fn win_ansi_byte(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '\u{2013}' => 0x96, // en dash
        '\u{2014}' => 0x97, // em dash
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95, // bullet
        '\u{2026}' => 0x85, // ellipsis
        '\u{20AC}' => 0x80, // euro
        '\u{00A0}'..='\u{00FF}' => c as u32 as u8,
        _ => b'?',
    }
}

/// Width of one WinAnsi byte in 1/1000 em
fn byte_width(byte: u8) -> u16 {
    match byte {
        32..=126 => HELVETICA_WIDTHS[(byte - 32) as usize],
        0x96 => 556,
        0x97 | 0x85 => 1000,
        0x91 | 0x92 => 222,
        0x93 | 0x94 => 500,
        0x95 => 350,
        // Latin-1 letters are close enough to the average lowercase width
        _ => 556,
    }
}

/// Width of `text` in points at `size`
pub fn text_width(text: &str, size: f64) -> f64 {
    let units: u32 = text
        .chars()
        .map(|c| byte_width(win_ansi_byte(c)) as u32)
        .sum();
    units as f64 * size / 1000.0
}

/// Encode `text` as a PDF literal string, `(…)` included
///
/// Bytes outside printable ASCII are written as octal escapes so the content stream
/// stays 7-bit clean.
pub fn pdf_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('(');
    for c in text.chars() {
        match win_ansi_byte(c) {
            b'\\' => out.push_str("\\\\"),
            b'(' => out.push_str("\\("),
            b')' => out.push_str("\\)"),
            b @ 32..=126 => out.push(b as char),
            b => out.push_str(&format!("\\{:03o}", b)),
        }
    }
    out.push(')');
    out
}

/// Ascent of Helvetica in 1/1000 em, used to place text by its top edge
pub const ASCENT: f64 = 718.0;

/// Add the Helvetica Type1 font dictionary with WinAnsiEncoding
pub fn add_helvetica(doc: &mut Document) -> ObjectId {
    let mut font = Dictionary::new();
    font.set("Type", Object::Name(b"Font".to_vec()));
    font.set("Subtype", Object::Name(b"Type1".to_vec()));
    font.set("BaseFont", Object::Name(b"Helvetica".to_vec()));
    font.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));

    doc.add_object(Object::Dictionary(font))
}
