//! Screenshot artifacts as PDF image XObjects

use std::path::Path;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use crate::error::{Error, Result};

/// An image XObject added to a document, with its pixel size
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedImage {
    pub id: ObjectId,
    pub width: u32,
    pub height: u32,
}

/// Decode a PNG file and add it to `doc` as an RGB image XObject
///
/// Alpha is dropped; browser screenshots are opaque. The pixel data is deflated as
/// soon as it is decoded, so only one uncompressed capture is in memory at a time.
pub fn embed_png(doc: &mut Document, path: &Path) -> Result<EmbeddedImage> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let rgb = image::open(path)?.into_rgb8();
    let (width, height) = rgb.dimensions();

    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(width as i64));
    dict.set("Height", Object::Integer(height as i64));
    dict.set("ColorSpace", Object::Name(b"DeviceRGB".to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));

    let mut stream = Stream::new(dict, rgb.into_raw());
    stream.compress()?;
    let id = doc.add_object(Object::Stream(stream));

    Ok(EmbeddedImage { id, width, height })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_embed_png_records_dimensions() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shot.png");
        image::RgbaImage::from_pixel(40, 25, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let mut doc = Document::with_version("1.5");
        let embedded = embed_png(&mut doc, &path).unwrap();

        assert_eq!((embedded.width, embedded.height), (40, 25));
        let stream = doc.get_object(embedded.id).unwrap().as_stream().unwrap();
        assert_eq!(stream.dict.get(b"Filter").unwrap().as_name().unwrap(), b"FlateDecode");
        assert_eq!(stream.decompressed_content().unwrap().len(), 40 * 25 * 3);
        assert_eq!(stream.dict.get(b"Width").unwrap().as_i64().unwrap(), 40);
    }

    #[test]
    fn test_embed_missing_png() {
        let mut doc = Document::with_version("1.5");
        let result = embed_png(&mut doc, Path::new("missing/page-01.png"));
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }
}
