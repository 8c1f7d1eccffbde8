//! Rasterized snapshots of a rendered mosaic.
//!
//! `rasterize` flattens a [`Mosaic`] into a single PNG bitmap; the snapshot
//! can then be serialized as a portable `data:` URL for the upload request.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::mosaic::Mosaic;
use crate::{Error, Result};

/// A flattened PNG snapshot of a rendered mosaic
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

impl Snapshot {
    /// Serialize as an embedded-image string (`data:image/png;base64,…`)
    pub fn to_data_url(&self) -> String {
        format!("data:image/png;base64,{}", BASE64.encode(&self.png_data))
    }
}

/// Flatten a rendered mosaic into a PNG snapshot
pub fn rasterize(mosaic: &Mosaic) -> Result<Snapshot> {
    let mut buf = Cursor::new(Vec::new());
    mosaic
        .image()
        .write_to(&mut buf, image::ImageFormat::Png)
        .map_err(|e| Error::Encode(format!("PNG encoding failed: {}", e)))?;

    Ok(Snapshot {
        width: mosaic.width(),
        height: mosaic.height(),
        png_data: buf.into_inner(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mosaic::{render, MosaicConfig};
    use crate::select::FileSelector;

    fn small_mosaic() -> Mosaic {
        let mut selector = FileSelector::new();
        let image = selector.select(Vec::new());
        let config = MosaicConfig { display_width: 12, display_height: 8, ..Default::default() };
        render(&image, &config)
    }

    #[test]
    fn rasterize_emits_png() {
        let snapshot = rasterize(&small_mosaic()).unwrap();
        assert_eq!(snapshot.width, 12);
        assert_eq!(snapshot.height, 8);
        // PNG files start with these magic bytes
        assert_eq!(&snapshot.png_data[0..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn data_url_is_self_describing() {
        let snapshot = rasterize(&small_mosaic()).unwrap();
        let url = snapshot.to_data_url();
        assert!(url.starts_with("data:image/png;base64,"));

        let payload = url.strip_prefix("data:image/png;base64,").unwrap();
        let decoded = BASE64.decode(payload).unwrap();
        assert_eq!(decoded, snapshot.png_data);
    }
}
