//! Pixel-mosaic rendering.
//!
//! The renderer divides the decoded source into `sample_size × sample_size`
//! blocks, reduces each block to its average color composited over the
//! configured fill color, and redraws the block grid scaled to the display
//! size. Transparent source regions therefore come out as `fill_color`,
//! never as transparency, and the output is always fully opaque.
//!
//! Rendering is pure: the same (image, config) pair always produces the same
//! pixels. It also never fails — input that cannot be decoded degrades to a
//! solid placeholder at the display size.

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use log::debug;

use crate::select::SelectedImage;

/// Configuration for the mosaic renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MosaicConfig {
    /// Output width in pixels
    pub display_width: u32,
    /// Output height in pixels
    pub display_height: u32,
    /// Side length of one source sampling block, in source pixels
    pub sample_size: u32,
    /// Color substituted for transparent source regions
    pub fill_color: [u8; 3],
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            display_width: 500,
            display_height: 300,
            sample_size: 10,
            fill_color: [255, 255, 255],
        }
    }
}

/// A rendered, fully opaque mosaic at display resolution
#[derive(Debug, Clone, PartialEq)]
pub struct Mosaic {
    image: RgbImage,
}

impl Mosaic {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// The rendered pixel buffer
    pub fn image(&self) -> &RgbImage {
        &self.image
    }
}

/// Render a selected image as a pixel mosaic.
///
/// Undecodable, empty, or zero-dimension input yields the placeholder render
/// (solid `fill_color` at display size) rather than an error.
pub fn render(image: &SelectedImage, config: &MosaicConfig) -> Mosaic {
    let decoded = match image::load_from_memory(image.bytes()) {
        Ok(decoded) => decoded.to_rgba8(),
        Err(e) => {
            debug!("selection {} not decodable ({}); placeholder render", image.id(), e);
            return placeholder(config);
        }
    };

    let (src_w, src_h) = decoded.dimensions();
    if src_w == 0 || src_h == 0 {
        return placeholder(config);
    }

    let sample = config.sample_size.max(1);
    let blocks_x = src_w.div_ceil(sample);
    let blocks_y = src_h.div_ceil(sample);
    let fill = config.fill_color;

    // One pixel per block; the upscale below turns each into a solid square.
    let mut grid = RgbImage::new(blocks_x, blocks_y);
    for by in 0..blocks_y {
        for bx in 0..blocks_x {
            let x0 = bx * sample;
            let y0 = by * sample;
            let x1 = (x0 + sample).min(src_w);
            let y1 = (y0 + sample).min(src_h);

            let mut sum = [0u64; 4];
            for y in y0..y1 {
                for x in x0..x1 {
                    let p = decoded.get_pixel(x, y).0;
                    for (acc, &c) in sum.iter_mut().zip(p.iter()) {
                        *acc += u64::from(c);
                    }
                }
            }
            let count = u64::from((x1 - x0) * (y1 - y0));
            let avg = sum.map(|c| (c / count) as u32);

            // Composite the averaged color over the fill using the averaged alpha
            let alpha = avg[3];
            let composited = [
                blend(avg[0], fill[0], alpha),
                blend(avg[1], fill[1], alpha),
                blend(avg[2], fill[2], alpha),
            ];
            grid.put_pixel(bx, by, Rgb(composited));
        }
    }

    let image = imageops::resize(
        &grid,
        config.display_width.max(1),
        config.display_height.max(1),
        FilterType::Nearest,
    );
    Mosaic { image }
}

fn blend(src: u32, fill: u8, alpha: u32) -> u8 {
    ((src * alpha + u32::from(fill) * (255 - alpha)) / 255) as u8
}

fn placeholder(config: &MosaicConfig) -> Mosaic {
    Mosaic {
        image: RgbImage::from_pixel(
            config.display_width.max(1),
            config.display_height.max(1),
            Rgb(config.fill_color),
        ),
    }
}
