//! Image normalization into the classifier's input tensor.
//!
//! The tagger models expect:
//! - a square input of the model's native side length
//! - raw 0–255 float pixel values (no mean/std normalization)
//! - channel order: BGR
//! - tensor layout: NHWC \[batch, height, width, channels\]
//!
//! Transparency is composited onto opaque white, and non-square images are
//! padded to a white square (content centered) before resizing.

use image::{DynamicImage, Rgb, RgbImage};
use ndarray::Array4;

/// Number of color channels.
const CHANNELS: usize = 3;

/// Opaque white, the canvas color for compositing and padding.
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Normalize an image for tagger inference.
///
/// Composites transparency over white, pads to a centered square, resizes
/// with Lanczos3 when the square side differs from `target_side`, and
/// returns a `[1, S, S, 3]` BGR tensor of raw 0–255 floats.
pub fn normalize(image: &DynamicImage, target_side: u32) -> Array4<f32> {
    let opaque = composite_over_white(image);
    let squared = pad_to_square(&opaque);

    let resized = if squared.width() != target_side {
        image::imageops::resize(
            &squared,
            target_side,
            target_side,
            image::imageops::FilterType::Lanczos3,
        )
    } else {
        squared
    };

    let side = target_side as usize;
    let mut tensor = Array4::<f32>::zeros((1, side, side, CHANNELS));

    // Walk the raw RGB bytes directly instead of per-pixel indexing into
    // the 4D array. NHWC flat offset for pixel i, channel c is i * 3 + c,
    // so the BGR swap is a reversal within each 3-byte chunk.
    let raw = resized.as_raw();
    let tensor_data = tensor.as_slice_mut().unwrap();
    for (i, pixel) in raw.chunks_exact(CHANNELS).enumerate() {
        let base = i * CHANNELS;
        tensor_data[base] = pixel[2] as f32;
        tensor_data[base + 1] = pixel[1] as f32;
        tensor_data[base + 2] = pixel[0] as f32;
    }

    tensor
}

/// Composite any transparency onto an opaque white canvas and drop alpha.
///
/// Images without an alpha channel are returned as plain RGB unchanged.
fn composite_over_white(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (src, dst) in rgba.pixels().zip(out.pixels_mut()) {
        let alpha = src[3] as f32 / 255.0;
        for c in 0..CHANNELS {
            let blended = src[c] as f32 * alpha + 255.0 * (1.0 - alpha);
            dst[c] = blended.round() as u8;
        }
    }
    out
}

/// Pad a rectangular image to a white square sized to its longer side.
///
/// The content is centered with integer division, so for odd differences
/// the extra pixel lands on the trailing edge.
fn pad_to_square(image: &RgbImage) -> RgbImage {
    let (width, height) = image.dimensions();
    let side = width.max(height);
    if width == height {
        return image.clone();
    }

    let left = (side - width) / 2;
    let top = (side - height) / 2;

    let mut canvas = RgbImage::from_pixel(side, side, WHITE);
    image::imageops::replace(&mut canvas, image, left as i64, top as i64);
    canvas
}
