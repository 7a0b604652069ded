//! Data-URL encoding of bitmaps for provider payloads.

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{codecs::jpeg::JpegEncoder, DynamicImage, Rgb, RgbImage};

use crate::error::{ImageError, ImageResult};
use crate::formats::ImageFormat;

/// JPEG quality used for provider payloads.
pub const JPEG_QUALITY: u8 = 75;

/// Encode `image` as a `data:image/jpeg;base64,...` URL.
///
/// Transparent pixels are composited onto a white background first.
pub fn to_data_url(image: &DynamicImage) -> ImageResult<String> {
    let bytes = encode_jpeg(image)?;
    Ok(format!(
        "data:image/{};base64,{}",
        ImageFormat::Jpeg.mime_subtype(),
        STANDARD.encode(bytes)
    ))
}

/// Encode `image` as baseline JPEG bytes.
pub fn encode_jpeg(image: &DynamicImage) -> ImageResult<Vec<u8>> {
    let rgb = flatten_on_white(image);
    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(|e| ImageError::Encode(e.to_string()))?;
    Ok(buffer.into_inner())
}

fn flatten_on_white(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    let mut rgb = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as u16;
        let blend = |c: u8| ((c as u16 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        rgb.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
    }
    rgb
}

#[cfg(test)]
mod tests {
    use image::{GenericImageView, Rgba, RgbaImage};

    use super::*;
    use crate::resolver::decode_inline;

    #[test]
    fn test_data_url_round_trip_keeps_dimensions() {
        let image = DynamicImage::new_rgb8(37, 21);
        let url = to_data_url(&image).unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));

        let bytes = decode_inline(&url).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (37, 21));
    }

    #[test]
    fn test_transparency_becomes_white() {
        let mut rgba = RgbaImage::new(8, 8);
        for pixel in rgba.pixels_mut() {
            *pixel = Rgba([255, 0, 0, 0]);
        }
        let flattened = flatten_on_white(&DynamicImage::ImageRgba8(rgba));
        assert!(flattened.pixels().all(|p| p.0 == [255, 255, 255]));
    }

    #[test]
    fn test_opaque_pixels_keep_colour() {
        let mut rgba = RgbaImage::new(2, 2);
        for pixel in rgba.pixels_mut() {
            *pixel = Rgba([10, 20, 30, 255]);
        }
        let flattened = flatten_on_white(&DynamicImage::ImageRgba8(rgba));
        assert!(flattened.pixels().all(|p| p.0 == [10, 20, 30]));
    }
}
