//! End-to-end ingestion: resolve a source, then normalize it.

use std::io::{Cursor, Write};
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, Rgba, RgbaImage};
use imagelens_images::*;

fn encode(image: &DynamicImage, format: image::ImageFormat) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, format).unwrap();
    buffer.into_inner()
}

fn resolver() -> SourceResolver {
    SourceResolver::new(Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_url_source_is_fetched_and_normalized() {
    let png = encode(&DynamicImage::new_rgb8(40, 30), image::ImageFormat::Png);
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/images/cat.png")
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body(&png)
        .create_async()
        .await;

    let raw = resolver()
        .resolve(&format!("{}/images/cat.png", server.url()))
        .await
        .unwrap();
    assert_eq!(raw.kind, SourceKind::Url);
    assert_eq!(raw.data, png);

    let normalized = ImageNormalizer::new(10.0).normalize(raw).unwrap();
    assert_eq!(normalized.metadata.dimensions(), (40, 30));
    assert_eq!(normalized.metadata.format, ImageFormat::Png);
}

#[tokio::test]
async fn test_url_with_wrong_content_type_rejected() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/page")
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body("<html></html>")
        .create_async()
        .await;

    let err = resolver()
        .resolve(&format!("{}/page", server.url()))
        .await
        .unwrap_err();

    assert!(matches!(err, ImageError::NotAnImage(ref ct) if ct.starts_with("text/html")));
    assert_eq!(err.kind(), ImageErrorKind::SourceLoad);
}

#[tokio::test]
async fn test_url_error_status_rejected() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/gone.png")
        .with_status(404)
        .create_async()
        .await;

    let err = resolver()
        .resolve(&format!("{}/gone.png", server.url()))
        .await
        .unwrap_err();

    assert!(matches!(err, ImageError::HttpStatus(404)));
    assert_eq!(err.to_string(), "HTTP error loading image: 404");
}

#[tokio::test]
async fn test_unreachable_host_is_source_load_error() {
    let err = resolver()
        .resolve("http://127.0.0.1:1/never.png")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ImageErrorKind::SourceLoad);
}

#[tokio::test]
async fn test_file_source_is_read() {
    let jpeg = encode(&DynamicImage::new_rgb8(16, 16), image::ImageFormat::Jpeg);
    let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
    file.write_all(&jpeg).unwrap();

    let raw = resolver()
        .resolve(file.path().to_str().unwrap())
        .await
        .unwrap();
    assert_eq!(raw.kind, SourceKind::File);

    let normalized = ImageNormalizer::new(10.0).normalize(raw).unwrap();
    assert_eq!(normalized.metadata.format, ImageFormat::Jpeg);
    assert_eq!(normalized.metadata.mode, "RGB");
}

#[tokio::test]
async fn test_data_url_source_is_decoded() {
    let mut rgba = RgbaImage::new(5, 7);
    rgba.put_pixel(0, 0, Rgba([1, 2, 3, 128]));
    let png = encode(&DynamicImage::ImageRgba8(rgba), image::ImageFormat::Png);
    let source = format!("data:image/png;base64,{}", STANDARD.encode(&png));

    let raw = resolver().resolve(&source).await.unwrap();
    assert_eq!(raw.kind, SourceKind::Base64);

    let normalized = ImageNormalizer::new(10.0).normalize(raw).unwrap();
    assert_eq!(normalized.metadata.dimensions(), (5, 7));
    assert_eq!(normalized.metadata.mode, "RGBA");
}

#[tokio::test]
async fn test_gif_and_bmp_accepted() {
    let image = DynamicImage::new_rgba8(3, 3);
    for (format, expected) in [
        (image::ImageFormat::Gif, ImageFormat::Gif),
        (image::ImageFormat::Bmp, ImageFormat::Bmp),
    ] {
        let source = STANDARD.encode(encode(&image, format));
        let raw = resolver().resolve(&source).await.unwrap();
        let normalized = ImageNormalizer::new(10.0).normalize(raw).unwrap();
        assert_eq!(normalized.metadata.format, expected);
    }
}

#[tokio::test]
async fn test_normalized_image_encodes_to_jpeg_data_url() {
    let png = encode(&DynamicImage::new_rgba8(3000, 1500), image::ImageFormat::Png);
    let raw = RawImageBytes::new(png, SourceKind::File);

    let normalized = ImageNormalizer::new(20.0).normalize(raw).unwrap();
    let url = to_data_url(&normalized.image).unwrap();

    let back = resolver().resolve(&url).await.unwrap();
    let decoded = image::load_from_memory(&back.data).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (2048, 1024));
}
