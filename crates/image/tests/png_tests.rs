use base::Vec2;
use image::{Image, PixelFormat, decode_image, encode_png, read_image, write_png};

#[tokio::test]
async fn test_png_gray_roundtrip_is_exact() {
    let data: Vec<u8> = (0..64).map(|i| (i * 4) as u8).collect();
    let image = Image::new(Vec2::new(8, 8), data, PixelFormat::Gray8);

    let encoded = encode_png(image.clone()).await.unwrap();
    assert_eq!(&encoded[1..4], b"PNG");

    let decoded = decode_image(&encoded).await.unwrap();
    assert_eq!(decoded, image);
}

#[tokio::test]
async fn test_png_encoding_is_deterministic() {
    let image = Image::filled(Vec2::new(16, 9), PixelFormat::Rgba8, &[1, 2, 3, 4]).unwrap();
    let a = encode_png(image.clone()).await.unwrap();
    let b = encode_png(image).await.unwrap();
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_write_then_read_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.png");
    let image = Image::filled(Vec2::new(3, 2), PixelFormat::Rgb8, &[9, 8, 7]).unwrap();

    write_png(&path, image.clone()).await.unwrap();
    let read = read_image(&path).await.unwrap();
    assert_eq!(read, image);
}

#[tokio::test]
async fn test_encode_rejects_inconsistent_buffer() {
    let image = Image::new(Vec2::new(3, 3), vec![0; 4], PixelFormat::Rgb8);
    assert!(encode_png(image).await.is_err());
}

#[tokio::test]
async fn test_decode_garbage_fails() {
    assert!(decode_image(b"definitely not an image").await.is_err());
}

#[tokio::test]
async fn test_read_missing_file_fails() {
    assert!(read_image("/nonexistent/input.webp").await.is_err());
}
