use base::Vec2;
use image::{Image, ImageError, PixelFormat, image_to_u32};

#[test]
fn test_image_new_rgb8() {
    let size = Vec2::new(2, 3);
    let data: Vec<u8> = (0..18).collect();
    let image = Image::new(size, data.clone(), PixelFormat::Rgb8);

    assert_eq!(image.width(), 2);
    assert_eq!(image.height(), 3);
    assert_eq!(image.data, data);
    assert!(image.validate().is_ok());
}

#[test]
fn test_validate_rejects_short_buffer() {
    let image = Image::new(Vec2::new(4, 4), vec![0; 10], PixelFormat::Rgba8);
    match image.validate() {
        Err(ImageError::Size { expected, got }) => {
            assert_eq!(expected, 64);
            assert_eq!(got, 10);
        }
        other => panic!("Expected ImageError::Size, got {:?}", other),
    }
}

#[test]
fn test_blank_rgba_is_transparent() {
    let image = Image::blank(Vec2::new(3, 2), PixelFormat::Rgba8).unwrap();
    assert_eq!(image.data.len(), 24);
    assert!(image.data.iter().all(|&v| v == 0));
    assert!(Image::blank(Vec2::new(3, 2), PixelFormat::Jpeg).is_err());
}

#[test]
fn test_filled_repeats_pixel() {
    let image = Image::filled(Vec2::new(2, 1), PixelFormat::Rgb8, &[1, 2, 3]).unwrap();
    assert_eq!(image.data, vec![1, 2, 3, 1, 2, 3]);
    assert!(Image::filled(Vec2::new(2, 1), PixelFormat::Rgb8, &[1, 2]).is_err());
}

#[test]
fn test_yuyv_to_rgb_gray_and_white() {
    // two macro-pixels: mid gray pair, then white and black
    let image = Image::new(
        Vec2::new(2, 2),
        vec![128, 128, 128, 128, 255, 128, 0, 128],
        PixelFormat::Yuyv,
    );
    let rgb = image.to_rgb().unwrap();
    assert_eq!(rgb.format, PixelFormat::Rgb8);
    assert_eq!(&rgb.data[0..6], &[128, 128, 128, 128, 128, 128]);
    assert_eq!(&rgb.data[6..12], &[255, 255, 255, 0, 0, 0]);
}

#[test]
fn test_gray_to_rgba_is_opaque() {
    let image = Image::new(Vec2::new(2, 1), vec![10, 200], PixelFormat::Gray8);
    let rgba = image.to_rgba().unwrap();
    assert_eq!(rgba.data, vec![10, 10, 10, 255, 200, 200, 200, 255]);
}

#[test]
fn test_image_to_u32_packs_argb() {
    let rgb = Image::new(Vec2::new(2, 1), vec![255, 0, 0, 0, 0, 255], PixelFormat::Rgb8);
    assert_eq!(image_to_u32(&rgb).unwrap(), vec![0xFFFF0000, 0xFF0000FF]);

    let gray = Image::new(Vec2::new(1, 1), vec![0x40], PixelFormat::Gray8);
    assert_eq!(image_to_u32(&gray).unwrap(), vec![0xFF404040]);

    let rgba = Image::new(Vec2::new(1, 1), vec![1, 2, 3, 0], PixelFormat::Rgba8);
    assert_eq!(image_to_u32(&rgba).unwrap(), vec![0xFF010203]);
}

#[test]
fn test_corrupt_jpeg_fails_to_convert() {
    let image = Image::new(Vec2::new(4, 4), b"not a jpeg".to_vec(), PixelFormat::Jpeg);
    assert!(matches!(image.to_rgb(), Err(ImageError::Decode(_))));
}
