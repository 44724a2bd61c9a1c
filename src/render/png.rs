//! Image persistence.

use std::path::Path;

use image::{ImageFormat, RgbaImage};

use crate::error::{EaselError, Result};

/// Supported output encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageEncoding {
    #[default]
    Png,
}

impl ImageEncoding {
    fn format(self) -> ImageFormat {
        match self {
            ImageEncoding::Png => ImageFormat::Png,
        }
    }
}

/// Write an image to `path`, creating parent directories and overwriting
/// any existing file.
pub fn save_image(image: &RgbaImage, encoding: ImageEncoding, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| EaselError::Io {
            path: parent.to_path_buf(),
            message: format!("Failed to create output directory: {}", e),
        })?;
    }

    image
        .save_with_format(path, encoding.format())
        .map_err(|e| EaselError::Render {
            message: format!("Failed to write {}: {}", path.display(), e),
            help: Some("Check that the output location is writable".to_string()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::tempdir;

    #[test]
    fn test_save_png() {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        image.put_pixel(1, 0, Rgba([255, 0, 0, 128]));

        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.png");
        save_image(&image, ImageEncoding::Png, &path).unwrap();

        let read = image::open(&path).unwrap().to_rgba8();
        assert_eq!(read.dimensions(), (2, 1));
        assert_eq!(read.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(read.get_pixel(1, 0).0, [255, 0, 0, 128]);
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.png");

        save_image(&RgbaImage::new(4, 4), ImageEncoding::Png, &path).unwrap();
        save_image(&RgbaImage::new(2, 3), ImageEncoding::Png, &path).unwrap();

        let read = image::open(&path).unwrap();
        assert_eq!((read.width(), read.height()), (2, 3));
    }
}
