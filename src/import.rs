//! Label image import.
//!
//! Builds a feature grid from a PNG where every distinct colour marks one
//! feature. Fully transparent pixels are background. Colours get ids in the
//! order they are first met scanning rows top to bottom, and their hex code
//! (`#rrggbb`, or `#rrggbbaa` when translucent) as key. Each feature carries a
//! single `color` field holding that same hex code.

use crate::grid::{FeatureId, GridBuffer};
use crate::models::FeatureRecord;
use image::{Rgba, RgbaImage};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Field every imported feature carries.
pub const COLOR_FIELD: &str = "color";

/// Error type for label image import
#[derive(Debug, Error)]
pub enum ImportError {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Image decoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Hex key for an RGBA colour.
pub fn color_key(pixel: &Rgba<u8>) -> String {
    let [r, g, b, a] = pixel.0;
    if a == 255 {
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    } else {
        format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
    }
}

/// Convert a decoded label image into a feature grid.
pub fn grid_from_image(image: &RgbaImage) -> GridBuffer {
    let (width, height) = image.dimensions();
    let mut grid = GridBuffer::new(width as usize, height as usize);
    grid.add_field(COLOR_FIELD);

    let mut ids: HashMap<[u8; 4], FeatureId> = HashMap::new();
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel.0[3] == 0 {
            continue;
        }
        let next = ids.len() as FeatureId + 1;
        let id = *ids.entry(pixel.0).or_insert_with(|| {
            let key = color_key(pixel);
            grid.insert_feature(next, key.clone(), FeatureRecord::new().with(COLOR_FIELD, key));
            next
        });
        grid.set(x as usize, y as usize, id);
    }

    log::debug!("imported {}x{} label image with {} features", width, height, ids.len());
    grid
}

/// Load a PNG label image into a feature grid.
pub fn import_png<P: AsRef<Path>>(path: P) -> Result<GridBuffer, ImportError> {
    let image = image::open(path.as_ref())?.to_rgba8();
    Ok(grid_from_image(&image))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{ResolvedKey, BASE_ID};
    use crate::models::FeatureValue;
    use tempfile::TempDir;

    fn label_image() -> RgbaImage {
        let mut image = RgbaImage::new(3, 2);
        image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        image.put_pixel(1, 0, Rgba([0, 128, 255, 128]));
        image.put_pixel(2, 1, Rgba([255, 0, 0, 255]));
        image
    }

    #[test]
    fn test_color_key() {
        assert_eq!(color_key(&Rgba([255, 0, 16, 255])), "#ff0010");
        assert_eq!(color_key(&Rgba([0, 0, 0, 128])), "#00000080");
    }

    #[test]
    fn test_grid_from_image() {
        let grid = grid_from_image(&label_image());
        assert_eq!(grid.get(0, 0), Some(1));
        assert_eq!(grid.get(1, 0), Some(2));
        assert_eq!(grid.get(2, 0), Some(BASE_ID));
        assert_eq!(grid.get(2, 1), Some(1));
        assert_eq!(grid.fields(), &[COLOR_FIELD.to_string()]);

        let view = grid.view();
        assert_eq!(view.resolve_key(2), Some(ResolvedKey::Feature("#0080ff80")));
        assert_eq!(
            view.feature("#ff0000").unwrap().get(COLOR_FIELD),
            Some(&FeatureValue::from("#ff0000"))
        );
    }

    #[test]
    fn test_import_png_roundtrip_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("labels.png");
        label_image().save(&path).unwrap();

        let grid = import_png(&path).unwrap();
        assert_eq!((grid.width(), grid.height()), (3, 2));
        assert_eq!(grid.get(1, 0), Some(2));
    }

    #[test]
    fn test_import_missing_file() {
        assert!(import_png("/nonexistent/labels.png").is_err());
    }
}
