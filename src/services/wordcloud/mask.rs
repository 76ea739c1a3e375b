use std::path::Path;

use anyhow::Context;
use image::{GrayImage, Luma};

const BLOCKED: u8 = 255;

/// Raster stencil for the cloud silhouette. Pure white pixels are off-limits,
/// every other pixel may receive words (the convention of the masks this tool
/// is fed).
#[derive(Debug, Clone)]
pub struct ShapeMask {
    cells: GrayImage,
}

impl ShapeMask {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let img = image::open(path)
            .with_context(|| format!("failed to open shape image {}", path.display()))?;
        let rgb = img.to_rgb8();

        let mut cells = GrayImage::new(rgb.width(), rgb.height());
        for (x, y, pixel) in rgb.enumerate_pixels() {
            let [r, g, b] = pixel.0;
            if r == 255 && g == 255 && b == 255 {
                cells.put_pixel(x, y, Luma([BLOCKED]));
            }
        }

        Ok(ShapeMask { cells })
    }

    pub fn from_cells(cells: GrayImage) -> Self {
        ShapeMask { cells }
    }

    pub fn width(&self) -> u32 {
        self.cells.width()
    }

    pub fn height(&self) -> u32 {
        self.cells.height()
    }

    pub fn is_blocked(&self, x: u32, y: u32) -> bool {
        self.cells.get_pixel(x, y).0[0] == BLOCKED
    }

    /// Free pixels bordering a blocked pixel, i.e. the inside edge of the
    /// silhouette. Used for the contour stroke.
    pub fn boundary(&self) -> Vec<(u32, u32)> {
        let (width, height) = (self.width(), self.height());
        let mut boundary = vec![];

        for y in 0..height {
            for x in 0..width {
                if self.is_blocked(x, y) {
                    continue;
                }

                let neighbours = [
                    (x.wrapping_sub(1), y),
                    (x + 1, y),
                    (x, y.wrapping_sub(1)),
                    (x, y + 1),
                ];
                let touches_blocked = neighbours
                    .iter()
                    .any(|&(nx, ny)| nx < width && ny < height && self.is_blocked(nx, ny));

                if touches_blocked {
                    boundary.push((x, y));
                }
            }
        }

        boundary
    }
}
