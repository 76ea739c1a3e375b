use rand::Rng;

use super::mask::ShapeMask;

/// Summed-area table over occupied cells. Region queries are O(1); the table
/// is refreshed after every placement.
pub struct OccupancyGrid {
    width: usize,
    height: usize,
    occupied: Vec<bool>,
    integral: Vec<u32>,
}

impl OccupancyGrid {
    pub fn new(width: u32, height: u32) -> Self {
        let (width, height) = (width as usize, height as usize);

        OccupancyGrid {
            width,
            height,
            occupied: vec![false; width * height],
            integral: vec![0; (width + 1) * (height + 1)],
        }
    }

    pub fn height(&self) -> u32 {
        self.height as u32
    }

    pub fn from_mask(mask: &ShapeMask) -> Self {
        let mut grid = OccupancyGrid::new(mask.width(), mask.height());
        for y in 0..grid.height {
            for x in 0..grid.width {
                grid.occupied[y * grid.width + x] = mask.is_blocked(x as u32, y as u32);
            }
        }
        grid.rebuild_integral();

        grid
    }

    fn rebuild_integral(&mut self) {
        let stride = self.width + 1;
        for y in 0..self.height {
            for x in 0..self.width {
                let cell = self.occupied[y * self.width + x] as u32;
                let idx = (y + 1) * stride + (x + 1);
                self.integral[idx] =
                    cell + self.integral[idx - 1] + self.integral[idx - stride]
                        - self.integral[idx - stride - 1];
            }
        }
    }

    fn region_sum(&self, x: usize, y: usize, w: usize, h: usize) -> u32 {
        let stride = self.width + 1;
        let (x2, y2) = (x + w, y + h);

        self.integral[y2 * stride + x2] + self.integral[y * stride + x]
            - self.integral[y * stride + x2]
            - self.integral[y2 * stride + x]
    }

    pub fn is_free(&self, x: u32, y: u32, w: u32, h: u32) -> bool {
        let (x, y, w, h) = (x as usize, y as usize, w as usize, h as usize);
        if x + w > self.width || y + h > self.height {
            return false;
        }

        self.region_sum(x, y, w, h) == 0
    }

    /// Uniform draw among every position where a w*h rect fits entirely in
    /// free cells, without materializing the candidate list.
    pub fn sample_free_position<R: Rng>(&self, rng: &mut R, w: u32, h: u32) -> Option<(u32, u32)> {
        let (w, h) = (w as usize, h as usize);
        if w == 0 || h == 0 || w > self.width || h > self.height {
            return None;
        }

        let mut chosen = None;
        let mut candidates = 0u32;
        for y in 0..=(self.height - h) {
            for x in 0..=(self.width - w) {
                if self.region_sum(x, y, w, h) != 0 {
                    continue;
                }
                candidates += 1;
                if rng.gen_range(0..candidates) == 0 {
                    chosen = Some((x as u32, y as u32));
                }
            }
        }

        chosen
    }

    pub fn occupy_rect(&mut self, x: u32, y: u32, w: u32, h: u32) {
        let (x, y) = (x as usize, y as usize);
        let w = (w as usize).min(self.width - x);
        let h = (h as usize).min(self.height - y);

        for yy in y..y + h {
            for xx in x..x + w {
                self.occupied[yy * self.width + xx] = true;
            }
        }
        self.rebuild_integral();
    }
}

#[cfg(test)]
mod tests {
    use image::{GrayImage, Luma};
    use rand::{rngs::StdRng, SeedableRng};

    use super::{OccupancyGrid, ShapeMask};

    #[test]
    fn fresh_grid_is_free_everywhere() {
        let grid = OccupancyGrid::new(10, 10);

        assert!(grid.is_free(0, 0, 10, 10));
        assert!(grid.is_free(3, 4, 2, 2));
    }

    #[test]
    fn occupied_rect_blocks_overlapping_queries() {
        let mut grid = OccupancyGrid::new(10, 10);
        grid.occupy_rect(2, 2, 3, 3);

        assert!(!grid.is_free(0, 0, 10, 10));
        assert!(!grid.is_free(4, 4, 2, 2));
        assert!(grid.is_free(5, 5, 5, 5));
        assert!(grid.is_free(0, 0, 2, 10));
    }

    #[test]
    fn oversized_region_is_not_free() {
        let grid = OccupancyGrid::new(5, 5);

        assert!(!grid.is_free(0, 0, 6, 5));
        assert!(!grid.is_free(4, 4, 2, 2));
    }

    #[test]
    fn sampling_respects_occupancy() {
        let mut grid = OccupancyGrid::new(6, 6);
        grid.occupy_rect(0, 0, 6, 3);

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let (x, y) = grid.sample_free_position(&mut rng, 3, 3).unwrap();
            assert!(y >= 3);
            assert!(x <= 3);
        }
    }

    #[test]
    fn sampling_a_full_grid_yields_nothing() {
        let mut grid = OccupancyGrid::new(4, 4);
        grid.occupy_rect(0, 0, 4, 4);

        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(grid.sample_free_position(&mut rng, 1, 1), None);
        assert_eq!(grid.sample_free_position(&mut rng, 5, 1), None);
    }

    #[test]
    fn mask_blocked_cells_start_occupied() {
        let mut cells = GrayImage::new(4, 4);
        for y in 0..4 {
            cells.put_pixel(0, y, Luma([255]));
        }
        let grid = OccupancyGrid::from_mask(&ShapeMask::from_cells(cells));

        assert!(!grid.is_free(0, 0, 1, 1));
        assert!(grid.is_free(1, 0, 3, 4));
    }
}
