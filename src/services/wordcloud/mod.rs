mod glyphs;
mod grid;
mod mask;
mod tokenize;

pub use mask::ShapeMask;

use std::fs;

use ab_glyph::FontVec;
use anyhow::{bail, Context};
use image::{Rgba, RgbaImage};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::configuration::WordCloudSettings;

use glyphs::{rasterize_word, WordSprite};
use grid::OccupancyGrid;

pub enum Canvas {
    Dimensions { width: u32, height: u32 },
    Shape(ShapeMask),
}

pub struct WordCloud {
    settings: WordCloudSettings,
    font: FontVec,
}

struct PlacedWord {
    sprite: WordSprite,
    x: u32,
    y: u32,
    color: Rgba<u8>,
}

impl WordCloud {
    pub fn new(settings: &WordCloudSettings) -> anyhow::Result<Self> {
        if settings.font_step <= 0.0 {
            bail!("font_step must be positive");
        }
        if !(0.0..=1.0).contains(&settings.prefer_horizontal) {
            bail!("prefer_horizontal must be between 0 and 1");
        }

        let font_data = fs::read(&settings.font_path)
            .with_context(|| format!("failed to read font {}", settings.font_path.display()))?;
        let font =
            FontVec::try_from_vec(font_data).context("font file is not a usable TTF/OTF")?;

        Ok(WordCloud {
            settings: settings.clone(),
            font,
        })
    }

    pub fn render(&self, text: &str, canvas: Canvas) -> anyhow::Result<RgbaImage> {
        let words = tokenize::word_frequencies(text, self.settings.max_words);
        if words.is_empty() {
            bail!("no words left to lay out after tokenizing");
        }

        let background = parse_color(&self.settings.background_color)
            .context("invalid background_color setting")?;
        let contour =
            parse_color(&self.settings.contour_color).context("invalid contour_color setting")?;

        // The mask dictates the canvas size, as in the library the original
        // tool delegated to.
        let (width, height, mask) = match canvas {
            Canvas::Dimensions { width, height } => (width, height, None),
            Canvas::Shape(mask) => (mask.width(), mask.height(), Some(mask)),
        };
        if width == 0 || height == 0 {
            bail!("word cloud canvas has a zero dimension");
        }

        let mut grid = match &mask {
            Some(mask) => OccupancyGrid::from_mask(mask),
            None => OccupancyGrid::new(width, height),
        };

        let mut rng = match self.settings.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let placed = self.layout(&words, &mut grid, &mut rng);
        if placed.is_empty() {
            bail!("no word fits the canvas, is the shape large enough?");
        }
        log::info!("Placed {} of {} words", placed.len(), words.len());

        let mut image = RgbaImage::from_pixel(width, height, background);
        let inset = self.settings.word_margin / 2;
        for word in &placed {
            blend_sprite(&mut image, &word.sprite, word.x + inset, word.y + inset, word.color);
        }

        if let Some(mask) = &mask {
            if self.settings.contour_width > 0 {
                stroke_contour(&mut image, mask, self.settings.contour_width, contour);
            }
        }

        Ok(image)
    }

    // Largest-first placement: each word starts from a size scaled relative to
    // the previous word's frequency, then shrinks by font_step until it finds
    // a free spot in either orientation. Below min_font_size the canvas is
    // considered full.
    fn layout(
        &self,
        words: &[(String, usize)],
        grid: &mut OccupancyGrid,
        rng: &mut StdRng,
    ) -> Vec<PlacedWord> {
        let margin = self.settings.word_margin;
        let max_count = words[0].1 as f32;
        let relative_scaling = self.settings.relative_scaling;

        let mut placed: Vec<PlacedWord> = vec![];
        let mut font_size = self
            .settings
            .max_font_size
            .unwrap_or_else(|| grid_start_size(grid));
        let mut last_freq = 1.0f32;

        for (word, count) in words {
            let freq = *count as f32 / max_count;
            if relative_scaling > 0.0 {
                font_size = ((relative_scaling * (freq / last_freq) + (1.0 - relative_scaling))
                    * font_size)
                    .round();
            }

            let mut position = None;
            while font_size >= self.settings.min_font_size {
                let vertical = rng.gen_bool(1.0 - self.settings.prefer_horizontal);
                position = self.try_place(grid, rng, word, font_size, vertical, margin);
                if position.is_none() {
                    position = self.try_place(grid, rng, word, font_size, !vertical, margin);
                }
                if position.is_some() {
                    break;
                }
                font_size -= self.settings.font_step;
            }

            let Some((sprite, x, y)) = position else {
                // Canvas is full, everything after this word is smaller anyway.
                break;
            };

            debug_assert!(grid.is_free(x, y, sprite.width() + margin, sprite.height() + margin));
            grid.occupy_rect(x, y, sprite.width() + margin, sprite.height() + margin);
            placed.push(PlacedWord {
                sprite,
                x,
                y,
                color: random_color(rng),
            });
            last_freq = freq;
        }

        placed
    }

    fn try_place(
        &self,
        grid: &OccupancyGrid,
        rng: &mut StdRng,
        word: &str,
        font_size: f32,
        vertical: bool,
        margin: u32,
    ) -> Option<(WordSprite, u32, u32)> {
        let sprite = rasterize_word(&self.font, word, font_size, vertical)?;
        let (x, y) =
            grid.sample_free_position(rng, sprite.width() + margin, sprite.height() + margin)?;

        Some((sprite, x, y))
    }
}

fn grid_start_size(grid: &OccupancyGrid) -> f32 {
    (grid.height() as f32 / 4.0).max(1.0)
}

fn blend_sprite(image: &mut RgbaImage, sprite: &WordSprite, x: u32, y: u32, color: Rgba<u8>) {
    for (sx, sy, pixel) in sprite.bitmap.enumerate_pixels() {
        let coverage = pixel.0[0];
        if coverage == 0 {
            continue;
        }

        let px = x + sx;
        let py = y + sy;
        if px >= image.width() || py >= image.height() {
            continue;
        }

        let alpha = coverage as u32;
        let base = image.get_pixel(px, py).0;
        let blended = [
            lerp_channel(base[0], color.0[0], alpha),
            lerp_channel(base[1], color.0[1], alpha),
            lerp_channel(base[2], color.0[2], alpha),
            255,
        ];
        image.put_pixel(px, py, Rgba(blended));
    }
}

fn lerp_channel(base: u8, target: u8, alpha: u32) -> u8 {
    ((base as u32 * (255 - alpha) + target as u32 * alpha) / 255) as u8
}

fn stroke_contour(image: &mut RgbaImage, mask: &ShapeMask, width: u32, color: Rgba<u8>) {
    let radius = width.saturating_sub(1) as i64;
    for (x, y) in mask.boundary() {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let px = x as i64 + dx;
                let py = y as i64 + dy;
                if px < 0 || py < 0 || px >= image.width() as i64 || py >= image.height() as i64 {
                    continue;
                }
                image.put_pixel(px as u32, py as u32, color);
            }
        }
    }
}

// Random hue at fixed saturation and lightness, the default palette of the
// library the original tool delegated to.
fn random_color(rng: &mut StdRng) -> Rgba<u8> {
    let hue = rng.gen_range(0.0..360.0);
    let (r, g, b) = hsl_to_rgb(hue, 0.8, 0.5);

    Rgba([r, g, b, 255])
}

fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> (u8, u8, u8) {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let hue_sector = hue / 60.0;
    let x = chroma * (1.0 - (hue_sector % 2.0 - 1.0).abs());
    let m = lightness - chroma / 2.0;

    let (r, g, b) = match hue_sector {
        h if h < 1.0 => (chroma, x, 0.0),
        h if h < 2.0 => (x, chroma, 0.0),
        h if h < 3.0 => (0.0, chroma, x),
        h if h < 4.0 => (0.0, x, chroma),
        h if h < 5.0 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };

    (
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    )
}

fn parse_color(name: &str) -> anyhow::Result<Rgba<u8>> {
    let named = match name.to_lowercase().as_str() {
        "black" => Some([0, 0, 0]),
        "white" => Some([255, 255, 255]),
        "yellow" => Some([255, 255, 0]),
        "red" => Some([255, 0, 0]),
        "green" => Some([0, 128, 0]),
        "blue" => Some([0, 0, 255]),
        _ => None,
    };
    if let Some([r, g, b]) = named {
        return Ok(Rgba([r, g, b, 255]));
    }

    match name.strip_prefix('#') {
        Some(hex) if hex.len() == 6 && hex.is_ascii() => {
            let r = u8::from_str_radix(&hex[0..2], 16)?;
            let g = u8::from_str_radix(&hex[2..4], 16)?;
            let b = u8::from_str_radix(&hex[4..6], 16)?;
            Ok(Rgba([r, g, b, 255]))
        }
        _ => bail!("unknown color '{}'", name),
    }
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::{hsl_to_rgb, parse_color};

    #[test]
    fn parses_named_colors() {
        assert_eq!(parse_color("black").unwrap(), Rgba([0, 0, 0, 255]));
        assert_eq!(parse_color("Yellow").unwrap(), Rgba([255, 255, 0, 255]));
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_color("#1a2b3c").unwrap(), Rgba([26, 43, 60, 255]));
    }

    #[test]
    fn rejects_unknown_colors() {
        assert!(parse_color("chartreuse-ish").is_err());
        assert!(parse_color("#12345").is_err());
    }

    #[test]
    fn hsl_primaries() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), (255, 0, 0));
        assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5), (0, 255, 0));
        assert_eq!(hsl_to_rgb(240.0, 1.0, 0.5), (0, 0, 255));
    }
}
