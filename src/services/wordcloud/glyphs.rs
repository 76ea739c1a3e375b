use ab_glyph::{point, Font, FontVec, Glyph, PxScale, ScaleFont};
use image::{imageops, GrayImage, Luma};

/// Coverage bitmap of one word at one size, cropped to the tight bounding box.
pub struct WordSprite {
    pub bitmap: GrayImage,
}

impl WordSprite {
    pub fn width(&self) -> u32 {
        self.bitmap.width()
    }

    pub fn height(&self) -> u32 {
        self.bitmap.height()
    }
}

// Returns None when nothing of the word is drawable at this size (no outlines,
// or a degenerate bounding box).
pub fn rasterize_word(
    font: &FontVec,
    text: &str,
    px_size: f32,
    vertical: bool,
) -> Option<WordSprite> {
    let scaled = font.as_scaled(PxScale::from(px_size));

    let mut caret = point(0.0, scaled.ascent());
    let mut last_glyph: Option<Glyph> = None;
    let mut glyphs: Vec<Glyph> = vec![];
    for c in text.chars() {
        if c.is_control() {
            continue;
        }
        let mut glyph = scaled.scaled_glyph(c);
        if let Some(previous) = last_glyph.take() {
            caret.x += scaled.kern(previous.id, glyph.id);
        }
        glyph.position = caret;
        caret.x += scaled.h_advance(glyph.id);
        last_glyph = Some(glyph.clone());
        glyphs.push(glyph);
    }

    let outlined: Vec<_> = glyphs
        .into_iter()
        .filter_map(|glyph| font.outline_glyph(glyph))
        .collect();
    if outlined.is_empty() {
        return None;
    }

    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    let mut max_x = f32::MIN;
    let mut max_y = f32::MIN;
    for outline in &outlined {
        let bounds = outline.px_bounds();
        min_x = min_x.min(bounds.min.x);
        min_y = min_y.min(bounds.min.y);
        max_x = max_x.max(bounds.max.x);
        max_y = max_y.max(bounds.max.y);
    }

    let width = (max_x - min_x).ceil() as i64;
    let height = (max_y - min_y).ceil() as i64;
    if width <= 0 || height <= 0 {
        return None;
    }

    let mut bitmap = GrayImage::new(width as u32, height as u32);
    for outline in &outlined {
        let bounds = outline.px_bounds();
        let offset_x = (bounds.min.x - min_x).round() as i64;
        let offset_y = (bounds.min.y - min_y).round() as i64;

        outline.draw(|x, y, coverage| {
            let px = offset_x + x as i64;
            let py = offset_y + y as i64;
            if px < 0 || py < 0 || px >= width || py >= height {
                return;
            }

            let value = (coverage * 255.0) as u8;
            let current = bitmap.get_pixel(px as u32, py as u32).0[0];
            if value > current {
                bitmap.put_pixel(px as u32, py as u32, Luma([value]));
            }
        });
    }

    let bitmap = match vertical {
        true => imageops::rotate90(&bitmap),
        false => bitmap,
    };

    Some(WordSprite { bitmap })
}
