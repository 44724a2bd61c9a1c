//! Text layout and glyph rasterisation.

use ab_glyph::{point, Font, FontArc, GlyphId, ScaleFont};
use image::RgbaImage;

use crate::canvas::TextShape;

use super::raster::blend;

/// A glyph positioned relative to the start of its line's baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Placed {
    id: GlyphId,
    x: f32,
}

/// Lay out one line with kerning. Returns the glyphs and the line's advance.
fn layout_line(font: &FontArc, size: f32, line: &str) -> (Vec<Placed>, f32) {
    let scaled = font.as_scaled(size);
    let mut glyphs = Vec::with_capacity(line.len());
    let mut cursor = 0.0f32;
    let mut previous: Option<GlyphId> = None;

    for ch in line.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = previous {
            cursor += scaled.kern(prev, id);
        }
        glyphs.push(Placed { id, x: cursor });
        cursor += scaled.h_advance(id);
        previous = Some(id);
    }

    (glyphs, cursor)
}

/// Draw `shape` with the first line's baseline starting at `(x, y)`.
///
/// Each line is aligned on its own; later lines step down by the font's
/// line height.
pub fn draw_text(image: &mut RgbaImage, font: &FontArc, shape: &TextShape, x: i32, y: i32) {
    let scaled = font.as_scaled(shape.size);
    let line_height = scaled.height() + scaled.line_gap();

    for (index, line) in shape.text.split('\n').enumerate() {
        let (glyphs, advance) = layout_line(font, shape.size, line);
        let origin_x = x as f32 - advance * shape.align.offset_factor();
        let baseline = y as f32 + index as f32 * line_height;

        for placed in glyphs {
            let glyph = placed
                .id
                .with_scale_and_position(shape.size, point(origin_x + placed.x, baseline));
            let Some(outlined) = font.outline_glyph(glyph) else {
                continue;
            };

            let bounds = outlined.px_bounds();
            if bounds.max.x < 0.0
                || bounds.max.y < 0.0
                || bounds.min.x >= image.width() as f32
                || bounds.min.y >= image.height() as f32
            {
                continue;
            }
            outlined.draw(|gx, gy, coverage| {
                let px = bounds.min.x as i32 + gx as i32;
                let py = bounds.min.y as i32 + gy as i32;
                if px < 0 || py < 0 || px >= image.width() as i32 || py >= image.height() as i32 {
                    return;
                }
                blend(image.get_pixel_mut(px as u32, py as u32), shape.colour, coverage);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Colour, TextAlign};

    /// A font shipped with most Linux images; tests skip when it is absent.
    fn system_font() -> Option<FontArc> {
        let bytes = std::fs::read("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf").ok()?;
        FontArc::try_from_vec(bytes).ok()
    }

    fn shape(text: &str, align: TextAlign) -> TextShape {
        TextShape {
            font: "DejaVu".to_string(),
            size: 20.0,
            colour: Colour::BLACK,
            text: text.to_string(),
            align,
        }
    }

    fn inked_columns(image: &RgbaImage) -> Option<(u32, u32)> {
        let xs: Vec<u32> = image
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0[3] > 0)
            .map(|(x, _, _)| x)
            .collect();
        Some((*xs.iter().min()?, *xs.iter().max()?))
    }

    #[test]
    fn test_layout_advances() {
        let Some(font) = system_font() else { return };
        let (glyphs, advance) = layout_line(&font, 20.0, "ab");

        assert_eq!(glyphs.len(), 2);
        assert_eq!(glyphs[0].x, 0.0);
        assert!(glyphs[1].x > 0.0);
        assert!(advance > glyphs[1].x);
    }

    #[test]
    fn test_draw_text_inks_near_origin() {
        let Some(font) = system_font() else { return };
        let mut image = RgbaImage::new(100, 40);
        draw_text(&mut image, &font, &shape("Hi", TextAlign::Left), 10, 30);

        let (min_x, _) = inked_columns(&image).unwrap();
        assert!((9..=14).contains(&min_x), "text starts at {}", min_x);
    }

    #[test]
    fn test_right_alignment_ends_at_origin() {
        let Some(font) = system_font() else { return };
        let mut image = RgbaImage::new(100, 40);
        draw_text(&mut image, &font, &shape("Hi", TextAlign::Right), 90, 30);

        let (_, max_x) = inked_columns(&image).unwrap();
        assert!(max_x <= 90, "text ends at {}", max_x);
        assert!(max_x >= 80);
    }

    #[test]
    fn test_off_image_glyphs_are_skipped() {
        let Some(font) = system_font() else { return };
        let mut image = RgbaImage::new(20, 20);
        let huge = TextShape {
            size: crate::canvas::MAX_FONT_SIZE,
            ..shape("WWWW", TextAlign::Left)
        };
        draw_text(&mut image, &font, &huge, 40, -4000);
        draw_text(&mut image, &font, &huge, -20000, 10);

        assert!(image.pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn test_large_glyph_is_clipped_to_image() {
        let Some(font) = system_font() else { return };
        let mut image = RgbaImage::new(20, 20);
        let huge = TextShape {
            size: crate::canvas::MAX_FONT_SIZE,
            ..shape("I", TextAlign::Left)
        };
        draw_text(&mut image, &font, &huge, -200, 1000);

        assert!(image.pixels().all(|p| p.0[3] > 250));
    }
}
