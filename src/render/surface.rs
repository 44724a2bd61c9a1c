//! Drawing surface: turns a layer list into pixels.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use ab_glyph::FontArc;
use image::RgbaImage;

use crate::canvas::{
    ArcShape, CircleShape, Colour, EllipseImageShape, EllipseShape, Font, Layer, Outline, Shape,
    TextShape,
};
use crate::error::{EaselError, Result};

use super::raster::{self, Bounds};
use super::text::draw_text;

/// A canvas-sized pixel buffer plus the layers and fonts to paint into it.
pub struct Surface {
    width: u32,
    height: u32,
    layers: Vec<Layer>,
    fonts: BTreeMap<String, FontArc>,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            layers: Vec::new(),
            fonts: BTreeMap::new(),
        }
    }

    pub fn add_layers(&mut self, layers: impl IntoIterator<Item = Layer>) {
        self.layers.extend(layers);
    }

    /// Read and parse font files, keyed by family.
    pub fn load_fonts<'a>(&mut self, fonts: impl IntoIterator<Item = &'a Font>) -> Result<()> {
        for font in fonts {
            let bytes = std::fs::read(font.path()).map_err(|e| EaselError::Render {
                message: format!("Failed to read font {}: {}", font.path().display(), e),
                help: Some(format!("Check the path given to $loadFont for {}", font.family())),
            })?;
            let parsed = FontArc::try_from_vec(bytes).map_err(|e| EaselError::Render {
                message: format!("Invalid font file {}: {}", font.path().display(), e),
                help: Some("Use a TrueType or OpenType font".to_string()),
            })?;
            self.fonts.insert(font.family().to_string(), parsed);
        }
        Ok(())
    }

    /// Paint every layer in order onto a transparent image.
    pub fn render_image(&self) -> Result<RgbaImage> {
        let mut image = RgbaImage::new(self.width, self.height);
        let mut sources: HashMap<&str, RgbaImage> = HashMap::new();

        for layer in &self.layers {
            let (x, y) = layer.position();
            match layer.shape() {
                Shape::Arc(arc) => paint_arc(&mut image, arc, x, y, layer.outline()),
                Shape::Circle(circle) => paint_circle(&mut image, circle, x, y, layer.outline()),
                Shape::Ellipse(ellipse) => paint_ellipse(&mut image, ellipse, x, y, layer.outline()),
                Shape::EllipseImage(shape) => {
                    if !sources.contains_key(shape.source.as_str()) {
                        sources.insert(&shape.source, load_source(&shape.source)?);
                    }
                    if let Some(source) = sources.get(shape.source.as_str()) {
                        paint_image(&mut image, shape, source, x, y, layer.outline());
                    }
                }
                Shape::Text(text) => self.paint_text(&mut image, text, x, y)?,
            }
        }

        Ok(image)
    }

    fn paint_text(&self, image: &mut RgbaImage, text: &TextShape, x: i32, y: i32) -> Result<()> {
        let font = self.fonts.get(&text.font).ok_or_else(|| EaselError::Render {
            message: format!("Font family {:?} is not loaded", text.font),
            help: Some(format!("Add $loadFont[{};<path>] before the text layer", text.font)),
        })?;
        draw_text(image, font, text, x, y);
        Ok(())
    }
}

/// Box `[left, top, right, bottom]` grown by `margin` on every side.
fn grown(image: &RgbaImage, left: f32, top: f32, right: f32, bottom: f32, margin: f32) -> Option<Bounds> {
    Bounds::clipped(left - margin, top - margin, right + margin, bottom + margin, image)
}

fn margin(stroke: f32, outline: Option<&Outline>) -> f32 {
    stroke.max(outline.map_or(0.0, |o| o.stroke() as f32)) + 1.0
}

fn paint_outline(
    image: &mut RgbaImage,
    bounds: Bounds,
    outline: Option<&Outline>,
    distance: impl Fn(f32, f32) -> Option<f32>,
) {
    if let Some(outline) = outline {
        let kind = outline.kind();
        let width = outline.stroke() as f32;
        raster::paint(image, bounds, outline.paint(), distance, |d| kind.covers(d, width));
    }
}

fn paint_arc(image: &mut RgbaImage, arc: &ArcShape, x: i32, y: i32, outline: Option<&Outline>) {
    let (cx, cy, r) = (x as f32, y as f32, arc.radius as f32);
    let Some(bounds) = grown(image, cx - r, cy - r, cx + r, cy + r, margin(arc.stroke, outline)) else {
        return;
    };

    let distance = |px: f32, py: f32| {
        let angle = raster::angle_of(px - cx, py - cy);
        raster::in_sweep(angle, arc.start_angle, arc.end_angle)
            .then(|| raster::circle(px, py, cx, cy, r))
    };
    raster::paint(image, bounds, arc.colour, distance, raster::body(arc.filled, arc.stroke));
    paint_outline(image, bounds, outline, distance);
}

fn paint_circle(image: &mut RgbaImage, circle: &CircleShape, x: i32, y: i32, outline: Option<&Outline>) {
    let r = circle.radius as f32;
    let (left, top) = (x as f32, y as f32);
    let (cx, cy) = (left + r, top + r);
    let Some(bounds) = grown(image, left, top, left + 2.0 * r, top + 2.0 * r, margin(circle.stroke, outline)) else {
        return;
    };

    let distance = |px: f32, py: f32| Some(raster::circle(px, py, cx, cy, r));
    raster::paint(image, bounds, circle.colour, distance, raster::body(circle.filled, circle.stroke));
    paint_outline(image, bounds, outline, distance);
}

/// Top-left corner of a `width` x `height` box centred on `(x, y)`.
fn centred_box(x: i32, y: i32, width: u32, height: u32) -> (f32, f32) {
    (
        x as f32 - (width / 2) as f32,
        y as f32 - (height / 2) as f32,
    )
}

fn paint_ellipse(image: &mut RgbaImage, ellipse: &EllipseShape, x: i32, y: i32, outline: Option<&Outline>) {
    let (w, h, r) = (ellipse.width as f32, ellipse.height as f32, ellipse.radius as f32);
    let (left, top) = centred_box(x, y, ellipse.width, ellipse.height);
    let Some(bounds) = grown(image, left, top, left + w, top + h, margin(ellipse.stroke, outline)) else {
        return;
    };

    let distance = |px: f32, py: f32| Some(raster::rounded_rect(px, py, left, top, w, h, r));
    raster::paint(image, bounds, ellipse.colour, distance, raster::body(ellipse.filled, ellipse.stroke));
    paint_outline(image, bounds, outline, distance);
}

fn paint_image(
    image: &mut RgbaImage,
    shape: &EllipseImageShape,
    source: &RgbaImage,
    x: i32,
    y: i32,
    outline: Option<&Outline>,
) {
    if shape.width == 0 || shape.height == 0 {
        return;
    }
    let (w, h, r) = (shape.width as f32, shape.height as f32, shape.radius as f32);
    let (left, top) = centred_box(x, y, shape.width, shape.height);
    let Some(bounds) = grown(image, left, top, left + w, top + h, margin(0.0, outline)) else {
        return;
    };

    let distance = |px: f32, py: f32| raster::rounded_rect(px, py, left, top, w, h, r);
    let (scale_x, scale_y) = (source.width() as f32 / w, source.height() as f32 / h);

    // Sample the source per visible pixel; the box itself may be far larger than the canvas.
    for (px, py) in bounds.pixels() {
        let (sx, sy) = raster::centre(px, py);
        if distance(sx, sy) > 0.0 || sx < left || sy < top || sx >= left + w || sy >= top + h {
            continue;
        }
        let colour = sample(source, (sx - left) * scale_x - 0.5, (sy - top) * scale_y - 0.5);
        raster::blend(image.get_pixel_mut(px, py), colour, 1.0);
    }

    paint_outline(image, bounds, outline, |px, py| Some(distance(px, py)));
}

/// Bilinear sample of `source` at `(x, y)` in source pixel coordinates,
/// clamped to the edges.
fn sample(source: &RgbaImage, x: f32, y: f32) -> Colour {
    let max_x = source.width().saturating_sub(1) as f32;
    let max_y = source.height().saturating_sub(1) as f32;
    let (x, y) = (x.clamp(0.0, max_x), y.clamp(0.0, max_y));
    let (x0, y0) = (x.floor(), y.floor());
    let (x1, y1) = ((x0 + 1.0).min(max_x), (y0 + 1.0).min(max_y));
    let (fx, fy) = (x - x0, y - y0);

    let texel = |tx: f32, ty: f32| source.get_pixel(tx as u32, ty as u32).0;
    let corners = [
        (texel(x0, y0), (1.0 - fx) * (1.0 - fy)),
        (texel(x1, y0), fx * (1.0 - fy)),
        (texel(x0, y1), (1.0 - fx) * fy),
        (texel(x1, y1), fx * fy),
    ];

    let channel = |i: usize| {
        let value: f32 = corners.iter().map(|(p, weight)| f32::from(p[i]) * weight).sum();
        value.round().clamp(0.0, 255.0) as u8
    };
    Colour::new(channel(0), channel(1), channel(2), channel(3))
}

/// Decode an image layer source. Only local files are supported.
fn load_source(source: &str) -> Result<RgbaImage> {
    let path = source_path(source)?;
    image::open(&path)
        .map(|img| img.to_rgba8())
        .map_err(|e| EaselError::Render {
            message: format!("Failed to load image {}: {}", path.display(), e),
            help: None,
        })
}

fn source_path(source: &str) -> Result<PathBuf> {
    let source = source.trim();
    if source.starts_with("http://") || source.starts_with("https://") {
        return Err(EaselError::Render {
            message: format!("Remote images are not supported: {}", source),
            help: Some("Download the image and pass its local path or a file:// URL".to_string()),
        });
    }
    Ok(Path::new(source.strip_prefix("file://").unwrap_or(source)).to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{LayerConfig, OutlineConfig, OutlineKind};

    fn layer(x: i32, y: i32, shape: Shape, outline: Option<Outline>) -> Layer {
        Layer::new(LayerConfig {
            id: Some("l".to_string()),
            x,
            y,
            shape,
            outline,
        })
        .unwrap()
    }

    fn render(width: u32, height: u32, layers: Vec<Layer>) -> RgbaImage {
        let mut surface = Surface::new(width, height);
        surface.add_layers(layers);
        surface.render_image().unwrap()
    }

    #[test]
    fn test_empty_surface_is_transparent() {
        let image = render(3, 2, vec![]);
        assert!(image.pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn test_circle_is_anchored_top_left() {
        let circle = Shape::Circle(CircleShape {
            radius: 5,
            colour: Colour::rgb(255, 0, 0),
            filled: true,
            stroke: 1.0,
        });
        let image = render(20, 20, vec![layer(2, 2, circle, None)]);

        assert_eq!(image.get_pixel(7, 7).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(2, 2).0[3], 0);
        assert_eq!(image.get_pixel(15, 15).0[3], 0);
    }

    #[test]
    fn test_unfilled_circle_leaves_centre_empty() {
        let ring = Shape::Circle(CircleShape {
            radius: 8,
            colour: Colour::BLACK,
            filled: false,
            stroke: 2.0,
        });
        let image = render(20, 20, vec![layer(0, 0, ring, None)]);

        assert_eq!(image.get_pixel(8, 8).0[3], 0);
        assert_eq!(image.get_pixel(8, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_ellipse_is_centred() {
        let rect = Shape::Ellipse(EllipseShape {
            width: 10,
            height: 4,
            radius: 0,
            colour: Colour::BLACK,
            filled: true,
            stroke: 1.0,
        });
        let image = render(20, 20, vec![layer(10, 10, rect, None)]);

        assert_eq!(image.get_pixel(5, 8).0[3], 255);
        assert_eq!(image.get_pixel(14, 11).0[3], 255);
        assert_eq!(image.get_pixel(4, 8).0[3], 0);
        assert_eq!(image.get_pixel(15, 8).0[3], 0);
        assert_eq!(image.get_pixel(10, 12).0[3], 0);
    }

    #[test]
    fn test_arc_sweep_limits_fill() {
        let quarter = Shape::Arc(ArcShape {
            radius: 8,
            colour: Colour::BLACK,
            filled: true,
            stroke: 1.0,
            start_angle: 0.0,
            end_angle: 90.0,
        });
        let image = render(20, 20, vec![layer(10, 10, quarter, None)]);

        // Lower right quadrant on a y-down grid
        assert_eq!(image.get_pixel(13, 13).0[3], 255);
        assert_eq!(image.get_pixel(6, 6).0[3], 0);
        assert_eq!(image.get_pixel(6, 13).0[3], 0);
    }

    #[test]
    fn test_outer_outline_sits_outside() {
        let outline = Outline::new(OutlineConfig {
            id: "o".to_string(),
            kind: OutlineKind::Outer,
            colour: Colour::rgb(0, 0, 255),
            alpha: 100,
            stroke: 2,
        })
        .unwrap();
        let rect = Shape::Ellipse(EllipseShape {
            width: 10,
            height: 10,
            radius: 0,
            colour: Colour::BLACK,
            filled: true,
            stroke: 1.0,
        });
        let image = render(20, 20, vec![layer(10, 10, rect, Some(outline))]);

        assert_eq!(image.get_pixel(10, 10).0, [0, 0, 0, 255]);
        assert_eq!(image.get_pixel(4, 10).0, [0, 0, 255, 255]);
        assert_eq!(image.get_pixel(2, 10).0[3], 0);
    }

    #[test]
    fn test_later_layers_paint_over_earlier() {
        let square = |colour| {
            Shape::Ellipse(EllipseShape {
                width: 6,
                height: 6,
                radius: 0,
                colour,
                filled: true,
                stroke: 1.0,
            })
        };
        let image = render(
            10,
            10,
            vec![
                layer(5, 5, square(Colour::rgb(255, 0, 0)), None),
                layer(5, 5, square(Colour::rgb(0, 255, 0)), None),
            ],
        );

        assert_eq!(image.get_pixel(5, 5).0, [0, 255, 0, 255]);
    }

    #[test]
    fn test_oversized_image_box_samples_visible_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                image::Rgba([255, 0, 0, 255])
            } else {
                image::Rgba([0, 0, 255, 255])
            }
        })
        .save(&path)
        .unwrap();

        let huge = Shape::EllipseImage(EllipseImageShape {
            width: crate::canvas::MAX_DIMENSION,
            height: crate::canvas::MAX_DIMENSION,
            radius: 0,
            source: path.display().to_string(),
        });
        let image = render(4, 4, vec![layer(2, 2, huge, None)]);

        // The canvas sits in the middle of the box, where the two source columns meet
        assert!(image.pixels().all(|p| p.0[3] == 255));
        assert_eq!(image.get_pixel(0, 0).0, image.get_pixel(0, 3).0);
        assert!(image.get_pixel(0, 0).0[0] >= image.get_pixel(3, 0).0[0]);

        let corner = Shape::EllipseImage(EllipseImageShape {
            width: crate::canvas::MAX_DIMENSION,
            height: 4,
            radius: 0,
            source: path.display().to_string(),
        });
        let image = render(4, 4, vec![layer(8192, 2, corner, None)]);
        assert_eq!(image.get_pixel(0, 1).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_remote_sources_are_rejected() {
        assert!(matches!(
            source_path("https://example.com/a.png"),
            Err(EaselError::Render { .. })
        ));
        assert_eq!(source_path("file:///tmp/a.png").unwrap(), PathBuf::from("/tmp/a.png"));
        assert_eq!(source_path(" a.png ").unwrap(), PathBuf::from("a.png"));
    }

    #[test]
    fn test_missing_font_is_render_error() {
        let text = Shape::Text(TextShape {
            font: "Nope".to_string(),
            size: 12.0,
            colour: Colour::BLACK,
            text: "hi".to_string(),
            align: Default::default(),
        });
        let mut surface = Surface::new(10, 10);
        surface.add_layers([layer(0, 5, text, None)]);

        assert!(matches!(surface.render_image(), Err(EaselError::Render { .. })));
    }
}
