//! Paintable layers and their shape variants.

use std::fmt;
use std::str::FromStr;

use crate::error::{EaselError, Result};

use super::id::{make_id, LAYER_ID_LENGTH};
use super::{Colour, Outline, MAX_DIMENSION};

/// Largest accepted font size, in pixels.
pub const MAX_FONT_SIZE: f32 = 2048.0;

/// Horizontal text alignment relative to the layer's x coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Start,
    End,
}

impl TextAlign {
    pub const NAMES: [&'static str; 5] = ["left", "center", "right", "start", "end"];

    pub fn name(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
            TextAlign::Start => "start",
            TextAlign::End => "end",
        }
    }

    /// Fraction of the text advance that sits left of the anchor.
    ///
    /// `start` and `end` follow left-to-right direction.
    pub fn offset_factor(self) -> f32 {
        match self {
            TextAlign::Left | TextAlign::Start => 0.0,
            TextAlign::Center => 0.5,
            TextAlign::Right | TextAlign::End => 1.0,
        }
    }
}

impl FromStr for TextAlign {
    type Err = EaselError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "left" => Ok(TextAlign::Left),
            "center" => Ok(TextAlign::Center),
            "right" => Ok(TextAlign::Right),
            "start" => Ok(TextAlign::Start),
            "end" => Ok(TextAlign::End),
            _ => Err(EaselError::Parse {
                message: format!("Unknown text alignment: {}", s),
                help: Some(format!("Use one of: {}", Self::NAMES.join(", "))),
            }),
        }
    }
}

impl fmt::Display for TextAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A circular arc or pie, centred on the layer position.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcShape {
    pub radius: u32,
    pub colour: Colour,
    pub filled: bool,
    pub stroke: f32,
    /// Degrees, clockwise from the positive x axis.
    pub start_angle: f32,
    pub end_angle: f32,
}

/// A circle whose bounding box starts at the layer position.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleShape {
    pub radius: u32,
    pub colour: Colour,
    pub filled: bool,
    pub stroke: f32,
}

/// A rounded rectangle centred on the layer position.
#[derive(Debug, Clone, PartialEq)]
pub struct EllipseShape {
    pub width: u32,
    pub height: u32,
    /// Corner radius
    pub radius: u32,
    pub colour: Colour,
    pub filled: bool,
    pub stroke: f32,
}

/// An image clipped to a rounded rectangle centred on the layer position.
#[derive(Debug, Clone, PartialEq)]
pub struct EllipseImageShape {
    pub width: u32,
    pub height: u32,
    pub radius: u32,
    /// Local path or `file://` URL
    pub source: String,
}

/// A run of text whose baseline starts at the layer position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextShape {
    /// Font family, resolved against the canvas fonts at render time
    pub font: String,
    pub size: f32,
    pub colour: Colour,
    pub text: String,
    pub align: TextAlign,
}

/// Shape-specific geometry and style of a layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Arc(ArcShape),
    Circle(CircleShape),
    Ellipse(EllipseShape),
    EllipseImage(EllipseImageShape),
    Text(TextShape),
}

impl Shape {
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Arc(_) => "arc",
            Shape::Circle(_) => "circle",
            Shape::Ellipse(_) => "ellipse",
            Shape::EllipseImage(_) => "ellipse-image",
            Shape::Text(_) => "text",
        }
    }

    fn check(&self) -> Result<()> {
        let stroke = match self {
            Shape::Arc(arc) => {
                finite("start angle", arc.start_angle)?;
                finite("end angle", arc.end_angle)?;
                extent("Radius", arc.radius)?;
                Some(arc.stroke)
            }
            Shape::Circle(circle) => {
                extent("Radius", circle.radius)?;
                Some(circle.stroke)
            }
            Shape::Ellipse(ellipse) => {
                extent("Width", ellipse.width)?;
                extent("Height", ellipse.height)?;
                extent("Radius", ellipse.radius)?;
                Some(ellipse.stroke)
            }
            Shape::EllipseImage(image) => {
                extent("Width", image.width)?;
                extent("Height", image.height)?;
                extent("Radius", image.radius)?;
                if image.source.trim().is_empty() {
                    return Err(EaselError::invalid_parameter("layer", "image URL", ""));
                }
                None
            }
            Shape::Text(text) => {
                if !(text.size.is_finite() && text.size > 0.0 && text.size <= MAX_FONT_SIZE) {
                    return Err(EaselError::invalid_parameter(
                        "layer",
                        format!("Font Size above 0 and at most {}", MAX_FONT_SIZE),
                        text.size.to_string(),
                    ));
                }
                None
            }
        };

        if let Some(stroke) = stroke {
            if !(stroke.is_finite() && (0.0..=MAX_DIMENSION as f32).contains(&stroke)) {
                return Err(EaselError::invalid_parameter(
                    "layer",
                    format!("Stroke between 0 and {}", MAX_DIMENSION),
                    stroke.to_string(),
                ));
            }
        }
        Ok(())
    }
}

fn finite(what: &str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(EaselError::invalid_parameter("layer", what, value.to_string()))
    }
}

/// Sizes share the canvas limit.
fn extent(name: &str, value: u32) -> Result<()> {
    if value <= MAX_DIMENSION {
        Ok(())
    } else {
        Err(EaselError::invalid_parameter(
            "layer",
            format!("{} at most {}", name, MAX_DIMENSION),
            value.to_string(),
        ))
    }
}

/// Field-by-field description of a layer, validated by [`Layer::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct LayerConfig {
    /// Explicit identifier; generated when `None`.
    pub id: Option<String>,
    pub x: i32,
    pub y: i32,
    pub shape: Shape,
    pub outline: Option<Outline>,
}

/// One paintable element of a canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    id: String,
    x: i32,
    y: i32,
    shape: Shape,
    outline: Option<Outline>,
}

impl Layer {
    pub fn new(config: LayerConfig) -> Result<Self> {
        config.shape.check()?;

        let id = match config.id {
            Some(id) if !id.is_empty() => id,
            _ => make_id(LAYER_ID_LENGTH),
        };

        Ok(Self {
            id,
            x: config.x,
            y: config.y,
            shape: config.shape,
            outline: config.outline,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn outline(&self) -> Option<&Outline> {
        self.outline.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle(stroke: f32) -> Shape {
        Shape::Circle(CircleShape {
            radius: 10,
            colour: Colour::BLACK,
            filled: true,
            stroke,
        })
    }

    #[test]
    fn test_layer_keeps_explicit_id() {
        let layer = Layer::new(LayerConfig {
            id: Some("Badge 1".to_string()),
            x: 1,
            y: 2,
            shape: circle(1.0),
            outline: None,
        })
        .unwrap();

        assert_eq!(layer.id(), "Badge 1");
        assert_eq!(layer.position(), (1, 2));
        assert_eq!(layer.shape().kind(), "circle");
    }

    #[test]
    fn test_layer_generates_id() {
        let layer = Layer::new(LayerConfig {
            id: None,
            x: 0,
            y: 0,
            shape: circle(1.0),
            outline: None,
        })
        .unwrap();

        let (_, suffix) = layer.id().split_once('-').unwrap();
        assert_eq!(suffix.len(), LAYER_ID_LENGTH);
    }

    #[test]
    fn test_layer_rejects_negative_stroke() {
        let err = Layer::new(LayerConfig {
            id: None,
            x: 0,
            y: 0,
            shape: circle(-1.0),
            outline: None,
        });
        assert!(err.is_err());
    }

    #[test]
    fn test_layer_rejects_oversized_shapes() {
        let image = Shape::EllipseImage(EllipseImageShape {
            width: 3_000_000_000,
            height: 10,
            radius: 0,
            source: "a.png".to_string(),
        });
        let text = Shape::Text(TextShape {
            font: "D".to_string(),
            size: 10_000_000.0,
            colour: Colour::BLACK,
            text: "W".to_string(),
            align: TextAlign::Left,
        });

        for shape in [image, text, circle(MAX_DIMENSION as f32 + 1.0)] {
            let result = Layer::new(LayerConfig {
                id: None,
                x: 0,
                y: 0,
                shape,
                outline: None,
            });
            assert!(matches!(result, Err(EaselError::InvalidParameter { .. })));
        }
    }

    #[test]
    fn test_text_align_offsets() {
        assert_eq!("center".parse::<TextAlign>().unwrap().offset_factor(), 0.5);
        assert_eq!(TextAlign::End.offset_factor(), 1.0);
        assert!("Center".parse::<TextAlign>().is_err());
    }
}
