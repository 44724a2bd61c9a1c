//! In-memory canvas model.
//!
//! A canvas accumulates layers, outlines and fonts as scoped commands run:
//! - `CanvasState` - dimensions, ordered layers, named outlines, fonts
//! - `Layer` / `Shape` - the paintable variants
//! - `Outline` - named stroke styles layers can opt into
//! - `Font` - font files available to text layers

mod colour;
mod font;
pub mod id;
mod layer;
mod outline;

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::error::{EaselError, Result};

pub use colour::Colour;
pub use font::{Font, FontConfig, FontWeight};
pub use id::make_id;
pub use layer::{
    ArcShape, CircleShape, EllipseImageShape, EllipseShape, Layer, LayerConfig, Shape,
    TextAlign, TextShape, MAX_FONT_SIZE,
};
pub use outline::{Outline, OutlineConfig, OutlineKind};

/// Largest accepted canvas width or height.
pub const MAX_DIMENSION: u32 = 16384;

/// Lifecycle stage of a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanvasStatus {
    /// Created with validated dimensions, nothing added yet
    Dimensioned,
    /// At least one layer, outline or font added
    Populated,
    /// Rendered at least once
    Rendered,
}

/// The accumulating model of one image composition.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasState {
    id: String,
    width: u32,
    height: u32,
    layers: Vec<Layer>,
    fonts: BTreeMap<String, Font>,
    outlines: HashMap<String, Outline>,
    status: CanvasStatus,
    renders: u32,
}

impl CanvasState {
    /// Create an empty canvas. Both dimensions must be in `1..=MAX_DIMENSION`.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        for (name, value) in [("width", width), ("height", height)] {
            if value == 0 || value > MAX_DIMENSION {
                return Err(EaselError::invalid_parameter(
                    "canvas",
                    format!("{} between 1 and {}", name, MAX_DIMENSION),
                    value.to_string(),
                ));
            }
        }

        let id = make_id(id::CANVAS_ID_LENGTH);
        debug!(canvas = %id, width, height, "created canvas");

        Ok(Self {
            id,
            width,
            height,
            layers: Vec::new(),
            fonts: BTreeMap::new(),
            outlines: HashMap::new(),
            status: CanvasStatus::Dimensioned,
            renders: 0,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn status(&self) -> CanvasStatus {
        self.status
    }

    /// Number of completed renders.
    pub fn renders(&self) -> u32 {
        self.renders
    }

    /// Layers in paint order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id() == id)
    }

    /// Fonts ordered by family.
    pub fn fonts(&self) -> impl Iterator<Item = &Font> {
        self.fonts.values()
    }

    pub fn font(&self, family: &str) -> Option<&Font> {
        self.fonts.get(family)
    }

    pub fn outlines(&self) -> &HashMap<String, Outline> {
        &self.outlines
    }

    pub fn outline(&self, id: &str) -> Option<&Outline> {
        self.outlines.get(id)
    }

    /// Append a layer on top of the existing ones.
    pub fn add_layer(&mut self, layer: Layer) {
        debug!(canvas = %self.id, layer = layer.id(), kind = layer.shape().kind(), "added layer");
        self.layers.push(layer);
        self.touch();
    }

    pub fn add_layers(&mut self, layers: impl IntoIterator<Item = Layer>) {
        for layer in layers {
            self.add_layer(layer);
        }
    }

    /// Store an outline, replacing any outline with the same ID.
    pub fn create_outline(&mut self, outline: Outline) {
        self.outlines.insert(outline.id().to_string(), outline);
        self.touch();
    }

    /// Store a font, replacing any font of the same family.
    pub fn load_font(&mut self, font: Font) {
        self.fonts.insert(font.family().to_string(), font);
        self.touch();
    }

    /// Record a completed render.
    pub fn mark_rendered(&mut self) {
        self.renders += 1;
        self.status = CanvasStatus::Rendered;
    }

    fn touch(&mut self) {
        if self.status == CanvasStatus::Dimensioned {
            self.status = CanvasStatus::Populated;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn dot(id: &str) -> Layer {
        Layer::new(LayerConfig {
            id: Some(id.to_string()),
            x: 0,
            y: 0,
            shape: Shape::Circle(CircleShape {
                radius: 1,
                colour: Colour::BLACK,
                filled: true,
                stroke: 1.0,
            }),
            outline: None,
        })
        .unwrap()
    }

    #[test]
    fn test_new_checks_dimensions() {
        assert!(CanvasState::new(600, 200).is_ok());
        assert!(CanvasState::new(0, 200).is_err());
        assert!(CanvasState::new(600, MAX_DIMENSION + 1).is_err());
        assert!(CanvasState::new(MAX_DIMENSION, 1).is_ok());
    }

    #[test]
    fn test_layers_keep_insertion_order() {
        let mut canvas = CanvasState::new(10, 10).unwrap();
        canvas.add_layers([dot("a"), dot("b"), dot("a")]);

        let ids: Vec<_> = canvas.layers().iter().map(|l| l.id()).collect();
        assert_eq!(ids, vec!["a", "b", "a"]);
    }

    #[test]
    fn test_status_transitions() {
        let mut canvas = CanvasState::new(10, 10).unwrap();
        assert_eq!(canvas.status(), CanvasStatus::Dimensioned);

        canvas.add_layer(dot("a"));
        assert_eq!(canvas.status(), CanvasStatus::Populated);

        canvas.mark_rendered();
        canvas.add_layer(dot("b"));
        canvas.mark_rendered();
        assert_eq!(canvas.status(), CanvasStatus::Rendered);
        assert_eq!(canvas.renders(), 2);
    }

    #[test]
    fn test_outline_and_font_replace_by_key() {
        let mut canvas = CanvasState::new(10, 10).unwrap();
        for alpha in [10, 20] {
            canvas.create_outline(
                Outline::new(OutlineConfig {
                    id: "u".to_string(),
                    alpha,
                    ..OutlineConfig::default()
                })
                .unwrap(),
            );
        }
        assert_eq!(canvas.outlines().len(), 1);
        assert_eq!(canvas.outline("u").unwrap().alpha(), 20);

        for file in ["a.ttf", "b.ttf"] {
            canvas.load_font(
                Font::new(FontConfig {
                    family: "Inter".to_string(),
                    path: PathBuf::from(file),
                    weight: FontWeight::Regular,
                })
                .unwrap(),
            );
        }
        assert_eq!(canvas.fonts().count(), 1);
        assert_eq!(canvas.font("Inter").unwrap().path(), PathBuf::from("b.ttf"));
    }
}
