//! Layer-adding commands scoped under `$createCanvas`.

use tracing::debug;

use crate::canvas::{
    ArcShape, CanvasState, CircleShape, EllipseImageShape, EllipseShape, Layer, LayerConfig,
    Outline, Shape, TextAlign, TextShape,
};
use crate::command::{Args, CommandDefinition, ParamType, ParameterDefinition};
use crate::error::{EaselError, Result};

use super::CREATE_CANVAS;

pub(super) fn commands() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::canvas("$addArcLayer", add_arc)
            .describe("Adds an arc layer centred on X/Y.")
            .scoped_to(CREATE_CANVAS)
            .params(position())
            .param(int("Radius", "The radius of the arc."))
            .param(colour("The color of the arc."))
            .params(paint())
            .params(identity())
            .param(
                ParameterDefinition::optional("Start Angle", ParamType::Float)
                    .with_default("0")
                    .describe("Start angle in degrees, clockwise from the positive X axis."),
            )
            .param(
                ParameterDefinition::optional("End Angle", ParamType::Float)
                    .with_default("360")
                    .describe("End angle in degrees."),
            ),
        CommandDefinition::canvas("$addCircleLayer", add_circle)
            .describe("Adds a circle layer whose bounding box starts at X/Y.")
            .scoped_to(CREATE_CANVAS)
            .params(position())
            .param(int("Radius", "The radius of the circle."))
            .param(colour("The color of the circle."))
            .params(paint())
            .params(identity()),
        CommandDefinition::canvas("$addEllipseLayer", add_ellipse)
            .describe("Adds a rounded rectangle layer centred on X/Y.")
            .scoped_to(CREATE_CANVAS)
            .params(position())
            .params(bounds())
            .param(colour("The color of the ellipse."))
            .params(paint())
            .params(identity()),
        CommandDefinition::canvas("$addEllipseImageLayer", add_ellipse_image)
            .describe("Adds an image clipped to a rounded rectangle centred on X/Y.")
            .scoped_to(CREATE_CANVAS)
            .params(position())
            .params(bounds())
            .param(ParameterDefinition::required("URL", ParamType::String).describe("The URL of the image."))
            .params(identity()),
        CommandDefinition::canvas("$addTextLayer", add_text)
            .describe("Adds a text layer with its baseline at X/Y.")
            .scoped_to(CREATE_CANVAS)
            .params(position())
            .param(ParameterDefinition::required("Font Name", ParamType::String).describe("The font family of the text."))
            .param(ParameterDefinition::required("Font Size", ParamType::Float).describe("The font size in pixels."))
            .param(colour("The color of the text."))
            .param(ParameterDefinition::required("Text", ParamType::String).describe("The text to display."))
            .param(
                ParameterDefinition::optional("Align", ParamType::String)
                    .with_default("left")
                    .allow(&TextAlign::NAMES)
                    .describe("The alignment of the text."),
            )
            .param(layer_id()),
    ]
}

fn int(name: &str, description: &str) -> ParameterDefinition {
    ParameterDefinition::required(name, ParamType::Integer).describe(description)
}

fn colour(description: &str) -> ParameterDefinition {
    ParameterDefinition::required("Color", ParamType::Colour).describe(description)
}

fn position() -> [ParameterDefinition; 2] {
    [
        int("X", "The X coordinate of the layer."),
        int("Y", "The Y coordinate of the layer."),
    ]
}

fn bounds() -> [ParameterDefinition; 3] {
    [
        int("Width", "The width of the layer."),
        int("Height", "The height of the layer."),
        int("Radius", "The corner radius."),
    ]
}

fn paint() -> [ParameterDefinition; 2] {
    [
        ParameterDefinition::optional("Filled", ParamType::Boolean)
            .with_default("true")
            .describe("Whether the shape is filled."),
        ParameterDefinition::optional("Stroke", ParamType::Float)
            .with_default("1")
            .describe("The stroke width when not filled."),
    ]
}

/// Explicit layer IDs are stored exactly as written.
fn layer_id() -> ParameterDefinition {
    ParameterDefinition::optional("ID", ParamType::String)
        .verbatim()
        .describe("The ID of the layer.")
}

fn identity() -> [ParameterDefinition; 2] {
    [
        layer_id(),
        ParameterDefinition::optional("Outline Name", ParamType::String)
            .describe("The name of the outline to use."),
    ]
}

fn coordinate(args: &Args, name: &str) -> Result<i32> {
    let value = args.integer(name)?;
    i32::try_from(value).map_err(|_| {
        EaselError::invalid_parameter(args.command(), format!("{} coordinate", name), value.to_string())
    })
}

fn size(args: &Args, name: &str) -> Result<u32> {
    let value = args.integer(name)?;
    u32::try_from(value).map_err(|_| {
        EaselError::invalid_parameter(
            args.command(),
            format!("{} non-negative number", name),
            value.to_string(),
        )
    })
}

/// The named outline, if any. Unknown names add the layer without one.
fn outline(canvas: &CanvasState, args: &Args) -> Option<Outline> {
    let name = args.optional_string("Outline Name")?;
    let found = canvas.outline(name).cloned();
    if found.is_none() {
        debug!(outline = name, command = args.command(), "unknown outline; layer added without one");
    }
    found
}

fn push(canvas: &mut CanvasState, args: &Args, shape: Shape) -> Result<()> {
    let layer = Layer::new(LayerConfig {
        id: args.optional_string("ID").map(str::to_string),
        x: coordinate(args, "X")?,
        y: coordinate(args, "Y")?,
        outline: outline(canvas, args),
        shape,
    })?;
    canvas.add_layer(layer);
    Ok(())
}

fn add_arc(canvas: &mut CanvasState, args: &Args) -> Result<()> {
    let shape = Shape::Arc(ArcShape {
        radius: size(args, "Radius")?,
        colour: args.colour("Color")?,
        filled: args.boolean("Filled")?,
        stroke: args.float("Stroke")? as f32,
        start_angle: args.float("Start Angle")? as f32,
        end_angle: args.float("End Angle")? as f32,
    });
    push(canvas, args, shape)
}

fn add_circle(canvas: &mut CanvasState, args: &Args) -> Result<()> {
    let shape = Shape::Circle(CircleShape {
        radius: size(args, "Radius")?,
        colour: args.colour("Color")?,
        filled: args.boolean("Filled")?,
        stroke: args.float("Stroke")? as f32,
    });
    push(canvas, args, shape)
}

fn add_ellipse(canvas: &mut CanvasState, args: &Args) -> Result<()> {
    let shape = Shape::Ellipse(EllipseShape {
        width: size(args, "Width")?,
        height: size(args, "Height")?,
        radius: size(args, "Radius")?,
        colour: args.colour("Color")?,
        filled: args.boolean("Filled")?,
        stroke: args.float("Stroke")? as f32,
    });
    push(canvas, args, shape)
}

fn add_ellipse_image(canvas: &mut CanvasState, args: &Args) -> Result<()> {
    let shape = Shape::EllipseImage(EllipseImageShape {
        width: size(args, "Width")?,
        height: size(args, "Height")?,
        radius: size(args, "Radius")?,
        source: args.string("URL")?.to_string(),
    });
    push(canvas, args, shape)
}

fn add_text(canvas: &mut CanvasState, args: &Args) -> Result<()> {
    let shape = Shape::Text(TextShape {
        font: args.string("Font Name")?.to_string(),
        size: args.float("Font Size")? as f32,
        colour: args.colour("Color")?,
        text: args.string("Text")?.to_string(),
        align: args.string("Align")?.parse()?,
    });
    push(canvas, args, shape)
}
