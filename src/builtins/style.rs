//! Outline and font commands scoped under `$createCanvas`.

use std::path::PathBuf;

use crate::canvas::{CanvasState, Font, FontConfig, FontWeight, Outline, OutlineConfig, OutlineKind};
use crate::command::{Args, CommandDefinition, ParamType, ParameterDefinition};
use crate::error::{EaselError, Result};

use super::CREATE_CANVAS;

pub(super) fn commands() -> Vec<CommandDefinition> {
    let weights = FontWeight::names();

    vec![
        CommandDefinition::canvas("$createOutline", create_outline)
            .describe("Creates a named outline that layers can reference.")
            .scoped_to(CREATE_CANVAS)
            .param(ParameterDefinition::required("ID", ParamType::String).describe("The ID of the outline."))
            .param(
                ParameterDefinition::required("Type", ParamType::String)
                    .allow(&OutlineKind::NAMES)
                    .describe("Where the stroke sits relative to the edge."),
            )
            .param(
                ParameterDefinition::optional("Color", ParamType::Colour)
                    .with_default("#FFFFFF")
                    .describe("The color of the outline."),
            )
            .param(
                ParameterDefinition::optional("Alpha", ParamType::Integer)
                    .with_default("100")
                    .describe("The opacity of the outline, 0 to 100."),
            )
            .param(
                ParameterDefinition::optional("Stroke", ParamType::Integer)
                    .with_default("1")
                    .describe("The stroke width of the outline."),
            ),
        CommandDefinition::canvas("$loadFont", load_font)
            .describe("Loads a font file for text layers.")
            .scoped_to(CREATE_CANVAS)
            .param(ParameterDefinition::required("Family", ParamType::String).describe("The font family."))
            .param(ParameterDefinition::required("Path", ParamType::String).describe("The path to the font file."))
            .param(
                ParameterDefinition::optional("Weight", ParamType::String)
                    .with_default("regular")
                    .allow(&weights)
                    .describe("The font weight."),
            ),
    ]
}

fn create_outline(canvas: &mut CanvasState, args: &Args) -> Result<()> {
    let alpha = args.integer("Alpha")?;
    let alpha = u8::try_from(alpha)
        .ok()
        .filter(|a| *a <= 100)
        .ok_or_else(|| {
            EaselError::invalid_parameter(args.command(), "Alpha between 0 and 100", alpha.to_string())
        })?;

    let stroke = args.integer("Stroke")?;
    let stroke = u32::try_from(stroke).map_err(|_| {
        EaselError::invalid_parameter(args.command(), "Stroke non-negative number", stroke.to_string())
    })?;

    let outline = Outline::new(OutlineConfig {
        id: args.string("ID")?.to_string(),
        kind: args.string("Type")?.parse()?,
        colour: args.colour("Color")?,
        alpha,
        stroke,
    })?;
    canvas.create_outline(outline);
    Ok(())
}

fn load_font(canvas: &mut CanvasState, args: &Args) -> Result<()> {
    let font = Font::new(FontConfig {
        family: args.string("Family")?.to_string(),
        path: PathBuf::from(args.string("Path")?),
        weight: args.string("Weight")?.parse()?,
    })?;
    canvas.load_font(font);
    Ok(())
}
