//! `$createCanvas` and `$renderCanvas`.

use tracing::debug;

use crate::canvas::{CanvasState, MAX_DIMENSION};
use crate::command::{
    Args, CommandDefinition, Context, Invocation, ParamType, ParameterDefinition,
};
use crate::error::{EaselError, Result};
use crate::render::render_canvas;

use super::CREATE_CANVAS;

pub(super) fn commands() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::deferred(CREATE_CANVAS, create_canvas)
            .describe("Creates a canvas and runs the code inside it.")
            .param(ParameterDefinition::required("Width", ParamType::Integer).describe("The width of the canvas."))
            .param(ParameterDefinition::required("Height", ParamType::Integer).describe("The height of the canvas."))
            .param(ParameterDefinition::optional("Code", ParamType::Script).describe("The code to run.")),
        CommandDefinition::resolved("$renderCanvas", render)
            .describe("Renders the canvas to a PNG file.")
            .scoped_to(CREATE_CANVAS)
            .param(ParameterDefinition::required("Path", ParamType::String).describe("The path to save the canvas.")),
    ]
}

fn create_canvas(invocation: &mut Invocation<'_, '_>) -> Result<String> {
    let args = invocation.validate()?;
    let name = invocation.command().name();

    let canvas = CanvasState::new(dimension(&args, "Width")?, dimension(&args, "Height")?)?;

    let mut scope = invocation.context().extend();
    let loaded = scope.load_scoped(name);
    scope.open_canvas(canvas);
    debug!(loaded, "opened canvas scope");

    if let Some(code) = invocation.script("Code") {
        invocation.evaluator().resolve(&code.nodes, &mut scope)?;
    }
    Ok(String::new())
}

fn dimension(args: &Args, name: &str) -> Result<u32> {
    let value = args.integer(name)?;
    u32::try_from(value)
        .ok()
        .filter(|v| (1..=MAX_DIMENSION).contains(v))
        .ok_or_else(|| {
            EaselError::invalid_parameter(
                args.command(),
                format!("{} between 1 and {}", name, MAX_DIMENSION),
                value.to_string(),
            )
        })
}

fn render(context: &mut Context<'_>, args: &Args) -> Result<String> {
    let path = context.config().resolve_output(args.string("Path")?);
    context.with_canvas(args.command(), |canvas| render_canvas(canvas, &path))?;
    Ok(String::new())
}
