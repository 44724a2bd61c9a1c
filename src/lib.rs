//! easel - canvas scripting for text content
//!
//! Scripts embed `$name[arg;arg]` commands in ordinary text. `$createCanvas`
//! opens a canvas scope in which layers, outlines and fonts are added and
//! the result is rendered to PNG.
//!
//! ```ignore
//! let config = easel::Config::default();
//! let registry = easel::default_registry(&config)?;
//! let evaluator = easel::Evaluator::new(&registry, &config);
//!
//! evaluator.run("$createCanvas[64;64;$addCircleLayer[0;0;32;#fc0]$renderCanvas[dot.png]]")?;
//! ```

pub mod builtins;
pub mod canvas;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod output;
pub mod render;
pub mod script;

pub use builtins::{canvas_pack, core_pack, CREATE_CANVAS};
pub use canvas::{
    CanvasState, CanvasStatus, Colour, Font, FontWeight, Layer, Outline, OutlineKind, Shape,
    TextAlign,
};
pub use command::{
    Args, CommandDefinition, CommandPack, CommandRegistry, Context, ParamType,
    ParameterDefinition, RegistryBuilder, Value,
};
pub use config::{Config, CONFIG_FILENAME};
pub use error::{EaselError, Result};
pub use render::{render_canvas, render_image, save_image, ImageEncoding, Surface};
pub use script::{parse, Evaluation, Evaluator};

/// Registry with the core pack as base, the canvas pack layered over it and
/// the configured commands disabled.
pub fn default_registry(config: &Config) -> Result<CommandRegistry> {
    let mut builder = RegistryBuilder::new();
    builder
        .base(core_pack())
        .override_with(canvas_pack())
        .disable_all(config.disable.iter().cloned());
    builder.build()
}
