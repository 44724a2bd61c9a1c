//! Built-in command packs.
//!
//! - `core` - ambient variables (`$setVar`, `$getVar`)
//! - `canvas` - `$createCanvas` and the commands scoped under it

mod canvas;
mod layers;
mod style;
mod vars;

use crate::command::CommandPack;

/// Name of the command that opens a canvas scope.
pub const CREATE_CANVAS: &str = "$createCanvas";

/// Commands available everywhere.
pub fn core_pack() -> CommandPack {
    CommandPack::new("core", vars::commands())
}

/// `$createCanvas` plus every command scoped under it.
pub fn canvas_pack() -> CommandPack {
    let mut commands = canvas::commands();
    commands.extend(layers::commands());
    commands.extend(style::commands());
    CommandPack::new("canvas", commands)
}
