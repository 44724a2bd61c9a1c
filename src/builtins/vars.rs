//! Ambient variable commands.

use crate::command::{Args, CommandDefinition, Context, ParamType, ParameterDefinition, Value};
use crate::error::Result;

pub(super) fn commands() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::resolved("$setVar", set_var)
            .describe("Stores a value for the rest of the evaluation.")
            .param(ParameterDefinition::required("Name", ParamType::String).describe("The variable name."))
            .param(ParameterDefinition::optional("Value", ParamType::Unknown).describe("The value to store.")),
        CommandDefinition::resolved("$getVar", get_var)
            .describe("Returns a stored value, or nothing when unset.")
            .param(ParameterDefinition::required("Name", ParamType::String).describe("The variable name.")),
    ]
}

fn set_var(context: &mut Context<'_>, args: &Args) -> Result<String> {
    let value = args.optional_string("Value").unwrap_or_default();
    context.set(args.string("Name")?, Value::String(value.to_string()));
    Ok(String::new())
}

fn get_var(context: &mut Context<'_>, args: &Args) -> Result<String> {
    Ok(context
        .get(args.string("Name")?)
        .map(|v| v.to_string())
        .unwrap_or_default())
}
