//! Command definitions and the invocation handed to deferred commands.

use std::collections::HashSet;
use std::fmt;

use crate::canvas::CanvasState;
use crate::error::{EaselError, Result};
use crate::script::{Argument, Call, Evaluator};

use super::context::Context;
use super::param::{Args, ParameterDefinition, Value};

/// Handler for commands that resolve their own arguments.
pub type DeferredFn = fn(&mut Invocation<'_, '_>) -> Result<String>;

/// Handler for commands whose arguments arrive resolved and validated.
pub type ResolvedFn = fn(&mut Context<'_>, &Args) -> Result<String>;

/// Handler for commands that mutate the enclosing canvas. They return no text.
pub type CanvasFn = fn(&mut CanvasState, &Args) -> Result<()>;

/// How a command is executed.
#[derive(Clone, Copy)]
pub enum Handler {
    Deferred(DeferredFn),
    Resolved(ResolvedFn),
    Canvas(CanvasFn),
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Handler::Deferred(_) => "Deferred",
            Handler::Resolved(_) => "Resolved",
            Handler::Canvas(_) => "Canvas",
        })
    }
}

/// A named, schema-validated command.
#[derive(Debug, Clone)]
pub struct CommandDefinition {
    name: String,
    description: String,
    parent: Option<String>,
    params: Vec<ParameterDefinition>,
    aliases: Vec<String>,
    handler: Handler,
}

impl CommandDefinition {
    pub fn new(name: impl Into<String>, handler: Handler) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            parent: None,
            params: Vec::new(),
            aliases: Vec::new(),
            handler,
        }
    }

    pub fn deferred(name: impl Into<String>, handler: DeferredFn) -> Self {
        Self::new(name, Handler::Deferred(handler))
    }

    pub fn resolved(name: impl Into<String>, handler: ResolvedFn) -> Self {
        Self::new(name, Handler::Resolved(handler))
    }

    pub fn canvas(name: impl Into<String>, handler: CanvasFn) -> Self {
        Self::new(name, Handler::Canvas(handler))
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Restrict the command to the scope of `parent`.
    pub fn scoped_to(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn param(mut self, param: ParameterDefinition) -> Self {
        self.params.push(param);
        self
    }

    pub fn params(mut self, params: impl IntoIterator<Item = ParameterDefinition>) -> Self {
        self.params.extend(params);
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn parameters(&self) -> &[ParameterDefinition] {
        &self.params
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn handler(&self) -> Handler {
        self.handler
    }

    /// Registry key: the lowercased name.
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }

    pub fn parent_key(&self) -> Option<String> {
        self.parent.as_ref().map(|p| p.to_lowercase())
    }

    /// Case-insensitive match against the name or any alias.
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name) || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }

    /// Whether the evaluator resolves arguments before calling the handler.
    pub fn resolves_arguments(&self) -> bool {
        !matches!(self.handler, Handler::Deferred(_))
    }

    /// The parameter receiving the argument at `index`.
    pub fn param_at(&self, index: usize) -> Option<&ParameterDefinition> {
        self.params
            .get(index)
            .or_else(|| self.params.last().filter(|p| p.rest))
    }

    /// Signature such as `$addTextLayer[x: number, ..., align?: string]`.
    pub fn usage(&self) -> String {
        let params: Vec<_> = self.params.iter().map(|p| p.usage()).collect();
        format!("{}[{}]", self.name, params.join(", "))
    }

    /// Convert resolved argument text into typed values.
    pub fn validate(&self, raw: &[String]) -> Result<Args> {
        let mut values = Vec::with_capacity(self.params.len());

        for (index, param) in self.params.iter().enumerate() {
            if param.rest {
                let items = raw
                    .iter()
                    .skip(index)
                    .filter(|r| !r.trim().is_empty())
                    .map(|r| param.convert(&self.name, Some(r)))
                    .collect::<Result<Vec<_>>>()?;
                if items.is_empty() && param.required {
                    return Err(EaselError::invalid_parameter(
                        &self.name,
                        format!("{} (at least one)", param.name),
                        "",
                    ));
                }
                values.push((param.name.clone(), Value::List(items)));
                continue;
            }

            let value = param.convert(&self.name, raw.get(index).map(String::as_str))?;
            values.push((param.name.clone(), value));
        }

        let takes_rest = self.params.last().is_some_and(|p| p.rest);
        if !takes_rest {
            if let Some(extra) = raw
                .iter()
                .skip(self.params.len())
                .find(|r| !r.trim().is_empty())
            {
                return Err(EaselError::invalid_parameter(
                    &self.name,
                    format!("at most {} arguments", self.params.len()),
                    extra.as_str(),
                ));
            }
        }

        Ok(Args::new(&self.name, values))
    }

    /// Check the definition itself before it enters a registry.
    pub fn check(&self) -> Result<()> {
        let invalid = |message: String| Err(EaselError::Definition { message });

        let ident = self.name.strip_prefix('$').unwrap_or_default();
        let valid_ident = ident
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && ident.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid_ident {
            return invalid(format!("{:?} is not a `$name` command", self.name));
        }

        if self.parent_key() == Some(self.key()) {
            return invalid(format!("{} cannot be scoped to itself", self.name));
        }

        let mut seen = HashSet::new();
        let last = self.params.len().saturating_sub(1);
        for (index, param) in self.params.iter().enumerate() {
            if !seen.insert(param.name.as_str()) {
                return invalid(format!("{} declares {} twice", self.name, param.name));
            }
            if param.required && param.default.is_some() {
                return invalid(format!(
                    "{}: required parameter {} has a default",
                    self.name, param.name
                ));
            }
            if param.rest && index != last {
                return invalid(format!(
                    "{}: variadic parameter {} must be last",
                    self.name, param.name
                ));
            }
            if param.default.is_some() {
                param.convert(&self.name, None).map_err(|e| EaselError::Definition {
                    message: format!("{}: bad default for {}: {}", self.name, param.name, e),
                })?;
            }
        }

        Ok(())
    }
}

/// A deferred command call in progress.
///
/// Gives the handler the unresolved arguments along with the evaluator and
/// context needed to resolve them.
pub struct Invocation<'a, 'r> {
    evaluator: &'a Evaluator<'r>,
    context: &'a mut Context<'r>,
    command: &'r CommandDefinition,
    call: &'a Call,
}

impl<'a, 'r> Invocation<'a, 'r> {
    pub fn new(
        evaluator: &'a Evaluator<'r>,
        context: &'a mut Context<'r>,
        command: &'r CommandDefinition,
        call: &'a Call,
    ) -> Self {
        Self {
            evaluator,
            context,
            command,
            call,
        }
    }

    pub fn evaluator(&self) -> &'a Evaluator<'r> {
        self.evaluator
    }

    pub fn context(&mut self) -> &mut Context<'r> {
        self.context
    }

    pub fn command(&self) -> &'r CommandDefinition {
        self.command
    }

    pub fn arguments(&self) -> &'a [Argument] {
        self.call.arguments()
    }

    /// Resolve every argument except `script` parameters, then validate.
    pub fn validate(&mut self) -> Result<Args> {
        self.evaluator.arguments(self.command, self.call, self.context)
    }

    /// The unresolved argument bound to the parameter `name`.
    pub fn script(&self, name: &str) -> Option<&'a Argument> {
        let index = self.command.params.iter().position(|p| p.name == name)?;
        self.call.arguments().get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ParamType;

    fn noop(_: &mut CanvasState, _: &Args) -> Result<()> {
        Ok(())
    }

    fn layer() -> CommandDefinition {
        CommandDefinition::canvas("$addDot", noop)
            .scoped_to("$createCanvas")
            .param(ParameterDefinition::required("X", ParamType::Integer))
            .param(ParameterDefinition::required("Color", ParamType::Colour))
            .param(ParameterDefinition::optional("Filled", ParamType::Boolean).with_default("true"))
            .param(ParameterDefinition::optional("ID", ParamType::String))
    }

    fn raw(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_validate_applies_defaults() {
        let args = layer().validate(&raw(&["3", "#000", ""])).unwrap();

        assert_eq!(args.integer("X").unwrap(), 3);
        assert!(args.boolean("Filled").unwrap());
        assert_eq!(args.optional_string("ID"), None);
    }

    #[test]
    fn test_validate_rejects_extra_arguments() {
        let def = layer();
        assert!(def.validate(&raw(&["3", "#000", "true", "a", "  "])).is_ok());

        let err = def.validate(&raw(&["3", "#000", "true", "a", "b"])).unwrap_err();
        assert!(matches!(err, EaselError::InvalidParameter { .. }));
    }

    #[test]
    fn test_validate_collects_rest() {
        let def = CommandDefinition::canvas("$many", noop)
            .param(ParameterDefinition::required("Name", ParamType::String))
            .param(ParameterDefinition::optional("Values", ParamType::Integer).rest());

        let args = def.validate(&raw(&["n", "1", "", "3"])).unwrap();
        assert_eq!(args.list("Values"), &[Value::Integer(1), Value::Integer(3)]);
        assert_eq!(def.param_at(7).unwrap().name, "Values");
    }

    #[test]
    fn test_check_rejects_bad_definitions() {
        let bad_name = CommandDefinition::canvas("addDot", noop);
        assert!(bad_name.check().is_err());

        let required_default = CommandDefinition::canvas("$a", noop)
            .param(ParameterDefinition::required("X", ParamType::Integer).with_default("1"));
        assert!(required_default.check().is_err());

        let rest_not_last = CommandDefinition::canvas("$a", noop)
            .param(ParameterDefinition::optional("V", ParamType::String).rest())
            .param(ParameterDefinition::optional("W", ParamType::String));
        assert!(rest_not_last.check().is_err());

        let duplicate = CommandDefinition::canvas("$a", noop)
            .param(ParameterDefinition::optional("V", ParamType::String))
            .param(ParameterDefinition::optional("V", ParamType::String));
        assert!(duplicate.check().is_err());

        let self_scoped = CommandDefinition::canvas("$a", noop).scoped_to("$A");
        assert!(self_scoped.check().is_err());

        let bad_default = CommandDefinition::canvas("$a", noop)
            .param(ParameterDefinition::optional("C", ParamType::Colour).with_default("white"));
        assert!(bad_default.check().is_err());

        assert!(layer().check().is_ok());
    }

    #[test]
    fn test_matches_aliases_case_insensitively() {
        let def = layer().alias("$dot");
        assert!(def.matches("$ADDDOT"));
        assert!(def.matches("$Dot"));
        assert!(!def.matches("$circle"));
        assert_eq!(def.key(), "$adddot");
        assert!(def.resolves_arguments());
    }
}
