//! Script evaluation.

use tracing::debug;

use crate::canvas::CanvasState;
use crate::command::{CommandDefinition, CommandRegistry, Context, Handler, Invocation, ParamType};
use crate::config::Config;
use crate::error::{EaselError, Result};

use super::parser::{parse, Call, Node};

/// Result of evaluating one script.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Script text with every call replaced by its result
    pub output: String,
    /// Canvases created during the evaluation, in creation order
    pub canvases: Vec<CanvasState>,
}

/// Evaluates scripts against a registry.
///
/// The evaluator holds no per-script state; each call to [`evaluate`]
/// gets its own root [`Context`].
///
/// [`evaluate`]: Evaluator::evaluate
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'r> {
    registry: &'r CommandRegistry,
    config: &'r Config,
}

impl<'r> Evaluator<'r> {
    pub fn new(registry: &'r CommandRegistry, config: &'r Config) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &'r CommandRegistry {
        self.registry
    }

    /// A fresh root context for this evaluator's registry.
    pub fn context(&self) -> Context<'r> {
        Context::root(self.registry, self.config)
    }

    /// Parse and evaluate `source` in a new context.
    pub fn evaluate(&self, source: &str) -> Result<Evaluation> {
        let nodes = parse(source)?;
        let mut context = self.context();
        let output = self.resolve(&nodes, &mut context)?;

        Ok(Evaluation {
            output,
            canvases: context.canvases(),
        })
    }

    /// Evaluate `source` and return only its output text.
    pub fn run(&self, source: &str) -> Result<String> {
        self.evaluate(source).map(|e| e.output)
    }

    /// Resolve nodes left to right in `context`.
    pub fn resolve(&self, nodes: &[Node], context: &mut Context<'r>) -> Result<String> {
        let mut out = String::new();
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Call(call) => out.push_str(&self.call(call, context)?),
            }
        }
        Ok(out)
    }

    fn call(&self, call: &Call, context: &mut Context<'r>) -> Result<String> {
        let Some(command) = context.lookup(&call.name) else {
            if !call.is_bracketed() {
                return Ok(call.name.clone());
            }
            return Err(self.unknown(call));
        };

        debug!(command = command.name(), at = %call.span, "call");

        match command.handler() {
            Handler::Deferred(handler) => {
                let mut invocation = Invocation::new(self, context, command, call);
                handler(&mut invocation)
            }
            Handler::Resolved(handler) => {
                let args = self.arguments(command, call, context)?;
                handler(context, &args).map_err(|e| e.in_command(command.name()))
            }
            Handler::Canvas(handler) => {
                let args = self.arguments(command, call, context)?;
                context
                    .with_canvas(command.name(), |canvas| handler(canvas, &args))
                    .map_err(|e| e.in_command(command.name()))?;
                Ok(String::new())
            }
        }
    }

    /// Resolve `call`'s arguments in `context` and validate them against
    /// `command`. Script parameters receive their raw source.
    pub(crate) fn arguments(
        &self,
        command: &CommandDefinition,
        call: &Call,
        context: &mut Context<'r>,
    ) -> Result<crate::command::Args> {
        let mut raw = Vec::with_capacity(call.arguments().len());
        for (index, argument) in call.arguments().iter().enumerate() {
            let text = match command.param_at(index) {
                Some(param) if param.kind == ParamType::Script => argument.source.clone(),
                _ => self.resolve(&argument.nodes, context)?,
            };
            raw.push(text);
        }
        command.validate(&raw)
    }

    fn unknown(&self, call: &Call) -> EaselError {
        let help = match self.registry.get(&call.name).and_then(|c| c.parent()) {
            Some(parent) => Some(format!(
                "{} is only available inside {}",
                call.name, parent
            )),
            None => Some(format!(
                "Run `easel commands` to list commands, or write \\{} for a literal",
                call.name
            )),
        };

        EaselError::UnknownCommand {
            name: format!("{} at {}", call.name, call.span),
            help,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Args, ParameterDefinition};

    fn shout(_: &mut Context<'_>, args: &Args) -> Result<String> {
        Ok(args.string("Text")?.to_uppercase())
    }

    fn registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        registry
            .load([CommandDefinition::resolved("$shout", shout)
                .param(ParameterDefinition::required("Text", ParamType::String))])
            .unwrap();
        registry
    }

    #[test]
    fn test_text_passes_through() {
        let registry = registry();
        let config = Config::default();
        let evaluator = Evaluator::new(&registry, &config);

        assert_eq!(evaluator.run("plain $ text").unwrap(), "plain $ text");
    }

    #[test]
    fn test_calls_resolve_inside_out() {
        let registry = registry();
        let config = Config::default();
        let evaluator = Evaluator::new(&registry, &config);

        assert_eq!(
            evaluator.run("say $shout[hi $shout[there]]!").unwrap(),
            "say HI THERE!"
        );
    }

    #[test]
    fn test_unbracketed_unknown_is_literal() {
        let registry = registry();
        let config = Config::default();
        let evaluator = Evaluator::new(&registry, &config);

        assert_eq!(evaluator.run("cost: $price").unwrap(), "cost: $price");
    }

    #[test]
    fn test_bracketed_unknown_fails() {
        let registry = registry();
        let config = Config::default();
        let evaluator = Evaluator::new(&registry, &config);

        let err = evaluator.run("$whisper[hi]").unwrap_err();
        assert!(matches!(err, EaselError::UnknownCommand { .. }));
    }

    #[test]
    fn test_validation_error_names_command() {
        let registry = registry();
        let config = Config::default();
        let evaluator = Evaluator::new(&registry, &config);

        match evaluator.run("$SHOUT[]").unwrap_err() {
            EaselError::InvalidParameter { command, .. } => assert_eq!(command, "$shout"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
