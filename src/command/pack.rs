//! Command packs and declarative registry composition.

use tracing::{debug, warn};

use crate::error::Result;

use super::definition::CommandDefinition;
use super::registry::CommandRegistry;

/// A named collection of command definitions.
#[derive(Debug, Clone)]
pub struct CommandPack {
    name: String,
    commands: Vec<CommandDefinition>,
}

impl CommandPack {
    pub fn new(name: impl Into<String>, commands: Vec<CommandDefinition>) -> Self {
        Self {
            name: name.into(),
            commands,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn commands(&self) -> &[CommandDefinition] {
        &self.commands
    }

    /// Names of the pack's top-level commands.
    pub fn roots(&self) -> impl Iterator<Item = &str> {
        self.commands
            .iter()
            .filter(|c| c.parent().is_none())
            .map(|c| c.name())
    }

    pub fn into_commands(self) -> Vec<CommandDefinition> {
        self.commands
    }
}

/// Builds a registry from base packs, override packs and disabled names.
///
/// Override packs apply in order. Each first removes the family of every
/// top-level command it provides, so the last pack to define a command wins
/// together with its children.
///
/// ```ignore
/// let mut builder = RegistryBuilder::new();
/// builder.base(core_pack()).override_with(canvas_pack());
/// builder.disable("$loadFont");
/// let registry = builder.build()?;
/// ```
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    base: Vec<CommandPack>,
    overrides: Vec<CommandPack>,
    disabled: Vec<String>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base(&mut self, pack: CommandPack) -> &mut Self {
        self.base.push(pack);
        self
    }

    pub fn override_with(&mut self, pack: CommandPack) -> &mut Self {
        self.overrides.push(pack);
        self
    }

    /// Remove `name` and its scoped children after all packs are applied.
    pub fn disable(&mut self, name: impl Into<String>) -> &mut Self {
        self.disabled.push(name.into());
        self
    }

    pub fn disable_all(&mut self, names: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.disabled.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> Result<CommandRegistry> {
        let mut registry = CommandRegistry::new();

        for pack in self.base {
            let name = pack.name.clone();
            let count = registry.load(pack.into_commands())?;
            debug!(pack = %name, count, "loaded base pack");
        }

        for pack in self.overrides {
            let roots: Vec<String> = pack.roots().map(str::to_string).collect();
            for root in &roots {
                let removed = registry.remove_family(root);
                if !removed.is_empty() {
                    debug!(pack = pack.name(), command = %root, removed = removed.len(), "overriding");
                }
            }
            registry.load(pack.into_commands())?;
        }

        for name in &self.disabled {
            if registry.remove_family(name).is_empty() {
                warn!(command = %name, "disabled command is not registered");
            }
        }

        Ok(registry)
    }
}
