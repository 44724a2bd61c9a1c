//! Command registry with parent/child scope tracking.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;

use crate::error::Result;

use super::definition::CommandDefinition;

/// Every known command, keyed by lowercased name.
///
/// Scoped commands are tracked in a table from parent key to child keys, so
/// nothing holds a reference to its parent definition.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, CommandDefinition>,
    scopes: HashMap<String, BTreeSet<String>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command, replacing any command with the same name.
    ///
    /// Returns the replaced definition.
    pub fn register(&mut self, command: CommandDefinition) -> Result<Option<CommandDefinition>> {
        command.check()?;

        let key = command.key();
        if let Some(parent) = command.parent_key() {
            self.scopes.entry(parent).or_default().insert(key.clone());
        }

        let replaced = self.commands.insert(key.clone(), command);
        if let Some(old) = &replaced {
            debug!(command = old.name(), "replaced command");
            self.detach_if_moved(&key, old);
        }
        Ok(replaced)
    }

    /// Remove a command by exact (case-insensitive) name.
    ///
    /// Its children stay registered; see [`remove_family`](Self::remove_family).
    pub fn unregister(&mut self, name: &str) -> Option<CommandDefinition> {
        let key = name.to_lowercase();
        let removed = self.commands.remove(&key)?;
        self.detach(&key, &removed);
        debug!(command = removed.name(), "removed command");
        Some(removed)
    }

    /// Remove a command and every command scoped under it, recursively.
    pub fn remove_family(&mut self, name: &str) -> Vec<CommandDefinition> {
        let mut removed = Vec::new();
        let mut pending = vec![name.to_lowercase()];

        while let Some(key) = pending.pop() {
            if let Some(children) = self.scopes.remove(&key) {
                pending.extend(children);
            }
            if let Some(command) = self.unregister(&key) {
                removed.push(command);
            }
        }
        removed
    }

    /// Whether a command with this name or alias exists.
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Look up a command by name, falling back to aliases.
    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands
            .get(&name.to_lowercase())
            .or_else(|| self.commands.values().find(|c| c.matches(name)))
    }

    /// All commands ordered by key.
    pub fn list(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.commands.values()
    }

    /// Commands with no parent.
    pub fn top_level(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.commands.values().filter(|c| c.parent().is_none())
    }

    /// Commands scoped directly under `parent`, ordered by key.
    pub fn children_of(&self, parent: &str) -> Vec<&CommandDefinition> {
        self.scopes
            .get(&parent.to_lowercase())
            .into_iter()
            .flatten()
            .filter_map(|key| self.commands.get(key))
            .collect()
    }

    /// Register every command from `source`. Returns how many were loaded.
    pub fn load(&mut self, source: impl IntoIterator<Item = CommandDefinition>) -> Result<usize> {
        self.load_filtered(source, |_| true)
    }

    /// Register the commands from `source` accepted by `keep`.
    pub fn load_filtered(
        &mut self,
        source: impl IntoIterator<Item = CommandDefinition>,
        keep: impl Fn(&CommandDefinition) -> bool,
    ) -> Result<usize> {
        let mut count = 0;
        for command in source.into_iter().filter(|c| keep(c)) {
            self.register(command)?;
            count += 1;
        }
        Ok(count)
    }

    /// Register only the commands from `source` scoped under `parent`.
    pub fn load_scoped(
        &mut self,
        parent: &str,
        source: impl IntoIterator<Item = CommandDefinition>,
    ) -> Result<usize> {
        let parent = parent.to_lowercase();
        self.load_filtered(source, |c| c.parent_key().as_deref() == Some(parent.as_str()))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn detach(&mut self, key: &str, command: &CommandDefinition) {
        if let Some(parent) = command.parent_key() {
            if let Some(children) = self.scopes.get_mut(&parent) {
                children.remove(key);
                if children.is_empty() {
                    self.scopes.remove(&parent);
                }
            }
        }
    }

    /// Drop the old scope entry when a replacement changed parents.
    fn detach_if_moved(&mut self, key: &str, old: &CommandDefinition) {
        let current = self.commands.get(key).and_then(|c| c.parent_key());
        if old.parent_key() != current {
            self.detach(key, old);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::CanvasState;
    use crate::command::param::Args;

    fn noop(_: &mut CanvasState, _: &Args) -> Result<()> {
        Ok(())
    }

    fn command(name: &str, parent: Option<&str>) -> CommandDefinition {
        let def = CommandDefinition::canvas(name, noop);
        match parent {
            Some(parent) => def.scoped_to(parent),
            None => def,
        }
    }

    fn family() -> Vec<CommandDefinition> {
        vec![
            command("$root", None),
            command("$child", Some("$root")),
            command("$grandchild", Some("$child")),
            command("$other", None),
        ]
    }

    #[test]
    fn test_register_replaces_by_key() {
        let mut registry = CommandRegistry::new();
        assert!(registry.register(command("$Thing", None)).unwrap().is_none());

        let old = registry.register(command("$thing", None)).unwrap();
        assert_eq!(old.unwrap().name(), "$Thing");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("$THING").unwrap().name(), "$thing");
    }

    #[test]
    fn test_register_rejects_bad_definition() {
        let mut registry = CommandRegistry::new();
        assert!(registry.register(command("thing", None)).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_list_is_ordered_by_key() {
        let mut registry = CommandRegistry::new();
        registry.load(family()).unwrap();

        let names: Vec<_> = registry.list().map(|c| c.name()).collect();
        assert_eq!(names, vec!["$child", "$grandchild", "$other", "$root"]);

        let top: Vec<_> = registry.top_level().map(|c| c.name()).collect();
        assert_eq!(top, vec!["$other", "$root"]);
    }

    #[test]
    fn test_children_of_follows_scope_table() {
        let mut registry = CommandRegistry::new();
        registry.load(family()).unwrap();

        let children: Vec<_> = registry.children_of("$ROOT").iter().map(|c| c.name()).collect();
        assert_eq!(children, vec!["$child"]);

        registry.register(command("$child", None)).unwrap();
        assert!(registry.children_of("$root").is_empty());
    }

    #[test]
    fn test_remove_family_is_recursive() {
        let mut registry = CommandRegistry::new();
        registry.load(family()).unwrap();

        let removed = registry.remove_family("$Root");
        assert_eq!(removed.len(), 3);
        assert!(!registry.has("$grandchild"));
        assert!(registry.has("$other"));
    }

    #[test]
    fn test_load_scoped_ignores_other_commands() {
        let mut registry = CommandRegistry::new();
        let loaded = registry.load_scoped("$root", family()).unwrap();

        assert_eq!(loaded, 1);
        assert!(registry.has("$child"));
        assert!(!registry.has("$root"));
    }

    #[test]
    fn test_unregister_keeps_children() {
        let mut registry = CommandRegistry::new();
        registry.load(family()).unwrap();

        assert!(registry.unregister("$child").is_some());
        assert!(registry.has("$grandchild"));
        assert!(registry.unregister("$child").is_none());
    }
}
