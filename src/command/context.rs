//! Per-evaluation execution context.
//!
//! A root context is created for each top-level evaluation. Scoped commands
//! extend it: the child shares the ambient store with its parent, inherits
//! the canvas handle and the visible command set, and can load extra
//! commands that stay local to it.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use crate::canvas::CanvasState;
use crate::config::Config;
use crate::error::{EaselError, Result};

use super::definition::CommandDefinition;
use super::param::Value;
use super::registry::CommandRegistry;

/// Shared, mutable handle to a canvas under construction.
pub type CanvasHandle = Rc<RefCell<CanvasState>>;

/// State shared by a context and everything extended from it.
#[derive(Debug, Default)]
struct Ambient {
    vars: RefCell<HashMap<String, Value>>,
    canvases: RefCell<Vec<CanvasHandle>>,
}

/// Execution context for one evaluation.
#[derive(Debug, Clone)]
pub struct Context<'r> {
    registry: &'r CommandRegistry,
    config: &'r Config,
    ambient: Rc<Ambient>,
    canvas: Option<CanvasHandle>,
    commands: BTreeMap<String, &'r CommandDefinition>,
}

impl<'r> Context<'r> {
    /// A fresh context seeing every top-level command.
    pub fn root(registry: &'r CommandRegistry, config: &'r Config) -> Self {
        let commands = registry.top_level().map(|c| (c.key(), c)).collect();
        Self {
            registry,
            config,
            ambient: Rc::default(),
            canvas: None,
            commands,
        }
    }

    /// A child context sharing this context's ambient store.
    pub fn extend(&self) -> Self {
        self.clone()
    }

    pub fn registry(&self) -> &'r CommandRegistry {
        self.registry
    }

    pub fn config(&self) -> &'r Config {
        self.config
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.ambient.vars.borrow().get(key).cloned()
    }

    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.ambient.vars.borrow_mut().insert(key.into(), value);
    }

    /// The canvas this context (or an ancestor) is building.
    pub fn canvas(&self) -> Option<CanvasHandle> {
        self.canvas.clone()
    }

    /// Make `canvas` this context's canvas and record it for the evaluation.
    pub fn open_canvas(&mut self, canvas: CanvasState) -> CanvasHandle {
        let handle = Rc::new(RefCell::new(canvas));
        self.ambient.canvases.borrow_mut().push(Rc::clone(&handle));
        self.canvas = Some(Rc::clone(&handle));
        handle
    }

    /// Run `f` against the current canvas.
    pub fn with_canvas<T>(
        &self,
        command: &str,
        f: impl FnOnce(&mut CanvasState) -> Result<T>,
    ) -> Result<T> {
        let handle = self.canvas.as_ref().ok_or_else(|| EaselError::Scope {
            command: command.to_string(),
            message: "no canvas is open in this context".to_string(),
        })?;
        let mut canvas = handle.try_borrow_mut().map_err(|_| EaselError::Scope {
            command: command.to_string(),
            message: "the canvas is already being modified".to_string(),
        })?;
        f(&mut *canvas)
    }

    /// Snapshot of every canvas opened during this evaluation, in order.
    pub fn canvases(&self) -> Vec<CanvasState> {
        self.ambient
            .canvases
            .borrow()
            .iter()
            .map(|c| c.borrow().clone())
            .collect()
    }

    /// Make the commands scoped under `parent` visible in this context only.
    pub fn load_scoped(&mut self, parent: &str) -> usize {
        let children = self.registry.children_of(parent);
        let count = children.len();
        self.commands
            .extend(children.into_iter().map(|c| (c.key(), c)));
        count
    }

    /// Find a visible command by name or alias.
    pub fn lookup(&self, name: &str) -> Option<&'r CommandDefinition> {
        self.commands
            .get(&name.to_lowercase())
            .or_else(|| self.commands.values().find(|c| c.matches(name)))
            .copied()
    }

    pub fn has(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }
}
