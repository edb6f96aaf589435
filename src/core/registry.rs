//! Binding registry for CVars and ConCmds.
//!
//! Commands and variables live in separate namespaces. Names of built-in
//! commands are reserved in both.

use std::collections::BTreeMap;
use std::ops::Bound;

use bevy::log::{debug, warn};

use super::{CVar, CVarFlags, ConCmd, ConsoleError, is_builtin};

/// Result of resolving an identifier against the registry.
#[derive(Debug, Clone, Copy)]
pub enum Resolved<'a> {
    /// A command handler.
    Cmd(&'a ConCmd),
    /// A variable binding.
    Var(&'a CVar),
    /// Nothing is bound under this identifier.
    NotFound,
}

/// Central registry for console variables and commands.
///
/// Entries are kept sorted by name so listings and completion come out in a
/// stable order.
///
/// # Examples
///
/// ```
/// use std::sync::{Arc, RwLock};
/// use bevy_dropdown_console::core::{ConsoleRegistry, CVar, ConCmd, Resolved};
///
/// let mut registry = ConsoleRegistry::new();
/// let gravity = Arc::new(RwLock::new(800.0f32));
///
/// registry.register_var(CVar::bind("sv_gravity", &gravity)).unwrap();
/// registry.register_cmd(ConCmd::new("quit", [], |_| Ok(String::new()))).unwrap();
///
/// assert!(matches!(registry.resolve("sv_gravity"), Resolved::Var(_)));
/// assert!(registry.register_var(CVar::bind("sv_gravity", &gravity)).is_err());
/// ```
#[derive(Default)]
pub struct ConsoleRegistry {
    vars: BTreeMap<Box<str>, CVar>,
    cmds: BTreeMap<Box<str>, ConCmd>,
}

impl ConsoleRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a variable binding.
    ///
    /// Fails with [`ConsoleError::DuplicateIdentifier`] if a variable of the
    /// same name exists or the name is reserved by a built-in.
    pub fn register_var(&mut self, cvar: CVar) -> Result<(), ConsoleError> {
        let name: Box<str> = cvar.name().into();
        if is_builtin(&name) || self.vars.contains_key(&name) {
            warn!("Console: refusing to rebind variable '{}'", name);
            return Err(ConsoleError::DuplicateIdentifier(name.into()));
        }

        debug!("Console: bound variable '{}' ({})", name, cvar.value_type());
        self.vars.insert(name, cvar);
        Ok(())
    }

    /// Register a command.
    ///
    /// Fails with [`ConsoleError::DuplicateIdentifier`] on a name collision and
    /// with [`ConsoleError::SignatureTooLong`] if the signature exceeds
    /// [`MAX_ARITY`](super::MAX_ARITY).
    pub fn register_cmd(&mut self, cmd: ConCmd) -> Result<(), ConsoleError> {
        cmd.validate()?;

        let name: Box<str> = cmd.name().into();
        if is_builtin(&name) || self.cmds.contains_key(&name) {
            warn!("Console: refusing to rebind command '{}'", name);
            return Err(ConsoleError::DuplicateIdentifier(name.into()));
        }

        debug!("Console: bound command '{}'", cmd.usage());
        self.cmds.insert(name, cmd);
        Ok(())
    }

    /// Remove every binding named `name`.
    ///
    /// Returns `false` if nothing was bound.
    pub fn unbind(&mut self, name: &str) -> bool {
        let removed_var = self.vars.remove(name).is_some();
        let removed_cmd = self.cmds.remove(name).is_some();
        if !(removed_var || removed_cmd) {
            debug!("Console: unbind of unknown identifier '{}'", name);
        }
        removed_var || removed_cmd
    }

    /// Remove only the variable named `name`.
    pub fn unbind_var(&mut self, name: &str) -> Option<CVar> {
        self.vars.remove(name)
    }

    /// Remove only the command named `name`.
    pub fn unbind_cmd(&mut self, name: &str) -> Option<ConCmd> {
        self.cmds.remove(name)
    }

    /// Resolve an identifier. Commands take precedence over variables.
    pub fn resolve(&self, name: &str) -> Resolved<'_> {
        if let Some(cmd) = self.cmds.get(name) {
            Resolved::Cmd(cmd)
        } else if let Some(var) = self.vars.get(name) {
            Resolved::Var(var)
        } else {
            Resolved::NotFound
        }
    }

    /// Get a variable by name.
    pub fn var(&self, name: &str) -> Option<&CVar> {
        self.vars.get(name)
    }

    /// Get a command by name.
    pub fn cmd(&self, name: &str) -> Option<&ConCmd> {
        self.cmds.get(name)
    }

    /// Check if any binding exists under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name) || self.cmds.contains_key(name)
    }

    /// Get the number of bindings.
    pub fn len(&self) -> usize {
        self.vars.len() + self.cmds.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty() && self.cmds.is_empty()
    }

    /// Iterate over visible variables whose names start with `prefix`.
    pub fn vars(&self, prefix: &str) -> impl Iterator<Item = &CVar> {
        with_prefix(&self.vars, prefix).filter(|cvar| !cvar.get_flags().contains(CVarFlags::HIDDEN))
    }

    /// Iterate over commands whose names start with `prefix`.
    pub fn cmds(&self, prefix: &str) -> impl Iterator<Item = &ConCmd> {
        with_prefix(&self.cmds, prefix)
    }

    /// Names of visible commands and variables starting with `prefix`, sorted
    /// and deduplicated.
    pub fn complete(&self, prefix: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .cmds(prefix)
            .map(ConCmd::name)
            .chain(self.vars(prefix).map(CVar::name))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

fn with_prefix<'a, 'p, V>(
    map: &'a BTreeMap<Box<str>, V>,
    prefix: &'p str,
) -> impl Iterator<Item = &'a V> {
    map.range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
        .take_while(move |(name, _)| name.starts_with(prefix))
        .map(|(_, v)| v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ValueType;
    use std::sync::{Arc, RwLock};

    fn noop(name: &'static str) -> ConCmd {
        ConCmd::new(name, [], |_| Ok(String::new()))
    }

    #[test]
    fn test_registry_var() {
        let mut registry = ConsoleRegistry::new();
        let gravity = Arc::new(RwLock::new(800.0f32));

        registry.register_var(CVar::bind("sv_gravity", &gravity)).unwrap();

        assert!(registry.contains("sv_gravity"));
        assert_eq!(registry.var("sv_gravity").unwrap().value_type(), ValueType::Float);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_detection() {
        let mut registry = ConsoleRegistry::new();
        let a = Arc::new(RwLock::new(1i32));
        let b = Arc::new(RwLock::new(2i32));

        registry.register_var(CVar::bind("x", &a)).unwrap();
        assert_eq!(
            registry.register_var(CVar::bind("x", &b)),
            Err(ConsoleError::DuplicateIdentifier("x".into()))
        );
        // The original binding is untouched
        assert_eq!(registry.var("x").unwrap().read(), Ok(crate::core::Value::Integer(1)));

        registry.register_cmd(noop("test_cmd")).unwrap();
        assert!(registry.register_cmd(noop("test_cmd")).is_err());
    }

    #[test]
    fn test_builtin_names_reserved() {
        let mut registry = ConsoleRegistry::new();
        let v = Arc::new(RwLock::new(0i32));

        assert!(registry.register_cmd(noop("help")).is_err());
        assert!(registry.register_cmd(noop("+")).is_err());
        assert!(registry.register_var(CVar::bind("set", &v)).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_separate_namespaces() {
        let mut registry = ConsoleRegistry::new();
        let v = Arc::new(RwLock::new(0i32));

        registry.register_var(CVar::bind("fog", &v)).unwrap();
        registry.register_cmd(noop("fog")).unwrap();

        assert!(matches!(registry.resolve("fog"), Resolved::Cmd(_)));
        assert!(registry.var("fog").is_some());

        assert!(registry.unbind_cmd("fog").is_some());
        assert!(matches!(registry.resolve("fog"), Resolved::Var(_)));
    }

    #[test]
    fn test_unbind() {
        let mut registry = ConsoleRegistry::new();
        registry.register_cmd(noop("quit")).unwrap();

        assert!(registry.unbind("quit"));
        assert!(!registry.unbind("quit"));
        assert!(matches!(registry.resolve("quit"), Resolved::NotFound));

        // Rebinding after unbind is allowed
        registry.register_cmd(noop("quit")).unwrap();
    }

    #[test]
    fn test_signature_too_long_rejected() {
        let mut registry = ConsoleRegistry::new();
        let cmd = ConCmd::new("big", [ValueType::Text; 5], |_| Ok(String::new()));
        assert!(matches!(
            registry.register_cmd(cmd),
            Err(ConsoleError::SignatureTooLong { len: 5, .. })
        ));
        assert!(!registry.contains("big"));
    }

    #[test]
    fn test_prefix_listing_and_hidden() {
        let mut registry = ConsoleRegistry::new();
        let v = Arc::new(RwLock::new(0i32));

        registry.register_var(CVar::bind("sv_gravity", &v)).unwrap();
        registry.register_var(CVar::bind("sv_cheats", &v)).unwrap();
        registry
            .register_var(CVar::bind("sv_secret", &v).flags(CVarFlags::HIDDEN))
            .unwrap();
        registry.register_var(CVar::bind("cl_fov", &v)).unwrap();
        registry.register_cmd(noop("sv_restart")).unwrap();

        let names: Vec<_> = registry.vars("sv_").map(CVar::name).collect();
        assert_eq!(names, vec!["sv_cheats", "sv_gravity"]);

        assert_eq!(registry.complete("sv_"), vec!["sv_cheats", "sv_gravity", "sv_restart"]);
        assert_eq!(registry.complete("cl"), vec!["cl_fov"]);
        assert!(registry.complete("zz").is_empty());
    }

    #[test]
    fn test_empty_prefix_lists_everything() {
        let mut registry = ConsoleRegistry::new();
        let v = Arc::new(RwLock::new(0i32));

        registry.register_var(CVar::bind("b_var", &v)).unwrap();
        registry.register_var(CVar::bind("a_var", &v)).unwrap();
        registry.register_cmd(noop("c_cmd")).unwrap();

        assert_eq!(registry.complete(""), vec!["a_var", "b_var", "c_cmd"]);
        assert_eq!(registry.vars("").count(), 2);
        assert_eq!(registry.cmds("").count(), 1);
        // A prefix sorting after every name yields nothing
        assert!(registry.complete("z").is_empty());
    }
}
