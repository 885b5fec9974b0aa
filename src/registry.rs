//! Alias registry handing out component instances on demand.
//!
//! The registry is init-once state owned by a composition root and
//! injected into consumers; nothing in here is a process-wide global.

use std::{any::Any, collections::HashMap};

use anyhow::Result;
use kstring::KString;

use domtag::indexed::IndexedMap;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("component type {0:?} was never registered")]
    UnknownAlias(KString),
    #[error("implementation {1:?} for component type {0:?} is not constructible")]
    UnresolvableImplementation(KString, KString),
    #[error("component type {0:?} is already registered")]
    DuplicateAlias(KString),
}

/// A renderable unit the registry can hand out. Consumers downcast to
/// the concrete type to configure it, then render.
pub trait Component: Any {
    fn render(&mut self) -> Result<String>;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Positional construction arguments; an empty slice means default
/// construction.
pub type Constructor = fn(&[KString]) -> Box<dyn Component>;

pub struct ComponentRegistry {
    // alias -> implementation identifier
    aliases: IndexedMap<KString>,
    // implementation identifier -> constructor
    constructors: HashMap<KString, Constructor>,
}

impl ComponentRegistry {
    pub fn new() -> ComponentRegistry {
        ComponentRegistry {
            aliases: IndexedMap::new(),
            constructors: HashMap::new(),
        }
    }

    /// Registers an alias. Re-registering an existing alias overwrites
    /// the previous mapping; last write wins.
    pub fn register(
        &mut self,
        alias: impl Into<KString>,
        implementation_id: impl Into<KString>,
    ) -> &mut ComponentRegistry {
        self.aliases.set(alias, implementation_id.into());
        self
    }

    /// Strict registration for callers that want duplicates rejected
    /// instead of overwritten.
    pub fn try_register(
        &mut self,
        alias: impl Into<KString>,
        implementation_id: impl Into<KString>,
    ) -> Result<&mut ComponentRegistry, RegistryError> {
        let alias = alias.into();
        if self.aliases.get(&alias).is_some() {
            return Err(RegistryError::DuplicateAlias(alias));
        }
        self.aliases.set(alias, implementation_id.into());
        Ok(self)
    }

    /// Declares a constructible implementation.
    pub fn provide(
        &mut self,
        implementation_id: impl Into<KString>,
        constructor: Constructor,
    ) -> &mut ComponentRegistry {
        self.constructors.insert(implementation_id.into(), constructor);
        self
    }

    pub fn implementation_id(&self, alias: &str) -> Option<&KString> {
        self.aliases.get(alias)
    }

    /// Constructs a fresh instance for `alias`. Every call returns a
    /// new, independent instance.
    pub fn factory(
        &self,
        alias: &str,
        args: &[KString],
    ) -> Result<Box<dyn Component>, RegistryError> {
        let implementation_id = self
            .aliases
            .get(alias)
            .ok_or_else(|| RegistryError::UnknownAlias(KString::from_ref(alias)))?;
        let constructor = self.constructors.get(implementation_id).ok_or_else(|| {
            RegistryError::UnresolvableImplementation(
                KString::from_ref(alias),
                implementation_id.clone(),
            )
        })?;
        Ok(constructor(args))
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use domtag::DomTag;

    use super::*;
    use crate::table::Table;

    fn registry() -> ComponentRegistry {
        let mut reg = ComponentRegistry::new();
        reg.provide("table::Table", |_args| Box::new(Table::new()));
        reg.register("simple", "table::Table");
        reg
    }

    #[test]
    fn t_factory_returns_independent_instances() {
        let reg = registry();
        let mut a = reg.factory("simple", &[]).unwrap();
        let b = reg.factory("simple", &[]).unwrap();
        let table: &mut Table = a.as_any_mut().downcast_mut().unwrap();
        table.tag_mut().set_id("only-a");
        let table_b: &Table = b.as_any().downcast_ref().unwrap();
        assert_eq!(table_b.tag().id(), None);
    }

    #[test]
    fn t_unknown_alias() {
        let reg = registry();
        match reg.factory("nonexistent", &[]) {
            Err(RegistryError::UnknownAlias(alias)) => assert_eq!(alias.as_str(), "nonexistent"),
            _ => panic!("expected UnknownAlias"),
        }
    }

    #[test]
    fn t_unresolvable_implementation() {
        let mut reg = registry();
        reg.register("broken", "no::such::Type");
        match reg.factory("broken", &[]) {
            Err(RegistryError::UnresolvableImplementation(alias, id)) => {
                assert_eq!(alias.as_str(), "broken");
                assert_eq!(id.as_str(), "no::such::Type");
            }
            _ => panic!("expected UnresolvableImplementation"),
        }
    }

    #[test]
    fn t_duplicate_register_overwrites() {
        let mut reg = registry();
        reg.register("simple", "other::Impl");
        assert_eq!(
            reg.implementation_id("simple").map(|id| id.as_str()),
            Some("other::Impl")
        );
    }

    #[test]
    fn t_try_register_rejects_duplicates() {
        let mut reg = registry();
        match reg.try_register("simple", "other::Impl") {
            Err(RegistryError::DuplicateAlias(alias)) => assert_eq!(alias.as_str(), "simple"),
            _ => panic!("expected DuplicateAlias"),
        }
        // the original mapping is untouched
        assert_eq!(
            reg.implementation_id("simple").map(|id| id.as_str()),
            Some("table::Table")
        );
    }
}
