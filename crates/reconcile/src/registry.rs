//! Versioned handler registry
//!
//! Populated once at startup; resolution is a pure lookup. Precedence is
//! exact (kind, api_version, variant), then the (kind, api_version)
//! default-variant entry. There is no fallback across versions: an
//! unsupported version fails clearly.

use crate::collection::{BoxedCollection, Collection};
use crate::error::{Error, Result};
use crate::kind::ResourceKind;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct HandlerKey {
    kind: ResourceKind,
    api_version: u32,
    variant: Option<String>,
}

/// Immutable (after startup) table of (kind, api_version, variant) bindings.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<HandlerKey, BoxedCollection>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. `variant: None` is the default-variant entry for
    /// the (kind, api_version) pair. A later registration for the same key
    /// replaces the earlier one.
    pub fn register(
        &mut self,
        kind: ResourceKind,
        api_version: u32,
        variant: Option<&str>,
        handler: BoxedCollection,
    ) {
        self.handlers.insert(
            HandlerKey {
                kind,
                api_version,
                variant: variant.map(str::to_string),
            },
            handler,
        );
    }

    /// Resolve the concrete handler for a declared binding.
    pub fn resolve(
        &self,
        kind: ResourceKind,
        api_version: u32,
        variant: Option<&str>,
    ) -> Result<&dyn Collection> {
        let exact = HandlerKey {
            kind,
            api_version,
            variant: variant.map(str::to_string),
        };
        if let Some(handler) = self.handlers.get(&exact) {
            return Ok(handler.as_ref());
        }
        if variant.is_some() {
            let default = HandlerKey {
                kind,
                api_version,
                variant: None,
            };
            if let Some(handler) = self.handlers.get(&default) {
                return Ok(handler.as_ref());
            }
        }
        Err(Error::UnresolvedHandler {
            kind,
            api_version,
            variant: variant.map(str::to_string),
        })
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
