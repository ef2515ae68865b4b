//! # Reconcile
//!
//! A reconciliation engine for declarative infrastructure intent over a
//! versioned remote appliance API.
//!
//! The engine takes a declared resource (kind, ensure state, attributes,
//! API-version selector) and converges the appliance toward it:
//!
//! - **Registry**: resolves (kind, API version, hardware variant) to the
//!   concrete handler registered for that representation
//! - **Existence**: decides whether the declared resource already exists by
//!   matching a partial attribute set against the live collection
//! - **Engine**: maps named ensure states (not just present/absent) onto
//!   create, update, delete, and custom appliance operations, with
//!   idempotency and ambiguity safety
//! - **Error**: normalizes remote failures into a small taxonomy
//!
//! ## Example
//!
//! ```ignore
//! use reconcile::{DeclaredResource, Engine, HandlerRegistry, ResourceKind};
//!
//! let mut registry = HandlerRegistry::new();
//! registry.register(ResourceKind::Datacenter, 200, None, Box::new(client));
//!
//! let declared = DeclaredResource::new(ResourceKind::Datacenter, "dc1", "present")
//!     .with_attributes(serde_json::json!({ "name": "DC1", "width": 5000 }));
//!
//! let outcome = Engine::new(&registry).reconcile(&declared)?;
//! ```
//!
//! The engine holds no state between calls: every reconciliation re-resolves
//! existence against the live collection, and no record is ever cached.

pub mod collection;
pub mod engine;
pub mod error;
pub mod existence;
pub mod kind;
pub mod matching;
pub mod registry;
pub mod types;

pub use collection::{BoxedCollection, Collection, TransportFault};
pub use engine::Engine;
pub use error::{Error, ErrorCategory, Result};
pub use existence::resolve_existence;
pub use kind::{Action, KindSpec, ResourceKind, Scope};
pub use matching::{attribute_diff, subset_match};
pub use registry::HandlerRegistry;
pub use types::{Attributes, DeclaredResource, Existence, LiveRecord, Outcome};
