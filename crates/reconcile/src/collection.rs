//! Remote collection capability consumed by the engine
//!
//! The [`Collection`] trait abstracts one resource collection on the
//! appliance at a fixed (kind, API version, variant) binding, enabling:
//! - the real REST client
//! - recording stubs for tests
//!
//! All calls are blocking with no internal timeout or retry; callers own
//! that policy.

use crate::types::{Attributes, LiveRecord};
use serde_json::Value;

/// A remote call that failed at the network or protocol layer.
///
/// Carries the failing operation name so the engine can surface it verbatim.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{operation}: {message}")]
pub struct TransportFault {
    pub operation: String,
    pub message: String,
    pub status: Option<u16>,
}

impl TransportFault {
    pub fn new(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

/// One resource collection on the appliance.
///
/// `custom` dispatches the named operations a kind declares beyond CRUD.
/// Instance-scoped operations receive the resolved live record;
/// collection-scoped operations receive `None`. `parameters` is the declared
/// attribute mapping, from which implementations pick what they need (query
/// parameters, rack mounts, ...).
pub trait Collection: Send + Sync {
    /// The full live collection, for inventory listing.
    fn fetch_all(&self) -> Result<Vec<LiveRecord>, TransportFault>;

    /// Live records matching the criteria. Implementations may return a
    /// superset; the existence resolver re-applies the subset check locally.
    fn list_matching(&self, criteria: &Attributes) -> Result<Vec<LiveRecord>, TransportFault>;

    /// Exact identity lookup. `Ok(None)` when the uri does not resolve.
    fn fetch_by_uri(&self, uri: &str) -> Result<Option<LiveRecord>, TransportFault>;

    fn create(&self, attributes: &Attributes) -> Result<LiveRecord, TransportFault>;

    fn update(&self, uri: &str, attributes: &Attributes) -> Result<LiveRecord, TransportFault>;

    fn delete(&self, uri: &str) -> Result<(), TransportFault>;

    fn custom(
        &self,
        op: &str,
        target: Option<&LiveRecord>,
        parameters: Option<&Attributes>,
    ) -> Result<Value, TransportFault>;
}

/// A boxed collection for registry storage.
pub type BoxedCollection = Box<dyn Collection>;
