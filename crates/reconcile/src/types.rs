//! Core types for declared and live resources

use crate::kind::ResourceKind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attribute mapping shared by declared resources and live records.
pub type Attributes = Map<String, Value>;

/// A resource as declared by the operator.
///
/// `name` is an operator-facing label only; matching against the live
/// collection uses the kind's match keys inside `attributes` (or an explicit
/// `uri`), never the label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclaredResource {
    pub kind: ResourceKind,
    pub name: String,
    /// Named ensure state, one of the kind's legal states.
    pub ensure: String,
    /// Declared attribute mapping. Must be a JSON object when present;
    /// read-only ensure states may omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Value>,
    /// API version selector; the kind's default applies when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<u32>,
    /// Hardware-family variant tag (e.g. "Synergy", "C7000").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

impl DeclaredResource {
    pub fn new(kind: ResourceKind, name: impl Into<String>, ensure: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            ensure: ensure.into(),
            attributes: None,
            api_version: None,
            variant: None,
        }
    }

    pub fn with_attributes(mut self, attributes: Value) -> Self {
        self.attributes = Some(attributes);
        self
    }

    pub fn with_api_version(mut self, api_version: u32) -> Self {
        self.api_version = Some(api_version);
        self
    }

    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    /// The API version to resolve against, falling back to the kind default.
    pub fn resolved_api_version(&self) -> u32 {
        self.api_version
            .unwrap_or(self.kind.spec().default_api_version)
    }
}

/// The remote representation of a resource instance.
///
/// `uri` is assigned by the appliance on creation and is immutable; it is
/// the sole reliable identity key once the resource exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveRecord {
    pub uri: String,
    pub attributes: Attributes,
}

impl LiveRecord {
    pub fn new(uri: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            uri: uri.into(),
            attributes,
        }
    }

    /// The record's name attribute, when the appliance returned one.
    pub fn name(&self) -> Option<&str> {
        self.attributes.get("name").and_then(Value::as_str)
    }
}

/// Verdict of an existence resolution against the live collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Existence {
    Absent,
    Found(LiveRecord),
    /// More than one live record matched the criteria. Duplicate names are
    /// legal on the appliance; the declared attributes did not disambiguate.
    Ambiguous(Vec<LiveRecord>),
}

impl Existence {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// Terminal outcome of one reconciliation call.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Created(LiveRecord),
    Updated(LiveRecord),
    Deleted,
    /// Already converged; no mutation was performed.
    Unchanged,
    Found(LiveRecord),
    /// Opaque payload returned by a custom operation.
    ActionResult(Value),
}

impl Outcome {
    pub fn status(&self) -> &'static str {
        match self {
            Self::Created(_) => "created",
            Self::Updated(_) => "updated",
            Self::Deleted => "deleted",
            Self::Unchanged => "unchanged",
            Self::Found(_) => "found",
            Self::ActionResult(_) => "action-result",
        }
    }

    /// Whether the appliance was mutated.
    pub fn is_change(&self) -> bool {
        matches!(self, Self::Created(_) | Self::Updated(_) | Self::Deleted)
    }
}
