//! Error taxonomy for reconciliation
//!
//! Every failure leaving the engine is one of five kinds. Validation and
//! handler resolution are guaranteed to fail before any remote call; the
//! engine never retries on its own, it only classifies.

use crate::collection::TransportFault;
use crate::kind::{KindSpec, ResourceKind};
use crate::types::{Attributes, LiveRecord};

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse failure classification for caller-side policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// No handler registered for the requested binding.
    Resolution,
    /// Malformed declaration, rejected before any remote call.
    Validation,
    /// Remote call failed at the network/protocol layer (transient).
    Transport,
    /// The declared resource does not exist on the appliance.
    NotFound,
    /// More than one live record matched the declared criteria.
    Ambiguous,
}

impl ErrorCategory {
    /// Whether this category is typically transient and worth retrying.
    /// The engine itself never retries; this only advises the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Resolution => "No handler for the requested kind/version",
            Self::Validation => "Invalid resource declaration",
            Self::Transport => "Appliance request failed",
            Self::NotFound => "Resource not found on the appliance",
            Self::Ambiguous => "Declared data matches more than one resource",
        }
    }
}

/// Failures surfaced by [`crate::Engine`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No registered handler matches (kind, api_version, variant).
    #[error(
        "no handler registered for {kind} at API version {api_version}, variant {}",
        variant.as_deref().unwrap_or("default")
    )]
    UnresolvedHandler {
        kind: ResourceKind,
        api_version: u32,
        variant: Option<String>,
    },

    /// The declaration is malformed; raised before any remote call.
    #[error("invalid {kind} declaration: {message}")]
    Validation { kind: ResourceKind, message: String },

    /// A remote call failed; the failing operation is named verbatim.
    #[error("{operation} failed against the appliance: {message}")]
    Transport {
        operation: String,
        message: String,
        status: Option<u16>,
    },

    /// Read-verify or an instance-scoped custom action on an absent resource.
    #[error("No {kind} with the specified data were found on the appliance (criteria: {criteria})")]
    NotFound {
        kind: &'static str,
        criteria: String,
    },

    /// The declared criteria matched several records; refusing to guess.
    #[error("{count} {kind} records match the declared data: {}", uris.join(", "))]
    AmbiguousMatch {
        kind: &'static str,
        count: usize,
        uris: Vec<String>,
    },
}

impl Error {
    pub fn not_found(spec: &KindSpec, criteria: &Attributes) -> Self {
        Self::NotFound {
            kind: spec.display_name,
            criteria: serde_json::Value::Object(criteria.clone()).to_string(),
        }
    }

    pub fn ambiguous(spec: &KindSpec, candidates: &[LiveRecord]) -> Self {
        Self::AmbiguousMatch {
            kind: spec.display_name,
            count: candidates.len(),
            uris: candidates.iter().map(|r| r.uri.clone()).collect(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::UnresolvedHandler { .. } => ErrorCategory::Resolution,
            Error::Validation { .. } => ErrorCategory::Validation,
            Error::Transport { .. } => ErrorCategory::Transport,
            Error::NotFound { .. } => ErrorCategory::NotFound,
            Error::AmbiguousMatch { .. } => ErrorCategory::Ambiguous,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }
}

impl From<TransportFault> for Error {
    fn from(fault: TransportFault) -> Self {
        Self::Transport {
            operation: fault.operation,
            message: fault.message,
            status: fault.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_only_transport_is_retryable() {
        assert!(ErrorCategory::Transport.is_retryable());
        assert!(!ErrorCategory::Resolution.is_retryable());
        assert!(!ErrorCategory::Validation.is_retryable());
        assert!(!ErrorCategory::NotFound.is_retryable());
        assert!(!ErrorCategory::Ambiguous.is_retryable());
    }

    #[test]
    fn test_unresolved_handler_names_the_binding() {
        let err = Error::UnresolvedHandler {
            kind: ResourceKind::ServerProfile,
            api_version: 500,
            variant: Some("Synergy".into()),
        };
        assert_eq!(err.category(), ErrorCategory::Resolution);
        let message = err.to_string();
        assert!(message.contains("server_profile"));
        assert!(message.contains("500"));
        assert!(message.contains("Synergy"));
    }

    #[test]
    fn test_not_found_names_kind_and_criteria() {
        let mut criteria = Attributes::new();
        criteria.insert(
            "providerDisplayName".into(),
            json!("Brocade Network Advisor"),
        );
        let err = Error::not_found(ResourceKind::SanManager.spec(), &criteria);
        let message = err.to_string();
        assert!(message.contains("No SANManager with the specified data were found"));
        assert!(message.contains("Brocade Network Advisor"));
    }

    #[test]
    fn test_ambiguous_carries_count_and_uris() {
        let records = vec![
            LiveRecord::new("/rest/datacenters/1", Attributes::new()),
            LiveRecord::new("/rest/datacenters/2", Attributes::new()),
        ];
        let err = Error::ambiguous(ResourceKind::Datacenter.spec(), &records);
        match &err {
            Error::AmbiguousMatch { count, uris, .. } => {
                assert_eq!(*count, 2);
                assert_eq!(uris.len(), 2);
            }
            other => panic!("expected AmbiguousMatch, got {other:?}"),
        }
        assert!(err.to_string().contains("/rest/datacenters/2"));
    }

    #[test]
    fn test_transport_fault_converts_with_operation() {
        let fault = TransportFault::new("delete", "HTTP 503").with_status(503);
        let err: Error = fault.into();
        assert!(err.is_retryable());
        assert!(err.to_string().contains("delete failed against the appliance"));
    }
}
