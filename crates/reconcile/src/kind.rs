//! Resource-kind adapters
//!
//! Each kind is a static declaration: display name, the attribute subset
//! used for matching against the live collection, the default API version,
//! the legal ensure states tagged with their action class, and a validation
//! predicate. All dynamic behavior lives in the engine; adding a kind means
//! adding a table entry, not control flow.

use crate::types::Attributes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The resource kinds the engine knows how to reconcile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Datacenter,
    FcNetwork,
    SanManager,
    ServerProfile,
    Rack,
    GoldenImage,
}

impl ResourceKind {
    pub fn all() -> &'static [ResourceKind] {
        &[
            ResourceKind::Datacenter,
            ResourceKind::FcNetwork,
            ResourceKind::SanManager,
            ResourceKind::ServerProfile,
            ResourceKind::Rack,
            ResourceKind::GoldenImage,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::Datacenter => "datacenter",
            ResourceKind::FcNetwork => "fc_network",
            ResourceKind::SanManager => "san_manager",
            ResourceKind::ServerProfile => "server_profile",
            ResourceKind::Rack => "rack",
            ResourceKind::GoldenImage => "golden_image",
        }
    }

    pub fn from_name(name: &str) -> Option<ResourceKind> {
        match name {
            "datacenter" => Some(ResourceKind::Datacenter),
            "fc_network" => Some(ResourceKind::FcNetwork),
            "san_manager" => Some(ResourceKind::SanManager),
            "server_profile" => Some(ResourceKind::ServerProfile),
            "rack" => Some(ResourceKind::Rack),
            "golden_image" => Some(ResourceKind::GoldenImage),
            _ => None,
        }
    }

    /// The static adapter declaration for this kind.
    pub fn spec(&self) -> &'static KindSpec {
        match self {
            ResourceKind::Datacenter => &DATACENTER,
            ResourceKind::FcNetwork => &FC_NETWORK,
            ResourceKind::SanManager => &SAN_MANAGER,
            ResourceKind::ServerProfile => &SERVER_PROFILE,
            ResourceKind::Rack => &RACK,
            ResourceKind::GoldenImage => &GOLDEN_IMAGE,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scope of a custom operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Acts on the whole collection; no existence requirement.
    Collection,
    /// Acts on one live record; the declared resource must resolve to
    /// exactly one match.
    Instance,
}

/// Action class behind a named ensure state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Requires the resource to exist; never mutates.
    ReadVerify,
    /// Create when absent, diff-and-update when found.
    ConvergePresent,
    /// Delete when found, no-op when already absent.
    ConvergeAbsent,
    /// Named appliance operation, dispatched through the handler.
    Custom { op: &'static str, scope: Scope },
}

/// Per-kind validation predicate, applied before any remote call.
type ValidateFn = fn(ensure: &str, attributes: &Attributes) -> Result<(), String>;

/// Static adapter declaration for one resource kind.
pub struct KindSpec {
    pub kind: ResourceKind,
    /// Appliance-facing type name, used in operator-visible messages.
    pub display_name: &'static str,
    /// Attribute subset used as match criteria against the live collection.
    pub match_keys: &'static [&'static str],
    pub default_api_version: u32,
    /// Legal ensure states with their action classes.
    pub states: &'static [(&'static str, Action)],
    pub validate: Option<ValidateFn>,
}

impl KindSpec {
    /// Look up the action class for a named ensure state.
    pub fn action_for(&self, ensure: &str) -> Option<Action> {
        self.states
            .iter()
            .find(|(name, _)| *name == ensure)
            .map(|(_, action)| *action)
    }

    /// The legal ensure-state names, for operator-facing messages.
    pub fn state_names(&self) -> Vec<&'static str> {
        self.states.iter().map(|(name, _)| *name).collect()
    }
}

fn validate_rack(ensure: &str, attributes: &Attributes) -> Result<(), String> {
    if matches!(ensure, "add_rack_resource" | "remove_rack_resource") {
        match attributes.get("rackMounts") {
            Some(Value::Array(_)) => Ok(()),
            Some(_) => Err("rackMounts must be a sequence of mount entries".to_string()),
            None => Err(format!("'{ensure}' requires a rackMounts sequence")),
        }
    } else {
        Ok(())
    }
}

static DATACENTER: KindSpec = KindSpec {
    kind: ResourceKind::Datacenter,
    display_name: "Datacenter",
    match_keys: &["name"],
    default_api_version: 200,
    states: &[
        ("present", Action::ConvergePresent),
        ("absent", Action::ConvergeAbsent),
        ("found", Action::ReadVerify),
        (
            "get_visual_content",
            Action::Custom {
                op: "get_visual_content",
                scope: Scope::Instance,
            },
        ),
    ],
    validate: None,
};

static FC_NETWORK: KindSpec = KindSpec {
    kind: ResourceKind::FcNetwork,
    display_name: "FCNetwork",
    match_keys: &["name"],
    default_api_version: 200,
    states: &[
        ("present", Action::ConvergePresent),
        ("absent", Action::ConvergeAbsent),
        ("found", Action::ReadVerify),
    ],
    validate: None,
};

static SAN_MANAGER: KindSpec = KindSpec {
    kind: ResourceKind::SanManager,
    display_name: "SANManager",
    match_keys: &["providerDisplayName"],
    default_api_version: 200,
    states: &[
        ("present", Action::ConvergePresent),
        ("absent", Action::ConvergeAbsent),
        ("found", Action::ReadVerify),
    ],
    validate: None,
};

static SERVER_PROFILE: KindSpec = KindSpec {
    kind: ResourceKind::ServerProfile,
    display_name: "ServerProfile",
    match_keys: &["name"],
    default_api_version: 200,
    states: &[
        ("present", Action::ConvergePresent),
        ("absent", Action::ConvergeAbsent),
        ("found", Action::ReadVerify),
        (
            "update_from_template",
            Action::Custom {
                op: "update_from_template",
                scope: Scope::Instance,
            },
        ),
        (
            "get_compliance_preview",
            Action::Custom {
                op: "get_compliance_preview",
                scope: Scope::Instance,
            },
        ),
        (
            "get_transformation",
            Action::Custom {
                op: "get_transformation",
                scope: Scope::Instance,
            },
        ),
        (
            "get_messages",
            Action::Custom {
                op: "get_messages",
                scope: Scope::Instance,
            },
        ),
        (
            "get_available_targets",
            Action::Custom {
                op: "get_available_targets",
                scope: Scope::Collection,
            },
        ),
        (
            "get_available_networks",
            Action::Custom {
                op: "get_available_networks",
                scope: Scope::Collection,
            },
        ),
        (
            "get_available_servers",
            Action::Custom {
                op: "get_available_servers",
                scope: Scope::Collection,
            },
        ),
        (
            "get_profile_ports",
            Action::Custom {
                op: "get_profile_ports",
                scope: Scope::Collection,
            },
        ),
        (
            "get_available_storage_systems",
            Action::Custom {
                op: "get_available_storage_systems",
                scope: Scope::Collection,
            },
        ),
        (
            "get_sas_logical_jbods",
            Action::Custom {
                op: "get_sas_logical_jbods",
                scope: Scope::Collection,
            },
        ),
    ],
    validate: None,
};

static RACK: KindSpec = KindSpec {
    kind: ResourceKind::Rack,
    display_name: "Rack",
    match_keys: &["name"],
    default_api_version: 200,
    states: &[
        ("present", Action::ConvergePresent),
        ("absent", Action::ConvergeAbsent),
        ("found", Action::ReadVerify),
        (
            "get_device_topology",
            Action::Custom {
                op: "get_device_topology",
                scope: Scope::Instance,
            },
        ),
        (
            "add_rack_resource",
            Action::Custom {
                op: "add_rack_resource",
                scope: Scope::Instance,
            },
        ),
        (
            "remove_rack_resource",
            Action::Custom {
                op: "remove_rack_resource",
                scope: Scope::Instance,
            },
        ),
    ],
    validate: Some(validate_rack),
};

static GOLDEN_IMAGE: KindSpec = KindSpec {
    kind: ResourceKind::GoldenImage,
    display_name: "GoldenImage",
    match_keys: &["name"],
    default_api_version: 300,
    states: &[
        ("present", Action::ConvergePresent),
        ("absent", Action::ConvergeAbsent),
        ("found", Action::ReadVerify),
        (
            "download",
            Action::Custom {
                op: "download",
                scope: Scope::Instance,
            },
        ),
    ],
    validate: None,
};
