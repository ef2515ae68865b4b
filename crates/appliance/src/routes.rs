//! Static route table for custom operations
//!
//! Each (kind, op) pair a resource-kind adapter declares maps to one route
//! shape here. The table is data; the request mechanics live in
//! [`crate::rest`].

use reconcile::ResourceKind;

/// Collection endpoint for a kind.
pub fn endpoint(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Datacenter => "/rest/datacenters",
        ResourceKind::FcNetwork => "/rest/fc-networks",
        ResourceKind::SanManager => "/rest/fc-sans/device-managers",
        ResourceKind::ServerProfile => "/rest/server-profiles",
        ResourceKind::Rack => "/rest/racks",
        ResourceKind::GoldenImage => "/rest/golden-images",
    }
}

/// How a custom operation is carried over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// GET a sub-resource of the resolved record (`{uri}{suffix}`).
    InstanceGet(&'static str),
    /// GET a collection-level endpoint, with optional query parameters.
    CollectionGet(&'static str),
    /// PATCH the record back into compliance with its template.
    TemplatePatch,
    /// Merge declared rack mounts into the record and PUT it back.
    MountUpdate { add: bool },
}

/// Resolve the route for a custom operation.
pub fn route(kind: ResourceKind, op: &str) -> Option<Route> {
    match (kind, op) {
        (ResourceKind::Datacenter, "get_visual_content") => Some(Route::InstanceGet("/visualContent")),

        (ResourceKind::ServerProfile, "update_from_template") => Some(Route::TemplatePatch),
        (ResourceKind::ServerProfile, "get_compliance_preview") => {
            Some(Route::InstanceGet("/compliance-preview"))
        }
        (ResourceKind::ServerProfile, "get_transformation") => {
            Some(Route::InstanceGet("/transformation"))
        }
        (ResourceKind::ServerProfile, "get_messages") => Some(Route::InstanceGet("/messages")),
        (ResourceKind::ServerProfile, "get_available_targets") => {
            Some(Route::CollectionGet("/rest/server-profiles/available-targets"))
        }
        (ResourceKind::ServerProfile, "get_available_networks") => {
            Some(Route::CollectionGet("/rest/server-profiles/available-networks"))
        }
        (ResourceKind::ServerProfile, "get_available_servers") => {
            Some(Route::CollectionGet("/rest/server-profiles/available-servers"))
        }
        (ResourceKind::ServerProfile, "get_profile_ports") => {
            Some(Route::CollectionGet("/rest/server-profiles/profile-ports"))
        }
        (ResourceKind::ServerProfile, "get_available_storage_systems") => {
            Some(Route::CollectionGet("/rest/server-profiles/available-storage-systems"))
        }
        (ResourceKind::ServerProfile, "get_sas_logical_jbods") => {
            Some(Route::CollectionGet("/rest/sas-logical-jbods"))
        }

        (ResourceKind::Rack, "get_device_topology") => Some(Route::InstanceGet("/deviceTopology")),
        (ResourceKind::Rack, "add_rack_resource") => Some(Route::MountUpdate { add: true }),
        (ResourceKind::Rack, "remove_rack_resource") => Some(Route::MountUpdate { add: false }),

        (ResourceKind::GoldenImage, "download") => Some(Route::InstanceGet("/download")),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reconcile::Action;

    #[test]
    fn test_every_declared_custom_op_has_a_route() {
        for kind in ResourceKind::all() {
            for (state, action) in kind.spec().states {
                if let Action::Custom { op, .. } = action {
                    assert!(
                        route(*kind, op).is_some(),
                        "no route for {kind} op '{op}' (state '{state}')"
                    );
                }
            }
        }
    }

    #[test]
    fn test_unknown_op_has_no_route() {
        assert_eq!(route(ResourceKind::Datacenter, "get_device_topology"), None);
        assert_eq!(route(ResourceKind::Rack, "get_visual_content"), None);
    }

    #[test]
    fn test_every_kind_has_an_endpoint() {
        for kind in ResourceKind::all() {
            assert!(endpoint(*kind).starts_with("/rest/"));
        }
    }

    #[test]
    fn test_rack_mount_routes_distinguish_add_and_remove() {
        assert_eq!(
            route(ResourceKind::Rack, "add_rack_resource"),
            Some(Route::MountUpdate { add: true })
        );
        assert_eq!(
            route(ResourceKind::Rack, "remove_rack_resource"),
            Some(Route::MountUpdate { add: false })
        );
    }
}
