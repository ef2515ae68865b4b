//! Attribute matching and diffing policy
//!
//! The idempotency check is a documented policy, not an implementation
//! detail: a candidate matches when every criteria key is present and
//! deep-equal in its attributes. Mappings compare order-insensitively,
//! sequences order-sensitively; extra attributes on the candidate are
//! ignored. This lets partial declarations (name alone) match without the
//! full remote schema.

use crate::kind::KindSpec;
use crate::types::Attributes;

/// Attribute keys that never participate in matching or convergence:
/// `uri` is server-generated identity, `query_parameters` only feeds
/// custom operations.
pub const NON_CONVERGED_KEYS: &[&str] = &["uri", "query_parameters"];

/// Subset check: every key in `criteria` present and deep-equal in
/// `candidate`.
pub fn subset_match(criteria: &Attributes, candidate: &Attributes) -> bool {
    criteria
        .iter()
        .all(|(key, value)| candidate.get(key) == Some(value))
}

/// Derive match criteria from declared attributes: the kind's match keys,
/// plus `uri` when explicitly declared (identity precedence is applied by
/// the existence resolver).
pub fn match_criteria(spec: &KindSpec, declared: &Attributes) -> Attributes {
    let mut criteria = Attributes::new();
    if let Some(uri) = declared.get("uri") {
        criteria.insert("uri".to_string(), uri.clone());
    }
    for key in spec.match_keys {
        if let Some(value) = declared.get(*key) {
            criteria.insert((*key).to_string(), value.clone());
        }
    }
    criteria
}

/// Keys whose declared value differs from the live record. Only declared
/// keys are compared, so unspecified remote fields are never reverted.
pub fn attribute_diff(declared: &Attributes, live: &Attributes) -> Vec<String> {
    declared
        .iter()
        .filter(|(key, _)| !NON_CONVERGED_KEYS.contains(&key.as_str()))
        .filter(|(key, value)| live.get(*key) != Some(value))
        .map(|(key, _)| key.clone())
        .collect()
}

/// Update payload: live attributes with the declared ones layered on top.
pub fn merge_for_update(live: &Attributes, declared: &Attributes) -> Attributes {
    let mut merged = live.clone();
    for (key, value) in declared {
        if NON_CONVERGED_KEYS.contains(&key.as_str()) {
            continue;
        }
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Create payload: declared attributes minus the non-converged keys.
pub fn create_payload(declared: &Attributes) -> Attributes {
    declared
        .iter()
        .filter(|(key, _)| !NON_CONVERGED_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::ResourceKind;
    use serde_json::json;

    fn attrs(value: serde_json::Value) -> Attributes {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_subset_match_ignores_extra_candidate_keys() {
        let criteria = attrs(json!({ "name": "DC1" }));
        let candidate = attrs(json!({ "name": "DC1", "width": 5000, "uri": "/rest/fake" }));
        assert!(subset_match(&criteria, &candidate));
    }

    #[test]
    fn test_subset_match_requires_every_criteria_key() {
        let criteria = attrs(json!({ "name": "DC1", "width": 5000 }));
        let candidate = attrs(json!({ "name": "DC1" }));
        assert!(!subset_match(&criteria, &candidate));
    }

    #[test]
    fn test_subset_match_is_deep_and_map_order_insensitive() {
        let criteria = attrs(json!({
            "connection": { "host": "172.18.15.1", "port": 5989 }
        }));
        let candidate = attrs(json!({
            "connection": { "port": 5989, "host": "172.18.15.1" },
            "state": "Managed"
        }));
        assert!(subset_match(&criteria, &candidate));
    }

    #[test]
    fn test_subset_match_sequences_are_order_sensitive() {
        let criteria = attrs(json!({ "tags": ["a", "b"] }));
        let reordered = attrs(json!({ "tags": ["b", "a"] }));
        assert!(!subset_match(&criteria, &reordered));

        let exact = attrs(json!({ "tags": ["a", "b"] }));
        assert!(subset_match(&criteria, &exact));
    }

    #[test]
    fn test_empty_criteria_match_everything() {
        let criteria = Attributes::new();
        let candidate = attrs(json!({ "name": "anything" }));
        assert!(subset_match(&criteria, &candidate));
    }

    #[test]
    fn test_match_criteria_restricts_to_match_keys() {
        let spec = ResourceKind::Datacenter.spec();
        let declared = attrs(json!({ "name": "DC1", "width": 5000, "depth": 5000 }));
        let criteria = match_criteria(spec, &declared);
        assert_eq!(criteria, attrs(json!({ "name": "DC1" })));
    }

    #[test]
    fn test_match_criteria_keeps_declared_uri() {
        let spec = ResourceKind::Datacenter.spec();
        let declared = attrs(json!({ "uri": "/rest/datacenters/9", "name": "DC1" }));
        let criteria = match_criteria(spec, &declared);
        assert_eq!(criteria.get("uri"), Some(&json!("/rest/datacenters/9")));
    }

    #[test]
    fn test_attribute_diff_only_compares_declared_keys() {
        let declared = attrs(json!({ "name": "DC1", "width": 6000 }));
        let live = attrs(json!({ "name": "DC1", "width": 5000, "depth": 5000 }));
        assert_eq!(attribute_diff(&declared, &live), vec!["width".to_string()]);

        let converged = attrs(json!({ "name": "DC1", "width": 5000 }));
        assert!(attribute_diff(&converged, &live).is_empty());
    }

    #[test]
    fn test_attribute_diff_treats_missing_live_key_as_changed() {
        let declared = attrs(json!({ "name": "DC1", "coolingCapacity": 5 }));
        let live = attrs(json!({ "name": "DC1" }));
        assert_eq!(
            attribute_diff(&declared, &live),
            vec!["coolingCapacity".to_string()]
        );
    }

    #[test]
    fn test_attribute_diff_skips_non_converged_keys() {
        let declared = attrs(json!({ "uri": "/rest/other", "query_parameters": {"a": 1} }));
        let live = attrs(json!({ "uri": "/rest/fake" }));
        assert!(attribute_diff(&declared, &live).is_empty());
    }

    #[test]
    fn test_merge_for_update_preserves_unspecified_fields() {
        let live = attrs(json!({ "name": "DC1", "width": 5000, "depth": 5000 }));
        let declared = attrs(json!({ "name": "DC1", "width": 6000 }));
        let merged = merge_for_update(&live, &declared);
        assert_eq!(merged.get("width"), Some(&json!(6000)));
        assert_eq!(merged.get("depth"), Some(&json!(5000)));
    }

    #[test]
    fn test_create_payload_drops_query_parameters() {
        let declared = attrs(json!({
            "name": "Profile",
            "query_parameters": { "enclosureGroupUri": "/rest/fake" }
        }));
        let payload = create_payload(&declared);
        assert_eq!(payload, attrs(json!({ "name": "Profile" })));
    }
}
