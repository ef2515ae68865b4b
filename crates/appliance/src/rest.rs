//! REST implementation of the collection capability
//!
//! One [`RestCollection`] binds a single resource kind on one appliance at
//! one API version. The engine talks to it through the `Collection` trait;
//! every request carries the session token and the `X-Api-Version` header.

use crate::config;
use crate::error::{Error, Result};
use crate::routes::{self, Route};
use crate::session::{self, Session};
use reconcile::{Attributes, Collection, LiveRecord, ResourceKind, TransportFault, subset_match};
use serde_json::{Value, json};
use std::collections::HashSet;

/// An authenticated connection to one appliance.
pub struct Appliance {
    agent: ureq::Agent,
    base: String,
    session: Session,
    api_version: u32,
}

impl Appliance {
    /// Log in and return a connected appliance.
    pub fn connect(host: &str, username: &str, password: &str, api_version: u32) -> Result<Self> {
        let agent = ureq::Agent::new_with_defaults();
        let base = config::base_url(host);
        let session = session::login(&agent, &base, username, password, api_version)?;
        log::info!("authenticated against {base} (API version {api_version})");
        Ok(Self {
            agent,
            base,
            session,
            api_version,
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The collection handler for one resource kind on this appliance.
    pub fn collection(&self, kind: ResourceKind) -> RestCollection {
        RestCollection {
            agent: self.agent.clone(),
            base: self.base.clone(),
            token: self.session.token.clone(),
            api_version: self.api_version,
            kind,
        }
    }
}

/// One resource collection on the appliance, at a fixed API version.
pub struct RestCollection {
    agent: ureq::Agent,
    base: String,
    token: String,
    api_version: u32,
    kind: ResourceKind,
}

impl RestCollection {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn get(&self, path: &str) -> Result<Value> {
        let url = self.url(path);
        let mut response = self
            .agent
            .get(&url)
            .header("Auth", self.token.as_str())
            .header("X-Api-Version", self.api_version.to_string())
            .header("Accept", "application/json")
            .call()?;
        let text = response.body_mut().read_to_string()?;
        // Some operations (visual content, downloads) return raw text.
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }

    fn send(&self, method: &str, path: &str, body: &Value) -> Result<Value> {
        let url = self.url(path);
        let request = match method {
            "POST" => self.agent.post(&url),
            "PUT" => self.agent.put(&url),
            "PATCH" => self.agent.patch(&url),
            other => return Err(Error::Config(format!("unsupported method {other}"))),
        };
        let mut response = request
            .header("Auth", self.token.as_str())
            .header("X-Api-Version", self.api_version.to_string())
            .header("Content-Type", "application/json")
            .send_json(body)?;
        Ok(response.body_mut().read_json()?)
    }

    fn delete_request(&self, path: &str) -> Result<()> {
        let url = self.url(path);
        self.agent
            .delete(&url)
            .header("Auth", self.token.as_str())
            .header("X-Api-Version", self.api_version.to_string())
            .call()?;
        Ok(())
    }

    fn record_from(value: Value) -> Result<LiveRecord> {
        let Value::Object(attributes) = value else {
            return Err(Error::InvalidResponse("expected a resource object".into()));
        };
        let uri = attributes
            .get("uri")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::InvalidResponse("resource record is missing its uri".into()))?
            .to_string();
        Ok(LiveRecord::new(uri, attributes))
    }

    fn members(value: Value) -> Vec<Value> {
        match value {
            Value::Object(mut map) => match map.remove("members") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
            Value::Array(items) => items,
            _ => Vec::new(),
        }
    }

    fn fault(&self, operation: &str, err: Error) -> TransportFault {
        let fault = TransportFault::new(operation, err.to_string());
        match err.status() {
            Some(status) => fault.with_status(status),
            None => fault,
        }
    }

    fn fetch_records(&self, operation: &str) -> std::result::Result<Vec<LiveRecord>, TransportFault> {
        let value = self
            .get(routes::endpoint(self.kind))
            .map_err(|e| self.fault(operation, e))?;
        Self::members(value)
            .into_iter()
            .map(|member| Self::record_from(member).map_err(|e| self.fault(operation, e)))
            .collect()
    }

    fn dispatch_custom(
        &self,
        op: &str,
        target: Option<&LiveRecord>,
        parameters: Option<&Attributes>,
    ) -> Result<Value> {
        let route = routes::route(self.kind, op).ok_or_else(|| Error::UnknownOperation {
            kind: self.kind.to_string(),
            op: op.to_string(),
        })?;

        match route {
            Route::InstanceGet(suffix) => {
                let record = require_target(op, target)?;
                self.get(&format!("{}{suffix}{}", record.uri, query_suffix(parameters)))
            }
            Route::CollectionGet(path) => {
                self.get(&format!("{path}{}", query_suffix(parameters)))
            }
            Route::TemplatePatch => {
                let record = require_target(op, target)?;
                let body = json!([
                    { "op": "replace", "path": "/templateCompliance", "value": "Compliant" }
                ]);
                self.send("PATCH", &record.uri, &body)
            }
            Route::MountUpdate { add } => {
                let record = require_target(op, target)?;
                let declared = parameters
                    .and_then(|p| p.get("rackMounts"))
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();
                let mut attributes = record.attributes.clone();
                let existing = attributes
                    .get("rackMounts")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();
                attributes.insert(
                    "rackMounts".into(),
                    Value::Array(merged_mounts(existing, declared, add)),
                );
                self.send("PUT", &record.uri, &Value::Object(attributes))
            }
        }
    }
}

fn require_target<'r>(op: &str, target: Option<&'r LiveRecord>) -> Result<&'r LiveRecord> {
    target.ok_or_else(|| Error::Config(format!("operation '{op}' requires a resolved record")))
}

/// Merge declared rack mounts into the live set: append on add, drop the
/// entries whose `mountUri` is named on remove.
fn merged_mounts(existing: Vec<Value>, declared: Vec<Value>, add: bool) -> Vec<Value> {
    if add {
        let mut merged = existing;
        merged.extend(declared);
        return merged;
    }
    let removed: HashSet<&str> = declared
        .iter()
        .filter_map(|mount| mount.get("mountUri").and_then(Value::as_str))
        .collect();
    existing
        .into_iter()
        .filter(|mount| {
            mount
                .get("mountUri")
                .and_then(Value::as_str)
                .is_none_or(|uri| !removed.contains(uri))
        })
        .collect()
}

/// Render declared `query_parameters` as a URL query suffix.
fn query_suffix(parameters: Option<&Attributes>) -> String {
    let Some(params) = parameters
        .and_then(|p| p.get("query_parameters"))
        .and_then(Value::as_object)
    else {
        return String::new();
    };
    let pairs: Vec<String> = params
        .iter()
        .map(|(key, value)| {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!("{key}={rendered}")
        })
        .collect();
    if pairs.is_empty() {
        String::new()
    } else {
        format!("?{}", pairs.join("&"))
    }
}

impl Collection for RestCollection {
    fn fetch_all(&self) -> std::result::Result<Vec<LiveRecord>, TransportFault> {
        self.fetch_records("fetch_all")
    }

    fn list_matching(
        &self,
        criteria: &Attributes,
    ) -> std::result::Result<Vec<LiveRecord>, TransportFault> {
        // The appliance filter grammar differs across versions; fetch the
        // collection and apply the subset policy locally instead.
        let records = self.fetch_records("list_matching")?;
        Ok(records
            .into_iter()
            .filter(|record| subset_match(criteria, &record.attributes))
            .collect())
    }

    fn fetch_by_uri(
        &self,
        uri: &str,
    ) -> std::result::Result<Option<LiveRecord>, TransportFault> {
        match self.get(uri) {
            Ok(value) => Self::record_from(value)
                .map(Some)
                .map_err(|e| self.fault("fetch_by_uri", e)),
            Err(Error::Http {
                status: Some(404), ..
            }) => Ok(None),
            Err(err) => Err(self.fault("fetch_by_uri", err)),
        }
    }

    fn create(
        &self,
        attributes: &Attributes,
    ) -> std::result::Result<LiveRecord, TransportFault> {
        let value = self
            .send("POST", routes::endpoint(self.kind), &Value::Object(attributes.clone()))
            .map_err(|e| self.fault("create", e))?;
        Self::record_from(value).map_err(|e| self.fault("create", e))
    }

    fn update(
        &self,
        uri: &str,
        attributes: &Attributes,
    ) -> std::result::Result<LiveRecord, TransportFault> {
        let value = self
            .send("PUT", uri, &Value::Object(attributes.clone()))
            .map_err(|e| self.fault("update", e))?;
        Self::record_from(value).map_err(|e| self.fault("update", e))
    }

    fn delete(&self, uri: &str) -> std::result::Result<(), TransportFault> {
        self.delete_request(uri).map_err(|e| self.fault("delete", e))
    }

    fn custom(
        &self,
        op: &str,
        target: Option<&LiveRecord>,
        parameters: Option<&Attributes>,
    ) -> std::result::Result<Value, TransportFault> {
        self.dispatch_custom(op, target, parameters)
            .map_err(|e| self.fault(op, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_members_extracts_the_collection_page() {
        let page = json!({ "total": 2, "members": [{ "uri": "/rest/a" }, { "uri": "/rest/b" }] });
        assert_eq!(RestCollection::members(page).len(), 2);

        let bare = json!([{ "uri": "/rest/a" }]);
        assert_eq!(RestCollection::members(bare).len(), 1);

        assert!(RestCollection::members(json!("nope")).is_empty());
    }

    #[test]
    fn test_record_from_requires_a_uri() {
        let record =
            RestCollection::record_from(json!({ "uri": "/rest/racks/1", "name": "Rack-1" }))
                .unwrap();
        assert_eq!(record.uri, "/rest/racks/1");
        assert_eq!(record.name(), Some("Rack-1"));

        assert!(RestCollection::record_from(json!({ "name": "no-uri" })).is_err());
        assert!(RestCollection::record_from(json!("not-an-object")).is_err());
    }

    #[test]
    fn test_query_suffix_reads_declared_query_parameters() {
        let attrs: Attributes = json!({
            "query_parameters": { "enclosureGroupUri": "/rest/fake", "count": 8 }
        })
        .as_object()
        .unwrap()
        .clone();

        let suffix = query_suffix(Some(&attrs));
        assert!(suffix.starts_with('?'));
        assert!(suffix.contains("enclosureGroupUri=/rest/fake"));
        assert!(suffix.contains("count=8"));

        assert_eq!(query_suffix(None), "");
        let plain: Attributes = json!({ "name": "x" }).as_object().unwrap().clone();
        assert_eq!(query_suffix(Some(&plain)), "");
    }

    #[test]
    fn test_merged_mounts_appends_on_add() {
        let existing = vec![json!({ "mountUri": "/rest/server-hardware/a", "topUSlot": 10 })];
        let declared = vec![json!({ "mountUri": "/rest/server-hardware/b", "topUSlot": 20 })];
        let merged = merged_mounts(existing, declared, true);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merged_mounts_removes_by_mount_uri() {
        let existing = vec![
            json!({ "mountUri": "/rest/server-hardware/a", "topUSlot": 10 }),
            json!({ "mountUri": "/rest/server-hardware/b", "topUSlot": 20 }),
        ];
        let declared = vec![json!({ "mountUri": "/rest/server-hardware/a" })];
        let merged = merged_mounts(existing, declared, false);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0]["mountUri"], "/rest/server-hardware/b");
    }

    #[test]
    fn test_merged_mounts_keeps_entries_without_mount_uri_on_remove() {
        let existing = vec![json!({ "topUSlot": 10 })];
        let merged = merged_mounts(existing, vec![json!({ "mountUri": "/rest/x" })], false);
        assert_eq!(merged.len(), 1);
    }
}
