//! State reconciler
//!
//! One reconciliation call is synchronous and self-contained: validate the
//! declaration, resolve the handler, resolve existence, execute exactly one
//! action, return one outcome. Validation and handler resolution always
//! fail before any remote call; there is no internal retry and no partial
//! rollback once an action is dispatched.

use crate::collection::Collection;
use crate::error::{Error, Result};
use crate::existence::resolve_existence;
use crate::kind::{Action, KindSpec, ResourceKind, Scope};
use crate::matching::{attribute_diff, create_payload, match_criteria, merge_for_update};
use crate::registry::HandlerRegistry;
use crate::types::{Attributes, DeclaredResource, Existence, LiveRecord, Outcome};
use serde_json::Value;

/// The reconciliation engine. Holds only a registry reference; every call
/// re-resolves existence from the appliance.
pub struct Engine<'a> {
    registry: &'a HandlerRegistry,
}

impl<'a> Engine<'a> {
    pub fn new(registry: &'a HandlerRegistry) -> Self {
        Self { registry }
    }

    /// Converge one declared resource and return the terminal outcome.
    pub fn reconcile(&self, declared: &DeclaredResource) -> Result<Outcome> {
        let spec = declared.kind.spec();
        let action = spec.action_for(&declared.ensure).ok_or_else(|| Error::Validation {
            kind: declared.kind,
            message: format!(
                "unknown ensure state '{}' (legal states: {})",
                declared.ensure,
                spec.state_names().join(", ")
            ),
        })?;
        let attributes = validated_attributes(spec, declared, action)?;
        let handler = self.resolve_handler(declared)?;

        log::debug!(
            "reconciling {} '{}' toward '{}'",
            declared.kind,
            declared.name,
            declared.ensure
        );

        match action {
            Action::ReadVerify => {
                let criteria = match_criteria(spec, &attributes);
                match resolve_existence(handler, &criteria)? {
                    Existence::Found(record) => Ok(Outcome::Found(record)),
                    Existence::Absent => Err(Error::not_found(spec, &criteria)),
                    Existence::Ambiguous(candidates) => Err(Error::ambiguous(spec, &candidates)),
                }
            }
            Action::ConvergePresent => {
                let criteria = match_criteria(spec, &attributes);
                match resolve_existence(handler, &criteria)? {
                    Existence::Absent => {
                        let record = handler.create(&create_payload(&attributes))?;
                        log::info!("created {} at {}", declared.kind, record.uri);
                        Ok(Outcome::Created(record))
                    }
                    Existence::Found(live) => {
                        let changed = attribute_diff(&attributes, &live.attributes);
                        if changed.is_empty() {
                            return Ok(Outcome::Unchanged);
                        }
                        log::info!(
                            "updating {} at {} ({} drifted)",
                            declared.kind,
                            live.uri,
                            changed.join(", ")
                        );
                        let payload = merge_for_update(&live.attributes, &attributes);
                        let record = handler.update(&live.uri, &payload)?;
                        Ok(Outcome::Updated(record))
                    }
                    Existence::Ambiguous(candidates) => Err(Error::ambiguous(spec, &candidates)),
                }
            }
            Action::ConvergeAbsent => {
                let criteria = match_criteria(spec, &attributes);
                match resolve_existence(handler, &criteria)? {
                    Existence::Found(live) => {
                        handler.delete(&live.uri)?;
                        log::info!("deleted {} at {}", declared.kind, live.uri);
                        Ok(Outcome::Deleted)
                    }
                    Existence::Absent => Ok(Outcome::Unchanged),
                    Existence::Ambiguous(candidates) => Err(Error::ambiguous(spec, &candidates)),
                }
            }
            Action::Custom { op, scope } => {
                let parameters = (!attributes.is_empty()).then_some(&attributes);
                match scope {
                    Scope::Collection => {
                        let payload = handler.custom(op, None, parameters)?;
                        Ok(Outcome::ActionResult(payload))
                    }
                    Scope::Instance => {
                        let criteria = match_criteria(spec, &attributes);
                        match resolve_existence(handler, &criteria)? {
                            Existence::Found(record) => {
                                let payload = handler.custom(op, Some(&record), parameters)?;
                                Ok(Outcome::ActionResult(payload))
                            }
                            Existence::Absent => Err(Error::not_found(spec, &criteria)),
                            Existence::Ambiguous(candidates) => {
                                Err(Error::ambiguous(spec, &candidates))
                            }
                        }
                    }
                }
            }
        }
    }

    /// Read-only existence check for a declaration, without executing its
    /// ensure state. Used for status displays and dry runs.
    pub fn probe(&self, declared: &DeclaredResource) -> Result<Existence> {
        let spec = declared.kind.spec();
        let attributes = attributes_as_mapping(declared)?;
        let handler = self.resolve_handler(declared)?;
        let criteria = match_criteria(spec, &attributes);
        Ok(resolve_existence(handler, &criteria)?)
    }

    /// The full live collection for a kind, independent of any declaration.
    pub fn enumerate(
        &self,
        kind: ResourceKind,
        api_version: Option<u32>,
        variant: Option<&str>,
    ) -> Result<Vec<LiveRecord>> {
        let version = api_version.unwrap_or(kind.spec().default_api_version);
        let handler = self.registry.resolve(kind, version, variant)?;
        Ok(handler.fetch_all()?)
    }

    fn resolve_handler(&self, declared: &DeclaredResource) -> Result<&dyn Collection> {
        self.registry.resolve(
            declared.kind,
            declared.resolved_api_version(),
            declared.variant.as_deref(),
        )
    }
}

/// Shape-check the declared attributes and apply the kind's validation
/// predicate. Runs before handler resolution, so no malformed declaration
/// ever reaches the appliance.
fn validated_attributes(
    spec: &KindSpec,
    declared: &DeclaredResource,
    action: Action,
) -> Result<Attributes> {
    let attributes = attributes_as_mapping(declared)?;

    if matches!(action, Action::ConvergePresent | Action::ConvergeAbsent) {
        if declared.attributes.is_none() {
            return Err(Error::Validation {
                kind: declared.kind,
                message: format!("ensure state '{}' requires declared attributes", declared.ensure),
            });
        }
        if !attributes.contains_key("uri")
            && !spec.match_keys.iter().any(|key| attributes.contains_key(*key))
        {
            return Err(Error::Validation {
                kind: declared.kind,
                message: format!(
                    "attributes must include {} (or an explicit uri) to identify the resource",
                    spec.match_keys.join(" or ")
                ),
            });
        }
    }

    if let Some(validate) = spec.validate {
        validate(&declared.ensure, &attributes).map_err(|message| Error::Validation {
            kind: declared.kind,
            message,
        })?;
    }

    Ok(attributes)
}

fn attributes_as_mapping(declared: &DeclaredResource) -> Result<Attributes> {
    match &declared.attributes {
        None => Ok(Attributes::new()),
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(other) => Err(Error::Validation {
            kind: declared.kind,
            message: format!("attributes must be a mapping, got {}", value_type_name(other)),
        }),
    }
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
