//! Existence resolution against the live collection

use crate::collection::{Collection, TransportFault};
use crate::matching::subset_match;
use crate::types::{Attributes, Existence};
use serde_json::Value;

/// Decide whether a declared resource currently exists.
///
/// A declared `uri` is an exact identity claim and always wins over
/// attribute matching: a hit is `Found` regardless of any other attribute
/// mismatch, a miss is `Absent` (a declared identity cannot be satisfied by
/// a different record). Without a uri, the criteria are subset-matched
/// locally against the listed records, so the policy holds even when the
/// remote side returns a superset.
pub fn resolve_existence(
    handler: &dyn Collection,
    criteria: &Attributes,
) -> Result<Existence, TransportFault> {
    if let Some(Value::String(uri)) = criteria.get("uri") {
        return Ok(match handler.fetch_by_uri(uri)? {
            Some(record) => Existence::Found(record),
            None => Existence::Absent,
        });
    }

    let mut matches: Vec<_> = handler
        .list_matching(criteria)?
        .into_iter()
        .filter(|record| subset_match(criteria, &record.attributes))
        .collect();

    Ok(match matches.len() {
        0 => Existence::Absent,
        1 => Existence::Found(matches.remove(0)),
        _ => Existence::Ambiguous(matches),
    })
}
