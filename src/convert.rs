//! Conversion between Bolt values and the JSON wire form.
//!
//! Query results come back from the driver as [`BoltType`] trees. Before
//! they cross the process boundary they are converted into plain tagged
//! JSON: nodes, relationships and paths become `{"_type": ...}` objects,
//! collections recurse, primitives pass through. The output is always
//! tree-shaped; entity back-references are flattened to identity strings.
//!
//! The reverse direction ([`json_to_bolt`]) covers query parameters.

use neo4rs::{
    BoltBoolean, BoltFloat, BoltInteger, BoltList, BoltMap, BoltNode, BoltNull, BoltPath,
    BoltRelation, BoltString, BoltType, BoltUnboundedRelation,
};
use serde_json::{Map, Value as JsonValue};

use crate::error::{McpError, Result};

/// Largest integer magnitude exactly representable as a JSON number by
/// every consumer (2^53 - 1, the IEEE-754 double mantissa limit).
///
/// Bolt integers are 64-bit. Values beyond this bound would silently
/// lose precision in a JavaScript-side caller, so they are emitted as
/// decimal strings instead of numbers.
const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;

/// Convert a Bolt value to its JSON wire form.
///
/// Total over anything the driver can produce: unrecognized Bolt kinds
/// (temporal, spatial) degrade to their debug string rather than fault.
pub fn bolt_to_json(value: &BoltType) -> JsonValue {
    match value {
        BoltType::Null(_) => JsonValue::Null,
        BoltType::Boolean(b) => JsonValue::Bool(b.value),
        BoltType::Integer(i) => int_to_json(i.value),
        BoltType::Float(f) => serde_json::Number::from_f64(f.value)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        BoltType::String(s) => JsonValue::String(s.value.clone()),
        BoltType::Bytes(b) => {
            JsonValue::Array(b.value.iter().map(|&byte| JsonValue::from(byte)).collect())
        }
        BoltType::List(list) => JsonValue::Array(list.value.iter().map(bolt_to_json).collect()),
        BoltType::Map(map) => JsonValue::Object(map_to_json(map)),
        BoltType::Node(node) => node_to_json(node),
        BoltType::Relation(rel) => relation_to_json(rel),
        // An unbound relationship outside a path has no endpoint identities.
        BoltType::UnboundedRelation(rel) => serde_json::json!({
            "_type": "Relationship",
            "id": rel.id.value.to_string(),
            "type": rel.typ.value.clone(),
            "properties": map_to_json(&rel.properties),
        }),
        BoltType::Path(path) => path_to_json(path),
        other => JsonValue::String(format!("{:?}", other)),
    }
}

fn int_to_json(value: i64) -> JsonValue {
    // unsigned_abs: i64::MIN has no i64-representable absolute value.
    if value.unsigned_abs() <= MAX_SAFE_INTEGER as u64 {
        JsonValue::from(value)
    } else {
        JsonValue::String(value.to_string())
    }
}

fn map_to_json(map: &BoltMap) -> Map<String, JsonValue> {
    map.value
        .iter()
        .map(|(key, value)| (key.value.clone(), bolt_to_json(value)))
        .collect()
}

fn node_to_json(node: &BoltNode) -> JsonValue {
    serde_json::json!({
        "_type": "Node",
        "id": node.id.value.to_string(),
        "labels": node.labels.value.iter().map(bolt_to_json).collect::<Vec<_>>(),
        "properties": map_to_json(&node.properties),
    })
}

/// Endpoints become identity strings, never nested node objects. A caller
/// that needs endpoint detail returns the nodes in the same row.
fn relation_to_json(rel: &BoltRelation) -> JsonValue {
    serde_json::json!({
        "_type": "Relationship",
        "id": rel.id.value.to_string(),
        "type": rel.typ.value.clone(),
        "properties": map_to_json(&rel.properties),
        "start": rel.start_node_id.value.to_string(),
        "end": rel.end_node_id.value.to_string(),
    })
}

/// Relationships inside a path carry no endpoints of their own; the
/// identities are supplied from the walk that reconstructed the segment.
fn path_rel_to_json(rel: &BoltUnboundedRelation, start_id: i64, end_id: i64) -> JsonValue {
    serde_json::json!({
        "_type": "Relationship",
        "id": rel.id.value.to_string(),
        "type": rel.typ.value.clone(),
        "properties": map_to_json(&rel.properties),
        "start": start_id.to_string(),
        "end": end_id.to_string(),
    })
}

/// Convert a Bolt path to its wire form.
///
/// The Bolt encoding ships a node list, an unbound relationship list and
/// an alternating index sequence: (signed 1-based relationship index,
/// 0-based node index) per segment, where a negative relationship index
/// means the relationship was traversed against its direction. The walk
/// starts at `nodes[0]`. A path of length N always yields exactly N
/// segments, regardless of cycles in the underlying graph.
fn path_to_json(path: &BoltPath) -> JsonValue {
    let nodes: Vec<&BoltNode> = path
        .nodes
        .value
        .iter()
        .filter_map(|n| match n {
            BoltType::Node(node) => Some(node),
            _ => None,
        })
        .collect();
    let rels: Vec<&BoltUnboundedRelation> = path
        .rels
        .value
        .iter()
        .filter_map(|r| match r {
            BoltType::UnboundedRelation(rel) => Some(rel),
            _ => None,
        })
        .collect();
    let indices: Vec<i64> = path
        .indices
        .value
        .iter()
        .filter_map(|i| match i {
            BoltType::Integer(i) => Some(i.value),
            _ => None,
        })
        .collect();

    let Some(&first) = nodes.first() else {
        return serde_json::json!({
            "_type": "Path",
            "start": JsonValue::Null,
            "end": JsonValue::Null,
            "segments": Vec::<JsonValue>::new(),
        });
    };

    let mut segments = Vec::new();
    let mut current = first;
    for pair in indices.chunks(2) {
        let (&rel_index, &node_index) = match (pair.first(), pair.get(1)) {
            (Some(r), Some(n)) => (r, n),
            _ => break,
        };
        let Some(&rel) = rels.get((rel_index.unsigned_abs() as usize).saturating_sub(1)) else {
            break;
        };
        let Some(&next) = nodes.get(node_index as usize) else {
            break;
        };

        let (start_id, end_id) = if rel_index < 0 {
            (next.id.value, current.id.value)
        } else {
            (current.id.value, next.id.value)
        };
        segments.push(serde_json::json!({
            "start": node_to_json(current),
            "relationship": path_rel_to_json(rel, start_id, end_id),
            "end": node_to_json(next),
        }));
        current = next;
    }

    serde_json::json!({
        "_type": "Path",
        "start": node_to_json(first),
        "end": node_to_json(current),
        "segments": segments,
    })
}

/// Convert a JSON value to a Bolt value for use as a query parameter.
pub fn json_to_bolt(json: &JsonValue) -> Result<BoltType> {
    match json {
        JsonValue::Null => Ok(BoltType::Null(BoltNull)),
        JsonValue::Bool(b) => Ok(BoltType::Boolean(BoltBoolean::new(*b))),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(BoltType::Integer(BoltInteger::new(i)))
            } else if let Some(f) = n.as_f64() {
                Ok(BoltType::Float(BoltFloat::new(f)))
            } else {
                Err(McpError::InvalidArg {
                    name: "params".to_string(),
                    reason: "Number out of range".to_string(),
                })
            }
        }
        JsonValue::String(s) => Ok(BoltType::String(BoltString::new(s))),
        JsonValue::Array(arr) => {
            let items: Result<Vec<BoltType>> = arr.iter().map(json_to_bolt).collect();
            Ok(BoltType::List(BoltList::from(items?)))
        }
        JsonValue::Object(obj) => {
            let mut map = BoltMap::default();
            for (key, value) in obj {
                map.put(BoltString::new(key), json_to_bolt(value)?);
            }
            Ok(BoltType::Map(map))
        }
    }
}

/// Helper to get a required string argument from JSON arguments.
pub fn get_string_arg(args: &Map<String, JsonValue>, name: &str) -> Result<String> {
    args.get(name)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| McpError::MissingArg(name.to_string()))
}

/// Helper to get an optional object argument, defaulting to empty.
pub fn get_optional_object(args: &Map<String, JsonValue>, name: &str) -> Result<Map<String, JsonValue>> {
    match args.get(name) {
        Some(JsonValue::Object(obj)) => Ok(obj.clone()),
        Some(JsonValue::Null) | None => Ok(Map::new()),
        Some(_) => Err(McpError::InvalidArg {
            name: name.to_string(),
            reason: "expected an object".to_string(),
        }),
    }
}
