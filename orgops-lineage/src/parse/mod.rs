//! Forgiving input parsing for lineage operations
//!
//! Accepts several JSON shapes and normalizes them into typed requests, so
//! nothing loosely typed reaches the editor.

use crate::context::LineageContext;
use crate::error::{LineageError, Result};
use crate::lineage::{CreateLineage, DeleteLineage, GetLineage, ListLineages, UpdateLineage};
use crate::position::ListPositions;
use crate::processor::LineageOperationProcessor;
use crate::types::PositionId;
use orgops_operations::OperationProcessor;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Create,
    Update,
    Delete,
    Get,
    List,
}

impl Verb {
    pub fn from_alias(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "create" | "add" | "new" => Some(Self::Create),
            "update" | "edit" | "modify" | "replace" => Some(Self::Update),
            "delete" | "remove" | "rm" => Some(Self::Delete),
            "get" | "show" | "read" => Some(Self::Get),
            "list" | "ls" => Some(Self::List),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Noun {
    Lineage,
    Position,
}

impl Noun {
    /// Singular and plural forms both parse
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "lineage" | "lineages" => Some(Self::Lineage),
            "position" | "positions" => Some(Self::Position),
            _ => None,
        }
    }
}

/// A parsed, typed request ready to run
#[derive(Debug, Clone)]
pub enum LineageRequest {
    Create(CreateLineage),
    Update(UpdateLineage),
    Delete(DeleteLineage),
    Get(GetLineage),
    List(ListLineages),
    ListPositions(ListPositions),
}

impl LineageRequest {
    /// Run the request through `processor`
    pub async fn dispatch(
        &self,
        processor: &LineageOperationProcessor,
        ctx: &LineageContext,
    ) -> Result<Value> {
        match self {
            Self::Create(op) => processor.process(op, ctx).await,
            Self::Update(op) => processor.process(op, ctx).await,
            Self::Delete(op) => processor.process(op, ctx).await,
            Self::Get(op) => processor.process(op, ctx).await,
            Self::List(op) => processor.process(op, ctx).await,
            Self::ListPositions(op) => processor.process(op, ctx).await,
        }
    }
}

/// Parse input JSON into one or more requests
pub fn parse_input(input: Value) -> Result<Vec<LineageRequest>> {
    match input {
        Value::Array(arr) => arr.into_iter().map(parse_single).collect(),
        Value::Object(obj) => Ok(vec![parse_single(Value::Object(obj))?]),
        _ => Err(LineageError::parse("input must be an object or array")),
    }
}

fn parse_single(input: Value) -> Result<LineageRequest> {
    let obj = match input {
        Value::Object(obj) => obj,
        _ => return Err(LineageError::parse("operation must be an object")),
    };

    let (verb, noun, mut params) = extract_operation(&obj)?;
    normalize_params(&mut params);
    build_request(verb, noun, &params)
}

fn extract_operation(obj: &Map<String, Value>) -> Result<(Verb, Noun, Map<String, Value>)> {
    // "op": "create lineage"
    if let Some(op_str) = obj.get("op").and_then(Value::as_str) {
        if let Some((verb, noun)) = parse_op_string(op_str) {
            return Ok((verb, noun, filter_keys(obj, &["op"])));
        }
        return Err(LineageError::parse(format!("unknown operation '{}'", op_str)));
    }

    // "verb": "create", "noun": "lineage"
    if let (Some(v), Some(n)) = (
        obj.get("verb").and_then(Value::as_str),
        obj.get("noun").and_then(Value::as_str),
    ) {
        if let (Some(verb), Some(noun)) = (Verb::from_alias(v), Noun::parse(n)) {
            return Ok((verb, noun, filter_keys(obj, &["verb", "noun"])));
        }
    }

    // "create": "lineage"
    for (key, value) in obj {
        if let (Some(verb), Some(noun)) = (
            Verb::from_alias(key),
            value.as_str().and_then(Noun::parse),
        ) {
            return Ok((verb, noun, filter_keys(obj, &[key.as_str()])));
        }
    }

    Err(LineageError::parse("cannot determine operation from input"))
}

fn parse_op_string(s: &str) -> Option<(Verb, Noun)> {
    let parts: Vec<&str> = s.split_whitespace().collect();
    if parts.len() != 2 {
        return None;
    }
    Some((Verb::from_alias(parts[0])?, Noun::parse(parts[1])?))
}

/// Drop the operation keys plus metadata
fn filter_keys(obj: &Map<String, Value>, skip: &[&str]) -> Map<String, Value> {
    obj.iter()
        .filter(|(k, _)| !skip.contains(&k.as_str()) && k.as_str() != "note")
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn normalize_params(params: &mut Map<String, Value>) {
    let keys: Vec<String> = params.keys().cloned().collect();
    for key in keys {
        let snake = to_snake_case(&key);
        if snake != key {
            if let Some(value) = params.remove(&key) {
                params.entry(snake).or_insert(value);
            }
        }
    }

    let aliases: &[(&[&str], &str)] = &[
        (&["positions", "levels"], "position_ids"),
        (&["lineage", "lineage_name"], "name"),
        (&["rename", "rename_to"], "new_name"),
    ];
    for (from_keys, to_key) in aliases {
        for from_key in *from_keys {
            if let Some(value) = params.remove(*from_key) {
                params.entry(to_key.to_string()).or_insert(value);
            }
        }
    }
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            result.push('_');
        }
        result.push(c.to_lowercase().next().unwrap_or(c));
    }
    result
}

fn build_request(verb: Verb, noun: Noun, params: &Map<String, Value>) -> Result<LineageRequest> {
    let request = match (verb, noun) {
        (Verb::Create, Noun::Lineage) => LineageRequest::Create(CreateLineage::new(
            required_str(params, "name")?,
            position_ids(params)?.ok_or_else(|| LineageError::missing_field("position_ids"))?,
        )),
        (Verb::Update, Noun::Lineage) => {
            let mut op = UpdateLineage::new(required_str(params, "name")?);
            if let Some(new_name) = optional_str(params, "new_name")? {
                op = op.with_new_name(new_name);
            }
            if let Some(ids) = position_ids(params)? {
                op = op.with_positions(ids);
            }
            LineageRequest::Update(op)
        }
        (Verb::Delete, Noun::Lineage) => {
            LineageRequest::Delete(DeleteLineage::new(required_str(params, "name")?))
        }
        (Verb::Get, Noun::Lineage) => {
            LineageRequest::Get(GetLineage::new(required_str(params, "name")?))
        }
        (Verb::List, Noun::Lineage) => LineageRequest::List(ListLineages::new()),
        (Verb::List, Noun::Position) => LineageRequest::ListPositions(ListPositions {
            available_for: optional_str(params, "available_for")?,
        }),
        (verb, noun) => {
            return Err(LineageError::parse(format!(
                "unsupported operation {:?} {:?}",
                verb, noun
            )))
        }
    };
    Ok(request)
}

fn required_str(params: &Map<String, Value>, field: &str) -> Result<String> {
    optional_str(params, field)?.ok_or_else(|| LineageError::missing_field(field))
}

fn optional_str(params: &Map<String, Value>, field: &str) -> Result<Option<String>> {
    match params.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(LineageError::invalid_value(field, "expected a string")),
    }
}

/// Ordered position ids, top level first
///
/// Each entry may be an integer or a numeric string. Anything else is
/// rejected with the offending level named.
fn position_ids(params: &Map<String, Value>) -> Result<Option<Vec<PositionId>>> {
    let values = match params.get("position_ids") {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(values)) => values,
        Some(_) => {
            return Err(LineageError::invalid_value(
                "position_ids",
                "expected an array",
            ))
        }
    };

    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            position_id(value).map(PositionId::new).ok_or_else(|| {
                LineageError::invalid_value(
                    format!("position_ids[{}]", i),
                    format!("level {} has no valid position id: {}", i + 1, value),
                )
            })
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

fn position_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::{CompanyId, Position};
    use serde_json::json;
    use std::sync::Arc;

    fn single(input: Value) -> LineageRequest {
        let mut requests = parse_input(input).unwrap();
        assert_eq!(requests.len(), 1);
        requests.remove(0)
    }

    #[test]
    fn test_parse_explicit_op() {
        let request = single(json!({ "op": "create lineage", "name": "Ops", "position_ids": [3, 1] }));
        let LineageRequest::Create(op) = request else {
            panic!("expected create");
        };
        assert_eq!(op.name, "Ops");
        assert_eq!(op.position_ids, vec![PositionId::new(3), PositionId::new(1)]);
    }

    #[test]
    fn test_parse_verb_noun_fields() {
        let request = single(json!({ "verb": "rm", "noun": "lineage", "name": "Ops" }));
        assert!(matches!(request, LineageRequest::Delete(op) if op.name == "Ops"));
    }

    #[test]
    fn test_parse_shorthand() {
        let request = single(json!({ "show": "lineage", "lineage": "Ops" }));
        assert!(matches!(request, LineageRequest::Get(op) if op.name == "Ops"));
    }

    #[test]
    fn test_parse_list_nouns() {
        assert!(matches!(single(json!({ "op": "ls lineages" })), LineageRequest::List(_)));
        let request = single(json!({ "op": "list positions", "availableFor": "Ops" }));
        let LineageRequest::ListPositions(op) = request else {
            panic!("expected list positions");
        };
        assert_eq!(op.available_for.as_deref(), Some("Ops"));
    }

    #[test]
    fn test_parse_update_camel_case() {
        let request = single(json!({
            "op": "edit lineage",
            "name": "Ops",
            "newName": "Operations",
            "positionIds": ["2", 1],
        }));
        let LineageRequest::Update(op) = request else {
            panic!("expected update");
        };
        assert_eq!(op.new_name.as_deref(), Some("Operations"));
        assert_eq!(
            op.position_ids,
            Some(vec![PositionId::new(2), PositionId::new(1)])
        );
    }

    #[test]
    fn test_non_numeric_position_rejected() {
        for bad in [json!("abc"), json!(1.5), json!(null), json!("NaN")] {
            let err = parse_input(json!({
                "op": "create lineage",
                "name": "Ops",
                "position_ids": [1, bad],
            }))
            .unwrap_err();
            match err {
                LineageError::InvalidValue { field, .. } => assert_eq!(field, "position_ids[1]"),
                other => panic!("unexpected error {:?}", other),
            }
        }
    }

    #[test]
    fn test_missing_fields() {
        let err = parse_input(json!({ "op": "create lineage", "name": "Ops" })).unwrap_err();
        assert!(matches!(err, LineageError::MissingField { field } if field == "position_ids"));

        let err = parse_input(json!({ "op": "delete lineage" })).unwrap_err();
        assert!(matches!(err, LineageError::MissingField { field } if field == "name"));
    }

    #[test]
    fn test_unknown_operation() {
        assert!(matches!(
            parse_input(json!({ "op": "fly lineage" })),
            Err(LineageError::Parse { .. })
        ));
        assert!(matches!(
            parse_input(json!({ "op": "delete positions" })),
            Err(LineageError::Parse { .. })
        ));
        assert!(matches!(
            parse_input(json!("create lineage")),
            Err(LineageError::Parse { .. })
        ));
    }

    #[test]
    fn test_batch() {
        let requests = parse_input(json!([
            { "op": "list lineages" },
            { "op": "delete lineage", "name": "Ops" },
        ]))
        .unwrap();
        assert_eq!(requests.len(), 2);
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(to_snake_case("positionIds"), "position_ids");
        assert_eq!(to_snake_case("companyId"), "company_id");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
    }

    #[tokio::test]
    async fn test_dispatch() {
        let store = MemoryStore::default()
            .with_positions(vec![Position::new(1, "Director"), Position::new(2, "Manager")]);
        let ctx = LineageContext::new(Arc::new(store), CompanyId::default());
        let processor = LineageOperationProcessor::new();

        let requests = parse_input(json!([
            { "op": "create lineage", "name": "Ops", "positions": [2, "1"] },
            { "op": "get lineage", "name": "Ops" },
        ]))
        .unwrap();

        requests[0].dispatch(&processor, &ctx).await.unwrap();
        let value = requests[1].dispatch(&processor, &ctx).await.unwrap();
        assert_eq!(value["levels"][0]["position"], "Manager");
        assert_eq!(value["levels"][1]["position"], "Director");
    }
}
