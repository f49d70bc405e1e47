//! Conversions between serde_json values, async-graphql values and type
//! references.

use async_graphql::dynamic::TypeRef as DynTypeRef;
use async_graphql::{Name, Number, Value};
use graphweave_core::TypeRef;

/// Converts a JSON value to an async-graphql value.
///
/// A float async-graphql cannot represent (NaN or infinite) would become
/// `0`; serde_json numbers are always finite, so the fallback is lossy only
/// in principle.
pub fn json_to_graphql_value(json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else if let Some(f) = n.as_f64() {
                Value::Number(Number::from_f64(f).unwrap_or(Number::from(0)))
            } else {
                Value::Null
            }
        }
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(arr) => Value::List(arr.iter().map(json_to_graphql_value).collect()),
        serde_json::Value::Object(obj) => Value::Object(
            obj.iter()
                .map(|(k, v)| (Name::new(k), json_to_graphql_value(v)))
                .collect(),
        ),
    }
}

/// Converts an async-graphql value to JSON. Enum values become their name,
/// binary values become base64 strings.
pub fn graphql_value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                serde_json::Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                serde_json::Value::Number(u.into())
            } else if let Some(f) = n.as_f64() {
                serde_json::json!(f)
            } else {
                serde_json::Value::Null
            }
        }
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::List(arr) => serde_json::Value::Array(arr.iter().map(graphql_value_to_json).collect()),
        Value::Object(obj) => serde_json::Value::Object(
            obj.iter()
                .map(|(k, v)| (k.to_string(), graphql_value_to_json(v)))
                .collect(),
        ),
        Value::Enum(e) => serde_json::Value::String(e.to_string()),
        Value::Binary(b) => {
            use base64::Engine;
            serde_json::Value::String(base64::engine::general_purpose::STANDARD.encode(b))
        }
    }
}

/// Mirrors a wrapped type reference as an async-graphql type reference.
pub fn to_dynamic_type_ref(ty: &TypeRef) -> DynTypeRef {
    match ty {
        TypeRef::Named(named) => DynTypeRef::named(named.name()),
        TypeRef::List(inner) => DynTypeRef::List(Box::new(to_dynamic_type_ref(inner))),
        TypeRef::NonNull(inner) => DynTypeRef::NonNull(Box::new(to_dynamic_type_ref(inner))),
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use graphweave_core::{BuilderConfig, TypeResolver};

    use super::*;

    #[test]
    fn test_json_to_graphql_null() {
        assert!(matches!(
            json_to_graphql_value(&serde_json::Value::Null),
            Value::Null
        ));
    }

    #[test]
    fn test_json_object_to_graphql() {
        let json = serde_json::json!({ "name": "Ada", "tags": ["a", "b"], "age": 36 });
        let Value::Object(obj) = json_to_graphql_value(&json) else {
            panic!("expected an object");
        };
        assert_eq!(obj.get("name"), Some(&Value::String("Ada".into())));
        assert_eq!(obj.get("age"), Some(&Value::Number(36.into())));
        assert!(matches!(obj.get("tags"), Some(Value::List(items)) if items.len() == 2));
    }

    #[test]
    fn test_json_float_to_graphql() {
        assert_eq!(
            json_to_graphql_value(&serde_json::json!(1.5)),
            Value::Number(Number::from_f64(1.5).unwrap())
        );
    }

    #[test]
    fn test_graphql_enum_and_binary_to_json() {
        assert_eq!(
            graphql_value_to_json(&Value::Enum(Name::new("RED"))),
            serde_json::json!("RED")
        );
        assert_eq!(
            graphql_value_to_json(&Value::Binary(vec![1, 2, 3].into())),
            serde_json::json!("AQID")
        );
    }

    #[test]
    fn test_float_survives_conversion() {
        let json = serde_json::json!(1.5);
        assert_eq!(graphql_value_to_json(&json_to_graphql_value(&json)), json);
    }

    #[test]
    fn test_type_ref_mirrors_wrapping() {
        let resolver = TypeResolver::new(BuilderConfig::default());
        let int = resolver.resolve("Int").unwrap();
        let ty = TypeRef::named(Rc::clone(&int)).list().non_null();
        assert_eq!(to_dynamic_type_ref(&ty).to_string(), "[Int]!");
        assert_eq!(ty.to_string(), "[Int]!");
    }
}
