//! Field resolvers for the generated schema.
//!
//! The core graph is single-threaded; async-graphql needs `Send + Sync`
//! resolvers. Everything a resolver needs at execution time is therefore
//! copied out of the graph when the schema is generated: the field's own
//! resolver, and an [`OutputShape`] describing how to turn the produced JSON
//! into async-graphql values.

use std::collections::HashMap;
use std::sync::Arc;

use async_graphql::dynamic::{Field, FieldFuture, FieldValue, TypeRef as DynTypeRef};
use async_graphql::{Error, Name, Value};
use graphweave_core::{
    FieldResolveFn, InputFieldMap, NamedType, ResolveParams, ScalarFn, TypeRef, TypeResolveFn,
};
use serde_json::{Map, Value as JsonValue};

use crate::convert::{graphql_value_to_json, json_to_graphql_value};

/// How a resolved JSON value is presented to the execution engine.
#[derive(Clone)]
pub(crate) enum OutputShape {
    /// Passed through as-is.
    Plain,
    /// A custom scalar with a serialize callback.
    Scalar(ScalarFn),
    /// An enum: internal values paired with their names.
    Enum {
        type_name: String,
        values: Arc<Vec<(JsonValue, String)>>,
    },
    /// An interface or union; each value is tagged with its concrete type.
    Abstract {
        type_name: String,
        resolve_type: TypeResolveFn,
    },
    List(Box<OutputShape>),
}

impl OutputShape {
    pub(crate) fn of(ty: &TypeRef) -> Self {
        match ty {
            TypeRef::NonNull(inner) => Self::of(inner),
            TypeRef::List(inner) => Self::List(Box::new(Self::of(inner))),
            TypeRef::Named(named) => match &**named {
                NamedType::Interface(interface) => Self::Abstract {
                    type_name: interface.name().to_string(),
                    resolve_type: Arc::clone(interface.resolve_type()),
                },
                NamedType::Union(union) => Self::Abstract {
                    type_name: union.name().to_string(),
                    resolve_type: Arc::clone(union.resolve_type()),
                },
                NamedType::Enum(enumeration) => Self::Enum {
                    type_name: enumeration.name.clone(),
                    values: Arc::new(
                        enumeration
                            .values
                            .values()
                            .map(|v| (v.value.clone(), v.name.clone()))
                            .collect(),
                    ),
                },
                NamedType::Scalar(scalar) => match &scalar.serialize {
                    Some(serialize) => Self::Scalar(Arc::clone(serialize)),
                    None => Self::Plain,
                },
                NamedType::Object(_) | NamedType::InputObject(_) => Self::Plain,
            },
        }
    }

    /// Converts a resolved value. `Null` is absent at every depth.
    pub(crate) fn produce<'a>(&self, value: JsonValue) -> Result<Option<FieldValue<'a>>, Error> {
        if value.is_null() {
            return Ok(None);
        }

        match self {
            Self::Plain => Ok(Some(FieldValue::value(json_to_graphql_value(&value)))),
            Self::Scalar(serialize) => {
                let serialized = serialize(&value).map_err(Error::new)?;
                Ok(Some(FieldValue::value(json_to_graphql_value(&serialized))))
            }
            Self::Enum { type_name, values } => {
                let name = values
                    .iter()
                    .find(|(internal, _)| *internal == value)
                    .map(|(_, name)| name.clone())
                    .ok_or_else(|| {
                        Error::new(format!("Value {value} is not a member of enum {type_name}"))
                    })?;
                Ok(Some(FieldValue::value(Value::Enum(Name::new(name)))))
            }
            Self::Abstract {
                type_name,
                resolve_type,
            } => {
                let concrete = resolve_type(&value).ok_or_else(|| {
                    Error::new(format!("Could not determine the concrete type of {type_name}"))
                })?;
                Ok(Some(
                    FieldValue::value(json_to_graphql_value(&value)).with_type(concrete),
                ))
            }
            Self::List(inner) => {
                let JsonValue::Array(items) = value else {
                    return Err(Error::new(format!("Expected a list, got {value}")));
                };
                let items = items
                    .into_iter()
                    .map(|item| Ok(inner.produce(item)?.unwrap_or(FieldValue::NULL)))
                    .collect::<Result<Vec<_>, Error>>()?;
                Ok(Some(FieldValue::list(items)))
            }
        }
    }
}

/// How an incoming argument value is handed to resolvers.
#[derive(Clone)]
pub(crate) enum InputShape {
    Plain,
    /// A custom scalar with a parse callback.
    Scalar(ScalarFn),
    /// An enum: value names paired with their internal values.
    Enum {
        type_name: String,
        values: Arc<Vec<(String, JsonValue)>>,
    },
    /// An input object, looked up by name in [`InputObjectShapes`].
    Object(String),
    List(Box<InputShape>),
}

/// Field shapes of every input object, keyed by type name.
pub(crate) type InputObjectShapes = HashMap<String, HashMap<String, InputShape>>;

impl InputShape {
    pub(crate) fn of(ty: &TypeRef) -> Self {
        match ty {
            TypeRef::NonNull(inner) => Self::of(inner),
            TypeRef::List(inner) => Self::List(Box::new(Self::of(inner))),
            TypeRef::Named(named) => match &**named {
                NamedType::Enum(enumeration) => Self::Enum {
                    type_name: enumeration.name.clone(),
                    values: Arc::new(
                        enumeration
                            .values
                            .values()
                            .map(|v| (v.name.clone(), v.value.clone()))
                            .collect(),
                    ),
                },
                NamedType::Scalar(scalar) => match &scalar.parse_value {
                    Some(parse) => Self::Scalar(Arc::clone(parse)),
                    None => Self::Plain,
                },
                NamedType::InputObject(input) => Self::Object(input.name().to_string()),
                NamedType::Object(_) | NamedType::Interface(_) | NamedType::Union(_) => Self::Plain,
            },
        }
    }

    /// Converts an incoming value. `Null` passes through at every depth.
    pub(crate) fn accept(
        &self,
        value: JsonValue,
        objects: &InputObjectShapes,
    ) -> Result<JsonValue, Error> {
        if value.is_null() {
            return Ok(value);
        }

        match self {
            Self::Plain => Ok(value),
            Self::Scalar(parse) => parse(&value).map_err(Error::new),
            Self::Enum { type_name, values } => {
                let name = value.as_str().unwrap_or_default();
                values
                    .iter()
                    .find(|(candidate, _)| candidate == name)
                    .map(|(_, internal)| internal.clone())
                    .ok_or_else(|| {
                        Error::new(format!("Value {value} is not a member of enum {type_name}"))
                    })
            }
            Self::Object(type_name) => {
                let JsonValue::Object(entries) = value else {
                    return Err(Error::new(format!("Expected an object for {type_name}, got {value}")));
                };
                let fields = objects.get(type_name);
                entries
                    .into_iter()
                    .map(|(key, item)| -> Result<(String, JsonValue), Error> {
                        let item = match fields.and_then(|fields| fields.get(&key)) {
                            Some(shape) => shape.accept(item, objects)?,
                            None => item,
                        };
                        Ok((key, item))
                    })
                    .collect::<Result<Map<_, _>, Error>>()
                    .map(JsonValue::Object)
            }
            Self::List(inner) => match value {
                JsonValue::Array(items) => items
                    .into_iter()
                    .map(|item| inner.accept(item, objects))
                    .collect::<Result<Vec<_>, Error>>()
                    .map(JsonValue::Array),
                single => inner.accept(single, objects),
            },
        }
    }
}

/// Argument shapes of one field, plus the input object shapes they refer to.
#[derive(Clone)]
pub(crate) struct ArgumentShapes {
    args: Arc<HashMap<String, InputShape>>,
    objects: Arc<InputObjectShapes>,
}

impl ArgumentShapes {
    pub(crate) fn new(args: &InputFieldMap, objects: Arc<InputObjectShapes>) -> Self {
        Self {
            args: Arc::new(
                args.iter()
                    .map(|(name, arg)| (name.clone(), InputShape::of(&arg.ty)))
                    .collect(),
            ),
            objects,
        }
    }

    /// Converts the arguments of one call into the map resolvers receive.
    pub(crate) fn accept<'a>(
        &self,
        args: impl IntoIterator<Item = (&'a Name, &'a Value)>,
    ) -> Result<Map<String, JsonValue>, Error> {
        args.into_iter()
            .map(|(name, value)| -> Result<(String, JsonValue), Error> {
                let json = graphql_value_to_json(value);
                let json = match self.args.get(name.as_str()) {
                    Some(shape) => shape.accept(json, &self.objects)?,
                    None => json,
                };
                Ok((name.to_string(), json))
            })
            .collect()
    }
}

/// Creates a field that runs `resolver`, or reads the parent object's key
/// of the same name when there is none.
pub(crate) fn output_field(
    name: &str,
    type_ref: DynTypeRef,
    resolver: Option<FieldResolveFn>,
    inputs: ArgumentShapes,
    shape: OutputShape,
) -> Field {
    let key = name.to_string();

    Field::new(name, type_ref, move |ctx| {
        let key = key.clone();
        let resolver = resolver.clone();
        let inputs = inputs.clone();
        let shape = shape.clone();
        FieldFuture::new(async move {
            let parent = ctx
                .parent_value
                .as_value()
                .map(graphql_value_to_json)
                .unwrap_or(JsonValue::Null);

            let value = match &resolver {
                Some(resolve) => {
                    let args = inputs.accept(ctx.args.as_index_map())?;
                    resolve(ResolveParams {
                        parent: &parent,
                        args: &args,
                    })
                    .map_err(|err| Error::new(err.to_string()))?
                }
                None => parent.get(&key).cloned().unwrap_or(JsonValue::Null),
            };

            shape.produce(value)
        })
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn enum_shape() -> OutputShape {
        OutputShape::Enum {
            type_name: "Priority".into(),
            values: Arc::new(vec![(json!(1), "LOW".into()), (json!(2), "HIGH".into())]),
        }
    }

    #[test]
    fn test_null_is_absent() {
        assert!(OutputShape::Plain.produce(JsonValue::Null).unwrap().is_none());
    }

    #[test]
    fn test_enum_maps_internal_value_to_name() {
        let value = enum_shape().produce(json!(2)).unwrap().unwrap();
        assert_eq!(value.as_value(), Some(&Value::Enum(Name::new("HIGH"))));
    }

    #[test]
    fn test_enum_rejects_unknown_value() {
        assert!(enum_shape().produce(json!(3)).is_err());
    }

    #[test]
    fn test_list_requires_array() {
        let shape = OutputShape::List(Box::new(OutputShape::Plain));
        assert!(shape.produce(json!("nope")).is_err());
        let list = shape.produce(json!([1, null])).unwrap().unwrap();
        assert_eq!(list.as_list().map(|items| items.len()), Some(2));
    }

    #[test]
    fn test_abstract_without_match_fails() {
        let shape = OutputShape::Abstract {
            type_name: "Node".into(),
            resolve_type: Arc::new(|_: &JsonValue| -> Option<String> { None }),
        };
        assert!(shape.produce(json!({ "id": "1" })).is_err());
    }

    #[test]
    fn test_enum_argument_maps_name_to_internal_value() {
        let shape = InputShape::Enum {
            type_name: "Priority".into(),
            values: Arc::new(vec![("LOW".into(), json!(1)), ("HIGH".into(), json!(2))]),
        };
        let objects = InputObjectShapes::new();
        assert_eq!(shape.accept(json!("HIGH"), &objects).unwrap(), json!(2));
        assert!(shape.accept(json!("MEDIUM"), &objects).is_err());
    }

    #[test]
    fn test_input_object_fields_are_converted() {
        let upper: ScalarFn = Arc::new(|v: &JsonValue| -> Result<JsonValue, String> {
            v.as_str()
                .map(|s| json!(s.to_uppercase()))
                .ok_or_else(|| "expected a string".to_string())
        });
        let mut objects = InputObjectShapes::new();
        objects.insert(
            "Filter".into(),
            HashMap::from([(
                "codes".to_string(),
                InputShape::List(Box::new(InputShape::Scalar(upper))),
            )]),
        );

        let shape = InputShape::Object("Filter".into());
        let value = shape
            .accept(json!({ "codes": ["ab", null], "limit": 3 }), &objects)
            .unwrap();
        assert_eq!(value, json!({ "codes": ["AB", null], "limit": 3 }));
    }

    #[test]
    fn test_scalar_serialize_applied() {
        let shape = OutputShape::Scalar(Arc::new(
            |v: &JsonValue| -> Result<JsonValue, String> {
                Ok(json!(v.as_str().unwrap_or_default().to_uppercase()))
            },
        ));
        let value = shape.produce(json!("abc")).unwrap().unwrap();
        assert_eq!(value.as_value(), Some(&Value::String("ABC".into())));
    }
}
