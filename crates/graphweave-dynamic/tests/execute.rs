//! End-to-end tests: build a type graph, hand it to async-graphql and run
//! queries against it.

use async_graphql::dynamic::Schema;
use graphweave_core::{
    BuilderConfig, EnumValueDef, FieldDef, InputValueDef, ListSpec, ScalarDef, SchemaBuilder,
    TypeDef,
};
use graphweave_dynamic::{DynamicSchemaConfig, into_dynamic_schema};
use serde_json::{Value, json};

fn schema(defs: Vec<TypeDef>) -> Schema {
    let builder = SchemaBuilder::new(BuilderConfig::default());
    builder.register_all(defs).unwrap();
    let graph = builder.finalize().unwrap();
    into_dynamic_schema(&graph, &DynamicSchemaConfig::default()).unwrap()
}

async fn run(schema: &Schema, query: &str) -> Value {
    let response = schema.execute(query).await;
    assert!(response.errors.is_empty(), "errors: {:?}", response.errors);
    response.data.into_json().unwrap()
}

fn node_and_user() -> Vec<TypeDef> {
    vec![
        TypeDef::interface("Node", |t| {
            t.field(FieldDef::new("id", "ID"));
            t.resolve_type(|value| value.get("kind")?.as_str().map(str::to_string));
        }),
        TypeDef::object("User", |t| {
            t.implements("Node");
            t.field(FieldDef::new("name", "String"));
        }),
        TypeDef::object("Post", |t| {
            t.implements("Node");
            t.field(FieldDef::new("title", "String"));
        }),
    ]
}

#[tokio::test]
async fn test_nested_object_uses_parent_lookup() {
    let schema = schema(vec![
        TypeDef::object("Query", |t| {
            t.field(FieldDef::new("bar", "Bar").resolve(|_| Ok(json!({ "ok": true }))));
        }),
        TypeDef::object("Bar", |t| {
            t.field(FieldDef::new("ok", "Boolean"));
        }),
    ]);

    let data = run(&schema, "{ bar { ok } }").await;
    assert_eq!(data, json!({ "bar": { "ok": true } }));
}

#[tokio::test]
async fn test_arguments_reach_resolver() {
    let schema = schema(vec![TypeDef::object("Query", |t| {
        t.field(
            FieldDef::new("greet", "String")
                .arg(InputValueDef::new("name", "String").default_value("world"))
                .resolve(|params| {
                    let name = params.args.get("name").and_then(Value::as_str).unwrap_or_default();
                    Ok(json!(format!("hello {name}")))
                }),
        );
    })]);

    let data = run(&schema, r#"{ a: greet(name: "ada") b: greet }"#).await;
    assert_eq!(data, json!({ "a": "hello ada", "b": "hello world" }));
}

#[tokio::test]
async fn test_interface_values_are_tagged() {
    let mut defs = node_and_user();
    defs.push(TypeDef::object("Query", |t| {
        t.field(
            FieldDef::new("nodes", "Node")
                .list(ListSpec::Single)
                .resolve(|_| {
                    Ok(json!([
                        { "kind": "User", "id": "u1", "name": "Ada" },
                        { "kind": "Post", "id": "p1", "title": "Hello" }
                    ]))
                }),
        );
    }));
    let schema = schema(defs);

    let data = run(
        &schema,
        "{ nodes { id ... on User { name } ... on Post { title } } }",
    )
    .await;
    assert_eq!(
        data,
        json!({ "nodes": [
            { "id": "u1", "name": "Ada" },
            { "id": "p1", "title": "Hello" }
        ] })
    );
}

#[tokio::test]
async fn test_union_values_are_tagged() {
    let mut defs = node_and_user();
    defs.push(TypeDef::union("SearchResult", |t| {
        t.members(["User", "Post"]);
        t.resolve_type(|value| value.get("kind")?.as_str().map(str::to_string));
    }));
    defs.push(TypeDef::object("Query", |t| {
        t.field(
            FieldDef::new("top", "SearchResult")
                .resolve(|_| Ok(json!({ "kind": "Post", "id": "p1", "title": "Hi" }))),
        );
    }));
    let schema = schema(defs);

    let data = run(&schema, "{ top { __typename ... on Post { title } } }").await;
    assert_eq!(data, json!({ "top": { "__typename": "Post", "title": "Hi" } }));
}

#[tokio::test]
async fn test_enum_internal_values_map_to_names() {
    let schema = schema(vec![
        TypeDef::enumeration(
            "Priority",
            [
                EnumValueDef::new("LOW").value(1),
                EnumValueDef::new("HIGH").value(2),
            ],
        ),
        TypeDef::object("Query", |t| {
            t.field(FieldDef::new("priority", "Priority").resolve(|_| Ok(json!(2))));
        }),
    ]);

    let data = run(&schema, "{ priority }").await;
    assert_eq!(data, json!({ "priority": "HIGH" }));
}

#[tokio::test]
async fn test_custom_scalar_serializes_output() {
    let schema = schema(vec![
        TypeDef::scalar(
            "Upper",
            ScalarDef::new().serialize(|v| {
                v.as_str()
                    .map(|s| json!(s.to_uppercase()))
                    .ok_or_else(|| "expected a string".to_string())
            }),
        ),
        TypeDef::object("Query", |t| {
            t.field(FieldDef::new("shout", "Upper").resolve(|_| Ok(json!("hey"))));
        }),
    ]);

    let data = run(&schema, "{ shout }").await;
    assert_eq!(data, json!({ "shout": "HEY" }));
}

#[tokio::test]
async fn test_arguments_are_converted_before_resolvers() {
    let schema = schema(vec![
        TypeDef::enumeration(
            "Priority",
            [
                EnumValueDef::new("LOW").value(1),
                EnumValueDef::new("HIGH").value(2),
            ],
        ),
        TypeDef::scalar(
            "Upper",
            ScalarDef::new().parse_value(|v| {
                v.as_str()
                    .map(|s| json!(s.to_uppercase()))
                    .ok_or_else(|| "expected a string".to_string())
            }),
        ),
        TypeDef::input_object("Filter", |t| {
            t.field(InputValueDef::new("priority", "Priority"));
        }),
        TypeDef::object("Query", |t| {
            t.field(
                FieldDef::new("echo", "String")
                    .arg(InputValueDef::new("p", "Priority"))
                    .arg(InputValueDef::new("u", "Upper"))
                    .arg(InputValueDef::new("filter", "Filter"))
                    .resolve(|params| Ok(json!(Value::Object(params.args.clone()).to_string()))),
            );
        }),
    ]);

    let data = run(
        &schema,
        r#"{ echo(p: HIGH, u: "abc", filter: { priority: LOW }) }"#,
    )
    .await;
    let echoed: Value = serde_json::from_str(data["echo"].as_str().unwrap()).unwrap();
    assert_eq!(
        echoed,
        json!({ "p": 2, "u": "ABC", "filter": { "priority": 1 } })
    );
}

#[tokio::test]
async fn test_resolver_error_surfaces_as_graphql_error() {
    let schema = schema(vec![TypeDef::object("Query", |t| {
        t.field(
            FieldDef::new("broken", "String")
                .nullable(true)
                .resolve(|_| Err("backend unavailable".into())),
        );
    })]);

    let response = schema.execute("{ broken }").await;
    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].message, "backend unavailable");
}

#[test]
fn test_sdl_reflects_graph() {
    let mut defs = node_and_user();
    defs.push(TypeDef::enumeration(
        "Color",
        [EnumValueDef::new("RED"), EnumValueDef::new("BLUE").deprecated("Use RED")],
    ));
    defs.push(TypeDef::input_object("UserFilter", |t| {
        t.field(InputValueDef::new("name", "String"));
    }));
    defs.push(TypeDef::object("Query", |t| {
        t.field(
            FieldDef::new("users", "User")
                .list(ListSpec::Single)
                .arg(InputValueDef::new("filter", "UserFilter")),
        );
    }));
    let sdl = schema(defs).sdl();

    assert!(sdl.contains("interface Node"));
    assert!(sdl.contains("type User implements Node"));
    assert!(sdl.contains("users(filter: UserFilter): [User!]!"));
    assert!(sdl.contains("input UserFilter"));
    assert!(sdl.contains("enum Color"));
    assert!(!sdl.contains("scalar Int"));
}

#[test]
fn test_missing_query_root_fails() {
    let builder = SchemaBuilder::new(BuilderConfig::default());
    builder
        .register(TypeDef::object("Root", |t| {
            t.field(FieldDef::new("ok", "Boolean"));
        }))
        .unwrap();
    let graph = builder.finalize().unwrap();

    let err = into_dynamic_schema(&graph, &DynamicSchemaConfig::default())
        .err()
        .unwrap();
    assert_eq!(err.error_code(), "SCHEMA_BUILD_FAILED");

    let config = DynamicSchemaConfig {
        query: "Root".into(),
        ..DynamicSchemaConfig::default()
    };
    assert!(into_dynamic_schema(&graph, &config).is_ok());
}
