use appsync::codegen::{generate, DocumentInput, GeneratorConfig};
use graphql_parser::{parse_query, parse_schema};
use std::path::Path;

const SCHEMA: &str = r#"
type Query {
    getTodo(id: ID!): Todo
}

type Todo {
    id: ID!
    title: String!
    dueAt: AWSDateTime
}

scalar AWSDateTime
"#;

const DOCUMENT: &str = "query GetTodo($id: ID!) { getTodo(id: $id) { id title dueAt } }";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let schema = parse_schema::<String>(SCHEMA)?;
    let document = parse_query::<String>(DOCUMENT)?;

    let input = DocumentInput {
        path: Path::new("demo/get_todo.graphql"),
        source: DOCUMENT,
        document: &document,
    };

    let unit = generate(&schema, &[input], &GeneratorConfig::default())?;
    println!("{unit}");
    Ok(())
}
