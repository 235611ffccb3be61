use appsync::{Client, ClientConfig};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Data {
    #[serde(rename = "listTodos")]
    todos: TodoConnection,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct TodoConnection {
    items: Vec<Todo>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Todo {
    id: String,
    title: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let endpoint = env::var("APPSYNC_URL").expect("APPSYNC_URL is required");
    let api_key = env::var("APPSYNC_API_KEY").expect("APPSYNC_API_KEY is required");

    let config = ClientConfig::new(endpoint, api_key);
    let client = Client::new(config)?;

    let response = client
        .execute::<Data>("query { listTodos { items { id title } } }", None)
        .await?;

    println!("response: {response:?}");
    Ok(())
}
