use appsync::{Client, ClientConfig};

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn smoke_appsync_query() {
    let endpoint = match std::env::var("APPSYNC_URL") {
        Ok(endpoint) => endpoint,
        Err(_) => return,
    };
    let api_key = match std::env::var("APPSYNC_API_KEY") {
        Ok(api_key) => api_key,
        Err(_) => return,
    };
    let query = std::env::var("APPSYNC_SMOKE_QUERY")
        .unwrap_or_else(|_| "query { __typename }".to_string());

    let client = Client::new(ClientConfig::new(endpoint, api_key)).expect("client");
    let response = client.execute_raw(&query, None).await.expect("graphql query");

    assert!(response.data.is_some());
}
