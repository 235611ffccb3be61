//! graphql wire types
//!
//! the response envelope and error entries returned by appsync. appsync
//! augments the standard graphql error shape with `errorType` and
//! `errorInfo`.

use serde::{Deserialize, Serialize};

/// graphql response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlResponse<T> {
    /// response data or null if errors
    pub data: Option<T>,
    /// graphql errors array
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

impl<T> GraphQlResponse<T> {
    /// true if the response contains graphql errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// all error messages, in response order
    pub fn error_messages(&self) -> Vec<&str> {
        self.errors.iter().map(|err| err.message.as_str()).collect()
    }
}

/// graphql error entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlError {
    /// error message
    pub message: String,
    /// error locations in the query
    #[serde(default)]
    pub locations: Vec<GraphQlLocation>,
    /// response path
    #[serde(default)]
    pub path: Vec<serde_json::Value>,
    /// appsync error classification, e.g. `UnauthorizedException`
    #[serde(default, rename = "errorType")]
    pub error_type: Option<String>,
    /// appsync error detail payload
    #[serde(default, rename = "errorInfo")]
    pub error_info: Option<serde_json::Value>,
}

/// graphql error location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlLocation {
    /// line number (1-based)
    pub line: i64,
    /// column number (1-based)
    pub column: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_errors() {
        let ok: GraphQlResponse<serde_json::Value> = GraphQlResponse {
            data: Some(serde_json::json!({"ok": true})),
            errors: vec![],
        };
        assert!(!ok.has_errors());

        let err = GraphQlResponse::<serde_json::Value> {
            data: None,
            errors: vec![GraphQlError {
                message: "boom".to_string(),
                locations: vec![],
                path: vec![],
                error_type: None,
                error_info: None,
            }],
        };
        assert!(err.has_errors());
        assert_eq!(err.error_messages(), vec!["boom"]);
    }

    #[test]
    fn test_appsync_error_fields_deserialize() {
        let text = r#"{
            "data": null,
            "errors": [{
                "message": "not allowed",
                "errorType": "UnauthorizedException",
                "errorInfo": {"reason": "expired"}
            }]
        }"#;
        let response: GraphQlResponse<serde_json::Value> = serde_json::from_str(text).unwrap();
        let error = &response.errors[0];
        assert_eq!(error.error_type.as_deref(), Some("UnauthorizedException"));
        assert_eq!(error.error_info.as_ref().unwrap()["reason"], "expired");
    }
}
