//! operation contract
//!
//! trait implemented by generated and hand-written typed operations,
//! executable via [`crate::Client::execute_operation`].

use serde::de::DeserializeOwned;

/// graphql operation contract for typed operation types
pub trait Operation {
    /// operation kind keyword: `query`, `mutation`, or `subscription`
    const KIND: &'static str;
    /// graphql source text sent as the wire payload
    const QUERY: &'static str;
    /// response payload type
    type Response: DeserializeOwned;
}
