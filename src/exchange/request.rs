//! Transport-ready request descriptions

use crate::operations::{HttpMethod, OperationSpec};
use crate::signing::{ParameterRecord, SignedRequest};
use serde_json::Value;

/// One HTTP call to the exchange, fully resolved but not yet sent
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub operation: &'static str,
    pub method: HttpMethod,
    pub path: &'static str,
    /// Query string pairs (GET only)
    pub query: Vec<(String, String)>,
    /// JSON body (POST only)
    pub body: Option<ParameterRecord>,
}

impl OutboundRequest {
    /// GET with every non-null parameter as a query pair
    pub fn query(spec: &'static OperationSpec, params: &ParameterRecord) -> Self {
        let query = params
            .iter()
            .filter_map(|(key, value)| {
                let rendered = match value {
                    Value::Null => return None,
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                Some((key.clone(), rendered))
            })
            .collect();

        Self {
            operation: spec.name,
            method: HttpMethod::Get,
            path: spec.path,
            query,
            body: None,
        }
    }

    /// POST carrying the signed payload as JSON
    pub fn signed(spec: &'static OperationSpec, request: SignedRequest) -> Self {
        Self {
            operation: spec.name,
            method: HttpMethod::Post,
            path: spec.path,
            query: Vec::new(),
            body: Some(request.into_body()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::GET_ORDER_HISTORY;
    use serde_json::json;

    #[test]
    fn test_query_skips_nulls() {
        let params = json!({ "account": "abc", "limit": 50, "offset": null })
            .as_object()
            .cloned()
            .unwrap();

        let request = OutboundRequest::query(&GET_ORDER_HISTORY, &params);

        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.path, "/orders/history");
        assert!(request.body.is_none());
        assert_eq!(
            request.query,
            vec![
                ("account".to_string(), "abc".to_string()),
                ("limit".to_string(), "50".to_string()),
            ]
        );
    }
}
