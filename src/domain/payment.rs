use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Outcome of a single gateway operation.
///
/// Built fresh for every call and handed to the caller; gateways keep no copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub success: bool,
    /// Reference assigned by an external processor, if any.
    #[serde(default)]
    pub transaction_id: Option<String>,
}

impl PaymentResponse {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            transaction_id: None,
        }
    }

    pub fn rejected() -> Self {
        Self {
            success: false,
            transaction_id: None,
        }
    }

    pub fn from_outcome(success: bool) -> Self {
        Self {
            success,
            transaction_id: None,
        }
    }
}

/// Extra keyword data the host passes along with each operation.
///
/// Gateways are free to ignore it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentContext(BTreeMap<String, Value>);

impl PaymentContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_serializes_absent_transaction_id_as_null() {
        let json = serde_json::to_value(PaymentResponse::succeeded()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "success": true, "transaction_id": null })
        );
    }

    #[test]
    fn test_response_deserializes_without_transaction_id() {
        let response: PaymentResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert_eq!(response, PaymentResponse::rejected());
    }

    #[test]
    fn test_context_builder() {
        let ctx = PaymentContext::new().with("courier", "acme").with("attempt", 2);
        assert_eq!(ctx.get("courier"), Some(&Value::from("acme")));
        assert_eq!(ctx.get("attempt"), Some(&Value::from(2)));
        assert!(ctx.get("missing").is_none());
        assert!(PaymentContext::new().is_empty());
    }
}
