use crate::domain::payment::{PaymentContext, PaymentResponse};
use crate::domain::plugin::{PluginDescriptor, PluginType};
use crate::domain::ports::{PayloadSchema, PaymentGateway};
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use semver::{Version, VersionReq};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;

pub const PLUGIN_NAME: &str = "code";

static HOST_COMPATIBILITY: LazyLock<VersionReq> = LazyLock::new(|| {
    VersionReq::parse(">=1.0.0").expect("host compatibility requirement is a valid literal")
});

/// Payload validator for cash on delivery.
///
/// Clients send nothing gateway-specific, so any JSON object passes.
#[derive(Debug, Default, Clone, Copy)]
pub struct CodPayloadSchema;

impl PayloadSchema for CodPayloadSchema {
    fn required_fields(&self) -> &[&'static str] {
        &[]
    }

    fn validate(&self, payload: &Value) -> Result<()> {
        if payload.is_object() {
            Ok(())
        } else {
            Err(GatewayError::ValidationError(
                "Invalid data. Expected a dictionary".to_string(),
            ))
        }
    }
}

/// Cash on delivery payment gateway.
///
/// The customer pays the courier in cash, so there is nothing to authorize up
/// front and no external transaction reference. Capture succeeds only when the
/// caller reports the cash as collected; cancel and refund are always rejected.
#[derive(Debug, Clone)]
pub struct CashOnDelivery {
    descriptor: PluginDescriptor,
}

impl Default for CashOnDelivery {
    fn default() -> Self {
        Self::new()
    }
}

impl CashOnDelivery {
    pub fn new() -> Self {
        Self {
            descriptor: Self::plugin_descriptor(),
        }
    }

    pub fn plugin_descriptor() -> PluginDescriptor {
        PluginDescriptor {
            name: PLUGIN_NAME.to_string(),
            plugin_type: PluginType::PaymentProcessor,
            plugin_uri: "https://github.com/nxtbn-com/cod".to_string(),
            version: Version::new(1, 0, 1),
            author: "bytenyx limited".to_string(),
            author_uri: "http://bytenyx.com".to_string(),
            description: "Plugin to handle payment via cash on delivery.".to_string(),
            license: "BSD-3-Clause".to_string(),
            host_compatibility: HOST_COMPATIBILITY.clone(),
            env: Vec::new(),
        }
    }
}

#[async_trait]
impl PaymentGateway for CashOnDelivery {
    fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    async fn authorize(
        &self,
        amount: Decimal,
        order_id: &str,
        _ctx: &PaymentContext,
    ) -> PaymentResponse {
        debug!(%amount, order_id, "cash on delivery needs no authorization");
        PaymentResponse::succeeded()
    }

    async fn capture(
        &self,
        amount: Decimal,
        order_id: &str,
        collected: bool,
        _ctx: &PaymentContext,
    ) -> PaymentResponse {
        debug!(%amount, order_id, collected, "capturing cash payment");
        PaymentResponse::from_outcome(collected)
    }

    async fn cancel(&self, order_id: &str, _ctx: &PaymentContext) -> PaymentResponse {
        debug!(order_id, "cash on delivery payments cannot be cancelled");
        PaymentResponse::rejected()
    }

    async fn refund(
        &self,
        amount: Decimal,
        order_id: &str,
        _ctx: &PaymentContext,
    ) -> PaymentResponse {
        debug!(%amount, order_id, "cash on delivery payments cannot be refunded");
        PaymentResponse::rejected()
    }

    fn normalize_response(&self, _raw_response: &Value) -> PaymentResponse {
        PaymentResponse::succeeded()
    }

    fn special_serializer(&self) -> Box<dyn PayloadSchema> {
        Box::new(CodPayloadSchema)
    }

    fn public_keys(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn ctx() -> PaymentContext {
        PaymentContext::new()
    }

    #[tokio::test]
    async fn test_authorize_always_succeeds() {
        let gateway = CashOnDelivery::new();
        let response = gateway.authorize(dec!(50.00), "ORDER-1", &ctx()).await;
        assert_eq!(
            response,
            PaymentResponse {
                success: true,
                transaction_id: None
            }
        );
    }

    #[tokio::test]
    async fn test_capture_follows_collected_flag() {
        let gateway = CashOnDelivery::new();
        let collected = gateway
            .capture(dec!(50.00), "ORDER-1", true, &ctx())
            .await;
        assert!(collected.success);
        assert!(collected.transaction_id.is_none());

        let not_collected = gateway
            .capture(dec!(50.00), "ORDER-1", false, &ctx())
            .await;
        assert!(!not_collected.success);
    }

    #[tokio::test]
    async fn test_cancel_is_rejected() {
        let gateway = CashOnDelivery::new();
        let response = gateway.cancel("ORDER-1", &ctx()).await;
        assert_eq!(response, PaymentResponse::rejected());
    }

    #[tokio::test]
    async fn test_refund_is_rejected() {
        let gateway = CashOnDelivery::new();
        let response = gateway.refund(dec!(10.00), "ORDER-1", &ctx()).await;
        assert!(!response.success);
        assert!(response.transaction_id.is_none());
    }

    #[tokio::test]
    async fn test_context_is_ignored() {
        let gateway = CashOnDelivery::new();
        let rich = PaymentContext::new().with("collected", true);
        let response = gateway.capture(dec!(1), "ORDER-2", false, &rich).await;
        assert!(!response.success);
    }

    #[test]
    fn test_normalize_response_ignores_input() {
        let gateway = CashOnDelivery::new();
        for raw in [json!(null), json!({"status": "failed"}), json!([1, 2, 3])] {
            assert_eq!(
                gateway.normalize_response(&raw),
                PaymentResponse::succeeded()
            );
        }
    }

    #[test]
    fn test_public_keys_empty() {
        assert!(CashOnDelivery::new().public_keys().is_empty());
    }

    #[test]
    fn test_payload_schema_accepts_empty_object() {
        let schema = CashOnDelivery::new().special_serializer();
        assert!(schema.required_fields().is_empty());
        assert!(schema.validate(&json!({})).is_ok());
        assert!(schema.validate(&json!({"note": "ring twice"})).is_ok());
    }

    #[test]
    fn test_payload_schema_rejects_non_object() {
        let schema = CodPayloadSchema;
        assert!(matches!(
            schema.validate(&json!("cash")),
            Err(GatewayError::ValidationError(_))
        ));
    }

    #[test]
    fn test_descriptor_metadata() {
        let gateway = CashOnDelivery::new();
        let d = gateway.descriptor();
        assert_eq!(d.name, "code");
        assert_eq!(d.plugin_type, PluginType::PaymentProcessor);
        assert_eq!(d.version, Version::new(1, 0, 1));
        assert_eq!(d.host_compatibility, VersionReq::parse(">=1.0.0").unwrap());
        assert_eq!(d.license, "BSD-3-Clause");
        assert!(d.env.is_empty());
    }
}
