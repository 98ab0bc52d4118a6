use super::payment::{PaymentContext, PaymentResponse};
use super::plugin::PluginDescriptor;
use crate::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Validator for the payment payload a client submits alongside checkout.
pub trait PayloadSchema: Send + Sync {
    /// Fields the payload must carry.
    fn required_fields(&self) -> &[&'static str];
    fn validate(&self, payload: &Value) -> Result<()>;
}

/// Capability interface every payment processor plugin implements.
///
/// The host calls these at fixed points of an order's payment lifecycle.
/// A `success: false` response is a business rejection, not a fault.
/// Lifecycle calls are async so gateways that talk to a remote processor fit
/// the same port; cash on delivery completes them without awaiting.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    fn descriptor(&self) -> &PluginDescriptor;

    async fn authorize(
        &self,
        amount: Decimal,
        order_id: &str,
        ctx: &PaymentContext,
    ) -> PaymentResponse;

    /// `collected` is the caller's ground truth about whether funds were received.
    async fn capture(
        &self,
        amount: Decimal,
        order_id: &str,
        collected: bool,
        ctx: &PaymentContext,
    ) -> PaymentResponse;

    async fn cancel(&self, order_id: &str, ctx: &PaymentContext) -> PaymentResponse;

    async fn refund(&self, amount: Decimal, order_id: &str, ctx: &PaymentContext)
    -> PaymentResponse;

    fn normalize_response(&self, raw_response: &Value) -> PaymentResponse;

    fn special_serializer(&self) -> Box<dyn PayloadSchema>;

    fn public_keys(&self) -> BTreeMap<String, String>;
}

pub type GatewayHandle = Arc<dyn PaymentGateway>;
