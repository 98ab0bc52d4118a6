use crate::domain::payment::{PaymentContext, PaymentResponse};
use crate::domain::plugin::{ConfigValue, EnvKind, PluginDescriptor, PluginType, parse_flag};
use crate::domain::ports::GatewayHandle;
use crate::error::{GatewayError, Result};
use rust_decimal::Decimal;
use semver::Version;
use std::collections::BTreeMap;
use tracing::{info, instrument, warn};

/// A lifecycle operation the host asks a gateway to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentCommand {
    Authorize {
        order_id: String,
        amount: Option<Decimal>,
    },
    Capture {
        order_id: String,
        amount: Option<Decimal>,
        collected: bool,
    },
    Cancel {
        order_id: String,
    },
    Refund {
        order_id: String,
        amount: Option<Decimal>,
    },
}

impl PaymentCommand {
    /// A capture where the caller did not report the cash as collected.
    pub fn capture(order_id: impl Into<String>, amount: Decimal) -> Self {
        PaymentCommand::Capture {
            order_id: order_id.into(),
            amount: Some(amount),
            collected: false,
        }
    }

    pub fn op(&self) -> &'static str {
        match self {
            PaymentCommand::Authorize { .. } => "authorize",
            PaymentCommand::Capture { .. } => "capture",
            PaymentCommand::Cancel { .. } => "cancel",
            PaymentCommand::Refund { .. } => "refund",
        }
    }

    pub fn order_id(&self) -> &str {
        match self {
            PaymentCommand::Authorize { order_id, .. }
            | PaymentCommand::Capture { order_id, .. }
            | PaymentCommand::Cancel { order_id }
            | PaymentCommand::Refund { order_id, .. } => order_id,
        }
    }

    fn required_amount(&self, amount: Option<Decimal>) -> Result<Decimal> {
        amount.ok_or_else(|| GatewayError::MissingAmount {
            op: self.op(),
            order_id: self.order_id().to_string(),
        })
    }
}

/// Gateways known to the host, keyed by plugin name.
///
/// Plugins are registered explicitly at startup. Registration checks the
/// plugin type and the host compatibility constraint.
pub struct GatewayRegistry {
    host_version: Version,
    gateways: BTreeMap<String, GatewayHandle>,
}

impl GatewayRegistry {
    pub fn new(host_version: Version) -> Self {
        Self {
            host_version,
            gateways: BTreeMap::new(),
        }
    }

    #[instrument(skip_all, fields(plugin = %gateway.descriptor().name))]
    pub fn register(&mut self, gateway: GatewayHandle) -> Result<()> {
        let descriptor = gateway.descriptor();
        if descriptor.plugin_type != PluginType::PaymentProcessor {
            return Err(GatewayError::WrongPluginType {
                name: descriptor.name.clone(),
            });
        }
        if !descriptor.is_compatible_with(&self.host_version) {
            return Err(GatewayError::IncompatibleHost {
                name: descriptor.name.clone(),
                required: descriptor.host_compatibility.clone(),
                host: self.host_version.clone(),
            });
        }
        if self.gateways.contains_key(&descriptor.name) {
            return Err(GatewayError::DuplicatePlugin(descriptor.name.clone()));
        }

        info!(version = %descriptor.version, "registered payment gateway");
        self.gateways.insert(descriptor.name.clone(), gateway);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<GatewayHandle> {
        self.gateways
            .get(name)
            .cloned()
            .ok_or_else(|| GatewayError::UnknownGateway(name.to_string()))
    }

    pub fn descriptors(&self) -> Vec<&PluginDescriptor> {
        self.gateways.values().map(|g| g.descriptor()).collect()
    }

    /// Reads the configuration keys a gateway declares through `lookup`.
    ///
    /// Optional keys that are absent are left out of the result.
    pub fn resolve_config<F>(&self, name: &str, lookup: F) -> Result<BTreeMap<String, ConfigValue>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gateway = self.get(name)?;
        let descriptor = gateway.descriptor();
        let mut resolved = BTreeMap::new();

        for declared in &descriptor.env {
            let Some(raw) = lookup(&declared.key) else {
                if declared.required {
                    return Err(GatewayError::MissingConfig {
                        plugin: descriptor.name.clone(),
                        key: declared.key.clone(),
                    });
                }
                continue;
            };

            let value = match declared.kind {
                EnvKind::Secret => ConfigValue::Secret(raw),
                EnvKind::String => ConfigValue::Text(raw),
                EnvKind::Boolean => match parse_flag(&raw) {
                    Some(flag) => ConfigValue::Flag(flag),
                    None => {
                        return Err(GatewayError::InvalidConfig {
                            key: declared.key.clone(),
                            value: raw,
                        });
                    }
                },
            };
            resolved.insert(declared.key.clone(), value);
        }

        Ok(resolved)
    }

    /// Runs `command` against the named gateway.
    #[instrument(skip(self, command, ctx), fields(op = command.op(), order_id = command.order_id()))]
    pub async fn dispatch(
        &self,
        gateway: &str,
        command: &PaymentCommand,
        ctx: &PaymentContext,
    ) -> Result<PaymentResponse> {
        let handle = self.get(gateway)?;

        let response = match command {
            PaymentCommand::Authorize { order_id, amount } => {
                let amount = command.required_amount(*amount)?;
                handle.authorize(amount, order_id, ctx).await
            }
            PaymentCommand::Capture {
                order_id,
                amount,
                collected,
            } => {
                let amount = command.required_amount(*amount)?;
                handle.capture(amount, order_id, *collected, ctx).await
            }
            PaymentCommand::Cancel { order_id } => handle.cancel(order_id, ctx).await,
            PaymentCommand::Refund { order_id, amount } => {
                let amount = command.required_amount(*amount)?;
                handle.refund(amount, order_id, ctx).await
            }
        };

        if response.success {
            info!("payment operation succeeded");
        } else {
            warn!("payment operation rejected by gateway");
        }
        Ok(response)
    }
}
