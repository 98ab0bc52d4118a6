//! Host-side orchestration for payment gateways.
//!
//! `GatewayRegistry` holds explicitly registered plugins and dispatches
//! lifecycle commands to them.

pub mod registry;
