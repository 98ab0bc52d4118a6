pub mod payment;
pub mod plugin;
pub mod ports;
