use thiserror::Error;

pub type Result<T> = std::result::Result<T, GatewayError>;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Unknown gateway: {0}")]
    UnknownGateway(String),
    #[error("Gateway already registered: {0}")]
    DuplicatePlugin(String),
    #[error("Plugin {name} is not a payment processor")]
    WrongPluginType { name: String },
    #[error("Plugin {name} requires host {required}, running {host}")]
    IncompatibleHost {
        name: String,
        required: semver::VersionReq,
        host: semver::Version,
    },
    #[error("Missing required configuration key {key} for {plugin}")]
    MissingConfig { plugin: String, key: String },
    #[error("Invalid value for configuration key {key}: {value}")]
    InvalidConfig { key: String, value: String },
    #[error("Command {op} for order {order_id} requires an amount")]
    MissingAmount { op: &'static str, order_id: String },
    #[error("Validation error: {0}")]
    ValidationError(String),
}
