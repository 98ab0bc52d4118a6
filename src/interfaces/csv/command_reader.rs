use crate::application::registry::PaymentCommand;
use crate::domain::plugin::parse_flag;
use crate::error::{GatewayError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    Authorize,
    Capture,
    Cancel,
    Refund,
}

/// One row of a command file.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct CommandRecord {
    pub op: CommandType,
    pub order_id: String,
    /// Parsed from the field text so the scale survives.
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub amount: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub collected: bool,
}

fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(false),
        Some(v) => parse_flag(v)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid collected flag: {v}"))),
    }
}

impl From<CommandRecord> for PaymentCommand {
    fn from(record: CommandRecord) -> Self {
        let CommandRecord {
            op,
            order_id,
            amount,
            collected,
        } = record;
        match op {
            CommandType::Authorize => PaymentCommand::Authorize { order_id, amount },
            CommandType::Capture => PaymentCommand::Capture {
                order_id,
                amount,
                collected,
            },
            CommandType::Cancel => PaymentCommand::Cancel { order_id },
            CommandType::Refund => PaymentCommand::Refund { order_id, amount },
        }
    }
}

/// Reads payment commands from a CSV source.
///
/// Columns are `op, order_id, amount, collected`; the last two may be empty
/// or missing.
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes each row into a `PaymentCommand`.
    pub fn commands(self) -> impl Iterator<Item = Result<PaymentCommand>> {
        self.reader.into_deserialize().map(|result| {
            result
                .map(|record: CommandRecord| record.into())
                .map_err(GatewayError::from)
        })
    }
}
