use crate::domain::payment::PaymentResponse;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct ResponseRecord<'a> {
    op: &'a str,
    order_id: &'a str,
    success: bool,
    transaction_id: Option<&'a str>,
}

/// Writes gateway responses as CSV rows of `op,order_id,success,transaction_id`.
pub struct ResponseWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ResponseWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_response(
        &mut self,
        op: &str,
        order_id: &str,
        response: &PaymentResponse,
    ) -> Result<()> {
        self.writer.serialize(ResponseRecord {
            op,
            order_id,
            success: response.success,
            transaction_id: response.transaction_id.as_deref(),
        })?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
