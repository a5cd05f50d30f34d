//! Asynchronous CSV reader with batch interface
//!
//! Provides batch reading over transfer requests from a CSV source for the
//! async processing strategy.
//!
//! # Design
//!
//! The AsyncReader uses:
//! - csv-async for streaming CSV parsing
//! - any `futures::io::AsyncRead` source (tokio files via tokio-util compat)
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of TransferIntents
//!                  ↓
//!           csv_format module
//!           (TransferCsvRecord, convert_transfer_record)
//! ```

use crate::io::csv_format::{convert_transfer_record, TransferCsvRecord};
use crate::types::TransferIntent;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use tracing::warn;

/// Asynchronous transfer request reader
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader from an async reader
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self { csv_reader }
    }

    /// Read a batch of transfer intents
    ///
    /// Reads up to `batch_size` rows. Rows that cannot be parsed or converted
    /// are logged and skipped.
    ///
    /// # Returns
    ///
    /// The converted intents, in file order. An empty vector means the end of
    /// the input was reached.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<TransferIntent> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<TransferCsvRecord>();

        while batch.len() < batch_size {
            match records.next().await {
                Some(Ok(record)) => match convert_transfer_record(record) {
                    Ok(intent) => batch.push(intent),
                    Err(e) => warn!("Record conversion error: {}", e),
                },
                Some(Err(e)) => warn!("CSV parse error: {}", e),
                None => break,
            }
        }

        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::io::Cursor;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_async_reader_read_batch() {
        let csv_content = "source,destination,amount\n1,2,100.0\n2,1,50.0\n3,1,200.0\n";
        let reader = Cursor::new(csv_content.as_bytes());
        let mut async_reader = AsyncReader::new(reader);

        let batch = async_reader.read_batch(2).await;
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].source, Some(1));
        assert_eq!(batch[1].source, Some(2));

        let batch = async_reader.read_batch(2).await;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].source, Some(3));
        assert_eq!(batch[0].amount, Some(Decimal::new(2000, 1)));

        let batch = async_reader.read_batch(2).await;
        assert!(batch.is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_empty_csv() {
        let reader = Cursor::new("source,destination,amount\n".as_bytes());
        let mut async_reader = AsyncReader::new(reader);

        let batch = async_reader.read_batch(10).await;
        assert_eq!(batch.len(), 0);
    }

    #[tokio::test]
    async fn test_async_reader_skips_invalid_records() {
        let csv_content = "source,destination,amount\n1,2,abc\nz,2,1\n1,2,5\n";
        let reader = Cursor::new(csv_content.as_bytes());
        let mut async_reader = AsyncReader::new(reader);

        let batch = async_reader.read_batch(10).await;

        assert_eq!(batch, vec![TransferIntent::new(1, 2, Decimal::new(5, 0))]);
    }

    #[tokio::test]
    async fn test_async_reader_keeps_blank_cells_for_validation() {
        let csv_content = "source,destination,amount\n1,,5\n1,2,\n";
        let reader = Cursor::new(csv_content.as_bytes());
        let mut async_reader = AsyncReader::new(reader);

        let batch = async_reader.read_batch(10).await;

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].destination, None);
        assert_eq!(batch[1].amount, None);
    }
}
