use crate::domain::event::OrderEvent;
use crate::error::{LedgerError, Result};
use std::io::Read;

/// Reads order events from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over `Result<OrderEvent>`.
/// Whitespace around fields is trimmed and record lengths may vary.
pub struct EventReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> EventReader<R> {
    /// Creates a new `EventReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes events.
    pub fn events(self) -> impl Iterator<Item = Result<OrderEvent>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(LedgerError::from))
    }
}
