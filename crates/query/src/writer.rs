use crate::record::IndexRecord;
use bcq_storage::{Database, KvRead, KvWrite};
use crossbeam_channel::Receiver;
use std::sync::Arc;
use tracing::debug;


/// Single consumer of the record channel fed by scan tasks.
///
/// Drains the channel until every producer has dropped its sender, then
/// returns. A key that already has a value is skipped (first-write-wins);
/// that check-then-put is not atomic and relies on there being exactly one
/// writer per store.
pub struct IndexWriter {
    db: Arc<Database>,
}


impl IndexWriter {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Runs until the channel disconnects. Returns the number of records
    /// actually written. Storage errors terminate the writer.
    pub fn run(self, records: Receiver<IndexRecord>) -> anyhow::Result<u64> {
        let mut written = 0u64;
        let mut seen = 0u64;
        for record in records {
            seen += 1;
            if self.db.has(record.key.as_bytes())? {
                continue;
            }
            self.db.put(record.key.as_bytes(), &record.value)?;
            written += 1;
        }
        debug!("index writer done, {} of {} records written", written, seen);
        Ok(written)
    }
}
