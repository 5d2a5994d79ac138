use crate::block_index::BlockIndex;
use crate::row::{BlockSummaryRow, DetailRow, Direction};
use crate::scanner::Scanner;
use crate::sink::OutputSink;
use crate::writer::IndexWriter;
use anyhow::{bail, Context};
use bcq_chain::{decode_address, Block, Transaction};
use bcq_primitives::Hash32;
use bcq_storage::{Database, KvRead};
use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashSet;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use tracing::{debug, info};


/// Orchestrates the scan, index-write and block-index workers for one
/// operation, then performs the resolution joins over the shared store
/// handle. The same `Database` handle serves the writer during scanning
/// and the lookups during resolution.
pub struct QueryEngine {
    data_dir: PathBuf,
    db: Arc<Database>,
}


impl QueryEngine {
    pub fn new(data_dir: impl Into<PathBuf>, db: Arc<Database>) -> Self {
        Self {
            data_dir: data_dir.into(),
            db,
        }
    }

    /// Emits one summary row per block whose day-truncated creation time is
    /// on or after `since`. Row order across files is nondeterministic.
    pub fn list_blocks_since(
        &self,
        since: NaiveDate,
        sink: &mut dyn OutputSink,
    ) -> anyhow::Result<()> {
        // the callback fires once per transaction, so a block with N
        // transactions is observed N times
        let seen: DashSet<Hash32> = DashSet::new();
        let sink = Mutex::new(sink);
        self.run_scan(|block, _| {
            let time = block_time(block)?;
            if time.date_naive() >= since && seen.insert(block.hash) {
                let row = BlockSummaryRow {
                    block_hash: block.hash,
                    time,
                    transaction_count: block.transactions.len(),
                };
                sink.lock().write_row(&row.fields())?;
            }
            Ok(())
        })?;
        Ok(())
    }

    /// Emits resolved INPUT/OUTPUT rows for every transaction of the given
    /// block. The hash is parsed only after the scan, so a malformed or
    /// unknown hash still populates the persistent index and produces no
    /// rows; a broken reference during resolution fails the whole query.
    pub fn block_transactions(
        &self,
        block_hash: &str,
        sink: &mut dyn OutputSink,
    ) -> anyhow::Result<()> {
        let index = self.run_scan_with_index(|_, _| Ok(()))?;

        let Ok(target) = block_hash.parse::<Hash32>() else {
            debug!("{:?} does not parse as a block hash, no rows", block_hash);
            return Ok(());
        };
        let Some(block) = index.find(target) else {
            debug!("block {} not found in the corpus, no rows", target);
            return Ok(());
        };
        for transaction in &block.transactions {
            self.resolve_transaction(&index, transaction, block.hash, sink)?;
        }
        Ok(())
    }

    /// Emits resolved rows for every transaction touching `address`.
    ///
    /// A spend from the address records its *funding* transaction as the
    /// candidate, a receipt records the *current* one. The asymmetry is
    /// long-standing observable behavior and is kept as is.
    pub fn address_transactions(
        &self,
        address: &str,
        sink: &mut dyn OutputSink,
    ) -> anyhow::Result<()> {
        let candidates: DashSet<Hash32> = DashSet::new();
        let index = self.run_scan_with_index(|_, transaction| {
            let spend = transaction
                .inputs
                .iter()
                .find(|input| decode_address(&input.unlock_script).as_deref() == Some(address));
            if let Some(input) = spend {
                candidates.insert(input.prev_tx);
            }
            let receives = transaction
                .outputs
                .iter()
                .any(|output| decode_address(&output.lock_script).as_deref() == Some(address));
            if receives {
                candidates.insert(transaction.hash);
            }
            Ok(())
        })?;

        info!("resolving {} candidate transactions", candidates.len());
        for candidate in candidates {
            let owning_block = index.get(self.lookup_block_hash(candidate)?)?;
            let transaction = owning_block
                .transactions
                .iter()
                .find(|tx| tx.hash == candidate)
                .with_context(|| {
                    format!(
                        "transaction {} missing from its indexed block {}",
                        candidate, owning_block.hash
                    )
                })?;
            self.resolve_transaction(&index, transaction, owning_block.hash, sink)?;
        }
        Ok(())
    }

    /// Scanner plus index writer, joined before returning.
    fn run_scan<F>(&self, callback: F) -> anyhow::Result<u64>
    where
        F: Fn(&Block, &Transaction) -> anyhow::Result<()> + Sync,
    {
        let (records_tx, records_rx) = crossbeam_channel::unbounded();
        thread::scope(|scope| {
            let db = self.db.clone();
            let writer = scope.spawn(move || IndexWriter::new(db).run(records_rx));
            let scan = Scanner::new(&self.data_dir).scan(records_tx, callback);
            // a dead writer also fails the scan through the channel, so
            // surface the writer's own error first
            let written = join_worker(writer, "index writer")?;
            scan?;
            Ok(written)
        })
    }

    /// Scanner, index writer and in-memory block index build, all running
    /// concurrently and joined before resolution reads start.
    fn run_scan_with_index<F>(&self, callback: F) -> anyhow::Result<BlockIndex>
    where
        F: Fn(&Block, &Transaction) -> anyhow::Result<()> + Sync,
    {
        let (records_tx, records_rx) = crossbeam_channel::unbounded();
        thread::scope(|scope| {
            let db = self.db.clone();
            let writer = scope.spawn(move || IndexWriter::new(db).run(records_rx));
            let indexer = scope.spawn(|| BlockIndex::build(&self.data_dir));
            let scan = Scanner::new(&self.data_dir).scan(records_tx, callback);
            let written = join_worker(writer, "index writer");
            let index = join_worker(indexer, "block indexer");
            written?;
            scan?;
            index
        })
    }

    /// The previous-output join: maps each non-generation input of
    /// `transaction` to the exact output it spends and emits one row per
    /// input and per output.
    fn resolve_transaction(
        &self,
        index: &BlockIndex,
        transaction: &Transaction,
        owning_block: Hash32,
        sink: &mut dyn OutputSink,
    ) -> anyhow::Result<()> {
        for input in &transaction.inputs {
            if input.prev_tx.is_zero() {
                continue;
            }
            let prev_block_hash = self.lookup_block_hash(input.prev_tx)?;
            let prev_block = index.get(prev_block_hash)?;
            let prev_tx = prev_block
                .transactions
                .iter()
                .find(|tx| tx.hash == input.prev_tx)
                .with_context(|| {
                    format!(
                        "previous transaction {} missing from block {}",
                        input.prev_tx, prev_block_hash
                    )
                })?;
            let spent = prev_tx
                .outputs
                .get(input.prev_index as usize)
                .with_context(|| {
                    format!(
                        "transaction {} has no output at index {}",
                        input.prev_tx, input.prev_index
                    )
                })?;
            let row = DetailRow {
                tx: transaction.hash,
                file: self.lookup_file(prev_block_hash)?,
                direction: Direction::Input,
                address: decode_address(&input.unlock_script),
                ref_tx: input.prev_tx,
                amount: spent.value,
            };
            sink.write_row(&row.fields())?;
        }

        for output in &transaction.outputs {
            let row = DetailRow {
                tx: transaction.hash,
                file: self.lookup_file(owning_block)?,
                direction: Direction::Output,
                address: decode_address(&output.lock_script),
                ref_tx: transaction.hash,
                amount: output.value,
            };
            sink.write_row(&row.fields())?;
        }
        Ok(())
    }

    fn lookup_block_hash(&self, tx_hash: Hash32) -> anyhow::Result<Hash32> {
        let value = self.db.get(tx_hash.as_bytes())?.with_context(|| {
            format!("transaction {} is not in the persistent index", tx_hash)
        })?;
        Hash32::from_slice(&value)
    }

    fn lookup_file(&self, block_hash: Hash32) -> anyhow::Result<String> {
        let value = self.db.get(block_hash.as_bytes())?.with_context(|| {
            format!("block {} is not in the persistent index", block_hash)
        })?;
        Ok(String::from_utf8(value.to_vec())?)
    }
}


fn block_time(block: &Block) -> anyhow::Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(block.timestamp, 0)
        .with_context(|| format!("block {} has an out-of-range timestamp", block.hash))
}


fn join_worker<T>(
    handle: thread::ScopedJoinHandle<'_, anyhow::Result<T>>,
    name: &str,
) -> anyhow::Result<T> {
    match handle.join() {
        Ok(result) => result,
        Err(_) => bail!("{} worker panicked", name),
    }
}
