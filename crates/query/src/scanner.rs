use crate::record::IndexRecord;
use anyhow::anyhow;
use bcq_chain::{list_container_files, Block, ContainerReader, Transaction};
use crossbeam_channel::Sender;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;


/// Concurrent traversal of all container files in a data directory.
///
/// Each file is parsed by its own parallel task, preserving on-disk order
/// within the file; no order is guaranteed across files. For every
/// (block, transaction) pair the caller's callback runs and two index
/// records are emitted, whether or not the caller needs them.
pub struct Scanner {
    data_dir: PathBuf,
}


impl Scanner {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Scans every container file, invoking `callback` once per transaction.
    ///
    /// The callback runs concurrently across files and must tolerate that.
    /// Returns only after all per-file tasks have completed; a failure in
    /// any task fails the scan, but side effects of other tasks (callback
    /// invocations, records already sent) may have happened regardless.
    ///
    /// The `records` sender is dropped on return, which lets the index
    /// writer observe end-of-stream once all producers are done.
    pub fn scan<F>(&self, records: Sender<IndexRecord>, callback: F) -> anyhow::Result<()>
    where
        F: Fn(&Block, &Transaction) -> anyhow::Result<()> + Sync,
    {
        let files = list_container_files(&self.data_dir)?;
        debug!("scanning {} container files in {}", files.len(), self.data_dir.display());
        files
            .par_iter()
            .try_for_each(|file| scan_file(file, &records, &callback))
    }
}


fn scan_file<F>(
    file: &Path,
    records: &Sender<IndexRecord>,
    callback: &F,
) -> anyhow::Result<()>
where
    F: Fn(&Block, &Transaction) -> anyhow::Result<()> + Sync,
{
    debug!("scanning {}", file.display());
    for block in ContainerReader::open(file)? {
        let block = block?;
        for transaction in &block.transactions {
            callback(&block, transaction)?;
            send(records, IndexRecord::tx_location(transaction.hash, block.hash))?;
            send(records, IndexRecord::block_location(block.hash, file))?;
        }
    }
    Ok(())
}


fn send(records: &Sender<IndexRecord>, record: IndexRecord) -> anyhow::Result<()> {
    records
        .send(record)
        .map_err(|_| anyhow!("index writer terminated before the scan finished"))
}


#[cfg(test)]
mod tests {
    use super::*;
    use bcq_chain::{ContainerWriter, Input, Output};
    use bcq_primitives::Hash32;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn block(tag: u8, tx_count: u8) -> Block {
        Block {
            hash: Hash32::new([tag; 32]),
            timestamp: 1_600_000_000,
            transactions: (0..tx_count)
                .map(|i| Transaction {
                    hash: Hash32::new([0xa0 + tag + i; 32]),
                    inputs: vec![Input {
                        prev_tx: Hash32::ZERO,
                        prev_index: u32::MAX,
                        unlock_script: vec![],
                    }],
                    outputs: vec![Output {
                        value: 1,
                        lock_script: vec![],
                    }],
                })
                .collect(),
        }
    }

    #[test]
    fn emits_two_records_per_transaction() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = ContainerWriter::create(dir.path().join("blk00000.dat")).unwrap();
        writer.append(&block(1, 2)).unwrap();
        writer.append(&block(2, 1)).unwrap();
        writer.finish().unwrap();

        let calls = AtomicUsize::new(0);
        let (tx, rx) = crossbeam_channel::unbounded();
        Scanner::new(dir.path())
            .scan(tx, |_, _| {
                calls.fetch_add(1, Ordering::Relaxed);
                Ok(())
            })
            .unwrap();

        assert_eq!(calls.load(Ordering::Relaxed), 3);
        let records: Vec<_> = rx.into_iter().collect();
        assert_eq!(records.len(), 6);
        assert!(records.contains(&IndexRecord::tx_location(
            Hash32::new([0xa1; 32]),
            Hash32::new([1; 32])
        )));
    }

    #[test]
    fn callback_error_fails_the_scan() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = ContainerWriter::create(dir.path().join("blk00000.dat")).unwrap();
        writer.append(&block(1, 1)).unwrap();
        writer.finish().unwrap();

        let (tx, _rx) = crossbeam_channel::unbounded();
        let result = Scanner::new(dir.path()).scan(tx, |_, _| anyhow::bail!("boom"));
        assert!(result.is_err());
    }

    #[test]
    fn empty_directory_scans_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = crossbeam_channel::unbounded();
        Scanner::new(dir.path()).scan(tx, |_, _| Ok(())).unwrap();
        assert!(rx.into_iter().next().is_none());
    }
}
