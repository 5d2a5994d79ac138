use bcq_primitives::Hash32;
use std::path::Path;


/// One entry of the persistent index keyspace.
///
/// Two logical kinds share the flat keyspace and are told apart only by the
/// reader's expectation: `TxHash → BlockHash` and `BlockHash → FilePath`.
/// Values for a given key are deterministic across runs, so first-write-wins
/// semantics keep the store consistent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexRecord {
    pub key: Hash32,
    pub value: Vec<u8>,
}


impl IndexRecord {
    pub fn tx_location(tx_hash: Hash32, block_hash: Hash32) -> Self {
        Self {
            key: tx_hash,
            value: block_hash.to_vec(),
        }
    }

    pub fn block_location(block_hash: Hash32, file: &Path) -> Self {
        Self {
            key: block_hash,
            value: file.to_string_lossy().into_owned().into_bytes(),
        }
    }
}
