use anyhow::Context;
use bcq_chain::{list_container_files, Block, ContainerReader};
use bcq_primitives::Hash32;
use dashmap::DashMap;
use rayon::prelude::*;
use std::path::Path;
use tracing::debug;


/// Full in-memory `block hash → block` map, rebuilt once per run.
///
/// Needed because an input may reference an output created in any earlier
/// block, not only ones already visited in the current traversal order.
pub struct BlockIndex {
    blocks: DashMap<Hash32, Block>,
}


impl BlockIndex {
    /// Parses every container file in `dir` (one parallel task per file)
    /// and retains all blocks.
    pub fn build(dir: &Path) -> anyhow::Result<Self> {
        let index = Self {
            blocks: DashMap::new(),
        };
        let files = list_container_files(dir)?;
        files.par_iter().try_for_each(|file| -> anyhow::Result<()> {
            for block in ContainerReader::open(file)? {
                let block = block?;
                index.blocks.insert(block.hash, block);
            }
            Ok(())
        })?;
        debug!("block index built, {} blocks", index.blocks.len());
        Ok(index)
    }

    /// Point lookup used by resolution joins. A hash absent from the corpus
    /// is an error, not an empty result.
    pub fn get(&self, hash: Hash32) -> anyhow::Result<Block> {
        self.find(hash)
            .with_context(|| format!("block {} not present in the scanned corpus", hash))
    }

    pub fn find(&self, hash: Hash32) -> Option<Block> {
        self.blocks.get(&hash).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
