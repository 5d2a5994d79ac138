use crate::kv::{KvRead, KvWrite};
use anyhow::Context;
use rocksdb::Options as RocksOptions;
use std::ops::Deref;
use std::path::Path;


type RocksDB = rocksdb::DB;


/// Persistent byte-key/byte-value store backing the index.
///
/// One handle is expected to be constructed per operation and shared by the
/// index writer and the resolution phase. The on-disk location is durable
/// across process runs; keys are never deleted or overwritten by this
/// application. The store is closed when the handle is dropped.
pub struct Database {
    db: RocksDB,
}


impl Database {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let mut options = RocksOptions::default();
        options.create_if_missing(true);
        options.set_compression_type(rocksdb::DBCompressionType::Lz4);
        let db = RocksDB::open(&options, path)
            .with_context(|| format!("failed to open index store at {}", path.display()))?;
        Ok(Self { db })
    }
}


impl KvRead for Database {
    fn get(&self, key: &[u8]) -> anyhow::Result<Option<impl Deref<Target = [u8]>>> {
        Ok(self.db.get_pinned(key)?)
    }
}


impl KvWrite for Database {
    fn put(&self, key: &[u8], value: &[u8]) -> anyhow::Result<()> {
        self.db.put(key, value)?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_before_close() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).unwrap();

        db.put(b"key", b"value").unwrap();
        let read = db.get(b"key").unwrap().unwrap();
        assert_eq!(&*read, b"value");

        assert!(db.has(b"key").unwrap());
        assert!(!db.has(b"missing").unwrap());
        assert!(db.get(b"missing").unwrap().is_none());
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let db = Database::open(dir.path()).unwrap();
            db.put(b"key", b"value").unwrap();
        }
        let db = Database::open(dir.path()).unwrap();
        assert_eq!(&*db.get(b"key").unwrap().unwrap(), b"value");
    }
}
