mod db;
mod kv;

pub use db::Database;
pub use kv::{KvRead, KvWrite};
