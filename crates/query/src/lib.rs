mod block_index;
mod engine;
mod record;
mod row;
mod scanner;
mod sink;
mod writer;

pub use block_index::BlockIndex;
pub use engine::QueryEngine;
pub use record::IndexRecord;
pub use row::{BlockSummaryRow, DetailRow, Direction, UNKNOWN_ADDRESS};
pub use scanner::Scanner;
pub use sink::OutputSink;
pub use writer::IndexWriter;
