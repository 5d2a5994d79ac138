use clap::{Parser, ValueEnum};
use std::path::PathBuf;


#[derive(ValueEnum, Copy, Clone, Debug)]
pub enum Operation {
    /// List blocks created since a date
    ListBlocksSinceDate,
    /// Resolved inputs/outputs of one block's transactions
    BlockTransactionDetail,
    /// Resolved inputs/outputs of every transaction touching an address
    AddressTransactionDetail,
}


#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the ledger container files
    #[arg(short, long, value_name = "DIR")]
    pub data_dir: PathBuf,

    /// Operation to execute
    #[arg(short, long, value_enum)]
    pub operation: Operation,

    /// Operation parameter: a YYYY-MM-DD date, a 64-character block hash
    /// or a 34-character address, depending on the operation
    #[arg(short, long, value_name = "VALUE")]
    pub parameter: String,

    /// Append result rows to this file as ';'-separated values instead of
    /// printing them to stdout
    #[arg(short = 'f', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Location of the persistent index store
    #[arg(long, value_name = "DIR")]
    pub index_db: Option<PathBuf>,
}
