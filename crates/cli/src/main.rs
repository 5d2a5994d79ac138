mod cli;
mod sink;

use anyhow::{ensure, Context};
use bcq_chain::list_container_files;
use bcq_query::{OutputSink, QueryEngine};
use bcq_storage::Database;
use chrono::NaiveDate;
use cli::Operation;
use sink::{ConsoleSink, CsvSink};
use std::path::PathBuf;
use std::sync::Arc;


enum Request {
    ListBlocksSince(NaiveDate),
    BlockTransactions(String),
    AddressTransactions(String),
}


fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();
}


fn main() -> anyhow::Result<()> {
    let args = <cli::Cli as clap::Parser>::parse();

    init_logging();

    run(&args)
}


fn run(args: &cli::Cli) -> anyhow::Result<()> {
    // every input is validated before the store is opened or any
    // scanning starts
    let mut sink: Box<dyn OutputSink> = match &args.output {
        Some(path) => Box::new(CsvSink::create(path)?),
        None => Box::new(ConsoleSink),
    };

    let files = list_container_files(&args.data_dir)?;
    ensure!(
        !files.is_empty(),
        "no container files found in {}",
        args.data_dir.display()
    );

    let request = parse_request(args.operation, &args.parameter)?;

    let db = Arc::new(Database::open(&index_db_path(args.index_db.clone())?)?);
    let engine = QueryEngine::new(&args.data_dir, db);

    match request {
        Request::ListBlocksSince(since) => engine.list_blocks_since(since, sink.as_mut()),
        Request::BlockTransactions(hash) => engine.block_transactions(&hash, sink.as_mut()),
        Request::AddressTransactions(address) => {
            engine.address_transactions(&address, sink.as_mut())
        }
    }
}


/// Shape checks only; whether a well-formed hash or address actually
/// occurs in the corpus is decided after the scan and yields zero rows,
/// not an error.
fn parse_request(operation: Operation, parameter: &str) -> anyhow::Result<Request> {
    match operation {
        Operation::ListBlocksSinceDate => {
            let since = NaiveDate::parse_from_str(parameter, "%Y-%m-%d").with_context(|| {
                format!("invalid date {:?}, expected YYYY-MM-DD", parameter)
            })?;
            Ok(Request::ListBlocksSince(since))
        }
        Operation::BlockTransactionDetail => {
            ensure!(
                parameter.len() == 64,
                "invalid block hash {:?}, expected 64 characters",
                parameter
            );
            Ok(Request::BlockTransactions(parameter.to_string()))
        }
        Operation::AddressTransactionDetail => {
            ensure!(
                parameter.len() == 34,
                "invalid address {:?}, expected 34 characters",
                parameter
            );
            Ok(Request::AddressTransactions(parameter.to_string()))
        }
    }
}


/// The index store lives under the user's data directory unless overridden.
/// It is shared by all operations across process runs.
fn index_db_path(overridden: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(path) = overridden {
        return Ok(path);
    }
    let base = dirs::data_dir()
        .or_else(dirs::home_dir)
        .context("could not determine the user data directory")?;
    Ok(base.join("bcq"))
}
