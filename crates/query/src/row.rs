use bcq_primitives::Hash32;
use chrono::{DateTime, Utc};
use std::fmt::{Display, Formatter};


/// Placeholder shown when a script does not decode to an address.
/// Applied only at the formatting boundary; rows carry `Option<String>`.
pub const UNKNOWN_ADDRESS: &str = "<NOT IDENTIFIED>";


#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}


impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Input => f.write_str("INPUT"),
            Direction::Output => f.write_str("OUTPUT"),
        }
    }
}


/// Summary row of the list-blocks operation.
#[derive(Clone, Debug)]
pub struct BlockSummaryRow {
    pub block_hash: Hash32,
    pub time: DateTime<Utc>,
    pub transaction_count: usize,
}


impl BlockSummaryRow {
    pub fn fields(&self) -> Vec<String> {
        vec![
            String::new(),
            self.block_hash.to_string(),
            self.time.format("%Y-%m-%d %H:%M").to_string(),
            self.transaction_count.to_string(),
        ]
    }
}


/// One resolved input or output of a transaction.
///
/// For inputs, `ref_tx` is the previous transaction being spent, `amount`
/// the value of the spent output and `file` the container file holding the
/// previous transaction's block. For outputs, `ref_tx` repeats the
/// transaction hash and `file` is the owning block's container file.
#[derive(Clone, Debug)]
pub struct DetailRow {
    pub tx: Hash32,
    pub file: String,
    pub direction: Direction,
    pub address: Option<String>,
    pub ref_tx: Hash32,
    pub amount: u64,
}


impl DetailRow {
    pub fn fields(&self) -> Vec<String> {
        vec![
            self.tx.to_string(),
            self.file.clone(),
            self.direction.to_string(),
            self.address.clone().unwrap_or_else(|| UNKNOWN_ADDRESS.to_string()),
            self.ref_tx.to_string(),
            self.amount.to_string(),
        ]
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_address_maps_to_placeholder() {
        let row = DetailRow {
            tx: Hash32::new([1; 32]),
            file: "blk00000.dat".into(),
            direction: Direction::Output,
            address: None,
            ref_tx: Hash32::new([1; 32]),
            amount: 42,
        };
        assert_eq!(row.fields()[3], UNKNOWN_ADDRESS);
        assert_eq!(row.fields()[2], "OUTPUT");
        assert_eq!(row.fields()[5], "42");
    }
}
