use bcq_primitives::Hash32;
use borsh::{BorshDeserialize, BorshSerialize};


/// A mined block as decoded from a container file.
///
/// Immutable once parsed. The hash is carried by the on-disk record,
/// not recomputed here.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub hash: Hash32,
    /// Creation time, unix seconds UTC.
    pub timestamp: i64,
    pub transactions: Vec<Transaction>,
}


#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub hash: Hash32,
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
}


/// Reference to a previously created output plus the unlocking script.
///
/// A zero `prev_tx` marks a generation (coinbase) input.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Input {
    pub prev_tx: Hash32,
    pub prev_index: u32,
    pub unlock_script: Vec<u8>,
}


#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Output {
    /// Amount in the smallest monetary unit.
    pub value: u64,
    pub lock_script: Vec<u8>,
}
