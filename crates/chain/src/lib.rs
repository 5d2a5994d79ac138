mod address;
mod container;
mod model;

pub use address::{address_from_pubkey, decode_address, lock_script, pubkey_hash, unlock_script};
pub use container::{list_container_files, ContainerReader, ContainerWriter, CONTAINER_FILE_REGEX};
pub use model::{Block, Input, Output, Transaction};
