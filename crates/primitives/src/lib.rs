use borsh::{BorshDeserialize, BorshSerialize};
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;


/// 32-byte hash identifying a block or a transaction.
///
/// Rendered and parsed as 64 characters of lower-case hex.
#[derive(
    BorshSerialize, BorshDeserialize,
    Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Default
)]
pub struct Hash32([u8; 32]);


impl Hash32 {
    pub const ZERO: Hash32 = Hash32([0; 32]);

    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// Whether this is the all-zero sentinel used by generation (coinbase)
    /// inputs, which reference no previous output.
    pub fn is_zero(&self) -> bool {
        self.0 == [0; 32]
    }

    pub fn from_slice(bytes: &[u8]) -> anyhow::Result<Self> {
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| anyhow::anyhow!("expected 32 bytes, got {}", bytes.len()))?;
        Ok(Self(arr))
    }
}


impl From<[u8; 32]> for Hash32 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}


impl Display for Hash32 {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&faster_hex::hex_string(&self.0))
    }
}


impl Debug for Hash32 {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Hash32({})", self)
    }
}


impl FromStr for Hash32 {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        anyhow::ensure!(s.len() == 64, "expected 64 hex characters, got {}", s.len());
        let mut bytes = [0u8; 32];
        faster_hex::hex_decode(s.as_bytes(), &mut bytes)?;
        Ok(Self(bytes))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let hash = Hash32::new([0xab; 32]);
        let hex = hash.to_string();
        assert_eq!(hex.len(), 64);
        assert_eq!(hex.parse::<Hash32>().unwrap(), hash);
    }

    #[test]
    fn rejects_bad_hex() {
        assert!("deadbeef".parse::<Hash32>().is_err());
        assert!("zz".repeat(32).parse::<Hash32>().is_err());
    }

    #[test]
    fn zero_sentinel() {
        assert!(Hash32::ZERO.is_zero());
        assert!(!Hash32::new([1; 32]).is_zero());
    }
}
