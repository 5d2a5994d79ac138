use ripemd::Ripemd160;
use sha2::{Digest, Sha256};


const VERSION_P2PKH: u8 = 0x00;

const OP_DUP: u8 = 0x76;
const OP_HASH160: u8 = 0xa9;
const OP_EQUALVERIFY: u8 = 0x88;
const OP_CHECKSIG: u8 = 0xac;

const PUBKEY_LEN: usize = 33;


/// Best-effort extraction of a destination address from a locking or
/// unlocking script. Returns `None` for any script that does not match
/// one of the two recognized templates.
pub fn decode_address(script: &[u8]) -> Option<String> {
    pubkey_hash_from_lock(script)
        .or_else(|| pubkey_hash_from_unlock(script))
        .map(|hash| encode_base58check(&hash))
}


/// Address of the given compressed public key.
pub fn address_from_pubkey(pubkey: &[u8]) -> String {
    encode_base58check(&hash160(pubkey))
}


/// Hash160 of a public key, as embedded in locking scripts.
pub fn pubkey_hash(pubkey: &[u8]) -> [u8; 20] {
    hash160(pubkey)
}


/// Pay-to-pubkey-hash locking script for the given pubkey hash.
pub fn lock_script(pubkey_hash: [u8; 20]) -> Vec<u8> {
    let mut script = Vec::with_capacity(25);
    script.extend_from_slice(&[OP_DUP, OP_HASH160, 20]);
    script.extend_from_slice(&pubkey_hash);
    script.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);
    script
}


/// Unlocking script carrying a signature and a compressed public key.
pub fn unlock_script(signature: &[u8], pubkey: &[u8; PUBKEY_LEN]) -> Vec<u8> {
    let mut script = Vec::with_capacity(2 + signature.len() + PUBKEY_LEN);
    script.push(signature.len() as u8);
    script.extend_from_slice(signature);
    script.push(PUBKEY_LEN as u8);
    script.extend_from_slice(pubkey);
    script
}


fn pubkey_hash_from_lock(script: &[u8]) -> Option<[u8; 20]> {
    match script {
        [OP_DUP, OP_HASH160, 20, hash @ .., OP_EQUALVERIFY, OP_CHECKSIG] if hash.len() == 20 => {
            hash.try_into().ok()
        }
        _ => None,
    }
}


fn pubkey_hash_from_unlock(script: &[u8]) -> Option<[u8; 20]> {
    let (&sig_len, rest) = script.split_first()?;
    let rest = rest.get(sig_len as usize..)?;
    let (&key_len, pubkey) = rest.split_first()?;
    if key_len as usize != PUBKEY_LEN || pubkey.len() != PUBKEY_LEN {
        return None;
    }
    Some(hash160(pubkey))
}


fn hash160(data: &[u8]) -> [u8; 20] {
    let sha = Sha256::digest(data);
    Ripemd160::digest(sha).into()
}


fn encode_base58check(pubkey_hash: &[u8; 20]) -> String {
    let mut payload = Vec::with_capacity(25);
    payload.push(VERSION_P2PKH);
    payload.extend_from_slice(pubkey_hash);
    let checksum = Sha256::digest(Sha256::digest(&payload));
    payload.extend_from_slice(&checksum[..4]);
    bs58::encode(payload).into_string()
}
