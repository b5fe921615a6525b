//! Wallet key management and persisted wallet state
//!
//! The private key NEVER leaves this module except in the encoded form that
//! goes into the wallet record.

pub mod record;
mod signer;

pub use record::{
    decode_private_key, encode_private_key, FileRecordStore, MemoryRecordStore, RecordStore,
    WalletRecord,
};
pub use signer::SecureWallet;
