//! Legacy transaction wire format
//!
//! Implements the compact binary message layout by hand (compact-u16
//! arrays, message header, compiled instructions) so the wallet does not
//! carry the full Solana SDK. Only what a single-signer native transfer
//! needs is covered.

use crate::error::WalletError;
use crate::solana::keys::{Keypair, Pubkey};

/// System program id (all zeros).
pub const SYSTEM_PROGRAM_ID: Pubkey = Pubkey([0u8; 32]);

/// System program instruction index for a native transfer.
const SYSTEM_TRANSFER_INDEX: u32 = 2;

/// Append a compact-u16 length prefix (7 bits per byte, little-endian,
/// high bit marks continuation).
fn push_compact_u16(buf: &mut Vec<u8>, mut value: u16) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            break;
        }
        buf.push(byte | 0x80);
    }
}

/// An unsigned single-signer transfer message anchored to a recent
/// blockhash.
pub struct TransferMessage {
    account_keys: Vec<Pubkey>,
    num_readonly_unsigned: u8,
    recent_blockhash: [u8; 32],
    program_index: u8,
    instruction_accounts: Vec<u8>,
    instruction_data: Vec<u8>,
}

impl TransferMessage {
    /// Build a native transfer: fee payer and source is `from`, destination
    /// is `to`. A transfer to self collapses the destination into the payer
    /// entry, as the account list may not contain duplicates.
    pub fn native_transfer(
        from: Pubkey,
        to: Pubkey,
        lamports: u64,
        recent_blockhash: &str,
    ) -> Result<Self, WalletError> {
        let decoded = bs58::decode(recent_blockhash)
            .into_vec()
            .map_err(|e| WalletError::Rpc(format!("malformed blockhash: {}", e)))?;
        let blockhash: [u8; 32] = decoded
            .as_slice()
            .try_into()
            .map_err(|_| WalletError::Rpc("malformed blockhash: wrong length".to_string()))?;

        let (account_keys, instruction_accounts, program_index) = if to == from {
            (vec![from, SYSTEM_PROGRAM_ID], vec![0u8, 0u8], 1u8)
        } else {
            (vec![from, to, SYSTEM_PROGRAM_ID], vec![0u8, 1u8], 2u8)
        };

        let mut data = Vec::with_capacity(12);
        data.extend_from_slice(&SYSTEM_TRANSFER_INDEX.to_le_bytes());
        data.extend_from_slice(&lamports.to_le_bytes());

        Ok(Self {
            account_keys,
            num_readonly_unsigned: 1, // the system program
            recent_blockhash: blockhash,
            program_index,
            instruction_accounts,
            instruction_data: data,
        })
    }

    /// Serialize in wire order: header, account keys, blockhash, compiled
    /// instructions.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(3 + 1 + self.account_keys.len() * 32 + 32 + 20);
        buf.push(1); // one required signature (the fee payer)
        buf.push(0); // no readonly signed accounts
        buf.push(self.num_readonly_unsigned);
        push_compact_u16(&mut buf, self.account_keys.len() as u16);
        for key in &self.account_keys {
            buf.extend_from_slice(&key.0);
        }
        buf.extend_from_slice(&self.recent_blockhash);
        push_compact_u16(&mut buf, 1); // one instruction
        buf.push(self.program_index);
        push_compact_u16(&mut buf, self.instruction_accounts.len() as u16);
        buf.extend_from_slice(&self.instruction_accounts);
        push_compact_u16(&mut buf, self.instruction_data.len() as u16);
        buf.extend_from_slice(&self.instruction_data);
        buf
    }

    /// Sign with the fee payer and produce full transaction wire bytes:
    /// compact array of signatures followed by the message.
    pub fn sign(&self, keypair: &Keypair) -> SignedTransaction {
        let message = self.serialize();
        let signature = keypair.sign(&message);
        let mut wire = Vec::with_capacity(1 + 64 + message.len());
        push_compact_u16(&mut wire, 1);
        wire.extend_from_slice(&signature);
        wire.extend_from_slice(&message);
        SignedTransaction { signature, wire }
    }
}

pub struct SignedTransaction {
    pub signature: [u8; 64],
    pub wire: Vec<u8>,
}

impl SignedTransaction {
    pub fn signature_base58(&self) -> String {
        bs58::encode(self.signature).into_string()
    }
}
