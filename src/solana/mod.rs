//! Solana ledger operations
//!
//! - Keypair handling
//! - JSON-RPC client
//! - Legacy transaction wire format and signing
//! - SOL transfer submission

pub mod keys;
pub mod rpc;
pub mod transaction;
pub mod transfer;

pub use keys::{Keypair, Pubkey};
pub use rpc::{Commitment, RpcClient};
pub use transfer::send_sol;

/// Lamports per SOL (9 decimal places).
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Convert a lamport balance to display units.
pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

/// Convert a display amount in SOL to lamports, rounding to the nearest
/// lamport. Rounding (rather than truncating) keeps the transferred amount
/// within half a lamport of what the caller asked for.
pub fn sol_to_lamports(amount_sol: f64) -> u64 {
    (amount_sol * LAMPORTS_PER_SOL as f64).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sol_to_lamports_rounds_to_nearest() {
        assert_eq!(sol_to_lamports(1.0), 1_000_000_000);
        assert_eq!(sol_to_lamports(0.000000001), 1);
        // 1.9 lamports rounds up; truncation would give 1
        assert_eq!(sol_to_lamports(0.0000000019), 2);
        assert_eq!(sol_to_lamports(0.1), 100_000_000);
    }

    #[test]
    fn test_lamports_to_sol() {
        assert_eq!(lamports_to_sol(2_000_000_000), 2.0);
        assert_eq!(lamports_to_sol(0), 0.0);
        assert_eq!(lamports_to_sol(500_000_000), 0.5);
    }
}
