//! Nullable infrastructure for deterministic testing.
//!
//! Follows the "A-frame architecture" pattern: every external dependency
//! (clock, ledger network, signing wallet) sits behind a trait, and this
//! crate provides implementations that:
//! - Return deterministic, scripted values
//! - Can be controlled programmatically
//! - Never touch the network or a browser
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod network;
pub mod wallet;

pub use clock::NullClock;
pub use network::NullNetwork;
pub use wallet::{NullWallet, SignBehavior};
