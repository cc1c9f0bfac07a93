//! Client side of the ledger's query/submit API.
//!
//! [`NetworkClient`] is the seam every network-facing operation goes through.
//! [`HorizonClient`] implements it over HTTP; tests substitute the scripted
//! double from `paylink-nullables`.

pub mod client;
pub mod error;
pub mod models;
mod wire;

pub use client::{HorizonClient, NetworkClient};
pub use error::{HorizonError, Rejection};
pub use models::{AccountInfo, Balance, ClaimableBalance, PathRecord};
