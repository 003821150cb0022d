//! Single node of a toy proof-of-work ledger: mines blocks from pooled
//! transactions, gossips with peers over HTTP and adopts the longest valid
//! chain it can find.

pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod network;
pub mod transaction;
pub mod wallet;
