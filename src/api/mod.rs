//! API Module
//!
//! JSON-RPC endpoint for batch distributions and balance queries.

pub mod server;


pub use server::Server;
