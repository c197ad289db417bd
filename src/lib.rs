//! IQ Option WebSocket client library.
//!
//! Maintains a persistent connection to the platform's realtime feed,
//! authenticates, subscribes to market channels, and reconstructs a
//! consistent in-memory view of balances, open positions, instruments,
//! and price/candle streams from the server's push stream.

pub mod auth;
pub mod codec;
pub mod config;
pub mod credentials;
pub mod error;
pub mod models;
pub mod session;
pub mod state;
pub mod websocket;

pub use error::{OpticError, Result};
