//! TCP Module
//!
//! The line-oriented text protocol: clients send whitespace-delimited
//! commands terminated by CR/LF, the server answers with RESP-encoded
//! frames.

mod frame;
mod server;

pub use frame::Frame;
pub use server::serve;
