//! Agent backend adapter
//!
//! Talks to the persona backend over HTTP: `POST /invoke` for complete
//! replies and `POST /stream` for Server-Sent Events.

pub mod error;
pub mod gateway;
pub mod protocol;
pub mod sse;
