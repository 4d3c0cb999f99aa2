/// Blocking CoAP client
pub mod client;

pub use client::{Client, Outcome};
