//! Client side of the remote expense service.
//!
//! This crate provides:
//! - [`SoapTransport`] and its `reqwest` implementation
//! - A typed decoder for the service's SOAP response
//! - [`RemoteFetcher`], the bounded-retry [`ItemSource`](itemsync_core::ItemSource)

pub mod decode;
pub mod fetcher;
pub mod transport;

pub use decode::{DecodeError, decode_items};
pub use fetcher::{FetchError, RemoteFetcher};
pub use transport::{HttpTransport, SoapTransport, TransportError};
