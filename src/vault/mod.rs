//! Client and domain types for the remote file vault API.

pub mod api_types;
pub mod cached_client;
pub mod client;
pub mod error;
pub mod params;
pub mod types;
