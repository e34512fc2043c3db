//! Network layer: per-backend HTTP clients and the connectivity
//! signal shared by use cases and the sync service.

mod client;
mod connectivity;

pub use client::RemoteClient;
pub use connectivity::Connectivity;
