//! Provider clients implementing [`ClientWrapper`](crate::client_wrapper::ClientWrapper).

pub mod azure;
pub(crate) mod common;
pub mod openai;
