//! Infrastructure layer - Store implementations, key generation and logging

pub mod api_key;
pub mod logging;
