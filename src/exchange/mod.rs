pub mod client;
pub mod error;
pub mod gate;

#[cfg(test)]
pub mod mock_client;
