//! Shared helpers for delivery integration tests

pub mod mock_server;
