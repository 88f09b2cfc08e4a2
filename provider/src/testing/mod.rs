//! Test support - mock adapter

mod mock_adapter;

pub use mock_adapter::{MockAdapter, MockBehaviour};
