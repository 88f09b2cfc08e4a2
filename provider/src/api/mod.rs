//! Provider API - canonical types, errors, and shared instruction templates

pub mod instructions;

mod error;
mod types;

pub use error::{ProviderError, ProviderResult};
pub use types::{OperationKind, PromptRequest, ProviderKind, RawCompletion};
