// Concrete implementations of the domain ports.

pub mod cache;
pub mod http;
pub mod prompt;
pub mod storage;

pub use http::HttpRepositoryClient;
pub use prompt::{PromptConfirmer, StdinConfirmer};
pub use storage::LocalStorage;
