//! Client-side interface to the remote indexing service.

pub mod client;
pub mod error;
pub mod types;

pub use client::ApiClient;
pub use error::ApiError;
pub use types::{IndexRequest, QueryRequest, RepoStatus, SearchRequest};
