//! HTTP transport shared by the OAuth layer and the API dispatcher.

mod client;

pub use client::{HttpClient, HttpClientBuilder};
