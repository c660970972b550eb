mod client_factory;
mod http_embedder;
mod http_llm_client;
mod model_family;

pub use client_factory::{ClientFactory, ClientFactoryError};
pub use http_embedder::HttpEmbedder;
pub use http_llm_client::HttpLlmClient;
pub use model_family::ModelFamily;
