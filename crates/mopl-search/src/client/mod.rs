//! Elasticsearch REST client.

mod elastic_client;
mod search_config;

pub use elastic_client::ElasticClient;
pub use search_config::SearchConfig;
