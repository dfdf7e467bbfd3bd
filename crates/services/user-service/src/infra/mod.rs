//! Infrastructure layer - database, cache and outbound HTTP.

pub mod cache;
pub mod datasource;
mod db;
pub mod http_client;
pub mod migrations;

pub use cache::{cache_key, CacheClient, RedisCache};
pub use datasource::{TransactionScoped, TxOptions, WithTransaction};
pub use db::Database;
pub use http_client::{HttpClient, HttpMethod, HttpRequest, HttpResponse, ReqwestClient};
pub use migrations::Migrator;
