mod memory_object_store;
mod mysqlsh_runner;
mod router_discovery;
mod s3_object_store;
mod telegram_alerter;

pub use memory_object_store::MemoryObjectStore;
pub use mysqlsh_runner::{is_connection_refused, MysqlshRunner};
pub use router_discovery::RouterDiscovery;
pub use s3_object_store::{S3ObjectStore, S3StoreConfig};
pub use telegram_alerter::TelegramAlerter;
