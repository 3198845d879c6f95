mod alerter;
mod dump_runner;
mod node_discovery;
mod object_store;

pub use alerter::Alerter;
pub use dump_runner::DumpRunner;
pub use node_discovery::NodeDiscovery;
pub use object_store::ObjectStore;
