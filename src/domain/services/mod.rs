mod node_selector;
mod retention;

pub use node_selector::NodeSelector;
pub use retention::RetentionPolicy;
