pub mod listing;
pub mod manager;
pub mod sources;
pub mod traits;

pub use manager::PluginManager;
pub use traits::{SourceContext, SourcePlugin};
