pub mod source;

pub use source::{SourceContext, SourcePlugin};
