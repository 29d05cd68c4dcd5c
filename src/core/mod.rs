pub mod classifier;
pub mod dedup;
pub mod vocab;

pub use classifier::{classify, is_graduate_position, is_in_hong_kong, is_in_mainland_china, match_reason};
pub use dedup::deduplicate;
