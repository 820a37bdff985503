pub mod model;
pub mod validate;

pub use model::{GlobalSection, NewGlobalSection, SectionFilter, SectionUpdate};
