pub mod model;
pub mod validate;

pub use model::{NewUser, Role, User, UserChanges, UserDraft, UserRow, UserUpdate};
