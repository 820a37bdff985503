//! The hotel's catalogue resources (rooms, restaurants, events, ...).
//!
//! Every family shares one record shape: an id, timestamps and a flat JSON
//! payload checked against the family's [`Schema`].

pub mod kind;
pub mod model;
pub mod schema;

pub use kind::ResourceKind;
pub use model::ResourceRecord;
pub use schema::{FieldSpec, FieldType, Schema};
