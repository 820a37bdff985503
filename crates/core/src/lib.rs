//! Domain core for the Carlton Madagascar content platform.
//!
//! - [`bilingual`] converts between the two stored locale documents and the
//!   mixed `{fr, en}` document pages edit in memory.
//! - [`section`], [`resource`] and [`user`] hold the persisted models and
//!   their validation.
//! - [`store`] defines the storage traits with Postgres and in-memory
//!   implementations.
//! - [`auth`] hashes passwords and issues session tokens.

pub mod auth;
pub mod bilingual;
pub mod resource;
pub mod section;
pub mod store;
pub mod user;
pub mod validation;
