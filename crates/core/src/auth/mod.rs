pub mod password;
pub mod token;

pub use password::{PasswordError, PasswordManager};
pub use token::{Claims, SessionTokens, TokenError};
