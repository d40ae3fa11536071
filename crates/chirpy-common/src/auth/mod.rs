//! Authentication utilities

mod jwt;
mod password;

pub use jwt::{Claims, TokenService, TOKEN_ISSUER};
pub use password::{hash_password, validate_password_strength, verify_password, PasswordService};
