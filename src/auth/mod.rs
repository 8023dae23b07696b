//! Caller identity. Tokens are issued by the external identity provider; this
//! service only verifies them.

mod claims;
mod extractors;
pub mod jwt;

pub use claims::{Claims, Role};
pub use extractors::{AdminUser, AuthUser};
pub use jwt::JwtKeys;
