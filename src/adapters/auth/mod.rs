//! Authentication adapters.
//!
//! - `JwtTokenService` - HS256 bearer tokens
//! - `BcryptPasswordHasher` - salted password hashes

mod bcrypt_hasher;
mod jwt;

pub use bcrypt_hasher::BcryptPasswordHasher;
pub use jwt::JwtTokenService;
