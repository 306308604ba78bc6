//! `shopfront-auth` — bearer-token authentication boundary.
//!
//! This crate is decoupled from HTTP and storage: it turns a raw token into a
//! verified [`AuthUser`] or an error.

pub mod claims;
pub mod user;
pub mod validator;

pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use user::AuthUser;
pub use validator::{Hs256JwtValidator, JwtError, JwtValidator};
