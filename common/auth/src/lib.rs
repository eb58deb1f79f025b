pub mod claims;
pub mod config;
pub mod error;
pub mod extractors;
pub mod guards;
pub mod roles;
pub mod signer;
pub mod verifier;

pub use claims::Claims;
pub use config::{JwtConfig, DEFAULT_TOKEN_TTL_DAYS};
pub use error::{AuthError, AuthResult};
pub use extractors::AuthContext;
pub use guards::{ensure_role, AdminContext, GuardError, RoleDirectory};
pub use roles::ROLE_ADMIN;
pub use signer::{IssuedToken, TokenSigner};
pub use verifier::JwtVerifier;
