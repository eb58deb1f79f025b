use std::fmt;

/// Tokens issued by `/jwt` stay valid for a year.
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 365;

/// Runtime configuration shared by the token signer and verifier.
#[derive(Clone)]
pub struct JwtConfig {
    /// Shared HS256 secret.
    pub secret: String,
    /// Allowable clock skew in seconds when validating exp/nbf.
    pub leeway_seconds: u32,
    /// Lifetime of newly issued tokens.
    pub token_ttl_days: i64,
}

impl JwtConfig {
    /// Construct config with sensible defaults (30 second leeway, one year tokens).
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            leeway_seconds: 30,
            token_ttl_days: DEFAULT_TOKEN_TTL_DAYS,
        }
    }

    /// Adjust the allowed leeway.
    pub fn with_leeway(mut self, seconds: u32) -> Self {
        self.leeway_seconds = seconds;
        self
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("leeway_seconds", &self.leeway_seconds)
            .field("token_ttl_days", &self.token_ttl_days)
            .finish()
    }
}
