use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};

/// Application-focused representation of verified JWT claims.
#[derive(Debug, Clone, Serialize)]
pub struct Claims {
    pub email: String,
    pub expires_at: DateTime<Utc>,
    pub issued_at: Option<DateTime<Utc>>,
    /// Full claim object as signed, including any extra identity fields.
    pub raw: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ClaimsRepr {
    email: String,
    exp: i64,
    #[serde(default)]
    iat: Option<i64>,
}

impl TryFrom<ClaimsRepr> for Claims {
    type Error = AuthError;

    fn try_from(value: ClaimsRepr) -> AuthResult<Self> {
        let email = value.email.trim().to_string();
        if email.is_empty() {
            return Err(AuthError::InvalidClaim("email", value.email));
        }

        let expires_at = Utc
            .timestamp_opt(value.exp, 0)
            .single()
            .ok_or_else(|| AuthError::InvalidClaim("exp", value.exp.to_string()))?;

        let issued_at = match value.iat {
            Some(iat) => Some(
                Utc.timestamp_opt(iat, 0)
                    .single()
                    .ok_or_else(|| AuthError::InvalidClaim("iat", iat.to_string()))?,
            ),
            None => None,
        };

        Ok(Self {
            email,
            expires_at,
            issued_at,
            raw: serde_json::Value::Null,
        })
    }
}

impl TryFrom<serde_json::Value> for Claims {
    type Error = AuthError;

    fn try_from(value: serde_json::Value) -> AuthResult<Self> {
        let repr: ClaimsRepr = serde_json::from_value(value.clone())
            .map_err(|err| AuthError::InvalidJson(err.to_string()))?;
        let mut claims = Claims::try_from(repr)?;
        claims.raw = value;
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_extra_identity_fields_in_raw() {
        let value = json!({"email": "fan@example.com", "name": "Fan", "exp": 4_102_444_800_i64, "iat": 1_700_000_000});
        let claims = Claims::try_from(value).expect("claims");
        assert_eq!(claims.email, "fan@example.com");
        assert_eq!(claims.raw["name"], "Fan");
        assert!(claims.issued_at.is_some());
    }

    #[test]
    fn rejects_missing_email() {
        let err = Claims::try_from(json!({"exp": 4_102_444_800_i64})).expect_err("no email");
        assert!(matches!(err, AuthError::InvalidJson(_)));
    }

    #[test]
    fn rejects_blank_email() {
        let err = Claims::try_from(json!({"email": "  ", "exp": 4_102_444_800_i64})).expect_err("blank email");
        assert!(matches!(err, AuthError::InvalidClaim("email", _)));
    }
}
