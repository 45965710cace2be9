use crate::models::{Claims, IdentityClaim, Role};
use chrono::{DateTime, Duration, Timelike, Utc};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed or its signature is invalid")]
    Malformed,

    #[error("token has expired")]
    Expired,
}

/// Issues and verifies HS256-signed identity tokens.
///
/// The codec holds only the read-only signing secret, so one instance is
/// shared by every worker.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // expiry is compared against the caller's clock in `verify_at`
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn issue(&self, user_id: i64, role: Role) -> Result<(String, IdentityClaim), JwtError> {
        self.issue_at(user_id, role, Utc::now())
    }

    /// Issues a token as if the current time were `issued_at`.
    pub fn issue_at(
        &self,
        user_id: i64,
        role: Role,
        issued_at: DateTime<Utc>,
    ) -> Result<(String, IdentityClaim), JwtError> {
        // claims carry whole seconds
        let issued_at = issued_at.with_nanosecond(0).unwrap_or(issued_at);
        let expires_at = issued_at.checked_add_signed(self.ttl).ok_or_else(|| {
            tracing::error!(ttl_days = self.ttl.num_days(), "token expiry out of range");
            JwtError::from(ErrorKind::InvalidToken)
        })?;
        let iat = issued_at.timestamp();
        let exp = expires_at.timestamp();

        let claims = Claims {
            user_id,
            role,
            iat,
            exp,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;

        let claim = IdentityClaim {
            user_id,
            role,
            expires_at,
        };
        Ok((token, claim))
    }

    pub fn verify(&self, token: &str) -> Result<IdentityClaim, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verifies signature and shape first, then rejects the token if
    /// `expires_at` lies before `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<IdentityClaim, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| {
                tracing::debug!(error = %err, "token rejected");
                TokenError::Malformed
            })?;

        let expires_at = timestamp(claims.exp).ok_or(TokenError::Malformed)?;
        if expires_at < now {
            return Err(TokenError::Expired);
        }

        Ok(IdentityClaim {
            user_id: claims.user_id,
            role: claims.role,
            expires_at,
        })
    }
}

fn timestamp(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn codec() -> TokenCodec {
        TokenCodec::new(b"unit-test-secret", Duration::days(30))
    }

    #[test]
    fn verify_returns_the_issued_claim() {
        let codec = codec();
        let (token, issued) = codec.issue(42, Role::Recruiter).unwrap();
        let verified = codec.verify(&token).unwrap();

        assert_eq!(verified, issued);
        assert_eq!(verified.user_id, 42);
        assert_eq!(verified.role, Role::Recruiter);
    }

    #[test]
    fn expiry_is_thirty_days_after_issuance() {
        let codec = codec();
        let issued_at = timestamp(1_700_000_000).unwrap();
        let (_, claim) = codec.issue_at(1, Role::User, issued_at).unwrap();
        assert_eq!(claim.expires_at - issued_at, Duration::days(30));
    }

    #[test]
    fn oversized_ttl_fails_issuance_instead_of_panicking() {
        let oversized = TokenCodec::new(b"unit-test-secret", Duration::days(100_000_000));
        assert!(oversized.issue(1, Role::User).is_err());

        let near_max = DateTime::<Utc>::MAX_UTC - Duration::days(1);
        assert!(codec().issue_at(1, Role::User, near_max).is_err());
    }

    #[test]
    fn corrupted_signature_is_rejected() {
        let codec = codec();
        let (token, _) = codec.issue(1, Role::Admin).unwrap();

        let (body, signature) = token.rsplit_once('.').unwrap();
        let mut sig: Vec<char> = signature.chars().collect();
        sig[0] = if sig[0] == 'A' { 'B' } else { 'A' };
        let tampered = format!("{body}.{}", sig.into_iter().collect::<String>());

        assert_eq!(codec.verify(&tampered), Err(TokenError::Malformed));
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let other = TokenCodec::new(b"someone-else", Duration::days(30));
        let (token, _) = other.issue(1, Role::Admin).unwrap();
        assert_eq!(codec().verify(&token), Err(TokenError::Malformed));
    }

    #[test]
    fn garbage_is_rejected() {
        let codec = codec();
        assert_eq!(codec.verify(""), Err(TokenError::Malformed));
        assert_eq!(codec.verify("not.a.token"), Err(TokenError::Malformed));
    }

    #[test]
    fn expired_token_is_rejected() {
        let codec = codec();
        let issued_at = Utc::now() - Duration::days(31);
        let (token, _) = codec.issue_at(9, Role::User, issued_at).unwrap();
        assert_eq!(codec.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn expiry_uses_timestamp_order_not_text_order() {
        let codec = codec();
        let issued_at = timestamp(1_000_000_000).unwrap();
        let (token, claim) = codec.issue_at(3, Role::User, issued_at).unwrap();

        // a later instant whose decimal form sorts before the expiry
        let later = timestamp(10_000_000_000).unwrap();
        assert!(later.timestamp().to_string() < claim.expires_at.timestamp().to_string());
        assert_eq!(codec.verify_at(&token, later), Err(TokenError::Expired));

        assert_eq!(codec.verify_at(&token, claim.expires_at), Ok(claim));
    }

    #[test]
    fn missing_fields_are_rejected() {
        let key = EncodingKey::from_secret(b"unit-test-secret");
        let iat = Utc::now().timestamp();
        let exp = (Utc::now() + Duration::days(1)).timestamp();

        let complete = json!({ "user_id": 1, "role": "user", "iat": iat, "exp": exp });
        let token = encode(&Header::default(), &complete, &key).unwrap();
        assert!(codec().verify(&token).is_ok());

        let no_role = json!({ "user_id": 1, "iat": iat, "exp": exp });
        let no_role = encode(&Header::default(), &no_role, &key).unwrap();
        assert_eq!(codec().verify(&no_role), Err(TokenError::Malformed));

        let no_exp = json!({ "user_id": 1, "role": "user", "iat": iat });
        let no_exp = encode(&Header::default(), &no_exp, &key).unwrap();
        assert_eq!(codec().verify(&no_exp), Err(TokenError::Malformed));
    }
}
