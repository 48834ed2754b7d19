use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorMessage, HttpError};

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

/// Signs a token for `subject` that expires after `expires_in_minutes`.
pub fn create_token(
    subject: &str,
    secret: &[u8],
    expires_in_minutes: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    if subject.is_empty() {
        return Err(jsonwebtoken::errors::ErrorKind::InvalidSubject.into());
    }

    let now = Utc::now();
    let iat = now.timestamp() as usize;
    let exp = (now + Duration::minutes(expires_in_minutes)).timestamp() as usize;
    let claims = TokenClaims {
        sub: subject.to_string(),
        iat,
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
}

pub fn decode_token<T: Into<String>>(token: T, secret: &[u8]) -> Result<String, HttpError> {
    let decoded = decode::<TokenClaims>(
        &token.into(),
        &DecodingKey::from_secret(secret),
        &Validation::new(Algorithm::HS256),
    );

    match decoded {
        Ok(token) => Ok(token.claims.sub),
        Err(_) => Err(HttpError::unauthorized(ErrorMessage::InvalidToken.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"flashfix-test-secret";

    #[test]
    fn test_token_carries_subject() {
        let token = create_token("0b4f6a2e-3c1d-4a8e-9f10-2d6c7b8e9a01", SECRET, 60).unwrap();
        assert_eq!(
            decode_token(token, SECRET).unwrap(),
            "0b4f6a2e-3c1d-4a8e-9f10-2d6c7b8e9a01"
        );
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = create_token("subject", SECRET, 60).unwrap();
        let err = decode_token(token, b"another-secret").unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = create_token("subject", SECRET, -5).unwrap();
        assert!(decode_token(token, SECRET).is_err());
    }

    #[test]
    fn test_empty_subject_is_refused() {
        assert!(create_token("", SECRET, 60).is_err());
    }
}
