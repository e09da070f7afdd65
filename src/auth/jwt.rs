use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use super::Claims;

#[derive(Clone)]
pub struct JwtKeys {
    pub enc: EncodingKey,
    pub dec: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            enc: EncodingKey::from_secret(secret),
            dec: DecodingKey::from_secret(secret),
        }
    }
}

pub fn now_unix() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as usize)
        .unwrap_or_default()
}

pub fn encode_token(keys: &JwtKeys, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
    let mut header = Header::new(Algorithm::HS256);
    header.typ = Some("JWT".into());

    encode(&header, claims, &keys.enc)
}

/// Verifies signature, issuer, audience and expiry.
pub fn decode_token(
    keys: &JwtKeys,
    token: &str,
    issuer: &str,
    audience: &str,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;
    validation.set_issuer(&[issuer]);
    validation.set_audience(&[audience]);

    decode::<Claims>(token, &keys.dec, &validation).map(|data| data.claims)
}

/// Reads claims without checking the signature. Only for the client, which
/// never holds the signing key and only uses claims for display.
pub fn decode_unverified(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    jsonwebtoken::dangerous::insecure_decode::<Claims>(token).map(|data| data.claims)
}
