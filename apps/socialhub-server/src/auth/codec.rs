// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HS256 token codec.
//!
//! Tokens are compact JWS strings (`header.payload.signature`) signed with
//! the site-wide secret. Decoding only verifies structure, algorithm and
//! signature; claim semantics are checked by the request authenticator.
//!
//! Expiry is not enforced. These tokens are long-lived bearer credentials
//! handed to the partner service once; revoking them means rotating the
//! site secret.

use std::fmt;

use base64ct::{Base64UrlUnpadded, Encoding};
use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Deserialize;

use super::claims::Claims;

/// The only algorithm tokens may be signed with.
pub const ALGORITHM: Algorithm = Algorithm::HS256;

/// Header `alg` value matching [`ALGORITHM`].
const ALGORITHM_NAME: &str = "HS256";

/// Symmetric signing key shared by issuance and verification.
#[derive(Clone)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    /// Returns `None` for an empty secret, which would make every token forgeable.
    pub fn new(secret: impl Into<Vec<u8>>) -> Option<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            None
        } else {
            Some(Self(secret))
        }
    }

    fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(&self.0)
    }

    fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(&self.0)
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(**redacted**)")
    }
}

/// Why a token string could not be turned into claims.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("{0}")]
    Malformed(String),
    #[error("Signature verification failed")]
    SignatureMismatch,
    #[error("Algorithm not allowed: {0}")]
    AlgorithmNotAllowed(String),
}

impl From<jsonwebtoken::errors::Error> for DecodeError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => DecodeError::SignatureMismatch,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                DecodeError::AlgorithmNotAllowed(ALGORITHM_NAME.to_string())
            }
            ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
                DecodeError::Malformed("Invalid claims encoding".to_string())
            }
            ErrorKind::Base64(_) => DecodeError::Malformed("Invalid segment encoding".to_string()),
            _ => DecodeError::Malformed(err.to_string()),
        }
    }
}

/// Signing failed inside the JWT library.
#[derive(Debug, thiserror::Error)]
#[error("failed to sign token: {0}")]
pub struct EncodeError(#[from] jsonwebtoken::errors::Error);

#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

/// Sign `claims` with `secret`.
pub fn encode(claims: &Claims, secret: &SigningSecret) -> Result<String, EncodeError> {
    let token = jsonwebtoken::encode(&Header::new(ALGORITHM), claims, &secret.encoding_key())?;
    Ok(token)
}

/// Verify `token` against `secret` and return its claims.
///
/// The header's `alg` is checked before any cryptography so a token naming
/// another algorithm (including `none`) is refused outright.
pub fn decode(token: &str, secret: &SigningSecret) -> Result<Claims, DecodeError> {
    let header = peek_header(token)?;
    if header.alg != ALGORITHM_NAME {
        return Err(DecodeError::AlgorithmNotAllowed(header.alg));
    }

    let mut validation = Validation::new(ALGORITHM);
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = jsonwebtoken::decode::<Claims>(token, &secret.decoding_key(), &validation)?;
    Ok(data.claims)
}

/// Split off and parse the header segment without trusting anything else.
fn peek_header(token: &str) -> Result<RawHeader, DecodeError> {
    let mut segments = token.split('.');
    let (Some(header), Some(_payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(DecodeError::Malformed("Wrong number of segments".to_string()));
    };

    let bytes = Base64UrlUnpadded::decode_vec(header)
        .map_err(|_| DecodeError::Malformed("Invalid header encoding".to_string()))?;
    serde_json::from_slice(&bytes)
        .map_err(|_| DecodeError::Malformed("Invalid header encoding".to_string()))
}
