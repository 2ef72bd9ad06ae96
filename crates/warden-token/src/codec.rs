//! HS256 compact token encoding and verification.
//!
//! A token is three base64url segments (no padding) joined by dots:
//!
//! ```text
//! base64url(header) . base64url(payload) . base64url(HMAC-SHA256(key, header "." payload))
//! ```
//!
//! This is the standard JWS compact serialization, so any JWT library that
//! is given the same secret can verify Warden tokens and vice versa.
//!
//! # Order of checks in [`TokenCodec::verify`]
//!
//! ```text
//! split + base64 ──→ signature ──→ JSON header/payload ──→ expiration
//!      │                 │                  │                    │
//!  Malformed      TamperedSignature     Malformed             Expired
//! ```
//!
//! The signature is checked over the encoded bytes before any JSON is
//! parsed, so content an attacker controls never reaches the claims or
//! the expiration logic unless it was signed with our key.

use std::fmt;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::Mac;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::{
    Claims, ClaimsSet, ExpirationPolicy, SigningKey, Timestamp, TokenConfig,
    TokenError,
};

/// The only algorithm Warden signs with or accepts.
pub const ALGORITHM: &str = "HS256";

/// The `typ` header value written on every token.
pub const TOKEN_TYPE: &str = "JWT";

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// An issued token: the compact `header.payload.signature` string.
///
/// Opaque to its holder. `#[serde(transparent)]` makes it serialize as a
/// bare JSON string, which is what a login response hands back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// The compact string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the token, returning the compact string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Header and segments
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    typ: Option<String>,
}

impl Header {
    fn hs256() -> Self {
        Self {
            alg: ALGORITHM.to_string(),
            typ: Some(TOKEN_TYPE.to_string()),
        }
    }
}

/// Only `sub` is needed for an unverified subject read.
#[derive(Deserialize)]
struct SubjectOnly {
    sub: String,
}

/// A token split into its parts, with every segment base64-decoded.
struct Segments<'a> {
    /// `header.payload` exactly as received; the MAC input.
    signing_input: &'a str,
    header: Vec<u8>,
    payload: Vec<u8>,
    signature: Vec<u8>,
}

impl<'a> Segments<'a> {
    fn split(token: &'a str) -> Result<Self, TokenError> {
        let mut parts = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::Malformed(
                "expected three dot-separated segments".into(),
            ));
        };

        Ok(Self {
            signing_input: &token[..header.len() + 1 + payload.len()],
            header: decode_segment("header", header)?,
            payload: decode_segment("payload", payload)?,
            signature: decode_segment("signature", signature)?,
        })
    }
}

fn decode_segment(name: &str, segment: &str) -> Result<Vec<u8>, TokenError> {
    if segment.is_empty() {
        return Err(TokenError::Malformed(format!("empty {name} segment")));
    }
    URL_SAFE_NO_PAD.decode(segment).map_err(|e| {
        TokenError::Malformed(format!("invalid base64url in {name}: {e}"))
    })
}

// ---------------------------------------------------------------------------
// TokenCodec
// ---------------------------------------------------------------------------

/// Signs claims into tokens and verifies tokens back into claims.
///
/// Holds the only copy of the [`SigningKey`] and never mutates it, so one
/// codec can be wrapped in an `Arc` and shared by every request handler
/// without locking. All operations take the current time as a parameter,
/// which keeps them pure and makes expiry testable without sleeping.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    key: SigningKey,
    expiration: ExpirationPolicy,
}

impl TokenCodec {
    /// Creates a codec from a validated configuration.
    pub fn new(config: TokenConfig) -> Self {
        Self {
            key: config.key,
            expiration: config.expiration,
        }
    }

    /// Lifetime given to every issued token.
    pub fn ttl(&self) -> Duration {
        self.expiration.ttl()
    }

    /// Issues a signed token for `subject`.
    ///
    /// The payload is `{sub, iat: now, exp: now + ttl}` merged with
    /// `claims`. The same inputs at the same `now` always produce the same
    /// token string.
    ///
    /// # Errors
    /// - [`TokenError::EmptySubject`] if `subject` is empty
    /// - [`TokenError::ReservedClaim`] if `claims` contains `sub`, `iat`
    ///   or `exp`
    pub fn issue(
        &self,
        subject: &str,
        claims: Claims,
        now: Timestamp,
    ) -> Result<Token, TokenError> {
        let claims = ClaimsSet::new(
            subject,
            now,
            self.expiration.expiration_for(now),
            claims,
        )?;

        let header = serde_json::to_vec(&Header::hs256())?;
        let payload = serde_json::to_vec(&claims)?;

        let mut token = String::new();
        URL_SAFE_NO_PAD.encode_string(&header, &mut token);
        token.push('.');
        URL_SAFE_NO_PAD.encode_string(&payload, &mut token);

        let mut mac = self.key.mac();
        mac.update(token.as_bytes());
        let signature = mac.finalize().into_bytes();

        token.push('.');
        URL_SAFE_NO_PAD.encode_string(signature, &mut token);

        tracing::debug!(
            subject,
            exp = %claims.expiration(),
            "token issued"
        );
        Ok(Token(token))
    }

    /// Verifies a token and returns its claims.
    ///
    /// # Errors
    /// - [`TokenError::Malformed`] if the token can't be decoded, uses an
    ///   algorithm other than HS256, or its payload isn't a claims object
    /// - [`TokenError::TamperedSignature`] if the signature doesn't match
    /// - [`TokenError::Expired`] if `now` is at or past `exp`
    pub fn verify(
        &self,
        token: &str,
        now: Timestamp,
    ) -> Result<ClaimsSet, TokenError> {
        let segments = Segments::split(token)?;

        // `verify_slice` compares in constant time.
        let mut mac = self.key.mac();
        mac.update(segments.signing_input.as_bytes());
        mac.verify_slice(&segments.signature)
            .map_err(|_| TokenError::TamperedSignature)?;

        let header: Header = serde_json::from_slice(&segments.header)
            .map_err(|e| TokenError::Malformed(format!("header: {e}")))?;
        if header.alg != ALGORITHM {
            return Err(TokenError::Malformed(format!(
                "unsupported algorithm {}",
                header.alg
            )));
        }

        let claims: ClaimsSet = serde_json::from_slice(&segments.payload)
            .map_err(|e| TokenError::Malformed(format!("payload: {e}")))?;

        if claims.is_expired_at(now) {
            return Err(TokenError::Expired {
                expired_at: claims.expiration(),
            });
        }

        Ok(claims)
    }

    /// Reads the `sub` claim **without checking the signature or expiry**.
    ///
    /// Anyone can craft a token that passes this. Only use it where the
    /// token was already verified, or where an untrusted hint is all you
    /// need (e.g. a log field). Anything that grants access must go
    /// through [`verify`](Self::verify) or [`is_valid`](Self::is_valid).
    ///
    /// # Errors
    /// [`TokenError::Malformed`] if the token or its payload can't be
    /// decoded or has no `sub`.
    pub fn extract_subject(&self, token: &str) -> Result<String, TokenError> {
        let segments = Segments::split(token)?;
        let payload: SubjectOnly = serde_json::from_slice(&segments.payload)
            .map_err(|e| TokenError::Malformed(format!("payload: {e}")))?;
        Ok(payload.sub)
    }

    /// `true` iff the token verifies at `now` and belongs to
    /// `expected_subject`.
    ///
    /// Never fails: every rejection, whatever its cause, is `false`. Use
    /// [`verify`](Self::verify) when the reason matters.
    pub fn is_valid(
        &self,
        token: &str,
        expected_subject: &str,
        now: Timestamp,
    ) -> bool {
        match self.verify(token, now) {
            Ok(claims) => claims
                .subject()
                .as_bytes()
                .ct_eq(expected_subject.as_bytes())
                .into(),
            Err(e) => {
                tracing::debug!(code = e.code(), error = %e, "token rejected");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const SECRET: &[u8] = b"an-example-secret-that-is-32-bytes!!";

    fn codec(ttl_ms: u64) -> TokenCodec {
        TokenCodec::new(TokenConfig::new(SECRET, ttl_ms).unwrap())
    }

    fn t0() -> Timestamp {
        Timestamp::from_secs(1_700_000_000)
    }

    #[test]
    fn test_issue_produces_standard_header() {
        let token = codec(60_000).issue("alice", Claims::new(), t0()).unwrap();

        let header = token.as_str().split('.').next().unwrap();
        // base64url of {"alg":"HS256","typ":"JWT"}
        assert_eq!(header, "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9");
    }

    #[test]
    fn test_issue_is_deterministic() {
        let c = codec(60_000);
        let mut claims = Claims::new();
        claims.insert("roles".into(), json!(["USER"]));

        let a = c.issue("alice", claims.clone(), t0()).unwrap();
        let b = c.issue("alice", claims, t0()).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_issue_payload_and_signature_layout() {
        // Registered claims come first, in sub/iat/exp order.
        let c = codec(60_000);
        let token = c.issue("alice", Claims::new(), t0()).unwrap();

        let mut parts = token.as_str().split('.');
        let _header = parts.next().unwrap();
        let payload = parts.next().unwrap();
        let decoded = URL_SAFE_NO_PAD.decode(payload).unwrap();
        assert_eq!(
            String::from_utf8(decoded).unwrap(),
            r#"{"sub":"alice","iat":1700000000,"exp":1700000060}"#
        );

        let signature = URL_SAFE_NO_PAD.decode(parts.next().unwrap()).unwrap();
        assert_eq!(signature.len(), 32, "HS256 signatures are 32 bytes");
    }

    #[test]
    fn test_verify_rejects_alg_none_token() {
        let c = codec(60_000);
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let payload =
            URL_SAFE_NO_PAD.encode(br#"{"sub":"alice","iat":1,"exp":99999999999}"#);

        let unsigned = format!("{header}.{payload}.");
        assert!(matches!(
            c.verify(&unsigned, t0()),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_verify_rejects_other_algorithm_even_when_signed() {
        // Correct HMAC over a header that claims a different algorithm.
        let c = codec(60_000);
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS512","typ":"JWT"}"#);
        let payload =
            URL_SAFE_NO_PAD.encode(br#"{"sub":"alice","iat":1,"exp":99999999999}"#);
        let input = format!("{header}.{payload}");
        let mut mac = c.key.mac();
        mac.update(input.as_bytes());
        let sig = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        let result = c.verify(&format!("{input}.{sig}"), t0());

        assert!(
            matches!(&result, Err(TokenError::Malformed(m)) if m.contains("HS512")),
            "got {result:?}"
        );
    }

    #[test]
    fn test_verify_signed_garbage_payload_is_malformed() {
        let c = codec(60_000);
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(b"not json");
        let input = format!("{header}.{payload}");
        let mut mac = c.key.mac();
        mac.update(input.as_bytes());
        let sig = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        assert!(matches!(
            c.verify(&format!("{input}.{sig}"), t0()),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_verify_wrong_segment_count_is_malformed() {
        let c = codec(60_000);
        for input in ["", "a", "a.b", "a.b.c.d"] {
            assert!(
                matches!(c.verify(input, t0()), Err(TokenError::Malformed(_))),
                "{input:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_extract_subject_ignores_signature() {
        let c = codec(60_000);
        let token = c.issue("alice", Claims::new(), t0()).unwrap();
        let other = TokenCodec::new(TokenConfig {
            key: SigningKey::generate(),
            expiration: ExpirationPolicy::from_millis(1).unwrap(),
        });

        // Different key and long past expiry: still readable.
        assert_eq!(other.extract_subject(token.as_str()).unwrap(), "alice");
    }

    #[test]
    fn test_extract_subject_without_sub_is_malformed() {
        let c = codec(60_000);
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256"}"#);
        let payload = URL_SAFE_NO_PAD.encode(br#"{"iat":1}"#);
        let token = format!("{header}.{payload}.c2ln");

        assert!(matches!(
            c.extract_subject(&token),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_token_serializes_as_bare_string() {
        let token = Token::from("a.b.c");
        assert_eq!(serde_json::to_string(&token).unwrap(), r#""a.b.c""#);
        assert_eq!(token.to_string(), "a.b.c");
    }
}
