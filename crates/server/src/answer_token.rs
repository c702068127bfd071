//! Answer tokens: an HMAC over the correct answer and the issue instant.
//! The client only ever sees the token, so it can't recover the answer, but
//! the server can check a submitted answer by recomputing the HMAC.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, SecondsFormat, Utc};
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

const SECRET_LEN: usize = 32;

#[derive(Debug, Error)]
#[error("answer signing key was rejected")]
pub struct InvalidSigningKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub instant: String,
}

#[derive(Clone)]
pub struct AnswerSigner {
    mac: HmacSha256,
}

impl AnswerSigner {
    /// Signer with a fresh random secret. Tokens do not survive a restart.
    pub fn random() -> Result<Self, InvalidSigningKey> {
        let secret: [u8; SECRET_LEN] = rand::rng().random();
        Self::from_secret(&secret)
    }

    pub fn from_secret(secret: &[u8]) -> Result<Self, InvalidSigningKey> {
        HmacSha256::new_from_slice(secret)
            .map(|mac| Self { mac })
            .map_err(|_| InvalidSigningKey)
    }

    pub fn issue(&self, correct_answer: &str) -> IssuedToken {
        self.issue_at(correct_answer, Utc::now())
    }

    pub fn issue_at(&self, correct_answer: &str, at: DateTime<Utc>) -> IssuedToken {
        let instant = at.to_rfc3339_opts(SecondsFormat::AutoSi, true);
        let token = URL_SAFE_NO_PAD.encode(self.keyed(correct_answer, &instant).finalize().into_bytes());
        IssuedToken { token, instant }
    }

    /// True iff `token` was issued for `answer` at `instant`.
    pub fn verify(&self, token: &str, instant: &str, answer: &str) -> bool {
        let Ok(expected) = URL_SAFE_NO_PAD.decode(token.as_bytes()) else {
            return false;
        };
        self.keyed(answer, instant).verify_slice(&expected).is_ok()
    }

    fn keyed(&self, answer: &str, instant: &str) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(answer.as_bytes());
        mac.update(instant.as_bytes());
        mac
    }
}
