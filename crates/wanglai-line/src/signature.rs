// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `x-line-signature` verification.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use wanglai_core::WebhookVerifier;

type HmacSha256 = Hmac<Sha256>;

/// Checks the base64 HMAC-SHA256 of the raw body against the channel secret.
pub struct LineSignatureVerifier {
    channel_secret: String,
}

impl LineSignatureVerifier {
    pub fn new(channel_secret: impl Into<String>) -> Self {
        Self {
            channel_secret: channel_secret.into(),
        }
    }

    /// Signature LINE would send for `body`.
    pub fn sign(&self, body: &[u8]) -> String {
        // HMAC accepts keys of any length.
        let mut mac = match HmacSha256::new_from_slice(self.channel_secret.as_bytes()) {
            Ok(mac) => mac,
            Err(_) => return String::new(),
        };
        mac.update(body);
        STANDARD.encode(mac.finalize().into_bytes())
    }
}

impl WebhookVerifier for LineSignatureVerifier {
    fn verify(&self, body: &[u8], signature: &str) -> bool {
        let Ok(expected) = STANDARD.decode(signature.trim()) else {
            return false;
        };
        let Ok(mut mac) = HmacSha256::new_from_slice(self.channel_secret.as_bytes()) else {
            return false;
        };
        mac.update(body);
        mac.verify_slice(&expected).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_body_verifies() {
        let verifier = LineSignatureVerifier::new("channel-secret");
        let body = br#"{"destination":"U0","events":[]}"#;
        let sig = verifier.sign(body);
        assert!(verifier.verify(body, &sig));
    }

    #[test]
    fn wrong_secret_or_tampered_body_fails() {
        let body = b"payload";
        let sig = LineSignatureVerifier::new("right").sign(body);
        assert!(!LineSignatureVerifier::new("wrong").verify(body, &sig));
        assert!(!LineSignatureVerifier::new("right").verify(b"payload!", &sig));
    }

    #[test]
    fn non_base64_signature_fails() {
        let verifier = LineSignatureVerifier::new("secret");
        assert!(!verifier.verify(b"body", "not base64 at all!"));
        assert!(!verifier.verify(b"body", ""));
    }
}
