use ed25519_dalek::Verifier;
use sha2::{Digest, Sha256};

use super::envelope::CleartextMessage;
use super::keys::{KeyId, LauncherPublicKey};

/// Outcome for one signature in the envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureCheck {
    pub key_id: KeyId,
    pub valid: bool,
}

/// Result of checking every signature of a message against the launcher key.
#[derive(Debug)]
pub struct Verification {
    message: CleartextMessage,
    pub signatures: Vec<SignatureCheck>,
}

/// Manifest text whose signature has been confirmed.
///
/// Only [`Verification::into_verified`] builds one.
#[derive(Debug, Clone)]
pub struct VerifiedPayload {
    data: String,
    signer: KeyId,
}

impl VerifiedPayload {
    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn signer(&self) -> KeyId {
        self.signer
    }
}

/// Check each signature of `message` against `key`.
///
/// Signatures made by another key are reported as invalid.
pub fn verify(message: CleartextMessage, key: &LauncherPublicKey) -> Verification {
    let digest = Sha256::digest(message.text().as_bytes());

    let signatures = message
        .signatures()
        .iter()
        .map(|detached| SignatureCheck {
            key_id: detached.key_id,
            valid: detached.key_id == key.key_id()
                && key
                    .verifying_key()
                    .verify(digest.as_slice(), &detached.signature)
                    .is_ok(),
        })
        .collect();

    Verification {
        message,
        signatures,
    }
}

impl Verification {
    /// Whether the first signature in the envelope checked out.
    pub fn is_valid(&self) -> bool {
        self.signatures.first().is_some_and(|s| s.valid)
    }

    /// The signed text, if the first signature is valid.
    pub fn into_verified(self) -> Option<VerifiedPayload> {
        let signer = self.signatures.first().filter(|s| s.valid)?.key_id;
        Some(VerifiedPayload {
            data: self.message.into_text(),
            signer,
        })
    }
}

#[cfg(test)]
mod tests {
    use ed25519_dalek::SigningKey;

    use super::*;
    use crate::core::signing::signer::sign_cleartext;

    fn signing_key(seed: u8) -> SigningKey {
        SigningKey::from_bytes(&[seed; 32])
    }

    fn launcher_key(seed: u8) -> LauncherPublicKey {
        LauncherPublicKey::new(signing_key(seed).verifying_key())
    }

    #[test]
    fn valid_signature_yields_payload() {
        let armored = sign_cleartext("{\"versions\":[]}", &[&signing_key(1)]);
        let message = CleartextMessage::parse(&armored).unwrap();

        let verification = verify(message, &launcher_key(1));
        assert!(verification.is_valid());

        let payload = verification.into_verified().unwrap();
        assert_eq!(payload.data(), "{\"versions\":[]}");
        assert_eq!(payload.signer(), launcher_key(1).key_id());
    }

    #[test]
    fn tampered_text_fails() {
        let armored = sign_cleartext("{\"latestVersion\":\"1.0\"}", &[&signing_key(1)]);
        let tampered = armored.replace("1.0", "6.6");
        let message = CleartextMessage::parse(&tampered).unwrap();

        let verification = verify(message, &launcher_key(1));
        assert!(!verification.is_valid());
        assert!(verification.into_verified().is_none());
    }

    #[test]
    fn other_key_is_invalid() {
        let armored = sign_cleartext("data", &[&signing_key(2)]);
        let message = CleartextMessage::parse(&armored).unwrap();

        let verification = verify(message, &launcher_key(1));
        assert_eq!(verification.signatures.len(), 1);
        assert_eq!(verification.signatures[0].key_id, launcher_key(2).key_id());
        assert!(!verification.signatures[0].valid);
    }

    #[test]
    fn only_the_first_signature_decides() {
        let armored = sign_cleartext("data", &[&signing_key(2), &signing_key(1)]);
        let message = CleartextMessage::parse(&armored).unwrap();

        let verification = verify(message, &launcher_key(1));
        assert!(!verification.signatures[0].valid);
        assert!(verification.signatures[1].valid);
        assert!(!verification.is_valid());
    }
}
