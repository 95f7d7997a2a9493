//! Producing cleartext-signed manifests, for release tooling and fixtures.

use ed25519_dalek::{Signer, SigningKey};
use sha2::{Digest, Sha256};

use super::envelope::{
    canonical_text, HASH_ALGORITHM, MESSAGE_HEADER, SIGNATURE_FOOTER, SIGNATURE_HEADER,
};
use super::keys::KeyId;

/// Wrap `text` in a cleartext envelope signed by every key in `keys`.
///
/// Each key signs `SHA-256(canonical text)`. Lines starting with `-` are
/// dash-escaped so they cannot be mistaken for armor lines.
pub fn sign_cleartext(text: &str, keys: &[&SigningKey]) -> String {
    let canonical = canonical_text(text);
    let digest = Sha256::digest(canonical.as_bytes());

    let mut out = String::with_capacity(canonical.len() + 256);
    out.push_str(MESSAGE_HEADER);
    out.push('\n');
    out.push_str("Hash: ");
    out.push_str(HASH_ALGORITHM);
    out.push_str("\n\n");

    for line in canonical.lines() {
        if line.starts_with('-') {
            out.push_str("- ");
        }
        out.push_str(line);
        out.push('\n');
    }

    out.push_str(SIGNATURE_HEADER);
    out.push('\n');
    for key in keys {
        let signature = key.sign(digest.as_slice());
        out.push_str(&format!(
            "KeyId: {}\nSignature: {}\n",
            KeyId::of(&key.verifying_key()),
            hex::encode(signature.to_bytes())
        ));
    }
    out.push_str(SIGNATURE_FOOTER);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_has_one_entry_per_key() {
        let a = SigningKey::from_bytes(&[1u8; 32]);
        let b = SigningKey::from_bytes(&[2u8; 32]);
        let armored = sign_cleartext("hello", &[&a, &b]);

        assert!(armored.starts_with(MESSAGE_HEADER));
        assert!(armored.trim_end().ends_with(SIGNATURE_FOOTER));
        assert_eq!(armored.matches("KeyId: ").count(), 2);
        assert_eq!(armored.matches("Signature: ").count(), 2);
    }

    #[test]
    fn signing_is_deterministic() {
        let key = SigningKey::from_bytes(&[9u8; 32]);
        assert_eq!(sign_cleartext("same", &[&key]), sign_cleartext("same", &[&key]));
    }
}
