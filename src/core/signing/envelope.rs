use ed25519_dalek::Signature;
use thiserror::Error;

use super::keys::KeyId;

pub const MESSAGE_HEADER: &str = "-----BEGIN LAUNCHER SIGNED MESSAGE-----";
pub const SIGNATURE_HEADER: &str = "-----BEGIN LAUNCHER SIGNATURE-----";
pub const SIGNATURE_FOOTER: &str = "-----END LAUNCHER SIGNATURE-----";
pub const HASH_ALGORITHM: &str = "SHA256";

/// Structural problems in a cleartext-signed message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnvelopeError {
    #[error("missing signed message header")]
    MissingHeader,

    #[error("unsupported hash algorithm {0:?}")]
    UnsupportedHash(String),

    #[error("missing signature block")]
    MissingSignatureBlock,

    #[error("signature block is not terminated")]
    MissingSignatureEnd,

    #[error("malformed signature block line {line}: {content:?}")]
    MalformedSignatureLine { line: usize, content: String },

    #[error("signature block contains no signatures")]
    NoSignatures,

    #[error("invalid hex in signature block: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("signature must be 64 bytes, got {0}")]
    InvalidSignatureLength(usize),

    #[error("key id must be 8 bytes, got {0}")]
    InvalidKeyIdLength(usize),
}

/// One signature from the trailing block, with the id of the key that made it.
#[derive(Debug, Clone)]
pub struct DetachedSignature {
    pub key_id: KeyId,
    pub signature: Signature,
}

/// A parsed cleartext envelope. Nothing here has been verified yet.
#[derive(Debug, Clone)]
pub struct CleartextMessage {
    text: String,
    signatures: Vec<DetachedSignature>,
}

impl CleartextMessage {
    /// Split an armored envelope into its signed text and signatures.
    pub fn parse(armored: &str) -> Result<Self, EnvelopeError> {
        let mut lines = armored.lines().enumerate().peekable();

        // Leading blank lines are tolerated
        while lines.next_if(|(_, l)| l.trim().is_empty()).is_some() {}

        match lines.next() {
            Some((_, line)) if line.trim_end() == MESSAGE_HEADER => {}
            _ => return Err(EnvelopeError::MissingHeader),
        }

        // Armor headers run until the first blank line
        loop {
            let Some((_, line)) = lines.next() else {
                return Err(EnvelopeError::MissingSignatureBlock);
            };
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.trim().eq_ignore_ascii_case("Hash") {
                    let algorithm = value.trim();
                    if !algorithm.eq_ignore_ascii_case(HASH_ALGORITHM) {
                        return Err(EnvelopeError::UnsupportedHash(algorithm.to_string()));
                    }
                }
            }
        }

        let mut body = Vec::new();
        loop {
            let Some((_, line)) = lines.next() else {
                return Err(EnvelopeError::MissingSignatureBlock);
            };
            if line.trim_end() == SIGNATURE_HEADER {
                break;
            }
            let line = line.strip_prefix("- ").unwrap_or(line);
            body.push(canonical_line(line));
        }

        let mut signatures = Vec::new();
        let mut pending_key: Option<KeyId> = None;
        loop {
            let Some((index, line)) = lines.next() else {
                return Err(EnvelopeError::MissingSignatureEnd);
            };
            let line = line.trim();
            if line == SIGNATURE_FOOTER {
                break;
            }
            if line.is_empty() {
                continue;
            }

            let malformed = || EnvelopeError::MalformedSignatureLine {
                line: index + 1,
                content: line.to_string(),
            };
            let (name, value) = line.split_once(':').ok_or_else(malformed)?;
            let value = value.trim();

            match (name.trim(), pending_key.take()) {
                ("KeyId", None) => pending_key = Some(KeyId::from_hex(value)?),
                ("Signature", Some(key_id)) => {
                    let bytes = hex::decode(value)?;
                    let bytes: [u8; 64] = bytes
                        .try_into()
                        .map_err(|b: Vec<u8>| EnvelopeError::InvalidSignatureLength(b.len()))?;
                    signatures.push(DetachedSignature {
                        key_id,
                        signature: Signature::from_bytes(&bytes),
                    });
                }
                _ => return Err(malformed()),
            }
        }

        if pending_key.is_some() || signatures.is_empty() {
            return Err(EnvelopeError::NoSignatures);
        }

        Ok(Self {
            text: body.join("\n"),
            signatures,
        })
    }

    /// The signed text, with dash-escaping removed.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn signatures(&self) -> &[DetachedSignature] {
        &self.signatures
    }

    pub(crate) fn into_text(self) -> String {
        self.text
    }
}

/// The exact bytes a signature covers: lines without trailing blanks, joined by `\n`.
pub fn canonical_text(text: &str) -> String {
    text.lines().map(canonical_line).collect::<Vec<_>>().join("\n")
}

fn canonical_line(line: &str) -> &str {
    line.trim_end_matches([' ', '\t', '\r'])
}
