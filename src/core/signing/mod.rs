//! Cleartext-signed version manifests.
//!
//! The manifest server publishes the version JSON wrapped in a cleartext
//! envelope: the text stays readable and one or more Ed25519 signatures over
//! `SHA-256(text)` follow in a trailing block. [`CleartextMessage::parse`]
//! splits the envelope, [`verify`] checks each signature against the launcher
//! key, and only a [`Verification`] whose first signature is valid can be
//! turned into a [`VerifiedPayload`].

pub mod envelope;
pub mod keys;
pub mod signer;
pub mod verifier;

pub use envelope::{CleartextMessage, DetachedSignature, EnvelopeError};
pub use keys::{FileKeyProvider, KeyId, LauncherKeyProvider, LauncherPublicKey, StaticKeyProvider};
pub use signer::sign_cleartext;
pub use verifier::{verify, SignatureCheck, Verification, VerifiedPayload};
