//! Protocol identity and envelope keys
//!
//! Every envelope this codec produces is locked to a key derived from a
//! 32-byte root secret and a protocol tag. Scanning a shared ledger, the
//! derived locking key is what separates this protocol's outputs from
//! unrelated uses of the same medium; decoding the public data never
//! requires the root secret.

use ed25519_dalek::{Signer, SigningKey};

/// How widely a protocol's derived keys are scoped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SecurityLevel {
    /// Keys shared across applications
    Silent = 0,
    /// Keys scoped to one application protocol
    App = 1,
    /// Keys scoped to one protocol and one counterparty
    Counterparty = 2,
}

/// A (security level, protocol name) pair identifying one protocol's
/// key space. Constant for all records a given deployment produces.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProtocolTag {
    /// Scope of the derived keys
    pub level: SecurityLevel,
    /// Human-readable protocol name, e.g. "event logger"
    pub name: String,
}

impl ProtocolTag {
    /// Create a new protocol tag
    pub fn new(level: SecurityLevel, name: impl Into<String>) -> Self {
        Self {
            level,
            name: name.into(),
        }
    }
}

/// Signing identity for one (protocol tag, key id) pair.
///
/// Derived deterministically, so re-running a deployment against the same
/// root secret keeps producing (and recognizing) the same locking key.
#[derive(Clone)]
pub struct EnvelopeKey {
    signing: SigningKey,
}

impl EnvelopeKey {
    /// Derive the key for `tag` and `key_id` from a 32-byte root secret.
    pub fn derive(root_secret: &[u8; 32], tag: &ProtocolTag, key_id: &str) -> Self {
        let context = format!(
            "outlog envelope key v1 level={} protocol={} key={}",
            tag.level as u8, tag.name, key_id
        );
        let seed = blake3::derive_key(&context, root_secret);
        Self {
            signing: SigningKey::from_bytes(&seed),
        }
    }

    /// The 32-byte verifying key embedded in scripts locked to this identity
    pub fn verifying_key_bytes(&self) -> [u8; 32] {
        self.signing.verifying_key().to_bytes()
    }

    /// Sign a field list, producing the 64-byte envelope self-signature
    pub(crate) fn sign_fields(&self, fields: &[Vec<u8>]) -> [u8; 64] {
        let digest = fields_digest(fields);
        self.signing.sign(digest.as_bytes()).to_bytes()
    }
}

impl std::fmt::Debug for EnvelopeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvelopeKey")
            .field("verifying_key", &hex::encode(self.verifying_key_bytes()))
            .finish_non_exhaustive()
    }
}

/// Digest of an ordered field list.
///
/// Each field is hashed behind its length so field boundaries are part of
/// the digest: `["ab", "c"]` and `["a", "bc"]` digest differently.
pub(crate) fn fields_digest(fields: &[Vec<u8>]) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    for field in fields {
        hasher.update(&(field.len() as u64).to_le_bytes());
        hasher.update(field);
    }
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag() -> ProtocolTag {
        ProtocolTag::new(SecurityLevel::App, "event logger")
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let root = [7u8; 32];
        let a = EnvelopeKey::derive(&root, &tag(), "1");
        let b = EnvelopeKey::derive(&root, &tag(), "1");
        assert_eq!(a.verifying_key_bytes(), b.verifying_key_bytes());
    }

    #[test]
    fn test_derivation_separates_key_ids() {
        let root = [7u8; 32];
        let a = EnvelopeKey::derive(&root, &tag(), "1");
        let b = EnvelopeKey::derive(&root, &tag(), "2");
        assert_ne!(a.verifying_key_bytes(), b.verifying_key_bytes());
    }

    #[test]
    fn test_derivation_separates_protocols() {
        let root = [7u8; 32];
        let a = EnvelopeKey::derive(&root, &tag(), "1");
        let other = ProtocolTag::new(SecurityLevel::App, "something else");
        let b = EnvelopeKey::derive(&root, &other, "1");
        assert_ne!(a.verifying_key_bytes(), b.verifying_key_bytes());
    }

    #[test]
    fn test_derivation_separates_levels() {
        let root = [7u8; 32];
        let a = EnvelopeKey::derive(&root, &tag(), "1");
        let silent = ProtocolTag::new(SecurityLevel::Silent, "event logger");
        let b = EnvelopeKey::derive(&root, &silent, "1");
        assert_ne!(a.verifying_key_bytes(), b.verifying_key_bytes());
    }

    #[test]
    fn test_fields_digest_respects_boundaries() {
        let a = fields_digest(&[b"ab".to_vec(), b"c".to_vec()]);
        let b = fields_digest(&[b"a".to_vec(), b"bc".to_vec()]);
        assert_ne!(a, b);
    }
}
