//! Envelope encoding and decoding
//!
//! An envelope embeds an ordered list of opaque byte-fields in a ledger
//! output's locking script:
//!
//! ```text
//! PUSH(<32-byte locking key>) OP_CHECKSIG
//! PUSH(<64-byte signature>)            ; when the mode carries one "before"
//! PUSH(field 1) ... PUSH(field n)
//! OP_2DROP ... OP_DROP                 ; clears exactly the pushed items
//! ```
//!
//! The decoder is strict: any byte-string that does not match this grammar
//! yields a [`CodecError`], as a value. Retrieval probes entire baskets of
//! foreign scripts and relies on decode failure being an ordinary,
//! per-item outcome.

use ed25519_dalek::{Signature, VerifyingKey};

use crate::error::CodecError;
use crate::identity::{EnvelopeKey, fields_digest};
use crate::script::{OP_2DROP, OP_CHECKSIG, OP_DROP, ScriptReader, push_data};

/// Whose key the script is locked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Custody {
    /// Locked to the encoder's own derived key; spendable only by its creator
    Owner,
    /// Locked to an explicit counterparty verifying key
    Counterparty([u8; 32]),
}

/// Whether a self-signature is embedded, and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureMode {
    /// No embedded signature
    Omitted,
    /// Signature push precedes the data fields
    Before,
    /// Signature push follows the data fields
    After,
}

/// Fixed encoding configuration for one protocol's envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockMode {
    /// Whose key locks the output
    pub custody: Custody,
    /// Self-signature placement
    pub signature: SignatureMode,
}

impl LockMode {
    /// The event log configuration: self-custodied, signed, signature
    /// before the data fields.
    pub const fn event_log() -> Self {
        Self {
            custody: Custody::Owner,
            signature: SignatureMode::Before,
        }
    }
}

impl Default for LockMode {
    fn default() -> Self {
        Self::event_log()
    }
}

/// A decoded envelope: the embedded locking key, the self-signature when
/// the mode carries one, and the ordered data fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// The 32-byte verifying key the script is locked to
    pub locking_key: [u8; 32],
    /// The embedded self-signature, if the mode includes one
    pub signature: Option<[u8; 64]>,
    /// The ordered data fields
    pub fields: Vec<Vec<u8>>,
}

/// Bidirectional mapping between field lists and locking scripts, fixed to
/// one [`LockMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnvelopeCodec {
    mode: LockMode,
}

impl EnvelopeCodec {
    /// Create a codec for the given mode
    pub fn new(mode: LockMode) -> Self {
        Self { mode }
    }

    /// The codec's fixed mode
    pub fn mode(&self) -> LockMode {
        self.mode
    }

    /// Encode `fields` into a locking script signed by `key`.
    ///
    /// At least one field is required. The result embeds the locking key
    /// selected by the mode's custody, the self-signature when the mode
    /// carries one, and every field as a minimal data push.
    pub fn encode(&self, fields: &[Vec<u8>], key: &EnvelopeKey) -> Result<Vec<u8>, CodecError> {
        if fields.is_empty() {
            return Err(CodecError::NoFields);
        }

        let locking_key = match self.mode.custody {
            Custody::Owner => key.verifying_key_bytes(),
            Custody::Counterparty(counterparty) => counterparty,
        };

        let mut script = Vec::new();
        push_data(&mut script, &locking_key)?;
        script.push(OP_CHECKSIG);

        let signature = match self.mode.signature {
            SignatureMode::Omitted => None,
            SignatureMode::Before | SignatureMode::After => Some(key.sign_fields(fields)),
        };

        let mut pushed = 0usize;
        if let (Some(sig), SignatureMode::Before) = (&signature, self.mode.signature) {
            push_data(&mut script, sig)?;
            pushed += 1;
        }
        for field in fields {
            push_data(&mut script, field)?;
            pushed += 1;
        }
        if let (Some(sig), SignatureMode::After) = (&signature, self.mode.signature) {
            push_data(&mut script, sig)?;
            pushed += 1;
        }

        for _ in 0..pushed / 2 {
            script.push(OP_2DROP);
        }
        if pushed % 2 == 1 {
            script.push(OP_DROP);
        }

        Ok(script)
    }

    /// Decode a locking script back into its envelope.
    ///
    /// Accepts arbitrary byte-strings; anything that is not a structurally
    /// valid envelope in this codec's mode is a [`CodecError`]. For
    /// owner-custody modes the embedded signature must also verify against
    /// the embedded locking key.
    pub fn decode(&self, script: &[u8]) -> Result<Envelope, CodecError> {
        let mut reader = ScriptReader::new(script);

        let key_push = reader.read_push()?;
        if key_push.len() != 32 {
            return Err(CodecError::BadLockingKeyLength(key_push.len()));
        }
        let mut locking_key = [0u8; 32];
        locking_key.copy_from_slice(key_push);

        match reader.read_byte()? {
            OP_CHECKSIG => {}
            other => return Err(CodecError::MissingCheckSig(other)),
        }

        let mut pushes: Vec<Vec<u8>> = Vec::new();
        loop {
            match reader.peek() {
                None | Some(OP_DROP) | Some(OP_2DROP) => break,
                Some(_) => pushes.push(reader.read_push()?.to_vec()),
            }
        }

        let mut dropped = 0usize;
        while let Some(opcode) = reader.peek() {
            match opcode {
                OP_DROP => dropped += 1,
                OP_2DROP => dropped += 2,
                _ => return Err(CodecError::TrailingBytes),
            }
            reader.read_byte()?;
        }
        if dropped != pushes.len() {
            return Err(CodecError::DropCountMismatch {
                dropped,
                pushed: pushes.len(),
            });
        }

        let (signature, fields) = match self.mode.signature {
            SignatureMode::Omitted => (None, pushes),
            SignatureMode::Before => {
                if pushes.is_empty() {
                    return Err(CodecError::NoFields);
                }
                let sig = pushes.remove(0);
                (Some(sig), pushes)
            }
            SignatureMode::After => {
                let sig = pushes.pop().ok_or(CodecError::NoFields)?;
                (Some(sig), pushes)
            }
        };
        if fields.is_empty() {
            return Err(CodecError::NoFields);
        }

        let signature = match signature {
            None => None,
            Some(sig) => {
                if sig.len() != 64 {
                    return Err(CodecError::BadSignatureLength(sig.len()));
                }
                let mut bytes = [0u8; 64];
                bytes.copy_from_slice(&sig);
                Some(bytes)
            }
        };

        // Owner custody means the signer's key is the embedded one, so the
        // signature can be checked without any secret material.
        if self.mode.custody == Custody::Owner
            && let Some(sig) = &signature
        {
            let verifying = VerifyingKey::from_bytes(&locking_key)
                .map_err(|_| CodecError::SignatureMismatch)?;
            let digest = fields_digest(&fields);
            verifying
                .verify_strict(digest.as_bytes(), &Signature::from_bytes(sig))
                .map_err(|_| CodecError::SignatureMismatch)?;
        }

        Ok(Envelope {
            locking_key,
            signature,
            fields,
        })
    }
}
