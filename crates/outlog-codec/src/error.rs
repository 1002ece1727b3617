//! Error types for outlog-codec

use thiserror::Error;

/// Errors raised while encoding or decoding an envelope script.
///
/// Decode errors are recoverable values, never panics: the retrieval path
/// probes many scripts that were produced by other protocols and expects
/// most of them to fail here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Script ended in the middle of an expected item
    #[error("unexpected end of script")]
    UnexpectedEnd,

    /// Found an opcode where a data push was required
    #[error("expected data push, found opcode {0:#04x}")]
    UnexpectedOpcode(u8),

    /// A push declared more bytes than the script contains
    #[error("push of {wanted} bytes overruns script end ({remaining} remaining)")]
    TruncatedPush { wanted: usize, remaining: usize },

    /// The leading locking key push was not 32 bytes
    #[error("invalid locking key length: {0}")]
    BadLockingKeyLength(usize),

    /// The opcode after the locking key was not OP_CHECKSIG
    #[error("expected OP_CHECKSIG after locking key, found {0:#04x}")]
    MissingCheckSig(u8),

    /// Encode was given no fields, or decode found none behind the signature
    #[error("envelope carries no data fields")]
    NoFields,

    /// The drop section does not clear exactly the pushed items
    #[error("drop section clears {dropped} items but {pushed} were pushed")]
    DropCountMismatch { dropped: usize, pushed: usize },

    /// Bytes remain after the drop section
    #[error("trailing bytes after drop section")]
    TrailingBytes,

    /// The embedded signature push was not 64 bytes
    #[error("invalid signature length: {0}")]
    BadSignatureLength(usize),

    /// The embedded signature does not verify against the locking key
    #[error("signature does not verify against the locking key")]
    SignatureMismatch,

    /// A field exceeds the maximum push size
    #[error("field of {0} bytes exceeds the push size limit")]
    FieldTooLarge(usize),
}
