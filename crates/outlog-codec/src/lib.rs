//! # outlog-codec
//!
//! Script envelope codec: a bidirectional mapping between an ordered list
//! of opaque byte-fields and a ledger output's locking script.
//!
//! The envelope is a script-style binary container: a 32-byte locking key
//! and `OP_CHECKSIG`, followed by length-prefixed data pushes and a drop
//! section that clears them. Locking keys are derived per protocol from a
//! root secret, which is what separates one protocol's outputs from
//! unrelated uses of a shared ledger.
//!
//! ## Key Types
//!
//! - [`EnvelopeCodec`]: encode/decode fixed to one [`LockMode`]
//! - [`EnvelopeKey`]: per-protocol signing identity, derived via
//!   [`EnvelopeKey::derive`]
//! - [`CodecError`]: recoverable, per-script decode failure
//!
//! Decoding never requires secret material and never panics on foreign
//! input; feeding a basket of arbitrary scripts through [`EnvelopeCodec::decode`]
//! and keeping the successes is the intended usage.

pub mod envelope;
pub mod error;
pub mod identity;
pub mod script;

pub use envelope::*;
pub use error::*;
pub use identity::{EnvelopeKey, ProtocolTag, SecurityLevel};
