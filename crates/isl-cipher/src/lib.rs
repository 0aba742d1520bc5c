//! # isl-cipher: Reversible Byte-Stream Obfuscation
//!
//! A client describes a chain of elementary byte operations on the wire.
//! This crate parses that description, compiles it into a [`CipherSpec`],
//! derives the inverse chain and applies either one to a stream while
//! tracking the per-direction byte position.
//!
//! None of this is cryptography: every operation is trivially reversible by
//! anyone who knows the chain.

pub mod noop;
pub mod op;
pub mod spec;
pub mod transform;

pub use noop::{is_noop, NOOP_PROBE};
pub use op::{Opcode, Operation};
pub use spec::{read_spec, CipherSpec, ParseStatus, SpecParser};
pub use transform::{ByteTransform, Transform};
