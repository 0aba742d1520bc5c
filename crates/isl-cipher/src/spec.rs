use crate::op::{Opcode, Operation};
use core::fmt;
use isl_core::IslError;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStatus {
    Incomplete,
    /// The terminator has been read; no further bytes belong to the spec.
    Complete,
}

/// Byte-at-a-time recognizer for the self-terminating spec encoding.
///
/// The encoding carries no length prefix, so the parser tracks whether the
/// next byte is an argument. An argument is never interpreted as an opcode,
/// which is what lets `0x00` appear as a constant.
#[derive(Debug)]
pub struct SpecParser {
    raw: Vec<u8>,
    expecting_arg: bool,
    complete: bool,
    max_len: usize,
}

impl SpecParser {
    /// `max_len` bounds the spec body; the terminator does not count.
    pub fn new(max_len: usize) -> Self {
        Self {
            raw: Vec::with_capacity(max_len.min(256) + 1),
            expecting_arg: false,
            complete: false,
            max_len,
        }
    }

    pub fn push(&mut self, byte: u8) -> Result<ParseStatus, IslError> {
        if self.complete {
            return Ok(ParseStatus::Complete);
        }

        let offset = self.raw.len();

        if self.expecting_arg {
            self.ensure_room()?;
            self.raw.push(byte);
            self.expecting_arg = false;
            return Ok(ParseStatus::Incomplete);
        }

        let opcode = Opcode::from_byte(byte).ok_or(IslError::UnknownOpcode { opcode: byte, offset })?;
        if opcode == Opcode::End {
            self.raw.push(byte);
            self.complete = true;
            return Ok(ParseStatus::Complete);
        }

        self.ensure_room()?;
        self.raw.push(byte);
        self.expecting_arg = opcode.arity() == 1;
        Ok(ParseStatus::Incomplete)
    }

    fn ensure_room(&self) -> Result<(), IslError> {
        if self.raw.len() >= self.max_len {
            return Err(IslError::SpecTooLong { limit: self.max_len });
        }
        Ok(())
    }

    /// Bytes accepted so far.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Raw spec bytes including the terminator, or `TruncatedSpec` if the
    /// terminator has not been seen.
    pub fn finish(self) -> Result<Vec<u8>, IslError> {
        if !self.complete {
            return Err(IslError::TruncatedSpec { read: self.raw.len() });
        }
        Ok(self.raw)
    }
}

/// Reads one spec off `reader`, stopping right after the terminator.
///
/// Reads a byte at a time, so `reader` should be buffered; whatever the
/// buffer holds past the terminator is left for the data phase.
pub async fn read_spec<R>(reader: &mut R, max_len: usize) -> Result<Vec<u8>, IslError>
where
    R: AsyncRead + Unpin,
{
    let mut parser = SpecParser::new(max_len);
    loop {
        let byte = match reader.read_u8().await {
            Ok(byte) => byte,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Err(IslError::TruncatedSpec { read: parser.len() });
            }
            Err(e) => return Err(IslError::TransformIo(e)),
        };
        if parser.push(byte)? == ParseStatus::Complete {
            return parser.finish();
        }
    }
}

/// An ordered, immutable chain of operations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CipherSpec {
    ops: Vec<Operation>,
}

impl CipherSpec {
    pub fn new(ops: Vec<Operation>) -> Self {
        Self { ops }
    }

    /// Compiles raw spec bytes into an operation chain.
    ///
    /// Compilation stops at the terminator if one is present; the bytes may
    /// also be passed without it.
    pub fn compile(raw: &[u8]) -> Result<Self, IslError> {
        let mut ops = Vec::with_capacity(raw.len());
        let mut idx = 0;

        while idx < raw.len() {
            let byte = raw[idx];
            let opcode = Opcode::from_byte(byte)
                .ok_or(IslError::UnknownOpcode { opcode: byte, offset: idx })?;
            if opcode == Opcode::End {
                break;
            }

            let arg = if opcode.arity() == 1 {
                idx += 1;
                *raw.get(idx).ok_or(IslError::TruncatedSpec { read: raw.len() })?
            } else {
                0
            };

            if let Some(op) = opcode.operation(arg) {
                ops.push(op);
            }
            idx += 1;
        }

        Ok(Self { ops })
    }

    /// Parses and compiles a complete wire spec held in memory.
    /// Bytes after the terminator are ignored.
    pub fn from_wire(bytes: &[u8], max_len: usize) -> Result<Self, IslError> {
        let mut parser = SpecParser::new(max_len);
        for &byte in bytes {
            if parser.push(byte)? == ParseStatus::Complete {
                break;
            }
        }
        Self::compile(&parser.finish()?)
    }

    /// Wire encoding including the terminator. `None` if the chain holds
    /// operations that only exist in derived inverses.
    pub fn to_wire(&self) -> Option<Vec<u8>> {
        let mut out = Vec::with_capacity(self.ops.len() * 2 + 1);
        for op in &self.ops {
            let (opcode, arg) = op.wire()?;
            out.push(opcode as u8);
            out.extend(arg);
        }
        out.push(Opcode::End as u8);
        Some(out)
    }

    /// Folds `byte` through every operation in order.
    #[inline]
    pub fn apply(&self, position: u64, byte: u8) -> u8 {
        self.ops.iter().fold(byte, |b, op| op.apply(position, b))
    }

    /// The chain undoing this one: reversed order, each operation inverted.
    pub fn inverse(&self) -> Self {
        Self {
            ops: self.ops.iter().rev().map(|op| op.inverse()).collect(),
        }
    }

    pub fn operations(&self) -> &[Operation] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn is_positional(&self) -> bool {
        self.ops.iter().any(|op| op.is_positional())
    }
}

impl fmt::Display for CipherSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", op)?;
        }
        f.write_str("]")
    }
}
