use thiserror::Error;

/// Errors that terminate a single connection (or refuse to start the server).
#[derive(Debug, Error)]
pub enum IslError {
    /// Read or write failure on either direction of the obfuscated stream.
    #[error("transport error: {0}")]
    TransformIo(#[from] std::io::Error),
    /// The peer closed the connection before sending the spec terminator.
    #[error("cipher spec truncated after {read} bytes")]
    TruncatedSpec { read: usize },
    /// An opcode outside the wire table was read where an opcode was expected.
    #[error("unknown opcode {opcode:#04x} at offset {offset}")]
    UnknownOpcode { opcode: u8, offset: usize },
    /// The spec did not terminate within the configured length.
    #[error("cipher spec exceeds {limit} bytes")]
    SpecTooLong { limit: usize },
    /// The compiled forward chain maps the probe onto itself.
    #[error("cipher spec is a no-op")]
    NoopSpec,
    /// A decoded request line did not end within the configured length.
    #[error("request line exceeds {limit} bytes")]
    LineTooLong { limit: usize },
    #[error("malformed request: {0}")]
    MalformedRequest(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("invalid listen address: {0}")]
    InvalidAddress(String),
}

impl IslError {
    /// True for failures caused by what the peer sent, as opposed to the transport.
    pub fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            IslError::TruncatedSpec { .. }
                | IslError::UnknownOpcode { .. }
                | IslError::SpecTooLong { .. }
                | IslError::NoopSpec
                | IslError::LineTooLong { .. }
                | IslError::MalformedRequest(_)
        )
    }
}
