use crate::spec::CipherSpec;

/// A stateful, per-direction byte transform.
///
/// Implementations own their position counter; it only ever moves forward,
/// by exactly the number of bytes passed through.
pub trait ByteTransform: Send {
    fn transform_in_place(&mut self, buf: &mut [u8]);

    /// Bytes transformed so far.
    fn position(&self) -> u64;
}

/// Applies a compiled chain to a stream, one byte position at a time.
#[derive(Debug, Clone)]
pub struct Transform {
    chain: CipherSpec,
    position: u64,
}

impl Transform {
    pub fn new(chain: CipherSpec) -> Self {
        Self::starting_at(chain, 0)
    }

    pub fn starting_at(chain: CipherSpec, position: u64) -> Self {
        Self { chain, position }
    }

    /// Outbound direction: the client's chain as sent.
    pub fn encoder(spec: &CipherSpec) -> Self {
        Self::new(spec.clone())
    }

    /// Inbound direction: the derived inverse chain.
    pub fn decoder(spec: &CipherSpec) -> Self {
        Self::new(spec.inverse())
    }

    pub fn chain(&self) -> &CipherSpec {
        &self.chain
    }
}

impl ByteTransform for Transform {
    #[inline]
    fn transform_in_place(&mut self, buf: &mut [u8]) {
        for byte in buf.iter_mut() {
            *byte = self.chain.apply(self.position, *byte);
            self.position += 1;
        }
    }

    fn position(&self) -> u64 {
        self.position
    }
}
