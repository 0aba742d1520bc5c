use crate::spec::CipherSpec;

/// Reference input for no-op detection.
pub const NOOP_PROBE: &[u8] = b"Hello, world!";

/// True when `spec`, starting at position 0, maps [`NOOP_PROBE`] onto itself.
///
/// Such a spec gives no obfuscation at all (an empty chain, `xor(n)` twice,
/// `reversebits` twice, ...) and the connection must be dropped before any
/// application data is read.
pub fn is_noop(spec: &CipherSpec) -> bool {
    NOOP_PROBE
        .iter()
        .enumerate()
        .all(|(pos, &byte)| spec.apply(pos as u64, byte) == byte)
}

impl CipherSpec {
    pub fn is_noop(&self) -> bool {
        is_noop(self)
    }
}
