use std::net::SocketAddr;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Reading the unobfuscated cipher spec.
    AwaitingSpec,
    /// Spec accepted; application lines flow through the transforms.
    Streaming,
    Closed,
}

/// Per-connection bookkeeping. Owned by the connection task, never shared.
#[derive(Debug)]
pub struct Session {
    pub addr: SocketAddr,
    pub phase: SessionPhase,
    /// Plaintext bytes produced by the inbound (decode) transform.
    pub bytes_decoded: u64,
    /// Plaintext bytes handed to the outbound (encode) transform.
    pub bytes_encoded: u64,
    pub requests: u64,
    started: Instant,
}

impl Session {
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            phase: SessionPhase::AwaitingSpec,
            bytes_decoded: 0,
            bytes_encoded: 0,
            requests: 0,
            started: Instant::now(),
        }
    }

    pub fn begin_streaming(&mut self) {
        self.phase = SessionPhase::Streaming;
    }

    /// Records one answered request line.
    pub fn record_exchange(&mut self, request_len: usize, response_len: usize) {
        self.requests += 1;
        self.bytes_decoded += request_len as u64;
        self.bytes_encoded += response_len as u64;
    }

    pub fn close(&mut self) {
        self.phase = SessionPhase::Closed;
    }

    pub fn is_streaming(&self) -> bool {
        self.phase == SessionPhase::Streaming
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}
