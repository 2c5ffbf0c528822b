//! Response body fingerprinting

use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha256};

/// Incremental SHA-256 over a streamed body
#[derive(Debug, Clone, Default)]
pub struct ContentHasher {
    digest: Sha256,
    bytes: u64,
}

impl ContentHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, chunk: &[u8]) {
        self.digest.update(chunk);
        self.bytes += chunk.len() as u64;
    }

    /// Bytes hashed so far
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Standard base64 of the digest
    pub fn finish(self) -> String {
        STANDARD.encode(self.digest.finalize())
    }
}

/// Hash a complete body in one go
pub fn content_hash(body: &[u8]) -> String {
    let mut hasher = ContentHasher::new();
    hasher.update(body);
    hasher.finish()
}
