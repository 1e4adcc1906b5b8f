use crate::error::{AppError, Result};
use rand::RngCore;
use rand::rngs::OsRng;

/// A cryptographically secure source of random bytes.
pub trait EntropySource: Send + Sync {
    /// Fills `buf` entirely or fails with `AppError::RandomSourceUnavailable`.
    fn fill(&self, buf: &mut [u8]) -> Result<()>;
}

/// The operating system's RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<()> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| AppError::RandomSourceUnavailable(e.to_string()))
    }
}
