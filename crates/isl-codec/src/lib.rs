pub mod toys;
pub use toys::{ToyItem, ToyPrioritizer};

use isl_core::IslError;

/// Application logic riding on the decoded stream.
///
/// Receives one plaintext request line (newline stripped) and returns the
/// plaintext response line (newline added by the caller). An error closes
/// the connection.
pub trait LineHandler: Send + Sync {
    fn respond(&self, line: &str) -> Result<String, IslError>;
}

impl<F> LineHandler for F
where
    F: Fn(&str) -> Result<String, IslError> + Send + Sync,
{
    fn respond(&self, line: &str) -> Result<String, IslError> {
        self(line)
    }
}
