use crate::LineHandler;
use isl_core::IslError;

/// One `"<count>x <name>"` entry of a toy request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToyItem<'a> {
    pub count: u64,
    /// The entry exactly as received; echoed back verbatim.
    pub raw: &'a str,
}

impl<'a> ToyItem<'a> {
    pub fn parse(raw: &'a str) -> Result<Self, IslError> {
        let malformed = || IslError::MalformedRequest(format!("bad toy entry {:?}", raw));

        let (digits, rest) = raw.split_once('x').ok_or_else(malformed)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        if !rest.starts_with(' ') {
            return Err(malformed());
        }
        let count = digits.parse().map_err(|_| malformed())?;

        Ok(Self { count, raw })
    }
}

/// Answers a comma-separated toy list with the entry of the highest count.
/// Ties go to the earliest entry.
#[derive(Debug, Default, Clone, Copy)]
pub struct ToyPrioritizer;

impl ToyPrioritizer {
    pub fn pick<'a>(&self, request: &'a str) -> Result<ToyItem<'a>, IslError> {
        let mut best: Option<ToyItem<'a>> = None;
        for entry in request.split(',') {
            let item = ToyItem::parse(entry)?;
            if best.map_or(true, |b| item.count > b.count) {
                best = Some(item);
            }
        }
        best.ok_or_else(|| IslError::MalformedRequest("empty toy request".to_string()))
    }
}

impl LineHandler for ToyPrioritizer {
    fn respond(&self, line: &str) -> Result<String, IslError> {
        let item = self.pick(line)?;
        tracing::trace!("picked {:?} (count {})", item.raw, item.count);
        Ok(item.raw.to_string())
    }
}
