use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FrameIndexError {
    #[error("no frame number found in {0}")]
    NoDigits(String),
    #[error("frame number in {0} does not fit in 64 bits")]
    Overflow(String),
}

/// Extracts the frame number embedded in a file name.
///
/// Every ASCII digit of the base name (extension stripped) is concatenated
/// in order and parsed, so the digits need not be contiguous:
/// `"a1b2c3.png"` yields 123.
pub fn extract_frame_index(file_name: &str) -> Result<u64, FrameIndexError> {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);

    let mut digits = stem.bytes().filter(u8::is_ascii_digit).peekable();
    if digits.peek().is_none() {
        return Err(FrameIndexError::NoDigits(file_name.to_string()));
    }

    digits.try_fold(0u64, |acc, d| {
        acc.checked_mul(10)
            .and_then(|v| v.checked_add(u64::from(d - b'0')))
            .ok_or_else(|| FrameIndexError::Overflow(file_name.to_string()))
    })
}
