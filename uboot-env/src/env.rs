//! Encoding and decoding of the U-Boot default environment block.
//!
//! On disk the environment is a sequence of `NUL`-terminated ASCII lines
//! (`name=value`), closed by an additional `NUL` and padded with zeroes up to
//! the block size. As text it is one line per entry, `\n`-terminated.

use snafu::{Snafu, ensure};
use std::fmt;

/// Errors when decoding an environment block.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum DecodeError {
    #[snafu(display("environment line #{line} contains non-ASCII byte 0x{byte:02X}"))]
    NonAsciiByte { line: usize, byte: u8 },
}

/// Errors when validating environment lines.
#[derive(Debug, Snafu)]
#[snafu(module)]
#[non_exhaustive]
pub enum ValidationError {
    #[snafu(display("non-printable characters in line {line:?}"))]
    NonPrintable { line: String },

    #[snafu(display("non-ASCII characters in line {line:?}"))]
    NonAscii { line: String },

    #[snafu(display("environment line #{index} is empty"))]
    Empty { index: usize },

    #[snafu(display("line {number}: {source}"))]
    InText {
        number: usize,
        source: Box<ValidationError>,
    },
}

/// The encoded environment does not fit in the block.
#[derive(Debug, Snafu)]
#[snafu(display("environment needs {required} bytes but only {available} are available"))]
pub struct CapacityError {
    pub required: usize,
    pub available: usize,
}

/// How `#` comments are treated when parsing environment text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommentMode {
    /// Lines are taken verbatim, comment lines included.
    #[default]
    Preserve,
    /// Everything from the first `#` is dropped and the rest is trimmed.
    Strip,
}

/// An ordered list of validated environment lines.
///
/// Every line is non-empty printable ASCII, so it can be written to either
/// representation without further checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct Environment {
    lines: Vec<String>,
}

impl Environment {
    /// Decodes the lines stored in an environment block.
    ///
    /// Decoding stops at the first double `NUL`. Anything after it is padding.
    pub fn decode(block: &[u8]) -> Result<Self, DecodeError> {
        let live = match find_terminator(block) {
            Some(end) => &block[..end],
            None => block.strip_suffix(b"\0").unwrap_or(block),
        };

        if live.is_empty() {
            return Ok(Self::default());
        }

        let lines = live
            .split(|&b| b == 0)
            .enumerate()
            .map(|(line, raw)| match raw.iter().find(|b| !b.is_ascii()) {
                Some(&byte) => NonAsciiByteSnafu { line, byte }.fail(),
                None => Ok(raw.iter().map(|&b| char::from(b)).collect::<String>()),
            })
            .collect::<Result<Vec<String>, DecodeError>>()?;

        Ok(Self { lines })
    }

    /// Builds an environment from individual lines.
    ///
    /// Lines are used as given: no comment handling, no trimming.
    pub fn from_lines<I, S>(lines: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let lines = lines
            .into_iter()
            .enumerate()
            .map(|(index, line)| {
                let line = line.as_ref();
                ensure!(!line.is_empty(), validation_error::EmptySnafu { index });
                validate_line(line)
            })
            .collect::<Result<Vec<String>, ValidationError>>()?;

        Ok(Self { lines })
    }

    /// Parses environment text, one entry per line.
    ///
    /// Lines end at `\n`, `\r\n` or a lone `\r`.
    /// Lines that end up empty (after comment stripping, if enabled) are
    /// skipped. Errors carry the 1-based line number in `text`.
    pub fn parse_text(text: &[u8], comments: CommentMode) -> Result<Self, ValidationError> {
        let mut lines = Vec::new();

        for (i, raw) in split_lines(text).into_iter().enumerate() {
            let line = match comments {
                CommentMode::Preserve => raw,
                CommentMode::Strip => {
                    let end = raw.iter().position(|&b| b == b'#').unwrap_or(raw.len());
                    raw[..end].trim_ascii()
                }
            };

            if line.is_empty() {
                continue;
            }

            let line = validate_line(line).map_err(|e| ValidationError::InText {
                number: i + 1,
                source: Box::new(e),
            })?;

            lines.push(line);
        }

        Ok(Self { lines })
    }

    /// Returns the lines in order.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of bytes the encoded environment uses, without padding.
    ///
    /// This includes the separators and the final terminator.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        let text: usize = self.lines.iter().map(String::len).sum();
        text + self.lines.len().saturating_sub(1) + 1
    }

    /// Encodes the environment into a zero-padded block of `size` bytes.
    pub fn encode(&self, size: usize) -> Result<Vec<u8>, CapacityError> {
        let required = self.encoded_len();
        ensure!(
            required <= size,
            CapacitySnafu {
                required,
                available: size
            }
        );

        let mut block = Vec::with_capacity(size);

        for (i, line) in self.lines.iter().enumerate() {
            if i != 0 {
                block.push(0);
            }
            block.extend_from_slice(line.as_bytes());
        }

        block.resize(size, 0);

        Ok(block)
    }

    /// Renders the environment as text, each line `\n`-terminated.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }

        Ok(())
    }
}

fn split_lines(text: &[u8]) -> Vec<&[u8]> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < text.len() {
        match text[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                start = i + 1;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                if text.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }

    lines
}

fn find_terminator(block: &[u8]) -> Option<usize> {
    block.windows(2).position(|w| w == [0, 0])
}

fn validate_line(line: &[u8]) -> Result<String, ValidationError> {
    use validation_error::*;

    let text = || String::from_utf8_lossy(line).into_owned();

    ensure!(
        line.iter().all(|&b| b == b' ' || b.is_ascii_graphic() || !b.is_ascii()),
        NonPrintableSnafu { line: text() }
    );
    ensure!(line.is_ascii(), NonAsciiSnafu { line: text() });

    Ok(line.iter().map(|&b| char::from(b)).collect())
}
