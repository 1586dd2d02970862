//! Reads a generated dataset back: header, top-K block, sample stream.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use crate::error::GenError;
use crate::output::{Header, VALUE_COLUMN};

/// A top-K line as printed: identity and rounded probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopLine {
    pub identity: u32,
    pub probability: f64,
}

/// Parsed preamble of a dataset file, positioned at the sample stream.
pub struct Dataset {
    pub header: Header,
    pub top_k: usize,
    pub top: Vec<TopLine>,
    /// Byte offset of the first sample.
    pub preamble_len: u64,
    reader: BufReader<File>,
}

fn bad(msg: impl Into<String>) -> GenError {
    GenError::io(
        "parse dataset header",
        io::Error::new(io::ErrorKind::InvalidData, msg.into()),
    )
}

/// The value after `#key:` with only the alignment padding removed, so
/// filenames keep their own leading and trailing spaces.
fn field<'a>(line: &'a str, key: &str) -> Result<&'a str, GenError> {
    let err = || bad(format!("expected `#{key}:` line, got {line:?}"));
    let rest = line
        .strip_prefix('#')
        .and_then(|l| l.strip_prefix(key))
        .and_then(|l| l.strip_prefix(':'))
        .ok_or_else(err)?;
    let pad = VALUE_COLUMN.saturating_sub(line.len() - rest.len());
    match rest.get(..pad) {
        Some(p) if p.bytes().all(|b| b == b' ') => Ok(&rest[pad..]),
        _ => Err(err()),
    }
}

fn parse<T: std::str::FromStr>(line: &str, key: &str) -> Result<T, GenError> {
    let v = field(line, key)?;
    v.parse()
        .map_err(|_| bad(format!("bad value for {key}: {v:?}")))
}

impl Dataset {
    pub fn open(path: &Path) -> Result<Self, GenError> {
        let file = File::open(path).map_err(|e| GenError::io("open dataset", e))?;
        let mut reader = BufReader::new(file);
        let mut consumed = 0u64;

        let mut next_line = |reader: &mut BufReader<File>| -> Result<String, GenError> {
            let mut line = String::new();
            let n = reader
                .read_line(&mut line)
                .map_err(|e| GenError::io("read dataset header", e))?;
            if n == 0 {
                return Err(bad("unexpected end of header"));
            }
            consumed += n as u64;
            if line.ends_with('\n') {
                line.pop();
            }
            Ok(line)
        };

        let elements = parse(&next_line(&mut reader)?, "N")?;
        let universe = parse(&next_line(&mut reader)?, "Universe")?;
        let alpha = parse(&next_line(&mut reader)?, "Alpha")?;
        let count = parse(&next_line(&mut reader)?, "Count")?;
        let filename = PathBuf::from(field(&next_line(&mut reader)?, "Filename")?);
        let seed1 = parse(&next_line(&mut reader)?, "Seed1")?;
        let seed2 = parse(&next_line(&mut reader)?, "Seed2")?;

        let banner = next_line(&mut reader)?;
        let top_k = banner
            .strip_prefix("#====== TOP ")
            .and_then(|l| l.strip_suffix(" ======"))
            .and_then(|k| k.parse().ok())
            .ok_or_else(|| bad(format!("bad top-K banner {banner:?}")))?;

        let mut top = Vec::new();
        loop {
            let line = next_line(&mut reader)?;
            if line.is_empty() {
                break;
            }
            let (id, p) = line
                .strip_prefix('#')
                .and_then(|l| l.split_once(": "))
                .ok_or_else(|| bad(format!("bad top-K line {line:?}")))?;
            top.push(TopLine {
                identity: id.parse().map_err(|_| bad(format!("bad identity {id:?}")))?,
                probability: p.parse().map_err(|_| bad(format!("bad probability {p:?}")))?,
            });
        }

        Ok(Self {
            header: Header {
                elements,
                universe,
                alpha,
                count,
                filename,
                seed1,
                seed2,
            },
            top_k,
            top,
            preamble_len: consumed,
            reader,
        })
    }

    /// Iterate the sample stream. Consumes the dataset.
    pub fn samples(self) -> Samples {
        Samples {
            reader: self.reader,
        }
    }
}

pub struct Samples {
    reader: BufReader<File>,
}

impl Iterator for Samples {
    type Item = io::Result<u32>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut word = [0u8; 4];
        let mut filled = 0;
        while filled < 4 {
            match self.reader.read(&mut word[filled..]) {
                Ok(0) if filled == 0 => return None,
                Ok(0) => {
                    return Some(Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "trailing partial sample",
                    )));
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Some(Err(e)),
            }
        }
        Some(Ok(u32::from_le_bytes(word)))
    }
}
