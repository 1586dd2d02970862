//! Output file layout: text preamble (header, top-K block, blank line)
//! followed by the raw sample stream.

use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

use crate::error::GenError;
use crate::topk::TopEntry;

/// Run parameters echoed at the top of the output file.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub elements: u32,
    pub universe: u32,
    pub alpha: f64,
    pub count: u64,
    pub filename: PathBuf,
    pub seed1: u32,
    pub seed2: u32,
}

/// Byte column where every header value starts; `#Universe: ` is the
/// widest key and the others are padded to match.
pub(crate) const VALUE_COLUMN: usize = 11;

/// Length in bytes of a sample stream of `count` records, if it fits.
pub fn stream_len(count: u64) -> Option<u64> {
    count.checked_mul(4)
}

/// Counts bytes passing through to the wrapped writer.
struct Counting<W> {
    inner: W,
    written: u64,
}

impl<W: Write> Write for Counting<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }
    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

fn write_text<W: Write>(
    out: &mut W,
    header: &Header,
    k: usize,
    top: &[TopEntry],
) -> io::Result<()> {
    writeln!(out, "#N:        {}", header.elements)?;
    writeln!(out, "#Universe: {}", header.universe)?;
    writeln!(out, "#Alpha:    {:.6}", header.alpha)?;
    writeln!(out, "#Count:    {}", header.count)?;
    writeln!(out, "#Filename: {}", header.filename.display())?;
    writeln!(out, "#Seed1:    {}", header.seed1)?;
    writeln!(out, "#Seed2:    {}", header.seed2)?;
    writeln!(out, "#====== TOP {k} ======")?;
    for e in top {
        writeln!(out, "#{}: {:.10}", e.identity, e.probability(header.count))?;
    }
    writeln!(out)
}

/// Write the header, the top-K block and the blank separator.
/// `k` is the configured block size shown in the banner, which may exceed
/// `top.len()`. Returns the number of bytes written.
pub fn write_preamble<W: Write + ?Sized>(
    out: &mut W,
    header: &Header,
    k: usize,
    top: &[TopEntry],
) -> Result<u64, GenError> {
    let mut counting = Counting {
        inner: out,
        written: 0,
    };
    write_text(&mut counting, header, k, top).map_err(|e| GenError::io("write header", e))?;
    Ok(counting.written)
}

/// Rewind `staging` and append all of it to `out` verbatim.
/// Fails unless exactly `expected_bytes` were copied.
pub fn copy_staging<S, W>(staging: &mut S, out: &mut W, expected_bytes: u64) -> Result<(), GenError>
where
    S: Read + Seek + ?Sized,
    W: Write + ?Sized,
{
    staging
        .seek(SeekFrom::Start(0))
        .map_err(|e| GenError::io("rewind staging", e))?;
    let copied = io::copy(staging, out).map_err(|e| GenError::io("copy staging to output", e))?;
    if copied != expected_bytes {
        return Err(GenError::io(
            "copy staging to output",
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("copied {copied} bytes, expected {expected_bytes}"),
            ),
        ));
    }
    out.flush().map_err(|e| GenError::io("flush output", e))
}
