//! End-to-end generation run.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use tracing::{info, warn};

use crate::config::Config;
use crate::error::GenError;
use crate::output::{Header, copy_staging, stream_len, write_preamble};
use crate::pipeline::sample_into;
use crate::reader::Dataset;
use crate::remap::IdentityMap;
use crate::rng::seeded_rng;
use crate::topk::{TopEntry, top_k};
use crate::walker::AliasTable;
use crate::zipf::zipf_weights;

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct Summary {
    /// Bytes of text before the sample stream.
    pub preamble_len: u64,
    pub count: u64,
    pub top: Vec<TopEntry>,
    /// Draws per weighted slot.
    pub counts: Vec<u64>,
    /// Universe identity of each weighted slot.
    pub map: IdentityMap,
}

impl Summary {
    /// Exact size of the output file.
    pub fn file_len(&self) -> u64 {
        stream_len(self.count)
            .and_then(|n| n.checked_add(self.preamble_len))
            .unwrap_or(u64::MAX)
    }
}

/// Run the whole pipeline for `config`. On failure the partial output file
/// is removed before the error is returned.
pub fn generate(config: &Config) -> Result<Summary, GenError> {
    config.validate()?;

    // Created up front so a bad path fails before any sampling work.
    let file = File::create(&config.file).map_err(|e| GenError::io("create output file", e))?;
    match run(config, file) {
        Ok(summary) => Ok(summary),
        Err(e) => {
            if let Err(rm) = fs::remove_file(&config.file) {
                warn!(path = %config.file.display(), error = %rm, "could not remove partial output");
            } else {
                warn!(path = %config.file.display(), "removed partial output");
            }
            Err(e)
        }
    }
}

fn run(config: &Config, file: File) -> Result<Summary, GenError> {
    let stream_bytes = stream_len(config.count).ok_or_else(|| {
        GenError::InvalidConfig(format!("count {} is too large", config.count))
    })?;
    let mut rng = seeded_rng(config.seed1, config.seed2);
    let mut staging = tempfile::tempfile().map_err(|e| GenError::io("create staging file", e))?;

    let probs = zipf_weights(config.elements, config.alpha)?;
    info!(n = config.elements, alpha = config.alpha, "built zipf weights");

    let map = IdentityMap::build(config.elements, config.universe, &mut rng)?;
    info!(universe = config.universe, "built identity map");

    let table = AliasTable::new(&probs)?;
    drop(probs);

    let counts = sample_into(
        &table,
        &map,
        config.count,
        config.chunk_len,
        &mut rng,
        &mut staging,
    )?;
    drop(table);
    info!(count = config.count, "sampling finished");

    let top = top_k(&counts, &map, config.top_k);

    let header = Header {
        elements: config.elements,
        universe: config.universe,
        alpha: config.alpha,
        count: config.count,
        filename: config.file.clone(),
        seed1: config.seed1,
        seed2: config.seed2,
    };
    let mut out = BufWriter::new(file);
    let preamble_len = write_preamble(&mut out, &header, config.top_k, &top)?;
    copy_staging(&mut staging, &mut out, stream_bytes)?;
    out.into_inner()
        .map_err(|e| GenError::io("flush output", e.into_error()))?
        .sync_all()
        .map_err(|e| GenError::io("sync output", e))?;
    info!(path = %config.file.display(), bytes = preamble_len.saturating_add(stream_bytes), "wrote dataset");

    let summary = Summary {
        preamble_len,
        count: config.count,
        top,
        counts,
        map,
    };
    if config.verify {
        verify(&config.file, &header, &summary)?;
        info!("verified dataset");
    }
    Ok(summary)
}

/// Re-read `path` and check it agrees with what was generated.
pub fn verify(path: &Path, header: &Header, summary: &Summary) -> Result<(), GenError> {
    let ds = Dataset::open(path)?;
    let h = &ds.header;
    // alpha is printed rounded, so compare everything else exactly.
    if (h.elements, h.universe, h.count, h.seed1, h.seed2)
        != (header.elements, header.universe, header.count, header.seed1, header.seed2)
    {
        return Err(GenError::Verify(format!(
            "header {h:?} does not match run parameters {header:?}"
        )));
    }
    if ds.preamble_len != summary.preamble_len {
        return Err(GenError::Verify(format!(
            "preamble is {} bytes, expected {}",
            ds.preamble_len, summary.preamble_len
        )));
    }
    if ds.top.len() != summary.top.len()
        || ds.top.iter().zip(&summary.top).any(|(l, e)| l.identity != e.identity)
    {
        return Err(GenError::Verify("top-K block does not match tallies".into()));
    }

    let mut tally: HashMap<u32, u64> = HashMap::new();
    let mut seen = 0u64;
    for sample in ds.samples() {
        let id = sample.map_err(|e| GenError::io("read sample stream", e))?;
        *tally.entry(id).or_default() += 1;
        seen += 1;
    }
    if seen != summary.count {
        return Err(GenError::Verify(format!(
            "found {seen} samples, expected {}",
            summary.count
        )));
    }
    for (slot, &c) in summary.counts.iter().enumerate() {
        let id = summary.map.get(slot);
        let got = tally.remove(&id).unwrap_or(0);
        if got != c {
            return Err(GenError::Verify(format!(
                "identity {id} appears {got} times, expected {c}"
            )));
        }
    }
    if let Some((id, _)) = tally.into_iter().next() {
        return Err(GenError::Verify(format!(
            "identity {id} is not in the identity map"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(path: &Path) -> Config {
        let mut c = Config::with_file(path);
        c.elements = 8;
        c.universe = 64;
        c.count = 5000;
        c.chunk_len = 512;
        c.top_k = 4;
        c
    }

    #[test]
    fn writes_file_of_expected_length() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("z.bin");
        let summary = generate(&small(&path)).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), summary.file_len());
        assert_eq!(summary.counts.iter().sum::<u64>(), 5000);
        assert_eq!(summary.top.len(), 4);
    }

    #[test]
    fn verify_accepts_own_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("z.bin");
        let mut c = small(&path);
        c.verify = true;
        generate(&c).unwrap();
    }

    #[test]
    fn verify_catches_tampering() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("z.bin");
        let c = small(&path);
        let summary = generate(&c).unwrap();

        let mut bytes = fs::read(&path).unwrap();
        bytes.truncate(bytes.len() - 4);
        fs::write(&path, &bytes).unwrap();

        let header = Dataset::open(&path).unwrap().header;
        assert!(matches!(
            verify(&path, &header, &summary),
            Err(GenError::Verify(_))
        ));
    }

    #[test]
    fn invalid_config_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("z.bin");
        let mut c = small(&path);
        c.universe = 2;
        assert!(matches!(generate(&c), Err(GenError::InvalidConfig(_))));
        assert!(!path.exists());
    }

    #[test]
    fn oversized_count_is_rejected_before_any_io() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("z.bin");
        let mut c = small(&path);
        c.count = u64::MAX / 2;
        assert!(matches!(generate(&c), Err(GenError::InvalidConfig(_))));
        assert!(!path.exists());
    }

    #[test]
    fn numeric_failure_removes_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("z.bin");
        let mut c = small(&path);
        c.elements = 4000;
        c.universe = 4000;
        c.alpha = 200.0;
        assert!(matches!(generate(&c), Err(GenError::NumericOverflow { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn unwritable_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("z.bin");
        let err = generate(&small(&path)).unwrap_err();
        assert!(matches!(err, GenError::Io { op: "create output file", .. }));
    }
}
