//! Draw loop: sample slots, tally them, stream identities to staging.

use std::io::Write;

use rand::Rng;

use crate::IndexSampler;
use crate::error::{GenError, try_filled};
use crate::remap::IdentityMap;

/// Records per staging chunk in the default configuration.
pub const DEFAULT_CHUNK_LEN: usize = 512 * 1024;

/// Draw `count` slots from `sampler`, count each slot, and write the mapped
/// identity of every draw to `staging` as little-endian `u32`, flushing every
/// `chunk_len` records. Returns per-slot occurrence counts.
///
/// Peak memory is `chunk_len * 4` bytes of buffer regardless of `count`.
pub fn sample_into<S, R, W>(
    sampler: &S,
    map: &IdentityMap,
    count: u64,
    chunk_len: usize,
    rng: &mut R,
    staging: &mut W,
) -> Result<Vec<u64>, GenError>
where
    S: IndexSampler + ?Sized,
    R: Rng + ?Sized,
    W: Write + ?Sized,
{
    if sampler.len() != map.len() {
        return Err(GenError::InvalidConfig(format!(
            "sampler covers {} slots but the identity map has {}",
            sampler.len(),
            map.len()
        )));
    }
    if chunk_len == 0 {
        return Err(GenError::InvalidConfig("chunk length must be at least 1".into()));
    }

    let mut counts = try_filled(map.len(), 0u64, "occurrence counts")?;
    let chunk_bytes = chunk_len
        .checked_mul(4)
        .ok_or(GenError::ResourceExhaustion {
            what: "staging buffer",
            len: chunk_len,
        })?;
    let mut buf: Vec<u8> = Vec::new();
    buf.try_reserve_exact(chunk_bytes)
        .map_err(|_| GenError::ResourceExhaustion {
            what: "staging buffer",
            len: chunk_len,
        })?;

    let mut drawn = 0u64;
    let mut chunks = 0u64;
    while drawn < count {
        let take = (count - drawn).min(chunk_len as u64);
        buf.clear();
        for _ in 0..take {
            let slot = sampler.sample_index(rng);
            counts[slot] += 1;
            buf.extend_from_slice(&map.get(slot).to_le_bytes());
        }
        staging
            .write_all(&buf)
            .map_err(|e| GenError::io("write staging chunk", e))?;
        drawn += take;
        chunks += 1;
        tracing::debug!(chunk = chunks, records = take, drawn, "flushed staging chunk");
    }
    staging
        .flush()
        .map_err(|e| GenError::io("flush staging", e))?;

    Ok(counts)
}
