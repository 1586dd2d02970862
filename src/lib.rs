//! # zipfgen
//!
//! Synthetic Zipf-distributed datasets for benchmark workloads.
//!
//! A run draws `count` keys from a universe of `M` identities of which only
//! `N` carry mass. Rank `i` among the weighted elements has probability
//! proportional to `i^-alpha`, so a few "hot" keys dominate the stream.
//!
//! The pipeline:
//!
//! 1. [`zipf_weights`] builds the normalized weight table.
//! 2. [`IdentityMap::build`] shuffles the `N` weighted slots and spreads them
//!    over the `M`-element universe.
//! 3. [`AliasTable`] (Walker's alias method) gives O(1) draws.
//! 4. [`sample_into`] streams mapped draws through a bounded buffer into a
//!    staging file while tallying per-slot counts.
//! 5. [`top_k`] ranks the tallies and [`write_preamble`] / [`copy_staging`]
//!    assemble the final file: text header, top-K block, then raw samples.
//!
//! [`generate`] wires all of it together from a [`Config`].
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use zipfgen::{AliasTable, IdentityMap, seeded_rng, zipf_weights};
//!
//! # fn main() -> Result<(), zipfgen::GenError> {
//! let mut rng = seeded_rng(1, 2);
//! let table = AliasTable::new(&zipf_weights(1000, 0.99)?)?;
//! let map = IdentityMap::build(1000, 1 << 20, &mut rng)?;
//! let key = map.get(table.sample_index(&mut rng));
//! println!("drew key {key}");
//! # Ok(()) }
//! ```
//!
//! ## Output format
//!
//! ```text
//! #N:        <u32>
//! #Universe: <u32>
//! #Alpha:    <f64, 6 decimals>
//! #Count:    <u64>
//! #Filename: <path>
//! #Seed1:    <u32>
//! #Seed2:    <u32>
//! #====== TOP <K> ======
//! #<identity>: <probability, 10 decimals>
//! <blank line>
//! <count little-endian u32 samples>
//! ```
//!
//! ## Performance
//! * **Build**: O(n) for weights, alias table and identity map, plus O(M)
//!   RNG draws to extend the universe.
//! * **Sample**: O(1) per draw (2 random numbers, 1 branch).
//! * **Memory**: O(n) tables plus one fixed-size staging buffer, independent
//!   of `count`.

pub mod config;
mod error;
pub mod generate;
pub mod output;
mod pipeline;
pub mod reader;
mod remap;
mod rng;
mod shuffle;
mod topk;
mod walker;
mod zipf;

/// A minimal interface for "index samplers".
/// Implemented by [`AliasTable`]; the draw loop is generic over it.
#[allow(clippy::len_without_is_empty)]
pub trait IndexSampler {
    fn len(&self) -> usize;
    fn sample_index<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> usize;
}

pub use config::Config;
pub use error::{GenError, ProbError};
pub use generate::{Summary, generate};
pub use output::{Header, copy_staging, stream_len, write_preamble};
pub use pipeline::{DEFAULT_CHUNK_LEN, sample_into};
pub use remap::IdentityMap;
pub use rng::{DEFAULT_SEED1, DEFAULT_SEED2, seeded_rng};
pub use shuffle::fisher_yates;
pub use topk::{DEFAULT_TOP_K, TopEntry, top_k};
pub use walker::AliasTable;
pub use zipf::zipf_weights;

/// `AliasTable` is the weighted sampler; wire it into the trait.
impl IndexSampler for AliasTable {
    #[inline]
    fn len(&self) -> usize {
        // call the inherent method explicitly to avoid trait-recursion
        AliasTable::len(self)
    }
    #[inline]
    fn sample_index<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> usize {
        AliasTable::sample_index(self, rng)
    }
}
