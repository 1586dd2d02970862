//! Identity map from weighted slots to universe identities.
//!
//! The `n` weighted elements are first permuted, then the universe is
//! extended to `m` identities reservoir-style: identity `i` in `n..m` claims
//! slot `j = uniform(0..=i)` when `j < n`. Afterwards every identity in
//! `0..m` occupies a slot with probability `n / m`, and no identity occupies
//! more than one slot.

use rand::Rng;

use crate::error::{GenError, try_filled};
use crate::shuffle::fisher_yates;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityMap {
    slots: Vec<u32>,
}

impl IdentityMap {
    /// The identity permutation `0..n`.
    pub fn identity(n: u32) -> Result<Self, GenError> {
        let mut slots = try_filled(n as usize, 0u32, "identity map")?;
        for (i, s) in slots.iter_mut().enumerate() {
            *s = i as u32;
        }
        Ok(Self { slots })
    }

    /// Identity, shuffle, then extend to a universe of `universe` identities.
    pub fn build<R: Rng + ?Sized>(n: u32, universe: u32, rng: &mut R) -> Result<Self, GenError> {
        let mut map = Self::identity(n)?;
        fisher_yates(&mut map.slots, rng);
        map.extend_universe(universe, rng)?;
        Ok(map)
    }

    /// Redirect slots to identities in `len()..universe`.
    pub fn extend_universe<R: Rng + ?Sized>(
        &mut self,
        universe: u32,
        rng: &mut R,
    ) -> Result<(), GenError> {
        let n = self.slots.len() as u32;
        if universe < n {
            return Err(GenError::InvalidConfig(format!(
                "universe ({universe}) must be at least the number of weighted elements ({n})"
            )));
        }
        for i in n..universe {
            let j = rng.random_range(0..=i);
            if j < n {
                self.slots[j as usize] = i;
            }
        }
        Ok(())
    }

    #[inline]
    pub fn get(&self, slot: usize) -> u32 {
        self.slots[slot]
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
