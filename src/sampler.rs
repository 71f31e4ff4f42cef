//! Lottery number draws
//!
//! A set is 6 distinct numbers in [1, 45], drawn one at a time with repeats
//! discarded, then sorted ascending. Preview draws (shown while spinning)
//! allow repeats and are left unsorted.

use std::fmt;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_NUMBER, MIN_NUMBER, SET_SIZE};
use crate::error::SetError;

/// Presentation tier of a number (ball color)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// 1-10
    A,
    /// 11-20
    B,
    /// 21-30
    C,
    /// 31-40
    D,
    /// 41-45
    E,
}

impl Tier {
    pub const ALL: [Tier; 5] = [Tier::A, Tier::B, Tier::C, Tier::D, Tier::E];

    /// Tier for a number. Total: anything above 40 lands in `E`.
    pub fn of(number: u8) -> Self {
        match number {
            0..=10 => Tier::A,
            11..=20 => Tier::B,
            21..=30 => Tier::C,
            31..=40 => Tier::D,
            _ => Tier::E,
        }
    }

    /// Solid fill used on the printed ticket
    pub fn ticket_color(&self) -> &'static str {
        match self {
            Tier::A => "#FFA500",
            Tier::B => "#4169E1",
            Tier::C => "#DC143C",
            Tier::D => "#808080",
            Tier::E => "#32CD32",
        }
    }

    /// CSS class for on-page balls
    pub fn css_class(&self) -> &'static str {
        match self {
            Tier::A => "tier-a",
            Tier::B => "tier-b",
            Tier::C => "tier-c",
            Tier::D => "tier-d",
            Tier::E => "tier-e",
        }
    }
}

/// Six distinct numbers in [1, 45], always sorted ascending.
///
/// Because the numbers are kept sorted, `==` is unordered set equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct NumberSet([u8; SET_SIZE]);

impl NumberSet {
    /// Validate and sort a sequence of numbers
    pub fn new(numbers: &[u8]) -> Result<Self, SetError> {
        if numbers.len() != SET_SIZE {
            return Err(SetError::WrongLength {
                expected: SET_SIZE,
                actual: numbers.len(),
            });
        }

        let mut sorted = [0u8; SET_SIZE];
        sorted.copy_from_slice(numbers);
        sorted.sort_unstable();

        for (i, &n) in sorted.iter().enumerate() {
            if !(MIN_NUMBER..=MAX_NUMBER).contains(&n) {
                return Err(SetError::OutOfRange(n));
            }
            if i > 0 && sorted[i - 1] == n {
                return Err(SetError::Repeated(n));
            }
        }

        Ok(Self(sorted))
    }

    pub fn numbers(&self) -> &[u8; SET_SIZE] {
        &self.0
    }

    /// Numbers paired with their tiers
    pub fn balls(&self) -> impl Iterator<Item = (u8, Tier)> + '_ {
        self.0.iter().map(|&n| (n, Tier::of(n)))
    }
}

impl TryFrom<Vec<u8>> for NumberSet {
    type Error = SetError;

    fn try_from(numbers: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(&numbers)
    }
}

impl From<NumberSet> for Vec<u8> {
    fn from(set: NumberSet) -> Self {
        set.0.to_vec()
    }
}

impl fmt::Display for NumberSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, n) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{n:>2}")?;
        }
        Ok(())
    }
}

/// Source of uniform draws
pub trait NumberSource {
    /// Uniform draw in [MIN_NUMBER, MAX_NUMBER]
    fn next_number(&mut self) -> u8;

    /// Uniform draw in [0, 1), for cosmetic jitter only
    fn next_unit(&mut self) -> f64;
}

/// `rand`-backed source (PCG32 unless told otherwise)
#[derive(Debug, Clone)]
pub struct RngSource<R = Pcg32> {
    rng: R,
}

impl RngSource<Pcg32> {
    /// Seed from the OS (browser: `crypto.getRandomValues`)
    pub fn from_entropy() -> Self {
        Self {
            rng: Pcg32::from_os_rng(),
        }
    }

    /// Reproducible source
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RngSource<R> {
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> NumberSource for RngSource<R> {
    fn next_number(&mut self) -> u8 {
        self.rng.random_range(MIN_NUMBER..=MAX_NUMBER)
    }

    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Replays a fixed draw sequence, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    draws: Vec<u8>,
    units: Vec<f64>,
    next_draw: usize,
    next_unit: usize,
}

impl ScriptedSource {
    pub fn new(draws: Vec<u8>) -> Self {
        Self::with_units(draws, vec![0.5])
    }

    pub fn with_units(draws: Vec<u8>, units: Vec<f64>) -> Self {
        assert!(!draws.is_empty(), "scripted source needs at least one draw");
        assert!(!units.is_empty(), "scripted source needs at least one unit");
        Self {
            draws,
            units,
            next_draw: 0,
            next_unit: 0,
        }
    }

    /// Draws consumed so far
    pub fn consumed(&self) -> usize {
        self.next_draw
    }
}

impl NumberSource for ScriptedSource {
    fn next_number(&mut self) -> u8 {
        let n = self.draws[self.next_draw % self.draws.len()];
        self.next_draw += 1;
        n
    }

    fn next_unit(&mut self) -> f64 {
        let u = self.units[self.next_unit % self.units.len()];
        self.next_unit += 1;
        u
    }
}

/// Draws sets and previews from a [`NumberSource`]
pub struct Sampler {
    source: Box<dyn NumberSource>,
}

impl Sampler {
    pub fn new(source: impl NumberSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    /// Sampler seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self::new(RngSource::from_entropy())
    }

    /// Draw 6 distinct numbers, sorted ascending.
    ///
    /// Repeats (and anything a source yields outside the range) are
    /// discarded. There is no cap on attempts; expected draws are ~6-8.
    pub fn sample(&mut self) -> NumberSet {
        let mut picked = [0u8; SET_SIZE];
        let mut count = 0;
        let mut attempts = 0u32;

        while count < SET_SIZE {
            let n = self.source.next_number();
            attempts += 1;
            if !(MIN_NUMBER..=MAX_NUMBER).contains(&n) || picked[..count].contains(&n) {
                continue;
            }
            picked[count] = n;
            count += 1;
        }

        picked.sort_unstable();
        let set = NumberSet(picked);
        log::debug!("Drew [{}] in {} attempts", set, attempts);
        set
    }

    /// Six draws with replacement, for the spin animation only
    pub fn preview(&mut self) -> [u8; SET_SIZE] {
        std::array::from_fn(|_| self.source.next_number())
    }

    /// Underlying source, for cosmetic randomness elsewhere
    pub fn source_mut(&mut self) -> &mut dyn NumberSource {
        self.source.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sample_discards_repeats() {
        let mut sampler = Sampler::new(ScriptedSource::new(vec![7, 7, 12, 3, 45, 45, 22, 1]));
        let set = sampler.sample();
        assert_eq!(set.numbers(), &[1, 3, 7, 12, 22, 45]);
    }

    #[test]
    fn test_sample_stops_after_six_accepted() {
        let source = ScriptedSource::new(vec![5, 4, 3, 2, 1, 6, 7, 8]);
        let mut sampler = Sampler::new(source);
        assert_eq!(sampler.sample().numbers(), &[1, 2, 3, 4, 5, 6]);
        // Next call continues with 7, 8 and then cycles
        assert_eq!(sampler.sample().numbers(), &[2, 3, 4, 5, 7, 8]);
    }

    #[test]
    fn test_sample_skips_out_of_range() {
        let mut sampler = Sampler::new(ScriptedSource::new(vec![0, 46, 9, 8, 7, 6, 5, 4]));
        assert_eq!(sampler.sample().numbers(), &[4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_preview_allows_repeats() {
        let mut sampler = Sampler::new(ScriptedSource::new(vec![9, 9, 1]));
        assert_eq!(sampler.preview(), [9, 9, 1, 9, 9, 1]);
    }

    #[test]
    fn test_tier_partition_sizes() {
        let mut counts = [0usize; 5];
        for n in MIN_NUMBER..=MAX_NUMBER {
            let idx = Tier::ALL.iter().position(|t| *t == Tier::of(n)).unwrap();
            counts[idx] += 1;
        }
        assert_eq!(counts, [10, 10, 10, 10, 5]);
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(Tier::of(1), Tier::A);
        assert_eq!(Tier::of(10), Tier::A);
        assert_eq!(Tier::of(11), Tier::B);
        assert_eq!(Tier::of(20), Tier::B);
        assert_eq!(Tier::of(21), Tier::C);
        assert_eq!(Tier::of(31), Tier::D);
        assert_eq!(Tier::of(40), Tier::D);
        assert_eq!(Tier::of(41), Tier::E);
        assert_eq!(Tier::of(45), Tier::E);
    }

    #[test]
    fn test_number_set_validation() {
        assert_eq!(
            NumberSet::new(&[1, 2, 3]),
            Err(SetError::WrongLength { expected: 6, actual: 3 })
        );
        assert_eq!(NumberSet::new(&[1, 2, 3, 4, 5, 46]), Err(SetError::OutOfRange(46)));
        assert_eq!(NumberSet::new(&[0, 2, 3, 4, 5, 6]), Err(SetError::OutOfRange(0)));
        assert_eq!(NumberSet::new(&[1, 2, 3, 4, 5, 5]), Err(SetError::Repeated(5)));
    }

    #[test]
    fn test_number_set_equality_ignores_order() {
        let a = NumberSet::new(&[45, 1, 22, 3, 12, 7]).unwrap();
        let b = NumberSet::new(&[1, 3, 7, 12, 22, 45]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), " 1  3  7 12 22 45");
    }

    #[test]
    fn test_seeded_sources_agree() {
        let mut a = Sampler::new(RngSource::seeded(42));
        let mut b = Sampler::new(RngSource::seeded(42));
        for _ in 0..20 {
            assert_eq!(a.sample(), b.sample());
        }
    }

    proptest! {
        #[test]
        fn prop_sample_invariants(seed in any::<u64>()) {
            let mut sampler = Sampler::new(RngSource::seeded(seed));
            let set = sampler.sample();
            let nums = set.numbers();
            prop_assert_eq!(nums.len(), SET_SIZE);
            for w in nums.windows(2) {
                prop_assert!(w[0] < w[1]);
            }
            prop_assert!(nums.iter().all(|n| (MIN_NUMBER..=MAX_NUMBER).contains(n)));
        }

        #[test]
        fn prop_preview_in_range(seed in any::<u64>()) {
            let mut sampler = Sampler::new(RngSource::seeded(seed));
            prop_assert!(sampler.preview().iter().all(|n| (MIN_NUMBER..=MAX_NUMBER).contains(n)));
        }
    }
}
