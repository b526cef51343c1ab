use smallvec::SmallVec;

/// Inline capacity for per-axis scratch vectors. Arrays of higher rank
/// spill to the heap.
pub(crate) const RANK_INLINE: usize = 8;

pub type AxisVec<T> = SmallVec<[T; RANK_INLINE]>;

/// Mixed-radix counter over `R` independent digit ranges.
///
/// Digit `d` runs over `0..radices[d]`. Digit 0 varies fastest: advancing
/// increments it, and on reaching its radix it resets to 0 and carries into
/// digit 1, and so on. Starting from all zeros, every combination is visited
/// exactly once.
///
/// ```
/// use slabread::data_structs::Odometer;
///
/// let mut odo = Odometer::new(&[2, 3]);
/// let mut seen = vec![odo.current().to_vec()];
/// while odo.advance() {
///     seen.push(odo.current().to_vec());
/// }
/// assert_eq!(seen.len(), 6);
/// assert_eq!(seen[1], vec![1, 0]);
/// assert_eq!(seen[2], vec![0, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct Odometer {
    radices: AxisVec<usize>,
    digits:  AxisVec<usize>,
    done:    bool,
}

impl Odometer {
    /// Creates a counter positioned on the all-zero combination.
    ///
    /// If any radix is zero there is no combination at all and the counter
    /// starts exhausted. A zero-length counter has exactly one (empty)
    /// combination.
    pub fn new(radices: &[usize]) -> Self {
        Self {
            radices: AxisVec::from_slice(radices),
            digits:  smallvec::smallvec![0; radices.len()],
            done:    radices.iter().any(|r| *r == 0),
        }
    }

    /// The current combination. Meaningless once exhausted.
    pub fn current(&self) -> &[usize] {
        &self.digits
    }

    /// Moves to the next combination. Returns `false`, leaving the digits
    /// reset to zero, when the previous combination was the last one.
    pub fn advance(&mut self) -> bool {
        if self.done {
            return false;
        }
        for (digit, radix) in self.digits.iter_mut().zip(self.radices.iter()) {
            *digit += 1;
            if *digit < *radix {
                return true;
            }
            *digit = 0;
        }
        self.done = true;
        false
    }
}

/// Iterates over combinations, yielding owned copies.
impl Iterator for Odometer {
    type Item = AxisVec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let out = self.digits.clone();
        self.advance();
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_row_major_axis0_fastest() {
        let combos = Odometer::new(&[2, 2, 2]).map(|c| c.to_vec()).collect_vec();
        assert_eq!(
            combos,
            vec![
                vec![0, 0, 0],
                vec![1, 0, 0],
                vec![0, 1, 0],
                vec![1, 1, 0],
                vec![0, 0, 1],
                vec![1, 0, 1],
                vec![0, 1, 1],
                vec![1, 1, 1],
            ]
        );
    }

    #[rstest]
    #[case(&[3, 1, 4], 12)]
    #[case(&[1], 1)]
    #[case(&[5, 0, 2], 0)]
    #[case(&[], 1)]
    #[case(&[1, 1, 1, 1, 1, 1, 1, 1, 1, 2], 2)]
    fn test_visits_each_combination_once(
        #[case] radices: &[usize],
        #[case] expected: usize,
    ) {
        let combos = Odometer::new(radices).collect_vec();
        assert_eq!(combos.len(), expected);
        assert!(combos.iter().all_unique());
        for c in combos.iter() {
            assert!(c.iter().zip(radices).all(|(d, r)| d < r));
        }
    }

    #[test]
    fn test_advance_after_exhaustion() {
        let mut odo = Odometer::new(&[2]);
        assert!(odo.advance());
        assert!(!odo.advance());
        assert!(odo.clone().next().is_none());
        assert!(!odo.advance());
        assert_eq!(odo.current(), &[0]);
    }
}
