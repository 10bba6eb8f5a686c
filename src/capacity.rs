//! Table sizing.
//!
//! Slot counts are chosen to have no prime factor below 11. Home positions
//! are `hash % capacity`, so a capacity sharing no small factor with common
//! hash strides spreads clustered hashes over more distinct homes than a
//! power-of-two mask would.

/// Fraction of the slot array that may be occupied before the table grows.
///
/// Planning uses the exact integer inverse `4 / 3`.
pub const LOAD_FACTOR: f64 = 0.75;

/// Smallest occupancy ceiling a table is ever planned for.
pub const MIN_OCCUPANCY: usize = 6;

/// Product of the primes skipped by the wheel: 2 * 3 * 5 * 7.
pub const WHEEL_MODULUS: usize = 210;

const WHEEL: [u8; WHEEL_MODULUS] = build_wheel();

#[inline(always)]
const fn is_wheel_coprime(x: usize) -> bool {
    x % 2 != 0 && x % 3 != 0 && x % 5 != 0 && x % 7 != 0
}

/// For every residue modulo [`WHEEL_MODULUS`], the distance to the next
/// integer (inclusive) that is coprime to the modulus.
const fn build_wheel() -> [u8; WHEEL_MODULUS] {
    let mut wheel = [0u8; WHEEL_MODULUS];
    let mut residue = 0;
    while residue < WHEEL_MODULUS {
        let mut offset = 0;
        while !is_wheel_coprime(residue + offset) {
            offset += 1;
        }
        wheel[residue] = offset as u8;
        residue += 1;
    }
    wheel
}

/// Clamps a requested occupancy to the smallest ceiling a table supports.
#[inline]
pub fn occupancy_ceiling(min_occupancy: usize) -> usize {
    min_occupancy.max(MIN_OCCUPANCY)
}

/// Returns the slot count for a table that must hold `min_occupancy` entries
/// before growing.
///
/// The result is `ceil(ceiling / LOAD_FACTOR)` advanced to the next integer
/// with no factor in {2, 3, 5, 7}, and is always strictly greater than the
/// occupancy ceiling. Returns `None` if the computation overflows `usize`.
///
/// # Examples
///
/// ```rust
/// # use strmap::capacity::plan_capacity;
/// #
/// assert_eq!(plan_capacity(0), Some(11));
/// assert_eq!(plan_capacity(100), Some(137));
/// assert_eq!(plan_capacity(usize::MAX), None);
/// ```
pub fn plan_capacity(min_occupancy: usize) -> Option<usize> {
    let msize = occupancy_ceiling(min_occupancy);
    let capacity = msize.checked_add(msize.div_ceil(3))?;
    let capacity = capacity.checked_add(WHEEL[capacity % WHEEL_MODULUS] as usize)?;

    assert!(
        msize < capacity,
        "planned capacity {capacity} does not exceed ceiling {msize}"
    );
    debug_assert!(is_wheel_coprime(capacity));

    Some(capacity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_offsets_land_on_coprimes() {
        for residue in 0..WHEEL_MODULUS {
            let offset = WHEEL[residue] as usize;
            assert!(is_wheel_coprime(residue + offset), "residue {residue}");
            for skipped in residue..residue + offset {
                assert!(!is_wheel_coprime(skipped), "skipped coprime {skipped}");
            }
        }
        // Largest gap between integers coprime to 210.
        assert_eq!(WHEEL.iter().copied().max(), Some(9));
    }

    #[test]
    fn small_requests_use_minimum_ceiling() {
        assert_eq!(occupancy_ceiling(0), MIN_OCCUPANCY);
        assert_eq!(occupancy_ceiling(3), MIN_OCCUPANCY);
        assert_eq!(occupancy_ceiling(7), 7);
        assert_eq!(plan_capacity(0), plan_capacity(MIN_OCCUPANCY));
        assert_eq!(plan_capacity(6), Some(11));
    }

    #[test]
    fn planned_capacity_is_admissible() {
        for min in 0..5000usize {
            let capacity = plan_capacity(min).unwrap();
            let msize = occupancy_ceiling(min);
            assert!(capacity > msize, "min {min} -> {capacity}");
            assert!(is_wheel_coprime(capacity), "min {min} -> {capacity}");
            assert!(
                msize as f64 / capacity as f64 <= LOAD_FACTOR,
                "min {min} -> {capacity}"
            );
        }
    }

    #[test]
    fn planned_capacity_is_monotonic() {
        let mut previous = 0;
        for min in 0..2000usize {
            let capacity = plan_capacity(min).unwrap();
            assert!(capacity >= previous);
            previous = capacity;
        }
    }

    #[test]
    fn overflow_is_refused() {
        assert_eq!(plan_capacity(usize::MAX), None);
        assert_eq!(plan_capacity(usize::MAX - 1), None);
        assert!(plan_capacity(usize::MAX / 2).is_some());
    }
}
