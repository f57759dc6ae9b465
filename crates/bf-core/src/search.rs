//! Bisection primitives.
//!
//! `binary_search` and `boundary_search` locate values in sorted axes of the
//! property tables; `binary_target_search` inverts a monotonic function such
//! as enthalpy or entropy against temperature.

use std::ops::RangeInclusive;

use crate::error::{SearchError, SearchResult};
use crate::numeric::round_to;

/// Iteration cap of [`binary_target_search`].
pub const TARGET_SEARCH_MAX_ITERATIONS: usize = 25;

fn list_bounds(list: &[f64], item: f64) -> SearchResult<()> {
    let (Some(&first), Some(&last)) = (list.first(), list.last()) else {
        return Err(SearchError::EmptyList);
    };
    if item.is_nan() || item < first || item > last {
        return Err(SearchError::OutOfRange {
            value: item,
            first,
            last,
        });
    }
    Ok(())
}

/// Index of the element of `list` closest to `item`.
///
/// `list` must be sorted ascending. An exact hit returns its index. Otherwise
/// the bisection keeps the closest index it visited; on a tie the later mid
/// wins when it lies above the current best.
pub fn binary_search(list: &[f64], item: f64) -> SearchResult<usize> {
    list_bounds(list, item)?;

    let mut low: isize = 0;
    let mut high: isize = list.len() as isize - 1;
    let mut best = 0_usize;

    while low <= high {
        let mid = ((low + high) / 2) as usize;
        let value = list[mid];

        if value < item {
            low = mid as isize + 1;
        } else if value > item {
            high = mid as isize - 1;
        } else {
            best = mid;
            break;
        }

        let diff_best = (list[best] - item).abs();
        let diff_mid = (value - item).abs();
        if (best < mid && diff_mid <= diff_best) || diff_mid < diff_best {
            best = mid;
        }
    }

    Ok(best)
}

/// Neighbours of a value inside a sorted list, with linear weights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    pub low: f64,
    pub closest: f64,
    pub high: f64,
    pub low_idx: usize,
    pub closest_idx: usize,
    pub high_idx: usize,
    /// `(item - low) / (high - low)`; NaN on an exact hit.
    pub weight_high: f64,
    /// `1 - weight_high`; NaN on an exact hit.
    pub weight_low: f64,
}

impl Boundary {
    /// True when the searched value matched a list entry exactly.
    pub fn is_exact(&self) -> bool {
        self.low_idx == self.high_idx
    }
}

/// Bracket `item` between its two neighbours in `list`.
pub fn boundary_search(list: &[f64], item: f64) -> SearchResult<Boundary> {
    let closest_idx = binary_search(list, item)?;
    let closest = list[closest_idx];

    let neighbour = if item > closest {
        closest_idx + 1
    } else if item < closest {
        closest_idx - 1
    } else {
        closest_idx
    };

    let low_idx = closest_idx.min(neighbour);
    let high_idx = closest_idx.max(neighbour);
    let (low, high) = (list[low_idx], list[high_idx]);

    // Exact hits divide 0 by 0 on purpose: callers read NaN as "use the row".
    let weight_high = (item - low) / (high - low);

    Ok(Boundary {
        low,
        closest,
        high,
        low_idx,
        closest_idx,
        high_idx,
        weight_high,
        weight_low: 1.0 - weight_high,
    })
}

/// Bisect `eval` over `domain` until it matches `target` at `precision`
/// decimal digits, or the iteration cap is reached.
///
/// `eval` must be non-decreasing over the domain. Returns the last midpoint
/// rounded to `precision`. Evaluation errors propagate unchanged.
pub fn binary_target_search<E, F>(
    domain: RangeInclusive<f64>,
    target: f64,
    precision: u32,
    mut eval: F,
) -> Result<f64, E>
where
    E: From<SearchError>,
    F: FnMut(f64) -> Result<f64, E>,
{
    let (min, max) = (*domain.start(), *domain.end());
    if !min.is_finite() || !max.is_finite() || min >= max {
        return Err(SearchError::InvalidDomain {
            what: format!("empty domain {min} - {max}"),
        }
        .into());
    }

    let at_min = eval(min)?;
    let at_max = eval(max)?;
    if target.is_nan() || target < at_min || target > at_max {
        return Err(SearchError::InvalidDomain {
            what: format!("target {target} outside function range ({at_min} - {at_max})"),
        }
        .into());
    }

    let wanted = round_to(target, precision);
    let (mut low, mut high) = (min, max);
    let mut mid = min;

    for _ in 0..TARGET_SEARCH_MAX_ITERATIONS {
        mid = (low + high) / 2.0;
        let guess = eval(mid)?;

        if round_to(guess, precision) == wanted {
            break;
        }
        if guess < target {
            low = mid;
        } else if guess > target {
            high = mid;
        }
    }

    Ok(round_to(mid, precision))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const LIST: [f64; 5] = [1.0, 2.0, 3.0, 4.0, 5.0];

    #[test]
    fn binary_search_exact_and_closest() {
        assert_eq!(binary_search(&LIST, 3.0).unwrap(), 2);
        assert_eq!(binary_search(&LIST, 1.1).unwrap(), 0);
        assert_eq!(binary_search(&LIST, 4.9).unwrap(), 4);
        assert_eq!(binary_search(&LIST, 5.0).unwrap(), 4);
    }

    #[test]
    fn binary_search_tie_prefers_upper_neighbour() {
        assert_eq!(binary_search(&LIST, 2.5).unwrap(), 2);
    }

    #[test]
    fn binary_search_rejects_values_outside_list() {
        assert!(matches!(
            binary_search(&LIST, 0.9),
            Err(SearchError::OutOfRange { .. })
        ));
        assert!(matches!(
            binary_search(&LIST, 5.1),
            Err(SearchError::OutOfRange { .. })
        ));
        assert!(matches!(binary_search(&[], 1.0), Err(SearchError::EmptyList)));
        assert!(binary_search(&LIST, f64::NAN).is_err());
    }

    #[test]
    fn boundary_search_brackets_and_weights() {
        let b = boundary_search(&LIST, 1.1).unwrap();
        assert_eq!((b.low, b.high), (1.0, 2.0));
        assert_eq!((b.low_idx, b.high_idx), (0, 1));
        assert!((b.weight_low - 0.9).abs() < 1e-12);
        assert!((b.weight_high - 0.1).abs() < 1e-12);
    }

    #[test]
    fn boundary_search_exact_hit_collapses() {
        let b = boundary_search(&LIST, 4.0).unwrap();
        assert!(b.is_exact());
        assert_eq!((b.low, b.closest, b.high), (4.0, 4.0, 4.0));
        assert!(b.weight_high.is_nan());
        assert!(b.weight_low.is_nan());
    }

    #[test]
    fn target_search_identity() {
        let found =
            binary_target_search::<SearchError, _>(-50.0..=200.0, 26.85, 2, |x| Ok(x)).unwrap();
        assert!((found - 26.85).abs() <= 0.01);
    }

    #[test]
    fn target_search_rejects_target_outside_range() {
        let err = binary_target_search::<SearchError, _>(0.0..=10.0, 11.0, 2, |x| Ok(x));
        assert!(matches!(err, Err(SearchError::InvalidDomain { .. })));
        let err = binary_target_search::<SearchError, _>(0.0..=10.0, -1.0, 2, |x| Ok(x));
        assert!(matches!(err, Err(SearchError::InvalidDomain { .. })));
    }

    #[test]
    fn target_search_rejects_empty_domain() {
        let err = binary_target_search::<SearchError, _>(5.0..=5.0, 5.0, 2, |x| Ok(x));
        assert!(matches!(err, Err(SearchError::InvalidDomain { .. })));
    }

    #[test]
    fn target_search_propagates_eval_errors() {
        let mut calls = 0;
        // min, max and the first midpoint succeed; 5.0 misses 3.3 so a second midpoint runs
        let err = binary_target_search::<SearchError, _>(0.0..=10.0, 3.3, 2, |x| {
            calls += 1;
            if calls > 3 {
                Err(SearchError::EmptyList)
            } else {
                Ok(x)
            }
        });
        assert_eq!(err, Err(SearchError::EmptyList));
        assert_eq!(calls, 4);
    }

    #[test]
    fn target_search_inverts_nonlinear_function() {
        // h(T) = 846 * T, inverted to 0.01 K
        let found =
            binary_target_search::<SearchError, _>(0.0..=500.0, 846.0 * 300.0, 2, |t| {
                Ok(846.0 * t)
            })
            .unwrap();
        assert!((found - 300.0).abs() <= 0.01);
    }

    fn sorted_axis() -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(0.01_f64..100.0, 1..40).prop_map(|steps| {
            let mut acc = -50.0;
            steps
                .into_iter()
                .map(|s| {
                    acc += s;
                    acc
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn binary_search_returns_a_closest_index(
            list in sorted_axis(),
            frac in 0.0_f64..=1.0,
        ) {
            let first = list[0];
            let last = list[list.len() - 1];
            let item = first + frac * (last - first);
            let idx = binary_search(&list, item).unwrap();
            let best = list
                .iter()
                .map(|v| (v - item).abs())
                .fold(f64::INFINITY, f64::min);
            prop_assert!(((list[idx] - item).abs() - best).abs() <= 1e-9);
        }

        #[test]
        fn boundary_search_brackets_value(
            list in sorted_axis(),
            frac in 0.0_f64..=1.0,
        ) {
            let first = list[0];
            let last = list[list.len() - 1];
            let item = first + frac * (last - first);
            let b = boundary_search(&list, item).unwrap();
            prop_assert!(b.low <= item && item <= b.high);
            prop_assert!(b.high_idx - b.low_idx <= 1);
            if !b.is_exact() {
                prop_assert!((b.weight_low + b.weight_high - 1.0).abs() < 1e-12);
                let rebuilt = b.weight_low * b.low + b.weight_high * b.high;
                prop_assert!((rebuilt - item).abs() < 1e-9 * item.abs().max(1.0));
            }
        }

        #[test]
        fn target_search_identity_within_precision(target in -49.0_f64..199.0) {
            let found = binary_target_search::<SearchError, _>(
                -50.0..=200.0,
                target,
                2,
                |x| Ok(x),
            )
            .unwrap();
            prop_assert!((found - target).abs() <= 0.02);
        }
    }
}
