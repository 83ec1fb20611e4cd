/// Trims a candidate comparison range against ranges already locked on the
/// same attribute.
///
/// A candidate that covers or sits inside an existing range collapses to
/// `(min, min)`. Partial overlaps are clipped at the existing boundary, so
/// the result may touch an existing range but never overlap it. A degenerate
/// result means "no selection".
#[must_use]
pub fn sanitize_range(
    candidate: (f64, f64),
    existing: &[(f64, f64)],
) -> (f64, f64) {
    let mut min = candidate.0.min(candidate.1);
    let mut max = candidate.0.max(candidate.1);

    // Clipping against one range can expose an overlap with another one.
    for _ in 0..=existing.len() {
        let mut changed = false;
        for &(a, b) in existing {
            if min == max {
                return (min, max);
            }
            let (lo, hi) = (a.min(b), a.max(b));
            if (min <= lo && max >= hi) || (min >= lo && max <= hi) {
                return (min, min);
            }
            if min >= lo && min < hi && max > hi {
                min = hi;
                changed = true;
            } else if max > lo && max <= hi && min < lo {
                max = lo;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    (min, max)
}

#[cfg(test)]
mod tests {
    use super::sanitize_range;

    #[test]
    fn containing_candidate_collapses() {
        assert_eq!(sanitize_range((5.0, 25.0), &[(10.0, 20.0)]), (5.0, 5.0));
        assert_eq!(sanitize_range((10.0, 20.0), &[(10.0, 20.0)]), (10.0, 10.0));
    }

    #[test]
    fn contained_candidate_collapses() {
        assert_eq!(sanitize_range((12.0, 18.0), &[(10.0, 20.0)]), (12.0, 12.0));
    }

    #[test]
    fn partial_overlaps_are_clipped() {
        assert_eq!(sanitize_range((15.0, 25.0), &[(10.0, 20.0)]), (20.0, 25.0));
        assert_eq!(sanitize_range((5.0, 15.0), &[(10.0, 20.0)]), (5.0, 10.0));
    }

    #[test]
    fn touching_and_disjoint_ranges_are_untouched() {
        assert_eq!(sanitize_range((20.0, 25.0), &[(10.0, 20.0)]), (20.0, 25.0));
        assert_eq!(sanitize_range((0.0, 5.0), &[(10.0, 20.0)]), (0.0, 5.0));
        assert_eq!(sanitize_range((25.0, 30.0), &[]), (25.0, 30.0));
    }

    #[test]
    fn clipping_cascades_across_ranges() {
        let existing = [(30.0, 40.0), (10.0, 20.0)];
        assert_eq!(sanitize_range((15.0, 35.0), &existing), (20.0, 30.0));
    }
}
