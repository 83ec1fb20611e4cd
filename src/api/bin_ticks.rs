/// Number of bin boundaries wanted across `width_px` at `target_spacing_px`.
pub(super) fn bin_tick_target_count(
    width_px: f64,
    target_spacing_px: f64,
    min_ticks: usize,
    max_ticks: usize,
) -> usize {
    if !width_px.is_finite() || width_px <= 0.0 {
        return min_ticks;
    }
    if !target_spacing_px.is_finite() || target_spacing_px <= 0.0 {
        return min_ticks;
    }

    let raw = (width_px / target_spacing_px).floor() as usize + 1;
    raw.clamp(min_ticks, max_ticks)
}

/// Tick generators take the number of intervals rather than boundaries.
pub(super) fn bin_interval_target(tick_count: usize) -> usize {
    tick_count.saturating_sub(1).max(1)
}

#[cfg(test)]
mod tests {
    use super::{bin_interval_target, bin_tick_target_count};

    #[test]
    fn target_count_scales_with_width_and_clamps() {
        assert_eq!(bin_tick_target_count(420.0, 42.0, 2, 24), 11);
        assert_eq!(bin_tick_target_count(10.0, 42.0, 2, 24), 2);
        assert_eq!(bin_tick_target_count(10_000.0, 42.0, 2, 24), 24);
    }

    #[test]
    fn invalid_inputs_fall_back_to_minimum() {
        assert_eq!(bin_tick_target_count(f64::NAN, 42.0, 3, 24), 3);
        assert_eq!(bin_tick_target_count(300.0, 0.0, 3, 24), 3);
        assert_eq!(bin_interval_target(0), 1);
        assert_eq!(bin_interval_target(11), 10);
    }
}
