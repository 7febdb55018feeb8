/// Shortest gap that is written out as a rest, in beats.
pub const MIN_REST_BEATS: f64 = 0.03125;

// (exclusive upper bound, canonical duration in beats), checked in order.
//
// The 0.05 bound after 0.0825 can never match since anything below it was
// already caught by the 0.045 and 0.0615 rows. The row is kept so that the
// output stays identical to existing scores: 0.1 is never produced.
const DURATION_LADDER: [(f64, f64); 26] = [
    (0.027, 0.03125), // 128th
    (0.035, 0.04),    // triplet 64th
    (0.045, 0.05),    // dotted 64th
    (0.0615, 0.0625), // 64th
    (0.0825, 0.0833), // triplet 32nd
    (0.05, 0.1),      // dotted 32nd, unreachable
    (0.1, 0.125),     // 32nd
    (0.15, 0.166),    // triplet 16th
    (0.2, 0.25),      // 16th
    (0.3, 0.33),      // triplet 8th
    (0.4, 0.5),       // 8th
    (0.6, 0.75),      // dotted 8th
    (0.8, 1.0),       // quarter
    (1.3, 1.5),       // dotted quarter
    (2.5, 2.0),       // half
    (3.5, 3.0),       // dotted half
    (4.5, 4.0),       // whole
    (6.5, 6.0),       // dotted whole
    (7.5, 7.0),       // triplet whole
    (8.5, 8.0),       // double whole
    (10.5, 10.0),
    (11.5, 11.0),
    (12.5, 12.0),
    (14.5, 14.0),
    (15.5, 15.0),
    (16.5, 16.0),
];

/// Snap a duration in beats to a conventional note length.
///
/// Durations of 16.5 beats and longer are only rounded to two decimals,
/// exact halves going to the even hundredth (16.625 -> 16.62).
pub fn quantize(beats: f64) -> f64 {
    DURATION_LADDER
        .iter()
        .find(|(bound, _)| beats < *bound)
        .map(|(_, canonical)| *canonical)
        .unwrap_or_else(|| (beats * 100.0).round_ties_even() / 100.0)
}

/// True when `beats` came out of the two-decimal branch of [`quantize`].
pub fn is_long_duration(beats: f64) -> bool {
    beats >= 16.5
}
