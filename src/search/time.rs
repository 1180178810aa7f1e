use std::time::Duration;

// Never hand the driver the whole clock.
const SAFETY_MARGIN: Duration = Duration::from_millis(50);

// Rough number of moves the remaining clock still has to cover.
const MOVES_TO_GO: u32 = 20;

/// Depth ceiling for a move given the remaining clock. Monotone: more time
/// never yields a shallower ceiling.
pub fn depth_for(remaining: Duration) -> u32 {
    let ms = remaining.as_millis();
    if ms < 1_000 {
        1
    } else if ms < 10_000 {
        2
    } else if ms < 60_000 {
        3
    } else if ms < 300_000 {
        4
    } else {
        5
    }
}

/// Wall-clock budget for a single move: an even slice of the remaining
/// clock, capped below the clock itself by a safety margin.
pub fn budget_for(remaining: Duration) -> Duration {
    let slice = remaining / MOVES_TO_GO;
    slice.min(remaining.saturating_sub(SAFETY_MARGIN))
}
