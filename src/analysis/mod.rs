/// Flow comparison analytics: series alignment, lag shifting, and
/// agreement statistics.

pub mod align;
pub mod stats;
