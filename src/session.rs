/// Comparison session orchestrator.
///
/// Walks one interaction through the pipeline:
///
///   Idle → RangeSelected → PairSelected → LagApplied → Computed
///
/// Every transition is re-enterable: changing the lag recomputes from the
/// cached raw dataset without refetching, changing the reach refetches
/// within the same range, and changing the range restarts the whole
/// pipeline. Nothing beyond the raw fetched series is cached — data
/// volumes are days-to-weeks of hourly values, so recomputing alignment
/// and statistics on every change is cheap and keeps the states honest.
///
/// A session is a per-user value. It is never shared across users or
/// stored globally; concurrent users each own their own session.

use chrono::NaiveDate;

use crate::analysis::align::{align, lag_shift};
use crate::analysis::stats::{flow_stats, StatsOptions};
use crate::ingest::TimeSeriesFetcher;
use crate::model::{AlignedPair, CompareError, DateRange, StatisticReport, TimeSeries};
use crate::stations::{find_reach, Reach};

// ---------------------------------------------------------------------------
// States
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    RangeSelected,
    PairSelected,
    LagApplied,
    Computed,
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "Idle",
            SessionState::RangeSelected => "RangeSelected",
            SessionState::PairSelected => "PairSelected",
            SessionState::LagApplied => "LagApplied",
            SessionState::Computed => "Computed",
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

pub struct ComparisonSession {
    options: StatsOptions,
    range: Option<DateRange>,
    reach: Option<&'static Reach>,
    raw_upstream: Option<TimeSeries>,
    raw_downstream: Option<TimeSeries>,
    lag_hours: Option<u32>,
    lagged_pair: Option<AlignedPair>,
    report: Option<StatisticReport>,
}

impl ComparisonSession {
    pub fn new(options: StatsOptions) -> Self {
        ComparisonSession {
            options,
            range: None,
            reach: None,
            raw_upstream: None,
            raw_downstream: None,
            lag_hours: None,
            lagged_pair: None,
            report: None,
        }
    }

    /// Current position in the pipeline, derived from what has been
    /// produced so far.
    pub fn state(&self) -> SessionState {
        if self.report.is_some() {
            SessionState::Computed
        } else if self.lagged_pair.is_some() {
            SessionState::LagApplied
        } else if self.raw_upstream.is_some() {
            SessionState::PairSelected
        } else if self.range.is_some() {
            SessionState::RangeSelected
        } else {
            SessionState::Idle
        }
    }

    /// `Idle → RangeSelected`. A new range invalidates every downstream
    /// artifact: the raw dataset belongs to the old window, so the whole
    /// pipeline restarts. Because fetching is synchronous, no request from
    /// the previous range can still be in flight here — the superseded
    /// dataset is simply dropped.
    ///
    /// # Errors
    /// `CompareError::InvalidRange` if start is after end; the session
    /// keeps its previous state.
    pub fn select_range(&mut self, start: NaiveDate, end: NaiveDate) -> Result<(), CompareError> {
        let range = DateRange::new(start, end)?;
        self.range = Some(range);
        self.reach = None;
        self.raw_upstream = None;
        self.raw_downstream = None;
        self.lag_hours = None;
        self.lagged_pair = None;
        self.report = None;
        Ok(())
    }

    /// `RangeSelected → PairSelected`. Fetches both stations of the reach
    /// for the selected range and caches the raw dataset. Fetch failures
    /// propagate and leave the session in `RangeSelected`; no partial
    /// dataset is kept.
    pub fn select_reach(
        &mut self,
        key: &str,
        fetcher: &dyn TimeSeriesFetcher,
    ) -> Result<(), CompareError> {
        let range = self.range.ok_or(CompareError::InvalidTransition {
            method: "select_reach",
            state: self.state().name(),
        })?;
        let reach =
            find_reach(key).ok_or_else(|| CompareError::UnknownReach(key.to_string()))?;

        // Selecting a new reach discards the previous pair entirely.
        self.reach = None;
        self.raw_upstream = None;
        self.raw_downstream = None;
        self.lag_hours = None;
        self.lagged_pair = None;
        self.report = None;

        let upstream = fetcher.fetch(&reach.upstream, &range)?;
        let downstream = fetcher.fetch(&reach.downstream, &range)?;

        self.reach = Some(reach);
        self.raw_upstream = Some(upstream);
        self.raw_downstream = Some(downstream);
        Ok(())
    }

    /// `PairSelected → LagApplied`. Shifts the cached upstream series by
    /// `lag_hours` positions, re-aligns against the downstream series, and
    /// drops rows with missing values. Recomputes from the cached raw
    /// dataset only — changing the lag never refetches.
    ///
    /// # Errors
    /// - `CompareError::LagOutOfRange` — lag exceeds the reach bound.
    /// - `CompareError::IrregularSampling` — the upstream series is not
    ///   uniformly hourly, so a positional shift would lie.
    pub fn apply_lag(&mut self, lag_hours: u32) -> Result<(), CompareError> {
        let (reach, upstream, downstream) =
            match (self.reach, &self.raw_upstream, &self.raw_downstream) {
                (Some(r), Some(u), Some(d)) => (r, u, d),
                _ => {
                    return Err(CompareError::InvalidTransition {
                        method: "apply_lag",
                        state: self.state().name(),
                    });
                }
            };

        if lag_hours > reach.max_lag_hours {
            return Err(CompareError::LagOutOfRange {
                lag: lag_hours,
                max: reach.max_lag_hours,
            });
        }

        let shifted = lag_shift(upstream, lag_hours)?;
        let pair = align(&shifted, downstream).drop_missing();

        self.lag_hours = Some(lag_hours);
        self.lagged_pair = Some(pair);
        self.report = None;
        Ok(())
    }

    /// `LagApplied → Computed`. Produces the statistic report over the
    /// lagged, gap-free pair. An empty pair (no overlapping timestamps)
    /// still computes — every metric comes back undefined.
    pub fn compute(&mut self) -> Result<&StatisticReport, CompareError> {
        let pair = self.lagged_pair.as_ref().ok_or(CompareError::InvalidTransition {
            method: "compute",
            state: self.state().name(),
        })?;
        let report = flow_stats(pair, &self.options)?;
        Ok(self.report.insert(report))
    }

    // --- Accessors -----------------------------------------------------------

    pub fn range(&self) -> Option<DateRange> {
        self.range
    }

    pub fn reach(&self) -> Option<&'static Reach> {
        self.reach
    }

    pub fn lag_hours(&self) -> Option<u32> {
        self.lag_hours
    }

    /// The lagged, gap-free pair ready for plotting or CSV export.
    pub fn aligned_pair(&self) -> Option<&AlignedPair> {
        self.lagged_pair.as_ref()
    }

    pub fn report(&self) -> Option<&StatisticReport> {
        self.report.as_ref()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
