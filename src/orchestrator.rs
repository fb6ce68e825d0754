//! Composition root logic: construct the chart once the data has arrived
//! and the container has been seen, in whichever order those happen.
//!
//! The gate is a conjunction of two write-once signals. Construction runs
//! exactly once, never after [`Orchestrator::unmount`], and never after a
//! fetch failure. A mount that builds asynchronously reports
//! [`Construction::Scheduled`] and later settles the outcome with
//! [`Orchestrator::finish_construction`].

use tracing::{debug, error, warn};

use crate::error::{Result, TileMapError};
use crate::types::DataSet;

/// What a successful [`ChartMount::construct`] call achieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construction {
    /// The chart exists.
    Complete,
    /// The build was started; its outcome arrives later.
    Scheduled,
}

/// Whatever builds the chart once both signals are in.
pub trait ChartMount {
    fn construct(&mut self, data: &DataSet) -> Result<Construction>;
}

impl<F: FnMut(&DataSet) -> Result<()>> ChartMount for F {
    fn construct(&mut self, data: &DataSet) -> Result<Construction> {
        self(data).map(|()| Construction::Complete)
    }
}

/// Where the widget is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for data, visibility, or both.
    Waiting,
    /// Construction was scheduled and has not finished yet.
    Building,
    /// The chart has been constructed.
    Constructed,
    /// The fetch failed; nothing will be rendered.
    Failed,
    /// The chart could not be built.
    RenderFailed,
    /// Torn down; every later signal is ignored.
    Unmounted,
}

/// Holds the loaded data and the two readiness flags.
pub struct Orchestrator<M: ChartMount> {
    mount: M,
    data: Option<DataSet>,
    visible: bool,
    phase: Phase,
}

impl<M: ChartMount> Orchestrator<M> {
    pub fn new(mount: M) -> Self {
        Self {
            mount,
            data: None,
            visible: false,
            phase: Phase::Waiting,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_data_ready(&self) -> bool {
        self.data.is_some()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_constructed(&self) -> bool {
        self.phase == Phase::Constructed
    }

    /// Held data, once loaded.
    pub fn data(&self) -> Option<&DataSet> {
        self.data.as_ref()
    }

    pub fn mount(&self) -> &M {
        &self.mount
    }

    pub fn mount_mut(&mut self) -> &mut M {
        &mut self.mount
    }

    /// Store the loaded data set. Only the first delivery counts.
    pub fn deliver_data(&mut self, data: DataSet) {
        if self.phase != Phase::Waiting {
            debug!(phase = ?self.phase, "ignoring data delivery");
            return;
        }
        if self.data.is_some() {
            warn!("data already delivered; ignoring second delivery");
            return;
        }
        debug!(points = data.len(), "data ready");
        self.data = Some(data);
        self.try_construct();
    }

    /// Record that the container has been seen.
    pub fn mark_visible(&mut self) {
        if self.phase != Phase::Waiting || self.visible {
            return;
        }
        self.visible = true;
        self.try_construct();
    }

    /// Record a fetch failure. The chart will never be constructed.
    pub fn fail(&mut self, err: &TileMapError) {
        if self.phase != Phase::Waiting {
            return;
        }
        error!(error = %err, "failed to load chart data");
        self.phase = Phase::Failed;
    }

    /// Tear down; pending callbacks become no-ops.
    pub fn unmount(&mut self) {
        self.phase = Phase::Unmounted;
        self.data = None;
    }

    fn try_construct(&mut self) {
        if self.phase != Phase::Waiting || !self.visible {
            return;
        }
        let Some(data) = self.data.as_ref() else {
            return;
        };
        match self.mount.construct(data) {
            Ok(Construction::Complete) => {
                debug!("chart constructed");
                self.phase = Phase::Constructed;
            }
            Ok(Construction::Scheduled) => {
                debug!("chart construction scheduled");
                self.phase = Phase::Building;
            }
            Err(err) => {
                error!(error = %err, "chart construction failed");
                self.phase = Phase::RenderFailed;
            }
        }
    }

    /// Settle a [`Construction::Scheduled`] build. Ignored in any other phase,
    /// so a build finishing after unmount changes nothing.
    pub fn finish_construction(&mut self, result: Result<()>) {
        if self.phase != Phase::Building {
            debug!(phase = ?self.phase, "ignoring construction outcome");
            return;
        }
        match result {
            Ok(()) => {
                debug!("chart constructed");
                self.phase = Phase::Constructed;
            }
            Err(err) => {
                error!(error = %err, "chart construction failed");
                self.phase = Phase::RenderFailed;
            }
        }
    }
}
