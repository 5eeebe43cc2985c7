//! Headless surface implementation.

use super::{EditSurface, SurfaceFactory, SurfacePlacement};
use kurbo::Size;
use std::cell::RefCell;
use std::rc::Rc;

/// What the hosted surfaces have been asked to do so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceRecord {
    /// Whether a surface is currently on the page.
    pub mounted: bool,
    /// Placement of the most recent mount.
    pub placement: Option<SurfacePlacement>,
    /// Seed of the most recent mount.
    pub seed: String,
    /// Whether the most recent seed was pre-selected.
    pub selected: bool,
    /// Last size requested by the coordinator.
    pub size: Option<Size>,
    pub mounts: usize,
    pub unmounts: usize,
}

/// Surface factory for tests and hosts without an input overlay.
///
/// Every surface it creates writes into one shared [`SurfaceRecord`].
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurfaceFactory {
    record: Rc<RefCell<SurfaceRecord>>,
}

impl HeadlessSurfaceFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the shared record.
    pub fn record(&self) -> SurfaceRecord {
        self.record.borrow().clone()
    }
}

impl SurfaceFactory for HeadlessSurfaceFactory {
    fn create(&mut self) -> Box<dyn EditSurface> {
        Box::new(HeadlessSurface {
            record: Rc::clone(&self.record),
        })
    }
}

struct HeadlessSurface {
    record: Rc<RefCell<SurfaceRecord>>,
}

impl EditSurface for HeadlessSurface {
    fn mount(&mut self, placement: &SurfacePlacement, seed: &str, select_all: bool) {
        let mut record = self.record.borrow_mut();
        record.mounted = true;
        record.placement = Some(placement.clone());
        record.seed = seed.to_string();
        record.selected = select_all;
        record.mounts += 1;
    }

    fn resize(&mut self, size: Size) {
        self.record.borrow_mut().size = Some(size);
    }

    fn unmount(&mut self) {
        let mut record = self.record.borrow_mut();
        record.mounted = false;
        record.unmounts += 1;
    }
}
