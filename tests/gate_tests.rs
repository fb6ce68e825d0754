//! Construction gating: data arrival and visibility in either order.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::*;
use tilemapview::chart_spec::build_chart_spec;
use tilemapview::render::{Frame, RecordingBackend, Scene};
use tilemapview::visibility::{ManualVisibility, VisibilityGate};
use tilemapview::{ChartOptions, DataSet, Orchestrator, Phase, TileMapError, TileMapResult};

type Shared<T> = Rc<RefCell<T>>;

/// Orchestrator whose mount paints into a recording backend.
struct Harness {
    orchestrator: Shared<Orchestrator<Box<dyn FnMut(&DataSet) -> TileMapResult<()>>>>,
    manual: ManualVisibility,
    gate: VisibilityGate<ManualVisibility>,
    backend: Shared<RecordingBackend>,
}

impl Harness {
    fn new() -> Self {
        let backend = Rc::new(RefCell::new(RecordingBackend::new()));
        let sink = Rc::clone(&backend);
        let mount: Box<dyn FnMut(&DataSet) -> TileMapResult<()>> =
            Box::new(move |data: &DataSet| {
                let spec = build_chart_spec(data, &ChartOptions::default());
                Frame::new(&spec, 800.0).paint(&mut *sink.borrow_mut(), 1.0)
            });
        let orchestrator = Rc::new(RefCell::new(Orchestrator::new(mount)));

        let manual = ManualVisibility::new();
        let mut gate = VisibilityGate::new(manual.clone());
        let weak = Rc::downgrade(&orchestrator);
        gate.watch(move || {
            if let Some(o) = weak.upgrade() {
                o.borrow_mut().mark_visible();
            }
        });

        Self {
            orchestrator,
            manual,
            gate,
            backend,
        }
    }

    fn deliver(&self, csv: &str) {
        self.orchestrator.borrow_mut().deliver_data(load(csv));
    }

    fn frames(&self) -> usize {
        self.backend.borrow().frames
    }

    fn last_scene(&self) -> Scene {
        self.backend.borrow().last.clone().expect("a frame was painted")
    }

    fn phase(&self) -> Phase {
        self.orchestrator.borrow().phase()
    }
}

#[test]
fn data_then_visible() {
    let h = Harness::new();
    h.deliver(NORTH_AFRICA_CSV);
    assert_eq!(h.frames(), 0);
    h.manual.show();
    assert_eq!(h.frames(), 1);
    assert_eq!(h.phase(), Phase::Constructed);
}

#[test]
fn visible_then_data() {
    let h = Harness::new();
    h.manual.show();
    assert!(h.gate.is_visible());
    assert_eq!(h.frames(), 0);
    h.deliver(NORTH_AFRICA_CSV);
    assert_eq!(h.frames(), 1);
}

#[test]
fn order_does_not_change_the_scene() {
    let a = Harness::new();
    a.deliver(ALL_CLASSES_CSV);
    a.manual.show();

    let b = Harness::new();
    b.manual.show();
    b.deliver(ALL_CLASSES_CSV);

    assert_eq!(a.last_scene(), b.last_scene());
}

#[test]
fn scrolling_away_and_back_constructs_once() {
    let h = Harness::new();
    h.deliver(NORTH_AFRICA_CSV);
    h.manual.show();
    h.manual.hide();
    h.manual.show();
    h.deliver(ALL_CLASSES_CSV);
    assert_eq!(h.frames(), 1);
    assert_eq!(h.orchestrator.borrow().data().map(DataSet::len), Some(2));
}

#[test]
fn fetch_failure_never_constructs() {
    let h = Harness::new();
    h.orchestrator.borrow_mut().fail(&TileMapError::Http {
        status: 404,
        status_text: "Not Found".into(),
    });
    h.manual.show();
    assert_eq!(h.frames(), 0);
    assert_eq!(h.phase(), Phase::Failed);
}

#[test]
fn unmount_before_visibility_never_constructs() {
    let mut h = Harness::new();
    h.deliver(NORTH_AFRICA_CSV);
    h.orchestrator.borrow_mut().unmount();
    h.gate.disconnect();
    h.manual.show();
    assert_eq!(h.frames(), 0);
    assert_eq!(h.phase(), Phase::Unmounted);
}

#[test]
fn invisible_chart_is_never_built() {
    let h = Harness::new();
    h.deliver(ALL_CLASSES_CSV);
    assert_eq!(h.frames(), 0);
    assert!(!h.orchestrator.borrow().is_visible());
    assert!(h.orchestrator.borrow().is_data_ready());
}
