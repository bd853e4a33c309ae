use std::cell::{Cell as Flag, RefCell};
use std::rc::Rc;

use super::*;
use crate::grid::builder::Cell;

#[derive(Clone, Debug, PartialEq)]
enum Event {
    Fit(f64, f64),
    Paint { cells: usize, background: bool },
    Erase(i32, i32),
    Teardown,
    Complete,
}

type Log = Rc<RefCell<Vec<Event>>>;

struct RecordingSurface {
    log: Log,
    fail_fit: bool,
}

impl RecordingSurface {
    fn new(log: &Log) -> Self {
        Self {
            log: Rc::clone(log),
            fail_fit: false,
        }
    }
}

impl CurtainSurface for RecordingSurface {
    fn fit(&mut self, viewport: Viewport, _dpr: f64) -> CurtainResult<()> {
        if self.fail_fit {
            return Err(CurtainError::surface("no buffer"));
        }
        self.log
            .borrow_mut()
            .push(Event::Fit(viewport.width, viewport.height));
        Ok(())
    }

    fn paint_curtain(
        &mut self,
        grid: &Grid,
        background: Option<&PreparedImage>,
    ) -> CurtainResult<()> {
        self.log.borrow_mut().push(Event::Paint {
            cells: grid.len(),
            background: background.is_some(),
        });
        Ok(())
    }

    fn erase_hex(&mut self, cell: &Cell) -> CurtainResult<()> {
        self.log.borrow_mut().push(Event::Erase(cell.col, cell.row));
        Ok(())
    }

    fn teardown(&mut self) {
        self.log.borrow_mut().push(Event::Teardown);
    }
}

fn config(batch_size: usize, reduced_motion: bool) -> CurtainConfig {
    let mut cfg = CurtainConfig::default();
    cfg.dissolve.batch_size = batch_size;
    cfg.dissolve.seed = Some(42);
    cfg.reduced_motion = reduced_motion;
    cfg
}

fn engine(log: &Log, batch_size: usize, reduced_motion: bool) -> DissolveEngine<RecordingSurface> {
    DissolveEngine::new(
        RecordingSurface::new(log),
        &config(batch_size, reduced_motion),
        Viewport::new(400.0, 300.0),
        1.0,
    )
    .unwrap()
}

fn completion_hook(log: &Log) -> OnComplete {
    let log = Rc::clone(log);
    Box::new(move || log.borrow_mut().push(Event::Complete))
}

fn count(log: &Log, pred: impl Fn(&Event) -> bool) -> usize {
    log.borrow().iter().filter(|e| pred(e)).count()
}

#[test]
fn new_fits_builds_and_paints_once() {
    let log = Log::default();
    let e = engine(&log, 5, false);
    assert!(!e.grid().is_empty());
    assert_eq!(
        *log.borrow(),
        vec![
            Event::Fit(400.0, 300.0),
            Event::Paint {
                cells: e.grid().len(),
                background: false
            }
        ]
    );
    assert_eq!(e.state(), DissolveState::Idle);
    assert_eq!(e.generation(), 0);
    assert!(e.erased().is_empty());
}

#[test]
fn dissolve_erases_every_cell_then_completes_once() {
    let log = Log::default();
    let mut e = engine(&log, 7, false);
    let n = e.grid().len();
    assert_eq!(
        e.start(RevealPolicy::Random, completion_hook(&log)).unwrap(),
        StartOutcome::Started
    );

    let mut ticks = 0;
    loop {
        let status = e.tick(16.0).unwrap();
        ticks += 1;
        if status.done {
            break;
        }
        assert!(ticks < 10_000);
    }
    assert_eq!(ticks, n.div_ceil(7));
    assert_eq!(e.erased().len(), n);
    assert!((0..n).all(|i| e.is_erased(i)));
    assert_eq!(e.state(), DissolveState::Done);

    assert_eq!(count(&log, |ev| matches!(ev, Event::Erase(..))), n);
    assert_eq!(count(&log, |ev| *ev == Event::Complete), 1);
    assert_eq!(log.borrow().last(), Some(&Event::Complete));

    // Further ticks are inert.
    let after = e.tick(16.0).unwrap();
    assert_eq!(after.erased, 0);
    assert!(after.done);
    assert_eq!(count(&log, |ev| *ev == Event::Complete), 1);
}

#[test]
fn second_start_is_rejected() {
    let log = Log::default();
    let mut e = engine(&log, 5, false);
    e.start(RevealPolicy::Sequential, completion_hook(&log))
        .unwrap();
    assert_eq!(
        e.start(RevealPolicy::Random, completion_hook(&log)).unwrap(),
        StartOutcome::Rejected
    );
    assert_eq!(e.run_count(), 1);
}

#[test]
fn reduced_motion_finishes_in_one_tick() {
    let log = Log::default();
    let mut e = engine(&log, 3, true);
    let n = e.grid().len();
    e.start(RevealPolicy::Random, completion_hook(&log)).unwrap();
    let status = e.tick(16.0).unwrap();
    assert!(status.done);
    assert_eq!(status.erased, n);
    assert_eq!(count(&log, |ev| *ev == Event::Complete), 1);
}

#[test]
fn resize_rebuilds_only_while_idle() {
    let log = Log::default();
    let mut e = engine(&log, 5, false);
    assert_eq!(
        e.resize(Viewport::new(800.0, 600.0), 2.0).unwrap(),
        ResizeOutcome::Rebuilt
    );
    assert_eq!(e.viewport(), Viewport::new(800.0, 600.0));
    assert_eq!(e.generation(), 1);
    let paints = count(&log, |ev| matches!(ev, Event::Paint { .. }));
    assert_eq!(paints, 2);

    e.start(RevealPolicy::Sequential, completion_hook(&log))
        .unwrap();
    e.tick(16.0).unwrap();
    let cells = e.grid().len();
    assert_eq!(
        e.resize(Viewport::new(300.0, 200.0), 1.0).unwrap(),
        ResizeOutcome::Ignored
    );
    assert_eq!(e.grid().len(), cells);
    assert_eq!(e.generation(), 1);
    assert_eq!(count(&log, |ev| matches!(ev, Event::Paint { .. })), paints);
}

#[test]
fn reset_drops_the_run_and_allows_a_new_one() {
    let log = Log::default();
    let mut e = engine(&log, 5, false);
    e.start(RevealPolicy::Sequential, completion_hook(&log))
        .unwrap();
    e.tick(16.0).unwrap();
    assert_eq!(e.erased().len(), 5);

    e.reset(Viewport::new(400.0, 300.0), 1.0).unwrap();
    assert!(e.erased().is_empty());
    assert_eq!(e.state(), DissolveState::Idle);
    assert_eq!(e.generation(), 1);

    e.start(RevealPolicy::Sequential, completion_hook(&log))
        .unwrap();
    while !e.tick(16.0).unwrap().done {}
    assert_eq!(e.run_count(), 2);
    // The first run's hook was dropped by the reset.
    assert_eq!(count(&log, |ev| *ev == Event::Complete), 1);
}

#[test]
fn teardown_cancels_a_running_dissolve() {
    let log = Log::default();
    let mut e = engine(&log, 4, false);
    e.start(RevealPolicy::Random, completion_hook(&log)).unwrap();
    e.tick(16.0).unwrap();
    e.teardown();
    assert_eq!(e.state(), DissolveState::Cancelled);
    let erases = count(&log, |ev| matches!(ev, Event::Erase(..)));
    let status = e.tick(16.0).unwrap();
    assert_eq!(status.erased, 0);
    assert_eq!(count(&log, |ev| matches!(ev, Event::Erase(..))), erases);
    assert_eq!(count(&log, |ev| *ev == Event::Complete), 0);
    assert_eq!(log.borrow().last(), Some(&Event::Teardown));
}

#[test]
fn background_repaints_before_the_run_only() {
    let log = Log::default();
    let mut e = engine(&log, 4, false);
    let bg = PreparedImage {
        width: 1,
        height: 1,
        rgba8_premul: std::sync::Arc::new(vec![0, 0, 0, 255]),
    };
    e.set_background(Some(bg.clone())).unwrap();
    assert!(matches!(
        log.borrow().last(),
        Some(Event::Paint {
            background: true,
            ..
        })
    ));

    e.start(RevealPolicy::Random, completion_hook(&log)).unwrap();
    let before = log.borrow().len();
    e.set_background(None).unwrap();
    assert_eq!(log.borrow().len(), before);
}

#[test]
fn zero_viewport_dissolve_completes_immediately() {
    let log = Log::default();
    let mut e = DissolveEngine::new(
        RecordingSurface::new(&log),
        &config(5, false),
        Viewport::new(0.0, 0.0),
        1.0,
    )
    .unwrap();
    assert!(e.grid().is_empty());
    e.start(RevealPolicy::Random, completion_hook(&log)).unwrap();
    assert!(e.tick(16.0).unwrap().done);
    assert_eq!(count(&log, |ev| *ev == Event::Complete), 1);
}

#[test]
fn startup_failures_surface_as_errors() {
    let log = Log::default();
    let mut surface = RecordingSurface::new(&log);
    surface.fail_fit = true;
    let err = DissolveEngine::new(surface, &config(5, false), Viewport::new(10.0, 10.0), 1.0)
        .unwrap_err();
    assert!(matches!(err, CurtainError::Surface(_)));

    let bad = DissolveEngine::new(
        RecordingSurface::new(&log),
        &config(0, false),
        Viewport::new(10.0, 10.0),
        1.0,
    );
    assert!(matches!(bad, Err(CurtainError::Validation(_))));
}

#[test]
fn seeded_random_order_is_reproducible() {
    let erase_log = |seed: u64| {
        let log = Log::default();
        let mut e = engine(&log, 1000, false).with_rng(Rng64::new(seed));
        e.start(RevealPolicy::Random, Box::new(|| {})).unwrap();
        e.tick(16.0).unwrap();
        let events = log.borrow().clone();
        events
    };
    assert_eq!(erase_log(9), erase_log(9));
    assert_ne!(erase_log(9), erase_log(10));
}

#[test]
fn completion_flag_is_visible_after_the_final_tick() {
    let log = Log::default();
    let mut e = engine(&log, 50, false);
    let done = Rc::new(Flag::new(false));
    let flag = Rc::clone(&done);
    e.start(RevealPolicy::Sequential, Box::new(move || flag.set(true)))
        .unwrap();
    while !e.tick(16.0).unwrap().done {
        assert!(!done.get());
    }
    assert!(done.get());
}
