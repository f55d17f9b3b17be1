//! End-to-end behaviour of `ProgressBar` driven by a `ManualScheduler`.
//!
//! Frames are advanced 16 ms at a time to mimic a 60 Hz display.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use as_progress::{
    EventKind, Goal, ManualScheduler, Phase, ProgressBar, ProgressBuilder, ProgressEvent,
    ProgressOptions, RenderFrame,
};
use proptest::prelude::*;
use proptest::test_runner::TestRunner;

const FRAME: f64 = 16.0;

struct Harness {
    scheduler: Rc<ManualScheduler>,
    bar: ProgressBar,
    frames: Rc<RefCell<Vec<RenderFrame>>>,
    events: Rc<RefCell<Vec<ProgressEvent>>>,
}

impl Harness {
    fn new(options: ProgressOptions) -> Self {
        Self::with_builder(ProgressBuilder::new(options))
    }

    fn with_builder(builder: ProgressBuilder) -> Self {
        let scheduler = Rc::new(ManualScheduler::new());
        let frames = Rc::new(RefCell::new(Vec::new()));
        let events = Rc::new(RefCell::new(Vec::new()));

        let (f, e) = (frames.clone(), events.clone());
        let bar = builder
            .on_any(move |event| e.borrow_mut().push(*event))
            .build(scheduler.clone(), move |frame: &RenderFrame| f.borrow_mut().push(frame.clone()));

        Self { scheduler, bar, frames, events }
    }

    fn run(&self) -> usize {
        self.scheduler.run_until_idle(FRAME, 100_000)
    }

    fn count(&self, kind: EventKind) -> usize {
        self.events.borrow().iter().filter(|e| e.kind() == kind).count()
    }

    fn last_frame(&self) -> RenderFrame {
        self.frames.borrow().last().cloned().expect("nothing rendered")
    }

    fn clear(&self) {
        self.frames.borrow_mut().clear();
        self.events.borrow_mut().clear();
    }
}

#[test]
fn construction_announces_and_renders_first_value() {
    let h = Harness::with_builder(ProgressBuilder::new(ProgressOptions::default()).first(25.0));

    assert_eq!(
        *h.events.borrow(),
        vec![
            ProgressEvent::Init,
            ProgressEvent::Update(25.0),
            ProgressEvent::Reset,
            ProgressEvent::Ready,
        ]
    );
    assert_eq!(
        h.last_frame(),
        RenderFrame { percentage: 25.0, value: 25.0, label: "25%".into() }
    );
    assert_eq!(h.bar.get(), 25.0);
    assert_eq!(h.scheduler.pending_frames(), 0);
}

#[test]
fn start_runs_to_the_configured_goal_and_finishes_once() {
    let h = Harness::new(ProgressOptions::default());
    h.clear();

    h.bar.start();
    assert!(h.bar.is_running());
    let advances = h.run();

    // 20 ms per 1% over the full range: two seconds at 16 ms a frame.
    assert_eq!(advances, 125);
    assert_eq!(
        h.last_frame(),
        RenderFrame { percentage: 100.0, value: 100.0, label: "100%".into() }
    );
    assert_eq!(h.bar.get(), 100.0);
    assert_eq!(h.bar.phase(), Phase::Finished);
    assert_eq!(h.count(EventKind::Start), 1);
    assert_eq!(h.count(EventKind::Finish), 1);
    assert_eq!(h.events.borrow().first(), Some(&ProgressEvent::Start));
    assert_eq!(h.events.borrow().last(), Some(&ProgressEvent::Finish));
}

#[test]
fn rendered_values_are_monotonic_while_increasing() {
    let h = Harness::new(ProgressOptions::default());
    h.clear();
    h.bar.start();
    h.run();

    let values: Vec<f64> = h.frames.borrow().iter().map(|f| f.value).collect();
    assert!(values.windows(2).all(|w| w[0] <= w[1]), "{:?}", values);
}

#[test]
fn stop_freezes_the_value_and_silences_updates() {
    let h = Harness::new(ProgressOptions::default());
    h.bar.start();
    for _ in 0..10 {
        h.scheduler.advance(FRAME);
    }
    let frozen = h.bar.get();
    assert_eq!(frozen, 8.0);

    h.bar.stop();
    let updates = h.count(EventKind::Update);
    assert_eq!(h.scheduler.pending_frames(), 0);

    h.scheduler.advance(FRAME * 50.0);
    assert_eq!(h.bar.get(), frozen);
    assert!(frozen > 0.0 && frozen < 100.0);
    assert_eq!(h.count(EventKind::Update), updates);
    assert_eq!(h.count(EventKind::Stop), 1);
    assert_eq!(h.bar.phase(), Phase::Idle);
}

#[test]
fn new_run_supersedes_the_old_one() {
    let h = Harness::new(ProgressOptions::default());
    h.bar.go(80.0);
    h.scheduler.advance(FRAME * 10.0);
    assert_eq!(h.bar.get(), 8.0);

    h.bar.go(20.0);
    h.bar.go(20.0);
    assert_eq!(h.scheduler.pending_frames(), 1);

    h.run();
    assert_eq!(h.bar.get(), 20.0);
    assert_eq!(h.scheduler.pending_frames(), 0);
}

#[test]
fn percentage_goal_maps_onto_the_range() {
    let h = Harness::new(ProgressOptions { max: 200.0, goal: 200.0, ..ProgressOptions::default() });
    h.bar.go_str("50%");
    h.run();

    assert_eq!(h.bar.get(), 100.0);
    assert_eq!(h.last_frame().percentage, 50.0);
    // Only the configured goal counts as finished.
    assert_eq!(h.count(EventKind::Finish), 0);
}

#[test]
fn goal_above_max_is_clamped() {
    let h = Harness::new(ProgressOptions::default());
    h.bar.go(150.0);
    h.run();
    assert_eq!(h.bar.get(), 100.0);
}

#[test]
fn unparseable_goal_uses_configured_goal() {
    let h = Harness::new(ProgressOptions { goal: 60.0, ..ProgressOptions::default() });
    h.bar.go_str("most of it");
    h.run();
    assert_eq!(h.bar.get(), 60.0);
    assert_eq!(h.count(EventKind::Finish), 1);
}

#[test]
fn decreasing_run_reaches_a_lower_goal() {
    let h = Harness::with_builder(ProgressBuilder::new(ProgressOptions::default()).first(90.0));
    h.clear();
    h.bar.go(Goal::Value(10.0));
    h.run();

    assert_eq!(h.bar.get(), 10.0);
    let values: Vec<f64> = h.frames.borrow().iter().map(|f| f.value).collect();
    assert!(values.windows(2).all(|w| w[0] >= w[1]), "{:?}", values);
}

#[test]
fn go_to_current_value_takes_one_frame() {
    let h = Harness::new(ProgressOptions::default());
    h.clear();
    h.bar.go(0.0);
    assert_eq!(h.run(), 1);
    assert_eq!(h.frames.borrow().len(), 1);
}

#[test]
fn reset_restores_first_value_after_animation() {
    let h = Harness::with_builder(ProgressBuilder::new(ProgressOptions::default()).first(5.0));
    h.bar.start();
    h.scheduler.advance(FRAME * 20.0);
    assert!(h.bar.get() > 5.0);

    h.bar.reset();
    assert_eq!(h.bar.get(), 5.0);
    assert_eq!(h.scheduler.pending_frames(), 0);
    assert_eq!(h.events.borrow().last(), Some(&ProgressEvent::Reset));
}

#[test]
fn finish_jumps_to_goal_and_cancels_the_run() {
    let h = Harness::new(ProgressOptions { goal: 75.0, ..ProgressOptions::default() });
    h.bar.start();
    h.scheduler.advance(FRAME);

    h.bar.finish();
    assert_eq!(h.bar.get(), 75.0);
    assert_eq!(h.scheduler.pending_frames(), 0);
    assert_eq!(h.count(EventKind::Finish), 1);
    assert_eq!(h.last_frame().label, "75%");
}

#[test]
fn listener_can_stop_the_bar_mid_frame() {
    let h = Harness::new(ProgressOptions::default());
    let handle = h.bar.downgrade();
    h.bar.on(EventKind::Update, move |event| {
        if event.value().map_or(false, |v| v >= 30.0) {
            if let Some(bar) = handle.upgrade() {
                bar.stop();
            }
        }
    });

    h.bar.start();
    h.run();

    assert!(h.bar.get() >= 30.0 && h.bar.get() < 100.0);
    assert_eq!(h.scheduler.pending_frames(), 0);
    assert_eq!(h.count(EventKind::Finish), 0);
}

#[test]
fn stop_from_start_listener_prevents_the_run() {
    let h = Harness::new(ProgressOptions::default());
    let handle = h.bar.downgrade();
    h.bar.on(EventKind::Start, move |_| {
        if let Some(bar) = handle.upgrade() {
            bar.stop();
        }
    });

    h.bar.start();
    assert_eq!(h.scheduler.pending_frames(), 0);
    assert!(!h.bar.is_running());
    assert_eq!(h.run(), 0);
    assert_eq!(h.bar.get(), 0.0);
}

#[test]
fn go_from_start_listener_keeps_the_new_run_scheduled() {
    let h = Harness::new(ProgressOptions::default());
    let handle = h.bar.downgrade();
    h.bar.on(EventKind::Start, move |_| {
        if let Some(bar) = handle.upgrade() {
            bar.go(30.0);
        }
    });

    h.bar.start();
    assert!(h.bar.is_running());
    assert_eq!(h.scheduler.pending_frames(), 1);

    h.run();
    assert_eq!(h.bar.get(), 30.0);
    assert!(!h.bar.is_running());
    assert_eq!(h.scheduler.pending_frames(), 0);
}

#[test]
fn go_from_update_listener_on_the_last_frame_runs_again() {
    let h = Harness::new(ProgressOptions::default());
    let handle = h.bar.downgrade();
    let redirected = Rc::new(Cell::new(false));
    let r = redirected.clone();
    h.bar.on(EventKind::Update, move |event| {
        if event.value() == Some(100.0) && !r.replace(true) {
            if let Some(bar) = handle.upgrade() {
                bar.go(40.0);
            }
        }
    });

    h.bar.start();
    h.run();

    assert!(redirected.get());
    assert_eq!(h.bar.get(), 40.0);
    assert_eq!(h.last_frame().value, 40.0);
    assert!(!h.bar.is_running());
    assert_eq!(h.scheduler.pending_frames(), 0);
}

#[test]
fn restart_from_finish_listener_runs_again() {
    let h = Harness::new(ProgressOptions::default());
    let handle = h.bar.downgrade();
    let laps = Rc::new(RefCell::new(0));
    let l = laps.clone();
    h.bar.on(EventKind::Finish, move |_| {
        *l.borrow_mut() += 1;
        if *l.borrow() < 3 {
            if let Some(bar) = handle.upgrade() {
                bar.reset();
                bar.start();
            }
        }
    });

    h.bar.start();
    h.run();
    assert_eq!(*laps.borrow(), 3);
    assert_eq!(h.bar.get(), 100.0);
}

#[test]
fn custom_label_receives_raw_value() {
    let builder = ProgressBuilder::new(ProgressOptions { max: 10.0, goal: 10.0, ..ProgressOptions::default() })
        .label(|value, range| format!("{} of {}", value, range.max));
    let h = Harness::with_builder(builder);
    h.bar.finish();
    assert_eq!(h.last_frame().label, "10 of 10");
    assert_eq!(h.last_frame().percentage, 100.0);
}

#[test]
fn destroy_cancels_and_goes_quiet() {
    let h = Harness::new(ProgressOptions::default());
    h.bar.start();
    h.scheduler.advance(FRAME);

    h.bar.destroy();
    assert_eq!(h.scheduler.pending_frames(), 0);
    assert_eq!(h.events.borrow().last(), Some(&ProgressEvent::Destroy));
    let seen = h.events.borrow().len();

    h.bar.start();
    h.bar.reset();
    h.bar.destroy();
    h.run();
    assert_eq!(h.events.borrow().len(), seen);
    assert!(h.bar.is_destroyed());
}

#[test]
fn repeated_transitions_are_harmless() {
    let h = Harness::new(ProgressOptions::default());
    h.bar.stop();
    h.bar.stop();
    h.bar.finish();
    h.bar.finish();
    h.bar.reset();
    h.bar.reset();
    assert_eq!(h.bar.get(), 0.0);
    assert_eq!(h.scheduler.pending_frames(), 0);
}

#[test]
fn non_finite_speed_never_moves() {
    let h = Harness::new(ProgressOptions { speed: f64::INFINITY, ..ProgressOptions::default() });
    h.bar.start();
    assert_eq!(h.scheduler.run_until_idle(FRAME, 200), 200);
    assert_eq!(h.bar.get(), 0.0);
    assert!(h.bar.is_running());

    h.bar.stop();
    assert_eq!(h.scheduler.pending_frames(), 0);
}

// Properties -----------------------------------------------------------------

#[test]
fn percentage_is_monotonic_and_anchored() {
    let mut runner = TestRunner::default();
    let strategy = (-1_000i32..1_000, 1i32..2_000, 0.0f64..1.0, 0.0f64..1.0);

    runner
        .run(&strategy, |(min, span, a, b)| {
            let min = min as f64;
            let max = min + span as f64;
            let h = Harness::new(ProgressOptions { min, max, ..ProgressOptions::default() });

            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let lo = min + lo * span as f64;
            let hi = min + hi * span as f64;

            prop_assert_eq!(h.bar.percentage_of(min), 0.0);
            prop_assert_eq!(h.bar.percentage_of(max), 100.0);
            prop_assert!(h.bar.percentage_of(lo) <= h.bar.percentage_of(hi));
            Ok(())
        })
        .expect("percentage property failed");
}

#[test]
fn every_run_terminates_at_its_clamped_goal() {
    let mut runner = TestRunner::default();
    let strategy = (
        -500i32..500,
        1i32..1_000,
        0.0f64..=1.0,
        -2_000i32..2_000,
        1u32..100,
    );

    runner
        .run(&strategy, |(min, span, first, goal, speed)| {
            let min = min as f64;
            let max = min + span as f64;
            let first = (min + first * span as f64).round();
            let options = ProgressOptions { min, max, speed: speed as f64, ..ProgressOptions::default() };
            let h = Harness::with_builder(ProgressBuilder::new(options).first(first));

            h.bar.go(goal as f64);
            h.run();

            let expected = (goal as f64).max(min).min(max);
            prop_assert_eq!(h.scheduler.pending_frames(), 0);
            prop_assert_eq!(h.bar.get(), expected);
            prop_assert!(!h.bar.is_running());
            Ok(())
        })
        .expect("termination property failed");
}

#[test]
fn at_most_one_frame_is_ever_pending() {
    let mut runner = TestRunner::default();
    let strategy = proptest::collection::vec((0i32..=100, 0u8..4), 1..20);

    runner
        .run(&strategy, |steps| {
            let h = Harness::new(ProgressOptions::default());
            for (goal, frames) in steps {
                h.bar.go(goal as f64);
                prop_assert_eq!(h.scheduler.pending_frames(), 1);
                for _ in 0..frames {
                    h.scheduler.advance(FRAME);
                    prop_assert!(h.scheduler.pending_frames() <= 1);
                }
            }
            h.run();
            prop_assert_eq!(h.scheduler.pending_frames(), 0);
            Ok(())
        })
        .expect("single pending frame property failed");
}
