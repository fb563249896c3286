use std::cell::RefCell;
use std::rc::Rc;

use hashbrown::HashMap;
use vizij_motion_core::{Config, MotionEngine, NodeTransform, StateSnapshot};

type Nodes = HashMap<String, NodeTransform>;

fn nodes(names: &[&str]) -> Nodes {
    names
        .iter()
        .map(|n| (n.to_string(), NodeTransform::default()))
        .collect()
}

const SWEEP: &str = "0,Arm,position,x,0\n1000,Arm,position,x,10\n";

fn recording_engine() -> (MotionEngine<Nodes>, Rc<RefCell<Vec<StateSnapshot>>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut eng = MotionEngine::new(nodes(&["Arm"]), Config::default());
    let sink = Rc::clone(&seen);
    eng.set_listener(move |s| sink.borrow_mut().push(*s));
    (eng, seen)
}

#[test]
fn listener_sees_each_mutation_synchronously() {
    let (mut eng, seen) = recording_engine();

    eng.load_timeline(SWEEP);
    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(seen.borrow()[0].duration_ms, 1000.0);

    eng.play();
    assert_eq!(seen.borrow().len(), 2);
    assert!(seen.borrow()[1].playing);

    eng.tick(250.0);
    assert_eq!(seen.borrow().len(), 3);
    assert_eq!(seen.borrow()[2].time_ms, 250.0);
    assert_eq!(seen.borrow()[2].progress, 0.25);

    eng.set_speed(2.0).unwrap();
    eng.set_loop(false);
    eng.pause();
    eng.stop();
    let log = seen.borrow();
    assert_eq!(log.len(), 7);
    assert_eq!(log[3].speed, 2.0);
    assert!(!log[4].loop_enabled);
    assert!(!log[5].playing);
    assert_eq!(log[6].time_ms, 0.0);
}

#[test]
fn no_ops_do_not_notify() {
    let (mut eng, seen) = recording_engine();
    eng.load_timeline(SWEEP);
    let before = seen.borrow().len();

    eng.pause(); // already paused
    eng.tick(100.0); // paused ticks do not move time
    assert!(eng.set_speed(-1.0).is_err());
    eng.play();
    eng.play(); // already playing
    eng.set_progress(0.5).unwrap(); // ignored while playing

    assert_eq!(seen.borrow().len(), before + 1);
}

#[test]
fn listener_state_matches_pull_state() {
    let (mut eng, seen) = recording_engine();
    eng.load_timeline(SWEEP);
    eng.set_progress(0.4).unwrap();
    assert_eq!(*seen.borrow().last().unwrap(), eng.state());

    eng.clear_listener();
    eng.stop();
    assert_ne!(*seen.borrow().last().unwrap(), eng.state());
}

#[test]
fn engines_do_not_share_playback_state() {
    let mut a = MotionEngine::new(nodes(&["Arm"]), Config::default());
    let mut b = MotionEngine::new(nodes(&["Arm"]), Config::default());
    a.load_timeline(SWEEP);
    b.load_timeline("0,Arm,position,x,0\n4000,Arm,position,x,40\n");

    a.play();
    a.tick(500.0);
    b.set_speed(3.0).unwrap();

    assert_eq!(a.state().time_ms, 500.0);
    assert_eq!(a.state().speed, 1.0);
    assert_eq!(b.state().time_ms, 0.0);
    assert_eq!(b.state().duration_ms, 4000.0);
    assert!(!b.state().playing);

    assert_eq!(a.resolver()["Arm"].position[0], 5.0);
    assert_eq!(b.resolver()["Arm"].position[0], 0.0);
}

#[test]
fn reload_mid_playback_swaps_timeline_atomically() {
    let mut eng = MotionEngine::new(nodes(&["Arm"]), Config::default());
    eng.load_timeline(SWEEP);
    eng.play();
    eng.tick(900.0);

    eng.load_timeline("0,Arm,scale,z,4\n3000,Arm,scale,z,1\n");
    let st = eng.state();
    assert_eq!(st.duration_ms, 3000.0);
    assert_eq!(st.time_ms, 0.0);
    assert!(!st.playing);
    assert!(eng.outputs().poses["Arm"].scale.z().is_some());
    assert!(!eng.outputs().poses["Arm"].position.any_set());

    // Ticks after the reload see only the new data.
    eng.play();
    eng.tick(1500.0);
    assert_eq!(eng.resolver()["Arm"].scale[2], 2.5);
    assert_eq!(eng.resolver()["Arm"].position[0], 9.0);
}

#[test]
fn advance_frame_uses_fallback_frame_time() {
    let cfg = Config {
        fallback_frame_ms: 100.0,
        ..Config::default()
    };
    let mut eng = MotionEngine::new(nodes(&["Arm"]), cfg);
    eng.load_timeline(SWEEP);
    eng.play();
    eng.advance_frame();
    eng.advance_frame();
    assert_eq!(eng.state().time_ms, 200.0);
}
