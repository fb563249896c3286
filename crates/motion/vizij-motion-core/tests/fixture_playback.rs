use vizij_motion_core::{
    Config, CompiledTimeline, MotionEngine, MotionEvent, NodeIndex, SceneNode, TargetResolver,
};
use vizij_test_fixtures::{configs, motions, scenes};

fn rig_index() -> NodeIndex {
    let scene: SceneNode = scenes::load("rig").expect("rig scene fixture");
    NodeIndex::from_scene(&scene)
}

#[test]
fn rig_scene_indexes_nested_named_nodes() {
    let index = rig_index();
    let mut names: Vec<&str> = index.names().collect();
    names.sort();
    assert_eq!(names, vec!["Arm", "Module_A", "Module_B", "Module_C", "Rig"]);
    assert_eq!(index.get("Module_A").unwrap().position, [0.0, 1.0, 0.0]);
}

#[test]
fn every_scene_fixture_indexes_at_least_one_node() {
    for key in scenes::keys() {
        let scene: SceneNode = scenes::load(&key).unwrap();
        let index = NodeIndex::from_scene(&scene);
        assert!(!index.is_empty(), "scene '{key}' has no named nodes");
    }
}

#[test]
fn config_fixture_json_matches_file_loader() {
    let from_text = Config::from_json_str(&configs::json("semicolon").unwrap()).unwrap();
    let from_file = Config::from_json_file(configs::path("semicolon").unwrap()).unwrap();
    assert_eq!(from_text, from_file);
    assert_eq!(from_text.delimiter, ';');
    assert!(!from_text.initial_loop);
}

#[test]
fn every_fixture_compiles_deterministically() {
    let cfg = Config::default();
    for key in motions::keys() {
        let text = motions::csv(&key).unwrap();
        let a = CompiledTimeline::from_text(&text, &cfg);
        let b = CompiledTimeline::from_text(&text, &cfg);
        assert_eq!(a, b, "fixture '{key}' compiled differently twice");
        assert!(a.duration_ms() >= 1.0);
    }
}

#[test]
fn rig_wave_drives_nodes_and_skips_missing_ones() {
    let mut eng = MotionEngine::new(rig_index(), Config::default());
    eng.load_timeline(&motions::csv("rig-wave").unwrap());
    assert_eq!(eng.state().duration_ms, 2000.0);
    assert_eq!(eng.timeline().track_count(), 6);

    eng.set_loop(false);
    eng.play();
    eng.tick(1000.0);

    let nodes = eng.resolver();
    let a = nodes.get("Module_A").unwrap();
    assert_eq!(a.position[0], 10.0);
    // y/z were never driven and keep the scene's authored values.
    assert_eq!(a.position[1], 1.0);
    assert!((a.rotation[2] - 45f32.to_radians()).abs() < 1e-6);

    let b = nodes.get("Module_B").unwrap();
    assert!((b.scale[0] - (1.0 + 1.0 / 1.5) as f32).abs() < 1e-6);
    assert_eq!(b.scale[2], 1.0);

    assert_eq!(nodes.get("Module_C").unwrap().position[1], -2.0);
    assert!(eng
        .outputs()
        .events
        .contains(&MotionEvent::TargetUnresolved {
            target: "Missing_Node".into()
        }));

    let out = eng.tick(5000.0);
    assert!(out.events.contains(&MotionEvent::PlaybackEnded { time_ms: 2000.0 }));
    assert!(!eng.state().playing);
    let a = eng.resolver().get("Module_A").unwrap();
    assert!((a.rotation[2] - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
}

#[test]
fn messy_fixture_degrades_instead_of_failing() {
    let mut eng = MotionEngine::new(rig_index(), Config::default());
    let report = eng.load_timeline(&motions::csv("messy").unwrap());
    assert!(report.header_skipped);
    assert_eq!(report.dropped, 5);
    assert_eq!(eng.timeline().track_count(), 1);
    assert_eq!(eng.state().duration_ms, 1000.0);

    eng.set_progress(0.5).unwrap();
    assert_eq!(eng.resolver().get("Arm").unwrap().position[0], 5.0);
}

#[test]
fn empty_fixture_yields_unit_duration() {
    let mut eng = MotionEngine::new(rig_index(), Config::default());
    eng.load_timeline(&motions::csv("empty").unwrap());
    assert!(eng.timeline().is_empty());
    assert_eq!(eng.state().duration_ms, 1.0);
}

#[test]
fn load_from_file_matches_load_from_text() {
    let path = motions::path("head-nod").unwrap();
    let mut from_file = MotionEngine::new(rig_index(), Config::default());
    from_file.load_timeline_file(&path).unwrap();

    let mut from_text = MotionEngine::new(rig_index(), Config::default());
    from_text.load_timeline(&motions::csv("head-nod").unwrap());

    assert_eq!(from_file.timeline(), from_text.timeline());
    assert!(from_file
        .load_timeline_file("/no/such/motion.csv")
        .is_err());
    // A failed load leaves the previous timeline in place.
    assert_eq!(from_file.timeline(), from_text.timeline());
}

#[test]
fn config_fixture_changes_parser_and_defaults() {
    let cfg = Config::load_or_default(configs::path("semicolon").unwrap());
    assert_eq!(cfg.delimiter, ';');

    let mut eng = MotionEngine::new(rig_index(), cfg);
    let st = eng.state();
    assert!(!st.loop_enabled);
    assert_eq!(st.speed, 2.0);

    eng.load_timeline("0;Arm;position;z;1\n1000;Arm;position;z;3\n");
    eng.play();
    eng.tick(250.0);
    assert_eq!(eng.state().time_ms, 500.0);
    assert_eq!(eng.resolver_mut().resolve("Arm").unwrap().position[2], 2.0);
}

#[test]
fn reset_to_rest_gives_deterministic_reloads() {
    let mut eng = MotionEngine::new(rig_index(), Config::default());
    eng.load_timeline(&motions::csv("arm-sweep").unwrap());
    eng.set_progress(1.0).unwrap();
    assert_eq!(eng.resolver().get("Arm").unwrap().position[0], 10.0);

    eng.resolver_mut().reset_to_rest();
    eng.load_timeline(&motions::csv("head-nod").unwrap());
    assert_eq!(eng.resolver().get("Arm").unwrap().position[0], 0.0);
}
