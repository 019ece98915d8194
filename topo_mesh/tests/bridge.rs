use predicates::prelude::*;
use topo_mesh::{
    config::PanelConfig,
    dispatch::{MainThreadQueue, UiBridge},
    geometry::Point,
    query::NO_SAMPLE_TEXT,
    store::MemoryStore,
};

fn document() -> MemoryStore {
    let mut store = MemoryStore::new();
    let survey = store.add_layer("DWG Survey");
    store.add_layer("Terrain");
    store.add_story(0, "Ground", 0.0);
    for (x, y, text) in [(0.0, 0.0, "10.5"), (8.0, 0.0, "11.0"), (0.0, 6.0, "10.75")] {
        store.add_circle(survey, Point::new(x, y));
        store.add_text(survey, Point::new(x + 0.3, y), text);
    }
    store
}

#[test]
fn listings_are_json_arrays() {
    let store = document();
    let queue = MainThreadQueue::new();
    let bridge = UiBridge::new(queue.sender(), PanelConfig::default());

    let layers = bridge.call(&store, "GetLayerList", "").unwrap();
    assert_eq!(
        layers,
        r#"[{"name":"DWG Survey","index":0},{"name":"Terrain","index":1}]"#
    );
    let stories = bridge.call(&store, "GetStoryList", "").unwrap();
    assert!(predicate::str::contains(r#""name":"Ground""#).eval(&stories));
}

#[test]
fn sample_text_previews_first_label() {
    let store = document();
    let queue = MainThreadQueue::new();
    let bridge = UiBridge::new(queue.sender(), PanelConfig::default());
    assert_eq!(
        bridge.call(&store, "GetSampleElevationText", "0").as_deref(),
        Some("10.5")
    );
    assert_eq!(
        bridge.call(&store, "GetSampleElevationText", "1").as_deref(),
        Some(NO_SAMPLE_TEXT)
    );
}

#[test]
fn construction_runs_on_the_main_thread() {
    topo_mesh::logging::init();
    let mut store = document();
    let queue = MainThreadQueue::new();
    let bridge = UiBridge::new(queue.sender(), PanelConfig::default());

    let snapshot = store.clone();
    let accepted = std::thread::spawn(move || {
        bridge.call(
            &snapshot,
            "CreateTopoMesh",
            r#"{"layerIdx":0,"meshLayer":"1","meshName":""}"#,
        )
    })
    .join()
    .unwrap();
    assert_eq!(accepted.as_deref(), Some("true"));
    assert!(store.meshes().is_empty());

    assert_eq!(queue.run_pending(&mut store), 1);
    let meshes = store.meshes();
    assert_eq!(meshes.len(), 1);
    assert_eq!(meshes[0].name, "TopoMesh");
    assert!((meshes[0].geometry.level - 10.5).abs() < 1e-9);
}

#[test]
fn failed_run_is_only_logged() {
    let mut store = document();
    let queue = MainThreadQueue::new();
    let bridge = UiBridge::new(queue.sender(), PanelConfig::default());
    // accepted by the bridge, rejected by validation on the main thread
    assert_eq!(
        bridge.call(&store, "CreateTopoMesh", r#"{"layerIdx":5}"#).as_deref(),
        Some("true")
    );
    assert_eq!(queue.run_pending(&mut store), 1);
    assert!(store.meshes().is_empty());
}
