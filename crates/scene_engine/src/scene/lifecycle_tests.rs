//! End-to-end lifecycle tests for the scene manager

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::AssetConfig;
use crate::foundation::math::Vec3;
use crate::render::Camera;
use crate::scene::{SceneManager, SceneState};
use crate::scripting::{ScriptCapabilities, ScriptContext, ScriptError, ScriptEvent, ScriptHook, ScriptRegistry};
use crate::testing::ManualAssetSource;

const BOX: &str = r#"{
    "camera": { "position": [0, 0, 6] },
    "lights": [ { "type": "AmbientLight", "intensity": 0.5 } ],
    "objects": [
        {
            "type": "mesh",
            "geometry": { "type": "BoxGeometry", "args": [1, 1, 1] },
            "material": { "type": "MeshStandardMaterial", "color": "ff0000" },
            "name": "box"
        }
    ]
}"#;

const SPHERES: &str = r#"{
    "objects": [
        { "type": "mesh", "geometry": { "type": "SphereGeometry" }, "material": {}, "name": "left" },
        { "type": "mesh", "geometry": { "type": "SphereGeometry" }, "material": { "type": "MeshBasicMaterial" } }
    ]
}"#;

const LIGHTS: &str = r#"{
    "lights": [
        { "type": "AmbientLight", "color": "404040" },
        { "type": "HemisphereLight", "color": 16777215 },
        { "type": "PointLight", "position": [0, 2, 0] }
    ]
}"#;

const DAMAGED: &str = r#"{
    "lights": [
        { "color": "404040" },
        { "type": "PointLight", "intensity": "bright" },
        { "type": "AmbientLight" },
        { "type": "PointLight", "position": [0, 2, 0] }
    ],
    "objects": [
        { "type": "mesh", "material": {}, "name": "no-geometry" },
        { "type": "mesh", "geometry": { "type": "BoxGeometry", "args": [1, "2"] }, "name": "box" },
        { "type": "model", "mesh": "models/half.obj" }
    ]
}"#;

const OJOS: &str = r#"{
    "lights": [ { "type": "DirectionalLight", "position": [0, 5, 5] } ],
    "objects": [
        {
            "type": "model",
            "material": "models/ojos.mtl",
            "mesh": "models/ojos.obj",
            "position": [0, -1, 0],
            "name": "ojos"
        },
        { "type": "mesh", "geometry": { "type": "PlaneGeometry" }, "material": {}, "name": "floor" }
    ],
    "postProcessing": { "bloom": { "strength": 0.4 } }
}"#;

const OJOS_MTL: &str = "newmtl White\nKd 1 1 1\nnewmtl Black\nKd 0 0 0\n";
const OJOS_OBJ: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\n\
o Left\nusemtl White\nf 1 2 3\nusemtl Black\nf 1 3 2\n\
o Right\nusemtl White\nf 1 2 3\n";

type Events = Rc<RefCell<Vec<String>>>;

struct RecordingHook {
    events: Events,
}

impl ScriptHook for RecordingHook {
    fn capabilities(&self) -> ScriptCapabilities {
        ScriptCapabilities::all()
    }

    fn update(&mut self, ctx: &mut ScriptContext<'_>) {
        self.events.borrow_mut().push(format!("update {}", ctx.scene_name));
    }

    fn on_mouse_move(&mut self, _ctx: &mut ScriptContext<'_>, x: f32, y: f32) {
        self.events.borrow_mut().push(format!("move {x} {y}"));
    }

    fn key_pressed(&mut self, _ctx: &mut ScriptContext<'_>, key: &str) {
        self.events.borrow_mut().push(format!("key {key}"));
    }
}

fn registry(events: &Events) -> ScriptRegistry {
    let box_events = Rc::clone(events);
    let ojos_events = Rc::clone(events);
    ScriptRegistry::new()
        .with("box", move |_ctx: &mut ScriptContext<'_>| {
            Ok(Box::new(RecordingHook { events: Rc::clone(&box_events) }) as Box<dyn ScriptHook>)
        })
        .with("ojos", move |ctx: &mut ScriptContext<'_>| {
            // The model must already be attached when the script starts
            ctx.graph
                .find_by_name("ojos")
                .ok_or_else(|| ScriptError::NodeNotFound("ojos".to_string()))?;
            ojos_events.borrow_mut().push("bound ojos".to_string());
            Ok(Box::new(RecordingHook { events: Rc::clone(&ojos_events) }) as Box<dyn ScriptHook>)
        })
}

fn setup() -> (SceneManager, ManualAssetSource, Events) {
    crate::foundation::logging::init_for_tests();
    let source = ManualAssetSource::new();
    let events = Events::default();
    let manager = SceneManager::new(
        Rc::new(source.clone()),
        AssetConfig::default(),
        Camera::default(),
        registry(&events),
    );
    (manager, source, events)
}

fn apply(manager: &mut SceneManager, source: &ManualAssetSource, name: &str, json: &str) {
    manager.request_scene(name);
    source.complete(&format!("scenes/{name}.json"), json);
    manager.poll();
}

#[test]
fn test_scene_applies_and_binds_script() {
    let (mut manager, source, events) = setup();
    assert_eq!(manager.state(), SceneState::Idle);

    manager.request_scene("box");
    assert_eq!(manager.state(), SceneState::Loading("box".to_string()));
    assert!(!manager.poll());

    source.complete("scenes/box.json", BOX);
    assert!(manager.poll());

    assert_eq!(manager.state(), SceneState::Applied("box".to_string()));
    assert_eq!(manager.current_scene(), Some("box"));
    assert!(manager.pending_scene().is_none());
    assert_eq!(manager.graph().light_count(), 1);
    assert!(manager.graph().find_by_name("box").is_some());
    assert_eq!(manager.camera().position, Vec3::new(0.0, 0.0, 6.0));
    assert_eq!(manager.scripts().bound_scene(), Some("box"));

    assert!(manager.dispatch_script(ScriptEvent::Update));
    assert_eq!(*events.borrow(), vec!["update box".to_string()]);
}

#[test]
fn test_repeat_request_is_served_from_cache() {
    let (mut manager, source, _) = setup();
    apply(&mut manager, &source, "box", BOX);
    let first = manager.loader().cache().get("box").unwrap();

    // Pending is clear, so this is a fresh request that re-applies
    manager.request_scene("box");
    assert!(manager.poll());

    assert_eq!(source.fetch_count("scenes/box.json"), 1);
    assert!(std::sync::Arc::ptr_eq(&first, &manager.loader().cache().get("box").unwrap()));
    assert_eq!(manager.current_scene(), Some("box"));
    assert_eq!(manager.resources().live_geometry_count(), 1);
    assert_eq!(manager.resources().live_material_count(), 1);
}

#[test]
fn test_duplicate_request_loads_once() {
    let (mut manager, source, _) = setup();

    manager.request_scene("box");
    manager.request_scene("box");

    assert_eq!(source.fetch_count("scenes/box.json"), 1);
    assert_eq!(manager.loads_in_flight(), 1);
}

#[test]
fn test_last_request_wins_when_both_resolve_together() {
    let (mut manager, source, _) = setup();

    manager.request_scene("box");
    manager.request_scene("spheres");
    source.complete("scenes/box.json", BOX);
    source.complete("scenes/spheres.json", SPHERES);
    manager.poll();

    assert_eq!(manager.current_scene(), Some("spheres"));
    assert!(manager.graph().find_by_name("box").is_none());
    assert!(manager.graph().find_by_name("left").is_some());
    assert_eq!(manager.graph().mesh_count(), 2);
    // Box was never applied, so its camera pose was never used
    assert_eq!(manager.camera().position, Vec3::new(0.0, 0.0, 5.0));
}

#[test]
fn test_stale_load_after_newer_apply_is_dropped() {
    let (mut manager, source, _) = setup();

    manager.request_scene("box");
    manager.request_scene("spheres");
    source.complete("scenes/spheres.json", SPHERES);
    manager.poll();
    assert_eq!(manager.current_scene(), Some("spheres"));

    source.complete("scenes/box.json", BOX);
    manager.poll();

    assert_eq!(manager.current_scene(), Some("spheres"));
    assert!(manager.graph().find_by_name("box").is_none());
    // The fetch succeeded, so it is cached even though it was never applied
    assert!(manager.loader().cache().contains("box"));
}

#[test]
fn test_scene_swap_releases_previous_resources() {
    let (mut manager, source, _) = setup();

    apply(&mut manager, &source, "box", BOX);
    assert_eq!(manager.resources().live_geometry_count(), 1);

    apply(&mut manager, &source, "spheres", SPHERES);
    assert_eq!(manager.resources().live_geometry_count(), 2);
    assert_eq!(manager.resources().live_material_count(), 2);
    assert_eq!(manager.graph().light_count(), 0);
    // Camera pose persists when the new scene has none
    assert_eq!(manager.camera().position, Vec3::new(0.0, 0.0, 6.0));

    manager.teardown();
    assert_eq!(manager.resources().live_geometry_count(), 0);
    assert_eq!(manager.resources().live_material_count(), 0);
    assert_eq!(manager.graph().node_count(), 1);
    assert_eq!(manager.state(), SceneState::Idle);
}

#[test]
fn test_unknown_light_kind_is_skipped() {
    let (mut manager, source, _) = setup();
    apply(&mut manager, &source, "lights", LIGHTS);

    assert_eq!(manager.current_scene(), Some("lights"));
    assert_eq!(manager.graph().light_count(), 2);
}

#[test]
fn test_scene_without_script_dispatches_nothing() {
    let (mut manager, source, events) = setup();
    apply(&mut manager, &source, "spheres", SPHERES);

    assert!(!manager.scripts().is_bound());
    assert!(!manager.dispatch_script(ScriptEvent::Update));
    assert!(!manager.dispatch_script(ScriptEvent::MouseMove { x: 0.5, y: -0.5 }));
    assert!(!manager.dispatch_script(ScriptEvent::KeyPressed("a")));
    assert!(events.borrow().is_empty());
}

#[test]
fn test_failed_load_leaves_current_scene() {
    let (mut manager, source, _) = setup();
    apply(&mut manager, &source, "box", BOX);

    manager.request_scene("missing");
    source.fail("scenes/missing.json");
    manager.poll();

    assert_eq!(manager.state(), SceneState::Applied("box".to_string()));
    assert!(manager.graph().find_by_name("box").is_some());

    // Not suppressed as a duplicate, and not served from cache
    manager.request_scene("missing");
    assert_eq!(source.fetch_count("scenes/missing.json"), 2);
}

#[test]
fn test_malformed_document_is_a_load_failure() {
    let (mut manager, source, _) = setup();
    apply(&mut manager, &source, "broken", r#"{ "objects": "nope" }"#);

    assert_eq!(manager.state(), SceneState::Idle);
    assert!(!manager.loader().cache().contains("broken"));
}

#[test]
fn test_malformed_entries_are_skipped_individually() {
    let (mut manager, source, _) = setup();
    apply(&mut manager, &source, "damaged", DAMAGED);

    assert_eq!(manager.state(), SceneState::Applied("damaged".to_string()));
    assert_eq!(manager.graph().light_count(), 2);
    assert_eq!(manager.graph().mesh_count(), 1);
    assert!(manager.graph().find_by_name("box").is_some());
    assert!(manager.graph().find_by_name("no-geometry").is_none());
    assert_eq!(manager.resources().live_geometry_count(), 1);
    // The model entry lacks its material path and is never fetched
    assert_eq!(source.fetch_count("models/half.obj"), 0);
}

#[test]
fn test_models_attach_before_script_binds() {
    let (mut manager, source, events) = setup();
    source.serve("models/ojos.mtl", OJOS_MTL);
    source.serve("models/ojos.obj", OJOS_OBJ);

    apply(&mut manager, &source, "ojos", OJOS);

    assert_eq!(manager.current_scene(), Some("ojos"));
    assert_eq!(events.borrow().first().map(String::as_str), Some("bound ojos"));

    let graph = manager.graph();
    let ojos = graph.find_by_name("ojos").unwrap();
    assert_eq!(graph.parent(ojos), Some(graph.root()));
    assert_eq!(graph.get(ojos).unwrap().transform.position, Vec3::new(0.0, -1.0, 0.0));
    assert_eq!(graph.children(ojos).len(), 2);
    // Floor plane plus two model meshes
    assert_eq!(manager.resources().live_geometry_count(), 3);
    // Floor material plus White and Black shared across the model
    assert_eq!(manager.resources().live_material_count(), 3);
}

#[test]
fn test_apply_waits_for_model_loads() {
    let (mut manager, source, _) = setup();

    apply(&mut manager, &source, "ojos", OJOS);
    assert_eq!(manager.state(), SceneState::Applying("ojos".to_string()));
    assert!(manager.current_scene().is_none());
    // Synchronous parts are already built
    assert!(manager.graph().find_by_name("floor").is_some());
    assert_eq!(source.waiting("models/ojos.obj"), 0);

    source.complete("models/ojos.mtl", OJOS_MTL);
    manager.poll();
    assert_eq!(source.waiting("models/ojos.obj"), 1);
    assert_eq!(manager.state(), SceneState::Applying("ojos".to_string()));

    source.complete("models/ojos.obj", OJOS_OBJ);
    manager.poll();
    assert_eq!(manager.state(), SceneState::Applied("ojos".to_string()));
    assert!(manager.scripts().is_bound());
}

#[test]
fn test_failed_model_is_skipped() {
    let (mut manager, source, _) = setup();
    source.serve_error("models/ojos.mtl");

    apply(&mut manager, &source, "ojos", OJOS);

    assert_eq!(manager.current_scene(), Some("ojos"));
    assert!(manager.graph().find_by_name("ojos").is_none());
    assert!(manager.graph().find_by_name("floor").is_some());
    assert_eq!(source.fetch_count("models/ojos.obj"), 0);
    // The script needs the model node, so nothing is bound
    assert!(!manager.scripts().is_bound());
}

#[test]
fn test_request_during_apply_runs_after_it() {
    let (mut manager, source, events) = setup();
    apply(&mut manager, &source, "box", BOX);
    apply(&mut manager, &source, "ojos", OJOS);
    assert_eq!(manager.state(), SceneState::Applying("ojos".to_string()));

    // The old hook is gone while the new scene is being built
    assert!(!manager.dispatch_script(ScriptEvent::Update));

    manager.request_scene("spheres");
    source.complete("scenes/spheres.json", SPHERES);
    manager.poll();
    assert_eq!(manager.state(), SceneState::Applying("ojos".to_string()));
    assert_eq!(manager.pending_scene(), Some("spheres"));

    source.complete("models/ojos.mtl", OJOS_MTL);
    manager.poll();
    source.complete("models/ojos.obj", OJOS_OBJ);
    manager.poll();

    assert_eq!(manager.state(), SceneState::Applied("spheres".to_string()));
    assert!(events.borrow().contains(&"bound ojos".to_string()));
    assert!(manager.graph().find_by_name("ojos").is_none());
    assert_eq!(manager.resources().live_geometry_count(), 2);
    assert_eq!(manager.resources().live_material_count(), 2);
}

#[test]
fn test_parked_load_is_rechecked_after_apply() {
    let (mut manager, source, _) = setup();
    apply(&mut manager, &source, "ojos", OJOS);

    manager.request_scene("spheres");
    source.complete("scenes/spheres.json", SPHERES);
    manager.poll();

    // Superseded while parked
    manager.request_scene("box");

    source.complete("models/ojos.mtl", OJOS_MTL);
    manager.poll();
    source.complete("models/ojos.obj", OJOS_OBJ);
    manager.poll();

    assert_eq!(manager.current_scene(), Some("ojos"));
    assert_eq!(manager.state(), SceneState::Loading("box".to_string()));
    assert!(manager.graph().find_by_name("left").is_none());

    source.complete("scenes/box.json", BOX);
    manager.poll();
    assert_eq!(manager.current_scene(), Some("box"));
}
