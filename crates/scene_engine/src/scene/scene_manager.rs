//! # Scene Manager
//!
//! Owns the live scene and drives its lifecycle:
//!
//! 1. `request_scene(name)` records `name` as pending and starts a load.
//! 2. `poll()` pumps in-flight loads. A load whose name is no longer
//!    pending is stale and is dropped; last request wins.
//! 3. Applying a scene clears the old graph, builds the new one, waits for
//!    its external models, then binds the scene's script. Only then does the
//!    scene become current.
//!
//! Applies never overlap. A load that resolves while another scene is being
//! applied is parked and re-checked against the pending name afterwards.
//!
//! Everything runs on the caller's thread. `poll()` uses a no-op waker and
//! simply re-polls whatever the underlying futures report as ready.

use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::{FutureExt, LocalBoxFuture};
use futures::stream::{FuturesUnordered, StreamExt};
use futures::task::noop_waker_ref;

use crate::assets::AssetSource;
use crate::core::AssetConfig;
use crate::render::{Camera, FrameView, GpuResources};
use crate::scene::{
    disposer, instantiator, model, Fetched, LoadError, ModelAsset, ModelError, ObjectSpec,
    Placement, SceneDescription, SceneGraph, SceneLoader,
};
use crate::scripting::{ScriptContext, ScriptEvent, ScriptHost, ScriptRegistry};

/// Lifecycle state as seen from outside
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneState {
    /// Nothing requested and nothing applied
    Idle,
    /// A requested scene is loading
    Loading(String),
    /// A scene is being built
    Applying(String),
    /// Steady state
    Applied(String),
}

type SceneLoadDone = (String, Result<Fetched, LoadError>);

struct ModelLoaded {
    path: String,
    placement: Placement,
    result: Result<ModelAsset, ModelError>,
}

struct ApplyInProgress {
    scene_name: String,
    description: Arc<SceneDescription>,
    model_loads: FuturesUnordered<LocalBoxFuture<'static, ModelLoaded>>,
}

/// Scene lifecycle controller
pub struct SceneManager {
    loader: SceneLoader,
    graph: SceneGraph,
    resources: GpuResources,
    camera: Camera,
    scripts: ScriptHost,
    current_scene: Option<String>,
    pending_scene: Option<String>,
    scene_loads: FuturesUnordered<LocalBoxFuture<'static, SceneLoadDone>>,
    applying: Option<ApplyInProgress>,
    parked: VecDeque<(String, Arc<SceneDescription>)>,
}

impl SceneManager {
    /// Create a manager with an empty scene
    pub fn new(
        source: Rc<dyn AssetSource>,
        assets: AssetConfig,
        camera: Camera,
        scripts: ScriptRegistry,
    ) -> Self {
        Self {
            loader: SceneLoader::new(source, assets),
            graph: SceneGraph::new(),
            resources: GpuResources::new(),
            camera,
            scripts: ScriptHost::new(scripts),
            current_scene: None,
            pending_scene: None,
            scene_loads: FuturesUnordered::new(),
            applying: None,
            parked: VecDeque::new(),
        }
    }

    /// Ask for `name` to become the current scene
    ///
    /// A request for the name that is already pending is ignored.
    pub fn request_scene(&mut self, name: &str) {
        if self.pending_scene.as_deref() == Some(name) {
            log::debug!("Scene '{}' already requested", name);
            return;
        }

        self.pending_scene = Some(name.to_string());
        let load = self.loader.load(name);
        let name = name.to_string();
        self.scene_loads.push(async move { (name, load.await) }.boxed_local());
    }

    /// Pump in-flight loads until nothing more can progress
    ///
    /// Returns whether anything happened.
    pub fn poll(&mut self) -> bool {
        let mut cx = Context::from_waker(noop_waker_ref());
        let mut progressed = false;

        loop {
            let mut step = false;

            if let Some(apply) = self.applying.as_mut() {
                while let Poll::Ready(Some(loaded)) = apply.model_loads.poll_next_unpin(&mut cx) {
                    Self::attach_model(&mut self.graph, &mut self.resources, loaded);
                    step = true;
                }
                if apply.model_loads.is_empty() {
                    self.finish_apply();
                    step = true;
                }
            }

            while let Poll::Ready(Some((name, result))) = self.scene_loads.poll_next_unpin(&mut cx) {
                self.on_scene_loaded(name, result);
                step = true;
            }

            if !step {
                break;
            }
            progressed = true;
        }

        progressed
    }

    fn on_scene_loaded(&mut self, name: String, result: Result<Fetched, LoadError>) {
        let description = self.loader.finish(&name, result);

        if self.pending_scene.as_deref() != Some(name.as_str()) {
            log::debug!("Discarding stale load of scene '{}'", name);
            return;
        }

        let Some(description) = description else {
            // Let the host retry the same name
            self.pending_scene = None;
            return;
        };

        if self.applying.is_some() {
            log::debug!("Scene '{}' loaded during another apply, parking it", name);
            self.parked.push_back((name, description));
            return;
        }

        self.begin_apply(name, description);
    }

    fn begin_apply(&mut self, scene_name: String, description: Arc<SceneDescription>) {
        let report = disposer::clear(&mut self.graph, &mut self.resources);
        self.scripts.unbind();
        log::info!(
            "Scene cleared ({} nodes, {} geometries, {} materials released)",
            report.nodes,
            report.geometries,
            report.materials
        );

        if let Some(camera) = &description.camera {
            instantiator::apply_camera(camera, &mut self.camera);
        }

        let root = self.graph.root();
        for (index, entry) in description.lights.iter().enumerate() {
            let Some(light) = entry.usable("lights", index) else {
                continue;
            };
            if let Some(node) = instantiator::create_light(light) {
                self.graph.add(root, node);
            }
        }

        let model_loads = FuturesUnordered::new();
        for (index, entry) in description.objects.iter().enumerate() {
            let Some(object) = entry.usable("objects", index) else {
                continue;
            };
            match object {
                ObjectSpec::Mesh(spec) => {
                    if let Some(node) = instantiator::create_mesh(spec, &mut self.resources) {
                        self.graph.add(root, node);
                    }
                }
                ObjectSpec::Model(spec) => {
                    let load = model::load_model(self.loader.source(), spec);
                    let path = spec.mesh.clone();
                    let placement = spec.placement.clone();
                    model_loads.push(
                        async move { ModelLoaded { path, placement, result: load.await } }.boxed_local(),
                    );
                }
                ObjectSpec::Unknown => {
                    log::warn!("Unknown object type in scene '{}', skipping", scene_name);
                }
            }
        }

        self.applying = Some(ApplyInProgress { scene_name, description, model_loads });
    }

    fn attach_model(graph: &mut SceneGraph, resources: &mut GpuResources, loaded: ModelLoaded) {
        match loaded.result {
            Ok(asset) => {
                let id = model::create_model(graph, resources, &asset);
                instantiator::place(graph, id, &loaded.placement);
                let root = graph.root();
                graph.attach(root, id);
                log::info!("Model loaded: {}", loaded.path);
            }
            Err(e) => log::error!("Failed to load model {}: {}", loaded.path, e),
        }
    }

    fn finish_apply(&mut self) {
        let Some(apply) = self.applying.take() else {
            return;
        };
        let scene_name = apply.scene_name;

        if let Some(config) = &apply.description.post_processing {
            log::info!("Post-processing config: {}", config);
        }

        let mut ctx = ScriptContext {
            scene_name: &scene_name,
            graph: &mut self.graph,
            camera: &mut self.camera,
        };
        self.scripts.bind(&mut ctx);

        if self.pending_scene.as_deref() == Some(scene_name.as_str()) {
            self.pending_scene = None;
        }
        log::info!("Scene applied: {}", scene_name);
        self.current_scene = Some(scene_name);

        while self.applying.is_none() {
            let Some((name, description)) = self.parked.pop_front() else {
                break;
            };
            if self.pending_scene.as_deref() == Some(name.as_str()) {
                self.begin_apply(name, description);
            } else {
                log::debug!("Discarding stale load of scene '{}'", name);
            }
        }
    }

    /// Deliver an event to the bound script hook
    ///
    /// Returns whether a callback ran.
    pub fn dispatch_script(&mut self, event: ScriptEvent<'_>) -> bool {
        let mut ctx = ScriptContext {
            scene_name: self.current_scene.as_deref().unwrap_or_default(),
            graph: &mut self.graph,
            camera: &mut self.camera,
        };
        self.scripts.dispatch(event, &mut ctx)
    }

    /// Read-only view for the renderer
    pub fn frame_view(&self) -> FrameView<'_> {
        FrameView { graph: &self.graph, camera: &self.camera, resources: &self.resources }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SceneState {
        if let Some(apply) = &self.applying {
            SceneState::Applying(apply.scene_name.clone())
        } else if let Some(pending) = &self.pending_scene {
            SceneState::Loading(pending.clone())
        } else if let Some(current) = &self.current_scene {
            SceneState::Applied(current.clone())
        } else {
            SceneState::Idle
        }
    }

    /// Name of the fully applied scene
    pub fn current_scene(&self) -> Option<&str> {
        self.current_scene.as_deref()
    }

    /// Name of the authoritative in-flight request
    pub fn pending_scene(&self) -> Option<&str> {
        self.pending_scene.as_deref()
    }

    /// Scene description loads not yet resolved
    pub fn loads_in_flight(&self) -> usize {
        self.scene_loads.len()
    }

    /// Live scene graph
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Resources owned by the live scene
    pub fn resources(&self) -> &GpuResources {
        &self.resources
    }

    /// Active camera
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Active camera, mutable
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Script host
    pub fn scripts(&self) -> &ScriptHost {
        &self.scripts
    }

    /// Scene loader and its cache
    pub fn loader(&self) -> &SceneLoader {
        &self.loader
    }

    /// Release the whole scene and abandon anything in flight
    pub fn teardown(&mut self) {
        self.scene_loads = FuturesUnordered::new();
        self.applying = None;
        self.parked.clear();
        self.scripts.unbind();

        let report = disposer::clear(&mut self.graph, &mut self.resources);
        let leaked = self.resources.release_all();
        if leaked > 0 {
            log::warn!("{} resources were not owned by any node", leaked);
        }
        log::info!("Scene torn down ({} nodes released)", report.nodes);

        self.pending_scene = None;
        self.current_scene = None;
    }
}
