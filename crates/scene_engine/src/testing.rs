//! Test doubles for the asset source and render backend

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::future::{self, FutureExt};

use crate::assets::{AssetError, AssetFuture, AssetSource};
use crate::foundation::math::Vec3;
use crate::render::{BackendResult, FrameView, RenderBackend};

type Reply = Result<String, AssetError>;

#[derive(Default)]
struct ManualState {
    waiting: HashMap<String, Vec<oneshot::Sender<Reply>>>,
    served: HashMap<String, Option<String>>,
    fetch_log: Vec<String>,
}

/// Asset source whose fetches resolve only when the test says so
///
/// Paths registered with `serve`/`serve_error` resolve immediately; all
/// other fetches wait for `complete` or `fail`.
#[derive(Clone, Default)]
pub struct ManualAssetSource {
    state: Rc<RefCell<ManualState>>,
}

impl ManualAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every future fetch of `path` immediately
    pub fn serve(&self, path: &str, text: &str) {
        self.state.borrow_mut().served.insert(path.to_string(), Some(text.to_string()));
    }

    /// Fail every future fetch of `path` immediately
    pub fn serve_error(&self, path: &str) {
        self.state.borrow_mut().served.insert(path.to_string(), None);
    }

    /// Resolve all waiting fetches of `path`; returns how many there were
    pub fn complete(&self, path: &str, text: &str) -> usize {
        self.reply(path, || Ok(text.to_string()))
    }

    /// Fail all waiting fetches of `path` with `NotFound`
    pub fn fail(&self, path: &str) -> usize {
        self.reply(path, || Err(AssetError::NotFound(path.to_string())))
    }

    fn reply(&self, path: &str, make: impl Fn() -> Reply) -> usize {
        let senders = self.state.borrow_mut().waiting.remove(path).unwrap_or_default();
        let count = senders.len();
        for sender in senders {
            let _ = sender.send(make());
        }
        count
    }

    /// Number of fetches issued for `path`
    pub fn fetch_count(&self, path: &str) -> usize {
        self.state.borrow().fetch_log.iter().filter(|p| *p == path).count()
    }

    /// Every fetch in issue order
    pub fn fetch_order(&self) -> Vec<String> {
        self.state.borrow().fetch_log.clone()
    }

    /// Fetches of `path` still waiting for a reply
    pub fn waiting(&self, path: &str) -> usize {
        self.state.borrow().waiting.get(path).map_or(0, Vec::len)
    }
}

impl AssetSource for ManualAssetSource {
    fn fetch_text(&self, path: &str) -> AssetFuture {
        let mut state = self.state.borrow_mut();
        state.fetch_log.push(path.to_string());

        if let Some(served) = state.served.get(path) {
            let reply = served
                .clone()
                .ok_or_else(|| AssetError::NotFound(path.to_string()));
            return future::ready(reply).boxed_local();
        }

        let (sender, receiver) = oneshot::channel();
        state.waiting.entry(path.to_string()).or_default().push(sender);
        let path = path.to_string();
        async move { receiver.await.unwrap_or_else(|_| Err(AssetError::Cancelled(path))) }.boxed_local()
    }
}

/// Summary of one submitted frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRecord {
    pub meshes: usize,
    pub lights: usize,
    pub camera_position: Vec3,
}

#[derive(Default)]
struct BackendLog {
    calls: Vec<String>,
    frames: Vec<FrameRecord>,
}

/// Backend that records every call
#[derive(Clone, Default)]
pub struct RecordingBackend {
    log: Rc<RefCell<BackendLog>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface-management calls in order, e.g. `"visible true"`
    pub fn calls(&self) -> Vec<String> {
        self.log.borrow().calls.clone()
    }

    /// Number of frames submitted
    pub fn frame_count(&self) -> usize {
        self.log.borrow().frames.len()
    }

    pub fn last_frame(&self) -> Option<FrameRecord> {
        self.log.borrow().frames.last().cloned()
    }

    fn record(&self, call: String) {
        self.log.borrow_mut().calls.push(call);
    }
}

impl RenderBackend for RecordingBackend {
    fn initialize(&mut self, width: u32, height: u32) -> BackendResult<()> {
        self.record(format!("initialize {width}x{height}"));
        Ok(())
    }

    fn render(&mut self, frame: &FrameView<'_>) -> BackendResult<()> {
        let record = FrameRecord {
            meshes: frame.draw_list().len(),
            lights: frame.lights().len(),
            camera_position: frame.camera.position,
        };
        self.log.borrow_mut().frames.push(record);
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.record(format!("resize {width}x{height}"));
    }

    fn set_visible(&mut self, visible: bool) {
        self.record(format!("visible {visible}"));
    }

    fn set_pointer_events(&mut self, enabled: bool) {
        self.record(format!("pointer_events {enabled}"));
    }

    fn dispose(&mut self) {
        self.record("dispose".to_string());
    }
}
