//! Commands from the embedded panel and the hop onto the host main thread.
//!
//! The panel calls native functions by name. Names are decoded into
//! [`Command`] at the edge; listing calls are answered in place, while mesh
//! construction is captured by value and posted to the [`MainThreadQueue`],
//! which the host drains from its event loop.

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, warn};

use crate::config::PanelConfig;
use crate::orchestrator::{create_mesh, log_outcome};
use crate::params::ConstructionParameters;
use crate::query::{entries_to_json, list_layers, list_stories, sample_label_text};
use crate::store::ModelStore;

/// Unit of work executed on the main thread against the document.
pub type Task<S> = Box<dyn FnOnce(&mut S) + Send + 'static>;

/// Queue of tasks waiting for the host main thread.
pub struct MainThreadQueue<S> {
    tx: Sender<Task<S>>,
    rx: Receiver<Task<S>>,
}

impl<S: 'static> MainThreadQueue<S> {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// A handle other threads use to post tasks.
    pub fn sender(&self) -> TaskSender<S> {
        TaskSender(self.tx.clone())
    }

    /// Runs every queued task once, in posting order. Returns how many ran.
    pub fn run_pending(&self, store: &mut S) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            task(store);
            ran += 1;
        }
        ran
    }

    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

impl<S: 'static> Default for MainThreadQueue<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Posting end of a [`MainThreadQueue`].
pub struct TaskSender<S>(Sender<Task<S>>);

impl<S> Clone for TaskSender<S> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<S: 'static> TaskSender<S> {
    /// Queues `task` without waiting for it. Returns `false` when the queue
    /// no longer exists.
    pub fn post<F>(&self, task: F) -> bool
    where
        F: FnOnce(&mut S) + Send + 'static,
    {
        self.0.send(Box::new(task)).is_ok()
    }
}

/// Calls the panel can make.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    GetLayerList,
    GetStoryList,
    GetSampleElevationText { layer_idx: i32 },
    CreateTopoMesh { payload: String },
}

impl Command {
    /// Decodes a named call and its single string argument.
    pub fn from_wire(name: &str, arg: &str) -> Option<Self> {
        match name {
            "GetLayerList" => Some(Self::GetLayerList),
            "GetStoryList" => Some(Self::GetStoryList),
            // the panel sends the raw select value; anything unreadable means the first layer
            "GetSampleElevationText" => Some(Self::GetSampleElevationText {
                layer_idx: arg.trim().parse().unwrap_or(0),
            }),
            "CreateTopoMesh" => Some(Self::CreateTopoMesh {
                payload: arg.to_string(),
            }),
            _ => None,
        }
    }
}

/// Answer to a [`Command`].
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Json(String),
    Text(String),
    Bool(bool),
}

impl Response {
    pub fn into_wire(self) -> String {
        match self {
            Response::Json(s) | Response::Text(s) => s,
            Response::Bool(b) => b.to_string(),
        }
    }
}

/// Native side of the panel.
pub struct UiBridge<S> {
    tasks: TaskSender<S>,
    config: PanelConfig,
}

impl<S: ModelStore + 'static> UiBridge<S> {
    pub fn new(tasks: TaskSender<S>, config: PanelConfig) -> Self {
        Self { tasks, config }
    }

    /// Handles a call by name. Unknown names yield `None`.
    pub fn call(&self, store: &S, name: &str, arg: &str) -> Option<String> {
        let Some(command) = Command::from_wire(name, arg) else {
            warn!("unknown panel call {name:?}");
            return None;
        };
        Some(self.handle(store, command).into_wire())
    }

    pub fn handle(&self, store: &S, command: Command) -> Response {
        debug!("panel call {command:?}");
        match command {
            Command::GetLayerList => Response::Json(entries_to_json(&list_layers(store))),
            Command::GetStoryList => Response::Json(entries_to_json(&list_stories(store))),
            Command::GetSampleElevationText { layer_idx } => {
                Response::Text(sample_label_text(store, layer_idx))
            }
            Command::CreateTopoMesh { payload } => Response::Bool(self.submit(&payload)),
        }
    }

    /// Decodes a construction request and posts it to the main thread.
    /// Returns whether the request was accepted; the outcome of the run is
    /// only logged.
    pub fn submit(&self, payload: &str) -> bool {
        let params = match ConstructionParameters::from_json_with(payload, &self.config) {
            Ok(p) => p,
            Err(e) => {
                log_outcome(&Err(e));
                return false;
            }
        };
        self.tasks.post(move |store: &mut S| {
            let result = create_mesh(store, &params);
            log_outcome(&result);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn wire_names_decode() {
        assert_eq!(Command::from_wire("GetLayerList", ""), Some(Command::GetLayerList));
        assert_eq!(
            Command::from_wire("GetSampleElevationText", " 3"),
            Some(Command::GetSampleElevationText { layer_idx: 3 })
        );
        assert_eq!(
            Command::from_wire("GetSampleElevationText", "abc"),
            Some(Command::GetSampleElevationText { layer_idx: 0 })
        );
        assert_eq!(Command::from_wire("DeleteEverything", ""), None);
    }

    #[test]
    fn queue_runs_tasks_in_order_once() {
        let queue: MainThreadQueue<Vec<u32>> = MainThreadQueue::new();
        let tx = queue.sender();
        assert!(tx.post(|v| v.push(1)));
        let tx2 = tx.clone();
        std::thread::spawn(move || tx2.post(|v| v.push(2)))
            .join()
            .unwrap();
        assert_eq!(queue.pending(), 2);
        let mut log = Vec::new();
        assert_eq!(queue.run_pending(&mut log), 2);
        assert_eq!(queue.run_pending(&mut log), 0);
        assert_eq!(log, vec![1, 2]);
    }

    #[test]
    fn post_fails_once_queue_is_gone() {
        let queue: MainThreadQueue<u32> = MainThreadQueue::new();
        let tx = queue.sender();
        drop(queue);
        assert!(!tx.post(|n| *n += 1));
    }

    #[test]
    fn bad_payload_is_refused_without_queueing() {
        let queue = MainThreadQueue::<MemoryStore>::new();
        let bridge = UiBridge::new(queue.sender(), PanelConfig::default());
        let store = MemoryStore::new();
        assert_eq!(bridge.call(&store, "CreateTopoMesh", "{}"), Some("false".into()));
        assert_eq!(queue.pending(), 0);
        assert_eq!(bridge.call(&store, "Nope", ""), None);
    }
}
