#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use calex_core::{ElementQuery, HostDocument, RowInspector, ViewportObserver};
use calex_domain::constants::{DEFAULT_ROWS_CONTAINER_SELECTOR, DEFAULT_ROW_CLASS};
use calex_domain::{Calendar, CalexError, ElementId, FetchedEvent, Result, RowIdentifiers};
use calex_infra::CalendarApi;
use parking_lot::Mutex;

/// Let spawned tasks (message server, fetches, timers) make progress.
pub async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}

#[derive(Debug, Default)]
struct Node {
    dom_id: Option<String>,
    is_row: bool,
    is_rows_container: bool,
    identifiers: RowIdentifiers,
    description: Option<String>,
    children: Vec<ElementId>,
}

#[derive(Debug, Default)]
struct HostState {
    next_id: u64,
    nodes: HashMap<ElementId, Node>,
    observed: HashSet<ElementId>,
    mutation_roots: Vec<ElementId>,
    thresholds: Vec<f64>,
}

impl HostState {
    fn alloc(&mut self, node: Node) -> ElementId {
        self.next_id += 1;
        let id = ElementId::new(self.next_id);
        self.nodes.insert(id, node);
        id
    }

    fn descendants(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut pending = vec![root];
        while let Some(id) = pending.pop() {
            if let Some(node) = self.nodes.get(&id) {
                for child in node.children.iter().rev() {
                    out.push(*child);
                    pending.push(*child);
                }
            }
        }
        out
    }
}

/// Minimal host page: a root container and rows, with shared state across
/// clones.
#[derive(Clone, Default)]
pub struct FakeHost {
    state: Arc<Mutex<HostState>>,
}

impl FakeHost {
    /// A page with a root container carrying `container_id`.
    pub fn with_container(container_id: &str) -> Self {
        let host = Self::default();
        host.state
            .lock()
            .alloc(Node { dom_id: Some(container_id.to_string()), ..Node::default() });
        host
    }

    pub fn add_row(&self, event_id: &str, calendar_name: &str) -> ElementId {
        self.state.lock().alloc(Node {
            is_row: true,
            identifiers: RowIdentifiers::new(event_id, calendar_name),
            ..Node::default()
        })
    }

    /// A wrapper holding a rows container that holds `rows`.
    pub fn add_batch(&self, rows: &[ElementId]) -> ElementId {
        let mut state = self.state.lock();
        let container = state.alloc(Node {
            is_rows_container: true,
            children: rows.to_vec(),
            ..Node::default()
        });
        state.alloc(Node { children: vec![container], ..Node::default() })
    }

    pub fn description(&self, row: ElementId) -> Option<String> {
        self.state.lock().nodes.get(&row).and_then(|node| node.description.clone())
    }

    pub fn wipe_descriptions(&self) {
        for node in self.state.lock().nodes.values_mut() {
            node.description = None;
        }
    }

    pub fn is_observed(&self, row: ElementId) -> bool {
        self.state.lock().observed.contains(&row)
    }

    pub fn mutation_roots(&self) -> Vec<ElementId> {
        self.state.lock().mutation_roots.clone()
    }

    pub fn thresholds(&self) -> Vec<f64> {
        self.state.lock().thresholds.clone()
    }
}

impl RowInspector for FakeHost {
    fn identifiers(&self, row: ElementId) -> RowIdentifiers {
        self.state.lock().nodes.get(&row).map(|node| node.identifiers.clone()).unwrap_or_default()
    }

    fn insert_description(&self, row: ElementId, description: &str) {
        if let Some(node) = self.state.lock().nodes.get_mut(&row) {
            node.description = Some(description.to_string());
        }
    }
}

impl ElementQuery for FakeHost {
    fn has_class(&self, element: ElementId, class: &str) -> bool {
        class == DEFAULT_ROW_CLASS
            && self.state.lock().nodes.get(&element).is_some_and(|node| node.is_row)
    }

    fn contains_selector(&self, element: ElementId, selector: &str) -> bool {
        if selector != DEFAULT_ROWS_CONTAINER_SELECTOR {
            return false;
        }
        let state = self.state.lock();
        state
            .descendants(element)
            .iter()
            .any(|id| state.nodes.get(id).is_some_and(|node| node.is_rows_container))
    }

    fn descendants_with_class(&self, element: ElementId, class: &str) -> Vec<ElementId> {
        if class != DEFAULT_ROW_CLASS {
            return Vec::new();
        }
        let state = self.state.lock();
        state
            .descendants(element)
            .into_iter()
            .filter(|id| state.nodes.get(id).is_some_and(|node| node.is_row))
            .collect()
    }
}

impl ViewportObserver for FakeHost {
    fn observe(&self, element: ElementId) {
        self.state.lock().observed.insert(element);
    }

    fn unobserve(&self, element: ElementId) {
        self.state.lock().observed.remove(&element);
    }
}

impl HostDocument for FakeHost {
    fn element_by_id(&self, id: &str) -> Option<ElementId> {
        self.state
            .lock()
            .nodes
            .iter()
            .find(|(_, node)| node.dom_id.as_deref() == Some(id))
            .map(|(element, _)| *element)
    }

    fn observe_mutations(&self, root: ElementId) {
        self.state.lock().mutation_roots.push(root);
    }

    fn viewport_observer(&self, _root: ElementId, threshold: f64) -> Arc<dyn ViewportObserver> {
        self.state.lock().thresholds.push(threshold);
        Arc::new(self.clone())
    }
}

/// In-memory calendar API that counts requests.
#[derive(Clone, Default)]
pub struct InMemoryCalendarApi {
    calendars: Arc<Mutex<Vec<Calendar>>>,
    events: Arc<Mutex<HashMap<(String, String), FetchedEvent>>>,
    event_requests: Arc<Mutex<Vec<(String, String)>>>,
}

impl InMemoryCalendarApi {
    pub fn new(calendars: Vec<Calendar>) -> Self {
        Self { calendars: Arc::new(Mutex::new(calendars)), ..Self::default() }
    }

    pub fn with_event(self, calendar_id: &str, event_id: &str, description: &str) -> Self {
        self.events.lock().insert(
            (calendar_id.to_string(), event_id.to_string()),
            FetchedEvent::new(event_id, description),
        );
        self
    }

    pub fn event_requests(&self) -> Vec<(String, String)> {
        self.event_requests.lock().clone()
    }
}

#[async_trait]
impl CalendarApi for InMemoryCalendarApi {
    async fn get_event(&self, calendar_id: &str, event_id: &str) -> Result<FetchedEvent> {
        self.event_requests.lock().push((calendar_id.to_string(), event_id.to_string()));
        self.events
            .lock()
            .get(&(calendar_id.to_string(), event_id.to_string()))
            .cloned()
            .ok_or_else(|| CalexError::Transport(format!("unknown event {event_id}")))
    }

    async fn list_calendars(&self) -> Result<Vec<Calendar>> {
        Ok(self.calendars.lock().clone())
    }
}
