//! In-memory host page.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use calex_core::{ElementQuery, HostDocument, RowInspector, ViewportObserver};
use calex_domain::constants::{DEFAULT_ROWS_CONTAINER_SELECTOR, DEFAULT_ROW_CLASS};
use calex_domain::{ElementId, RowIdentifiers};
use parking_lot::Mutex;

#[derive(Debug, Default)]
struct FakeElement {
    dom_id: Option<String>,
    classes: HashSet<String>,
    selectors: HashSet<String>,
    identifiers: RowIdentifiers,
    description: Option<String>,
    children: Vec<ElementId>,
}

#[derive(Debug, Default)]
struct PageState {
    next_id: u64,
    elements: HashMap<ElementId, FakeElement>,
    observed: Vec<ElementId>,
    mutation_roots: Vec<ElementId>,
    viewport_requests: Vec<(ElementId, f64)>,
    insertions: Vec<(ElementId, String)>,
}

impl PageState {
    fn alloc(&mut self, element: FakeElement) -> ElementId {
        self.next_id += 1;
        let id = ElementId::new(self.next_id);
        self.elements.insert(id, element);
        id
    }

    fn subtree(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self
            .elements
            .get(&root)
            .map(|el| el.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(el) = self.elements.get(&id) {
                stack.extend(el.children.iter().rev().copied());
            }
        }
        out
    }
}

/// Host page double implementing every page port.
///
/// Clones share state, so one instance can be handed to the engine as its
/// row inspector and kept by the test for assertions.
#[derive(Clone, Default)]
pub struct FakePage {
    state: Arc<Mutex<PageState>>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root container reachable through `element_by_id`.
    pub fn add_container(&self, dom_id: &str) -> ElementId {
        self.state
            .lock()
            .alloc(FakeElement { dom_id: Some(dom_id.to_string()), ..FakeElement::default() })
    }

    /// Add a detached event row carrying both identifiers.
    pub fn add_row(&self, event_id: &str, calendar_name: &str) -> ElementId {
        self.add_row_with(RowIdentifiers::new(event_id, calendar_name))
    }

    pub fn add_row_with(&self, identifiers: RowIdentifiers) -> ElementId {
        let mut classes = HashSet::new();
        classes.insert(DEFAULT_ROW_CLASS.to_string());
        self.state.lock().alloc(FakeElement { classes, identifiers, ..FakeElement::default() })
    }

    /// Add an element with no row class, e.g. a day header.
    pub fn add_plain(&self) -> ElementId {
        self.state.lock().alloc(FakeElement::default())
    }

    /// Wrap `rows` the way a bulk render does: a parent holding a rows
    /// container that holds the rows.
    pub fn add_batch(&self, rows: &[ElementId]) -> ElementId {
        let mut state = self.state.lock();
        let mut selectors = HashSet::new();
        selectors.insert(DEFAULT_ROWS_CONTAINER_SELECTOR.to_string());
        let rows_container = state.alloc(FakeElement {
            selectors,
            children: rows.to_vec(),
            ..FakeElement::default()
        });
        state.alloc(FakeElement { children: vec![rows_container], ..FakeElement::default() })
    }

    /// Simulate the host re-rendering rows and dropping inserted text.
    pub fn wipe_descriptions(&self) {
        for element in self.state.lock().elements.values_mut() {
            element.description = None;
        }
    }

    pub fn set_identifiers(&self, row: ElementId, identifiers: RowIdentifiers) {
        if let Some(element) = self.state.lock().elements.get_mut(&row) {
            element.identifiers = identifiers;
        }
    }

    pub fn description(&self, row: ElementId) -> Option<String> {
        self.state.lock().elements.get(&row).and_then(|el| el.description.clone())
    }

    pub fn insertion_count(&self, row: ElementId) -> usize {
        self.state.lock().insertions.iter().filter(|(id, _)| *id == row).count()
    }

    pub fn observed(&self) -> Vec<ElementId> {
        self.state.lock().observed.clone()
    }

    pub fn mutation_roots(&self) -> Vec<ElementId> {
        self.state.lock().mutation_roots.clone()
    }

    pub fn viewport_requests(&self) -> Vec<(ElementId, f64)> {
        self.state.lock().viewport_requests.clone()
    }
}

impl RowInspector for FakePage {
    fn identifiers(&self, row: ElementId) -> RowIdentifiers {
        self.state.lock().elements.get(&row).map(|el| el.identifiers.clone()).unwrap_or_default()
    }

    fn insert_description(&self, row: ElementId, description: &str) {
        let mut state = self.state.lock();
        if let Some(element) = state.elements.get_mut(&row) {
            element.description = Some(description.to_string());
            state.insertions.push((row, description.to_string()));
        }
    }
}

impl ElementQuery for FakePage {
    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.state.lock().elements.get(&element).is_some_and(|el| el.classes.contains(class))
    }

    fn contains_selector(&self, element: ElementId, selector: &str) -> bool {
        let state = self.state.lock();
        state.subtree(element).into_iter().any(|id| {
            state.elements.get(&id).is_some_and(|el| el.selectors.contains(selector))
        })
    }

    fn descendants_with_class(&self, element: ElementId, class: &str) -> Vec<ElementId> {
        let state = self.state.lock();
        state
            .subtree(element)
            .into_iter()
            .filter(|id| state.elements.get(id).is_some_and(|el| el.classes.contains(class)))
            .collect()
    }
}

impl ViewportObserver for FakePage {
    fn observe(&self, element: ElementId) {
        self.state.lock().observed.push(element);
    }

    fn unobserve(&self, element: ElementId) {
        self.state.lock().observed.retain(|id| *id != element);
    }
}

impl HostDocument for FakePage {
    fn element_by_id(&self, id: &str) -> Option<ElementId> {
        self.state
            .lock()
            .elements
            .iter()
            .find(|(_, el)| el.dom_id.as_deref() == Some(id))
            .map(|(element_id, _)| *element_id)
    }

    fn observe_mutations(&self, root: ElementId) {
        self.state.lock().mutation_roots.push(root);
    }

    fn viewport_observer(&self, root: ElementId, threshold: f64) -> Arc<dyn ViewportObserver> {
        self.state.lock().viewport_requests.push((root, threshold));
        Arc::new(self.clone())
    }
}
