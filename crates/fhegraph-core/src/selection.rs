//! Selection coordinator: keeps the code panel and graph panel in step.
//!
//! [`SelectionCoordinator`] owns the viewer's [`SelectionState`] and applies
//! the only two transitions that exist:
//!
//! - [`on_line_clicked`](SelectionCoordinator::on_line_clicked): the code panel
//!   reports a click. The line is resolved to a program graph through the
//!   injected [`LineToGraph`] mapping, the graph is re-translated, and both
//!   panels are notified.
//! - [`on_graph_selection_changed`](SelectionCoordinator::on_graph_selection_changed):
//!   the graph panel reports a new node selection. The selection is stored
//!   and echoed back to the graph panel; the line and graph are untouched.
//!
//! Both transitions are synchronous and never fail. Observers are notified
//! before the transition returns.
//!
//! # Asynchronous resolution
//!
//! When resolving a line is slow, callers split the click into
//! [`begin_line_click`](SelectionCoordinator::begin_line_click) and
//! [`complete_line_click`](SelectionCoordinator::complete_line_click). Only
//! the ticket of the most recent click is applied; results for older clicks
//! are dropped, so the displayed graph always belongs to the last line
//! clicked.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::Serialize;

use crate::graph::ProgramGraph;
use crate::id::NodeId;
use crate::render::{translate, RenderGraph};
use crate::sample;

/// Line selected before the user clicks anything.
pub const DEFAULT_LINE: i64 = 0;

// ---------------------------------------------------------------------------
// Line -> graph mapping
// ---------------------------------------------------------------------------

/// Resolves a source line to the program graph shown for it.
///
/// Implementations must be total: every `i64`, including negative and
/// out-of-file lines, yields a graph.
pub trait LineToGraph {
    fn resolve(&self, line: i64) -> ProgramGraph;
}

impl<F> LineToGraph for F
where
    F: Fn(i64) -> ProgramGraph,
{
    fn resolve(&self, line: i64) -> ProgramGraph {
        self(line)
    }
}

/// Fixed lookup table with an explicit fallback for unmapped lines.
#[derive(Debug, Clone)]
pub struct LineTable {
    entries: IndexMap<i64, ProgramGraph>,
    fallback: ProgramGraph,
}

impl LineTable {
    /// Creates a table in which every line resolves to `fallback`.
    pub fn new(fallback: ProgramGraph) -> Self {
        LineTable {
            entries: IndexMap::new(),
            fallback,
        }
    }

    /// The demo mapping: line 1 shows a single multiplication, every other
    /// line shows the full sample program.
    pub fn demo() -> Self {
        LineTable::new(sample::sample_program()).with_line(1, sample::simple_multiply())
    }

    pub fn with_line(mut self, line: i64, graph: ProgramGraph) -> Self {
        self.insert(line, graph);
        self
    }

    /// Maps `line` to `graph`, returning the graph it replaces.
    pub fn insert(&mut self, line: i64, graph: ProgramGraph) -> Option<ProgramGraph> {
        self.entries.insert(line, graph)
    }

    /// Lines with an explicit entry, in insertion order.
    pub fn mapped_lines(&self) -> impl Iterator<Item = i64> + '_ {
        self.entries.keys().copied()
    }

    pub fn fallback(&self) -> &ProgramGraph {
        &self.fallback
    }
}

impl LineToGraph for LineTable {
    fn resolve(&self, line: i64) -> ProgramGraph {
        self.entries
            .get(&line)
            .unwrap_or(&self.fallback)
            .clone()
    }
}

// ---------------------------------------------------------------------------
// State and views
// ---------------------------------------------------------------------------

/// Interaction state of one viewing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    pub selected_line: i64,
    pub selected_nodes: BTreeSet<NodeId>,
    pub current_graph: ProgramGraph,
}

/// Read-only view of the coordinator handed to the panels and the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionSnapshot {
    pub selected_line: i64,
    pub selected_nodes: Vec<NodeId>,
    /// The rendered `current_graph`, absent when it failed to translate.
    pub graph: Option<RenderGraph>,
    /// Translation failure for `current_graph`, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Number of line clicks started so far, including clicks whose
    /// resolution was later dropped as stale.
    pub generation: u64,
}

/// Receives redraw directives from the coordinator.
///
/// The code panel typically implements only
/// [`line_highlighted`](Self::line_highlighted) and the graph panel only
/// [`graph_changed`](Self::graph_changed).
pub trait SelectionObserver {
    fn line_highlighted(&mut self, _line: i64) {}

    fn graph_changed(&mut self, _graph: Option<&RenderGraph>, _selected: &BTreeSet<NodeId>) {}
}

/// Proof of a started line click, redeemed by
/// [`SelectionCoordinator::complete_line_click`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct LineTicket {
    pub line: i64,
    generation: u64,
}

// ---------------------------------------------------------------------------
// Coordinator
// ---------------------------------------------------------------------------

/// Owner of the selection state and the transition rules.
pub struct SelectionCoordinator<M = LineTable> {
    line_map: M,
    state: SelectionState,
    rendered: Option<RenderGraph>,
    render_error: Option<String>,
    generation: u64,
    observers: Vec<Box<dyn SelectionObserver + Send>>,
}

impl<M: LineToGraph> SelectionCoordinator<M> {
    /// Creates a coordinator showing the graph for [`DEFAULT_LINE`] with
    /// nothing selected.
    pub fn new(line_map: M) -> Self {
        let current_graph = line_map.resolve(DEFAULT_LINE);
        let mut coordinator = SelectionCoordinator {
            line_map,
            state: SelectionState {
                selected_line: DEFAULT_LINE,
                selected_nodes: BTreeSet::new(),
                current_graph: ProgramGraph::new(),
            },
            rendered: None,
            render_error: None,
            generation: 0,
            observers: Vec::new(),
        };
        coordinator.install_graph(current_graph);
        coordinator
    }

    /// Registers a panel. It immediately receives the current state.
    pub fn add_observer(&mut self, mut observer: Box<dyn SelectionObserver + Send>) {
        observer.line_highlighted(self.state.selected_line);
        observer.graph_changed(self.rendered.as_ref(), &self.state.selected_nodes);
        self.observers.push(observer);
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn rendered(&self) -> Option<&RenderGraph> {
        self.rendered.as_ref()
    }

    pub fn line_map(&self) -> &M {
        &self.line_map
    }

    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            selected_line: self.state.selected_line,
            selected_nodes: self.state.selected_nodes.iter().copied().collect(),
            graph: self.rendered.clone(),
            error: self.render_error.clone(),
            generation: self.generation,
        }
    }

    /// The code panel reports a click on `line`.
    pub fn on_line_clicked(&mut self, line: i64) {
        let ticket = self.begin_line_click(line);
        let graph = self.line_map.resolve(line);
        let applied = self.complete_line_click(ticket, graph);
        debug_assert!(applied);
    }

    /// Records the clicked line and highlights it, leaving the graph to be
    /// supplied later.
    pub fn begin_line_click(&mut self, line: i64) -> LineTicket {
        self.generation += 1;
        self.state.selected_line = line;
        tracing::debug!(line, generation = self.generation, "line clicked");
        for observer in &mut self.observers {
            observer.line_highlighted(line);
        }
        LineTicket {
            line,
            generation: self.generation,
        }
    }

    /// Applies the graph resolved for `ticket`. Returns `false`, changing
    /// nothing, if a newer click has started since.
    pub fn complete_line_click(&mut self, ticket: LineTicket, graph: ProgramGraph) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                line = ticket.line,
                stale = ticket.generation,
                current = self.generation,
                "dropping stale line resolution"
            );
            return false;
        }
        self.install_graph(graph);
        self.notify_graph();
        true
    }

    /// The graph panel reports its selection. An empty set clears it.
    pub fn on_graph_selection_changed(&mut self, node_ids: impl IntoIterator<Item = NodeId>) {
        self.state.selected_nodes = node_ids.into_iter().collect();
        tracing::debug!(count = self.state.selected_nodes.len(), "graph selection changed");
        self.notify_graph();
    }

    fn install_graph(&mut self, graph: ProgramGraph) {
        match translate(&graph) {
            Ok(mut rendered) => {
                if !rendered.warnings.is_empty() {
                    tracing::warn!(
                        warnings = rendered.warnings.len(),
                        "program graph violates operand arity"
                    );
                    let flagged: Vec<NodeId> = rendered.warnings.iter().map(|w| w.node()).collect();
                    rendered.mark_problematic(flagged);
                }
                self.rendered = Some(rendered);
                self.render_error = None;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to translate program graph");
                self.rendered = None;
                self.render_error = Some(err.to_string());
            }
        }
        self.state.current_graph = graph;
    }

    fn notify_graph(&mut self) {
        for observer in &mut self.observers {
            observer.graph_changed(self.rendered.as_ref(), &self.state.selected_nodes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::{Edge, EdgeRole};
    use crate::node::ProgramNode;
    use crate::ops::Operation;
    use crate::render::VisualKind;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Line(i64),
        Graph { nodes: Option<usize>, selected: Vec<NodeId> },
    }

    struct Recorder(Arc<Mutex<Vec<Event>>>);

    impl SelectionObserver for Recorder {
        fn line_highlighted(&mut self, line: i64) {
            self.0.lock().unwrap().push(Event::Line(line));
        }

        fn graph_changed(&mut self, graph: Option<&RenderGraph>, selected: &BTreeSet<NodeId>) {
            self.0.lock().unwrap().push(Event::Graph {
                nodes: graph.map(|g| g.nodes.len()),
                selected: selected.iter().copied().collect(),
            });
        }
    }

    fn recorded() -> (SelectionCoordinator, Arc<Mutex<Vec<Event>>>) {
        let mut coordinator = SelectionCoordinator::new(LineTable::demo());
        let events = Arc::new(Mutex::new(Vec::new()));
        coordinator.add_observer(Box::new(Recorder(events.clone())));
        events.lock().unwrap().clear();
        (coordinator, events)
    }

    fn broken_graph() -> ProgramGraph {
        ProgramGraph::from_parts(
            vec![ProgramNode::new(Operation::Relinearize)],
            vec![Edge::new(NodeId(99), NodeId(0), EdgeRole::Unary)],
        )
    }

    #[test]
    fn starts_on_default_line_with_empty_selection() {
        let coordinator = SelectionCoordinator::new(LineTable::demo());
        let state = coordinator.state();
        assert_eq!(state.selected_line, DEFAULT_LINE);
        assert!(state.selected_nodes.is_empty());
        assert_eq!(state.current_graph, sample::sample_program());
        assert_eq!(coordinator.rendered().unwrap().nodes.len(), 13);
    }

    #[test]
    fn line_click_swaps_graph() {
        let mut coordinator = SelectionCoordinator::new(LineTable::demo());
        coordinator.on_line_clicked(1);
        assert_eq!(coordinator.state().selected_line, 1);
        assert_eq!(coordinator.state().current_graph, sample::simple_multiply());
        assert_eq!(coordinator.rendered().unwrap().nodes.len(), 5);

        coordinator.on_line_clicked(8);
        assert_eq!(coordinator.state().current_graph, sample::sample_program());
    }

    #[test]
    fn line_resolution_has_no_history() {
        let mut coordinator = SelectionCoordinator::new(LineTable::demo());
        coordinator.on_line_clicked(1);
        let after_first = coordinator.state().current_graph.clone();
        let rendered_first = coordinator.rendered().cloned();

        coordinator.on_line_clicked(2);
        coordinator.on_line_clicked(1);
        assert_eq!(coordinator.state().current_graph, after_first);
        assert_eq!(coordinator.rendered().cloned(), rendered_first);
    }

    #[test]
    fn any_line_number_is_accepted() {
        let mut coordinator = SelectionCoordinator::new(LineTable::demo());
        for line in [-1, i64::MIN, i64::MAX, 0, 10_000] {
            coordinator.on_line_clicked(line);
            assert_eq!(coordinator.state().selected_line, line);
            assert_eq!(coordinator.state().current_graph, sample::sample_program());
        }
    }

    #[test]
    fn empty_selection_always_clears() {
        let mut coordinator = SelectionCoordinator::new(LineTable::demo());
        coordinator.on_graph_selection_changed([NodeId(3), NodeId(7)]);
        assert_eq!(coordinator.state().selected_nodes.len(), 2);

        coordinator.on_graph_selection_changed(Vec::<NodeId>::new());
        assert!(coordinator.state().selected_nodes.is_empty());

        coordinator.on_graph_selection_changed(None::<NodeId>);
        assert!(coordinator.state().selected_nodes.is_empty());
    }

    #[test]
    fn selection_does_not_touch_line_or_graph() {
        let mut coordinator = SelectionCoordinator::new(LineTable::demo());
        coordinator.on_line_clicked(1);
        let before = coordinator.state().clone();

        coordinator.on_graph_selection_changed([NodeId(2)]);
        assert_eq!(coordinator.state().selected_line, before.selected_line);
        assert_eq!(coordinator.state().current_graph, before.current_graph);
        assert_eq!(coordinator.snapshot().generation, 1);
    }

    #[test]
    fn observers_are_notified_synchronously() {
        let (mut coordinator, events) = recorded();
        coordinator.on_line_clicked(1);
        coordinator.on_graph_selection_changed([NodeId(4)]);

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                Event::Line(1),
                Event::Graph {
                    nodes: Some(5),
                    selected: vec![]
                },
                Event::Graph {
                    nodes: Some(5),
                    selected: vec![NodeId(4)]
                },
            ]
        );
    }

    #[test]
    fn new_observer_receives_current_state() {
        let mut coordinator = SelectionCoordinator::new(LineTable::demo());
        coordinator.on_line_clicked(1);
        let events = Arc::new(Mutex::new(Vec::new()));
        coordinator.add_observer(Box::new(Recorder(events.clone())));
        assert_eq!(
            *events.lock().unwrap(),
            vec![
                Event::Line(1),
                Event::Graph {
                    nodes: Some(5),
                    selected: vec![]
                }
            ]
        );
    }

    #[test]
    fn closures_serve_as_line_maps() {
        let mut coordinator = SelectionCoordinator::new(|line: i64| {
            if line < 0 {
                ProgramGraph::new()
            } else {
                sample::simple_multiply()
            }
        });
        coordinator.on_line_clicked(-5);
        assert!(coordinator.rendered().unwrap().nodes.is_empty());
    }

    #[test]
    fn untranslatable_graph_is_surfaced_in_snapshot() {
        let table = LineTable::demo().with_line(3, broken_graph());
        let mut coordinator = SelectionCoordinator::new(table);
        coordinator.on_line_clicked(3);

        let snapshot = coordinator.snapshot();
        assert!(snapshot.graph.is_none());
        assert!(snapshot.error.unwrap().contains("invalid graph"));
        assert_eq!(coordinator.state().current_graph, broken_graph());

        coordinator.on_line_clicked(4);
        let snapshot = coordinator.snapshot();
        assert!(snapshot.graph.is_some());
        assert!(snapshot.error.is_none());
    }

    #[test]
    fn arity_violations_are_marked_problematic() {
        let lonely_add = ProgramGraph::from_parts(
            vec![
                ProgramNode::new(Operation::InputCiphertext(0)),
                ProgramNode::new(Operation::Add),
            ],
            vec![Edge::new(NodeId(0), NodeId(1), EdgeRole::Left)],
        );
        let mut coordinator = SelectionCoordinator::new(LineTable::new(lonely_add));
        coordinator.on_line_clicked(1);

        let rendered = coordinator.rendered().unwrap();
        assert_eq!(rendered.node(NodeId(0)).unwrap().kind, VisualKind::Input);
        assert_eq!(rendered.node(NodeId(1)).unwrap().kind, VisualKind::Problematic);
    }

    #[test]
    fn stale_resolution_is_dropped() {
        let (mut coordinator, events) = recorded();
        let first = coordinator.begin_line_click(1);
        let second = coordinator.begin_line_click(5);

        assert!(coordinator.complete_line_click(second, sample::sample_program()));
        assert!(!coordinator.complete_line_click(first, sample::simple_multiply()));

        assert_eq!(coordinator.state().selected_line, 5);
        assert_eq!(coordinator.state().current_graph, sample::sample_program());
        assert_eq!(coordinator.snapshot().generation, 2);
        assert_eq!(
            *events.lock().unwrap(),
            vec![
                Event::Line(1),
                Event::Line(5),
                Event::Graph {
                    nodes: Some(13),
                    selected: vec![]
                },
            ]
        );
    }

    #[test]
    fn stale_resolution_after_completion_is_dropped() {
        let mut coordinator = SelectionCoordinator::new(LineTable::demo());
        let first = coordinator.begin_line_click(1);
        assert!(coordinator.complete_line_click(first, sample::simple_multiply()));
        coordinator.on_line_clicked(2);
        assert!(!coordinator.complete_line_click(first, sample::simple_multiply()));
        assert_eq!(coordinator.state().current_graph, sample::sample_program());
    }

    #[test]
    fn line_table_lists_mapped_lines() {
        let table = LineTable::demo().with_line(9, ProgramGraph::new());
        assert_eq!(table.mapped_lines().collect::<Vec<_>>(), vec![1, 9]);
        assert_eq!(table.resolve(9), ProgramGraph::new());
        assert_eq!(table.fallback(), &sample::sample_program());
    }

    #[test]
    fn snapshot_serializes_sorted_selection() {
        let mut coordinator = SelectionCoordinator::new(LineTable::demo());
        coordinator.on_graph_selection_changed([NodeId(9), NodeId(2), NodeId(9)]);
        let json = serde_json::to_value(coordinator.snapshot()).unwrap();
        assert_eq!(json["selected_nodes"], serde_json::json!([2, 9]));
        assert_eq!(json["selected_line"], 0);
        assert!(json.get("error").is_none());
    }
}
