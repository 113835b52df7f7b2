//! Debug sessions and their registry.
//!
//! A [`DebugSession`] is one program under inspection. [`SessionRegistry`]
//! holds all sessions by name, backed by `DashMap` so handlers on different
//! tasks can look sessions up without a global lock. Each session sits behind
//! its own `tokio::sync::Mutex`, so selection events for one session apply
//! one at a time in arrival order.

use std::collections::BTreeMap;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::Mutex;

use fhegraph_core::render::translate;
use fhegraph_core::sample::{self, SAMPLE_SOURCE};
use fhegraph_core::{LineTable, ProgramGraph, SelectionCoordinator};

use crate::error::ApiError;

/// Name of the session registered at startup.
pub const DEMO_SESSION: &str = "demo";

/// One FHE program being inspected.
pub struct DebugSession {
    pub name: String,
    /// Source text shown in the code panel.
    pub source_code: String,
    /// The program's full compiled graph.
    pub graph: ProgramGraph,
    pub coordinator: SelectionCoordinator<LineTable>,
}

impl DebugSession {
    /// Creates a session whose unmapped lines all show `graph`.
    ///
    /// `lines` overrides the graph shown for individual source lines. Every
    /// graph is checked up front, so a session never starts with a graph the
    /// viewer cannot draw.
    pub fn new(
        name: String,
        source_code: String,
        graph: ProgramGraph,
        lines: BTreeMap<i64, ProgramGraph>,
    ) -> Result<Self, ApiError> {
        translate(&graph)?;
        let mut table = LineTable::new(graph.clone());
        for (line, line_graph) in lines {
            translate(&line_graph).map_err(|err| {
                ApiError::BadRequest(format!("graph for line {}: {}", line, err))
            })?;
            table.insert(line, line_graph);
        }

        Ok(DebugSession {
            name,
            source_code,
            graph,
            coordinator: SelectionCoordinator::new(table),
        })
    }

    /// The built-in sample program with the demo line mapping.
    pub fn demo() -> Self {
        DebugSession {
            name: DEMO_SESSION.to_string(),
            source_code: SAMPLE_SOURCE.to_string(),
            graph: sample::sample_program(),
            coordinator: SelectionCoordinator::new(LineTable::demo()),
        }
    }
}

/// All debug sessions, keyed by name.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, Arc<Mutex<DebugSession>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        SessionRegistry::default()
    }

    /// Adds a session, refusing to replace an existing one.
    pub fn register(&self, session: DebugSession) -> Result<(), ApiError> {
        match self.sessions.entry(session.name.clone()) {
            Entry::Occupied(_) => Err(ApiError::Conflict(format!(
                "session '{}' already exists",
                session.name
            ))),
            Entry::Vacant(slot) => {
                tracing::info!(session = %session.name, nodes = session.graph.node_count(), "session registered");
                slot.insert(Arc::new(Mutex::new(session)));
                Ok(())
            }
        }
    }

    /// Looks a session up by name. The returned handle outlives the map
    /// entry's shard lock, so callers may await on it.
    pub fn get(&self, name: &str) -> Result<Arc<Mutex<DebugSession>>, ApiError> {
        self.sessions
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| ApiError::NotFound(format!("session '{}' not found", name)))
    }

    pub fn remove(&self, name: &str) -> Result<(), ApiError> {
        match self.sessions.remove(name) {
            Some(_) => {
                tracing::info!(session = %name, "session removed");
                Ok(())
            }
            None => Err(ApiError::NotFound(format!("session '{}' not found", name))),
        }
    }

    /// Session names in sorted order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sessions.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
