// SAFETY POLICY: Single-threaded WASM execution only
// The exported session lives in an UnsafeCell without synchronization.
// DO NOT compile with WASM atomics/threads without adding Mutex protection.
#[cfg(target_feature = "atomics")]
compile_error!("This code is NOT thread-safe. Add Mutex<Session> before enabling atomics.");

pub mod config;
mod debug_checks;
pub mod error;
pub mod euler;
pub mod graph;
pub mod grid;
pub mod table;

use core::cell::UnsafeCell;
use core::ptr;

use tracing::{debug, warn};

pub use config::GridConfig;
pub use error::{GridError, Result};
pub use euler::{classify, Classification, EulerReport};
pub use graph::{EdgeToggle, Gesture, GraphState};
pub use grid::{Grid, Node, NodeId};

use debug_checks::check_session_integrity;

const STATUS_OK: u32 = 0;
const STATUS_NOT_INITIALISED: u32 = 4;

// -------- Session core --------

/// Graph state plus the classification and flat export buffers the host
/// reads after each change.
pub struct Session {
    state: GraphState,
    report: EulerReport,
    pub(crate) active_buf: Vec<u32>,
    pub(crate) edges_buf: Vec<u32>,
    pub(crate) startpoints_buf: Vec<u32>,
    table_buf: Vec<u8>,
}

impl Session {
    pub fn new(config: GridConfig) -> Result<Self> {
        let state = GraphState::with_config(config)?;
        let report = classify(state.grid());
        let mut session = Session {
            state,
            report,
            active_buf: Vec::new(),
            edges_buf: Vec::new(),
            startpoints_buf: Vec::new(),
            table_buf: Vec::new(),
        };
        session.refresh_export();
        Ok(session)
    }

    pub fn state(&self) -> &GraphState {
        &self.state
    }

    pub fn report(&self) -> &EulerReport {
        &self.report
    }

    pub fn resize(&mut self, cells: usize) -> Result<()> {
        self.state.resize(cells)?;
        self.refresh();
        Ok(())
    }

    pub fn activate(&mut self, id: NodeId) -> Result<bool> {
        let changed = self.state.activate(id)?;
        self.refresh_if(changed);
        Ok(changed)
    }

    pub fn deactivate(&mut self, id: NodeId) -> Result<bool> {
        let changed = self.state.deactivate(id)?;
        self.refresh_if(changed);
        Ok(changed)
    }

    pub fn toggle_edge(&mut self, a: NodeId, b: NodeId) -> Result<EdgeToggle> {
        let outcome = self.state.toggle_edge(a, b)?;
        self.refresh_if(outcome != EdgeToggle::Ignored);
        Ok(outcome)
    }

    pub fn release(&mut self, pressed: NodeId, released: NodeId) -> Result<Gesture> {
        let revision = self.state.revision();
        let gesture = self.state.release(pressed, released)?;
        self.refresh_if(self.state.revision() != revision);
        Ok(gesture)
    }

    pub fn clear(&mut self) {
        let revision = self.state.revision();
        self.state.clear();
        self.refresh_if(self.state.revision() != revision);
    }

    pub fn table_json(&self) -> &[u8] {
        &self.table_buf
    }

    fn refresh_if(&mut self, changed: bool) {
        if changed {
            self.refresh();
        }
    }

    fn refresh(&mut self) {
        self.report = classify(self.state.grid());
        self.refresh_export();
        check_session_integrity(self);
    }

    fn refresh_export(&mut self) {
        let grid = self.state.grid();

        self.active_buf.clear();
        self.active_buf.extend(grid.active_nodes().map(|n| n.index() as u32));

        self.edges_buf.clear();
        for (a, b) in grid.edges() {
            self.edges_buf.push(a as u32);
            self.edges_buf.push(b as u32);
        }

        self.startpoints_buf.clear();
        self.startpoints_buf.extend(self.report.startpoints.iter().map(|&i| i as u32));

        match serde_json::to_vec(&table::rows(grid)) {
            Ok(buf) => self.table_buf = buf,
            Err(err) => {
                warn!(%err, "node table export failed");
                self.table_buf.clear();
            }
        }
    }
}

fn gesture_code(gesture: Gesture) -> i32 {
    match gesture {
        Gesture::Ignored => 0,
        Gesture::Activated => 1,
        Gesture::Deactivated => 2,
        Gesture::EdgeAdded => 3,
        Gesture::EdgeRemoved => 4,
    }
}

fn edge_toggle_code(toggle: EdgeToggle) -> i32 {
    gesture_code(toggle.into())
}

/// Negated status code for signed results.
fn error_code(err: &GridError) -> i32 {
    -(err.status_code() as i32)
}

fn status_of(result: Result<()>) -> u32 {
    match result {
        Ok(()) => STATUS_OK,
        Err(err) => {
            warn!(%err, "host call rejected");
            err.status_code()
        }
    }
}

// LOCK POLICY:
// This global is accessed only from single-threaded WASM.
// JavaScript calls all eulergrid_* functions from the main thread only.
// SAFETY: UnsafeCell is wrapped in Sync ONLY because we guarantee single-threaded access.
// If Web Workers or WASM threads are used, this MUST be changed to Mutex<Option<Session>>.
struct SessionCell {
    inner: UnsafeCell<Option<Session>>,
}

unsafe impl Sync for SessionCell {} // Only safe for single-threaded WASM

static SESSION: SessionCell = SessionCell {
    inner: UnsafeCell::new(None),
};

fn session_mut() -> Option<&'static mut Session> {
    unsafe { (&mut *SESSION.inner.get()).as_mut() }
}

fn session_ref() -> Option<&'static Session> {
    unsafe { (&*SESSION.inner.get()).as_ref() }
}

fn install(config: GridConfig) -> Result<()> {
    let session = Session::new(config)?;
    debug!(cells = config.cells, "session installed");
    unsafe {
        *SESSION.inner.get() = Some(session);
    }
    Ok(())
}

/// Start a session on the default 10×10 grid.
#[no_mangle]
pub extern "C" fn eulergrid_init() -> u32 {
    status_of(install(GridConfig::default()))
}

/// Start a session from a JSON config such as `{"cells": 12}`.
#[no_mangle]
pub extern "C" fn eulergrid_configure(config_ptr: *const u8, config_len: usize) -> u32 {
    if config_ptr.is_null() {
        return status_of(Err(GridError::MalformedConfig("null config".into())));
    }
    let bytes = unsafe { core::slice::from_raw_parts(config_ptr, config_len) };
    status_of(GridConfig::from_json(bytes).and_then(install))
}

#[no_mangle]
pub extern "C" fn eulergrid_resize(cells: u32) -> u32 {
    match session_mut() {
        Some(session) => status_of(session.resize(cells as usize)),
        None => STATUS_NOT_INITIALISED,
    }
}

#[no_mangle]
pub extern "C" fn eulergrid_size() -> u32 {
    session_ref()
        .map(|s| s.state().grid().size() as u32)
        .unwrap_or(0)
}

/// Row-major index of cell (x, y), or -1 when outside the grid.
#[no_mangle]
pub extern "C" fn eulergrid_node_index(x: u32, y: u32) -> i32 {
    session_ref()
        .and_then(|s| s.state().grid().index_of(x as usize, y as usize).ok())
        .map(|i| i as i32)
        .unwrap_or(-1)
}

/// 1 if the node changed, 0 if it already was active, negative status on error.
#[no_mangle]
pub extern "C" fn eulergrid_activate(index: u32) -> i32 {
    match session_mut() {
        Some(session) => match session.activate(index as usize) {
            Ok(changed) => changed as i32,
            Err(err) => error_code(&err),
        },
        None => -(STATUS_NOT_INITIALISED as i32),
    }
}

/// 1 if the node changed, 0 if it already was inactive, negative status on error.
#[no_mangle]
pub extern "C" fn eulergrid_deactivate(index: u32) -> i32 {
    match session_mut() {
        Some(session) => match session.deactivate(index as usize) {
            Ok(changed) => changed as i32,
            Err(err) => error_code(&err),
        },
        None => -(STATUS_NOT_INITIALISED as i32),
    }
}

/// 3 edge added, 4 edge removed, 0 ignored, negative status on error.
#[no_mangle]
pub extern "C" fn eulergrid_toggle_edge(a: u32, b: u32) -> i32 {
    match session_mut() {
        Some(session) => match session.toggle_edge(a as usize, b as usize) {
            Ok(toggle) => edge_toggle_code(toggle),
            Err(err) => error_code(&err),
        },
        None => -(STATUS_NOT_INITIALISED as i32),
    }
}

/// Pointer press on `pressed` released over `released`.
/// 1 activated, 2 deactivated, 3 edge added, 4 edge removed, 0 ignored,
/// negative status on error.
#[no_mangle]
pub extern "C" fn eulergrid_release(pressed: u32, released: u32) -> i32 {
    match session_mut() {
        Some(session) => match session.release(pressed as usize, released as usize) {
            Ok(gesture) => gesture_code(gesture),
            Err(err) => error_code(&err),
        },
        None => -(STATUS_NOT_INITIALISED as i32),
    }
}

#[no_mangle]
pub extern "C" fn eulergrid_clear() {
    if let Some(session) = session_mut() {
        session.clear();
    }
}

#[no_mangle]
pub extern "C" fn eulergrid_revision() -> u32 {
    session_ref()
        .map(|s| s.state().revision())
        .unwrap_or(0)
}

/// 0 none, 1 all even, 2 some even.
#[no_mangle]
pub extern "C" fn eulergrid_classification() -> u32 {
    session_ref()
        .map(|s| s.report().classification.code())
        .unwrap_or(0)
}

#[no_mangle]
pub extern "C" fn eulergrid_start_enabled() -> u32 {
    session_ref()
        .map(|s| s.report().start_enabled() as u32)
        .unwrap_or(0)
}

#[no_mangle]
pub extern "C" fn eulergrid_edge_components() -> u32 {
    session_ref()
        .map(|s| s.report().edge_components as u32)
        .unwrap_or(0)
}

#[no_mangle]
pub extern "C" fn eulergrid_active_ptr_u32() -> *const u32 {
    session_ref()
        .map(|s| s.active_buf.as_ptr())
        .unwrap_or(ptr::null())
}

#[no_mangle]
pub extern "C" fn eulergrid_active_len_u32() -> u32 {
    session_ref().map(|s| s.active_buf.len() as u32).unwrap_or(0)
}

/// Flat `[a0, b0, a1, b1, ...]` with `a < b` per edge.
#[no_mangle]
pub extern "C" fn eulergrid_edges_ptr_u32() -> *const u32 {
    session_ref()
        .map(|s| s.edges_buf.as_ptr())
        .unwrap_or(ptr::null())
}

#[no_mangle]
pub extern "C" fn eulergrid_edges_len_u32() -> u32 {
    session_ref().map(|s| s.edges_buf.len() as u32).unwrap_or(0)
}

#[no_mangle]
pub extern "C" fn eulergrid_startpoints_ptr_u32() -> *const u32 {
    session_ref()
        .map(|s| s.startpoints_buf.as_ptr())
        .unwrap_or(ptr::null())
}

#[no_mangle]
pub extern "C" fn eulergrid_startpoints_len_u32() -> u32 {
    session_ref()
        .map(|s| s.startpoints_buf.len() as u32)
        .unwrap_or(0)
}

/// UTF-8 JSON array of node table rows.
#[no_mangle]
pub extern "C" fn eulergrid_table_ptr_u8() -> *const u8 {
    session_ref()
        .map(|s| s.table_json().as_ptr())
        .unwrap_or(ptr::null())
}

#[no_mangle]
pub extern "C" fn eulergrid_table_len_u8() -> u32 {
    session_ref()
        .map(|s| s.table_json().len() as u32)
        .unwrap_or(0)
}
