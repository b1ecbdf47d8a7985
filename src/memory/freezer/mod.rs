//! Continuous rewriting of frozen addresses
//!
//! [`AddressFreezer`] owns the tracked entries and at most one background
//! worker thread. The worker never prints; it posts diagnostics to a queue
//! that the foreground drains with [`AddressFreezer::pop_message`].
//!
//! Entries, the enabled counter and the worker cursor live behind a single
//! lock shared by both sides. The message queue has its own lock, always
//! taken after the state lock when both are held.

mod entry;
mod worker;

pub use entry::FrozenAddress;

use crate::config::FreezerConfig;
use crate::core::types::{
    MemoryAddress, MemoryError, MemoryResult, ProcessId, ValueType,
};
use crate::memory::access::MemoryAccess;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info};

#[derive(Debug, Default)]
struct FreezerState {
    pid: Option<ProcessId>,
    entries: Vec<FrozenAddress>,
    /// Always equals the number of entries with `enabled == true`
    enabled: usize,
    /// Index of the next entry the worker visits
    cursor: usize,
    running: bool,
    shutdown: bool,
}

struct Shared<M> {
    memory: Arc<M>,
    state: Mutex<FreezerState>,
    messages: Mutex<VecDeque<String>>,
    cycle_delay: Duration,
}

impl<M> Shared<M> {
    fn lock_state(&self) -> MutexGuard<'_, FreezerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_messages(&self) -> MutexGuard<'_, VecDeque<String>> {
        self.messages.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn push_message(&self, message: String) {
        self.lock_messages().push_back(message);
    }
}

/// Consistent view of the freezer taken under one lock
#[derive(Debug, Clone, PartialEq)]
pub struct FreezerSnapshot {
    pub entries: Vec<FrozenAddress>,
    pub enabled_count: usize,
    pub worker_running: bool,
}

/// Keeps a set of addresses pinned to fixed payloads
pub struct AddressFreezer<M: MemoryAccess + 'static> {
    shared: Arc<Shared<M>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl<M: MemoryAccess + 'static> AddressFreezer<M> {
    /// Creates a freezer that pauses `cycle_delay` after each full pass
    pub fn new(memory: Arc<M>, cycle_delay: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                memory,
                state: Mutex::new(FreezerState::default()),
                messages: Mutex::new(VecDeque::new()),
                cycle_delay,
            }),
            worker: Mutex::new(None),
        }
    }

    pub fn with_config(memory: Arc<M>, config: &FreezerConfig) -> Self {
        Self::new(memory, Duration::from_micros(config.cycle_delay_us))
    }

    /// Switches to another process, dropping every tracked entry
    pub fn set_pid(&self, pid: ProcessId) {
        let mut state = self.shared.lock_state();
        state.pid = Some(pid);
        state.entries.clear();
        state.enabled = 0;
        state.cursor = 0;
    }

    pub fn pid(&self) -> Option<ProcessId> {
        self.shared.lock_state().pid
    }

    /// Starts tracking `target`. New entries are disabled.
    ///
    /// Returns the index of the new entry.
    pub fn add_address(
        &self,
        target: MemoryAddress,
        value_type: ValueType,
        value_text: &str,
        payload: Vec<u8>,
        note: &str,
    ) -> MemoryResult<usize> {
        if payload.is_empty() {
            return Err(MemoryError::invalid_argument("empty payload"));
        }
        if !target.region.permissions.writable {
            return Err(MemoryError::ReadOnlyTarget(target.address));
        }

        let mut state = self.shared.lock_state();
        if state.pid.is_none() {
            return Err(MemoryError::invalid_state("no process attached"));
        }
        if state.entries.iter().any(|e| e.address() == target.address) {
            return Err(MemoryError::DuplicateTarget(target.address));
        }

        debug!(address = %target.address, %value_type, "tracking address");
        state.entries.push(FrozenAddress {
            target,
            enabled: false,
            value_type,
            value_text: value_text.to_string(),
            payload,
            note: note.to_string(),
        });
        Ok(state.entries.len() - 1)
    }

    pub fn remove_address(&self, index: usize) -> MemoryResult<()> {
        let mut state = self.shared.lock_state();
        check_index(&state, index)?;

        let removed = state.entries.remove(index);
        if removed.enabled {
            state.enabled -= 1;
        }
        // Keep the worker on the entry it would have visited next
        if index < state.cursor {
            state.cursor -= 1;
        }
        if state.cursor >= state.entries.len() {
            state.cursor = 0;
        }
        Ok(())
    }

    pub fn remove_all_addresses(&self) {
        let mut state = self.shared.lock_state();
        state.entries.clear();
        state.enabled = 0;
        state.cursor = 0;
    }

    pub fn enable_address(&self, index: usize) -> MemoryResult<()> {
        let mut state = self.shared.lock_state();
        check_index(&state, index)?;

        if !state.entries[index].enabled {
            state.entries[index].enabled = true;
            state.enabled += 1;
        }
        self.start_worker_if_needed(state);
        Ok(())
    }

    pub fn disable_address(&self, index: usize) -> MemoryResult<()> {
        let mut state = self.shared.lock_state();
        check_index(&state, index)?;

        if state.entries[index].enabled {
            state.entries[index].enabled = false;
            state.enabled -= 1;
        }
        Ok(())
    }

    pub fn enable_all_addresses(&self) {
        let mut state = self.shared.lock_state();
        for entry in state.entries.iter_mut() {
            entry.enabled = true;
        }
        state.enabled = state.entries.len();
        self.start_worker_if_needed(state);
    }

    pub fn disable_all_addresses(&self) {
        let mut state = self.shared.lock_state();
        for entry in state.entries.iter_mut() {
            entry.enabled = false;
        }
        state.enabled = 0;
    }

    /// Replaces the value of an entry in place, keeping its enabled flag.
    ///
    /// An empty `note` keeps the existing note.
    pub fn modify_address(
        &self,
        index: usize,
        value_type: ValueType,
        value_text: &str,
        payload: Vec<u8>,
        note: &str,
    ) -> MemoryResult<()> {
        if payload.is_empty() {
            return Err(MemoryError::invalid_argument("empty payload"));
        }

        let mut state = self.shared.lock_state();
        check_index(&state, index)?;

        let entry = &mut state.entries[index];
        entry.value_type = value_type;
        entry.value_text = value_text.to_string();
        entry.payload = payload;
        if !note.is_empty() {
            entry.note = note.to_string();
        }
        Ok(())
    }

    /// Oldest queued diagnostic from the worker
    pub fn pop_message(&self) -> Option<String> {
        self.shared.lock_messages().pop_front()
    }

    pub fn message_queue_size(&self) -> usize {
        self.shared.lock_messages().len()
    }

    /// Empties the diagnostic queue in FIFO order
    pub fn drain_messages(&self) -> Vec<String> {
        self.shared.lock_messages().drain(..).collect()
    }

    pub fn snapshot(&self) -> FreezerSnapshot {
        let state = self.shared.lock_state();
        FreezerSnapshot {
            entries: state.entries.clone(),
            enabled_count: state.enabled,
            worker_running: state.running,
        }
    }

    pub fn entries(&self) -> Vec<FrozenAddress> {
        self.shared.lock_state().entries.clone()
    }

    pub fn entry(&self, index: usize) -> MemoryResult<FrozenAddress> {
        let state = self.shared.lock_state();
        check_index(&state, index)?;
        Ok(state.entries[index].clone())
    }

    pub fn len(&self) -> usize {
        self.shared.lock_state().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn enabled_count(&self) -> usize {
        self.shared.lock_state().enabled
    }

    pub fn is_worker_running(&self) -> bool {
        self.shared.lock_state().running
    }

    /// Spawns the worker on a transition to a positive enabled count
    fn start_worker_if_needed(&self, mut state: MutexGuard<'_, FreezerState>) {
        if state.running || state.shutdown || state.enabled == 0 {
            return;
        }

        let shared = Arc::clone(&self.shared);
        let spawned = thread::Builder::new()
            .name("procmem-freezer".to_string())
            .spawn(move || worker::run(shared));

        match spawned {
            Ok(handle) => {
                state.running = true;
                info!(enabled = state.enabled, "freezer worker starting");
                let previous = self.lock_worker().replace(handle);
                drop(state);

                // A previous worker has already cleared `running` and is on its way out
                if let Some(previous) = previous {
                    join_worker(previous);
                }
            }
            Err(e) => {
                error!("Failed to spawn freezer worker: {}", e);
                drop(state);
                self.shared
                    .push_message(format!("Error starting the freezer worker: {}", e));
            }
        }
    }

    fn lock_worker(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.worker.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<M: MemoryAccess + 'static> Drop for AddressFreezer<M> {
    fn drop(&mut self) {
        self.shared.lock_state().shutdown = true;
        if let Some(handle) = self.lock_worker().take() {
            join_worker(handle);
        }
    }
}

impl<M: MemoryAccess + 'static> std::fmt::Debug for AddressFreezer<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.lock_state();
        f.debug_struct("AddressFreezer")
            .field("pid", &state.pid)
            .field("entries", &state.entries.len())
            .field("enabled", &state.enabled)
            .field("running", &state.running)
            .finish()
    }
}

fn join_worker(handle: JoinHandle<()>) {
    if let Err(payload) = handle.join() {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        error!(%reason, "freezer worker terminated by a panic");
    }
}

fn check_index(state: &FreezerState, index: usize) -> MemoryResult<()> {
    if index >= state.entries.len() {
        return Err(MemoryError::out_of_bounds(index, state.entries.len()));
    }
    Ok(())
}
