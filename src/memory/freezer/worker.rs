//! Background rewrite loop

use super::{FrozenAddress, Shared};
use crate::core::types::MemoryResult;
use crate::memory::access::MemoryAccess;
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, warn};

/// Clears `running` when the worker unwinds so a later enable can respawn it
struct UnwindGuard<'a, M> {
    shared: &'a Shared<M>,
}

impl<M> Drop for UnwindGuard<'_, M> {
    fn drop(&mut self) {
        if !thread::panicking() {
            return;
        }
        self.shared.lock_state().running = false;
        error!("freezer worker panicked");
        self.shared.push_message(
            "Error: the freezer worker stopped unexpectedly. Enable an address to restart it."
                .to_string(),
        );
    }
}

/// Round-robin over the entries until nothing is enabled or the freezer is dropped.
///
/// Every step runs under the state lock; the lock is released between steps
/// so the foreground can interleave its own operations.
pub(super) fn run<M: MemoryAccess>(shared: Arc<Shared<M>>) {
    debug!("freezer worker started");
    let _guard = UnwindGuard { shared: &*shared };

    loop {
        let pass_complete = {
            let mut state = shared.lock_state();
            if state.shutdown || state.enabled == 0 {
                state.running = false;
                break;
            }
            let Some(pid) = state.pid else {
                state.running = false;
                break;
            };

            if state.cursor >= state.entries.len() {
                state.cursor = 0;
            }
            let index = state.cursor;
            state.cursor += 1;

            let entry = &state.entries[index];
            if entry.enabled {
                let outcome = shared.memory.write_memory(pid, entry.address(), &entry.payload);
                if let Some(message) = failure_message(entry, outcome) {
                    warn!(pid, address = %entry.address(), "{}", message);
                    state.entries[index].enabled = false;
                    state.enabled -= 1;
                    shared.push_message(message);
                }
            }

            state.cursor >= state.entries.len()
        };

        if pass_complete && !shared.cycle_delay.is_zero() {
            thread::sleep(shared.cycle_delay);
        } else {
            thread::yield_now();
        }
    }

    debug!("freezer worker stopped");
}

/// Diagnostic for a write that failed or moved fewer bytes than the payload
fn failure_message(entry: &FrozenAddress, outcome: MemoryResult<usize>) -> Option<String> {
    match outcome {
        Ok(written) if written == entry.payload.len() => None,
        Ok(written) => Some(format!(
            "WARNING: Disabling address {:x} due to a partial write of {}/{}.",
            entry.address(),
            written,
            entry.payload.len()
        )),
        Err(e) => Some(format!(
            "Error writing to memory location {:x}: {}",
            entry.address(),
            e
        )),
    }
}
