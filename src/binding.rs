//! Presentation binding — draft, committed value, and the slot calls between them.
//!
//! DESIGN
//! ======
//! The binding is the only caller of `PersistentSlot`. It keeps the user's
//! unsaved `draft` and a `committed` mirror of the stored value so the
//! screen can render without re-reading storage.
//!
//! Every intent moves through an explicit `Phase`. An intent that arrives
//! while another operation is in flight is answered with `Busy` and touches
//! nothing, which is the same as the screen disabling its buttons until the
//! outstanding call returns. The phase is held by a guard that drops back to
//! `Idle` when the call finishes or its future is dropped, so a cancelled
//! intent never leaves the screen stuck. The state lock is never held across
//! a slot call, so the view stays readable while I/O is pending.
//!
//! ERROR HANDLING
//! ==============
//! No slot failure escapes. A failed load degrades to "no data"; a failed
//! save or remove leaves draft and committed value as they were and records
//! a notice for the screen. The notice clears on the next success.

use std::sync::atomic::{AtomicU8, Ordering};

use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::slot::PersistentSlot;

/// Shown in place of the committed value when nothing is stored.
pub const NO_DATA: &str = "No data found";
pub const SCREEN_TITLE: &str = "My Fruit Storage";
pub const VALUE_LABEL: &str = "Saved Fruit:";

// =============================================================================
// PHASE & OUTCOMES
// =============================================================================

/// Operation currently in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Saving,
    Removing,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A stored value was found and is now committed.
    Loaded(String),
    /// Nothing stored.
    Empty,
    /// The read failed; the screen shows no data.
    Degraded,
    /// Load already ran (or is running) for this binding.
    Skipped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// Draft was empty after trimming; nothing was written.
    Rejected,
    Busy,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    Busy,
    Failed,
}

// =============================================================================
// SCREEN VIEW
// =============================================================================

/// Everything the screen needs for one render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScreenView {
    pub title: &'static str,
    pub label: &'static str,
    /// Committed value, or [`NO_DATA`] when empty.
    pub display: String,
    pub draft: String,
    pub phase: Phase,
    pub notice: Option<String>,
    /// Save/delete triggers accept input only while idle.
    pub triggers_enabled: bool,
}

// =============================================================================
// BINDING
// =============================================================================

#[derive(Debug, Default)]
struct BindingState {
    draft: String,
    committed: String,
    load_started: bool,
    notice: Option<String>,
}

/// Current phase, readable without the state lock.
#[derive(Debug, Default)]
struct PhaseCell(AtomicU8);

impl PhaseCell {
    fn get(&self) -> Phase {
        match self.0.load(Ordering::SeqCst) {
            1 => Phase::Loading,
            2 => Phase::Saving,
            3 => Phase::Removing,
            _ => Phase::Idle,
        }
    }

    /// Move from `Idle` to `phase`, or report the phase already in flight.
    fn enter(&self, phase: Phase) -> Result<PhaseGuard<'_>, Phase> {
        let code = match phase {
            Phase::Idle => 0,
            Phase::Loading => 1,
            Phase::Saving => 2,
            Phase::Removing => 3,
        };
        match self.0.compare_exchange(0, code, Ordering::SeqCst, Ordering::SeqCst) {
            Ok(_) => Ok(PhaseGuard { cell: self }),
            Err(_) => Err(self.get()),
        }
    }
}

/// Returns the cell to `Idle` when dropped, including when the owning
/// future is dropped mid-call.
struct PhaseGuard<'a> {
    cell: &'a PhaseCell,
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        self.cell.0.store(0, Ordering::SeqCst);
    }
}

pub struct PresentationBinding {
    slot: PersistentSlot,
    phase: PhaseCell,
    state: Mutex<BindingState>,
}

impl PresentationBinding {
    #[must_use]
    pub fn new(slot: PersistentSlot) -> Self {
        Self { slot, phase: PhaseCell::default(), state: Mutex::new(BindingState::default()) }
    }

    /// Replace the draft with the text field's current contents.
    pub async fn set_draft(&self, text: impl Into<String>) {
        self.state.lock().await.draft = text.into();
    }

    pub async fn draft(&self) -> String {
        self.state.lock().await.draft.clone()
    }

    /// Committed value; empty when nothing is stored.
    pub async fn committed(&self) -> String {
        self.state.lock().await.committed.clone()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    pub async fn view(&self) -> ScreenView {
        let state = self.state.lock().await;
        let phase = self.phase.get();
        let display = if state.committed.is_empty() { NO_DATA.to_owned() } else { state.committed.clone() };
        ScreenView {
            title: SCREEN_TITLE,
            label: VALUE_LABEL,
            display,
            draft: state.draft.clone(),
            phase,
            notice: state.notice.clone(),
            triggers_enabled: phase == Phase::Idle,
        }
    }

    /// Populate the committed value from storage. Runs once per binding.
    pub async fn load(&self) -> LoadOutcome {
        let _phase = match self.phase.enter(Phase::Loading) {
            Ok(guard) => guard,
            Err(current) => {
                debug!(phase = ?current, "load skipped");
                return LoadOutcome::Skipped;
            }
        };
        {
            let mut state = self.state.lock().await;
            if state.load_started {
                debug!("load skipped: already ran");
                return LoadOutcome::Skipped;
            }
            state.load_started = true;
        }

        let result = self.slot.read().await;

        let mut state = self.state.lock().await;
        match result {
            // EDGE: an empty stored string renders the same as no value.
            Ok(Some(value)) if !value.is_empty() => {
                info!(key = self.slot.key(), len = value.len(), "stored value loaded");
                state.committed.clone_from(&value);
                LoadOutcome::Loaded(value)
            }
            Ok(_) => {
                info!(key = self.slot.key(), "no stored value");
                LoadOutcome::Empty
            }
            Err(e) => {
                warn!(error = %e, "load failed; showing no data");
                LoadOutcome::Degraded
            }
        }
    }

    /// Write the draft through to storage if it has any non-whitespace text.
    ///
    /// The value written is the draft as typed, not the trimmed text.
    pub async fn save(&self) -> SaveOutcome {
        let _phase = match self.phase.enter(Phase::Saving) {
            Ok(guard) => guard,
            Err(current) => {
                debug!(phase = ?current, "save ignored while busy");
                return SaveOutcome::Busy;
            }
        };
        let value = {
            let state = self.state.lock().await;
            if state.draft.trim().is_empty() {
                debug!("save rejected: blank draft");
                return SaveOutcome::Rejected;
            }
            state.draft.clone()
        };

        let result = self.slot.write(&value).await;

        let mut state = self.state.lock().await;
        match result {
            Ok(()) => {
                state.committed = value;
                state.draft.clear();
                state.notice = None;
                SaveOutcome::Saved
            }
            Err(e) => {
                error!(error = %e, "save failed; draft kept");
                state.notice = Some(format!("Could not save: {e}"));
                SaveOutcome::Failed
            }
        }
    }

    /// Clear the slot. Allowed whether or not anything is stored.
    pub async fn remove(&self) -> RemoveOutcome {
        let _phase = match self.phase.enter(Phase::Removing) {
            Ok(guard) => guard,
            Err(current) => {
                debug!(phase = ?current, "remove ignored while busy");
                return RemoveOutcome::Busy;
            }
        };

        let result = self.slot.clear().await;

        let mut state = self.state.lock().await;
        match result {
            Ok(()) => {
                state.committed.clear();
                state.notice = None;
                RemoveOutcome::Removed
            }
            Err(e) => {
                error!(error = %e, "remove failed; value kept");
                state.notice = Some(format!("Could not delete: {e}"));
                RemoveOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
#[path = "binding_test.rs"]
mod tests;
