//! Spawn roster of the running wave and the wave counter state machine.

use mystic_towers_core::{MonsterKind, SpawnQueueView};

/// Pending spawns of the current wave.
#[derive(Clone, Debug, Default)]
pub(crate) struct SpawnRoster {
    wave: u32,
    queue: Vec<MonsterKind>,
    cursor: usize,
    active: bool,
}

impl SpawnRoster {
    pub(crate) fn start(&mut self, wave: u32, queue: Vec<MonsterKind>) {
        self.wave = wave;
        self.queue = queue;
        self.cursor = 0;
        self.active = true;
    }

    pub(crate) fn clear(&mut self) {
        self.queue.clear();
        self.cursor = 0;
        self.active = false;
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn pending(&self) -> &[MonsterKind] {
        self.queue.get(self.cursor..).unwrap_or(&[])
    }

    /// Pops the queue front when it matches `kind`.
    pub(crate) fn pop_if(&mut self, kind: MonsterKind) -> bool {
        if !self.active || self.pending().first() != Some(&kind) {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Marks the wave finished once nothing is queued and nothing is live.
    pub(crate) fn settle(&mut self, no_live_monsters: bool) -> bool {
        if self.active && self.pending().is_empty() && no_live_monsters {
            self.active = false;
            return true;
        }
        false
    }

    pub(crate) fn view(&self) -> SpawnQueueView<'_> {
        SpawnQueueView::new(self.wave, self.active, self.pending())
    }
}

/// Whether a wave is currently running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum WavePhase {
    Idle,
    InProgress,
}

/// Wave counter and its Idle/InProgress phase.
#[derive(Clone, Copy, Debug)]
pub(crate) struct WaveManager {
    counter: u32,
    phase: WavePhase,
}

impl WaveManager {
    pub(crate) const fn new() -> Self {
        Self {
            counter: 0,
            phase: WavePhase::Idle,
        }
    }

    pub(crate) const fn counter(&self) -> u32 {
        self.counter
    }

    pub(crate) fn in_progress(&self) -> bool {
        self.phase == WavePhase::InProgress
    }

    /// Increments the counter when idle and returns the wave to run.
    pub(crate) fn start(&mut self) -> Option<u32> {
        if self.in_progress() {
            return None;
        }
        self.counter = self.counter.saturating_add(1);
        self.phase = WavePhase::InProgress;
        Some(self.counter)
    }

    /// Rewinds so that the next [`WaveManager::start`] runs `wave`.
    pub(crate) fn rewind_to(&mut self, wave: u32) {
        self.counter = wave.saturating_sub(1);
        self.phase = WavePhase::Idle;
    }

    /// Returns the finished wave once the roster reports it drained.
    pub(crate) fn settle(&mut self, roster_active: bool) -> Option<u32> {
        if self.in_progress() && !roster_active {
            self.phase = WavePhase::Idle;
            return Some(self.counter);
        }
        None
    }
}
