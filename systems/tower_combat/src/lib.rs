#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Decides which targeted towers fire this frame.
//!
//! Both inputs arrive ordered by tower id: cooldown views are sorted on
//! construction and targeting walks towers in view order. The system joins
//! them in a single pass and queues at most one shot per tower.

use std::{cmp::Ordering, iter::Peekable};

use mystic_towers_core::{Command, TowerCooldownSnapshot, TowerCooldownView, TowerTarget};

/// Emits `FireProjectile` commands for towers that are off cooldown.
#[derive(Debug, Default)]
pub struct TowerCombat {
    ordered_targets: Vec<TowerTarget>,
}

impl TowerCombat {
    /// Creates the system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one `Command::FireProjectile` per ready, targeted tower to `out`.
    ///
    /// Towers still cooling down and targets naming unknown towers are skipped.
    pub fn handle(
        &mut self,
        tower_cooldowns: TowerCooldownView,
        tower_targets: &[TowerTarget],
        out: &mut Vec<Command>,
    ) {
        if tower_targets.is_empty() {
            return;
        }

        self.ordered_targets.clear();
        self.ordered_targets.extend_from_slice(tower_targets);
        self.ordered_targets.sort_by_key(|target| target.tower);
        self.ordered_targets.dedup_by_key(|target| target.tower);

        let mut cooldowns = tower_cooldowns.iter().peekable();
        for target in &self.ordered_targets {
            let Some(cooldown) = seek(&mut cooldowns, target) else {
                continue;
            };
            if cooldown.ready_in.is_zero() {
                out.push(Command::FireProjectile {
                    tower: target.tower,
                    target: target.monster,
                });
            }
        }
    }
}

/// Advances the cooldown cursor to `target`'s tower, if it is present.
fn seek<'a, I>(cooldowns: &mut Peekable<I>, target: &TowerTarget) -> Option<&'a TowerCooldownSnapshot>
where
    I: Iterator<Item = &'a TowerCooldownSnapshot>,
{
    while let Some(cooldown) = cooldowns.peek() {
        match cooldown.tower.cmp(&target.tower) {
            Ordering::Less => {
                let _ = cooldowns.next();
            }
            Ordering::Equal => return cooldowns.next(),
            Ordering::Greater => return None,
        }
    }
    None
}
