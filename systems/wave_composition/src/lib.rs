#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave composition derived from the balance tables.
//!
//! Every function here is a pure lookup over [`WaveTable`]: the same wave
//! number always yields the same queue, pacing and rewards.

use std::time::Duration;

use mystic_towers_core::{
    saturating_duration, Gold, Milestone, MonsterKind, MonsterTable, TierConfig, WaveTable,
};

const BOSS_QUEUE: [MonsterKind; 3] = [
    MonsterKind::BossGnome,
    MonsterKind::BossFastSpider,
    MonsterKind::BossBigSpider,
];

/// Builds the ordered spawn queue for `wave`.
///
/// Waves outside `1..=total_waves` compose to an empty queue.
#[must_use]
pub fn compose(table: &WaveTable, wave: u32) -> Vec<MonsterKind> {
    if wave == table.total_waves {
        return BOSS_QUEUE.to_vec();
    }

    let Some(tier) = tier(table, wave) else {
        return Vec::new();
    };
    let index = tier.index_of(wave);

    let mut counts: Vec<(MonsterKind, u32)> = tier
        .groups
        .iter()
        .map(|group| (group.kind, group.count.evaluate(wave, index)))
        .collect();

    if is_challenge_wave(table, wave) {
        for (_, count) in &mut counts {
            *count = scale_up(*count, table.challenge_multiplier);
        }
    }

    for extra in table.fixed_extras.iter().filter(|extra| extra.wave == wave) {
        add_count(&mut counts, extra.kind, extra.count);
    }

    if let Some(bonus) = tier.even_wave_bonus {
        add_count(&mut counts, bonus.kind, bonus.extra(wave));
    }

    counts
        .into_iter()
        .flat_map(|(kind, count)| std::iter::repeat(kind).take(count as usize))
        .collect()
}

/// Tier covering `wave`, if any. The final wave has no tier.
#[must_use]
pub fn tier(table: &WaveTable, wave: u32) -> Option<&TierConfig> {
    [&table.early, &table.mid, &table.late]
        .into_iter()
        .find(|tier| tier.covers(wave))
}

/// Delay before the next spawn of `wave`.
///
/// On the final wave the delay depends on whether the next monster is a boss.
#[must_use]
pub fn spawn_delay(table: &WaveTable, wave: u32, next: Option<MonsterKind>) -> Duration {
    let seconds = if wave >= table.total_waves {
        match next {
            Some(kind) if kind.is_boss() => table.boss.boss_delay,
            _ => table.boss.escort_delay,
        }
    } else {
        tier(table, wave).map_or(table.early.spawn_delay, |tier| tier.spawn_delay)
    };
    saturating_duration(seconds)
}

/// Gold granted for killing a `kind` spawned during `wave`.
#[must_use]
pub fn reward_for(table: &WaveTable, monsters: &MonsterTable, wave: u32, kind: MonsterKind) -> Gold {
    if kind == table.basic_kind {
        if let Some(tier) = tier(table, wave) {
            return tier.basic_reward.evaluate(wave, tier.index_of(wave));
        }
    }
    monsters.stats(kind).reward
}

/// Reports whether spawns during `wave` may pair up.
#[must_use]
pub fn pairs_spawns(table: &WaveTable, wave: u32) -> bool {
    wave >= table.paired_spawn.from_wave && wave != table.total_waves
}

/// Reports whether `wave` is a challenge wave with scaled counts.
#[must_use]
pub fn is_challenge_wave(table: &WaveTable, wave: u32) -> bool {
    table.challenge_interval != 0
        && wave % table.challenge_interval == 0
        && wave < table.total_waves
}

/// Milestone announced when `wave` starts.
#[must_use]
pub fn milestone(table: &WaveTable, wave: u32) -> Option<Milestone> {
    if wave == table.total_waves {
        Some(Milestone::Boss)
    } else if is_challenge_wave(table, wave) {
        Some(Milestone::Challenge)
    } else {
        None
    }
}

/// Gold granted for completing `wave`.
#[must_use]
pub fn completion_bonus(table: &WaveTable, wave: u32) -> Gold {
    if wave == table.completion_bonus.wave {
        table.completion_bonus.gold
    } else {
        Gold::ZERO
    }
}

fn scale_up(count: u32, multiplier: f64) -> u32 {
    let scaled = (f64::from(count) * multiplier).ceil();
    if scaled <= 0.0 {
        0
    } else {
        scaled as u32
    }
}

fn add_count(counts: &mut Vec<(MonsterKind, u32)>, kind: MonsterKind, extra: u32) {
    if extra == 0 {
        return;
    }
    match counts.iter_mut().find(|(existing, _)| *existing == kind) {
        Some((_, count)) => *count = count.saturating_add(extra),
        None => counts.push((kind, extra)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenge_scaling_rounds_up() {
        assert_eq!(scale_up(19, 1.5), 29);
        assert_eq!(scale_up(22, 1.5), 33);
        assert_eq!(scale_up(0, 1.5), 0);
    }

    #[test]
    fn extras_merge_into_existing_groups() {
        let mut counts = vec![(MonsterKind::Gnome, 3)];
        add_count(&mut counts, MonsterKind::FastSpider, 2);
        add_count(&mut counts, MonsterKind::Gnome, 1);
        add_count(&mut counts, MonsterKind::BigSpider, 0);
        assert_eq!(
            counts,
            vec![(MonsterKind::Gnome, 4), (MonsterKind::FastSpider, 2)]
        );
    }
}
