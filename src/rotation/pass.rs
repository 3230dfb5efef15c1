use rand::seq::SliceRandom;

use super::RotationCursor;
use crate::context::{RotationConfig, RotationContext};
use crate::lang::Lang;
use crate::permissions;

/// Outcome counts of a single rotation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub equipped: usize,
    /// Equip call reported failure
    pub failed: usize,
    /// Disconnected mid-pass or holding the bypass permission
    pub skipped: usize,
}

/// Pick the gear set for one player.
///
/// Random mode draws independently on every call; sequential mode returns the
/// entry at `cursor`.
pub fn select_gear_set(config: &RotationConfig, cursor: usize) -> &str {
    let sets = &config.gear_sets;
    if config.equip_random_gear_set {
        if let Some(set) = sets.choose(&mut rand::thread_rng()) {
            return set;
        }
    }
    sets.get(cursor % sets.len().max(1))
        .map(String::as_str)
        .unwrap_or_default()
}

/// Equip a gear set on every connected player.
///
/// Yields to the scheduler after each player, which is also where an aborted
/// pass stops. The cursor only advances once the whole list was walked.
pub async fn run_rotation_pass(ctx: &RotationContext, cursor: &RotationCursor) -> PassSummary {
    let config = &ctx.config;
    let host = &ctx.host;
    let index = cursor.current();
    let mut summary = PassSummary::default();

    for id in host.players.active_players() {
        let player = host
            .players
            .find_player(id)
            .filter(|p| !permissions::has_permission(&*host.permissions, p, permissions::IGNORE));

        match player {
            Some(player) => {
                let gear_set = select_gear_set(config, index);
                if host.gear.equip_gear_set(&player, gear_set, true) {
                    let message =
                        ctx.lang
                            .format(Lang::GEAR_ROTATED, player.language.as_deref(), &[gear_set]);
                    host.messenger.send_reply(&player, &message);
                    summary.equipped += 1;
                } else {
                    tracing::debug!(player = %player.id, gear_set, "Equip failed");
                    summary.failed += 1;
                }
            }
            None => summary.skipped += 1,
        }

        tokio::task::yield_now().await;
    }

    if !config.equip_random_gear_set {
        cursor.advance(config.gear_sets.len());
    }

    summary
}
