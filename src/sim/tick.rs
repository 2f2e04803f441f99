//! Fixed timestep simulation tick
//!
//! Frame order: boundary, player, resolver (projectiles and enemies), spawner.

use glam::Vec2;

use super::player::MoveIntent;
use super::progression::Stat;
use super::resolve::resolve_frame;
use super::state::{GameEvent, GamePhase, GameState};
use super::tank::TankClass;

/// Enemies closer than this make the autopilot back off
const AUTOPILOT_PANIC_DISTANCE: f32 = 220.0;

/// Input commands for a single tick, already edge-detected by the caller
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub movement: MoveIntent,
    /// Pointer in world space
    pub pointer: Option<Vec2>,
    /// Fire while held
    pub fire: bool,
    pub toggle_shop: bool,
    pub confirm_start: bool,
    /// Close the shop, or end the run
    pub cancel: bool,
    /// Spend a skill point (shop open only)
    pub upgrade_stat: Option<Stat>,
    /// Advance tank class (shop open only)
    pub select_tank: Option<TankClass>,
    /// Let the built-in pilot play
    pub autopilot: bool,
}

/// Advance the session by one step of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();
    if !(dt.is_finite() && dt > 0.0) {
        log::warn!("Ignoring tick with invalid dt {dt}");
        return;
    }

    let mut input = *input;
    if input.autopilot {
        autopilot(state, &mut input);
    }

    match state.phase {
        GamePhase::Welcome | GamePhase::GameOver => {
            if input.confirm_start {
                state.start_run();
            }
            return;
        }
        GamePhase::Transitioning => {
            if input.cancel {
                state.end_run();
                return;
            }
            state.arena.update(dt);
            if state.arena.is_animation_complete() {
                state.set_phase(GamePhase::Playing);
            }
            return;
        }
        GamePhase::Playing => {}
    }

    if input.cancel {
        if state.shop_open {
            state.shop_open = false;
        } else {
            state.end_run();
            return;
        }
    }
    if input.toggle_shop {
        state.shop_open = !state.shop_open;
        log::debug!("Shop {}", if state.shop_open { "opened" } else { "closed" });
    }
    if state.shop_open {
        shop(state, &input);
        return;
    }

    state.time_ticks += 1;
    state.elapsed += dt;
    state.stats.time_survived = state.elapsed;

    // Boundary
    state.arena.update(dt);

    // Player
    state.player.set_movement(input.movement);
    if let Some(pointer) = input.pointer {
        state.player.aim(pointer);
    }
    state.player.update(dt);
    state.player.constrain_to(&state.arena.rect());
    if input.fire {
        let shots = state.player.try_fire(&mut state.ids);
        state.stats.bullets_fired += shots.len() as u32;
        state.player_projectiles.extend(shots);
    }

    // Projectiles, enemies, damage, rewards
    resolve_frame(state, dt);

    // Spawner
    let boss_alive = state.boss_alive();
    let spawned = state.spawner.update(
        dt,
        state.elapsed,
        &state.arena.rect(),
        state.player.pos(),
        boss_alive,
        &state.tuning.enemies,
        &mut state.ids,
    );
    if let Some(enemy) = spawned {
        state.events.push(if enemy.is_boss() {
            GameEvent::BossSpawned { id: enemy.id }
        } else {
            GameEvent::EnemySpawned {
                id: enemy.id,
                kind: enemy.kind,
            }
        });
        state.enemies.push(enemy);
    }

    if state.player.is_dead() {
        log::info!("Player destroyed after {:.1}s", state.elapsed);
        state.events.push(GameEvent::PlayerDied);
        state.end_run();
    }
}

/// Shop overlay: upgrades only, the world stays frozen
fn shop(state: &mut GameState, input: &TickInput) {
    if let Some(stat) = input.upgrade_stat {
        if state.player.upgrade_stat(stat) {
            log::debug!(
                "Upgraded {} to {}",
                stat.label(),
                state.player.progression.stat_level(stat)
            );
        }
    }
    if let Some(class) = input.select_tank {
        if state.player.select_tank(class) {
            state.events.push(GameEvent::TankUpgraded { class });
        }
    }
}

/// Built-in pilot: keeps away from the nearest enemy while shooting it, and
/// spends every skill point and tank upgrade as soon as it has one
fn autopilot(state: &GameState, input: &mut TickInput) {
    match state.phase {
        GamePhase::Welcome => input.confirm_start = true,
        GamePhase::Transitioning | GamePhase::GameOver => {}
        GamePhase::Playing => {
            let player = &state.player;
            let progression = &player.progression;
            let stat = if progression.skill_points > 0 {
                // Lowest stat first, ties in shop order
                Stat::ALL
                    .iter()
                    .copied()
                    .filter(|&s| progression.stat_level(s) < progression.tuning().max_stat_level)
                    .min_by_key(|&s| progression.stat_level(s))
            } else {
                None
            };
            let tank = player.available_tanks().first().copied();
            let wants_shop = stat.is_some() || tank.is_some();

            if wants_shop != state.shop_open {
                input.toggle_shop = true;
            }
            if wants_shop {
                input.upgrade_stat = stat;
                input.select_tank = tank;
                return;
            }

            let pos = player.pos();
            let nearest = state.enemies.iter().min_by(|a, b| {
                a.body
                    .pos
                    .distance_squared(pos)
                    .total_cmp(&b.body.pos.distance_squared(pos))
            });
            match nearest {
                Some(enemy) => {
                    input.pointer = Some(enemy.body.pos);
                    input.fire = true;
                    if enemy.body.pos.distance(pos) < AUTOPILOT_PANIC_DISTANCE {
                        input.movement = steer(pos - enemy.body.pos);
                    } else {
                        input.movement = steer(state.arena.rect().center() - pos);
                    }
                }
                None => {
                    input.movement = steer(state.arena.rect().center() - pos);
                }
            }
        }
    }
}

/// Pressed-key approximation of a desired direction
fn steer(dir: Vec2) -> MoveIntent {
    let dir = dir.normalize_or_zero();
    MoveIntent {
        up: dir.y < -0.3,
        down: dir.y > 0.3,
        left: dir.x < -0.3,
        right: dir.x > 0.3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::enemy::{Enemy, EnemyKind, Scaling};

    fn start(state: &mut GameState) {
        let input = TickInput {
            confirm_start: true,
            ..Default::default()
        };
        tick(state, &input, SIM_DT);
        let idle = TickInput::default();
        while state.phase == GamePhase::Transitioning {
            tick(state, &idle, SIM_DT);
        }
    }

    #[test]
    fn test_welcome_to_playing() {
        let mut state = GameState::with_seed(12345);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Welcome);

        let input = TickInput {
            confirm_start: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Transitioning);

        let mut steps = 0;
        while state.phase == GamePhase::Transitioning {
            tick(&mut state, &TickInput::default(), SIM_DT);
            steps += 1;
        }
        assert_eq!(state.phase, GamePhase::Playing);
        assert!((steps - 120i32).abs() <= 1);
        assert!((state.arena.width() - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_shop_pauses_simulation() {
        let mut state = GameState::with_seed(1);
        start(&mut state);
        let toggle = TickInput {
            toggle_shop: true,
            ..Default::default()
        };
        tick(&mut state, &toggle, SIM_DT);
        assert!(state.shop_open);

        let arena = state.arena.target_rect();
        let elapsed = state.elapsed;
        for _ in 0..200 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.arena.target_rect(), arena);
        assert_eq!(state.elapsed, elapsed);
        assert!(state.enemies.is_empty());

        // Cancel closes the shop before it ends a run
        let cancel = TickInput {
            cancel: true,
            ..Default::default()
        };
        tick(&mut state, &cancel, SIM_DT);
        assert!(!state.shop_open);
        assert_eq!(state.phase, GamePhase::Playing);
        tick(&mut state, &cancel, SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.arena.width(), 900.0);
    }

    #[test]
    fn test_upgrades_only_in_shop() {
        let mut state = GameState::with_seed(1);
        start(&mut state);
        state.player.progression.skill_points = 1;
        let upgrade = TickInput {
            upgrade_stat: Some(Stat::Reload),
            ..Default::default()
        };
        tick(&mut state, &upgrade, SIM_DT);
        assert_eq!(state.player.progression.stat_level(Stat::Reload), 0);

        let open_and_upgrade = TickInput {
            toggle_shop: true,
            ..upgrade
        };
        tick(&mut state, &open_and_upgrade, SIM_DT);
        assert_eq!(state.player.progression.stat_level(Stat::Reload), 1);
        assert_eq!(state.player.progression.skill_points, 0);
    }

    #[test]
    fn test_firing_counts_bullets() {
        let mut state = GameState::with_seed(1);
        start(&mut state);
        let fire = TickInput {
            fire: true,
            pointer: Some(state.player.pos() + Vec2::X),
            ..Default::default()
        };
        tick(&mut state, &fire, SIM_DT);
        assert_eq!(state.stats.bullets_fired, 1);
        assert_eq!(state.player_projectiles.len(), 1);
    }

    #[test]
    fn test_spawns_after_interval() {
        let mut state = GameState::with_seed(3);
        start(&mut state);
        for _ in 0..91 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(!state.enemies.is_empty());
    }

    #[test]
    fn test_death_ends_run() {
        let mut state = GameState::with_seed(1);
        start(&mut state);
        let pos = state.player.pos();
        let id = state.ids.next_id();
        state.enemies.push(Enemy::new(
            id,
            EnemyKind::Turret,
            pos,
            Scaling::default(),
            &state.tuning.enemies,
        ));
        state.player.health = 5.0;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.contains(&GameEvent::PlayerDied));
    }

    #[test]
    fn test_events_cleared_each_tick() {
        let mut state = GameState::with_seed(1);
        let input = TickInput {
            confirm_start: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert!(!state.events.is_empty());
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_determinism() {
        // Two sessions with the same seed and inputs end up identical
        let mut a = GameState::with_seed(99999);
        let mut b = GameState::with_seed(99999);
        let pilot = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..3000 {
            tick(&mut a, &pilot, SIM_DT);
            tick(&mut b, &pilot, SIM_DT);
        }
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.stats, b.stats);
        assert_eq!(a.enemies.len(), b.enemies.len());
        assert_eq!(a.player.pos(), b.player.pos());
        assert_eq!(a.arena.rect(), b.arena.rect());
    }

    #[test]
    fn test_autopilot_plays() {
        let mut state = GameState::with_seed(7);
        let pilot = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..1200 {
            tick(&mut state, &pilot, SIM_DT);
        }
        assert_ne!(state.phase, GamePhase::Welcome);
        assert!(state.stats.bullets_fired > 0);
    }
}
