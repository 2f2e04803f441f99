//! Per-frame collision and lifecycle resolution
//!
//! Runs in a fixed order so no projectile is processed by two paths and no
//! enemy is credited twice:
//! 1. player projectiles advance; those leaving the arena push a wall and die
//! 2. surviving player projectiles hit enemies
//! 3. enemy projectiles advance, hit the player or leave the arena
//! 4. enemies advance (turrets may fire), ram the player, leave the world

use super::collision::{circles_overlap, exit_edge, outside_world, separation};
use super::enemy::Enemy;
use super::state::{GameEvent, GameState};

/// Resolve one frame of movement and collisions
pub fn resolve_frame(state: &mut GameState, dt: f32) {
    player_projectiles_vs_walls(state, dt);
    player_projectiles_vs_enemies(state);
    enemy_projectiles(state, dt);
    enemies(state, dt);
}

/// Step 1: a shot that leaves the arena is spent on the wall it crossed
pub fn player_projectiles_vs_walls(state: &mut GameState, dt: f32) {
    let rect = state.arena.rect();
    let arena = &mut state.arena;
    let stats = &mut state.stats;
    let events = &mut state.events;
    state.player_projectiles.retain_mut(|proj| {
        proj.advance(dt);
        let Some(edge) = exit_edge(proj.pos, &rect) else {
            return true;
        };
        let expanded = arena.hit_wall(edge);
        log::debug!("Wall hit on {:?} (expanded: {expanded})", edge);
        stats.wall_hits += 1;
        events.push(GameEvent::WallHit { edge });
        false
    });
}

/// Step 2: each shot hits at most one enemy per frame, never the same one twice
pub fn player_projectiles_vs_enemies(state: &mut GameState) {
    let projectiles = std::mem::take(&mut state.player_projectiles);
    let mut survivors = Vec::with_capacity(projectiles.len());

    for mut proj in projectiles {
        let target = state.enemies.iter().position(|enemy| {
            !proj.has_hit(enemy.id)
                && circles_overlap(proj.pos, proj.radius, enemy.body.pos, enemy.body.radius)
        });
        let Some(index) = target else {
            survivors.push(proj);
            continue;
        };

        let enemy = &mut state.enemies[index];
        enemy.take_damage(proj.damage);
        let spent = proj.register_hit(enemy.id);
        if enemy.is_dead() {
            let dead = state.enemies.remove(index);
            state.credit_kill(&dead);
        }
        if !spent {
            survivors.push(proj);
        }
    }

    state.player_projectiles = survivors;
}

/// Step 3: enemy shots damage the player; walls absorb them without growing
pub fn enemy_projectiles(state: &mut GameState, dt: f32) {
    let rect = state.arena.rect();
    let player = &mut state.player;
    let events = &mut state.events;
    state.enemy_projectiles.retain_mut(|proj| {
        proj.advance(dt);
        if circles_overlap(proj.pos, proj.radius, player.body.pos, player.body.radius) {
            player.take_damage(proj.damage);
            events.push(GameEvent::PlayerDamaged {
                amount: proj.damage,
            });
            return false;
        }
        exit_edge(proj.pos, &rect).is_none()
    });
}

/// Step 4: move enemies, apply ramming, then drop the dead and the lost
pub fn enemies(state: &mut GameState, dt: f32) {
    let player_pos = state.player.pos();
    let player_radius = state.player.body.radius;
    let body_damage = state.player.stats().body_damage;
    let tuning = &state.tuning.enemies;
    let mut fired = Vec::new();

    for enemy in &mut state.enemies {
        fired.extend(enemy.update(dt, player_pos, tuning, &mut state.ids));

        if !enemy.can_ram()
            || !circles_overlap(enemy.body.pos, enemy.body.radius, player_pos, player_radius)
        {
            continue;
        }
        let damage = if enemy.is_boss() {
            tuning.ram_damage + tuning.boss_ram_bonus
        } else {
            tuning.ram_damage
        };
        state.player.take_damage(damage);
        state.events.push(GameEvent::PlayerDamaged { amount: damage });
        enemy.take_damage(body_damage);
        enemy.contact_cooldown = tuning.contact_cooldown;
        enemy.body.pos += separation(enemy.body.pos, enemy.body.radius, player_pos, player_radius);
    }

    // Appended after step 3, so these first move next frame
    state.enemy_projectiles.append(&mut fired);

    let screen = state.arena.screen();
    let margin = state.tuning.enemies.world_margin;
    let all = std::mem::take(&mut state.enemies);
    let mut alive: Vec<Enemy> = Vec::with_capacity(all.len());
    for enemy in all {
        if enemy.is_dead() {
            state.credit_kill(&enemy);
        } else if outside_world(enemy.body.pos, screen, margin) {
            log::debug!("{:?} #{} left the world", enemy.kind, enemy.id);
        } else {
            alive.push(enemy);
        }
    }
    state.enemies = alive;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::{EnemyKind, Scaling};
    use crate::sim::entity::{Faction, Projectile};
    use crate::sim::state::GamePhase;
    use glam::Vec2;

    fn playing_state() -> GameState {
        let mut state = GameState::with_seed(11);
        state.phase = GamePhase::Playing;
        state
    }

    fn spawn_enemy(state: &mut GameState, kind: EnemyKind, pos: Vec2) -> u32 {
        let id = state.ids.next_id();
        let enemy = Enemy::new(id, kind, pos, Scaling::default(), &state.tuning.enemies);
        state.enemies.push(enemy);
        id
    }

    fn player_shot(state: &mut GameState, pos: Vec2, vel: Vec2, damage: f32) {
        let id = state.ids.next_id();
        state
            .player_projectiles
            .push(Projectile::new(id, Faction::Player, pos, vel, 6.0, damage));
    }

    #[test]
    fn test_wall_exit_takes_priority_over_enemy_hit() {
        let mut state = playing_state();
        let rect = state.arena.rect();
        // Enemy straddles the right wall; shot crosses the wall onto it
        let target = Vec2::new(rect.right + 2.0, rect.center().y);
        spawn_enemy(&mut state, EnemyKind::Chaser, target);
        player_shot(
            &mut state,
            Vec2::new(rect.right - 1.0, target.y),
            Vec2::new(180.0, 0.0),
            5.0,
        );
        let target_before = state.arena.target_rect().right;

        resolve_frame(&mut state, 1.0 / 60.0);

        assert!(state.player_projectiles.is_empty());
        assert_eq!(state.stats.wall_hits, 1);
        assert_eq!(state.stats.enemies_killed, 0);
        assert_eq!(state.player.progression.currency, 0);
        assert!(state.arena.target_rect().right > target_before);
    }

    #[test]
    fn test_hit_consumes_single_pierce_shot() {
        let mut state = playing_state();
        let center = state.arena.rect().center();
        spawn_enemy(
            &mut state,
            EnemyKind::Turret,
            center + Vec2::new(200.0, 0.0),
        );
        player_shot(&mut state, center + Vec2::new(165.0, 0.0), Vec2::ZERO, 1.0);

        player_projectiles_vs_enemies(&mut state);

        assert!(state.player_projectiles.is_empty());
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].health, 59.0);
    }

    #[test]
    fn test_kill_credits_exactly_once() {
        let mut state = playing_state();
        let center = state.arena.rect().center();
        let pos = center + Vec2::new(200.0, 0.0);
        spawn_enemy(&mut state, EnemyKind::Chaser, pos);
        // Two lethal shots on the same enemy in the same frame
        player_shot(&mut state, pos, Vec2::ZERO, 3.0);
        player_shot(&mut state, pos, Vec2::ZERO, 3.0);

        player_projectiles_vs_enemies(&mut state);

        assert!(state.enemies.is_empty());
        assert_eq!(state.stats.enemies_killed, 1);
        assert_eq!(state.player.progression.currency, 5);
        // The second shot found nothing to hit and flies on
        assert_eq!(state.player_projectiles.len(), 1);
    }

    #[test]
    fn test_penetrating_shot_never_hits_same_enemy_twice() {
        let mut state = playing_state();
        let center = state.arena.rect().center();
        let a = center + Vec2::new(200.0, 0.0);
        let b = center + Vec2::new(260.0, 0.0);
        spawn_enemy(&mut state, EnemyKind::Turret, a);
        spawn_enemy(&mut state, EnemyKind::Turret, b);
        let id = state.ids.next_id();
        state.player_projectiles.push(
            Projectile::new(id, Faction::Player, a, Vec2::ZERO, 6.0, 1.0).with_pierce(2),
        );

        player_projectiles_vs_enemies(&mut state);
        assert_eq!(state.enemies[0].health, 59.0);
        assert_eq!(state.player_projectiles.len(), 1);

        // Still overlapping the first enemy: it is skipped
        player_projectiles_vs_enemies(&mut state);
        assert_eq!(state.enemies[0].health, 59.0);
        assert_eq!(state.player_projectiles.len(), 1);

        state.player_projectiles[0].pos = b;
        player_projectiles_vs_enemies(&mut state);
        assert_eq!(state.enemies[1].health, 59.0);
        assert!(state.player_projectiles.is_empty());
    }

    #[test]
    fn test_enemy_shot_damages_player_without_moving_walls() {
        let mut state = playing_state();
        let player = state.player.pos();
        let id = state.ids.next_id();
        state
            .enemy_projectiles
            .push(Projectile::new(id, Faction::Enemy, player, Vec2::ZERO, 6.0, 8.0));
        let id = state.ids.next_id();
        let outside = Vec2::new(state.arena.rect().left - 5.0, player.y);
        state
            .enemy_projectiles
            .push(Projectile::new(id, Faction::Enemy, outside, Vec2::ZERO, 6.0, 8.0));
        let target = state.arena.target_rect();

        enemy_projectiles(&mut state, 1.0 / 60.0);

        assert!(state.enemy_projectiles.is_empty());
        assert_eq!(state.player.health, 92.0);
        assert_eq!(state.arena.target_rect(), target);
        assert_eq!(state.stats.wall_hits, 0);
    }

    #[test]
    fn test_ram_damages_both_and_respects_cooldown() {
        let mut state = playing_state();
        let player = state.player.pos();
        spawn_enemy(&mut state, EnemyKind::Turret, player + Vec2::new(30.0, 0.0));

        enemies(&mut state, 1.0 / 60.0);
        assert_eq!(state.player.health, 100.0 - 30.0);
        assert_eq!(state.enemies[0].health, 59.0);
        let dist = state.enemies[0].body.pos.distance(player);
        assert!(dist >= state.enemies[0].body.radius + state.player.body.radius - 1e-3);

        // Pushed clear and cooling down: no second hit next frame
        state.enemies[0].body.pos = player + Vec2::new(30.0, 0.0);
        enemies(&mut state, 1.0 / 60.0);
        assert_eq!(state.player.health, 70.0);
    }

    #[test]
    fn test_rammed_to_death_is_credited() {
        let mut state = playing_state();
        let player = state.player.pos();
        let id = spawn_enemy(&mut state, EnemyKind::Chaser, player + Vec2::new(10.0, 0.0));
        state.enemies[0].health = 1.0;

        enemies(&mut state, 1.0 / 60.0);

        assert!(state.enemies.is_empty());
        assert_eq!(state.stats.enemies_killed, 1);
        assert!(state.events.iter().any(
            |e| matches!(e, GameEvent::EnemyKilled { id: killed, .. } if *killed == id)
        ));
    }

    #[test]
    fn test_enemies_far_outside_world_removed() {
        let mut state = playing_state();
        spawn_enemy(&mut state, EnemyKind::Chaser, Vec2::new(-5000.0, 500.0));
        enemies(&mut state, 1.0 / 60.0);
        assert!(state.enemies.is_empty());
        assert_eq!(state.stats.enemies_killed, 0);
    }

    #[test]
    fn test_turret_volley_queued_for_next_frame() {
        let mut state = playing_state();
        let player = state.player.pos();
        spawn_enemy(
            &mut state,
            EnemyKind::Turret,
            player + Vec2::new(300.0, 0.0),
        );
        if let crate::sim::enemy::Behavior::Turret { reload_timer } =
            &mut state.enemies[0].behavior
        {
            *reload_timer = 0.0;
        }
        enemies(&mut state, 1.0 / 60.0);
        assert_eq!(state.enemy_projectiles.len(), 8);
    }
}
