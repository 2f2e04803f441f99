//! Player level, XP, skill points and derived combat stats

use serde::{Deserialize, Serialize};

use crate::tuning::{PlayerTuning, ProgressionTuning};

/// Number of upgradeable stats
pub const STAT_COUNT: usize = 8;

/// Upgradeable player stats, in shop order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    HealthRegen,
    MaxHealth,
    BodyDamage,
    BulletSpeed,
    BulletPenetration,
    BulletDamage,
    Reload,
    MovementSpeed,
}

impl Stat {
    pub const ALL: [Stat; STAT_COUNT] = [
        Stat::HealthRegen,
        Stat::MaxHealth,
        Stat::BodyDamage,
        Stat::BulletSpeed,
        Stat::BulletPenetration,
        Stat::BulletDamage,
        Stat::Reload,
        Stat::MovementSpeed,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Checked lookup from a shop slot index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Stat::HealthRegen => "Health Regen",
            Stat::MaxHealth => "Max Health",
            Stat::BodyDamage => "Body Damage",
            Stat::BulletSpeed => "Bullet Speed",
            Stat::BulletPenetration => "Bullet Penetration",
            Stat::BulletDamage => "Bullet Damage",
            Stat::Reload => "Reload",
            Stat::MovementSpeed => "Movement Speed",
        }
    }
}

/// Combat values computed from stat levels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedStats {
    pub max_health: f32,
    /// Health per second
    pub regen: f32,
    pub body_damage: f32,
    pub bullet_speed: f32,
    /// Distinct enemies one projectile may hit
    pub penetration: u32,
    pub bullet_damage: f32,
    /// Seconds between volleys
    pub reload_interval: f32,
    pub move_speed: f32,
}

impl DerivedStats {
    /// Pure function of the stat levels; calling it twice gives the same result
    pub fn from_levels(levels: &[u8; STAT_COUNT], tuning: &PlayerTuning) -> Self {
        let level = |stat: Stat| f32::from(levels[stat.index()]);
        let penetration =
            tuning.base_penetration + tuning.penetration_per_level * level(Stat::BulletPenetration);
        Self {
            max_health: tuning.base_max_health
                + tuning.max_health_per_level * level(Stat::MaxHealth),
            regen: tuning.base_regen + tuning.regen_per_level * level(Stat::HealthRegen),
            body_damage: tuning.base_body_damage
                + tuning.body_damage_per_level * level(Stat::BodyDamage),
            bullet_speed: tuning.base_bullet_speed
                + tuning.bullet_speed_per_level * level(Stat::BulletSpeed),
            penetration: penetration.max(1.0).round() as u32,
            bullet_damage: tuning.base_bullet_damage
                + tuning.bullet_damage_per_level * level(Stat::BulletDamage),
            reload_interval: tuning.base_reload * tuning.reload_factor.powf(level(Stat::Reload)),
            move_speed: tuning.base_move_speed
                + tuning.move_speed_per_level * level(Stat::MovementSpeed),
        }
    }

    /// Volleys per second; grows as the reload interval shrinks
    pub fn fire_rate(&self) -> f32 {
        if self.reload_interval > 0.0 {
            1.0 / self.reload_interval
        } else {
            f32::INFINITY
        }
    }
}

/// Level, XP, skill points and currency for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progression {
    pub level: u32,
    pub xp: u32,
    pub skill_points: u32,
    pub currency: u32,
    pub stat_levels: [u8; STAT_COUNT],
    stats: DerivedStats,
    tuning: ProgressionTuning,
    player_tuning: PlayerTuning,
}

impl Progression {
    pub fn new(tuning: ProgressionTuning, player_tuning: PlayerTuning) -> Self {
        let stat_levels = [0; STAT_COUNT];
        Self {
            level: 1,
            xp: 0,
            skill_points: 0,
            currency: 0,
            stats: DerivedStats::from_levels(&stat_levels, &player_tuning),
            stat_levels,
            tuning,
            player_tuning,
        }
    }

    /// Total XP earned since level 1 at the moment `level` is left
    pub fn cumulative_xp(&self, level: u32) -> u32 {
        self.tuning.xp_per_level.saturating_mul(level)
    }

    /// XP needed to advance from `level` to `level + 1`
    pub fn xp_required(&self, level: u32) -> u32 {
        let reached = self.cumulative_xp(level.saturating_sub(1));
        self.cumulative_xp(level).saturating_sub(reached).max(1)
    }

    /// XP needed for the next level-up from where the player is now
    pub fn xp_to_next(&self) -> u32 {
        self.xp_required(self.level)
    }

    pub fn is_max_level(&self) -> bool {
        self.level >= self.tuning.max_level
    }

    pub fn earn_currency(&mut self, amount: u32) {
        self.currency = self.currency.saturating_add(amount);
    }

    /// Add XP, levelling up as many times as it pays for. Returns levels gained.
    pub fn earn_xp(&mut self, amount: u32) -> u32 {
        self.xp = self.xp.saturating_add(amount);
        let mut gained = 0;
        while !self.is_max_level() {
            let required = self.xp_required(self.level);
            if self.xp < required {
                break;
            }
            self.xp -= required;
            self.level += 1;
            self.skill_points += 1;
            gained += 1;
        }
        if gained > 0 {
            log::info!(
                "Level up to {} ({} skill points)",
                self.level,
                self.skill_points
            );
        }
        gained
    }

    /// Spend a skill point on `stat`. Returns false (and changes nothing)
    /// without points or at the stat cap.
    pub fn upgrade_stat(&mut self, stat: Stat) -> bool {
        let index = stat.index();
        if self.skill_points == 0 || self.stat_levels[index] >= self.tuning.max_stat_level {
            return false;
        }
        self.skill_points -= 1;
        self.stat_levels[index] += 1;
        self.recalculate_stats();
        true
    }

    /// Index-based variant of [`Self::upgrade_stat`] for shop slots
    pub fn upgrade_stat_index(&mut self, index: usize) -> bool {
        Stat::from_index(index).is_some_and(|stat| self.upgrade_stat(stat))
    }

    pub fn recalculate_stats(&mut self) {
        self.stats = DerivedStats::from_levels(&self.stat_levels, &self.player_tuning);
    }

    pub fn stats(&self) -> &DerivedStats {
        &self.stats
    }

    pub fn stat_level(&self, stat: Stat) -> u8 {
        self.stat_levels[stat.index()]
    }

    pub fn tuning(&self) -> &ProgressionTuning {
        &self.tuning
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn progression() -> Progression {
        Progression::new(ProgressionTuning::default(), PlayerTuning::default())
    }

    #[test]
    fn test_multi_level_up_in_one_award() {
        let mut p = progression();
        let gained = p.earn_xp(250);
        assert_eq!(gained, 2);
        assert_eq!(p.level, 3);
        assert_eq!(p.xp, 50);
        assert_eq!(p.skill_points, 2);
    }

    #[test]
    fn test_level_thresholds_are_cumulative() {
        let p = progression();
        assert_eq!(p.cumulative_xp(1), 100);
        assert_eq!(p.cumulative_xp(2), 200);
        assert_eq!(p.xp_required(1), 100);
        assert_eq!(p.xp_required(2), 100);

        let mut p = progression();
        assert_eq!(p.earn_xp(200), 2);
        assert_eq!(p.level, 3);
        assert_eq!(p.xp, 0);
        assert_eq!(p.xp_to_next(), 100);
    }

    #[test]
    fn test_level_capped() {
        let mut p = progression();
        p.earn_xp(u32::MAX);
        assert_eq!(p.level, 45);
        assert_eq!(p.skill_points, 44);
    }

    #[test]
    fn test_currency_does_not_touch_stats() {
        let mut p = progression();
        let before = *p.stats();
        p.earn_currency(40);
        assert_eq!(p.currency, 40);
        assert_eq!(*p.stats(), before);
    }

    #[test]
    fn test_upgrade_requires_points_and_respects_cap() {
        let mut p = progression();
        assert!(!p.upgrade_stat(Stat::Reload));
        assert_eq!(p.stat_level(Stat::Reload), 0);

        p.skill_points = 10;
        for _ in 0..7 {
            assert!(p.upgrade_stat(Stat::Reload));
        }
        assert!(!p.upgrade_stat(Stat::Reload));
        assert_eq!(p.stat_level(Stat::Reload), 7);
        assert_eq!(p.skill_points, 3);
    }

    #[test]
    fn test_out_of_range_stat_index_rejected() {
        let mut p = progression();
        p.skill_points = 1;
        assert!(!p.upgrade_stat_index(8));
        assert_eq!(p.skill_points, 1);
        assert!(p.upgrade_stat_index(7));
        assert_eq!(p.stat_level(Stat::MovementSpeed), 1);
    }

    #[test]
    fn test_reload_interval_curve() {
        let mut p = progression();
        p.skill_points = 2;
        p.upgrade_stat(Stat::Reload);
        p.upgrade_stat(Stat::Reload);
        let expected = 0.4 * 0.9f32.powi(2);
        assert!((p.stats().reload_interval - expected).abs() < 1e-6);
    }

    #[test]
    fn test_recalculate_is_idempotent() {
        let mut p = progression();
        p.stat_levels = [3, 1, 4, 1, 5, 2, 6, 5];
        p.recalculate_stats();
        let first = *p.stats();
        p.recalculate_stats();
        assert_eq!(*p.stats(), first);
    }

    #[test]
    fn test_penetration_starts_at_one() {
        let p = progression();
        assert_eq!(p.stats().penetration, 1);
    }

    proptest! {
        #[test]
        fn prop_xp_loop_conserves_total(amounts in prop::collection::vec(0u32..2000, 1..20)) {
            let mut p = progression();
            let total: u64 = amounts.iter().map(|&a| u64::from(a)).sum();
            for a in amounts {
                p.earn_xp(a);
            }
            // Everything awarded is either spent on levels or still held
            let spent: u64 = (1..p.level).map(|l| u64::from(p.xp_required(l))).sum();
            prop_assert_eq!(spent + u64::from(p.xp), total);
            prop_assert_eq!(spent, u64::from(p.cumulative_xp(p.level - 1)));
            if !p.is_max_level() {
                prop_assert!(p.xp < p.xp_to_next());
            }
        }

        #[test]
        fn prop_stat_upgrade_never_decreases_derived(
            levels in prop::array::uniform8(0u8..7),
            stat in 0usize..STAT_COUNT,
        ) {
            let tuning = PlayerTuning::default();
            let before = DerivedStats::from_levels(&levels, &tuning);
            let mut raised = levels;
            raised[stat] += 1;
            let after = DerivedStats::from_levels(&raised, &tuning);
            prop_assert!(after.max_health >= before.max_health);
            prop_assert!(after.regen >= before.regen);
            prop_assert!(after.body_damage >= before.body_damage);
            prop_assert!(after.bullet_speed >= before.bullet_speed);
            prop_assert!(after.penetration >= before.penetration);
            prop_assert!(after.bullet_damage >= before.bullet_damage);
            prop_assert!(after.fire_rate() >= before.fire_rate());
            prop_assert!(after.move_speed >= before.move_speed);
        }
    }
}
