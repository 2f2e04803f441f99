//! Tank class upgrade table
//!
//! The upgrade graph is static data: every class knows its tier, its barrel
//! layout and the classes it can advance into. Some classes are reachable from
//! more than one parent, so this is a DAG keyed by [`TankClass`].

use serde::{Deserialize, Serialize};

use super::entity::BarrelSpec;
use crate::tuning::ProgressionTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TankClass {
    Basic,
    // Tier 2
    Twin,
    Sniper,
    MachineGun,
    FlankGuard,
    // Tier 3
    TripleShot,
    QuadTank,
    TwinFlank,
    Assassin,
    Hunter,
    Destroyer,
    Gunner,
    TriAngle,
    // Tier 4
    PentaShot,
    Triplet,
    OctoTank,
    TripleTwin,
    Ranger,
    Predator,
    Annihilator,
    Streamliner,
    Booster,
    Fighter,
}

/// Default barrel proportions relative to body radius
const LEN: f32 = 2.2;
const WID: f32 = 0.8;

const fn front(length: f32, width: f32) -> BarrelSpec {
    BarrelSpec::new(length, width, 0.0, 0.0)
}

const fn angled(angle: f32) -> BarrelSpec {
    BarrelSpec::new(LEN, WID, 0.0, angle)
}

const fn side(offset: f32, angle: f32) -> BarrelSpec {
    BarrelSpec::new(LEN, WID, offset, angle)
}

const fn rear(angle: f32) -> BarrelSpec {
    BarrelSpec::new(1.8, WID, 0.0, angle)
}

const BASIC: &[BarrelSpec] = &[front(LEN, WID)];
const TWIN: &[BarrelSpec] = &[side(-0.5, 0.0), side(0.5, 0.0)];
const SNIPER: &[BarrelSpec] = &[front(3.0, WID)];
const MACHINE_GUN: &[BarrelSpec] = &[front(2.0, 1.2)];
const FLANK_GUARD: &[BarrelSpec] = &[front(LEN, WID), rear(180.0)];

const TRIPLE_SHOT: &[BarrelSpec] = &[angled(-45.0), angled(45.0), angled(0.0)];
const QUAD_TANK: &[BarrelSpec] = &[angled(0.0), angled(90.0), angled(180.0), angled(270.0)];
const TWIN_FLANK: &[BarrelSpec] = &[
    side(-0.5, 0.0),
    side(0.5, 0.0),
    side(-0.5, 180.0),
    side(0.5, 180.0),
];
const ASSASSIN: &[BarrelSpec] = &[front(3.4, WID)];
const HUNTER: &[BarrelSpec] = &[front(3.2, WID), front(2.6, 1.1)];
const DESTROYER: &[BarrelSpec] = &[front(LEN, 1.5)];
const GUNNER: &[BarrelSpec] = &[
    BarrelSpec::new(2.0, 0.4, -0.6, 0.0),
    BarrelSpec::new(2.0, 0.4, 0.6, 0.0),
    BarrelSpec::new(2.4, 0.4, -0.25, 0.0),
    BarrelSpec::new(2.4, 0.4, 0.25, 0.0),
];
const TRI_ANGLE: &[BarrelSpec] = &[front(LEN, WID), rear(150.0), rear(210.0)];

const PENTA_SHOT: &[BarrelSpec] = &[
    angled(-45.0),
    angled(45.0),
    angled(-22.5),
    angled(22.5),
    front(2.5, WID),
];
const TRIPLET: &[BarrelSpec] = &[side(-0.55, 0.0), side(0.55, 0.0), front(2.5, WID)];
const OCTO_TANK: &[BarrelSpec] = &[
    angled(0.0),
    angled(45.0),
    angled(90.0),
    angled(135.0),
    angled(180.0),
    angled(225.0),
    angled(270.0),
    angled(315.0),
];
const TRIPLE_TWIN: &[BarrelSpec] = &[
    side(-0.5, 0.0),
    side(0.5, 0.0),
    side(-0.5, 120.0),
    side(0.5, 120.0),
    side(-0.5, 240.0),
    side(0.5, 240.0),
];
const RANGER: &[BarrelSpec] = &[front(3.6, WID)];
const PREDATOR: &[BarrelSpec] = &[front(3.4, WID), front(2.8, 1.1), front(2.2, 1.4)];
const ANNIHILATOR: &[BarrelSpec] = &[front(LEN, 1.9)];
const STREAMLINER: &[BarrelSpec] = &[
    front(3.0, WID),
    front(2.7, WID),
    front(2.4, WID),
    front(2.1, WID),
    front(1.8, WID),
];
const BOOSTER: &[BarrelSpec] = &[
    front(LEN, WID),
    rear(135.0),
    rear(225.0),
    rear(150.0),
    rear(210.0),
];
const FIGHTER: &[BarrelSpec] = &[
    front(LEN, WID),
    angled(90.0),
    angled(270.0),
    rear(150.0),
    rear(210.0),
];

impl TankClass {
    pub const ALL: [TankClass; 23] = [
        TankClass::Basic,
        TankClass::Twin,
        TankClass::Sniper,
        TankClass::MachineGun,
        TankClass::FlankGuard,
        TankClass::TripleShot,
        TankClass::QuadTank,
        TankClass::TwinFlank,
        TankClass::Assassin,
        TankClass::Hunter,
        TankClass::Destroyer,
        TankClass::Gunner,
        TankClass::TriAngle,
        TankClass::PentaShot,
        TankClass::Triplet,
        TankClass::OctoTank,
        TankClass::TripleTwin,
        TankClass::Ranger,
        TankClass::Predator,
        TankClass::Annihilator,
        TankClass::Streamliner,
        TankClass::Booster,
        TankClass::Fighter,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TankClass::Basic => "Basic",
            TankClass::Twin => "Twin",
            TankClass::Sniper => "Sniper",
            TankClass::MachineGun => "Machine Gun",
            TankClass::FlankGuard => "Flank Guard",
            TankClass::TripleShot => "Triple Shot",
            TankClass::QuadTank => "Quad Tank",
            TankClass::TwinFlank => "Twin Flank",
            TankClass::Assassin => "Assassin",
            TankClass::Hunter => "Hunter",
            TankClass::Destroyer => "Destroyer",
            TankClass::Gunner => "Gunner",
            TankClass::TriAngle => "Tri-Angle",
            TankClass::PentaShot => "Penta Shot",
            TankClass::Triplet => "Triplet",
            TankClass::OctoTank => "Octo Tank",
            TankClass::TripleTwin => "Triple Twin",
            TankClass::Ranger => "Ranger",
            TankClass::Predator => "Predator",
            TankClass::Annihilator => "Annihilator",
            TankClass::Streamliner => "Streamliner",
            TankClass::Booster => "Booster",
            TankClass::Fighter => "Fighter",
        }
    }

    /// Rank in the upgrade graph, 1 to 4
    pub fn tier(self) -> u8 {
        match self {
            TankClass::Basic => 1,
            TankClass::Twin
            | TankClass::Sniper
            | TankClass::MachineGun
            | TankClass::FlankGuard => 2,
            TankClass::TripleShot
            | TankClass::QuadTank
            | TankClass::TwinFlank
            | TankClass::Assassin
            | TankClass::Hunter
            | TankClass::Destroyer
            | TankClass::Gunner
            | TankClass::TriAngle => 3,
            _ => 4,
        }
    }

    /// Barrel layout applied when this class is selected
    pub fn barrels(self) -> &'static [BarrelSpec] {
        match self {
            TankClass::Basic => BASIC,
            TankClass::Twin => TWIN,
            TankClass::Sniper => SNIPER,
            TankClass::MachineGun => MACHINE_GUN,
            TankClass::FlankGuard => FLANK_GUARD,
            TankClass::TripleShot => TRIPLE_SHOT,
            TankClass::QuadTank => QUAD_TANK,
            TankClass::TwinFlank => TWIN_FLANK,
            TankClass::Assassin => ASSASSIN,
            TankClass::Hunter => HUNTER,
            TankClass::Destroyer => DESTROYER,
            TankClass::Gunner => GUNNER,
            TankClass::TriAngle => TRI_ANGLE,
            TankClass::PentaShot => PENTA_SHOT,
            TankClass::Triplet => TRIPLET,
            TankClass::OctoTank => OCTO_TANK,
            TankClass::TripleTwin => TRIPLE_TWIN,
            TankClass::Ranger => RANGER,
            TankClass::Predator => PREDATOR,
            TankClass::Annihilator => ANNIHILATOR,
            TankClass::Streamliner => STREAMLINER,
            TankClass::Booster => BOOSTER,
            TankClass::Fighter => FIGHTER,
        }
    }

    /// Classes reachable from this one
    pub fn upgrades(self) -> &'static [TankClass] {
        use TankClass::*;
        match self {
            Basic => &[Twin, Sniper, MachineGun, FlankGuard],
            Twin => &[TripleShot, QuadTank, TwinFlank],
            Sniper => &[Assassin, Hunter],
            MachineGun => &[Destroyer, Gunner],
            FlankGuard => &[TriAngle, QuadTank, TwinFlank],
            TripleShot => &[PentaShot, Triplet],
            QuadTank => &[OctoTank],
            TwinFlank => &[TripleTwin],
            Assassin => &[Ranger],
            Hunter => &[Predator],
            Destroyer => &[Annihilator],
            Gunner => &[Streamliner],
            TriAngle => &[Booster, Fighter],
            PentaShot | Triplet | OctoTank | TripleTwin | Ranger | Predator | Annihilator
            | Streamliner | Booster | Fighter => &[],
        }
    }

    /// Upgrades open to a player at `level`
    pub fn available_upgrades(self, level: u32, tuning: &ProgressionTuning) -> Vec<TankClass> {
        self.upgrades()
            .iter()
            .copied()
            .filter(|next| level >= unlock_level(next.tier(), tuning))
            .collect()
    }

    /// Whether `next` is a direct child of this class and unlocked at `level`
    pub fn can_upgrade_to(self, next: TankClass, level: u32, tuning: &ProgressionTuning) -> bool {
        self.upgrades().contains(&next) && level >= unlock_level(next.tier(), tuning)
    }
}

/// Player level at which classes of `tier` become selectable
pub fn unlock_level(tier: u8, tuning: &ProgressionTuning) -> u32 {
    match tier {
        0 | 1 => 0,
        t => tuning
            .tier_unlock_levels
            .get(usize::from(t) - 2)
            .copied()
            .unwrap_or(u32::MAX),
    }
}
