//! Enumeration types shared between the engine and the state API.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Skills
// ---------------------------------------------------------------------------

/// A trainable skill, in the order the engine enumerates them.
///
/// [`Skill::Overall`] is the aggregate pseudo-skill. It has levels and
/// experience in the engine but is never reported as an individual skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Skill {
    /// Melee accuracy.
    Attack,
    /// Damage reduction.
    Defence,
    /// Melee max hit.
    Strength,
    /// Life points. The boosted level is the current health.
    Hitpoints,
    /// Ranged combat.
    Ranged,
    /// Prayer points.
    Prayer,
    /// Magic combat and utility spells.
    Magic,
    /// Cooking food.
    Cooking,
    /// Chopping trees.
    Woodcutting,
    /// Making bows and arrows.
    Fletching,
    /// Catching fish.
    Fishing,
    /// Lighting fires.
    Firemaking,
    /// Crafting jewellery and armour.
    Crafting,
    /// Smelting and smithing metal.
    Smithing,
    /// Mining ore.
    Mining,
    /// Cleaning herbs and mixing potions.
    Herblore,
    /// Shortcuts and run energy.
    Agility,
    /// Pickpocketing and stalls.
    Thieving,
    /// Assigned monster kills.
    Slayer,
    /// Growing crops.
    Farming,
    /// Crafting runes.
    Runecraft,
    /// Trapping creatures.
    Hunter,
    /// Building a house.
    Construction,
    /// Aggregate of all skills.
    Overall,
}

impl Skill {
    /// Every skill in engine enumeration order, aggregate last.
    pub const ALL: [Self; 24] = [
        Self::Attack,
        Self::Defence,
        Self::Strength,
        Self::Hitpoints,
        Self::Ranged,
        Self::Prayer,
        Self::Magic,
        Self::Cooking,
        Self::Woodcutting,
        Self::Fletching,
        Self::Fishing,
        Self::Firemaking,
        Self::Crafting,
        Self::Smithing,
        Self::Mining,
        Self::Herblore,
        Self::Agility,
        Self::Thieving,
        Self::Slayer,
        Self::Farming,
        Self::Runecraft,
        Self::Hunter,
        Self::Construction,
        Self::Overall,
    ];

    /// Display name used in the `stat` field of skill documents.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Attack => "Attack",
            Self::Defence => "Defence",
            Self::Strength => "Strength",
            Self::Hitpoints => "Hitpoints",
            Self::Ranged => "Ranged",
            Self::Prayer => "Prayer",
            Self::Magic => "Magic",
            Self::Cooking => "Cooking",
            Self::Woodcutting => "Woodcutting",
            Self::Fletching => "Fletching",
            Self::Fishing => "Fishing",
            Self::Firemaking => "Firemaking",
            Self::Crafting => "Crafting",
            Self::Smithing => "Smithing",
            Self::Mining => "Mining",
            Self::Herblore => "Herblore",
            Self::Agility => "Agility",
            Self::Thieving => "Thieving",
            Self::Slayer => "Slayer",
            Self::Farming => "Farming",
            Self::Runecraft => "Runecraft",
            Self::Hunter => "Hunter",
            Self::Construction => "Construction",
            Self::Overall => "Overall",
        }
    }

    /// Whether this is the aggregate pseudo-skill.
    pub const fn is_aggregate(self) -> bool {
        matches!(self, Self::Overall)
    }

    /// Iterate the individually trainable skills (everything but the aggregate).
    pub fn trainable() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(|skill| !skill.is_aggregate())
    }
}

// ---------------------------------------------------------------------------
// Item containers
// ---------------------------------------------------------------------------

/// The item containers exposed over the state API.
///
/// Engine implementations look containers up by [`Self::container_id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum InventoryKind {
    /// The 28-slot backpack.
    Inventory,
    /// Worn equipment slots.
    Equipment,
    /// The bank. Absent until the bank has been opened this session.
    Bank,
}

impl InventoryKind {
    /// Every container kind.
    pub const ALL: [Self; 3] = [Self::Inventory, Self::Equipment, Self::Bank];

    /// The engine's numeric container id.
    pub const fn container_id(self) -> u32 {
        match self {
            Self::Inventory => 93,
            Self::Equipment => 94,
            Self::Bank => 95,
        }
    }

    /// Route path serving this container.
    pub const fn path(self) -> &'static str {
        match self {
            Self::Inventory => "/inventory",
            Self::Equipment => "/equipment",
            Self::Bank => "/bank",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trainable_skills_exclude_overall() {
        let skills: Vec<Skill> = Skill::trainable().collect();
        assert_eq!(skills.len(), 23);
        assert!(!skills.contains(&Skill::Overall));
        assert_eq!(skills.first(), Some(&Skill::Attack));
        assert_eq!(skills.last(), Some(&Skill::Construction));
    }

    #[test]
    fn skill_names_are_title_case() {
        assert_eq!(Skill::Hitpoints.name(), "Hitpoints");
        assert_eq!(Skill::Runecraft.name(), "Runecraft");
    }

    #[test]
    fn container_ids_are_distinct() {
        let ids: Vec<u32> = InventoryKind::ALL.iter().map(|k| k.container_id()).collect();
        assert_eq!(ids, vec![93, 94, 95]);
        assert_eq!(InventoryKind::Bank.path(), "/bank");
    }
}
