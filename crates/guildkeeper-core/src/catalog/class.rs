//! Class catalog: class name -> combat role + subclass list.
//!
//! The role on a character record is always derived from this table when a
//! class is selected; it is never accepted as direct input.

use guildkeeper_types::character::Role;

/// One entry in the class catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassInfo {
    pub name: &'static str,
    pub role: Role,
    pub subclasses: &'static [&'static str],
}

const CLASSES: &[ClassInfo] = &[
    ClassInfo {
        name: "Frost Mage",
        role: Role::Dps,
        subclasses: &["Icicle", "Deep Freeze"],
    },
    ClassInfo {
        name: "Pyromancer",
        role: Role::Dps,
        subclasses: &["Cinder", "Wildfire"],
    },
    ClassInfo {
        name: "Shadowblade",
        role: Role::Dps,
        subclasses: &["Ambush", "Phantom Edge"],
    },
    ClassInfo {
        name: "Stormcaller",
        role: Role::Dps,
        subclasses: &["Tempest", "Thunderlord"],
    },
    ClassInfo {
        name: "Ironclad",
        role: Role::Tank,
        subclasses: &["Bulwark", "Juggernaut"],
    },
    ClassInfo {
        name: "Warden",
        role: Role::Tank,
        subclasses: &["Stonewall", "Thornguard"],
    },
    ClassInfo {
        name: "Lightbringer",
        role: Role::Support,
        subclasses: &["Benediction", "Aegis"],
    },
    ClassInfo {
        name: "Chanter",
        role: Role::Support,
        subclasses: &["Harmony", "Warsong"],
    },
];

/// All classes, in display order.
pub fn classes() -> &'static [ClassInfo] {
    CLASSES
}

/// Look up a class by its exact name.
pub fn class_by_name(name: &str) -> Option<&'static ClassInfo> {
    CLASSES.iter().find(|c| c.name == name)
}
