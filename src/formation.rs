use std::collections::HashSet;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{BoardError, Result};
use crate::types::{Coordinate, Role};

/// Fixed data of one slot in a formation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotTemplate {
    pub slot_id: String,
    pub role: Role,
    pub coordinate: Coordinate,
}

/// Immutable, named list of slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormationTemplate {
    name: String,
    slots: Vec<SlotTemplate>,
}

impl FormationTemplate {
    /// Builds a template, rejecting empty slot lists, duplicate slot ids,
    /// out-of-range coordinates and anything but exactly one goalkeeper slot.
    pub fn new(name: impl Into<String>, slots: Vec<SlotTemplate>) -> Result<Self> {
        let name = name.into();
        if slots.is_empty() {
            return Err(BoardError::InvalidTemplate(format!("{name} has no slots")));
        }

        let mut seen = HashSet::with_capacity(slots.len());
        for slot in &slots {
            if !seen.insert(slot.slot_id.as_str()) {
                return Err(BoardError::InvalidTemplate(format!(
                    "{name} repeats slot `{}`",
                    slot.slot_id
                )));
            }
            if !slot.coordinate.in_range() {
                return Err(BoardError::InvalidTemplate(format!(
                    "{name} slot `{}` is off the pitch",
                    slot.slot_id
                )));
            }
        }

        let keepers = slots.iter().filter(|s| s.role.is_goalkeeper()).count();
        if keepers != 1 {
            return Err(BoardError::InvalidTemplate(format!(
                "{name} must have exactly one goalkeeper slot, found {keepers}"
            )));
        }

        Ok(Self { name, slots })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slots(&self) -> &[SlotTemplate] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, slot_id: &str) -> bool {
        self.slots.iter().any(|s| s.slot_id == slot_id)
    }
}

/// Tactical grouping used by the formation picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TacticalCategory {
    Attacking,
    Defensive,
    Balanced,
    MidfieldControl,
}

impl TacticalCategory {
    pub const ALL: [TacticalCategory; 4] = [
        TacticalCategory::Attacking,
        TacticalCategory::Defensive,
        TacticalCategory::Balanced,
        TacticalCategory::MidfieldControl,
    ];

    /// Formations offered under this category; the first is the default.
    pub fn formations(&self) -> &'static [&'static str] {
        match self {
            TacticalCategory::Attacking => &["4-3-3", "3-4-3"],
            TacticalCategory::Defensive => &["4-2-3-1", "5-3-2"],
            TacticalCategory::Balanced => &["4-4-2", "4-1-4-1"],
            TacticalCategory::MidfieldControl => &["3-5-2", "4-2-3-1"],
        }
    }

    pub fn default_formation(&self) -> &'static str {
        self.formations()[0]
    }
}

type SlotRow = (&'static str, Role, u8, u8);

const F433: &[SlotRow] = &[
    ("gk", Role::GK, 50, 90),
    ("lb", Role::LB, 20, 70),
    ("cb1", Role::CB, 40, 75),
    ("cb2", Role::CB, 60, 75),
    ("rb", Role::RB, 80, 70),
    ("cm1", Role::CM, 30, 50),
    ("cm2", Role::CM, 50, 55),
    ("cm3", Role::CM, 70, 50),
    ("lw", Role::LW, 25, 25),
    ("st", Role::ST, 50, 20),
    ("rw", Role::RW, 75, 25),
];

const F442: &[SlotRow] = &[
    ("gk", Role::GK, 50, 90),
    ("lb", Role::LB, 20, 70),
    ("cb1", Role::CB, 40, 75),
    ("cb2", Role::CB, 60, 75),
    ("rb", Role::RB, 80, 70),
    ("lm", Role::LM, 20, 45),
    ("cm1", Role::CM, 40, 50),
    ("cm2", Role::CM, 60, 50),
    ("rm", Role::RM, 80, 45),
    ("st1", Role::ST, 40, 20),
    ("st2", Role::ST, 60, 20),
];

const F4231: &[SlotRow] = &[
    ("gk", Role::GK, 50, 90),
    ("lb", Role::LB, 20, 70),
    ("cb1", Role::CB, 40, 75),
    ("cb2", Role::CB, 60, 75),
    ("rb", Role::RB, 80, 70),
    ("cdm1", Role::CDM, 40, 55),
    ("cdm2", Role::CDM, 60, 55),
    ("cam", Role::CAM, 50, 35),
    ("lw", Role::LW, 25, 30),
    ("rw", Role::RW, 75, 30),
    ("st", Role::ST, 50, 15),
];

const F343: &[SlotRow] = &[
    ("gk", Role::GK, 50, 90),
    ("lcb", Role::LCB, 30, 75),
    ("cb", Role::CB, 50, 80),
    ("rcb", Role::RCB, 70, 75),
    ("lm", Role::LM, 20, 50),
    ("cm1", Role::CM, 40, 55),
    ("cm2", Role::CM, 60, 55),
    ("rm", Role::RM, 80, 50),
    ("lw", Role::LW, 25, 25),
    ("st", Role::ST, 50, 20),
    ("rw", Role::RW, 75, 25),
];

const F4123: &[SlotRow] = &[
    ("gk", Role::GK, 50, 90),
    ("lb", Role::LB, 20, 70),
    ("cb1", Role::CB, 40, 75),
    ("cb2", Role::CB, 60, 75),
    ("rb", Role::RB, 80, 70),
    ("cdm", Role::CDM, 50, 60),
    ("cm1", Role::CM, 35, 45),
    ("cm2", Role::CM, 65, 45),
    ("lw", Role::LW, 25, 25),
    ("st", Role::ST, 50, 18),
    ("rw", Role::RW, 75, 25),
];

const F352: &[SlotRow] = &[
    ("gk", Role::GK, 50, 90),
    ("lcb", Role::LCB, 30, 75),
    ("cb", Role::CB, 50, 80),
    ("rcb", Role::RCB, 70, 75),
    ("lwb", Role::LWB, 15, 55),
    ("cm1", Role::CM, 35, 50),
    ("cm2", Role::CM, 50, 45),
    ("cm3", Role::CM, 65, 50),
    ("rwb", Role::RWB, 85, 55),
    ("st1", Role::ST, 40, 20),
    ("st2", Role::ST, 60, 20),
];

const F532: &[SlotRow] = &[
    ("gk", Role::GK, 50, 90),
    ("lcb1", Role::LCB, 25, 78),
    ("lcb2", Role::LCB, 40, 80),
    ("cb", Role::CB, 50, 82),
    ("rcb1", Role::RCB, 60, 80),
    ("rcb2", Role::RCB, 75, 78),
    ("cm1", Role::CM, 35, 50),
    ("cm2", Role::CM, 50, 55),
    ("cm3", Role::CM, 65, 50),
    ("st1", Role::ST, 40, 20),
    ("st2", Role::ST, 60, 20),
];

const F451: &[SlotRow] = &[
    ("gk", Role::GK, 50, 90),
    ("lb", Role::LB, 20, 70),
    ("cb1", Role::CB, 40, 75),
    ("cb2", Role::CB, 60, 75),
    ("rb", Role::RB, 80, 70),
    ("lm", Role::LM, 20, 45),
    ("cm1", Role::CM, 35, 50),
    ("cm2", Role::CM, 50, 55),
    ("cm3", Role::CM, 65, 50),
    ("rm", Role::RM, 80, 45),
    ("st", Role::ST, 50, 20),
];

const F4141: &[SlotRow] = &[
    ("gk", Role::GK, 50, 90),
    ("lb", Role::LB, 20, 70),
    ("cb1", Role::CB, 40, 75),
    ("cb2", Role::CB, 60, 75),
    ("rb", Role::RB, 80, 70),
    ("cdm", Role::CDM, 50, 60),
    ("lm", Role::LM, 20, 40),
    ("cam1", Role::CAM, 40, 45),
    ("cam2", Role::CAM, 60, 45),
    ("rm", Role::RM, 80, 40),
    ("st", Role::ST, 50, 15),
];

const TABLES: &[(&str, &[SlotRow])] = &[
    ("4-3-3", F433),
    ("4-4-2", F442),
    ("4-2-3-1", F4231),
    ("3-4-3", F343),
    ("4-1-2-3", F4123),
    ("3-5-2", F352),
    ("5-3-2", F532),
    ("4-5-1", F451),
    ("4-1-4-1", F4141),
];

static CATALOG: Lazy<Vec<FormationTemplate>> = Lazy::new(|| {
    TABLES
        .iter()
        .filter_map(|(name, rows)| {
            let slots = rows
                .iter()
                .map(|&(slot_id, role, x, y)| SlotTemplate {
                    slot_id: slot_id.to_string(),
                    role,
                    coordinate: Coordinate { x, y },
                })
                .collect();
            match FormationTemplate::new(*name, slots) {
                Ok(template) => Some(template),
                Err(err) => {
                    log::error!("dropping built-in formation {name}: {err}");
                    None
                }
            }
        })
        .collect()
});

/// All built-in formations, in picker order.
pub fn catalog() -> &'static [FormationTemplate] {
    &CATALOG
}

pub fn formation_names() -> Vec<&'static str> {
    CATALOG.iter().map(|t| t.name()).collect()
}

/// Looks up a built-in formation by name.
pub fn template(name: &str) -> Result<&'static FormationTemplate> {
    CATALOG
        .iter()
        .find(|t| t.name() == name)
        .ok_or_else(|| BoardError::UnknownFormation(name.to_string()))
}
