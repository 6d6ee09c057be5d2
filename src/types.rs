use serde::{Deserialize, Serialize};

pub type MemberId = u64;
pub type TeamId = u64;
pub type SquadId = u64;

/// Coarse position group a roster member plays in. Any value the backend
/// sends outside the four groups reads as `Etc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionGroup {
    GK,
    DF,
    MF,
    FW,
    #[serde(other)]
    Etc,
}

/// Role label of a pitch slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    GK,
    LB,
    CB,
    RB,
    LCB,
    RCB,
    SW,
    LWB,
    RWB,
    CDM,
    CM,
    LCM,
    RCM,
    CAM,
    LM,
    RM,
    LW,
    RW,
    LF,
    RF,
    SS,
    CF,
    ST,
}

impl Role {
    pub fn is_goalkeeper(&self) -> bool {
        matches!(self, Role::GK)
    }
}

/// Normalized pitch coordinate, both axes in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: u8,
    pub y: u8,
}

impl Coordinate {
    pub const MAX: u8 = 100;

    pub fn in_range(&self) -> bool {
        self.x <= Self::MAX && self.y <= Self::MAX
    }
}

/// Roster member placed on a slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Occupant {
    pub member_id: MemberId,
    pub name: String,
}

impl Occupant {
    pub fn new(member_id: MemberId, name: impl Into<String>) -> Self {
        Self {
            member_id,
            name: name.into(),
        }
    }
}

/// A person eligible for placement, as listed by the roster provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterMember {
    pub id: MemberId,
    #[serde(rename = "username")]
    pub name: String,
    #[serde(rename = "position")]
    pub preferred: PositionGroup,
}

impl RosterMember {
    pub fn occupant(&self) -> Occupant {
        Occupant::new(self.id, self.name.clone())
    }
}

/// One slot of the board: fixed slot data plus the current occupant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PitchPosition {
    pub slot_id: String,
    pub role: Role,
    pub coordinate: Coordinate,
    pub occupant: Option<Occupant>,
}

/// Assignment row of a saved squad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SquadPosition {
    #[serde(default)]
    pub id: Option<u64>,
    pub field_position_code: String,
    #[serde(default)]
    pub team_member_id: Option<MemberId>,
    #[serde(default)]
    pub player_name: Option<String>,
}

/// Server-side snapshot of a squad for one (team, formation) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSquad {
    pub id: SquadId,
    pub team_id: TeamId,
    pub formation_type: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub positions: Vec<SquadPosition>,
}

/// A single `(slot, member)` pair submitted on save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionAssignment {
    pub field_position_code: String,
    pub team_member_id: Option<MemberId>,
}

/// Body of a save/upsert call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub team_id: TeamId,
    pub formation_type: String,
    pub position_request_dto_list: Vec<PositionAssignment>,
}

/// Render view of one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotView {
    pub slot_id: String,
    pub role: Role,
    pub x: u8,
    pub y: u8,
    pub member_id: Option<MemberId>,
    pub name: String,
    /// Contract:
    /// - `true` only for the slot a drag was started from.
    /// - Not part of the redraw comparison.
    pub dragging: bool,
}

/// Public board state returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardState {
    pub formation: String,
    pub slots: Vec<SlotView>,
    pub selection: Option<Occupant>,
    pub squad_id: Option<SquadId>,
    pub team_id: Option<TeamId>,
}
