use std::collections::HashSet;

use crate::error::{BoardError, Result};
use crate::formation::FormationTemplate;
use crate::types::{
    MemberId, Occupant, PitchPosition, PositionAssignment, RosterMember, SavedSquad, SlotView,
};

/// Placement of roster members onto the slots of one formation.
///
/// The board holds exactly the template's slots in template order. A member
/// occupies at most one slot at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormationBoard {
    formation: String,
    slots: Vec<PitchPosition>,
    selection: Option<Occupant>,
}

impl FormationBoard {
    /// Creates an empty board for the template.
    pub fn new(template: &FormationTemplate) -> Self {
        Self::initialize(template, None, &[])
    }

    /// Builds a fresh board from a template and an optional saved squad.
    ///
    /// Assignments naming slots the template lacks are ignored. If a member is
    /// assigned twice, the first slot in template order keeps them. Display
    /// names come from the roster, then from the snapshot's `player_name`.
    pub fn initialize(
        template: &FormationTemplate,
        saved: Option<&SavedSquad>,
        roster: &[RosterMember],
    ) -> Self {
        let mut placed: HashSet<MemberId> = HashSet::new();

        if let Some(squad) = saved {
            for position in &squad.positions {
                if !template.contains(&position.field_position_code) {
                    log::warn!(
                        "squad {} names slot `{}` missing from {}",
                        squad.id,
                        position.field_position_code,
                        template.name()
                    );
                }
            }
        }

        let slots = template
            .slots()
            .iter()
            .map(|slot| {
                let occupant = saved
                    .and_then(|squad| {
                        squad
                            .positions
                            .iter()
                            .find(|p| p.field_position_code == slot.slot_id)
                    })
                    .and_then(|assignment| {
                        let member_id = assignment.team_member_id?;
                        if !placed.insert(member_id) {
                            log::warn!(
                                "member {member_id} assigned twice, leaving `{}` empty",
                                slot.slot_id
                            );
                            return None;
                        }
                        let name = roster
                            .iter()
                            .find(|m| m.id == member_id)
                            .map(|m| m.name.clone())
                            .or_else(|| assignment.player_name.clone())
                            .unwrap_or_default();
                        Some(Occupant { member_id, name })
                    });

                PitchPosition {
                    slot_id: slot.slot_id.clone(),
                    role: slot.role,
                    coordinate: slot.coordinate,
                    occupant,
                }
            })
            .collect();

        Self {
            formation: template.name().to_string(),
            slots,
            selection: None,
        }
    }

    pub fn formation(&self) -> &str {
        &self.formation
    }

    pub fn slots(&self) -> &[PitchPosition] {
        &self.slots
    }

    pub fn selection(&self) -> Option<&Occupant> {
        self.selection.as_ref()
    }

    pub fn occupant(&self, slot_id: &str) -> Option<&Occupant> {
        self.slots
            .iter()
            .find(|s| s.slot_id == slot_id)
            .and_then(|s| s.occupant.as_ref())
    }

    pub fn is_assigned(&self, member_id: MemberId) -> bool {
        self.slot_of(member_id).is_some()
    }

    /// Returns the slot currently held by the member.
    pub fn slot_of(&self, member_id: MemberId) -> Option<&str> {
        self.slots
            .iter()
            .find(|s| s.occupant.as_ref().is_some_and(|o| o.member_id == member_id))
            .map(|s| s.slot_id.as_str())
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|s| s.occupant.is_some()).count()
    }

    /// Puts `member` on `slot_id`.
    ///
    /// The member leaves any other slot first. A previous occupant of the
    /// target goes back to the bench. The selection is cleared.
    pub fn place(&mut self, slot_id: &str, member: Occupant) -> Result<()> {
        let target = self.index_of(slot_id)?;

        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if idx != target
                && slot
                    .occupant
                    .as_ref()
                    .is_some_and(|o| o.member_id == member.member_id)
            {
                slot.occupant = None;
            }
        }

        self.slots[target].occupant = Some(member);
        self.selection = None;
        Ok(())
    }

    /// Empties a slot and arms its former occupant.
    /// Returns `None` and changes nothing when the slot was already empty.
    pub fn clear(&mut self, slot_id: &str) -> Result<Option<Occupant>> {
        let idx = self.index_of(slot_id)?;
        let Some(former) = self.slots[idx].occupant.take() else {
            return Ok(None);
        };
        self.selection = Some(former.clone());
        Ok(Some(former))
    }

    /// Arms `member`, or disarms it when it is already armed.
    /// Returns `false` without changes when the member is already on the board.
    pub fn toggle_select(&mut self, member: &RosterMember) -> bool {
        if self
            .selection
            .as_ref()
            .is_some_and(|s| s.member_id == member.id)
        {
            self.selection = None;
            return true;
        }
        if self.is_assigned(member.id) {
            return false;
        }
        self.selection = Some(member.occupant());
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Exchanges the occupants of two slots. With one side empty this is a
    /// move. Unknown slot ids are a caller bug: logged, board unchanged.
    pub fn swap(&mut self, source: &str, target: &str) -> Result<()> {
        let a = self.index_of(source).inspect_err(|err| log::error!("swap: {err}"))?;
        let b = self.index_of(target).inspect_err(|err| log::error!("swap: {err}"))?;
        if a == b {
            return Ok(());
        }

        let moving = self.slots[a].occupant.take();
        self.slots[a].occupant = self.slots[b].occupant.take();
        self.slots[b].occupant = moving;
        Ok(())
    }

    /// Occupied slots as save assignments, in template order.
    pub fn to_save_request(&self) -> Vec<PositionAssignment> {
        self.slots
            .iter()
            .filter_map(|slot| {
                slot.occupant.as_ref().map(|o| PositionAssignment {
                    field_position_code: slot.slot_id.clone(),
                    team_member_id: Some(o.member_id),
                })
            })
            .collect()
    }

    /// Render views of every slot; `dragging` marks the drag source, if any.
    pub fn to_views(&self, dragging: Option<&str>) -> Vec<SlotView> {
        self.slots
            .iter()
            .map(|slot| SlotView {
                slot_id: slot.slot_id.clone(),
                role: slot.role,
                x: slot.coordinate.x,
                y: slot.coordinate.y,
                member_id: slot.occupant.as_ref().map(|o| o.member_id),
                name: slot
                    .occupant
                    .as_ref()
                    .map(|o| o.name.clone())
                    .unwrap_or_default(),
                dragging: dragging == Some(slot.slot_id.as_str()),
            })
            .collect()
    }

    fn index_of(&self, slot_id: &str) -> Result<usize> {
        self.slots
            .iter()
            .position(|s| s.slot_id == slot_id)
            .ok_or_else(|| BoardError::UnknownSlot {
                slot: slot_id.to_string(),
                formation: self.formation.clone(),
            })
    }
}
