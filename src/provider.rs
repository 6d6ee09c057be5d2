use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use web_time::{SystemTime, UNIX_EPOCH};

use crate::error::ProviderError;
use crate::types::{RosterMember, SaveRequest, SavedSquad, SquadPosition, TeamId};

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Source of team rosters.
pub trait RosterProvider {
    fn list_members(&self, team_id: TeamId) -> ProviderResult<Vec<RosterMember>>;
}

/// Persistence of saved squads, one per (team, formation).
pub trait SquadStore {
    /// `Ok(None)` when nothing is saved for the pair yet.
    fn fetch_squad(&self, team_id: TeamId, formation: &str) -> ProviderResult<Option<SavedSquad>>;

    /// Upserts and returns the stored state.
    fn save_squad(&self, request: &SaveRequest) -> ProviderResult<SavedSquad>;
}

/// In-memory roster and squad storage.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    rosters: HashMap<TeamId, Vec<RosterMember>>,
    squads: RefCell<HashMap<(TeamId, String), SavedSquad>>,
    next_id: Cell<u64>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_roster(mut self, team_id: TeamId, members: Vec<RosterMember>) -> Self {
        self.rosters.insert(team_id, members);
        self
    }

    pub fn squad_count(&self) -> usize {
        self.squads.borrow().len()
    }

    fn player_name(&self, team_id: TeamId, member_id: Option<u64>) -> Option<String> {
        let member_id = member_id?;
        self.rosters
            .get(&team_id)?
            .iter()
            .find(|m| m.id == member_id)
            .map(|m| m.name.clone())
    }
}

fn timestamp() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    millis.to_string()
}

impl RosterProvider for MemoryProvider {
    fn list_members(&self, team_id: TeamId) -> ProviderResult<Vec<RosterMember>> {
        self.rosters
            .get(&team_id)
            .cloned()
            .ok_or_else(|| ProviderError::not_found(format!("team {team_id} has no roster")))
    }
}

impl SquadStore for MemoryProvider {
    fn fetch_squad(&self, team_id: TeamId, formation: &str) -> ProviderResult<Option<SavedSquad>> {
        Ok(self
            .squads
            .borrow()
            .get(&(team_id, formation.to_string()))
            .cloned())
    }

    fn save_squad(&self, request: &SaveRequest) -> ProviderResult<SavedSquad> {
        let key = (request.team_id, request.formation_type.clone());
        let now = timestamp();

        let positions = request
            .position_request_dto_list
            .iter()
            .enumerate()
            .map(|(idx, p)| SquadPosition {
                id: Some(idx as u64 + 1),
                field_position_code: p.field_position_code.clone(),
                team_member_id: p.team_member_id,
                player_name: self.player_name(request.team_id, p.team_member_id),
            })
            .collect();

        let mut squads = self.squads.borrow_mut();
        let squad = match squads.get_mut(&key) {
            Some(existing) => {
                existing.positions = positions;
                existing.updated_at = Some(now);
                existing.clone()
            }
            None => {
                let id = self.next_id.get() + 1;
                self.next_id.set(id);
                let created = SavedSquad {
                    id,
                    team_id: request.team_id,
                    formation_type: request.formation_type.clone(),
                    is_default: squads.keys().all(|(team, _)| *team != request.team_id),
                    created_at: Some(now.clone()),
                    updated_at: Some(now),
                    positions,
                };
                squads.insert(key, created.clone());
                created
            }
        };
        Ok(squad)
    }
}
