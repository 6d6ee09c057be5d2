use crate::board::FormationBoard;
use crate::config::EditorConfig;
use crate::error::{BoardError, ErrorKind, ProviderError, Result};
use crate::formation::{self, FormationTemplate, TacticalCategory};
use crate::provider::{RosterProvider, SquadStore};
use crate::reconcile;
use crate::types::{
    BoardState, MemberId, Occupant, RosterMember, SaveRequest, SavedSquad, SquadId, TeamId,
};

/// Originating parameters of an in-flight provider call.
///
/// A response is applied only while the editor still shows the same team and
/// formation the ticket was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    team_id: TeamId,
    formation: String,
}

impl LoadTicket {
    pub fn team_id(&self) -> TeamId {
        self.team_id
    }

    pub fn formation(&self) -> &str {
        &self.formation
    }
}

/// Result of handing a provider response to the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// State was recomputed; `redraw` is false when it renders the same.
    Applied { redraw: bool },
    /// The selection changed while the call was in flight; nothing applied.
    Stale,
    /// The provider rejected the session; nothing applied.
    SessionExpired,
    /// Any other failure; nothing applied.
    Failed(ProviderError),
}

/// What a click on a pitch slot did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotClick {
    Placed,
    PickedUp(Occupant),
    Nothing,
}

/// Formation board bound to a team/formation selection and its roster.
pub struct SquadEditor {
    config: EditorConfig,
    category: TacticalCategory,
    team_id: Option<TeamId>,
    template: &'static FormationTemplate,
    board: FormationBoard,
    roster: Vec<RosterMember>,
    squad_id: Option<SquadId>,
    dragging: Option<String>,
}

impl SquadEditor {
    pub fn new(config: EditorConfig) -> Result<Self> {
        config.validate()?;
        let template = formation::template(&config.default_formation)?;

        Ok(Self {
            category: config.default_category,
            team_id: None,
            template,
            board: FormationBoard::new(template),
            roster: Vec::new(),
            squad_id: None,
            dragging: None,
            config,
        })
    }

    pub fn board(&self) -> &FormationBoard {
        &self.board
    }

    pub fn team_id(&self) -> Option<TeamId> {
        self.team_id
    }

    pub fn formation(&self) -> &str {
        self.template.name()
    }

    pub fn category(&self) -> TacticalCategory {
        self.category
    }

    pub fn roster(&self) -> &[RosterMember] {
        &self.roster
    }

    pub fn squad_id(&self) -> Option<SquadId> {
        self.squad_id
    }

    pub fn dragging(&self) -> Option<&str> {
        self.dragging.as_deref()
    }

    /// Switches team. The board is emptied and the roster dropped; callers
    /// load fresh data afterwards. Returns `false` if nothing changed.
    pub fn select_team(&mut self, team_id: Option<TeamId>) -> bool {
        if self.team_id == team_id {
            return false;
        }
        self.team_id = team_id;
        self.roster.clear();
        self.reset_board();
        true
    }

    /// Switches formation, falling back to the configured fallback for names
    /// the catalog does not know. Returns the formation now active.
    pub fn select_formation(&mut self, name: &str) -> &str {
        let template = self.resolve_template(name);
        if template.name() != self.template.name() {
            self.template = template;
            self.reset_board();
        }
        self.template.name()
    }

    /// Switches category and moves to its first formation.
    pub fn select_category(&mut self, category: TacticalCategory) -> &str {
        self.category = category;
        self.select_formation(category.default_formation())
    }

    /// Starts a load for the current selection; `None` without a team.
    pub fn begin_load(&self) -> Option<LoadTicket> {
        self.team_id.map(|team_id| LoadTicket {
            team_id,
            formation: self.template.name().to_string(),
        })
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        self.team_id == Some(ticket.team_id) && self.template.name() == ticket.formation
    }

    /// Applies a roster response. Only the team has to match; rosters do not
    /// depend on the formation.
    pub fn complete_roster(
        &mut self,
        ticket: &LoadTicket,
        result: std::result::Result<Vec<RosterMember>, ProviderError>,
    ) -> LoadOutcome {
        if self.team_id != Some(ticket.team_id) {
            log::debug!("discarding roster for team {}", ticket.team_id);
            return LoadOutcome::Stale;
        }

        let members = match result {
            Ok(members) => members,
            Err(err) if err.kind == ErrorKind::NotFound => Vec::new(),
            Err(err) => return Self::failure(err),
        };

        let redraw = self.roster != members;
        self.roster = members;
        LoadOutcome::Applied { redraw }
    }

    /// Applies a fetched squad. A missing squad starts the board empty.
    pub fn complete_load(
        &mut self,
        ticket: &LoadTicket,
        result: std::result::Result<Option<SavedSquad>, ProviderError>,
    ) -> LoadOutcome {
        if !self.is_current(ticket) {
            log::debug!(
                "discarding squad for team {} / {}",
                ticket.team_id,
                ticket.formation
            );
            return LoadOutcome::Stale;
        }

        match result {
            Ok(saved) => self.apply_snapshot(saved.as_ref()),
            Err(err) if err.kind == ErrorKind::NotFound => self.apply_snapshot(None),
            Err(err) => Self::failure(err),
        }
    }

    /// Loads roster and squad for the current selection in one go.
    pub fn refresh(
        &mut self,
        roster: &dyn RosterProvider,
        store: &dyn SquadStore,
    ) -> LoadOutcome {
        let Some(ticket) = self.begin_load() else {
            self.roster.clear();
            return self.apply_snapshot(None);
        };

        let roster_outcome = self.complete_roster(&ticket, roster.list_members(ticket.team_id));
        if roster_outcome == LoadOutcome::SessionExpired {
            return roster_outcome;
        }
        if let LoadOutcome::Failed(err) = &roster_outcome {
            log::warn!("roster for team {} unavailable: {err}", ticket.team_id);
        }

        let fetched = store.fetch_squad(ticket.team_id, &ticket.formation);
        self.complete_load(&ticket, fetched)
    }

    /// Click on a pitch slot: place the armed member there, otherwise pick
    /// up whoever stands on it.
    pub fn click_slot(&mut self, slot_id: &str) -> Result<SlotClick> {
        if let Some(armed) = self.board.selection().cloned() {
            self.board.place(slot_id, armed)?;
            return Ok(SlotClick::Placed);
        }

        Ok(match self.board.clear(slot_id)? {
            Some(former) => SlotClick::PickedUp(former),
            None => SlotClick::Nothing,
        })
    }

    /// Click on a bench member: arm or disarm them.
    pub fn click_bench(&mut self, member_id: MemberId) -> bool {
        let Some(member) = self.roster.iter().find(|m| m.id == member_id) else {
            log::warn!("member {member_id} is not on the roster");
            return false;
        };
        self.board.toggle_select(member)
    }

    /// Only occupied slots can be dragged.
    pub fn start_drag(&mut self, slot_id: &str) -> bool {
        if self.board.occupant(slot_id).is_none() {
            return false;
        }
        self.dragging = Some(slot_id.to_string());
        true
    }

    pub fn cancel_drag(&mut self) {
        self.dragging = None;
    }

    /// Drops the dragged slot onto `target`, swapping their occupants.
    /// Returns `false` when no drag was active or the drop was onto itself.
    pub fn drop_on(&mut self, target: &str) -> Result<bool> {
        let Some(source) = self.dragging.take() else {
            return Ok(false);
        };
        self.board.swap(&source, target)?;
        Ok(source != target)
    }

    /// Members not on the board, roster order.
    pub fn bench(&self) -> Vec<&RosterMember> {
        self.roster
            .iter()
            .filter(|m| !self.board.is_assigned(m.id))
            .collect()
    }

    pub fn save_request(&self) -> Result<SaveRequest> {
        let team_id = self.team_id.ok_or(BoardError::NoTeamSelected)?;
        Ok(SaveRequest {
            team_id,
            formation_type: self.template.name().to_string(),
            position_request_dto_list: self.board.to_save_request(),
        })
    }

    /// Ticket plus request body for an asynchronous save.
    pub fn begin_save(&self) -> Result<(LoadTicket, SaveRequest)> {
        let request = self.save_request()?;
        let ticket = LoadTicket {
            team_id: request.team_id,
            formation: request.formation_type.clone(),
        };
        Ok((ticket, request))
    }

    /// Records the id the store assigned. The board is not touched.
    pub fn complete_save(
        &mut self,
        ticket: &LoadTicket,
        result: std::result::Result<SavedSquad, ProviderError>,
    ) -> LoadOutcome {
        if !self.is_current(ticket) {
            log::debug!("discarding save result for team {}", ticket.team_id);
            return LoadOutcome::Stale;
        }
        match result {
            Ok(saved) => {
                log::debug!("squad {} saved for team {}", saved.id, saved.team_id);
                self.squad_id = Some(saved.id);
                LoadOutcome::Applied { redraw: false }
            }
            Err(err) => Self::failure(err),
        }
    }

    pub fn save(&mut self, store: &dyn SquadStore) -> Result<LoadOutcome> {
        let (ticket, request) = self.begin_save()?;
        let result = store.save_squad(&request);
        Ok(self.complete_save(&ticket, result))
    }

    pub fn state(&self) -> BoardState {
        BoardState {
            formation: self.template.name().to_string(),
            slots: self.board.to_views(self.dragging.as_deref()),
            selection: self.board.selection().cloned(),
            squad_id: self.squad_id,
            team_id: self.team_id,
        }
    }

    fn apply_snapshot(&mut self, saved: Option<&SavedSquad>) -> LoadOutcome {
        if let Some(squad) = saved {
            if squad.formation_type != self.template.name() {
                log::warn!(
                    "squad {} is for {}, showing it on {}",
                    squad.id,
                    squad.formation_type,
                    self.template.name()
                );
            }
        }

        let fresh = FormationBoard::initialize(self.template, saved, &self.roster);
        let current_views = self.board.to_views(None);
        let fresh_views = fresh.to_views(None);
        let redraw = reconcile::needs_redraw(&current_views, &fresh_views);
        if redraw {
            log::debug!(
                "{}: slots changed {:?}",
                self.template.name(),
                reconcile::changed_slots(&current_views, &fresh_views)
            );
        }

        self.board = fresh;
        self.squad_id = saved.map(|s| s.id);
        self.dragging = None;
        LoadOutcome::Applied { redraw }
    }

    fn reset_board(&mut self) {
        self.board = FormationBoard::new(self.template);
        self.squad_id = None;
        self.dragging = None;
    }

    fn resolve_template(&self, name: &str) -> &'static FormationTemplate {
        match formation::template(name) {
            Ok(template) => template,
            Err(err) => {
                log::warn!("{err}, using {}", self.config.fallback_formation);
                // Validated in `new`, so the fallback always resolves.
                formation::template(&self.config.fallback_formation).unwrap_or(self.template)
            }
        }
    }

    fn failure(err: ProviderError) -> LoadOutcome {
        if err.is_unauthorized() {
            LoadOutcome::SessionExpired
        } else {
            log::warn!("provider call failed: {err}");
            LoadOutcome::Failed(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MemoryProvider;
    use crate::types::{PositionGroup, SquadPosition};

    fn member(id: MemberId, name: &str, preferred: PositionGroup) -> RosterMember {
        RosterMember {
            id,
            name: name.to_string(),
            preferred,
        }
    }

    fn roster() -> Vec<RosterMember> {
        vec![
            member(1, "Jo", PositionGroup::GK),
            member(5, "Han", PositionGroup::DF),
            member(7, "Kim", PositionGroup::FW),
        ]
    }

    fn saved(team_id: TeamId, formation: &str, pairs: &[(&str, MemberId)]) -> SavedSquad {
        SavedSquad {
            id: 77,
            team_id,
            formation_type: formation.to_string(),
            is_default: true,
            created_at: None,
            updated_at: None,
            positions: pairs
                .iter()
                .map(|&(code, id)| SquadPosition {
                    id: None,
                    field_position_code: code.to_string(),
                    team_member_id: Some(id),
                    player_name: None,
                })
                .collect(),
        }
    }

    fn editor_for(team_id: TeamId) -> SquadEditor {
        let mut editor = SquadEditor::new(EditorConfig::default()).unwrap();
        editor.select_team(Some(team_id));
        let ticket = editor.begin_load().unwrap();
        editor.complete_roster(&ticket, Ok(roster()));
        editor
    }

    #[test]
    fn new_editor_starts_on_default_formation_without_team() {
        let editor = SquadEditor::new(EditorConfig::default()).unwrap();

        assert_eq!(editor.formation(), "4-3-3");
        assert_eq!(editor.team_id(), None);
        assert!(editor.begin_load().is_none());
        assert_eq!(editor.board().occupied_count(), 0);
        assert!(matches!(editor.save_request(), Err(BoardError::NoTeamSelected)));
    }

    #[test]
    fn not_found_squad_initializes_empty_board() {
        let mut editor = SquadEditor::new(EditorConfig::default()).unwrap();
        editor.select_team(Some(42));
        editor.select_formation("4-4-2");
        let ticket = editor.begin_load().unwrap();

        let outcome = editor.complete_load(&ticket, Err(ProviderError::not_found("no squad")));

        assert_eq!(outcome, LoadOutcome::Applied { redraw: false });
        assert_eq!(editor.board().slots().len(), 11);
        assert_eq!(editor.board().occupied_count(), 0);
        assert_eq!(editor.squad_id(), None);
    }

    #[test]
    fn fetched_squad_is_applied_with_roster_names() {
        let mut editor = editor_for(42);
        let ticket = editor.begin_load().unwrap();

        let outcome = editor.complete_load(&ticket, Ok(Some(saved(42, "4-3-3", &[("gk", 1)]))));

        assert_eq!(outcome, LoadOutcome::Applied { redraw: true });
        assert_eq!(editor.board().occupant("gk"), Some(&Occupant::new(1, "Jo")));
        assert_eq!(editor.squad_id(), Some(77));

        let again = editor.complete_load(&ticket, Ok(Some(saved(42, "4-3-3", &[("gk", 1)]))));
        assert_eq!(again, LoadOutcome::Applied { redraw: false });
    }

    #[test]
    fn responses_for_abandoned_selection_are_discarded() {
        let mut editor = editor_for(42);
        let old = editor.begin_load().unwrap();
        editor.select_formation("3-5-2");

        let outcome = editor.complete_load(&old, Ok(Some(saved(42, "4-3-3", &[("gk", 1)]))));

        assert_eq!(outcome, LoadOutcome::Stale);
        assert_eq!(editor.formation(), "3-5-2");
        assert_eq!(editor.board().occupied_count(), 0);

        editor.select_team(Some(8));
        assert_eq!(editor.complete_roster(&old, Ok(Vec::new())), LoadOutcome::Stale);
    }

    #[test]
    fn failures_leave_board_untouched() {
        let mut editor = editor_for(42);
        let ticket = editor.begin_load().unwrap();
        editor.complete_load(&ticket, Ok(Some(saved(42, "4-3-3", &[("st", 7)]))));
        let before = editor.board().clone();

        let outcome = editor.complete_load(&ticket, Err(ProviderError::upstream("502")));
        assert!(matches!(outcome, LoadOutcome::Failed(ref e) if e.kind == ErrorKind::Upstream));
        assert_eq!(editor.board(), &before);

        let outcome = editor.complete_load(&ticket, Err(ProviderError::from_status(401, "expired")));
        assert_eq!(outcome, LoadOutcome::SessionExpired);
        assert_eq!(editor.board(), &before);
    }

    #[test]
    fn unknown_formation_falls_back() {
        let mut editor = SquadEditor::new(EditorConfig::default()).unwrap();
        editor.select_formation("4-4-2");

        assert_eq!(editor.select_formation("9-9-9"), "4-3-3");
    }

    #[test]
    fn category_switch_selects_first_formation() {
        let mut editor = editor_for(1);
        editor.click_bench(7);
        editor.click_slot("st").unwrap();

        assert_eq!(editor.select_category(TacticalCategory::Defensive), "4-2-3-1");
        assert_eq!(editor.category(), TacticalCategory::Defensive);
        assert_eq!(editor.board().occupied_count(), 0);
    }

    #[test]
    fn click_flow_places_picks_up_and_replaces() {
        let mut editor = editor_for(1);

        assert!(editor.click_bench(5));
        assert_eq!(editor.click_slot("cb1").unwrap(), SlotClick::Placed);
        assert_eq!(editor.board().occupant("cb1"), Some(&Occupant::new(5, "Han")));
        assert!(!editor.click_bench(5));

        assert_eq!(
            editor.click_slot("cb1").unwrap(),
            SlotClick::PickedUp(Occupant::new(5, "Han"))
        );
        assert_eq!(editor.board().selection(), Some(&Occupant::new(5, "Han")));

        assert_eq!(editor.click_slot("cb2").unwrap(), SlotClick::Placed);
        assert_eq!(editor.board().occupant("cb2"), Some(&Occupant::new(5, "Han")));
        assert_eq!(editor.board().selection(), None);

        assert_eq!(editor.click_slot("gk").unwrap(), SlotClick::Nothing);
        assert!(!editor.click_bench(999));
    }

    #[test]
    fn drag_and_drop_swaps_occupants() {
        let mut editor = editor_for(1);
        editor.click_bench(1);
        editor.click_slot("lb").unwrap();

        assert!(!editor.start_drag("rb"));
        assert!(editor.start_drag("lb"));
        assert!(editor.state().slots.iter().any(|s| s.slot_id == "lb" && s.dragging));

        assert!(editor.drop_on("rb").unwrap());
        assert_eq!(editor.board().occupant("lb"), None);
        assert_eq!(editor.board().occupant("rb"), Some(&Occupant::new(1, "Jo")));
        assert_eq!(editor.dragging(), None);
        assert!(!editor.drop_on("lb").unwrap());
    }

    #[test]
    fn bench_excludes_placed_members() {
        let mut editor = editor_for(1);
        editor.click_bench(7);
        editor.click_slot("st").unwrap();

        let bench: Vec<_> = editor.bench().iter().map(|m| m.id).collect();
        assert_eq!(bench, vec![1, 5]);
    }

    #[test]
    fn refresh_and_save_round_trip_through_store() {
        let store = MemoryProvider::new().with_roster(3, roster());
        let mut editor = SquadEditor::new(EditorConfig::default()).unwrap();
        editor.select_team(Some(3));

        assert_eq!(editor.refresh(&store, &store), LoadOutcome::Applied { redraw: false });
        assert_eq!(editor.roster().len(), 3);

        editor.click_bench(7);
        editor.click_slot("st").unwrap();
        let outcome = editor.save(&store).unwrap();
        assert_eq!(outcome, LoadOutcome::Applied { redraw: false });
        assert!(editor.squad_id().is_some());

        editor.select_team(None);
        editor.select_team(Some(3));
        assert_eq!(editor.board().occupied_count(), 0);

        assert_eq!(editor.refresh(&store, &store), LoadOutcome::Applied { redraw: true });
        assert_eq!(editor.board().occupant("st"), Some(&Occupant::new(7, "Kim")));
    }

    #[test]
    fn save_result_for_old_selection_is_stale() {
        let mut editor = editor_for(1);
        let (ticket, request) = editor.begin_save().unwrap();
        assert_eq!(request.formation_type, "4-3-3");

        editor.select_formation("4-4-2");
        let outcome = editor.complete_save(&ticket, Ok(saved(1, "4-3-3", &[])));

        assert_eq!(outcome, LoadOutcome::Stale);
        assert_eq!(editor.squad_id(), None);
    }

    #[test]
    fn edits_made_during_save_survive_its_completion() {
        let mut editor = editor_for(1);
        editor.click_bench(7);
        editor.click_slot("st").unwrap();
        let (ticket, request) = editor.begin_save().unwrap();
        assert_eq!(request.position_request_dto_list.len(), 1);

        editor.click_bench(1);
        editor.click_slot("gk").unwrap();
        let outcome = editor.complete_save(&ticket, Ok(saved(1, "4-3-3", &[("st", 7)])));

        assert_eq!(outcome, LoadOutcome::Applied { redraw: false });
        assert_eq!(editor.squad_id(), Some(77));
        assert_eq!(editor.board().occupant("gk"), Some(&Occupant::new(1, "Jo")));
        assert_eq!(editor.board().occupant("st"), Some(&Occupant::new(7, "Kim")));
    }
}
