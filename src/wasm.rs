//! JavaScript surface. Structured values cross the boundary through
//! `serde-wasm-bindgen`; ids are plain JS numbers.

use std::time::Duration;

use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_time::SystemTime;

use crate::config::EditorConfig;
use crate::editor::{LoadOutcome, LoadTicket, SlotClick, SquadEditor};
use crate::error::{ErrorKind, ProviderError};
use crate::formation::{self, TacticalCategory};
use crate::roster;
use crate::session::{Session, SessionContext};
use crate::types::{RosterMember, SavedSquad, TeamId};

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value).map_err(|err| JsError::new(&err.to_string()))
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue) -> Result<T, JsError> {
    serde_wasm_bindgen::from_value(value).map_err(|err| JsError::new(&err.to_string()))
}

/// Largest integer a JS number holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Reads an id passed as a JS number; `None` unless it is a non-negative
/// integer within the safe range.
fn id_from_js(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= MAX_SAFE_INTEGER)
        .then_some(value as u64)
}

fn checked_id(value: f64) -> Result<u64, JsError> {
    id_from_js(value).ok_or_else(|| JsError::new(&format!("{value} is not a valid id")))
}

/// Outcome names handed to JS.
#[derive(Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
enum JsOutcome {
    Applied { redraw: bool },
    Stale,
    SessionExpired,
    Failed { kind: String, message: String },
}

impl From<LoadOutcome> for JsOutcome {
    fn from(outcome: LoadOutcome) -> Self {
        match outcome {
            LoadOutcome::Applied { redraw } => JsOutcome::Applied { redraw },
            LoadOutcome::Stale => JsOutcome::Stale,
            LoadOutcome::SessionExpired => JsOutcome::SessionExpired,
            LoadOutcome::Failed(err) => JsOutcome::Failed {
                kind: err.kind.to_string(),
                message: err.message,
            },
        }
    }
}

/// Ticket of an in-flight request, returned to JS and passed back with the
/// response.
#[wasm_bindgen]
pub struct RequestTicket {
    inner: LoadTicket,
}

#[wasm_bindgen]
impl RequestTicket {
    #[wasm_bindgen(getter, js_name = teamId)]
    pub fn team_id(&self) -> f64 {
        self.inner.team_id() as f64
    }

    #[wasm_bindgen(getter)]
    pub fn formation(&self) -> String {
        self.inner.formation().to_string()
    }
}

/// Failed HTTP response as seen by the JS fetch wrapper.
fn response_error(status: u16, status_text: &str, body: &str) -> ProviderError {
    ProviderError::from_response(status, status_text, body)
}

#[wasm_bindgen]
pub struct SquadBoard {
    editor: SquadEditor,
}

#[wasm_bindgen]
impl SquadBoard {
    /// `config` may be `undefined` for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<SquadBoard, JsError> {
        let config: EditorConfig = if config.is_undefined() || config.is_null() {
            EditorConfig::default()
        } else {
            from_js(config)?
        };
        let editor = SquadEditor::new(config).map_err(|err| JsError::new(&err.to_string()))?;
        Ok(SquadBoard { editor })
    }

    /// Formation names grouped per tactical category.
    pub fn categories() -> Result<JsValue, JsError> {
        let grouped: Vec<(TacticalCategory, &'static [&'static str])> = TacticalCategory::ALL
            .iter()
            .map(|c| (*c, c.formations()))
            .collect();
        to_js(&grouped)
    }

    pub fn formations() -> Result<JsValue, JsError> {
        to_js(&formation::catalog())
    }

    pub fn state(&self) -> Result<JsValue, JsError> {
        to_js(&self.editor.state())
    }

    #[wasm_bindgen(js_name = selectTeam)]
    pub fn select_team(&mut self, team_id: Option<f64>) -> Result<bool, JsError> {
        let team_id: Option<TeamId> = team_id.map(checked_id).transpose()?;
        Ok(self.editor.select_team(team_id))
    }

    #[wasm_bindgen(js_name = selectFormation)]
    pub fn select_formation(&mut self, name: &str) -> String {
        self.editor.select_formation(name).to_string()
    }

    #[wasm_bindgen(js_name = selectCategory)]
    pub fn select_category(&mut self, category: JsValue) -> Result<String, JsError> {
        let category: TacticalCategory = from_js(category)?;
        Ok(self.editor.select_category(category).to_string())
    }

    #[wasm_bindgen(js_name = beginLoad)]
    pub fn begin_load(&self) -> Option<RequestTicket> {
        self.editor.begin_load().map(|inner| RequestTicket { inner })
    }

    #[wasm_bindgen(js_name = rosterLoaded)]
    pub fn roster_loaded(&mut self, ticket: &RequestTicket, members: JsValue) -> Result<JsValue, JsError> {
        let members: Vec<RosterMember> = from_js(members)?;
        to_js(&JsOutcome::from(self.editor.complete_roster(&ticket.inner, Ok(members))))
    }

    #[wasm_bindgen(js_name = rosterFailed)]
    pub fn roster_failed(
        &mut self,
        ticket: &RequestTicket,
        status: u16,
        status_text: &str,
        body: &str,
    ) -> Result<JsValue, JsError> {
        let err = response_error(status, status_text, body);
        to_js(&JsOutcome::from(self.editor.complete_roster(&ticket.inner, Err(err))))
    }

    /// `squad` is the backend payload, or `null` when none is saved.
    #[wasm_bindgen(js_name = squadLoaded)]
    pub fn squad_loaded(&mut self, ticket: &RequestTicket, squad: JsValue) -> Result<JsValue, JsError> {
        let squad: Option<SavedSquad> = from_js(squad)?;
        to_js(&JsOutcome::from(self.editor.complete_load(&ticket.inner, Ok(squad))))
    }

    #[wasm_bindgen(js_name = squadFailed)]
    pub fn squad_failed(
        &mut self,
        ticket: &RequestTicket,
        status: u16,
        status_text: &str,
        body: &str,
    ) -> Result<JsValue, JsError> {
        let err = response_error(status, status_text, body);
        to_js(&JsOutcome::from(self.editor.complete_load(&ticket.inner, Err(err))))
    }

    /// Squad fetch that failed without an HTTP response.
    #[wasm_bindgen(js_name = requestAborted)]
    pub fn request_aborted(&mut self, ticket: &RequestTicket, message: &str) -> Result<JsValue, JsError> {
        let err = ProviderError::new(ErrorKind::Upstream, message);
        to_js(&JsOutcome::from(self.editor.complete_load(&ticket.inner, Err(err))))
    }

    #[wasm_bindgen(js_name = clickSlot)]
    pub fn click_slot(&mut self, slot_id: &str) -> Result<String, JsError> {
        let click = self
            .editor
            .click_slot(slot_id)
            .map_err(|err| JsError::new(&err.to_string()))?;
        Ok(match click {
            SlotClick::Placed => "placed",
            SlotClick::PickedUp(_) => "pickedUp",
            SlotClick::Nothing => "nothing",
        }
        .to_string())
    }

    #[wasm_bindgen(js_name = clickBench)]
    pub fn click_bench(&mut self, member_id: f64) -> Result<bool, JsError> {
        Ok(self.editor.click_bench(checked_id(member_id)?))
    }

    #[wasm_bindgen(js_name = startDrag)]
    pub fn start_drag(&mut self, slot_id: &str) -> bool {
        self.editor.start_drag(slot_id)
    }

    #[wasm_bindgen(js_name = cancelDrag)]
    pub fn cancel_drag(&mut self) {
        self.editor.cancel_drag();
    }

    #[wasm_bindgen(js_name = dropOn)]
    pub fn drop_on(&mut self, slot_id: &str) -> Result<bool, JsError> {
        self.editor
            .drop_on(slot_id)
            .map_err(|err| JsError::new(&err.to_string()))
    }

    pub fn bench(&self) -> Result<JsValue, JsError> {
        to_js(&self.editor.bench())
    }

    #[wasm_bindgen(js_name = rosterGroups)]
    pub fn roster_groups(&self) -> Result<JsValue, JsError> {
        to_js(&roster::group_by_position(self.editor.roster()))
    }

    /// Request body for the save call.
    #[wasm_bindgen(js_name = saveRequest)]
    pub fn save_request(&self) -> Result<JsValue, JsError> {
        let request = self
            .editor
            .save_request()
            .map_err(|err| JsError::new(&err.to_string()))?;
        to_js(&request)
    }

    #[wasm_bindgen(js_name = saveTicket)]
    pub fn save_ticket(&self) -> Result<RequestTicket, JsError> {
        let (inner, _) = self
            .editor
            .begin_save()
            .map_err(|err| JsError::new(&err.to_string()))?;
        Ok(RequestTicket { inner })
    }

    #[wasm_bindgen(js_name = saveCompleted)]
    pub fn save_completed(&mut self, ticket: &RequestTicket, squad: JsValue) -> Result<JsValue, JsError> {
        let squad: SavedSquad = from_js(squad)?;
        to_js(&JsOutcome::from(self.editor.complete_save(&ticket.inner, Ok(squad))))
    }

    #[wasm_bindgen(js_name = saveFailed)]
    pub fn save_failed(
        &mut self,
        ticket: &RequestTicket,
        status: u16,
        status_text: &str,
        body: &str,
    ) -> Result<JsValue, JsError> {
        let err = response_error(status, status_text, body);
        to_js(&JsOutcome::from(self.editor.complete_save(&ticket.inner, Err(err))))
    }
}

/// Session owned by the application shell and passed to whoever needs it.
#[wasm_bindgen]
pub struct SessionHandle {
    context: SessionContext,
}

#[wasm_bindgen]
impl SessionHandle {
    #[wasm_bindgen(constructor)]
    pub fn new() -> SessionHandle {
        SessionHandle {
            context: SessionContext::new(),
        }
    }

    /// `ttl_secs` of `undefined` means the token does not expire locally.
    #[wasm_bindgen(js_name = signIn)]
    pub fn sign_in(
        &mut self,
        access_token: String,
        user_id: Option<f64>,
        ttl_secs: Option<u32>,
    ) -> Result<(), JsError> {
        let user_id = user_id.map(checked_id).transpose()?;
        let expires_at = ttl_secs.map(|secs| SystemTime::now() + Duration::from_secs(secs.into()));
        self.context.sign_in(Session {
            access_token,
            user_id,
            expires_at,
        });
        Ok(())
    }

    #[wasm_bindgen(js_name = signOut)]
    pub fn sign_out(&mut self) -> bool {
        self.context.sign_out()
    }

    #[wasm_bindgen(js_name = isAuthenticated)]
    pub fn is_authenticated(&self) -> bool {
        self.context.is_authenticated(SystemTime::now())
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> Result<String, JsError> {
        self.context
            .bearer(SystemTime::now())
            .map_err(|err| JsError::new(&err.to_string()))
    }

    /// Reports a failed response; `true` means the session just expired.
    #[wasm_bindgen(js_name = observeStatus)]
    pub fn observe_status(&mut self, status: u16) -> bool {
        self.context
            .observe(&ProviderError::from_status(status, format!("HTTP {status}")))
    }
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}
