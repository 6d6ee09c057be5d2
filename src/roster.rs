use serde::{Deserialize, Serialize};

use crate::error::{BoardError, Result};
use crate::types::{MemberId, PositionGroup, RosterMember};

/// Roster split by position group, each group sorted by name.
///
/// Contract:
/// - Fields serialize in display order: forwards, midfielders, defenders,
///   goalkeepers, others.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterGroups {
    pub forwards: Vec<RosterMember>,
    pub midfielders: Vec<RosterMember>,
    pub defenders: Vec<RosterMember>,
    pub goalkeepers: Vec<RosterMember>,
    pub others: Vec<RosterMember>,
}

impl RosterGroups {
    pub fn total(&self) -> usize {
        self.forwards.len()
            + self.midfielders.len()
            + self.defenders.len()
            + self.goalkeepers.len()
            + self.others.len()
    }
}

pub fn group_by_position(members: &[RosterMember]) -> RosterGroups {
    let mut groups = RosterGroups::default();
    for member in members {
        let bucket = match member.preferred {
            PositionGroup::FW => &mut groups.forwards,
            PositionGroup::MF => &mut groups.midfielders,
            PositionGroup::DF => &mut groups.defenders,
            PositionGroup::GK => &mut groups.goalkeepers,
            PositionGroup::Etc => &mut groups.others,
        };
        bucket.push(member.clone());
    }
    for bucket in [
        &mut groups.forwards,
        &mut groups.midfielders,
        &mut groups.defenders,
        &mut groups.goalkeepers,
        &mut groups.others,
    ] {
        bucket.sort_by(|a, b| a.name.cmp(&b.name));
    }
    groups
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

/// Someone asking to join a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub id: MemberId,
    pub name: String,
    pub position: PositionGroup,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub city_code: String,
    #[serde(default)]
    pub skill_level: String,
    #[serde(default)]
    pub team_intro: String,
    pub request_status: RequestStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Reject,
}

/// Join requests of one team as last fetched, with decisions applied locally
/// once the backend confirmed them.
#[derive(Debug, Clone, Default)]
pub struct JoinRequests {
    requests: Vec<JoinRequest>,
}

impl JoinRequests {
    pub fn new(requests: Vec<JoinRequest>) -> Self {
        Self { requests }
    }

    pub fn all(&self) -> &[JoinRequest] {
        &self.requests
    }

    pub fn pending(&self) -> impl Iterator<Item = &JoinRequest> {
        self.requests
            .iter()
            .filter(|r| r.request_status == RequestStatus::Pending)
    }

    /// Only pending requests can be decided.
    pub fn apply_decision(&mut self, id: MemberId, decision: Decision) -> Result<&JoinRequest> {
        let request = self
            .requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| BoardError::InvalidPayload(format!("no join request from {id}")))?;

        if request.request_status != RequestStatus::Pending {
            return Err(BoardError::InvalidPayload(format!(
                "join request from {id} is already {:?}",
                request.request_status
            )));
        }

        request.request_status = match decision {
            Decision::Accept => RequestStatus::Accepted,
            Decision::Reject => RequestStatus::Rejected,
        };
        Ok(&*request)
    }
}
