//! Request and response shapes for the HTTP API

use chrono::{DateTime, Utc};
use roster_db::{PrStatus, PullRequest, PullRequestSummary, Team, TeamMember, User};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct TeamMemberBody {
    pub user_id: String,
    pub username: String,
    pub is_active: bool,
}

impl From<TeamMember> for TeamMemberBody {
    fn from(member: TeamMember) -> Self {
        Self {
            user_id: member.id,
            username: member.username,
            is_active: member.is_active,
        }
    }
}

impl From<TeamMemberBody> for TeamMember {
    fn from(body: TeamMemberBody) -> Self {
        Self {
            id: body.user_id,
            username: body.username,
            is_active: body.is_active,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TeamBody {
    pub team_name: String,
    pub members: Vec<TeamMemberBody>,
}

impl From<Team> for TeamBody {
    fn from(team: Team) -> Self {
        Self {
            team_name: team.name,
            members: team.members.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTeamResponse {
    pub team: TeamBody,
}

#[derive(Debug, Deserialize)]
pub struct GetTeamQuery {
    pub team_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SetIsActiveRequest {
    pub user_id: String,
    pub is_active: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserBody {
    pub user_id: String,
    pub username: String,
    pub team_name: String,
    pub is_active: bool,
}

impl From<User> for UserBody {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            team_name: user.team_name,
            is_active: user.is_active,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SetIsActiveResponse {
    pub user: UserBody,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePullRequestRequest {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PullRequestBody {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PrStatus,
    pub assigned_reviewers: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merged_at: Option<DateTime<Utc>>,
}

impl From<PullRequest> for PullRequestBody {
    fn from(pr: PullRequest) -> Self {
        Self {
            pull_request_id: pr.id,
            pull_request_name: pr.name,
            author_id: pr.author_id,
            status: pr.status,
            assigned_reviewers: pr.reviewers,
            created_at: pr.created_at,
            merged_at: pr.merged_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PullRequestResponse {
    pub pr: PullRequestBody,
}

#[derive(Debug, Deserialize)]
pub struct GetPullRequestQuery {
    pub pull_request_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MergeRequest {
    pub pull_request_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReassignRequest {
    pub pull_request_id: String,
    pub old_user_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReassignResponse {
    pub pr: PullRequestBody,
    pub replaced_by: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PullRequestShortBody {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PrStatus,
}

impl From<PullRequestSummary> for PullRequestShortBody {
    fn from(pr: PullRequestSummary) -> Self {
        Self {
            pull_request_id: pr.id,
            pull_request_name: pr.name,
            author_id: pr.author_id,
            status: pr.status,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReviewQueueQuery {
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewQueueResponse {
    pub user_id: String,
    pub pull_requests: Vec<PullRequestShortBody>,
}
