use serde::{Deserialize, Serialize};

use super::super::domain::Editor;

/// Access level a recruiter holds on one career.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamRole {
    Owner,
    Contributor,
    Reviewer,
}

impl TeamRole {
    pub const ALL: [TeamRole; 3] = [TeamRole::Owner, TeamRole::Contributor, TeamRole::Reviewer];

    pub fn title(self) -> &'static str {
        match self {
            TeamRole::Owner => "Job Owner",
            TeamRole::Contributor => "Contributor",
            TeamRole::Reviewer => "Reviewer",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            TeamRole::Owner => {
                "Leads the hiring process for assigned jobs. Has access with all career settings."
            }
            TeamRole::Contributor => {
                "Helps evaluate candidates and assist with hiring tasks. Can move candidates through the pipeline, but cannot change any career settings."
            }
            TeamRole::Reviewer => {
                "Reviews candidates and provides feedback. Can only view candidate profiles and comment."
            }
        }
    }
}

/// Role with its display copy, as listed by `GET /api/team-roles`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoleDescription {
    pub role: TeamRole,
    pub title: &'static str,
    pub description: &'static str,
}

impl From<TeamRole> for RoleDescription {
    fn from(role: TeamRole) -> Self {
        Self {
            role,
            title: role.title(),
            description: role.description(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub role: TeamRole,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TeamError {
    #[error("Career must have a job owner. Please assign a job owner.")]
    MissingOwner,
    #[error("team member '{0}' is not on this career")]
    UnknownMember(String),
}

/// Team access list for one career.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamRoster {
    members: Vec<TeamMember>,
}

impl TeamRoster {
    pub fn from_members(members: Vec<TeamMember>) -> Self {
        Self { members }
    }

    /// Roster seeded with the creating recruiter as job owner.
    pub fn owned_by(editor: &Editor) -> Self {
        let email = editor.email.clone().unwrap_or_default();
        let id = if email.is_empty() {
            "owner".to_string()
        } else {
            email.clone()
        };
        Self {
            members: vec![TeamMember {
                id,
                name: editor.name.clone().unwrap_or_default(),
                email,
                avatar_url: editor.image.clone(),
                role: TeamRole::Owner,
            }],
        }
    }

    pub fn members(&self) -> &[TeamMember] {
        &self.members
    }

    pub fn into_members(self) -> Vec<TeamMember> {
        self.members
    }

    /// Add a member as reviewer. Members already on the roster keep their role.
    pub fn add_member(&mut self, id: &str, name: &str, email: &str) -> &TeamMember {
        if let Some(index) = self.members.iter().position(|member| member.id == id) {
            return &self.members[index];
        }
        self.members.push(TeamMember {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            avatar_url: None,
            role: TeamRole::Reviewer,
        });
        &self.members[self.members.len() - 1]
    }

    pub fn update_role(&mut self, id: &str, role: TeamRole) -> Result<(), TeamError> {
        let member = self
            .members
            .iter_mut()
            .find(|member| member.id == id)
            .ok_or_else(|| TeamError::UnknownMember(id.to_string()))?;
        member.role = role;
        Ok(())
    }

    pub fn remove_member(&mut self, id: &str) -> Result<TeamMember, TeamError> {
        let index = self
            .members
            .iter()
            .position(|member| member.id == id)
            .ok_or_else(|| TeamError::UnknownMember(id.to_string()))?;
        Ok(self.members.remove(index))
    }

    pub fn has_owner(&self) -> bool {
        self.members
            .iter()
            .any(|member| member.role == TeamRole::Owner)
    }

    pub fn validate(&self) -> Result<(), TeamError> {
        if self.has_owner() {
            Ok(())
        } else {
            Err(TeamError::MissingOwner)
        }
    }
}
