//! Organization Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Organization node ID type
pub type OrganizationId = RecordId;

/// Node role in the organization ladder, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrgType {
    Admin,
    Hr,
    OperationsManager,
    Manager,
    Supervisor,
    Branch,
    Staff,
}

impl OrgType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrgType::Admin => "admin",
            OrgType::Hr => "hr",
            OrgType::OperationsManager => "operations_manager",
            OrgType::Manager => "manager",
            OrgType::Supervisor => "supervisor",
            OrgType::Branch => "branch",
            OrgType::Staff => "staff",
        }
    }
}

/// Organization node matching the `organization` table
///
/// `parent` points at the node one level up; the chain is expected to be
/// acyclic and end at a node with no parent. Creation only checks that the
/// referenced parent exists, so the tree walkers guard against cycles
/// themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationNode {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<OrganizationId>,
    pub name: String,
    #[serde(rename = "type")]
    pub org_type: OrgType,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub parent: Option<OrganizationId>,
    pub email: String,
    /// Required iff `org_type` is `branch`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create organization payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationCreate {
    pub name: String,
    #[serde(rename = "type")]
    pub org_type: OrgType,
    /// Parent node id ("organization:xyz" or bare key)
    pub parent: Option<String>,
    pub email: String,
    pub branch_name: Option<String>,
}

/// Update organization payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub org_type: Option<OrgType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
}
