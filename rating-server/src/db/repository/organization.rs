//! Organization Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{OrgType, OrganizationCreate, OrganizationNode, OrganizationUpdate};
use chrono::{DateTime, Utc};
use serde::Serialize;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "organization";

#[derive(Clone)]
pub struct OrganizationRepository {
    base: BaseRepository,
}

impl OrganizationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all organization nodes (store default order)
    pub async fn find_all(&self) -> RepoResult<Vec<OrganizationNode>> {
        let nodes: Vec<OrganizationNode> = self
            .base
            .db()
            .query("SELECT * FROM organization")
            .await?
            .take(0)?;
        Ok(nodes)
    }

    /// Find organization node by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<OrganizationNode>> {
        let record = parse_record_id(TABLE, id)?;
        let node: Option<OrganizationNode> = self.base.db().select(record).await?;
        Ok(node)
    }

    /// Find organization node by email
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<OrganizationNode>> {
        let email_owned = email.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM organization WHERE email = $email LIMIT 1")
            .bind(("email", email_owned))
            .await?;
        let nodes: Vec<OrganizationNode> = result.take(0)?;
        Ok(nodes.into_iter().next())
    }

    /// Direct children of a node (store default order)
    pub async fn find_children(&self, id: &str) -> RepoResult<Vec<OrganizationNode>> {
        let record = parse_record_id(TABLE, id)?;
        let children: Vec<OrganizationNode> = self
            .base
            .db()
            .query("SELECT * FROM organization WHERE parent = $parent")
            .bind(("parent", record))
            .await?
            .take(0)?;
        Ok(children)
    }

    /// Number of direct children of a node
    pub async fn count_children(&self, id: &str) -> RepoResult<i64> {
        let record = parse_record_id(TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM organization WHERE parent = $parent GROUP ALL")
            .bind(("parent", record))
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }

    /// Create a new organization node
    pub async fn create(&self, data: OrganizationCreate) -> RepoResult<OrganizationNode> {
        // Check duplicate email
        if self.find_by_email(&data.email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Email '{}' is already in use",
                data.email
            )));
        }

        check_branch_name(data.org_type, data.branch_name.as_ref())?;

        // Parent is only checked for existence, not ancestry
        let parent = match data.parent.as_deref() {
            Some(parent_id) => Some(self.resolve_parent(parent_id).await?),
            None => None,
        };

        let now = Utc::now();

        #[derive(Serialize)]
        struct OrganizationContent {
            name: String,
            #[serde(rename = "type")]
            org_type: OrgType,
            parent: Option<RecordId>,
            email: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            branch_name: Option<String>,
            created_at: DateTime<Utc>,
            updated_at: DateTime<Utc>,
        }

        let content = OrganizationContent {
            name: data.name,
            org_type: data.org_type,
            parent,
            email: data.email,
            branch_name: data.branch_name,
            created_at: now,
            updated_at: now,
        };

        let mut result = self
            .base
            .db()
            .query("CREATE organization CONTENT $data RETURN AFTER")
            .bind(("data", content))
            .await?;

        let created: Option<OrganizationNode> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create organization".to_string()))
    }

    /// Update an organization node
    pub async fn update(&self, id: &str, data: OrganizationUpdate) -> RepoResult<OrganizationNode> {
        let record = parse_record_id(TABLE, id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Organization {} not found", id)))?;

        // Check duplicate email if changing
        if let Some(ref new_email) = data.email
            && new_email != &existing.email
            && self.find_by_email(new_email).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Email '{}' is already in use",
                new_email
            )));
        }

        let effective_type = data.org_type.unwrap_or(existing.org_type);
        let effective_branch_name = data.branch_name.clone().or(existing.branch_name.clone());
        check_branch_name(effective_type, effective_branch_name.as_ref())?;

        let parent = match data.parent.as_deref() {
            Some(parent_id) => Some(self.resolve_parent(parent_id).await?),
            None => None,
        };

        #[derive(Serialize)]
        struct OrganizationUpdateDb {
            #[serde(skip_serializing_if = "Option::is_none")]
            name: Option<String>,
            #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
            org_type: Option<OrgType>,
            #[serde(skip_serializing_if = "Option::is_none")]
            parent: Option<RecordId>,
            #[serde(skip_serializing_if = "Option::is_none")]
            email: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            branch_name: Option<String>,
            updated_at: DateTime<Utc>,
        }

        let update_data = OrganizationUpdateDb {
            name: data.name,
            org_type: data.org_type,
            parent,
            email: data.email,
            branch_name: data.branch_name,
            updated_at: Utc::now(),
        };

        self.base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", record.clone()))
            .bind(("data", update_data))
            .await?;

        // Fetch the updated record
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Organization {} not found", id)))
    }

    /// Delete an organization node.
    ///
    /// Re-queries the children before deleting; a node with children cannot
    /// be removed. The check and the delete are two separate statements, so
    /// concurrent writers can race them (accepted, see the API docs).
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let record = parse_record_id(TABLE, id)?;

        if self.find_by_id(id).await?.is_none() {
            return Err(RepoError::NotFound(format!(
                "Organization {} not found",
                id
            )));
        }

        if self.count_children(id).await? > 0 {
            return Err(RepoError::Conflict(
                "Cannot delete an organization node that has children".to_string(),
            ));
        }

        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", record))
            .await?;

        Ok(true)
    }

    /// Resolve a parent reference, failing when the node does not exist.
    async fn resolve_parent(&self, parent_id: &str) -> RepoResult<RecordId> {
        let record = parse_record_id(TABLE, parent_id)?;
        let parent: Option<OrganizationNode> = self.base.db().select(record.clone()).await?;
        if parent.is_none() {
            return Err(RepoError::NotFound(format!(
                "Parent organization {} not found",
                parent_id
            )));
        }
        Ok(record)
    }
}

/// `branch_name` is required for branch nodes and rejected everywhere else.
fn check_branch_name(org_type: OrgType, branch_name: Option<&String>) -> RepoResult<()> {
    match (org_type, branch_name) {
        (OrgType::Branch, None) => Err(RepoError::Validation(
            "branch_name is required for branch nodes".to_string(),
        )),
        (OrgType::Branch, Some(_)) => Ok(()),
        (_, Some(_)) => Err(RepoError::Validation(format!(
            "branch_name is only allowed for branch nodes, not {}",
            org_type.as_str()
        ))),
        (_, None) => Ok(()),
    }
}
