//! Organization API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{OrganizationCreate, OrganizationNode, OrganizationUpdate};
use crate::db::repository::{OrganizationRepository, parse_record_id};
use crate::hierarchy::{OrgIndex, OrgTreeNode};
use crate::utils::validation::{self, MAX_NAME_LEN};
use crate::utils::{AppError, AppResult};

const RESOURCE: &str = "organization";

/// GET /organizations - list every node
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<OrganizationNode>>> {
    let repo = OrganizationRepository::new(state.db.clone());
    let nodes = repo.find_all().await?;
    Ok(Json(nodes))
}

/// GET /organizations/:id - fetch one node
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<OrganizationNode>> {
    let repo = OrganizationRepository::new(state.db.clone());
    let node = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Organization {} not found", id)))?;
    Ok(Json(node))
}

/// POST /organizations - create a node
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrganizationCreate>,
) -> AppResult<Json<OrganizationNode>> {
    validation::validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validation::validate_email(&payload.email)?;
    validation::validate_optional_text(&payload.branch_name, "branch_name", MAX_NAME_LEN)?;

    let repo = OrganizationRepository::new(state.db.clone());
    let node = repo.create(payload).await?;

    tracing::info!(
        target: "organizations",
        id = ?node.id,
        "Organization created"
    );

    Ok(Json(node))
}

/// PUT /organizations/:id - update a node
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrganizationUpdate>,
) -> AppResult<Json<OrganizationNode>> {
    if let Some(ref name) = payload.name {
        validation::validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(ref email) = payload.email {
        validation::validate_email(email)?;
    }
    validation::validate_optional_text(&payload.branch_name, "branch_name", MAX_NAME_LEN)?;

    let repo = OrganizationRepository::new(state.db.clone());
    let node = repo.update(&id, payload).await?;
    Ok(Json(node))
}

/// DELETE /organizations/:id - delete a childless node
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = OrganizationRepository::new(state.db.clone());
    let result = repo.delete(&id).await?;

    tracing::info!(target: "organizations", id = %id, "Organization deleted");

    Ok(Json(result))
}

/// GET /organizations/tree - full trees of all parentless nodes
pub async fn tree(State(state): State<ServerState>) -> AppResult<Json<Vec<OrgTreeNode>>> {
    let repo = OrganizationRepository::new(state.db.clone());
    let index = OrgIndex::from_nodes(repo.find_all().await?);
    Ok(Json(index.forest()))
}

/// GET /organizations/:id/tree - full subtree from one node
pub async fn subtree(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<OrgTreeNode>> {
    let key = parse_record_id(RESOURCE, &id)?.to_string();
    let repo = OrganizationRepository::new(state.db.clone());
    let index = OrgIndex::from_nodes(repo.find_all().await?);
    let tree = index
        .build_tree(&key)
        .ok_or_else(|| AppError::not_found(format!("Organization {} not found", id)))?;
    Ok(Json(tree))
}

/// GET /organizations/:id/children - direct children
pub async fn children(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<OrganizationNode>>> {
    let repo = OrganizationRepository::new(state.db.clone());
    if repo.find_by_id(&id).await?.is_none() {
        return Err(AppError::not_found(format!(
            "Organization {} not found",
            id
        )));
    }
    let children = repo.find_children(&id).await?;
    Ok(Json(children))
}

/// GET /organizations/:id/ancestry - path from the root down to the node
pub async fn ancestry(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<OrganizationNode>>> {
    let key = parse_record_id(RESOURCE, &id)?.to_string();
    let repo = OrganizationRepository::new(state.db.clone());
    let index = OrgIndex::from_nodes(repo.find_all().await?);
    let path = index
        .ancestry_path(&key)
        .ok_or_else(|| AppError::not_found(format!("Organization {} not found", id)))?;
    Ok(Json(path))
}
