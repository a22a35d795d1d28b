//! Organizational hierarchy: areas contain forums, forums contain units.

use std::fmt::Display;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::info;

use memberhub_core::error::AppError;
use memberhub_core::traits::SearchSource;
use memberhub_core::types::{SearchRequest, SearchResponse};
use memberhub_entity::organization::{Area, CreateOrgNode, Forum, Unit, UpdateOrgNode};
use memberhub_entity::validation::validate_payload;

use crate::http::HttpService;

/// CRUD over one level of the hierarchy.
///
/// All three levels share payload shapes; `parent_id` in [`CreateOrgNode`]
/// names the area of a forum or the forum of a unit.
pub struct NodeService<T> {
    http: HttpService,
    resource: &'static str,
    _node: PhantomData<fn() -> T>,
}

impl<T> Clone for NodeService<T> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            resource: self.resource,
            _node: PhantomData,
        }
    }
}

impl<T> NodeService<T>
where
    T: DeserializeOwned + Send + 'static,
{
    fn new(http: HttpService, resource: &'static str) -> Self {
        Self {
            http,
            resource,
            _node: PhantomData,
        }
    }

    /// Resource path segment, e.g. `areas`.
    pub fn resource(&self) -> &'static str {
        self.resource
    }

    /// Gets one node.
    pub async fn get(&self, id: impl Display) -> Result<T, AppError> {
        self.http.get(&format!("{}/{id}", self.resource)).await
    }

    /// Creates a node.
    pub async fn create(&self, payload: &CreateOrgNode) -> Result<T, AppError> {
        validate_payload(payload)?;
        let node = self.http.post(self.resource, payload).await?;
        info!(resource = self.resource, code = %payload.code, "Organization node created");
        Ok(node)
    }

    /// Applies a partial update.
    pub async fn update(&self, id: impl Display, payload: &UpdateOrgNode) -> Result<T, AppError> {
        validate_payload(payload)?;
        let node = self
            .http
            .patch(&format!("{}/{id}", self.resource), payload)
            .await?;
        info!(resource = self.resource, id = %id, "Organization node updated");
        Ok(node)
    }

    /// Deletes a node. The server refuses while children exist.
    pub async fn delete(&self, id: impl Display) -> Result<(), AppError> {
        self.http
            .delete(&format!("{}/{id}", self.resource))
            .await?;
        info!(resource = self.resource, id = %id, "Organization node deleted");
        Ok(())
    }
}

#[async_trait]
impl<T> SearchSource<T> for NodeService<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse<T>, AppError> {
        self.http
            .search(&format!("{}/search", self.resource), request)
            .await
    }
}

/// Areas, forums and units.
#[derive(Clone)]
pub struct OrganizationService {
    /// Top level.
    pub areas: NodeService<Area>,
    /// Second level.
    pub forums: NodeService<Forum>,
    /// Leaf level; agents and members belong to a unit.
    pub units: NodeService<Unit>,
}

impl OrganizationService {
    /// Creates the three node services over one client.
    pub fn new(http: HttpService) -> Self {
        Self {
            areas: NodeService::new(http.clone(), "areas"),
            forums: NodeService::new(http.clone(), "forums"),
            units: NodeService::new(http, "units"),
        }
    }
}
