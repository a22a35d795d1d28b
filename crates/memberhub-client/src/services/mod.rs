//! Domain services, one per area of the administration API.

pub mod access;
pub mod agents;
pub mod approvals;
pub mod claims;
pub mod members;
pub mod organization;
pub mod wallets;

pub use access::{RoleService, UserService};
pub use agents::AgentService;
pub use approvals::{ApprovalService, WorkflowService};
pub use claims::ClaimService;
pub use members::MemberService;
pub use organization::{NodeService, OrganizationService};
pub use wallets::WalletService;

use memberhub_core::config::api::ApiConfig;
use memberhub_core::error::AppError;

use crate::http::HttpService;

/// Every domain service, sharing one connection pool.
#[derive(Clone)]
pub struct ApiServices {
    /// Agents.
    pub agents: AgentService,
    /// Members.
    pub members: MemberService,
    /// Areas, forums, units.
    pub organization: OrganizationService,
    /// Roles and permissions.
    pub roles: RoleService,
    /// Console users and profile.
    pub users: UserService,
    /// Death claims.
    pub claims: ClaimService,
    /// Workflow definitions.
    pub workflows: WorkflowService,
    /// Approval requests.
    pub approvals: ApprovalService,
    /// Wallets.
    pub wallets: WalletService,
}

impl ApiServices {
    /// Builds every service from the API configuration.
    pub fn from_config(config: &ApiConfig) -> Result<Self, AppError> {
        Ok(Self::new(HttpService::new(config)?))
    }

    /// Builds every service over an existing client.
    pub fn new(http: HttpService) -> Self {
        Self {
            agents: AgentService::new(http.clone()),
            members: MemberService::new(http.clone()),
            organization: OrganizationService::new(http.clone()),
            roles: RoleService::new(http.clone()),
            users: UserService::new(http.clone()),
            claims: ClaimService::new(http.clone()),
            workflows: WorkflowService::new(http.clone()),
            approvals: ApprovalService::new(http.clone()),
            wallets: WalletService::new(http),
        }
    }
}
