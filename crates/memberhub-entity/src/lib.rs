//! # memberhub-entity
//!
//! Domain models for MemberHub as served by the administration API, plus
//! the create/update payloads sent back to it. Payloads derive
//! `validator::Validate` so form rules are enforced before a request
//! leaves the client.

#[macro_use]
mod macros;

pub mod access;
pub mod agent;
pub mod approval;
pub mod claim;
pub mod member;
pub mod organization;
pub mod validation;
pub mod wallet;
