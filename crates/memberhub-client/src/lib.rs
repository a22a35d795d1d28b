//! # memberhub-client
//!
//! REST client for the MemberHub administration API. A single
//! [`HttpService`] owns the connection pool; the domain services in
//! [`services`] wrap it with typed methods and implement
//! [`SearchSource`](memberhub_core::traits::SearchSource) for every
//! listed entity.

pub mod http;
pub mod services;

pub use http::{HttpService, SearchEndpoint};
pub use services::ApiServices;
