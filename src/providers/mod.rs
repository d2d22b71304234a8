//! Concrete search provider REST clients.
//!
//! Each backend is a thin wrapper over one vendor's JSON API, mapping
//! its response shape onto [`crate::types::ProviderRow`] and non-2xx
//! responses onto [`crate::SearchError::Provider`] with the real status
//! code. All ranking intelligence lives in the orchestrator, never here.

pub mod brave;
pub mod exa;
pub mod tavily;

pub use brave::BraveProvider;
pub use exa::ExaProvider;
pub use tavily::TavilyProvider;
