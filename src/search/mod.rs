//! Alumni search: keyword expansion, store filter, ranking and rendering.

pub mod keywords;
pub mod query;
pub mod ranking;
pub mod render;
pub mod service;

pub use query::SearchFilter;
pub use service::SearchService;
