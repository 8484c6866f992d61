//! Alumni Assist: profile completion and gated alumni search for a
//! messaging bot.

pub mod analytics;
pub mod casual;
pub mod config;
pub mod error;
pub mod intent;
pub mod llm;
pub mod profile;
pub mod ratelimit;
pub mod routes;
pub mod search;
pub mod session;
pub mod store;
