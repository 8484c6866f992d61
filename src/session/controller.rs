//! Conversation controller for authenticated users.
//!
//! Each message is routed through an ordered rule list; the first rule whose
//! predicate holds picks the handler. An in-progress field update outranks
//! everything, so a search typed mid-update is answered by the update
//! handler rather than run.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, error, info};

use crate::analytics::AnalyticsSink;
use crate::casual::{CasualContext, CasualResponder};
use crate::config::BotConfig;
use crate::error::{Error, Result};
use crate::intent::Intent;
use crate::profile::completion::unanswered_optional_fields;
use crate::profile::{Field, FieldValidator, SearchAccess, can_access_search};
use crate::search::SearchService;
use crate::store::UserStore;

use super::messages;
use super::state::{Session, WaitingFor};

/// Handler chosen for a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    FieldUpdate,
    Search,
    SubChoice,
    ProfileUpdate,
    Casual,
    AutoStart,
    Ready,
    Fallback,
}

/// Inputs the routing predicates look at.
pub struct DispatchContext<'a> {
    pub intent: &'a Intent,
    pub session: &'a Session,
    pub profile_complete: bool,
}

type Predicate = fn(&DispatchContext<'_>) -> bool;

fn updating_field(cx: &DispatchContext<'_>) -> bool {
    cx.session.is_updating()
}

fn wants_search(cx: &DispatchContext<'_>) -> bool {
    cx.intent.is_search()
}

fn awaiting_choice(cx: &DispatchContext<'_>) -> bool {
    cx.session.is_awaiting_choice()
}

fn wants_profile_update(cx: &DispatchContext<'_>) -> bool {
    matches!(cx.intent, Intent::ProfileUpdate)
}

fn is_casual(cx: &DispatchContext<'_>) -> bool {
    matches!(cx.intent, Intent::Casual)
}

fn needs_auto_start(cx: &DispatchContext<'_>) -> bool {
    !cx.profile_complete && !cx.session.profile_completion_started
}

fn profile_complete(cx: &DispatchContext<'_>) -> bool {
    cx.profile_complete
}

/// Routing rules in priority order.
static RULES: &[(Route, Predicate)] = &[
    (Route::FieldUpdate, updating_field),
    (Route::Search, wants_search),
    (Route::SubChoice, awaiting_choice),
    (Route::ProfileUpdate, wants_profile_update),
    (Route::Casual, is_casual),
    (Route::AutoStart, needs_auto_start),
    (Route::Ready, profile_complete),
];

/// First matching rule, or [`Route::Fallback`].
pub fn route(cx: &DispatchContext<'_>) -> Route {
    RULES
        .iter()
        .find(|(_, applies)| applies(cx))
        .map(|(route, _)| *route)
        .unwrap_or(Route::Fallback)
}

/// Drives profile completion and gates search for authenticated users.
pub struct ConversationController {
    pub(super) store: Arc<dyn UserStore>,
    pub(super) search: Arc<SearchService>,
    pub(super) validator: FieldValidator,
    pub(super) casual: Arc<dyn CasualResponder>,
    pub(super) analytics: Arc<dyn AnalyticsSink>,
    pub(super) config: BotConfig,
}

impl ConversationController {
    pub fn new(
        store: Arc<dyn UserStore>,
        search: Arc<SearchService>,
        validator: FieldValidator,
        casual: Arc<dyn CasualResponder>,
        analytics: Arc<dyn AnalyticsSink>,
        config: BotConfig,
    ) -> Self {
        Self {
            store,
            search,
            validator,
            casual,
            analytics,
            config,
        }
    }

    /// Handle one message and return the reply.
    ///
    /// Always produces a reply. If a handler fails, the session is restored
    /// to its state before the message and a generic retry message is
    /// returned.
    pub async fn handle_authenticated_user(
        &self,
        message: &str,
        intent: &Intent,
        session: &mut Session,
    ) -> String {
        let preview: String = message.chars().take(100).collect();
        debug!(phone = %session.phone, intent = intent.kind(), message = %preview, "Handling message");

        self.analytics
            .log_activity(
                &session.phone,
                "authenticated_user_interaction",
                json!({
                    "intent": intent.kind(),
                    "session_state": session.tag(),
                    "profile_complete": session.user.enhanced_profile.completed,
                    "user_name": session.user.greeting_name(),
                }),
            )
            .await;

        let snapshot = session.clone();
        match self.dispatch(message, intent, session).await {
            Ok(reply) => reply,
            Err(e) => {
                *session = snapshot;
                error!(
                    phone = %session.phone,
                    intent = intent.kind(),
                    error = %e,
                    "handle_authenticated_user failed"
                );
                self.analytics
                    .log_error("handle_authenticated_user", &e.to_string())
                    .await;
                messages::TECHNICAL_ISSUE.to_string()
            }
        }
    }

    async fn dispatch(&self, message: &str, intent: &Intent, session: &mut Session) -> Result<String> {
        let access = can_access_search(&session.user);
        let route = route(&DispatchContext {
            intent,
            session: &*session,
            profile_complete: access.can_access,
        });
        debug!(phone = %session.phone, route = ?route, "Routed message");

        match route {
            Route::FieldUpdate => self.handle_field_update(message, intent, session).await,
            Route::Search => self.handle_search(message, intent, session, access).await,
            Route::SubChoice => self.handle_sub_choice(message, intent, session).await,
            Route::ProfileUpdate => handle_profile_update(session, access),
            Route::Casual => Ok(self.handle_casual(message, session, &access).await),
            Route::AutoStart => auto_start(session, access),
            Route::Ready => {
                session.set_ready();
                Ok(messages::search_ready(session.user.greeting_name()))
            }
            Route::Fallback => Ok(messages::fallback_greeting(session.user.greeting_name())),
        }
    }

    async fn handle_search(
        &self,
        message: &str,
        intent: &Intent,
        session: &mut Session,
        access: SearchAccess,
    ) -> Result<String> {
        if !access.can_access {
            let (first, total) = seed(session, access.incomplete_fields)?;
            session.search_blocked = true;
            info!(phone = %session.phone, missing = total, "Search blocked by incomplete profile");
            return Ok(messages::search_blocked(
                access.completion_percentage,
                first,
                total,
            ));
        }

        let query = intent
            .query()
            .filter(|q| !q.trim().is_empty())
            .unwrap_or(message);
        let results = self.search.search(query, &session.phone).await;

        session.set_ready();
        session.search_blocked = false;
        if matches!(intent, Intent::SkipAndSearch { .. }) {
            session.profile_skipped = true;
            return Ok(messages::skip_and_search(&results));
        }
        Ok(results)
    }

    async fn handle_casual(&self, message: &str, session: &Session, access: &SearchAccess) -> String {
        let context = CasualContext {
            name: session.user.greeting_name().to_string(),
            profile_complete: access.can_access,
            completion_percentage: access.completion_percentage,
        };
        let reply = self.casual.respond(message, &context).await;
        if access.can_access {
            reply
        } else {
            messages::casual_nudge(
                &reply,
                access.completion_percentage,
                access.incomplete_fields.len(),
            )
        }
    }
}

/// Start a completion pass over `fields`; returns the first field and the
/// pass length.
pub(super) fn seed(session: &mut Session, fields: Vec<Field>) -> Result<(Field, usize)> {
    let total = fields.len();
    let first = session
        .seed_completion(fields)
        .ok_or_else(|| Error::Session("no fields to collect".to_string()))?;
    Ok((first, total))
}

fn handle_profile_update(session: &mut Session, access: SearchAccess) -> Result<String> {
    if !access.can_access {
        let (first, total) = seed(session, access.incomplete_fields)?;
        return Ok(messages::completion_required(
            access.completion_percentage,
            first,
            total,
        ));
    }

    if !unanswered_optional_fields(&session.user).is_empty() {
        session.waiting_for = Some(WaitingFor::ProfileChoice);
        return Ok(format!(
            "{}{}",
            messages::PROFILE_ALREADY_COMPLETE,
            messages::OFFER_OPTIONAL_FIELDS
        ));
    }
    Ok(messages::PROFILE_ALREADY_COMPLETE.to_string())
}

fn auto_start(session: &mut Session, access: SearchAccess) -> Result<String> {
    let name = session.user.greeting_name().to_string();
    let (first, total) = seed(session, access.incomplete_fields)?;
    session.profile_completion_started = true;
    info!(phone = %session.phone, missing = total, "Profile completion started");
    Ok(messages::welcome_back(
        &name,
        access.completion_percentage,
        first,
        total,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::UserRecord;

    fn session() -> Session {
        Session::new(UserRecord::new("91", "Asha", "asha@example.com"))
    }

    fn route_for(intent: &Intent, session: &Session, complete: bool) -> Route {
        route(&DispatchContext {
            intent,
            session,
            profile_complete: complete,
        })
    }

    fn search() -> Intent {
        Intent::Search {
            query: "fintech".into(),
        }
    }

    #[test]
    fn field_update_outranks_search() {
        let mut s = session();
        s.seed_completion(vec![Field::City]);
        assert_eq!(route_for(&search(), &s, false), Route::FieldUpdate);
        assert_eq!(route_for(&Intent::Casual, &s, false), Route::FieldUpdate);
    }

    #[test]
    fn search_outranks_pending_choice() {
        let mut s = session();
        s.waiting_for = Some(WaitingFor::ProfileChoice);
        assert_eq!(route_for(&search(), &s, true), Route::Search);
        assert_eq!(route_for(&Intent::Casual, &s, true), Route::SubChoice);
    }

    #[test]
    fn auto_start_only_once() {
        let mut s = session();
        assert_eq!(route_for(&Intent::Other, &s, false), Route::AutoStart);
        s.profile_completion_started = true;
        assert_eq!(route_for(&Intent::Other, &s, false), Route::Fallback);
        assert_eq!(route_for(&Intent::Other, &s, true), Route::Ready);
    }

    #[test]
    fn intents_route_in_order() {
        let s = session();
        assert_eq!(route_for(&Intent::ProfileUpdate, &s, false), Route::ProfileUpdate);
        assert_eq!(route_for(&Intent::Casual, &s, false), Route::Casual);
        assert_eq!(
            route_for(&Intent::SkipAndSearch { query: "x".into() }, &s, false),
            Route::Search
        );
    }
}
