//! Collecting one profile field at a time.

use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::intent::Intent;
use crate::profile::completion::{incomplete_fields, percentage};
use crate::profile::prompts::step_prompt;
use crate::profile::{Field, FieldValue, ValidationResult};

use super::controller::{ConversationController, seed};
use super::messages;
use super::state::{CompletionPass, Session, WaitingFor};

/// Whole words only, so answers like "Stopford" or "Laterza" are saved
/// rather than read as a request to pause.
static PAUSE_WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(later|stop)\b").unwrap());

impl ConversationController {
    /// Handle a message while a field is being collected.
    pub(super) async fn handle_field_update(
        &self,
        message: &str,
        intent: &Intent,
        session: &mut Session,
    ) -> Result<String> {
        let Some(WaitingFor::UpdatingField {
            field,
            pass,
            retry_count,
        }) = session.waiting_for.clone()
        else {
            return Err(Error::Session(format!(
                "field update without an active field (state {:?})",
                session.tag()
            )));
        };

        if matches!(intent, Intent::SkipProfile) || PAUSE_WORDS.is_match(message) {
            return Ok(pause(session, &pass));
        }

        if intent.is_search() {
            return Ok(messages::search_blocked_mid_update(
                field,
                pass.current_step(),
                pass.total(),
            ));
        }

        let (value, warning) = match self.validator.validate(field, message).await {
            ValidationResult::Valid { value, warning } => (value, warning),
            ValidationResult::Invalid { message: error } => {
                let retries = retry_count + 1;
                if let Some(WaitingFor::UpdatingField { retry_count, .. }) = &mut session.waiting_for
                {
                    *retry_count = retries;
                }
                debug!(phone = %session.phone, field = %field, retries, "Field validation failed");
                if retries >= self.config.retry_help_threshold {
                    return Ok(messages::with_help_tips(&error, field));
                }
                return Ok(error);
            }
        };

        if !self.persist_field(session, field, &value).await {
            return Ok(messages::database_error(field));
        }

        let step = pass.current_step();
        let total = pass.total();
        let last = pass.remaining_fields.is_empty();

        let mut reply = messages::field_saved(field, step, total, percentage(total, total - step));
        if let Some(warning) = warning {
            reply.push_str("\n\n");
            reply.push_str(&warning);
        }
        let next = self.advance_or_complete(session, pass).await?;
        reply.push_str("\n\n");
        reply.push_str(&next);

        self.analytics
            .log_activity(
                &session.phone,
                "profile_field_updated",
                json!({
                    "field": field.key(),
                    "progress": format!("{step}/{total}"),
                    "completed": last,
                }),
            )
            .await;

        Ok(reply)
    }

    /// Write one field and refresh the session's copy of the record.
    ///
    /// Returns `false` when the write did not happen; the session is left
    /// untouched so the same answer can be retried.
    pub(super) async fn persist_field(
        &self,
        session: &mut Session,
        field: Field,
        value: &FieldValue,
    ) -> bool {
        match self.store.update_field(&session.phone, field, value).await {
            Ok(true) => {}
            Ok(false) => {
                warn!(phone = %session.phone, field = %field, "No record to update");
                return false;
            }
            Err(e) => {
                warn!(phone = %session.phone, field = %field, error = %e, "Failed to save profile field");
                return false;
            }
        }

        session
            .user
            .enhanced_profile
            .fields
            .insert(field, value.clone());
        self.refresh_user(session).await;
        info!(phone = %session.phone, field = %field, "Profile field saved");
        true
    }

    /// Reload the record from the store, keeping the local copy on failure.
    pub(super) async fn refresh_user(&self, session: &mut Session) {
        match self.store.find_by_phone(&session.phone).await {
            Ok(Some(user)) => session.user = user,
            Ok(None) => warn!(phone = %session.phone, "Record vanished during update"),
            Err(e) => warn!(phone = %session.phone, error = %e, "Failed to reload record"),
        }
    }

    /// Ask for the next field of `pass`, or finish the profile when the pass
    /// is done.
    pub(super) async fn advance_or_complete(
        &self,
        session: &mut Session,
        mut pass: CompletionPass,
    ) -> Result<String> {
        if let Some(next) = pass.advance() {
            let step = pass.current_step();
            let total = pass.total();
            session.enter_field(next, pass);
            return Ok(step_prompt(next, step, total));
        }

        // The pass is over but required fields are still missing.
        let missing = incomplete_fields(&session.user);
        if !missing.is_empty() {
            let (first, total) = seed(session, missing)?;
            return Ok(step_prompt(first, 1, total));
        }

        if !session.user.enhanced_profile.completed {
            if self.store.mark_completed(&session.phone).await? {
                session.user.enhanced_profile.completed = true;
                session.user.enhanced_profile.completed_at = Some(Utc::now());
            }
            info!(phone = %session.phone, "Profile completed");
        }

        session.set_ready();
        session.profile_completed = true;
        session.search_blocked = false;
        Ok(messages::PROFILE_COMPLETED.to_string())
    }
}

/// Stop collecting; progress so far is kept.
fn pause(session: &mut Session, pass: &CompletionPass) -> String {
    let reply = messages::update_paused(pass.completed_count(), pass.total());
    session.set_ready();
    session.profile_skipped = true;
    info!(phone = %session.phone, "Profile update paused");
    reply
}
