//! Yes/no sub-choices: the profile offer and the two optional fields.

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::intent::Intent;
use crate::profile::completion::unanswered_optional_fields;
use crate::profile::prompts::step_prompt;
use crate::profile::validation::{parse_yes_no, sanitize_input, validate_email};
use crate::profile::{Field, FieldValue, ValidationResult, can_access_search};

use super::controller::{ConversationController, seed};
use super::messages;
use super::state::{CompletionPass, Session, WaitingFor};

fn said_yes(message: &str, intent: &Intent) -> bool {
    matches!(intent, Intent::Affirmative)
        || message.to_lowercase().contains("yes")
        || parse_yes_no(message) == Some(true)
}

impl ConversationController {
    pub(super) async fn handle_sub_choice(
        &self,
        message: &str,
        intent: &Intent,
        session: &mut Session,
    ) -> Result<String> {
        match session.waiting_for.clone() {
            Some(WaitingFor::ProfileChoice) => profile_choice(message, intent, session),
            Some(WaitingFor::AdditionalEmailChoice { pass }) => {
                self.additional_email_choice(message, intent, session, pass)
                    .await
            }
            Some(WaitingFor::AdditionalEmailInput { pass }) => {
                self.additional_email_input(message, session, pass).await
            }
            Some(WaitingFor::InstagramChoice { pass }) => {
                self.instagram_choice(message, intent, session, pass).await
            }
            other => Err(Error::Session(format!(
                "no sub-choice pending (state {:?})",
                other.as_ref().map(WaitingFor::tag)
            ))),
        }
    }

    async fn additional_email_choice(
        &self,
        message: &str,
        intent: &Intent,
        session: &mut Session,
        pass: CompletionPass,
    ) -> Result<String> {
        if said_yes(message, intent) {
            session.waiting_for = Some(WaitingFor::AdditionalEmailInput { pass });
            return Ok(messages::ADDITIONAL_EMAIL_PROMPT.to_string());
        }
        self.record_decline(session, Field::AdditionalEmail, FieldValue::Flag(false), pass)
            .await
    }

    async fn additional_email_input(
        &self,
        message: &str,
        session: &mut Session,
        pass: CompletionPass,
    ) -> Result<String> {
        let input = sanitize_input(message);
        if input.eq_ignore_ascii_case("skip") {
            return self
                .record_decline(session, Field::AdditionalEmail, FieldValue::Flag(false), pass)
                .await;
        }

        let email = match validate_email(&input) {
            ValidationResult::Valid {
                value: FieldValue::Text(email),
                ..
            } => email,
            ValidationResult::Invalid { message } => {
                return Ok(messages::invalid_additional_email(&message));
            }
            ValidationResult::Valid { .. } => {
                return Ok(messages::invalid_additional_email("❌ Invalid email format"));
            }
        };

        let outcome = match self.store.link_additional_email(&session.phone, &email).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(phone = %session.phone, error = %e, "Failed to link additional email");
                return Ok(messages::LINK_FAILED.to_string());
            }
        };
        if !outcome.success {
            let reason = outcome.error.as_deref().unwrap_or("Unable to link this email.");
            return Ok(messages::link_rejected(reason));
        }

        info!(phone = %session.phone, "Additional email linked");
        if !session.user.basic_profile.linked_emails.contains(&email) {
            session.user.basic_profile.linked_emails.push(email.clone());
        }
        session
            .user
            .enhanced_profile
            .fields
            .insert(Field::AdditionalEmail, FieldValue::Text(email));
        self.refresh_user(session).await;

        let next = self.advance_or_complete(session, pass).await?;
        Ok(messages::email_linked(&next))
    }

    async fn instagram_choice(
        &self,
        message: &str,
        intent: &Intent,
        session: &mut Session,
        pass: CompletionPass,
    ) -> Result<String> {
        if said_yes(message, intent) {
            session.waiting_for = Some(WaitingFor::UpdatingField {
                field: Field::Instagram,
                pass,
                retry_count: 0,
            });
            return Ok(messages::INSTAGRAM_URL_PROMPT.to_string());
        }
        self.record_decline(session, Field::Instagram, FieldValue::Skipped, pass)
            .await
    }

    /// Save a "no" for an optional field and move on.
    async fn record_decline(
        &self,
        session: &mut Session,
        field: Field,
        value: FieldValue,
        pass: CompletionPass,
    ) -> Result<String> {
        if !self.persist_field(session, field, &value).await {
            return Ok(messages::save_choice_failed(field));
        }
        self.advance_or_complete(session, pass).await
    }
}

fn profile_choice(message: &str, intent: &Intent, session: &mut Session) -> Result<String> {
    let access = can_access_search(&session.user);

    if said_yes(message, intent) {
        if !access.can_access {
            let (first, total) = seed(session, access.incomplete_fields)?;
            return Ok(messages::choice_start_completion(first, total));
        }
        let optional = unanswered_optional_fields(&session.user);
        if !optional.is_empty() {
            let (first, total) = seed(session, optional)?;
            return Ok(step_prompt(first, 1, total));
        }
        session.set_ready();
        return Ok(messages::CHOICE_ALREADY_COMPLETE.to_string());
    }

    if !access.can_access {
        return Ok(messages::choice_reminder(access.completion_percentage));
    }
    session.set_ready();
    session.profile_skipped = true;
    Ok(messages::CHOICE_DECLINED.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::UserRecord;
    use crate::profile::completion::fixtures::user_missing;

    #[test]
    fn yes_detection() {
        assert!(said_yes("oh YES please", &Intent::Other));
        assert!(said_yes("sure", &Intent::Affirmative));
        assert!(said_yes("Y", &Intent::Other));
        assert!(said_yes("1", &Intent::Other));
        assert!(!said_yes("no thanks", &Intent::Other));
        assert!(!said_yes("2", &Intent::Other));
    }

    #[test]
    fn declining_complete_profile_goes_ready() {
        let mut session = Session::new(user_missing(&[]));
        session.waiting_for = Some(WaitingFor::ProfileChoice);
        let reply = profile_choice("no", &Intent::Other, &mut session).unwrap();
        assert_eq!(reply, messages::CHOICE_DECLINED);
        assert!(session.profile_skipped);
        assert_eq!(session.tag().as_deref(), Some("ready"));
    }

    #[test]
    fn declining_incomplete_profile_reminds() {
        let mut session = Session::new(UserRecord::new("91", "Asha", "a@x.com"));
        session.waiting_for = Some(WaitingFor::ProfileChoice);
        let reply = profile_choice("no", &Intent::Other, &mut session).unwrap();
        assert!(reply.contains("Search Requires Complete Profile"));
        assert_eq!(session.tag().as_deref(), Some("profile_choice"));
    }

    #[test]
    fn accepting_offers_optional_fields() {
        let mut session = Session::new(user_missing(&[Field::AdditionalEmail, Field::Instagram]));
        session.waiting_for = Some(WaitingFor::ProfileChoice);
        let reply = profile_choice("yes", &Intent::Affirmative, &mut session).unwrap();
        assert!(reply.contains("**Step 1 of 2:**"));
        assert_eq!(session.tag().as_deref(), Some("additional_email_choice"));
        assert_eq!(session.remaining_fields(), [Field::Instagram]);
    }
}
