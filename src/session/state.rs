//! Conversation session: what the bot is waiting for from one user.

use serde::{Deserialize, Serialize};

use crate::profile::{Field, UserRecord};

/// One run through a list of fields to collect.
///
/// The field currently being asked is not in `remaining_fields`; it is the
/// one carried by the enclosing [`WaitingFor`] variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionPass {
    /// Fields missing when the pass started, in collection order.
    pub incomplete_fields: Vec<Field>,
    /// Fields after the current one.
    pub remaining_fields: Vec<Field>,
}

impl CompletionPass {
    /// Start a pass over `fields`. Returns the first field and the pass, or
    /// `None` when there is nothing to collect.
    pub fn start(fields: Vec<Field>) -> Option<(Field, Self)> {
        let first = *fields.first()?;
        let pass = Self {
            remaining_fields: fields[1..].to_vec(),
            incomplete_fields: fields,
        };
        Some((first, pass))
    }

    pub fn total(&self) -> usize {
        self.incomplete_fields.len()
    }

    /// 1-based position of the current field.
    pub fn current_step(&self) -> usize {
        self.total().saturating_sub(self.remaining_fields.len())
    }

    /// Fields finished before the current one.
    pub fn completed_count(&self) -> usize {
        self.current_step().saturating_sub(1)
    }

    /// Move to the next field, if any.
    pub fn advance(&mut self) -> Option<Field> {
        if self.remaining_fields.is_empty() {
            return None;
        }
        Some(self.remaining_fields.remove(0))
    }
}

/// What the next message from the user is expected to answer.
///
/// Each variant carries only the data relevant to it, so the current field
/// and the pass it belongs to always move together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WaitingFor {
    Ready,
    UpdatingField {
        field: Field,
        pass: CompletionPass,
        /// Consecutive validation failures for `field`.
        retry_count: u32,
    },
    ProfileChoice,
    AdditionalEmailChoice {
        pass: CompletionPass,
    },
    AdditionalEmailInput {
        pass: CompletionPass,
    },
    InstagramChoice {
        pass: CompletionPass,
    },
}

impl WaitingFor {
    /// String tag such as `updating_city` or `profile_choice`.
    pub fn tag(&self) -> String {
        match self {
            Self::Ready => "ready".to_string(),
            Self::UpdatingField { field, .. } => format!("updating_{}", field.key()),
            Self::ProfileChoice => "profile_choice".to_string(),
            Self::AdditionalEmailChoice { .. } => "additional_email_choice".to_string(),
            Self::AdditionalEmailInput { .. } => "additional_email_input".to_string(),
            Self::InstagramChoice { .. } => "instagram_choice".to_string(),
        }
    }

    pub fn pass(&self) -> Option<&CompletionPass> {
        match self {
            Self::UpdatingField { pass, .. }
            | Self::AdditionalEmailChoice { pass }
            | Self::AdditionalEmailInput { pass }
            | Self::InstagramChoice { pass } => Some(pass),
            Self::Ready | Self::ProfileChoice => None,
        }
    }
}

/// Per-user conversation state, owned by one message exchange at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub phone: String,
    /// Latest known copy of the user's record.
    pub user: UserRecord,
    pub waiting_for: Option<WaitingFor>,
    pub search_blocked: bool,
    pub profile_completion_started: bool,
    pub profile_skipped: bool,
    pub profile_completed: bool,
    pub ready: bool,
}

impl Session {
    pub fn new(user: UserRecord) -> Self {
        Self {
            phone: user.phone.clone(),
            user,
            waiting_for: None,
            search_blocked: false,
            profile_completion_started: false,
            profile_skipped: false,
            profile_completed: false,
            ready: false,
        }
    }

    pub fn tag(&self) -> Option<String> {
        self.waiting_for.as_ref().map(WaitingFor::tag)
    }

    pub fn is_updating(&self) -> bool {
        matches!(self.waiting_for, Some(WaitingFor::UpdatingField { .. }))
    }

    /// Waiting on one of the yes/no or email sub-choices.
    pub fn is_awaiting_choice(&self) -> bool {
        matches!(
            self.waiting_for,
            Some(
                WaitingFor::ProfileChoice
                    | WaitingFor::AdditionalEmailChoice { .. }
                    | WaitingFor::AdditionalEmailInput { .. }
                    | WaitingFor::InstagramChoice { .. }
            )
        )
    }

    pub fn current_field(&self) -> Option<Field> {
        match &self.waiting_for {
            Some(WaitingFor::UpdatingField { field, .. }) => Some(*field),
            _ => None,
        }
    }

    pub fn pass(&self) -> Option<&CompletionPass> {
        self.waiting_for.as_ref().and_then(WaitingFor::pass)
    }

    /// Snapshot of the fields the active pass started with.
    pub fn incomplete_fields(&self) -> &[Field] {
        self.pass().map(|p| p.incomplete_fields.as_slice()).unwrap_or(&[])
    }

    pub fn remaining_fields(&self) -> &[Field] {
        self.pass().map(|p| p.remaining_fields.as_slice()).unwrap_or(&[])
    }

    pub fn retry_count(&self) -> u32 {
        match &self.waiting_for {
            Some(WaitingFor::UpdatingField { retry_count, .. }) => *retry_count,
            _ => 0,
        }
    }

    /// Start a completion pass over `incomplete`. Returns the first field.
    pub fn seed_completion(&mut self, incomplete: Vec<Field>) -> Option<Field> {
        let (first, pass) = CompletionPass::start(incomplete)?;
        self.enter_field(first, pass);
        Some(first)
    }

    /// Ask for `field` as part of `pass`.
    ///
    /// Optional fields start with their yes/no question.
    pub fn enter_field(&mut self, field: Field, pass: CompletionPass) {
        self.waiting_for = Some(match field {
            Field::AdditionalEmail => WaitingFor::AdditionalEmailChoice { pass },
            Field::Instagram => WaitingFor::InstagramChoice { pass },
            _ => WaitingFor::UpdatingField {
                field,
                pass,
                retry_count: 0,
            },
        });
    }

    /// Leave any pass and wait for a search.
    pub fn set_ready(&mut self) {
        self.waiting_for = Some(WaitingFor::Ready);
        self.ready = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(UserRecord::new("91", "Asha", "asha@example.com"))
    }

    #[test]
    fn seeding_sets_field_and_pass_together() {
        let mut s = session();
        let first = s.seed_completion(vec![Field::City, Field::Phone, Field::Linkedin]);
        assert_eq!(first, Some(Field::City));
        assert_eq!(s.current_field(), Some(Field::City));
        assert_eq!(s.tag().as_deref(), Some("updating_city"));
        assert_eq!(s.incomplete_fields(), [Field::City, Field::Phone, Field::Linkedin]);
        assert_eq!(s.remaining_fields(), [Field::Phone, Field::Linkedin]);
        assert_eq!(s.retry_count(), 0);
    }

    #[test]
    fn seeding_nothing_leaves_session_alone() {
        let mut s = session();
        assert_eq!(s.seed_completion(Vec::new()), None);
        assert_eq!(s.waiting_for, None);
    }

    #[test]
    fn step_counting() {
        let (_, mut pass) = CompletionPass::start(vec![Field::City, Field::Phone]).unwrap();
        assert_eq!((pass.current_step(), pass.completed_count()), (1, 0));
        assert_eq!(pass.advance(), Some(Field::Phone));
        assert_eq!((pass.current_step(), pass.completed_count()), (2, 1));
        assert_eq!(pass.advance(), None);
    }

    #[test]
    fn optional_fields_start_with_choice() {
        let mut s = session();
        s.seed_completion(vec![Field::AdditionalEmail, Field::Instagram]);
        assert_eq!(s.tag().as_deref(), Some("additional_email_choice"));
        assert!(s.is_awaiting_choice());
        assert_eq!(s.remaining_fields(), [Field::Instagram]);
    }

    #[test]
    fn ready_clears_pass() {
        let mut s = session();
        s.seed_completion(vec![Field::City]);
        s.set_ready();
        assert!(s.ready);
        assert!(s.incomplete_fields().is_empty());
        assert_eq!(s.current_field(), None);
    }

    #[test]
    fn waiting_for_serializes_tagged() {
        let mut s = session();
        s.seed_completion(vec![Field::City]);
        let json = serde_json::to_value(&s.waiting_for).unwrap();
        assert_eq!(json["state"], "updating_field");
        assert_eq!(json["field"], "city");
    }
}
