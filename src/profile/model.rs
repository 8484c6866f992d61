//! User record data model.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::fields::Field;

/// A stored profile value.
///
/// `Skipped` serializes as `null` and records an explicit decline of an
/// optional field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
    List(Vec<String>),
    Skipped,
}

impl FieldValue {
    /// Present and non-empty.
    pub fn is_filled(&self) -> bool {
        match self {
            FieldValue::Text(s) => !s.trim().is_empty(),
            FieldValue::List(items) => !items.is_empty(),
            FieldValue::Flag(_) => true,
            FieldValue::Skipped => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> &[String] {
        match self {
            FieldValue::List(items) => items,
            _ => &[],
        }
    }
}

/// Identity data captured at registration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicProfile {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    /// Extra emails linked through the additional-email flow.
    #[serde(default)]
    pub linked_emails: Vec<String>,
}

/// The collected profile fields plus the completion flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnhancedProfile {
    #[serde(default)]
    pub fields: BTreeMap<Field, FieldValue>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// One alumni member, keyed by phone number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub phone: String,
    pub basic_profile: BasicProfile,
    #[serde(default)]
    pub enhanced_profile: EnhancedProfile,
    #[serde(default)]
    pub last_active: Option<DateTime<Utc>>,
}

impl UserRecord {
    pub fn new(phone: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            basic_profile: BasicProfile {
                name: name.into(),
                email: email.into(),
                ..Default::default()
            },
            enhanced_profile: EnhancedProfile::default(),
            last_active: None,
        }
    }

    pub fn value(&self, field: Field) -> Option<&FieldValue> {
        self.enhanced_profile.fields.get(&field)
    }

    pub fn text(&self, field: Field) -> Option<&str> {
        self.value(field)
            .and_then(FieldValue::as_text)
            .filter(|s| !s.trim().is_empty())
    }

    pub fn list(&self, field: Field) -> &[String] {
        self.value(field).map(FieldValue::as_list).unwrap_or(&[])
    }

    pub fn is_filled(&self, field: Field) -> bool {
        self.value(field).is_some_and(FieldValue::is_filled)
    }

    /// Optional fields count as answered once a value, including an explicit
    /// skip, has been recorded.
    pub fn is_answered(&self, field: Field) -> bool {
        match field {
            Field::AdditionalEmail => {
                self.value(field).is_some() || !self.basic_profile.linked_emails.is_empty()
            }
            _ => self.value(field).is_some(),
        }
    }

    /// Name to greet the user with.
    pub fn greeting_name(&self) -> &str {
        let name = self.basic_profile.name.trim();
        if name.is_empty() { "there" } else { name }
    }

    /// Name to show in search results.
    pub fn display_name(&self) -> &str {
        self.text(Field::FullName)
            .or_else(|| Some(self.basic_profile.name.as_str()).filter(|n| !n.trim().is_empty()))
            .unwrap_or("Alumni Member")
    }

    /// The record trimmed to what search ranking and rendering read.
    pub fn search_projection(&self) -> UserRecord {
        const SEARCH_FIELDS: [Field; 11] = [
            Field::FullName,
            Field::Country,
            Field::State,
            Field::City,
            Field::Phone,
            Field::Linkedin,
            Field::Domain,
            Field::ProfessionalRole,
            Field::YatraImpact,
            Field::CommunityAsks,
            Field::CommunityGives,
        ];

        let mut fields = BTreeMap::new();
        for field in SEARCH_FIELDS {
            if let Some(value) = self.value(field) {
                fields.insert(field, value.clone());
            }
        }

        UserRecord {
            phone: self.phone.clone(),
            basic_profile: BasicProfile {
                name: self.basic_profile.name.clone(),
                email: self.basic_profile.email.clone(),
                about: self.basic_profile.about.clone(),
                linkedin: self.basic_profile.linkedin.clone(),
                linked_emails: Vec::new(),
            },
            enhanced_profile: EnhancedProfile {
                fields,
                completed: self.enhanced_profile.completed,
                completed_at: self.enhanced_profile.completed_at,
            },
            last_active: self.last_active,
        }
    }
}
