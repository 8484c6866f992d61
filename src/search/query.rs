//! Candidate filter: a case-insensitive keyword alternation matched over
//! the searchable profile text.

use regex::{Regex, RegexBuilder};

use crate::error::SearchError;
use crate::profile::{Field, UserRecord};

/// Enhanced fields whose text is searched.
pub const SEARCHABLE_FIELDS: [Field; 9] = [
    Field::FullName,
    Field::Domain,
    Field::ProfessionalRole,
    Field::City,
    Field::State,
    Field::Country,
    Field::CommunityAsks,
    Field::CommunityGives,
    Field::YatraImpact,
];

/// Every searchable text fragment of a record: bio, registration name,
/// then the enhanced fields.
pub fn searchable_texts(user: &UserRecord) -> Vec<&str> {
    let mut texts = Vec::new();
    if let Some(about) = user.basic_profile.about.as_deref() {
        texts.push(about);
    }
    texts.push(user.basic_profile.name.as_str());
    for field in SEARCHABLE_FIELDS {
        match user.value(field) {
            Some(value) if field.is_multi_select() => {
                texts.extend(value.as_list().iter().map(String::as_str));
            }
            Some(value) => texts.extend(value.as_text()),
            None => {}
        }
    }
    texts
}

fn digits(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

/// What the store should return for a search.
#[derive(Debug, Clone)]
pub struct SearchFilter {
    pattern: Regex,
    exclude_phone: String,
    limit: usize,
}

impl SearchFilter {
    /// Build an OR-match over `keywords`, excluding the requester.
    ///
    /// Keywords are escaped, so model output like `c++` cannot break the
    /// pattern.
    pub fn new(keywords: &[String], exclude_phone: &str, limit: usize) -> Result<Self, SearchError> {
        let alternation = keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join("|");

        let pattern = RegexBuilder::new(&alternation)
            .case_insensitive(true)
            .build()?;

        Ok(Self {
            pattern,
            exclude_phone: exclude_phone.to_string(),
            limit,
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Whether `user` is a candidate for this search.
    pub fn matches(&self, user: &UserRecord) -> bool {
        if self.is_requester(user) {
            return false;
        }
        searchable_texts(user)
            .into_iter()
            .any(|text| self.pattern.is_match(text))
    }

    fn is_requester(&self, user: &UserRecord) -> bool {
        if user.phone == self.exclude_phone {
            return true;
        }
        let own = digits(&self.exclude_phone);
        !own.is_empty() && digits(&user.phone) == own
    }
}
