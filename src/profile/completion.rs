//! The search gate: a profile unlocks search only when every required
//! field is filled.

use serde::Serialize;

use super::fields::{Field, optional_fields, required_fields};
use super::model::UserRecord;

/// Required fields still missing, in collection order.
pub fn incomplete_fields(user: &UserRecord) -> Vec<Field> {
    required_fields().filter(|f| !user.is_filled(*f)).collect()
}

/// Optional fields the user has neither filled nor declined.
pub fn unanswered_optional_fields(user: &UserRecord) -> Vec<Field> {
    optional_fields().filter(|f| !user.is_answered(*f)).collect()
}

/// Share of required fields filled, rounded to the nearest percent.
pub fn completion_percentage(user: &UserRecord) -> u8 {
    percentage(required_fields().count(), incomplete_fields(user).len())
}

pub(crate) fn percentage(total: usize, missing: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let done = total.saturating_sub(missing) as f64;
    (100.0 * done / total as f64).round() as u8
}

/// Answer to "can this user search?".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchAccess {
    pub can_access: bool,
    pub completion_percentage: u8,
    pub incomplete_fields: Vec<Field>,
}

pub fn can_access_search(user: &UserRecord) -> SearchAccess {
    let incomplete = incomplete_fields(user);
    SearchAccess {
        can_access: incomplete.is_empty(),
        completion_percentage: percentage(required_fields().count(), incomplete.len()),
        incomplete_fields: incomplete,
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::super::fields::Field;
    use super::super::model::{FieldValue, UserRecord};

    /// A sample value that satisfies `field`.
    pub fn sample_value(field: Field) -> FieldValue {
        match field {
            Field::FullName => FieldValue::Text("Asha Rao".into()),
            Field::Gender => FieldValue::Text("Female".into()),
            Field::DateOfBirth => FieldValue::Text("15-08-1995".into()),
            Field::Country => FieldValue::Text("India".into()),
            Field::State => FieldValue::Text("Maharashtra".into()),
            Field::City => FieldValue::Text("Pune".into()),
            Field::Phone => FieldValue::Text("919876543210".into()),
            Field::AdditionalEmail => FieldValue::Flag(false),
            Field::Linkedin => FieldValue::Text("https://linkedin.com/in/asha".into()),
            Field::Instagram => FieldValue::Skipped,
            Field::Domain => FieldValue::Text("Education & EdTech".into()),
            Field::ProfessionalRole => FieldValue::Text("Entrepreneur / Founder".into()),
            Field::YatraImpact => FieldValue::List(vec!["Changed my career direction".into()]),
            Field::CommunityAsks => FieldValue::List(vec![
                "Mentorship".into(),
                "Hiring talent".into(),
                "Product feedback".into(),
            ]),
            Field::CommunityGives => FieldValue::List(vec!["Mentoring".into()]),
        }
    }

    /// A user with every field filled except `missing`.
    pub fn user_missing(missing: &[Field]) -> UserRecord {
        let mut user = UserRecord::new("919800000001", "Asha", "asha@example.com");
        for field in Field::ALL {
            if !missing.contains(&field) {
                user.enhanced_profile
                    .fields
                    .insert(field, sample_value(field));
            }
        }
        user
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::user_missing;
    use super::*;

    #[test]
    fn complete_profile_can_search() {
        let user = user_missing(&[]);
        let access = can_access_search(&user);
        assert!(access.can_access);
        assert_eq!(access.completion_percentage, 100);
        assert!(access.incomplete_fields.is_empty());
    }

    #[test]
    fn optional_fields_do_not_gate() {
        let user = user_missing(&[Field::AdditionalEmail, Field::Instagram]);
        assert!(can_access_search(&user).can_access);
        assert_eq!(
            unanswered_optional_fields(&user),
            vec![Field::AdditionalEmail, Field::Instagram]
        );
    }

    #[test]
    fn incomplete_fields_follow_canonical_order() {
        let user = user_missing(&[Field::Phone, Field::City, Field::FullName]);
        assert_eq!(
            incomplete_fields(&user),
            vec![Field::FullName, Field::City, Field::Phone]
        );
    }

    #[test]
    fn access_iff_nothing_missing() {
        let required: Vec<Field> = required_fields().collect();
        for k in 0..=required.len() {
            let user = user_missing(&required[..k]);
            let access = can_access_search(&user);
            assert_eq!(access.can_access, incomplete_fields(&user).is_empty());
        }
    }

    #[test]
    fn percentage_tracks_required_count() {
        let required: Vec<Field> = required_fields().collect();
        let total = required.len() as f64;
        for k in 0..=required.len() {
            let user = user_missing(&required[..k]);
            let expected = (100.0 * (total - k as f64) / total).round() as u8;
            assert_eq!(completion_percentage(&user), expected);
        }
        assert_eq!(completion_percentage(&user_missing(&[Field::City, Field::Phone])), 85);
    }

    #[test]
    fn empty_list_counts_as_missing() {
        let mut user = user_missing(&[]);
        user.enhanced_profile.fields.insert(
            Field::CommunityGives,
            crate::profile::model::FieldValue::List(vec![]),
        );
        assert_eq!(incomplete_fields(&user), vec![Field::CommunityGives]);
    }
}
