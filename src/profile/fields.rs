//! The profile field catalog.
//!
//! `Field` is a closed enum in canonical collection order. Each variant has
//! one [`FieldDescriptor`] carrying its storage key, display name, help
//! tips, whether it gates search, and which validator applies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::geography::GeoKind;

/// A profile field, in the order fields are collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    FullName,
    Gender,
    DateOfBirth,
    Country,
    State,
    City,
    Phone,
    AdditionalEmail,
    Linkedin,
    Instagram,
    Domain,
    ProfessionalRole,
    YatraImpact,
    CommunityAsks,
    CommunityGives,
}

/// Which validator a field uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatorKind {
    Name,
    Gender,
    DateOfBirth,
    Geography(GeoKind),
    Phone,
    /// Yes/no, followed by an email when affirmed.
    AdditionalEmail,
    Linkedin,
    /// Yes/no, followed by a URL when affirmed.
    Instagram,
    Choice {
        options: &'static [&'static str],
        min: usize,
        max: Option<usize>,
    },
}

/// Static metadata for one field.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub field: Field,
    pub key: &'static str,
    pub display_name: &'static str,
    pub help_tips: &'static str,
    /// Required fields gate search; optional ones are offered afterwards.
    pub required: bool,
    pub validator: ValidatorKind,
}

pub const GENDER_OPTIONS: &[&str] = &["Male", "Female", "Others"];

pub const PROFESSIONAL_ROLES: &[&str] = &[
    "Entrepreneur / Founder",
    "Working Professional",
    "Student",
    "Freelancer / Consultant",
    "Government / Public Sector",
    "NGO / Social Sector",
    "Academic / Researcher",
    "Investor",
    "Homemaker",
    "Other",
];

pub const DOMAINS: &[&str] = &[
    "Agriculture & Rural Development",
    "Education & EdTech",
    "Healthcare & HealthTech",
    "Technology & Software",
    "Finance, Banking & FinTech",
    "Manufacturing",
    "Energy, Climate & Environment",
    "Retail & E-commerce",
    "Media, Design & Communications",
    "Social Enterprise & Development",
    "Government & Public Policy",
    "Arts, Culture & Crafts",
    "Tourism & Hospitality",
    "Logistics & Supply Chain",
    "Real Estate & Infrastructure",
    "Legal Services",
    "Consulting & Strategy",
    "Food & Beverage",
    "Sports & Fitness",
    "Other",
];

pub const YATRA_IMPACT: &[&str] = &[
    "Started or grew my own venture",
    "Changed my career direction",
    "Found co-founders, partners or team members",
    "Built a lifelong network of changemakers",
    "Deepened my understanding of India",
    "Grew in confidence and leadership",
];

pub const COMMUNITY_ASKS: &[&str] = &[
    "Mentorship",
    "Funding and investor connects",
    "Hiring talent",
    "Job opportunities",
    "Business partnerships",
    "Market access and customers",
    "Technical guidance",
    "Legal and compliance help",
    "Marketing and branding support",
    "Product feedback",
    "Government and policy connects",
    "Volunteers for my initiative",
];

pub const COMMUNITY_GIVES: &[&str] = &[
    "Mentoring",
    "Investment",
    "Hiring",
    "Technical expertise",
    "Business and strategy advice",
    "Marketing and branding help",
    "Legal advice",
    "Industry introductions",
    "Speaking at events",
    "Volunteering time",
    "Office space or resources",
    "Product feedback",
];

const GENERIC_HELP: &str = "Please follow the format shown in the example above.";

static DESCRIPTORS: [FieldDescriptor; 15] = [
    FieldDescriptor {
        field: Field::FullName,
        key: "full_name",
        display_name: "Full Name",
        help_tips: "• Use your real full name\n• Only letters, spaces, hyphens allowed\n• Example: \"Rajesh Kumar Singh\"",
        required: true,
        validator: ValidatorKind::Name,
    },
    FieldDescriptor {
        field: Field::Gender,
        key: "gender",
        display_name: "Gender",
        help_tips: "• Select 1, 2, or 3\n• 1 = Male, 2 = Female, 3 = Others",
        required: true,
        validator: ValidatorKind::Gender,
    },
    FieldDescriptor {
        field: Field::DateOfBirth,
        key: "date_of_birth",
        display_name: "Date of Birth",
        help_tips: "• Format: DD-MM-YYYY\n• Example: 15-08-1995\n• Year between 1960-2010",
        required: true,
        validator: ValidatorKind::DateOfBirth,
    },
    FieldDescriptor {
        field: Field::Country,
        key: "country",
        display_name: "Country",
        help_tips: "• Enter your country name\n• Use official country names\n• Examples: \"India\", \"United States\", \"Canada\"",
        required: true,
        validator: ValidatorKind::Geography(GeoKind::Country),
    },
    FieldDescriptor {
        field: Field::State,
        key: "state",
        display_name: "State/Province",
        help_tips: "• Enter your state/province\n• Use official state names\n• Examples: \"Maharashtra\", \"California\", \"Ontario\"",
        required: true,
        validator: ValidatorKind::Geography(GeoKind::State),
    },
    FieldDescriptor {
        field: Field::City,
        key: "city",
        display_name: "City",
        help_tips: "• Enter your current city name\n• Use real city names only\n• Examples: \"Mumbai\", \"New York\", \"London\"",
        required: true,
        validator: ValidatorKind::Geography(GeoKind::City),
    },
    FieldDescriptor {
        field: Field::Phone,
        key: "phone",
        display_name: "Phone Number",
        help_tips: "• Include country code\n• Format: +91 9876543210\n• Or: 919876543210",
        required: true,
        validator: ValidatorKind::Phone,
    },
    FieldDescriptor {
        field: Field::AdditionalEmail,
        key: "additional_email",
        display_name: "Additional Email",
        help_tips: "• Reply YES or NO\n• Then enter the email address, e.g. name@example.com",
        required: false,
        validator: ValidatorKind::AdditionalEmail,
    },
    FieldDescriptor {
        field: Field::Linkedin,
        key: "linkedin",
        display_name: "LinkedIn Profile",
        help_tips: "• Full LinkedIn URL required\n• Format: https://linkedin.com/in/yourprofile",
        required: true,
        validator: ValidatorKind::Linkedin,
    },
    FieldDescriptor {
        field: Field::Instagram,
        key: "instagram",
        display_name: "Instagram Profile",
        help_tips: "• Reply YES or NO first\n• Then paste a URL like https://instagram.com/yourprofile",
        required: false,
        validator: ValidatorKind::Instagram,
    },
    FieldDescriptor {
        field: Field::Domain,
        key: "domain",
        display_name: "Industry Domain",
        help_tips: "• Select number from list\n• Choose your primary industry",
        required: true,
        validator: ValidatorKind::Choice {
            options: DOMAINS,
            min: 1,
            max: Some(1),
        },
    },
    FieldDescriptor {
        field: Field::ProfessionalRole,
        key: "professional_role",
        display_name: "Professional Role",
        help_tips: "• Select number from list\n• Choose your current role",
        required: true,
        validator: ValidatorKind::Choice {
            options: PROFESSIONAL_ROLES,
            min: 1,
            max: Some(1),
        },
    },
    FieldDescriptor {
        field: Field::YatraImpact,
        key: "yatra_impact",
        display_name: "Yatra Impact",
        help_tips: GENERIC_HELP,
        required: true,
        validator: ValidatorKind::Choice {
            options: YATRA_IMPACT,
            min: 1,
            max: Some(3),
        },
    },
    FieldDescriptor {
        field: Field::CommunityAsks,
        key: "community_asks",
        display_name: "Community Support Needs",
        help_tips: GENERIC_HELP,
        required: true,
        validator: ValidatorKind::Choice {
            options: COMMUNITY_ASKS,
            min: 3,
            max: Some(3),
        },
    },
    FieldDescriptor {
        field: Field::CommunityGives,
        key: "community_gives",
        display_name: "Community Contributions",
        help_tips: GENERIC_HELP,
        required: true,
        validator: ValidatorKind::Choice {
            options: COMMUNITY_GIVES,
            min: 1,
            max: None,
        },
    },
];

impl Field {
    /// All fields in canonical order.
    pub const ALL: [Field; 15] = [
        Field::FullName,
        Field::Gender,
        Field::DateOfBirth,
        Field::Country,
        Field::State,
        Field::City,
        Field::Phone,
        Field::AdditionalEmail,
        Field::Linkedin,
        Field::Instagram,
        Field::Domain,
        Field::ProfessionalRole,
        Field::YatraImpact,
        Field::CommunityAsks,
        Field::CommunityGives,
    ];

    pub fn descriptor(self) -> &'static FieldDescriptor {
        &DESCRIPTORS[self as usize]
    }

    pub fn key(self) -> &'static str {
        self.descriptor().key
    }

    pub fn display_name(self) -> &'static str {
        self.descriptor().display_name
    }

    pub fn help_tips(self) -> &'static str {
        self.descriptor().help_tips
    }

    pub fn is_required(self) -> bool {
        self.descriptor().required
    }

    pub fn validator(self) -> ValidatorKind {
        self.descriptor().validator
    }

    /// Whether the stored value is a list of selected options.
    pub fn is_multi_select(self) -> bool {
        matches!(
            self,
            Field::YatraImpact | Field::CommunityAsks | Field::CommunityGives
        )
    }
}

/// Fields that gate search, in canonical order.
pub fn required_fields() -> impl Iterator<Item = Field> {
    Field::ALL.into_iter().filter(|f| f.is_required())
}

/// Fields offered after the required set, in canonical order.
pub fn optional_fields() -> impl Iterator<Item = Field> {
    Field::ALL.into_iter().filter(|f| !f.is_required())
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown profile field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.key() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_table_is_indexed_by_variant() {
        for field in Field::ALL {
            assert_eq!(field.descriptor().field, field);
        }
    }

    #[test]
    fn display_matches_serde() {
        for field in Field::ALL {
            let serde_str = serde_json::to_value(field).unwrap();
            assert_eq!(serde_str.as_str().unwrap(), field.to_string());
        }
    }

    #[test]
    fn from_str_roundtrips_keys() {
        for field in Field::ALL {
            assert_eq!(field.key().parse::<Field>().unwrap(), field);
        }
        assert!("favourite_colour".parse::<Field>().is_err());
    }

    #[test]
    fn thirteen_fields_gate_search() {
        assert_eq!(required_fields().count(), 13);
        assert_eq!(
            optional_fields().collect::<Vec<_>>(),
            vec![Field::AdditionalEmail, Field::Instagram]
        );
    }

    #[test]
    fn multi_select_fields_use_unbounded_or_ranged_choice() {
        assert!(matches!(
            Field::CommunityAsks.validator(),
            ValidatorKind::Choice { min: 3, max: Some(3), .. }
        ));
        assert!(matches!(
            Field::CommunityGives.validator(),
            ValidatorKind::Choice { min: 1, max: None, .. }
        ));
        assert!(Field::YatraImpact.is_multi_select());
        assert!(!Field::Domain.is_multi_select());
    }
}
