//! Prompt text for each profile field.

use super::fields::{
    COMMUNITY_ASKS, COMMUNITY_GIVES, DOMAINS, Field, PROFESSIONAL_ROLES, YATRA_IMPACT,
};

fn numbered(options: &[&str]) -> String {
    options
        .iter()
        .enumerate()
        .map(|(i, option)| format!("**{}.** {option}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The question asked when collecting `field`.
pub fn field_prompt(field: Field) -> String {
    match field {
        Field::FullName => "**👤 Full Name Required**\n\n\
            Please enter your complete legal name:\n\n\
            **Requirements:**\n• 2-100 characters\n• Only letters, spaces, hyphens, apostrophes\n• Your real name (no nicknames)\n\n\
            **Examples:**\n• Rajesh Kumar Singh\n• Mary O'Connor-Smith\n• Priya Sharma"
            .to_string(),
        Field::Gender => "**⚧ Gender Selection**\n\n\
            Please select your gender:\n\n\
            **1.** Male\n**2.** Female\n**3.** Others\n\n\
            Reply with the number (1, 2, or 3)"
            .to_string(),
        Field::DateOfBirth => "**🎂 Date of Birth Required**\n\n\
            Please enter your date of birth:\n\n\
            **Format:** DD-MM-YYYY\n\n\
            **Requirements:**\n• Valid date between 1960-2010\n• Use exact format shown\n\n\
            **Examples:**\n• 15-08-1995\n• 03-12-1988"
            .to_string(),
        Field::Country => "**🌍 Country of Residence**\n\n\
            Please enter your current country:\n\n\
            **Examples:**\n• India\n• United States\n• United Kingdom\n• Canada"
            .to_string(),
        Field::State => "**📍 State/Province Required**\n\n\
            Please enter your state or province:\n\n\
            **Examples:**\n• Maharashtra (India)\n• California (USA)\n• Ontario (Canada)\n• New South Wales (Australia)"
            .to_string(),
        Field::City => "**🏙️ City of Residence**\n\n\
            Please enter your current city:\n\n\
            **Examples:**\n• Mumbai\n• New York\n• London\n• Toronto"
            .to_string(),
        Field::Phone => "**📱 Phone Number Required**\n\n\
            Please enter your phone number with country code:\n\n\
            **Format Examples:**\n• +91 9876543210 (India)\n• +1 2025551234 (USA)\n• +44 7911123456 (UK)\n\n\
            **Requirements:**\n• Include country code\n• 10-15 digits total"
            .to_string(),
        Field::AdditionalEmail => "**📧 Additional Email (Optional)**\n\n\
            Do you have another email address to link?\n\n\
            This helps other alumni find you through multiple emails.\n\n\
            **Reply:**\n• **YES** - Add another email\n• **NO** - Continue with current email only"
            .to_string(),
        Field::Linkedin => "**🔗 LinkedIn Profile Required**\n\n\
            Please enter your LinkedIn profile URL:\n\n\
            **Requirements:**\n• Complete LinkedIn URL\n• Must include linkedin.com/in/\n\n\
            **Examples:**\n• https://linkedin.com/in/yourname\n• https://www.linkedin.com/in/john-smith-123"
            .to_string(),
        Field::Instagram => "**📸 Instagram Profile (Optional)**\n\n\
            Do you have an Instagram profile to share?\n\n\
            **Reply:**\n• **YES** - I want to add Instagram\n• **NO** - Skip Instagram profile"
            .to_string(),
        Field::Domain => {
            let shown = DOMAINS.len().min(10);
            let more = if DOMAINS.len() > shown {
                format!(
                    "\n\n**...and {} more options available**",
                    DOMAINS.len() - shown
                )
            } else {
                String::new()
            };
            format!(
                "**🏢 Industry Domain**\n\n\
                 Please select your primary industry domain:\n\n{}{more}\n\n\
                 Reply with the number (1-{})",
                numbered(&DOMAINS[..shown]),
                DOMAINS.len()
            )
        }
        Field::ProfessionalRole => format!(
            "**💼 Professional Role**\n\n\
             Please select your current professional role:\n\n{}\n\n\
             Reply with the number (1-{})",
            numbered(PROFESSIONAL_ROLES),
            PROFESSIONAL_ROLES.len()
        ),
        Field::YatraImpact => format!(
            "**🚆 Jagriti Yatra Impact**\n\n\
             How did Jagriti Yatra help you personally?\n\n\
             Select 1-3 options that apply:\n\n{}\n\n\
             **Reply with numbers separated by commas:**\n• Single: 1\n• Multiple: 1,2",
            numbered(YATRA_IMPACT)
        ),
        Field::CommunityAsks => format!(
            "**🤝 Community Support Needs**\n\n\
             What are your PRIMARY 3 support needs from our community?\n\n\
             **⚠️ Select EXACTLY 3 options:**\n\n{}\n\n\
             **Reply with exactly 3 numbers:** e.g. 1,3,5",
            numbered(COMMUNITY_ASKS)
        ),
        Field::CommunityGives => format!(
            "**🎁 Community Contributions**\n\n\
             What can you contribute to our community?\n\n\
             Select all options that apply:\n\n{}\n\n\
             **Reply with numbers separated by commas:** e.g. 1,3,5",
            numbered(COMMUNITY_GIVES)
        ),
    }
}

/// Prompt for a field identified by its storage key.
///
/// Unknown keys get a generic prompt rather than an error.
pub fn prompt_for_key(key: &str) -> String {
    match key.parse::<Field>() {
        Ok(field) => field_prompt(field),
        Err(e) => {
            tracing::warn!(key, error = %e, "Prompt requested for unknown field");
            format!("Please provide your {key}:")
        }
    }
}

/// "**Step N of M:** Display Name" followed by the field prompt.
pub fn step_prompt(field: Field, step: usize, total: usize) -> String {
    format!(
        "**Step {step} of {total}:** {}\n\n{}",
        field.display_name(),
        field_prompt(field)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_field_has_a_prompt() {
        for field in Field::ALL {
            assert!(!field_prompt(field).is_empty(), "{field} has no prompt");
        }
    }

    #[test]
    fn choice_prompts_list_their_options() {
        let prompt = field_prompt(Field::CommunityAsks);
        assert!(prompt.contains("EXACTLY 3"));
        for ask in COMMUNITY_ASKS {
            assert!(prompt.contains(ask));
        }
        assert!(field_prompt(Field::ProfessionalRole).contains(PROFESSIONAL_ROLES[0]));
    }

    #[test]
    fn domain_prompt_shows_first_ten() {
        let prompt = field_prompt(Field::Domain);
        assert!(prompt.contains(DOMAINS[9]));
        assert!(!prompt.contains(DOMAINS[10]));
        assert!(prompt.contains(&format!("1-{}", DOMAINS.len())));
    }

    #[test]
    fn unknown_key_gets_generic_prompt() {
        assert_eq!(prompt_for_key("shoe_size"), "Please provide your shoe_size:");
        assert_eq!(prompt_for_key("city"), field_prompt(Field::City));
    }

    #[test]
    fn step_prompt_includes_counter_and_display_name() {
        let prompt = step_prompt(Field::State, 2, 5);
        assert!(prompt.starts_with("**Step 2 of 5:** State/Province"));
    }
}
