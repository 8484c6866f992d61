//! Reply text for search results.

use crate::profile::{Field, UserRecord};

const BIO_EXCERPT_CHARS: usize = 150;
const MIN_BIO_CHARS: usize = 10;
const TAGS_SHOWN: usize = 2;

pub const SEARCH_FAILED: &str = "I'm having a technical hiccup! 😅\n\n\
Please try again, or try simpler terms like:\n\
• \"web developers\"\n\
• \"business mentors\"\n\
• \"marketing help\"";

pub fn rate_limited(daily_limit: u32) -> String {
    format!(
        "🚫 **Daily Search Limit Reached**\n\n\
         You've used all {daily_limit} searches for today. Limit resets at midnight.\n\n\
         Meanwhile, you can:\n\
         • Update your profile\n\
         • Ask general questions\n\
         • Come back tomorrow for more searches"
    )
}

pub fn no_results(query: &str) -> String {
    format!(
        "I searched our network but couldn't find alumni matching \"{query}\". 🔍\n\n\
         Try these suggestions:\n\
         - Use broader terms: \"technology\", \"business\", \"marketing\"\n\
         - Search by role: \"entrepreneur\", \"developer\", \"consultant\"\n\
         - Search by industry: \"fintech\", \"healthtech\", \"edtech\"\n\
         - Search by location: \"Mumbai\", \"Bangalore\", \"Delhi\"\n\
         - Try different keywords: \"web dev\" instead of \"programming\"\n\n\
         What other expertise would be helpful?"
    )
}

fn excerpt(text: &str) -> String {
    if text.chars().count() > BIO_EXCERPT_CHARS {
        let cut: String = text.chars().take(BIO_EXCERPT_CHARS).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

fn profile_card(index: usize, user: &UserRecord) -> String {
    let mut lines = vec![format!("{}. **{}**", index + 1, user.display_name())];

    match (user.text(Field::ProfessionalRole), user.text(Field::Domain)) {
        (Some(role), Some(domain)) => lines.push(format!("💼 {role} in {domain}")),
        (Some(role), None) => lines.push(format!("💼 {role}")),
        (None, Some(domain)) => lines.push(format!("🏢 {domain}")),
        (None, None) => {}
    }

    let location: Vec<&str> = [Field::City, Field::State, Field::Country]
        .into_iter()
        .filter_map(|f| user.text(f))
        .collect();
    if !location.is_empty() {
        lines.push(format!("📍 {}", location.join(", ")));
    }

    if let Some(about) = user
        .basic_profile
        .about
        .as_deref()
        .filter(|about| about.chars().count() > MIN_BIO_CHARS)
    {
        lines.push(format!("📋 {}", excerpt(about)));
    }

    let impact = user.list(Field::YatraImpact);
    if !impact.is_empty() {
        lines.push(format!("🚆 Yatra Impact: {}", tags(impact)));
    }
    let gives = user.list(Field::CommunityGives);
    if !gives.is_empty() {
        lines.push(format!("🎁 Offers: {}", tags(gives)));
    }

    lines.push(format!("📧 {}", contact_email(user)));
    if let Some(linkedin) = user
        .text(Field::Linkedin)
        .or(user.basic_profile.linkedin.as_deref())
    {
        lines.push(format!("🔗 {linkedin}"));
    }
    if let Some(phone) = user.text(Field::Phone) {
        lines.push(format!("📱 {phone}"));
    }
    lines.join("\n")
}

fn tags(values: &[String]) -> String {
    values
        .iter()
        .take(TAGS_SHOWN)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn contact_email(user: &UserRecord) -> &str {
    if user.basic_profile.email.is_empty() {
        "Email not available"
    } else {
        &user.basic_profile.email
    }
}

fn compact_card(index: usize, user: &UserRecord) -> String {
    let mut card = format!(
        "{}. {}\n📧 {}",
        index + 1,
        user.display_name(),
        contact_email(user)
    );
    if let Some(role) = user.text(Field::ProfessionalRole) {
        card.push_str(&format!("\n💼 {role}"));
    }
    card
}

/// Render the first `display` of `selected`.
///
/// Falls back to a name, email and role listing when the full cards exceed
/// `char_budget`.
pub fn render_results(
    selected: &[UserRecord],
    query: &str,
    total_matches: usize,
    display: usize,
    char_budget: usize,
) -> String {
    let shown = &selected[..selected.len().min(display)];
    if shown.is_empty() {
        return no_results(query);
    }

    let plural = if total_matches > 1 { "s" } else { "" };
    let cards = shown
        .iter()
        .enumerate()
        .map(|(i, user)| profile_card(i, user))
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut response = format!(
        "🌟 Found {total_matches} expert{plural} for \"{query}\"\n\nTop {} profiles:\n\n{cards}\n\n🚀 Contact them directly for collaboration!",
        shown.len()
    );
    if total_matches > shown.len() {
        response.push_str(&format!(
            "\n\n💡 {} more experts available - try more specific keywords.",
            total_matches - shown.len()
        ));
    }

    if response.chars().count() <= char_budget {
        return response;
    }

    let compact = shown
        .iter()
        .enumerate()
        .map(|(i, user)| compact_card(i, user))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!(
        "🌟 Found {total_matches} experts for \"{query}\"\n\nTop {} matches:\n\n{compact}\n\n🚀 Contact them directly!",
        shown.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::FieldValue;

    fn member(name: &str) -> UserRecord {
        let mut user = UserRecord::new("91", name, format!("{}@x.com", name.to_lowercase()));
        let fields = &mut user.enhanced_profile.fields;
        fields.insert(Field::ProfessionalRole, FieldValue::Text("Consultant".into()));
        fields.insert(Field::Domain, FieldValue::Text("Marketing".into()));
        fields.insert(Field::City, FieldValue::Text("Pune".into()));
        fields.insert(
            Field::CommunityGives,
            FieldValue::List(vec!["Mentoring".into(), "Funding".into(), "Hiring".into()]),
        );
        user
    }

    #[test]
    fn full_cards_show_top_profiles_and_remainder() {
        let selected = vec![member("Asha"), member("Ravi"), member("Meera"), member("Kabir")];
        let reply = render_results(&selected, "marketing", 9, 3, 4000);
        assert!(reply.starts_with("🌟 Found 9 experts for \"marketing\""));
        assert!(reply.contains("Top 3 profiles:"));
        assert!(reply.contains("1. **Asha**\n💼 Consultant in Marketing\n📍 Pune"));
        assert!(reply.contains("🎁 Offers: Mentoring, Funding\n"));
        assert!(!reply.contains("Kabir"));
        assert!(reply.contains("💡 6 more experts available"));
    }

    #[test]
    fn long_bios_are_excerpted() {
        let mut user = member("Asha");
        user.basic_profile.about = Some("x".repeat(400));
        let reply = render_results(&[user], "x", 1, 3, 4000);
        assert!(reply.contains(&format!("📋 {}...", "x".repeat(150))));
        assert!(reply.starts_with("🌟 Found 1 expert for"));
    }

    #[test]
    fn over_budget_uses_compact_form() {
        let reply = render_results(&[member("Asha"), member("Ravi")], "marketing", 2, 3, 100);
        assert!(reply.contains("Top 2 matches:"));
        assert!(reply.contains("1. Asha\n📧 asha@x.com\n💼 Consultant"));
        assert!(!reply.contains("🎁"));
    }

    #[test]
    fn empty_selection_is_no_results() {
        assert_eq!(render_results(&[], "potters", 0, 3, 4000), no_results("potters"));
    }
}
