//! Reply copy for the conversation controller.

use crate::profile::Field;
use crate::profile::prompts::{field_prompt, step_prompt};

pub const TECHNICAL_ISSUE: &str =
    "⚠️ I'm experiencing a technical issue. Please try your request again.";

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

pub fn search_blocked(percentage: u8, first: Field, total: usize) -> String {
    format!(
        "🚫 **SEARCH BLOCKED - Profile Incomplete**\n\n\
         Your profile: {percentage}% complete\n\
         **⚠️ REQUIRED: 100% completion for search access**\n\n\
         Missing {total} field{}. Let's complete them now:\n\n\
         {}\n\n\
         🔒 *Search will be unlocked only after completing ALL fields.*",
        plural(total),
        step_prompt(first, 1, total)
    )
}

pub fn completion_required(percentage: u8, first: Field, total: usize) -> String {
    format!(
        "✨ **Profile Completion Required**\n\n\
         Currently: {percentage}% complete\n\
         Missing: {total} field{}\n\n\
         {}",
        plural(total),
        step_prompt(first, 1, total)
    )
}

pub const PROFILE_ALREADY_COMPLETE: &str = "🎉 **Profile Complete!** \n\n\
✅ All fields completed (100%)\n\
🔓 Search is now available!\n\n\
What expertise are you looking for today?\n\n\
**Popular Searches:**\n\
• \"React developers in Mumbai\"\n\
• \"fintech entrepreneurs\"\n\
• \"marketing experts\"\n\
• \"healthcare professionals\"";

pub const OFFER_OPTIONAL_FIELDS: &str = "\n\n📎 Want to add optional details like an extra email or your Instagram? Reply YES or NO";

pub fn casual_nudge(reply: &str, percentage: u8, missing: usize) -> String {
    format!(
        "{reply}\n\n\
         📋 **Profile Status:** {percentage}% complete\n\
         🔒 Missing {missing} field{} for search access.\n\n\
         Type \"complete profile\" to continue.",
        plural(missing)
    )
}

pub fn welcome_back(name: &str, percentage: u8, first: Field, total: usize) -> String {
    format!(
        "👋 **Welcome back, {name}!**\n\n\
         Your profile: {percentage}% complete\n\
         🔒 **Search requires 100% completion**\n\n\
         Let's complete the remaining {total} field{}:\n\n\
         {}",
        plural(total),
        step_prompt(first, 1, total)
    )
}

pub fn search_ready(name: &str) -> String {
    format!(
        "🌟 **Hi {name}!**\n\n\
         ✅ **Profile Complete** (100%)\n\
         🔓 **Search Unlocked**\n\n\
         What expertise are you looking for today?\n\n\
         **Popular Searches:**\n\
         • \"React developers in Bangalore\"\n\
         • \"fintech startup founders\"\n\
         • \"digital marketing experts\"\n\
         • \"healthcare entrepreneurs\"\n\n\
         Or describe what you need help with!"
    )
}

pub fn fallback_greeting(name: &str) -> String {
    format!("Hi {name}! 👋\n\nI'm here to help you connect with our alumni network.")
}

pub fn skip_and_search(results: &str) -> String {
    format!(
        "Here's what I found:\n\n{results}\n\n\
         You can complete your profile anytime by saying \"update profile\"."
    )
}

pub fn update_paused(completed: usize, total: usize) -> String {
    format!(
        "⏸️ **Profile Update Paused**\n\n\
         Progress: {completed}/{total} fields completed\n\
         🔒 **Search remains locked until 100% completion**\n\n\
         When ready to continue, type:\n\
         • \"complete profile\" \n\
         • \"update profile\"\n\n\
         What can I help you with in the meantime?"
    )
}

pub fn search_blocked_mid_update(field: Field, step: usize, total: usize) -> String {
    format!(
        "🔒 **Profile Completion Required First**\n\n\
         Please complete this field to unlock search.\n\n\
         **Current: Step {step} of {total}**\n\
         **Field:** {}\n\n\
         {}\n\n\
         🔍 *Search unlocks after ALL fields are completed.*",
        field.display_name(),
        field_prompt(field)
    )
}

pub fn with_help_tips(error: &str, field: Field) -> String {
    format!(
        "{error}\n\n💡 **Need Help?**\n\
         Having trouble with this field? Here are some tips:\n\n\
         {}\n\n\
         Type \"help\" for more assistance or try again.",
        field.help_tips()
    )
}

pub fn database_error(field: Field) -> String {
    format!(
        "❌ **Database Error**\n\n\
         Unable to save your {}. Please try again.\n\n\
         {}",
        field.display_name(),
        field_prompt(field)
    )
}

pub fn field_saved(field: Field, step: usize, total: usize, percentage: u8) -> String {
    format!(
        "✅ **{} Saved!**\n\n📊 **Progress:** {step}/{total} ({percentage}%)",
        field.display_name()
    )
}

pub const PROFILE_COMPLETED: &str = "🎉 **PROFILE COMPLETED!**\n\n\
✅ **100% Complete - Search Now Unlocked!**\n\
🌟 **Welcome to the full JY Alumni Network!**\n\n\
What expertise are you looking for today?\n\n\
**Try these searches:**\n\
• \"React developers in your city\"\n\
• \"startup mentors in fintech\"\n\
• \"marketing strategy experts\"";

pub fn choice_start_completion(first: Field, total: usize) -> String {
    format!(
        "Great! Let's complete your profile with our enhanced system.\n\n{}",
        step_prompt(first, 1, total)
    )
}

pub const CHOICE_ALREADY_COMPLETE: &str =
    "Your profile is already complete! 🎉\n\nWhat can I help you find today?";

pub fn choice_reminder(percentage: u8) -> String {
    format!(
        "⚠️ **Search Requires Complete Profile**\n\n\
         Your profile: {percentage}% complete\n\
         Required: 100% completion\n\n\
         You must complete your profile to access alumni search.\n\n\
         Ready to continue? Reply YES"
    )
}

pub const CHOICE_DECLINED: &str =
    "Perfect! I'm here to help you connect with amazing alumni. 🌟\n\nWhat can I help you find today?";

pub const ADDITIONAL_EMAIL_PROMPT: &str = "Please enter your additional email address:\n\n\
**Example:** newemail@domain.com\n\n\
This will be linked to your existing account for better connectivity.";

pub fn invalid_additional_email(error: &str) -> String {
    format!("{error}\n\nPlease enter a valid email address:")
}

pub fn link_rejected(reason: &str) -> String {
    format!("❌ {reason}\n\nPlease try a different email or type \"skip\" to continue.")
}

pub const LINK_FAILED: &str = "❌ Error linking email. Please try again or type 'skip' to continue.";

pub fn email_linked(next: &str) -> String {
    format!("✅ Additional email linked successfully!\n\n{next}")
}

pub const INSTAGRAM_URL_PROMPT: &str = "Please enter your Instagram profile URL:\n\n\
**Example:** https://instagram.com/yourprofile\n\n\
Type \"later\" to skip this step.";

pub fn save_choice_failed(field: Field) -> String {
    format!(
        "❌ **Database Error**\n\nUnable to save your {} choice. Please reply YES or NO again.",
        field.display_name()
    )
}
