//! Field validators.
//!
//! Every validator takes raw user text and returns a [`ValidationResult`]
//! whose rejection message is ready to send as-is. Only geographic fields
//! reach out to the AI service; everything else is pure.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use chrono::NaiveDate;
use regex::Regex;
use reqwest::Url;

use crate::llm::AiTextService;
use crate::llm::structured::best_effort;

use super::fields::{Field, ValidatorKind};
use super::geography::{self, GeoKind, GeoVerdict};
use super::model::FieldValue;

const MAX_INPUT_CHARS: usize = 1000;
const MAX_EMAIL_CHARS: usize = 254;

/// Outcome of validating one answer.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    Valid {
        value: FieldValue,
        /// Non-blocking note shown alongside the confirmation.
        warning: Option<String>,
    },
    Invalid {
        message: String,
    },
}

impl ValidationResult {
    pub fn valid(value: FieldValue) -> Self {
        Self::Valid {
            value,
            warning: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}

static NAME_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s\-.']+$").unwrap());
static NAME_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(test|example|sample|dummy|user)").unwrap());
static DATE_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})-(\d{2})-(\d{4})$").unwrap());
static EMAIL_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
});
static GEO_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s\-.'()]+$").unwrap());

const COUNTRY_CODES: &[&str] = &[
    "1", "7", "20", "27", "30", "31", "32", "33", "34", "36", "39", "40", "41", "43", "44", "45",
    "46", "47", "48", "49", "51", "52", "53", "54", "55", "56", "57", "58", "60", "61", "62", "63",
    "64", "65", "66", "81", "82", "84", "86", "90", "91", "92", "93", "94", "95", "98", "212",
    "213", "216", "218", "220", "221", "222", "223", "224", "225", "226", "227", "228", "229",
    "230", "231", "232", "233", "234", "235", "236", "237", "238", "239", "240", "241", "242",
    "243", "244", "245", "246", "247", "248", "249", "250", "251", "252", "253", "254", "255",
    "256", "257", "258", "260", "261", "262", "263", "264", "265", "266", "267", "268", "269",
    "290", "291", "297", "298", "299", "350", "351", "352", "353", "354", "355", "356", "357",
    "358", "359", "370", "371", "372", "373", "374", "375", "376", "377", "378", "380", "381",
    "382", "383", "385", "386", "387", "389", "420", "421", "423", "500", "501", "502", "503",
    "504", "505", "506", "507", "508", "509", "590", "591", "592", "593", "594", "595", "596",
    "597", "598", "599", "670", "672", "673", "674", "675", "676", "677", "678", "679", "680",
    "681", "682", "683", "684", "685", "686", "687", "688", "689", "690", "691", "692", "850",
    "852", "853", "855", "856", "880", "886", "960", "961", "962", "963", "964", "965", "966",
    "967", "968", "970", "971", "972", "973", "974", "975", "976", "977", "992", "993", "994",
    "995", "996", "998",
];

/// Trim, cap at 1000 chars, and strip angle brackets.
pub fn sanitize_input(input: &str) -> String {
    input
        .trim()
        .chars()
        .take(MAX_INPUT_CHARS)
        .filter(|c| *c != '<' && *c != '>')
        .collect()
}

pub fn validate_full_name(input: &str) -> ValidationResult {
    let name = sanitize_input(input);
    let len = name.chars().count();

    if !(2..=100).contains(&len) {
        return ValidationResult::invalid(
            "❌ **Invalid Name Length**\n\nName should be 2-100 characters long.\n\n**Example:** Rajesh Kumar Singh",
        );
    }
    if !NAME_CHARSET.is_match(&name) {
        return ValidationResult::invalid(
            "❌ **Invalid Characters**\n\nName should only contain:\n• Letters (a-z, A-Z)\n• Spaces\n• Hyphens (-)\n• Apostrophes (')\n\n**Example:** Mary O'Connor-Smith",
        );
    }
    if has_run_of_identical_chars(&name, 5) {
        return ValidationResult::invalid(
            "❌ **Invalid Name Pattern**\n\nPlease enter your real name.\n\n**Example:** Rajesh Kumar Singh",
        );
    }
    if NAME_PLACEHOLDER.is_match(&name) {
        return ValidationResult::invalid(
            "❌ **Please Enter Real Name**\n\nTest names are not allowed.\n\n**Example:** Your actual full name",
        );
    }

    ValidationResult::valid(FieldValue::Text(name))
}

/// The regex crate has no backreferences, so repeated runs are counted by hand.
fn has_run_of_identical_chars(text: &str, run: usize) -> bool {
    let mut previous = None;
    let mut count = 0;
    for c in text.chars() {
        if Some(c) == previous {
            count += 1;
        } else {
            previous = Some(c);
            count = 1;
        }
        if count >= run {
            return true;
        }
    }
    false
}

pub fn validate_gender(input: &str) -> ValidationResult {
    let value = match sanitize_input(input).as_str() {
        "1" => "Male",
        "2" => "Female",
        "3" => "Others",
        _ => {
            return ValidationResult::invalid(
                "❌ **Invalid Selection**\n\nPlease select 1, 2, or 3:\n\n1️⃣ Male\n2️⃣ Female\n3️⃣ Others",
            );
        }
    };
    ValidationResult::valid(FieldValue::Text(value.to_string()))
}

/// Strict `DD-MM-YYYY`, year 1960–2010, checked against the real calendar.
pub fn validate_date_of_birth(input: &str) -> ValidationResult {
    let date = sanitize_input(input);
    let Some(caps) = DATE_FORMAT.captures(&date) else {
        return ValidationResult::invalid(
            "❌ **Invalid Date Format**\n\nRequired format: DD-MM-YYYY\n\n**Examples:**\n• 15-08-1995\n• 03-12-1988\n• 25-06-1992",
        );
    };

    let day: u32 = caps[1].parse().unwrap_or(0);
    let month: u32 = caps[2].parse().unwrap_or(0);
    let year: i32 = caps[3].parse().unwrap_or(0);

    if !(1960..=2010).contains(&year) {
        return ValidationResult::invalid(
            "❌ **Invalid Birth Year**\n\nYear must be between 1960-2010\n\n**Example:** 15-08-1995",
        );
    }
    if !(1..=12).contains(&month) {
        return ValidationResult::invalid(
            "❌ **Invalid Month**\n\nMonth must be between 01-12\n\n**Examples:**\n• 15-01-1995 (January)\n• 15-12-1995 (December)",
        );
    }
    if !(1..=31).contains(&day) {
        return ValidationResult::invalid(
            "❌ **Invalid Day**\n\nDay must be between 01-31\n\n**Examples:**\n• 01-08-1995\n• 31-12-1995",
        );
    }
    if NaiveDate::from_ymd_opt(year, month, day).is_none() {
        return ValidationResult::invalid(
            "❌ **Invalid Date**\n\nThis date doesn't exist.\n\n**Examples of valid dates:**\n• 28-02-1995 (Feb 28)\n• 29-02-1996 (Leap year)\n• 30-04-1995 (Apr 30)",
        );
    }

    ValidationResult::valid(FieldValue::Text(date))
}

/// 10–15 digits; longer numbers must open with a known calling code.
pub fn validate_phone(input: &str) -> ValidationResult {
    let digits: String = sanitize_input(input)
        .chars()
        .filter(char::is_ascii_digit)
        .collect();

    if !(10..=15).contains(&digits.len()) {
        return ValidationResult::invalid(
            "❌ **Invalid Phone Number Length**\n\nPhone number must be 10-15 digits\n\n**Examples:**\n• +91 9876543210 (India)\n• +1 2025551234 (USA)\n• +44 7911123456 (UK)",
        );
    }

    if digits.len() > 10 {
        let known_prefix = (1..=3).any(|n| COUNTRY_CODES.contains(&&digits[..n]));
        if !known_prefix {
            return ValidationResult::invalid(
                "❌ **Invalid Country Code**\n\nPlease include a valid country code.\n\n**Examples:**\n• +91 9876543210 (India)\n• +1 2025551234 (USA)\n• +44 7911123456 (UK)\n• +61 412345678 (Australia)",
            );
        }
    }

    ValidationResult::valid(FieldValue::Text(digits))
}

/// Returns the normalised (lowercased) address.
pub fn validate_email(input: &str) -> ValidationResult {
    let email = sanitize_input(input);
    if !EMAIL_FORMAT.is_match(&email) {
        return ValidationResult::invalid(
            "❌ **Invalid Email Format**\n\nPlease enter a valid email address.\n\n**Examples:**\n• yourname@gmail.com\n• john.smith@company.com\n• user123@domain.co.in",
        );
    }
    if email.len() > MAX_EMAIL_CHARS {
        return ValidationResult::invalid(
            "❌ **Email Too Long**\n\nEmail address is too long (max 254 characters).",
        );
    }
    ValidationResult::valid(FieldValue::Text(email.to_lowercase()))
}

pub fn validate_linkedin_url(input: &str) -> ValidationResult {
    let url = sanitize_input(input);
    if !url.to_lowercase().contains("linkedin.com") {
        return ValidationResult::invalid(
            "❌ **Not a LinkedIn URL**\n\nPlease enter a valid LinkedIn profile URL.\n\n**Examples:**\n• https://linkedin.com/in/yourname\n• https://www.linkedin.com/in/john-smith-123",
        );
    }

    let Ok(parsed) = Url::parse(&url) else {
        return ValidationResult::invalid(
            "❌ **Invalid URL Format**\n\nPlease enter a complete LinkedIn URL.\n\n**Examples:**\n• https://linkedin.com/in/yourname\n• https://www.linkedin.com/in/john-smith-123\n\n**Tips:**\n• Copy the URL from your LinkedIn profile\n• Make sure it starts with https://",
        );
    };
    if !parsed.host_str().is_some_and(|h| h.contains("linkedin.com")) {
        return ValidationResult::invalid(
            "❌ **Invalid LinkedIn Domain**\n\nURL must be from linkedin.com\n\n**Example:** https://linkedin.com/in/yourprofile",
        );
    }
    if !parsed.path().contains("/in/") {
        return ValidationResult::invalid(
            "❌ **Invalid LinkedIn Profile URL**\n\nPlease use your LinkedIn profile URL.\n\n**Examples:**\n• https://linkedin.com/in/yourname\n• https://www.linkedin.com/in/john-smith-123",
        );
    }

    ValidationResult::valid(FieldValue::Text(url))
}

pub fn validate_instagram_url(input: &str) -> ValidationResult {
    let url = sanitize_input(input);
    if !url.to_lowercase().contains("instagram.com") {
        return ValidationResult::invalid(
            "❌ **Not an Instagram URL**\n\nPlease enter a valid Instagram profile URL.\n\n**Examples:**\n• https://instagram.com/yourprofile\n• https://www.instagram.com/username",
        );
    }

    let Ok(parsed) = Url::parse(&url) else {
        return ValidationResult::invalid(
            "❌ **Invalid URL Format**\n\nPlease enter a complete Instagram URL.\n\n**Examples:**\n• https://instagram.com/yourprofile\n• https://www.instagram.com/username\n\n**Tips:**\n• Copy the URL from your Instagram profile\n• Make sure it starts with https://",
        );
    };
    if !parsed.host_str().is_some_and(|h| h.contains("instagram.com")) {
        return ValidationResult::invalid(
            "❌ **Invalid Instagram Domain**\n\nURL must be from instagram.com\n\n**Example:** https://instagram.com/yourprofile",
        );
    }

    ValidationResult::valid(FieldValue::Text(url))
}

/// `yes`/`y`/`1` or `no`/`n`/`2`, case-insensitive.
pub fn parse_yes_no(input: &str) -> Option<bool> {
    match sanitize_input(input).to_lowercase().as_str() {
        "yes" | "y" | "1" => Some(true),
        "no" | "n" | "2" => Some(false),
        _ => None,
    }
}

/// Why a multiple-choice answer was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceError {
    Empty,
    NotANumber(String),
    TooFew { selected: usize },
    TooMany { selected: usize },
    Duplicate,
    OutOfRange(Vec<i64>),
}

/// Parse comma-separated 1-based indices and return the chosen options in
/// the order given.
pub fn parse_multiple_choice(
    input: &str,
    options: &[&str],
    min: usize,
    max: Option<usize>,
) -> Result<Vec<String>, ChoiceError> {
    let cleaned = sanitize_input(input);
    if cleaned.is_empty() {
        return Err(ChoiceError::Empty);
    }

    let mut numbers = Vec::new();
    for token in cleaned.split(',') {
        let token = token.trim();
        let n: i64 = token
            .parse()
            .map_err(|_| ChoiceError::NotANumber(token.to_string()))?;
        numbers.push(n);
    }

    if numbers.len() < min {
        return Err(ChoiceError::TooFew {
            selected: numbers.len(),
        });
    }
    if max.is_some_and(|max| numbers.len() > max) {
        return Err(ChoiceError::TooMany {
            selected: numbers.len(),
        });
    }

    let mut seen = std::collections::HashSet::new();
    if !numbers.iter().all(|n| seen.insert(*n)) {
        return Err(ChoiceError::Duplicate);
    }

    let out_of_range: Vec<i64> = numbers
        .iter()
        .copied()
        .filter(|n| *n < 1 || *n > options.len() as i64)
        .collect();
    if !out_of_range.is_empty() {
        return Err(ChoiceError::OutOfRange(out_of_range));
    }

    Ok(numbers
        .into_iter()
        .map(|n| options[(n - 1) as usize].to_string())
        .collect())
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// User-facing copy for a rejected multiple-choice answer.
pub fn choice_error_message(
    error: &ChoiceError,
    options: &[&str],
    min: usize,
    max: Option<usize>,
) -> String {
    let quantifier = if Some(min) == max { "exactly" } else { "at least" };
    let body = match error {
        ChoiceError::Empty => format!(
            "❌ **No Selection Made**\n\nPlease select {quantifier} {min} option{}.\n\n**Format:** 1,3,5 (numbers separated by commas)",
            plural(min)
        ),
        ChoiceError::NotANumber(token) => format!(
            "❌ **Invalid Format**\n\n\"{token}\" is not a number. Please use numbers separated by commas.\n\n**Examples:**\n• Single: 3\n• Multiple: 1,4,7"
        ),
        ChoiceError::TooFew { selected } => {
            let range = match max {
                Some(max) if max != min => format!("{min} to {max}"),
                Some(_) => min.to_string(),
                None => format!("{min}+"),
            };
            format!(
                "❌ **Too Few Selections**\n\nPlease select {quantifier} {min} option{}.\n\nYou selected: {selected}\nRequired: {range}",
                plural(min)
            )
        }
        ChoiceError::TooMany { selected } => {
            let max = max.unwrap_or(options.len());
            format!(
                "❌ **Too Many Selections**\n\nPlease select maximum {max} option{}.\n\nYou selected: {selected}\nMaximum allowed: {max}",
                plural(max)
            )
        }
        ChoiceError::Duplicate => {
            "❌ **Duplicate Selections**\n\nPlease don't repeat the same option.\n\n**Example:** 1,3,5 (not 1,1,3,5)".to_string()
        }
        ChoiceError::OutOfRange(bad) => {
            let bad: Vec<String> = bad.iter().map(i64::to_string).collect();
            format!(
                "❌ **Invalid Option{}**\n\nInvalid: {}\nValid range: 1 to {}",
                plural(bad.len()),
                bad.join(", "),
                options.len()
            )
        }
    };

    let listing: Vec<String> = options
        .iter()
        .enumerate()
        .map(|(i, option)| format!("{}. {option}", i + 1))
        .collect();
    format!("{body}\n\n**Options:**\n{}", listing.join("\n"))
}

pub fn validate_multiple_choice(
    input: &str,
    options: &[&str],
    min: usize,
    max: Option<usize>,
) -> ValidationResult {
    match parse_multiple_choice(input, options, min, max) {
        Ok(mut selected) => {
            // Single-choice fields store the option itself.
            if max == Some(1) {
                ValidationResult::valid(FieldValue::Text(selected.remove(0)))
            } else {
                ValidationResult::valid(FieldValue::List(selected))
            }
        }
        Err(e) => ValidationResult::invalid(choice_error_message(&e, options, min, max)),
    }
}

/// Length and charset checks shared by every geographic field.
fn geography_precheck(input: &str, kind: GeoKind) -> Option<ValidationResult> {
    let len = input.chars().count();
    if !(2..=50).contains(&len) {
        return Some(ValidationResult::invalid(format!(
            "❌ **Invalid {title} Length**\n\n{title} must be 2-50 characters long.\n\n**Examples:**\n{}",
            kind.examples(),
            title = kind.title(),
        )));
    }
    if !GEO_CHARSET.is_match(input) {
        return Some(ValidationResult::invalid(format!(
            "❌ **Invalid Characters**\n\n{} should only contain:\n• Letters (a-z, A-Z)\n• Spaces\n• Hyphens (-)\n• Apostrophes (')\n• Parentheses ()\n\n**Examples:**\n{}",
            kind.title(),
            kind.examples(),
        )));
    }
    None
}

/// Heuristic verdict used when no model verdict is available.
pub fn geography_heuristic(input: &str, kind: GeoKind) -> ValidationResult {
    if geography::is_probably_person_name(input) || geography::is_probably_invalid(input) {
        return ValidationResult::invalid(format!(
            "❌ **\"{input}\" doesn't appear to be a valid {kind}**\n\nPlease enter a real {kind} name.\n\n**Examples:**\n{}",
            kind.examples(),
        ));
    }
    ValidationResult::Valid {
        value: FieldValue::Text(input.to_string()),
        warning: Some(format!(
            "⚠️ Unable to verify \"{input}\" - please ensure it's correct"
        )),
    }
}

/// Validates answers for any field, consulting the AI service for unknown
/// place names.
#[derive(Clone)]
pub struct FieldValidator {
    ai: Option<Arc<dyn AiTextService>>,
    ai_timeout: Duration,
}

impl FieldValidator {
    pub fn new(ai: Option<Arc<dyn AiTextService>>, ai_timeout: Duration) -> Self {
        Self { ai, ai_timeout }
    }

    /// Validator without AI; unknown places go straight to the heuristic.
    pub fn offline() -> Self {
        Self::new(None, Duration::from_secs(30))
    }

    /// Validate `input` for `field`.
    ///
    /// The optional fields reach here only after the user said yes, so
    /// their answer is the address itself.
    pub async fn validate(&self, field: Field, input: &str) -> ValidationResult {
        let cleaned = sanitize_input(input);

        match field.validator() {
            ValidatorKind::Name => validate_full_name(&cleaned),
            ValidatorKind::Gender => validate_gender(&cleaned),
            ValidatorKind::DateOfBirth => validate_date_of_birth(&cleaned),
            ValidatorKind::Geography(kind) => self.validate_geography(&cleaned, kind).await,
            ValidatorKind::Phone => validate_phone(&cleaned),
            ValidatorKind::Linkedin => validate_linkedin_url(&cleaned),
            ValidatorKind::AdditionalEmail => validate_email(&cleaned),
            ValidatorKind::Instagram => validate_instagram_url(&cleaned),
            ValidatorKind::Choice { options, min, max } => {
                validate_multiple_choice(&cleaned, options, min, max)
            }
        }
    }

    /// Gazetteer first, then the model, then heuristics.
    pub async fn validate_geography(&self, input: &str, kind: GeoKind) -> ValidationResult {
        if let Some(rejection) = geography_precheck(input, kind) {
            return rejection;
        }
        if geography::gazetteer_match(input, kind) {
            return ValidationResult::valid(FieldValue::Text(input.to_string()));
        }

        let Some(ai) = &self.ai else {
            return geography_heuristic(input, kind);
        };

        let attempt = async {
            let verdict = ai.classify_geography(input, kind).await?;
            Ok(match verdict {
                GeoVerdict::Valid => ValidationResult::valid(FieldValue::Text(input.to_string())),
                GeoVerdict::Invalid => ValidationResult::invalid(format!(
                    "❌ **\"{input}\" is not a valid {kind}**\n\nPlease enter a real {kind} name.\n\n**Examples:**\n{}\n\n**Tips:**\n• Check spelling carefully\n• Use official {kind} names\n• Avoid abbreviations",
                    kind.examples(),
                )),
            })
        };

        best_effort("geography_validation", self.ai_timeout, attempt, || {
            geography_heuristic(input, kind)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use crate::search::ranking::CandidateSummary;
    use async_trait::async_trait;

    const OPTIONS: &[&str] = &["One", "Two", "Three", "Four", "Five"];

    #[test]
    fn sanitize_strips_markup_and_caps_length() {
        assert_eq!(sanitize_input("  <b>Pune</b>  "), "bPune/b");
        assert_eq!(sanitize_input(&"a".repeat(1500)).len(), 1000);
    }

    #[test]
    fn duplicate_selection_is_rejected() {
        for options in [OPTIONS, &["A", "B", "C"][..]] {
            let result = validate_multiple_choice("1,1,3", options, 1, None);
            assert!(!result.is_valid());
        }
        assert_eq!(
            parse_multiple_choice("1,1,3", OPTIONS, 1, None),
            Err(ChoiceError::Duplicate)
        );
    }

    #[test]
    fn exact_three_returns_options_in_input_order() {
        let selected = parse_multiple_choice("3, 1,2", OPTIONS, 3, Some(3)).unwrap();
        assert_eq!(selected, vec!["Three", "One", "Two"]);

        match validate_multiple_choice("1,2,3", OPTIONS, 3, Some(3)) {
            ValidationResult::Valid { value, .. } => assert_eq!(
                value,
                FieldValue::List(vec!["One".into(), "Two".into(), "Three".into()])
            ),
            other => panic!("expected valid, got {other:?}"),
        }
    }

    #[test]
    fn index_zero_is_out_of_range() {
        assert_eq!(
            parse_multiple_choice("0,2", OPTIONS, 1, None),
            Err(ChoiceError::OutOfRange(vec![0]))
        );
        assert!(!validate_multiple_choice("0,2", OPTIONS, 1, None).is_valid());
    }

    #[test]
    fn choice_counts_and_tokens_are_enforced() {
        assert_eq!(
            parse_multiple_choice("1,2", OPTIONS, 3, Some(3)),
            Err(ChoiceError::TooFew { selected: 2 })
        );
        assert_eq!(
            parse_multiple_choice("1,2,3,4", OPTIONS, 1, Some(3)),
            Err(ChoiceError::TooMany { selected: 4 })
        );
        assert_eq!(
            parse_multiple_choice("1,x", OPTIONS, 1, None),
            Err(ChoiceError::NotANumber("x".into()))
        );
        assert_eq!(parse_multiple_choice("  ", OPTIONS, 1, None), Err(ChoiceError::Empty));
    }

    #[test]
    fn single_choice_stores_the_option_text() {
        assert_eq!(
            validate_multiple_choice("2", OPTIONS, 1, Some(1)),
            ValidationResult::valid(FieldValue::Text("Two".into()))
        );
    }

    #[test]
    fn date_of_birth_respects_calendar() {
        assert!(validate_date_of_birth("29-02-1996").is_valid());
        assert!(!validate_date_of_birth("29-02-1995").is_valid());
        assert!(!validate_date_of_birth("31-04-2000").is_valid());
        assert!(!validate_date_of_birth("15-08-1959").is_valid());
        assert!(!validate_date_of_birth("1995-08-15").is_valid());
        assert!(!validate_date_of_birth("15-13-1995").is_valid());
    }

    #[test]
    fn names_reject_placeholders_and_repeats() {
        assert!(validate_full_name("Mary O'Connor-Smith").is_valid());
        assert!(!validate_full_name("Testy McTest").is_valid());
        assert!(!validate_full_name("Aaaaaa").is_valid());
        assert!(!validate_full_name("R2D2").is_valid());
        assert!(!validate_full_name("A").is_valid());
    }

    #[test]
    fn phone_checks_length_and_country_code() {
        assert_eq!(
            validate_phone("+91 98765 43210"),
            ValidationResult::valid(FieldValue::Text("919876543210".into()))
        );
        assert!(validate_phone("9876543210").is_valid());
        assert!(!validate_phone("12345").is_valid());
        // 0 is not a calling code.
        assert!(!validate_phone("09876543210").is_valid());
    }

    #[test]
    fn email_is_lowercased() {
        assert_eq!(
            validate_email("Asha.Rao@Example.COM"),
            ValidationResult::valid(FieldValue::Text("asha.rao@example.com".into()))
        );
        assert!(!validate_email("not-an-email").is_valid());
    }

    #[test]
    fn linkedin_requires_profile_path() {
        assert!(validate_linkedin_url("https://www.linkedin.com/in/asha-rao").is_valid());
        assert!(!validate_linkedin_url("https://www.linkedin.com/company/acme").is_valid());
        assert!(!validate_linkedin_url("linkedin.com/in/asha").is_valid());
        assert!(!validate_linkedin_url("https://example.com/linkedin.com/in/x").is_valid());
    }

    #[test]
    fn yes_no_variants() {
        assert_eq!(parse_yes_no("YES"), Some(true));
        assert_eq!(parse_yes_no(" y "), Some(true));
        assert_eq!(parse_yes_no("n"), Some(false));
        assert_eq!(parse_yes_no("2"), Some(false));
        assert_eq!(parse_yes_no("maybe"), None);
    }

    #[tokio::test]
    async fn optional_fields_take_the_address_itself() {
        let validator = FieldValidator::offline();

        assert!(
            validator
                .validate(Field::Instagram, "https://instagram.com/asha")
                .await
                .is_valid()
        );
        assert!(!validator.validate(Field::Instagram, "yes").await.is_valid());

        assert_eq!(
            validator.validate(Field::AdditionalEmail, "Asha@Work.com").await,
            validate_email("Asha@Work.com")
        );
        assert!(!validator.validate(Field::AdditionalEmail, "no").await.is_valid());
    }

    #[tokio::test]
    async fn gazetteer_hit_needs_no_ai() {
        let validator = FieldValidator::offline();
        assert_eq!(
            validator.validate_geography("Pune", GeoKind::City).await,
            ValidationResult::valid(FieldValue::Text("Pune".into()))
        );
    }

    #[tokio::test]
    async fn unknown_place_without_ai_is_accepted_with_warning() {
        let validator = FieldValidator::offline();
        match validator.validate_geography("Ujjain", GeoKind::City).await {
            ValidationResult::Valid { warning, .. } => assert!(warning.is_some()),
            other => panic!("expected lenient accept, got {other:?}"),
        }
        assert!(!validator
            .validate_geography("Rahul Sharma", GeoKind::City)
            .await
            .is_valid());
        assert!(!validator.validate_geography("P@ris", GeoKind::City).await.is_valid());
    }

    struct FixedGeo(Result<GeoVerdict, ()>);

    #[async_trait]
    impl AiTextService for FixedGeo {
        async fn extract_keywords(&self, _query: &str) -> Result<Vec<String>, LlmError> {
            unreachable!()
        }

        async fn rank_candidates(
            &self,
            _candidates: &[CandidateSummary],
            _query: &str,
            _keywords: &[String],
            _max_results: usize,
        ) -> Result<Vec<String>, LlmError> {
            unreachable!()
        }

        async fn classify_geography(
            &self,
            _text: &str,
            _kind: GeoKind,
        ) -> Result<GeoVerdict, LlmError> {
            self.0.map_err(|_| LlmError::InvalidResponse {
                provider: "fixed".into(),
                reason: "boom".into(),
            })
        }
    }

    #[tokio::test]
    async fn ai_verdict_decides_unknown_places() {
        let strict = FieldValidator::new(
            Some(Arc::new(FixedGeo(Ok(GeoVerdict::Invalid)))),
            Duration::from_secs(1),
        );
        assert!(!strict.validate_geography("Ujjain", GeoKind::City).await.is_valid());

        let approving = FieldValidator::new(
            Some(Arc::new(FixedGeo(Ok(GeoVerdict::Valid)))),
            Duration::from_secs(1),
        );
        assert_eq!(
            approving.validate_geography("Ujjain", GeoKind::City).await,
            ValidationResult::valid(FieldValue::Text("Ujjain".into()))
        );
    }

    #[tokio::test]
    async fn ai_failure_falls_back_to_heuristic() {
        let failing = FieldValidator::new(Some(Arc::new(FixedGeo(Err(())))), Duration::from_secs(1));
        assert!(!failing.validate_geography("N/A", GeoKind::Country).await.is_valid());
        match failing.validate_geography("Ujjain", GeoKind::City).await {
            ValidationResult::Valid { warning, .. } => assert!(warning.is_some()),
            other => panic!("expected lenient accept, got {other:?}"),
        }
    }
}
