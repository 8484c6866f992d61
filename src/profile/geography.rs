//! Geographic name checks: a static gazetteer plus heuristics for
//! obviously-wrong answers when no AI verdict is available.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// What kind of place a field asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoKind {
    City,
    State,
    Country,
}

impl GeoKind {
    pub fn label(self) -> &'static str {
        match self {
            GeoKind::City => "city",
            GeoKind::State => "state",
            GeoKind::Country => "country",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            GeoKind::City => "City",
            GeoKind::State => "State",
            GeoKind::Country => "Country",
        }
    }

    pub fn examples(self) -> &'static str {
        match self {
            GeoKind::City => "• Mumbai, Delhi, New York\n• London, Tokyo, Sydney\n• Paris, Toronto, Singapore",
            GeoKind::State => "• Maharashtra, California, Ontario\n• New York, Queensland, Bavaria\n• Texas, Victoria, Quebec",
            GeoKind::Country => "• India, United States, Canada\n• United Kingdom, Australia, Germany\n• France, Japan, Brazil",
        }
    }

    fn gazetteer(self) -> &'static [&'static str] {
        match self {
            GeoKind::City => CITIES,
            GeoKind::State => STATES,
            GeoKind::Country => COUNTRIES,
        }
    }
}

impl fmt::Display for GeoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Model verdict for an unknown place name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoVerdict {
    Valid,
    Invalid,
}

const COUNTRIES: &[&str] = &[
    "Afghanistan", "Albania", "Algeria", "Andorra", "Angola", "Argentina", "Armenia", "Australia",
    "Austria", "Azerbaijan", "Bahrain", "Bangladesh", "Belarus", "Belgium", "Bhutan", "Bolivia",
    "Bosnia and Herzegovina", "Brazil", "Bulgaria", "Cambodia", "Cameroon", "Canada", "Chile",
    "China", "Colombia", "Croatia", "Cuba", "Cyprus", "Czech Republic", "Denmark", "Ecuador",
    "Egypt", "Estonia", "Ethiopia", "Finland", "France", "Georgia", "Germany", "Ghana", "Greece",
    "Hungary", "Iceland", "India", "Indonesia", "Iran", "Iraq", "Ireland", "Israel", "Italy",
    "Japan", "Jordan", "Kazakhstan", "Kenya", "Kuwait", "Latvia", "Lebanon", "Lithuania",
    "Malaysia", "Mexico", "Morocco", "Nepal", "Netherlands", "New Zealand", "Nigeria", "Norway",
    "Oman", "Pakistan", "Philippines", "Poland", "Portugal", "Qatar", "Romania", "Russia",
    "Saudi Arabia", "Singapore", "South Africa", "South Korea", "Spain", "Sri Lanka", "Sweden",
    "Switzerland", "Tanzania", "Thailand", "Turkey", "Uganda", "Ukraine", "United Arab Emirates",
    "United Kingdom", "United States", "Vietnam", "Zimbabwe",
];

const CITIES: &[&str] = &[
    // India
    "Mumbai", "Delhi", "Bangalore", "Bengaluru", "Hyderabad", "Chennai", "Kolkata", "Pune",
    "Ahmedabad", "Surat", "Jaipur", "Lucknow", "Kanpur", "Nagpur", "Indore", "Thane", "Bhopal",
    "Visakhapatnam", "Pimpri-Chinchwad", "Patna", "Vadodara", "Ghaziabad", "Ludhiana", "Agra",
    "Nashik", "Faridabad", "Meerut", "Rajkot", "Kalyan-Dombivali", "Vasai-Virar", "Varanasi",
    "Srinagar", "Dhanbad", "Jodhpur", "Amritsar", "Raipur", "Allahabad", "Prayagraj",
    "Coimbatore", "Deoria", "Gurugram", "Noida", "Kochi", "Bhubaneswar", "Guwahati",
    // USA
    "New York", "Los Angeles", "Chicago", "Houston", "Phoenix", "Philadelphia", "San Antonio",
    "San Diego", "Dallas", "San Jose", "Austin", "Jacksonville", "San Francisco", "Columbus",
    "Charlotte", "Fort Worth", "Indianapolis", "Seattle", "Denver", "Washington", "Boston",
    "El Paso", "Nashville", "Detroit", "Oklahoma City", "Portland", "Las Vegas", "Memphis",
    "Louisville", "Baltimore", "Milwaukee", "Albuquerque", "Tucson", "Fresno", "Sacramento",
    // International
    "London", "Paris", "Tokyo", "Sydney", "Toronto", "Singapore", "Dubai", "Hong Kong", "Berlin",
    "Madrid", "Rome", "Amsterdam", "Stockholm", "Copenhagen", "Oslo", "Helsinki", "Zurich",
    "Geneva", "Vienna", "Brussels", "Dublin", "Edinburgh", "Barcelona", "Milan", "Munich",
    "Frankfurt", "Hamburg", "Cologne", "Stuttgart", "Vancouver", "Montreal", "Calgary", "Ottawa",
    "Winnipeg", "Quebec City", "Melbourne", "Brisbane", "Perth", "Adelaide", "Auckland",
    "Wellington", "Christchurch", "Seoul", "Busan", "Bangkok", "Manila", "Jakarta",
    "Kuala Lumpur", "Ho Chi Minh City", "Hanoi", "Taipei", "Shanghai", "Beijing", "Guangzhou",
    "Shenzhen", "Kathmandu", "Dhaka", "Colombo", "Nairobi",
];

const STATES: &[&str] = &[
    // India
    "Andhra Pradesh", "Arunachal Pradesh", "Assam", "Bihar", "Chhattisgarh", "Goa", "Gujarat",
    "Haryana", "Himachal Pradesh", "Jharkhand", "Karnataka", "Kerala", "Madhya Pradesh",
    "Maharashtra", "Manipur", "Meghalaya", "Mizoram", "Nagaland", "Odisha", "Punjab", "Rajasthan",
    "Sikkim", "Tamil Nadu", "Telangana", "Tripura", "Uttar Pradesh", "Uttarakhand", "West Bengal",
    // USA
    "Alabama", "Alaska", "Arizona", "Arkansas", "California", "Colorado", "Connecticut",
    "Delaware", "Florida", "Georgia", "Hawaii", "Idaho", "Illinois", "Indiana", "Iowa", "Kansas",
    "Kentucky", "Louisiana", "Maine", "Maryland", "Massachusetts", "Michigan", "Minnesota",
    "Mississippi", "Missouri", "Montana", "Nebraska", "Nevada", "New Hampshire", "New Jersey",
    "New Mexico", "New York", "North Carolina", "North Dakota", "Ohio", "Oklahoma", "Oregon",
    "Pennsylvania", "Rhode Island", "South Carolina", "South Dakota", "Tennessee", "Texas", "Utah",
    "Vermont", "Virginia", "Washington", "West Virginia", "Wisconsin", "Wyoming",
    // Canada
    "Alberta", "British Columbia", "Manitoba", "New Brunswick", "Newfoundland and Labrador",
    "Northwest Territories", "Nova Scotia", "Nunavut", "Ontario", "Prince Edward Island",
    "Quebec", "Saskatchewan", "Yukon",
    // Australia
    "New South Wales", "Victoria", "Queensland", "Western Australia", "South Australia",
    "Tasmania", "Australian Capital Territory", "Northern Territory",
    // Other
    "England", "Scotland", "Wales", "Northern Ireland", "Bavaria", "North Rhine-Westphalia",
    "Baden-Württemberg",
];

const COMMON_FIRST_NAMES: &[&str] = &[
    "john", "jane", "michael", "sarah", "david", "lisa", "robert", "mary", "james", "patricia",
    "william", "jennifer", "richard", "elizabeth", "raj", "priya", "amit", "neha", "rohit",
    "kavya", "arun", "meera", "rahul", "anjali", "vikram", "pooja", "suresh", "deepika", "ravi",
    "anita",
];

static PERSON_NAME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^[A-Z][a-z]+ [A-Z][a-z]+$",
        r"^[A-Z][a-z]+ [A-Z]\.$",
        r"^(Mr|Ms|Mrs|Dr)\.?\s",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

static PLACEHOLDER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)^(test|example|sample|dummy)$",
        r"^[0-9]+$",
        r"^[^a-zA-Z]*$",
        r"^.$",
        r"(?i)^(na|n/a|nil|none|null)$",
        r"(?i)^(abc|xyz|def)$",
        r"(?i)^(asdf|qwerty|1234)$",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

/// Case-insensitive exact or substring match (either direction) against
/// the gazetteer for `kind`.
pub fn gazetteer_match(input: &str, kind: GeoKind) -> bool {
    let needle = input.trim().to_lowercase();
    if needle.is_empty() {
        return false;
    }
    kind.gazetteer().iter().any(|entry| {
        let entry = entry.to_lowercase();
        entry == needle || entry.contains(&needle) || needle.contains(&entry)
    })
}

/// Looks like someone's name rather than a place.
pub fn is_probably_person_name(input: &str) -> bool {
    if PERSON_NAME_PATTERNS.iter().any(|re| re.is_match(input)) {
        return true;
    }
    let lowered = input.to_lowercase();
    lowered
        .split(' ')
        .any(|word| COMMON_FIRST_NAMES.contains(&word))
}

/// Placeholder or junk answer.
pub fn is_probably_invalid(input: &str) -> bool {
    let trimmed = input.trim();
    PLACEHOLDER_PATTERNS.iter().any(|re| re.is_match(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gazetteer_is_case_insensitive() {
        assert!(gazetteer_match("mumbai", GeoKind::City));
        assert!(gazetteer_match("MAHARASHTRA", GeoKind::State));
        assert!(gazetteer_match("india", GeoKind::Country));
        assert!(!gazetteer_match("Atlantis", GeoKind::Country));
    }

    #[test]
    fn gazetteer_matches_substrings_both_ways() {
        assert!(gazetteer_match("New York City", GeoKind::City));
        assert!(gazetteer_match("Kuala", GeoKind::City));
    }

    #[test]
    fn person_names_are_detected() {
        assert!(is_probably_person_name("Rahul Sharma"));
        assert!(is_probably_person_name("Priya K."));
        assert!(is_probably_person_name("Dr Kumar"));
        assert!(is_probably_person_name("meera"));
        assert!(!is_probably_person_name("Ujjain"));
    }

    #[test]
    fn placeholders_are_detected() {
        for junk in ["test", "N/A", "none", "12345", "asdf", "x", "..."] {
            assert!(is_probably_invalid(junk), "{junk} should be flagged");
        }
        assert!(!is_probably_invalid("Ujjain"));
    }
}
