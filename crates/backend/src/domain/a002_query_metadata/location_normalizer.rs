use contracts::domain::a002_query_metadata::aggregate::Location;

/// Штаты и союзные территории Индии
const STATES: &[&str] = &[
    "Andhra Pradesh",
    "Arunachal Pradesh",
    "Assam",
    "Bihar",
    "Chhattisgarh",
    "Goa",
    "Gujarat",
    "Haryana",
    "Himachal Pradesh",
    "Jharkhand",
    "Karnataka",
    "Kerala",
    "Madhya Pradesh",
    "Maharashtra",
    "Manipur",
    "Meghalaya",
    "Mizoram",
    "Nagaland",
    "Odisha",
    "Punjab",
    "Rajasthan",
    "Sikkim",
    "Tamil Nadu",
    "Telangana",
    "Tripura",
    "Uttar Pradesh",
    "Uttarakhand",
    "West Bengal",
    "Andaman and Nicobar Islands",
    "Chandigarh",
    "Dadra and Nagar Haveli and Daman and Diu",
    "Delhi",
    "Jammu and Kashmir",
    "Ladakh",
    "Lakshadweep",
    "Puducherry",
];

/// Крупные города, по которым можно восстановить штат
const CITY_STATES: &[(&str, &str)] = &[
    ("mumbai", "Maharashtra"),
    ("pune", "Maharashtra"),
    ("nagpur", "Maharashtra"),
    ("bengaluru", "Karnataka"),
    ("bangalore", "Karnataka"),
    ("mysuru", "Karnataka"),
    ("chennai", "Tamil Nadu"),
    ("coimbatore", "Tamil Nadu"),
    ("hyderabad", "Telangana"),
    ("kolkata", "West Bengal"),
    ("new delhi", "Delhi"),
    ("ahmedabad", "Gujarat"),
    ("surat", "Gujarat"),
    ("jaipur", "Rajasthan"),
    ("lucknow", "Uttar Pradesh"),
    ("kanpur", "Uttar Pradesh"),
    ("varanasi", "Uttar Pradesh"),
    ("patna", "Bihar"),
    ("bhopal", "Madhya Pradesh"),
    ("indore", "Madhya Pradesh"),
    ("kochi", "Kerala"),
    ("thiruvananthapuram", "Kerala"),
    ("bhubaneswar", "Odisha"),
    ("guwahati", "Assam"),
    ("chandigarh", "Chandigarh"),
    ("ranchi", "Jharkhand"),
    ("dehradun", "Uttarakhand"),
    ("raipur", "Chhattisgarh"),
    ("visakhapatnam", "Andhra Pradesh"),
    ("srinagar", "Jammu and Kashmir"),
];

/// Приводит свободную строку локации к city/state/country
#[derive(Debug, Clone, Default)]
pub struct LocationNormalizer;

impl LocationNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Пустая строка, "unknown", "n/a" и "india" означают всю Индию
    pub fn is_unspecified(raw: &str) -> bool {
        let raw = raw.trim().to_lowercase();
        raw.is_empty() || matches!(raw.as_str(), "unknown" | "n/a" | "india")
    }

    pub fn normalize(&self, raw: &str) -> Location {
        let raw = raw.trim().to_lowercase();
        if Self::is_unspecified(&raw) {
            return Location::india(if raw.is_empty() { "India" } else { raw.as_str() });
        }

        let parts: Vec<&str> = raw
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty() && *p != "india")
            .collect();

        let mut state = None;
        let mut city = None;
        for part in &parts {
            if state.is_none() {
                if let Some(found) = find_state(part) {
                    state = Some(found.to_string());
                    continue;
                }
            }
            if city.is_none() {
                city = Some(title_case(part));
            }
        }

        if state.is_none() {
            if let Some(c) = &city {
                state = state_for_city(&c.to_lowercase()).map(str::to_string);
            }
        }

        // "Delhi" as a single token is both the city and the territory
        if city.is_none() && state.as_deref() == Some("Delhi") {
            city = Some("Delhi".to_string());
        }

        Location {
            raw,
            city,
            state,
            country: Some("India".to_string()),
        }
    }
}

fn find_state(part: &str) -> Option<&'static str> {
    STATES
        .iter()
        .copied()
        .find(|s| s.eq_ignore_ascii_case(part))
        .or_else(|| match part {
            "up" => Some("Uttar Pradesh"),
            "mp" => Some("Madhya Pradesh"),
            "tn" => Some("Tamil Nadu"),
            "orissa" => Some("Odisha"),
            "pondicherry" => Some("Puducherry"),
            "j&k" => Some("Jammu and Kashmir"),
            _ => None,
        })
}

fn state_for_city(city: &str) -> Option<&'static str> {
    CITY_STATES
        .iter()
        .find(|(c, _)| *c == city)
        .map(|(_, s)| *s)
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unspecified_falls_back_to_india() {
        let n = LocationNormalizer::new();
        let loc = n.normalize("");
        assert_eq!(loc.raw, "India");
        assert_eq!(loc.country.as_deref(), Some("India"));
        assert!(loc.city.is_none() && loc.state.is_none());

        let loc = n.normalize("Unknown");
        assert_eq!(loc.raw, "unknown");
        assert!(loc.state.is_none());
    }

    #[test]
    fn test_city_and_state() {
        let loc = LocationNormalizer::new().normalize("Pune, Maharashtra");
        assert_eq!(loc.city.as_deref(), Some("Pune"));
        assert_eq!(loc.state.as_deref(), Some("Maharashtra"));
        assert_eq!(loc.raw, "pune, maharashtra");
    }

    #[test]
    fn test_state_only_and_city_lookup() {
        let n = LocationNormalizer::new();

        let loc = n.normalize("tamil nadu");
        assert_eq!(loc.state.as_deref(), Some("Tamil Nadu"));
        assert!(loc.city.is_none());

        let loc = n.normalize("bangalore, india");
        assert_eq!(loc.city.as_deref(), Some("Bangalore"));
        assert_eq!(loc.state.as_deref(), Some("Karnataka"));

        let loc = n.normalize("Delhi");
        assert_eq!(loc.city.as_deref(), Some("Delhi"));
        assert_eq!(loc.state.as_deref(), Some("Delhi"));
    }

    #[test]
    fn test_unknown_place_keeps_city() {
        let loc = LocationNormalizer::new().normalize("shillong");
        assert_eq!(loc.city.as_deref(), Some("Shillong"));
        assert!(loc.state.is_none());
    }
}
