use serde::{Deserialize, Serialize};

use super::error::JournalError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl std::fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityLevel::Low => write!(f, "low"),
            ActivityLevel::Medium => write!(f, "medium"),
            ActivityLevel::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for ActivityLevel {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(ActivityLevel::Low),
            "medium" => Ok(ActivityLevel::Medium),
            "high" => Ok(ActivityLevel::High),
            _ => Err(JournalError::Config(format!("Unknown activity level: {}", s))),
        }
    }
}

/// Who the journal belongs to. Copied into each daily log at analysis time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub age: u32,

    pub gender: String,

    /// Free-form with unit, e.g. "175cm"
    pub height: String,

    /// Free-form with unit, e.g. "70kg"
    pub weight: String,

    #[serde(default)]
    pub activity_level: ActivityLevel,

    /// Health goals and notes
    #[serde(default)]
    pub conditions: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            age: 25,
            gender: "Male".to_string(),
            height: "175cm".to_string(),
            weight: "70kg".to_string(),
            activity_level: ActivityLevel::Medium,
            conditions: "General wellbeing".to_string(),
        }
    }
}

impl UserProfile {
    /// Apply the fields present in `patch`
    pub fn apply(&mut self, patch: ProfilePatch) {
        if let Some(age) = patch.age {
            self.age = age;
        }
        if let Some(gender) = patch.gender {
            self.gender = gender;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(weight) = patch.weight {
            self.weight = weight;
        }
        if let Some(level) = patch.activity_level {
            self.activity_level = level;
        }
        if let Some(conditions) = patch.conditions {
            self.conditions = conditions;
        }
    }
}

/// Partial profile edit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfilePatch {
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub activity_level: Option<ActivityLevel>,
    pub conditions: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        *self == ProfilePatch::default()
    }
}

/// Numeric coercion for age input: leading digits (after an optional `+`)
/// are used, anything else is 0.
pub fn coerce_age(input: &str) -> u32 {
    let trimmed = input.trim();
    let digits: String = trimmed
        .strip_prefix('+')
        .unwrap_or(trimmed)
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile() {
        let profile = UserProfile::default();
        assert_eq!(profile.age, 25);
        assert_eq!(profile.activity_level, ActivityLevel::Medium);
        assert_eq!(profile.conditions, "General wellbeing");
    }

    #[test]
    fn test_apply_patch_only_touches_given_fields() {
        let mut profile = UserProfile::default();
        profile.apply(ProfilePatch {
            age: Some(41),
            activity_level: Some(ActivityLevel::High),
            ..Default::default()
        });

        assert_eq!(profile.age, 41);
        assert_eq!(profile.activity_level, ActivityLevel::High);
        assert_eq!(profile.gender, "Male");
        assert_eq!(profile.weight, "70kg");
    }

    #[test]
    fn test_coerce_age() {
        assert_eq!(coerce_age("34"), 34);
        assert_eq!(coerce_age(" 27 years"), 27);
        assert_eq!(coerce_age("abc"), 0);
        assert_eq!(coerce_age(""), 0);
        assert_eq!(coerce_age("-5"), 0);
    }

    #[test]
    fn test_coerce_age_accepts_plus_sign() {
        assert_eq!(coerce_age("+5"), 5);
        assert_eq!(coerce_age(" +42yrs"), 42);
        assert_eq!(coerce_age("++5"), 0);
        assert_eq!(coerce_age("+"), 0);
    }

    #[test]
    fn test_activity_level_parse() {
        assert_eq!("HIGH".parse::<ActivityLevel>().unwrap(), ActivityLevel::High);
        assert_eq!(" low ".parse::<ActivityLevel>().unwrap(), ActivityLevel::Low);
        assert!("extreme".parse::<ActivityLevel>().is_err());
        assert_eq!(ActivityLevel::Medium.to_string(), "medium");
    }

    #[test]
    fn test_profile_json_uses_lowercase_activity() {
        let json = serde_json::to_value(UserProfile::default()).unwrap();
        assert_eq!(json["activity_level"], "medium");
    }
}
