//! Career profile input shared by the roadmap, insights and recommendation features.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AcademicProfile {
    pub education_level: String,
    pub stream: String,
    pub branch: String,
    pub institution_type: String,
    pub marks_10th: f64,
    pub marks_12th: f64,
    pub cgpa: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub name: String,
    pub age: u32,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    /// Behavioural traits, e.g. "analytical", "team player".
    pub traits: Vec<String>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "User".to_string(),
            age: 18,
            skills: Vec::new(),
            interests: Vec::new(),
            traits: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CareerGoals {
    pub long_term_goal: String,
    pub preferred_industry: String,
    pub preferred_location: String,
    /// Financial, time or location constraints, free text.
    pub constraints: String,
}

/// Request body for roadmap and insights generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CareerInput {
    pub academics: AcademicProfile,
    pub profile: UserProfile,
    pub goals: CareerGoals,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_input_fills_defaults() {
        let input: CareerInput = serde_json::from_value(json!({
            "academics": {"education_level": "Undergraduate", "cgpa": 8.1},
            "profile": {"skills": ["Python"]}
        }))
        .unwrap();
        assert_eq!(input.academics.education_level, "Undergraduate");
        assert!((input.academics.cgpa - 8.1).abs() < f64::EPSILON);
        assert_eq!(input.profile.name, "User");
        assert_eq!(input.profile.age, 18);
        assert_eq!(input.profile.skills, vec!["Python"]);
        assert!(input.goals.long_term_goal.is_empty());
    }

    #[test]
    fn test_empty_body_is_accepted() {
        let input: CareerInput = serde_json::from_value(json!({})).unwrap();
        assert_eq!(input.profile.name, "User");
    }
}
