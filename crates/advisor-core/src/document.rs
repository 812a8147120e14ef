//! The four informational documents served by the backend.
//!
//! Every field is optional. A missing section is simply not shown, so these
//! types never reject a document for being incomplete. Leaf values are
//! [`Scalar`]s, so an unexpected type is displayed rather than refused.

use std::fmt;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::display_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Roadmap,
    UserStories,
    Architecture,
    Legal,
}

impl DocumentKind {
    pub fn all() -> [DocumentKind; 4] {
        [
            DocumentKind::Roadmap,
            DocumentKind::UserStories,
            DocumentKind::Architecture,
            DocumentKind::Legal,
        ]
    }

    /// Path of the GET endpoint, relative to the base URL.
    pub fn endpoint(&self) -> &'static str {
        match self {
            DocumentKind::Roadmap => "/roadmap",
            DocumentKind::UserStories => "/user-stories",
            DocumentKind::Architecture => "/architecture",
            DocumentKind::Legal => "/legal",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Roadmap => "roadmap",
            DocumentKind::UserStories => "userStories",
            DocumentKind::Architecture => "architecture",
            DocumentKind::Legal => "legal",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DocumentKind::Roadmap => "Roadmap",
            DocumentKind::UserStories => "User Stories",
            DocumentKind::Architecture => "Architecture",
            DocumentKind::Legal => "Legal",
        }
    }

    /// Parse a successful body into the matching document type.
    pub fn parse(&self, body: &str) -> Result<Document, serde_json::Error> {
        Ok(match self {
            DocumentKind::Roadmap => Document::Roadmap(serde_json::from_str(body)?),
            DocumentKind::UserStories => Document::UserStories(serde_json::from_str(body)?),
            DocumentKind::Architecture => Document::Architecture(serde_json::from_str(body)?),
            DocumentKind::Legal => Document::Legal(serde_json::from_str(body)?),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Roadmap(Roadmap),
    UserStories(UserStories),
    Architecture(Architecture),
    Legal(Legal),
}

impl Document {
    pub fn kind(&self) -> DocumentKind {
        match self {
            Document::Roadmap(_) => DocumentKind::Roadmap,
            Document::UserStories(_) => DocumentKind::UserStories,
            Document::Architecture(_) => DocumentKind::Architecture,
            Document::Legal(_) => DocumentKind::Legal,
        }
    }

    pub fn title(&self) -> Option<String> {
        let title = match self {
            Document::Roadmap(d) => &d.title,
            Document::UserStories(d) => &d.title,
            Document::Architecture(d) => &d.title,
            Document::Legal(d) => &d.title,
        };
        title.as_ref().map(Scalar::to_string)
    }
}

/// A displayed value of any JSON type. Strings show as-is, anything else as
/// JSON text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scalar(Value);

impl Scalar {
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        self.0.as_str()
    }

    /// Numeric reading of the value. Accepts numbers and strings like `"75"`
    /// or `"75%"`.
    pub fn as_f64(&self) -> Option<f64> {
        match &self.0 {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().trim_end_matches('%').trim_end().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&display_text(&self.0))
    }
}

// Roadmap

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Roadmap {
    pub title: Option<Scalar>,
    pub phases: Option<Vec<Phase>>,
    pub key_metrics: Option<KeyMetrics>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Phase {
    pub id: Option<Value>,
    pub title: Option<Scalar>,
    pub status: Option<Scalar>,
    pub description: Option<Scalar>,
    pub completion: Option<Scalar>,
    pub features: Option<Vec<Scalar>>,
}

impl Phase {
    /// Completion as a ratio in `0.0..=1.0` for gauges.
    pub fn completion_ratio(&self) -> Option<f64> {
        self.completion
            .as_ref()
            .and_then(Scalar::as_f64)
            .filter(|c| c.is_finite())
            .map(|c| (c / 100.0).clamp(0.0, 1.0))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyMetrics {
    pub target_users: Option<Scalar>,
    pub accuracy_goal: Option<Scalar>,
    pub response_time: Option<Scalar>,
    pub availability: Option<Scalar>,
}

// User stories

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserStories {
    pub title: Option<Scalar>,
    pub stories: Option<Vec<Story>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Story {
    pub id: Option<Value>,
    pub title: Option<Scalar>,
    pub priority: Option<Scalar>,
    pub description: Option<Scalar>,
    pub user_type: Option<Scalar>,
    pub acceptance_criteria: Option<Vec<Scalar>>,
    pub business_value: Option<Scalar>,
}

// Architecture

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Architecture {
    pub title: Option<Scalar>,
    pub overview: Option<Scalar>,
    pub components: Option<Vec<Component>>,
    pub data_flow: Option<Vec<Scalar>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Component {
    pub name: Option<Scalar>,
    pub description: Option<Scalar>,
    pub technologies: Option<Vec<Scalar>>,
    pub responsibilities: Option<Vec<Scalar>>,
}

// Legal

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Legal {
    pub title: Option<Scalar>,
    pub overview: Option<Scalar>,
    pub compliance: Option<Vec<ComplianceItem>>,
    pub policies: Option<Vec<Policy>>,
    pub contact: Option<Contact>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceItem {
    pub regulation: Option<Scalar>,
    pub status: Option<Scalar>,
    pub description: Option<Scalar>,
    pub measures: Option<Vec<Scalar>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    pub name: Option<Scalar>,
    pub description: Option<Scalar>,
    pub key_points: Option<Vec<Scalar>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub email: Option<Scalar>,
    pub address: Option<Scalar>,
    pub last_updated: Option<Scalar>,
}

/// Human label for a phase or compliance status. Unknown values pass through.
pub fn status_label(status: &str) -> &str {
    match status {
        "in_progress" => "In progress",
        "planned" => "Planned",
        "research" => "Research",
        "compliant" => "Compliant",
        "completed" => "Completed",
        other => other,
    }
}

/// Human label for a story priority. Unknown values pass through.
pub fn priority_label(priority: &str) -> &str {
    match priority {
        "high" => "High",
        "medium" => "Medium",
        "low" => "Low",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        let paths: Vec<_> = DocumentKind::all().iter().map(|k| k.endpoint()).collect();
        assert_eq!(paths, ["/roadmap", "/user-stories", "/architecture", "/legal"]);
    }

    #[test]
    fn test_parse_full_roadmap() {
        let body = r#"{
            "title": "Advisor roadmap",
            "phases": [
                {"id": 1, "title": "MVP", "status": "in_progress", "description": "First cut",
                 "completion": 75, "features": ["ask", "feedback"]}
            ],
            "key_metrics": {"target_users": "10k", "accuracy_goal": "95%",
                            "response_time": "<2s", "availability": "99.9%"}
        }"#;
        let doc = DocumentKind::Roadmap.parse(body).unwrap();
        let Document::Roadmap(roadmap) = doc else { panic!("wrong document kind") };
        let phases = roadmap.phases.unwrap();
        assert_eq!(phases[0].completion, Some(Scalar::new(75)));
        assert_eq!(phases[0].completion_ratio(), Some(0.75));
        assert_eq!(phases[0].features.as_ref().unwrap().len(), 2);
        let availability = roadmap.key_metrics.unwrap().availability.unwrap();
        assert_eq!(availability.as_str(), Some("99.9%"));
    }

    #[test]
    fn test_partial_documents_parse() {
        let doc = DocumentKind::Legal.parse(r#"{"title": "Legal"}"#).unwrap();
        assert_eq!(doc.title().as_deref(), Some("Legal"));
        assert_eq!(doc.kind(), DocumentKind::Legal);

        let doc = DocumentKind::Architecture.parse("{}").unwrap();
        let Document::Architecture(arch) = doc else { panic!("wrong document kind") };
        assert!(arch.components.is_none());
        assert!(arch.data_flow.is_none());

        let doc = DocumentKind::UserStories
            .parse(r#"{"stories": [{"title": "Ask a question", "extra": true}]}"#)
            .unwrap();
        let Document::UserStories(stories) = doc else { panic!("wrong document kind") };
        let story = &stories.stories.unwrap()[0];
        assert_eq!(story.title, Some(Scalar::new("Ask a question")));
        assert!(story.acceptance_criteria.is_none());
    }

    #[test]
    fn test_leaf_values_of_any_type_are_accepted() {
        let body = r#"{
            "title": "Roadmap",
            "phases": [{"title": "MVP", "completion": "75"}],
            "key_metrics": {"target_users": 10000, "availability": null}
        }"#;
        let Document::Roadmap(roadmap) = DocumentKind::Roadmap.parse(body).unwrap() else {
            panic!("wrong document kind")
        };
        let phases = roadmap.phases.unwrap();
        assert_eq!(phases[0].completion_ratio(), Some(0.75));
        let metrics = roadmap.key_metrics.unwrap();
        assert_eq!(metrics.target_users.unwrap().to_string(), "10000");
        assert!(metrics.availability.is_none());

        let body = r#"{"stories": [{"title": 3, "business_value": 5, "acceptance_criteria": [true, "ok"]}]}"#;
        let Document::UserStories(stories) = DocumentKind::UserStories.parse(body).unwrap() else {
            panic!("wrong document kind")
        };
        let story = &stories.stories.unwrap()[0];
        assert_eq!(story.business_value.as_ref().unwrap().to_string(), "5");
        let criteria: Vec<String> = story
            .acceptance_criteria
            .iter()
            .flatten()
            .map(Scalar::to_string)
            .collect();
        assert_eq!(criteria, ["true", "ok"]);
    }

    #[test]
    fn test_completion_ratio_reads_numbers_and_strings() {
        let phase = |completion: Value| Phase { completion: Some(Scalar::new(completion)), ..Phase::default() };
        assert_eq!(phase(Value::from(40)).completion_ratio(), Some(0.4));
        assert_eq!(phase(Value::from("60%")).completion_ratio(), Some(0.6));
        assert_eq!(phase(Value::from(250)).completion_ratio(), Some(1.0));
        assert_eq!(phase(Value::from("soon")).completion_ratio(), None);
        assert_eq!(Phase::default().completion_ratio(), None);
    }

    #[test]
    fn test_non_json_is_an_error() {
        assert!(DocumentKind::Roadmap.parse("<html>").is_err());
    }

    #[test]
    fn test_labels() {
        assert_eq!(status_label("in_progress"), "In progress");
        assert_eq!(status_label("blocked"), "blocked");
        assert_eq!(priority_label("high"), "High");
    }
}
