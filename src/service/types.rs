use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept a string, or an array of strings joined with ", ".
/// Any other shape is treated as absent.
fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text_from_value(serde_json::Value::deserialize(deserializer)?))
}

fn text_from_value(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(text) => Some(text),
        serde_json::Value::Array(items) => {
            let parts: Vec<String> = items
                .into_iter()
                .filter_map(|item| match item {
                    serde_json::Value::String(text) => Some(text),
                    _ => None,
                })
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        _ => None,
    }
}

// ============================================================================
// Case analysis
// ============================================================================

/// Findings returned by the case analysis endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Narrative summary (markdown)
    #[serde(default, deserialize_with = "null_as_default")]
    pub analysis: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub issues: Vec<Issue>,
}

/// One issue identified in the case material
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Free-form label as returned by the service
    #[serde(default, deserialize_with = "null_as_default")]
    pub risk_level: String,
    #[serde(
        default,
        deserialize_with = "loose_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub category_group: Option<String>,
    #[serde(
        default,
        deserialize_with = "loose_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub category_label: Option<String>,
    #[serde(
        default,
        deserialize_with = "loose_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub extra_labels: Option<String>,
    #[serde(
        default,
        deserialize_with = "loose_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "loose_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeline: Option<String>,
    #[serde(
        default,
        deserialize_with = "loose_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub parties_involved: Option<String>,
    #[serde(
        default,
        deserialize_with = "loose_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub key_people: Option<String>,
    #[serde(
        default,
        deserialize_with = "loose_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub citations: Option<String>,
}

/// Canonical risk bucket used for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskLevel {
    High,
    Medium,
    Low,
    Unknown,
}

impl RiskLevel {
    /// Canonicalize a free-form label, ignoring case and surrounding whitespace
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "high" => RiskLevel::High,
            "medium" => RiskLevel::Medium,
            "low" => RiskLevel::Low,
            _ => RiskLevel::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::High => "high",
            RiskLevel::Medium => "medium",
            RiskLevel::Low => "low",
            RiskLevel::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Issue {
    /// Create an issue with a title and risk label
    pub fn new(title: impl Into<String>, risk_level: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            risk_level: risk_level.into(),
            ..Self::default()
        }
    }

    /// Canonical risk bucket of this issue
    pub fn risk(&self) -> RiskLevel {
        RiskLevel::from_label(&self.risk_level)
    }

    /// `group → label`, or just the group when no label is present
    pub fn category_line(&self) -> Option<String> {
        let group = self.category_group.as_deref().filter(|g| !g.is_empty())?;
        match self.category_label.as_deref().filter(|l| !l.is_empty()) {
            Some(label) => Some(format!("{} → {}", group, label)),
            None => Some(group.to_string()),
        }
    }
}

impl AnalysisResult {
    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }
}

// ============================================================================
// Relevance classification
// ============================================================================

/// A classified document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelevanceEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
}

impl RelevanceEntry {
    pub fn new(name: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            summary: summary.into(),
        }
    }
}

/// Five-bucket classification. Buckets absent from a response are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelevanceResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub highly_relevant: Vec<RelevanceEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub partially_relevant: Vec<RelevanceEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub less_relevant: Vec<RelevanceEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub not_relevant: Vec<RelevanceEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub failed: Vec<RelevanceEntry>,
}

/// Relevance bucket identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    HighlyRelevant,
    PartiallyRelevant,
    LessRelevant,
    NotRelevant,
    Failed,
}

impl Bucket {
    /// All buckets in display order
    pub const ALL: [Bucket; 5] = [
        Bucket::HighlyRelevant,
        Bucket::PartiallyRelevant,
        Bucket::LessRelevant,
        Bucket::NotRelevant,
        Bucket::Failed,
    ];

    /// Wire name of the bucket
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::HighlyRelevant => "highlyRelevant",
            Bucket::PartiallyRelevant => "partiallyRelevant",
            Bucket::LessRelevant => "lessRelevant",
            Bucket::NotRelevant => "notRelevant",
            Bucket::Failed => "failed",
        }
    }

    /// Section heading, also used as the expansion key
    pub fn title(&self) -> &'static str {
        match self {
            Bucket::HighlyRelevant => "Highly Relevant",
            Bucket::PartiallyRelevant => "Partially Relevant",
            Bucket::LessRelevant => "Less Relevant",
            Bucket::NotRelevant => "Not Relevant",
            Bucket::Failed => "Failed to Process",
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Bucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "highlyrelevant" | "highly" => Ok(Bucket::HighlyRelevant),
            "partiallyrelevant" | "partially" => Ok(Bucket::PartiallyRelevant),
            "lessrelevant" | "less" => Ok(Bucket::LessRelevant),
            "notrelevant" | "not" => Ok(Bucket::NotRelevant),
            "failed" | "failedtoprocess" => Ok(Bucket::Failed),
            _ => Err(format!("Unknown relevance bucket: {}", s)),
        }
    }
}

impl RelevanceResult {
    /// Entries of one bucket
    pub fn bucket(&self, bucket: Bucket) -> &[RelevanceEntry] {
        match bucket {
            Bucket::HighlyRelevant => &self.highly_relevant,
            Bucket::PartiallyRelevant => &self.partially_relevant,
            Bucket::LessRelevant => &self.less_relevant,
            Bucket::NotRelevant => &self.not_relevant,
            Bucket::Failed => &self.failed,
        }
    }

    /// Number of classified documents across all buckets
    pub fn total(&self) -> usize {
        Bucket::ALL.iter().map(|b| self.bucket(*b).len()).sum()
    }
}

// ============================================================================
// Question and answer
// ============================================================================

/// Author of a conversation message.
///
/// Roles other than `user` and `assistant` found in saved history are kept
/// verbatim so they survive the next save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    User,
    Assistant,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Other(role) => role,
        }
    }

    /// Upper-cased role for transcripts, `MESSAGE` when there is none
    pub fn label(&self) -> String {
        match self.as_str().trim() {
            "" => "MESSAGE".to_string(),
            role => role.to_uppercase(),
        }
    }
}

impl From<String> for Role {
    fn from(role: String) -> Self {
        match role.as_str() {
            "user" => Role::User,
            "assistant" => Role::Assistant,
            _ => Role::Other(role),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(role) => role,
            known => known.as_str().to_string(),
        }
    }
}

/// Message in the case conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
}

impl ConversationMessage {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Body of the ask endpoint
#[derive(Debug, Clone, Serialize)]
pub struct AskRequest {
    pub question: String,
    /// Full history, including the question being asked
    pub history: Vec<ConversationMessage>,
}

impl AskRequest {
    pub fn new(question: impl Into<String>, history: Vec<ConversationMessage>) -> Self {
        Self {
            question: question.into(),
            history,
        }
    }
}

/// Reply from the ask endpoint: either bare text or an object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AskReply {
    Text(String),
    Structured(StructuredAnswer),
}

/// Object form of an ask reply
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StructuredAnswer {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub analysis: Option<String>,
}

impl AskReply {
    /// Answer text: `answer` over `analysis` over empty.
    pub fn into_text(self) -> String {
        match self {
            AskReply::Text(text) => text,
            AskReply::Structured(reply) => reply
                .answer
                .filter(|a| !a.is_empty())
                .or(reply.analysis.filter(|a| !a.is_empty()))
                .unwrap_or_default(),
        }
    }
}
