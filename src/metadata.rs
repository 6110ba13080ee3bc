//! Case metadata form fields.

use serde::{Deserialize, Serialize};

/// Free-text description of the case, submitted alongside the documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseMetadata {
    /// Case summary. Required for both analysis and relevance checks.
    pub matter_overview: String,
    pub people_and_aliases: String,
    pub noteworthy_organizations: String,
    pub noteworthy_terms: String,
    pub additional_context: String,
}

/// Names of the editable metadata fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataField {
    MatterOverview,
    PeopleAndAliases,
    NoteworthyOrganizations,
    NoteworthyTerms,
    AdditionalContext,
}

impl MetadataField {
    /// Wire name of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataField::MatterOverview => "matterOverview",
            MetadataField::PeopleAndAliases => "peopleAndAliases",
            MetadataField::NoteworthyOrganizations => "noteworthyOrganizations",
            MetadataField::NoteworthyTerms => "noteworthyTerms",
            MetadataField::AdditionalContext => "additionalContext",
        }
    }
}

impl std::fmt::Display for MetadataField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MetadataField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "matterOverview" => Ok(MetadataField::MatterOverview),
            "peopleAndAliases" => Ok(MetadataField::PeopleAndAliases),
            "noteworthyOrganizations" => Ok(MetadataField::NoteworthyOrganizations),
            "noteworthyTerms" => Ok(MetadataField::NoteworthyTerms),
            "additionalContext" => Ok(MetadataField::AdditionalContext),
            _ => Err(format!("Unknown metadata field: {}", s)),
        }
    }
}

impl CaseMetadata {
    /// Create metadata with only the case summary set
    pub fn new(matter_overview: impl Into<String>) -> Self {
        Self {
            matter_overview: matter_overview.into(),
            ..Self::default()
        }
    }

    /// Replace one field's value
    pub fn set(&mut self, field: MetadataField, value: impl Into<String>) {
        let value = value.into();
        match field {
            MetadataField::MatterOverview => self.matter_overview = value,
            MetadataField::PeopleAndAliases => self.people_and_aliases = value,
            MetadataField::NoteworthyOrganizations => self.noteworthy_organizations = value,
            MetadataField::NoteworthyTerms => self.noteworthy_terms = value,
            MetadataField::AdditionalContext => self.additional_context = value,
        }
    }

    /// Read one field's value
    pub fn get(&self, field: MetadataField) -> &str {
        match field {
            MetadataField::MatterOverview => &self.matter_overview,
            MetadataField::PeopleAndAliases => &self.people_and_aliases,
            MetadataField::NoteworthyOrganizations => &self.noteworthy_organizations,
            MetadataField::NoteworthyTerms => &self.noteworthy_terms,
            MetadataField::AdditionalContext => &self.additional_context,
        }
    }

    /// The trimmed case summary, or `None` when blank.
    pub fn overview(&self) -> Option<&str> {
        let trimmed = self.matter_overview.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Serialize the whole record as the single text part sent to the service
    pub fn to_blob(&self) -> String {
        // Plain string fields cannot fail to serialize.
        serde_json::to_string(self).unwrap_or_default()
    }
}
