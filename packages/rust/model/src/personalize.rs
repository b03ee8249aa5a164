//! Personalization audiences.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalizeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audiences: Option<Audiences>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxonomy_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Audiences {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<Vec<AudienceGroup>>,
}

/// Named audience defined by key/value attribute matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudienceGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<AudienceAttribute>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudienceAttribute {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl PersonalizeConfig {
    pub fn groups(&self) -> &[AudienceGroup] {
        self.audiences
            .as_ref()
            .and_then(|a| a.group.as_deref())
            .unwrap_or_default()
    }

    pub fn group(&self, name: &str) -> Option<&AudienceGroup> {
        self.groups()
            .iter()
            .find(|g| g.name.as_deref() == Some(name))
    }
}

impl AudienceGroup {
    /// Value of the first attribute named `key`.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .flatten()
            .find(|a| a.key.as_deref() == Some(key))
            .and_then(|a| a.value.as_deref())
    }
}
