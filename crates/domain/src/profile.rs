//! The companion profile: the AI persona the child designed plus what the
//! child told us about themselves.
//!
//! Stored as one flat JSON object per identifier. Keys use the kebab-case
//! names the web client sends (`ai-name`, `my-age`, ...). Unknown keys are
//! kept as-is so a read-modify-write never drops data written elsewhere.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A named profile field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    AiName,
    AiCharacter,
    /// Appearance prompt used for the generated portrait.
    AiPrompt,
    /// Public URL of the generated portrait.
    AiImage,
    MyName,
    MyAge,
    MyHobby,
    MyLike,
    /// Free-form message the child wants to tell the AI.
    MyEtc,
}

impl ProfileField {
    /// Fields the profile-update endpoint accepts from the request.
    pub const UPDATABLE: [ProfileField; 7] = [
        ProfileField::AiName,
        ProfileField::AiCharacter,
        ProfileField::MyName,
        ProfileField::MyAge,
        ProfileField::MyHobby,
        ProfileField::MyLike,
        ProfileField::MyEtc,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ProfileField::AiName => "ai-name",
            ProfileField::AiCharacter => "ai-character",
            ProfileField::AiPrompt => "ai-prompt",
            ProfileField::AiImage => "ai-image",
            ProfileField::MyName => "my-name",
            ProfileField::MyAge => "my-age",
            ProfileField::MyHobby => "my-hobby",
            ProfileField::MyLike => "my-like",
            ProfileField::MyEtc => "my-etc",
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Field map for one identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile {
    fields: Map<String, Value>,
}

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a stored profile blob. The blob must be a JSON object.
    pub fn from_slice(raw: &[u8]) -> crate::error::Result<Self> {
        let fields: Map<String, Value> = serde_json::from_slice(raw)?;
        Ok(Self { fields })
    }

    /// Serialize for storage. Non-ASCII text is written verbatim.
    pub fn to_vec(&self) -> crate::error::Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.fields)?)
    }

    /// Text value of a field. Missing keys and `null` render as `""`;
    /// numbers and booleans render with their JSON spelling.
    pub fn get(&self, field: ProfileField) -> String {
        self.get_key(field.key())
    }

    pub fn get_key(&self, key: &str) -> String {
        match self.fields.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    pub fn set(&mut self, field: ProfileField, value: impl Into<String>) {
        self.fields
            .insert(field.key().to_owned(), Value::String(value.into()));
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }
}
