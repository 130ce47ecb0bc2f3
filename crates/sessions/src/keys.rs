//! Blob key layout for per-identifier state.
//!
//! | Blob     | Key                                 |
//! |----------|-------------------------------------|
//! | profile  | `<info_prefix>/<id>_info.json`      |
//! | history  | `<info_prefix>/<id>_history.txt`    |
//! | image    | `<data_prefix>/<id>_image.png`      |
//!
//! Identifiers are opaque: they are spliced into keys as given.

use af_domain::config::ConversationConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyLayout {
    info_prefix: String,
    data_prefix: String,
}

impl KeyLayout {
    pub fn new(info_prefix: impl Into<String>, data_prefix: impl Into<String>) -> Self {
        Self {
            info_prefix: info_prefix.into().trim_matches('/').to_owned(),
            data_prefix: data_prefix.into().trim_matches('/').to_owned(),
        }
    }

    pub fn from_config(cfg: &ConversationConfig) -> Self {
        Self::new(cfg.info_prefix.as_str(), cfg.data_prefix.as_str())
    }

    pub fn profile_key(&self, id: &str) -> String {
        self.info_key(&format!("{id}_info.json"))
    }

    pub fn history_key(&self, id: &str) -> String {
        self.info_key(&format!("{id}_history.txt"))
    }

    /// Key of an arbitrary object under the info prefix.
    pub fn info_key(&self, object: &str) -> String {
        format!("{}/{object}", self.info_prefix)
    }

    /// Key of an arbitrary object under the data prefix.
    pub fn data_key(&self, object: &str) -> String {
        format!("{}/{object}", self.data_prefix)
    }

    /// Object name of the generated portrait, without the prefix.
    pub fn image_object(&self, id: &str) -> String {
        format!("{id}_image.png")
    }

    pub fn image_key(&self, id: &str) -> String {
        self.data_key(&self.image_object(id))
    }
}

impl Default for KeyLayout {
    fn default() -> Self {
        Self::from_config(&ConversationConfig::default())
    }
}
