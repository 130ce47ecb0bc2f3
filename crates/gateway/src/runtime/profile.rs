//! Profile field updates from request parameters.

use std::collections::HashMap;

use af_domain::error::Result;
use af_domain::profile::{Profile, ProfileField};

use crate::state::AppState;

/// Apply every updatable field present in `params` with a non-blank value
/// (stored trimmed). Other keys in the stored profile are kept. The full
/// profile is written back and returned.
pub async fn update_profile(
    state: &AppState,
    id: &str,
    params: &HashMap<String, String>,
) -> Result<Profile> {
    state
        .profiles
        .update(id, |profile| apply_fields(profile, params))
        .await
}

/// Returns the keys that were set.
pub fn apply_fields(profile: &mut Profile, params: &HashMap<String, String>) -> Vec<String> {
    let mut changed = Vec::new();
    for field in ProfileField::UPDATABLE {
        let Some(value) = params.get(field.key()) else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        profile.set(field, value);
        changed.push(field.key().to_owned());
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn only_updatable_non_blank_fields_apply() {
        let mut profile = Profile::new();
        let changed = apply_fields(
            &mut profile,
            &params(&[
                ("id", "u1"),
                ("ai-name", "  토리 "),
                ("my-age", "   "),
                ("ai-image", "/evil.png"),
                ("my-like", "공룡"),
            ]),
        );
        assert_eq!(changed, vec!["ai-name".to_owned(), "my-like".to_owned()]);
        assert_eq!(profile.get(ProfileField::AiName), "토리");
        assert_eq!(profile.get(ProfileField::MyLike), "공룡");
        assert_eq!(profile.get_key("ai-image"), "");
        assert_eq!(profile.get_key("id"), "");
        assert_eq!(profile.len(), 2);
    }
}
