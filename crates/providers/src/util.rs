//! Shared utility functions for provider adapters.

/// Read an API key from the named environment variable.
///
/// An unset or blank variable yields `None`; requests are then sent
/// without an `Authorization` header, which suits local gateways that
/// sign requests themselves.
pub fn resolve_api_key(env_var: &str) -> Option<String> {
    if env_var.is_empty() {
        return None;
    }
    match std::env::var(env_var) {
        Ok(key) if !key.trim().is_empty() => Some(key.trim().to_owned()),
        _ => {
            tracing::warn!(
                env_var = %env_var,
                "API key environment variable not set; sending unauthenticated requests"
            );
            None
        }
    }
}

/// Substitute `{region}` in an endpoint template and drop any trailing `/`.
pub(crate) fn endpoint_for(template: &str, region: &str) -> String {
    template
        .replace("{region}", region)
        .trim_end_matches('/')
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_is_substituted() {
        assert_eq!(
            endpoint_for("https://bedrock-runtime.{region}.amazonaws.com/", "eu-west-3"),
            "https://bedrock-runtime.eu-west-3.amazonaws.com"
        );
        assert_eq!(endpoint_for("http://proxy:8080", "us-east-1"), "http://proxy:8080");
    }

    #[test]
    fn empty_env_var_name_resolves_nothing() {
        assert_eq!(resolve_api_key(""), None);
    }
}
