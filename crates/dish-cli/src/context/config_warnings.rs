use dish_config::SnapdishConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &SnapdishConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &SnapdishConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.backend.is_configured() && has_single_underscore_key(&env_keys, "SNAPDISH_BACKEND") {
        warnings.push(
            "Backend config appears default while SNAPDISH_BACKEND* env vars exist. Use double underscores (example: SNAPDISH_BACKEND__URL)."
                .to_string(),
        );
    }

    if !config.auth.has_fallback_author() && has_single_underscore_key(&env_keys, "SNAPDISH_AUTH") {
        warnings.push(
            "Auth config appears default while SNAPDISH_AUTH* env vars exist. Use double underscores (example: SNAPDISH_AUTH__FALLBACK_AUTHOR_ID)."
                .to_string(),
        );
    }

    warnings
}

/// `true` if some key starts with `prefix_` but not `prefix__`.
fn has_single_underscore_key(keys: &[String], prefix: &str) -> bool {
    let nested = format!("{prefix}__");
    let single = format!("{prefix}_");
    keys.iter()
        .any(|key| key.starts_with(&single) && !key.starts_with(&nested))
}
