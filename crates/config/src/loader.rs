use std::path::Path;

use tracing::{debug, warn};

use crate::{env_subst::substitute_env, schema::JovhubConfig};

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<JovhubConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    let config = parse_config(&raw, path)?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Load config from `path` when given, falling back to defaults on any failure.
///
/// Callers decide where the path comes from; this crate does not search for
/// config files.
pub fn load_or_default(path: Option<&Path>) -> JovhubConfig {
    let Some(path) = path else {
        debug!("no config path given, using defaults");
        return JovhubConfig::default();
    };
    match load_config(path) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            JovhubConfig::default()
        },
    }
}

/// Parse already-loaded config text. The format comes from `path`'s extension.
pub fn parse_config(raw: &str, path: &Path) -> anyhow::Result<JovhubConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => {
            // An empty YAML document deserializes to unit, not a map.
            if raw.trim().is_empty() {
                return Ok(JovhubConfig::default());
            }
            Ok(serde_yaml::from_str(raw)?)
        },
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}
