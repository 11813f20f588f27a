//! Skill metadata resolution.
//!
//! Skill headers have carried metadata in several layouts over time:
//!
//! 1. `metadata:` holding a JSON document as a string (optionally quoted twice),
//! 2. `metadata:` as a native nested mapping,
//! 3. `jovis:` / `jovbot:` namespaces directly at the top level.
//!
//! [`get_frontmatter_metadata`] tries each layout in that order and returns
//! the first mapping found. [`parse_jovis_metadata`] then merges the `jovis`
//! and `jovbot` namespaces into one [`JovisMetadata`].

use serde_json::{Map, Value};

use crate::{
    frontmatter::strip_matching_quotes,
    types::{
        ConfigRequirement, Frontmatter, InstallKind, InstallSpec, JovisMetadata, NixSpec,
        RequiresSpec, frontmatter_to_json,
    },
};

type JsonMap = Map<String, Value>;

/// Metadata namespaces, in precedence order.
const NAMESPACES: [&str; 2] = ["jovis", "jovbot"];

/// One accepted metadata layout.
struct MetadataShape {
    name: &'static str,
    detect: fn(&Frontmatter) -> Option<JsonMap>,
}

const METADATA_SHAPES: &[MetadataShape] = &[
    MetadataShape {
        name: "metadata-json-string",
        detect: embedded_json,
    },
    MetadataShape {
        name: "metadata-mapping",
        detect: native_mapping,
    },
    MetadataShape {
        name: "top-level-namespaces",
        detect: top_level_namespaces,
    },
];

/// Resolve the raw metadata mapping from whichever layout the header uses.
pub fn get_frontmatter_metadata(frontmatter: &Frontmatter) -> Option<JsonMap> {
    METADATA_SHAPES.iter().find_map(|shape| {
        let map = (shape.detect)(frontmatter)?;
        tracing::trace!(shape = shape.name, "resolved skill metadata layout");
        Some(map)
    })
}

/// Resolve and normalize skill metadata.
///
/// Returns `None` when neither the `jovis` nor the `jovbot` namespace is
/// present as a mapping.
pub fn parse_jovis_metadata(frontmatter: &Frontmatter) -> Option<JovisMetadata> {
    let resolved = get_frontmatter_metadata(frontmatter).unwrap_or_default();
    let sources: Vec<JsonMap> = NAMESPACES
        .iter()
        .filter_map(|ns| namespace(&resolved, frontmatter, ns))
        .collect();
    if sources.is_empty() {
        return None;
    }
    Some(normalize(&sources))
}

// ── Layout detectors ─────────────────────────────────────────────────────────

fn embedded_json(frontmatter: &Frontmatter) -> Option<JsonMap> {
    let raw = frontmatter.get("metadata")?.as_str()?;
    let parsed = parse_json_object(raw);
    if parsed.is_none() {
        tracing::debug!(len = raw.len(), "ignoring metadata string that is not a JSON object");
    }
    parsed
}

fn native_mapping(frontmatter: &Frontmatter) -> Option<JsonMap> {
    let map = frontmatter.get("metadata")?.as_map()?;
    Some(frontmatter_to_json(map.clone()))
}

fn top_level_namespaces(frontmatter: &Frontmatter) -> Option<JsonMap> {
    let map: JsonMap = NAMESPACES
        .iter()
        .filter_map(|ns| {
            let inner = frontmatter.get(*ns)?.as_map()?;
            Some((ns.to_string(), Value::Object(frontmatter_to_json(inner.clone()))))
        })
        .collect();
    (!map.is_empty()).then_some(map)
}

/// Parse a JSON object, unwrapping at most one extra layer of quoting.
fn parse_json_object(raw: &str) -> Option<JsonMap> {
    let raw = raw.trim();
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Some(map),
        // A JSON string whose content is the JSON document.
        Ok(Value::String(inner)) => as_object(serde_json::from_str(&inner).ok()?),
        Ok(_) => None,
        Err(_) => as_object(serde_json::from_str(strip_matching_quotes(raw)?).ok()?),
    }
}

fn as_object(value: Value) -> Option<JsonMap> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Look up a namespace in the resolved mapping, then at the header's top level.
fn namespace(resolved: &JsonMap, frontmatter: &Frontmatter, ns: &str) -> Option<JsonMap> {
    if let Some(map) = resolved.get(ns).and_then(Value::as_object) {
        return Some(map.clone());
    }
    let map = frontmatter.get(ns)?.as_map()?;
    Some(frontmatter_to_json(map.clone()))
}

// ── Normalization ────────────────────────────────────────────────────────────

/// Merge namespaces field by field; the first source with a usable value wins.
///
/// Empty strings and lists inside sub-sections count as absent.
fn normalize(sources: &[JsonMap]) -> JovisMetadata {
    // Top-level scalars pass through verbatim, whitespace included.
    let string = |key: &str| {
        sources
            .iter()
            .find_map(|s| s.get(key)?.as_str().map(str::to_string))
    };
    let list = |key: &str| sources.iter().find_map(|s| string_list(s.get(key)?));
    let object = |key: &str| sources.iter().find_map(|s| s.get(key)?.as_object());

    let install = sources
        .iter()
        .find_map(|s| s.get("install")?.as_array())
        .map(|entries| entries.iter().filter_map(parse_install_spec).collect::<Vec<_>>())
        .filter(|specs| !specs.is_empty());

    let requires = object("requires")
        .map(|req| RequiresSpec {
            bins: req.get("bins").and_then(string_list),
            any_bins: req.get("anyBins").and_then(string_list),
            env: req.get("env").and_then(string_list),
            config: req.get("config").and_then(string_list),
        })
        .filter(|req| !req.is_empty());

    let nix = object("nix")
        .map(|nix| NixSpec {
            plugin: nix.get("plugin").and_then(string_value),
            systems: nix.get("systems").and_then(string_list),
        })
        .filter(|nix| !nix.is_empty());

    let config = object("config")
        .map(|cfg| ConfigRequirement {
            required_env: cfg.get("requiredEnv").and_then(string_list),
            state_dirs: cfg.get("stateDirs").and_then(string_list),
            example: cfg.get("example").and_then(string_value),
        })
        .filter(|cfg| !cfg.is_empty());

    JovisMetadata {
        emoji: string("emoji"),
        homepage: string("homepage"),
        always: sources.iter().find_map(|s| s.get("always")?.as_bool()),
        skill_key: string("skillKey"),
        primary_env: string("primaryEnv"),
        install,
        os: list("os"),
        requires,
        nix,
        config,
        cli_help: string("cliHelp").map(|help| trim_one_newline(&help).to_string()),
    }
}

fn parse_install_spec(value: &Value) -> Option<InstallSpec> {
    let entry = value.as_object()?;
    let raw_kind = entry.get("kind")?.as_str()?;
    let kind = InstallKind::parse(raw_kind);
    if !kind.is_known() {
        tracing::debug!(kind = raw_kind, "dropping install spec with unrecognized kind");
        return None;
    }

    let field = |key: &str| entry.get(key).and_then(string_value);
    // Older documents use `pkg` for both npm packages and go modules.
    let pkg = field("pkg");

    let mut spec = InstallSpec::new(kind);
    spec.id = field("id");
    spec.label = field("label");
    spec.formula = field("formula");
    spec.tap = field("tap");
    spec.package = field("package").or_else(|| {
        matches!(kind, InstallKind::Node | InstallKind::Uv)
            .then(|| pkg.clone())
            .flatten()
    });
    spec.module = field("module").or_else(|| (kind == InstallKind::Go).then_some(pkg).flatten());
    spec.url = field("url");
    spec.bins = entry.get("bins").and_then(string_list).unwrap_or_default();
    spec.os = entry.get("os").and_then(string_list).unwrap_or_default();
    Some(spec)
}

fn string_value(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// A list of strings, or one comma-separated string, as trimmed non-empty tokens.
fn string_list(value: &Value) -> Option<Vec<String>> {
    let items: Vec<String> = match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Value::String(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => return None,
    };
    (!items.is_empty()).then_some(items)
}

fn trim_one_newline(text: &str) -> &str {
    text.strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text)
}
