use {
    indexmap::IndexMap,
    serde::{Deserialize, Serialize},
};

// ── Frontmatter ──────────────────────────────────────────────────────────────

/// Ordered key/value mapping parsed from a skill document header.
pub type Frontmatter = IndexMap<String, FrontmatterValue>;

/// A dynamic value from the header grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrontmatterValue {
    String(String),
    Number(serde_json::Number),
    Bool(bool),
    List(Vec<FrontmatterValue>),
    Map(Frontmatter),
}

impl FrontmatterValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Frontmatter> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl From<&str> for FrontmatterValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FrontmatterValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<FrontmatterValue> for serde_json::Value {
    fn from(value: FrontmatterValue) -> Self {
        match value {
            FrontmatterValue::String(s) => Self::String(s),
            FrontmatterValue::Number(n) => Self::Number(n),
            FrontmatterValue::Bool(b) => Self::Bool(b),
            FrontmatterValue::List(items) => {
                Self::Array(items.into_iter().map(Self::from).collect())
            },
            FrontmatterValue::Map(map) => Self::Object(frontmatter_to_json(map)),
        }
    }
}

/// Convert a frontmatter mapping into a JSON object, keeping key order.
pub fn frontmatter_to_json(map: Frontmatter) -> serde_json::Map<String, serde_json::Value> {
    map.into_iter()
        .map(|(key, value)| (key, serde_json::Value::from(value)))
        .collect()
}

// ── Resolved skill metadata ──────────────────────────────────────────────────

/// Normalized installation and runtime metadata for a skill.
///
/// Every field is optional. An absent field means the document did not
/// declare it (or declared it in an unusable shape).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JovisMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    /// Load the skill regardless of requirement checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub always: Option<bool>,
    /// Key the host config uses for this skill when it differs from the name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_key: Option<String>,
    /// The environment variable that carries the skill's main credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_env: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install: Option<Vec<InstallSpec>>,
    /// OS identifiers as declared (`macos`, `linux`, `darwin`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires: Option<RequiresSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nix: Option<NixSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ConfigRequirement>,
    /// Captured `--help` output of the skill's CLI, without the final newline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cli_help: Option<String>,
}

/// Binary and environment requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiresSpec {
    /// All of these binaries must be found in PATH.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bins: Option<Vec<String>>,
    /// At least one of these binaries must be found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub any_bins: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Vec<String>>,
}

impl RequiresSpec {
    pub fn is_empty(&self) -> bool {
        self.bins.is_none() && self.any_bins.is_none() && self.env.is_none() && self.config.is_none()
    }
}

/// Nix packaging pointer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NixSpec {
    /// Flake reference, e.g. `github:owner/repo?dir=tools/x`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub systems: Option<Vec<String>>,
}

impl NixSpec {
    pub fn is_empty(&self) -> bool {
        self.plugin.is_none() && self.systems.is_none()
    }
}

/// Host configuration a skill needs before it can run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRequirement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_env: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_dirs: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

impl ConfigRequirement {
    pub fn is_empty(&self) -> bool {
        self.required_env.is_none() && self.state_dirs.is_none() && self.example.is_none()
    }
}

/// How to install a missing binary dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallSpec {
    pub kind: InstallKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tap: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Which binaries this install step provides.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bins: Vec<String>,
    /// Platform filter. Empty = all platforms.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub os: Vec<String>,
}

impl InstallSpec {
    pub fn new(kind: InstallKind) -> Self {
        Self {
            kind,
            id: None,
            label: None,
            formula: None,
            tap: None,
            package: None,
            module: None,
            url: None,
            bins: Vec::new(),
            os: Vec::new(),
        }
    }
}

/// Install method kind.
///
/// `Unknown` collects kinds this version does not understand; the metadata
/// normalizer drops those entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallKind {
    Brew,
    Node,
    Go,
    Uv,
    Download,
    #[serde(other)]
    Unknown,
}

impl InstallKind {
    pub fn parse(kind: &str) -> Self {
        match kind.trim().to_ascii_lowercase().as_str() {
            "brew" => Self::Brew,
            "node" | "npm" => Self::Node,
            "go" => Self::Go,
            "uv" => Self::Uv,
            "download" => Self::Download,
            _ => Self::Unknown,
        }
    }

    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Brew => "brew",
            Self::Node => "node",
            Self::Go => "go",
            Self::Uv => "uv",
            Self::Download => "download",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for InstallKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── File inputs ──────────────────────────────────────────────────────────────

/// One file of a skill package, as handed over by the file loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    pub sha256: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl FileEntry {
    pub fn new(path: impl Into<String>, sha256: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            sha256: sha256.into(),
            content: None,
        }
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

// ── Parsed documents ─────────────────────────────────────────────────────────

/// A parsed skill document: header, resolved metadata, and markdown body.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillContent {
    pub frontmatter: Frontmatter,
    pub metadata: Option<JovisMetadata>,
    pub body: String,
}

impl SkillContent {
    pub fn name(&self) -> Option<&str> {
        crate::frontmatter::get_frontmatter_value(&self.frontmatter, "name")
    }

    pub fn description(&self) -> Option<&str> {
        crate::frontmatter::get_frontmatter_value(&self.frontmatter, "description")
    }
}

/// Result of checking whether a skill's requirements are met on a host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillEligibility {
    pub eligible: bool,
    /// `false` when the skill declares an `os` list that excludes the host.
    pub os_supported: bool,
    /// Entries of `requires.bins` that were not found.
    pub missing_bins: Vec<String>,
    /// All of `requires.anyBins` when none of them was found.
    pub missing_any_bins: Vec<String>,
    /// Install options filtered to the host OS.
    pub install_options: Vec<InstallSpec>,
}
