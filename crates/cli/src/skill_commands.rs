//! CLI commands that operate on a skill document or package directory.

use std::path::{Path, PathBuf};

use {
    anyhow::{Context, Result},
    tracing::{debug, warn},
    walkdir::WalkDir,
};

use {
    jovhub_config::{JovhubConfig, SkillsConfig},
    jovhub_skills::{
        EmbeddingFile, EmbeddingInput, FileEntry, SkillContent, SkillEligibility, TextClassifier,
        build_embedding_text, frontmatter_to_json, hash_skill_files, parse_skill_document,
        requirements::{check_requirements, current_os, install_command_preview},
        sanitize_path, sha256_hex,
    },
};

/// The skill document inside a package directory.
const SKILL_FILE: &str = "SKILL.md";

/// A file from a package directory, keyed by its sanitized relative path.
#[derive(Debug)]
struct PackageFile {
    path: String,
    bytes: Vec<u8>,
}

// ── inspect ──────────────────────────────────────────────────────────────────

pub fn inspect(path: &Path, json: bool) -> Result<()> {
    let skill = read_skill(path)?;

    if json {
        let doc = serde_json::json!({
            "frontmatter": frontmatter_to_json(skill.frontmatter.clone()),
            "metadata": skill.metadata,
            "body": skill.body,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!("Name:        {}", skill.name().unwrap_or("-"));
    println!("Description: {}", skill.description().unwrap_or("-"));
    let Some(meta) = &skill.metadata else {
        println!("Metadata:    none");
        return Ok(());
    };
    if let Some(ref emoji) = meta.emoji {
        println!("Emoji:       {emoji}");
    }
    if let Some(ref homepage) = meta.homepage {
        println!("Homepage:    {homepage}");
    }
    if let Some(ref os) = meta.os {
        println!("OS:          {}", os.join(", "));
    }
    if let Some(ref req) = meta.requires {
        if let Some(ref bins) = req.bins {
            println!("Bins:        {}", bins.join(", "));
        }
        if let Some(ref any_bins) = req.any_bins {
            println!("Any bins:    {}", any_bins.join(" | "));
        }
        if let Some(ref env) = req.env {
            println!("Env:         {}", env.join(", "));
        }
    }
    for spec in meta.install.iter().flatten() {
        match install_command_preview(spec) {
            Ok(cmd) => println!("Install:     {cmd}"),
            Err(e) => println!("Install:     {} ({e})", spec.kind),
        }
    }
    if let Some(plugin) = meta.nix.as_ref().and_then(|n| n.plugin.as_deref()) {
        println!("Nix plugin:  {plugin}");
    }
    if let Some(ref help) = meta.cli_help {
        println!("\n{help}");
    }
    Ok(())
}

// ── embed-text ───────────────────────────────────────────────────────────────

pub fn embed_text(dir: &Path, max_chars: Option<usize>, config: &JovhubConfig) -> Result<()> {
    println!("{}", embedding_text(dir, max_chars, config)?);
    Ok(())
}

/// Build a classifier that also accepts the configured extra extensions and mime types.
fn text_classifier(config: &SkillsConfig) -> TextClassifier {
    TextClassifier::new(
        config.extra_text_extensions.iter().cloned(),
        config.extra_text_mime_types.iter().cloned(),
    )
}

fn embedding_text(
    dir: &Path,
    max_chars: Option<usize>,
    config: &JovhubConfig,
) -> Result<String> {
    let readme_path = dir.join(SKILL_FILE);
    let readme = std::fs::read_to_string(&readme_path)
        .with_context(|| format!("failed to read {}", readme_path.display()))?;
    let skill = parse_skill_document(&readme);

    let classifier = text_classifier(&config.skills);
    let max_file_bytes = config.skills.max_file_bytes;
    let files: Vec<EmbeddingFile> = collect_package(dir)?
        .into_iter()
        .filter(|f| f.path != SKILL_FILE)
        .filter(|f| classifier.is_text_file(&f.path, None))
        .filter(|f| {
            let fits = f.bytes.len() as u64 <= max_file_bytes;
            if !fits {
                debug!(path = %f.path, size = f.bytes.len(), "skipping oversized file");
            }
            fits
        })
        .filter_map(|f| match String::from_utf8(f.bytes) {
            Ok(content) => Some(EmbeddingFile::new(f.path, content)),
            Err(_) => {
                debug!(path = %f.path, "skipping file that is not valid UTF-8");
                None
            },
        })
        .collect();

    let input = EmbeddingInput::new(&skill.frontmatter, &readme)
        .with_files(files)
        .with_max_chars(max_chars.unwrap_or(config.skills.embedding_max_chars));
    Ok(build_embedding_text(&input))
}

// ── hash ─────────────────────────────────────────────────────────────────────

pub fn hash(dir: &Path, json: bool) -> Result<()> {
    let (entries, digest) = package_digest(dir)?;
    if json {
        let doc = serde_json::json!({ "files": entries, "sha256": digest });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        for entry in &entries {
            println!("{}  {}", entry.sha256, entry.path);
        }
        println!("{digest}");
    }
    Ok(())
}

fn package_digest(dir: &Path) -> Result<(Vec<FileEntry>, String)> {
    let entries: Vec<FileEntry> = collect_package(dir)?
        .into_iter()
        .map(|f| {
            let sha256 = sha256_hex(&f.bytes);
            FileEntry::new(f.path, sha256)
        })
        .collect();
    let digest = hash_skill_files(&entries);
    Ok((entries, digest))
}

// ── check ────────────────────────────────────────────────────────────────────

pub fn check(path: &Path, os: Option<&str>) -> Result<()> {
    let (skill, elig) = evaluate(path, os, |bin| which::which(bin).is_ok())?;

    let name = skill.name().unwrap_or("skill");
    if elig.eligible {
        println!("  ✓ {name} is eligible");
        return Ok(());
    }

    println!("  ✗ {name} is not eligible");
    if !elig.os_supported {
        let declared = skill
            .metadata
            .as_ref()
            .and_then(|m| m.os.as_ref())
            .map(|os| os.join(", "))
            .unwrap_or_default();
        println!("    ↳ requires OS: {declared}");
    }
    if !elig.missing_bins.is_empty() {
        println!("    ↳ missing binaries: {}", elig.missing_bins.join(", "));
    }
    if !elig.missing_any_bins.is_empty() {
        println!("    ↳ needs one of: {}", elig.missing_any_bins.join(", "));
    }
    for spec in &elig.install_options {
        if let Ok(cmd) = install_command_preview(spec) {
            let label = spec.label.as_deref().unwrap_or(spec.kind.as_str());
            println!("    ↳ {label}: {cmd}");
        }
    }
    std::process::exit(1);
}

/// Read the skill at `path` and check it against `os`, or the host OS when unset.
fn evaluate(
    path: &Path,
    os: Option<&str>,
    has_bin: impl Fn(&str) -> bool,
) -> Result<(SkillContent, SkillEligibility)> {
    let skill = read_skill(path)?;
    let elig = eligibility(&skill, os.unwrap_or(current_os()), has_bin);
    Ok((skill, elig))
}

fn eligibility(
    skill: &SkillContent,
    host_os: &str,
    has_bin: impl Fn(&str) -> bool,
) -> SkillEligibility {
    let meta = skill.metadata.clone().unwrap_or_default();
    check_requirements(&meta, host_os, has_bin)
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn read_skill(path: &Path) -> Result<SkillContent> {
    let path = resolve_skill_path(path);
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(parse_skill_document(&content))
}

/// Accept either a `SKILL.md` path or the directory containing it.
fn resolve_skill_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(SKILL_FILE)
    } else {
        path.to_path_buf()
    }
}

/// Read every regular file under `dir`, sorted by path. Files whose relative
/// path does not pass [`sanitize_path`] are skipped.
fn collect_package(dir: &Path) -> Result<Vec<PackageFile>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to walk {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(dir).unwrap_or(entry.path());
        let Some(raw) = relative_path_string(relative) else {
            warn!(path = %relative.display(), "skipping file with non UTF-8 path");
            continue;
        };
        let Some(path) = sanitize_path(&raw) else {
            warn!(path = %raw, "skipping file with unsafe path");
            continue;
        };
        let bytes = std::fs::read(entry.path())
            .with_context(|| format!("failed to read {}", entry.path().display()))?;
        files.push(PackageFile { path, bytes });
    }
    Ok(files)
}

/// Join path components with `/` regardless of platform.
fn relative_path_string(path: &Path) -> Option<String> {
    let parts = path
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    const SKILL: &str = "---\nname: demo\ndescription: Demo skill\nmetadata: {\"jovis\":{\"requires\":{\"bins\":[\"demo-cli\"]},\"os\":\"linux\"}}\n---\n\n# Demo\n";

    fn package() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(SKILL_FILE), SKILL).unwrap();
        std::fs::create_dir_all(tmp.path().join("scripts")).unwrap();
        std::fs::write(tmp.path().join("scripts/run.sh"), "demo-cli run").unwrap();
        std::fs::write(tmp.path().join("logo.png"), [0x89, b'P', b'N', b'G']).unwrap();
        std::fs::write(tmp.path().join("notes.md"), "Some notes").unwrap();
        tmp
    }

    #[test]
    fn collects_sorted_relative_paths() {
        let tmp = package();
        let files = collect_package(tmp.path()).unwrap();
        let paths: Vec<_> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec![SKILL_FILE, "logo.png", "notes.md", "scripts/run.sh"]);
    }

    #[test]
    fn embedding_uses_text_files_only() {
        let tmp = package();
        let text = embedding_text(tmp.path(), None, &JovhubConfig::default()).unwrap();
        assert!(text.starts_with("demo\nDemo skill\n\n---\nname: demo"));
        assert!(text.ends_with("# notes.md\nSome notes\n\n# scripts/run.sh\ndemo-cli run"));
        assert!(!text.contains("logo.png"));
    }

    #[test]
    fn embedding_respects_limits() {
        let tmp = package();
        let text = embedding_text(tmp.path(), Some(4), &JovhubConfig::default()).unwrap();
        assert_eq!(text, "demo");

        let config = JovhubConfig {
            skills: SkillsConfig {
                max_file_bytes: 5,
                ..Default::default()
            },
        };
        let text = embedding_text(tmp.path(), None, &config).unwrap();
        assert!(!text.contains("# notes.md"));
    }

    #[test]
    fn embedding_budget_matches_config_default() {
        assert_eq!(
            jovhub_config::DEFAULT_EMBEDDING_MAX_CHARS,
            jovhub_skills::DEFAULT_EMBEDDING_MAX_CHARS
        );
        assert_eq!(
            JovhubConfig::default().skills.embedding_max_chars,
            jovhub_skills::DEFAULT_EMBEDDING_MAX_CHARS
        );
    }

    #[test]
    fn classifier_picks_up_configured_extras() {
        let config = SkillsConfig {
            extra_text_extensions: vec![".HCL".into()],
            extra_text_mime_types: vec!["application/x-ndjson".into()],
            ..Default::default()
        };
        let classifier = text_classifier(&config);
        assert!(classifier.is_text_file("main.hcl", None));
        assert!(classifier.is_text_file("events.log", Some("application/x-ndjson")));
        assert!(!text_classifier(&SkillsConfig::default()).is_text_file("main.hcl", None));

        let tmp = package();
        std::fs::write(tmp.path().join("infra.hcl"), "resource {}").unwrap();
        let text = embedding_text(tmp.path(), None, &JovhubConfig { skills: config }).unwrap();
        assert!(text.contains("# infra.hcl\nresource {}"));
        let text = embedding_text(tmp.path(), None, &JovhubConfig::default()).unwrap();
        assert!(!text.contains("infra.hcl"));
    }

    #[test]
    fn embedding_requires_skill_file() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(embedding_text(tmp.path(), None, &JovhubConfig::default()).is_err());
    }

    #[test]
    fn digest_covers_all_files() {
        let tmp = package();
        let (entries, digest) = package_digest(tmp.path()).unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].sha256, sha256_hex(SKILL));
        assert_eq!(digest, hash_skill_files(&entries));

        std::fs::write(tmp.path().join("notes.md"), "Changed").unwrap();
        let (_, changed) = package_digest(tmp.path()).unwrap();
        assert_ne!(digest, changed);
    }

    #[test]
    fn eligibility_uses_probe_and_os() {
        let skill = parse_skill_document(SKILL);
        assert!(eligibility(&skill, "linux", |bin| bin == "demo-cli").eligible);

        let elig = eligibility(&skill, "linux", |_| false);
        assert_eq!(elig.missing_bins, vec!["demo-cli"]);

        let elig = eligibility(&skill, "darwin", |_| true);
        assert!(!elig.os_supported);
        assert!(!elig.eligible);
    }

    #[test]
    fn evaluate_takes_borrowed_os_override() {
        let tmp = package();
        let os = String::from("darwin");
        let (skill, elig) = evaluate(tmp.path(), Some(os.as_str()), |_| true).unwrap();
        assert_eq!(skill.name(), Some("demo"));
        assert!(!elig.os_supported);

        let (_, elig) = evaluate(tmp.path(), Some("linux"), |bin| bin == "demo-cli").unwrap();
        assert!(elig.eligible);

        let (_, elig) = evaluate(tmp.path(), None, |_| false).unwrap();
        assert!(!elig.eligible);
        assert!(evaluate(&tmp.path().join("missing"), None, |_| true).is_err());
    }

    #[test]
    fn resolves_directory_to_skill_file() {
        let tmp = package();
        assert_eq!(resolve_skill_path(tmp.path()), tmp.path().join(SKILL_FILE));
        let skill = read_skill(tmp.path()).unwrap();
        assert_eq!(skill.name(), Some("demo"));
    }

    #[test]
    fn path_components_join_with_slash() {
        assert_eq!(
            relative_path_string(Path::new("a").join("b").join("c.md").as_path()).as_deref(),
            Some("a/b/c.md")
        );
    }
}
