//! Host eligibility checks and install command resolution.

use crate::{
    error::{Context, Error, Result},
    types::{InstallKind, InstallSpec, JovisMetadata, SkillEligibility},
};

/// Resolve install command program + args from an install spec.
pub fn install_program_and_args(spec: &InstallSpec) -> Result<(&'static str, Vec<String>)> {
    let (program, args) = match spec.kind {
        InstallKind::Brew => {
            let formula = spec
                .formula
                .as_deref()
                .context("brew install requires 'formula'")?;
            let target = match spec.tap.as_deref() {
                Some(tap) => format!("{tap}/{formula}"),
                None => formula.to_string(),
            };
            ("brew", vec!["install".into(), target])
        },
        InstallKind::Node => {
            let package = spec
                .package
                .as_deref()
                .context("node install requires 'package'")?;
            ("npm", vec![
                "install".into(),
                "-g".into(),
                "--ignore-scripts".into(),
                package.into(),
            ])
        },
        InstallKind::Go => {
            let module = spec
                .module
                .as_deref()
                .context("go install requires 'module'")?;
            ("go", vec!["install".into(), module.into()])
        },
        InstallKind::Uv => {
            let package = spec
                .package
                .as_deref()
                .context("uv install requires 'package'")?;
            ("uv", vec!["tool".into(), "install".into(), package.into()])
        },
        InstallKind::Download => {
            return Err(Error::message(
                "download install kind has no install command",
            ));
        },
        InstallKind::Unknown => {
            return Err(Error::message("unknown install kind"));
        },
    };

    Ok((program, args))
}

/// Render an install spec to a user-visible command preview.
pub fn install_command_preview(spec: &InstallSpec) -> Result<String> {
    if spec.kind == InstallKind::Download {
        let url = spec
            .url
            .as_deref()
            .context("download install requires 'url'")?;
        return Ok(format!("download {url}"));
    }
    let (program, args) = install_program_and_args(spec)?;
    Ok(std::iter::once(program.to_string())
        .chain(args)
        .collect::<Vec<_>>()
        .join(" "))
}

/// Returns the current OS identifier used for platform filtering.
pub fn current_os() -> &'static str {
    if cfg!(target_os = "macos") {
        "darwin"
    } else if cfg!(target_os = "linux") {
        "linux"
    } else if cfg!(target_os = "windows") {
        "windows"
    } else {
        "unknown"
    }
}

/// Whether a declared OS name refers to the host OS identifier.
pub fn os_matches(declared: &str, host: &str) -> bool {
    match (canonical_os(declared), canonical_os(host)) {
        (Some(a), Some(b)) => a == b,
        _ => declared.trim().eq_ignore_ascii_case(host.trim()),
    }
}

fn canonical_os(name: &str) -> Option<&'static str> {
    match name.trim().to_ascii_lowercase().as_str() {
        "macos" | "darwin" | "mac" | "osx" => Some("darwin"),
        "windows" | "win32" | "win" => Some("windows"),
        "linux" => Some("linux"),
        _ => None,
    }
}

/// Check a skill's declared requirements against a host.
///
/// `has_bin` reports whether an executable is available; callers decide how
/// to probe for it.
pub fn check_requirements(
    meta: &JovisMetadata,
    host_os: &str,
    has_bin: impl Fn(&str) -> bool,
) -> SkillEligibility {
    let os_supported = meta
        .os
        .as_ref()
        .is_none_or(|list| list.iter().any(|os| os_matches(os, host_os)));

    let requires = meta.requires.clone().unwrap_or_default();

    // All bins must exist
    let missing_bins: Vec<String> = requires
        .bins
        .unwrap_or_default()
        .into_iter()
        .filter(|bin| !has_bin(bin))
        .collect();

    // At least one of any_bins must exist; report all of them otherwise
    let any_bins = requires.any_bins.unwrap_or_default();
    let missing_any_bins = if any_bins.is_empty() || any_bins.iter().any(|b| has_bin(b)) {
        Vec::new()
    } else {
        any_bins
    };

    let install_options: Vec<InstallSpec> = meta
        .install
        .iter()
        .flatten()
        .filter(|spec| spec.os.is_empty() || spec.os.iter().any(|o| os_matches(o, host_os)))
        .cloned()
        .collect();

    let eligible = os_supported && missing_bins.is_empty() && missing_any_bins.is_empty();
    if !eligible {
        tracing::debug!(
            host_os,
            os_supported,
            missing = missing_bins.len() + missing_any_bins.len(),
            "skill requirements not met"
        );
    }

    SkillEligibility {
        eligible,
        os_supported,
        missing_bins,
        missing_any_bins,
        install_options,
    }
}
