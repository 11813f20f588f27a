use crate::{
    error::{Error, Result},
    frontmatter::{get_frontmatter_value, parse_header, split_frontmatter},
    metadata::parse_jovis_metadata,
    types::{Frontmatter, SkillContent},
};

/// Validate a skill name: lowercase ASCII alphanumerics and single hyphens, 1-64 chars.
pub fn validate_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 64
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !name.starts_with('-')
        && !name.ends_with('-')
        && !name.contains("--")
}

/// Parse a skill document without validation.
///
/// A document without a complete header yields an empty frontmatter and the
/// whole text as body.
pub fn parse_skill_document(content: &str) -> SkillContent {
    match split_frontmatter(content) {
        Some((header, body)) => build(parse_header(header), body),
        None => SkillContent {
            frontmatter: Frontmatter::new(),
            metadata: None,
            body: content.to_string(),
        },
    }
}

/// Parse a skill document for publishing: the header must be present and
/// carry a valid `name`.
pub fn parse_skill(content: &str) -> Result<SkillContent> {
    let Some((header, body)) = split_frontmatter(content) else {
        return Err(if opens_header(content) {
            Error::UnterminatedFrontmatter
        } else {
            Error::MissingFrontmatter
        });
    };

    let frontmatter = parse_header(header);
    let name = get_frontmatter_value(&frontmatter, "name").ok_or(Error::MissingField("name"))?;
    if !validate_name(name) {
        return Err(Error::InvalidName(name.to_string()));
    }
    Ok(build(frontmatter, body))
}

fn build(frontmatter: Frontmatter, body: &str) -> SkillContent {
    SkillContent {
        metadata: parse_jovis_metadata(&frontmatter),
        frontmatter,
        body: body.trim_start_matches(['\r', '\n']).to_string(),
    }
}

fn opens_header(content: &str) -> bool {
    content
        .lines()
        .next()
        .is_some_and(|line| line.trim_end() == "---")
}
