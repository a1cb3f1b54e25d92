use std::fmt::Write;

use sha2::{Digest, Sha256};

const MAX_SLUG_LEN: usize = 60;

/// Deterministic, filesystem-safe name: `{slug(title)}--{hash8(url)}.md`.
///
/// The same url always maps to the same file, so re-scraping a page overwrites it.
pub fn document_filename(title: Option<&str>, url: &str) -> String {
    let slug = slugify(title.unwrap_or_default());
    let slug = if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    };
    format!("{slug}--{}.md", url_hash(url))
}

/// First level-one or level-two markdown heading, if any.
pub fn title_from_markdown(markdown: &str) -> Option<&str> {
    markdown
        .lines()
        .map(str::trim)
        .filter_map(|line| line.strip_prefix("# ").or_else(|| line.strip_prefix("## ")))
        .map(str::trim)
        .find(|title| !title.is_empty())
}

/// Lowercase ascii alphanumerics separated by single dashes.
fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len().min(MAX_SLUG_LEN));
    let mut pending_dash = false;
    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
            if slug.len() >= MAX_SLUG_LEN {
                break;
            }
        } else {
            pending_dash = true;
        }
    }
    slug
}

fn url_hash(url: &str) -> String {
    let digest = Sha256::digest(url.trim().as_bytes());
    digest.iter().take(4).fold(String::with_capacity(8), |mut hex, byte| {
        let _ = write!(hex, "{byte:02x}");
        hex
    })
}
