//! Team name → slug transform

/// Convert a team display name into a URL-safe slug
///
/// `/` becomes `-`, `&` becomes `and`, any character that is not
/// alphanumeric, `_`, whitespace or `-` is dropped, and runs of
/// whitespace/`-` collapse into a single `-` with no leading or trailing
/// dash. The result is lowercase.
///
/// Pathological input (only punctuation) yields an empty string.
///
/// # Examples
/// - `"CI/CD Platform Team"` → `"ci-cd-platform-team"`
/// - `"Data & Analytics Team"` → `"data-and-analytics-team"`
#[must_use]
pub fn slugify(name: &str) -> String {
    let expanded = name.replace('/', "-").replace('&', "and");

    let mut slug = String::with_capacity(expanded.len());
    let mut pending_dash = false;

    for c in expanded.chars() {
        if c.is_whitespace() || c == '-' {
            pending_dash = true;
            continue;
        }
        for lower in c.to_lowercase() {
            if lower.is_alphanumeric() || lower == '_' {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push(lower);
            }
        }
    }

    slug
}
