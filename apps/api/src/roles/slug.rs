use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::RoleId;
use crate::roles::queries::slug_taken;

/// Lowercases, drops everything outside `[a-z0-9]`, whitespace and `-`,
/// then turns whitespace runs and dash runs into a single `-`.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    for c in input.to_lowercase().trim().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
        } else if (c == '-' || c.is_whitespace()) && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug
}

/// `roles.slug` is `VARCHAR(50)`.
const SLUG_MAX: usize = 50;

/// `base`, then `base-2`, `base-3`, ... The base is shortened so the
/// candidate always fits in `SLUG_MAX`.
pub fn slug_candidate(base: &str, attempt: u32) -> String {
    let suffix = if attempt <= 1 {
        String::new()
    } else {
        format!("-{attempt}")
    };
    let room = SLUG_MAX.saturating_sub(suffix.len());
    // Slugs are ASCII, so byte and char boundaries agree.
    let stem = base[..base.len().min(room)].trim_end_matches('-');
    format!("{stem}{suffix}")
}

/// First free slug derived from `name`. `exclude` is the role being renamed,
/// so a role never collides with its own current slug.
pub async fn ensure_unique_slug(
    pool: &PgPool,
    name: &str,
    exclude: Option<RoleId>,
) -> Result<String, AppError> {
    let mut base = slugify(name);
    if base.is_empty() {
        base = "role".to_string();
    }

    let mut attempt = 1;
    loop {
        let candidate = slug_candidate(&base, attempt);
        if !slug_taken(pool, &candidate, exclude).await? {
            return Ok(candidate);
        }
        attempt += 1;
    }
}
