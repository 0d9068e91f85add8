use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

/// Anything outside the ASCII word set, whitespace and `-`.
fn non_word() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^0-9A-Za-z_\s-]").expect("static regex"))
}

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

/// URL-safe slug: lowercase, everything but ASCII word characters, whitespace
/// and hyphens stripped, whitespace runs replaced by a single hyphen. The
/// result is pure ASCII. Idempotent.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = non_word().replace_all(&lowered, "");
    whitespace_run()
        .replace_all(stripped.trim(), "-")
        .into_owned()
}

/// Hands out slugs unique within one parent scope.
///
/// A slug seen before gets a `-2`, `-3`, ... suffix in order of appearance.
#[derive(Debug, Default)]
pub struct SlugScope {
    seen: HashMap<String, usize>,
}

impl SlugScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, title: &str) -> String {
        let base = slugify(title);
        let mut count = self.seen.get(&base).copied().unwrap_or(0);
        if count == 0 {
            self.seen.insert(base.clone(), 1);
            return base;
        }
        loop {
            count += 1;
            let candidate = format!("{base}-{count}");
            if !self.seen.contains_key(&candidate) {
                tracing::warn!(
                    title = title,
                    slug = %base,
                    renamed = %candidate,
                    "[SLUG] Slug collision, appending suffix"
                );
                self.seen.insert(base, count);
                self.seen.insert(candidate.clone(), 1);
                return candidate;
            }
        }
    }
}
