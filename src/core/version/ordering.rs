// ─── Version Ordering ───
// Manifest ids are not always strict semver ("1.0", "v2.3.1-rc"), so parsing
// pads missing components and falls back to numeric comparison.

use std::cmp::Ordering;

use semver::Version;

/// Parse a version id, padding `1` / `1.2` to `1.0.0` / `1.2.0`.
pub fn parse_version(id: &str) -> Option<Version> {
    let trimmed = id.trim();
    let trimmed = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);

    if let Ok(version) = Version::parse(trimmed) {
        return Some(version);
    }

    let split_at = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
    let (core, suffix) = trimmed.split_at(split_at);
    let components = core.split('.').count();
    if components >= 3 || core.is_empty() {
        return None;
    }

    let padding = ".0".repeat(3 - components);
    Version::parse(&format!("{core}{padding}{suffix}")).ok()
}

/// Whether the id carries a pre-release tag (`1.2.0-beta`).
pub fn is_prerelease(id: &str) -> bool {
    parse_version(id).is_some_and(|v| !v.pre.is_empty())
}

/// Total order over version ids, semver where possible.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (parse_version(a), parse_version(b)) {
        (Some(left), Some(right)) => left.cmp(&right),
        _ => version_sort_key(a)
            .cmp(&version_sort_key(b))
            .then_with(|| a.cmp(b)),
    }
}

fn version_sort_key(version: &str) -> Vec<u64> {
    version
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<u64>().unwrap_or(0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_ids_are_padded() {
        assert_eq!(parse_version("1.2"), Some(Version::new(1, 2, 0)));
        assert_eq!(parse_version("3"), Some(Version::new(3, 0, 0)));
        assert_eq!(parse_version("v0.5.1"), Some(Version::new(0, 5, 1)));
        assert_eq!(parse_version("1.0-beta").unwrap().pre.as_str(), "beta");
    }

    #[test]
    fn garbage_does_not_parse() {
        assert!(parse_version("latest").is_none());
        assert!(parse_version("").is_none());
    }

    #[test]
    fn ordering_is_numeric_not_lexical() {
        assert_eq!(compare_versions("1.10", "1.9"), Ordering::Greater);
        assert_eq!(compare_versions("1.0", "1.0.0"), Ordering::Equal);
        assert_eq!(compare_versions("2.0.0-rc.1", "2.0.0"), Ordering::Less);
    }

    #[test]
    fn unparseable_ids_fall_back_to_components() {
        assert_eq!(compare_versions("build 12", "build 9"), Ordering::Greater);
    }

    #[test]
    fn prerelease_detection() {
        assert!(is_prerelease("0.6.0-alpha"));
        assert!(!is_prerelease("0.6.0"));
        assert!(!is_prerelease("nightly"));
    }
}
