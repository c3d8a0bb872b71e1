pub mod installed;
pub mod latest;

use once_cell::sync::Lazy;
use regex::Regex;

static VERSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+\.\d+\.\d+(?:[-+][0-9A-Za-z.-]+)?)").expect("invalid version regex")
});

/// Pull the first semantic version out of arbitrary command output,
/// discarding banners and build annotations around it. The match is
/// validated with a semver parse so near-misses like section numbers in
/// help text are rejected.
pub fn extract_version(text: &str) -> Option<String> {
    let captures = VERSION_RE.captures(text.trim())?;
    let matched = captures.get(1)?.as_str();
    semver::Version::parse(matched).ok()?;
    Some(matched.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_version_from_banner() {
        assert_eq!(
            extract_version("claude 2.3.1 (build 7f2a)").as_deref(),
            Some("2.3.1")
        );
        assert_eq!(extract_version("v1.0.17").as_deref(), Some("1.0.17"));
    }

    #[test]
    fn extraction_is_idempotent_on_bare_versions() {
        for version in ["2.3.1", "0.13.0-preview.2", "1.2.3-beta.1"] {
            let first = extract_version(version).unwrap();
            assert_eq!(first, version);
            assert_eq!(extract_version(&first).as_deref(), Some(version));
        }
    }

    #[test]
    fn keeps_prerelease_suffix() {
        assert_eq!(
            extract_version("gemini 0.13.0-preview.2\n").as_deref(),
            Some("0.13.0-preview.2")
        );
    }

    #[test]
    fn rejects_text_without_a_version() {
        assert_eq!(extract_version("usage: claude [options]"), None);
        assert_eq!(extract_version(""), None);
    }
}
