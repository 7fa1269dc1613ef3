use std::sync::LazyLock;

use regex::{Captures, Match, Regex};

use super::{PreRelease, Version, VersionError};

/// Capture groups: major, minor, patch, pre-release token, build token.
///
/// The stage alternation must end on a word boundary so `1.0.0-build` is not
/// read as a `b` (beta) shorthand. The build token is dot or dash separated
/// alphanumerics, so trailing punctuation and quotes stay outside the match.
static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)(\d+)\.(\d+)\.(\d+)(?:-((?:dev|beta|b|alpha|a|rc)(?:\.?\d+)?)\b)?(?:\+([0-9A-Za-z]+(?:[.-][0-9A-Za-z]+)*))?"#,
    )
    .expect("version grammar must compile")
});

pub(super) fn parse(text: &str) -> Result<Version, VersionError> {
    let captures = VERSION_PATTERN
        .captures(text)
        .ok_or_else(|| parse_error(text))?;
    from_captures(&captures, text)
}

/// Locate the first version-shaped substring in `text`.
pub(crate) fn find_version(text: &str) -> Option<Match<'_>> {
    VERSION_PATTERN.find(text)
}

/// Split `rc.2` / `beta4` / `b` into the label and its trailing digits.
pub(super) fn split_pre_token(token: &str) -> (&str, Option<&str>) {
    let label_end = token.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    if label_end == token.len() {
        return (token, None);
    }
    let label = token[..label_end].strip_suffix('.').unwrap_or(&token[..label_end]);
    if label.is_empty() {
        return (token, None);
    }
    (label, Some(&token[label_end..]))
}

fn from_captures(captures: &Captures<'_>, text: &str) -> Result<Version, VersionError> {
    let number = |index: usize| -> Result<u64, VersionError> {
        captures[index].parse::<u64>().map_err(|_| parse_error(text))
    };
    let mut version = Version::new(number(1)?, number(2)?, number(3)?);

    if let Some(token) = captures.get(4) {
        let token = token.as_str().to_ascii_lowercase();
        let (label, digits) = split_pre_token(&token);
        let counter = match digits {
            Some(digits) => digits.parse::<u64>().map_err(|_| parse_error(text))?,
            None => 1,
        };
        version = version.with_pre(PreRelease::from_label(label), counter);
    }

    if let Some(token) = captures.get(5) {
        version = version.with_build(leading_number(token.as_str()).map_err(|_| parse_error(text))?);
    }
    Ok(version)
}

/// Coerce a build token to its leading digits; no digits means absent.
fn leading_number(token: &str) -> Result<u64, std::num::ParseIntError> {
    let digits_end = token
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(token.len());
    if digits_end == 0 {
        return Ok(0);
    }
    token[..digits_end].parse()
}

fn parse_error(text: &str) -> VersionError {
    VersionError::Parse {
        input: text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::Stage;

    #[test]
    fn accepts_dotted_and_concatenated_counters() {
        let dotted = parse("1.0.0-rc.2").unwrap();
        let joined = parse("1.0.0-RC2").unwrap();
        assert_eq!(dotted, joined);
        assert_eq!(dotted.pre(), &PreRelease::Stage(Stage::Rc));
        assert_eq!(dotted.pre_counter(), 2);
    }

    #[test]
    fn defaults_counter_to_one() {
        let version = parse("3.1.4-alpha").unwrap();
        assert_eq!(version.pre_counter(), 1);
    }

    #[test]
    fn coerces_build_to_leading_digits() {
        assert_eq!(parse("1.0.0+42abc").unwrap().build(), 42);
        assert_eq!(parse("1.0.0+sha.deadbeef").unwrap().build(), 0);
    }

    #[test]
    fn build_token_stops_before_punctuation() {
        assert_eq!(find_version("(v1.0.0+7)").unwrap().as_str(), "1.0.0+7");
        assert_eq!(find_version("v1.0.0+12, daily").unwrap().as_str(), "1.0.0+12");
        assert_eq!(find_version("1.0.0+3.abc-1; see").unwrap().as_str(), "1.0.0+3.abc-1");
        assert_eq!(find_version("'1.0.0+5'").unwrap().as_str(), "1.0.0+5");
    }

    #[test]
    fn ignores_unknown_stage_suffix() {
        let version = parse("1.0.0-build").unwrap();
        assert_eq!(version.pre(), &PreRelease::None);
        assert_eq!(find_version("v1.0.0-build").unwrap().as_str(), "1.0.0");
    }

    #[test]
    fn finds_version_after_prefix() {
        let found = find_version(" * Library v1.0.0-b2 (c) 2016").unwrap();
        assert_eq!(found.as_str(), "1.0.0-b2");
        assert_eq!(parse(found.as_str()).unwrap().to_string(), "1.0.0-beta2");
    }

    #[test]
    fn build_stops_at_quote() {
        let found = find_version("'version' => '1.0.0+5',").unwrap();
        assert_eq!(found.as_str(), "1.0.0+5");
    }

    #[test]
    fn rejects_overflowing_numbers() {
        assert!(parse("99999999999999999999.0.0").is_err());
    }

    #[test]
    fn splits_pre_tokens() {
        assert_eq!(split_pre_token("rc.2"), ("rc", Some("2")));
        assert_eq!(split_pre_token("beta"), ("beta", None));
        assert_eq!(split_pre_token("7"), ("7", None));
    }
}
