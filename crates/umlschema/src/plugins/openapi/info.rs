//! `info` section
//!
//! The package documentation doubles as API metadata: its first line holds
//! the version after a colon (`version: 1.2`, `v1.2:notes`), its second line
//! the description. Anything else in the text is ignored, and missing or
//! malformed documentation yields empty strings.

use tracing::trace;

use super::document::Info;
use crate::core::ExportConfig;

/// Build the `info` object for a package
pub fn build_info(title: &str, documentation: Option<&str>, config: &ExportConfig) -> Info {
    let mut lines = documentation.unwrap_or_default().split('\n');
    let version = lines.next().map(parse_version).unwrap_or_default();
    let description = lines
        .next()
        .map(|line| {
            format!(
                "{}{}{}",
                line.trim_end_matches('\r'),
                config.description_separator,
                config.description_message
            )
        })
        .unwrap_or_default();

    trace!(title, version = %version, "Built info");
    Info {
        description,
        title: title.to_string(),
        version,
    }
}

/// Version from the first documentation line
///
/// Splits at the first colon. A `version:` label yields the remainder, a
/// `v`-prefixed head (`v1.2:notes`) yields the head without the `v`, and any
/// other head yields the remainder. No colon means no version.
pub fn parse_version(line: &str) -> String {
    let Some((head, tail)) = line.split_once(':') else {
        return String::new();
    };
    let head = head.trim();

    if head.eq_ignore_ascii_case("version") {
        return tail.trim().to_string();
    }

    let mut chars = head.chars();
    if let (Some('v' | 'V'), Some(next)) = (chars.next(), chars.clone().next()) {
        if next.is_ascii_digit() {
            return chars.as_str().to_string();
        }
    }

    tail.trim().to_string()
}
