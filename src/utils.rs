use chrono::{Days, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

static DIAGNOSTIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\*{3}\s*(ERROR|WARNING)\b").expect("Invalid regex"));

/// What kind of message a line printed by the downloader carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Error,
    Warning,
    Plain,
}

/// Path separator used in the generated configuration for the given OS name
/// (as reported by `std::env::consts::OS`).
pub fn path_separator(os: &str) -> char {
    if os.eq_ignore_ascii_case("windows") {
        '\\'
    } else {
        '/'
    }
}

pub fn executable_suffix(os: &str) -> &'static str {
    if os.eq_ignore_ascii_case("windows") {
        ".exe"
    } else {
        ""
    }
}

/// Joins `name` under `dir` with an explicit separator. The downloader reads
/// these paths verbatim, so no normalisation happens here.
pub fn join_under(dir: &str, sep: char, name: &str) -> String {
    format!("{}{}{}", dir, sep, name)
}

/// A token looks like a flag when its first character is `-`.
pub fn is_flag_like(token: &str) -> bool {
    token.starts_with('-')
}

pub fn classify_line(line: &str) -> LineKind {
    match DIAGNOSTIC_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
    {
        Some("ERROR") => LineKind::Error,
        Some("WARNING") => LineKind::Warning,
        _ => LineKind::Plain,
    }
}

/// Human-readable calendar span for `-time <year> <doy> <ndays>`.
///
/// Returns `None` when the tokens are not a valid date; the values are still
/// forwarded to the downloader as given.
pub fn describe_time_span(year: &str, doy: &str, ndays: &str) -> Option<String> {
    let year: i32 = year.parse().ok()?;
    let doy: u32 = doy.parse().ok()?;
    let ndays: u64 = ndays.parse().ok()?;
    if ndays == 0 {
        return None;
    }

    let start = NaiveDate::from_yo_opt(year, doy)?;
    let end = start.checked_add_days(Days::new(ndays - 1))?;

    if ndays == 1 {
        Some(format!("{} (1 day)", start.format("%Y-%m-%d")))
    } else {
        Some(format!(
            "{} .. {} ({} days)",
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d"),
            ndays
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_separator() {
        assert_eq!(path_separator("windows"), '\\');
        assert_eq!(path_separator("linux"), '/');
        assert_eq!(path_separator("macos"), '/');
        assert_eq!(path_separator("freebsd"), '/');
    }

    #[test]
    fn test_executable_suffix() {
        assert_eq!(executable_suffix("windows"), ".exe");
        assert_eq!(executable_suffix("linux"), "");
    }

    #[test]
    fn test_join_under() {
        assert_eq!(join_under("/data", '/', "site.list"), "/data/site.list");
        assert_eq!(join_under(r"D:\data", '\\', "site.list"), r"D:\data\site.list");
    }

    #[test]
    fn test_is_flag_like() {
        assert!(is_flag_like("-obs"));
        assert!(is_flag_like("-1"));
        assert!(!is_flag_like("igs"));
        assert!(!is_flag_like(""));
    }

    #[test]
    fn test_classify_line() {
        assert_eq!(
            classify_line("*** ERROR(PreProcess::ReadCfgFile): open configure file FAILED!"),
            LineKind::Error
        );
        assert_eq!(classify_line("  *** WARNING: file missing"), LineKind::Warning);
        assert_eq!(classify_line("downloading brdm0320.22p.gz"), LineKind::Plain);
        assert_eq!(classify_line("*** ERRORS"), LineKind::Plain);
    }

    #[test]
    fn test_describe_time_span() {
        assert_eq!(
            describe_time_span("2022", "32", "3").as_deref(),
            Some("2022-02-01 .. 2022-02-03 (3 days)")
        );
        assert_eq!(
            describe_time_span("2024", "366", "1").as_deref(),
            Some("2024-12-31 (1 day)")
        );
        assert_eq!(describe_time_span("2022", "400", "1"), None);
        assert_eq!(describe_time_span("yyyy", "32", "3"), None);
        assert_eq!(describe_time_span("2022", "32", "0"), None);
    }
}
