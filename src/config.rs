use crate::options::{ALL_SITES, Request, Selection};
use crate::utils::join_under;
use anyhow::{Context, Result};
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "gamp_GOOD.cfg";

const HEADER: &str = "# GAMP II - GOOD (Gnss Observations and prOducts Downloader) options, vers. 2.0";
const SECTION_WIDTH: usize = 80;
const KEY_WIDTH: usize = 18;
const VALUE_WIDTH: usize = 29;

/// Sub-directories relative to the main directory (flag 0).
const SUB_DIRS: &[(&str, &str, &str)] = &[
    ("obsDir", "obs", "The sub-directory of RINEX format observation files"),
    ("navDir", "nav", "The sub-directory of RINEX format broadcast ephemeris files"),
    ("orbDir", "orb", "The sub-directory of SP3 format precise ephemeris files"),
    ("clkDir", "clk", "The sub-directory of RINEX format precise clock files"),
    (
        "eopDir",
        "eop",
        "The sub-directory of earth rotation/orientation parameter (EOP) files",
    ),
    (
        "obxDir",
        "obx",
        "The sub-directory of MGEX final/rapid and/or CNES real-time ORBEX (ORBit EXchange format) files",
    ),
    (
        "biaDir",
        "bia",
        "The sub-directory of CODE/MGEX DCB/DSB, MGEX OSB, and/or CNES real-time OSB files",
    ),
    ("snxDir", "snx", "The sub-directory of SINEX format IGS weekly solution files"),
    (
        "ionDir",
        "ion",
        "The sub-directory of CODE/IGS global ionosphere map (GIM) files",
    ),
    ("ztdDir", "ztd", "The sub-directory of CODE/IGS tropospheric product files"),
    (
        "tblDir",
        "tables",
        "The sub-directory of table files (i.e., ANTEX, ocean tide loading files, etc.) for processing",
    ),
];

/// Path of the configuration file under the main directory.
pub fn config_path(main_dir: &str, sep: char) -> String {
    join_under(main_dir, sep, CONFIG_FILE_NAME)
}

/// The configuration file consumed by the GOOD downloader, one entry per line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigDocument {
    lines: Vec<String>,
}

impl ConfigDocument {
    pub fn render(request: &Request, sep: char) -> Self {
        let main_dir = request.main_dir.as_str();
        let mut doc = Self::default();

        doc.push(HEADER);
        doc.blank();
        doc.section("The directories of GNSS observations and products");
        doc.entry(
            "mainDir",
            main_dir,
            "The root/main directory of GNSS observations and products",
        );
        for (key, dir, comment) in SUB_DIRS {
            doc.entry(&format!("  {}", key), &format!("0  {}", dir), comment);
        }

        doc.blank();
        doc.section("The directory of log files");
        let log_file = join_under(&join_under(main_dir, sep, "log"), sep, "log.txt");
        doc.entry(
            "logFile",
            &format!("1  {}", log_file),
            "The log file with full path that gives the indications of whether the data downloading is successful or not",
        );

        doc.blank();
        doc.section("The directory of third-party softwares");
        doc.entry(
            "3partyDir",
            &format!("1  {}", join_under(main_dir, sep, "thirdParty")),
            "(optional) The directory where third-party softwares (i.e., 'wget', 'gzip', 'crx2rnx' etc) are stored",
        );

        if let Some(time) = &request.time {
            doc.blank();
            doc.section("Time settings");
            doc.entry(
                "procTime",
                &format!("2  {}  {}  {}", time.year, time.doy, time.ndays),
                "The setting of start time for processing",
            );

            doc.blank();
            doc.section("Settings of FTP downloading");
            doc.entry(
                "minusAdd1day",
                "1",
                "The setting of the day before and after the current day for precise satellite orbit and clock products downloading",
            );
            doc.entry(
                "printInfoWget",
                "1",
                "Printing the information generated by 'wget'",
            );
        }

        for selection in &request.selections {
            let group = selection.group;
            if let Some(title) = group.section {
                doc.blank();
                doc.section(title);
            }
            let key = if group.indent {
                format!("  {}", group.key)
            } else {
                group.key.to_string()
            };
            doc.entry(&key, &selection_value(selection, main_dir, sep), group.comment);
        }

        doc
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[cfg(test)]
    /// Value of the first line with the given key: the text between `=` and
    /// the `%` comment marker.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.lines.iter().find_map(|line| {
            if line.starts_with('#') {
                return None;
            }
            let (k, rest) = line.split_once('=')?;
            if k.trim() != key {
                return None;
            }
            rest.split('%').next().map(str::trim)
        })
    }

    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for line in self.lines() {
            text.push_str(line);
            text.push('\n');
        }
        text
    }

    /// Writes the whole document at once, replacing any existing file.
    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_text())
            .with_context(|| format!("Failed to write configuration file '{}'", path.display()))
    }

    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn section(&mut self, title: &str) {
        let fill = SECTION_WIDTH.saturating_sub(title.len() + 3).max(3);
        self.push(format!("# {} {}", title, "-".repeat(fill)));
    }

    fn entry(&mut self, key: &str, value: &str, comment: &str) {
        let width = VALUE_WIDTH.max(value.len() + 1);
        self.push(format!(
            "{:<kw$}= {:<width$}% {}",
            key,
            value,
            comment,
            kw = KEY_WIDTH,
            width = width
        ));
    }
}

fn selection_value(selection: &Selection, main_dir: &str, sep: char) -> String {
    let mut fields = vec!["1".to_string()];
    for (i, value) in selection.values.iter().enumerate() {
        if selection.group.site_list == Some(i) && value != ALL_SITES {
            fields.push(join_under(main_dir, sep, value));
        } else {
            fields.push(value.clone());
        }
    }
    fields.join("  ")
}

/// Values the downloader would cut short: `%` starts the trailing comment,
/// and the value is taken from after the last `=` on the line.
pub fn truncated_values(request: &Request) -> Vec<&str> {
    std::iter::once(request.main_dir.as_str())
        .chain(request.time.iter().flat_map(|t| {
            [t.year.as_str(), t.doy.as_str(), t.ndays.as_str()]
        }))
        .chain(
            request
                .selections
                .iter()
                .flat_map(|s| s.values.iter().map(String::as_str)),
        )
        .filter(|v| v.contains(['%', '=']))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::parse;

    fn render(line: &str, sep: char) -> ConfigDocument {
        let tokens: Vec<String> = line.split_whitespace().map(String::from).collect();
        ConfigDocument::render(&parse(&tokens).unwrap(), sep)
    }

    #[test]
    fn test_minimal_document() {
        let doc = render("-dir_main /data -time 2022 32 3 -ftp cddis", '/');
        assert_eq!(doc.lines()[0], HEADER);
        assert_eq!(doc.value("mainDir"), Some("/data"));
        assert_eq!(doc.value("procTime"), Some("2  2022  32  3"));
        assert_eq!(doc.value("ftpDownloading"), Some("1  cddis"));
        assert_eq!(doc.value("obsDir"), Some("0  obs"));
        assert_eq!(doc.value("tblDir"), Some("0  tables"));
        assert_eq!(doc.value("logFile"), Some("1  /data/log/log.txt"));
        assert_eq!(doc.value("3partyDir"), Some("1  /data/thirdParty"));
        assert_eq!(doc.value("minusAdd1day"), Some("1"));
        assert_eq!(doc.value("printInfoWget"), Some("1"));
        assert_eq!(doc.value("getObs"), None);
    }

    #[test]
    fn test_obs_all_sites() {
        let doc = render(
            r"-dir_main D:\data -time 2022 32 3 -ftp cddis -obs daily igs all 0 24",
            '\\',
        );
        assert_eq!(doc.value("getObs"), Some("1  daily  igs  all  0  24"));
        assert!(doc.to_text().contains("daily  igs  all  0  24"));
    }

    #[test]
    fn test_site_lists_resolve_under_main_dir() {
        let doc = render(
            "-dir_main /data -obs hourly mgex site_igs.list 1 3 -trop igs site.list",
            '/',
        );
        assert_eq!(
            doc.value("getObs"),
            Some("1  hourly  mgex  /data/site_igs.list  1  3")
        );
        assert_eq!(doc.value("getTrp"), Some("1  igs  /data/site.list"));

        let doc = render(r"-dir_main D:\data -trop cod all", '\\');
        assert_eq!(doc.value("getTrp"), Some("1  cod  all"));
        assert_eq!(doc.value("logFile"), Some(r"1  D:\data\log\log.txt"));
    }

    #[test]
    fn test_presence_only_lines() {
        let doc = render("-dir_main /data -atx -snx -roti -snx", '/');
        for key in ["getSnx", "getRoti", "getAtx"] {
            let count = doc
                .lines()
                .iter()
                .filter(|l| l.trim_start().starts_with(key))
                .count();
            assert_eq!(count, 1, "{key}");
            assert_eq!(doc.value(key), Some("1"));
        }
    }

    #[test]
    fn test_groups_follow_declaration_order() {
        let doc = render(
            "-dir_main /data -time 2022 32 3 -atx -ion all -osb cod_m -nav daily mixed3 igs 0 24 -ftp whu",
            '/',
        );
        let keys: Vec<&str> = doc
            .lines()
            .iter()
            .filter_map(|l| l.split_once('=').map(|(k, _)| k.trim()))
            .filter(|k| k.starts_with("get") || *k == "ftpDownloading")
            .collect();
        assert_eq!(keys, vec!["ftpDownloading", "getNav", "getOsb", "getIon", "getAtx"]);
        assert_eq!(doc.value("getNav"), Some("1  daily  mixed3  igs  0  24"));
    }

    #[test]
    fn test_no_time_block_without_time() {
        let doc = render("-dir_main /data -ftp whu", '/');
        assert_eq!(doc.value("procTime"), None);
        assert_eq!(doc.value("minusAdd1day"), None);
        assert_eq!(doc.value("ftpDownloading"), Some("1  whu"));
    }

    #[test]
    fn test_entry_keeps_comment_separated() {
        let long_dir = "/a/very/long/main/directory/that/overflows/the/column";
        let doc = render(&format!("-dir_main {}", long_dir), '/');
        let line = doc.lines().iter().find(|l| l.starts_with("mainDir")).unwrap();
        assert!(line.contains(&format!("{} %", long_dir)));
        assert_eq!(doc.value("mainDir"), Some(long_dir));
    }

    #[test]
    fn test_section_headers() {
        let doc = render("-dir_main /data -ftp whu", '/');
        let header = doc
            .lines()
            .iter()
            .find(|l| l.starts_with("# Handling of FTP downloading"))
            .unwrap();
        assert_eq!(header.len(), SECTION_WIDTH);
        assert!(header.ends_with("---"));
    }

    #[test]
    fn test_truncated_values() {
        let tokens: Vec<String> = "-dir_main /data/a=b -time 2022 32 3 -ion 50% -dsb cod"
            .split_whitespace()
            .map(String::from)
            .collect();
        let req = parse(&tokens).unwrap();
        assert_eq!(truncated_values(&req), vec!["/data/a=b", "50%"]);
    }

    #[test]
    fn test_write_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "stale").unwrap();

        let doc = render("-dir_main /data -time 2022 32 3 -ftp cddis", '/');
        doc.write(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, doc.to_text());
        assert!(!written.contains("stale"));
        assert!(written.ends_with('\n'));
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join(CONFIG_FILE_NAME);
        let doc = render("-dir_main /data", '/');
        assert!(doc.write(&path).is_err());
    }

    #[test]
    fn test_config_path() {
        assert_eq!(config_path("/data", '/'), "/data/gamp_GOOD.cfg");
        assert_eq!(config_path(r"D:\data", '\\'), r"D:\data\gamp_GOOD.cfg");
    }
}
