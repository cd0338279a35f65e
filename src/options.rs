use crate::utils::is_flag_like;
use std::collections::HashMap;
use thiserror::Error;

pub const DIR_MAIN: &str = "-dir_main";
pub const TIME: &str = "-time";
pub const HELP: &str = "-h";

/// A download option as it appears on the command line and in the
/// generated configuration.
#[derive(Debug, PartialEq, Eq)]
pub struct OptionGroup {
    pub flag: &'static str,
    /// Number of follow-on tokens; 0 for presence-only flags.
    pub arity: usize,
    pub key: &'static str,
    pub comment: &'static str,
    /// Index of the follow-on token naming a site list, resolved under the
    /// main directory unless it is the literal `all`.
    pub site_list: Option<usize>,
    /// Section header written before the entry, if any.
    pub section: Option<&'static str>,
    pub indent: bool,
    pub message: &'static str,
}

pub const ALL_SITES: &str = "all";

/// Every optional group, in the order the configuration lists them.
pub static GROUPS: &[OptionGroup] = &[
    OptionGroup {
        flag: "-ftp",
        arity: 1,
        key: "ftpDownloading",
        comment: "The setting of the master switch for data downloading",
        site_list: None,
        section: Some("Handling of FTP downloading"),
        indent: false,
        message: "The FTP archive is NOT given! Please check it.",
    },
    OptionGroup {
        flag: "-obs",
        arity: 5,
        key: "getObs",
        comment: "GNSS observation data downloading option",
        site_list: Some(2),
        section: None,
        indent: true,
        message: "Five items are needed for observation downloading! Please check it.",
    },
    OptionGroup {
        flag: "-nav",
        arity: 5,
        key: "getNav",
        comment: "Various broadcast ephemeris downloading option",
        site_list: None,
        section: None,
        indent: true,
        message: "Five items are needed for broadcast ephemeris downloading! Please check it.",
    },
    OptionGroup {
        flag: "-orbclk",
        arity: 3,
        key: "getOrbClk",
        comment: "Satellite final/rapid/ultra-rapid precise orbit and clock downloading option",
        site_list: None,
        section: None,
        indent: true,
        message: "Three items are needed for final/rapid/ultra-rapid precise orbit and clock downloading! Please check it.",
    },
    OptionGroup {
        flag: "-eop",
        arity: 3,
        key: "getEop",
        comment: "Earth rotation/orientation parameter (ERP/EOP) downloading option",
        site_list: None,
        section: None,
        indent: true,
        message: "Three items are needed for final/ultra-rapid earth rotation/orientation parameter (ERP/EOP) downloading! Please check it.",
    },
    OptionGroup {
        flag: "-obx",
        arity: 1,
        key: "getObx",
        comment: "ORBEX (ORBit EXchange format) for satellite attitude information downloading option",
        site_list: None,
        section: None,
        indent: true,
        message: "One item is needed for final/rapid/real-time ORBEX (ORBit EXchange format) downloading! Please check it.",
    },
    OptionGroup {
        flag: "-dsb",
        arity: 1,
        key: "getDsb",
        comment: "Differential code/signal bias (DCB/DSB) downloading option",
        site_list: None,
        section: None,
        indent: true,
        message: "One item is needed for differential code/signal bias (DCB/DSB) downloading! Please check it.",
    },
    OptionGroup {
        flag: "-osb",
        arity: 1,
        key: "getOsb",
        comment: "Observable-specific signal bias (OSB) downloading option",
        site_list: None,
        section: None,
        indent: true,
        message: "One item is needed for observable-specific signal bias (OSB) downloading! Please check it.",
    },
    OptionGroup {
        flag: "-snx",
        arity: 0,
        key: "getSnx",
        comment: "IGS weekly SINEX downloading option",
        site_list: None,
        section: None,
        indent: true,
        message: "",
    },
    OptionGroup {
        flag: "-ion",
        arity: 1,
        key: "getIon",
        comment: "Global ionosphere map (GIM) downloading option",
        site_list: None,
        section: None,
        indent: true,
        message: "One item is needed for global ionosphere map (GIM) downloading! Please check it.",
    },
    OptionGroup {
        flag: "-roti",
        arity: 0,
        key: "getRoti",
        comment: "Rate of TEC index (ROTI) downloading option",
        site_list: None,
        section: None,
        indent: true,
        message: "",
    },
    OptionGroup {
        flag: "-trop",
        arity: 2,
        key: "getTrp",
        comment: "CODE/IGS tropospheric product downloading option",
        site_list: Some(1),
        section: None,
        indent: true,
        message: "Two items are needed for tropospheric products downloading! Please check it.",
    },
    OptionGroup {
        flag: "-atx",
        arity: 0,
        key: "getAtx",
        comment: "ANTEX format antenna phase center correction downloading option",
        site_list: None,
        section: None,
        indent: true,
        message: "",
    },
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgError {
    #[error("The full path of main directory is NOT given! Please check it.")]
    MissingMainDir,
    #[error("Three items are needed for time setting! Please check it.")]
    IncompleteTime,
    #[error("{message}")]
    IncompleteGroup {
        flag: &'static str,
        message: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSetting {
    pub year: String,
    pub doy: String,
    pub ndays: String,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Selection {
    pub group: &'static OptionGroup,
    pub values: Vec<String>,
}

/// A validated download request.
#[derive(Debug, PartialEq, Eq)]
pub struct Request {
    pub main_dir: String,
    pub time: Option<TimeSetting>,
    /// Requested groups in declaration order, at most one per group.
    pub selections: Vec<Selection>,
}

impl Request {
    pub fn selection(&self, flag: &str) -> Option<&Selection> {
        self.selections.iter().find(|s| s.group.flag == flag)
    }
}

/// The follow-on tokens of one flag occurrence; `None` past the end.
type Capture<'a> = Vec<Option<&'a str>>;

fn arity_of(token: &str) -> Option<(&'static str, usize)> {
    match token {
        DIR_MAIN => Some((DIR_MAIN, 1)),
        TIME => Some((TIME, 3)),
        _ => GROUPS
            .iter()
            .find(|g| g.flag == token)
            .map(|g| (g.flag, g.arity)),
    }
}

pub fn wants_help(tokens: &[String]) -> bool {
    tokens.is_empty() || tokens.iter().any(|t| t == HELP)
}

/// Walks the tokens once, capturing the follow-on tokens of every
/// recognized flag occurrence.
fn scan(tokens: &[String]) -> HashMap<&'static str, Vec<Capture<'_>>> {
    let mut captures: HashMap<&'static str, Vec<Capture<'_>>> = HashMap::new();

    for (i, token) in tokens.iter().enumerate() {
        let Some((flag, arity)) = arity_of(token) else {
            continue;
        };
        let values = (1..=arity)
            .map(|k| tokens.get(i + k).map(String::as_str))
            .collect();
        captures.entry(flag).or_default().push(values);
    }

    captures
}

/// Validates every occurrence and keeps the last one. `Err(())` when any
/// occurrence has a missing or flag-like token.
fn resolve(occurrences: Option<&Vec<Capture<'_>>>) -> Result<Option<Vec<String>>, ()> {
    let mut last = None;
    for capture in occurrences.into_iter().flatten() {
        let values = capture
            .iter()
            .map(|v| match v {
                Some(v) if !is_flag_like(v) => Ok(v.to_string()),
                _ => Err(()),
            })
            .collect::<Result<Vec<_>, _>>()?;
        last = Some(values);
    }
    Ok(last)
}

/// Turns the raw tokens into a [`Request`], failing on the first problem in
/// declaration order: main directory, time, then each optional group.
pub fn parse(tokens: &[String]) -> Result<Request, ArgError> {
    let captures = scan(tokens);

    let main_dir = resolve(captures.get(DIR_MAIN))
        .ok()
        .flatten()
        .and_then(|mut v| v.pop())
        .ok_or(ArgError::MissingMainDir)?;

    let time = resolve(captures.get(TIME))
        .map_err(|_| ArgError::IncompleteTime)?
        .map(|v| -> Result<TimeSetting, ArgError> {
            let [year, doy, ndays]: [String; 3] =
                v.try_into().map_err(|_| ArgError::IncompleteTime)?;
            Ok(TimeSetting { year, doy, ndays })
        })
        .transpose()?;

    let mut selections = Vec::new();
    for group in GROUPS {
        let resolved = resolve(captures.get(group.flag)).map_err(|_| {
            ArgError::IncompleteGroup {
                flag: group.flag,
                message: group.message,
            }
        })?;
        if let Some(values) = resolved {
            selections.push(Selection { group, values });
        }
    }

    Ok(Request {
        main_dir,
        time,
        selections,
    })
}
