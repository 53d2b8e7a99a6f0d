use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tally_core::{IgnorePattern, MatchPolicy};
use tally_ingest::StatementLayout;

pub const DEFAULT_CONFIG_FILE: &str = "tally.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub files: FilesSection,
    pub statement: StatementLayout,
    pub classify: ClassifySection,
    pub log: LogSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilesSection {
    pub keywords: PathBuf,
    pub statement: PathBuf,
    /// Where the category totals are written after every calculation.
    pub report: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClassifySection {
    pub match_policy: MatchPolicySetting,
    /// Phrases whose exact token sequence marks a non-spending line.
    pub ignore: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum MatchPolicySetting {
    #[default]
    EveryMatch,
    FirstMatch,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogSection {
    /// `tracing` filter used when RUST_LOG is unset.
    pub level: String,
}

impl Default for FilesSection {
    fn default() -> Self {
        Self {
            keywords: PathBuf::from("keywords.txt"),
            statement: PathBuf::from("statement.csv"),
            report: PathBuf::from("category_totals.txt"),
        }
    }
}

impl Default for ClassifySection {
    fn default() -> Self {
        Self {
            match_policy: MatchPolicySetting::default(),
            ignore: IgnorePattern::defaults().iter().map(ToString::to_string).collect(),
        }
    }
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl From<MatchPolicySetting> for MatchPolicy {
    fn from(setting: MatchPolicySetting) -> Self {
        match setting {
            MatchPolicySetting::EveryMatch => MatchPolicy::EveryMatch,
            MatchPolicySetting::FirstMatch => MatchPolicy::FirstMatch,
        }
    }
}

impl ClassifySection {
    pub fn ignore_patterns(&self) -> Vec<IgnorePattern> {
        self.ignore
            .iter()
            .map(|phrase| IgnorePattern::from_phrase(phrase))
            .collect()
    }
}

/// Load `explicit` if given (it must exist), otherwise `tally.toml` in the
/// working directory when present, otherwise defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(p) if !p.exists() => bail!("config not found: {}", p.display()),
        Some(p) => p.to_path_buf(),
        None => {
            let p = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !p.exists() {
                return Ok(Config::default());
            }
            p
        }
    };
    let s = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    parse_config(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn parse_config(s: &str) -> Result<Config> {
    Ok(toml::from_str(s)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.files.keywords, PathBuf::from("keywords.txt"));
        assert_eq!(cfg.log.level, "warn");
        assert_eq!(
            cfg.classify.ignore,
            ["online payment thank you", "automatic payment thank you"]
        );
    }

    #[test]
    fn test_partial_sections() {
        let cfg = parse_config(
            r#"
[files]
statement = "exports/december.csv"

[statement]
has_headers = true
description_column = 2

[classify]
match_policy = "first-match"
ignore = ["payment received"]
"#,
        )
        .unwrap();

        assert_eq!(cfg.files.statement, PathBuf::from("exports/december.csv"));
        assert_eq!(cfg.files.report, PathBuf::from("category_totals.txt"));
        assert!(cfg.statement.has_headers);
        assert_eq!(cfg.statement.amount_column, 1);
        assert_eq!(MatchPolicy::from(cfg.classify.match_policy), MatchPolicy::FirstMatch);
        assert_eq!(
            cfg.classify.ignore_patterns(),
            vec![IgnorePattern::from_phrase("payment received")]
        );
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        assert!(parse_config("[classify]\nmatch_policy = \"best-match\"").is_err());
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let err = load_config(Some(Path::new("/nonexistent/tally.toml"))).unwrap_err();
        assert!(err.to_string().contains("config not found"));
    }

    #[test]
    fn test_default_config_serializes() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        assert_eq!(parse_config(&s).unwrap(), Config::default());
    }
}
