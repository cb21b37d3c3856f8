//! Effective configuration: CLI flags > environment > config files > defaults.

use std::path::PathBuf;

use lexgenre_core::ClassifierConfig;
use lexgenre_core::config_file::{ConfigFile, DisplaySection, LayoutSection, RunSection, merge};
use lexgenre_layout::{LayoutConfig, LayoutConfigBuilder};
use lexgenre_reporting::DEFAULT_SPLIT_YEAR;

pub const DEFAULT_OUTPUT_DIR: &str = "lexgenre-reports";

fn parse_bool(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Config overlay built from `LEXGENRE_*` variables (and `NO_COLOR`).
/// Unparseable values are ignored.
pub fn env_overlay(get: impl Fn(&str) -> Option<String>) -> ConfigFile {
    let carry_separator = get("LEXGENRE_CARRY_SEPARATOR").and_then(|v| parse_bool(&v));
    let num_workers = get("LEXGENRE_NUM_WORKERS").and_then(|v| v.trim().parse().ok());
    let split_year = get("LEXGENRE_SPLIT_YEAR").and_then(|v| v.trim().parse().ok());
    let output_dir = get("LEXGENRE_OUTPUT_DIR").filter(|v| !v.trim().is_empty());
    let color = get("NO_COLOR")
        .filter(|v| !v.is_empty())
        .map(|_| false)
        .or_else(|| get("LEXGENRE_COLOR").and_then(|v| parse_bool(&v)));

    ConfigFile {
        layout: Some(LayoutSection {
            carry_separator,
            ..Default::default()
        }),
        run: Some(RunSection {
            output_dir,
            num_workers,
            split_year,
        }),
        display: Some(DisplaySection { color }),
        ..Default::default()
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub carry_separator: bool,
    pub no_color: bool,
    pub num_workers: Option<usize>,
    pub output_dir: Option<PathBuf>,
    pub split_year: Option<i32>,
}

impl CliOverrides {
    /// Flags only override when given; an absent switch leaves lower layers alone.
    pub fn overlay(&self) -> ConfigFile {
        ConfigFile {
            layout: Some(LayoutSection {
                carry_separator: self.carry_separator.then_some(true),
                ..Default::default()
            }),
            run: Some(RunSection {
                output_dir: self.output_dir.as_ref().map(|p| p.display().to_string()),
                num_workers: self.num_workers,
                split_year: self.split_year,
            }),
            display: Some(DisplaySection {
                color: self.no_color.then_some(false),
            }),
            ..Default::default()
        }
    }
}

pub fn layered(file: ConfigFile, env: ConfigFile, cli: ConfigFile) -> ConfigFile {
    merge(merge(file, env), cli)
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub layout: LayoutConfig,
    pub classifier: ClassifierConfig,
    pub output_dir: PathBuf,
    pub num_workers: usize,
    pub split_year: i32,
    pub color: bool,
}

impl Settings {
    pub fn from_config(config: &ConfigFile) -> anyhow::Result<Self> {
        let layout = LayoutConfigBuilder::from_config_file(config).build()?;
        let run = config.run.clone().unwrap_or_default();
        let default_workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);

        Ok(Self {
            layout,
            classifier: config.classifier_config(),
            output_dir: run
                .output_dir
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            num_workers: run.num_workers.unwrap_or(default_workers).max(1),
            split_year: run.split_year.unwrap_or(DEFAULT_SPLIT_YEAR),
            color: config
                .display
                .as_ref()
                .and_then(|d| d.color)
                .unwrap_or(true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexgenre_core::config_file::ClassifierSection;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: Vec<(String, String)> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| {
            vars.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        }
    }

    #[test]
    fn defaults_without_any_layer() {
        let s = Settings::from_config(&ConfigFile::default()).unwrap();
        assert_eq!(s.split_year, 2005);
        assert_eq!(s.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert!(s.color);
        assert!(!s.layout.carry_separator());
        assert_eq!(s.classifier, ClassifierConfig::default());
    }

    #[test]
    fn env_overrides_file_and_cli_overrides_env() {
        let file = ConfigFile {
            run: Some(RunSection {
                num_workers: Some(2),
                split_year: Some(2000),
                output_dir: Some("from-file".into()),
            }),
            classifier: Some(ClassifierSection {
                max_misc_pages: Some(5),
                ..Default::default()
            }),
            ..Default::default()
        };
        let env = env_overlay(env(&[
            ("LEXGENRE_NUM_WORKERS", "6"),
            ("LEXGENRE_SPLIT_YEAR", "2003"),
        ]));
        let cli = CliOverrides {
            split_year: Some(2010),
            ..Default::default()
        };

        let s = Settings::from_config(&layered(file, env, cli.overlay())).unwrap();
        assert_eq!(s.num_workers, 6);
        assert_eq!(s.split_year, 2010);
        assert_eq!(s.output_dir, PathBuf::from("from-file"));
        assert_eq!(s.classifier.max_misc_pages, 5);
    }

    #[test]
    fn absent_switches_do_not_override() {
        let file = ConfigFile {
            layout: Some(LayoutSection {
                carry_separator: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };
        let s = Settings::from_config(&layered(
            file,
            ConfigFile::default(),
            CliOverrides::default().overlay(),
        ))
        .unwrap();
        assert!(s.layout.carry_separator());
        assert!(s.color);
    }

    #[test]
    fn no_color_env_and_bool_parsing() {
        let overlay = env_overlay(env(&[("NO_COLOR", "1"), ("LEXGENRE_CARRY_SEPARATOR", "yes")]));
        assert_eq!(overlay.display.unwrap().color, Some(false));
        assert_eq!(overlay.layout.unwrap().carry_separator, Some(true));

        let overlay = env_overlay(env(&[("LEXGENRE_NUM_WORKERS", "many")]));
        assert_eq!(overlay.run.unwrap().num_workers, None);
    }

    #[test]
    fn invalid_layout_values_are_rejected() {
        let file = ConfigFile {
            layout: Some(LayoutSection {
                band_min: Some(0.9),
                band_max: Some(0.1),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(Settings::from_config(&file).is_err());
    }
}
