//! Module for managing YAML configuration
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use home::home_dir;
use log::{error, info};
use serde::Deserialize;

use crate::error::{Error, Result};

// constant file name for the moment
const CONFIG_FILE: &str = "pfdd.yml";

const DEFAULT_MAX_LINE_LEN: u16 = 2048;
const DEFAULT_SYNTHESIZED_HEADER: &str = "[Adblock Plus]";

// main struct is deserialized from YAML file
#[derive(Debug, Deserialize)]
pub struct YamlConfig {
    // lines longer than this are dropped with a warning (§7)
    #[serde(default = "default_max_line_len")]
    pub max_line_len: u16,

    // header line synthesized ahead of consolidated rules when the input
    // set has more than one file (§4.6)
    #[serde(default = "default_synthesized_header")]
    pub synthesized_header: String,
}

fn default_max_line_len() -> u16 {
    DEFAULT_MAX_LINE_LEN
}

fn default_synthesized_header() -> String {
    DEFAULT_SYNTHESIZED_HEADER.to_string()
}

impl Default for YamlConfig {
    fn default() -> Self {
        YamlConfig {
            max_line_len: DEFAULT_MAX_LINE_LEN,
            synthesized_header: DEFAULT_SYNTHESIZED_HEADER.to_string(),
        }
    }
}

// load YAML data
pub fn read_yaml<P: AsRef<Path>>(path: P) -> Result<YamlConfig> {
    let p = path.as_ref();

    let file = File::open(p).map_err(|e| Error::io(e, p))?;
    let reader = BufReader::new(file);

    let config: YamlConfig = serde_yaml::from_reader(reader)?;
    Ok(config)
}

// check whether a default pfdd.yml file exists, trying the current
// directory first, then the OS-specific home directory
pub fn get_config() -> Option<PathBuf> {
    let cfg = Path::new(CONFIG_FILE);

    let cfg_path = if cfg.exists() {
        std::env::current_dir().unwrap_or(PathBuf::from(".")).join(cfg)
    } else {
        let home_dir = match home_dir() {
            Some(path) => {
                if !path.as_os_str().is_empty() {
                    info!("home dir is: {}", path.display());
                    path
                } else {
                    error!("home directory is empty, setting it to '.'");
                    PathBuf::from(".")
                }
            }
            None => {
                error!("can't get home directory, setting it to '.'");
                PathBuf::from(".")
            }
        };
        home_dir.join(cfg)
    };

    match cfg_path.try_exists() {
        Ok(true) => Some(cfg_path),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn read_yaml_defaults_missing_fields() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "max_line_len: 1024").unwrap();
        let cfg = read_yaml(f.path()).unwrap();
        assert_eq!(cfg.max_line_len, 1024);
        assert_eq!(cfg.synthesized_header, DEFAULT_SYNTHESIZED_HEADER);
    }

    #[test]
    fn read_yaml_missing_file() {
        assert!(read_yaml("/nonexistent/pfdd.yml").is_err());
    }
}
