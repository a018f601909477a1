//! Init command implementation.
//!
//! Writes a `treekmz.yaml` holding the built-in defaults so they can be
//! edited.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::config::{Config, CONFIG_FILENAME};
use crate::error::{ConvertError, Result};
use crate::output::{display_path, Printer};

/// Write a default treekmz.yaml
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to write the configuration into
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite an existing treekmz.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let config_path = args.path.join(CONFIG_FILENAME);

    if config_path.exists() && !args.force {
        return Err(ConvertError::Validation {
            message: format!("{} already exists", CONFIG_FILENAME),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    let yaml = Config::default().to_yaml()?;
    fs::write(&config_path, yaml).map_err(|e| ConvertError::Io {
        path: config_path.clone(),
        message: format!("Failed to write config: {}", e),
    })?;

    printer.status("Created", &display_path(&config_path));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_init_creates_config() {
        let dir = tempdir().unwrap();

        let args = InitArgs {
            path: dir.path().to_path_buf(),
            force: false,
        };
        run(args, &Printer::new()).unwrap();

        let yaml = fs::read_to_string(dir.path().join(CONFIG_FILENAME)).unwrap();
        assert_eq!(Config::parse(&yaml).unwrap(), Config::default());
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "name: mine\n").unwrap();

        let args = InitArgs {
            path: dir.path().to_path_buf(),
            force: false,
        };
        assert!(run(args, &Printer::new()).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "name: mine\n");
    }

    #[test]
    fn test_init_force_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "name: mine\n").unwrap();

        let args = InitArgs {
            path: dir.path().to_path_buf(),
            force: true,
        };
        run(args, &Printer::new()).unwrap();
        assert_eq!(Config::load(&path).unwrap().name, "Les arbres");
    }
}
