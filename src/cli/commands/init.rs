//! Init command - Write a default configuration file

use colored::Colorize;
use std::fs;
use std::path::PathBuf;

use super::InitArgs;
use crate::cli::exit_codes;
use crate::config::loader::CONFIG_FILENAME;
use crate::config::Config;
use crate::error::ComplyScanError;

pub async fn execute(args: InitArgs) -> Result<i32, ComplyScanError> {
    let config_path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));

    if config_path.exists() && !args.force {
        eprintln!(
            "{} {} already exists. Use --force to overwrite.",
            "Error:".red().bold(),
            config_path.display()
        );
        return Ok(exit_codes::ERROR);
    }

    let config_content = Config::default().to_toml()?;
    fs::write(&config_path, &config_content).map_err(|e| ComplyScanError::Output {
        path: config_path.display().to_string(),
        source: e,
    })?;

    println!(
        "{} Created {}",
        "Success:".green().bold(),
        config_path.display().to_string().cyan()
    );

    println!("\nNext steps:");
    println!(
        "  1. Review the manifest filenames and analysis limits in {}",
        config_path.display().to_string().cyan()
    );
    println!(
        "  2. Run {} to audit the working directory",
        "complyscan audit".cyan()
    );
    println!(
        "  3. Run {} to list past audits",
        "complyscan history".cyan()
    );

    Ok(exit_codes::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_writes_loadable_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("complyscan.toml");
        let code = execute(InitArgs {
            force: false,
            output: Some(path.clone()),
        })
        .await
        .unwrap();

        assert_eq!(code, exit_codes::SUCCESS);
        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.analysis.max_files, 15);
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("complyscan.toml");
        fs::write(&path, "# mine\n").unwrap();

        let code = execute(InitArgs {
            force: false,
            output: Some(path.clone()),
        })
        .await
        .unwrap();
        assert_eq!(code, exit_codes::ERROR);
        assert_eq!(fs::read_to_string(&path).unwrap(), "# mine\n");

        let code = execute(InitArgs {
            force: true,
            output: Some(path.clone()),
        })
        .await
        .unwrap();
        assert_eq!(code, exit_codes::SUCCESS);
        assert_ne!(fs::read_to_string(&path).unwrap(), "# mine\n");
    }
}
