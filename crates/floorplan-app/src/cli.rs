//! Argument parsing and subcommands.

use clap::{Parser, Subcommand};
use floorplan_core::domain::DOMAIN_FILENAME;
use floorplan_core::{ConfigError, ControllerError, DirectDownload, EditorConfig, ExportError, SceneController};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Controller(#[from] ControllerError),
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "floorplan", about = "Inspect and normalize floorplan domain documents")]
pub struct Cli {
    /// Editor configuration file (JSON).
    #[arg(long, env = "FLOORPLAN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Summarize a domain document.
    Inspect { file: PathBuf },
    /// Re-export a domain document as floorplan.domain.json.
    Normalize {
        file: PathBuf,
        /// Output directory. Defaults to the download directory.
        out_dir: Option<PathBuf>,
    },
}

/// Summary of a loaded document.
#[derive(Debug, Clone, PartialEq)]
pub struct InspectReport {
    pub name: String,
    pub project_id: String,
    pub walls: usize,
    pub wall_length: f64,
    pub items: usize,
    /// Placed count per catalog entry, in catalog order.
    pub placed: Vec<(String, usize)>,
    pub annotations: usize,
    pub orphaned_snaps: Vec<String>,
    pub duplicate_ids: Vec<String>,
}

impl InspectReport {
    fn from_controller(controller: &SceneController) -> Self {
        let scene = controller.scene();
        Self {
            name: controller.meta().name.clone(),
            project_id: controller.meta().project_id.clone(),
            walls: scene.walls.len(),
            wall_length: scene.walls.iter().map(|w| w.length()).sum(),
            items: scene.items.len(),
            placed: controller
                .config()
                .catalog
                .entries()
                .iter()
                .filter_map(|entry| {
                    let count = scene
                        .items
                        .iter()
                        .filter(|i| i.catalog_ref == entry.catalog_ref)
                        .count();
                    (count > 0).then(|| (entry.name.clone(), count))
                })
                .collect(),
            annotations: scene.annotations.len(),
            orphaned_snaps: controller.orphaned_snaps().iter().map(|i| i.id.clone()).collect(),
            duplicate_ids: scene.duplicate_ids().into_iter().map(str::to_string).collect(),
        }
    }
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.name, self.project_id)?;
        writeln!(f, "  walls:       {} ({:.1} total)", self.walls, self.wall_length)?;
        writeln!(f, "  items:       {}", self.items)?;
        for (name, count) in &self.placed {
            writeln!(f, "    {name} x{count}")?;
        }
        write!(f, "  annotations: {}", self.annotations)?;
        if !self.orphaned_snaps.is_empty() {
            write!(f, "\n  orphaned snaps: {}", self.orphaned_snaps.join(", "))?;
        }
        if !self.duplicate_ids.is_empty() {
            write!(f, "\n  duplicate ids: {}", self.duplicate_ids.join(", "))?;
        }
        Ok(())
    }
}

/// Run a parsed command and return the text to print.
pub fn run(cli: &Cli) -> Result<String, AppError> {
    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };

    match &cli.command {
        Command::Inspect { file } => {
            let controller = load(config, file)?;
            let report = InspectReport::from_controller(&controller);
            if !report.orphaned_snaps.is_empty() {
                log::warn!("{} item(s) snapped to missing walls", report.orphaned_snaps.len());
            }
            Ok(report.to_string())
        }
        Command::Normalize { file, out_dir } => {
            let controller = load(config, file)?;
            let sink = match out_dir {
                Some(dir) => DirectDownload::new(dir.clone()),
                None => DirectDownload::default_location()?,
            };
            controller.export_domain(&sink)?;
            Ok(format!("Wrote {}", sink.dir().join(DOMAIN_FILENAME).display()))
        }
    }
}

fn load(config: EditorConfig, file: &Path) -> Result<SceneController, AppError> {
    let mut controller = SceneController::with_config(config);
    controller.import_file(file)?;
    Ok(controller)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use floorplan_core::DomainError;

    const DOC: &str = r#"{
        "schemaVersion": "1.0.0",
        "meta": {"projectId": "P-20250101-0001", "name": "Studio"},
        "stories": [{
            "id": "S1",
            "elements": [
                {"id": "W-1", "type": "wall", "a": {"x": 0, "y": 0}, "b": {"x": 400, "y": 0}},
                {"id": "I-1", "type": "item", "catalogRef": "door.single.900",
                 "transform": {"x": 100, "y": 0},
                 "snap": {"to": "wall", "targetId": "W-1", "at": {"x": 100, "y": 0}}},
                {"id": "I-2", "type": "item", "catalogRef": "door.single.900",
                 "snap": {"to": "wall", "targetId": "W-9", "at": {"x": 0, "y": 0}}}
            ],
            "x_annotations": [{"text": "entry"}]
        }]
    }"#;

    #[test]
    fn test_parse_commands() {
        let cli = Cli::try_parse_from(["floorplan", "inspect", "plan.json"]).unwrap();
        assert_eq!(cli.command, Command::Inspect { file: "plan.json".into() });

        let cli = Cli::try_parse_from(["floorplan", "--config", "editor.json", "normalize", "a.json", "out"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("editor.json")));
        assert_eq!(
            cli.command,
            Command::Normalize {
                file: "a.json".into(),
                out_dir: Some("out".into())
            }
        );

        let cli = Cli::try_parse_from(["floorplan", "normalize", "a.json"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Normalize {
                file: "a.json".into(),
                out_dir: None
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        let err = Cli::try_parse_from(["floorplan", "inspect"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        let err = Cli::try_parse_from(["floorplan", "draw", "x"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
        assert!(Cli::try_parse_from(["floorplan", "inspect", "a.json", "extra"]).is_err());
        assert!(Cli::try_parse_from(["floorplan", "--config"]).is_err());
    }

    #[test]
    fn test_help() {
        let err = Cli::try_parse_from(["floorplan", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert!(err.to_string().contains("normalize"));
    }

    #[test]
    fn test_inspect() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plan.json");
        std::fs::write(&file, DOC).unwrap();

        let controller = load(EditorConfig::default(), &file).unwrap();
        let report = InspectReport::from_controller(&controller);
        assert_eq!(report.name, "Studio");
        assert_eq!((report.walls, report.items, report.annotations), (1, 2, 1));
        assert_eq!(report.wall_length, 400.0);
        assert_eq!(report.placed, vec![("Single door 900".to_string(), 2)]);
        assert_eq!(report.orphaned_snaps, vec!["I-2".to_string()]);
        assert!(report.duplicate_ids.is_empty());

        let cli = Cli {
            config: None,
            command: Command::Inspect { file },
        };
        let output = run(&cli).unwrap();
        assert!(output.starts_with("Studio (P-20250101-0001)"));
        assert!(output.contains("orphaned snaps: I-2"));
        assert!(output.contains("Single door 900 x2"));
    }

    #[test]
    fn test_normalize_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plan.json");
        std::fs::write(&file, DOC).unwrap();
        let out = dir.path().join("out");

        let cli = Cli {
            config: None,
            command: Command::Normalize {
                file,
                out_dir: Some(out.clone()),
            },
        };
        run(&cli).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out.join(DOMAIN_FILENAME)).unwrap()).unwrap();
        assert_eq!(written["schemaVersion"], "1.0.0");
        assert_eq!(written["meta"]["projectId"], "P-20250101-0001");
        assert_eq!(written["stories"][0]["elements"][0]["height"], 2400.0);
        assert_eq!(written["stories"][0]["elements"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_invalid_document() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bad.json");
        std::fs::write(&file, r#"{"stories": []}"#).unwrap();

        let cli = Cli {
            config: None,
            command: Command::Inspect { file },
        };
        assert!(matches!(
            run(&cli),
            Err(AppError::Controller(ControllerError::Import(DomainError::MissingStory)))
        ));
    }

    #[test]
    fn test_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("editor.json");
        std::fs::write(&config, "{ broken").unwrap();

        let cli = Cli {
            config: Some(config),
            command: Command::Inspect {
                file: dir.path().join("plan.json"),
            },
        };
        assert!(matches!(run(&cli), Err(AppError::Config(ConfigError::Parse(_)))));
    }
}
