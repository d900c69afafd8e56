use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use drumgrid_core::{
    grid_to_vector, DrumKit, Grid, ImportedPattern, RhythmVector, SearchQuery, SearchResult,
};
use drumgrid_midi::{write_grid, Importer};

use crate::config::Config;
use crate::format::{parse_grid, render_grid, OutputFormatter};
use crate::search::SearchClient;

#[derive(Parser, Debug)]
#[command(name = "drumgrid")]
#[command(
    about = "Drum grid rhythm vectors, MIDI import/export and similarity search",
    long_about = None
)]
pub struct Cli {
    /// JSON config file with API URL, defaults and note tables
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import a MIDI file onto the grid and print its rhythm vector
    Import {
        /// Path to the MIDI file
        midi: PathBuf,

        /// Loop length in steps
        #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
        steps: Option<u16>,

        /// Tempo to report when the file declares none
        #[arg(short, long)]
        bpm: Option<f64>,

        /// Also write the imported grid to this text file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the rhythm vector of a grid file
    Vector {
        /// Path to the grid text file
        grid: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Write a grid file as a drum MIDI file
    Export {
        /// Path to the grid text file
        grid: PathBuf,

        /// Output MIDI path
        #[arg(short, long, default_value = "loop.mid")]
        output: PathBuf,

        /// Tempo of the exported file
        #[arg(short, long)]
        bpm: Option<f64>,
    },
    /// Find similar loops through the search service
    Search {
        /// Build the query from a MIDI file
        #[arg(long, conflicts_with = "grid", required_unless_present = "grid")]
        midi: Option<PathBuf>,

        /// Build the query from a grid text file
        #[arg(long)]
        grid: Option<PathBuf>,

        /// Loop length for MIDI queries
        #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
        steps: Option<u16>,

        /// Tempo sent with grid queries, and with MIDI files that declare none
        #[arg(short, long)]
        bpm: Option<f64>,

        /// Maximum number of matches
        #[arg(short, long)]
        limit: Option<usize>,

        /// Search service base URL
        #[arg(long, env = "DRUMGRID_API_URL")]
        api_url: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load_or_default(cli.config.as_deref())?;
    let kit = DrumKit::standard();

    match cli.command {
        Commands::Import {
            midi,
            steps,
            bpm,
            output,
            json,
        } => {
            let pattern = import(&midi, &config, &kit, steps, bpm)?;
            if let Some(path) = output {
                fs::write(&path, format!("{}\n", render_grid(&pattern.grid, &kit)))
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                tracing::info!(path = %path.display(), "grid saved");
            }
            println!("{}", OutputFormatter::new(json).import_report(&pattern, &kit)?);
        }
        Commands::Vector { grid, json } => {
            let grid = read_grid(&grid, &kit)?;
            let vector = grid_to_vector(&grid);
            println!("{}", OutputFormatter::new(json).vector_report(&vector)?);
        }
        Commands::Export { grid, output, bpm } => {
            let grid = read_grid(&grid, &kit)?;
            let bpm = bpm.unwrap_or(config.bpm);
            let bytes = write_grid(&grid, bpm, &config.export_notes)
                .context("Failed to export MIDI")?;
            fs::write(&output, bytes)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            tracing::info!(path = %output.display(), bpm, "MIDI exported");
        }
        Commands::Search {
            midi,
            grid,
            steps,
            bpm,
            limit,
            api_url,
            json,
        } => {
            let (vector, query_bpm) = match (midi, grid) {
                (Some(midi), _) => {
                    let pattern = import(&midi, &config, &kit, steps, bpm)?;
                    (pattern.vector, pattern.bpm)
                }
                (None, Some(grid)) => {
                    let grid = read_grid(&grid, &kit)?;
                    (grid_to_vector(&grid), bpm.unwrap_or(config.bpm))
                }
                (None, None) => anyhow::bail!("either --midi or --grid is required"),
            };

            let api_url = api_url.as_deref().unwrap_or(&config.api_url);
            let results = search(&vector, query_bpm, limit, api_url)?;
            println!("{}", OutputFormatter::new(json).search_report(&results)?);
        }
    }

    Ok(())
}

/// Import a MIDI file with CLI overrides applied over the config
pub fn import(
    path: &Path,
    config: &Config,
    kit: &DrumKit,
    steps: Option<u16>,
    bpm: Option<f64>,
) -> Result<ImportedPattern> {
    let steps = usize::from(steps.unwrap_or(config.steps));
    let importer = Importer::new(
        steps,
        kit.len(),
        bpm.unwrap_or(config.bpm),
        config.input_notes.clone(),
    );

    tracing::info!(path = %path.display(), steps, "importing MIDI file");
    importer
        .import_file(path)
        .with_context(|| format!("File could not be imported: {}", path.display()))
}

fn read_grid(path: &Path, kit: &DrumKit) -> Result<Grid> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read grid file: {}", path.display()))?;
    parse_grid(&text, kit).with_context(|| format!("Invalid grid file: {}", path.display()))
}

fn search(
    vector: &RhythmVector,
    bpm: f64,
    limit: Option<usize>,
    api_url: &str,
) -> Result<Vec<SearchResult>> {
    let mut query = SearchQuery::new(vector, bpm)?;
    if let Some(limit) = limit {
        query = query.with_limit(limit);
    }
    SearchClient::new(api_url).search(&query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_import_args() {
        let args = ["drumgrid", "-v", "import", "loop.mid", "--steps", "16", "--json"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Import { midi, steps, json, .. } => {
                assert_eq!(midi, PathBuf::from("loop.mid"));
                assert_eq!(steps, Some(16));
                assert!(json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_zero_steps_rejected() {
        assert!(Cli::try_parse_from(["drumgrid", "import", "loop.mid", "--steps", "0"]).is_err());
    }

    #[test]
    fn test_search_needs_one_source() {
        assert!(Cli::try_parse_from(["drumgrid", "search"]).is_err());
        let both = ["drumgrid", "search", "--midi", "a.mid", "--grid", "a.txt"];
        assert!(Cli::try_parse_from(both).is_err());
        assert!(Cli::try_parse_from(["drumgrid", "search", "--grid", "a.txt"]).is_ok());
    }

    #[test]
    fn test_export_default_output() {
        let cli = Cli::try_parse_from(["drumgrid", "export", "beat.txt"]).unwrap();
        match cli.command {
            Commands::Export { output, bpm, .. } => {
                assert_eq!(output, PathBuf::from("loop.mid"));
                assert_eq!(bpm, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_import_and_export_through_files() {
        let dir = std::env::temp_dir().join(format!("drumgrid-cli-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let grid_path = dir.join("beat.txt");
        let midi_path = dir.join("beat.mid");
        fs::write(&grid_path, "bd: x... x...\nsd: ..x. ..x.\nhh: x.x. x.x x\n").unwrap();

        run(Cli::try_parse_from([
            "drumgrid",
            "export",
            grid_path.to_str().unwrap(),
            "-o",
            midi_path.to_str().unwrap(),
            "--bpm",
            "100",
        ])
        .unwrap())
        .unwrap();

        let config = Config::default();
        let kit = DrumKit::standard();
        let pattern = import(&midi_path, &config, &kit, None, None).unwrap();
        assert!((pattern.bpm - 100.0).abs() < 1e-3);
        // The hi-hat on the final step closes the loop and is dropped
        assert!(pattern.grid.is_active(0, 0));
        assert!(pattern.grid.is_active(0, 4));
        assert!(pattern.grid.is_active(1, 6));
        assert!(!pattern.grid.is_active(3, 7));

        let missing = import(&dir.join("missing.mid"), &config, &kit, None, None).unwrap_err();
        assert!(missing.to_string().starts_with("File could not be imported"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
