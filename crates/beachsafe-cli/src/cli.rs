use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "beachsafe")]
#[command(
    author,
    version,
    about = "Beach safety predictions for Goa from weather, crowd, tide, and hazard conditions"
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "beachsafe.yaml")]
    pub config: PathBuf,

    /// Directory holding the model and encoder artifacts
    #[arg(long, global = true, env = "BEACHSAFE_MODEL_DIR")]
    pub model_dir: Option<PathBuf>,

    /// Prediction history file
    #[arg(long, global = true)]
    pub history: Option<PathBuf>,

    /// Print Prometheus metrics when the command finishes
    #[arg(long, global = true)]
    pub metrics: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the forest on the labelled dataset and write both artifacts
    Train {
        /// Labelled CSV dataset
        #[arg(short, long)]
        dataset: Option<PathBuf>,

        /// Number of trees
        #[arg(short = 'n', long)]
        trees: Option<usize>,

        /// Random seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Predict the safety label for one set of conditions
    Predict {
        /// Beach name
        #[arg(short, long)]
        beach: String,

        /// Weather category (Sunny, Cloudy, Rainy, Stormy, Foggy)
        #[arg(short, long)]
        weather: String,

        /// Crowd level; estimated from the beach and current time when omitted
        #[arg(long)]
        crowd: Option<String>,

        /// Tide level (Low, High)
        #[arg(short, long)]
        tide: String,

        /// Hazard (None, Glass, Jellyfish, Rip Current)
        #[arg(long, default_value = "None")]
        hazard: String,

        /// Do not append the prediction to the history log
        #[arg(long)]
        no_log: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Survey every known beach for the map view
    Map {
        /// Provider weather category applied to every beach (Clear, Rain, ...)
        #[arg(short, long)]
        weather: Option<String>,

        /// Tide level applied to every beach
        #[arg(short, long)]
        tide: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Estimate how crowded a beach is
    Crowd {
        /// Beach name
        #[arg(short, long)]
        beach: String,

        /// Local time as "YYYY-MM-DD HH:MM"; defaults to now
        #[arg(long, value_parser = parse_local_time)]
        at: Option<NaiveDateTime>,
    },

    /// Show daily safety label counts from the history log
    Trends {
        /// Days to cover
        #[arg(short, long)]
        days: Option<u32>,
    },

    /// List the categories the model was trained on
    Vocab,
}

fn parse_local_time(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
        .map_err(|e| format!("expected \"YYYY-MM-DD HH:MM\": {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_predict() {
        let cli = Cli::try_parse_from([
            "beachsafe", "predict", "--beach", "Baga", "--weather", "Sunny", "--tide", "High",
            "--hazard", "Rip Current", "--model-dir", "/tmp/m",
        ])
        .unwrap();

        assert_eq!(cli.model_dir, Some(PathBuf::from("/tmp/m")));
        match cli.command {
            Commands::Predict {
                beach,
                crowd,
                hazard,
                ..
            } => {
                assert_eq!(beach, "Baga");
                assert_eq!(crowd, None);
                assert_eq!(hazard, "Rip Current");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_crowd_time() {
        let cli =
            Cli::try_parse_from(["beachsafe", "crowd", "-b", "Agonda", "--at", "2025-12-13 14:00"])
                .unwrap();
        match cli.command {
            Commands::Crowd { at: Some(at), .. } => {
                assert_eq!(at.format("%H").to_string(), "14");
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let bad_time = ["beachsafe", "crowd", "-b", "Agonda", "--at", "noon"];
        assert!(Cli::try_parse_from(bad_time).is_err());
    }
}
