use clap::{Parser, ValueEnum};
use mid_experiment::SeedMode;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Builds a reproducible MID task session plan")]
pub struct Args {
    /// Subject identifier
    #[arg(long, short)]
    pub subject: Option<String>,

    /// Additional intake fields, appended to the result file in order
    #[arg(long = "field", value_name = "VALUE")]
    pub fields: Vec<String>,

    /// Seed mode (overrides config)
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Path to config TOML
    #[arg(long, default_value = "mid.toml")]
    pub config: PathBuf,

    /// Number of blocks (overrides config)
    #[arg(long)]
    pub blocks: Option<usize>,

    /// Total number of trials (overrides config)
    #[arg(long)]
    pub trials: Option<usize>,

    /// Plan output format
    #[arg(long, value_enum, default_value_t = PlanFormat::Json)]
    pub format: PlanFormat,

    /// Write the plan here instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Log per-block and per-trial detail
    #[arg(long, short, default_value_t = false)]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    /// Seed from the subject identifier
    #[value(alias = "indiv")]
    Individual,
    /// Same seed for every subject
    Fixed,
}

impl From<ModeArg> for SeedMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Individual => SeedMode::Individual,
            ModeArg::Fixed => SeedMode::Fixed,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanFormat {
    /// Settings, file names and trials as one JSON document
    Json,
    /// One line per trial
    Csv,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_command_line() {
        let args = Args::try_parse_from([
            "mid-task", "-s", "007", "--field", "23", "--field", "F", "--mode", "indiv",
            "--blocks", "3", "--trials", "30", "--format", "csv",
        ])
        .unwrap();
        assert_eq!(args.subject.as_deref(), Some("007"));
        assert_eq!(args.fields, vec!["23", "F"]);
        assert_eq!(args.mode, Some(ModeArg::Individual));
        assert_eq!(args.blocks, Some(3));
        assert_eq!(args.format, PlanFormat::Csv);
        assert_eq!(args.config, PathBuf::from("mid.toml"));
    }

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["mid-task"]).unwrap();
        assert_eq!(args.mode, None);
        assert_eq!(args.format, PlanFormat::Json);
        assert!(args.output.is_none());
        assert!(!args.verbose);
    }
}
