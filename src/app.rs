use crate::cli::{Args, PlanFormat};
use anyhow::{Context, Result};
use mid_experiment::{
    ExperimentSettings, SeedProvider, SubjectData, TrialSequence, generate_trial_sequence,
};
use mid_timing::{output_names, Clock, SystemClock};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use tracing::info;

/// Everything the presentation layer needs to run one subject.
#[derive(Debug, Clone, Serialize)]
pub struct SessionPlan {
    pub subject: SubjectData,
    pub results_file: String,
    pub log_file: String,
    pub settings: ExperimentSettings,
    pub sequence: TrialSequence,
}

pub struct App<C: Clock = SystemClock> {
    args: Args,
    settings: ExperimentSettings,
    subject: SubjectData,
    clock: C,
}

impl App<SystemClock> {
    pub fn new(args: Args) -> Result<Self> {
        Self::with_clock(args, SystemClock)
    }
}

impl<C: Clock> App<C> {
    pub fn with_clock(args: Args, clock: C) -> Result<Self> {
        let mut settings = ExperimentSettings::load_or_default(&args.config)
            .with_context(|| format!("cannot load config {}", args.config.display()))?;
        if let Some(mode) = args.mode {
            settings.seed_mode = mode.into();
        }
        if args.blocks.is_some() || args.trials.is_some() {
            let blocks = args.blocks.unwrap_or(settings.total_blocks);
            let trials = args.trials.unwrap_or(settings.total_trials);
            settings.set_counts(blocks, trials);
        }

        let fields = args
            .subject
            .iter()
            .chain(args.fields.iter())
            .cloned()
            .collect();

        Ok(Self {
            args,
            settings,
            subject: SubjectData::from_fields(fields),
            clock,
        })
    }

    /// Seeds the settings and builds the trial sequence.
    pub fn plan(&mut self) -> Result<SessionPlan> {
        SeedProvider::from_settings(&self.settings)
            .setup(&mut self.settings, &self.subject)
            .context("seed setup failed")?;
        let sequence =
            generate_trial_sequence(&self.settings).context("cannot build trial sequence")?;
        let names = output_names(self.subject.id().unwrap_or("unknown"), &self.clock);

        Ok(SessionPlan {
            subject: self.subject.clone(),
            results_file: names.results,
            log_file: names.log,
            settings: self.settings.clone(),
            sequence,
        })
    }

    pub fn run(mut self) -> Result<()> {
        let plan = self.plan()?;
        info!(
            results_file = %plan.results_file,
            log_file = %plan.log_file,
            trials = plan.sequence.len(),
            "session plan ready"
        );

        match &self.args.output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("cannot create {}", path.display()))?;
                write_plan(&plan, self.args.format, BufWriter::new(file))?;
                info!(path = %path.display(), "plan written");
            }
            None => write_plan(&plan, self.args.format, io::stdout().lock())?,
        }
        Ok(())
    }
}

pub fn write_plan<W: Write>(plan: &SessionPlan, format: PlanFormat, mut out: W) -> Result<()> {
    match format {
        PlanFormat::Json => {
            serde_json::to_writer_pretty(&mut out, plan)?;
            writeln!(out)?;
        }
        PlanFormat::Csv => plan.sequence.write_csv(&mut out)?,
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use mid_timing::FixedClock;

    fn app(argv: &[&str]) -> App<FixedClock> {
        let clock = FixedClock::from_parts(2025, 10, 16, 8, 15).unwrap();
        let mut full = vec!["mid-task", "--config", "does-not-exist.toml"];
        full.extend_from_slice(argv);
        App::with_clock(Args::try_parse_from(full).unwrap(), clock).unwrap()
    }

    #[test]
    fn plan_is_reproducible_for_a_subject() {
        let a = app(&["-s", "007"]).plan().unwrap();
        let b = app(&["-s", "007"]).plan().unwrap();
        assert_eq!(a.sequence, b.sequence);
        assert_eq!(a.results_file, "Subject007_08151610.csv");
        assert_eq!(a.sequence.len(), 20);
    }

    #[test]
    fn overrides_reach_the_settings() {
        let plan = app(&["-s", "9", "--blocks", "3", "--trials", "36"])
            .plan()
            .unwrap();
        assert_eq!(plan.settings.trials_per_block, 12);
        assert_eq!(plan.sequence.total_blocks, 3);
    }

    #[test]
    fn individual_mode_needs_a_subject() {
        let err = app(&[]).plan().unwrap_err();
        assert!(format!("{err:#}").contains("no identifier"));
    }

    #[test]
    fn fixed_mode_runs_without_subject() {
        let plan = app(&["--mode", "fixed"]).plan().unwrap();
        assert_eq!(plan.sequence.seed, 42);
        assert_eq!(plan.results_file, "Subjectunknown_08151610.csv");
    }

    #[test]
    fn json_plan_round_trips_through_serde() {
        let plan = app(&["-s", "007", "--field", "F"]).plan().unwrap();
        let mut buf = Vec::new();
        write_plan(&plan, PlanFormat::Json, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["subject"]["fields"][1], "F");
        assert_eq!(value["sequence"]["trials"].as_array().unwrap().len(), 20);
        assert_eq!(value["settings"]["trials_per_block"], 10);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mid.toml");
        std::fs::write(&path, "total_blocks = \"two\"\n").unwrap();
        let path_arg = path.to_string_lossy().into_owned();
        let args =
            Args::try_parse_from(["mid-task", "-s", "007", "--config", path_arg.as_str()])
                .unwrap();
        let clock = FixedClock::from_parts(2025, 10, 16, 8, 15).unwrap();
        let err = App::with_clock(args, clock).err().unwrap();
        assert!(format!("{err:#}").contains("invalid configuration file"));
    }

    #[test]
    fn plan_reports_the_block_seeds_it_used() {
        let plan = app(&["-s", "007"]).plan().unwrap();
        let seeds = plan.settings.session_block_seeds;
        assert_eq!(seeds.len(), 2);
        assert_eq!(seeds, mid_experiment::derive_block_seeds(plan.sequence.seed, 2));
    }

    #[test]
    fn plan_file_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("plan.csv");
        let out_arg = out.to_string_lossy().into_owned();
        app(&["-s", "007", "--format", "csv", "--output", &out_arg])
            .run()
            .unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        assert_eq!(text.lines().count(), 21);
    }
}
