use std::fs;
use std::path::{Path, PathBuf};

use amlref::config::{default_config_text, DEFAULT_CONFIG_FILE};
use amlref::render::{
    self, DrugsReference, GeneticsReference, GeneticsSection, IntrathecalReference, Wt1Report,
};
use amlref::{Config, FormSession, OutputFormat};
use amlref_risk::{AssessmentInput, ResponseMeasurements, Wt1Response};
use amlref_tables::{default_abnormality, resolve_abnormality, search_drugs};
use amlref_types::{parse_measurement, TreatmentStage};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(
    name = "amlref",
    version,
    about = "SCCCG-AML2025 pediatric AML protocol reference and risk calculator",
    long_about = "amlref stratifies risk under the SCCCG-AML2025 protocol and prints the\n\
        protocol's reference tables.\n\n\
        EXAMPLES:\n\
        \n  amlref risk --stage initial --gene 1 --wbc 150        Diagnosis with high WBC\n\
        \n  amlref risk --stage induction --gene NPM1 --mrd 0.05 --wt1-log 1.5\n\
        \n  amlref wt1 --prev 12.5 --curr 0.3                      WT1 log reduction\n\
        \n  amlref drugs --search flt3                             Filter targeted drugs\n\
        \n  amlref form                                            Interactive form",
    after_help = "Configuration: --config FILE, else $AMLREF_CONFIG, else ./amlref.toml"
)]
struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Configuration file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Classify risk for one treatment stage
    Risk(RiskArgs),

    /// Compute a WT1 log reduction from two expression percentages
    Wt1(Wt1Args),

    /// Genetic prognosis tables
    Genetics(GeneticsArgs),

    /// Targeted drug reference
    Drugs(DrugsArgs),

    /// Intrathecal dosing and CNS status criteria
    It,

    /// Start the interactive assessment form
    #[command(long_about = "Start the interactive assessment form.\n\n\
        Set fields one per line (e.g. 'stage induction', 'mrd 0.05');\n\
        the risk is re-evaluated after every change.\n\n\
        Commands:\n\
        \n  :help   Show available fields and commands\n\
        \n  :quit   Exit the form (also :q, :exit)")]
    Form,

    /// Inspect or create the configuration file
    Config(ConfigArgs),
}

#[derive(Debug, Args, Clone)]
struct RiskArgs {
    /// Assessment stage: initial, induction or consolidation1
    #[arg(long, value_name = "STAGE", default_value = "initial")]
    stage: TreatmentStage,

    /// Genetic abnormality: exact label, row number, or unique substring
    #[arg(long, value_name = "GENE")]
    gene: Option<String>,

    /// Presenting WBC (x10^9/L), used at diagnosis
    #[arg(long, value_name = "N")]
    wbc: Option<String>,

    /// Bone marrow not in complete remission after induction
    #[arg(long = "no-cr")]
    no_cr: bool,

    /// Flow MRD (%)
    #[arg(long, value_name = "N")]
    mrd: Option<String>,

    /// WT1 log reduction entered directly
    #[arg(long = "wt1-log", value_name = "N", conflicts_with_all = ["wt1_prev", "wt1_curr"])]
    wt1_log: Option<String>,

    /// Previous WT1 expression (%)
    #[arg(long = "wt1-prev", value_name = "N")]
    wt1_prev: Option<String>,

    /// Current WT1 expression (%)
    #[arg(long = "wt1-curr", value_name = "N")]
    wt1_curr: Option<String>,
}

#[derive(Debug, Args, Clone)]
struct Wt1Args {
    /// Previous WT1 expression (%)
    #[arg(long, value_name = "N")]
    prev: String,

    /// Current WT1 expression (%)
    #[arg(long, value_name = "N")]
    curr: String,

    /// Judge against one stage's target only (induction or consolidation1)
    #[arg(long, value_name = "STAGE")]
    stage: Option<TreatmentStage>,
}

#[derive(Debug, Args, Clone)]
struct GeneticsArgs {
    /// Only table 2 (prognosis handbook)
    #[arg(long, conflicts_with = "manual")]
    table2: bool,

    /// Only the stratification manual and tier summaries
    #[arg(long)]
    manual: bool,
}

#[derive(Debug, Args, Clone)]
struct DrugsArgs {
    /// Filter by drug name, brand name or target (case-insensitive)
    #[arg(short, long, value_name = "TERM")]
    search: Option<String>,
}

#[derive(Debug, Args, Clone)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Debug, Subcommand, Clone)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Write a commented configuration file
    Init {
        #[arg(value_name = "FILE", default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

fn emit<T, F>(mode: OutputFormat, value: &T, text: F) -> i32
where
    T: Serialize + ?Sized,
    F: FnOnce(&T) -> Vec<String>,
{
    match mode {
        OutputFormat::Json => match render::to_json(value) {
            Ok(s) => {
                println!("{s}");
                0
            }
            Err(e) => {
                eprintln!("error: failed to serialize output: {e}");
                2
            }
        },
        OutputFormat::Text => {
            for line in text(value) {
                println!("{line}");
            }
            0
        }
    }
}

fn build_input(args: &RiskArgs) -> Result<AssessmentInput, String> {
    let gene = match args.gene.as_deref() {
        Some(q) => resolve_abnormality(q).map_err(|e| e.to_string())?,
        None => default_abnormality(),
    };
    log::info!("baseline genetics: {} ({})", gene.gene, gene.category);
    let baseline = gene.category;
    let num = |v: &Option<String>| v.as_deref().and_then(parse_measurement);

    if args.stage == TreatmentStage::Initial {
        if args.mrd.is_some() || args.wt1_log.is_some() || args.wt1_prev.is_some() || args.no_cr {
            log::warn!("response measurements are ignored at diagnosis");
        }
        return Ok(AssessmentInput::initial(baseline, num(&args.wbc)));
    }
    if args.wbc.is_some() {
        log::warn!("--wbc is only used at diagnosis; ignoring it");
    }

    let wt1 = match num(&args.wt1_log) {
        Some(v) => Some(Wt1Response::LogReduction(v)),
        None if args.wt1_prev.is_some() || args.wt1_curr.is_some() => {
            Some(Wt1Response::Transcripts {
                previous: num(&args.wt1_prev),
                current: num(&args.wt1_curr),
            })
        }
        None => None,
    };
    let response = ResponseMeasurements::new(num(&args.mrd), wt1);
    Ok(match args.stage {
        TreatmentStage::PostInduction => {
            AssessmentInput::post_induction(baseline, !args.no_cr, response)
        }
        _ => {
            if args.no_cr {
                log::warn!("--no-cr only applies after induction; ignoring it");
            }
            AssessmentInput::post_consolidation1(baseline, response)
        }
    })
}

fn run_risk(args: &RiskArgs, config: &Config, mode: OutputFormat) -> i32 {
    let input = match build_input(args) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("error: {e}");
            return 2;
        }
    };
    let result = config.classifier().classify(&input);
    log::debug!("classification: {:?}", result.finding);
    emit(mode, &result, render::classification)
}

fn run_wt1(args: &Wt1Args, config: &Config, mode: OutputFormat) -> i32 {
    let report = Wt1Report::compute(
        &config.wt1_calculator(),
        parse_measurement(&args.prev),
        parse_measurement(&args.curr),
        args.stage,
    );
    emit(mode, &report, render::wt1_report)
}

fn run_form(config: &Config) -> i32 {
    use rustyline::error::ReadlineError;
    use rustyline::Editor;
    let mut rl = match Editor::<(), rustyline::history::DefaultHistory>::new() {
        Ok(e) => e,
        Err(e) => {
            eprintln!("error: failed to initialize form: {e}");
            return 2;
        }
    };

    let mut session = FormSession::new(config.classifier());
    println!("SCCCG-AML2025 risk form (:help for fields, :quit to exit)");
    for line in session.report() {
        println!("{line}");
    }
    loop {
        let prompt = session.prompt();
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    let _ = rl.add_history_entry(trimmed);
                }
                let (out, exit) = session.handle_line(&line);
                for l in out {
                    println!("{l}");
                }
                if exit {
                    return 0;
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => return 0,
            Err(e) => {
                eprintln!("error: form failed: {e}");
                return 2;
            }
        }
    }
}

fn run_config_init(path: &Path, force: bool) -> i32 {
    if path.exists() && !force {
        eprintln!(
            "error: '{}' already exists (use --force to overwrite)",
            path.display()
        );
        return 2;
    }
    match fs::write(path, default_config_text()) {
        Ok(()) => {
            println!("wrote {}", path.display());
            0
        }
        Err(e) => {
            eprintln!("error: failed to write '{}': {e}", path.display());
            2
        }
    }
}

fn run_cli() -> i32 {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Command::Config(ConfigArgs {
        command: ConfigCommand::Init { path, force },
    }) = &cli.command
    {
        return run_config_init(path, *force);
    }

    let config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return 2;
        }
    };
    let mode = if cli.json {
        OutputFormat::Json
    } else {
        config.output.format
    };

    match &cli.command {
        Command::Risk(args) => run_risk(args, &config, mode),
        Command::Wt1(args) => run_wt1(args, &config, mode),
        Command::Genetics(args) => {
            let section = if args.table2 {
                GeneticsSection::Table2
            } else if args.manual {
                GeneticsSection::Manual
            } else {
                GeneticsSection::All
            };
            emit(mode, &GeneticsReference::new(section), render::genetics)
        }
        Command::Drugs(args) => {
            let found = search_drugs(args.search.as_deref().unwrap_or(""));
            emit(mode, &DrugsReference::new(found), render::drugs)
        }
        Command::It => emit(mode, &IntrathecalReference::default(), render::intrathecal),
        Command::Form => run_form(&config),
        Command::Config(ConfigArgs {
            command: ConfigCommand::Show,
        }) => match mode {
            OutputFormat::Json => emit(mode, &config, |_| Vec::new()),
            OutputFormat::Text => match config.to_toml() {
                Ok(s) => {
                    print!("{s}");
                    0
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    2
                }
            },
        },
        Command::Config(ConfigArgs {
            command: ConfigCommand::Init { .. },
        }) => 0,
    }
}

fn main() {
    std::process::exit(run_cli());
}

#[cfg(test)]
mod tests {
    use super::*;
    use amlref_types::RiskLevel;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    fn risk_args(argv: &[&str]) -> RiskArgs {
        let mut full = vec!["amlref", "risk"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Command::Risk(a) => a,
            other => panic!("expected risk, got {other:?}"),
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn help_mentions_every_subcommand() {
        let help = Cli::command().render_long_help().to_string();
        for name in ["risk", "wt1", "genetics", "drugs", "it", "form", "config"] {
            assert!(help.contains(name), "help lacks '{name}'");
        }
    }

    #[test]
    fn stage_accepts_aliases() {
        assert_eq!(
            risk_args(&["--stage", "consolidation1"]).stage,
            TreatmentStage::PostConsolidation1
        );
        assert!(Cli::try_parse_from(["amlref", "risk", "--stage", "relapse"]).is_err());
    }

    #[test]
    fn wt1_log_conflicts_with_transcripts() {
        let r = Cli::try_parse_from([
            "amlref", "risk", "--stage", "induction", "--wt1-log", "1", "--wt1-prev", "10",
        ]);
        assert!(r.is_err());
    }

    #[test]
    fn risk_input_follows_stage() {
        let input = build_input(&risk_args(&["--gene", "1", "--wbc", "150"])).unwrap();
        assert_eq!(input, AssessmentInput::initial(RiskLevel::Low, Some(150.0)));

        let input = build_input(&risk_args(&[
            "--stage", "induction", "--gene", "7", "--no-cr", "--mrd", "0",
        ]))
        .unwrap();
        assert_eq!(
            input,
            AssessmentInput::post_induction(
                RiskLevel::High,
                false,
                ResponseMeasurements::new(Some(0.0), None)
            )
        );
    }

    #[test]
    fn transcript_flags_build_a_transcript_response() {
        let input = build_input(&risk_args(&[
            "--stage",
            "consolidation1",
            "--wt1-prev",
            "100",
            "--wt1-curr",
            "x",
        ]))
        .unwrap();
        assert_eq!(
            input,
            AssessmentInput::post_consolidation1(
                RiskLevel::Low,
                ResponseMeasurements::with_transcripts(None, Some(100.0), None)
            )
        );
    }

    #[test]
    fn unknown_gene_is_an_error() {
        let err = build_input(&risk_args(&["--gene", "nothing-like-this"])).unwrap_err();
        assert!(err.contains("nothing-like-this"));
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::try_parse_from(["amlref", "it", "--json", "-vv"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
    }
}
