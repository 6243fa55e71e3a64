use std::{path::PathBuf, process::ExitCode};

use unionize_core::{
    config::{NewForConfig, UnionizeConfig},
    generate::{Generation, files::MemCollector},
};

#[derive(Default, clap::ValueEnum, Clone, Debug)]
pub enum LogLevel {
    Debug,
    Trace,
    #[default]
    Info,
    Error,
    Warn,
}

impl From<LogLevel> for tracing::Level {
    fn from(val: LogLevel) -> Self {
        match val {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
        }
    }
}

#[derive(clap::Parser, Debug, Clone)]
#[clap(name = "unionize")]
pub struct Cli {
    #[clap(
        long,
        global = true,
        default_value = "error",
        env = "LOG_LEVEL",
        help = "the verbosity level to print logs at."
    )]
    pub log_level: LogLevel,

    #[clap(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> unionize_core::Result<ExitCode> {
        match self.command {
            Command::Generate(args) => {
                let mut config = args.config.load()?;
                if !args.dry {
                    Generation::new(config)?.generate_all(None)?;
                    return Ok(ExitCode::SUCCESS);
                }

                config.set_mem(true);
                let collector = MemCollector::new();
                Generation::new(config)?.generate_all(Some(collector.mem_flush()))?;
                for (path, data) in collector.files().iter() {
                    println!("// {}", path.display());
                    println!("{}", String::from_utf8_lossy(data));
                }
                Ok(ExitCode::SUCCESS)
            },
            Command::Check(args) => {
                let found = Generation::new(args.config.load()?)?.check();
                for err in &found {
                    eprintln!("{:?}", err.to_report());
                }

                let fatal = found
                    .iter()
                    .filter(|err| err.is_fatal())
                    .count();
                tracing::info!(diagnostics = found.len(), fatal, "check finished");
                Ok(if fatal > 0 {
                    ExitCode::FAILURE
                } else {
                    ExitCode::SUCCESS
                })
            },
            Command::Fix(args) => {
                let generation = Generation::new(args.config.load()?)?;
                let fixed = generation.fix(&args.document)?;
                if args.write {
                    // the argument may name the host file, write back to the source document
                    let rendered = fixed.render()?;
                    std::fs::write(&fixed.path, rendered).map_err(
                        unionize_core::Error::from_with_source_init(fixed.path.display().to_string()),
                    )?;
                    tracing::info!(document = %fixed.path.display(), "wrote fixed document");
                } else {
                    print!("{}", fixed.text);
                }
                Ok(ExitCode::SUCCESS)
            },
        }
    }
}

#[derive(clap::Subcommand, Debug, Clone)]
enum Command {
    #[clap(alias = "gen", alias = "g")]
    /// generates union implementations as configured in `unionize.toml`
    Generate(GenArgs),

    #[clap(alias = "c")]
    /// reports unions initialized by default or by a constructor
    Check(CheckArgs),

    #[clap(alias = "f")]
    /// completes `Match` calls that are missing union cases
    Fix(FixArgs),
}

#[derive(clap::Args, Debug, Clone)]
struct WithConfig {
    #[clap(short = 'd', long = "config-dir")]
    config_dir: Option<String>,
}

impl WithConfig {
    fn load(&self) -> unionize_core::Result<UnionizeConfig> {
        UnionizeConfig::new(self.config_dir.as_deref())
    }
}

#[derive(clap::Args, Debug, Clone)]
struct GenArgs {
    #[clap(flatten)]
    config: WithConfig,

    #[clap(long, help = "print generated units instead of writing them.")]
    dry: bool,
}

#[derive(clap::Args, Debug, Clone)]
struct CheckArgs {
    #[clap(flatten)]
    config: WithConfig,
}

#[derive(clap::Args, Debug, Clone)]
struct FixArgs {
    #[clap(flatten)]
    config: WithConfig,

    #[clap(help = "the source document to fix.")]
    document: PathBuf,

    #[clap(short = 'w', long, help = "write the fixed document back instead of printing its text.")]
    write: bool,
}

#[cfg(test)]
mod test {
    use clap::Parser;

    use super::*;

    #[test]
    fn parses_fix() {
        let cli = Cli::try_parse_from([
            "unionize",
            "--log-level",
            "debug",
            "fix",
            "-d",
            "samples",
            "samples/src/program.toml",
            "--write",
        ])
        .unwrap();

        assert!(matches!(cli.log_level, LogLevel::Debug));
        let Command::Fix(args) = cli.command else {
            panic!("expected fix");
        };
        assert_eq!(args.config.config_dir.as_deref(), Some("samples"));
        assert_eq!(args.document, PathBuf::from("samples/src/program.toml"));
        assert!(args.write);
    }

    #[test]
    fn generate_aliases() {
        for alias in ["generate", "gen", "g"] {
            let cli = Cli::try_parse_from(["unionize", alias, "--dry"]).unwrap();
            assert!(matches!(cli.command, Command::Generate(GenArgs { dry: true, .. })));
        }
    }

    const SHAPE: &str = r#"
namespace = "Demo"

[[types]]
name = "Shape"
kind = "struct"
modifiers = ["partial"]
attributes = [{ name = "DiscriminatedUnion" }]

[[types.members]]
member = "type"
name = "Cases"
kind = "interface"
members = [
    { member = "method", name = "Circle", parameters = [{ name = "radius", type = "double" }] },
    { member = "method", name = "Empty" },
]
"#;

    const PROGRAM: &str = r#"
file = "Program.cs"
namespace = "Demo"
text = "var a = s.Match(Empty: () => 0);"

[[invocations]]
callee = "s.Match"
method = "Match"
receiver = "Shape"
arguments = [{ name = "Empty", expression = "() => 0" }]
span = [8, 31]

[[diagnostics]]
id = "CS7036"
span = [10, 15]
"#;

    fn project(dir: &std::path::Path) -> String {
        let root = dir.display().to_string();
        std::fs::create_dir(dir.join("src")).unwrap();
        std::fs::write(dir.join("src/shape.toml"), SHAPE).unwrap();
        std::fs::write(dir.join("src/program.toml"), PROGRAM).unwrap();
        std::fs::write(
            dir.join("unionize.toml"),
            format!("output-dir = \"{root}/out\"\n\n[sources]\ninclude = [\"{root}/src/*.toml\"]\n"),
        )
        .unwrap();
        root
    }

    #[test]
    fn generate_writes_units() {
        unionize_testing::logging();
        let dir = tempfile::tempdir().unwrap();
        let root = project(dir.path());

        let cli = Cli::try_parse_from(["unionize", "generate", "-d", &root]).unwrap();
        cli.run().unwrap();
        assert!(dir.path().join("out/Demo.Shape.g.cs").exists());
    }

    #[test]
    fn fix_by_host_file_name_writes_source_document() {
        unionize_testing::logging();
        let dir = tempfile::tempdir().unwrap();
        let root = project(dir.path());

        let cli = Cli::try_parse_from(["unionize", "fix", "-d", &root, "Program.cs", "--write"]).unwrap();
        cli.run().unwrap();

        let written = std::fs::read_to_string(dir.path().join("src/program.toml")).unwrap();
        assert!(written.contains("Circle: arg => throw new System.NotImplementedException()"));
        assert!(!std::path::Path::new("Program.cs").exists());
    }
}
