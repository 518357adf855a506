use anyhow::Context;
use clap::{FromArgMatches, Parser, Subcommand, ValueEnum};
use mnist_prep::format::reader;
use mnist_prep::parsing::{idx::IdxSource, mnist::CsvSource, DatasetSource};
use mnist_prep::report;
use std::path::PathBuf;

const DEFAULT_OUTPUT: &str = "data/mnist.bin";
const DEFAULT_CSV: &str = "data/mnist.csv";
const DEFAULT_IDX_DIR: &str = "data/mnist";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What to do. Without a subcommand the default conversion runs
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert raw MNIST into the flat binary layout
    Convert(ConvertArgs),
    /// Read a converted file back and describe it
    Inspect(InspectArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SourceKind {
    /// Kaggle style CSV, label first
    Csv,
    /// Directory holding the four original IDX files
    Idx,
}

impl SourceKind {
    fn default_input(self) -> PathBuf {
        match self {
            SourceKind::Csv => PathBuf::from(DEFAULT_CSV),
            SourceKind::Idx => PathBuf::from(DEFAULT_IDX_DIR),
        }
    }
}

#[derive(clap::Args, Debug)]
struct ConvertArgs {
    /// Where the raw dataset comes from
    #[arg(short, long, value_enum, default_value_t = SourceKind::Csv)]
    source: SourceKind,

    /// Path of the raw dataset (a CSV file or an IDX directory)
    /// Defaults to data/mnist.csv or data/mnist depending on the source
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Path of the binary file to write
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// The CSV file has no header line
    #[arg(long)]
    no_headers: bool,
}

impl ConvertArgs {
    /// The arguments of a bare `convert`, taken from the clap defaults above
    fn defaults() -> Result<Self, clap::Error> {
        let command = <ConvertArgs as clap::Args>::augment_args(clap::Command::new("convert"));
        let matches = command.try_get_matches_from(["convert"])?;

        ConvertArgs::from_arg_matches(&matches)
    }
}

impl Command {
    /// No subcommand means a default conversion
    fn resolve(command: Option<Command>) -> Result<Command, clap::Error> {
        match command {
            Some(command) => Ok(command),
            None => Ok(Command::Convert(ConvertArgs::defaults()?)),
        }
    }
}

#[derive(clap::Args, Debug)]
struct InspectArgs {
    /// Path of the binary file to read
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    path: PathBuf,

    /// Print the sample at this index as ASCII art
    #[arg(short, long)]
    index: Option<usize>,

    /// Print a JSON summary instead of plain text
    #[arg(short, long)]
    json: bool,
}

/// Fetch, normalize and write the dataset
fn convert(args: ConvertArgs) -> anyhow::Result<()> {
    let input = args.input.unwrap_or_else(|| args.source.default_input());
    let source: Box<dyn DatasetSource> = match args.source {
        SourceKind::Csv => Box::new(CsvSource::new(input).has_headers(!args.no_headers)),
        SourceKind::Idx => Box::new(IdxSource::new(input)),
    };

    let header = mnist_prep::prepare(source.as_ref(), &args.output).with_context(|| {
        format!(
            "failed to convert {} into {}",
            source.describe(),
            args.output.display()
        )
    })?;

    println!("{}", report::confirmation(&header, &args.output));

    Ok(())
}

/// Read a converted file back and describe it
fn inspect(args: InspectArgs) -> anyhow::Result<()> {
    let dataset = reader::read_dataset(&args.path)
        .with_context(|| format!("failed to read {}", args.path.display()))?;

    if args.json {
        println!("{}", report::summary_json(&dataset).pretty(2));
    } else {
        println!(
            "{}: {} samples, {} features",
            args.path.display(),
            dataset.num_samples(),
            dataset.num_features()
        );
    }

    if let Some(index) = args.index {
        let image = dataset.image(index).with_context(|| {
            format!(
                "index {} is out of range for {} samples",
                index,
                dataset.num_samples()
            )
        })?;
        let width = report::preview_width(dataset.num_features());

        print!(
            "{}",
            report::render_ascii(&image, dataset.label(index), width)
        );
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    match Command::resolve(args.command)? {
        Command::Convert(args) => convert(args),
        Command::Inspect(args) => inspect(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn no_subcommand_is_a_default_conversion() {
        let args = Args::try_parse_from(["mnist_prep"]).unwrap();

        match Command::resolve(args.command).unwrap() {
            Command::Convert(convert) => {
                assert_eq!(convert.output, PathBuf::from(DEFAULT_OUTPUT));
                assert!(convert.input.is_none());
                assert!(matches!(convert.source, SourceKind::Csv));
                assert!(!convert.no_headers);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn defaults_match_an_explicit_convert() {
        let explicit = Args::try_parse_from(["mnist_prep", "convert"]).unwrap();
        let defaults = ConvertArgs::defaults().unwrap();

        match explicit.command {
            Some(Command::Convert(convert)) => {
                assert_eq!(convert.output, defaults.output);
                assert_eq!(convert.input, defaults.input);
                assert_eq!(convert.no_headers, defaults.no_headers);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn convert_flags_are_parsed() {
        let args = Args::try_parse_from([
            "mnist_prep", "convert", "-s", "idx", "-i", "raw", "-o", "out.bin",
        ])
        .unwrap();

        match args.command {
            Some(Command::Convert(convert)) => {
                assert!(matches!(convert.source, SourceKind::Idx));
                assert_eq!(convert.input, Some(PathBuf::from("raw")));
                assert_eq!(convert.output, PathBuf::from("out.bin"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn inspect_defaults_to_the_conversion_output() {
        let args = Args::try_parse_from(["mnist_prep", "inspect", "--json"]).unwrap();

        match args.command {
            Some(Command::Inspect(inspect)) => {
                assert_eq!(inspect.path, PathBuf::from(DEFAULT_OUTPUT));
                assert!(inspect.json);
                assert!(inspect.index.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
