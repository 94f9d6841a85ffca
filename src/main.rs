use std::path::PathBuf;

use clap::Parser;
use log::debug;
use sdfjoin::{
    config::{Config, DEFAULT_ID},
    join::join_results,
    load_needles,
    output::print_table,
    read_input_file,
    row::{Props, RowType},
    write_output_file, Result,
};

/// Look up the molecules listed in one or more needle files in a haystack file
/// and print the requested properties of the matches.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// CSV or LST output file. If absent, the result is only printed.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// ID property name, shared by the haystack and all of the needle files.
    /// Defaults to ID.
    #[arg(short, long)]
    id: Option<String>,

    /// Properties to extract from the haystack, separated by commas or spaces.
    #[arg(short, long)]
    props: Option<String>,

    /// Keep needle IDs that are not in the haystack as rows with empty
    /// properties.
    #[arg(short = 'm', long)]
    include_missing: bool,

    /// TOML file providing defaults for the options above.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// SDF or CSV file to search in.
    haystack_file: PathBuf,

    /// SDF or CSV files with the molecules to search for.
    #[arg(required = true)]
    needle_files: Vec<PathBuf>,
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let id = cli.id.or(config.id).unwrap_or_else(|| DEFAULT_ID.to_owned());
    let props = cli.props.map(Props::Text).or(config.props);
    let output = cli.output.or(config.output);
    let include_missing =
        cli.include_missing || config.include_missing.unwrap_or(false);

    let row_type = RowType::new(props.unwrap_or_default(), &id)?;
    debug!("columns: {row_type}");

    let haystack = read_input_file(&cli.haystack_file, row_type.names())?;
    let needle = load_needles(&cli.needle_files, row_type.names())?;

    let result = join_results(&haystack, &needle, &row_type, include_missing);

    print_table(&result, &row_type)?;
    if let Some(output) = output {
        write_output_file(output, &result, &row_type)?;
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
