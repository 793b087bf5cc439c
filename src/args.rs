use clap::Parser;

/// This is a text-menu student election manager.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (directory path) The directory holding the election data files
    /// (users.txt, manifestos.txt, votes.txt, results.txt, vote_updates.txt).
    /// Missing files are created on startup.
    #[clap(short, long, value_parser, default_value = ".")]
    pub data_dir: String,

    /// (file path or empty) If specified, a summary of the published results will be written
    /// in JSON format to the given location every time the admin publishes.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
