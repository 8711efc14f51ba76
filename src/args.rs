use clap::Parser;

/// Pairing, workload and conflict analysis for a homebrew competition
/// judging schedule.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The judge/table assignment sheet in TSV format. Each row
    /// assigns one judge to one desired table. See the manual for the
    /// expected columns.
    #[clap(short, long, value_parser)]
    pub assignments: String,

    /// (file path) The table-to-style mapping in CSV format (Table Number,
    /// BJCP Style Id, BJCP Style Name, Medal Category Name).
    #[clap(short, long, value_parser)]
    pub styles: String,

    /// (file path) The table entry counts in CSV format (Table Number,
    /// Count). Tables without a record default to zero entries.
    #[clap(short, long, value_parser)]
    pub counts: Option<String>,

    /// (file path) The master judge roster in CSV format, with per-site
    /// travel distances and active status. When provided, replacement
    /// candidates are suggested for understaffed or conflicted tables.
    #[clap(long, value_parser)]
    pub roster: Option<String>,

    /// (file path) If specified, the rendered HTML schedule will be written
    /// to the given location.
    #[clap(long, value_parser)]
    pub out_html: Option<String>,

    /// (file path) If specified, a CSV pairing worksheet for manual
    /// adjustments will be written to the given location.
    #[clap(long, value_parser)]
    pub out_worksheet: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the
    /// analysis will be written in JSON format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing a previous summary in JSON
    /// format. If provided, brewsched will check that the computed summary
    /// matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the
    /// standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
