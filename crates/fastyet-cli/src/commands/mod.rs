pub mod chart;
pub mod check;
pub mod summary;

/// Output format shared by the reporting commands.
#[derive(Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}
