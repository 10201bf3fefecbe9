use console::style;

mod exports;
mod progress;
mod summary;
mod tables;

pub use exports::export_json;
pub use progress::FetchProgress;
pub use summary::render_summary;

/// Prints the `Bamboolens` banner to stderr.
///
/// Displays the tool name, version, and description at the start of execution.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        style("🎋 Bamboolens").magenta().bold(),
        style(env!("CARGO_PKG_VERSION")).dim(),
        style("Bamboo build chain explorer").dim()
    );
}
