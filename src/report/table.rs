//! GitHub-flavoured pipe tables for repository leaderboards.

use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};

use crate::summary::{RepositoryTable, Summary};

/// Header of the leading user column.
pub const USER_HEADER: &str = "User";

/// Text printed when no repository produced a table.
pub const NO_DATA: &str = "No data found.";

/// Renders one leaderboard as a Markdown pipe table.
///
/// The user column is left aligned and metric columns right aligned.
///
/// ```text
/// | User  | PRs Created |
/// |-------|-------------|
/// | alice |           3 |
/// ```
#[must_use]
pub fn render_table(table: &RepositoryTable) -> String {
    let mut builder = Builder::default();
    builder.push_record(
        std::iter::once(USER_HEADER.to_owned())
            .chain(table.columns.iter().map(|metric| metric.header().to_owned())),
    );
    for row in &table.rows {
        builder.push_record(
            std::iter::once(row.user.clone()).chain(row.values.iter().map(ToString::to_string)),
        );
    }

    let mut rendered = builder.build();
    rendered
        .with(Style::markdown())
        .modify(Columns::new(1..), Alignment::right());
    rendered.to_string()
}

/// Renders the whole report.
///
/// Warnings come first, then each table under a `Stats for <repository>:`
/// heading followed by a blank line; a report without tables reads
/// `No data found.`.
#[must_use]
pub fn render_report(summary: &Summary) -> String {
    let mut blocks: Vec<String> = summary
        .warnings
        .iter()
        .map(|warning| format!("Warning: {warning}"))
        .collect();

    if summary.is_empty() {
        blocks.push(NO_DATA.to_owned());
        return blocks.join("\n");
    }

    for table in &summary.tables {
        blocks.push(format!("\nStats for {}:", table.repository));
        blocks.push(render_table(table));
        blocks.push(String::new());
    }
    blocks.join("\n")
}
