use std::fmt::Write;

use comfy_table::Cell;
use console::style;

use crate::report::{Answer, Report};

use super::tables::{color_coded_state_cell, create_table, cyan_header};

/// Renders a human-readable summary of a report.
///
/// Listings (plans, issues, changes) are shown as tables; single values as
/// labelled lines. Build chains are shown requested build first.
pub fn render_summary(report: &Report) -> String {
    let mut output = String::new();

    let _ = writeln!(
        output,
        "  {} {}",
        style("Server:").dim(),
        style(&report.server).cyan()
    );
    let _ = writeln!(
        output,
        "  {} {}\n",
        style("Collected:").dim(),
        style(report.collected_at.format("%Y-%m-%d %H:%M UTC")).dim()
    );

    match &report.answer {
        Answer::LatestSuccessfulBuild { plan, number } => {
            add_line(&mut output, "Plan:", style(plan).cyan());
            add_line(
                &mut output,
                "Latest successful build:",
                style(number).bright().green(),
            );
        }
        Answer::BuildStatus {
            plan,
            number,
            life_cycle_state,
        } => {
            add_line(&mut output, "Build:", style(format!("{plan} #{number}")).cyan());
            add_line(
                &mut output,
                "Lifecycle state:",
                style(life_cycle_state).bright().yellow(),
            );
        }
        Answer::LatestBuildStatus {
            plan,
            number,
            state,
        } => {
            let mut table = create_table();
            table.set_header(cyan_header(&["Plan", "Build", "State"]));
            table.add_row(vec![
                Cell::new(plan),
                Cell::new(number),
                color_coded_state_cell(state),
            ]);
            let _ = writeln!(output, "{table}");
        }
        Answer::Plans { plans } => {
            add_section_header(&mut output, &format!("Plans ({})", plans.len()));
            let mut table = create_table();
            table.set_header(cyan_header(&["Key", "Name"]));
            for plan in plans {
                table.add_row(vec![Cell::new(&plan.key), Cell::new(&plan.name)]);
            }
            let _ = writeln!(output, "{table}");
        }
        Answer::Artifact {
            build,
            name,
            content,
        } => {
            add_section_header(&mut output, &format!("Artifact {name} of {build}"));
            let _ = writeln!(output, "{content}");
        }
        Answer::JiraIssues {
            build,
            chain,
            issues,
        } => render_chain(&mut output, build, chain, "JIRA issues", issues),
        Answer::Changes {
            build,
            chain,
            changes,
        } => render_chain(&mut output, build, chain, "Changes", changes),
    }

    output
}

fn add_line(output: &mut String, label: &str, value: impl std::fmt::Display) {
    let _ = writeln!(output, "  {} {}", style(label).dim(), value);
}

fn add_section_header(output: &mut String, title: &str) {
    let _ = writeln!(output, "{}", style(title).bright().underlined());
}

fn render_chain(output: &mut String, build: &str, chain: &[String], title: &str, items: &[String]) {
    add_line(output, "Build:", style(build).cyan());
    add_line(output, "Chain:", style(chain.join(" → ")).dim());
    output.push('\n');

    add_section_header(output, &format!("{title} ({})", items.len()));
    if items.is_empty() {
        let _ = writeln!(output, "  {}", style("None found.").bright().yellow());
        return;
    }

    let mut table = create_table();
    table.set_header(cyan_header(&["#", title]));
    for (index, item) in items.iter().enumerate() {
        table.add_row(vec![Cell::new(index + 1), Cell::new(item)]);
    }
    let _ = writeln!(output, "{table}");
}
