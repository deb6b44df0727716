use crate::cli::args::{DiffMode, OutputArgs, OutputFormat};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::{NOTHING, UTF8_FULL};
use comfy_table::*;
use ipnetwork::IpNetwork;
use prefixopt::{DiffReport, Error, IntersectionReport, Result, StatsSummary};
use std::fs::File;
use std::io::Write as IoWrite;
use std::path::PathBuf;

/*-------------------------------------------------------------------------------------------------
  Output Functions
-------------------------------------------------------------------------------------------------*/

fn sink(output: &Option<PathBuf>) -> Result<Box<dyn IoWrite>> {
    match output {
        Some(path) => Ok(Box::new(File::create(path)?)),
        None => Ok(Box::new(std::io::stdout().lock())),
    }
}

/*--------------------------------------------------------------------------------------
  Prefix Lists
--------------------------------------------------------------------------------------*/

/// Write a prefix list in the selected format: one CIDR per line, or all
/// prefixes on a single comma-separated line.
pub fn write_networks(networks: &[IpNetwork], output: &OutputArgs) -> Result<()> {
    let mut writer = sink(&output.output)?;

    match output.format {
        OutputFormat::List => {
            for network in networks {
                writeln!(writer, "{network}")?;
            }
        }
        OutputFormat::Csv => {
            let line = networks
                .iter()
                .map(|n| n.to_string())
                .collect::<Vec<_>>()
                .join(",");
            writeln!(writer, "{line}")?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Write a prefix list with the preserved trailing comments re-attached.
pub fn write_networks_with_comments(
    entries: &[(IpNetwork, Option<String>)],
    output: &OutputArgs,
) -> Result<()> {
    let mut writer = sink(&output.output)?;

    for (network, comment) in entries {
        match comment {
            Some(comment) => writeln!(writer, "{network} # {comment}")?,
            None => writeln!(writer, "{network}")?,
        }
    }

    writer.flush()?;
    Ok(())
}

/*--------------------------------------------------------------------------------------
  Statistics Table
--------------------------------------------------------------------------------------*/

fn format_prefix_range(range: Option<(u8, u8)>) -> String {
    match range {
        Some((lo, hi)) if lo == hi => format!("/{lo}"),
        Some((lo, hi)) => format!("/{lo} - /{hi}"),
        None => "-".to_string(),
    }
}

pub fn stats_table(summary: &StatsSummary, details: bool) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Metric").add_attribute(Attribute::Bold).fg(Color::Green),
        Cell::new("Value").add_attribute(Attribute::Bold).fg(Color::Green),
    ]);

    table.add_row(vec![Cell::new("Prefixes"), Cell::new(summary.raw_count)]);
    table.add_row(vec![
        Cell::new("Aggregated prefixes"),
        Cell::new(summary.aggregated_count),
    ]);
    table.add_row(vec![
        Cell::new("Compression ratio"),
        Cell::new(format!("{:.2}", summary.compression_ratio())),
    ]);
    table.add_row(vec![
        Cell::new("Unique addresses"),
        Cell::new(summary.unique_address_count),
    ]);
    table.add_row(vec![
        Cell::new("Addresses listed"),
        Cell::new(summary.raw_address_count),
    ]);

    if details {
        table.add_row(vec![Cell::new("IPv4 prefixes"), Cell::new(summary.ipv4_count)]);
        table.add_row(vec![
            Cell::new("IPv4 prefix lengths"),
            Cell::new(format_prefix_range(summary.ipv4_prefix_range)),
        ]);
        table.add_row(vec![Cell::new("IPv6 prefixes"), Cell::new(summary.ipv6_count)]);
        table.add_row(vec![
            Cell::new("IPv6 prefix lengths"),
            Cell::new(format_prefix_range(summary.ipv6_prefix_range)),
        ]);
    }

    let values_column = table.column_mut(1).expect("the value column exists");
    values_column.set_cell_alignment(CellAlignment::Right);

    println!("{table}");
}

/*--------------------------------------------------------------------------------------
  Intersection Report
--------------------------------------------------------------------------------------*/

pub fn intersection_table(report: &IntersectionReport) {
    if report.is_empty() {
        println!("No intersecting prefixes.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Prefix A").add_attribute(Attribute::Bold).fg(Color::Green),
        Cell::new("Prefix B").add_attribute(Attribute::Bold).fg(Color::Green),
        Cell::new("Relationship").add_attribute(Attribute::Bold).fg(Color::Green),
        Cell::new("Overlapping Addresses").add_attribute(Attribute::Bold).fg(Color::Green),
    ]);

    for (a, b) in &report.exact {
        table.add_row(vec![
            Cell::new(a).add_attribute(Attribute::Bold),
            Cell::new(b),
            Cell::new("exact"),
            Cell::new(prefixopt::address_count(a)),
        ]);
    }

    for (a, b, overlap) in &report.partial {
        let overlap_count = (overlap.end - overlap.start).saturating_add(1);
        table.add_row(vec![
            Cell::new(a).add_attribute(Attribute::Bold),
            Cell::new(b),
            Cell::new("partial"),
            Cell::new(overlap_count),
        ]);
    }

    println!("{table}");

    let mut summary_table = Table::new();
    summary_table
        .load_preset(NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic);
    summary_table.add_row(vec![
        Cell::new(report.exact.len()),
        Cell::new("exact matches"),
    ]);
    summary_table.add_row(vec![
        Cell::new(report.partial.len()),
        Cell::new("partial overlaps"),
    ]);

    let numbers_column = summary_table.column_mut(0).expect("the first column exists");
    numbers_column.set_cell_alignment(CellAlignment::Right);

    println!("{summary_table}");
}

/*--------------------------------------------------------------------------------------
  Difference Patch
--------------------------------------------------------------------------------------*/

/// Write the comparison as patch lines (`+` added, `-` removed, `=`
/// unchanged) or, with `summary`, as section counts.
pub fn diff_output(
    report: &DiffReport,
    mode: DiffMode,
    summary: bool,
    output: &OutputArgs,
) -> Result<()> {
    if output.format == OutputFormat::Csv {
        return Err(Error::Usage(
            "patch output is line-oriented; --format csv is not supported here".to_string(),
        ));
    }

    let mut writer = sink(&output.output)?;

    if summary {
        writeln!(writer, "added:     {}", report.added.len())?;
        writeln!(writer, "removed:   {}", report.removed.len())?;
        writeln!(writer, "unchanged: {}", report.unchanged.len())?;
        writer.flush()?;
        return Ok(());
    }

    let show_added = matches!(mode, DiffMode::Changes | DiffMode::Added | DiffMode::All);
    let show_removed = matches!(mode, DiffMode::Changes | DiffMode::Removed | DiffMode::All);
    let show_unchanged = matches!(mode, DiffMode::Unchanged | DiffMode::All);

    if show_added {
        for network in &report.added {
            writeln!(writer, "+ {network}")?;
        }
    }
    if show_removed {
        for network in &report.removed {
            writeln!(writer, "- {network}")?;
        }
    }
    if show_unchanged {
        for network in &report.unchanged {
            writeln!(writer, "= {network}")?;
        }
    }

    writer.flush()?;
    Ok(())
}

/*--------------------------------------------------------------------------------------
  Containment Report
--------------------------------------------------------------------------------------*/

pub fn check_output(target: &IpNetwork, covering: &[IpNetwork]) {
    if covering.is_empty() {
        println!("{target} is not covered by any prefix");
        return;
    }

    for network in covering {
        println!("{network}");
    }
}
