use crate::cli::args::{Args, Command, FamilyArgs, OutputArgs, OutputFormat};
use crate::cli::{output, reader};
use ipnetwork::IpNetwork;
use log::{info, warn};
use prefixopt::{
    diff, find_covering, intersect, parse_prefix, process_networks, sort_networks, subdivide,
    subnet_count, subtract_networks, summarize, Error, FilterRules, PipelineOptions, Result,
};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/*-------------------------------------------------------------------------------------------------
  Command Implementations
-------------------------------------------------------------------------------------------------*/

/// Ceiling on the number of subnets one split command may generate.
pub const MAX_SPLIT_SUBNETS: u128 = 1 << 20;

pub fn run(args: &Args) -> Result<()> {
    match &args.command {
        Command::Optimize {
            sources,
            family,
            output,
            keep_comments,
        } => run_optimize(&sources.files, family, output, *keep_comments),

        Command::Add {
            file,
            prefixes,
            output,
            keep_comments,
        } => run_add(file, prefixes, output, *keep_comments),

        Command::Filter {
            sources,
            family,
            output,
            bogons,
            no_private,
            no_loopback,
            no_link_local,
            no_multicast,
            no_reserved,
        } => {
            let rules = if *bogons {
                FilterRules::bogons()
            } else {
                FilterRules {
                    exclude_private: *no_private,
                    exclude_loopback: *no_loopback,
                    exclude_link_local: *no_link_local,
                    exclude_multicast: *no_multicast,
                    exclude_reserved: *no_reserved,
                    exclude_unspecified: *no_reserved,
                }
            };
            if rules.is_empty() && !family.ipv4_only && !family.ipv6_only {
                warn!("no filter categories enabled; output will equal input");
            }

            let networks = reader::read_sources(&sources.files)?;
            let options = PipelineOptions {
                ipv4_only: family.ipv4_only,
                ipv6_only: family.ipv6_only,
                rules,
                ..PipelineOptions::default()
            };
            output::write_networks(&process_networks(networks, &options), output)
        }

        Command::Merge {
            sources,
            family,
            output,
            keep_comments,
        } => run_optimize(&sources.files, family, output, *keep_comments),

        Command::Intersect {
            file_a,
            file_b,
            output,
            quiet,
        } => {
            let set_a = reader::read_source(file_a)?;
            let set_b = reader::read_source(file_b)?;
            let report = intersect(set_a, set_b);

            if *quiet || output.output.is_some() {
                output::write_networks(&report.participating_networks(), output)
            } else {
                output::intersection_table(&report);
                Ok(())
            }
        }

        Command::Exclude {
            sources,
            exclude,
            output,
        } => {
            let networks = reader::read_sources(&sources.files)?;
            let mut excludes: Vec<IpNetwork> = Vec::new();
            for target in exclude {
                excludes.extend(parse_exclude_target(target)?);
            }

            let remaining = subtract_networks(networks, excludes)?;
            info!("{} prefixes remain after exclusion", remaining.len());
            output::write_networks(&remaining, output)
        }

        Command::Diff {
            new_file,
            old_file,
            family,
            output,
            mode,
            summary,
        } => {
            let family_filter = PipelineOptions {
                ipv4_only: family.ipv4_only,
                ipv6_only: family.ipv6_only,
                ..PipelineOptions::default()
            };
            let new_set = process_networks(reader::read_source(new_file)?, &family_filter);
            let old_set = process_networks(reader::read_source(old_file)?, &family_filter);
            let report = diff(new_set, old_set)?;
            output::diff_output(&report, *mode, *summary, output)
        }

        Command::Check { target, sources } => {
            let target = parse_prefix(target)?;
            let set = reader::read_sources(&sources.files)?;
            output::check_output(&target, &find_covering(&set, &target));
            Ok(())
        }

        Command::Split {
            length,
            prefix,
            file,
            output,
        } => {
            let parents: Vec<IpNetwork> = match (prefix, file) {
                (Some(prefix), _) => vec![parse_prefix(prefix)?],
                (None, Some(path)) => reader::read_source(path)?,
                (None, None) => reader::read_sources(&[])?,
            };

            let mut total: u128 = 0;
            let mut subnets: Vec<IpNetwork> = Vec::new();
            for parent in &parents {
                total = total.saturating_add(subnet_count(parent, *length));
                if total > MAX_SPLIT_SUBNETS {
                    return Err(Error::ResourceExceeded(format!(
                        "split would generate more than {MAX_SPLIT_SUBNETS} subnets"
                    )));
                }
                subnets.extend(subdivide(parent, *length)?);
            }
            output::write_networks(&subnets, output)
        }

        Command::Stats { sources, details } => {
            let networks = reader::read_sources(&sources.files)?;
            output::stats_table(&summarize(&networks), *details);
            Ok(())
        }
    }
}

/*--------------------------------------------------------------------------------------
  Optimize / Merge
--------------------------------------------------------------------------------------*/

fn run_optimize(
    files: &[PathBuf],
    family: &FamilyArgs,
    output: &OutputArgs,
    keep_comments: bool,
) -> Result<()> {
    if keep_comments {
        let entries = reader::read_with_comments(files)?;
        return dedupe_with_comments(entries, family, output);
    }

    let networks = reader::read_sources(files)?;
    let options = PipelineOptions {
        ipv4_only: family.ipv4_only,
        ipv6_only: family.ipv6_only,
        ..PipelineOptions::optimize()
    };
    output::write_networks(&process_networks(networks, &options), output)
}

/// De-duplicate while keeping nesting and trailing comments. When the same
/// prefix appears with and without a comment, the commented occurrence wins;
/// between two commented occurrences the first wins.
fn dedupe_with_comments(
    entries: Vec<(IpNetwork, Option<String>)>,
    family: &FamilyArgs,
    output: &OutputArgs,
) -> Result<()> {
    if output.format == OutputFormat::Csv {
        return Err(Error::Usage(
            "--keep-comments cannot be combined with --format csv".to_string(),
        ));
    }

    let mut comments: HashMap<IpNetwork, Option<String>> = HashMap::new();
    for (network, comment) in entries {
        if family.ipv4_only && matches!(network, IpNetwork::V6(_)) {
            continue;
        }
        if family.ipv6_only && matches!(network, IpNetwork::V4(_)) {
            continue;
        }
        match comments.entry(network) {
            Entry::Vacant(entry) => {
                entry.insert(comment);
            }
            Entry::Occupied(mut entry) => {
                if entry.get().is_none() && comment.is_some() {
                    entry.insert(comment);
                }
            }
        }
    }

    let mut networks: Vec<IpNetwork> = comments.keys().copied().collect();
    sort_networks(&mut networks);

    let entries: Vec<(IpNetwork, Option<String>)> = networks
        .into_iter()
        .map(|network| {
            let comment = comments[&network].clone();
            (network, comment)
        })
        .collect();

    output::write_networks_with_comments(&entries, output)
}

/*--------------------------------------------------------------------------------------
  Add
--------------------------------------------------------------------------------------*/

fn run_add(
    file: &Path,
    prefixes: &[String],
    output: &OutputArgs,
    keep_comments: bool,
) -> Result<()> {
    // Prefixes given on the command line are explicit user input; a typo is
    // fatal here, unlike stray tokens in scanned files.
    let added: Vec<IpNetwork> = prefixes
        .iter()
        .map(|text| parse_prefix(text))
        .collect::<Result<_>>()?;

    if keep_comments {
        let mut entries = reader::read_with_comments(&[file.to_path_buf()])?;
        for network in added {
            entries.push((network, Some("Added manually".to_string())));
        }
        return dedupe_with_comments(entries, &FamilyArgs::default(), output);
    }

    let mut networks = reader::read_source(file)?;
    networks.extend(added);
    output::write_networks(
        &process_networks(networks, &PipelineOptions::optimize()),
        output,
    )
}

/*--------------------------------------------------------------------------------------
  Exclude Targets
--------------------------------------------------------------------------------------*/

/// An exclude target is either a prefix literal or a path to a file of
/// prefixes. Paths are tried first so a file named after a prefix still
/// reads as a file.
fn parse_exclude_target(target: &str) -> Result<Vec<IpNetwork>> {
    let path = Path::new(target);
    if path.is_file() {
        return reader::read_source(path);
    }
    Ok(vec![parse_prefix(target)?])
}
