use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/*-------------------------------------------------------------------------------------------------
  Command Line Interface (CLI) Arguments
-------------------------------------------------------------------------------------------------*/

#[derive(Parser, Debug)]
#[command(author, version, about = "Optimize and analyze lists of IPv4/IPv6 prefixes.", long_about = None)]
// The intersect subcommand defines its own --quiet; the verbosity --quiet must
// not be global or the two collide inside that subcommand.
#[command(mut_arg("quiet", |a| a.global(false)))]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Logging verbosity
    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sort, de-duplicate, remove nested prefixes, and aggregate siblings
    Optimize {
        #[command(flatten)]
        sources: SourceArgs,

        #[command(flatten)]
        family: FamilyArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// Only de-duplicate; preserve nested prefixes and trailing comments
        #[arg(long)]
        keep_comments: bool,
    },

    /// Add prefixes to an existing list and re-optimize it
    Add {
        /// File holding the existing prefix list
        file: PathBuf,

        /// Prefixes to add
        #[arg(required = true)]
        prefixes: Vec<String>,

        #[command(flatten)]
        output: OutputArgs,

        /// Only de-duplicate; preserve nested prefixes and trailing comments
        #[arg(long)]
        keep_comments: bool,
    },

    /// Remove reserved or otherwise unwanted prefixes without splitting
    Filter {
        #[command(flatten)]
        sources: SourceArgs,

        #[command(flatten)]
        family: FamilyArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// Remove all reserved ranges (shorthand for every --no-* flag)
        #[arg(long)]
        bogons: bool,

        /// Remove RFC 1918 / ULA private ranges
        #[arg(long)]
        no_private: bool,

        /// Remove loopback ranges
        #[arg(long)]
        no_loopback: bool,

        /// Remove link-local ranges
        #[arg(long)]
        no_link_local: bool,

        /// Remove multicast ranges
        #[arg(long)]
        no_multicast: bool,

        /// Remove IANA special-purpose and documentation ranges
        #[arg(long)]
        no_reserved: bool,
    },

    /// Combine multiple prefix lists into one optimized list
    Merge {
        #[command(flatten)]
        sources: SourceArgs,

        #[command(flatten)]
        family: FamilyArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// Only de-duplicate; preserve nested prefixes and trailing comments
        #[arg(long)]
        keep_comments: bool,
    },

    /// Report prefixes common to two lists, exact and partial
    Intersect {
        /// First prefix list
        file_a: PathBuf,

        /// Second prefix list
        file_b: PathBuf,

        #[command(flatten)]
        output: OutputArgs,

        /// Print only the participating prefixes, no table
        #[arg(long)]
        quiet: bool,
    },

    /// Remove address space from a list, splitting prefixes as needed
    Exclude {
        #[command(flatten)]
        sources: SourceArgs,

        /// Prefix, address, or file of prefixes to remove
        #[arg(short = 'x', long, required = true)]
        exclude: Vec<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Compare two lists by aggregated address coverage
    Diff {
        /// Updated prefix list
        new_file: PathBuf,

        /// Baseline prefix list
        old_file: PathBuf,

        #[command(flatten)]
        family: FamilyArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// Which sections of the comparison to print
        #[arg(long, value_enum, default_value = "changes")]
        mode: DiffMode,

        /// Print section counts instead of patch lines
        #[arg(long)]
        summary: bool,
    },

    /// Find the prefixes in a list that cover a target address or subnet
    Check {
        /// Address or prefix to look up
        target: String,

        #[command(flatten)]
        sources: SourceArgs,
    },

    /// Subdivide a prefix into subnets of a longer prefix length
    Split {
        /// Target prefix length of the generated subnets
        length: u8,

        /// Prefix to subdivide; omit to read prefixes from --file or stdin
        prefix: Option<String>,

        /// Read the prefixes to subdivide from a file
        #[arg(short, long)]
        file: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Summarize a prefix list: counts, coverage, compression
    Stats {
        #[command(flatten)]
        sources: SourceArgs,

        /// Include per-family counts and prefix-length ranges
        #[arg(long)]
        details: bool,
    },
}

/*--------------------------------------------------------------------------------------
  Shared Argument Groups
--------------------------------------------------------------------------------------*/

#[derive(clap::Args, Debug)]
pub struct SourceArgs {
    /// Input files; read from standard input when none are given
    pub files: Vec<PathBuf>,
}

#[derive(clap::Args, Debug, Clone, Copy, Default)]
pub struct FamilyArgs {
    /// Keep only IPv4 prefixes
    #[arg(short = '4', long)]
    pub ipv4_only: bool,

    /// Keep only IPv6 prefixes
    #[arg(short = '6', long, conflicts_with = "ipv4_only")]
    pub ipv6_only: bool,
}

#[derive(clap::Args, Debug)]
pub struct OutputArgs {
    /// Write results to a file instead of standard output
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "list")]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One CIDR prefix per line
    List,
    /// All prefixes on one comma-separated line
    Csv,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffMode {
    /// Added and removed coverage
    Changes,
    /// Added coverage only
    Added,
    /// Removed coverage only
    Removed,
    /// Coverage common to both lists
    Unchanged,
    /// Added, removed, and unchanged coverage
    All,
}
