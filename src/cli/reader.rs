use ipnetwork::IpNetwork;
use lazy_static::lazy_static;
use log::{debug, info, warn};
use prefixopt::{parse_prefix, Error, Result};
use regex::Regex;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader, IsTerminal};
use std::path::{Path, PathBuf};

/*-------------------------------------------------------------------------------------------------
  Input Readers
-------------------------------------------------------------------------------------------------*/

/// Largest input file accepted, in bytes.
pub const MAX_FILE_SIZE_BYTES: u64 = 700 * 1024 * 1024;

/// Largest number of input lines accepted per source, enforced while
/// reading, before the source is fully buffered.
pub const MAX_LINE_COUNT: u64 = 8_000_000;

lazy_static! {
    static ref IPV4_TOKEN: Regex =
        Regex::new(r"(?:\d{1,3}\.){3}\d{1,3}(?:/\d{1,2})?").expect("IPv4 token pattern is valid");
    static ref IPV6_TOKEN: Regex =
        Regex::new(r"(?:[0-9A-Fa-f]{0,4}:){2,7}[0-9A-Fa-f]{0,4}(?:/\d{1,3})?")
            .expect("IPv6 token pattern is valid");
}

/*--------------------------------------------------------------------------------------
  Token Extraction
--------------------------------------------------------------------------------------*/

/// Strip leading zeros from every octet of an IPv4 token. Octal-looking
/// octets ("010") are read as decimal; some parsers interpret them as octal,
/// which has led to access-control bypasses, so the ambiguity is removed
/// before parsing.
fn repair_leading_zeros(token: &str) -> String {
    let (address, length) = match token.split_once('/') {
        Some((address, length)) => (address, Some(length)),
        None => (token, None),
    };

    let repaired = address
        .split('.')
        .map(|octet| {
            let trimmed = octet.trim_start_matches('0');
            if trimmed.is_empty() { "0" } else { trimmed }
        })
        .collect::<Vec<_>>()
        .join(".");

    match length {
        Some(length) => format!("{repaired}/{length}"),
        None => repaired,
    }
}

/// Extract every address-like token from a line of free text. Tokens that do
/// not parse as valid prefixes are logged and skipped, never fatal.
pub fn extract_networks(line: &str) -> Vec<IpNetwork> {
    let mut networks: Vec<IpNetwork> = Vec::new();

    for token in IPV4_TOKEN.find_iter(line) {
        let repaired = repair_leading_zeros(token.as_str());
        match parse_prefix(&repaired) {
            Ok(network) => networks.push(network),
            Err(_) => warn!("skipping invalid IPv4 token: {:?}", token.as_str()),
        }
    }

    for token in IPV6_TOKEN.find_iter(line) {
        match parse_prefix(token.as_str()) {
            Ok(network) => networks.push(network),
            Err(_) => warn!("skipping invalid IPv6 token: {:?}", token.as_str()),
        }
    }

    networks
}

/*--------------------------------------------------------------------------------------
  Source Dispatch
--------------------------------------------------------------------------------------*/

/// Read networks from the named files, or from standard input when no files
/// are given. `.csv` files read the `prefix` column, `.json` files the
/// top-level `prefixes` array; anything else is scanned as free text.
pub fn read_sources(files: &[PathBuf]) -> Result<Vec<IpNetwork>> {
    if files.is_empty() {
        return read_stdin();
    }

    let mut networks: Vec<IpNetwork> = Vec::new();
    for path in files {
        networks.extend(read_source(path)?);
    }
    Ok(networks)
}

/// Read networks from one file, dispatching on its extension.
pub fn read_source(path: &Path) -> Result<Vec<IpNetwork>> {
    check_file_size(path)?;

    let networks = match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => read_csv(path)?,
        Some("json") => read_json(path)?,
        _ => read_text(BufReader::new(File::open(path)?))?,
    };

    info!("read {} prefixes from {}", networks.len(), path.display());
    Ok(networks)
}

fn read_stdin() -> Result<Vec<IpNetwork>> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Err(Error::Usage(
            "no input files given and standard input is a terminal".to_string(),
        ));
    }
    read_text(stdin.lock())
}

fn check_file_size(path: &Path) -> Result<()> {
    let size = std::fs::metadata(path)?.len();
    if size > MAX_FILE_SIZE_BYTES {
        return Err(Error::ResourceExceeded(format!(
            "{} is {size} bytes; the limit is {MAX_FILE_SIZE_BYTES}",
            path.display()
        )));
    }
    Ok(())
}

/*--------------------------------------------------------------------------------------
  Format Readers
--------------------------------------------------------------------------------------*/

fn read_text<R: BufRead>(reader: R) -> Result<Vec<IpNetwork>> {
    let mut networks: Vec<IpNetwork> = Vec::new();
    let mut line_count: u64 = 0;

    for line in reader.lines() {
        let line = line?;
        line_count += 1;
        if line_count > MAX_LINE_COUNT {
            return Err(Error::ResourceExceeded(format!(
                "input exceeds {MAX_LINE_COUNT} lines"
            )));
        }

        let content = line.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }
        let extracted = extract_networks(content);
        if extracted.is_empty() {
            debug!("no prefixes found on line {line_count}: {content:?}");
        }
        networks.extend(extracted);
    }

    Ok(networks)
}

fn read_csv(path: &Path) -> Result<Vec<IpNetwork>> {
    let mut reader = csv::Reader::from_path(path)?;

    let prefix_column = reader
        .headers()?
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case("prefix"))
        .ok_or_else(|| {
            Error::Usage(format!("{} has no \"prefix\" column", path.display()))
        })?;

    let mut networks: Vec<IpNetwork> = Vec::new();
    for record in reader.records() {
        let record = record?;
        if networks.len() as u64 > MAX_LINE_COUNT {
            return Err(Error::ResourceExceeded(format!(
                "input exceeds {MAX_LINE_COUNT} records"
            )));
        }
        let Some(field) = record.get(prefix_column) else {
            continue;
        };
        match parse_prefix(field) {
            Ok(network) => networks.push(network),
            Err(_) => warn!("skipping invalid prefix field: {field:?}"),
        }
    }
    Ok(networks)
}

#[derive(Deserialize)]
struct JsonPrefixList {
    prefixes: Vec<String>,
}

fn read_json(path: &Path) -> Result<Vec<IpNetwork>> {
    let file = File::open(path)?;
    let list: JsonPrefixList = serde_json::from_reader(BufReader::new(file))?;

    let mut networks: Vec<IpNetwork> = Vec::new();
    for text in &list.prefixes {
        match parse_prefix(text) {
            Ok(network) => networks.push(network),
            Err(_) => warn!("skipping invalid prefix entry: {text:?}"),
        }
    }
    Ok(networks)
}

/*--------------------------------------------------------------------------------------
  Comment-Preserving Reader
--------------------------------------------------------------------------------------*/

/// Read networks together with the trailing `# comment` of the line each
/// appeared on. Used by the keep-comments mode; only free-text sources carry
/// comments, so there is no format dispatch here.
pub fn read_with_comments(files: &[PathBuf]) -> Result<Vec<(IpNetwork, Option<String>)>> {
    let mut entries: Vec<(IpNetwork, Option<String>)> = Vec::new();

    let mut read_one = |reader: Box<dyn BufRead>| -> Result<()> {
        let mut line_count: u64 = 0;
        for line in reader.lines() {
            let line = line?;
            line_count += 1;
            if line_count > MAX_LINE_COUNT {
                return Err(Error::ResourceExceeded(format!(
                    "input exceeds {MAX_LINE_COUNT} lines"
                )));
            }

            let (content, comment) = match line.split_once('#') {
                Some((content, comment)) => {
                    let comment = comment.trim();
                    (content, (!comment.is_empty()).then(|| comment.to_string()))
                }
                None => (line.as_str(), None),
            };

            for network in extract_networks(content) {
                entries.push((network, comment.clone()));
            }
        }
        Ok(())
    };

    if files.is_empty() {
        let stdin = std::io::stdin();
        if stdin.is_terminal() {
            return Err(Error::Usage(
                "no input files given and standard input is a terminal".to_string(),
            ));
        }
        read_one(Box::new(BufReader::new(stdin)))?;
    } else {
        for path in files {
            check_file_size(path)?;
            read_one(Box::new(BufReader::new(File::open(path)?)))?;
        }
    }

    Ok(entries)
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
