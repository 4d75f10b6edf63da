use anyhow::{Context, Result, bail};
use std::collections::HashSet;

pub const DEFAULT_SEED: u64 = 1337;

/// Widest `start..end` span accepted on the command line.
const MAX_RANGE_SPAN: u64 = 10_000;

/// Resolve CLI seed tokens into a deduplicated, ordered seed list.
///
/// Accepts literal integers (negative values use their magnitude) and
/// half-open ranges such as `10..20`. An empty token list yields the
/// default seed.
///
/// # Errors
///
/// Fails on tokens that are neither integers nor well-formed ranges.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut pending: Vec<u64> = Vec::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }

        if let Some((start, end)) = token.split_once("..") {
            pending.extend(parse_range(start, end).with_context(|| format!("bad range: {token}"))?);
            continue;
        }

        if let Ok(value) = token.parse::<i64>() {
            pending.push(value.unsigned_abs());
            continue;
        }

        if let Ok(value) = token.parse::<u64>() {
            pending.push(value);
            continue;
        }

        bail!("Unrecognized seed token: {token}");
    }

    let mut seen = HashSet::new();
    pending.retain(|seed| seen.insert(*seed));

    if pending.is_empty() {
        pending.push(DEFAULT_SEED);
    }

    Ok(pending)
}

fn parse_range(start: &str, end: &str) -> Result<std::ops::Range<u64>> {
    let start: u64 = start.trim().parse()?;
    let end: u64 = end.trim().parse()?;
    if end < start {
        bail!("range end {end} is before start {start}");
    }
    if end - start > MAX_RANGE_SPAN {
        bail!("range spans more than {MAX_RANGE_SPAN} seeds");
    }
    Ok(start..end)
}
