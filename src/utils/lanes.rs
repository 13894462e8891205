use std::collections::BTreeMap;
use std::path::PathBuf;

use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;

use crate::config::defs::ValidateError;

lazy_static! {
    // SAMPLE_S1_L001_R1_001.fastq.gz
    static ref LANE_FILE_RE: Regex =
        Regex::new(r"^(?P<sample>.+)_L(?P<lane>\d+)_(?P<read>R[12])_.*\.fastq\.gz$")
            .expect("static lane filename regex");
}

/// One barcode/genomic file pair sharing a lane number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneFiles {
    pub lane_id: String,
    pub barcode_path: PathBuf,
    pub genomic_path: PathBuf,
}

/// Extracts the lane number from each filename that belongs to `sample_name`
/// and carries the wanted read tag. A filename that does not match the
/// naming convention is fatal unless `lenient`, in which case it is skipped.
pub fn parse_fastq_names(
    sample_name: &str,
    read_tag: &str,
    fastqs: &[PathBuf],
    lenient: bool,
) -> Result<Vec<(String, PathBuf)>, ValidateError> {
    let mut results = Vec::new();

    for path in fastqs {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ValidateError::FilenameParse(path.clone()))?;

        let captures = LANE_FILE_RE.captures(file_name);
        let matched = captures.as_ref().filter(|c| &c["sample"] == sample_name);

        match matched {
            Some(c) => {
                if &c["read"] == read_tag {
                    results.push((c["lane"].to_string(), path.clone()));
                }
                // Right sample, other read tag: belongs to the other listing.
            }
            None if lenient => {
                debug!("Skipping {:?}: not a {} {} FASTQ", path, sample_name, read_tag);
            }
            None => return Err(ValidateError::FilenameParse(path.clone())),
        }
    }

    Ok(results)
}

fn group_by_lane(
    entries: Vec<(String, PathBuf)>,
    read_tag: &str,
    lenient: bool,
) -> Result<BTreeMap<(usize, String), PathBuf>, ValidateError> {
    let mut lanes: BTreeMap<(usize, String), PathBuf> = BTreeMap::new();
    for (lane_id, path) in entries {
        // Digit strings ordered numerically: shorter first, then lexicographic.
        let key = (lane_id.len(), lane_id.clone());
        if let Some(existing) = lanes.get(&key) {
            if !lenient {
                return Err(ValidateError::LaneMismatch(format!(
                    "lane {} has more than one {} file: {:?} and {:?}",
                    lane_id, read_tag, existing, path
                )));
            }
            warn!("Lane {} has more than one {} file; keeping {:?}", lane_id, read_tag, existing);
            continue;
        }
        lanes.insert(key, path);
    }
    Ok(lanes)
}

/// Pairs barcode (R1) and genomic (R2) listings by lane number, in ascending
/// lane order. A lane present on only one side is fatal unless `lenient`,
/// in which case it is dropped with a warning.
pub fn pair_lanes(
    barcode_entries: Vec<(String, PathBuf)>,
    genomic_entries: Vec<(String, PathBuf)>,
    lenient: bool,
) -> Result<Vec<LaneFiles>, ValidateError> {
    let mut r1_lanes = group_by_lane(barcode_entries, "R1", lenient)?;
    let mut r2_lanes = group_by_lane(genomic_entries, "R2", lenient)?;

    let mut lane_keys: Vec<(usize, String)> =
        r1_lanes.keys().chain(r2_lanes.keys()).cloned().collect();
    lane_keys.sort();
    lane_keys.dedup();

    let mut pairs = Vec::new();
    for key in lane_keys {
        match (r1_lanes.remove(&key), r2_lanes.remove(&key)) {
            (Some(barcode_path), Some(genomic_path)) => pairs.push(LaneFiles {
                lane_id: key.1,
                barcode_path,
                genomic_path,
            }),
            (r1, _) => {
                let side = if r1.is_some() { "genomic (R2)" } else { "barcode (R1)" };
                if !lenient {
                    return Err(ValidateError::LaneMismatch(format!(
                        "lane {} has no {} file",
                        key.1, side
                    )));
                }
                warn!("Dropping lane {}: no {} file", key.1, side);
            }
        }
    }

    Ok(pairs)
}

/// Renders a lane listing as a github-style markdown table, one row per
/// (read_type, lane_num, fastq) entry.
pub fn lane_table(read_tag: &str, entries: &[(String, PathBuf)]) -> String {
    let headers = ["read_type", "lane_num", "fastq"];
    let rows: Vec<[String; 3]> = entries
        .iter()
        .map(|(lane_id, path)| {
            [
                read_tag.to_string(),
                lane_id.clone(),
                path.display().to_string(),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.len());
        }
    }

    let mut out = String::new();
    let format_row = |cells: &[&str], widths: &[usize]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, w)| format!("{:<width$}", cell, width = w))
            .collect();
        format!("| {} |", padded.join(" | "))
    };

    out.push_str(&format_row(&headers, &widths));
    out.push('\n');
    let rules: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let rule_refs: Vec<&str> = rules.iter().map(String::as_str).collect();
    out.push_str(&format_row(&rule_refs, &widths));
    for row in &rows {
        out.push('\n');
        let cell_refs: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&format_row(&cell_refs, &widths));
    }
    out
}
