use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};
use seq_io::fastq::Record;
use tokio::sync::mpsc;
use tokio::task;
use tokio::time::timeout;

use crate::config::defs::{RunConfig, ValidateError, R1_TAG, R2_TAG, SEARCH_POLL_INTERVAL};
use crate::utils::barcode::{decode, merged_read_id};
use crate::utils::fastq::{fastq_reader, read_first_record, FirstRead};
use crate::utils::file::{find_chunks, list_fastq_gz};
use crate::utils::lanes::{lane_table, pair_lanes, parse_fastq_names, LaneFiles};

/// Result of scanning one candidate chunk for one lane's first read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The read is present under exactly the expected identifier.
    Matched {
        file: PathBuf,
        read_id: String,
        sequence: String,
    },
    /// A read with the right instrument coordinates exists, but its
    /// identifier was not rewritten the way the merge should have.
    Mismatched {
        file: PathBuf,
        read_id: String,
        sequence: String,
    },
    NotFoundInFile { file: PathBuf },
}

/// What one lane's first read pair tells us to look for in the chunks.
#[derive(Debug, Clone)]
struct LaneExpectation {
    expected_id: String,
    expected_sequence: String,
    /// R1 identifier minus its leading `@`. Merging rewrites the prefix of
    /// the identifier but must keep these instrument coordinates verbatim.
    search_token: String,
}

/// Streams `chunk` as 4-line FASTQ frames, looking for an identifier token
/// containing `search_token`. Runs on a blocking thread; never aborted by
/// other scans.
pub fn scan_chunk(
    chunk: &Path,
    search_token: &str,
    expected_id: &str,
) -> Result<SearchOutcome, ValidateError> {
    let mut reader = fastq_reader(chunk)?;

    while let Some(result) = reader.next() {
        let record = result.map_err(|e| ValidateError::Io {
            path: chunk.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidData, e.to_string()),
        })?;

        // @:GTGTAACTCATACGAC:TCATATCAATGT:T;A00333:373:HF27HDSX2:2:1101:2899:1000 2:N:0:...
        let head = record.head();
        let token_end = head.iter().position(|b| *b == b' ').unwrap_or(head.len());
        let token = String::from_utf8_lossy(&head[..token_end]);
        let read_id = format!("@{}", token);

        if !read_id.contains(search_token) {
            continue;
        }

        let sequence = String::from_utf8_lossy(record.seq()).into_owned();
        if read_id == expected_id {
            return Ok(SearchOutcome::Matched {
                file: chunk.to_path_buf(),
                read_id,
                sequence,
            });
        }
        return Ok(SearchOutcome::Mismatched {
            file: chunk.to_path_buf(),
            read_id,
            sequence,
        });
    }

    Ok(SearchOutcome::NotFoundInFile {
        file: chunk.to_path_buf(),
    })
}

fn first_read_or_fail(path: &Path) -> Result<FirstRead, ValidateError> {
    read_first_record(path)?.ok_or_else(|| ValidateError::EmptyInput(path.to_path_buf()))
}

/// Validates one lane: decodes its first barcode read, reconstructs the
/// merged identifier, and searches every chunk concurrently until a
/// decisive outcome.
async fn check_lane(
    config: Arc<RunConfig>,
    lane: &LaneFiles,
    chunks: &[PathBuf],
) -> Result<(), ValidateError> {
    let r1 = first_read_or_fail(&lane.barcode_path)?;
    let r2 = first_read_or_fail(&lane.genomic_path)?;

    // R1 and R2 must describe the same physical read pair.
    if r1.read_id != r2.read_id {
        return Err(ValidateError::ReadIdMismatch {
            r1: r1.read_id,
            r2: r2.read_id,
        });
    }

    let barcode = decode(&r1.sequence, config.args.platform)?;
    let expectation = LaneExpectation {
        expected_id: merged_read_id(&barcode, &r1.read_id),
        expected_sequence: r2.sequence,
        search_token: r1.read_id.strip_prefix('@').unwrap_or(&r1.read_id).to_string(),
    };
    debug!("Lane {} expected identifier: {}", lane.lane_id, expectation.expected_id);

    let (tx, mut rx) = mpsc::channel::<Result<SearchOutcome, ValidateError>>(chunks.len().max(1));

    for chunk in chunks {
        info!("Searching for `{}` in {:?}...", expectation.search_token, chunk);

        let chunk = chunk.clone();
        let permits = config.search_permits.clone();
        let search_token = expectation.search_token.clone();
        let expected_id = expectation.expected_id.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let _permit = match permits.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return, // pool torn down, run is over
            };
            let outcome = match task::spawn_blocking(move || {
                scan_chunk(&chunk, &search_token, &expected_id)
            })
            .await
            {
                Ok(outcome) => outcome,
                Err(e) => Err(ValidateError::TaskFailure(e.to_string())),
            };
            // The receiver goes away once the lane resolved early.
            let _ = tx.send(outcome).await;
        });
    }
    drop(tx);

    let total = chunks.len();
    let mut completed = 0usize;

    // Bounded poll: react to whatever finished, log progress on timeout,
    // and only declare "not found" once every scan has reported back.
    loop {
        match timeout(SEARCH_POLL_INTERVAL, rx.recv()).await {
            Err(_elapsed) => {
                info!("Ready: {} Not Ready: {}", completed, total - completed);
            }
            Ok(None) => {
                println!("Not found!");
                return Err(ValidateError::NotFound {
                    read_id: expectation.search_token.clone(),
                });
            }
            Ok(Some(outcome)) => {
                completed += 1;
                match outcome? {
                    SearchOutcome::Matched { file, .. } => {
                        println!("Found in `{}`", file.display());
                        println!("Looks okay!");
                        return Ok(());
                    }
                    SearchOutcome::Mismatched { file, read_id, sequence } => {
                        println!("Found in `{}`", file.display());
                        println!("> Expected");
                        println!("{}", expectation.expected_id);
                        println!("{}", expectation.expected_sequence);
                        println!();
                        println!("> Actual");
                        println!("{}", read_id);
                        println!("{}", sequence);
                        return Err(ValidateError::ContentMismatch { file });
                    }
                    SearchOutcome::NotFoundInFile { file } => {
                        debug!("Not in {:?}", file);
                    }
                }
            }
        }
    }
}

fn resolve_dir(cwd: &Path, dir: &str) -> PathBuf {
    let path = PathBuf::from(dir);
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}

/// Whole-run orchestrator: list inputs, pair lanes, discover chunks, then
/// validate lanes strictly one after another. The first fatal condition
/// ends the run; success means every lane passed.
pub async fn run(config: Arc<RunConfig>) -> Result<(), ValidateError> {
    let args = &config.args;

    let dir_barcode = resolve_dir(&config.cwd, &args.dir_barcode);
    let dir_genomic = resolve_dir(&config.cwd, &args.dir_genomic);

    let barcode_fastqs = list_fastq_gz(&dir_barcode).map_err(|e| ValidateError::Io {
        path: dir_barcode.clone(),
        source: e,
    })?;
    if barcode_fastqs.is_empty() {
        return Err(ValidateError::NoMatchingFiles(format!(
            "no *.fastq.gz found in {:?}",
            dir_barcode
        )));
    }

    let genomic_fastqs = list_fastq_gz(&dir_genomic).map_err(|e| ValidateError::Io {
        path: dir_genomic.clone(),
        source: e,
    })?;
    if genomic_fastqs.is_empty() {
        return Err(ValidateError::NoMatchingFiles(format!(
            "no *.fastq.gz found in {:?}",
            dir_genomic
        )));
    }

    let r1_entries = parse_fastq_names(&args.sample_name, R1_TAG, &barcode_fastqs, args.lenient)?;
    let r2_entries = parse_fastq_names(&args.sample_name, R2_TAG, &genomic_fastqs, args.lenient)?;

    if r1_entries.is_empty() {
        return Err(ValidateError::NoMatchingFiles(format!(
            "no R1 FASTQ for sample {} in {:?}",
            args.sample_name, dir_barcode
        )));
    }
    if r2_entries.is_empty() {
        return Err(ValidateError::NoMatchingFiles(format!(
            "no R2 FASTQ for sample {} in {:?}",
            args.sample_name, dir_genomic
        )));
    }

    println!("{}", lane_table(R1_TAG, &r1_entries));
    println!();
    println!("{}", lane_table(R2_TAG, &r2_entries));

    let lanes = pair_lanes(r1_entries, r2_entries, args.lenient)?;
    if lanes.is_empty() {
        return Err(ValidateError::LaneMismatch("no paired lanes left to check".to_string()));
    }

    let chunks = find_chunks(&args.chunk_prefix, &config.cwd).map_err(|e| ValidateError::Io {
        path: PathBuf::from(&args.chunk_prefix),
        source: e,
    })?;
    if chunks.is_empty() {
        return Err(ValidateError::NoMatchingFiles(format!(
            "no chunked merged FASTQ matching {}-*.fastq.gz",
            args.chunk_prefix
        )));
    }

    for lane in &lanes {
        println!();
        println!("Lane: {}", lane.lane_id);
        println!("R1: {}", lane.barcode_path.display());
        println!("R2: {}", lane.genomic_path.display());

        check_lane(config.clone(), lane, &chunks).await?;
    }

    Ok(())
}
