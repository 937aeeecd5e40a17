use crate::error::{VtResult, VtermError};
use crate::run::{RunSample, SimulationRun};
use rayon::prelude::*;
use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

pub const DEFAULT_RUN_PREFIX: &str = "vterm_nsteps";
pub const RUN_EXTENSION: &str = "csv";

/// Runs that loaded, plus the files that were skipped and why.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub runs: Vec<SimulationRun>,
    pub skipped: Vec<(PathBuf, String)>,
}

fn nsteps_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"nsteps(\d+)").expect("static regex"))
}

/// Extracts `N` from the first `nsteps<N>` token in a file name.
pub fn step_count_from_name(name: &str) -> Option<usize> {
    nsteps_regex()
        .captures(name)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Reads run samples (`t,x,vx,y,vy` with a header row) from any reader.
pub fn read_samples<R: Read>(reader: R) -> VtResult<Vec<RunSample>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut samples = Vec::new();
    for result in rdr.deserialize() {
        let sample: RunSample = result?;
        samples.push(sample);
    }
    Ok(samples)
}

/// Loads one run file. The step count comes from the file name, falling back
/// to the number of samples when the name carries no `nsteps` token. The csv
/// parser accepts `NaN` and `inf`; such runs are rejected here.
pub fn load_run<P: AsRef<Path>>(path: P) -> VtResult<SimulationRun> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let samples = read_samples(file)?;

    if samples.is_empty() {
        return Err(VtermError::Validation(format!(
            "{} contains no samples",
            path.display()
        )));
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let step_count = step_count_from_name(&name).unwrap_or(samples.len());

    debug!(
        "Loaded {}: nsteps={} samples={}",
        path.display(),
        step_count,
        samples.len()
    );

    let run = SimulationRun::from_samples(step_count, &samples);
    run.validate()?;
    Ok(run)
}

fn is_run_file(path: &Path, prefix: &str) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.starts_with(prefix)
        && name.contains("nsteps")
        && path.extension().and_then(|e| e.to_str()) == Some(RUN_EXTENSION)
}

/// Lists `<prefix>*nsteps*.csv` files directly inside `dir`, sorted by name.
pub fn find_run_files<P: AsRef<Path>>(dir: P, prefix: &str) -> VtResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(VtermError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("run directory not found: {}", dir.display()),
        )));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| VtermError::Io(std::io::Error::other(e.to_string())))?;
        if entry.file_type().is_file() && is_run_file(entry.path(), prefix) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Loads every run file in `dir`. Files that cannot be read or parsed are
/// skipped with a warning; they never abort discovery.
pub fn discover_runs<P: AsRef<Path>>(dir: P, prefix: &str) -> VtResult<LoadReport> {
    let files = find_run_files(&dir, prefix)?;
    info!(
        "📂 Found {} run files in {}",
        files.len(),
        dir.as_ref().display()
    );

    let results: Vec<(PathBuf, VtResult<SimulationRun>)> = files
        .into_par_iter()
        .map(|path| {
            let res = load_run(&path);
            (path, res)
        })
        .collect();

    let mut report = LoadReport::default();
    for (path, res) in results {
        match res {
            Ok(run) => report.runs.push(run),
            Err(e) => {
                warn!(
                    "⚠️  File {} not found or corrupted, skipping: {}",
                    path.display(),
                    e
                );
                report.skipped.push((path, e.to_string()));
            }
        }
    }

    Ok(report)
}
