//! Engine-level regression testing helpers.
//!
//! These utilities help you:
//! - hash every recorded frame of a run (SHA-256 over the state's JSON),
//! - save the run as a `Timeline` JSON file, load it back, re-simulate the
//!   same inputs, and assert all three agree frame by frame, and
//! - compare frame hashes against a golden file checked into `tests/goldens`.
//!
//! The engine stays game-agnostic: any `GameLogic` whose state serializes works.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{GameLogic, HeadlessRunner, Timeline};

/// Environment flag helper: accepts `1/true/yes/on` (case-insensitive).
pub fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .ok()
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

/// If set, regression tests may update golden files in-place.
pub fn update_goldens_enabled() -> bool {
    env_flag("TWENTY48_UPDATE_GOLDENS")
}

pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[macro_export]
macro_rules! regression_golden_path {
    ($name:expr) => {{
        let base = $crate::regression::sanitize_filename($name);
        ::std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("goldens")
            .join(format!("{base}.json"))
    }};
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

pub fn state_sha256_hex<S: Serialize>(state: &S) -> io::Result<String> {
    let bytes =
        serde_json::to_vec(state).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(sha256_hex(&bytes))
}

pub fn frame_hashes<S: Serialize>(history: &[S]) -> io::Result<Vec<String>> {
    history.iter().map(state_sha256_hex).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FrameHashGolden {
    pub version: u32,
    pub name: String,
    pub hash_alg: String,
    /// One hash per recorded frame.
    pub hashes: Vec<String>,
}

impl FrameHashGolden {
    pub fn new(name: impl Into<String>, hashes: Vec<String>) -> Self {
        Self {
            version: 1,
            name: name.into(),
            hash_alg: "sha256".to_string(),
            hashes,
        }
    }
}

pub fn load_golden_json(path: impl AsRef<Path>) -> io::Result<FrameHashGolden> {
    let path = path.as_ref();
    let file = fs::File::open(path)?;
    let reader = io::BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("failed parsing golden json {}: {e}", path.display()),
        )
    })
}

pub fn save_golden_json(path: impl AsRef<Path>, golden: &FrameHashGolden) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = fs::File::create(path)?;
    let mut writer = io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, golden)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writer.flush()?;
    Ok(())
}

/// Compare `golden` against the file at `path`.
///
/// With `update` set the file is (re)written instead; otherwise a missing file
/// is an error.
pub fn assert_or_update_golden_json(
    path: impl AsRef<Path>,
    golden: &FrameHashGolden,
    update: bool,
) -> io::Result<()> {
    let path = path.as_ref();
    let exists = path.exists();

    if update {
        save_golden_json(path, golden)?;
        if exists {
            log::info!("updated golden: {}", path.display());
        } else {
            log::info!("wrote golden: {}", path.display());
        }
        return Ok(());
    }

    if !exists {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!(
                "missing golden {}\n(hint: set TWENTY48_UPDATE_GOLDENS=1 to create it)",
                path.display()
            ),
        ));
    }

    let expected = load_golden_json(path)?;
    if expected.version != golden.version || expected.hash_alg != golden.hash_alg {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "golden metadata mismatch at {}:\nexpected: v{} alg={}\nactual:   v{} alg={}\n(hint: set TWENTY48_UPDATE_GOLDENS=1 to rewrite)",
                path.display(),
                expected.version,
                expected.hash_alg,
                golden.version,
                golden.hash_alg,
            ),
        ));
    }

    if expected.hashes.len() != golden.hashes.len() {
        return Err(io::Error::other(format!(
            "golden frame count mismatch at {}: expected {} hashes, got {}\n(hint: set TWENTY48_UPDATE_GOLDENS=1 to rewrite)",
            path.display(),
            expected.hashes.len(),
            golden.hashes.len()
        )));
    }

    for (i, (a, b)) in expected.hashes.iter().zip(golden.hashes.iter()).enumerate() {
        if a != b {
            return Err(io::Error::other(format!(
                "golden mismatch at {} (frame {i}):\nexpected: {a}\nactual:   {b}\n(hint: set TWENTY48_UPDATE_GOLDENS=1 to rewrite)",
                path.display()
            )));
        }
    }

    Ok(())
}

#[derive(Debug, Clone)]
pub struct RecordReplayArtifacts {
    pub timeline_json: PathBuf,
    pub hashes: Vec<String>,
}

fn compare_hashes(label: &str, expected: &[String], actual: &[String]) -> io::Result<()> {
    if expected.len() != actual.len() {
        return Err(io::Error::other(format!(
            "{label}: frame counts differed: live={} other={}",
            expected.len(),
            actual.len()
        )));
    }
    for (i, (a, b)) in expected.iter().zip(actual.iter()).enumerate() {
        if a != b {
            return Err(io::Error::other(format!(
                "{label}: frame {i} differed:\nlive:  {a}\nother: {b}"
            )));
        }
    }
    Ok(())
}

/// Engine-level regression helper:
/// - run a scenario live and save its `Timeline` as JSON
/// - load the JSON back and hash every frame
/// - re-simulate the same inputs from a fresh runner
/// - fail unless live, loaded and re-simulated hashes match frame for frame
pub fn record_then_replay_and_compare<G>(
    name: &str,
    out_dir: impl AsRef<Path>,
    game: G,
    inputs: impl IntoIterator<Item = G::Input>,
) -> io::Result<RecordReplayArtifacts>
where
    G: GameLogic + Clone,
    G::State: Serialize + DeserializeOwned,
    G::Input: Clone,
{
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir)?;

    let base = sanitize_filename(name);
    let timeline_json = out_dir.join(format!("{base}.json"));
    let inputs: Vec<G::Input> = inputs.into_iter().collect();

    let mut live_runner = HeadlessRunner::new(game.clone());
    live_runner.run(inputs.iter().cloned());
    live_runner.timeline().save_json_file(&timeline_json)?;
    let live_hashes = frame_hashes(live_runner.history())?;

    let loaded = Timeline::<G::State>::load_json_file(&timeline_json)?;
    compare_hashes("loaded", &live_hashes, &frame_hashes(loaded.history())?)?;

    let mut replay_runner = HeadlessRunner::new(game);
    replay_runner.run(inputs);
    compare_hashes("replayed", &live_hashes, &frame_hashes(replay_runner.history())?)?;

    log::debug!("{name}: {} frames matched", live_hashes.len());

    Ok(RecordReplayArtifacts {
        timeline_json,
        hashes: live_hashes,
    })
}
