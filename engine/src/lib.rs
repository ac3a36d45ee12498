pub mod agent;
pub mod profiling;
pub mod regression;

use std::{
    fmt, fs, io,
    io::Write,
    path::Path,
};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Append-only record of every state a runner has produced.
///
/// Frame 0 is the initial state; each recorded step adds one frame. A timeline
/// always holds at least one frame, including one deserialized from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawTimeline<State>")]
pub struct Timeline<State> {
    states: Vec<State>,
}

#[derive(Deserialize)]
struct RawTimeline<State> {
    states: Vec<State>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyTimeline;

impl fmt::Display for EmptyTimeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("timeline has no frames")
    }
}

impl std::error::Error for EmptyTimeline {}

impl<State> TryFrom<RawTimeline<State>> for Timeline<State> {
    type Error = EmptyTimeline;

    fn try_from(raw: RawTimeline<State>) -> Result<Self, Self::Error> {
        if raw.states.is_empty() {
            return Err(EmptyTimeline);
        }
        Ok(Self { states: raw.states })
    }
}

impl<State> Timeline<State> {
    pub fn new(initial_state: State) -> Self {
        Self {
            states: vec![initial_state],
        }
    }

    pub fn frame(&self) -> usize {
        self.states.len() - 1
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn state(&self) -> &State {
        &self.states[self.states.len() - 1]
    }

    pub fn state_at(&self, frame: usize) -> Option<&State> {
        self.states.get(frame)
    }

    pub fn history(&self) -> &[State] {
        &self.states
    }

    pub fn record(&mut self, state: State) -> usize {
        self.states.push(state);
        self.frame()
    }
}

impl<State: Serialize> Timeline<State> {
    pub fn save_json_file(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = fs::File::create(path)?;
        let mut writer = io::BufWriter::new(file);
        serde_json::to_writer(&mut writer, self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writer.flush()
    }
}

impl<State: DeserializeOwned> Timeline<State> {
    pub fn load_json_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = fs::File::open(path)?;
        let reader = io::BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("failed parsing timeline json {}: {e}", path.display()),
            )
        })
    }
}

pub trait GameLogic {
    type State;
    type Input;

    fn initial_state(&self) -> Self::State;
    fn step(&self, state: &Self::State, input: Self::Input) -> Self::State;
}

#[derive(Debug)]
pub struct HeadlessRunner<G: GameLogic> {
    game: G,
    timeline: Timeline<G::State>,
}

impl<G: GameLogic> HeadlessRunner<G> {
    pub fn new(game: G) -> Self {
        let initial_state = game.initial_state();
        Self {
            game,
            timeline: Timeline::new(initial_state),
        }
    }

    /// Resume from a previously recorded timeline; new steps append to it.
    pub fn from_timeline(game: G, timeline: Timeline<G::State>) -> Self {
        Self { game, timeline }
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn frame(&self) -> usize {
        self.timeline.frame()
    }

    pub fn state(&self) -> &G::State {
        self.timeline.state()
    }

    pub fn history(&self) -> &[G::State] {
        self.timeline.history()
    }

    pub fn timeline(&self) -> &Timeline<G::State> {
        &self.timeline
    }

    pub fn into_timeline(self) -> Timeline<G::State> {
        self.timeline
    }

    pub fn step(&mut self, input: G::Input) -> usize {
        let next_state = self.game.step(self.timeline.state(), input);
        self.timeline.record(next_state)
    }

    pub fn step_profiled<P: profiling::Profiler>(&mut self, input: G::Input, profiler: &mut P) -> usize {
        use std::time::Instant;

        let total_start = Instant::now();

        let step_start = Instant::now();
        let next_state = self.game.step(self.timeline.state(), input);
        let step_dt = step_start.elapsed();

        let record_start = Instant::now();
        let frame = self.timeline.record(next_state);
        let record_dt = record_start.elapsed();

        let total_dt = total_start.elapsed();
        profiler.on_step(
            frame,
            profiling::StepTimings {
                step: step_dt,
                record: record_dt,
                total: total_dt,
            },
        );

        frame
    }

    pub fn run<I>(&mut self, inputs: I) -> usize
    where
        I: IntoIterator<Item = G::Input>,
    {
        let mut last_frame = self.frame();
        for input in inputs {
            last_frame = self.step(input);
        }
        last_frame
    }

    /// Discard all recorded frames and start over from the game's initial state.
    pub fn reset(&mut self) -> usize {
        self.timeline = Timeline::new(self.game.initial_state());
        self.frame()
    }
}
