use serde::Serialize;

use crate::{GameLogic, HeadlessRunner};

/// Commands a scripted driver can send to a hosted game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentCommand<I> {
    Step(I),
    Reset,
    GetState,
    GetHistory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentResponse<S> {
    State { frame: usize, state: S },
    History { frame: usize, history: Vec<S> },
}

pub struct AgentHost<G>
where
    G: GameLogic,
{
    runner: HeadlessRunner<G>,
}

impl<G> AgentHost<G>
where
    G: GameLogic,
    G::State: Clone,
{
    pub fn new(game: G) -> Self {
        Self {
            runner: HeadlessRunner::new(game),
        }
    }

    pub fn handle(&mut self, command: AgentCommand<G::Input>) -> AgentResponse<G::State> {
        match command {
            AgentCommand::Step(input) => {
                let frame = self.runner.step(input);
                self.state_response(frame)
            }
            AgentCommand::Reset => {
                let frame = self.runner.reset();
                self.state_response(frame)
            }
            AgentCommand::GetState => self.state_response(self.runner.frame()),
            AgentCommand::GetHistory => AgentResponse::History {
                frame: self.runner.frame(),
                history: self.runner.history().to_vec(),
            },
        }
    }

    pub fn runner(&self) -> &HeadlessRunner<G> {
        &self.runner
    }

    fn state_response(&self, frame: usize) -> AgentResponse<G::State> {
        AgentResponse::State {
            frame,
            state: self.runner.state().clone(),
        }
    }
}
