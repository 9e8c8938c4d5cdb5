//! # Commands
//!
//! Side effects requested by `update()`. A command is plain data: the
//! controller builds it, the scheduler runs it, and tests can inspect it
//! without running anything.
//!
//! ```text
//! update(app, action) ──► Command ──► Scheduler ──► background task
//!        ▲                                                │
//!        └──────────── Action (result message) ◄──────────┘
//! ```
//!
//! `Batch` fires its children concurrently with no ordering between their
//! results. `Sequence` runs its steps one after another: step N+1 is only
//! dispatched after step N's result message has been processed by
//! `update()`. A failed step drops the rest of its sequence.

use std::time::Duration;

use crate::core::action::Action;
use crate::core::project::Project;

/// Remote store operations.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreOp {
    LoadAll,
    Create(Project),
    Update(Project),
    Delete(String),
    /// Replaces the whole project document, carrying the edited variable map.
    SaveVariables(Project),
}

impl StoreOp {
    pub fn name(&self) -> &'static str {
        match self {
            StoreOp::LoadAll => "load projects",
            StoreOp::Create(_) => "create project",
            StoreOp::Update(_) => "update project",
            StoreOp::Delete(_) => "delete project",
            StoreOp::SaveVariables(_) => "save variables",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Command {
    #[default]
    None,
    Quit,
    /// Post an action straight onto the message queue.
    Emit(Action),
    /// Post `Action::SpinnerTick` after a delay.
    Tick(Duration),
    Store(StoreOp),
    /// Write the projects' variable files.
    Export(Vec<Project>),
    Batch(Vec<Command>),
    Sequence(Vec<Command>),
}

impl Command {
    pub fn emit(action: Action) -> Self {
        Command::Emit(action)
    }

    pub fn store(op: StoreOp) -> Self {
        Command::Store(op)
    }

    /// Drops no-ops; collapses to the single command when only one remains.
    pub fn batch(cmds: Vec<Command>) -> Self {
        let mut cmds: Vec<Command> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Command::None,
            1 => cmds.remove(0),
            _ => Command::Batch(cmds),
        }
    }

    /// Drops no-ops and flattens nested sequences.
    pub fn sequence(cmds: Vec<Command>) -> Self {
        let mut steps = Vec::with_capacity(cmds.len());
        for cmd in cmds {
            match cmd {
                Command::None => {}
                Command::Sequence(inner) => steps.extend(inner),
                other => steps.push(other),
            }
        }
        match steps.len() {
            0 => Command::None,
            1 => steps.remove(0),
            _ => Command::Sequence(steps),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Command::None)
    }

    /// Number of leaf commands (`None` counts as zero).
    pub fn count(&self) -> usize {
        match self {
            Command::None => 0,
            Command::Batch(cmds) | Command::Sequence(cmds) => cmds.iter().map(Self::count).sum(),
            _ => 1,
        }
    }

    /// Every store operation contained in this command, in declaration order.
    pub fn store_ops(&self) -> Vec<&StoreOp> {
        match self {
            Command::Store(op) => vec![op],
            Command::Batch(cmds) | Command::Sequence(cmds) => {
                cmds.iter().flat_map(Self::store_ops).collect()
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::Screen;

    #[test]
    fn test_batch_collapses() {
        assert_eq!(Command::batch(vec![]), Command::None);
        assert_eq!(
            Command::batch(vec![Command::None, Command::Quit]),
            Command::Quit
        );
        let cmd = Command::batch(vec![Command::Quit, Command::Tick(Duration::from_millis(1))]);
        assert!(matches!(cmd, Command::Batch(ref c) if c.len() == 2));
    }

    #[test]
    fn test_sequence_flattens_nested_sequences() {
        let inner = Command::sequence(vec![
            Command::store(StoreOp::LoadAll),
            Command::emit(Action::Navigate(Screen::ProjectsList)),
        ]);
        let outer = Command::sequence(vec![Command::None, inner, Command::Quit]);
        match outer {
            Command::Sequence(steps) => assert_eq!(steps.len(), 3),
            other => panic!("expected sequence, got {other:?}"),
        }
    }

    #[test]
    fn test_count_and_store_ops() {
        let cmd = Command::batch(vec![
            Command::Tick(Duration::from_millis(80)),
            Command::sequence(vec![
                Command::store(StoreOp::Delete("web".into())),
                Command::emit(Action::Navigate(Screen::ProjectsList)),
            ]),
        ]);
        assert_eq!(cmd.count(), 3);
        assert_eq!(cmd.store_ops(), vec![&StoreOp::Delete("web".into())]);
    }
}
