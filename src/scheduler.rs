//! # Command Scheduler
//!
//! Runs `Command`s off the render loop. Leaf work (store calls, exports,
//! spinner ticks) is spawned on the tokio runtime; each task posts exactly
//! one [`Envelope`] onto the single-consumer queue when it finishes.
//!
//! ```text
//!  dispatch(cmd) ──► tokio task ──► tx.send(Envelope) ──► rx (main loop)
//!                                                          │
//!        settle(receipt) ◄── update(app, action) ◄─────────┘
//! ```
//!
//! Sequences are driven by gates. A gate counts the outstanding work of the
//! current step; the next step is only dispatched from [`Scheduler::settle`],
//! which the loop calls after `update()` has processed the step's result.
//! A failed step drops the rest of the sequence.
//!
//! Every spawned task is tracked by its `AbortHandle` so quitting can cancel
//! whatever is still running.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, mpsc};
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use log::{debug, info, warn};
use tokio::runtime::Handle;
use tokio::task::AbortHandle;

use crate::core::action::{Action, update};
use crate::core::command::{Command, StoreOp};
use crate::core::error::{AppError, ExportError, StoreError};
use crate::core::project::Project;
use crate::core::state::App;
use crate::export::Exporter;
use crate::store::ProjectStore;

type GateId = u64;
type TaskId = u64;

/// Whether the loop should keep running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A result message plus the bookkeeping the scheduler needs back.
#[derive(Debug)]
pub struct Envelope {
    pub action: Action,
    gate: Option<GateId>,
    task: Option<TaskId>,
}

impl Envelope {
    /// Splits the message from its receipt. Hand the action to `update()`,
    /// then the receipt to [`Scheduler::settle`].
    pub fn open(self) -> (Action, Receipt) {
        let receipt = Receipt {
            gate: self.gate,
            task: self.task,
            failed: self.action.is_failure(),
        };
        (self.action, receipt)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Receipt {
    gate: Option<GateId>,
    task: Option<TaskId>,
    failed: bool,
}

struct Gate {
    /// Work of the current step still to report.
    pending: usize,
    rest: VecDeque<Command>,
    parent: Option<GateId>,
    failed: bool,
}

pub struct Scheduler {
    runtime: Handle,
    store: Arc<dyn ProjectStore>,
    exporter: Arc<dyn Exporter>,
    tx: mpsc::Sender<Envelope>,
    operation_timeout: Duration,
    gates: HashMap<GateId, Gate>,
    tasks: HashMap<TaskId, AbortHandle>,
    next_id: u64,
    quit: bool,
}

impl Scheduler {
    pub fn new(
        runtime: Handle,
        store: Arc<dyn ProjectStore>,
        exporter: Arc<dyn Exporter>,
        tx: mpsc::Sender<Envelope>,
        operation_timeout: Duration,
    ) -> Self {
        Self {
            runtime,
            store,
            exporter,
            tx,
            operation_timeout,
            gates: HashMap::new(),
            tasks: HashMap::new(),
            next_id: 0,
            quit: false,
        }
    }

    pub fn dispatch(&mut self, cmd: Command) -> Flow {
        if !cmd.is_none() {
            debug!("Dispatching {:?}", cmd);
        }
        self.dispatch_under(cmd, None);
        self.flow()
    }

    /// Records that the envelope's action has been processed and, for a
    /// sequence step, dispatches the next step.
    pub fn settle(&mut self, receipt: Receipt) -> Flow {
        if let Some(task) = receipt.task {
            self.tasks.remove(&task);
        }
        if let Some(gate) = receipt.gate {
            self.step_done(gate, receipt.failed);
        }
        self.flow()
    }

    /// One full turn for a received envelope: update, dispatch, settle.
    pub fn pump(&mut self, app: &mut App, envelope: Envelope) -> Flow {
        let (action, receipt) = envelope.open();
        debug!("Received {:?}", action);
        let cmd = update(app, action);
        let flow = self.dispatch(cmd);
        let settled = self.settle(receipt);
        if flow == Flow::Quit { Flow::Quit } else { settled }
    }

    /// Number of spawned tasks that have not reported back yet.
    pub fn outstanding(&self) -> usize {
        self.tasks.len()
    }

    /// Whether any sequence still has steps to run.
    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty() && self.gates.is_empty()
    }

    /// Aborts every outstanding task and forgets all sequences.
    pub fn shutdown(&mut self) {
        if !self.tasks.is_empty() {
            info!("Aborting {} outstanding tasks", self.tasks.len());
        }
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
        self.gates.clear();
    }

    fn flow(&self) -> Flow {
        if self.quit { Flow::Quit } else { Flow::Continue }
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn dispatch_under(&mut self, cmd: Command, parent: Option<GateId>) {
        match cmd {
            Command::None => {}
            Command::Quit => self.quit = true,
            Command::Emit(action) => {
                self.enlist(parent);
                self.post(Envelope {
                    action,
                    gate: parent,
                    task: None,
                });
            }
            Command::Tick(delay) => {
                self.enlist(parent);
                self.spawn(
                    parent,
                    async move {
                        tokio::time::sleep(delay).await;
                        Action::SpinnerTick
                    }
                    .boxed(),
                );
            }
            Command::Store(op) => {
                self.enlist(parent);
                let work = run_store(self.store.clone(), op, self.operation_timeout).boxed();
                self.spawn(parent, work);
            }
            Command::Export(projects) => {
                self.enlist(parent);
                let work = run_export(self.exporter.clone(), projects).boxed();
                self.spawn(parent, work);
            }
            Command::Batch(cmds) => match parent {
                None => {
                    for cmd in cmds {
                        self.dispatch_under(cmd, None);
                    }
                }
                Some(_) => {
                    let gate = self.open_gate(parent, VecDeque::new());
                    for cmd in cmds {
                        self.dispatch_under(cmd, Some(gate));
                    }
                    self.close_if_idle(gate);
                }
            },
            Command::Sequence(steps) => {
                let gate = self.open_gate(parent, steps.into());
                self.advance(gate);
            }
        }
    }

    fn open_gate(&mut self, parent: Option<GateId>, rest: VecDeque<Command>) -> GateId {
        self.enlist(parent);
        let id = self.next_id();
        self.gates.insert(
            id,
            Gate {
                pending: 0,
                rest,
                parent,
                failed: false,
            },
        );
        id
    }

    fn enlist(&mut self, gate: Option<GateId>) {
        if let Some(gate) = gate.and_then(|g| self.gates.get_mut(&g)) {
            gate.pending += 1;
        }
    }

    /// A batch gate whose children were all no-ops finishes immediately.
    fn close_if_idle(&mut self, gate: GateId) {
        if self.gates.get(&gate).is_some_and(|g| g.pending == 0) {
            self.advance(gate);
        }
    }

    /// Dispatches steps until one has outstanding work, or finishes the gate.
    fn advance(&mut self, id: GateId) {
        loop {
            let Some(gate) = self.gates.get_mut(&id) else {
                return;
            };
            if gate.pending > 0 {
                return;
            }
            let Some(step) = gate.rest.pop_front() else {
                let parent = gate.parent;
                self.gates.remove(&id);
                if let Some(parent) = parent {
                    self.step_done(parent, false);
                }
                return;
            };
            self.dispatch_under(step, Some(id));
            if self.quit {
                return;
            }
        }
    }

    fn step_done(&mut self, id: GateId, failed: bool) {
        let Some(gate) = self.gates.get_mut(&id) else {
            return;
        };
        gate.pending = gate.pending.saturating_sub(1);
        gate.failed |= failed;
        if gate.pending > 0 {
            return;
        }
        if gate.failed {
            let parent = gate.parent;
            if !gate.rest.is_empty() {
                warn!("Step failed, dropping {} remaining steps", gate.rest.len());
            }
            self.gates.remove(&id);
            if let Some(parent) = parent {
                self.step_done(parent, true);
            }
            return;
        }
        self.advance(id);
    }

    fn post(&self, envelope: Envelope) {
        if self.tx.send(envelope).is_err() {
            warn!("Failed to post action: receiver dropped");
        }
    }

    fn spawn(&mut self, gate: Option<GateId>, work: BoxFuture<'static, Action>) {
        let task = self.next_id();
        let tx = self.tx.clone();
        let handle = self.runtime.spawn(async move {
            let action = work.await;
            if tx
                .send(Envelope {
                    action,
                    gate,
                    task: Some(task),
                })
                .is_err()
            {
                warn!("Failed to send task result: receiver dropped");
            }
        });
        self.tasks.insert(task, handle.abort_handle());
    }
}

/// Runs one store operation under the per-operation timeout and turns the
/// outcome into a result action.
async fn run_store(store: Arc<dyn ProjectStore>, op: StoreOp, timeout: Duration) -> Action {
    let operation = op.name();
    info!("Running '{}' against {} store", operation, store.name());
    let outcome = match tokio::time::timeout(timeout, execute(store.as_ref(), op)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(StoreError::Timeout(timeout)),
    };
    match outcome {
        Ok(action) => action,
        Err(e) => {
            warn!("'{}' failed: {}", operation, e);
            Action::CommandFailed(AppError::operation(operation, e))
        }
    }
}

async fn execute(store: &dyn ProjectStore, op: StoreOp) -> Result<Action, StoreError> {
    match op {
        StoreOp::LoadAll => store.list_all().await.map(Action::ProjectsLoaded),
        StoreOp::Create(project) => {
            store.create(&project).await?;
            Ok(Action::ProjectCreated(project))
        }
        StoreOp::Update(project) => store
            .update(&project.name, &project)
            .await
            .map(Action::ProjectUpdated),
        StoreOp::Delete(name) => {
            store.delete(&name).await?;
            Ok(Action::ProjectDeleted(name))
        }
        StoreOp::SaveVariables(project) => store
            .update(&project.name, &project)
            .await
            .map(Action::VariablesSaved),
    }
}

/// File writes are blocking, so they run on the blocking pool.
async fn run_export(exporter: Arc<dyn Exporter>, projects: Vec<Project>) -> Action {
    let count = projects.len();
    let outcome = tokio::task::spawn_blocking(move || exporter.export(&projects))
        .await
        .unwrap_or_else(|e| Err(ExportError::Task(e.to_string())));
    match outcome {
        Ok(()) => Action::ProjectsExported(count),
        Err(e) => {
            warn!("Export failed: {}", e);
            Action::CommandFailed(AppError::ExportFailed(e))
        }
    }
}
