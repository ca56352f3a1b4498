//! Threaded detection session.
//!
//! One event-loop thread owns the `DetectionEngine` and waits on three
//! things at once: operator commands, service responses, and the engine's
//! next timer deadline. Weight and classification calls run on their own
//! worker threads so a slow service never delays a timer.

use std::collections::VecDeque;
use std::time::Duration;

use crossbeam_channel as xch;
use kiosk_traits::{BoxClassifier, Clock, Route, WeightSensor};

use crate::config::Timeouts;
use crate::engine::{DetectedParcel, DetectionEngine, DetectionEvent, Effect};
use crate::error::{KioskError, Result};
use crate::hw_error::map_hw_error;
use crate::orders::OrderItem;
use crate::status::DetectionStatus;
use crate::worker::RequestWorker;

/// Upper bound on one idle wait when no timer is armed.
const IDLE_WAIT: Duration = Duration::from_millis(250);

enum Command {
    Tap,
    ContinueScanning,
    Cancel,
    Proceed {
        current: Option<OrderItem>,
        reply: xch::Sender<std::result::Result<(), KioskError>>,
    },
    Teardown,
}

enum Wake {
    Command(Option<Command>),
    Response(Option<Response>),
    Timer,
}

enum Response {
    Weight(std::result::Result<Option<f64>, KioskError>),
    Classification(std::result::Result<bool, KioskError>),
}

/// Final state of a finished session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome {
    /// Where the screen navigated; `None` when torn down.
    pub route: Option<Route>,
    pub status: DetectionStatus,
    pub parcel: Option<DetectedParcel>,
    pub failure: Option<KioskError>,
}

/// Cloneable handle that can only cancel; for signal handlers.
#[derive(Clone)]
pub struct SessionCanceller(xch::Sender<Command>);

impl SessionCanceller {
    pub fn cancel(&self) -> bool {
        self.0.send(Command::Cancel).is_ok()
    }
}

/// A running detection screen. Dropping it tears the screen down.
pub struct DetectionSession {
    commands: Option<xch::Sender<Command>>,
    events: xch::Receiver<DetectionEvent>,
    join_handle: Option<std::thread::JoinHandle<SessionOutcome>>,
}

impl DetectionSession {
    pub fn spawn<W, B, C>(
        engine: DetectionEngine,
        sensor: W,
        classifier: B,
        timeouts: &Timeouts,
        clock: C,
    ) -> Self
    where
        W: WeightSensor + Send + 'static,
        B: BoxClassifier + Send + 'static,
        C: Clock + Send + 'static,
    {
        let (cmd_tx, cmd_rx) = xch::unbounded();
        let (ev_tx, ev_rx) = xch::unbounded();
        let (resp_tx, resp_rx) = xch::unbounded();
        let request_timeout = Duration::from_millis(timeouts.request_ms);

        let mut sensor = sensor;
        let weight = RequestWorker::spawn(
            "weight",
            move || {
                Response::Weight(
                    sensor
                        .read_weight(request_timeout)
                        .map_err(|e| map_hw_error(&*e)),
                )
            },
            resp_tx.clone(),
        );
        let mut classifier = classifier;
        let classify = RequestWorker::spawn(
            "classifier",
            move || {
                Response::Classification(
                    classifier
                        .classify(request_timeout)
                        .map_err(|e| map_hw_error(&*e)),
                )
            },
            resp_tx,
        );

        let join_handle = std::thread::spawn(move || {
            let mut lp = EventLoop {
                engine,
                weight,
                classify,
                events: ev_tx,
                route: None,
            };
            lp.run(&cmd_rx, &resp_rx, &clock);
            lp.outcome()
        });

        Self {
            commands: Some(cmd_tx),
            events: ev_rx,
            join_handle: Some(join_handle),
        }
    }

    /// Events published by the screen, in order.
    pub fn events(&self) -> &xch::Receiver<DetectionEvent> {
        &self.events
    }

    pub fn canceller(&self) -> Option<SessionCanceller> {
        self.commands.clone().map(SessionCanceller)
    }

    pub fn tap(&self) -> bool {
        self.send(Command::Tap)
    }

    pub fn continue_scanning(&self) -> bool {
        self.send(Command::ContinueScanning)
    }

    pub fn cancel(&self) -> bool {
        self.send(Command::Cancel)
    }

    /// Accept the detected parcel. Fails unless a sized parcel was detected.
    pub fn proceed(&self, current: Option<OrderItem>) -> std::result::Result<(), KioskError> {
        let (reply, rx) = xch::bounded(1);
        if !self.send(Command::Proceed { current, reply }) {
            return Err(KioskError::InvalidState("session is not running".into()));
        }
        rx.recv()
            .unwrap_or_else(|_| Err(KioskError::InvalidState("session is not running".into())))
    }

    /// Block until the screen navigates away (or is torn down).
    pub fn wait(mut self) -> Result<SessionOutcome> {
        self.join()
    }

    /// Tear the screen down without navigating and return its final state.
    pub fn stop(mut self) -> Result<SessionOutcome> {
        self.send(Command::Teardown);
        self.join()
    }

    fn send(&self, cmd: Command) -> bool {
        self.commands.as_ref().is_some_and(|tx| tx.send(cmd).is_ok())
    }

    fn join(&mut self) -> Result<SessionOutcome> {
        let handle = self
            .join_handle
            .take()
            .ok_or_else(|| eyre::eyre!("session already joined"))?;
        handle
            .join()
            .map_err(|_| eyre::eyre!("detection event loop panicked"))
    }
}

impl Drop for DetectionSession {
    fn drop(&mut self) {
        if self.join_handle.is_none() {
            return;
        }
        // A canceller clone may keep the channel open, so ask explicitly.
        self.send(Command::Teardown);
        drop(self.commands.take());
        if let Err(e) = self.join() {
            tracing::warn!(error = %e, "detection session shutdown failed");
        }
    }
}

struct EventLoop {
    engine: DetectionEngine,
    weight: RequestWorker,
    classify: RequestWorker,
    events: xch::Sender<DetectionEvent>,
    route: Option<Route>,
}

impl EventLoop {
    fn run<C: Clock>(
        &mut self,
        commands: &xch::Receiver<Command>,
        responses: &xch::Receiver<Response>,
        clock: &C,
    ) {
        let epoch = clock.now();
        let mut pending: VecDeque<Effect> = self.engine.start(0).into();
        loop {
            self.apply(&mut pending, clock.ms_since(epoch));
            if self.engine.is_finished() {
                break;
            }
            let now = clock.ms_since(epoch);
            let next = self.engine.next_due();
            if next.is_some_and(|d| d <= now) {
                pending.extend(self.engine.advance(now));
                continue;
            }
            let wait = next.map_or(IDLE_WAIT, |d| Duration::from_millis(d - now));
            let wake = xch::select! {
                recv(commands) -> msg => Wake::Command(msg.ok()),
                recv(responses) -> msg => Wake::Response(msg.ok()),
                default(wait) => Wake::Timer,
            };
            match wake {
                Wake::Command(Some(Command::Teardown) | None) => {
                    self.engine.teardown();
                    break;
                }
                Wake::Command(Some(cmd)) => {
                    self.command(cmd, clock.ms_since(epoch), &mut pending);
                }
                Wake::Response(Some(Response::Weight(r))) => {
                    pending.extend(self.engine.on_weight(clock.ms_since(epoch), r));
                }
                Wake::Response(Some(Response::Classification(r))) => {
                    pending.extend(self.engine.on_classification(r));
                }
                Wake::Response(None) => {
                    tracing::warn!("request workers exited; tearing down");
                    self.engine.teardown();
                    break;
                }
                Wake::Timer => {}
            }
        }
        tracing::debug!(route = ?self.route, status = %self.engine.status(), "detection loop exiting");
    }

    fn command(&mut self, cmd: Command, now: u64, pending: &mut VecDeque<Effect>) {
        match cmd {
            Command::Tap => pending.extend(self.engine.on_tap(now)),
            Command::ContinueScanning => pending.extend(self.engine.continue_scanning(now)),
            Command::Cancel => pending.extend(self.engine.cancel()),
            Command::Proceed { current, reply } => {
                let res = self.engine.proceed(current.as_ref()).map(|fx| {
                    pending.extend(fx);
                });
                let _ = reply.send(res);
            }
            Command::Teardown => self.engine.teardown(),
        }
    }

    fn apply(&mut self, pending: &mut VecDeque<Effect>, now: u64) {
        while let Some(effect) = pending.pop_front() {
            match effect {
                Effect::RequestWeight => {
                    if !self.weight.request() {
                        let err = KioskError::Transport("weight worker unavailable".into());
                        pending.extend(self.engine.on_weight(now, Err(err)));
                    }
                }
                Effect::RequestClassification => {
                    if !self.classify.request() {
                        let err = KioskError::Transport("classifier worker unavailable".into());
                        pending.extend(self.engine.on_classification(Err(err)));
                    }
                }
                Effect::Emit(event) => {
                    if let DetectionEvent::Navigate(route) = event {
                        self.route = Some(route);
                    }
                    // Nobody listening is fine; the handle may only wait.
                    let _ = self.events.send(event);
                }
            }
        }
    }

    fn outcome(&self) -> SessionOutcome {
        SessionOutcome {
            route: self.route,
            status: self.engine.status(),
            parcel: self.engine.parcel().cloned(),
            failure: self.engine.failure().cloned(),
        }
    }
}
