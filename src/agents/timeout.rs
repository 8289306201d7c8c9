use crate::action::Action;
use crate::events::GameEvent;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use super::{AgentError, AgentKind, PlayerAgent, TableView};

enum Request {
    Decide(u64, TableView),
    Discard(u64, TableView),
    Observe(GameEvent),
}

enum Reply {
    Decision(u64, Result<Action, AgentError>),
    Discard(u64, Vec<usize>),
}

impl Reply {
    fn id(&self) -> u64 {
        match self {
            Reply::Decision(id, _) | Reply::Discard(id, _) => *id,
        }
    }
}

/// Runs another agent on a worker thread and gives up after a deadline.
///
/// A late decision folds; a late discard keeps the hand. Answers that arrive
/// after their deadline are dropped when the next request is made.
#[derive(Debug)]
pub struct TimeoutAgent {
    requests: Sender<Request>,
    replies: Receiver<Reply>,
    timeout: Duration,
    kind: AgentKind,
    next_id: u64,
    /// Set once an event could not reach the worker.
    worker_gone: bool,
}

impl TimeoutAgent {
    pub fn new<A>(mut inner: A, timeout: Duration) -> Self
    where
        A: PlayerAgent + Send + 'static,
    {
        let kind = inner.kind();
        let (requests, inbox) = mpsc::channel::<Request>();
        let (outbox, replies) = mpsc::channel::<Reply>();
        thread::spawn(move || {
            for req in inbox {
                let reply = match req {
                    Request::Decide(id, view) => Reply::Decision(id, inner.decide(&view)),
                    Request::Discard(id, view) => Reply::Discard(id, inner.discard(&view)),
                    Request::Observe(event) => {
                        inner.observe(&event);
                        continue;
                    }
                };
                if outbox.send(reply).is_err() {
                    break;
                }
            }
        });
        Self { requests, replies, timeout, kind, next_id: 0, worker_gone: false }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn ask(&mut self, make: impl FnOnce(u64) -> Request) -> Result<Reply, AgentError> {
        self.next_id += 1;
        let id = self.next_id;
        self.requests.send(make(id)).map_err(|_| AgentError::Disconnected)?;
        let deadline = Instant::now() + self.timeout;
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            match self.replies.recv_timeout(left) {
                Ok(reply) if reply.id() == id => return Ok(reply),
                Ok(_) => continue,
                Err(RecvTimeoutError::Timeout) => return Err(AgentError::Timeout(self.timeout)),
                Err(RecvTimeoutError::Disconnected) => return Err(AgentError::Disconnected),
            }
        }
    }
}

impl PlayerAgent for TimeoutAgent {
    fn decide(&mut self, view: &TableView) -> Result<Action, AgentError> {
        match self.ask(|id| Request::Decide(id, view.clone()))? {
            Reply::Decision(_, result) => result,
            Reply::Discard(..) => Err(AgentError::Disconnected),
        }
    }

    fn discard(&mut self, view: &TableView) -> Vec<usize> {
        match self.ask(|id| Request::Discard(id, view.clone())) {
            Ok(Reply::Discard(_, positions)) => positions,
            Ok(Reply::Decision(..)) => Vec::new(),
            Err(e) => {
                log::warn!("discard request failed ({e}), keeping hand");
                Vec::new()
            }
        }
    }

    fn observe(&mut self, event: &GameEvent) {
        if self.requests.send(Request::Observe(event.clone())).is_err() && !self.worker_gone {
            self.worker_gone = true;
            log::debug!("agent worker has stopped; events are no longer delivered");
        }
    }

    fn kind(&self) -> AgentKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::tests::view_for;
    use crate::agents::ScriptedAgent;

    struct Sleepy(Duration);

    impl PlayerAgent for Sleepy {
        fn decide(&mut self, _view: &TableView) -> Result<Action, AgentError> {
            thread::sleep(self.0);
            Ok(Action::raise_to(100))
        }
        fn discard(&mut self, _view: &TableView) -> Vec<usize> {
            thread::sleep(self.0);
            vec![0]
        }
        fn kind(&self) -> AgentKind {
            AgentKind::Scripted
        }
    }

    /// Panics on its first event, which stops the worker thread.
    struct Fragile;

    impl PlayerAgent for Fragile {
        fn decide(&mut self, _view: &TableView) -> Result<Action, AgentError> {
            Ok(Action::Call)
        }
        fn discard(&mut self, _view: &TableView) -> Vec<usize> {
            Vec::new()
        }
        fn observe(&mut self, _event: &GameEvent) {
            panic!("worker down");
        }
        fn kind(&self) -> AgentKind {
            AgentKind::Scripted
        }
    }

    #[test]
    fn dead_worker_is_flagged_once_and_decisions_fail() {
        let mut agent = TimeoutAgent::new(Fragile, Duration::from_secs(5));
        let event = GameEvent::PlayerEliminated { name: "X".into() };
        agent.observe(&event);
        let view = view_for("2c 9d Kh 5s Jc", 20, 500);
        assert_eq!(agent.decide(&view), Err(AgentError::Disconnected));
        agent.observe(&event);
        assert!(agent.worker_gone);
        agent.observe(&event);
        assert!(agent.worker_gone);
    }

    #[test]
    fn fast_agent_answers_through_the_worker() {
        let inner = ScriptedAgent::new([Action::raise_to(80)]).with_discards([vec![2]]);
        let mut agent = TimeoutAgent::new(inner, Duration::from_secs(5));
        let view = view_for("2c 9d Kh 5s Jc", 20, 500);
        assert_eq!(agent.decide(&view), Ok(Action::raise_to(80)));
        assert_eq!(agent.discard(&view), vec![2]);
        assert_eq!(agent.kind(), AgentKind::Scripted);
    }

    #[test]
    fn slow_agent_times_out_and_late_answers_are_dropped() {
        let mut agent = TimeoutAgent::new(Sleepy(Duration::from_millis(200)), Duration::from_millis(20));
        let view = view_for("2c 9d Kh 5s Jc", 20, 500);
        assert_eq!(agent.decide(&view), Err(AgentError::Timeout(Duration::from_millis(20))));
        assert!(agent.discard(&view).is_empty());
    }
}
