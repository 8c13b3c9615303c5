//! Chat controller use case
//!
//! Owns the conversation and the busy/idle lifecycle. A submission
//! optimistically appends the user turn, sends the whole transcript to the
//! chat service, then either adopts the service's transcript or appends the
//! fallback turn. Only one request is ever outstanding: a submission made
//! while another is pending is dropped, not queued.

use crate::config::{ChatConfig, ResponsePolicy};
use crate::ports::chat_completion::{ChatCompletionService, ServiceUnavailable};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::lifecycle::{LifecycleObserver, NoLifecycleObserver};
use duck_domain::{Conversation, Turn};
use serde_json::json;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Request lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Idle,
    Pending,
}

/// Why a submission was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The text trims to empty
    EmptyInput,
    /// A request is already outstanding
    Busy,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::EmptyInput => write!(f, "empty input"),
            Rejection::Busy => write!(f, "a request is already pending"),
        }
    }
}

/// Result of a call to [`ChatController::submit`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing happened: transcript and lifecycle are unchanged
    Rejected(Rejection),
    /// The service answered; its transcript replaced the local one
    Replied,
    /// The service was unavailable; the fallback turn was appended
    FellBack,
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, SubmitOutcome::Rejected(_))
    }
}

struct ChatState {
    conversation: Conversation,
    lifecycle: Lifecycle,
}

fn lock(state: &Mutex<ChatState>) -> MutexGuard<'_, ChatState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Puts the controller back to `Idle` and tells the observer when
/// dropped, whatever happened to the request in between.
struct PendingGuard<'a> {
    state: &'a Mutex<ChatState>,
    observer: &'a dyn LifecycleObserver,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        let snapshot = {
            let mut state = lock(self.state);
            state.lifecycle = Lifecycle::Idle;
            state.conversation.snapshot()
        };
        self.observer.on_idle(&snapshot);
    }
}

/// Request lifecycle controller for one conversation.
///
/// The state lock is only held for the synchronous steps around the
/// service call, never across it, so `submit` may be called again while a
/// request is in flight and the busy guard applies.
pub struct ChatController<S: ChatCompletionService + 'static> {
    service: Arc<S>,
    config: ChatConfig,
    state: Mutex<ChatState>,
    observer: Arc<dyn LifecycleObserver>,
    logger: Arc<dyn ConversationLogger>,
}

impl<S: ChatCompletionService + 'static> ChatController<S> {
    pub fn new(service: Arc<S>, config: ChatConfig) -> Self {
        let conversation = Conversation::new(config.greeting.clone());
        Self {
            service,
            config,
            state: Mutex::new(ChatState {
                conversation,
                lifecycle: Lifecycle::Idle,
            }),
            observer: Arc::new(NoLifecycleObserver),
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn LifecycleObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Current transcript
    pub fn snapshot(&self) -> Vec<Turn> {
        lock(&self.state).conversation.snapshot()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        lock(&self.state).lifecycle
    }

    pub fn is_busy(&self) -> bool {
        self.lifecycle() == Lifecycle::Pending
    }

    /// Submit a user turn and wait for the service round-trip.
    ///
    /// Never fails: service errors end in the fallback turn and the
    /// controller is idle again when this returns.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let sent = match self.begin(text) {
            Ok(sent) => sent,
            Err(rejection) => {
                debug!("Submission dropped: {}", rejection);
                return SubmitOutcome::Rejected(rejection);
            }
        };
        let guard = PendingGuard {
            state: &self.state,
            observer: self.observer.as_ref(),
        };

        info!("Sending {} turns to chat service", sent.len());
        self.logger.log(ConversationEvent::new(
            "user_turn",
            json!({
                "content": text,
                "turns": sent.len(),
            }),
        ));
        self.observer.on_busy(&sent);

        let result = self.service.complete(&sent).await;
        let outcome = self.reconcile(result);

        drop(guard);
        outcome
    }

    /// Guard, then append the user turn and go `Pending`.
    /// Returns the transcript to send.
    fn begin(&self, text: &str) -> Result<Vec<Turn>, Rejection> {
        let mut state = lock(&self.state);
        if state.lifecycle == Lifecycle::Pending {
            return Err(Rejection::Busy);
        }
        state
            .conversation
            .append_user_turn(text)
            .map_err(|_| Rejection::EmptyInput)?;
        state.lifecycle = Lifecycle::Pending;
        Ok(state.conversation.snapshot())
    }

    fn reconcile(&self, result: Result<Vec<Turn>, ServiceUnavailable>) -> SubmitOutcome {
        let mut state = lock(&self.state);
        let checked = result.and_then(|turns| self.check_response(&state.conversation, turns));

        let error = match checked {
            Ok(turns) => {
                let count = turns.len();
                match state.conversation.replace_all(turns) {
                    Ok(()) => {
                        info!("Chat service replied, transcript now has {} turns", count);
                        self.logger.log(ConversationEvent::new(
                            "service_reply",
                            json!({
                                "turns": count,
                                "last": state.conversation.last(),
                            }),
                        ));
                        return SubmitOutcome::Replied;
                    }
                    Err(e) => ServiceUnavailable::malformed(e.to_string()),
                }
            }
            Err(e) => e,
        };

        warn!("Error while talking to the chat service: {}", error);
        self.logger.log(ConversationEvent::new(
            "service_failure",
            json!({
                "cause": error.cause.to_string(),
                "error": error.message,
            }),
        ));
        state
            .conversation
            .append_assistant_turn(self.config.fallback_message.clone());
        SubmitOutcome::FellBack
    }

    fn check_response(
        &self,
        current: &Conversation,
        turns: Vec<Turn>,
    ) -> Result<Vec<Turn>, ServiceUnavailable> {
        if self.config.response_policy == ResponsePolicy::RequireExtension
            && !current.is_extended_by(&turns)
        {
            return Err(ServiceUnavailable::rejected(format!(
                "returned transcript ({} turns) does not extend the {} turns sent",
                turns.len(),
                current.len()
            )));
        }
        Ok(turns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use duck_domain::{FALLBACK_MESSAGE, GREETING, Role};
    use std::collections::VecDeque;
    use tokio::sync::Notify;

    // ==================== Test Mocks ====================

    /// Answers from a queue of canned results and records every request
    struct ScriptedService {
        responses: Mutex<VecDeque<Result<Vec<Turn>, ServiceUnavailable>>>,
        requests: Mutex<Vec<Vec<Turn>>>,
    }

    impl ScriptedService {
        fn new(responses: Vec<Result<Vec<Turn>, ServiceUnavailable>>) -> Self {
            Self {
                responses: Mutex::new(VecDeque::from(responses)),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing(times: usize) -> Self {
            Self::new(
                (0..times)
                    .map(|_| Err(ServiceUnavailable::transport("connection refused")))
                    .collect(),
            )
        }

        fn requests(&self) -> Vec<Vec<Turn>> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatCompletionService for ScriptedService {
        async fn complete(&self, transcript: &[Turn]) -> Result<Vec<Turn>, ServiceUnavailable> {
            self.requests.lock().unwrap().push(transcript.to_vec());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ServiceUnavailable::transport("no more responses")))
        }
    }

    /// Holds every request until the gate is opened, then echoes back
    /// the transcript with one assistant turn added
    struct GatedService {
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl ChatCompletionService for GatedService {
        async fn complete(&self, transcript: &[Turn]) -> Result<Vec<Turn>, ServiceUnavailable> {
            self.gate.notified().await;
            let mut reply = transcript.to_vec();
            reply.push(Turn::assistant("Coin !"));
            Ok(reply)
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        events: Mutex<Vec<(&'static str, usize)>>,
    }

    impl LifecycleObserver for RecordingObserver {
        fn on_busy(&self, transcript: &[Turn]) {
            self.events.lock().unwrap().push(("busy", transcript.len()));
        }

        fn on_idle(&self, transcript: &[Turn]) {
            self.events.lock().unwrap().push(("idle", transcript.len()));
        }
    }

    #[derive(Default)]
    struct RecordingLogger {
        events: Mutex<Vec<(&'static str, serde_json::Value)>>,
    }

    impl ConversationLogger for RecordingLogger {
        fn log(&self, event: ConversationEvent) {
            self.events
                .lock()
                .unwrap()
                .push((event.event_type, event.payload));
        }
    }

    fn controller(
        service: ScriptedService,
    ) -> (ChatController<ScriptedService>, Arc<ScriptedService>) {
        let service = Arc::new(service);
        (
            ChatController::new(Arc::clone(&service), ChatConfig::default()),
            service,
        )
    }

    const QUESTION: &str = "Quelle heure est-il ?";

    // ==================== Tests ====================

    #[test]
    fn test_fresh_controller_is_idle_with_greeting() {
        let (controller, _) = controller(ScriptedService::new(vec![]));

        let snapshot = controller.snapshot();
        assert_eq!(snapshot, vec![Turn::assistant(GREETING)]);
        assert_eq!(snapshot[0].role(), Role::Assistant);
        assert_eq!(controller.lifecycle(), Lifecycle::Idle);
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn test_success_replaces_transcript() {
        let reply = vec![
            Turn::assistant(GREETING),
            Turn::user(QUESTION),
            Turn::assistant("Il est 14h."),
        ];
        let (controller, service) = controller(ScriptedService::new(vec![Ok(reply.clone())]));

        let outcome = controller.submit(QUESTION).await;

        assert_eq!(outcome, SubmitOutcome::Replied);
        assert_eq!(controller.snapshot(), reply);
        assert_eq!(controller.lifecycle(), Lifecycle::Idle);
        assert_eq!(
            service.requests(),
            vec![vec![Turn::assistant(GREETING), Turn::user(QUESTION)]]
        );
    }

    #[tokio::test]
    async fn test_failure_appends_fallback_after_user_turn() {
        let (controller, _) = controller(ScriptedService::failing(1));

        let outcome = controller.submit(QUESTION).await;

        assert_eq!(outcome, SubmitOutcome::FellBack);
        assert_eq!(
            controller.snapshot(),
            vec![
                Turn::assistant(GREETING),
                Turn::user(QUESTION),
                Turn::assistant(FALLBACK_MESSAGE),
            ]
        );
        assert_eq!(controller.lifecycle(), Lifecycle::Idle);
    }

    #[tokio::test]
    async fn test_blank_input_is_a_noop() {
        let (controller, service) = controller(ScriptedService::new(vec![]));
        let before = controller.snapshot();

        for text in ["", "   ", "\n\t "] {
            let outcome = controller.submit(text).await;
            assert_eq!(outcome, SubmitOutcome::Rejected(Rejection::EmptyInput));
            assert!(!outcome.is_accepted());
        }

        assert_eq!(controller.snapshot(), before);
        assert_eq!(controller.lifecycle(), Lifecycle::Idle);
        assert!(service.requests().is_empty());
    }

    #[tokio::test]
    async fn test_submit_while_pending_is_dropped() {
        let gate = Arc::new(Notify::new());
        let controller = ChatController::new(
            Arc::new(GatedService {
                gate: Arc::clone(&gate),
            }),
            ChatConfig::default(),
        );

        let first = controller.submit("Salut");
        let second = async {
            tokio::task::yield_now().await;
            let busy = controller.is_busy();
            let during = controller.snapshot();
            let outcome = controller.submit("Encore moi").await;
            let blank_outcome = controller.submit("   ").await;
            let after_reject = controller.snapshot();
            gate.notify_one();
            (busy, during, outcome, blank_outcome, after_reject)
        };

        let (first_outcome, (busy, during, second_outcome, blank_outcome, after_reject)) =
            tokio::join!(first, second);

        assert!(busy);
        assert_eq!(
            during,
            vec![Turn::assistant(GREETING), Turn::user("Salut")]
        );
        assert_eq!(second_outcome, SubmitOutcome::Rejected(Rejection::Busy));
        // busy wins over the emptiness check
        assert_eq!(blank_outcome, SubmitOutcome::Rejected(Rejection::Busy));
        assert_eq!(after_reject, during);

        assert_eq!(first_outcome, SubmitOutcome::Replied);
        assert_eq!(
            controller.snapshot(),
            vec![
                Turn::assistant(GREETING),
                Turn::user("Salut"),
                Turn::assistant("Coin !"),
            ]
        );
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn test_repeated_failures_give_independent_pairs() {
        let (controller, service) = controller(ScriptedService::failing(2));

        assert_eq!(controller.submit(QUESTION).await, SubmitOutcome::FellBack);
        assert_eq!(controller.submit(QUESTION).await, SubmitOutcome::FellBack);

        assert_eq!(
            controller.snapshot(),
            vec![
                Turn::assistant(GREETING),
                Turn::user(QUESTION),
                Turn::assistant(FALLBACK_MESSAGE),
                Turn::user(QUESTION),
                Turn::assistant(FALLBACK_MESSAGE),
            ]
        );
        // The retry carries the first failed exchange along with it
        assert_eq!(service.requests()[1].len(), 4);
    }

    #[tokio::test]
    async fn test_service_transcript_is_trusted_by_default() {
        let unrelated = vec![Turn::user("rien à voir"), Turn::assistant("d'accord")];
        let (controller, _) = controller(ScriptedService::new(vec![Ok(unrelated.clone())]));

        assert_eq!(controller.submit(QUESTION).await, SubmitOutcome::Replied);
        assert_eq!(controller.snapshot(), unrelated);
    }

    #[tokio::test]
    async fn test_empty_service_transcript_falls_back() {
        let logger = Arc::new(RecordingLogger::default());
        let (controller, _) = controller(ScriptedService::new(vec![Ok(vec![])]));
        let controller = controller.with_logger(logger.clone());

        assert_eq!(controller.submit(QUESTION).await, SubmitOutcome::FellBack);
        assert_eq!(controller.snapshot().len(), 3);
        assert_eq!(
            controller.snapshot().last(),
            Some(&Turn::assistant(FALLBACK_MESSAGE))
        );
        let events = logger.events.lock().unwrap();
        assert_eq!(events[1].0, "service_failure");
        assert_eq!(events[1].1["cause"], "malformed response");
    }

    #[tokio::test]
    async fn test_require_extension_policy() {
        let extension = vec![
            Turn::assistant(GREETING),
            Turn::user(QUESTION),
            Turn::assistant("Il est 14h."),
        ];
        let rewritten = vec![Turn::assistant("autre histoire")];
        let service = Arc::new(ScriptedService::new(vec![Ok(rewritten), Ok(extension)]));
        let config = ChatConfig::default().with_response_policy(ResponsePolicy::RequireExtension);
        let controller = ChatController::new(Arc::clone(&service), config);

        assert_eq!(controller.submit(QUESTION).await, SubmitOutcome::FellBack);
        assert_eq!(
            controller.snapshot().last(),
            Some(&Turn::assistant(FALLBACK_MESSAGE))
        );

        // The second reply does not extend the (now longer) transcript either
        assert_eq!(controller.submit(QUESTION).await, SubmitOutcome::FellBack);
        assert_eq!(controller.snapshot().len(), 5);
    }

    #[tokio::test]
    async fn test_require_extension_accepts_extension() {
        let extension = vec![
            Turn::assistant(GREETING),
            Turn::user(QUESTION),
            Turn::assistant("Il est 14h."),
        ];
        let service = Arc::new(ScriptedService::new(vec![Ok(extension.clone())]));
        let config = ChatConfig::default().with_response_policy(ResponsePolicy::RequireExtension);
        let controller = ChatController::new(service, config);

        assert_eq!(controller.submit(QUESTION).await, SubmitOutcome::Replied);
        assert_eq!(controller.snapshot(), extension);
    }

    #[tokio::test]
    async fn test_custom_greeting_and_fallback() {
        let service = Arc::new(ScriptedService::failing(1));
        let config = ChatConfig::default()
            .with_greeting("Hello!")
            .with_fallback_message("Sorry, something went wrong.");
        let controller = ChatController::new(service, config);

        controller.submit("hi").await;

        assert_eq!(
            controller.snapshot(),
            vec![
                Turn::assistant("Hello!"),
                Turn::user("hi"),
                Turn::assistant("Sorry, something went wrong."),
            ]
        );
    }

    #[tokio::test]
    async fn test_observer_sees_busy_then_idle() {
        let observer = Arc::new(RecordingObserver::default());
        let (controller, _) = controller(ScriptedService::failing(1));
        let controller = controller.with_observer(observer.clone());

        controller.submit(QUESTION).await;
        controller.submit("   ").await;

        assert_eq!(
            *observer.events.lock().unwrap(),
            vec![("busy", 2), ("idle", 3)]
        );
    }

    #[tokio::test]
    async fn test_logger_records_exchange() {
        let logger = Arc::new(RecordingLogger::default());
        let reply = vec![Turn::assistant(GREETING), Turn::user(QUESTION), Turn::assistant("14h")];
        let (controller, _) = controller(ScriptedService::new(vec![
            Ok(reply),
            Err(ServiceUnavailable::status(500, "Internal Server Error")),
        ]));
        let controller = controller.with_logger(logger.clone());

        controller.submit(QUESTION).await;
        controller.submit("Et demain ?").await;

        let events = logger.events.lock().unwrap();
        let types: Vec<_> = events.iter().map(|(t, _)| *t).collect();
        assert_eq!(
            types,
            vec!["user_turn", "service_reply", "user_turn", "service_failure"]
        );
        assert_eq!(events[0].1["content"], QUESTION);
        assert_eq!(events[1].1["turns"], 3);
        assert_eq!(events[3].1["cause"], "status 500");
    }

    #[tokio::test]
    async fn test_dropped_request_returns_to_idle() {
        let gate = Arc::new(Notify::new());
        let observer = Arc::new(RecordingObserver::default());
        let controller = ChatController::new(
            Arc::new(GatedService {
                gate: Arc::clone(&gate),
            }),
            ChatConfig::default(),
        )
        .with_observer(observer.clone());

        tokio::select! {
            biased;
            _ = controller.submit("Salut") => panic!("gate was never opened"),
            _ = async {} => {}
        }

        assert_eq!(controller.lifecycle(), Lifecycle::Idle);
        assert_eq!(
            controller.snapshot(),
            vec![Turn::assistant(GREETING), Turn::user("Salut")]
        );
        assert_eq!(
            *observer.events.lock().unwrap(),
            vec![("busy", 2), ("idle", 2)]
        );
    }
}
