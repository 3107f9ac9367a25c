use biometrics::{Collector, Counter, Moments};

pub(crate) static BACKEND_REQUESTS: Counter = Counter::new("personal_agent.backend.requests");
pub(crate) static BACKEND_REQUEST_ERRORS: Counter =
    Counter::new("personal_agent.backend.request_errors");
pub(crate) static BACKEND_RETRIES: Counter = Counter::new("personal_agent.backend.retries");
pub(crate) static BACKEND_REQUEST_DURATION: Moments =
    Moments::new("personal_agent.backend.request_duration_seconds");
pub(crate) static BACKEND_RETRY_BACKOFF: Moments =
    Moments::new("personal_agent.backend.retry_backoff_seconds");

pub(crate) static CHAT_TURNS: Counter = Counter::new("personal_agent.chat.turns");
pub(crate) static CHAT_FAILURES: Counter = Counter::new("personal_agent.chat.failures");
pub(crate) static CHAT_TURN_DURATION: Moments =
    Moments::new("personal_agent.chat.turn_duration_seconds");

pub(crate) static COMMANDS_DISPATCHED: Counter =
    Counter::new("personal_agent.commands.dispatched");
pub(crate) static COMMANDS_UNKNOWN: Counter = Counter::new("personal_agent.commands.unknown");

pub(crate) static SESSION_ERRORS: Counter = Counter::new("personal_agent.session.errors");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&BACKEND_REQUESTS);
    collector.register_counter(&BACKEND_REQUEST_ERRORS);
    collector.register_counter(&BACKEND_RETRIES);
    collector.register_moments(&BACKEND_REQUEST_DURATION);
    collector.register_moments(&BACKEND_RETRY_BACKOFF);

    collector.register_counter(&CHAT_TURNS);
    collector.register_counter(&CHAT_FAILURES);
    collector.register_moments(&CHAT_TURN_DURATION);

    collector.register_counter(&COMMANDS_DISPATCHED);
    collector.register_counter(&COMMANDS_UNKNOWN);

    collector.register_counter(&SESSION_ERRORS);
}
