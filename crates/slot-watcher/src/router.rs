//! Routes each inbound message to the step of the funnel the user is on.

use std::sync::Arc;

use supply_core::{InboundMessage, MessageSender, OutboundMessage, PackageType};
use tracing::{debug, error, info, warn};

use crate::directory::WarehouseDirectory;
use crate::error::OutOfOrder;
use crate::i18n::{negotiate_language, package_label, translate, Language, TextKey};
use crate::scheduler::WatchScheduler;
use crate::state::{ConversationState, Stage, StateStore, WatchSnapshot};
use crate::validators::{
    parse_city, parse_coefficient, parse_date, parse_end_date, parse_package_type, select_warehouse,
    ValidationError,
};

/// Command that resets the conversation.
pub const START_COMMAND: &str = "start";

/// Replies for one step, plus the watch to start once they are delivered.
struct Step {
    replies: Vec<OutboundMessage>,
    watch: Option<WatchSnapshot>,
}

impl Step {
    fn reply(message: OutboundMessage) -> Self {
        Self {
            replies: vec![message],
            watch: None,
        }
    }
}

/// The conversation funnel.
///
/// A user's messages are handled one at a time under that user's state
/// lock; replies are delivered before the lock is released so they arrive
/// in order and ahead of any notification from the watch they start.
pub struct ConversationRouter {
    directory: Arc<WarehouseDirectory>,
    states: Arc<StateStore>,
    scheduler: WatchScheduler,
    sender: Arc<dyn MessageSender>,
    default_language: Language,
}

impl ConversationRouter {
    pub fn new(
        directory: Arc<WarehouseDirectory>,
        states: Arc<StateStore>,
        scheduler: WatchScheduler,
        sender: Arc<dyn MessageSender>,
        default_language: Language,
    ) -> Self {
        Self {
            directory,
            states,
            scheduler,
            sender,
            default_language,
        }
    }

    /// Handle one message and return the replies that were sent.
    pub async fn handle(&self, message: &InboundMessage) -> Vec<OutboundMessage> {
        let user = message.sender;
        let slot = self.states.slot(user).await;
        let mut state = slot.lock().await;

        let restart = message.command() == Some(START_COMMAND);
        let step = match state.as_mut().filter(|_| !restart) {
            Some(current) => self.advance(current, message).await,
            None => {
                if restart && self.scheduler.stop(user).await {
                    info!("User {} restarted, previous watch cancelled", user);
                }
                let language = negotiate_language(&message.language_tags, self.default_language);
                let fresh = self.states.begin(user, language).await;
                info!(
                    "New conversation {} for user {} in {}",
                    fresh.session(),
                    user,
                    language
                );
                *state = Some(fresh);
                Step::reply(OutboundMessage::reply_to(
                    message,
                    translate(language, TextKey::Welcome),
                ))
            }
        };

        for reply in &step.replies {
            if let Err(e) = self.sender.send(reply).await {
                warn!("Failed to reply to user {}: {}", user, e);
            }
        }

        if let Some(watch) = step.watch {
            // A conflict is already logged by the scheduler; the running
            // watch keeps going.
            let _ = self.scheduler.start(watch).await;
        }

        step.replies
    }

    async fn advance(&self, state: &mut ConversationState, message: &InboundMessage) -> Step {
        let user = message.sender;
        let lang = state.language();
        let text = message.trimmed();
        let say = |key: TextKey| OutboundMessage::reply_to(message, translate(lang, key));

        let stage = state.stage();
        debug!("User {} at {:?}: {:?}", user, stage, text);

        let result: Result<Step, StepError> = match stage {
            Stage::City => match parse_city(text) {
                Ok(city) => {
                    let candidates = self.directory.find_by_city(city).await;
                    if candidates.is_empty() {
                        warn!("No warehouses for city {:?} (user {})", city, user);
                        Err(StepError::Invalid(TextKey::NoWarehousesFound))
                    } else {
                        let labels: Vec<String> = candidates.iter().map(|w| w.label()).collect();
                        state
                            .set_city(city, candidates)
                            .map(|_| Step::reply(say(TextKey::ChooseWarehouse).with_choices(labels)))
                            .map_err(StepError::from)
                    }
                }
                Err(_) => Err(StepError::Invalid(TextKey::NoWarehousesFound)),
            },
            Stage::Warehouse => match select_warehouse(text, state.candidates()).cloned() {
                Ok(warehouse) => {
                    info!("User {} picked warehouse {}", user, warehouse.id);
                    state
                        .set_warehouse(warehouse)
                        .map(|_| {
                            Step::reply(say(TextKey::ChoosePackageType).with_choices(package_choices(lang)))
                        })
                        .map_err(StepError::from)
                }
                Err(e) => Err(StepError::Rejected(e, TextKey::WarehouseNotInList)),
            },
            Stage::PackageType => match parse_package_type(text) {
                Ok(package_type) => state
                    .set_package_type(package_type)
                    .map(|_| Step::reply(say(TextKey::EnterCoefficient)))
                    .map_err(StepError::from),
                Err(e) => Err(StepError::Rejected(e, TextKey::PackageTypeNotInList)),
            },
            Stage::Coefficient => match parse_coefficient(text) {
                Ok(coefficient) => state
                    .set_coefficient(coefficient)
                    .map(|_| Step::reply(say(TextKey::EnterStartDate)))
                    .map_err(StepError::from),
                Err(e) => Err(StepError::Rejected(e, TextKey::CoefficientNotNumber)),
            },
            Stage::StartDate => match parse_date(text) {
                Ok(date) => state
                    .set_start_date(date)
                    .map(|_| Step::reply(say(TextKey::EnterEndDate)))
                    .map_err(StepError::from),
                Err(e) => Err(StepError::Rejected(e, TextKey::InvalidDate)),
            },
            Stage::EndDate => match state.start_date() {
                Some(start) => match parse_end_date(text, start) {
                    Ok(end) => state
                        .set_end_date(end)
                        .map(|_| Step {
                            replies: vec![say(TextKey::WatchStarted)],
                            watch: state.snapshot(user),
                        })
                        .map_err(StepError::from),
                    Err(e @ ValidationError::EndBeforeStart { .. }) => {
                        Err(StepError::Rejected(e, TextKey::EndBeforeStart))
                    }
                    Err(e) => Err(StepError::Rejected(e, TextKey::InvalidDate)),
                },
                None => Err(StepError::Invalid(TextKey::UnknownMessage)),
            },
            Stage::Complete => Err(StepError::Invalid(TextKey::UnknownMessage)),
        };

        match result {
            Ok(step) => step,
            Err(StepError::Invalid(key)) => Step::reply(say(key)),
            Err(StepError::Rejected(e, key)) => {
                debug!("Rejected input from user {}: {}", user, e);
                Step::reply(say(key))
            }
            Err(StepError::OutOfOrder(e)) => {
                error!("Conversation for user {} out of order: {}", user, e);
                Step::reply(say(TextKey::UnknownMessage))
            }
        }
    }
}

enum StepError {
    Invalid(TextKey),
    Rejected(ValidationError, TextKey),
    OutOfOrder(OutOfOrder),
}

impl From<OutOfOrder> for StepError {
    fn from(e: OutOfOrder) -> Self {
        Self::OutOfOrder(e)
    }
}

fn package_choices(lang: Language) -> Vec<String> {
    PackageType::ALL
        .iter()
        .map(|p| package_label(lang, *p).to_string())
        .collect()
}
