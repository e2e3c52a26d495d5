//! The recurring body of a watch.

use std::sync::Arc;
use std::time::Duration;

use supply_core::{AcceptanceCoefficient, FetchError, MessageSender, OutboundMessage, SuppliesProvider};
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

use crate::i18n::{package_label, translate, TextKey};
use crate::state::{StateStore, WatchSnapshot};

/// How a watch ended.
#[derive(Debug)]
pub enum PollOutcome {
    /// A slot matched and the user was notified.
    Matched(AcceptanceCoefficient),
    /// The feed failed; the user was told once and the conversation ended.
    Failed(FetchError),
    /// The watch was stopped. No notification is sent.
    Cancelled,
}

/// Polls the coefficient feed for one watch until it matches, fails or is
/// cancelled.
#[derive(Clone)]
pub struct ConditionPoller {
    provider: Arc<dyn SuppliesProvider>,
    sender: Arc<dyn MessageSender>,
    states: Arc<StateStore>,
    interval: Duration,
}

impl ConditionPoller {
    pub fn new(
        provider: Arc<dyn SuppliesProvider>,
        sender: Arc<dyn MessageSender>,
        states: Arc<StateStore>,
        interval: Duration,
    ) -> Self {
        Self {
            provider,
            sender,
            states,
            interval,
        }
    }

    /// Run the watch to completion.
    ///
    /// `cancel` resolving (or its sender being dropped) stops the watch at
    /// the next await point, including mid-fetch and mid-sleep.
    pub async fn run(&self, watch: &WatchSnapshot, mut cancel: oneshot::Receiver<()>) -> PollOutcome {
        let user = watch.user;
        info!(
            "Watching warehouse {} for user {} ({}, coefficient {}, {}..{})",
            watch.warehouse_id, user, watch.package_type, watch.coefficient, watch.start_date, watch.end_date
        );

        loop {
            let fetched = tokio::select! {
                biased;
                _ = &mut cancel => return PollOutcome::Cancelled,
                result = self.provider.fetch_coefficients(watch.warehouse_id) => result,
            };

            let rows = match fetched {
                Ok(rows) => rows,
                Err(e) => {
                    error!("Coefficient fetch failed for user {}: {}", user, e);
                    self.notify(watch, translate(watch.language, TextKey::CheckFailed).to_string())
                        .await;
                    self.states.remove_if_session(user, watch.session).await;
                    return PollOutcome::Failed(e);
                }
            };

            if let Some(hit) = find_match(&rows, watch) {
                info!("Match for user {} on {} ({})", user, hit.date, hit.box_type_name);
                let hit = hit.clone();
                self.notify(watch, format_match(watch, &hit)).await;
                self.states.remove_if_session(user, watch.session).await;
                return PollOutcome::Matched(hit);
            }

            debug!(
                "No match for user {} in {} rows, next poll in {:?}",
                user,
                rows.len(),
                self.interval
            );

            tokio::select! {
                biased;
                _ = &mut cancel => return PollOutcome::Cancelled,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }

    async fn notify(&self, watch: &WatchSnapshot, text: String) {
        let message = OutboundMessage::text(watch.user, text);
        if let Err(e) = self.sender.send(&message).await {
            warn!("Failed to notify user {}: {}", watch.user, e);
        }
    }
}

/// The first row, in feed order, that satisfies the watch.
///
/// Rows with an unparseable date are skipped. Coefficients must be exactly
/// equal.
pub fn find_match<'a>(
    rows: &'a [AcceptanceCoefficient],
    watch: &WatchSnapshot,
) -> Option<&'a AcceptanceCoefficient> {
    rows.iter().find(|row| {
        let Some(date) = row.slot_date() else {
            warn!("Skipping feed row with malformed date {:?}", row.date);
            return false;
        };
        #[allow(clippy::float_cmp)]
        let same_coefficient = row.coefficient == watch.coefficient;
        watch.covers(date) && row.package_type() == Some(watch.package_type) && same_coefficient
    })
}

/// The notification sent when a slot matches.
pub fn format_match(watch: &WatchSnapshot, hit: &AcceptanceCoefficient) -> String {
    let lang = watch.language;
    let date = hit
        .slot_date()
        .map_or_else(|| hit.date.clone(), |d| d.to_string());
    let package = hit
        .package_type()
        .map_or(hit.box_type_name.as_str(), |p| package_label(lang, p));

    format!(
        "{}\n\n📅 {}: {}\n🏬 {}: {}\n📦 {}: {}\n⚖️ {}: {}",
        translate(lang, TextKey::MatchFound),
        translate(lang, TextKey::Date),
        date,
        translate(lang, TextKey::Warehouse),
        watch.warehouse_name,
        translate(lang, TextKey::PackageType),
        package,
        translate(lang, TextKey::Coefficient),
        hit.coefficient,
    )
}
