//! Administrative panel: commands and report formatting.
//!
//! Whether a sender may use the panel is decided by the caller.

use supply_core::InboundMessage;

use crate::i18n::{package_label, translate, Language, TextKey};
use crate::state::WatchSnapshot;

/// Command that opens the panel.
pub const ADMIN_COMMAND: &str = "admin";

const ACTIONS: [(TextKey, AdminCommand); 3] = [
    (TextKey::AdminActiveWatches, AdminCommand::ActiveWatches),
    (TextKey::AdminClearCache, AdminCommand::ClearCache),
    (TextKey::AdminStatistics, AdminCommand::Statistics),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminCommand {
    /// Show the action keyboard.
    Panel,
    ActiveWatches,
    ClearCache,
    Statistics,
}

impl AdminCommand {
    /// Recognize `/admin` or a panel button label in any supported language.
    pub fn parse(message: &InboundMessage) -> Option<Self> {
        if message.command() == Some(ADMIN_COMMAND) {
            return Some(Self::Panel);
        }
        let text = message.trimmed();
        Language::SUPPORTED.into_iter().find_map(|lang| {
            ACTIONS
                .iter()
                .find(|(key, _)| translate(lang, *key) == text)
                .map(|(_, command)| *command)
        })
    }
}

/// Button labels of the panel keyboard.
pub fn panel_choices(lang: Language) -> Vec<String> {
    ACTIONS
        .iter()
        .map(|(key, _)| translate(lang, *key).to_string())
        .collect()
}

pub fn active_watches_report<'a, I>(lang: Language, watches: I) -> String
where
    I: IntoIterator<Item = &'a WatchSnapshot>,
{
    let lines: Vec<String> = watches
        .into_iter()
        .map(|w| {
            format!(
                "{}: {} (ID: {}), {}, {}, {} .. {}",
                w.user,
                w.warehouse_name,
                w.warehouse_id,
                package_label(lang, w.package_type),
                w.coefficient,
                w.start_date,
                w.end_date
            )
        })
        .collect();

    if lines.is_empty() {
        return translate(lang, TextKey::NoActiveWatches).to_string();
    }
    format!("{}\n{}", translate(lang, TextKey::ActiveWatchesHeader), lines.join("\n"))
}

pub fn statistics_report(lang: Language, users: usize, cached_warehouses: usize, watches: usize) -> String {
    format!(
        "{}: {}\n{}: {}\n{}: {}",
        translate(lang, TextKey::TotalUsers),
        users,
        translate(lang, TextKey::CachedWarehouses),
        cached_warehouses,
        translate(lang, TextKey::RunningWatches),
        watches
    )
}
