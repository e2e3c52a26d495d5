//! Language negotiation and the message catalog.

use std::fmt;
use std::str::FromStr;

/// Languages the bot can talk in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    Ru,
    En,
}

impl Language {
    pub const SUPPORTED: [Language; 2] = [Language::Ru, Language::En];

    pub fn code(self) -> &'static str {
        match self {
            Self::Ru => "ru",
            Self::En => "en",
        }
    }

    /// Look up a language by its primary subtag, ignoring region and case
    /// (`"en-US"`, `"EN_gb"` and `"en"` all resolve to English).
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag.split(['-', '_']).next().unwrap_or("").trim();
        Self::SUPPORTED
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(primary))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| format!("unsupported language '{}'", s))
    }
}

/// Pick the first supported language among the client's preferred tags.
pub fn negotiate_language(preferred: &[String], default: Language) -> Language {
    preferred
        .iter()
        .find_map(|tag| Language::from_tag(tag))
        .unwrap_or(default)
}

/// Keys of every user-facing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKey {
    Welcome,
    ChooseWarehouse,
    NoWarehousesFound,
    WarehouseNotInList,
    ChoosePackageType,
    PackageTypeNotInList,
    EnterCoefficient,
    CoefficientNotNumber,
    EnterStartDate,
    EnterEndDate,
    InvalidDate,
    EndBeforeStart,
    WatchStarted,
    MatchFound,
    Date,
    Warehouse,
    PackageType,
    Coefficient,
    CheckFailed,
    UnknownMessage,
    NoPermission,
    AdminChooseAction,
    AdminActiveWatches,
    AdminClearCache,
    AdminStatistics,
    ActiveWatchesHeader,
    NoActiveWatches,
    CacheCleared,
    TotalUsers,
    CachedWarehouses,
    RunningWatches,
}

/// Look up a text in the catalog.
pub fn translate(language: Language, key: TextKey) -> &'static str {
    match language {
        Language::Ru => ru(key),
        Language::En => en(key),
    }
}

/// Package type label shown to users of the given language.
///
/// Russian users see the feed's own labels.
pub fn package_label(language: Language, package_type: supply_core::PackageType) -> &'static str {
    match language {
        Language::Ru => package_type.feed_label(),
        Language::En => package_type.label(),
    }
}

fn ru(key: TextKey) -> &'static str {
    use TextKey::*;
    match key {
        Welcome => "Привет! Я помогу тебе найти подходящие условия для поставок.\nДавай начнем. В каком городе ты ищешь склад?",
        ChooseWarehouse => "Пожалуйста, выбери склад из списка:",
        NoWarehousesFound => "К сожалению, складов в этом городе не найдено. Попробуй ввести другой город.",
        WarehouseNotInList => "Пожалуйста, выбери склад из предложенного списка.",
        ChoosePackageType => "Выбери тип упаковки:",
        PackageTypeNotInList => "Пожалуйста, выбери тип упаковки из предложенного списка.",
        EnterCoefficient => "Укажи требуемый коэффициент (например, 1, 0, -1):",
        CoefficientNotNumber => "Пожалуйста, введи числовое значение для коэффициента.",
        EnterStartDate => "Укажи начальную дату в формате ГГГГ-ММ-ДД:",
        EnterEndDate => "Укажи конечную дату в формате ГГГГ-ММ-ДД:",
        InvalidDate => "Пожалуйста, введи дату в корректном формате ГГГГ-ММ-ДД.",
        EndBeforeStart => "Конечная дата не может быть раньше начальной. Пожалуйста, введи корректную дату.",
        WatchStarted => "Отлично! Я начну поиск подходящих условий и сообщу тебе, как только что-то найду.",
        MatchFound => "Найдены подходящие условия!",
        Date => "Дата",
        Warehouse => "Склад",
        PackageType => "Тип упаковки",
        Coefficient => "Коэффициент",
        CheckFailed => "Произошла ошибка при проверке условий. Попробуй позже.",
        UnknownMessage => "Извини, я не понимаю это сообщение. Пожалуйста, следуй инструкциям.",
        NoPermission => "У вас нет прав для использования этой команды.",
        AdminChooseAction => "Выберите действие:",
        AdminActiveWatches => "Активные запросы",
        AdminClearCache => "Очистить кэш",
        AdminStatistics => "Статистика",
        ActiveWatchesHeader => "Активные запросы:",
        NoActiveWatches => "Нет активных запросов.",
        CacheCleared => "Кэш складов очищен.",
        TotalUsers => "Всего пользователей",
        CachedWarehouses => "Складов в кэше",
        RunningWatches => "Активных поисков",
    }
}

fn en(key: TextKey) -> &'static str {
    use TextKey::*;
    match key {
        Welcome => "Hi! I'll help you find suitable supply conditions.\nLet's start. In which city are you looking for a warehouse?",
        ChooseWarehouse => "Please choose a warehouse from the list:",
        NoWarehousesFound => "Unfortunately, no warehouses were found in this city. Try another city.",
        WarehouseNotInList => "Please choose a warehouse from the suggested list.",
        ChoosePackageType => "Choose a package type:",
        PackageTypeNotInList => "Please choose a package type from the suggested list.",
        EnterCoefficient => "Enter the desired coefficient (for example, 1, 0, -1):",
        CoefficientNotNumber => "Please enter a numeric value for the coefficient.",
        EnterStartDate => "Enter the start date in YYYY-MM-DD format:",
        EnterEndDate => "Enter the end date in YYYY-MM-DD format:",
        InvalidDate => "Please enter the date in the correct YYYY-MM-DD format.",
        EndBeforeStart => "The end date cannot be earlier than the start date. Please enter a valid date.",
        WatchStarted => "Great! I'll start looking for suitable conditions and let you know as soon as I find something.",
        MatchFound => "Suitable conditions found!",
        Date => "Date",
        Warehouse => "Warehouse",
        PackageType => "Package type",
        Coefficient => "Coefficient",
        CheckFailed => "An error occurred while checking conditions. Please try again later.",
        UnknownMessage => "Sorry, I don't understand this message. Please follow the instructions.",
        NoPermission => "You do not have permission to use this command.",
        AdminChooseAction => "Choose an action:",
        AdminActiveWatches => "Active watches",
        AdminClearCache => "Clear cache",
        AdminStatistics => "Statistics",
        ActiveWatchesHeader => "Active watches:",
        NoActiveWatches => "No active watches.",
        CacheCleared => "Warehouse cache cleared.",
        TotalUsers => "Total users",
        CachedWarehouses => "Warehouses in cache",
        RunningWatches => "Running watches",
    }
}
