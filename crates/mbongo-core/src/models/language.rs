use serde::{Deserialize, Serialize};

/// Interface languages the wallet ships with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "pidgin")]
    Pidgin,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::French, Language::Pidgin];

    /// Short code used in persisted preferences.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::French => "fr",
            Language::Pidgin => "pidgin",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Language::English),
            "fr" => Some(Language::French),
            "pidgin" => Some(Language::Pidgin),
            _ => None,
        }
    }

    /// Name shown in the language picker, in the language itself.
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::French => "Français",
            Language::Pidgin => "Pidgin",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.native_name())
    }
}
