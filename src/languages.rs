//! Supported target languages and the shared selection handle.
//!
//! The selector shows lowercase display names; the translation backend wants
//! language codes. Both spellings are accepted wherever a target is looked up.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// (code, display name), in selector order.
pub const LANGUAGES: &[(&str, &str)] = &[
    ("af", "afrikaans"),
    ("sq", "albanian"),
    ("am", "amharic"),
    ("ar", "arabic"),
    ("hy", "armenian"),
    ("az", "azerbaijani"),
    ("eu", "basque"),
    ("be", "belarusian"),
    ("bn", "bengali"),
    ("bs", "bosnian"),
    ("bg", "bulgarian"),
    ("ca", "catalan"),
    ("ceb", "cebuano"),
    ("ny", "chichewa"),
    ("zh-cn", "chinese (simplified)"),
    ("zh-tw", "chinese (traditional)"),
    ("co", "corsican"),
    ("hr", "croatian"),
    ("cs", "czech"),
    ("da", "danish"),
    ("nl", "dutch"),
    ("en", "english"),
    ("eo", "esperanto"),
    ("et", "estonian"),
    ("tl", "filipino"),
    ("fi", "finnish"),
    ("fr", "french"),
    ("fy", "frisian"),
    ("gl", "galician"),
    ("ka", "georgian"),
    ("de", "german"),
    ("el", "greek"),
    ("gu", "gujarati"),
    ("ht", "haitian creole"),
    ("ha", "hausa"),
    ("haw", "hawaiian"),
    ("he", "hebrew"),
    ("hi", "hindi"),
    ("hmn", "hmong"),
    ("hu", "hungarian"),
    ("is", "icelandic"),
    ("ig", "igbo"),
    ("id", "indonesian"),
    ("ga", "irish"),
    ("it", "italian"),
    ("ja", "japanese"),
    ("jw", "javanese"),
    ("kn", "kannada"),
    ("kk", "kazakh"),
    ("km", "khmer"),
    ("ko", "korean"),
    ("ku", "kurdish (kurmanji)"),
    ("ky", "kyrgyz"),
    ("lo", "lao"),
    ("la", "latin"),
    ("lv", "latvian"),
    ("lt", "lithuanian"),
    ("lb", "luxembourgish"),
    ("mk", "macedonian"),
    ("mg", "malagasy"),
    ("ms", "malay"),
    ("ml", "malayalam"),
    ("mt", "maltese"),
    ("mi", "maori"),
    ("mr", "marathi"),
    ("mn", "mongolian"),
    ("my", "myanmar (burmese)"),
    ("ne", "nepali"),
    ("no", "norwegian"),
    ("or", "odia"),
    ("ps", "pashto"),
    ("fa", "persian"),
    ("pl", "polish"),
    ("pt", "portuguese"),
    ("pa", "punjabi"),
    ("ro", "romanian"),
    ("ru", "russian"),
    ("sm", "samoan"),
    ("gd", "scots gaelic"),
    ("sr", "serbian"),
    ("st", "sesotho"),
    ("sn", "shona"),
    ("sd", "sindhi"),
    ("si", "sinhala"),
    ("sk", "slovak"),
    ("sl", "slovenian"),
    ("so", "somali"),
    ("es", "spanish"),
    ("su", "sundanese"),
    ("sw", "swahili"),
    ("sv", "swedish"),
    ("tg", "tajik"),
    ("ta", "tamil"),
    ("te", "telugu"),
    ("th", "thai"),
    ("tr", "turkish"),
    ("uk", "ukrainian"),
    ("ur", "urdu"),
    ("ug", "uyghur"),
    ("uz", "uzbek"),
    ("vi", "vietnamese"),
    ("cy", "welsh"),
    ("xh", "xhosa"),
    ("yi", "yiddish"),
    ("yo", "yoruba"),
    ("zu", "zulu"),
];

// Keyed by both display name and code.
static LOOKUP: Lazy<HashMap<&'static str, (&'static str, &'static str)>> = Lazy::new(|| {
    let mut map = HashMap::with_capacity(LANGUAGES.len() * 2);
    for &(code, name) in LANGUAGES {
        map.insert(name, (code, name));
        map.insert(code, (code, name));
    }
    map
});

fn lookup(name_or_code: &str) -> Option<(&'static str, &'static str)> {
    let key = name_or_code.trim().to_lowercase();
    LOOKUP.get(key.as_str()).copied()
}

pub fn display_names() -> impl Iterator<Item = &'static str> {
    LANGUAGES.iter().map(|&(_, name)| name)
}

/// Backend code for a display name or code, case-insensitive.
pub fn code_for(name_or_code: &str) -> Option<&'static str> {
    lookup(name_or_code).map(|(code, _)| code)
}

/// Canonical display name for a display name or code, case-insensitive.
pub fn display_name_for(name_or_code: &str) -> Option<&'static str> {
    lookup(name_or_code).map(|(_, name)| name)
}

/// The currently selected target language.
///
/// Written by the control panel, read by the poll loop on every detected
/// change. Cloning shares the same selection.
#[derive(Debug, Clone)]
pub struct LanguageSelection(Arc<RwLock<String>>);

impl LanguageSelection {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self(Arc::new(RwLock::new(display_name.into())))
    }

    pub fn get(&self) -> String {
        match self.0.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn set(&self, display_name: impl Into<String>) {
        let value = display_name.into();
        match self.0.write() {
            Ok(mut guard) => *guard = value,
            Err(poisoned) => *poisoned.into_inner() = value,
        }
    }
}
