//! Static target-language registry.
//!
//! The UI populates its language selector from [`labels`], so every label the
//! session ever sees comes from this same table. The sentinel
//! [`NO_TRANSLATION`] label maps to `None`.

/// Label meaning "do not translate".
pub const NO_TRANSLATION: &str = "None";

/// Label → translation-engine code, in display order.
const LANGUAGES: &[(&str, Option<&str>)] = &[
    (NO_TRANSLATION, None),
    ("Spanish", Some("es")),
    ("French", Some("fr")),
    ("German", Some("de")),
    ("Turkish", Some("tr")),
    ("Japanese", Some("ja")),
    ("Chinese (Simplified)", Some("zh-cn")),
    ("Chinese (Traditional)", Some("zh-tw")),
    ("Polish", Some("pl")),
    ("Italian", Some("it")),
    ("Portuguese", Some("pt")),
    ("Russian", Some("ru")),
    ("Korean", Some("ko")),
    ("Arabic", Some("ar")),
    ("Dutch", Some("nl")),
    ("Greek", Some("el")),
    ("Hindi", Some("hi")),
];

/// Resolve a label to its translation-engine code.
///
/// Returns `None` for [`NO_TRANSLATION`]. Unknown labels can only come from a
/// hand-edited config file; they are logged and treated as "no translation".
///
/// ```
/// use whisper_translate::language::resolve;
///
/// assert_eq!(resolve("Spanish"), Some("es"));
/// assert_eq!(resolve("None"), None);
/// ```
pub fn resolve(label: &str) -> Option<&'static str> {
    match LANGUAGES.iter().find(|(l, _)| *l == label) {
        Some((_, code)) => *code,
        None => {
            log::warn!("unknown target language label {label:?}; not translating");
            None
        }
    }
}

/// All labels in display order, starting with [`NO_TRANSLATION`].
pub fn labels() -> impl Iterator<Item = &'static str> {
    LANGUAGES.iter().map(|(label, _)| *label)
}

/// Returns `true` if `label` is a key of the registry.
pub fn is_known(label: &str) -> bool {
    LANGUAGES.iter().any(|(l, _)| *l == label)
}
