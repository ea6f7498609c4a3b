//! Translation-code → synthesis-code normalisation.
//!
//! The translation engine speaks compound locale codes (`"zh-cn"`, `"pt-BR"`)
//! while the synthesis engine only distinguishes base languages for the
//! families below.

/// Code used when no translation code is available.
pub const DEFAULT_SYNTHESIS_CODE: &str = "en";

/// Bases whose `<base>-<region>` variants collapse to the bare base.
const REGION_STRIPPED_BASES: &[&str] = &["pt", "en", "es", "fr", "de"];

/// Chinese script variants, all spoken as `"zh"`.
const CHINESE_VARIANTS: &[&str] = &["zh-cn", "zh-tw"];

/// Map a translation-engine code to the code the synthesis engine expects.
///
/// Rules, first match wins:
///
/// 1. `None` → `"en"`.
/// 2. `"zh-cn"` / `"zh-tw"` → `"zh"`.
/// 3. `<base>-<region>` with base in pt/en/es/fr/de → base.
/// 4. anything else passes through unchanged.
///
/// ```
/// use whisper_translate::language::to_synthesis_code;
///
/// assert_eq!(to_synthesis_code(None), "en");
/// assert_eq!(to_synthesis_code(Some("zh-tw")), "zh");
/// assert_eq!(to_synthesis_code(Some("pt-BR")), "pt");
/// assert_eq!(to_synthesis_code(Some("ru")), "ru");
/// ```
pub fn to_synthesis_code(code: Option<&str>) -> String {
    let Some(code) = code else {
        return DEFAULT_SYNTHESIS_CODE.to_string();
    };

    if CHINESE_VARIANTS.iter().any(|v| v.eq_ignore_ascii_case(code)) {
        return "zh".to_string();
    }

    if let Some((base, region)) = code.split_once('-') {
        if !region.is_empty() {
            if let Some(known) = REGION_STRIPPED_BASES
                .iter()
                .find(|b| b.eq_ignore_ascii_case(base))
            {
                return (*known).to_string();
            }
        }
    }

    code.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_code_defaults_to_english() {
        assert_eq!(to_synthesis_code(None), "en");
    }

    #[test]
    fn chinese_variants_collapse() {
        assert_eq!(to_synthesis_code(Some("zh-cn")), "zh");
        assert_eq!(to_synthesis_code(Some("zh-tw")), "zh");
        assert_eq!(to_synthesis_code(Some("zh-CN")), "zh");
    }

    #[test]
    fn regional_variants_of_known_bases_are_stripped() {
        assert_eq!(to_synthesis_code(Some("pt-BR")), "pt");
        assert_eq!(to_synthesis_code(Some("en-GB")), "en");
        assert_eq!(to_synthesis_code(Some("es-419")), "es");
        assert_eq!(to_synthesis_code(Some("fr-CA")), "fr");
        assert_eq!(to_synthesis_code(Some("de-AT")), "de");
    }

    #[test]
    fn other_codes_pass_through() {
        assert_eq!(to_synthesis_code(Some("ru")), "ru");
        assert_eq!(to_synthesis_code(Some("pt")), "pt");
        assert_eq!(to_synthesis_code(Some("sr-Latn")), "sr-Latn");
        assert_eq!(to_synthesis_code(Some("zh")), "zh");
    }

    #[test]
    fn trailing_dash_is_not_a_region() {
        assert_eq!(to_synthesis_code(Some("pt-")), "pt-");
    }

    #[test]
    fn every_registry_code_normalises() {
        for label in crate::language::labels() {
            let code = crate::language::resolve(label);
            assert!(!to_synthesis_code(code).is_empty(), "label {label}");
        }
    }
}
