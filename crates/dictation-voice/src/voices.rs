//! Voice selection for a requested language tag.

use dictation_core::SynthVoice;

/// Pick the voice to use for `tag`.
///
/// Order: exact tag match, then primary-language match (`zh-HK` matches
/// `zh-TW`), then the engine default, then the first voice. Tags compare
/// case-insensitively with `_` treated as `-`.
pub fn select_voice<'a>(voices: &'a [SynthVoice], tag: &str) -> Option<&'a SynthVoice> {
    let wanted = normalize_tag(tag);
    let wanted_primary = primary_subtag(&wanted);

    voices
        .iter()
        .find(|v| normalize_tag(&v.lang) == wanted)
        .or_else(|| {
            voices
                .iter()
                .find(|v| primary_subtag(&normalize_tag(&v.lang)) == wanted_primary)
        })
        .or_else(|| voices.iter().find(|v| v.is_default))
        .or_else(|| voices.first())
}

fn normalize_tag(tag: &str) -> String {
    tag.trim().replace('_', "-").to_ascii_lowercase()
}

fn primary_subtag(tag: &str) -> &str {
    tag.split('-').next().unwrap_or(tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voices() -> Vec<SynthVoice> {
        vec![
            SynthVoice::new("Samantha", "en-US").as_default(),
            SynthVoice::new("Daniel", "en_GB"),
            SynthVoice::new("Mei-Jia", "zh-TW"),
            SynthVoice::new("Ting-Ting", "zh-CN"),
            SynthVoice::new("Amelie", "fr-CA"),
        ]
    }

    #[test]
    fn exact_match_wins() {
        let list = voices();
        assert_eq!(select_voice(&list, "zh-CN").unwrap().name, "Ting-Ting");
        assert_eq!(select_voice(&list, "EN-gb").unwrap().name, "Daniel");
    }

    #[test]
    fn falls_back_to_primary_language() {
        let list = voices();
        assert_eq!(select_voice(&list, "zh-HK").unwrap().name, "Mei-Jia");
        assert_eq!(select_voice(&list, "fr").unwrap().name, "Amelie");
    }

    #[test]
    fn falls_back_to_default_then_first() {
        let list = voices();
        assert_eq!(select_voice(&list, "ja-JP").unwrap().name, "Samantha");

        let no_default = vec![SynthVoice::new("A", "de-DE"), SynthVoice::new("B", "it-IT")];
        assert_eq!(select_voice(&no_default, "ja-JP").unwrap().name, "A");
    }

    #[test]
    fn empty_list_selects_nothing() {
        assert!(select_voice(&[], "en-US").is_none());
    }
}
