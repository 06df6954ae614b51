//! Lightweight language check for extracted text.
//!
//! The corpus is English-only: pages whose text does not score as English
//! are dropped during ingestion. Uses keyword-frequency scoring rather than
//! a statistical model, which is enough to reject obviously foreign pages.

/// Common English function words, rarely dominant in other languages.
const ENGLISH_INDICATORS: &[&str] = &[
    "the ", "and ", "was ", "for ", "are ", "but ", "not ", "you ", "all ",
    "can ", "has ", "his ", "her ", "its ", "our ", "out ", "who ", "did ",
    "been ", "from ", "have ", "this ", "that ", "with ", "they ", "will ",
    "which ", "would ", "there ", "their ", "about ", "into ", "than ",
    "other ", "some ", "what ", "when ", "were ",
];

/// Function words from the non-English languages most likely to show up in
/// a mixed document drop (French, Spanish, German, Dutch).
const FOREIGN_INDICATORS: &[&str] = &[
    "le ", "la ", "les ", "des ", "une ", "est ", "avec ", "pour ", "dans ",
    "qui ", "que ", "cette ", "el ", "los ", "las ", "por ", "con ", "para ",
    "una ", "está ", "pero ", "der ", "die ", "das ", "und ", "ist ", "nicht ",
    "ein ", "eine ", "mit ", "von ", "het ", "een ", "niet ", "voor ", "zijn ",
];

/// Decide whether extracted text is predominantly English.
///
/// Very short text cannot be classified and passes by default — dropping it
/// would lose legitimate fragments such as headings.
pub fn is_english(text: &str) -> bool {
    if text.trim().len() < 20 {
        return true;
    }

    let lower = text.to_lowercase();
    let english_score = count_indicators(&lower, ENGLISH_INDICATORS);
    let foreign_score = count_indicators(&lower, FOREIGN_INDICATORS) + count_diacritics(&lower);

    english_score >= foreign_score
}

/// Count how many indicator patterns appear in the text.
fn count_indicators(lower_text: &str, indicators: &[&str]) -> u32 {
    let mut score = 0u32;
    for &indicator in indicators {
        score += lower_text.matches(indicator).count() as u32;
    }
    score
}

/// Diacritical characters are a strong non-English signal when frequent.
fn count_diacritics(lower_text: &str) -> u32 {
    let count = lower_text
        .chars()
        .filter(|ch| {
            matches!(
                ch,
                'é' | 'è' | 'ê' | 'ë' | 'ç' | 'ù' | 'û' | 'ü' | 'î' | 'ï' | 'ô' | 'à' | 'â'
                    | 'ö' | 'ä' | 'ß' | 'ñ' | 'á' | 'í' | 'ó' | 'ú'
            )
        })
        .count() as u32;
    count / 2
}
