//! Company name normalization.
//!
//! Reduces a free-text company name to a canonical form used only for
//! equality comparisons, never for display. Handles variations like:
//! - Legal-entity forms: ООО/ОАО/ЗАО/АО, LLC, Ltd., GmbH, ...
//! - Generic org-type words: "company", "group", "holding", "филиал", ...
//! - Quote characters, including typographic ones: ООО «Ромашка»
//! - Case and whitespace variations
//!
//! Normalization is total (never fails, possibly returns an empty string,
//! which callers treat as "unmatched/skip") and idempotent.
//!
//! The resulting match rule is deliberately blunt: two distinct companies
//! sharing only generic words can collapse to the same string, and name
//! variants outside the vocabulary stay distinct.

/// Filler vocabulary stripped as whole words, case-insensitive.
/// All entries are lowercase; tokens are lowercased before comparison.
const FILLER_TOKENS: &[&str] = &[
    // Russian legal-entity forms
    "ооо",
    "оао",
    "зао",
    "пао",
    "ао",
    "ип",
    "нко",
    "гуп",
    "фгуп",
    "муп",
    "нпо",
    // Latin legal-entity forms
    "llc",
    "ltd",
    "inc",
    "corp",
    "co",
    "plc",
    "gmbh",
    "llp",
    "jsc",
    "cjsc",
    "ojsc",
    // Generic org-type words
    "company",
    "компания",
    "группа",
    "групп",
    "group",
    "holding",
    "холдинг",
    "корпорация",
    "corporation",
    "branch",
    "филиал",
    "представительство",
    "representative",
    "office",
    // Administrative-geography qualifiers
    "россия",
    "russia",
    "рф",
    "москва",
    "moscow",
    "спб",
    "санкт-петербург",
    "регион",
    "region",
    "город",
];

/// Characters treated as noise and replaced with whitespace before
/// tokenization. Covers straight, typographic and angle quotes plus the
/// punctuation that commonly decorates legal forms ("ООО.", "Acme, Inc").
const NOISE_CHARS: &[char] = &[
    '"', '\'', '`', '«', '»', '“', '”', '„', '‘', '’', '.', ',', ';', ':', '(', ')',
];

/// Normalize a company name for fuzzy equality comparison.
///
/// Lowercases, strips quote and punctuation characters, drops filler
/// vocabulary tokens, collapses whitespace and trims. Total and idempotent.
pub fn normalize_company_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let cleaned: String = lowered
        .chars()
        .map(|c| if NOISE_CHARS.contains(&c) { ' ' } else { c })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|token| !is_filler(token))
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_filler(token: &str) -> bool {
    FILLER_TOKENS.contains(&token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_legal_form_and_quotes() {
        assert_eq!(
            normalize_company_name("ООО \"Ромашка\""),
            normalize_company_name("Ромашка")
        );
        assert_eq!(normalize_company_name("ООО \"Ромашка\""), "ромашка");
    }

    #[test]
    fn test_strips_typographic_quotes() {
        assert_eq!(normalize_company_name("ЗАО «Вектор»"), "вектор");
        assert_eq!(normalize_company_name("“Acme” LLC"), "acme");
    }

    #[test]
    fn test_strips_org_type_words() {
        assert_eq!(normalize_company_name("Акме Групп"), "акме");
        assert_eq!(normalize_company_name("Acme Holding Company"), "acme");
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            normalize_company_name("ACME SOFTWARE"),
            normalize_company_name("acme software")
        );
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize_company_name("  New   Vector   Labs "), "new vector labs");
    }

    #[test]
    fn test_trailing_punctuation_on_legal_form() {
        assert_eq!(normalize_company_name("Acme, Inc."), "acme");
        assert_eq!(normalize_company_name("ООО. Ромашка"), "ромашка");
    }

    #[test]
    fn test_filler_only_name_yields_empty() {
        assert_eq!(normalize_company_name("ООО Компания"), "");
        assert_eq!(normalize_company_name(""), "");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "ООО \"Ромашка\"",
            "Акме Групп",
            "The Acme Company, Inc.",
            "ЗАО «Вектор» Москва",
            "plain name",
            "",
        ];
        for s in samples {
            let once = normalize_company_name(s);
            assert_eq!(normalize_company_name(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_geography_qualifier_stripped() {
        assert_eq!(
            normalize_company_name("Ромашка Москва"),
            normalize_company_name("Ромашка")
        );
    }

    #[test]
    fn test_non_filler_words_kept() {
        // "новая" is not in the vocabulary and must survive
        assert_eq!(normalize_company_name("ООО Новая Ромашка"), "новая ромашка");
    }
}
