use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Fold text for accent-insensitive comparison: canonical decomposition,
/// combining marks dropped, `đ`/`Đ` mapped to `d` (it has no decomposition),
/// then lowercased.
pub fn fold_keyword(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.nfd() {
        if is_combining_mark(ch) {
            continue;
        }
        match ch {
            'đ' | 'Đ' => out.push('d'),
            other => out.extend(other.to_lowercase()),
        }
    }
    out
}

/// Substring matcher over product names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordMatcher {
    raw: String,
    folded: String,
}

impl KeywordMatcher {
    /// `None` when the keyword is blank.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            raw: trimmed.to_string(),
            folded: fold_keyword(trimmed),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, name: &str) -> bool {
        fold_keyword(name).contains(&self.folded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_vietnamese_diacritics() {
        assert_eq!(fold_keyword("Áo Thun Đen"), "ao thun den");
        assert_eq!(fold_keyword("Quần đùi"), "quan dui");
    }

    #[test]
    fn matcher_ignores_case_and_accents() {
        let matcher = KeywordMatcher::new("  ao THUN ").expect("non-blank");
        assert_eq!(matcher.as_str(), "ao THUN");
        assert!(matcher.matches("Áo thun cổ tròn"));
        assert!(!matcher.matches("Áo sơ mi"));
    }

    #[test]
    fn blank_keyword_has_no_matcher() {
        assert!(KeywordMatcher::new("   ").is_none());
    }
}
