//! Title keyword classification
//!
//! Rules are evaluated in order and the first rule with a matching keyword
//! wins, so a title mentioning both "society" and "money" is `Society`.

use crate::models::VideoCategory;

/// Ordered (keywords, category) rules; keywords are lowercase.
pub const CATEGORY_RULES: &[(&[&str], VideoCategory)] = &[
    (&["red leather pod", "rlp"], VideoCategory::Podcast),
    (
        &["society", "civilization", "western"],
        VideoCategory::Society,
    ),
    (&["business", "economy", "money"], VideoCategory::Business),
    (&["dating", "relationships"], VideoCategory::Relationships),
    (&["conspiracy", "aliens"], VideoCategory::Conspiracy),
];

/// Classify a title by case-insensitive keyword match.
pub fn classify_title(title: &str) -> VideoCategory {
    let title = title.to_lowercase();

    CATEGORY_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| title.contains(keyword)))
        .map(|(_, category)| *category)
        .unwrap_or(VideoCategory::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_keyword_any_case() {
        assert_eq!(
            classify_title("Why BUSINESS owners are leaving"),
            VideoCategory::Business
        );
        assert_eq!(classify_title("The new economy"), VideoCategory::Business);
    }

    #[test]
    fn test_no_keyword_is_other() {
        assert_eq!(classify_title("Skateboarding in Tokyo"), VideoCategory::Other);
        assert_eq!(classify_title(""), VideoCategory::Other);
    }

    #[test]
    fn test_first_rule_wins() {
        // "society" is ranked above "money"
        assert_eq!(
            classify_title("Money and modern society"),
            VideoCategory::Society
        );
        assert_eq!(
            classify_title("RLP #42: dating advice"),
            VideoCategory::Podcast
        );
    }

    #[test]
    fn test_each_rule() {
        assert_eq!(
            classify_title("Red Leather Pod live"),
            VideoCategory::Podcast
        );
        assert_eq!(
            classify_title("The fall of western civilization"),
            VideoCategory::Society
        );
        assert_eq!(
            classify_title("Relationships in 2024"),
            VideoCategory::Relationships
        );
        assert_eq!(classify_title("Aliens are real?"), VideoCategory::Conspiracy);
    }

    #[test]
    fn test_substring_match() {
        // plain substring semantics, "moneyball" still contains "money"
        assert_eq!(classify_title("Moneyball review"), VideoCategory::Business);
    }
}
