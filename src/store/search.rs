//! Session search
//!
//! Case-insensitive substring filter over session identifiers, applied
//! within each recency bucket at display time. Pure; no side effects.

/// Filter identifiers to those containing `query` as a case-insensitive
/// substring
///
/// An empty (or whitespace-only) query returns the input unchanged.
///
/// # Examples
///
/// ```
/// use infoflow::store::filter_ids;
///
/// let ids = vec!["my project notes".to_string(), "Chat 2 - 2026-08-30".to_string()];
/// let hits = filter_ids(&ids, "Project");
/// assert_eq!(hits, vec!["my project notes".to_string()]);
/// ```
pub fn filter_ids(ids: &[String], query: &str) -> Vec<String> {
    let query = query.trim();
    if query.is_empty() {
        return ids.to_vec();
    }
    let needle = query.to_lowercase();
    ids.iter()
        .filter(|id| id.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_query_returns_full_set_unchanged() {
        let input = ids(&["a", "b", "c"]);
        assert_eq!(filter_ids(&input, ""), input);
    }

    #[test]
    fn test_whitespace_query_returns_full_set_unchanged() {
        let input = ids(&["a", "b"]);
        assert_eq!(filter_ids(&input, "   "), input);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let input = ids(&["my project notes", "shopping list"]);
        assert_eq!(filter_ids(&input, "Project"), ids(&["my project notes"]));
        assert_eq!(filter_ids(&input, "SHOPPING"), ids(&["shopping list"]));
    }

    #[test]
    fn test_substring_match_anywhere_in_id() {
        let input = ids(&["Chat 1 - 2026-08-30", "Chat 12 - 2026-08-29"]);
        assert_eq!(filter_ids(&input, "08-29"), ids(&["Chat 12 - 2026-08-29"]));
    }

    #[test]
    fn test_no_match_returns_empty() {
        let input = ids(&["alpha", "beta"]);
        assert!(filter_ids(&input, "gamma").is_empty());
    }

    #[test]
    fn test_preserves_input_order() {
        let input = ids(&["b chat", "a chat", "c chat"]);
        assert_eq!(filter_ids(&input, "chat"), input);
    }
}
