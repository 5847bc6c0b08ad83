//! Search query generation from normalized product names.

use std::collections::HashSet;

/// Tunable knobs for query generation.
///
/// Word caps, keyword lists, and the exclusion suffix are data rather than
/// code so deployments can retune them without a rebuild.
#[derive(Debug, Clone)]
pub struct QueryPolicy {
    /// Hard cap on emitted variants.
    pub max_variants: usize,
    /// Word cap for the quoted exact-phrase variant.
    pub exact_phrase_words: usize,
    /// Word cap for the unquoted variant.
    pub unquoted_words: usize,
    /// Length of the head-words variant, emitted when the name has at
    /// least this many words.
    pub head_words: usize,
    /// Minimum word count before the drop-a-word variants are emitted.
    pub min_words_for_tail_drop: usize,
    /// Words removed for the filler-free broadening variant.
    pub filler_words: Vec<String>,
    /// Names containing these sell one item; comparables must exclude
    /// multi-item listings.
    pub single_item_keywords: Vec<String>,
    /// Names containing these sell several items at once.
    pub multi_item_keywords: Vec<String>,
    /// Appended to every variant for single-item listings.
    pub exclusion_suffix: String,
}

impl Default for QueryPolicy {
    fn default() -> Self {
        Self {
            max_variants: 10,
            exact_phrase_words: 8,
            unquoted_words: 10,
            head_words: 6,
            min_words_for_tail_drop: 3,
            filler_words: to_strings(&["the", "pack", "bundle", "set", "of"]),
            single_item_keywords: to_strings(&[
                "tin",
                "booster pack",
                "blister",
                "theme deck",
                "starter deck",
                "premium collection",
            ]),
            multi_item_keywords: to_strings(&[
                "booster box",
                "display",
                "case",
                "bundle",
                "lot",
                "set of",
            ]),
            exclusion_suffix: "-box -display -case -bundle -lot -set".to_string(),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// What the listing sells, as far as keywords can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingKind {
    SingleItem,
    MultiItem,
    Unclassified,
}

/// Keyword classification of a product name.
///
/// Multi-item keywords are checked first, so a name matching both kinds
/// gets the permissive treatment. Single-word keywords match whole words
/// only ("tin" stays clear of "destination").
pub fn classify_listing(name: &str, policy: &QueryPolicy) -> ListingKind {
    let lower = name.to_lowercase();
    if policy
        .multi_item_keywords
        .iter()
        .any(|keyword| contains_keyword(&lower, keyword))
    {
        return ListingKind::MultiItem;
    }
    if policy
        .single_item_keywords
        .iter()
        .any(|keyword| contains_keyword(&lower, keyword))
    {
        return ListingKind::SingleItem;
    }
    ListingKind::Unclassified
}

fn contains_keyword(name_lower: &str, keyword: &str) -> bool {
    if keyword.contains(' ') {
        name_lower.contains(keyword)
    } else {
        name_lower
            .split_whitespace()
            .any(|word| word.trim_matches(|c: char| !c.is_alphanumeric()) == keyword)
    }
}

/// Build the ordered ladder of search variants for a product name.
///
/// Most specific first: quoted exact phrase, then the plain name, then
/// successively broader cuts. Variants are deduplicated case-insensitively
/// preserving first-occurrence order, never empty, and capped at
/// `max_variants`. Single-item listings get the exclusion suffix appended
/// to every variant so they are not compared against sealed-case prices.
pub fn generate_queries(name: &str, policy: &QueryPolicy) -> Vec<String> {
    let words: Vec<&str> = name.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }

    let mut variants: Vec<String> = Vec::new();

    let phrase_len = words.len().min(policy.exact_phrase_words);
    variants.push(format!("\"{}\"", words[..phrase_len].join(" ")));

    let unquoted_len = words.len().min(policy.unquoted_words);
    variants.push(words[..unquoted_len].join(" "));

    if words.len() >= policy.head_words {
        variants.push(words[..policy.head_words].join(" "));
    }

    if words.len() >= policy.min_words_for_tail_drop {
        variants.push(words[..words.len() - 1].join(" "));
        variants.push(words[1..].join(" "));
    }

    let defillered: Vec<&str> = words
        .iter()
        .filter(|word| {
            let lower = word.to_lowercase();
            !policy.filler_words.iter().any(|filler| *filler == lower)
        })
        .copied()
        .collect();
    if !defillered.is_empty() && defillered.len() < words.len() {
        variants.push(defillered.join(" "));
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut queries: Vec<String> = Vec::new();
    for variant in variants {
        if variant.trim().is_empty() {
            continue;
        }
        if seen.insert(variant.to_lowercase()) {
            queries.push(variant);
            if queries.len() == policy.max_variants {
                break;
            }
        }
    }

    if classify_listing(name, policy) == ListingKind::SingleItem
        && !policy.exclusion_suffix.is_empty()
    {
        for query in &mut queries {
            query.push(' ');
            query.push_str(&policy.exclusion_suffix);
        }
    }

    queries
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // === Variant ladder ===

    #[test]
    fn test_booster_box_ladder() {
        let policy = QueryPolicy::default();
        let queries = generate_queries("Pokémon Mega Evolutions Booster Box", &policy);
        assert_eq!(
            queries,
            vec![
                "\"Pokémon Mega Evolutions Booster Box\"",
                "Pokémon Mega Evolutions Booster Box",
                "Pokémon Mega Evolutions Booster",
                "Mega Evolutions Booster Box",
            ]
        );
    }

    #[test]
    fn test_long_name_capped_words() {
        let policy = QueryPolicy::default();
        let name = "one two three four five six seven eight nine ten eleven";
        let queries = generate_queries(name, &policy);
        assert_eq!(queries[0], "\"one two three four five six seven eight\"");
        assert_eq!(queries[1], "one two three four five six seven eight nine ten");
        assert_eq!(queries[2], "one two three four five six");
        assert!(queries.len() <= policy.max_variants);
    }

    #[test]
    fn test_short_name_still_two_variants() {
        let policy = QueryPolicy::default();
        let queries = generate_queries("Switch OLED", &policy);
        assert_eq!(queries, vec!["\"Switch OLED\"", "Switch OLED"]);
    }

    #[test]
    fn test_dedup_is_case_insensitive_and_order_preserving() {
        let policy = QueryPolicy::default();
        let queries = generate_queries("Lego LEGO lego", &policy);
        assert_eq!(
            queries,
            vec!["\"Lego LEGO lego\"", "Lego LEGO lego", "Lego LEGO"]
        );
    }

    #[test]
    fn test_no_empty_variants() {
        let policy = QueryPolicy::default();
        for queries in [
            generate_queries("", &policy),
            generate_queries("the of", &policy),
            generate_queries("Unknown Product", &policy),
        ] {
            assert!(queries.iter().all(|q| !q.trim().is_empty()));
        }
    }

    #[test]
    fn test_filler_variant() {
        let policy = QueryPolicy::default();
        let queries = generate_queries("Elite Trainer Box of the Year", &policy);
        assert!(queries.contains(&"Elite Trainer Box Year".to_string()));
    }

    // === Classification ===

    #[test]
    fn test_classify_multi_item() {
        let policy = QueryPolicy::default();
        assert_eq!(
            classify_listing("Pokémon Mega Evolutions Booster Box", &policy),
            ListingKind::MultiItem
        );
        assert_eq!(
            classify_listing("Set of 6 whisky glasses", &policy),
            ListingKind::MultiItem
        );
    }

    #[test]
    fn test_classify_single_item() {
        let policy = QueryPolicy::default();
        assert_eq!(
            classify_listing("Pokémon Scarlet Violet Booster Pack", &policy),
            ListingKind::SingleItem
        );
        assert_eq!(
            classify_listing("Biscuit Tin, Large", &policy),
            ListingKind::SingleItem
        );
    }

    #[test]
    fn test_single_word_keywords_match_whole_words() {
        let policy = QueryPolicy::default();
        assert_eq!(
            classify_listing("Destination Calabria Vinyl", &policy),
            ListingKind::Unclassified
        );
    }

    #[test]
    fn test_multi_item_wins_when_both_match() {
        let policy = QueryPolicy::default();
        assert_eq!(
            classify_listing("Booster Pack Display Stand", &policy),
            ListingKind::MultiItem
        );
    }

    // === Exclusion suffix ===

    #[test]
    fn test_single_item_gets_suffix_everywhere() {
        let policy = QueryPolicy::default();
        let queries = generate_queries("Pokémon Scarlet Violet Booster Pack", &policy);
        assert!(!queries.is_empty());
        for query in &queries {
            assert!(
                query.ends_with("-box -display -case -bundle -lot -set"),
                "missing suffix on {query:?}"
            );
        }
    }

    #[test]
    fn test_multi_item_and_unclassified_get_no_suffix() {
        let policy = QueryPolicy::default();
        for name in ["Pokémon Mega Evolutions Booster Box", "Switch OLED"] {
            for query in generate_queries(name, &policy) {
                assert!(!query.contains("-box"), "unexpected suffix on {query:?}");
            }
        }
    }
}
