/// Pick the candidate whose title best matches a scraped title.
///
/// A candidate matches when one of its titles contains the scraped title or
/// the scraped title contains it. When nothing matches, the first candidate
/// is returned as a best-effort answer rather than "no match".
pub fn rank_by_containment<'a, T, F>(title: &str, candidates: &'a [T], titles: F) -> Option<&'a T>
where
    F: Fn(&T) -> Vec<&str>,
{
    candidates
        .iter()
        .find(|candidate| {
            titles(candidate)
                .iter()
                .any(|t| !t.is_empty() && (t.contains(title) || title.contains(t)))
        })
        .or_else(|| candidates.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names<'a>(candidate: &'a &str) -> Vec<&'a str> {
        vec![*candidate]
    }

    #[test]
    fn test_candidate_containing_title_wins() {
        let candidates = ["Other Show", "Example Show Specials"];
        let best = rank_by_containment("Example Show", &candidates, names).unwrap();
        assert_eq!(*best, "Example Show Specials");
    }

    #[test]
    fn test_title_containing_candidate_wins() {
        let candidates = ["Other Show", "Example"];
        let best = rank_by_containment("Example Show", &candidates, names).unwrap();
        assert_eq!(*best, "Example");
    }

    #[test]
    fn test_no_match_falls_back_to_first() {
        let candidates = ["Alpha", "Beta"];
        let best = rank_by_containment("Gamma", &candidates, names).unwrap();
        assert_eq!(*best, "Alpha");
    }

    #[test]
    fn test_empty_candidates_yield_none() {
        let candidates: [&str; 0] = [];
        assert!(rank_by_containment("Anything", &candidates, names).is_none());
    }
}
