use std::cmp::Ordering;

use super::data::{Mix, SortOption};

/// Derive the displayed list from the canonical list.
///
/// Pure function of (mixes, search query, sort order); the view calls it
/// on every render, so it must never mutate its inputs.
pub fn process(mixes: &[Mix], query: &str, sort: SortOption) -> Vec<Mix> {
    let mut result: Vec<Mix> = mixes
        .iter()
        .filter(|mix| matches(mix, query))
        .cloned()
        .collect();

    result.sort_by(comparator(sort));
    result
}

/// Case-insensitive substring match against title, prompt, and negative
/// prompt. An empty or whitespace-only query passes every record.
pub fn matches(mix: &Mix, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }

    let query = query.to_lowercase();
    mix.title.to_lowercase().contains(&query)
        || mix.prompt.to_lowercase().contains(&query)
        || mix
            .negative_prompt
            .as_ref()
            .is_some_and(|np| np.to_lowercase().contains(&query))
}

/// Comparator for the selected sort order.
///
/// Title ordering is case-insensitive lexicographic, standing in for the
/// locale-aware comparison a browser would give.
fn comparator(sort: SortOption) -> impl FnMut(&Mix, &Mix) -> Ordering {
    move |a, b| match sort {
        SortOption::Newest => b.created_at.cmp(&a.created_at),
        SortOption::Oldest => a.created_at.cmp(&b.created_at),
        SortOption::TitleAsc => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortOption::TitleDesc => b.title.to_lowercase().cmp(&a.title.to_lowercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mix(id: &str, title: &str, prompt: &str, negative: Option<&str>, created_at: i64) -> Mix {
        Mix {
            id: id.to_string(),
            url: String::new(),
            title: title.to_string(),
            prompt: prompt.to_string(),
            negative_prompt: negative.map(str::to_string),
            created_at,
        }
    }

    fn sample() -> Vec<Mix> {
        vec![
            mix("a", "Zeta", "mountain sunset", None, 100),
            mix("b", "Alpha", "river valley", Some("blurry, low res"), 200),
        ]
    }

    #[test]
    fn test_empty_and_whitespace_queries_pass_everything() {
        let mixes = sample();
        assert_eq!(process(&mixes, "", SortOption::Oldest).len(), 2);
        assert_eq!(process(&mixes, "   ", SortOption::Oldest).len(), 2);
    }

    #[test]
    fn test_filter_is_case_insensitive_across_fields() {
        let mixes = sample();

        // Title match
        let by_title = process(&mixes, "ZET", SortOption::Newest);
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].id, "a");

        // Prompt match
        let by_prompt = process(&mixes, "RIVER", SortOption::Newest);
        assert_eq!(by_prompt.len(), 1);
        assert_eq!(by_prompt[0].id, "b");

        // Negative prompt match
        let by_negative = process(&mixes, "low res", SortOption::Newest);
        assert_eq!(by_negative.len(), 1);
        assert_eq!(by_negative[0].id, "b");

        // No match anywhere
        assert!(process(&mixes, "nothing here", SortOption::Newest).is_empty());
    }

    #[test]
    fn test_search_applies_regardless_of_sort() {
        let mixes = sample();
        for sort in SortOption::ALL {
            let result = process(&mixes, "zet", sort);
            assert_eq!(result.len(), 1);
            assert_eq!(result[0].id, "a");
        }
    }

    #[test]
    fn test_newest_and_oldest_are_exact_reverses() {
        let mixes = vec![
            mix("a", "A", "", None, 300),
            mix("b", "B", "", None, 100),
            mix("c", "C", "", None, 200),
        ];

        let newest = process(&mixes, "", SortOption::Newest);
        let mut oldest = process(&mixes, "", SortOption::Oldest);
        oldest.reverse();
        assert_eq!(newest, oldest);

        let ids: Vec<&str> = newest.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["a", "c", "b"]);
    }

    #[test]
    fn test_title_sorts_are_exact_reverses() {
        let mixes = vec![
            mix("a", "banana", "", None, 1),
            mix("b", "Apple", "", None, 2),
            mix("c", "cherry", "", None, 3),
        ];

        let asc = process(&mixes, "", SortOption::TitleAsc);
        let mut desc = process(&mixes, "", SortOption::TitleDesc);
        desc.reverse();
        assert_eq!(asc, desc);

        let titles: Vec<&str> = asc.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, ["Apple", "banana", "cherry"]);
    }

    #[test]
    fn test_sort_orders_diverge_between_date_and_title() {
        // A(createdAt=100, "Zeta"), B(createdAt=200, "Alpha")
        let mixes = sample();

        let newest: Vec<String> = process(&mixes, "", SortOption::Newest)
            .iter()
            .map(|m| m.id.clone())
            .collect();
        assert_eq!(newest, ["b", "a"]);

        let a_to_z: Vec<String> = process(&mixes, "", SortOption::TitleAsc)
            .iter()
            .map(|m| m.title.clone())
            .collect();
        assert_eq!(a_to_z, ["Alpha", "Zeta"]);
    }
}
