//! Filter engine
//!
//! Linear case-insensitive substring scan over the in-memory advocate list.
//! Every pass rescans the whole list; nothing is indexed or cached between
//! passes.

use crate::advocate::Advocate;

/// How the specialties list takes part in matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SpecialtyMatch {
    /// Each specialty is tested on its own
    #[default]
    PerElement,
    /// Specialties are joined with `,` and tested as one string
    Joined,
}

/// Which fields the match predicate looks at, beyond the always-searched
/// name, city, degree and years of experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchRules {
    pub specialties: SpecialtyMatch,
    pub match_phone: bool,
}

/// Trim surrounding whitespace and lowercase.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Does `advocate` match an already normalized, non-empty query?
pub fn matches(advocate: &Advocate, query: &str, rules: &MatchRules) -> bool {
    let text_fields = [
        &advocate.first_name,
        &advocate.last_name,
        &advocate.city,
        &advocate.degree,
    ];
    if text_fields.iter().any(|field| normalize(field).contains(query)) {
        return true;
    }

    let specialty_hit = match rules.specialties {
        SpecialtyMatch::PerElement => advocate
            .specialties
            .iter()
            .any(|s| normalize(s).contains(query)),
        SpecialtyMatch::Joined => normalize(&advocate.specialties.join(",")).contains(query),
    };
    if specialty_hit {
        return true;
    }

    if advocate.years_of_experience.to_string().contains(query) {
        return true;
    }

    rules.match_phone && advocate.phone_number.to_string().contains(query)
}

/// Indices into `list` of the records matching `query`, in list order.
/// An empty (after normalization) query selects everything.
pub fn matching_indices(list: &[Advocate], query: &str, rules: &MatchRules) -> Vec<usize> {
    let query = normalize(query);
    if query.is_empty() {
        return (0..list.len()).collect();
    }

    list.iter()
        .enumerate()
        .filter(|(_, advocate)| matches(advocate, &query, rules))
        .map(|(idx, _)| idx)
        .collect()
}

/// The records of `list` matching `query` under `rules`, in list order.
pub fn filter_with(list: &[Advocate], query: &str, rules: &MatchRules) -> Vec<Advocate> {
    matching_indices(list, query, rules)
        .into_iter()
        .map(|idx| list[idx].clone())
        .collect()
}

/// [`filter_with`] under the default rules.
pub fn filter(list: &[Advocate], query: &str) -> Vec<Advocate> {
    filter_with(list, query, &MatchRules::default())
}
