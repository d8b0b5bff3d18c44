// 🔎 Query Engine - multi-predicate filtering + stable field sort
//
// A search is two steps over the Record Store:
// 1. Keep every record that satisfies ALL supplied predicates
// 2. Stable-sort the survivors by one field, ascending or descending
//
// Parameter handling is deliberately permissive: a predicate whose value is
// blank or does not parse is dropped, an unknown sort field falls back to
// rating, an unknown order falls back to descending. Search never fails.

use crate::entities::{ProviderRecord, ProviderRegistry};
use std::cmp::Ordering;
use std::str::FromStr;

// ============================================================================
// RAW PARAMETERS
// ============================================================================

/// Search parameters exactly as received (query string or command line).
///
/// Nothing is validated here; `SearchQuery::from` applies parse-or-ignore.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SearchParams {
    /// Exact speciality (case-insensitive)
    #[arg(long)]
    pub speciality: Option<String>,

    /// Exact location (case-insensitive)
    #[arg(long)]
    pub location: Option<String>,

    /// Minimum rating
    #[arg(long)]
    pub min_rating: Option<String>,

    /// Minimum years of experience
    #[arg(long)]
    pub min_experience: Option<String>,

    /// Maximum consultation fee
    #[arg(long)]
    pub max_fee: Option<String>,

    /// "true" or "false"
    #[arg(long)]
    pub available: Option<String>,

    /// Substring of the provider name (case-insensitive)
    #[arg(long)]
    pub name: Option<String>,

    /// rating | experience | consultationFee | name
    #[arg(long)]
    pub sort_by: Option<String>,

    /// asc | desc
    #[arg(long)]
    pub order: Option<String>,
}

impl SearchParams {
    /// Build from decoded query-string pairs. Unknown keys are ignored and a
    /// repeated key keeps its last value.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut params = SearchParams::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "speciality" => &mut params.speciality,
                "location" => &mut params.location,
                "minRating" => &mut params.min_rating,
                "minExperience" => &mut params.min_experience,
                "maxFee" => &mut params.max_fee,
                "available" => &mut params.available,
                "name" => &mut params.name,
                "sortBy" => &mut params.sort_by,
                "order" => &mut params.order,
                _ => continue,
            };
            *slot = Some(value.into());
        }
        params
    }
}

// ============================================================================
// PARSE-OR-IGNORE
// ============================================================================

/// Parse a raw parameter, treating absent, blank and malformed input alike.
///
/// This is the single leniency rule for every typed filter: a bad value
/// removes the predicate instead of rejecting the request.
pub fn lenient<T: FromStr>(raw: Option<&str>) -> Option<T> {
    non_blank(raw).and_then(|s| s.parse().ok())
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// `lenient` for numeric bounds: NaN and infinities count as malformed
fn finite(raw: Option<&str>) -> Option<f64> {
    lenient::<f64>(raw).filter(|n| n.is_finite())
}

// ============================================================================
// PREDICATES
// ============================================================================

/// One filter condition. Text values are stored lowercased.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Speciality(String),
    Location(String),
    MinRating(f64),
    MinExperience(f64),
    MaxFee(f64),
    Available(bool),
    NameContains(String),
}

impl Predicate {
    pub fn speciality(s: &str) -> Self {
        Predicate::Speciality(s.to_lowercase())
    }

    pub fn location(s: &str) -> Self {
        Predicate::Location(s.to_lowercase())
    }

    pub fn name_contains(s: &str) -> Self {
        Predicate::NameContains(s.to_lowercase())
    }

    pub fn matches(&self, record: &ProviderRecord) -> bool {
        match self {
            Predicate::Speciality(s) => record.speciality.to_lowercase() == *s,
            Predicate::Location(l) => record.location.to_lowercase() == *l,
            Predicate::MinRating(r) => record.rating >= *r,
            Predicate::MinExperience(e) => f64::from(record.experience) >= *e,
            Predicate::MaxFee(f) => f64::from(record.consultation_fee) <= *f,
            Predicate::Available(a) => record.available == *a,
            Predicate::NameContains(n) => record.name.to_lowercase().contains(n.as_str()),
        }
    }
}

// ============================================================================
// SORT SPECIFICATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Rating,
    Experience,
    ConsultationFee,
    Name,
}

impl SortField {
    pub const ALL: [SortField; 4] = [
        SortField::Rating,
        SortField::Experience,
        SortField::ConsultationFee,
        SortField::Name,
    ];

    /// Wire name, as accepted in `sortBy`
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Rating => "rating",
            SortField::Experience => "experience",
            SortField::ConsultationFee => "consultationFee",
            SortField::Name => "name",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == s)
    }

    /// Ascending comparison of two records on this field
    pub fn compare(&self, a: &ProviderRecord, b: &ProviderRecord) -> Ordering {
        match self {
            SortField::Rating => a.rating.total_cmp(&b.rating),
            SortField::Experience => a.experience.cmp(&b.experience),
            SortField::ConsultationFee => a.consultation_fee.cmp(&b.consultation_fee),
            SortField::Name => collate(&a.name, &b.name),
        }
    }

    /// Next field in display order (wraps around)
    pub fn next(&self) -> Self {
        match self {
            SortField::Rating => SortField::Experience,
            SortField::Experience => SortField::ConsultationFee,
            SortField::ConsultationFee => SortField::Name,
            SortField::Name => SortField::Rating,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Anything other than "asc" means descending
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("asc") {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn flip(&self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        SortSpec { field, order }
    }

    /// Stable in-place sort; equal keys keep their relative order
    pub fn apply(&self, records: &mut [ProviderRecord]) {
        let field = self.field;
        match self.order {
            SortOrder::Asc => records.sort_by(|a, b| field.compare(a, b)),
            SortOrder::Desc => records.sort_by(|a, b| field.compare(b, a)),
        }
    }
}

/// Locale-style name ordering: case-insensitive first, exact bytes as tie-break
fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

// ============================================================================
// SEARCH QUERY
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub predicates: Vec<Predicate>,
    pub sort: SortSpec,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn sorted_by(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort = SortSpec::new(field, order);
        self
    }

    /// True when the record satisfies every predicate
    pub fn matches(&self, record: &ProviderRecord) -> bool {
        self.predicates.iter().all(|p| p.matches(record))
    }
}

impl From<&SearchParams> for SearchQuery {
    fn from(params: &SearchParams) -> Self {
        let mut predicates = Vec::new();

        if let Some(s) = non_blank(params.speciality.as_deref()) {
            predicates.push(Predicate::speciality(s));
        }
        if let Some(l) = non_blank(params.location.as_deref()) {
            predicates.push(Predicate::location(l));
        }
        // Numeric bounds are compared as f64 so -1 or 650.5 still filter
        if let Some(r) = finite(params.min_rating.as_deref()) {
            predicates.push(Predicate::MinRating(r));
        }
        if let Some(e) = finite(params.min_experience.as_deref()) {
            predicates.push(Predicate::MinExperience(e));
        }
        if let Some(f) = finite(params.max_fee.as_deref()) {
            predicates.push(Predicate::MaxFee(f));
        }
        // bool::from_str accepts exactly "true" and "false"
        if let Some(a) = lenient(params.available.as_deref()) {
            predicates.push(Predicate::Available(a));
        }
        if let Some(n) = non_blank(params.name.as_deref()) {
            predicates.push(Predicate::name_contains(n));
        }

        let field = non_blank(params.sort_by.as_deref())
            .and_then(SortField::parse)
            .unwrap_or_default();
        let order = non_blank(params.order.as_deref())
            .map(SortOrder::parse)
            .unwrap_or_default();

        SearchQuery {
            predicates,
            sort: SortSpec::new(field, order),
        }
    }
}

impl From<SearchParams> for SearchQuery {
    fn from(params: SearchParams) -> Self {
        SearchQuery::from(&params)
    }
}

// ============================================================================
// SEARCH
// ============================================================================

/// Run a query against the store. Never mutates the store.
pub fn search(store: &ProviderRegistry, query: &SearchQuery) -> Vec<ProviderRecord> {
    let mut results: Vec<ProviderRecord> = store
        .records()
        .iter()
        .filter(|r| query.matches(r))
        .cloned()
        .collect();

    query.sort.apply(&mut results);

    tracing::debug!(
        predicates = query.predicates.len(),
        sort_by = query.sort.field.as_str(),
        order = query.sort.order.as_str(),
        matched = results.len(),
        "Directory search"
    );

    results
}

impl ProviderRegistry {
    pub fn search(&self, query: &SearchQuery) -> Vec<ProviderRecord> {
        search(self, query)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        name: &str,
        speciality: &str,
        rating: f64,
        fee: u32,
        location: &str,
        available: bool,
    ) -> ProviderRecord {
        ProviderRecord::new(name, speciality, rating, 10, fee, location, available)
    }

    fn names(records: &[ProviderRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    fn params(pairs: &[(&str, &str)]) -> SearchParams {
        SearchParams::from_pairs(pairs.iter().copied())
    }

    fn run(store: &ProviderRegistry, pairs: &[(&str, &str)]) -> Vec<ProviderRecord> {
        store.search(&SearchQuery::from(params(pairs)))
    }

    #[test]
    fn test_speciality_sorted_by_rating_desc() {
        let store = ProviderRegistry::from_records(vec![
            record("Dr. Alice", "Cardiology", 4.5, 600, "New York", true),
            record("Dr. Bob", "Dermatology", 4.2, 400, "Los Angeles", false),
            record("Dr. Charlie", "Cardiology", 4.8, 750, "Chicago", true),
        ]);

        let results = run(
            &store,
            &[("speciality", "Cardiology"), ("sortBy", "rating"), ("order", "desc")],
        );

        assert_eq!(names(&results), vec!["Dr. Charlie", "Dr. Alice"]);
    }

    #[test]
    fn test_available_and_max_fee() {
        let store = ProviderRegistry::from_records(vec![
            record("A", "Cardiology", 4.5, 600, "New York", true),
            record("B", "Cardiology", 4.8, 750, "Chicago", true),
            record("C", "Pulmonology", 4.2, 620, "Portland", true),
        ]);

        let results = run(&store, &[("available", "true"), ("maxFee", "650")]);
        let mut fees: Vec<u32> = results.iter().map(|r| r.consultation_fee).collect();
        fees.sort();

        assert_eq!(fees, vec![600, 620]);
    }

    #[test]
    fn test_no_predicates_returns_all_by_rating_desc() {
        let store = ProviderRegistry::new();
        let results = store.search(&SearchQuery::new());

        assert_eq!(results.len(), store.len());
        assert!(results.windows(2).all(|w| w[0].rating >= w[1].rating));
        assert_eq!(results[0].name, "Dr. Julia"); // 4.9
    }

    #[test]
    fn test_case_insensitive_text_predicates() {
        let store = ProviderRegistry::new();

        let results = run(&store, &[("speciality", "cARDIOLOGY"), ("location", "new york")]);
        assert_eq!(names(&results), vec!["Dr. Alice", "Dr. Edward"]);

        let results = run(&store, &[("name", "LAU")]);
        assert_eq!(names(&results), vec!["Dr. Laura"]);
    }

    #[test]
    fn test_exact_match_is_not_substring() {
        let store = ProviderRegistry::new();
        assert!(run(&store, &[("speciality", "Cardio")]).is_empty());
        assert!(run(&store, &[("location", "York")]).is_empty());
    }

    #[test]
    fn test_malformed_numbers_are_ignored() {
        let store = ProviderRegistry::new();
        let all = store.search(&SearchQuery::new());

        for pairs in [
            vec![("minRating", "abc")],
            vec![("minRating", "NaN")],
            vec![("minRating", "inf")],
            vec![("minExperience", "3 years")],
            vec![("maxFee", "inf")],
            vec![("minExperience", "ten")],
            vec![("maxFee", "cheap")],
            vec![("maxFee", "")],
            vec![("available", "yes")],
            vec![("available", "TRUE")],
            vec![("speciality", "   ")],
        ] {
            assert_eq!(run(&store, &pairs), all, "params {:?} should be ignored", pairs);
        }
    }

    #[test]
    fn test_numeric_bounds_are_inclusive() {
        let store = ProviderRegistry::new();

        let results = run(&store, &[("minRating", "4.8")]);
        assert_eq!(names(&results), vec!["Dr. Julia", "Dr. Charlie"]);

        let results = run(&store, &[("maxFee", "300")]);
        assert_eq!(names(&results), vec!["Dr. Fiona"]);

        let results = run(&store, &[("minExperience", "14"), ("sortBy", "experience")]);
        assert_eq!(names(&results), vec!["Dr. Charlie", "Dr. Julia"]);
    }

    #[test]
    fn test_negative_and_fractional_bounds_still_filter() {
        let store = ProviderRegistry::new();

        assert!(run(&store, &[("maxFee", "-1")]).is_empty());

        let results = run(&store, &[("maxFee", "650.5")]);
        assert!(!results.is_empty());
        assert!(results.iter().all(|r| r.consultation_fee <= 650));
        assert!(results.len() < store.len());

        let results = run(&store, &[("minExperience", "14.5")]);
        assert_eq!(names(&results), vec!["Dr. Charlie"]);

        assert_eq!(run(&store, &[("minExperience", "-3")]).len(), store.len());
        assert_eq!(run(&store, &[("minRating", "-0.5")]).len(), store.len());
        assert_eq!(run(&store, &[("minRating", "4.85")]).len(), 1);
    }

    #[test]
    fn test_available_false() {
        let store = ProviderRegistry::new();
        let results = run(&store, &[("available", "false")]);

        assert_eq!(results.len(), 5);
        assert!(results.iter().all(|r| !r.available));
    }

    #[test]
    fn test_unknown_sort_field_falls_back_to_rating() {
        let store = ProviderRegistry::new();

        let fallback = run(&store, &[("sortBy", "id")]);
        let default = run(&store, &[]);
        assert_eq!(fallback, default);

        let query = SearchQuery::from(params(&[("sortBy", "location"), ("order", "sideways")]));
        assert_eq!(query.sort, SortSpec::new(SortField::Rating, SortOrder::Desc));
    }

    #[test]
    fn test_sort_by_name_and_fee() {
        let store = ProviderRegistry::from_records(vec![
            record("dr. zed", "X", 4.0, 300, "A", true),
            record("Dr. Amy", "X", 4.0, 100, "A", true),
            record("Dr. bea", "X", 4.0, 200, "A", true),
        ]);

        let results = run(&store, &[("sortBy", "name"), ("order", "asc")]);
        assert_eq!(names(&results), vec!["Dr. Amy", "Dr. bea", "dr. zed"]);

        let results = run(&store, &[("sortBy", "consultationFee"), ("order", "ASC")]);
        assert_eq!(names(&results), vec!["Dr. Amy", "Dr. bea", "dr. zed"]);

        let results = run(&store, &[("sortBy", "consultationFee")]);
        assert_eq!(names(&results), vec!["dr. zed", "Dr. bea", "Dr. Amy"]);
    }

    #[test]
    fn test_sort_is_stable_both_directions() {
        let store = ProviderRegistry::from_records(vec![
            record("First", "X", 4.5, 500, "A", true),
            record("Top", "X", 4.9, 500, "A", true),
            record("Second", "X", 4.5, 500, "A", true),
            record("Third", "X", 4.5, 500, "A", true),
        ]);

        let desc = run(&store, &[("sortBy", "rating"), ("order", "desc")]);
        assert_eq!(names(&desc), vec!["Top", "First", "Second", "Third"]);

        let asc = run(&store, &[("sortBy", "rating"), ("order", "asc")]);
        assert_eq!(names(&asc), vec!["First", "Second", "Third", "Top"]);

        // All fees equal: store order preserved
        let by_fee = run(&store, &[("sortBy", "consultationFee")]);
        assert_eq!(names(&by_fee), vec!["First", "Top", "Second", "Third"]);
    }

    #[test]
    fn test_search_is_idempotent_and_pure() {
        let store = ProviderRegistry::new();
        let before = store.records().to_vec();
        let query = SearchQuery::from(params(&[
            ("available", "true"),
            ("sortBy", "name"),
            ("order", "asc"),
        ]));

        let first = store.search(&query);
        let second = store.search(&query);

        assert_eq!(first, second);
        assert_eq!(store.records(), before.as_slice());
    }

    #[test]
    fn test_soundness_and_completeness_for_all_combinations() {
        let store = ProviderRegistry::new();
        let candidates = [
            ("speciality", "Dermatology"),
            ("location", "New York"),
            ("minRating", "4.3"),
            ("minExperience", "9"),
            ("maxFee", "700"),
            ("available", "true"),
            ("name", "a"),
        ];

        for mask in 0u32..(1 << candidates.len()) {
            let pairs: Vec<(&str, &str)> = candidates
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, pair)| *pair)
                .collect();
            let query = SearchQuery::from(params(&pairs));
            assert_eq!(query.predicates.len(), pairs.len());

            let results = store.search(&query);

            // Soundness: every result is a store record satisfying every predicate
            for r in &results {
                assert!(store.find_by_id(&r.id).is_some());
                assert!(query.predicates.iter().all(|p| p.matches(r)), "mask {}", mask);
            }

            // Completeness: every matching store record is returned
            let expected = store.records().iter().filter(|r| query.matches(r)).count();
            assert_eq!(results.len(), expected, "mask {}", mask);
        }
    }

    #[test]
    fn test_from_pairs_ignores_unknown_and_keeps_last() {
        let p = SearchParams::from_pairs(vec![
            ("speciality", "Neurology"),
            ("page", "2"),
            ("speciality", "Cardiology"),
        ]);

        assert_eq!(p.speciality.as_deref(), Some("Cardiology"));
        assert!(p.location.is_none());
    }

    #[test]
    fn test_lenient_combinator() {
        assert_eq!(lenient::<u32>(Some(" 42 ")), Some(42));
        assert_eq!(lenient::<u32>(Some("4.2")), None);
        assert_eq!(lenient::<u32>(None), None);
        assert_eq!(lenient::<bool>(Some("false")), Some(false));
        assert_eq!(lenient::<bool>(Some("1")), None);
    }

    #[test]
    fn test_sort_field_round_trip_names() {
        for field in SortField::ALL {
            assert_eq!(SortField::parse(field.as_str()), Some(field));
        }
        assert_eq!(SortField::parse("Rating"), None);
        assert_eq!(SortField::Name.next(), SortField::Rating);
    }
}
