// Sort, filter, paginate, and per-position aggregation over player records.
//
// Every operation is a pure function of its inputs and returns a new
// sequence. The generic `R: Borrow<PlayerRecord>` lets callers chain
// operations over either owned records or borrowed slices of them.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::num::NonZeroUsize;

use serde::Serialize;

use crate::error::DatasetError;
use crate::record::{Field, FilterValue, PlayerRecord, SortDirection};

/// Filter sentinel meaning "no filtering".
pub const ALL: &str = "All";

/// Default number of rows per table page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// A position is "multi Pro Bowl" at this many selections or more.
pub const MULTI_PRO_BOWL_THRESHOLD: u32 = 2;

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Stable sort by one field.
///
/// Absent values compare below every present value and the direction only
/// reverses the comparison, so absent scores lead an ascending sort and
/// trail a descending one. Ties keep their input order either way.
pub fn sort_by<R>(records: &[R], field: Field, direction: SortDirection) -> Vec<R>
where
    R: Borrow<PlayerRecord> + Clone,
{
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        let ord = a.borrow().value(field).compare(&b.borrow().value(field));
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
    sorted
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Equality filter on one field, or no filter at all.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldFilter {
    #[default]
    All,
    Equals { field: Field, value: FilterValue },
}

impl FieldFilter {
    /// Parse a filter from user input. The sentinel `"All"` disables
    /// filtering; anything else must be a valid value for `field`.
    pub fn parse(field: Field, raw: &str) -> Result<Self, DatasetError> {
        if raw.trim() == ALL {
            return Ok(FieldFilter::All);
        }
        Ok(FieldFilter::Equals {
            field,
            value: field.parse_value(raw)?,
        })
    }

    /// Shorthand for the position filter used by the dashboard.
    pub fn position(name: &str) -> Self {
        if name == ALL {
            FieldFilter::All
        } else {
            FieldFilter::Equals {
                field: Field::Position,
                value: FilterValue::Text(name.to_string()),
            }
        }
    }

    pub fn matches(&self, record: &PlayerRecord) -> bool {
        match self {
            FieldFilter::All => true,
            FieldFilter::Equals { field, value } => {
                record.value(*field) == value.as_field_value()
            }
        }
    }

    /// Short label for titles, e.g. `All` or `position=WR`.
    pub fn label(&self) -> String {
        match self {
            FieldFilter::All => ALL.to_string(),
            FieldFilter::Equals { field, value } => format!("{}={}", field.key(), value),
        }
    }
}

/// Keep the records matching `filter`. `FieldFilter::All` returns the
/// input unchanged.
pub fn filter_by_field<R>(records: &[R], filter: &FieldFilter) -> Vec<R>
where
    R: Borrow<PlayerRecord> + Clone,
{
    match filter {
        FieldFilter::All => records.to_vec(),
        _ => records
            .iter()
            .filter(|r| filter.matches((*r).borrow()))
            .cloned()
            .collect(),
    }
}

/// Drop records whose position is in `excluded`.
pub fn exclude_positions<R>(records: &[R], excluded: &[String]) -> Vec<R>
where
    R: Borrow<PlayerRecord> + Clone,
{
    if excluded.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| !excluded.iter().any(|p| p == &(*r).borrow().position))
        .cloned()
        .collect()
}

/// `"All"` followed by each distinct position in first-occurrence order.
pub fn position_options<R: Borrow<PlayerRecord>>(records: &[R]) -> Vec<String> {
    let mut options = vec![ALL.to_string()];
    for r in records {
        let pos = &r.borrow().position;
        if !options[1..].iter().any(|o| o == pos) {
            options.push(pos.clone());
        }
    }
    options
}

/// Look up a record by its identity key.
pub fn find_player<'a>(records: &'a [PlayerRecord], name: &str) -> Option<&'a PlayerRecord> {
    records.iter().find(|r| r.player == name)
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Rows per page; zero is rejected on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSize(NonZeroUsize);

impl PageSize {
    pub fn new(size: usize) -> Result<Self, DatasetError> {
        NonZeroUsize::new(size)
            .map(PageSize)
            .ok_or(DatasetError::InvalidPageSize)
    }

    pub fn get(&self) -> usize {
        self.0.get()
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize(NonZeroUsize::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroUsize::MIN))
    }
}

/// The 1-based `page` of `items`. Pages outside `1..=total_pages` are
/// empty rather than an error.
pub fn paginate<T: Clone>(items: &[T], size: PageSize, page: usize) -> Vec<T> {
    if page == 0 {
        return Vec::new();
    }
    let size = size.get();
    let start = (page - 1).saturating_mul(size);
    if start >= items.len() {
        return Vec::new();
    }
    let end = start.saturating_add(size).min(items.len());
    items[start..end].to_vec()
}

/// `ceil(count / size)`, with an empty sequence counted as one page so
/// the footer never reads "page 1 of 0".
pub fn total_pages(count: usize, size: PageSize) -> usize {
    count.div_ceil(size.get()).max(1)
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Summary statistics for the records sharing one position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionAggregate {
    pub position: String,
    pub player_count: usize,
    /// Mean over records that have a score; `None` if none do.
    pub avg_ras: Option<f64>,
    pub total_pro_bowls: u32,
    pub avg_pro_bowls: f64,
    /// Percentage (0-100) of records with two or more Pro Bowls.
    pub multi_pro_bowl_rate: f64,
}

#[derive(Default)]
struct GroupAccumulator {
    count: usize,
    ras_sum: f64,
    ras_count: usize,
    pro_bowls: u32,
    multi: usize,
}

/// Group by position in first-occurrence order and summarize each group.
pub fn aggregate_by_position<R: Borrow<PlayerRecord>>(records: &[R]) -> Vec<PositionAggregate> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, GroupAccumulator> = HashMap::new();

    for r in records {
        let r = r.borrow();
        let acc = groups.entry(r.position.as_str()).or_insert_with(|| {
            order.push(r.position.as_str());
            GroupAccumulator::default()
        });
        acc.count += 1;
        if let Some(score) = r.ras_score {
            acc.ras_sum += score;
            acc.ras_count += 1;
        }
        acc.pro_bowls = acc.pro_bowls.saturating_add(r.pro_bowl_count);
        if r.pro_bowl_count >= MULTI_PRO_BOWL_THRESHOLD {
            acc.multi += 1;
        }
    }

    order
        .into_iter()
        .filter_map(|pos| {
            let acc = groups.get(pos)?;
            let count = acc.count as f64;
            Some(PositionAggregate {
                position: pos.to_string(),
                player_count: acc.count,
                avg_ras: (acc.ras_count > 0).then(|| acc.ras_sum / acc.ras_count as f64),
                total_pro_bowls: acc.pro_bowls,
                avg_pro_bowls: acc.pro_bowls as f64 / count,
                multi_pro_bowl_rate: acc.multi as f64 / count * 100.0,
            })
        })
        .collect()
}

/// Drop positions with fewer than `min_players` records.
pub fn retain_min_players(aggregates: &[PositionAggregate], min_players: usize) -> Vec<PositionAggregate> {
    aggregates
        .iter()
        .filter(|a| a.player_count >= min_players)
        .cloned()
        .collect()
}

/// Orderings used by the position summary charts. All are descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AggregateOrder {
    /// Keep first-occurrence order.
    #[default]
    Natural,
    PlayerCount,
    AvgRas,
    MultiProBowlRate,
}

impl AggregateOrder {
    pub fn next(&self) -> Self {
        match self {
            AggregateOrder::Natural => AggregateOrder::PlayerCount,
            AggregateOrder::PlayerCount => AggregateOrder::AvgRas,
            AggregateOrder::AvgRas => AggregateOrder::MultiProBowlRate,
            AggregateOrder::MultiProBowlRate => AggregateOrder::Natural,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AggregateOrder::Natural => "as loaded",
            AggregateOrder::PlayerCount => "players",
            AggregateOrder::AvgRas => "avg RAS",
            AggregateOrder::MultiProBowlRate => "multi-PB rate",
        }
    }
}

/// Stable descending sort of aggregates. Positions without an average RAS
/// go last when ordering by RAS.
pub fn order_aggregates(aggregates: &[PositionAggregate], order: AggregateOrder) -> Vec<PositionAggregate> {
    let mut sorted = aggregates.to_vec();
    match order {
        AggregateOrder::Natural => {}
        AggregateOrder::PlayerCount => sorted.sort_by(|a, b| b.player_count.cmp(&a.player_count)),
        AggregateOrder::AvgRas => sorted.sort_by(|a, b| match (a.avg_ras, b.avg_ras) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }),
        AggregateOrder::MultiProBowlRate => {
            sorted.sort_by(|a, b| b.multi_pro_bowl_rate.total_cmp(&a.multi_pro_bowl_rate))
        }
    }
    sorted
}

/// How strongly a position's average RAS suggests athleticism matters.
pub fn impact_label(avg_ras: Option<f64>) -> &'static str {
    match avg_ras {
        Some(avg) if avg > 7.0 => "significantly",
        Some(avg) if avg > 5.0 => "moderately",
        Some(_) => "slightly",
        None => "no data",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::DraftYear;

    fn rec(name: &str, pos: &str, ras: Option<f64>, pb: u32) -> PlayerRecord {
        PlayerRecord::new(name, pos, ras, pb)
    }

    fn sample() -> Vec<PlayerRecord> {
        vec![
            rec("A", "WR", Some(9.5), 3),
            rec("B", "WR", None, 1),
            rec("C", "RB", Some(6.0), 0),
        ]
    }

    fn names<R: Borrow<PlayerRecord>>(records: &[R]) -> Vec<&str> {
        records.iter().map(|r| r.borrow().player.as_str()).collect()
    }

    fn size(n: usize) -> PageSize {
        PageSize::new(n).unwrap()
    }

    // --- sort ---

    #[test]
    fn sort_by_ras_descending_puts_absent_last() {
        let sorted = sort_by(&sample(), Field::RasScore, SortDirection::Descending);
        assert_eq!(names(&sorted), vec!["A", "C", "B"]);
    }

    #[test]
    fn sort_by_ras_ascending_puts_absent_first() {
        let sorted = sort_by(&sample(), Field::RasScore, SortDirection::Ascending);
        assert_eq!(names(&sorted), vec!["B", "C", "A"]);
    }

    #[test]
    fn sort_is_stable_for_ties_in_both_directions() {
        let records = vec![
            rec("First", "WR", Some(8.0), 1),
            rec("Second", "WR", Some(8.0), 1),
            rec("Third", "RB", Some(5.0), 1),
        ];
        let asc = sort_by(&records, Field::ProBowlCount, SortDirection::Ascending);
        assert_eq!(names(&asc), vec!["First", "Second", "Third"]);
        let desc = sort_by(&records, Field::ProBowlCount, SortDirection::Descending);
        assert_eq!(names(&desc), vec!["First", "Second", "Third"]);
    }

    #[test]
    fn sort_strings_lexicographically() {
        let records = vec![
            rec("Zed", "WR", None, 0).with_college("Utah"),
            rec("Amy", "WR", None, 0).with_college("Alabama"),
            rec("Bob", "WR", None, 0).with_college("Ohio State"),
        ];
        let sorted = sort_by(&records, Field::College, SortDirection::Ascending);
        assert_eq!(names(&sorted), vec!["Amy", "Bob", "Zed"]);
    }

    #[test]
    fn sort_draft_years_numerically() {
        let records = vec![
            rec("A", "WR", None, 0).with_draft_year(DraftYear::Year(2019)),
            rec("B", "WR", None, 0).with_draft_year(DraftYear::Year(2009)),
            rec("C", "WR", None, 0).with_draft_year(DraftYear::Year(2021)),
        ];
        let sorted = sort_by(&records, Field::DraftYear, SortDirection::Ascending);
        assert_eq!(names(&sorted), vec!["B", "A", "C"]);
    }

    #[test]
    fn sort_is_a_permutation_for_every_field_and_direction() {
        let records = sample();
        for field in Field::ALL {
            for dir in [SortDirection::Ascending, SortDirection::Descending] {
                let sorted_records = sort_by(&records, field, dir);
                let mut sorted = names(&sorted_records);
                sorted.sort();
                assert_eq!(sorted, vec!["A", "B", "C"], "{field} {dir:?}");
            }
        }
    }

    #[test]
    fn ascending_reversed_equals_descending_without_ties() {
        let records = vec![
            rec("A", "WR", Some(7.1), 4),
            rec("B", "TE", None, 2),
            rec("C", "RB", Some(3.3), 0),
            rec("D", "CB", Some(9.9), 1),
        ];
        for field in [Field::Player, Field::RasScore, Field::ProBowlCount, Field::Position] {
            let mut asc = sort_by(&records, field, SortDirection::Ascending);
            asc.reverse();
            let desc = sort_by(&records, field, SortDirection::Descending);
            assert_eq!(names(&asc), names(&desc), "{field}");
        }
    }

    #[test]
    fn sort_does_not_mutate_input() {
        let records = sample();
        let _ = sort_by(&records, Field::Player, SortDirection::Descending);
        assert_eq!(names(&records), vec!["A", "B", "C"]);
    }

    #[test]
    fn sort_works_over_borrowed_records() {
        let records = sample();
        let borrowed: Vec<&PlayerRecord> = records.iter().collect();
        let sorted = sort_by(&borrowed, Field::Player, SortDirection::Descending);
        assert_eq!(names(&sorted), vec!["C", "B", "A"]);
    }

    // --- filter ---

    #[test]
    fn filter_all_returns_input_unchanged() {
        let records = sample();
        let filter = FieldFilter::parse(Field::Position, "All").unwrap();
        assert_eq!(filter_by_field(&records, &filter), records);
    }

    #[test]
    fn filter_by_position() {
        let filtered = filter_by_field(&sample(), &FieldFilter::position("WR"));
        assert_eq!(names(&filtered), vec!["A", "B"]);
    }

    #[test]
    fn filter_by_pro_bowl_count() {
        let filter = FieldFilter::parse(Field::ProBowlCount, "0").unwrap();
        assert_eq!(names(&filter_by_field(&sample(), &filter)), vec!["C"]);
    }

    #[test]
    fn filter_can_select_absent_scores() {
        let filter = FieldFilter::parse(Field::RasScore, "N/A").unwrap();
        assert_eq!(names(&filter_by_field(&sample(), &filter)), vec!["B"]);
    }

    #[test]
    fn filter_with_invalid_value_is_rejected() {
        let err = FieldFilter::parse(Field::ProBowlCount, "many").unwrap_err();
        assert!(matches!(err, DatasetError::InvalidFilterValue { .. }));
    }

    #[test]
    fn exclude_positions_drops_listed() {
        let kept = exclude_positions(&sample(), &["RB".to_string()]);
        assert_eq!(names(&kept), vec!["A", "B"]);
    }

    #[test]
    fn position_options_start_with_all() {
        assert_eq!(position_options(&sample()), vec!["All", "WR", "RB"]);
        let empty: Vec<PlayerRecord> = Vec::new();
        assert_eq!(position_options(&empty), vec!["All"]);
    }

    #[test]
    fn find_player_by_name() {
        let records = sample();
        assert_eq!(find_player(&records, "C").map(|r| r.position.as_str()), Some("RB"));
        assert!(find_player(&records, "Nobody").is_none());
    }

    // --- paginate ---

    #[test]
    fn page_size_zero_is_rejected() {
        assert_eq!(PageSize::new(0), Err(DatasetError::InvalidPageSize));
        assert_eq!(PageSize::default().get(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn paginate_slices_and_clamps() {
        let items: Vec<u32> = (1..=7).collect();
        assert_eq!(paginate(&items, size(3), 1), vec![1, 2, 3]);
        assert_eq!(paginate(&items, size(3), 3), vec![7]);
        assert!(paginate(&items, size(3), 4).is_empty());
        assert!(paginate(&items, size(3), 0).is_empty());
        assert!(paginate(&items, size(3), usize::MAX).is_empty());
    }

    #[test]
    fn total_pages_rounds_up_and_is_one_when_empty() {
        assert_eq!(total_pages(7, size(3)), 3);
        assert_eq!(total_pages(6, size(3)), 2);
        assert_eq!(total_pages(0, size(3)), 1);
    }

    #[test]
    fn pages_concatenate_to_the_full_sequence() {
        let records: Vec<PlayerRecord> = (0..23)
            .map(|i| rec(&format!("P{i:02}"), "WR", Some(i as f64 / 3.0), i % 4))
            .collect();
        let sorted = sort_by(&records, Field::RasScore, SortDirection::Descending);
        let page_size = size(5);
        let mut rebuilt = Vec::new();
        for page in 1..=total_pages(sorted.len(), page_size) {
            rebuilt.extend(paginate(&sorted, page_size, page));
        }
        assert_eq!(rebuilt, sorted);
    }

    // --- aggregate ---

    #[test]
    fn aggregate_end_to_end_example() {
        let aggs = aggregate_by_position(&sample());
        assert_eq!(aggs.len(), 2);

        let wr = &aggs[0];
        assert_eq!(wr.position, "WR");
        assert_eq!(wr.player_count, 2);
        assert_eq!(wr.avg_ras, Some(9.5));
        assert_eq!(wr.total_pro_bowls, 4);
        assert!((wr.multi_pro_bowl_rate - 50.0).abs() < 1e-9);
        assert!((wr.avg_pro_bowls - 2.0).abs() < 1e-9);

        let rb = &aggs[1];
        assert_eq!(rb.position, "RB");
        assert_eq!(rb.player_count, 1);
        assert_eq!(rb.avg_ras, Some(6.0));
        assert_eq!(rb.total_pro_bowls, 0);
        assert!((rb.multi_pro_bowl_rate - 0.0).abs() < 1e-9);
    }

    #[test]
    fn aggregate_reports_absent_average_when_no_scores() {
        let records = vec![rec("X", "K", None, 1), rec("Y", "K", None, 2)];
        let aggs = aggregate_by_position(&records);
        assert_eq!(aggs[0].avg_ras, None);
        assert_eq!(aggs[0].player_count, 2);
    }

    #[test]
    fn aggregate_counts_sum_to_input_length() {
        let records = vec![
            rec("A", "WR", Some(1.0), 0),
            rec("B", "QB", Some(2.0), 2),
            rec("C", "WR", None, 5),
            rec("D", "TE", Some(4.0), 1),
            rec("E", "QB", None, 0),
        ];
        let total: usize = aggregate_by_position(&records)
            .iter()
            .map(|a| a.player_count)
            .sum();
        assert_eq!(total, records.len());
    }

    #[test]
    fn aggregate_of_empty_input_is_empty() {
        let empty: Vec<PlayerRecord> = Vec::new();
        assert!(aggregate_by_position(&empty).is_empty());
    }

    #[test]
    fn retain_min_players_drops_small_groups() {
        let aggs = aggregate_by_position(&sample());
        let kept = retain_min_players(&aggs, 2);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].position, "WR");
    }

    #[test]
    fn order_by_avg_ras_puts_missing_last() {
        let records = vec![
            rec("A", "K", None, 0),
            rec("B", "RB", Some(6.0), 0),
            rec("C", "WR", Some(9.0), 0),
        ];
        let ordered = order_aggregates(&aggregate_by_position(&records), AggregateOrder::AvgRas);
        let positions: Vec<&str> = ordered.iter().map(|a| a.position.as_str()).collect();
        assert_eq!(positions, vec!["WR", "RB", "K"]);
    }

    #[test]
    fn order_by_player_count() {
        let ordered = order_aggregates(&aggregate_by_position(&sample()), AggregateOrder::PlayerCount);
        assert_eq!(ordered[0].position, "WR");
    }

    #[test]
    fn impact_label_thresholds() {
        assert_eq!(impact_label(Some(8.2)), "significantly");
        assert_eq!(impact_label(Some(7.0)), "moderately");
        assert_eq!(impact_label(Some(5.0)), "slightly");
        assert_eq!(impact_label(None), "no data");
    }
}
