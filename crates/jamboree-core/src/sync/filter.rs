//! Filter views over a snapshot.
//!
//! Roster pages (leaders, scouts) filter in memory on every render; the
//! collections are small enough that nothing is cached. The item page sends
//! its filter to the backend as request parameters instead.

use crate::models::{Group, ItemStatus};
use crate::utils::{contains_ignore_case, PLACEHOLDER};

// ============================================================================
// Group filter
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupFilter {
    #[default]
    All,
    Only(i64),
}

impl GroupFilter {
    pub fn accepts(&self, group_id: i64) -> bool {
        match self {
            GroupFilter::All => true,
            GroupFilter::Only(id) => *id == group_id,
        }
    }

    /// Step through `All` then each group in lookup order, wrapping.
    pub fn next(&self, groups: &[Group]) -> Self {
        match self {
            GroupFilter::All => groups.first().map(|g| GroupFilter::Only(g.id)).unwrap_or(GroupFilter::All),
            GroupFilter::Only(id) => {
                let pos = groups.iter().position(|g| g.id == *id);
                match pos.and_then(|p| groups.get(p + 1)) {
                    Some(next) => GroupFilter::Only(next.id),
                    None => GroupFilter::All,
                }
            }
        }
    }

    pub fn label<'a>(&self, groups: &'a [Group]) -> &'a str {
        match self {
            GroupFilter::All => "All groups",
            GroupFilter::Only(id) => group_name(groups, *id),
        }
    }
}

// ============================================================================
// Roster filter
// ============================================================================

/// A roster row that can be searched by name and narrowed by group.
pub trait RosterEntry {
    /// Every name form the search should look at
    fn names(&self) -> Vec<&str>;

    fn group_id(&self) -> i64;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterFilter {
    pub query: String,
    pub group: GroupFilter,
}

impl RosterFilter {
    pub fn matches<E: RosterEntry>(&self, entry: &E) -> bool {
        let query = self.query.to_lowercase();
        let name_hit = entry.names().iter().any(|n| contains_ignore_case(n, &query));
        name_hit && self.group.accepts(entry.group_id())
    }
}

/// Rows passing the filter, in snapshot order.
pub fn filter_roster<'a, E: RosterEntry>(rows: &'a [E], filter: &RosterFilter) -> Vec<&'a E> {
    rows.iter().filter(|row| filter.matches(*row)).collect()
}

// ============================================================================
// Item query
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ItemStatus),
}

impl StatusFilter {
    /// All, then each known status, wrapping.
    pub fn next(&self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Only(ItemStatus::Stored),
            StatusFilter::Only(ItemStatus::NeedsMaintenance) | StatusFilter::Only(ItemStatus::Other(_)) => {
                StatusFilter::All
            }
            StatusFilter::Only(status) => StatusFilter::Only(status.next()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            StatusFilter::All => "All statuses",
            StatusFilter::Only(status) => status.label(),
        }
    }
}

/// Server-side item filter, sent as `search` and `status` parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemQuery {
    pub search: String,
    pub status: StatusFilter,
}

impl ItemQuery {
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if !self.search.is_empty() {
            params.push(("search", self.search.clone()));
        }
        if let StatusFilter::Only(status) = &self.status {
            params.push(("status", status.as_str().to_string()));
        }
        params
    }
}

// ============================================================================
// Lookups
// ============================================================================

/// Group name for display, or the placeholder when the id is unknown.
pub fn group_name(groups: &[Group], id: i64) -> &str {
    groups
        .iter()
        .find(|g| g.id == id)
        .map(|g| g.name.as_str())
        .unwrap_or(PLACEHOLDER)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        name: &'static str,
        kana: &'static str,
        group: i64,
    }

    impl RosterEntry for Row {
        fn names(&self) -> Vec<&str> {
            vec![self.name, self.kana]
        }

        fn group_id(&self) -> i64 {
            self.group
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "Sato Ken", kana: "さとう けん", group: 1 },
            Row { name: "Suzuki Aya", kana: "すずき あや", group: 2 },
            Row { name: "KENJI Mori", kana: "もり けんじ", group: 2 },
        ]
    }

    fn groups() -> Vec<Group> {
        vec![
            Group { id: 1, name: "Troop 1".into(), description: None },
            Group { id: 2, name: "Troop 2".into(), description: None },
        ]
    }

    fn names<'a>(rows: &[&'a Row]) -> Vec<&'a str> {
        rows.iter().map(|r| r.name).collect()
    }

    #[test]
    fn test_empty_filter_shows_everything() {
        let rows = rows();
        assert_eq!(filter_roster(&rows, &RosterFilter::default()).len(), 3);
    }

    #[test]
    fn test_query_is_case_insensitive_substring() {
        let rows = rows();
        let filter = RosterFilter { query: "ken".into(), group: GroupFilter::All };
        assert_eq!(names(&filter_roster(&rows, &filter)), vec!["Sato Ken", "KENJI Mori"]);
    }

    #[test]
    fn test_query_matches_phonetic_reading() {
        let rows = rows();
        let filter = RosterFilter { query: "すずき".into(), group: GroupFilter::All };
        assert_eq!(names(&filter_roster(&rows, &filter)), vec!["Suzuki Aya"]);
    }

    #[test]
    fn test_query_and_group_combine() {
        let rows = rows();
        let filter = RosterFilter { query: "ken".into(), group: GroupFilter::Only(2) };
        assert_eq!(names(&filter_roster(&rows, &filter)), vec!["KENJI Mori"]);
    }

    #[test]
    fn test_filter_matches_brute_force_predicate() {
        let rows = rows();
        let queries = ["", "k", "KEN", "aya", "mori", "zzz", "けん"];
        let group_filters = [GroupFilter::All, GroupFilter::Only(1), GroupFilter::Only(2), GroupFilter::Only(9)];

        for query in queries {
            for group in group_filters {
                let filter = RosterFilter { query: query.to_string(), group };
                let got = names(&filter_roster(&rows, &filter));
                let expected: Vec<&str> = rows
                    .iter()
                    .filter(|r| {
                        let q = query.to_lowercase();
                        let hit = r.name.to_lowercase().contains(&q) || r.kana.to_lowercase().contains(&q);
                        hit && (group == GroupFilter::All || group == GroupFilter::Only(r.group))
                    })
                    .map(|r| r.name)
                    .collect();
                assert_eq!(got, expected, "query={query:?} group={group:?}");
            }
        }
    }

    #[test]
    fn test_group_filter_cycles() {
        let groups = groups();
        let f = GroupFilter::All.next(&groups);
        assert_eq!(f, GroupFilter::Only(1));
        let f = f.next(&groups);
        assert_eq!(f, GroupFilter::Only(2));
        assert_eq!(f.next(&groups), GroupFilter::All);
        assert_eq!(GroupFilter::All.next(&[]), GroupFilter::All);
    }

    #[test]
    fn test_group_name_placeholder() {
        let groups = groups();
        assert_eq!(group_name(&groups, 2), "Troop 2");
        assert_eq!(group_name(&groups, 42), "-");
        assert_eq!(GroupFilter::Only(42).label(&groups), "-");
    }

    #[test]
    fn test_item_query_params() {
        assert!(ItemQuery::default().params().is_empty());

        let query = ItemQuery {
            search: "tent".into(),
            status: StatusFilter::Only(ItemStatus::NeedsMaintenance),
        };
        assert_eq!(
            query.params(),
            vec![("search", "tent".to_string()), ("status", "needs-maintenance".to_string())]
        );
    }

    #[test]
    fn test_status_filter_cycle() {
        let mut filter = StatusFilter::All;
        let mut seen = Vec::new();
        for _ in 0..4 {
            filter = filter.next();
            seen.push(filter.label().to_string());
        }
        assert_eq!(seen, vec!["Stored", "Borrowed", "Needs maintenance", "All statuses"]);
    }
}
