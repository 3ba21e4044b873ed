//! Dashboard counts computed from snapshots.

use std::collections::BTreeMap;

use crate::models::{Group, Item, ItemStatus, Leader, Scout};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemStats {
    pub total: usize,
    pub stored: usize,
    pub borrowed: usize,
    pub needs_maintenance: usize,
}

impl ItemStats {
    pub fn from_items(items: &[Item]) -> Self {
        let mut stats = ItemStats { total: items.len(), ..Default::default() };
        for item in items {
            match item.status {
                ItemStatus::Stored => stats.stored += 1,
                ItemStatus::Borrowed => stats.borrowed += 1,
                ItemStatus::NeedsMaintenance => stats.needs_maintenance += 1,
                ItemStatus::Other(_) => {}
            }
        }
        stats
    }
}

/// Total and per-bucket counts, buckets ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Breakdown {
    pub total: usize,
    pub buckets: BTreeMap<String, usize>,
}

/// Scouts counted per grade. Scouts with no grade land under `-`.
pub fn scouts_by_grade(scouts: &[Scout]) -> Breakdown {
    let mut buckets = BTreeMap::new();
    for scout in scouts {
        let grade = match scout.grade.trim() {
            "" => crate::utils::PLACEHOLDER,
            grade => grade,
        };
        *buckets.entry(grade.to_string()).or_insert(0) += 1;
    }
    Breakdown { total: scouts.len(), buckets }
}

/// Leaders counted per group name. Leaders whose group is not in the
/// lookup are counted in the total only.
pub fn leaders_by_group(leaders: &[Leader], groups: &[Group]) -> Breakdown {
    let mut buckets = BTreeMap::new();
    for leader in leaders {
        if let Some(group) = groups.iter().find(|g| g.id == leader.group_id) {
            *buckets.entry(group.name.clone()).or_insert(0) += 1;
        }
    }
    Breakdown { total: leaders.len(), buckets }
}
