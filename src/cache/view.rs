// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Date-ordered projections of the activity collection.
//!
//! Order is ascending by date, then by title, then by id, so activities on
//! the same day always come out in the same order.

use crate::models::Activity;
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Ordering used by every projection.
pub fn by_date(a: &Activity, b: &Activity) -> Ordering {
    a.date
        .cmp(&b.date)
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.id.cmp(&b.id))
}

/// Borrowed, date-ordered view of a collection.
///
/// Iterating does not consume the view; call [`ByDate::iter`] as many times
/// as needed.
#[derive(Debug, Clone)]
pub struct ByDate<'a> {
    ordered: Vec<&'a Activity>,
}

impl<'a> ByDate<'a> {
    pub fn iter(&self) -> impl Iterator<Item = &'a Activity> + '_ {
        self.ordered.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Owned copy of the ordered activities.
    pub fn to_vec(&self) -> Vec<Activity> {
        self.ordered.iter().map(|a| (*a).clone()).collect()
    }
}

impl<'a, 'v> IntoIterator for &'v ByDate<'a> {
    type Item = &'a Activity;
    type IntoIter = std::iter::Copied<std::slice::Iter<'v, &'a Activity>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ordered.iter().copied()
    }
}

/// Order a collection ascending by date.
pub fn project_by_date<'a, I>(activities: I) -> ByDate<'a>
where
    I: IntoIterator<Item = &'a Activity>,
{
    let mut ordered: Vec<&Activity> = activities.into_iter().collect();
    ordered.sort_by(|a, b| by_date(a, b));
    ByDate { ordered }
}

/// Group a collection by calendar date, groups in ascending date order.
pub fn group_by_date<'a, I>(activities: I) -> BTreeMap<NaiveDate, Vec<&'a Activity>>
where
    I: IntoIterator<Item = &'a Activity>,
{
    let mut groups: BTreeMap<NaiveDate, Vec<&Activity>> = BTreeMap::new();
    for activity in project_by_date(activities).iter() {
        groups.entry(activity.date).or_default().push(activity);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(id: &str, title: &str, date: &str) -> Activity {
        Activity {
            id: id.to_string(),
            title: title.to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            description: String::new(),
            category: "culture".to_string(),
            city: "Paris".to_string(),
            venue: "Louvre".to_string(),
        }
    }

    #[test]
    fn test_projection_sorts_ascending() {
        let items = [
            activity("1", "May", "2024-05-01"),
            activity("2", "March", "2024-03-10"),
        ];
        let view = project_by_date(&items);
        let dates: Vec<String> = view.iter().map(|a| a.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-03-10", "2024-05-01"]);
    }

    #[test]
    fn test_same_day_ties_break_on_title_then_id() {
        let items = [
            activity("b", "Zumba", "2024-01-01"),
            activity("c", "Art", "2024-01-01"),
            activity("a", "Art", "2024-01-01"),
        ];
        let view = project_by_date(&items);
        let ids: Vec<&str> = view.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
    }

    #[test]
    fn test_projection_is_restartable() {
        let items = [
            activity("1", "One", "2024-02-01"),
            activity("2", "Two", "2024-01-01"),
        ];
        let view = project_by_date(&items);
        let first: Vec<&str> = view.iter().map(|a| a.id.as_str()).collect();
        let second: Vec<&str> = (&view).into_iter().map(|a| a.id.as_str()).collect();
        assert_eq!(first, second);
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn test_projection_is_independent_of_input_order() {
        let mut items = vec![
            activity("1", "A", "2024-03-01"),
            activity("2", "B", "2024-03-01"),
            activity("3", "C", "2023-12-31"),
        ];
        let forward = project_by_date(&items).to_vec();
        items.reverse();
        let backward = project_by_date(&items).to_vec();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_group_by_date() {
        let items = [
            activity("1", "B", "2024-03-01"),
            activity("2", "A", "2024-03-01"),
            activity("3", "C", "2023-12-31"),
        ];
        let groups = group_by_date(&items);
        let keys: Vec<String> = groups.keys().map(|d| d.to_string()).collect();
        assert_eq!(keys, vec!["2023-12-31", "2024-03-01"]);

        let march = &groups[&NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()];
        let titles: Vec<&str> = march.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn test_empty_collection() {
        let items: Vec<Activity> = Vec::new();
        assert!(project_by_date(&items).is_empty());
        assert!(group_by_date(&items).is_empty());
    }
}
