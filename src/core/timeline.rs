//! Timeline of dialogue markers ordered by sample position.

use crate::core::line::LocalizedText;
use crate::core::sample::{SamplePosition, END};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Error type for timeline operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimelineError {
    /// A marker already sits at this exact sample position
    #[error("a marker already exists at sample {position}")]
    DuplicateMarker { position: SamplePosition },
    /// Index does not refer to a marker (stale selection, removed item)
    #[error("marker index {index} is out of range (timeline has {len} markers)")]
    OutOfRange { index: usize, len: usize },
}

/// Stable identifier for a marker.
///
/// Indices shift whenever the timeline is sorted, inserted into or removed
/// from; ids do not. Ids are runtime-only and are not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct MarkerId(u64);

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "marker#{}", self.0)
    }
}

/// A subtitle entry anchored to a sample position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DialogueItem {
    #[serde(skip)]
    id: MarkerId,
    sample_position: SamplePosition,
    #[serde(default)]
    pub text: LocalizedText,
}

impl DialogueItem {
    /// Create a detached item; it receives an id when added to a timeline
    pub fn new(sample_position: SamplePosition, text: LocalizedText) -> Self {
        Self {
            id: MarkerId::default(),
            sample_position,
            text,
        }
    }

    pub fn id(&self) -> MarkerId {
        self.id
    }

    pub fn sample_position(&self) -> SamplePosition {
        self.sample_position
    }
}

/// Ordered marker store.
///
/// Items are kept sorted ascending by sample position with no two items
/// sharing a position, except transiently between `reposition_marker` and
/// `reorder` while a drag is in progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<DialogueItem>", into = "Vec<DialogueItem>")]
pub struct Timeline {
    items: Vec<DialogueItem>,
    next_id: u64,
}

impl Timeline {
    /// Create an empty timeline
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in their current order
    pub fn items(&self) -> &[DialogueItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DialogueItem> {
        self.items.iter()
    }

    pub fn get(&self, index: usize) -> Option<&DialogueItem> {
        self.items.get(index)
    }

    pub fn get_by_id(&self, id: MarkerId) -> Option<&DialogueItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Mutable access to a marker's text. Positions are only changed
    /// through the timeline so ordering stays its responsibility.
    pub fn text_mut(&mut self, index: usize) -> Option<&mut LocalizedText> {
        self.items.get_mut(index).map(|item| &mut item.text)
    }

    /// Current index of the marker with `id`
    pub fn index_of(&self, id: MarkerId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Index of the marker at exactly `position`
    pub fn index_at_position(&self, position: SamplePosition) -> Option<usize> {
        self.items.iter().position(|item| item.sample_position == position)
    }

    pub fn id_at(&self, index: usize) -> Option<MarkerId> {
        self.items.get(index).map(|item| item.id)
    }

    pub fn contains_position(&self, position: SamplePosition) -> bool {
        self.index_at_position(position).is_some()
    }

    /// Add an empty marker at `position`.
    ///
    /// Returns the index of the new marker after sorting, or
    /// `TimelineError::DuplicateMarker` if the position is taken (the
    /// timeline is left unchanged).
    pub fn add_marker(&mut self, position: SamplePosition) -> Result<usize, TimelineError> {
        self.add_item(DialogueItem::new(position, LocalizedText::default()))
    }

    /// Add a marker carrying `text`; same rules as [`Timeline::add_marker`]
    pub fn add_item(&mut self, mut item: DialogueItem) -> Result<usize, TimelineError> {
        let position = item.sample_position;
        if self.contains_position(position) {
            log::debug!("rejected marker at sample {}: position occupied", position);
            return Err(TimelineError::DuplicateMarker { position });
        }

        item.id = self.allocate_id();
        let id = item.id;
        self.items.push(item);
        self.sort();

        let index = self.index_of(id).unwrap_or(self.items.len() - 1);
        log::debug!("added {} at sample {} (index {})", id, position, index);
        Ok(index)
    }

    /// Remove the marker at `index`
    pub fn remove_marker(&mut self, index: usize) -> Result<DialogueItem, TimelineError> {
        self.check_index(index)?;
        let item = self.items.remove(index);
        log::debug!("removed {} at sample {}", item.id, item.sample_position);
        Ok(item)
    }

    /// Remove the marker with `id`, if it still exists
    pub fn remove_by_id(&mut self, id: MarkerId) -> Option<DialogueItem> {
        let index = self.index_of(id)?;
        self.remove_marker(index).ok()
    }

    /// Move a marker without re-sorting.
    ///
    /// Used while a drag is in progress; ordering (and uniqueness) is only
    /// restored by the next [`Timeline::reorder`].
    pub fn reposition_marker(&mut self, index: usize, position: SamplePosition) -> Result<(), TimelineError> {
        self.check_index(index)?;
        self.items[index].sample_position = position;
        Ok(())
    }

    /// Move the marker at `index` off any position another marker occupies.
    ///
    /// Searches forward one sample at a time for a free position; if the end
    /// of the sample range is reached it searches backward from the original
    /// position instead. Returns the resulting position.
    pub fn settle(&mut self, index: usize) -> Result<SamplePosition, TimelineError> {
        self.check_index(index)?;
        let id = self.items[index].id;
        let start = self.items[index].sample_position;
        let occupied: BTreeSet<SamplePosition> = self
            .items
            .iter()
            .filter(|item| item.id != id)
            .map(|item| item.sample_position)
            .collect();

        if !occupied.contains(&start) {
            return Ok(start);
        }

        let forward = (start..=END).find(|p| !occupied.contains(p));
        let settled = match forward {
            Some(p) => p,
            None => (0..start).rev().find(|p| !occupied.contains(p)).unwrap_or(start),
        };

        log::debug!("nudged {} from sample {} to {}", id, start, settled);
        self.items[index].sample_position = settled;
        Ok(settled)
    }

    /// Stable-sort markers by sample position.
    ///
    /// Any positions left tied (a drag that landed on another marker without
    /// being settled) are separated by nudging the later marker forward one
    /// sample, so the timeline never holds duplicates after this returns.
    pub fn reorder(&mut self) {
        self.sort();
        self.separate_ties();
        log::debug!("reordered {} markers", self.items.len());
    }

    /// Whether items are strictly ascending by position
    pub fn is_sorted(&self) -> bool {
        self.items
            .windows(2)
            .all(|pair| pair[0].sample_position < pair[1].sample_position)
    }

    fn sort(&mut self) {
        self.items.sort_by_key(|item| item.sample_position);
    }

    fn separate_ties(&mut self) {
        for i in 1..self.items.len() {
            let prev = self.items[i - 1].sample_position;
            if self.items[i].sample_position <= prev {
                self.items[i].sample_position = prev.saturating_add(1);
            }
        }
        // Saturated at the end of the range: walk back down instead
        for i in (0..self.items.len().saturating_sub(1)).rev() {
            let next = self.items[i + 1].sample_position;
            if self.items[i].sample_position >= next {
                self.items[i].sample_position = next.saturating_sub(1);
            }
        }
    }

    fn allocate_id(&mut self) -> MarkerId {
        self.next_id += 1;
        MarkerId(self.next_id)
    }

    fn check_index(&self, index: usize) -> Result<(), TimelineError> {
        if index >= self.items.len() {
            return Err(TimelineError::OutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(())
    }
}

impl From<Vec<DialogueItem>> for Timeline {
    fn from(items: Vec<DialogueItem>) -> Self {
        let mut timeline = Timeline::new();
        for mut item in items {
            item.id = timeline.allocate_id();
            timeline.items.push(item);
        }
        timeline.reorder();
        timeline
    }
}

impl From<Timeline> for Vec<DialogueItem> {
    fn from(timeline: Timeline) -> Self {
        timeline.items
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a DialogueItem;
    type IntoIter = std::slice::Iter<'a, DialogueItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
