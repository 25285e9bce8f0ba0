//! Virtualized list for the terminal
//!
//! Owns item heights, the scroll offset and the viewport. Every mutator
//! returns the geometry events it caused instead of calling listeners, so a
//! wrapper can decide what to forward.

use std::ops::Range;

use bidilist_core::ScrollGeometry;

/// Keeps the visible rows still when items are inserted above them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaintainVisibleContentPosition {
    /// First index that may serve as the anchor row
    pub min_index_for_visible: usize,
    /// When set, an offset at or below this value snaps back to the top after a prepend
    pub autoscroll_to_top_threshold: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineOptions {
    /// Native end-reached distance as a fraction of the visible length. `None` disables it.
    pub on_end_reached_threshold: Option<f64>,
    pub maintain_visible_content_position: Option<MaintainVisibleContentPosition>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            on_end_reached_threshold: Some(0.5),
            maintain_visible_content_position: None,
        }
    }
}

/// Events produced by the engine
#[derive(Debug, Clone, PartialEq)]
pub enum ListEvent {
    Scroll(ScrollGeometry),
    Layout { width: f64, height: f64 },
    ContentSizeChange { width: f64, height: f64 },
    /// Native end-reached, once per content height
    EndReached { distance_from_end: f64 },
}

pub type MeasureFn<T> = Box<dyn Fn(&T) -> u32 + Send>;

pub struct VirtualList<T> {
    items: Vec<T>,
    heights: Vec<u32>,
    measure: MeasureFn<T>,
    offset: u32,
    viewport_width: u16,
    viewport_height: u32,
    options: EngineOptions,
    end_reached_at: Option<u32>,
}

impl<T> VirtualList<T> {
    pub fn new(options: EngineOptions, measure: MeasureFn<T>) -> Self {
        Self {
            items: Vec::new(),
            heights: Vec::new(),
            measure,
            offset: 0,
            viewport_width: 0,
            viewport_height: 0,
            options,
            end_reached_at: None,
        }
    }

    /// Every item takes `rows` rows
    pub fn with_fixed_height(options: EngineOptions, rows: u32) -> Self
    where
        T: 'static,
    {
        Self::new(options, Box::new(move |_: &T| rows))
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn viewport_height(&self) -> u32 {
        self.viewport_height
    }

    pub fn viewport_width(&self) -> u16 {
        self.viewport_width
    }

    pub fn content_height(&self) -> u32 {
        self.heights.iter().sum()
    }

    pub fn max_offset(&self) -> u32 {
        self.content_height().saturating_sub(self.viewport_height)
    }

    pub fn height_of(&self, index: usize) -> u32 {
        self.heights.get(index).copied().unwrap_or(0)
    }

    pub fn geometry(&self) -> ScrollGeometry {
        ScrollGeometry::new(
            f64::from(self.offset),
            f64::from(self.viewport_height),
            f64::from(self.content_height()),
        )
    }

    /// Row at which item `index` starts
    pub fn item_top(&self, index: usize) -> u32 {
        self.heights[..index.min(self.heights.len())].iter().sum()
    }

    /// Items overlapping the viewport
    pub fn visible_range(&self) -> Range<usize> {
        let bottom = self.offset + self.viewport_height;
        let mut top = 0u32;
        let mut start = None;
        let mut end = 0;

        for (index, height) in self.heights.iter().enumerate() {
            let item_bottom = top + height;
            if top >= bottom {
                break;
            }
            if item_bottom > self.offset {
                start.get_or_insert(index);
                end = index + 1;
            }
            top = item_bottom;
        }

        match start {
            Some(start) => start..end,
            None => 0..0,
        }
    }

    pub fn first_visible_index(&self) -> Option<usize> {
        let range = self.visible_range();
        (!range.is_empty()).then_some(range.start)
    }

    pub fn set_viewport(&mut self, width: u16, height: u32) -> Vec<ListEvent> {
        if width == self.viewport_width && height == self.viewport_height {
            return Vec::new();
        }
        let previous = self.offset;
        self.viewport_width = width;
        self.viewport_height = height;
        self.offset = self.offset.min(self.max_offset());

        let mut events = vec![ListEvent::Layout {
            width: f64::from(width),
            height: f64::from(height),
        }];
        if self.offset != previous {
            self.push_scroll(&mut events);
        }
        events
    }

    pub fn scroll_to_offset(&mut self, offset: u32) -> Vec<ListEvent> {
        let offset = offset.min(self.max_offset());
        if offset == self.offset {
            return Vec::new();
        }
        self.offset = offset;
        let mut events = Vec::new();
        self.push_scroll(&mut events);
        events
    }

    /// Positive scrolls toward the end
    pub fn scroll_by(&mut self, delta: i64) -> Vec<ListEvent> {
        let target = (i64::from(self.offset) + delta).clamp(0, i64::from(self.max_offset()));
        self.scroll_to_offset(target as u32)
    }

    pub fn scroll_to_index(&mut self, index: usize) -> Vec<ListEvent> {
        self.scroll_to_offset(self.item_top(index))
    }

    pub fn scroll_to_top(&mut self) -> Vec<ListEvent> {
        self.scroll_to_offset(0)
    }

    pub fn scroll_to_end(&mut self) -> Vec<ListEvent> {
        self.scroll_to_offset(self.max_offset())
    }

    pub fn append(&mut self, items: Vec<T>) -> Vec<ListEvent> {
        if items.is_empty() {
            return Vec::new();
        }
        let heights: Vec<u32> = items.iter().map(|item| (self.measure)(item)).collect();
        self.heights.extend(heights);
        self.items.extend(items);
        self.content_changed(self.offset)
    }

    /// Insert items before the first one, keeping the anchor row in place when
    /// position maintenance is on
    pub fn prepend(&mut self, mut items: Vec<T>) -> Vec<ListEvent> {
        if items.is_empty() {
            return Vec::new();
        }
        let previous = self.offset;
        let added = items.len();
        let anchor = self.anchor_index().map(|index| (index, self.item_top(index)));

        let mut heights: Vec<u32> = items.iter().map(|item| (self.measure)(item)).collect();
        heights.append(&mut self.heights);
        items.append(&mut self.items);
        self.heights = heights;
        self.items = items;

        if let Some((index, top_before)) = anchor {
            let top_after = self.item_top(index + added);
            self.offset = previous + (top_after - top_before);
        }

        if let Some(threshold) = self
            .options
            .maintain_visible_content_position
            .and_then(|mvcp| mvcp.autoscroll_to_top_threshold)
        {
            if f64::from(previous) <= threshold {
                self.offset = 0;
            }
        }

        self.content_changed(previous)
    }

    /// Swap out all items
    pub fn replace(&mut self, items: Vec<T>) -> Vec<ListEvent> {
        let previous = self.offset;
        self.heights = items.iter().map(|item| (self.measure)(item)).collect();
        self.items = items;
        self.end_reached_at = None;
        self.content_changed(previous)
    }

    fn anchor_index(&self) -> Option<usize> {
        let mvcp = self.options.maintain_visible_content_position?;
        let range = self.visible_range();
        let index = range.start.max(mvcp.min_index_for_visible);
        range.contains(&index).then_some(index)
    }

    fn content_changed(&mut self, previous_offset: u32) -> Vec<ListEvent> {
        self.offset = self.offset.min(self.max_offset());

        let mut events = vec![ListEvent::ContentSizeChange {
            width: f64::from(self.viewport_width),
            height: f64::from(self.content_height()),
        }];
        if self.offset != previous_offset {
            self.push_scroll(&mut events);
        }
        events
    }

    fn push_scroll(&mut self, events: &mut Vec<ListEvent>) {
        let geometry = self.geometry();
        events.push(ListEvent::Scroll(geometry));

        let Some(fraction) = self.options.on_end_reached_threshold else {
            return;
        };
        let content = self.content_height();
        let distance = geometry.distance_from_end();
        if distance < fraction * geometry.visible_length && self.end_reached_at != Some(content) {
            self.end_reached_at = Some(content);
            events.push(ListEvent::EndReached {
                distance_from_end: distance,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(options: EngineOptions, count: u32) -> VirtualList<u32> {
        let mut list = VirtualList::with_fixed_height(options, 3);
        list.set_viewport(40, 30);
        list.append((0..count).collect());
        list
    }

    fn maintained(autoscroll: Option<f64>) -> EngineOptions {
        EngineOptions {
            on_end_reached_threshold: None,
            maintain_visible_content_position: Some(MaintainVisibleContentPosition {
                min_index_for_visible: 1,
                autoscroll_to_top_threshold: autoscroll,
            }),
        }
    }

    #[test]
    fn test_visible_range_and_geometry() {
        let mut list = list(EngineOptions::default(), 20);
        assert_eq!(list.content_height(), 60);
        assert_eq!(list.visible_range(), 0..10);

        list.scroll_to_offset(4);
        // Rows 4..34 overlap items 1 (rows 3..6) to 11 (rows 33..36)
        assert_eq!(list.visible_range(), 1..12);
        assert_eq!(list.geometry(), ScrollGeometry::new(4.0, 30.0, 60.0));
    }

    #[test]
    fn test_scroll_is_clamped_and_silent_without_movement() {
        let mut list = list(EngineOptions::default(), 20);
        list.scroll_by(1000);
        assert_eq!(list.offset(), 30);
        assert!(list.scroll_to_end().is_empty());
        list.scroll_by(-1000);
        assert_eq!(list.offset(), 0);
        assert!(list.scroll_to_top().is_empty());
    }

    #[test]
    fn test_scroll_to_index() {
        let mut list = list(EngineOptions::default(), 20);
        let events = list.scroll_to_index(5);
        assert_eq!(list.offset(), 15);
        assert_eq!(events, vec![ListEvent::Scroll(ScrollGeometry::new(15.0, 30.0, 60.0))]);
    }

    #[test]
    fn test_native_end_reached_fires_once_per_content_height() {
        let mut list = list(EngineOptions::default(), 20);
        let events = list.scroll_to_offset(20);
        assert!(events.contains(&ListEvent::EndReached { distance_from_end: 10.0 }));
        assert!(!list.scroll_to_offset(25).iter().any(|e| matches!(e, ListEvent::EndReached { .. })));

        list.append((20..25).collect());
        let events = list.scroll_to_end();
        assert!(events.iter().any(|e| matches!(e, ListEvent::EndReached { .. })));
    }

    #[test]
    fn test_native_end_reached_can_be_disabled() {
        let options = EngineOptions {
            on_end_reached_threshold: None,
            ..Default::default()
        };
        let mut list = list(options, 20);
        let events = list.scroll_to_end();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], ListEvent::Scroll(_)));
    }

    #[test]
    fn test_append_reports_content_size() {
        let mut list = list(EngineOptions::default(), 0);
        let events = list.append(vec![1, 2]);
        assert_eq!(
            events,
            vec![ListEvent::ContentSizeChange { width: 40.0, height: 6.0 }]
        );
        assert!(list.append(Vec::new()).is_empty());
    }

    #[test]
    fn test_prepend_keeps_anchor_row_on_screen() {
        let mut list = list(maintained(None), 20);
        list.scroll_to_offset(12);
        let anchor = list.first_visible_index().unwrap();
        let anchor_screen_row = list.item_top(anchor) as i64 - list.offset() as i64;

        let events = list.prepend((100..105).collect());

        let moved = anchor + 5;
        assert_eq!(list.items()[moved], anchor as u32);
        assert_eq!(list.item_top(moved) as i64 - list.offset() as i64, anchor_screen_row);
        assert_eq!(list.offset(), 27);
        assert!(events.contains(&ListEvent::Scroll(ScrollGeometry::new(27.0, 30.0, 75.0))));
    }

    #[test]
    fn test_prepend_at_top_anchors_min_index() {
        let mut list = list(maintained(None), 20);
        list.prepend(vec![100, 101]);
        // Item 1 was the anchor; it keeps its screen row 3
        assert_eq!(list.items()[3], 1);
        assert_eq!(list.item_top(3) - list.offset(), 3);
    }

    #[test]
    fn test_prepend_without_maintenance_shifts_content() {
        let mut list = list(EngineOptions::default(), 20);
        list.scroll_to_offset(12);
        list.prepend(vec![100, 101]);
        assert_eq!(list.offset(), 12);
    }

    #[test]
    fn test_autoscroll_to_top_when_near_top() {
        let mut list = list(maintained(Some(10.0)), 20);
        list.scroll_to_offset(6);
        list.prepend((100..105).collect());
        assert_eq!(list.offset(), 0);

        list.scroll_to_offset(20);
        list.prepend(vec![200]);
        assert_eq!(list.offset(), 23);
    }

    #[test]
    fn test_set_viewport_emits_layout_and_clamps() {
        let mut list = list(EngineOptions::default(), 20);
        list.scroll_to_end();
        let events = list.set_viewport(40, 50);
        assert_eq!(events[0], ListEvent::Layout { width: 40.0, height: 50.0 });
        assert_eq!(list.offset(), 10);
        assert!(list.set_viewport(40, 50).is_empty());
    }
}
