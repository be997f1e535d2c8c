//! Pick identifiers.
//!
//! Every live widget owns a small integer id painted as an opaque color into
//! the offscreen pick surface. Reading a pixel back and decoding its color
//! finds the widget under the pointer without any hit-test geometry.

use std::collections::HashMap;

use crate::color::Color;
use crate::widget::WidgetId;

/// Largest id that fits into 24 bits of RGB.
const MAX_PICK_ID: u32 = 0x00ff_ffff;

/// Encode a pick id as an opaque color.
pub fn id_to_color(id: u32) -> Color {
    Color::rgb((id >> 16) as u8, (id >> 8) as u8, id as u8)
}

/// Decode a pick surface pixel. Transparent pixels carry no id.
pub fn color_to_id(color: Color) -> Option<u32> {
    if color.alpha != 0xff {
        return None;
    }
    let id = (color.red as u32) << 16 | (color.green as u32) << 8 | color.blue as u32;
    (id != 0).then_some(id)
}

/// Two-way map between pick ids and widgets.
///
/// Ids are handed out in increasing order starting at 1 and are only reused
/// after the counter wraps, skipping ids still in use.
#[derive(Debug)]
pub struct PickTable {
    next: u32,
    widgets: HashMap<u32, WidgetId>,
}

impl PickTable {
    pub fn new() -> Self {
        Self {
            next: 1,
            widgets: HashMap::new(),
        }
    }

    /// Assign a fresh id to `widget`.
    pub fn assign(&mut self, widget: WidgetId) -> u32 {
        loop {
            let id = self.next;
            self.next = if self.next >= MAX_PICK_ID { 1 } else { self.next + 1 };
            if let std::collections::hash_map::Entry::Vacant(slot) = self.widgets.entry(id) {
                slot.insert(widget);
                return id;
            }
        }
    }

    pub fn release(&mut self, id: u32) {
        self.widgets.remove(&id);
    }

    pub fn widget(&self, id: u32) -> Option<WidgetId> {
        self.widgets.get(&id).copied()
    }

    /// Widget painted with `color`, if any.
    pub fn lookup(&self, color: Color) -> Option<WidgetId> {
        color_to_id(color).and_then(|id| self.widget(id))
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}

impl Default for PickTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn test_color_round_trip() {
        for id in [1, 255, 256, 0x12_3456, MAX_PICK_ID] {
            assert_eq!(color_to_id(id_to_color(id)), Some(id));
        }
        assert_eq!(color_to_id(Color::TRANSPARENT), None);
        assert_eq!(color_to_id(Color::new(1, 2, 3, 0)), None);
    }

    #[test]
    fn test_ids_are_unique_and_monotonic() {
        let mut keys: SlotMap<WidgetId, ()> = SlotMap::with_key();
        let a = keys.insert(());
        let b = keys.insert(());
        let mut table = PickTable::new();
        let ia = table.assign(a);
        let ib = table.assign(b);
        assert_eq!((ia, ib), (1, 2));
        assert_eq!(table.lookup(id_to_color(ib)), Some(b));

        table.release(ia);
        assert_eq!(table.widget(ia), None);
        // Released ids are not handed out again right away.
        assert_eq!(table.assign(a), 3);
    }

    #[test]
    fn test_wrap_skips_live_ids() {
        let mut keys: SlotMap<WidgetId, ()> = SlotMap::with_key();
        let w = keys.insert(());
        let mut table = PickTable::new();
        assert_eq!(table.assign(w), 1);
        table.next = MAX_PICK_ID;
        assert_eq!(table.assign(w), MAX_PICK_ID);
        assert_eq!(table.assign(w), 2);
    }
}
