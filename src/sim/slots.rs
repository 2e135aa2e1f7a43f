//! Landing slots beneath the peg field
//!
//! Slots are contiguous, uniform in width and together cover exactly the
//! horizontal span of the peg centers. Each slot is the half-open interval
//! `[x_start, x_start + width)`, except the last one which also owns the
//! right edge of the field.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::layout::PegBounds;

/// One landing slot (1-based index, left to right)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub index: usize,
    pub x_start: f32,
    pub width: f32,
}

impl Slot {
    #[inline]
    pub fn x_end(&self) -> f32 {
        self.x_start + self.width
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x_start + self.width / 2.0
    }

    /// Base segment color, brightest at the center slot: `rgb(0, g, 154)`
    pub fn tint(&self, slot_count: usize) -> [u8; 3] {
        let half = slot_count.div_ceil(2).max(1);
        let color_gap = 100.0 / half as f32;
        let center = (slot_count as f32 + 1.0) / 2.0;
        let distance = (self.index as f32 - center).abs();
        let green = (250.0 - distance * color_gap).clamp(0.0, 255.0);
        [0, green.round() as u8, 154]
    }
}

/// Screen-space anchor for drawing a slot's score label
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelAnchor {
    pub slot_index: usize,
    pub screen_x: f32,
    pub screen_y: f32,
}

/// The ordered set of slots plus the y the base segments sit at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotSet {
    slots: Vec<Slot>,
    /// Field edges, exact (not accumulated from slot widths)
    left: f32,
    right: f32,
    pub base_y: f32,
}

impl SlotSet {
    /// Partition the peg span into `count` equal slots
    pub fn partition(bounds: &PegBounds, count: usize, base_y: f32) -> Self {
        let width = if count == 0 {
            0.0
        } else {
            bounds.span_x() / count as f32
        };
        let slots = (0..count)
            .map(|i| Slot {
                index: i + 1,
                x_start: bounds.min_x + i as f32 * width,
                width,
            })
            .collect();
        Self {
            slots,
            left: bounds.min_x,
            right: bounds.max_x,
            base_y,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    /// Slot by 1-based index
    pub fn get(&self, index: usize) -> Option<&Slot> {
        index.checked_sub(1).and_then(|i| self.slots.get(i))
    }

    /// Left edge of the first slot / right edge of the last
    pub fn span(&self) -> Option<(f32, f32)> {
        (!self.slots.is_empty()).then_some((self.left, self.right))
    }

    /// Slot whose interval contains `x`, if any
    pub fn locate(&self, x: f32) -> Option<&Slot> {
        let (start, end) = self.span()?;
        if !(x >= start && x <= end) {
            return None;
        }
        let width = self.slots[0].width;
        if width <= 0.0 {
            return self.slots.first();
        }
        // Index from arithmetic, then nudge for float error at the edges
        let mut i = (((x - start) / width) as usize).min(self.slots.len() - 1);
        if i > 0 && x < self.slots[i].x_start {
            i -= 1;
        } else if i + 1 < self.slots.len() && x >= self.slots[i].x_end() {
            i += 1;
        }
        self.slots.get(i)
    }

    /// Like `locate`, but clamps `x` outside the span to the nearest edge slot
    pub fn locate_clamped(&self, x: f32) -> Option<&Slot> {
        if let Some(slot) = self.locate(x) {
            return Some(slot);
        }
        let (start, _) = self.span()?;
        if x.is_nan() {
            return None;
        }
        if x < start {
            self.slots.first()
        } else {
            self.slots.last()
        }
    }

    /// Label anchors, offset by where the scene sits on screen.
    ///
    /// Anchors are the slot centers; renderers center the label text on them.
    pub fn label_anchors(
        &self,
        lowest_peg_y: f32,
        label_drop: f32,
        viewport_offset: Vec2,
    ) -> Vec<LabelAnchor> {
        self.slots
            .iter()
            .map(|slot| LabelAnchor {
                slot_index: slot.index,
                screen_x: viewport_offset.x + slot.center_x(),
                screen_y: viewport_offset.y + lowest_peg_y + label_drop,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(min_x: f32, max_x: f32) -> PegBounds {
        PegBounds {
            min_x,
            max_x,
            min_y: 0.0,
            max_y: 100.0,
        }
    }

    #[test]
    fn test_partition_uniform_and_contiguous() {
        let slots = SlotSet::partition(&bounds(0.0, 850.0), 17, 870.0);
        assert_eq!(slots.len(), 17);
        for slot in slots.iter() {
            assert!((slot.width - 50.0).abs() < 1e-4);
        }
        let total: f32 = slots.iter().map(|s| s.width).sum();
        assert!((total - 850.0).abs() < 1e-3);
        let v: Vec<_> = slots.iter().collect();
        for pair in v.windows(2) {
            assert!((pair[0].x_end() - pair[1].x_start).abs() < 1e-3);
        }
        assert_eq!(slots.get(1).unwrap().index, 1);
        assert_eq!(slots.get(17).unwrap().index, 17);
        assert!(slots.get(0).is_none());
        assert!(slots.get(18).is_none());
    }

    #[test]
    fn test_width_divides_span_by_slot_count() {
        // 850 / 17, not 850 / 16: the last slot must end on the last peg
        let slots = SlotSet::partition(&bounds(0.0, 850.0), 17, 870.0);
        let last = slots.get(17).unwrap();
        assert!((last.width - 50.0).abs() < 1e-4);
        assert!((last.x_end() - 850.0).abs() < 1e-3);
        assert_eq!(slots.span(), Some((0.0, 850.0)));
    }

    #[test]
    fn test_locate_half_open() {
        let slots = SlotSet::partition(&bounds(0.0, 850.0), 17, 870.0);
        assert_eq!(slots.locate(0.0).unwrap().index, 1);
        assert_eq!(slots.locate(49.9).unwrap().index, 1);
        assert_eq!(slots.locate(50.0).unwrap().index, 2);
        assert_eq!(slots.locate(425.0).unwrap().index, 9);
        assert_eq!(slots.locate(850.0).unwrap().index, 17);
        assert!(slots.locate(-0.1).is_none());
        assert!(slots.locate(850.1).is_none());
        assert!(slots.locate(f32::NAN).is_none());
    }

    #[test]
    fn test_locate_clamped() {
        let slots = SlotSet::partition(&bounds(100.0, 950.0), 17, 870.0);
        assert_eq!(slots.locate_clamped(20.0).unwrap().index, 1);
        assert_eq!(slots.locate_clamped(2000.0).unwrap().index, 17);
        assert_eq!(slots.locate_clamped(530.0).unwrap().index, 9);
        assert!(slots.locate_clamped(f32::NAN).is_none());
    }

    #[test]
    fn test_tint_symmetric_and_brightest_at_center() {
        let slots = SlotSet::partition(&bounds(0.0, 850.0), 17, 870.0);
        let tints: Vec<_> = slots.iter().map(|s| s.tint(17)).collect();
        assert_eq!(tints[0], tints[16]);
        assert_eq!(tints[8], [0, 250, 154]);
        assert!(tints[0][1] < tints[8][1]);
    }

    #[test]
    fn test_label_anchors() {
        let slots = SlotSet::partition(&bounds(100.0, 950.0), 17, 870.0);
        let anchors = slots.label_anchors(800.0, 78.0, Vec2::new(10.0, 20.0));
        assert_eq!(anchors.len(), 17);
        assert_eq!(anchors[0].slot_index, 1);
        assert!((anchors[0].screen_x - 135.0).abs() < 1e-3);
        assert!((anchors[0].screen_y - 898.0).abs() < 1e-3);
    }

    #[test]
    fn test_label_sits_over_slot_center() {
        let slots = SlotSet::partition(&bounds(100.0, 950.0), 17, 870.0);
        let anchors = slots.label_anchors(800.0, 78.0, Vec2::ZERO);
        for (slot, anchor) in slots.iter().zip(&anchors) {
            assert_eq!(anchor.slot_index, slot.index);
            assert!((anchor.screen_x - slot.center_x()).abs() < 1e-3);
            // A ball resting under the label scores that label's slot
            assert_eq!(slots.locate(anchor.screen_x).map(|s| s.index), Some(slot.index));
        }
    }
}
