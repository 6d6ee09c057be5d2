//! Structural comparison of rendered slot lists.
//!
//! Used only where board state meets the renderer: the board always computes
//! fresh state, and these helpers decide whether the fresh state looks any
//! different from what is on screen.

use crate::types::SlotView;

fn same_occupant(a: &SlotView, b: &SlotView) -> bool {
    a.slot_id == b.slot_id && a.member_id == b.member_id && a.name == b.name
}

/// `true` when any slot's occupant identity or name differs, or the slot
/// lists differ in length or order.
pub fn needs_redraw(current: &[SlotView], fresh: &[SlotView]) -> bool {
    current.len() != fresh.len()
        || current
            .iter()
            .zip(fresh)
            .any(|(a, b)| !same_occupant(a, b))
}

/// Slot ids whose occupant changed between two renders of the same formation.
pub fn changed_slots<'a>(current: &[SlotView], fresh: &'a [SlotView]) -> Vec<&'a str> {
    fresh
        .iter()
        .enumerate()
        .filter(|(idx, view)| current.get(*idx).is_none_or(|prev| !same_occupant(prev, view)))
        .map(|(_, view)| view.slot_id.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    fn view(slot: &str, member: Option<u64>, name: &str) -> SlotView {
        SlotView {
            slot_id: slot.to_string(),
            role: Role::CM,
            x: 50,
            y: 50,
            member_id: member,
            name: name.to_string(),
            dragging: false,
        }
    }

    #[test]
    fn identical_views_need_no_redraw() {
        let a = vec![view("cm1", Some(1), "A"), view("cm2", None, "")];
        let b = a.clone();

        assert!(!needs_redraw(&a, &b));
        assert!(changed_slots(&a, &b).is_empty());
    }

    #[test]
    fn drag_marker_alone_does_not_trigger_redraw() {
        let a = vec![view("cm1", Some(1), "A")];
        let mut b = a.clone();
        b[0].dragging = true;

        assert!(!needs_redraw(&a, &b));
    }

    #[test]
    fn occupant_or_name_change_is_reported() {
        let a = vec![view("cm1", Some(1), "A"), view("cm2", Some(2), "B")];
        let b = vec![view("cm1", Some(1), "A."), view("cm2", None, "")];

        assert!(needs_redraw(&a, &b));
        assert_eq!(changed_slots(&a, &b), vec!["cm1", "cm2"]);
    }

    #[test]
    fn length_change_needs_redraw() {
        let a = vec![view("cm1", None, "")];
        let b = vec![view("cm1", None, ""), view("cm2", None, "")];

        assert!(needs_redraw(&a, &b));
        assert_eq!(changed_slots(&a, &b), vec!["cm2"]);
    }
}
