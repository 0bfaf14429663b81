use crate::geometry::Location;
use crate::topology::Label;

/// The kind of overlay operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayOpCode {
    Intersection,
    Union,
    Difference,
    SymDifference,
}

fn is_inside(loc: Option<Location>) -> bool {
    matches!(loc, Some(Location::Interior | Location::Boundary))
}

/// Decides whether a point with locations `loc0` in A and `loc1` in B
/// belongs to the result of `op`. Boundary counts as interior.
///
/// | in A | in B | Intersection | Union | Difference | SymDifference |
/// |------|------|--------------|-------|------------|---------------|
/// | yes  | yes  | keep         | keep  | discard    | discard       |
/// | yes  | no   | discard      | keep  | keep       | keep          |
/// | no   | yes  | discard      | keep  | discard    | keep          |
/// | no   | no   | discard      | discard | discard  | discard       |
#[allow(clippy::match_same_arms)]
#[must_use]
pub fn is_result_of_op(loc0: Option<Location>, loc1: Option<Location>, op: OverlayOpCode) -> bool {
    match (is_inside(loc0), is_inside(loc1), op) {
        (true, true, OverlayOpCode::Intersection) => true,
        (true, true, OverlayOpCode::Union) => true,
        (true, true, OverlayOpCode::Difference) => false,
        (true, true, OverlayOpCode::SymDifference) => false,

        (true, false, OverlayOpCode::Intersection) => false,
        (true, false, _) => true,

        (false, true, OverlayOpCode::Union) => true,
        (false, true, OverlayOpCode::SymDifference) => true,
        (false, true, _) => false,

        (false, false, _) => false,
    }
}

/// [`is_result_of_op`] applied to the on-locations of a label.
#[must_use]
pub fn is_label_in_result(label: &Label, op: OverlayOpCode) -> bool {
    is_result_of_op(label.on_location(0), label.on_location(1), op)
}

#[cfg(test)]
mod tests {
    use super::*;

    const IN: Option<Location> = Some(Location::Interior);
    const ON: Option<Location> = Some(Location::Boundary);
    const OUT: Option<Location> = Some(Location::Exterior);

    #[test]
    fn boundary_is_treated_as_interior() {
        assert!(is_result_of_op(ON, IN, OverlayOpCode::Intersection));
        assert!(!is_result_of_op(ON, ON, OverlayOpCode::Difference));
    }

    #[test]
    fn difference_keeps_only_a() {
        assert!(is_result_of_op(IN, OUT, OverlayOpCode::Difference));
        assert!(is_result_of_op(IN, None, OverlayOpCode::Difference));
        assert!(!is_result_of_op(OUT, IN, OverlayOpCode::Difference));
    }

    #[test]
    fn sym_difference_is_exclusive() {
        assert!(is_result_of_op(OUT, IN, OverlayOpCode::SymDifference));
        assert!(is_result_of_op(IN, OUT, OverlayOpCode::SymDifference));
        assert!(!is_result_of_op(IN, IN, OverlayOpCode::SymDifference));
        assert!(!is_result_of_op(OUT, OUT, OverlayOpCode::Union));
    }
}
