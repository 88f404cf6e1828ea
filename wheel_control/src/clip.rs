/*
    Line Clipping (Cohen-Sutherland)
*/

//! Clips integer line segments to an axis-aligned frame before they reach
//! the panel driver. Not part of the motor loop; it lives here because it
//! is pure math with the same no_std/no-alloc constraints.

type OutCode = u8;

const INSIDE: OutCode = 0;
const LEFT: OutCode = 1;
const RIGHT: OutCode = 2;
const BOTTOM: OutCode = 4;
const TOP: OutCode = 8;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClipRect {
    pub x_min: i32,
    pub x_max: i32,
    pub y_min: i32,
    pub y_max: i32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Segment {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Segment {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

fn outcode(rect: &ClipRect, x: i32, y: i32) -> OutCode {
    let mut code = INSIDE;
    if x < rect.x_min {
        code |= LEFT;
    } else if x > rect.x_max {
        code |= RIGHT;
    }
    if y < rect.y_min {
        code |= BOTTOM;
    } else if y > rect.y_max {
        code |= TOP;
    }
    code
}

/// Clips `seg` to `rect`. `None` means the segment lies entirely outside
/// the frame; `Some` endpoints are always within or on the boundary.
///
/// Classic outcode iteration: trivially accept when both endpoints are
/// inside, trivially reject when both share a violated boundary, otherwise
/// move one outside endpoint onto a violated boundary and reclassify.
pub fn clip_to_frame(seg: Segment, rect: ClipRect) -> Option<Segment> {
    let Segment {
        mut x1,
        mut y1,
        mut x2,
        mut y2,
    } = seg;
    let mut code1 = outcode(&rect, x1, y1);
    let mut code2 = outcode(&rect, x2, y2);

    loop {
        if (code1 | code2) == 0 {
            return Some(Segment { x1, y1, x2, y2 });
        }
        if (code1 & code2) != 0 {
            return None;
        }

        let out = if code1 != 0 { code1 } else { code2 };

        // The selected endpoint violates this boundary, the other one does
        // not (or the AND test would have rejected), so the denominators
        // below are never zero.
        let (x, y) = if (out & TOP) != 0 {
            (x1 + (x2 - x1) * (rect.y_max - y1) / (y2 - y1), rect.y_max)
        } else if (out & BOTTOM) != 0 {
            (x1 + (x2 - x1) * (rect.y_min - y1) / (y2 - y1), rect.y_min)
        } else if (out & RIGHT) != 0 {
            (rect.x_max, y1 + (y2 - y1) * (rect.x_max - x1) / (x2 - x1))
        } else {
            (rect.x_min, y1 + (y2 - y1) * (rect.x_min - x1) / (x2 - x1))
        };

        if out == code1 {
            x1 = x;
            y1 = y;
            code1 = outcode(&rect, x1, y1);
        } else {
            x2 = x;
            y2 = y;
            code2 = outcode(&rect, x2, y2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: ClipRect = ClipRect {
        x_min: 0,
        x_max: 10,
        y_min: 0,
        y_max: 10,
    };

    #[test]
    fn crossing_segment_is_trimmed_to_the_frame() {
        let clipped = clip_to_frame(Segment::new(-5, 5, 15, 5), FRAME);
        assert_eq!(clipped, Some(Segment::new(0, 5, 10, 5)));
    }

    #[test]
    fn fully_outside_segment_is_rejected() {
        assert_eq!(clip_to_frame(Segment::new(20, 20, 30, 30), FRAME), None);
    }

    #[test]
    fn fully_inside_segment_is_untouched() {
        let seg = Segment::new(2, 2, 8, 8);
        assert_eq!(clip_to_frame(seg, FRAME), Some(seg));
    }

    #[test]
    fn straddling_segment_without_shared_outcode_is_rejected() {
        // Endpoints are left-of and below the frame but the segment never
        // enters it; the trivial tests alone cannot decide this one.
        assert_eq!(clip_to_frame(Segment::new(-10, 4, 4, -10), FRAME), None);
    }

    #[test]
    fn diagonal_segment_is_clipped_on_both_ends() {
        let clipped = clip_to_frame(Segment::new(-5, -5, 15, 15), FRAME).unwrap();
        assert_eq!(clipped, Segment::new(0, 0, 10, 10));
    }

    #[test]
    fn clipped_endpoints_stay_on_the_boundary() {
        for seg in [
            Segment::new(-7, 3, 12, 9),
            Segment::new(5, -20, 5, 20),
            Segment::new(-1, 11, 11, -1),
        ] {
            let clipped = clip_to_frame(seg, FRAME).unwrap();
            for (x, y) in [(clipped.x1, clipped.y1), (clipped.x2, clipped.y2)] {
                assert!((FRAME.x_min..=FRAME.x_max).contains(&x));
                assert!((FRAME.y_min..=FRAME.y_max).contains(&y));
            }
        }
    }
}
