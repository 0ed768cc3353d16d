use crate::tuning::{EDGE_PADDING_PX, SURFACE_HEIGHT_PX, SURFACE_WIDTH_PX};

#[derive(Clone, Copy, Debug)]
pub struct AnchorRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Top-left corner for the floating surface next to an anchor. Prefers the
/// right side of the anchor, flips to the left when that would overflow the
/// right viewport edge, then clamps both axes to the edge padding.
pub fn place_beside(anchor: AnchorRect, viewport: Viewport) -> (f64, f64) {
    let mut x = anchor.right + EDGE_PADDING_PX;
    let mut y = anchor.top;
    if x + SURFACE_WIDTH_PX > viewport.width - EDGE_PADDING_PX {
        x = anchor.left - SURFACE_WIDTH_PX - EDGE_PADDING_PX;
    }
    if y < EDGE_PADDING_PX {
        y = EDGE_PADDING_PX;
    }
    if y + SURFACE_HEIGHT_PX > viewport.height - EDGE_PADDING_PX {
        y = viewport.height - SURFACE_HEIGHT_PX - EDGE_PADDING_PX;
    }
    if x < EDGE_PADDING_PX {
        x = EDGE_PADDING_PX;
    }
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Viewport = Viewport {
        width: 1920.0,
        height: 1080.0,
    };

    fn anchor(left: f64, top: f64, width: f64, height: f64) -> AnchorRect {
        AnchorRect {
            left,
            top,
            right: left + width,
            bottom: top + height,
        }
    }

    #[test]
    fn prefers_right_of_anchor() {
        let (x, y) = place_beside(anchor(100.0, 300.0, 200.0, 40.0), VIEW);
        assert_eq!(x, 300.0 + EDGE_PADDING_PX);
        assert_eq!(y, 300.0);
    }

    #[test]
    fn flips_left_when_right_edge_overflows() {
        let (x, _) = place_beside(anchor(1600.0, 300.0, 200.0, 40.0), VIEW);
        assert_eq!(x, 1600.0 - SURFACE_WIDTH_PX - EDGE_PADDING_PX);
    }

    #[test]
    fn clamps_to_top_and_bottom_padding() {
        let (_, y) = place_beside(anchor(100.0, 2.0, 200.0, 40.0), VIEW);
        assert_eq!(y, EDGE_PADDING_PX);
        let (_, y) = place_beside(anchor(100.0, 1050.0, 200.0, 40.0), VIEW);
        assert_eq!(y, VIEW.height - SURFACE_HEIGHT_PX - EDGE_PADDING_PX);
    }

    #[test]
    fn never_leaves_the_left_padding() {
        // Narrow viewport: both sides overflow, the left clamp wins.
        let tight = Viewport {
            width: 500.0,
            height: 800.0,
        };
        let (x, _) = place_beside(anchor(40.0, 100.0, 120.0, 40.0), tight);
        assert_eq!(x, EDGE_PADDING_PX);
    }
}
