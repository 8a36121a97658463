//! Landmark classifier - maps one 21-point hand skeleton to a gesture label
//!
//! Pure function of its input. A digit counts as extended when its tip is
//! strictly further out than both inner joints: higher in the image (smaller
//! y) for the four fingers, further from the wrist horizontally for the thumb.
//!
//! Rules are evaluated in priority order so ambiguous poses resolve toward
//! pause and shoot before movement.

use super::landmarks::{LandmarkPoint, DIGIT_JOINTS, WRIST};
use super::{GestureLabel, LandmarkFrame};

/// Confidence reported for frames that cannot be classified
pub const INCOMPLETE_CONFIDENCE: f32 = 0.1;
/// Confidence reported for complete frames that match no rule
pub const UNMATCHED_CONFIDENCE: f32 = 0.3;

const THUMB: usize = 0;
const INDEX: usize = 1;
const MIDDLE: usize = 2;
const RING: usize = 3;
const PINKY: usize = 4;

/// Classifier output before stabilization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub label: GestureLabel,
    pub confidence: f32,
    /// Second reading of the same pose, if the rule that matched has one
    pub alternate: Option<GestureLabel>,
}

impl Classification {
    fn new(label: GestureLabel, confidence: f32) -> Self {
        Self {
            label,
            confidence,
            alternate: None,
        }
    }
}

/// Which digits are extended, thumb first
pub fn extended_digits(points: &[LandmarkPoint]) -> [bool; 5] {
    let wrist = points[WRIST];
    let mut extended = [false; 5];
    for (digit, &(base, mid, tip)) in DIGIT_JOINTS.iter().enumerate() {
        let (base, mid, tip) = (points[base], points[mid], points[tip]);
        extended[digit] = if digit == THUMB {
            let reach = |p: LandmarkPoint| (p.x - wrist.x).abs();
            reach(tip) > reach(mid) && reach(tip) > reach(base)
        } else {
            tip.y < mid.y && tip.y < base.y
        };
    }
    extended
}

/// Classify a landmark frame
pub fn classify(frame: &LandmarkFrame) -> Classification {
    if !frame.is_complete() {
        return Classification::new(GestureLabel::None, INCOMPLETE_CONFIDENCE);
    }

    let up = extended_digits(frame.points());
    let up_count = up.iter().filter(|&&d| d).count();
    let others_down = !up[MIDDLE] && !up[RING] && !up[PINKY];

    if up_count == 1 && up[INDEX] {
        return Classification::new(GestureLabel::One, 0.9);
    }

    if up_count == 2 && up[INDEX] && up[THUMB] && others_down {
        return Classification::new(GestureLabel::One, 0.8);
    }

    if up_count <= 1 && !up[INDEX] {
        let confidence = if up_count == 0 { 0.95 } else { 0.9 };
        return Classification::new(GestureLabel::Fist, confidence);
    }

    if up_count >= 3 && up[INDEX] && up[MIDDLE] {
        let confidence = 0.85 + 0.05 * (up_count - 3) as f32;
        return Classification::new(GestureLabel::OpenPalm, confidence);
    }

    if up_count == 2 && up[INDEX] && up[MIDDLE] {
        return Classification {
            label: GestureLabel::OpenPalm,
            confidence: 0.8,
            alternate: Some(GestureLabel::Peace),
        };
    }

    Classification::new(GestureLabel::None, UNMATCHED_CONFIDENCE)
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    fn assert_close(actual: f32, expected: f32) {
        assert!((actual - expected).abs() < 1e-5, "{actual} != {expected}");
    }

    #[test]
    fn incomplete_frame_is_low_confidence_none() {
        let mut points = fist().points().to_vec();
        points.truncate(20);
        let result = classify(&LandmarkFrame::new(points));
        assert_eq!(result.label, GestureLabel::None);
        assert_close(result.confidence, INCOMPLETE_CONFIDENCE);

        let result = classify(&LandmarkFrame::default());
        assert_eq!(result.label, GestureLabel::None);
    }

    #[test]
    fn non_finite_points_count_as_missing() {
        let mut points = open_palm().points().to_vec();
        points[8].y = f32::NAN;
        let result = classify(&LandmarkFrame::new(points));
        assert_eq!(result.label, GestureLabel::None);
        assert_close(result.confidence, INCOMPLETE_CONFIDENCE);
    }

    #[test]
    fn index_alone_is_one() {
        let result = classify(&one());
        assert_eq!(result.label, GestureLabel::One);
        assert_close(result.confidence, 0.9);
    }

    #[test]
    fn index_with_thumb_is_tolerant_one() {
        let result = classify(&hand([true, true, false, false, false]));
        assert_eq!(result.label, GestureLabel::One);
        assert_close(result.confidence, 0.8);
    }

    #[test]
    fn closed_hand_is_fist() {
        let result = classify(&fist());
        assert_eq!(result.label, GestureLabel::Fist);
        assert_close(result.confidence, 0.95);

        let thumb_out = classify(&hand([true, false, false, false, false]));
        assert_eq!(thumb_out.label, GestureLabel::Fist);
        assert_close(thumb_out.confidence, 0.9);

        // A lone non-index finger still reads as a grip
        let middle_only = classify(&hand([false, false, true, false, false]));
        assert_eq!(middle_only.label, GestureLabel::Fist);
    }

    #[test]
    fn open_palm_confidence_scales_with_fingers() {
        let three = classify(&hand([false, true, true, true, false]));
        assert_eq!(three.label, GestureLabel::OpenPalm);
        assert_close(three.confidence, 0.85);

        let four = classify(&hand([false, true, true, true, true]));
        assert_close(four.confidence, 0.9);

        let five = classify(&open_palm());
        assert_eq!(five.label, GestureLabel::OpenPalm);
        assert_close(five.confidence, 0.95);
    }

    #[test]
    fn v_sign_is_open_palm_with_peace_alternate() {
        let result = classify(&hand([false, true, true, false, false]));
        assert_eq!(result.label, GestureLabel::OpenPalm);
        assert_close(result.confidence, 0.8);
        assert_eq!(result.alternate, Some(GestureLabel::Peace));
    }

    #[test]
    fn unmatched_pose_is_none() {
        let result = classify(&hand([false, true, false, true, false]));
        assert_eq!(result.label, GestureLabel::None);
        assert_close(result.confidence, UNMATCHED_CONFIDENCE);
    }

    #[test]
    fn classification_is_deterministic() {
        let frame = hand([true, true, true, false, true]);
        let first = classify(&frame);
        for _ in 0..10 {
            assert_eq!(classify(&frame), first);
        }
    }

    #[test]
    fn extended_digit_detection_matches_fixture() {
        let digits = [true, false, true, false, true];
        assert_eq!(extended_digits(hand(digits).points()), digits);
    }
}
