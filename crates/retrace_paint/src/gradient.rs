//! Gradient objects owned by a [`Canvas2D`](crate::Canvas2D)

use retrace_core::{LiveGradient, Point};
use serde::Serialize;
use slotmap::{new_key_type, Key, KeyData};

new_key_type! {
    /// Slot key of a gradient inside a canvas
    pub struct GradientKey;
}

impl GradientKey {
    /// The opaque handle handed out through [`Value::Gradient`](retrace_core::Value::Gradient)
    pub fn to_live(self) -> LiveGradient {
        LiveGradient(self.data().as_ffi())
    }

    pub fn from_live(live: LiveGradient) -> Self {
        GradientKey::from(KeyData::from_ffi(live.0))
    }
}

/// Gradient geometry
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GradientKind {
    /// Linear gradient between two points
    Linear { start: Point, end: Point },
    /// Radial gradient between two circles
    Radial {
        start: Point,
        start_radius: f32,
        end: Point,
        end_radius: f32,
    },
}

/// Gradient stop
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GradientStop {
    /// Position along the gradient (0.0 to 1.0)
    pub offset: f32,
    /// CSS color at this stop
    pub color: String,
}

/// A gradient and its color stops, kept sorted by offset
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CanvasGradient {
    pub kind: GradientKind,
    pub stops: Vec<GradientStop>,
}

impl CanvasGradient {
    pub fn new(kind: GradientKind) -> Self {
        Self {
            kind,
            stops: Vec::new(),
        }
    }

    /// Insert a stop after any existing stops at the same offset
    pub fn add_stop(&mut self, offset: f32, color: impl Into<String>) {
        let at = self.stops.partition_point(|s| s.offset <= offset);
        self.stops.insert(
            at,
            GradientStop {
                offset,
                color: color.into(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn test_stops_stay_sorted() {
        let mut g = CanvasGradient::new(GradientKind::Linear {
            start: Point::ZERO,
            end: Point::new(10.0, 0.0),
        });
        g.add_stop(1.0, "blue");
        g.add_stop(0.0, "red");
        g.add_stop(0.5, "green");
        let offsets: Vec<f32> = g.stops.iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_live_key_round_trip() {
        let mut map: SlotMap<GradientKey, u8> = SlotMap::with_key();
        let key = map.insert(7);
        assert_eq!(GradientKey::from_live(key.to_live()), key);
    }
}
