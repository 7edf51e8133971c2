use serde::{Deserialize, Serialize};

/// Describes something the presentation layer can draw.
pub trait Stimulus: Clone + Send + Sync + std::fmt::Debug {
    fn label(&self) -> &'static str;
    fn color(&self) -> [u8; 4];
}

pub const MAGENTA: [u8; 4] = [255, 0, 255, 255];
pub const YELLOW: [u8; 4] = [255, 255, 0, 255];
pub const CYAN: [u8; 4] = [0, 255, 255, 255];
pub const BLACK: [u8; 4] = [0, 0, 0, 255];

/// Filled shapes, sized in degrees of visual angle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum StimulusType {
    Circle { radius: f32, color: [u8; 4] },
    Square { width: f32, height: f32, color: [u8; 4] },
    Triangle { size: f32, color: [u8; 4] },
}

impl StimulusType {
    /// Same shape and size, different fill.
    pub fn with_color(&self, color: [u8; 4]) -> Self {
        match *self {
            StimulusType::Circle { radius, .. } => StimulusType::Circle { radius, color },
            StimulusType::Square { width, height, .. } => StimulusType::Square {
                width,
                height,
                color,
            },
            StimulusType::Triangle { size, .. } => StimulusType::Triangle { size, color },
        }
    }
}

impl Stimulus for StimulusType {
    fn label(&self) -> &'static str {
        match self {
            StimulusType::Circle { .. } => "circle",
            StimulusType::Square { .. } => "square",
            StimulusType::Triangle { .. } => "triangle",
        }
    }

    fn color(&self) -> [u8; 4] {
        match self {
            StimulusType::Circle { color, .. }
            | StimulusType::Square { color, .. }
            | StimulusType::Triangle { color, .. } => *color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recolor_keeps_geometry() {
        let cue = StimulusType::Square {
            width: 8.0,
            height: 8.0,
            color: YELLOW,
        };
        let target = cue.with_color(BLACK);
        assert_eq!(target.label(), "square");
        assert_eq!(target.color(), BLACK);
        assert!(matches!(target, StimulusType::Square { width, height, .. } if width == 8.0 && height == 8.0));
    }
}
