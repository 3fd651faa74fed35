use egui::Color32;

/// How stroke pixels combine with what is already on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Composite {
    /// Paint the stroke color over the existing pixels
    #[default]
    SourceOver,
    /// Clear covered pixels back to transparent
    Erase,
}

/// Dash pattern for outlined strokes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashPattern {
    dash: f32,
    gap: f32,
}

impl DashPattern {
    pub fn new(dash: f32, gap: f32) -> Self {
        Self {
            dash: dash.max(1.0),
            gap: gap.max(0.0),
        }
    }

    pub fn dash(&self) -> f32 {
        self.dash
    }

    pub fn gap(&self) -> f32 {
        self.gap
    }

    pub fn period(&self) -> f32 {
        self.dash + self.gap
    }
}

/// Everything a primitive needs to know about how to stroke a path.
/// Caps and joins are always round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    color: Color32,
    width: f32,
    composite: Composite,
    dash: Option<DashPattern>,
}

impl StrokeStyle {
    pub fn new(color: Color32, width: f32) -> Self {
        Self {
            color,
            width: width.max(1.0),
            composite: Composite::SourceOver,
            dash: None,
        }
    }

    /// An erasing stroke; the color is irrelevant
    pub fn eraser(width: f32) -> Self {
        Self {
            composite: Composite::Erase,
            ..Self::new(Color32::TRANSPARENT, width)
        }
    }

    pub fn dashed(mut self, pattern: DashPattern) -> Self {
        self.dash = Some(pattern);
        self
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Distance from the path within which a pixel is covered
    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    pub fn composite(&self) -> Composite {
        self.composite
    }

    pub fn dash(&self) -> Option<DashPattern> {
        self.dash
    }
}
