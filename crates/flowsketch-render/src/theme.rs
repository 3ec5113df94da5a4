//! The three visual themes and their rendering parameters.

use flowsketch_core::Theme;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeConfig {
    pub stroke_width: f64,
    pub jitter_amount: f64,
    pub fill_opacity: f64,
    pub font_family: &'static str,
    pub double_stroke: bool,
    pub corner_radius: f64,
}

impl ThemeConfig {
    /// `jitterAmount > 0` implies sketchy path rendering; native primitives otherwise.
    pub fn is_sketchy(&self) -> bool {
        self.jitter_amount > 0.0
    }
}

pub fn config_for(theme: Theme) -> ThemeConfig {
    match theme {
        Theme::HandDrawn => ThemeConfig {
            stroke_width: 1.5,
            jitter_amount: 2.0,
            fill_opacity: 0.15,
            font_family: "\"Segoe Print\", \"Comic Sans MS\", cursive",
            double_stroke: true,
            corner_radius: 0.0,
        },
        Theme::Clean => ThemeConfig {
            stroke_width: 1.5,
            jitter_amount: 0.0,
            fill_opacity: 0.10,
            font_family: "Inter, Helvetica, Arial, sans-serif",
            double_stroke: false,
            corner_radius: 3.0,
        },
        Theme::Minimal => ThemeConfig {
            stroke_width: 1.0,
            jitter_amount: 0.0,
            fill_opacity: 0.05,
            font_family: "Inter, Helvetica, Arial, sans-serif",
            double_stroke: false,
            corner_radius: 3.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hand_drawn_is_the_only_sketchy_theme() {
        assert!(config_for(Theme::HandDrawn).is_sketchy());
        assert!(!config_for(Theme::Clean).is_sketchy());
        assert!(!config_for(Theme::Minimal).is_sketchy());
    }

    #[test]
    fn minimal_differs_from_clean_only_in_stroke_width_and_opacity() {
        let clean = config_for(Theme::Clean);
        let minimal = config_for(Theme::Minimal);
        assert_eq!(clean.font_family, minimal.font_family);
        assert_eq!(clean.double_stroke, minimal.double_stroke);
        assert_eq!(clean.corner_radius, minimal.corner_radius);
        assert_eq!(clean.jitter_amount, minimal.jitter_amount);
        assert_ne!(clean.stroke_width, minimal.stroke_width);
        assert_ne!(clean.fill_opacity, minimal.fill_opacity);
    }
}
