use eframe::egui::{self, Color32};

use crate::session::LogTag;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub background: Color32,
    pub foreground: Color32,
    pub muted: Color32,
    pub accent: Color32,
    pub success: Color32,
    pub error: Color32,
    pub panel: Color32,
    pub heading_size: f32,
    pub body_size: f32,
    pub console_size: f32,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: Color32::from_rgb(0x0F, 0x17, 0x2A),
            foreground: Color32::from_rgb(0xE2, 0xE8, 0xF0),
            muted: Color32::from_rgb(0x94, 0xA3, 0xB8),
            accent: Color32::from_rgb(0x38, 0xBD, 0xF8),
            success: Color32::from_rgb(0x4A, 0xDE, 0x80),
            error: Color32::from_rgb(0xF8, 0x71, 0x71),
            panel: Color32::from_rgb(0x1E, 0x29, 0x3B),
            heading_size: 24.0,
            body_size: 15.0,
            console_size: 13.0,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            background: Color32::WHITE,
            foreground: Color32::from_rgb(0x1A, 0x1A, 0x2E),
            muted: Color32::from_rgb(0x64, 0x74, 0x8B),
            accent: Color32::from_rgb(0x0F, 0x34, 0x60),
            success: Color32::from_rgb(0x1E, 0x8A, 0x5A),
            error: Color32::from_rgb(0xC7, 0x3E, 0x1D),
            panel: Color32::from_rgb(0xF5, 0xF5, 0xF5),
            heading_size: 24.0,
            body_size: 15.0,
            console_size: 13.0,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn is_dark(&self) -> bool {
        self.name == "dark"
    }

    pub fn visuals(&self) -> egui::Visuals {
        let mut visuals = if self.is_dark() {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        visuals.panel_fill = self.background;
        visuals
    }

    /// Apply opacity to a color
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), (opacity * 255.0) as u8)
    }

    pub fn log_color(&self, tag: LogTag) -> Color32 {
        match tag {
            LogTag::Plain => self.foreground,
            LogTag::Header => self.accent,
            LogTag::Success => self.success,
            LogTag::Error => self.error,
            LogTag::Placeholder => self.muted,
        }
    }

    pub fn blocked_color(&self, blocked: bool) -> Color32 {
        if blocked { self.error } else { self.success }
    }
}
