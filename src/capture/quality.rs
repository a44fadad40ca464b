//! Capture quality presets
//!
//! Each preset maps to an ideal capture resolution. Presets only shape the
//! next stream request; an active capture is never reconfigured.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named resolution target for capture requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QualityPreset {
    /// 1920x1080
    #[default]
    #[serde(rename = "hd")]
    High,
    /// 1280x720
    #[serde(rename = "sd")]
    Standard,
    /// 640x480
    #[serde(rename = "ld")]
    Low,
}

impl QualityPreset {
    pub const ALL: [QualityPreset; 3] = [Self::High, Self::Standard, Self::Low];

    /// Ideal (width, height) in pixels
    pub fn ideal_resolution(&self) -> (u32, u32) {
        match self {
            QualityPreset::High => (1920, 1080),
            QualityPreset::Standard => (1280, 720),
            QualityPreset::Low => (640, 480),
        }
    }

    /// Short key used in config files and the quality selector
    pub fn key(&self) -> &'static str {
        match self {
            QualityPreset::High => "hd",
            QualityPreset::Standard => "sd",
            QualityPreset::Low => "ld",
        }
    }

    /// Label shown next to the selector option
    pub fn label(&self) -> &'static str {
        match self {
            QualityPreset::High => "High Quality (HD)",
            QualityPreset::Standard => "Standard Quality (SD)",
            QualityPreset::Low => "Low Quality (LD)",
        }
    }

    /// Constraints to pass to the display capture service
    pub fn constraints(&self) -> CaptureConstraints {
        let (width, height) = self.ideal_resolution();
        CaptureConstraints {
            video: VideoConstraints {
                ideal_width: width,
                ideal_height: height,
            },
            audio: AudioConstraints::default(),
        }
    }
}

impl fmt::Display for QualityPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for QualityPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hd" => Ok(QualityPreset::High),
            "sd" => Ok(QualityPreset::Standard),
            "ld" => Ok(QualityPreset::Low),
            other => Err(format!("Unknown quality preset: {}", other)),
        }
    }
}

/// Video part of a capture request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoConstraints {
    pub ideal_width: u32,
    pub ideal_height: u32,
}

/// Audio part of a capture request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioConstraints {
    pub enabled: bool,
    pub noise_suppression: bool,
    pub echo_cancellation: bool,
}

impl Default for AudioConstraints {
    fn default() -> Self {
        // Record what the screen plays, unprocessed
        Self {
            enabled: true,
            noise_suppression: false,
            echo_cancellation: false,
        }
    }
}

/// Full capture request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConstraints {
    pub video: VideoConstraints,
    pub audio: AudioConstraints,
}
