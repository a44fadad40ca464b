//! View state for the recorder controls
//!
//! A serializable snapshot of what the controls should show.

use super::timer::format_time;
use crate::capture::QualityPreset;
use crate::export::BlobUrl;
use serde::{Deserialize, Serialize};

/// One entry of the quality selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityOption {
    pub value: QualityPreset,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub quality: QualityPreset,
    pub quality_options: Vec<QualityOption>,
    pub sharing: bool,
    pub share_button_label: String,
    pub recording: bool,
    pub can_start_recording: bool,
    pub can_stop_recording: bool,
    /// `HH:MM:SS`, only while recording
    pub timer_text: Option<String>,
    pub can_download: bool,
    pub preview_url: Option<BlobUrl>,
}

impl ViewState {
    pub(crate) fn build(
        quality: QualityPreset,
        sharing: bool,
        recording: bool,
        elapsed_secs: u64,
        artifact_url: Option<BlobUrl>,
    ) -> Self {
        let quality_options = QualityPreset::ALL
            .iter()
            .map(|preset| QualityOption {
                value: *preset,
                label: preset.label().to_string(),
            })
            .collect();

        Self {
            quality,
            quality_options,
            sharing,
            share_button_label: if sharing { "Stop Sharing" } else { "Start Sharing" }.to_string(),
            recording,
            can_start_recording: !recording,
            can_stop_recording: recording,
            timer_text: recording.then(|| format_time(elapsed_secs)),
            can_download: artifact_url.is_some(),
            preview_url: artifact_url,
        }
    }
}
