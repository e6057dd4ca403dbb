//! Fixed user-facing texts and selection labels
//!
//! Pure output formatting over the state machine's data. All wording lives
//! here so the engine deals only in state transitions.

use crate::chart::ChartError;
use crate::domain::{ChartPoint, ZodiacSign};
use crate::geo::GeoError;
use crate::session::StateTag;
use crate::validation::ValidationError;

/// Label of the reset control offered alongside the chart points
pub const NEW_CHART_LABEL: &str = "New chart";

pub fn greeting() -> String {
    "Hi! I can calculate your natal chart from your birth date, time, and place.\n\
     Send \"next\" whenever you are ready to begin."
        .to_string()
}

pub fn date_prompt() -> String {
    "Enter your birth date in DD.MM.YYYY format:".to_string()
}

pub fn time_prompt() -> String {
    "Enter your birth time in HH:MM format:".to_string()
}

pub fn place_prompt() -> String {
    "Enter your birth place (city):".to_string()
}

pub fn chart_ready() -> String {
    "Done! Your natal chart is ready. Choose a position to read about:".to_string()
}

/// The prompt matching a collection state
pub fn prompt_for(tag: StateTag) -> String {
    match tag {
        StateTag::AwaitingDate => date_prompt(),
        StateTag::AwaitingTime => time_prompt(),
        StateTag::AwaitingPlace => place_prompt(),
        StateTag::ChartReady => chart_ready(),
    }
}

/// All selectable labels in `ChartReady`: ten bodies, ascendant, reset
pub fn selection_labels() -> Vec<String> {
    ChartPoint::all()
        .map(|p| p.label().to_string())
        .chain(std::iter::once(NEW_CHART_LABEL.to_string()))
        .collect()
}

/// Rendering of one stored chart point
pub fn position_text(point: ChartPoint, degree: f64, sign: ZodiacSign, description: &str) -> String {
    format!("{}: {:.2}\u{b0} in {}\nDescription: {}", point.label(), degree, sign, description)
}

pub fn unknown_selection() -> String {
    "Please choose one of the listed positions.".to_string()
}

/// Fixed message for a failed validation, shown without changing state
pub fn validation_message(error: &ValidationError) -> String {
    match error {
        ValidationError::InvalidDateFormat => {
            "That date doesn't look right. Please enter it in DD.MM.YYYY format.".to_string()
        }
        ValidationError::FutureYear { .. } => {
            "That date doesn't look right. That year has not arrived yet.".to_string()
        }
        ValidationError::InvalidTimeFormat => {
            "That time doesn't look right. Please enter it in HH:MM format (for example, 14:30).".to_string()
        }
    }
}

/// Fixed message for a failed place resolution or chart computation
pub fn resolution_message(error: &ChartError) -> String {
    match error {
        ChartError::Geo(GeoError::PlaceNotFound) => {
            "Unfortunately I could not find that place on the map. Please enter an existing city.".to_string()
        }
        ChartError::Geo(GeoError::TimezoneUnknown) => {
            "The timezone for that place could not be determined. Please try a nearby city.".to_string()
        }
        ChartError::Geo(_) => "The map service is not answering right now. Please try again.".to_string(),
        _ => "Something went wrong while computing the chart. Please try again.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CelestialBody;

    #[test]
    fn test_selection_labels_cover_all_points_plus_reset() {
        let labels = selection_labels();
        assert_eq!(labels.len(), 12);
        assert_eq!(labels[0], "Sun");
        assert_eq!(labels[10], "Ascendant");
        assert_eq!(labels[11], NEW_CHART_LABEL);
    }

    #[test]
    fn test_position_rendering() {
        let text = position_text(
            ChartPoint::Body(CelestialBody::Sun),
            84.321,
            ZodiacSign::Gemini,
            "curious and quick",
        );
        assert_eq!(text, "Sun: 84.32\u{b0} in Gemini\nDescription: curious and quick");
    }

    #[test]
    fn test_error_messages_are_distinct() {
        let date = validation_message(&ValidationError::InvalidDateFormat);
        let year = validation_message(&ValidationError::FutureYear { cutoff: 2024 });
        let time = validation_message(&ValidationError::InvalidTimeFormat);
        assert_ne!(date, year);
        assert_ne!(date, time);
    }
}
