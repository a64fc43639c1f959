//! Pure Business Logic Functions
//!
//! Funktionen ohne Hardware-Dependencies (testbar!)

use crate::types::{BRIGHTNESS_STEP, ColorTemperature, MAX_BRIGHTNESS, MIN_BRIGHTNESS};

/// Kleinster erlaubter Encoder-Stand (MIN_BRIGHTNESS / STEP)
pub const MIN_DETENTS: i32 = (MIN_BRIGHTNESS / BRIGHTNESS_STEP) as i32;

/// Größter erlaubter Encoder-Stand (MAX_BRIGHTNESS / STEP)
pub const MAX_DETENTS: i32 = (MAX_BRIGHTNESS / BRIGHTNESS_STEP) as i32;

/// Klemmt einen Encoder-Stand in [MIN_DETENTS, MAX_DETENTS]
///
/// # Beispiele
///
/// ```
/// # use esp_core::logic::{clamp_detents, MAX_DETENTS};
/// assert_eq!(clamp_detents(33), 33);
/// assert_eq!(clamp_detents(999), MAX_DETENTS);
/// ```
pub fn clamp_detents(detents: i32) -> i32 {
    detents.clamp(MIN_DETENTS, MAX_DETENTS)
}

/// Rechnet einen Encoder-Stand in Helligkeit (Prozent) um
///
/// Der Stand wird vorher geklemmt, das Ergebnis ist immer ein Vielfaches
/// von BRIGHTNESS_STEP in [MIN_BRIGHTNESS, MAX_BRIGHTNESS].
pub fn detents_to_brightness(detents: i32) -> u8 {
    clamp_detents(detents) as u8 * BRIGHTNESS_STEP
}

/// Encoder-Stand der zu einer Helligkeit passt (für den Startwert)
pub fn brightness_to_detents(brightness: u8) -> i32 {
    clamp_detents((brightness / BRIGHTNESS_STEP) as i32)
}

/// Nächster Index im Farbtemperatur-Zyklus (2200K → 2700K → 4000K → 6500K → 2200K)
pub fn next_color_temp_index(index: usize) -> usize {
    (index + 1) % ColorTemperature::CYCLE.len()
}
