//! Inbound line decoder.

use super::Event;

const KEY_TEMP: &str = "TEMP";
const KEY_DOOR: &str = "DOOR";

/// Decode one line (terminator already stripped) into an [`Event`].
///
/// The line is split at the **first** `:`. Keys are case-sensitive.
/// A `TEMP` value must be a finite decimal; `DOOR` accepts any value,
/// including the empty string and further colons. Everything else is
/// [`Event::Malformed`]. Never panics, never blocks.
pub fn decode(line: &str) -> Event {
    let Some((key, value)) = line.split_once(':') else {
        return malformed(line);
    };

    match key {
        KEY_TEMP => match parse_celsius(value) {
            Some(celsius) => Event::TemperatureReading { celsius },
            None => malformed(line),
        },
        KEY_DOOR => Event::DoorStatus {
            status: value.to_owned(),
        },
        _ => malformed(line),
    }
}

/// `f32::from_str` also accepts `inf` and `NaN`; neither is a reading.
fn parse_celsius(value: &str) -> Option<f32> {
    value
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|c| c.is_finite())
}

fn malformed(line: &str) -> Event {
    Event::Malformed {
        raw: line.to_owned(),
    }
}
