//! Fuzz target: `LineFramer::feed` followed by `decode`
//!
//! Drives arbitrary byte sequences through the framer and decodes every
//! line it yields. Neither stage may panic, no line may exceed the framer
//! limit, and a TEMP event must always carry a finite value.
//!
//! cargo fuzz run fuzz_line_decoder

#![no_main]

use homecontrol::protocol::codec::LineFramer;
use homecontrol::protocol::{Event, decode};
use libfuzzer_sys::fuzz_target;

const LIMIT: usize = 256;

fuzz_target!(|data: &[u8]| {
    let mut framer = LineFramer::new(LIMIT);
    let mut lines: Vec<String> = Vec::new();
    framer.feed(data, &mut lines);

    assert!(framer.pending() <= LIMIT, "partial line exceeds limit");

    for line in &lines {
        assert!(line.chars().count() <= LIMIT, "line exceeds limit");
        if let Event::TemperatureReading { celsius } = decode(line) {
            assert!(celsius.is_finite(), "non-finite reading escaped decoder");
        }
    }

    // After a reset the framer must accept bytes cleanly again.
    framer.reset();
    assert_eq!(framer.pending(), 0);
    framer.feed(data, &mut lines);
});
