//! Just-intonation ratio tables, indexed by semitone above the tonic.

use crate::music::JIFlavor;

pub type RatioTable = [f64; 12];

pub fn scale_ratios(flavor: JIFlavor) -> &'static RatioTable {
    match flavor {
        JIFlavor::FiveLimit => &FIVE_LIMIT,
        JIFlavor::SevenLimit => &SEVEN_LIMIT,
        JIFlavor::Pythagorean => &PYTHAGOREAN,
    }
}

const FIVE_LIMIT: RatioTable = [
    1.0,
    16.0 / 15.0,
    9.0 / 8.0,
    6.0 / 5.0,
    5.0 / 4.0,
    4.0 / 3.0,
    45.0 / 32.0,
    3.0 / 2.0,
    8.0 / 5.0,
    5.0 / 3.0,
    9.0 / 5.0,
    15.0 / 8.0,
];

const SEVEN_LIMIT: RatioTable = [
    1.0,
    15.0 / 14.0,
    9.0 / 8.0,
    7.0 / 6.0,
    5.0 / 4.0,
    4.0 / 3.0,
    7.0 / 5.0,
    3.0 / 2.0,
    14.0 / 9.0,
    5.0 / 3.0,
    7.0 / 4.0,
    15.0 / 8.0,
];

// Pure fifths
const PYTHAGOREAN: RatioTable = [
    1.0,
    256.0 / 243.0,
    9.0 / 8.0,
    32.0 / 27.0,
    81.0 / 64.0,
    4.0 / 3.0,
    729.0 / 512.0,
    3.0 / 2.0,
    128.0 / 81.0,
    27.0 / 16.0,
    16.0 / 9.0,
    243.0 / 128.0,
];
