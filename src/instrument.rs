/// Scratch instrument used when a program falls outside every range.
pub const DEFAULT_INSTRUMENT: u8 = 1;

// (first program, last program, scratch instrument), inclusive and sorted
const INSTRUMENT_RANGES: [(u8, u8, u8); 26] = [
    (0, 1, 1),      // piano
    (2, 7, 2),      // electric piano
    (8, 8, 16),     // celesta -> marimba
    (9, 10, 17),    // glockenspiel, music box -> vibraphone
    (11, 15, 19),   // chromatic percussion -> steel drum
    (16, 23, 3),    // organ
    (24, 27, 4),    // acoustic guitar
    (28, 31, 5),    // electric guitar
    (32, 39, 6),    // bass
    (40, 43, 8),    // solo strings -> cello
    (44, 47, 7),    // pizzicato
    (48, 51, 8),    // string ensemble -> cello
    (52, 55, 15),   // choir
    (56, 63, 9),    // brass -> trombone
    (64, 67, 11),   // saxophone
    (68, 71, 10),   // reed -> clarinet
    (72, 73, 12),   // flute
    (74, 79, 13),   // pipe -> wooden flute
    (80, 87, 20),   // synth lead
    (88, 95, 21),   // synth pad
    (96, 103, 21),  // synth effects -> synth pad
    (104, 107, 13), // ethnic winds -> wooden flute
    (108, 111, 4),  // kalimba etc. -> guitar
    (112, 115, 18), // percussive -> music box
    (116, 119, 19), // drums -> steel drum
    (120, 127, 21), // sound effects -> synth pad
];

/// Map a General MIDI program (0-127) to a Scratch music instrument (1-21).
pub fn map_instrument(program: u8) -> u8 {
    INSTRUMENT_RANGES
        .iter()
        .find(|(first, last, _)| (*first..=*last).contains(&program))
        .map(|(_, _, instrument)| *instrument)
        .unwrap_or(DEFAULT_INSTRUMENT)
}
