//! Reference musical notes
//!
//! The standard catalog covers C2 through B7 in equal temperament (A4 = 440
//! Hz), spelled with flats. Lower and higher octaves are omitted; they add
//! little for melodic material and the low end is poorly resolved by the
//! waterfall anyway.

use crate::error::{NoteError, Result};
use std::fmt;

/// Relative tolerance for [`NoteCatalog::lookup_nearest`].
///
/// Half steps are about 6% apart, so ±1% never straddles two notes.
pub const MATCH_TOLERANCE: f64 = 0.01;

/// Note letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Letter {
    /// C
    C,
    /// D
    D,
    /// E
    E,
    /// F
    F,
    /// G
    G,
    /// A
    A,
    /// B
    B,
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Letter::C => "C",
            Letter::D => "D",
            Letter::E => "E",
            Letter::F => "F",
            Letter::G => "G",
            Letter::A => "A",
            Letter::B => "B",
        };
        f.write_str(s)
    }
}

/// Accidental applied to a letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accidental {
    /// No accidental
    Natural,
    /// Lowered a half step
    Flat,
}

impl Accidental {
    /// Suffix used in note names: `""` or `"b"`
    pub fn symbol(self) -> &'static str {
        match self {
            Accidental::Natural => "",
            Accidental::Flat => "b",
        }
    }
}

/// A fixed pitch definition.
///
/// Two reference notes are equal when frequency, letter, octave and
/// accidental all match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceNote {
    frequency: f64,
    letter: Letter,
    octave: u8,
    accidental: Accidental,
}

impl ReferenceNote {
    /// Create a reference note
    pub const fn new(frequency: f64, letter: Letter, octave: u8, accidental: Accidental) -> Self {
        Self {
            frequency,
            letter,
            octave,
            accidental,
        }
    }

    /// Frequency in Hz
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Letter name
    pub fn letter(&self) -> Letter {
        self.letter
    }

    /// Octave number (scientific pitch notation)
    pub fn octave(&self) -> u8 {
        self.octave
    }

    /// Accidental
    pub fn accidental(&self) -> Accidental {
        self.accidental
    }

    /// Name such as `"A4"` or `"Db5"`
    pub fn full_name(&self) -> String {
        format!("{}{}{}", self.letter, self.accidental.symbol(), self.octave)
    }

    /// True when `freq` lies strictly within ±[`MATCH_TOLERANCE`] of this note
    pub fn matches(&self, freq: f64) -> bool {
        freq < self.frequency * (1.0 + MATCH_TOLERANCE)
            && freq > self.frequency * (1.0 - MATCH_TOLERANCE)
    }
}

impl fmt::Display for ReferenceNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2} Hz)", self.full_name(), self.frequency)
    }
}

const fn octave(o: u8, hz: [f64; 12]) -> [ReferenceNote; 12] {
    [
        ReferenceNote::new(hz[0], Letter::C, o, Accidental::Natural),
        ReferenceNote::new(hz[1], Letter::D, o, Accidental::Flat),
        ReferenceNote::new(hz[2], Letter::D, o, Accidental::Natural),
        ReferenceNote::new(hz[3], Letter::E, o, Accidental::Flat),
        ReferenceNote::new(hz[4], Letter::E, o, Accidental::Natural),
        ReferenceNote::new(hz[5], Letter::F, o, Accidental::Natural),
        ReferenceNote::new(hz[6], Letter::G, o, Accidental::Flat),
        ReferenceNote::new(hz[7], Letter::G, o, Accidental::Natural),
        ReferenceNote::new(hz[8], Letter::A, o, Accidental::Flat),
        ReferenceNote::new(hz[9], Letter::A, o, Accidental::Natural),
        ReferenceNote::new(hz[10], Letter::B, o, Accidental::Flat),
        ReferenceNote::new(hz[11], Letter::B, o, Accidental::Natural),
    ]
}

#[rustfmt::skip]
const STANDARD_OCTAVES: [[ReferenceNote; 12]; 6] = [
    octave(
        2,
        [
            65.41, 69.30, 73.42, 77.78, 82.41, 87.31,
            92.50, 98.00, 103.83, 110.00, 116.54, 123.47,
        ],
    ),
    octave(
        3,
        [
            130.81, 138.59, 146.83, 155.56, 164.81, 174.61,
            185.00, 196.00, 207.65, 220.00, 233.08, 246.94,
        ],
    ),
    octave(
        4,
        [
            261.63, 277.18, 293.66, 311.13, 329.63, 349.23,
            369.99, 392.00, 415.30, 440.00, 466.16, 493.88,
        ],
    ),
    octave(
        5,
        [
            523.25, 554.37, 587.33, 622.25, 659.25, 698.46,
            739.99, 783.99, 830.61, 880.00, 932.33, 987.77,
        ],
    ),
    octave(
        6,
        [
            1046.50, 1108.73, 1174.66, 1244.51, 1318.51, 1396.91,
            1479.98, 1567.98, 1661.22, 1760.00, 1864.66, 1975.53,
        ],
    ),
    octave(
        7,
        [
            2093.00, 2217.46, 2349.32, 2489.02, 2637.02, 2793.83,
            2959.96, 3135.96, 3322.44, 3520.00, 3729.31, 3951.07,
        ],
    ),
];

/// Immutable, frequency-sorted set of reference notes
#[derive(Debug, Clone, PartialEq)]
pub struct NoteCatalog {
    notes: Vec<ReferenceNote>,
}

impl Default for NoteCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl NoteCatalog {
    /// The 72-note catalog from C2 (65.41 Hz) to B7 (3951.07 Hz)
    pub fn standard() -> Self {
        Self {
            notes: STANDARD_OCTAVES.iter().flatten().copied().collect(),
        }
    }

    /// Build a catalog from arbitrary notes, sorted by frequency
    pub fn new(mut notes: Vec<ReferenceNote>) -> Result<Self> {
        if notes.is_empty() {
            return Err(NoteError::EmptyCatalog);
        }
        notes.sort_by(|a, b| a.frequency.total_cmp(&b.frequency));
        Ok(Self { notes })
    }

    /// First note (lowest frequency first) within ±1% of `freq`
    ///
    /// A miss is not an error: frequencies between notes or off either end
    /// of the catalog simply have no match.
    ///
    /// ```rust
    /// use notefall_notes::NoteCatalog;
    ///
    /// let catalog = NoteCatalog::standard();
    /// assert_eq!(catalog.lookup_nearest(443.5).unwrap().full_name(), "A4");
    /// assert!(catalog.lookup_nearest(450.0).is_none());
    /// ```
    pub fn lookup_nearest(&self, freq: f64) -> Option<&ReferenceNote> {
        self.notes.iter().find(|n| n.matches(freq))
    }

    /// Lowest catalog frequency
    pub fn min_frequency(&self) -> f64 {
        self.notes[0].frequency
    }

    /// Highest catalog frequency
    pub fn max_frequency(&self) -> f64 {
        self.notes[self.notes.len() - 1].frequency
    }

    /// Index of `note` in frequency order
    pub fn position(&self, note: &ReferenceNote) -> Option<usize> {
        self.notes.iter().position(|n| n == note)
    }

    /// All notes in frequency order
    pub fn notes(&self) -> &[ReferenceNote] {
        &self.notes
    }

    /// Iterate notes in frequency order
    pub fn iter(&self) -> std::slice::Iter<'_, ReferenceNote> {
        self.notes.iter()
    }

    /// Number of notes
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Always false; catalogs hold at least one note
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

impl<'a> IntoIterator for &'a NoteCatalog {
    type Item = &'a ReferenceNote;
    type IntoIter = std::slice::Iter<'a, ReferenceNote>;

    fn into_iter(self) -> Self::IntoIter {
        self.notes.iter()
    }
}
