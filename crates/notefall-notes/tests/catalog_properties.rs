//! Property tests for note lookup and resynthesis.

use notefall_notes::{DetectedNote, MATCH_TOLERANCE, NoteCatalog, NoteGrid};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn lookup_hits_stay_within_tolerance(freq in 20.0f64..5000.0) {
        let catalog = NoteCatalog::standard();
        if let Some(note) = catalog.lookup_nearest(freq) {
            let ratio = freq / note.frequency();
            prop_assert!((ratio - 1.0).abs() < MATCH_TOLERANCE);
        }
    }

    #[test]
    fn detuned_note_finds_itself(index in 0usize..72, detune in -0.009f64..0.009) {
        let catalog = NoteCatalog::standard();
        let note = catalog.notes()[index];
        let found = catalog.lookup_nearest(note.frequency() * (1.0 + detune));
        prop_assert_eq!(found, Some(&note));
    }

    #[test]
    fn waveform_stays_in_unit_range(
        notes in prop::collection::vec((0usize..72, 0usize..6, 0.0f64..50.0), 0..12)
    ) {
        let catalog = NoteCatalog::standard();
        let hop = 0.005;
        let mut grid = NoteGrid::new((0..6u32).map(|i| f64::from(i) * hop).collect(), hop);
        for (index, chunk, amplitude) in notes {
            grid.add_one_note(DetectedNote::new(catalog.notes()[index], amplitude, chunk)).unwrap();
        }

        let wave = grid.generate_waveform(8000.0);
        prop_assert_eq!(wave.len(), 240);
        prop_assert!(wave.iter().all(|s| s.is_finite() && s.abs() <= 1.0));
    }
}
