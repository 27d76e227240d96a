#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate stratos_track;

use stratos_track::TrackReader;

fuzz_target!(|data: &[u8]| {
    let reader = TrackReader::new(data);

    for _ in reader {
        ();
    }
});
