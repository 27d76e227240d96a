use std::fmt;

use crate::assembler::TrackSample;

/// Frame count and extrema of one log.
///
/// A maximum is `None` when no sample carried the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSummary {
    pub frames: u64,
    pub max_altitude: Option<f64>,
    pub max_horizontal_speed: Option<f64>,
    pub max_vertical_speed: Option<f64>,
}

impl SessionSummary {
    pub fn from_samples<'a, I>(samples: I) -> Self
    where
        I: IntoIterator<Item = &'a TrackSample>,
    {
        let mut summary = SessionSummary::default();
        for sample in samples {
            summary.observe(sample);
        }
        summary
    }

    /// Folds one more sample in.
    pub fn observe(&mut self, sample: &TrackSample) {
        self.frames += 1;
        fold_max(&mut self.max_altitude, sample.altitude);
        fold_max(&mut self.max_horizontal_speed, sample.horizontal_speed);
        fold_max(&mut self.max_vertical_speed, sample.vertical_speed);
    }
}

#[inline]
fn fold_max(acc: &mut Option<f64>, value: Option<f64>) {
    if let Some(v) = value {
        *acc = Some(acc.map_or(v, |a| a.max(v)));
    }
}

struct Measure(Option<f64>, &'static str);

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{:.6} {}", v, self.1),
            None => write!(f, "no data"),
        }
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Total frames: {}", self.frames)?;
        writeln!(f, "Max. altitude: {}", Measure(self.max_altitude, "m"))?;
        writeln!(f, "Max. horizontal speed: {}", Measure(self.max_horizontal_speed, "m/s"))?;
        write!(f, "Max. vertical speed: {}", Measure(self.max_vertical_speed, "m/s"))
    }
}
