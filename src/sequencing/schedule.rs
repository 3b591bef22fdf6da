/*
Step Schedule
=============

Time is measured in sixteenth notes. At `bpm` beats per minute a beat lasts
60/bpm seconds and holds four steps, so

  step = 60 / bpm / 4 = 15 / bpm seconds

A pattern cycle is 16 steps (one bar of 4/4). For each step i of an iteration
that starts at t0:

  if pattern[i % 16] is set:
      time  = t0 + i · step
      decay = kick_decay · (0.7 + 0.3 · accent[i])
      level = kick_level · accent[i]

Accents shorten the tail as well as lowering the level: a ghost note (accent
0.5) keeps 85% of the decay and half of the level.

Iterations can span more than one pattern cycle (the preview plays two back
to back); step indices simply keep counting and wrap into the pattern.
*/

use crate::{
    modes::{Mode, STEPS},
    voices::KickHit,
};

/// Seconds per sixteenth note.
#[inline]
pub fn step_duration(bpm: f32) -> f64 {
    15.0 / bpm as f64
}

/// Seconds covered by `cycles` passes over the 16-step pattern.
#[inline]
pub fn iteration_duration(bpm: f32, cycles: usize) -> f64 {
    step_duration(bpm) * (STEPS * cycles) as f64
}

/// A fully computed schedule for one iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct Iteration {
    pub start: f64,
    pub duration: f64,
    pub hits: Vec<KickHit>,
}

impl Iteration {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Walk `cycles` pattern cycles of `mode` starting at `start`.
pub fn schedule_iteration(mode: &Mode, start: f64, cycles: usize) -> Iteration {
    let step = step_duration(mode.bpm);
    let kick = mode.kick;

    let hits = (0..STEPS * cycles)
        .filter(|&i| mode.pattern.is_hit(i))
        .map(|i| {
            let accent = mode.pattern.accent(i);
            KickHit {
                step: i,
                time: start + i as f64 * step,
                pitch: kick.pitch_hz,
                decay: kick.decay_s * (0.7 + accent * 0.3),
                level: kick.level * accent,
            }
        })
        .collect();

    Iteration {
        start,
        duration: iteration_duration(mode.bpm, cycles),
        hits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::{ModeName, FUZZ, TUBE};

    #[test]
    fn step_is_a_sixteenth() {
        assert_eq!(step_duration(120.0), 0.125);
        assert_eq!(step_duration(60.0), 0.25);
        assert!((step_duration(145.0) - 0.10345).abs() < 1e-5);
        assert!((iteration_duration(145.0, 1) - 1.655).abs() < 1e-3);
    }

    #[test]
    fn tube_iteration_has_five_hits() {
        let iteration = schedule_iteration(&TUBE, 2.0, 1);
        let steps: Vec<usize> = iteration.hits.iter().map(|h| h.step).collect();
        assert_eq!(steps, vec![0, 4, 8, 11, 14]);

        let step = step_duration(TUBE.bpm);
        for hit in &iteration.hits {
            assert!((hit.time - (2.0 + hit.step as f64 * step)).abs() < 1e-12);
            assert_eq!(hit.pitch, 52.0);
        }
        assert!((iteration.end() - (2.0 + 16.0 * step)).abs() < 1e-12);
    }

    #[test]
    fn accents_shape_decay_and_level() {
        let iteration = schedule_iteration(&FUZZ, 0.0, 1);
        let first = iteration.hits[0];
        assert_eq!(first.level, FUZZ.kick.level * FUZZ.pattern.accent(0));
        assert!((first.decay - FUZZ.kick.decay_s).abs() < 1e-6);

        let ghost = iteration
            .hits
            .iter()
            .find(|h| FUZZ.pattern.accent(h.step) < 1.0)
            .copied()
            .unwrap();
        let accent = FUZZ.pattern.accent(ghost.step);
        assert!((ghost.decay - FUZZ.kick.decay_s * (0.7 + accent * 0.3)).abs() < 1e-6);
    }

    #[test]
    fn multi_cycle_iteration_repeats_pattern() {
        let mode = crate::modes::Mode::get(ModeName::Fold);
        let single = schedule_iteration(mode, 0.0, 1);
        let double = schedule_iteration(mode, 0.0, 2);

        assert_eq!(double.hits.len(), single.hits.len() * 2);
        assert!((double.duration - single.duration * 2.0).abs() < 1e-12);
        assert_eq!(double.hits[single.hits.len()].step, single.hits[0].step + STEPS);
    }
}
