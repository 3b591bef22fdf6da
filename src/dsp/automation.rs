//! Scheduled parameter timelines.

/*
Parameter Automation
====================

Percussive sounds are mostly envelopes: a pitch that falls, a level that
dies away. Instead of a gate-driven ADSR state machine, every control value
here is a timeline of events anchored to absolute times (seconds on the
render clock). The timeline is written once when a voice is built and read
back sample by sample during rendering.

Events
------

  Set(v, t)        Jump to v at time t and hold.

  Linear(v, t)     Ramp in a straight line from the previous event's value
                   (at the previous event's time) to v, arriving at t.

  Exponential(v, t) Ramp geometrically from the previous value to v:

                       value(τ) = v0 · (v1 / v0) ^ ((τ - t0) / (t1 - t0))

                   Both ends must be non-zero and share a sign, so decays
                   target a small floor (0.001, roughly -60 dB) rather than 0.

Shape of a kick's level timeline
--------------------------------

    level
      L ┤████▇▆▅▄▃▂▂▁▁▁
        │    ↑          ‾‾‾‾────___
        │   hold              decay
    0.001┼──────────────────────────────→ time
         t0  t0+10ms              t0+10ms+decay

Cancel and hold
---------------

A fade-out must start from whatever value the timeline has *right now*,
even in the middle of a ramp. `cancel_and_hold(t)` freezes the value at t,
discards every later event, and leaves the timeline ready for a fresh ramp.
*/

/// Value floor used as the target of exponential decays.
pub const SILENCE: f32 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Ramp {
    Set,
    Linear,
    Exponential,
}

#[derive(Debug, Clone, Copy)]
struct Event {
    time: f64,
    value: f32,
    ramp: Ramp,
}

/// A timeline of scheduled values for one parameter.
#[derive(Debug, Clone)]
pub struct Automation {
    default: f32,
    events: Vec<Event>,
}

impl Automation {
    pub fn new(default: f32) -> Self {
        Self {
            default,
            events: Vec::with_capacity(4),
        }
    }

    pub fn set_value_at(&mut self, value: f32, time: f64) -> &mut Self {
        self.insert(Event {
            time,
            value,
            ramp: Ramp::Set,
        })
    }

    pub fn linear_ramp_to(&mut self, value: f32, time: f64) -> &mut Self {
        self.insert(Event {
            time,
            value,
            ramp: Ramp::Linear,
        })
    }

    pub fn exponential_ramp_to(&mut self, value: f32, time: f64) -> &mut Self {
        self.insert(Event {
            time,
            value,
            ramp: Ramp::Exponential,
        })
    }

    /// Freeze the current value at `time` and drop everything scheduled after it.
    pub fn cancel_and_hold(&mut self, time: f64) -> &mut Self {
        let held = self.value_at(time);
        self.events.retain(|e| e.time <= time);
        self.set_value_at(held, time)
    }

    fn insert(&mut self, event: Event) -> &mut Self {
        // Later events at the same time win, so insert after equal timestamps
        let at = self.events.partition_point(|e| e.time <= event.time);
        self.events.insert(at, event);
        self
    }

    /// Time of the last scheduled event, if any.
    pub fn end_time(&self) -> Option<f64> {
        self.events.last().map(|e| e.time)
    }

    /// Evaluate the timeline at an absolute time.
    pub fn value_at(&self, time: f64) -> f32 {
        let next = self.events.partition_point(|e| e.time <= time);
        let prev = next.checked_sub(1).map(|i| self.events[i]);

        let Some(upcoming) = self.events.get(next) else {
            return prev.map_or(self.default, |e| e.value);
        };

        let Some(from) = prev else {
            return self.default;
        };

        let span = upcoming.time - from.time;
        if span <= 0.0 {
            return upcoming.value;
        }
        let progress = ((time - from.time) / span) as f32;

        match upcoming.ramp {
            Ramp::Set => from.value,
            Ramp::Linear => from.value + (upcoming.value - from.value) * progress,
            Ramp::Exponential => {
                let (v0, v1) = (from.value, upcoming.value);
                if v0 == 0.0 || v1 == 0.0 || (v0 > 0.0) != (v1 > 0.0) {
                    // Undefined geometric ramp: hold, then jump at the target time
                    v0
                } else {
                    v0 * (v1 / v0).powf(progress)
                }
            }
        }
    }

    /// Render consecutive values starting at `start`, one per sample.
    pub fn render(&self, buffer: &mut [f32], start: f64, sample_rate: f32) {
        let dt = 1.0 / sample_rate as f64;
        for (i, value) in buffer.iter_mut().enumerate() {
            *value = self.value_at(start + i as f64 * dt);
        }
    }
}
