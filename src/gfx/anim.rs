use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// Linear. Loop segments always use this.
    #[default]
    None,
    InOut,
    Power1Out,
    Power2Out,
    Power4Out,
    ExpoOut,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::None => t,
            Ease::InOut => ease_in_out(t),
            Ease::Power1Out => 1.0 - (1.0 - t).powi(2),
            Ease::Power2Out => 1.0 - (1.0 - t).powi(3),
            Ease::Power4Out => power4_out(t),
            Ease::ExpoOut => expo_out(t),
        }
    }
}

pub fn ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

// power4 is the quintic curve
pub fn power4_out(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(5)
}

pub fn expo_out(t: f64) -> f64 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2f64.powf(-10.0 * t)
    }
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// A single eased value moving from `from` to `to`, advanced by frame deltas.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub from: f64,
    pub to: f64,
    pub duration: f64,
    pub elapsed: f64,
    pub ease: Ease,
}

impl Tween {
    pub fn new(from: f64, to: f64, duration: f64, ease: Ease) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
            ease,
        }
    }

    /// A tween that is already settled on `value`.
    pub fn settled(value: f64) -> Self {
        Self::new(value, value, 0.0, Ease::None)
    }

    pub fn advance(&mut self, dt: f64) -> f64 {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        self.value()
    }

    pub fn progress(&self) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.progress() >= 1.0
    }

    pub fn value(&self) -> f64 {
        lerp(self.from, self.to, self.ease.apply(self.progress()))
    }

    /// Restart toward a new target from wherever the value currently is.
    pub fn retarget(&mut self, to: f64, duration: f64, ease: Ease) {
        *self = Self::new(self.value(), to, duration, ease);
    }
}
