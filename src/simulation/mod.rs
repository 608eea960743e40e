//! Synthetic parameter generation for the simulate endpoints.
//!
//! Draws match the live capture pipeline's value ranges so simulated rows
//! are indistinguishable from real ones downstream. The generator is
//! seedable for reproducible test data.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde_json::{json, Value};

/// Ordered energy buckets, lowest to highest
pub const EMOTIONAL_STATES: [&str; 5] = ["calm", "excited", "joyful", "focused", "energetic"];

pub const SOUND_TYPES: [&str; 5] = ["bass", "percussion", "melody", "ambient", "vocal"];

pub const VISUALIZATION_TYPES: [&str; 5] = ["holographic", "projection", "laser", "led", "mist"];

/// Map a normalized energy level to its emotional-state label.
/// Index is floor(energy * 5), clamped so energy 1.0 stays in the last bucket.
pub fn emotional_state_for(energy_level: f64) -> &'static str {
    let index = ((energy_level * EMOTIONAL_STATES.len() as f64) as usize)
        .min(EMOTIONAL_STATES.len() - 1);
    EMOTIONAL_STATES[index]
}

#[derive(Debug, Clone)]
pub struct SimulatedBiometrics {
    pub heart_rate: f64,
    pub gsr: f64,
    pub temperature: f64,
    pub energy_level: f64,
    pub emotional_state: &'static str,
}

#[derive(Debug, Clone)]
pub struct SimulatedMovement {
    pub data_type: &'static str,
    pub coordinates: Value,
    pub velocity: f64,
    pub crowd_density: f64,
    pub movement_intensity: f64,
}

#[derive(Debug, Clone)]
pub struct SimulatedSound {
    pub sound_type: &'static str,
    pub parameters: Value,
    pub duration: f64,
    pub intensity: f64,
}

#[derive(Debug, Clone)]
pub struct SimulatedVisualization {
    pub visualization_type: &'static str,
    pub parameters: Value,
    pub duration: f64,
    pub intensity: f64,
}

/// Random generator behind all simulate endpoints
pub struct Simulator {
    rng: StdRng,
}

impl Simulator {
    /// Seed from the given value, or from entropy when no seed is supplied
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Draw a synthetic biometric reading
    pub fn biometrics(&mut self) -> SimulatedBiometrics {
        let heart_rate = Normal::new(80.0, 15.0).unwrap().sample(&mut self.rng);
        let gsr = self.rng.gen_range(0.5..5.0);
        let temperature = Normal::new(36.9, 0.5).unwrap().sample(&mut self.rng);
        let energy_level: f64 = self.rng.gen_range(0.0..1.0);

        SimulatedBiometrics {
            heart_rate,
            gsr,
            temperature,
            energy_level,
            emotional_state: emotional_state_for(energy_level),
        }
    }

    /// Draw positions and velocities for a synthetic crowd
    pub fn movement(&mut self, num_dancers: u32) -> SimulatedMovement {
        let mut dancers = Vec::with_capacity(num_dancers as usize);
        let mut speed_sum = 0.0;

        for id in 0..num_dancers {
            let x: f64 = self.rng.gen_range(0.0..100.0);
            let y: f64 = self.rng.gen_range(0.0..100.0);
            let velocity_x: f64 = self.rng.gen_range(-2.0..2.0);
            let velocity_y: f64 = self.rng.gen_range(-2.0..2.0);
            speed_sum += (velocity_x * velocity_x + velocity_y * velocity_y).sqrt();

            dancers.push(json!({
                "id": id,
                "x": x,
                "y": y,
                "velocity_x": velocity_x,
                "velocity_y": velocity_y,
            }));
        }

        let velocity = if num_dancers > 0 {
            speed_sum / num_dancers as f64
        } else {
            0.0
        };

        SimulatedMovement {
            data_type: "heatmap",
            coordinates: json!({ "dancers": dancers }),
            velocity,
            crowd_density: num_dancers as f64 / 100.0,
            movement_intensity: self.rng.gen_range(0.0..1.0),
        }
    }

    /// Draw a synthetic sound event; the parameter shape depends on the type
    pub fn sound(&mut self) -> SimulatedSound {
        let sound_type = *SOUND_TYPES.choose(&mut self.rng).unwrap();

        let parameters = match sound_type {
            "bass" => json!({
                "frequency": self.rng.gen_range(30.0..120.0),
                "resonance": self.rng.gen_range(0.1..0.9),
                "envelope": {
                    "attack": self.rng.gen_range(0.01..0.2),
                    "decay": self.rng.gen_range(0.1..0.5),
                    "sustain": self.rng.gen_range(0.3..0.8),
                    "release": self.rng.gen_range(0.2..1.0),
                },
            }),
            "percussion" => json!({
                "type": *["kick", "snare", "hihat", "clap"].choose(&mut self.rng).unwrap(),
                "pitch": self.rng.gen_range(0.5..1.5),
                "decay": self.rng.gen_range(0.1..2.0),
                "filter": {
                    "cutoff": self.rng.gen_range(200.0..8000.0),
                    "resonance": self.rng.gen_range(0.1..0.9),
                },
            }),
            _ => json!({
                "waveform": *["sine", "square", "sawtooth", "triangle"].choose(&mut self.rng).unwrap(),
                "frequency": self.rng.gen_range(100.0..1000.0),
                "modulation": {
                    "type": *["am", "fm", "none"].choose(&mut self.rng).unwrap(),
                    "depth": self.rng.gen_range(0.0..1.0),
                    "rate": self.rng.gen_range(0.1..10.0),
                },
            }),
        };

        SimulatedSound {
            sound_type,
            parameters,
            duration: self.rng.gen_range(0.5..5.0),
            intensity: self.rng.gen_range(0.0..1.0),
        }
    }

    /// Draw a synthetic visualization event
    pub fn visualization(&mut self) -> SimulatedVisualization {
        let visualization_type = *VISUALIZATION_TYPES.choose(&mut self.rng).unwrap();

        let parameters = match visualization_type {
            "holographic" => json!({
                "density": self.rng.gen_range(0.1..1.0),
                "color": {
                    "hue": self.rng.gen_range(0.0..360.0),
                    "saturation": self.rng.gen_range(0.5..1.0),
                    "brightness": self.rng.gen_range(0.5..1.0),
                },
                "pattern": *["wave", "spiral", "pulse", "geometric"].choose(&mut self.rng).unwrap(),
                "rotation_speed": self.rng.gen_range(0.0..10.0),
            }),
            "projection" => json!({
                "resolution": *["720p", "1080p", "4K"].choose(&mut self.rng).unwrap(),
                "brightness": self.rng.gen_range(0.5..1.0),
                "mapping": *["flat", "3d", "curved"].choose(&mut self.rng).unwrap(),
                "content": *["abstract", "geometric", "particle", "fluid"].choose(&mut self.rng).unwrap(),
            }),
            _ => json!({
                "color_scheme": *["monochrome", "complementary", "analogous", "triadic"]
                    .choose(&mut self.rng)
                    .unwrap(),
                "speed": self.rng.gen_range(0.1..5.0),
                "complexity": self.rng.gen_range(0.1..1.0),
                "reactivity": self.rng.gen_range(0.1..1.0),
            }),
        };

        SimulatedVisualization {
            visualization_type,
            parameters,
            duration: self.rng.gen_range(0.5..10.0),
            intensity: self.rng.gen_range(0.0..1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_mapping_is_deterministic() {
        assert_eq!(emotional_state_for(0.0), "calm");
        assert_eq!(emotional_state_for(0.19), "calm");
        assert_eq!(emotional_state_for(0.2), "excited");
        assert_eq!(emotional_state_for(0.5), "joyful");
        assert_eq!(emotional_state_for(0.99), "energetic");
        // 1.0 would index past the end without the clamp
        assert_eq!(emotional_state_for(1.0), "energetic");
    }

    #[test]
    fn biometrics_stay_in_expected_ranges() {
        let mut simulator = Simulator::new(Some(7));
        for _ in 0..100 {
            let sample = simulator.biometrics();
            assert!(sample.gsr >= 0.5 && sample.gsr < 5.0);
            assert!(sample.energy_level >= 0.0 && sample.energy_level < 1.0);
            assert!(EMOTIONAL_STATES.contains(&sample.emotional_state));
        }
    }

    #[test]
    fn same_seed_gives_same_draws() {
        let a = Simulator::new(Some(42)).biometrics();
        let b = Simulator::new(Some(42)).biometrics();
        assert_eq!(a.heart_rate, b.heart_rate);
        assert_eq!(a.gsr, b.gsr);
        assert_eq!(a.energy_level, b.energy_level);
        assert_eq!(a.emotional_state, b.emotional_state);
    }

    #[test]
    fn movement_aggregates_match_the_crowd() {
        let mut simulator = Simulator::new(Some(3));
        let sample = simulator.movement(10);
        assert_eq!(sample.data_type, "heatmap");
        assert_eq!(sample.crowd_density, 0.1);
        let dancers = sample.coordinates["dancers"].as_array().unwrap();
        assert_eq!(dancers.len(), 10);
        // Mean speed of components in (-2, 2) is bounded by 2*sqrt(2)
        assert!(sample.velocity >= 0.0 && sample.velocity <= 2.0 * 2f64.sqrt());
    }

    #[test]
    fn sound_parameters_match_the_drawn_type() {
        let mut simulator = Simulator::new(Some(11));
        for _ in 0..50 {
            let sample = simulator.sound();
            assert!(SOUND_TYPES.contains(&sample.sound_type));
            match sample.sound_type {
                "bass" => assert!(sample.parameters.get("envelope").is_some()),
                "percussion" => assert!(sample.parameters.get("filter").is_some()),
                _ => assert!(sample.parameters.get("waveform").is_some()),
            }
            assert!(sample.duration >= 0.5 && sample.duration < 5.0);
        }
    }

    #[test]
    fn visualization_parameters_match_the_drawn_type() {
        let mut simulator = Simulator::new(Some(13));
        for _ in 0..50 {
            let sample = simulator.visualization();
            assert!(VISUALIZATION_TYPES.contains(&sample.visualization_type));
            match sample.visualization_type {
                "holographic" => assert!(sample.parameters.get("rotation_speed").is_some()),
                "projection" => assert!(sample.parameters.get("resolution").is_some()),
                _ => assert!(sample.parameters.get("color_scheme").is_some()),
            }
            assert!(sample.duration >= 0.5 && sample.duration < 10.0);
        }
    }
}
