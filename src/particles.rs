//! Short-lived sparks spawned from game events.

use rand::Rng;

use crate::entity::Point;
use crate::events::{GameEvent, Rgb};

#[derive(Clone, Debug)]
pub struct Particle {
    pub pos: Point,
    pub size: f64,
    pub vx: f64,
    pub vy: f64,
    /// Fades from 1 to 0, then the particle is dropped.
    pub life: f64,
    pub decay: f64,
    pub color: Rgb,
}

#[derive(Default)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn burst(&mut self, at: Point, count: usize, color: Rgb, rng: &mut impl Rng) {
        for _ in 0..count {
            self.particles.push(Particle {
                pos: at,
                size: rng.gen::<f64>() * 4.0 + 1.0,
                vx: (rng.gen::<f64>() - 0.5) * 0.15,
                vy: (rng.gen::<f64>() - 0.5) * 0.15,
                life: 1.0,
                decay: rng.gen::<f64>() * 0.02 + 0.01,
                color,
            });
        }
    }

    pub fn spawn(&mut self, event: &GameEvent, rng: &mut impl Rng) {
        self.burst(event.position(), event.particle_count(), event.color(), rng);
    }

    pub fn update(&mut self) {
        for p in self.particles.iter_mut() {
            p.pos.x += p.vx;
            p.pos.y += p.vy;
            p.life -= p.decay;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn events_spawn_their_particle_count() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut field = ParticleField::new();
        field.spawn(&GameEvent::Won { at: Point::new(7.5, 7.5) }, &mut rng);
        assert_eq!(field.len(), 80);
        field.spawn(&GameEvent::Caught { at: Point::new(0.5, 0.5) }, &mut rng);
        assert_eq!(field.len(), 100);
        assert!(field.iter().all(|p| (1.0..5.0).contains(&p.size)));
    }

    #[test]
    fn particles_fade_out() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut field = ParticleField::new();
        field.spawn(&GameEvent::Arrived { at: Point::new(1.5, 0.5) }, &mut rng);
        field.update();
        assert_eq!(field.len(), 12);
        // Slowest decay is 0.01 per frame.
        for _ in 0..100 {
            field.update();
        }
        assert!(field.is_empty());
    }
}
