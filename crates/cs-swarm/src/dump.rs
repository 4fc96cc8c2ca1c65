//! Plain-text per-iteration particle dumps for offline inspection.

use std::fmt::Write as _;
use std::fs::{File, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};

use cs_types::CsResult;

use crate::particle::Particle;

/// Appends one line per particle per iteration to a text file.
///
/// Columns are the iteration number, the particle index, the position
/// components, the velocity components, and the current fitness, all in
/// standardized coordinates.
#[derive(Debug, Clone)]
pub struct ParticleDump {
    path: PathBuf,
}

impl ParticleDump {
    /// Truncates any existing file at `path`.
    pub fn create(path: impl AsRef<Path>) -> CsResult<Self> {
        let path = path.as_ref().to_path_buf();
        File::create(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot(&self, iteration: usize, particles: &[Particle]) -> CsResult<()> {
        let mut text = String::new();
        for (index, particle) in particles.iter().enumerate() {
            let _ = write!(text, "{:>6} {:>6}", iteration, index);
            for x in &particle.position {
                let _ = write!(text, " {:>14.6e}", x);
            }
            for v in &particle.velocity {
                let _ = write!(text, " {:>14.6e}", v);
            }
            let _ = writeln!(text, " {:>14.6e}", particle.fitness);
        }
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        file.write_all(text.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::tempdir;

    fn swarm(popsize: usize, dim: usize) -> Vec<Particle> {
        let mut rng = StdRng::seed_from_u64(5);
        (0..popsize)
            .map(|_| Particle::init(dim, 0.2, &mut rng))
            .collect()
    }

    #[test]
    fn test_snapshots_append_one_line_per_particle() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("swarm_dump.txt");
        let dump = ParticleDump::create(&path).unwrap();
        let particles = swarm(6, 4);

        dump.snapshot(0, &particles).unwrap();
        dump.snapshot(1, &particles).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 12);
        // iteration, index, 4 position, 4 velocity, fitness
        assert_eq!(lines[0].split_whitespace().count(), 11);
        assert!(lines[0].starts_with("     0      0"));
        assert!(lines[6].starts_with("     1      0"));
    }

    #[test]
    fn test_create_truncates_previous_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("swarm_dump.txt");
        std::fs::write(&path, "stale\n").unwrap();

        let dump = ParticleDump::create(&path).unwrap();
        dump.snapshot(0, &swarm(2, 2)).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains("stale"));
        assert_eq!(text.lines().count(), 2);
    }
}
