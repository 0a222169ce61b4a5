//! Test fixtures: job configurations and row generators.

use std::io::Write;

use inkrip::JobConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::NamedTempFile;

/// Six-ink printer: light/dark cyan and magenta, yellow, black with
/// virtual black and an ink limit.
pub const PHOTO_6: &str = r#"
src_width: 64
dst_width: 128
algorithm: eventone
ink_limit: 140000
black_channel: 3
aspect: { x: 1440, y: 720 }
channels:
  - name: cyan
    subchannels:
      - { value: 1.0 }
      - { value: 0.3, cutoff: 0.7 }
  - name: magenta
    subchannels:
      - { value: 1.0 }
      - { value: 0.35 }
  - name: yellow
    subchannels:
      - { value: 1.0 }
  - name: black
    subchannels:
      - { value: 1.0 }
    dot_sizes:
      - { value: 0.5, bits: 1 }
      - { value: 1.0, bits: 2 }
"#;

/// [`PHOTO_6`] dithered with `algorithm`
pub fn photo_6(algorithm: &str) -> String {
    PHOTO_6.replace("algorithm: eventone", &format!("algorithm: {algorithm}"))
}

/// Single black ink, one dot size
pub fn mono(algorithm: &str, width: usize) -> String {
    format!(
        "src_width: {width}\ndst_width: {width}\nalgorithm: {algorithm}\nchannels:\n  - subchannels: [{{ value: 1.0 }}]\n"
    )
}

/// Parse a fixture, panicking on errors
pub fn config(yaml: &str) -> JobConfig {
    JobConfig::from_yaml_str(yaml).expect("fixture must parse")
}

/// Write `yaml` to a temporary file that lives as long as the handle
pub fn write_config(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(yaml.as_bytes()).expect("write temp file");
    file
}

/// Seeded generator so failures reproduce
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// A row of uniformly random samples
pub fn random_row(rng: &mut StdRng, width: usize, channels: usize) -> Vec<u16> {
    (0..width * channels).map(|_| rng.gen_range(0..=65535u16)).collect()
}

/// A row where every pixel has the same samples
pub fn flat_row(width: usize, pixel: &[u16]) -> Vec<u16> {
    pixel.iter().copied().cycle().take(width * pixel.len()).collect()
}
