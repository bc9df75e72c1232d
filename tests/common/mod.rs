//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use rand::RngCore;
use std::path::PathBuf;
use tempfile::TempDir;

/// Mersenne Twister matching numpy's legacy `RandomState`.
///
/// Seeding with an integer reproduces `np.random.seed(seed)`, so fixtures drawn
/// here match the reference values computed from the same seed.
pub struct Mt19937 {
    state: [u32; 624],
    index: usize,
}

impl Mt19937 {
    pub fn new(seed: u32) -> Self {
        let mut state = [0u32; 624];
        state[0] = seed;
        for i in 1..624 {
            let prev = state[i - 1];
            state[i] = 1812433253u32
                .wrapping_mul(prev ^ (prev >> 30))
                .wrapping_add(i as u32);
        }
        Self { state, index: 624 }
    }

    fn twist(&mut self) {
        for i in 0..624 {
            let y = (self.state[i] & 0x8000_0000) | (self.state[(i + 1) % 624] & 0x7fff_ffff);
            let mut next = self.state[(i + 397) % 624] ^ (y >> 1);
            if y & 1 != 0 {
                next ^= 0x9908_b0df;
            }
            self.state[i] = next;
        }
        self.index = 0;
    }

    /// `np.random.rand()`: 53-bit uniform in [0, 1)
    pub fn rand(&mut self) -> f64 {
        let a = (self.next_u32() >> 5) as f64;
        let b = (self.next_u32() >> 6) as f64;
        (a * 67108864.0 + b) / 9007199254740992.0
    }

    /// `np.random.randint(high)`: masked rejection sampling in [0, high)
    pub fn randint(&mut self, high: u32) -> u32 {
        let max = high - 1;
        let mut mask = max;
        for shift in [1, 2, 4, 8, 16] {
            mask |= mask >> shift;
        }
        loop {
            let v = self.next_u32() & mask;
            if v <= max {
                return v;
            }
        }
    }
}

impl RngCore for Mt19937 {
    fn next_u32(&mut self) -> u32 {
        if self.index >= 624 {
            self.twist();
        }
        let mut y = self.state[self.index];
        self.index += 1;
        y ^= y >> 11;
        y ^= (y << 7) & 0x9d2c_5680;
        y ^= (y << 15) & 0xefc6_0000;
        y ^= y >> 18;
        y
    }

    fn next_u64(&mut self) -> u64 {
        let hi = self.next_u32() as u64;
        let lo = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

pub const FIXTURE_ROWS: usize = 500;

/// The seeded 500-row fixture drawn in numpy order:
/// `rand(500)`, `randint(2, 500)`, `randint(100, 500)` twice, `randint(8, 500)`.
pub struct Fixture {
    pub feature: Vec<f64>,
    pub target: Vec<u8>,
    pub a: Vec<i64>,
    pub b: Vec<i64>,
    pub mask: Vec<u32>,
}

pub fn fixture() -> Fixture {
    let mut rng = Mt19937::new(1);
    let feature = (0..FIXTURE_ROWS).map(|_| rng.rand()).collect();
    let target = (0..FIXTURE_ROWS).map(|_| rng.randint(2) as u8).collect();
    let a = (0..FIXTURE_ROWS).map(|_| rng.randint(100) as i64).collect();
    let b = (0..FIXTURE_ROWS).map(|_| rng.randint(100) as i64).collect();
    let mask = (0..FIXTURE_ROWS).map(|_| rng.randint(8)).collect();
    Fixture {
        feature,
        target,
        a,
        b,
        mask,
    }
}

/// Fixture as a frame with columns `feature`, `target`, `A`, `B`
pub fn create_fixture_dataframe() -> DataFrame {
    let f = fixture();
    let target: Vec<i64> = f.target.iter().map(|&t| t as i64).collect();
    df! {
        "feature" => f.feature,
        "target" => target,
        "A" => f.a,
        "B" => f.b,
    }
    .unwrap()
}

/// Categorical labels drawn by `mask`, where code 0 is the missing marker
pub fn masked_labels() -> Vec<Option<String>> {
    const LABELS: [Option<&str>; 8] = [
        None,
        Some("A"),
        Some("B"),
        Some("C"),
        Some("D"),
        Some("E"),
        Some("F"),
        Some("G"),
    ];
    fixture()
        .mask
        .iter()
        .map(|&m| LABELS[m as usize].map(str::to_string))
        .collect()
}

/// Frame with the masked categorical `feature` and the fixture `target`
pub fn create_masked_dataframe() -> DataFrame {
    let f = fixture();
    let target: Vec<i64> = f.target.iter().map(|&t| t as i64).collect();
    df! {
        "feature" => masked_labels(),
        "target" => target,
    }
    .unwrap()
}

/// Small mixed-type frame for report and CLI tests
pub fn create_test_dataframe() -> DataFrame {
    df! {
        "target" => [0i32, 1, 0, 1, 0, 1, 0, 1, 0, 1, 1, 0],
        "score" => [0.1f64, 0.9, 0.2, 0.8, 0.3, 0.7, 0.25, 0.95, 0.15, 0.6, 0.85, 0.35],
        "grade" => [Some("c"), Some("a"), Some("c"), Some("a"), None, Some("b"),
                    Some("c"), Some("a"), Some("b"), Some("b"), Some("a"), None],
        "flat" => [5.0f64; 12],
        "empty" => [None::<f64>; 12],
    }
    .unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_data.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Assert two floats agree to within `tolerance`
pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} (+/- {}), got {}",
        expected,
        tolerance,
        actual
    );
}
