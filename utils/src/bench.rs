use std::{env, fs, time::Duration};

use criterion::{BatchSize, Criterion};
use serde::Deserialize;

use crate::{
    fixture::{batches, verify, Todo},
    project_root,
    solutions::{run, Solution},
};

/// Environment variable holding the path of an optional TOML file overriding [BenchConfig].
pub const CONFIG_VAR: &str = "SHARETREE_BENCH_CONFIG";

/// Size of the todo workload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Number of writes
    pub batches: usize,
    /// Number of todos per write
    pub batch_size: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        BenchConfig {
            batches: 10,
            batch_size: 100,
        }
    }
}

impl BenchConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    /// Reads the file named by [CONFIG_VAR], relative to the workspace root, or returns the
    /// default configuration if the variable isn't set.
    pub fn from_env() -> Self {
        let Ok(path) = env::var(CONFIG_VAR) else {
            return BenchConfig::default();
        };
        let path = project_root::resolve(path);
        let content = fs::read_to_string(&path)
            .unwrap_or_else(|err| panic!("Failed to read {}: {err}", path.display()));
        BenchConfig::from_toml_str(&content)
            .unwrap_or_else(|err| panic!("Invalid bench configuration {}: {err}", path.display()))
    }

    pub fn total(&self) -> usize {
        self.batches * self.batch_size
    }

    pub fn workload(&self) -> Vec<Vec<Todo>> {
        batches(self.batches, self.batch_size)
    }
}

pub fn criterion_config() -> Criterion {
    Criterion::default()
        .warm_up_time(Duration::from_millis(500))
        .measurement_time(Duration::from_secs(3))
        .configure_from_args()
}

/// Benchmarks writing the whole workload with `S`, after checking that `S` computes the
/// expected state.
pub fn bench_solution<S: Solution>(c: &mut Criterion, config: &BenchConfig) {
    let workload = config.workload();

    let state = run::<S>(&workload).read();
    if let Err(err) = verify(&state, config.total()) {
        panic!("{} computed a wrong state: {err}", S::NAME);
    }

    let name = format!(
        "{} {}x{}",
        S::NAME,
        config.batches,
        config.batch_size
    );
    c.bench_function(&name, |b| {
        b.iter_batched(
            || workload.clone(),
            |workload| run::<S>(&workload).read(),
            BatchSize::LargeInput,
        )
    });
}
