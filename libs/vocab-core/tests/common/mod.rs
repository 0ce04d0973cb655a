//! Common test utilities for integration tests.

pub mod fixtures;

use rand::rngs::StdRng;
use rand::SeedableRng;

use vocab_core::{MemoryProgressStore, QuizEngine, QuizSettings, VocabularyCatalog};

pub type TestEngine = QuizEngine<VocabularyCatalog, MemoryProgressStore>;

/// Install a test subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn catalog() -> VocabularyCatalog {
    VocabularyCatalog::from_json_str(fixtures::CATALOG_JSON).expect("fixture catalog is valid")
}

/// Engine over the fixture catalog with a seeded random source.
pub fn engine(seed: u64) -> TestEngine {
    engine_with(MemoryProgressStore::new(), QuizSettings::default(), seed)
}

pub fn engine_with(store: MemoryProgressStore, settings: QuizSettings, seed: u64) -> TestEngine {
    init_tracing();
    QuizEngine::new(catalog(), store, settings, StdRng::seed_from_u64(seed))
        .expect("engine builds")
}
