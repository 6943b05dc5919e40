#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use csrkit::csr::params::SubjectIdentity;
use csrkit::csr::{CsrBuilder, GeneratedCsr, generate_csr};
use csrkit::error::{CsrError, Result};
use csrkit::key::{KeyGenerator, KeyPair, RsaKeyGenerator};

pub fn example_identity() -> SubjectIdentity {
    SubjectIdentity::builder()
        .common_name("example.com")
        .organization("Acme Corp")
        .email("admin@example.com")
        .build()
}

/// One request for `example_identity()`, generated once per test binary.
pub fn example_csr() -> &'static GeneratedCsr {
    static CSR: OnceLock<GeneratedCsr> = OnceLock::new();
    CSR.get_or_init(|| generate_csr(&example_identity()).unwrap())
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Wraps the default generator and counts how often it is asked for a key.
#[derive(Default)]
pub struct CountingKeyGenerator {
    inner: RsaKeyGenerator,
    calls: AtomicUsize,
}

impl CountingKeyGenerator {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl KeyGenerator for CountingKeyGenerator {
    fn generate(&self) -> Result<KeyPair> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.generate()
    }
}

pub fn counting_builder() -> (CsrBuilder, Arc<CountingKeyGenerator>) {
    let generator = Arc::new(CountingKeyGenerator::default());
    let builder = CsrBuilder::builder()
        .key_generator(generator.clone() as Arc<dyn KeyGenerator>)
        .build();
    (builder, generator)
}

/// A provider that cannot produce keys, counting how often it was asked.
#[derive(Default)]
pub struct FailingKeyGenerator {
    calls: AtomicUsize,
}

impl FailingKeyGenerator {
    pub const MESSAGE: &'static str = "entropy unavailable";

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl KeyGenerator for FailingKeyGenerator {
    fn generate(&self) -> Result<KeyPair> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(CsrError::KeyGenerationError(Self::MESSAGE.to_string()))
    }
}
