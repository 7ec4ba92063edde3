#![allow(dead_code)]

use anyhow::{anyhow, Context, Result};
use prost::Message;
use prost_types::{FileDescriptorProto, FileDescriptorSet};
use protoscribe::ProtoSource;
use std::fs;
use std::sync::Once;
use tracing_subscriber::EnvFilter;

/// Routes library logs through the test harness; filter with `RUST_LOG`
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Compiles `target` out of a set of in-memory files
pub fn compile_set(files: &[(&str, &str)], target: &str) -> Result<FileDescriptorSet> {
    let dir = tempfile::tempdir()?;
    for (name, source) in files {
        fs::write(dir.path().join(name), source)?;
    }

    protox::compile([dir.path().join(target)], [dir.path()])
        .map_err(|e| anyhow!("failed to compile {}: {}", target, e))
}

/// Compiles `target` and returns its own descriptor
pub fn compile(files: &[(&str, &str)], target: &str) -> Result<FileDescriptorProto> {
    compile_set(files, target)?
        .file
        .into_iter()
        .find(|f| f.name() == target)
        .context("compiled file missing from descriptor set")
}

/// Compiles `target`, encodes it, and renders it back through the byte path
pub fn render_compiled(files: &[(&str, &str)], target: &str) -> Result<String> {
    let bytes = compile(files, target)?.encode_to_vec();
    Ok(ProtoSource::from_bytes(&bytes)?.render())
}

/// Renders `target`, recompiles the rendered text, and renders again.
///
/// Returns both renderings; other files are kept as given.
pub fn round_trip(files: &[(&str, &str)], target: &str) -> Result<(String, String)> {
    let first = render_compiled(files, target)?;

    let rewritten: Vec<(&str, &str)> = files
        .iter()
        .map(|&(name, source)| {
            if name == target {
                (name, first.as_str())
            } else {
                (name, source)
            }
        })
        .collect();
    let second = render_compiled(&rewritten, target)?;

    Ok((first, second))
}
