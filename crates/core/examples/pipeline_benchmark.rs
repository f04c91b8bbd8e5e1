//! Lightweight tokenize/parse/emit benchmark harness for local baselines.
//!
//! Run from repository root:
//! `cargo run -p fxml_core --example pipeline_benchmark --release`

use std::fs;
use std::time::Instant;

use fxml_core::{EmitConfig, emit_fxml, parse_str, tokenize};

fn per_iter_ms(elapsed: std::time::Duration, iterations: usize) -> f64 {
    elapsed.as_secs_f64() * 1000.0 / iterations as f64
}

fn run_benchmark(label: &str, input: &str, iterations: usize) -> Result<(), String> {
    let tokenize_start = Instant::now();
    for _ in 0..iterations {
        let _ = tokenize(input);
    }
    let tokenize_elapsed = tokenize_start.elapsed();

    let parse_start = Instant::now();
    for _ in 0..iterations {
        let _ = parse_str(input);
    }
    let parse_elapsed = parse_start.elapsed();

    let doc = parse_str(input).map_err(|e| format!("sample '{label}' does not parse:\n{e}"))?;
    let emit_cfg = EmitConfig::indented(2);

    let emit_start = Instant::now();
    for _ in 0..iterations {
        let _ = emit_fxml(&doc, &emit_cfg);
    }
    let emit_elapsed = emit_start.elapsed();

    println!("Benchmark: {label}");
    println!("  input_bytes: {}", input.len());
    println!(
        "  tokenize: total={:?}, per_iter={:.3} ms",
        tokenize_elapsed,
        per_iter_ms(tokenize_elapsed, iterations)
    );
    println!(
        "  parse:    total={:?}, per_iter={:.3} ms",
        parse_elapsed,
        per_iter_ms(parse_elapsed, iterations)
    );
    println!(
        "  emit:     total={:?}, per_iter={:.3} ms",
        emit_elapsed,
        per_iter_ms(emit_elapsed, iterations)
    );
    Ok(())
}

/// A wide, shallow document with attributes and mixed text.
fn synthetic(items: usize) -> String {
    let mut out = String::from("list(kind=synthetic){\n");
    for i in 0..items {
        out.push_str(&format!(
            "  item(id={i} label=\"entry \\u00e9 {i}\"){{text {i} b{{bold}} tail}}\n"
        ));
    }
    out.push('}');
    out
}

fn main() -> Result<(), String> {
    let iterations = std::env::var("FXML_BENCH_ITERS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(500);

    let path = "samples/page.fxml";
    let page = fs::read_to_string(path).map_err(|e| format!("failed to read sample '{path}': {e}"))?;
    run_benchmark("page", &page, iterations)?;
    run_benchmark("synthetic_1k", &synthetic(1_000), iterations.div_ceil(10))?;

    Ok(())
}
