use overlay::algorithms::shortest_path::PathResult;
use overlay::{Document, Handle, MemoryDrawing, Point3, Shape};
use std::time::Instant;

fn build_grid(side: usize) -> (Document<MemoryDrawing>, Vec<Handle>) {
    let mut doc = Document::new(MemoryDrawing::new());
    let mut vs = Vec::with_capacity(side * side);
    for j in 0..side {
        for i in 0..side {
            let at = Point3::xy(i as f64 * 400.0, j as f64 * 300.0);
            match doc.create_vertex(Shape::Circle, at, "") {
                Ok(h) => vs.push(h),
                Err(err) => {
                    eprintln!("vertex creation failed: {}", err);
                    std::process::exit(2);
                }
            }
        }
    }
    for j in 0..side {
        for i in 0..side {
            let a = vs[j * side + i];
            if i + 1 < side { let _ = doc.create_edge(a, vs[j * side + i + 1], vec![]); }
            if j + 1 < side { let _ = doc.create_edge(a, vs[(j + 1) * side + i], vec![]); }
        }
    }
    (doc, vs)
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() { return 0.0; }
    let idx = ((sorted.len() as f64 - 1.0) * p).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut side = 12usize;
    let mut queries = 500usize;
    let mut assert_ms: Option<f64> = None;
    for a in &args[1..] {
        if let Some(val) = a.strip_prefix("--side=") { if let Ok(v) = val.parse() { side = v; } }
        else if let Some(val) = a.strip_prefix("--queries=") { if let Ok(v) = val.parse() { queries = v; } }
        else if let Some(val) = a.strip_prefix("--assert-ms=") { if let Ok(v) = val.parse() { assert_ms = Some(v); } }
    }
    let side = side.max(2);

    let (doc, vs) = build_grid(side);
    // LCG for reproducible endpoint pairs
    let mut seed: u64 = 0x9E37_79B9_7F4A_7C15;
    let mut next = || { seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1); (seed >> 33) as usize };

    let mut times_ms: Vec<f64> = Vec::with_capacity(queries);
    let start_all = Instant::now();
    let mut found = 0usize;
    for _ in 0..queries {
        let a = vs[next() % vs.len()];
        let b = vs[next() % vs.len()];
        let t0 = Instant::now();
        if let Ok(PathResult::Found { .. }) = doc.find_path(a, b) { found += 1; }
        times_ms.push(t0.elapsed().as_secs_f64() * 1000.0);
    }
    let dur_all = start_all.elapsed().as_secs_f64() * 1000.0;
    times_ms.sort_by(|a, b| a.total_cmp(b));
    let med = percentile(&times_ms, 0.5);
    let p90 = percentile(&times_ms, 0.9);
    let p99 = percentile(&times_ms, 0.99);
    println!(
        "vertices={} edges={} queries={} found={} total_ms={:.3} median_ms={:.4} p90_ms={:.4} p99_ms={:.4}",
        doc.model().vertex_count(), doc.model().edge_count(), queries, found, dur_all, med, p90, p99
    );
    if let Some(th) = assert_ms { if med > th { eprintln!("FAIL: median {:.4} ms > threshold {:.3} ms", med, th); std::process::exit(1); } }
}
