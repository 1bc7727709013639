//! Heap-instrumented leak check for the arena
//!
//! Runs under the dhat allocator in its own binary (`harness = false`), so no
//! other test can disturb the global heap counters.

use jsonarena::{Arena, Document, parse};

#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

fn workload(arena: &mut Arena) {
    let sizes = [0usize, 1, 8, 33, 100, 700, 2048, 4080, 5000, 70_000];
    let mut live = Vec::new();
    for round in 0..20 {
        for &size in &sizes {
            let ptr = arena.allocate(size + round).unwrap();
            live.push(ptr);
        }
        if let Some(ptr) = live.pop() {
            arena.release(ptr).unwrap();
        }
    }
    if let Some(&first) = live.first() {
        let grown = arena.reallocate(first, 20_000).unwrap();
        live[0] = grown;
    }

    let text = r#"{"items": [1, 2.5, "three", {"four": [null, true, false]}], "name": "leak"}"#;
    parse(text.as_bytes(), arena).unwrap();
}

fn main() {
    let _profiler = dhat::Profiler::builder().testing().build();

    // Warm up process-wide state (hasher seeds, tracing callsites)
    {
        let mut arena = Arena::new();
        workload(&mut arena);
        arena.reset();
    }
    let baseline = dhat::HeapStats::get();

    {
        let mut arena = Arena::new();
        workload(&mut arena);
        arena.reset();
        workload(&mut arena);
    }
    {
        let doc = Document::parse_str(r#"[{"a": "b"}, [[], {}], "x"]"#).unwrap();
        assert_eq!(doc.root().as_array().map(|a| a.len()), Some(3));
    }

    let after = dhat::HeapStats::get();
    dhat::assert_eq!(after.curr_blocks, baseline.curr_blocks);
    dhat::assert_eq!(after.curr_bytes, baseline.curr_bytes);
    dhat::assert!(after.total_blocks > baseline.total_blocks);
}
