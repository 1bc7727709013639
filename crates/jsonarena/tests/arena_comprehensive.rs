//! Comprehensive tests for the arena allocator
//!
//! Coverage targets:
//! - Size classes and page carving
//! - Free-list reuse after release
//! - Standalone blocks above page size
//! - Ownership validation (foreign and stale chunks)
//! - Container bodies served from arena chunks
//! - Typed construction and reset

use jsonarena::memory::{HEADER_SIZE, PAGE_SIZE, PageHeap, size_class};
use jsonarena::{Arena, ArenaError, JsonValue};

// ============================================================================
// Size classes
// ============================================================================

#[test]
fn test_chunk_sizes_are_powers_of_two() {
    for request in [0usize, 1, 8, 17, 100, 1000, 4000] {
        let size = size_class::chunk_size(request).unwrap();
        assert!(size.is_power_of_two());
        assert!(size >= request + HEADER_SIZE);
    }
}

#[test]
fn test_usable_size_covers_request() {
    let mut arena = Arena::new();
    for request in [0usize, 1, 7, 8, 9, 63, 64, 65, 500, 2000, 4080] {
        let ptr = arena.allocate(request).unwrap();
        assert!(arena.bytes(ptr).unwrap().len() >= request, "{request}");
    }
}

#[test]
fn test_zero_sized_allocation() {
    let mut arena = Arena::new();
    let ptr = arena.allocate(0).unwrap();
    assert!(!ptr.is_large());
    arena.release(ptr).unwrap();
}

// ============================================================================
// Pages and free lists
// ============================================================================

#[test]
fn test_many_small_allocations_fill_pages() {
    let mut arena = Arena::new();
    for _ in 0..1000 {
        arena.allocate(48).unwrap();
    }
    let stats = arena.stats().heap;
    assert_eq!(stats.live_chunks, 1000);
    assert_eq!(stats.pages, (1000 * 64usize).div_ceil(PAGE_SIZE));
    assert_eq!(stats.reserved_bytes, stats.pages * PAGE_SIZE);
}

#[test]
fn test_released_chunks_are_recycled_by_class() {
    let mut arena = Arena::new();
    let chunks: Vec<_> = (0..10).map(|_| arena.allocate(100).unwrap()).collect();
    let pages = arena.stats().heap.pages;
    for ptr in &chunks {
        arena.release(*ptr).unwrap();
    }
    assert_eq!(arena.stats().heap.free_chunks, 10);

    for _ in 0..10 {
        let ptr = arena.allocate(90).unwrap();
        assert!(!chunks.contains(&ptr));
    }
    assert!(
        chunks
            .iter()
            .all(|ptr| arena.bytes(*ptr) == Err(ArenaError::StaleChunk))
    );
    let stats = arena.stats().heap;
    assert_eq!(stats.pages, pages);
    assert_eq!(stats.free_list_hits, 10);
    assert_eq!(stats.free_chunks, 0);
}

#[test]
fn test_freed_chunk_not_served_for_larger_class() {
    let mut arena = Arena::new();
    let small = arena.allocate(8).unwrap();
    arena.release(small).unwrap();
    let bigger = arena.allocate(200).unwrap();
    assert_ne!(small, bigger);
    assert_eq!(arena.stats().heap.free_chunks, 1);
}

// ============================================================================
// Standalone blocks
// ============================================================================

#[test]
fn test_large_blocks_never_recycled() {
    let mut arena = Arena::new();
    let big = arena.allocate(3 * PAGE_SIZE).unwrap();
    assert!(big.is_large());
    arena.release(big).unwrap();

    let again = arena.allocate(3 * PAGE_SIZE).unwrap();
    assert_ne!(big, again);
    let stats = arena.stats().heap;
    assert_eq!(stats.large_blocks, 1);
    assert_eq!(stats.free_chunks, 0);
}

#[test]
fn test_page_boundary_request_goes_standalone() {
    let mut arena = Arena::new();
    let fits = arena.allocate(PAGE_SIZE - HEADER_SIZE).unwrap();
    assert!(!fits.is_large());
    let spills = arena.allocate(PAGE_SIZE - HEADER_SIZE + 1).unwrap();
    assert!(spills.is_large());
}

#[test]
fn test_reallocate_preserves_contents() {
    let mut arena = Arena::new();
    let mut ptr = arena.allocate(4).unwrap();
    arena.bytes_mut(ptr).unwrap()[..4].copy_from_slice(b"json");
    for size in [30, 200, 3000, 9000, 40_000] {
        ptr = arena.reallocate(ptr, size).unwrap();
        assert_eq!(&arena.bytes(ptr).unwrap()[..4], b"json");
    }
    assert!(ptr.is_large());
    assert_eq!(arena.stats().heap.live_chunks, 1);
}

// ============================================================================
// Ownership validation
// ============================================================================

#[test]
fn test_release_foreign_pointer_fails() {
    let mut ours = Arena::new();
    let mut theirs = Arena::new();
    let foreign = theirs.allocate(16).unwrap();

    assert_eq!(ours.release(foreign), Err(ArenaError::ForeignChunk));
    assert_eq!(ours.bytes(foreign), Err(ArenaError::ForeignChunk));
    assert!(theirs.release(foreign).is_ok());
}

#[test]
fn test_release_after_reset_fails() {
    let mut arena = Arena::new();
    let ptr = arena.allocate(16).unwrap();
    arena.reset();
    assert_eq!(arena.release(ptr), Err(ArenaError::ForeignChunk));
}

#[test]
fn test_stale_after_move() {
    let mut arena = Arena::new();
    let ptr = arena.allocate(8).unwrap();
    let moved = arena.reallocate(ptr, 512).unwrap();
    assert_ne!(ptr, moved);
    assert_eq!(arena.reallocate(ptr, 1024), Err(ArenaError::StaleChunk));
}

#[test]
fn test_heap_usable_directly() {
    let mut heap = PageHeap::default();
    let ptr = heap.allocate(24).unwrap();
    assert_eq!(ptr.origin(), heap.tag());
    assert_eq!(heap.usable_size(ptr).unwrap(), 48);
}

// ============================================================================
// Typed construction
// ============================================================================

#[test]
fn test_typed_construction_counts() {
    let mut arena = Arena::new();
    let root = arena.new_object().unwrap();
    let list = arena.new_array().unwrap();
    for i in 0..5i64 {
        arena.push(list, JsonValue::from(i)).unwrap();
    }
    arena.insert(root, "list", list.into()).unwrap();
    let name = arena.alloc_str("jsonarena").unwrap();
    arena.insert(root, "name", name).unwrap();

    let stats = arena.stats();
    assert_eq!(stats.arrays, 1);
    assert_eq!(stats.objects, 1);
    // two keys, one string, the element list and the entry list
    assert_eq!(stats.heap.live_chunks, 5);

    let node = arena.node(root.into()).unwrap();
    assert_eq!(node.get("name").and_then(|n| n.as_str()), Some("jsonarena"));
    assert_eq!(node.get("list").unwrap().as_array().unwrap().len(), 5);
}

#[test]
fn test_parsed_containers_live_in_arena_chunks() {
    let mut arena = Arena::new();
    let text = format!("[{}]", vec![r#"[0,{"k":0}]"#; 1000].join(","));
    let root = jsonarena::parse(text.as_bytes(), &mut arena).unwrap();

    let stats = arena.stats();
    assert_eq!(stats.arrays, 1001);
    assert_eq!(stats.objects, 1000);
    // per item: element list, entry list and key; plus the outer element list
    assert_eq!(stats.heap.live_chunks, 3 * 1000 + 1);
    assert!(stats.heap.pages > 1);

    let last = arena.node(root).unwrap().at(999).unwrap();
    assert_eq!(last.at(0).and_then(|n| n.as_i64()), Some(0));
    assert_eq!(last.at(1).and_then(|o| o.get("k")).and_then(|n| n.as_i64()), Some(0));
}

#[test]
fn test_empty_containers_take_no_chunks() {
    let mut arena = Arena::new();
    jsonarena::parse(b"[[], {}, [[]]]", &mut arena).unwrap();
    let stats = arena.stats();
    assert_eq!(stats.arrays, 4);
    assert_eq!(stats.objects, 1);
    // outer list and the list holding `[]`
    assert_eq!(stats.heap.live_chunks, 2);
}

#[test]
fn test_insert_into_foreign_object_takes_no_chunk() {
    let mut a = Arena::new();
    let mut b = Arena::new();
    let theirs = b.new_object().unwrap();
    assert_eq!(
        a.insert(theirs, "k", JsonValue::Null),
        Err(ArenaError::ForeignHandle)
    );
    assert_eq!(a.stats().heap.live_chunks, 0);
}

#[test]
fn test_insert_foreign_value_rejected() {
    let mut a = Arena::new();
    let mut b = Arena::new();
    let obj = a.new_object().unwrap();
    let foreign = b.new_array().unwrap();
    assert_eq!(
        a.insert(obj, "k", foreign.into()),
        Err(ArenaError::ForeignHandle)
    );
    assert_eq!(a.stats().heap.live_chunks, 0);
}

#[test]
fn test_reset_releases_everything() {
    let mut arena = Arena::new();
    jsonarena::parse(br#"{"a": ["x", "y", {"b": "z"}]}"#, &mut arena).unwrap();
    arena.allocate(10_000).unwrap();
    assert!(arena.stats().heap.reserved_bytes > 0);

    arena.reset();
    let stats = arena.stats();
    assert_eq!(stats.heap.reserved_bytes, 0);
    assert_eq!(stats.heap.live_chunks, 0);
    assert_eq!(stats.arrays, 0);
    assert_eq!(stats.objects, 0);
}
