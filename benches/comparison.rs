// Copyright © SurrealDB Ltd
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Criterion benchmarks comparing Sapling against the standard ordered set.
//!
//! This benchmark suite compares:
//! - `sapling::Tree` - Unbalanced binary search tree over an index arena
//! - `std::collections::BTreeSet` - Standard library B-tree set
//!
//! Random keys give the search tree its expected logarithmic depth. Sequential
//! keys are its worst case (a linked chain) and use smaller sizes.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::StdRng, Rng, SeedableRng};
use sapling::Tree;
use std::collections::BTreeSet;
use std::hint::black_box;

const SEED: u64 = 42;

// ============================================================================
// Helper Functions
// ============================================================================

/// Generate sequential keys from 0 to count-1
fn sequential_keys(count: usize) -> Vec<i64> {
	(0..count as i64).collect()
}

/// Generate random keys using a seeded RNG
fn random_keys(count: usize) -> Vec<i64> {
	let mut rng = StdRng::seed_from_u64(SEED);
	(0..count).map(|_| rng.random()).collect()
}

/// Generate keys that don't exist in a random key set
fn missing_keys(keys: &[i64]) -> Vec<i64> {
	let present: BTreeSet<i64> = keys.iter().copied().collect();
	let mut rng = StdRng::seed_from_u64(SEED + 1);
	let mut missing = Vec::with_capacity(keys.len());
	while missing.len() < keys.len() {
		let k: i64 = rng.random();
		if !present.contains(&k) {
			missing.push(k);
		}
	}
	missing
}

// ============================================================================
// Insert Benchmarks
// ============================================================================

fn bench_insert_sequential(c: &mut Criterion) {
	let mut group = c.benchmark_group("insert_sequential");

	for count in [100, 1_000, 5_000] {
		let keys = sequential_keys(count);
		group.throughput(Throughput::Elements(count as u64));

		group.bench_with_input(BenchmarkId::new("sapling", count), &keys, |b, keys| {
			b.iter_batched(
				Tree::new,
				|mut tree| {
					for &k in keys {
						black_box(tree.insert_new(k));
					}
					tree
				},
				criterion::BatchSize::SmallInput,
			)
		});

		group.bench_with_input(BenchmarkId::new("btreeset", count), &keys, |b, keys| {
			b.iter_batched(
				BTreeSet::new,
				|mut set| {
					for &k in keys {
						black_box(set.insert(k));
					}
					set
				},
				criterion::BatchSize::SmallInput,
			)
		});
	}
	group.finish();
}

fn bench_insert_random(c: &mut Criterion) {
	let mut group = c.benchmark_group("insert_random");

	for count in [1_000, 10_000, 100_000] {
		let keys = random_keys(count);
		group.throughput(Throughput::Elements(count as u64));

		group.bench_with_input(BenchmarkId::new("sapling", count), &keys, |b, keys| {
			b.iter_batched(
				Tree::new,
				|mut tree| {
					for &k in keys {
						black_box(tree.insert_new(k));
					}
					tree
				},
				criterion::BatchSize::SmallInput,
			)
		});

		group.bench_with_input(BenchmarkId::new("btreeset", count), &keys, |b, keys| {
			b.iter_batched(
				BTreeSet::new,
				|mut set| {
					for &k in keys {
						black_box(set.insert(k));
					}
					set
				},
				criterion::BatchSize::SmallInput,
			)
		});
	}
	group.finish();
}

// ============================================================================
// Search Benchmarks
// ============================================================================

fn bench_search(c: &mut Criterion) {
	let mut group = c.benchmark_group("search");

	for count in [1_000, 10_000, 100_000] {
		let keys = random_keys(count);
		let missing = missing_keys(&keys);
		let tree: Tree<i64> = keys.iter().copied().collect();
		let set: BTreeSet<i64> = keys.iter().copied().collect();
		group.throughput(Throughput::Elements(count as u64));

		group.bench_with_input(BenchmarkId::new("sapling_hit", count), &keys, |b, keys| {
			b.iter(|| {
				for k in keys {
					black_box(tree.search(k));
				}
			})
		});

		group.bench_with_input(BenchmarkId::new("sapling_miss", count), &missing, |b, keys| {
			b.iter(|| {
				for k in keys {
					black_box(tree.search(k));
				}
			})
		});

		group.bench_with_input(BenchmarkId::new("btreeset_hit", count), &keys, |b, keys| {
			b.iter(|| {
				for k in keys {
					black_box(set.get(k));
				}
			})
		});

		group.bench_with_input(BenchmarkId::new("btreeset_miss", count), &missing, |b, keys| {
			b.iter(|| {
				for k in keys {
					black_box(set.get(k));
				}
			})
		});
	}
	group.finish();
}

// ============================================================================
// Remove Benchmarks
// ============================================================================

fn bench_remove(c: &mut Criterion) {
	let mut group = c.benchmark_group("remove");

	for count in [1_000, 10_000, 100_000] {
		let keys = random_keys(count);
		let remove_count = count / 10; // Remove 10% of entries
		let remove_keys: Vec<i64> = keys[..remove_count].to_vec();

		group.throughput(Throughput::Elements(remove_count as u64));

		group.bench_with_input(
			BenchmarkId::new("sapling", count),
			&remove_keys,
			|b, remove_keys| {
				b.iter_batched(
					|| keys.iter().copied().collect::<Tree<i64>>(),
					|mut tree| {
						for k in remove_keys {
							black_box(tree.remove(k));
						}
						tree
					},
					criterion::BatchSize::SmallInput,
				)
			},
		);

		group.bench_with_input(
			BenchmarkId::new("btreeset", count),
			&remove_keys,
			|b, remove_keys| {
				b.iter_batched(
					|| keys.iter().copied().collect::<BTreeSet<i64>>(),
					|mut set| {
						for k in remove_keys {
							black_box(set.remove(k));
						}
						set
					},
					criterion::BatchSize::SmallInput,
				)
			},
		);
	}
	group.finish();
}

// ============================================================================
// Iteration Benchmarks
// ============================================================================

fn bench_iter(c: &mut Criterion) {
	let mut group = c.benchmark_group("iter");

	for count in [1_000, 10_000, 100_000] {
		let keys = random_keys(count);
		let tree: Tree<i64> = keys.iter().copied().collect();
		let set: BTreeSet<i64> = keys.iter().copied().collect();
		group.throughput(Throughput::Elements(count as u64));

		group.bench_function(BenchmarkId::new("sapling_forward", count), |b| {
			b.iter(|| black_box(tree.iter().fold(0i64, |acc, k| acc.wrapping_add(*k))))
		});

		group.bench_function(BenchmarkId::new("sapling_reverse", count), |b| {
			b.iter(|| black_box(tree.iter_rev().fold(0i64, |acc, k| acc.wrapping_add(*k))))
		});

		group.bench_function(BenchmarkId::new("btreeset_forward", count), |b| {
			b.iter(|| black_box(set.iter().fold(0i64, |acc, k| acc.wrapping_add(*k))))
		});
	}
	group.finish();
}

// ============================================================================
// Persistence Benchmarks
// ============================================================================

fn bench_persistence(c: &mut Criterion) {
	let mut group = c.benchmark_group("persistence");

	for count in [1_000, 10_000, 100_000] {
		let keys = random_keys(count);
		let tree: Tree<i64> = keys.iter().copied().collect();
		let mut binary = Vec::new();
		tree.write_binary(&mut binary).unwrap();
		let mut text = Vec::new();
		tree.write_text(&mut text).unwrap();
		group.throughput(Throughput::Elements(count as u64));

		group.bench_function(BenchmarkId::new("write_binary", count), |b| {
			b.iter(|| {
				let mut out = Vec::with_capacity(binary.len());
				tree.write_binary(&mut out).unwrap();
				black_box(out)
			})
		});

		group.bench_function(BenchmarkId::new("read_binary", count), |b| {
			b.iter(|| {
				let mut loaded: Tree<i64> = Tree::new();
				loaded.read_binary(binary.as_slice()).unwrap();
				black_box(loaded)
			})
		});

		group.bench_function(BenchmarkId::new("read_text", count), |b| {
			b.iter(|| {
				let mut loaded: Tree<i64> = Tree::new();
				loaded.read_text(text.as_slice()).unwrap();
				black_box(loaded)
			})
		});
	}
	group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(
	benches,
	bench_insert_sequential,
	bench_insert_random,
	bench_search,
	bench_remove,
	bench_iter,
	bench_persistence,
);

criterion_main!(benches);
