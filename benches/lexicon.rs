use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lexicos::Lexicon;

// ── Hand-rolled LCG ─────────────────────────────────────────────────────────

struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0
    }
    /// Returns a value in [0, bound).
    fn next_range(&mut self, bound: u64) -> u64 {
        self.next() % bound
    }
}

// ── Lowercase words ─────────────────────────────────────────────────────────

/// Distinct words of 2..=9 letters over a skewed alphabet, so suffixes repeat.
fn generate_words(n: usize, seed: u64) -> Vec<Vec<char>> {
    const LETTERS: &[u8] = b"eeettaaoinshrdlucmfwyp";
    let mut rng = Lcg::new(seed);
    let mut set = std::collections::BTreeSet::new();
    while set.len() < n {
        let len = (rng.next_range(8) + 2) as usize;
        let word: Vec<char> = (0..len)
            .map(|_| LETTERS[rng.next_range(LETTERS.len() as u64) as usize] as char)
            .collect();
        set.insert(word);
    }
    set.into_iter().collect() // sorted & unique
}

/// The same words in a scrambled order.
fn shuffled(words: &[Vec<char>], seed: u64) -> Vec<Vec<char>> {
    let mut rng = Lcg::new(seed);
    let mut words = words.to_vec();
    for i in (1..words.len()).rev() {
        let j = rng.next_range(i as u64 + 1) as usize;
        words.swap(i, j);
    }
    words
}

// ── Benchmarks ──────────────────────────────────────────────────────────────

fn bench_build(c: &mut Criterion) {
    let words = generate_words(20_000, 42);
    let unsorted = shuffled(&words, 7);

    c.bench_function("insert_20k_unsorted", |b| {
        b.iter(|| black_box(&unsorted).iter().collect::<Lexicon>());
    });
    c.bench_function("from_sorted_20k", |b| {
        b.iter(|| Lexicon::from_sorted(black_box(&words)).unwrap());
    });
}

fn bench_delete(c: &mut Criterion) {
    let words = generate_words(20_000, 42);
    let victims = shuffled(&words, 11);

    c.bench_function("delete_1k", |b| {
        b.iter_batched(
            || Lexicon::from_sorted(&words).unwrap(),
            |mut lexicon| {
                for word in &victims[..1_000] {
                    lexicon.delete(word);
                }
                lexicon
            },
            criterion::BatchSize::LargeInput,
        );
    });
}

fn bench_queries(c: &mut Criterion) {
    let words = generate_words(20_000, 42);
    let lexicon = Lexicon::from_sorted(&words).unwrap();
    let probes = generate_words(1_000, 99);

    c.bench_function("contains_1k", |b| {
        b.iter(|| {
            probes
                .iter()
                .filter(|word| lexicon.contains(black_box(*word)))
                .count()
        });
    });

    c.bench_function("lookup_prefix", |b| {
        b.iter(|| {
            for prefix in ["e", "ta", "sho", "ne"] {
                black_box(lexicon.lookup::<String>(black_box(prefix)));
            }
        });
    });

    let phrase: Vec<char> = "theseatonthestreetwashedout".chars().collect();
    c.bench_function("words_in_phrase", |b| {
        b.iter(|| {
            for offset in 0..phrase.len() {
                black_box(lexicon.words::<String>(black_box(&phrase), offset));
            }
        });
    });
}

criterion_group!(benches, bench_build, bench_delete, bench_queries);
criterion_main!(benches);
