use clap::Parser;
use clap::ValueEnum;
use strmap::StrHasher;
use strmap::StrMap;
use strmap::hash::PolyHash;
use strmap::hash::RandomStrHash;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Strategy {
    Poly,
    Random,
}

#[derive(Parser, Debug)]
struct Args {
    /// Number of entries the map holds before its first growth
    #[arg(short = 'c', long = "target_capacity", default_value_t = 1000)]
    target_capacity: usize,

    /// Number of keys to insert
    #[arg(short = 'n', long = "keys", default_value_t = 1000)]
    keys: usize,

    /// Hash strategy
    #[arg(short = 's', long = "strategy", value_enum, default_value_t = Strategy::Poly)]
    strategy: Strategy,
}

fn fill<H: StrHasher>(keys: &[String], target_capacity: usize, hasher: H) {
    let mut map = StrMap::with_capacity_and_hasher(target_capacity, hasher);

    println!("Actual capacity: {} slots", map.capacity());
    println!("Inserting {} keys...", keys.len());

    let mut growths = 0;
    for (index, key) in keys.iter().enumerate() {
        let capacity = map.capacity();
        if let Err(error) = map.insert(key, &keys[keys.len() - 1 - index]) {
            println!("Insert of {key:?} failed: {error}");
            continue;
        }
        if map.capacity() != capacity {
            growths += 1;
        }
    }

    println!("Inserted {} keys, grew {} times", map.len(), growths);
    println!(
        "Final load factor: {:.2}%",
        map.load_factor() * 100.0
    );

    let histogram = map.probe_histogram();
    println!("Probe histogram:");
    for (distance, count) in histogram.iter().enumerate() {
        println!("{distance:>3} | {count}");
    }
    map.debug_stats().print();
}

fn main() {
    let args = Args::parse();

    println!(
        "Creating StrMap with target capacity: {}",
        args.target_capacity
    );

    let keys: Vec<String> = (0..args.keys).map(|i| format!("key_{i:016X}")).collect();
    match args.strategy {
        Strategy::Poly => fill(&keys, args.target_capacity, PolyHash),
        Strategy::Random => fill(&keys, args.target_capacity, RandomStrHash::default()),
    }
}
