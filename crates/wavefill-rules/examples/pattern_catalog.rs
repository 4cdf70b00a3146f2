//! Pattern catalog generator.
//! Loads a built-in pattern set (or a RON file), validates it, and prints a
//! markdown adjacency table per direction.
//!
//! Usage: cargo run -p wavefill-rules --example pattern_catalog -- terrain > catalog.md
//!        cargo run -p wavefill-rules --example pattern_catalog -- path/to/set.ron

use wavefill_core::direction::ALL_DIRECTIONS;
use wavefill_rules::compiler::compile;
use wavefill_rules::defaults;
use wavefill_rules::loader::load_pattern_set_from_str;
use wavefill_rules::validator;

fn main() {
    let arg = std::env::args().nth(1).unwrap_or_else(|| "terrain".to_string());
    let set = match defaults::builtin(&arg) {
        Some(result) => result.expect("Failed to load built-in set"),
        None => {
            let source = std::fs::read_to_string(&arg).expect("Failed to read pattern file");
            load_pattern_set_from_str(&source).expect("Failed to parse pattern file")
        }
    };

    if let Err(errors) = validator::validate_pattern_set(&set, u64::BITS) {
        for e in &errors {
            eprintln!("error: {e}");
        }
        std::process::exit(1);
    }
    for a in validator::find_asymmetries(&set) {
        eprintln!("warning: {} allows {} to the {:?}, not reciprocated", a.from, a.to, a.dir);
    }

    let table = set.to_table().expect("Failed to build table");
    let rules = compile::<_, u64>(&table).expect("Failed to compile");

    println!("# {}", set.name);
    println!();
    println!("{} patterns, rule hash `{:016x}`", rules.pattern_count(), rules.rule_hash());
    println!();
    println!("| id | weight |");
    println!("|----|--------|");
    for bit in 0..rules.pattern_count() {
        println!("| {} | {:.2} |", rules.id(bit), rules.weight(bit));
    }

    for dir in ALL_DIRECTIONS {
        println!();
        println!("## {dir:?}");
        println!();
        let mut header = String::from("| |");
        let mut rule = String::from("|-|");
        for bit in 0..rules.pattern_count() {
            header.push_str(&format!(" {} |", rules.id(bit)));
            rule.push_str("-|");
        }
        println!("{header}");
        println!("{rule}");
        for a in 0..rules.pattern_count() {
            let mut row = format!("| {} |", rules.id(a));
            for b in 0..rules.pattern_count() {
                row.push_str(if rules.compatible(a, dir, b) { " x |" } else { "   |" });
            }
            println!("{row}");
        }
    }
}
