//! Example: keeping a word list up to date while readers hold snapshots.
//!
//! Builds a lexicon from sorted words, edits it, and shows that a snapshot
//! taken before the edits still answers with the old contents.
//!
//! Run with: cargo run --example wordlist

use lexicos::Lexicon;

fn main() {
    let words = ["BAKE", "BAKED", "BAKER", "CAKE", "CAKED", "FAKE", "LAKE"];
    let mut lexicon = Lexicon::from_sorted(words).unwrap();
    println!("{lexicon:?}");
    println!("  {lexicon}");

    let before = lexicon.snapshot();
    lexicon.insert("MAKE");
    lexicon.insert("MAKER");
    lexicon.delete("CAKED");
    println!("\nAfter edits: {lexicon:?}");
    println!("  {lexicon}");

    // Word lookup
    println!("\nWord lookup (before / after):");
    for word in ["BAKE", "CAKED", "MAKE", "MAKES"] {
        let yes_no = |b: bool| if b { "yes" } else { "no" };
        println!(
            "  {word}: {} / {}",
            yes_no(before.contains(word)),
            yes_no(lexicon.contains(word))
        );
    }

    // Prefix lookup
    println!("\nPrefix lookup:");
    for prefix in ["BA", "CAK", "MA"] {
        let found: Vec<String> = lexicon.lookup(prefix);
        println!("  {prefix}*: {found:?}");
    }

    // Words in a phrase
    let phrase = "MAKEBAKERS";
    println!("\nWords in {phrase:?}:");
    for offset in 0..phrase.len() {
        let found: Vec<String> = lexicon.words(phrase, offset);
        if !found.is_empty() {
            println!("  at {offset}: {found:?}");
        }
    }

    drop(before);
    let reclaimed = lexicon.compact();
    println!("\nCompacted {reclaimed} states: {lexicon:?}");
}
