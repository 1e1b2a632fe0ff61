use std::time::Instant;

use prosody_rs::rhyme::SuggestOptions;
use prosody_rs::Session;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let session = Session::new();
    println!("Available forms: {:?}", session.registry().names());

    let haiku = [
        "An old silent pond",
        "A frog jumps into the pond\u{2014}",
        "Splash! Silence again.",
    ];

    let check_start = Instant::now();
    let report = session.check(&haiku, "haiku")?;
    println!("Checked in {:.2?}", check_start.elapsed());
    print!("{report}");

    let context = ["about again today away the day"];
    let candidates = [
        "about again today away the door",
        "about again today away the play",
        "about again today away the grey",
    ];

    let rank_start = Instant::now();
    let ranked = session.rank("shakespearean", &context, 2, &candidates)?;
    println!("Ranked {} candidates in {:.2?}", ranked.len(), rank_start.elapsed());
    for candidate in &ranked {
        println!(
            "  #{} ({:.2}) {}",
            candidate.rank, candidate.score.composite, candidate.text
        );
    }

    let options = SuggestOptions {
        max_results: 8,
        ..Default::default()
    };
    let words: Vec<String> = session
        .suggest_rhymes("day", &options)
        .into_iter()
        .map(|s| format!("{} ({})", s.word, s.quality))
        .collect();
    println!("Rhymes for 'day': {}", words.join(", "));

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
