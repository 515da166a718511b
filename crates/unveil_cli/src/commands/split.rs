//! `unveil split`

use anyhow::{Context, Result};
use unveil_text::{segment, Granularity};

pub fn run(text: &str, mode: Granularity, json: bool) -> Result<()> {
    let fragments = segment(text, mode);

    if json {
        let out =
            serde_json::to_string_pretty(&fragments).context("failed to encode fragments")?;
        println!("{}", out);
        return Ok(());
    }

    if fragments.is_empty() {
        println!("(no fragments)");
        return Ok(());
    }

    println!("{} {} fragment(s):", fragments.len(), mode);
    for (index, fragment) in fragments.iter().enumerate() {
        println!(
            "{:>4}  {:<6}  {:?}",
            index,
            fragment.white_space().as_str(),
            fragment.text()
        );
    }
    Ok(())
}
