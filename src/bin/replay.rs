//! Stack panel replay - run a click script against fixture markup
//!
//! Usage: stackpanel-replay <fixture.json>
//!
//! Prints one JSON line per step: the initial state, then the open items
//! after each scripted click. Set RUST_LOG=debug to trace the panels.

use std::fs;

use anyhow::{bail, Context, Result};
use stackpanel::fixture::Fixture;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: stackpanel-replay <fixture.json>");
    };

    let json = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let fixture = Fixture::from_json(&json).with_context(|| format!("parsing {path}"))?;
    let snapshots = fixture.replay().context("replaying clicks")?;

    for snapshot in &snapshots {
        println!("{}", serde_json::to_string(snapshot)?);
    }
    Ok(())
}
