//! Step through each preset board and print what every tick changed.

use clap::Parser;
use gridstar_demos::{PresetArgs, drive, summary};
use gridstar_paths::Pathfinder;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = PresetArgs::parse();
    for (name, layout) in args.selected() {
        let mut pf = Pathfinder::from_layout(layout)?;
        println!("== {name} ==");
        drive(&mut pf, args.max_ticks, |report| {
            println!(
                "tick {:>3}: {:<14} {} cells changed",
                report.tick,
                report.phase.to_string(),
                report.changes.len()
            );
        })?;
        println!("{}", pf.grid());
        println!("{}\n", summary(&pf));
    }
    Ok(())
}
