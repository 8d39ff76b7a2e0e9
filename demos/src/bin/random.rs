//! Search a random board.

use clap::Parser;
use gridstar_demos::{RandomArgs, drive, random_board, summary};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = RandomArgs::parse();
    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut pf = random_board(args.config(), args.walls, &mut rng)?;
    let mut ticks = 0;
    drive(&mut pf, usize::MAX, |_| ticks += 1)?;

    println!("{}", pf.grid());
    println!("seed {}, {ticks} ticks, {}", args.seed, summary(&pf));
    Ok(())
}
