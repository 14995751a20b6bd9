use docopt::Docopt;
use itertools::Itertools;
use log::info;
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;
use serde_derive::Deserialize;
use mazes::{
    astar::{Solver, Step},
    generators::{self, GeneratorOptionsBuilder},
    grid_displays::{PathDisplay, StartEndPointsDisplay, TextRender},
    grid_traits::{GridDisplay, MazeView},
    maze::Maze,
    pathing::Distances,
};
use std::{
    io::prelude::*,
    fs::File,
    path::Path,
};

const USAGE: &str = "Mazes

Usage:
    mazes_driver -h | --help
    mazes_driver [--width=<w>] [--height=<h>] [--seed=<s>] [--block-passages=<n>] [--solve | --show-distances] [--stepwise] [--text-out=<path>]

Options:
    -h --help              Show this screen.
    --width=<w>            The grid width in a w*h grid [default: 10].
    --height=<h>           The grid height in a w*h grid. Same as the width if not given.
    --seed=<s>             Seed for carving the maze, any 64 bit integer. Drawn at random if not given.
    --block-passages=<n>   Randomly close n passages after carving, which can cut the finish off.
    --solve                Find the shortest path from the top left cell to the bottom right cell.
    --show-distances       Show the distance from the top left cell to every other cell.
    --stepwise             With --solve, print the search frontier after every step.
    --text-out=<path>      Output file path for a textual rendering of the maze.
";
#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_width: usize,
    flag_height: Option<usize>,
    flag_seed: Option<String>,
    flag_block_passages: Option<usize>,
    flag_solve: bool,
    flag_show_distances: bool,
    flag_stepwise: bool,
    flag_text_out: String,
}

mod errors {
    use error_chain::*;
    error_chain! {

        links {
            Mazes(::mazes::errors::Error, ::mazes::errors::ErrorKind);
        }

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    env_logger::init();

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let seed = match args.flag_seed {
        Some(ref text) => Some(generators::parse_seed(text)?),
        None => None,
    };
    let options = GeneratorOptionsBuilder::new()
        .width(args.flag_width)
        .height(args.flag_height)
        .seed(seed)
        .build();
    let generated = options.generate()
        .chain_err(|| "Failed to carve the maze")?;
    info!("Carved with seed {}", generated.seed);

    let mut grid = generated.grid;
    if let Some(passages_count) = args.flag_block_passages {
        let mut rng = XorShiftRng::seed_from_u64(generated.seed);
        let blocked = generators::block_random_passages(&mut grid, passages_count, &mut rng);
        info!("Blocked {} passages", blocked);
    }

    let maze = Maze::new(grid);

    let text = if args.flag_show_distances {
        let distances = Distances::new(maze.grid(), maze.start())
            .ok_or("Invalid start coordinate from which to show distances.")?;
        format!("{}", TextRender::with_display(maze.grid(), &distances))

    } else if args.flag_solve {
        solve_maze(&maze, args.flag_stepwise)

    } else {
        let markers = StartEndPointsDisplay::for_maze(&maze);
        format!("{}", TextRender::with_display(maze.grid(), &markers))
    };

    if args.flag_text_out.is_empty() {
        println!("{}", text);
    } else {
        write_text_to_file(&text, &args.flag_text_out)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
    }

    Ok(())
}

/// Run the search to the end, printing the frontier along the way if asked.
/// Returns the rendering of the final maze.
fn solve_maze(maze: &Maze, stepwise: bool) -> String {

    let mut solver = Solver::new(maze);
    let mut step_number = 0;
    while solver.is_searching() {
        let step = solver.step();
        step_number += 1;

        if stepwise {
            let frontier = solver.open_nodes()
                .iter()
                .map(|node| format!("({}, {})", node.position().x, node.position().y))
                .join(" ");
            match step {
                Step::Expanded(ref node) => {
                    println!("Step {}: expanded ({}, {}), open: {}",
                             step_number,
                             node.position().x,
                             node.position().y,
                             frontier);
                }
                Step::Solved(_) => println!("Step {}: reached the finish", step_number),
                Step::Exhausted => println!("Step {}: nowhere left to go", step_number),
            }
            if let Some(path) = solver.current_solution() {
                println!("{}", TextRender::with_display(maze.grid(), &PathDisplay::new(&path)));
            }
        }
    }

    let display: Box<dyn GridDisplay> = match solver.solution() {
        Some(path) => {
            println!("Path of {} cells: {}",
                     path.len(),
                     path.iter().map(|c| format!("({}, {})", c.x, c.y)).join(" -> "));
            Box::new(PathDisplay::new(path))
        }
        None => {
            println!("No path from the start to the finish after {} steps", step_number);
            Box::new(StartEndPointsDisplay::for_maze(maze))
        }
    };

    format!("{}", TextRender::with_display(maze.grid(), &*display))
}

fn write_text_to_file(data: &str, file_name: &str) -> Result<()> {
    let path = Path::new(file_name);
    let mut file = File::create(&path)?;
    file.write_all(data.as_bytes())?;
    Ok(())
}
