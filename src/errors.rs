//! Error types for the library.
//!
//! Only construction can fail: a grid needs at least one row and column, passages given up front
//! must be two way, and a maze's end points must be on its grid. Dead ends while carving and unreachable goals while solving are ordinary
//! outcomes and are reported through return values, not errors.

// Create the Error, ErrorKind, ResultExt, and Result types
use error_chain::*;

error_chain! {
    errors {
        InvalidDimension(width: usize, height: usize) {
            description("invalid maze dimensions")
            display("invalid maze dimensions {}x{}: width and height must be at least 1 and addressable",
                    width, height)
        }
        InvalidCoordinate(x: u32, y: u32) {
            description("coordinate outside of the maze")
            display("coordinate ({}, {}) is outside of the maze", x, y)
        }
        InvalidSeed(text: String) {
            description("seed is not an integer")
            display("seed '{}' is not a 64 bit integer", text)
        }
        InvalidPassage(x: u32, y: u32) {
            description("passage without a way back")
            display("cell ({}, {}) opens a passage its neighbour does not open back, or off the grid",
                    x, y)
        }
    }
}
