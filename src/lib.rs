//! Perfect-maze generation and no-revisit traversal.
//!
//! A maze is a random spanning tree over an `n x n` grid grown with
//! randomized Prim ([`prim`]). Start and finish are the two ends of the
//! tree's diameter ([`diameter`]), so the solution is as long as the tree
//! allows. [`traversal`] then tracks a player who may never step onto a
//! cell already on their path.
//!
//! Everything is driven by one explicitly seeded [`rng::MazeRng`]; the same
//! seed and size always give the same maze.
//!
//! ```
//! use prim_maze::maze::Maze;
//! use prim_maze::traversal::{Intent, Outcome, TraversalEngine};
//!
//! let maze = Maze::generate(5, 42).unwrap();
//! let mut engine = TraversalEngine::new(&maze);
//! let tick = engine.step(Intent::None);
//! assert_eq!(tick.outcome, Outcome::Playing);
//! assert_eq!(tick.position, maze.start());
//! ```

pub mod config;
pub mod diameter;
pub mod error;
pub mod grid;
pub mod input;
pub mod maze;
pub mod prim;
pub mod render;
pub mod rng;
pub mod settings;
pub mod traversal;

pub use error::{MazeError, Result};
