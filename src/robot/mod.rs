//! Search-side interface.
//!
//! ## Overview
//!
//! - [`SearchAdapter`]: what a driver calls (make, unmake, legal moves,
//!   random move, evaluate). [`Robot`] implements it over a private board.
//! - [`FlatMonteCarlo`]: reference driver, flat playouts per root move.
//! - [`SearchWorker`]: runs a search on its own thread over a snapshot,
//!   cancellable between playouts. [`search_pool`] runs root-parallel
//!   workers on rayon.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use boardcore::board::Board;
//! use boardcore::core::GameInit;
//! use boardcore::games::capture::CaptureRules;
//! use boardcore::robot::{SearchConfig, SearchWorker};
//!
//! let init: GameInit = "capture 2 1 0".parse().unwrap();
//! let rules = Arc::new(CaptureRules::new(&init).unwrap());
//! let board = Board::new(rules, init).unwrap();
//!
//! let config = SearchConfig::default().with_playouts(2).with_max_depth(8);
//! let worker = SearchWorker::spawn(&board, None, config);
//! let best = worker.join().unwrap().best.unwrap();
//! assert!(board.generate_moves(board.whose_turn()).contains(&best));
//! ```

pub mod adapter;
pub mod config;
pub mod driver;
pub mod stats;
pub mod worker;

pub use adapter::{Robot, SearchAdapter};
pub use config::{Scoring, SearchConfig};
pub use driver::{Budget, FlatMonteCarlo, MoveTally, SearchDriver, SearchOutcome};
pub use stats::SearchStats;
pub use worker::{search_pool, CancelFlag, SearchWorker};
