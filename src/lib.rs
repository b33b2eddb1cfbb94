pub mod app;
pub mod cli;
pub mod grid;
pub mod io;
pub mod model;
pub mod ops;
pub mod parse;
