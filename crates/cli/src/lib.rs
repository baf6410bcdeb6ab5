//! Cluster composition command-line support
//!
//! Configuration, coordinate input, report rendering and example cluster
//! generation shared by the `cluster-composition` binary.

pub mod config;
pub mod example;
pub mod input;
pub mod report;

pub use config::{default_config_path, load_config, Config};
pub use example::{generate_example, write_csv, ExampleOptions, MNI_BOUNDS};
pub use input::{parse_coordinate, parse_coordinates, read_coordinates};
pub use report::{render, render_table, render_tables, OutputFormat};
