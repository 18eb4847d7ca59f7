pub mod scanner;

pub use scanner::{run_matrix_scan, scan, GridConfig, Matrix, MatrixCell, MatrixInput};
