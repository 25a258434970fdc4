use quick_error::quick_error;
use std::io::Error as IOError;

quick_error! {
    /// Error type for all error variants originated by this crate.
    #[derive(Debug)]
    pub enum FncError {
        /// The length of a correlation vector is not a triangular number n*(n-1)/2 with n >= 2.
        InvalidVectorLength { len: usize } {
            display("Invalid correlation vector length {}: not of the form n*(n-1)/2 with n >= 2", len)
        }

        /// A matrix that must be square is not.
        NotSquare { rows: usize, cols: usize } {
            display("Matrix must be square, got ({},{})", rows, cols)
        }

        /// The matrix does not have the size of the ICN atlas.
        InvalidMatrixShape { rows: usize, cols: usize, expected: usize } {
            display("Input matrix must be ({},{}), got ({},{})", expected, expected, rows, cols)
        }

        InvalidIcnTable(reason: String) {
            display("Invalid ICN table: {}", reason)
        }

        MissingColumn(name: String) {
            display("ICN table has no column named '{}'", name)
        }

        /// The two cohorts do not cover the same number of time windows.
        WindowCountMismatch { a: usize, b: usize } {
            display("Cohorts have different numbers of time windows: {} vs {}", a, b)
        }

        DegenerateInput(reason: String) {
            display("Degenerate input: {}", reason)
        }

        Plot(reason: String) {
            display("Plotting failed: {}", reason)
        }

        /// Delimited text error
        Csv(err: csv::Error) {
            from()
            source(err)
        }

        /// I/O Error
        Io(err: IOError) {
            from()
            source(err)
        }
    }
}

/// Alias type for results originated from this crate.
pub type Result<T> = ::std::result::Result<T, FncError>;
