pub mod energy;
pub mod terminal;

pub use self::energy::{compute_deviation_summary, ConvergenceDigest, DeviationSummary};
pub use self::terminal::{estimate_terminal_velocity, TerminalVelocity};
