pub mod batch;
pub mod capability;
pub mod config;
pub mod heuristic;
pub mod resolver;
pub mod session;

pub use batch::{AnalyzerOptions, ItemOutcome, ItemReport, ReviewAnalyzer};
pub use capability::{Directory, ItemFilter, MemberRef, ReviewHistory, SourceControl};
pub use config::EngineConfig;
pub use heuristic::{DisabledHeuristic, HeuristicStrategy, VoteScanHeuristic};
pub use resolver::GroupResolver;
pub use session::{ResolverDiagnostics, SessionContext};
