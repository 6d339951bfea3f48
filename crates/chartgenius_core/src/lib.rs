pub mod analyzer;
pub mod assembler;
pub mod cache;
pub mod direction;
pub mod documents;
pub mod domain;
pub mod error;
pub mod identity;
pub mod pipeline;
pub mod ports;
pub mod prompt;

pub use analyzer::ArticleAnalyzer;
pub use cache::{AnalysisCache, LruCache, UnboundedCache};
pub use direction::detect_direction;
pub use documents::DocumentStore;
pub use domain::{
    AnalysisResult, AuthSession, BlockBody, ChartConfig, ChartDataPoint, ChartType, ContentBlock,
    Direction, SavedDocument, User, UserCredentials, WorkspaceSummary,
};
pub use error::{CoreError, CoreResult};
pub use identity::IdentityProvider;
pub use pipeline::ReportPipeline;
pub use ports::{
    CredentialHasher, DatabaseService, GenerativeModelService, PortError, PortResult,
    StructuredPrompt,
};
