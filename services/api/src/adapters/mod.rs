pub mod analysis_llm;
pub mod db;
pub mod memory;
pub mod password;

pub use analysis_llm::GeminiAnalysisAdapter;
pub use db::DbAdapter;
pub use memory::MemoryDbAdapter;
pub use password::Argon2Hasher;
