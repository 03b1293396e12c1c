pub mod models;
pub mod repos;

pub use models::{DeploymentRecord, FaucetRecord, NetworkRecord, SignerRecord};
pub use repos::{load_record, record_file_name, save_record};

/// Directory deployment records are written to, relative to the working directory.
pub const DEFAULT_RECORD_DIR: &str = "deploy";
