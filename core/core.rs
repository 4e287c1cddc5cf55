pub mod config;
pub mod error;
pub mod estimate;
pub mod project;
pub mod reader;
pub mod record;
pub mod registry;
pub mod scanner;
pub mod selection;
pub mod serializer;
pub mod session;
pub mod tree;

pub use config::{Config, OutputFormat};
pub use error::{AppError, Result};
pub use estimate::{Estimator, Stats, TextStats};
pub use project::{Project, SelectionDefaults};
pub use reader::{ContentReader, FsContentReader};
pub use record::{ContentRef, FileRecord};
pub use registry::ExtensionRegistry;
pub use scanner::{CancelToken, DirectoryScanner, FsScanner, ScanEntry, ScanOptions};
pub use selection::{CheckState, SelectionDelta, SelectionSet};
pub use serializer::{ContextExport, ContextSerializer, FileContent, build_tree_string};
pub use session::{Session, generate_context, preview, read_selected};
pub use tree::{TreeNode, build_tree};
