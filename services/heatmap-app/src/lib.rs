//! Application layer for the governorate heatmap: view state, event
//! dispatch, the export pipeline and the collaborators it drives.

pub mod config;
pub mod dispatcher;
pub mod export;
pub mod headless;
pub mod state;
pub mod status;
pub mod surface;

pub use config::AppConfig;
pub use dispatcher::{Dispatcher, Toggle, ViewEvent};
pub use export::{ExportArtifact, ExportPhase, ExportPipeline};
pub use state::ViewState;
pub use status::{Severity, StatusLine};
