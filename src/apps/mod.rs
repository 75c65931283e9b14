pub mod descriptor;
pub mod patterns;
pub mod uninstaller;

pub use descriptor::ApplicationDescriptor;
pub use patterns::PatternGenerator;
pub use uninstaller::{is_app_running, DisposalReport, Disposer, DryRunDisposer, TrashDisposer};
