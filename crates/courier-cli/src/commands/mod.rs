//! Command implementations.

pub mod capture;
pub mod clear;
pub mod list;

pub use self::capture::execute_capture;
pub use self::clear::execute_clear;
pub use self::list::execute_list;

use courier_capture::CaptureService;
use courier_store::ConfiguredSlot;

/// Capture service as assembled from configuration.
pub type Service = CaptureService<ConfiguredSlot>;
