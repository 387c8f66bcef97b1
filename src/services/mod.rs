//! Business logic services.

pub mod advertise;
pub mod cleanup;
pub mod print_job;
pub mod printer_store;
pub mod printers;
pub mod spooler;
pub mod upload;

pub use advertise::ServiceAdvertiser;
pub use printer_store::{FilePrinterStore, PrinterStore};
pub use spooler::{CupsSpooler, Spooler};
pub use upload::UploadLimits;
