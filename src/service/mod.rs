//! Record hosting.
//!
//! [`RecordService`] is the boundary to whatever actually hosts records.
//! [`InMemoryRecordService`] is an in-process host used by the `ntdemo`
//! binary and by tests.

mod memory;
mod traits;

pub use memory::InMemoryRecordService;
pub use traits::{FieldChange, PutRequest, RecordService};
