mod store;

pub use store::MemoryWorkflowStore;
