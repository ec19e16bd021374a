mod store;

pub use store::FileWorkflowStore;
