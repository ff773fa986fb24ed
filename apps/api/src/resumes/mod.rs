// Stored resume analyses: read access for the matcher and the resume lookup route.
// Writing analyses (PDF extraction + AI call) happens upstream of this service.

pub mod handlers;
pub mod store;
