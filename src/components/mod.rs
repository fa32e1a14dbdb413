// Export components
pub mod display_agent;
pub mod room_summary;

// Re-export the summary service and display agent
pub use display_agent::DisplayAgent;
pub use room_summary::SummaryService;
