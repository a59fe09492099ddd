//! Answer feedback: durable rating log, aggregate statistics, CSV export

pub mod store;

pub use store::{FeedbackEntry, FeedbackStats, FeedbackStore, Rating, TrainingExample};
